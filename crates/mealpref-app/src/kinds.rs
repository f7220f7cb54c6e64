// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

use crate::dropdown::DropdownOption;
use crate::editor::{EntityKind, Item};
use crate::model::{AllergySeverity, DislikeSeverity, FoodCategory};

pub const COMMON_ALLERGIES: [&str; 6] = ["Nuts", "Dairy", "Gluten", "Shellfish", "Eggs", "Soy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FavoriteFood;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FavoriteAttributes {
    pub category: FoodCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteField {
    Category(FoodCategory),
}

impl EntityKind for FavoriteFood {
    type Attributes = FavoriteAttributes;
    type Field = FavoriteField;
    type Bucket = FoodCategory;

    const NOUN: &'static str = "favorite food";
    const CHOICE_PLACEHOLDER: &'static str = "Select category";

    fn apply_field(attributes: &mut Self::Attributes, field: Self::Field) {
        match field {
            FavoriteField::Category(category) => attributes.category = category,
        }
    }

    fn buckets() -> &'static [Self::Bucket] {
        &FoodCategory::ALL
    }

    fn bucket_of(attributes: &Self::Attributes) -> Self::Bucket {
        attributes.category
    }

    fn choice_options() -> Vec<DropdownOption<&'static str>> {
        FoodCategory::ALL
            .iter()
            .map(|category| DropdownOption::new(category.as_str(), category.label()))
            .collect()
    }

    fn choice_value(attributes: &Self::Attributes) -> &'static str {
        attributes.category.as_str()
    }

    fn parse_choice(value: &str) -> Option<Self::Field> {
        FoodCategory::parse(value).map(FavoriteField::Category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DislikedFood;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DislikedAttributes {
    pub severity: DislikeSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DislikedField {
    Severity(DislikeSeverity),
}

impl EntityKind for DislikedFood {
    type Attributes = DislikedAttributes;
    type Field = DislikedField;
    type Bucket = ();

    const NOUN: &'static str = "disliked food";
    const CHOICE_PLACEHOLDER: &'static str = "Select severity";

    fn apply_field(attributes: &mut Self::Attributes, field: Self::Field) {
        match field {
            DislikedField::Severity(severity) => attributes.severity = severity,
        }
    }

    fn buckets() -> &'static [Self::Bucket] {
        &[()]
    }

    fn bucket_of(_attributes: &Self::Attributes) -> Self::Bucket {}

    fn choice_options() -> Vec<DropdownOption<&'static str>> {
        DislikeSeverity::ALL
            .iter()
            .map(|severity| DropdownOption::new(severity.as_str(), severity.label()))
            .collect()
    }

    fn choice_value(attributes: &Self::Attributes) -> &'static str {
        attributes.severity.as_str()
    }

    fn parse_choice(value: &str) -> Option<Self::Field> {
        DislikeSeverity::parse(value).map(DislikedField::Severity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Allergy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyAttributes {
    pub severity: AllergySeverity,
    pub is_common: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllergyField {
    Severity(AllergySeverity),
    Common(bool),
}

impl EntityKind for Allergy {
    type Attributes = AllergyAttributes;
    type Field = AllergyField;
    type Bucket = ();

    const NOUN: &'static str = "allergy";
    const CHOICE_PLACEHOLDER: &'static str = "Select severity";

    fn apply_field(attributes: &mut Self::Attributes, field: Self::Field) {
        match field {
            AllergyField::Severity(severity) => attributes.severity = severity,
            AllergyField::Common(is_common) => attributes.is_common = is_common,
        }
    }

    fn buckets() -> &'static [Self::Bucket] {
        &[()]
    }

    fn bucket_of(_attributes: &Self::Attributes) -> Self::Bucket {}

    fn choice_options() -> Vec<DropdownOption<&'static str>> {
        AllergySeverity::ALL
            .iter()
            .map(|severity| DropdownOption::new(severity.as_str(), severity.label()))
            .collect()
    }

    fn choice_value(attributes: &Self::Attributes) -> &'static str {
        attributes.severity.as_str()
    }

    fn parse_choice(value: &str) -> Option<Self::Field> {
        AllergySeverity::parse(value).map(AllergyField::Severity)
    }

    fn presets() -> &'static [&'static str] {
        &COMMON_ALLERGIES
    }

    fn mark_preset(attributes: &mut Self::Attributes) {
        attributes.is_common = true;
    }
}

pub type FavoriteItem = Item<FavoriteAttributes>;
pub type DislikedItem = Item<DislikedAttributes>;
pub type AllergyItem = Item<AllergyAttributes>;
