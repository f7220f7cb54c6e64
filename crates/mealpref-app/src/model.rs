// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

pub const BIRTHDAY_LAYOUT: &str = "DD.MM.YYYY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl FoodCategory {
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snacks];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snacks => "snacks",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snacks" => Some(Self::Snacks),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snacks => "Snacks",
        }
    }
}

impl Default for FoodCategory {
    fn default() -> Self {
        Self::ALL[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DislikeSeverity {
    #[default]
    Mild,
    Strong,
    Absolute,
}

impl DislikeSeverity {
    pub const ALL: [Self; 3] = [Self::Mild, Self::Strong, Self::Absolute];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Strong => "strong",
            Self::Absolute => "absolute",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mild" => Some(Self::Mild),
            "strong" => Some(Self::Strong),
            "absolute" => Some(Self::Absolute),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mild => "Mild Dislike",
            Self::Strong => "Strong Dislike",
            Self::Absolute => "Won't Eat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergySeverity {
    Mild,
    #[default]
    Moderate,
    Severe,
}

impl AllergySeverity {
    pub const ALL: [Self; 3] = [Self::Mild, Self::Moderate, Self::Severe];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mild" => Some(Self::Mild),
            "moderate" => Some(Self::Moderate),
            "severe" => Some(Self::Severe),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panel {
    FavoriteFoods,
    DislikedFoods,
    Allergies,
    Instructions,
}

impl Panel {
    pub const ALL: [Self; 4] = [
        Self::FavoriteFoods,
        Self::DislikedFoods,
        Self::Allergies,
        Self::Instructions,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::FavoriteFoods => "Favorite Foods",
            Self::DislikedFoods => "Disliked Foods",
            Self::Allergies => "Allergies & Intolerances",
            Self::Instructions => "Special Instructions",
        }
    }

    pub const fn is_list(self) -> bool {
        !matches!(self, Self::Instructions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub birthday: Date,
    pub emoji: String,
    pub last_online_label: String,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        birthday: &str,
        emoji: impl Into<String>,
        last_online_label: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            bail!("profile name is required -- set [profile].name and retry");
        }
        Ok(Self {
            name,
            birthday: parse_birthday(birthday)?,
            emoji: emoji.into(),
            last_online_label: last_online_label.into(),
        })
    }

    pub fn initial(&self) -> char {
        self.name.trim().chars().next().unwrap_or('?')
    }

    pub fn birthday_label(&self) -> String {
        format_birthday(self.birthday)
    }
}

pub fn parse_birthday(raw: &str) -> Result<Date> {
    let layout = format_description!("[day].[month].[year]");
    Date::parse(raw.trim(), layout)
        .with_context(|| format!("invalid birthday {raw:?}; expected {BIRTHDAY_LAYOUT}"))
}

pub fn format_birthday(date: Date) -> String {
    let layout = format_description!("[day].[month].[year]");
    date.format(layout).unwrap_or_else(|_| date.to_string())
}
