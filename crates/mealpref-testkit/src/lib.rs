// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use mealpref_app::{
    AllergyField, AllergySeverity, COMMON_ALLERGIES, DislikeSeverity, DislikedField,
    EditorCommand, FavoriteField, FoodCategory, FormCommand, Profile, ProfileForm,
};
use std::path::PathBuf;
use time::Date;
use time::macros::date;

const BREAKFAST_FOODS: [&str; 8] = [
    "Oatmeal",
    "Pancakes",
    "Scrambled Eggs",
    "Granola",
    "Croissant",
    "Yogurt Bowl",
    "French Toast",
    "Muesli",
];

const LUNCH_FOODS: [&str; 8] = [
    "Caesar Salad",
    "Club Sandwich",
    "Lentil Soup",
    "Falafel Wrap",
    "Ramen",
    "Quiche",
    "Poke Bowl",
    "Tomato Soup",
];

const DINNER_FOODS: [&str; 8] = [
    "Lasagna",
    "Roast Chicken",
    "Risotto",
    "Goulash",
    "Grilled Salmon",
    "Schnitzel",
    "Vegetable Curry",
    "Paella",
];

const SNACK_FOODS: [&str; 8] = [
    "Pretzels",
    "Apple Slices",
    "Trail Mix",
    "Cheese Cubes",
    "Popcorn",
    "Rice Cakes",
    "Hummus",
    "Dark Chocolate",
];

const DISLIKED_FOODS: [&str; 12] = [
    "Liver",
    "Olives",
    "Anchovies",
    "Brussels Sprouts",
    "Blue Cheese",
    "Tripe",
    "Okra",
    "Licorice",
    "Sardines",
    "Cilantro",
    "Beetroot",
    "Oysters",
];

const UNCOMMON_ALLERGIES: [&str; 8] = [
    "Celery",
    "Mustard",
    "Sesame",
    "Lupin",
    "Sulphites",
    "Kiwi",
    "Strawberries",
    "Nightshades",
];

const INSTRUCTION_WORDS: [&str; 24] = [
    "please",
    "serve",
    "warm",
    "cold",
    "without",
    "sauce",
    "salt",
    "soft",
    "small",
    "portions",
    "separate",
    "plate",
    "extra",
    "water",
    "vegetables",
    "on",
    "the",
    "side",
    "no",
    "spicy",
    "food",
    "after",
    "six",
    "lactose-free",
];

const DEMO_SEED: u64 = 7;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteFixture {
    pub name: String,
    pub category: FoodCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DislikedFixture {
    pub name: String,
    pub severity: DislikeSeverity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllergyFixture {
    pub name: String,
    pub severity: AllergySeverity,
    pub is_common: bool,
}

#[derive(Debug, Clone)]
pub struct MealFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl MealFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn favorite_food(&mut self) -> FavoriteFixture {
        let category = *self.pick(&FoodCategory::ALL);
        let name = self.pick(foods_for(category)).to_string();
        FavoriteFixture { name, category }
    }

    pub fn disliked_food(&mut self) -> DislikedFixture {
        DislikedFixture {
            name: self.pick(&DISLIKED_FOODS).to_string(),
            severity: *self.pick(&DislikeSeverity::ALL),
        }
    }

    pub fn allergy(&mut self) -> AllergyFixture {
        let is_common = self.int_n(2) == 0;
        let name = if is_common {
            self.pick(&COMMON_ALLERGIES)
        } else {
            self.pick(&UNCOMMON_ALLERGIES)
        };
        AllergyFixture {
            name: name.to_string(),
            severity: *self.pick(&AllergySeverity::ALL),
            is_common,
        }
    }

    pub fn instructions(&mut self, min_words: usize, max_words: usize) -> String {
        let span = max_words.saturating_sub(min_words) + 1;
        let count = min_words + self.int_n(span);
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&INSTRUCTION_WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        if !sentence.is_empty() {
            sentence.push('.');
        }
        sentence
    }

    pub fn seed_form(&mut self, form: &mut ProfileForm, per_list: usize) {
        for _ in 0..per_list {
            let favorite = self.favorite_food();
            form.dispatch(FormCommand::Favorites(EditorCommand::SetDraftField(
                FavoriteField::Category(favorite.category),
            )));
            form.dispatch(FormCommand::Favorites(EditorCommand::SetDraftName(
                favorite.name,
            )));
            form.dispatch(FormCommand::Favorites(EditorCommand::Add));

            let disliked = self.disliked_food();
            form.dispatch(FormCommand::Disliked(EditorCommand::SetDraftField(
                DislikedField::Severity(disliked.severity),
            )));
            form.dispatch(FormCommand::Disliked(EditorCommand::SetDraftName(
                disliked.name,
            )));
            form.dispatch(FormCommand::Disliked(EditorCommand::Add));

            let allergy = self.allergy();
            form.dispatch(FormCommand::Allergies(EditorCommand::SetDraftField(
                AllergyField::Severity(allergy.severity),
            )));
            if allergy.is_common {
                form.dispatch(FormCommand::Allergies(EditorCommand::PresetAdd(
                    allergy.name,
                )));
            } else {
                form.dispatch(FormCommand::Allergies(EditorCommand::SetDraftName(
                    allergy.name,
                )));
                form.dispatch(FormCommand::Allergies(EditorCommand::Add));
            }
        }
        let text = self.instructions(6, 16);
        form.dispatch(FormCommand::SetInstructions(text));

        // Leave the drafts as a fresh form would have them.
        form.dispatch(FormCommand::Favorites(EditorCommand::SetDraftField(
            FavoriteField::Category(FoodCategory::default()),
        )));
        form.dispatch(FormCommand::Disliked(EditorCommand::SetDraftField(
            DislikedField::Severity(DislikeSeverity::default()),
        )));
        form.dispatch(FormCommand::Allergies(EditorCommand::SetDraftField(
            AllergyField::Severity(AllergySeverity::default()),
        )));
    }

    fn pick<'a, T>(&mut self, values: &'a [T]) -> &'a T {
        &values[self.rng.int_n(values.len())]
    }
}

pub fn sample_profile() -> Profile {
    Profile {
        name: "Michael Mohr".to_owned(),
        birthday: fixture_birthday(),
        emoji: "🚀".to_owned(),
        last_online_label: "vor 2 Monate".to_owned(),
    }
}

pub fn fixture_birthday() -> Date {
    date!(1970 - 12 - 16)
}

pub fn demo_form() -> ProfileForm {
    demo_form_for(sample_profile())
}

pub fn demo_form_for(profile: Profile) -> ProfileForm {
    let mut form = ProfileForm::new(profile);
    MealFaker::new(DEMO_SEED).seed_form(&mut form, 3);
    form
}

pub fn temp_output_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("preferences.json");
    Ok((dir, path))
}

pub fn breakfast_foods() -> &'static [&'static str] {
    &BREAKFAST_FOODS
}

pub fn disliked_foods() -> &'static [&'static str] {
    &DISLIKED_FOODS
}

fn foods_for(category: FoodCategory) -> &'static [&'static str] {
    match category {
        FoodCategory::Breakfast => &BREAKFAST_FOODS,
        FoodCategory::Lunch => &LUNCH_FOODS,
        FoodCategory::Dinner => &DINNER_FOODS,
        FoodCategory::Snacks => &SNACK_FOODS,
    }
}
