// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::editor::{EditorCommand, EditorEvent, Item, ListEditor};
use crate::ids::ItemId;
use crate::instructions::{Instructions, MAX_INSTRUCTIONS_CHARS};
use crate::kinds::{
    Allergy, AllergyField, AllergyItem, DislikedField, DislikedFood, DislikedItem, FavoriteField,
    FavoriteFood, FavoriteItem,
};
use crate::model::{Panel, Profile};

#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    Favorites(EditorCommand<FavoriteField>),
    Disliked(EditorCommand<DislikedField>),
    Allergies(EditorCommand<AllergyField>),
    SetInstructions(String),
    PushInstructionChar(char),
    InstructionsBackspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Editor { panel: Panel, event: EditorEvent },
    InstructionsChanged { len: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileForm {
    profile: Profile,
    pub favorites: ListEditor<FavoriteFood>,
    pub disliked: ListEditor<DislikedFood>,
    pub allergies: ListEditor<Allergy>,
    pub instructions: Instructions,
}

impl ProfileForm {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            favorites: ListEditor::new(),
            disliked: ListEditor::new(),
            allergies: ListEditor::new(),
            instructions: Instructions::default(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn dispatch(&mut self, command: FormCommand) -> Vec<FormEvent> {
        match command {
            FormCommand::Favorites(command) => {
                tag(Panel::FavoriteFoods, self.favorites.dispatch(command))
            }
            FormCommand::Disliked(command) => {
                tag(Panel::DislikedFoods, self.disliked.dispatch(command))
            }
            FormCommand::Allergies(command) => {
                tag(Panel::Allergies, self.allergies.dispatch(command))
            }
            FormCommand::SetInstructions(text) => {
                let changed = self.instructions.set_text(&text);
                self.instructions_event(changed)
            }
            FormCommand::PushInstructionChar(ch) => {
                let changed = self.instructions.push_char(ch);
                self.instructions_event(changed)
            }
            FormCommand::InstructionsBackspace => {
                let changed = self.instructions.backspace();
                self.instructions_event(changed)
            }
        }
    }

    pub fn is_editing(&self, panel: Panel) -> bool {
        match panel {
            Panel::FavoriteFoods => self.favorites.editing().is_some(),
            Panel::DislikedFoods => self.disliked.editing().is_some(),
            Panel::Allergies => self.allergies.editing().is_some(),
            Panel::Instructions => false,
        }
    }

    pub fn item_count(&self, panel: Panel) -> usize {
        match panel {
            Panel::FavoriteFoods => self.favorites.len(),
            Panel::DislikedFoods => self.disliked.len(),
            Panel::Allergies => self.allergies.len(),
            Panel::Instructions => usize::from(!self.instructions.is_empty()),
        }
    }

    pub fn display_order(&self, panel: Panel) -> Vec<ItemId> {
        match panel {
            Panel::FavoriteFoods => self.favorites.display_order(),
            Panel::DislikedFoods => self.disliked.display_order(),
            Panel::Allergies => self.allergies.display_order(),
            Panel::Instructions => Vec::new(),
        }
    }

    pub fn payload(&self) -> PreferencesPayload {
        PreferencesPayload {
            favorite_foods: self.favorites.items().to_vec(),
            disliked_foods: self.disliked.items().to_vec(),
            allergies: self.allergies.items().to_vec(),
            instructions: self.instructions.text().to_owned(),
        }
    }

    pub fn snapshot(&self) -> Self {
        let mut copy = self.clone();
        copy.favorites.cancel_edit();
        copy.disliked.cancel_edit();
        copy.allergies.cancel_edit();
        copy
    }

    // Restores committed content from `baseline`. Drafts and id sequences
    // are kept so ids handed out since the baseline are never reused.
    pub fn revert_to(&mut self, baseline: &ProfileForm) {
        self.favorites.revert_to(&baseline.favorites);
        self.disliked.revert_to(&baseline.disliked);
        self.allergies.revert_to(&baseline.allergies);
        self.instructions = baseline.instructions.clone();
        debug!("form reverted to baseline");
    }

    pub fn differs_from(&self, baseline: &ProfileForm) -> bool {
        self.payload() != baseline.payload()
    }

    fn instructions_event(&self, changed: bool) -> Vec<FormEvent> {
        if changed {
            vec![FormEvent::InstructionsChanged {
                len: self.instructions.len(),
            }]
        } else {
            Vec::new()
        }
    }
}

fn tag(panel: Panel, events: Vec<EditorEvent>) -> Vec<FormEvent> {
    events
        .into_iter()
        .map(|event| FormEvent::Editor { panel, event })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPayload {
    pub favorite_foods: Vec<FavoriteItem>,
    pub disliked_foods: Vec<DislikedItem>,
    pub allergies: Vec<AllergyItem>,
    pub instructions: String,
}

impl PreferencesPayload {
    pub fn validate(&self) -> Result<()> {
        validate_items("favorite food", &self.favorite_foods)?;
        validate_items("disliked food", &self.disliked_foods)?;
        validate_items("allergy", &self.allergies)?;

        let len = self.instructions.chars().count();
        if len > MAX_INSTRUCTIONS_CHARS {
            bail!(
                "special instructions are {len} characters; shorten them to {MAX_INSTRUCTIONS_CHARS} and retry"
            );
        }
        Ok(())
    }

    pub fn item_count(&self) -> usize {
        self.favorite_foods.len() + self.disliked_foods.len() + self.allergies.len()
    }
}

fn validate_items<A>(noun: &str, items: &[Item<A>]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for item in items {
        if item.name.trim().is_empty() {
            bail!("{noun} {} has an empty name -- enter a name and retry", item.id);
        }
        if item.name != item.name.trim() {
            bail!("{noun} {:?} has surrounding whitespace", item.name);
        }
        if !seen.insert(item.id) {
            bail!("{noun} id {} appears more than once", item.id);
        }
    }
    Ok(())
}
