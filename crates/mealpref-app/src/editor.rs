// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

use crate::dropdown::DropdownOption;
use crate::ids::{IdSequence, ItemId};

pub trait EntityKind {
    type Attributes: Clone + Debug + PartialEq + Default + Serialize;
    type Field: Clone + Debug + PartialEq;
    type Bucket: Copy + Debug + PartialEq + 'static;

    const NOUN: &'static str;
    const CHOICE_PLACEHOLDER: &'static str;

    fn apply_field(attributes: &mut Self::Attributes, field: Self::Field);

    fn buckets() -> &'static [Self::Bucket];
    fn bucket_of(attributes: &Self::Attributes) -> Self::Bucket;

    fn choice_options() -> Vec<DropdownOption<&'static str>>;
    fn choice_value(attributes: &Self::Attributes) -> &'static str;
    fn parse_choice(value: &str) -> Option<Self::Field>;

    fn presets() -> &'static [&'static str] {
        &[]
    }

    fn mark_preset(_attributes: &mut Self::Attributes) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item<A> {
    pub id: ItemId,
    pub name: String,
    #[serde(flatten)]
    pub attributes: A,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft<A> {
    pub name: String,
    pub attributes: A,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession<A> {
    pub id: ItemId,
    pub draft: Draft<A>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    ItemAdded(ItemId),
    ItemRemoved(ItemId),
    EditStarted(ItemId),
    EditDiscarded(ItemId),
    EditCommitted(ItemId),
    EditCancelled(ItemId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand<F> {
    SetDraftName(String),
    SetDraftField(F),
    Add,
    Remove(ItemId),
    StartEdit(ItemId),
    SetEditName(String),
    SetEditField(F),
    CommitEdit,
    CancelEdit,
    PresetAdd(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListEditor<K: EntityKind> {
    items: Vec<Item<K::Attributes>>,
    draft: Draft<K::Attributes>,
    editing: Option<EditSession<K::Attributes>>,
    ids: IdSequence,
}

impl<K: EntityKind> Default for ListEditor<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKind> ListEditor<K> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            draft: Draft::default(),
            editing: None,
            ids: IdSequence::default(),
        }
    }

    pub fn items(&self) -> &[Item<K::Attributes>] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item<K::Attributes>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn draft(&self) -> &Draft<K::Attributes> {
        &self.draft
    }

    pub fn editing(&self) -> Option<&EditSession<K::Attributes>> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self, id: ItemId) -> bool {
        self.editing.as_ref().is_some_and(|session| session.id == id)
    }

    pub fn dispatch(&mut self, command: EditorCommand<K::Field>) -> Vec<EditorEvent> {
        match command {
            EditorCommand::SetDraftName(name) => {
                self.set_draft_name(name);
                Vec::new()
            }
            EditorCommand::SetDraftField(field) => {
                self.set_draft_field(field);
                Vec::new()
            }
            EditorCommand::Add => self.add_item(),
            EditorCommand::Remove(id) => self.remove_item(id),
            EditorCommand::StartEdit(id) => self.start_edit(id),
            EditorCommand::SetEditName(name) => {
                self.update_edit_name(name);
                Vec::new()
            }
            EditorCommand::SetEditField(field) => {
                self.update_edit_field(field);
                Vec::new()
            }
            EditorCommand::CommitEdit => self.commit_edit(),
            EditorCommand::CancelEdit => self.cancel_edit(),
            EditorCommand::PresetAdd(name) => self.preset_add(&name),
        }
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_draft_field(&mut self, field: K::Field) {
        K::apply_field(&mut self.draft.attributes, field);
    }

    pub fn add_item(&mut self) -> Vec<EditorEvent> {
        let Some(name) = committed_name(&self.draft.name) else {
            return Vec::new();
        };
        let attributes = self.draft.attributes.clone();
        let id = self.push_item(name, attributes);
        self.draft.name.clear();
        vec![EditorEvent::ItemAdded(id)]
    }

    pub fn remove_item(&mut self, id: ItemId) -> Vec<EditorEvent> {
        let Some(index) = self.position(id) else {
            return Vec::new();
        };
        self.items.remove(index);
        debug!(kind = K::NOUN, %id, "item removed");

        let mut events = vec![EditorEvent::ItemRemoved(id)];
        if self.is_editing(id) {
            self.editing = None;
            events.push(EditorEvent::EditDiscarded(id));
        }
        events
    }

    pub fn start_edit(&mut self, id: ItemId) -> Vec<EditorEvent> {
        let Some(item) = self.item(id) else {
            return Vec::new();
        };
        let session = EditSession {
            id,
            draft: Draft {
                name: item.name.clone(),
                attributes: item.attributes.clone(),
            },
        };

        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.editing.replace(session) {
            events.push(EditorEvent::EditDiscarded(previous.id));
        }
        events.push(EditorEvent::EditStarted(id));
        debug!(kind = K::NOUN, %id, "edit started");
        events
    }

    pub fn update_edit_name(&mut self, name: impl Into<String>) {
        if let Some(session) = self.editing.as_mut() {
            session.draft.name = name.into();
        }
    }

    pub fn update_edit_field(&mut self, field: K::Field) {
        if let Some(session) = self.editing.as_mut() {
            K::apply_field(&mut session.draft.attributes, field);
        }
    }

    // Writes the session draft over its item in place. A blank name keeps
    // the session open and changes nothing.
    pub fn commit_edit(&mut self) -> Vec<EditorEvent> {
        let Some(session) = self.editing.as_ref() else {
            return Vec::new();
        };
        let Some(name) = committed_name(&session.draft.name) else {
            return Vec::new();
        };
        let id = session.id;
        let attributes = session.draft.attributes.clone();

        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            self.editing = None;
            return vec![EditorEvent::EditDiscarded(id)];
        };
        item.name = name;
        item.attributes = attributes;
        self.editing = None;
        debug!(kind = K::NOUN, %id, "edit committed");
        vec![EditorEvent::EditCommitted(id)]
    }

    pub fn cancel_edit(&mut self) -> Vec<EditorEvent> {
        match self.editing.take() {
            Some(session) => vec![EditorEvent::EditCancelled(session.id)],
            None => Vec::new(),
        }
    }

    pub fn preset_add(&mut self, name: &str) -> Vec<EditorEvent> {
        let Some(preset) = K::presets().iter().find(|preset| **preset == name) else {
            return Vec::new();
        };
        let mut attributes = self.draft.attributes.clone();
        K::mark_preset(&mut attributes);
        let id = self.push_item((*preset).to_owned(), attributes);
        vec![EditorEvent::ItemAdded(id)]
    }

    // Replaces the committed items with `baseline`'s and closes any edit
    // session. The id sequence only moves forward.
    pub fn revert_to(&mut self, baseline: &Self) {
        self.items = baseline.items.clone();
        self.editing = None;
        if baseline.ids.peek() > self.ids.peek() {
            self.ids = baseline.ids.clone();
        }
    }

    pub fn grouped(&self) -> Vec<(K::Bucket, Vec<&Item<K::Attributes>>)> {
        K::buckets()
            .iter()
            .filter_map(|bucket| {
                let members: Vec<&Item<K::Attributes>> = self
                    .items
                    .iter()
                    .filter(|item| K::bucket_of(&item.attributes) == *bucket)
                    .collect();
                (!members.is_empty()).then_some((*bucket, members))
            })
            .collect()
    }

    pub fn display_order(&self) -> Vec<ItemId> {
        self.grouped()
            .into_iter()
            .flat_map(|(_, members)| members.into_iter().map(|item| item.id))
            .collect()
    }

    fn push_item(&mut self, name: String, attributes: K::Attributes) -> ItemId {
        let id = self.ids.next_id();
        debug!(kind = K::NOUN, %id, name = %name, "item added");
        self.items.push(Item {
            id,
            name,
            attributes,
        });
        id
    }
}

fn committed_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::{EditorCommand, EditorEvent, EntityKind, ListEditor, committed_name};
    use crate::ids::ItemId;
    use crate::kinds::{DislikedField, DislikedFood, FavoriteField, FavoriteFood};
    use crate::model::{DislikeSeverity, FoodCategory};
    use std::collections::BTreeSet;

    fn editor_with(names: &[&str]) -> ListEditor<DislikedFood> {
        let mut editor = ListEditor::<DislikedFood>::new();
        for name in names {
            editor.set_draft_name(*name);
            editor.add_item();
        }
        editor
    }

    fn bucket_order<K: EntityKind>(editor: &ListEditor<K>) -> Vec<K::Bucket> {
        editor
            .grouped()
            .into_iter()
            .map(|(bucket, _)| bucket)
            .collect()
    }

    #[test]
    fn committed_name_trims_and_rejects_blank() {
        assert_eq!(committed_name("  Liver "), Some("Liver".to_owned()));
        assert_eq!(committed_name(" \t\n"), None);
        assert_eq!(committed_name(""), None);
    }

    #[test]
    fn add_appends_trimmed_item_with_fresh_id() {
        let mut editor = editor_with(&["Liver"]);
        editor.set_draft_name("  Olives  ");
        editor.set_draft_field(DislikedField::Severity(DislikeSeverity::Absolute));

        let events = editor.add_item();
        assert_eq!(events, vec![EditorEvent::ItemAdded(ItemId::new(2))]);
        assert_eq!(editor.len(), 2);

        let added = &editor.items()[1];
        assert_eq!(added.name, "Olives");
        assert_eq!(added.attributes.severity, DislikeSeverity::Absolute);

        let ids: BTreeSet<ItemId> = editor.items().iter().map(|item| item.id).collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn add_resets_name_but_keeps_attributes() {
        let mut editor = ListEditor::<DislikedFood>::new();
        editor.set_draft_field(DislikedField::Severity(DislikeSeverity::Strong));
        editor.set_draft_name("Liver");
        editor.add_item();

        assert_eq!(editor.draft().name, "");
        assert_eq!(editor.draft().attributes.severity, DislikeSeverity::Strong);
    }

    #[test]
    fn blank_add_is_silent_noop() {
        let mut editor = editor_with(&["Liver"]);
        editor.set_draft_name("   ");
        let before = editor.clone();

        assert!(editor.add_item().is_empty());
        assert_eq!(editor, before);
    }

    #[test]
    fn duplicate_names_are_distinct_items() {
        let editor = editor_with(&["Liver", "Liver"]);
        assert_eq!(editor.len(), 2);
        assert_ne!(editor.items()[0].id, editor.items()[1].id);
    }

    #[test]
    fn ids_are_not_reused_after_remove() {
        let mut editor = editor_with(&["Liver"]);
        let first = editor.items()[0].id;
        editor.remove_item(first);

        editor.set_draft_name("Olives");
        editor.add_item();
        assert_ne!(editor.items()[0].id, first);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut editor = editor_with(&["Liver", "Olives"]);
        let id = editor.items()[0].id;

        assert_eq!(editor.remove_item(id), vec![EditorEvent::ItemRemoved(id)]);
        let after_first = editor.clone();
        assert!(editor.remove_item(id).is_empty());
        assert_eq!(editor, after_first);
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn removing_edited_item_closes_session() {
        let mut editor = editor_with(&["Liver"]);
        let id = editor.items()[0].id;
        editor.start_edit(id);

        let events = editor.remove_item(id);
        assert_eq!(
            events,
            vec![EditorEvent::ItemRemoved(id), EditorEvent::EditDiscarded(id)]
        );
        assert!(editor.editing().is_none());
    }

    #[test]
    fn start_edit_seeds_session_from_item() {
        let mut editor = ListEditor::<DislikedFood>::new();
        editor.set_draft_field(DislikedField::Severity(DislikeSeverity::Strong));
        editor.set_draft_name("Liver");
        editor.add_item();
        let id = editor.items()[0].id;

        assert_eq!(editor.start_edit(id), vec![EditorEvent::EditStarted(id)]);
        let session = editor.editing().expect("session should be open");
        assert_eq!(session.id, id);
        assert_eq!(session.draft.name, "Liver");
        assert_eq!(session.draft.attributes.severity, DislikeSeverity::Strong);
    }

    #[test]
    fn start_edit_unknown_id_keeps_current_session() {
        let mut editor = editor_with(&["Liver"]);
        let id = editor.items()[0].id;
        editor.start_edit(id);

        assert!(editor.start_edit(ItemId::new(99)).is_empty());
        assert!(editor.is_editing(id));
    }

    #[test]
    fn second_start_edit_discards_first_session() {
        let mut editor = editor_with(&["Liver", "Olives"]);
        let first = editor.items()[0].id;
        let second = editor.items()[1].id;

        editor.start_edit(first);
        editor.update_edit_name("Changed");
        let events = editor.start_edit(second);

        assert_eq!(
            events,
            vec![
                EditorEvent::EditDiscarded(first),
                EditorEvent::EditStarted(second)
            ]
        );
        assert!(editor.is_editing(second));
        assert_eq!(editor.items()[0].name, "Liver");
    }

    #[test]
    fn edit_updates_without_session_are_noops() {
        let mut editor = editor_with(&["Liver"]);
        let before = editor.clone();
        editor.update_edit_name("Changed");
        editor.update_edit_field(DislikedField::Severity(DislikeSeverity::Absolute));
        assert!(editor.commit_edit().is_empty());
        assert!(editor.cancel_edit().is_empty());
        assert_eq!(editor, before);
    }

    #[test]
    fn commit_preserves_id_and_position() {
        let mut editor = editor_with(&["Liver", "Olives", "Tripe"]);
        let id = editor.items()[1].id;

        editor.start_edit(id);
        editor.update_edit_name("  Green olives ");
        editor.update_edit_field(DislikedField::Severity(DislikeSeverity::Absolute));
        assert_eq!(editor.commit_edit(), vec![EditorEvent::EditCommitted(id)]);

        assert_eq!(editor.position(id), Some(1));
        let item = &editor.items()[1];
        assert_eq!(item.id, id);
        assert_eq!(item.name, "Green olives");
        assert_eq!(item.attributes.severity, DislikeSeverity::Absolute);
        assert!(editor.editing().is_none());
    }

    #[test]
    fn blank_commit_keeps_session_open_and_item_unchanged() {
        let mut editor = editor_with(&["Liver"]);
        let id = editor.items()[0].id;
        editor.start_edit(id);
        editor.update_edit_name("   ");
        let before = editor.clone();

        assert!(editor.commit_edit().is_empty());
        assert_eq!(editor, before);
        assert!(editor.is_editing(id));
        assert_eq!(editor.items()[0].name, "Liver");
    }

    #[test]
    fn cancel_discards_draft_and_leaves_item_identical() {
        let mut editor = editor_with(&["Liver"]);
        let id = editor.items()[0].id;
        let original = editor.items()[0].clone();

        editor.start_edit(id);
        editor.update_edit_name("");
        editor.update_edit_field(DislikedField::Severity(DislikeSeverity::Absolute));
        assert_eq!(editor.cancel_edit(), vec![EditorEvent::EditCancelled(id)]);

        assert_eq!(editor.items()[0], original);
        assert!(editor.editing().is_none());
    }

    #[test]
    fn preset_add_is_noop_for_kinds_without_catalog() {
        let mut editor = ListEditor::<DislikedFood>::new();
        assert!(editor.preset_add("Nuts").is_empty());
        assert!(editor.is_empty());
    }

    #[test]
    fn dispatch_routes_commands() {
        let mut editor = ListEditor::<DislikedFood>::new();
        editor.dispatch(EditorCommand::SetDraftName("Liver".to_owned()));
        editor.dispatch(EditorCommand::SetDraftField(DislikedField::Severity(
            DislikeSeverity::Strong,
        )));
        let added = editor.dispatch(EditorCommand::Add);
        let id = editor.items()[0].id;
        assert_eq!(added, vec![EditorEvent::ItemAdded(id)]);

        editor.dispatch(EditorCommand::StartEdit(id));
        editor.dispatch(EditorCommand::SetEditName("Beef liver".to_owned()));
        let committed = editor.dispatch(EditorCommand::CommitEdit);
        assert_eq!(committed, vec![EditorEvent::EditCommitted(id)]);
        assert_eq!(editor.items()[0].name, "Beef liver");

        let removed = editor.dispatch(EditorCommand::Remove(id));
        assert_eq!(removed, vec![EditorEvent::ItemRemoved(id)]);
        assert!(editor.is_empty());
    }

    #[test]
    fn ungrouped_kind_displays_in_insertion_order() {
        let editor = editor_with(&["Liver", "Olives", "Tripe"]);
        let expected: Vec<ItemId> = editor.items().iter().map(|item| item.id).collect();
        assert_eq!(editor.display_order(), expected);
        assert_eq!(editor.grouped().len(), 1);
    }

    #[test]
    fn grouping_is_generic_over_kind_buckets() {
        let mut favorites = ListEditor::<FavoriteFood>::new();
        for (name, category) in [
            ("Popcorn", FoodCategory::Snacks),
            ("Soup", FoodCategory::Dinner),
            ("Toast", FoodCategory::Breakfast),
        ] {
            favorites.set_draft_field(FavoriteField::Category(category));
            favorites.set_draft_name(name);
            favorites.add_item();
        }
        assert_eq!(
            bucket_order(&favorites),
            vec![
                FoodCategory::Breakfast,
                FoodCategory::Dinner,
                FoodCategory::Snacks
            ]
        );

        assert_eq!(bucket_order(&editor_with(&["Liver"])), vec![()]);
        assert!(bucket_order(&ListEditor::<DislikedFood>::new()).is_empty());
    }
}
