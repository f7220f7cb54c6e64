// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::info;

use crate::{AppMode, FormCommand, FormEvent, Panel, Profile, ProfileForm};

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub mode: AppMode,
    pub focus: Panel,
    pub form: ProfileForm,
    pub baseline: ProfileForm,
    pub status_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    NextPanel,
    PrevPanel,
    FocusPanel(Panel),
    EnterInput,
    ExitToNav,
    Form(FormCommand),
    MarkSaved,
    Revert,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    PanelChanged(Panel),
    Form(FormEvent),
    Saved,
    Reverted,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn new(profile: Profile) -> Self {
        Self::with_form(ProfileForm::new(profile))
    }

    pub fn with_form(form: ProfileForm) -> Self {
        let baseline = form.snapshot();
        Self {
            mode: AppMode::Nav,
            focus: Panel::FavoriteFoods,
            form,
            baseline,
            status_line: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.form.differs_from(&self.baseline)
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextPanel => self.rotate_panel(1),
            AppCommand::PrevPanel => self.rotate_panel(-1),
            AppCommand::FocusPanel(panel) => {
                if self.focus == panel {
                    return Vec::new();
                }
                self.focus = panel;
                vec![AppEvent::PanelChanged(panel)]
            }
            AppCommand::EnterInput => {
                self.mode = AppMode::Input;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::Form(command) => self
                .form
                .dispatch(command)
                .into_iter()
                .map(AppEvent::Form)
                .collect(),
            AppCommand::MarkSaved => {
                self.baseline = self.form.snapshot();
                info!(
                    items = self.baseline.payload().item_count(),
                    "preferences saved"
                );
                vec![AppEvent::Saved, self.set_status("preferences saved")]
            }
            AppCommand::Revert => {
                self.form.revert_to(&self.baseline);
                self.mode = AppMode::Nav;
                info!("unsaved changes discarded");
                vec![
                    AppEvent::Reverted,
                    AppEvent::ModeChanged(self.mode),
                    self.set_status("changes discarded"),
                ]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_panel(&mut self, delta: isize) -> Vec<AppEvent> {
        let panels = Panel::ALL;
        let current = panels
            .iter()
            .position(|panel| *panel == self.focus)
            .unwrap_or(0) as isize;
        let len = panels.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.focus = panels[next];
        vec![AppEvent::PanelChanged(self.focus)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
