// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use mealpref_app::PreferencesPayload;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct FileRuntime {
    output: Option<PathBuf>,
    last_payload: Option<String>,
    saves: usize,
    cancels: usize,
}

impl FileRuntime {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self {
            output,
            ..Self::default()
        }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn last_payload(&self) -> Option<&str> {
        self.last_payload.as_deref()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn cancels(&self) -> usize {
        self.cancels
    }
}

impl mealpref_tui::AppRuntime for FileRuntime {
    fn submit_preferences(&mut self, payload: &PreferencesPayload) -> Result<()> {
        payload.validate()?;
        let json = serde_json::to_string_pretty(payload).context("encode preferences")?;

        if let Some(path) = &self.output {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create output directory {}", parent.display()))?;
            }
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("write preferences to {}", path.display()))?;
            info!(path = %path.display(), items = payload.item_count(), "preferences written");
        } else {
            debug!(items = payload.item_count(), "preferences kept for stdout");
        }

        self.last_payload = Some(json);
        self.saves += 1;
        Ok(())
    }

    fn cancel_preferences(&mut self) -> Result<()> {
        self.cancels += 1;
        info!(cancels = self.cancels, "preference edits cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FileRuntime;
    use anyhow::Result;
    use mealpref_app::{EditorCommand, FormCommand, ProfileForm};
    use mealpref_testkit::{demo_form, sample_profile, temp_output_path};
    use mealpref_tui::AppRuntime;

    #[test]
    fn submit_writes_camel_case_json() -> Result<()> {
        let (_dir, path) = temp_output_path()?;
        let mut runtime = FileRuntime::new(Some(path.clone()));
        let form = demo_form();

        runtime.submit_preferences(&form.payload())?;

        let written = std::fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&written)?;
        assert_eq!(
            value["favoriteFoods"].as_array().map(Vec::len),
            Some(form.favorites.len())
        );
        assert_eq!(
            value["dislikedFoods"].as_array().map(Vec::len),
            Some(form.disliked.len())
        );
        assert_eq!(
            value["allergies"].as_array().map(Vec::len),
            Some(form.allergies.len())
        );
        assert_eq!(
            value["instructions"].as_str(),
            Some(form.instructions.text())
        );
        assert!(value["allergies"][0].get("isCommon").is_some());
        assert_eq!(runtime.saves(), 1);
        Ok(())
    }

    #[test]
    fn submit_creates_missing_parent_directories() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested/deeper/preferences.json");
        let mut runtime = FileRuntime::new(Some(path.clone()));

        runtime.submit_preferences(&ProfileForm::new(sample_profile()).payload())?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn submit_without_output_keeps_latest_payload() -> Result<()> {
        let mut runtime = FileRuntime::new(None);
        let mut form = ProfileForm::new(sample_profile());
        runtime.submit_preferences(&form.payload())?;

        form.dispatch(FormCommand::Favorites(EditorCommand::SetDraftName(
            "Pancakes".to_owned(),
        )));
        form.dispatch(FormCommand::Favorites(EditorCommand::Add));
        runtime.submit_preferences(&form.payload())?;

        let last = runtime.last_payload().expect("payload kept");
        assert!(last.contains("Pancakes"));
        assert_eq!(runtime.saves(), 2);
        assert_eq!(runtime.output(), None);
        Ok(())
    }

    #[test]
    fn invalid_payload_is_not_written() -> Result<()> {
        let (_dir, path) = temp_output_path()?;
        let mut runtime = FileRuntime::new(Some(path.clone()));
        let mut payload = demo_form().payload();
        payload.instructions = "x".repeat(501);

        let error = runtime
            .submit_preferences(&payload)
            .expect_err("oversized instructions should fail");
        assert!(error.to_string().contains("500"));
        assert!(!path.exists());
        assert_eq!(runtime.saves(), 0);
        assert_eq!(runtime.last_payload(), None);
        Ok(())
    }

    #[test]
    fn cancel_is_counted() -> Result<()> {
        let mut runtime = FileRuntime::new(None);
        runtime.cancel_preferences()?;
        runtime.cancel_preferences()?;
        assert_eq!(runtime.cancels(), 2);
        assert_eq!(runtime.saves(), 0);
        Ok(())
    }
}
