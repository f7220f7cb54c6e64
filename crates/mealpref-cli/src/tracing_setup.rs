// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

pub fn init_tracing(config: &TracingConfig) -> Result<bool> {
    let Some(path) = &config.file else {
        return Ok(false);
    };

    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(&config.level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(true)
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- pass --log with a writable path or unset [log].file",
                path.display()
            )
        })
}
