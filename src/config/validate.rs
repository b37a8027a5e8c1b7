// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SpinguardError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SpinguardError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.step))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_steps(cfg)?;
    validate_global_config(cfg)?;
    validate_steps(cfg)?;
    Ok(())
}

fn ensure_has_steps(cfg: &RawConfigFile) -> Result<()> {
    if cfg.step.is_empty() {
        return Err(SpinguardError::ConfigError(
            "config must contain at least one [[step]] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.poll_interval_ms == 0 {
        return Err(SpinguardError::ConfigError(
            "[config].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if let Some(frames) = &cfg.config.frames {
        if frames.is_empty() {
            return Err(SpinguardError::ConfigError(
                "[config].frames must not be empty".to_string(),
            ));
        }
        if let Some(idx) = frames.iter().position(|f| f.is_empty()) {
            return Err(SpinguardError::ConfigError(format!(
                "[config].frames[{idx}] must not be an empty string"
            )));
        }
    }

    Ok(())
}

fn validate_steps(cfg: &RawConfigFile) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for (idx, step) in cfg.step.iter().enumerate() {
        let name = step.name.trim();
        if name.is_empty() {
            return Err(SpinguardError::ConfigError(format!(
                "step #{} has an empty `name`",
                idx + 1
            )));
        }
        if step.cmd.trim().is_empty() {
            return Err(SpinguardError::ConfigError(format!(
                "step '{}' has an empty `cmd`",
                name
            )));
        }
        if !seen.insert(name) {
            return Err(SpinguardError::ConfigError(format!(
                "duplicate step name '{}'",
                name
            )));
        }
    }

    Ok(())
}
