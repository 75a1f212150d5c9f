//! Review configuration.
//!
//! ```toml
//! date_format = "%d %b %Y"
//! report_cleared_fields = false
//!
//! [suppress_defaults.spouse]
//! is_alive = true
//! is_active_marriage = true
//! ```
//!
//! Every key is optional. A `[suppress_defaults.<entity>]` table replaces
//! the built-in rules for that entity only; an empty table removes them.

use crate::diff::compare::DEFAULT_DATE_FORMAT;
use crate::errors::{BremsError, Result};
use crate::model::FieldValue;
use crate::policy::{DefaultValueSuppression, EntityKind};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable naming a config file for the CLI.
pub const CONFIG_ENV_VAR: &str = "BREMS_REVIEW_CONFIG";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    date_format: Option<String>,
    report_cleared_fields: Option<bool>,
    suppress_defaults: BTreeMap<String, BTreeMap<String, Value>>,
}

/// Validated review configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewConfig {
    /// chrono strftime pattern for date fields
    pub date_format: String,
    /// Show rows for proposed clears
    pub report_cleared_fields: bool,
    /// Suppress-if-default rules per family member kind
    pub suppress_defaults: BTreeMap<EntityKind, BTreeMap<String, FieldValue>>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        let suppress_defaults = EntityKind::ALL
            .into_iter()
            .map(|entity| {
                let mut rules = BTreeMap::new();
                rules.insert("is_alive".to_string(), FieldValue::Bool(true));
                (entity, rules)
            })
            .collect();
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            report_cleared_fields: false,
            suppress_defaults,
        }
    }
}

impl ReviewConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// - `ConfigParse` when the document is not TOML or has unknown keys
    /// - `UnknownEntity` for a `suppress_defaults` table not naming a family member
    /// - `InvalidDateFormat` when `date_format` is not a valid strftime pattern
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text).map_err(|e| BremsError::ConfigParse {
            message: e.to_string(),
        })?;

        let mut config = ReviewConfig::default();
        if let Some(format) = raw.date_format {
            config.date_format = format;
        }
        if let Some(report) = raw.report_cleared_fields {
            config.report_cleared_fields = report;
        }
        for (entity, rules) in raw.suppress_defaults {
            let entity: EntityKind = entity.parse()?;
            let rules = rules
                .into_iter()
                .map(|(key, value)| (key, FieldValue::from(value)))
                .collect();
            config.suppress_defaults.insert(entity, rules);
        }

        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// `ConfigRead` when the file cannot be read, otherwise as
    /// [`ReviewConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BremsError::ConfigRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            date_format = %config.date_format,
            report_cleared_fields = config.report_cleared_fields,
            "review config loaded"
        );
        Ok(config)
    }

    /// Check settings that TOML parsing alone cannot.
    ///
    /// # Errors
    ///
    /// `InvalidDateFormat` when `date_format` is empty or not a valid strftime pattern.
    pub fn validate(&self) -> Result<()> {
        validate_date_format(&self.date_format)
    }

    /// Suppression policy described by this configuration.
    pub fn suppression_policy(&self) -> DefaultValueSuppression {
        self.suppress_defaults
            .iter()
            .fold(DefaultValueSuppression::empty(), |policy, (entity, rules)| {
                policy.with_entity_defaults(*entity, rules.clone())
            })
            .with_report_cleared(self.report_cleared_fields)
    }
}

/// Reject empty patterns and patterns chrono cannot render.
///
/// # Errors
///
/// `InvalidDateFormat` naming the rejected pattern.
pub fn validate_date_format(format: &str) -> Result<()> {
    let invalid = format.trim().is_empty()
        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
    if invalid {
        return Err(BremsError::InvalidDateFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}
