//! Row suppression policy
//!
//! This module defines the `SuppressionPolicy` trait, which decides whether a
//! detected difference is worth showing to a reviewer. Two rules live here
//! rather than in the comparators:
//!
//! - **Clears**: a field whose proposed value is absent. Not reported unless
//!   the policy opts in.
//! - **Default flags**: a family-member field going from absent to its form
//!   default (e.g. `is_alive` = `true`). The edit form pre-fills these, so
//!   they are noise rather than a change.

use crate::errors::BremsError;
use crate::model::FieldValue;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Kind of family member a nested row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Father,
    Mother,
    Spouse,
    Child,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Father,
        EntityKind::Mother,
        EntityKind::Spouse,
        EntityKind::Child,
    ];

    /// Config and `relation` name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Father => "father",
            EntityKind::Mother => "mother",
            EntityKind::Spouse => "spouse",
            EntityKind::Child => "child",
        }
    }

    /// Row label prefix; list members carry their 1-based position.
    pub fn prefix(&self, index: Option<usize>) -> String {
        let base = match self {
            EntityKind::Father => "Father",
            EntityKind::Mother => "Mother",
            EntityKind::Spouse => "Spouse",
            EntityKind::Child => "Child",
        };
        match index {
            Some(i) => format!("{} {}", base, i + 1),
            None => base.to_string(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = BremsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "father" => Ok(EntityKind::Father),
            "mother" => Ok(EntityKind::Mother),
            "spouse" => Ok(EntityKind::Spouse),
            "child" => Ok(EntityKind::Child),
            other => Err(BremsError::UnknownEntity {
                entity: other.to_string(),
            }),
        }
    }
}

/// Policy trait for deciding which differences become review rows
///
/// Injected into the [`ChangeSetBuilder`](crate::diff::ChangeSetBuilder).
/// Implementations must be `Send + Sync`: one builder may serve many threads.
pub trait SuppressionPolicy: Send + Sync {
    /// Whether a difference on a family member's field is hidden
    ///
    /// # Arguments
    /// * `entity` - which family member the field belongs to
    /// * `key` - raw field key
    /// * `previous` - current value
    /// * `proposed` - proposed value
    fn suppress_nested(
        &self,
        entity: EntityKind,
        key: &str,
        previous: &FieldValue,
        proposed: &FieldValue,
    ) -> bool;

    /// Whether a proposed clear (non-absent → absent) produces a row
    fn report_cleared_fields(&self) -> bool {
        false
    }
}

/// Policy that shows every difference, clears included
///
/// # Example
/// ```
/// use brems_core::policy::{EntityKind, NeverSuppress, SuppressionPolicy};
/// use brems_core::model::FieldValue;
///
/// let policy = NeverSuppress;
/// assert!(!policy.suppress_nested(
///     EntityKind::Father,
///     "is_alive",
///     &FieldValue::Absent,
///     &FieldValue::Bool(true),
/// ));
/// assert!(policy.report_cleared_fields());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSuppress;

impl SuppressionPolicy for NeverSuppress {
    fn suppress_nested(&self, _: EntityKind, _: &str, _: &FieldValue, _: &FieldValue) -> bool {
        false
    }

    fn report_cleared_fields(&self) -> bool {
        true
    }
}

/// Policy that hides configured "absent → default" transitions per entity
///
/// A rule `(entity, key) = value` hides a row when the current value is
/// absent and the proposed value equals `value`. Any other transition on
/// the same key (e.g. `true` → `false`) is still shown.
///
/// # Example
/// ```
/// use brems_core::policy::{DefaultValueSuppression, EntityKind, SuppressionPolicy};
/// use brems_core::model::FieldValue;
///
/// let policy = DefaultValueSuppression::default();
/// assert!(policy.suppress_nested(
///     EntityKind::Mother,
///     "is_alive",
///     &FieldValue::Absent,
///     &FieldValue::Bool(true),
/// ));
/// assert!(!policy.suppress_nested(
///     EntityKind::Mother,
///     "is_alive",
///     &FieldValue::Bool(true),
///     &FieldValue::Bool(false),
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct DefaultValueSuppression {
    defaults: HashMap<EntityKind, BTreeMap<String, FieldValue>>,
    report_cleared: bool,
}

impl DefaultValueSuppression {
    /// Create a policy with no rules and clears hidden
    pub fn empty() -> Self {
        Self {
            defaults: HashMap::new(),
            report_cleared: false,
        }
    }

    /// Replace the rules for one entity
    pub fn with_entity_defaults(
        mut self,
        entity: EntityKind,
        defaults: BTreeMap<String, FieldValue>,
    ) -> Self {
        self.defaults.insert(entity, defaults);
        self
    }

    /// Add a single rule
    pub fn with_default(
        mut self,
        entity: EntityKind,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.defaults
            .entry(entity)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    pub fn with_report_cleared(mut self, report_cleared: bool) -> Self {
        self.report_cleared = report_cleared;
        self
    }

    /// Configured default for `key` on `entity`, if any
    pub fn default_for(&self, entity: EntityKind, key: &str) -> Option<&FieldValue> {
        self.defaults.get(&entity).and_then(|rules| rules.get(key))
    }
}

impl Default for DefaultValueSuppression {
    /// `is_alive` = `true` for every family member
    fn default() -> Self {
        EntityKind::ALL
            .into_iter()
            .fold(Self::empty(), |policy, entity| {
                policy.with_default(entity, "is_alive", true)
            })
    }
}

impl SuppressionPolicy for DefaultValueSuppression {
    fn suppress_nested(
        &self,
        entity: EntityKind,
        key: &str,
        previous: &FieldValue,
        proposed: &FieldValue,
    ) -> bool {
        previous.is_absent() && self.default_for(entity, key) == Some(proposed)
    }

    fn report_cleared_fields(&self) -> bool {
        self.report_cleared
    }
}
