//! The `Resource` trait ties an entity model to its REST resource
//!
//! Every entity the API exposes implements `Resource`: it names its path
//! segment, its create/update input, how it is validated, searched, faceted
//! and sorted, and which lifecycle rules guard its mutations. The API client,
//! the services, the controllers and the local backend are all generic over it.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::audit::EntityType;
use crate::error::FieldErrors;

/// A business rule refused a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule: &'static str,
    pub message: String,
}

impl RuleViolation {
    pub fn new(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.rule)
    }
}

/// Who performs an action endpoint call, and when
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub user_id: Option<String>,
    pub now: DateTime<Utc>,
}

impl ActionContext {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id,
            now: Utc::now(),
        }
    }
}

/// An entity exposed as a REST resource
pub trait Resource:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Typed identifier
    type Id: Copy
        + Eq
        + Hash
        + fmt::Debug
        + fmt::Display
        + FromStr<Err = uuid::Error>
        + Serialize
        + DeserializeOwned
        + Send
        + Sync;

    /// Body of create and update requests
    type Input: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync;

    /// Path segment under `/api/`
    const PATH: &'static str;

    /// Human-readable entity name
    const LABEL: &'static str;

    /// Audit entity type
    const ENTITY: EntityType;

    /// Whether DELETE deactivates instead of removing
    const SOFT_DELETE: bool = false;

    /// Exact-match list filters this resource understands
    const FACETS: &'static [&'static str] = &[];

    fn id(&self) -> Self::Id;

    fn new_id() -> Self::Id;

    /// Build a fresh entity from a validated input
    fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self;

    /// Replace the editable fields with a validated input
    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>);

    /// The input that would recreate the editable state of this entity
    fn to_input(&self) -> Self::Input;

    /// Required fields, lengths and ranges; empty means valid
    fn validate(input: &Self::Input) -> FieldErrors;

    fn display_name(&self) -> String;

    /// Business key users type to refer to the entity (code, label)
    fn lookup_key(&self) -> String;

    /// Values matched by free-text search
    fn search_text(&self) -> Vec<String>;

    /// Value of a facet field, rendered as a string
    fn facet(&self, key: &str) -> Option<String>;

    fn sort_key(&self) -> String {
        self.lookup_key().to_lowercase()
    }

    /// Field name and normalized value that must be unique across the collection
    fn unique_key(&self) -> Option<(&'static str, String)> {
        None
    }

    fn is_active(&self) -> bool {
        true
    }

    /// Soft delete; only called when `SOFT_DELETE` is set
    fn deactivate(&mut self, _now: DateTime<Utc>) {}

    fn guard_update(&self) -> Result<(), RuleViolation> {
        Ok(())
    }

    fn guard_delete(&self) -> Result<(), RuleViolation> {
        Ok(())
    }

    /// Run an action endpoint (`POST /api/<path>/:id/<action>`)
    ///
    /// `None` means the resource has no such action.
    fn perform(
        &mut self,
        _action: &str,
        _ctx: &ActionContext,
    ) -> Option<Result<(), RuleViolation>> {
        None
    }

    /// Whether the search needle matches any searchable value
    fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_text()
                .iter()
                .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// Small builder collecting per-field validation messages
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-blank value no longer than `max` characters
    pub fn required(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add(field, "is required");
        } else if trimmed.chars().count() > max {
            self.add(field, format!("must be at most {} characters", max));
        }
        self
    }

    /// Limit the length of an optional value
    pub fn optional(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(value) = value {
            if value.trim().chars().count() > max {
                self.add(field, format!("must be at most {} characters", max));
            }
        }
        self
    }

    /// Record `message` for `field` unless `ok` holds
    pub fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.add(field, message);
        }
        self
    }

    /// Whether the field already has an error
    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    fn add(&mut self, field: &str, message: impl Into<String>) {
        // First message per field wins
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}

/// Normalize an optional free-text value: trim, and drop it when blank
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// True for three ASCII letters, e.g. `USD`
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}
