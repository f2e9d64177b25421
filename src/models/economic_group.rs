//! Economic group model
//!
//! The top-level tenant: companies, charts of accounts, exchange rates and
//! accounting periods all belong to one economic group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::EconomicGroupId;
use super::resource::{clean_optional, Resource, Validator};
use crate::audit::EntityType;
use crate::error::FieldErrors;

/// An economic group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicGroup {
    pub id: EconomicGroupId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update body for an economic group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicGroupInput {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

pub(crate) fn default_true() -> bool {
    true
}

impl EconomicGroupInput {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            is_active: true,
        }
    }
}

impl Resource for EconomicGroup {
    type Id = EconomicGroupId;
    type Input = EconomicGroupInput;

    const PATH: &'static str = "economic-groups";
    const LABEL: &'static str = "Economic group";
    const ENTITY: EntityType = EntityType::EconomicGroup;
    const SOFT_DELETE: bool = true;
    const FACETS: &'static [&'static str] = &["isActive"];

    fn id(&self) -> Self::Id {
        self.id
    }

    fn new_id() -> Self::Id {
        EconomicGroupId::new()
    }

    fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self {
        let mut group = Self {
            id,
            code: String::new(),
            name: String::new(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        group.apply(input, now);
        group
    }

    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>) {
        self.code = input.code.trim().to_uppercase();
        self.name = input.name.trim().to_string();
        self.description = clean_optional(input.description);
        self.is_active = input.is_active;
        self.updated_at = now;
    }

    fn to_input(&self) -> Self::Input {
        EconomicGroupInput {
            code: self.code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            is_active: self.is_active,
        }
    }

    fn validate(input: &Self::Input) -> FieldErrors {
        let mut v = Validator::new();
        v.required("code", &input.code, 20)
            .required("name", &input.name, 150)
            .optional("description", input.description.as_deref(), 500);
        v.finish()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn lookup_key(&self) -> String {
        self.code.clone()
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.code.clone(), self.name.clone()]
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            "isActive" => Some(self.is_active.to_string()),
            _ => None,
        }
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some(("code", self.code.to_lowercase()))
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_normalizes_fields() {
        let mut input = EconomicGroupInput::new(" hold ", "  Holding Andina ");
        input.description = Some("   ".into());
        let group = EconomicGroup::build(EconomicGroupId::new(), input, Utc::now());

        assert_eq!(group.code, "HOLD");
        assert_eq!(group.name, "Holding Andina");
        assert!(group.description.is_none());
        assert!(group.is_active);
    }

    #[test]
    fn test_validate_requires_code_and_name() {
        let errors = EconomicGroup::validate(&EconomicGroupInput::new("", ""));
        assert!(errors.contains_key("code"));
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let group = EconomicGroup::build(
            EconomicGroupId::new(),
            EconomicGroupInput::new("HOLD", "Holding"),
            Utc::now(),
        );
        let json = serde_json::to_value(&group).unwrap();
        assert!(json.get("isActive").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_input_defaults_active() {
        let input: EconomicGroupInput =
            serde_json::from_str(r#"{"code":"HOLD","name":"Holding"}"#).unwrap();
        assert!(input.is_active);
    }
}
