//! Chart of accounts model
//!
//! A named account plan of an economic group. Accounts hang off one chart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::economic_group::default_true;
use super::ids::{ChartId, EconomicGroupId};
use super::resource::{clean_optional, Resource, Validator};
use crate::audit::EntityType;
use crate::error::FieldErrors;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOfAccounts {
    pub id: ChartId,
    pub economic_group_id: EconomicGroupId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInput {
    pub economic_group_id: EconomicGroupId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for ChartOfAccounts {
    type Id = ChartId;
    type Input = ChartInput;

    const PATH: &'static str = "charts-of-accounts";
    const LABEL: &'static str = "Chart of accounts";
    const ENTITY: EntityType = EntityType::ChartOfAccounts;
    const SOFT_DELETE: bool = true;
    const FACETS: &'static [&'static str] = &["economicGroupId", "isActive"];

    fn id(&self) -> Self::Id {
        self.id
    }

    fn new_id() -> Self::Id {
        ChartId::new()
    }

    fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self {
        let mut chart = Self {
            id,
            economic_group_id: input.economic_group_id,
            code: String::new(),
            name: String::new(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        chart.apply(input, now);
        chart
    }

    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>) {
        self.economic_group_id = input.economic_group_id;
        self.code = input.code.trim().to_uppercase();
        self.name = input.name.trim().to_string();
        self.description = clean_optional(input.description);
        self.is_active = input.is_active;
        self.updated_at = now;
    }

    fn to_input(&self) -> Self::Input {
        ChartInput {
            economic_group_id: self.economic_group_id,
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
            "economicGroupId" => Some(self.economic_group_id.to_string()),
            "isActive" => Some(self.is_active.to_string()),
            _ => None,
        }
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some((
            "code",
            format!("{}|{}", self.economic_group_id, self.code.to_lowercase()),
        ))
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}
