//! User-company permission model
//!
//! Grants a user a role inside one company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CompanyId, PermissionId};
use super::resource::{Resource, Validator};
use crate::audit::EntityType;
use crate::error::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionRole {
    Admin,
    Accountant,
    Viewer,
}

impl PermissionRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "accountant" => Some(Self::Accountant),
            "viewer" | "read" | "readonly" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Whether the role may change accounting data
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Admin | Self::Accountant)
    }
}

impl fmt::Display for PermissionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Accountant => write!(f, "ACCOUNTANT"),
            Self::Viewer => write!(f, "VIEWER"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCompanyPermission {
    pub id: PermissionId,
    pub user_id: String,
    pub company_id: CompanyId,
    pub role: PermissionRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionInput {
    pub user_id: String,
    pub company_id: CompanyId,
    pub role: PermissionRole,
}

impl Resource for UserCompanyPermission {
    type Id = PermissionId;
    type Input = PermissionInput;

    const PATH: &'static str = "user-company-permissions";
    const LABEL: &'static str = "Permission";
    const ENTITY: EntityType = EntityType::Permission;
    const FACETS: &'static [&'static str] = &["userId", "companyId", "role"];

    fn id(&self) -> Self::Id {
        self.id
    }

    fn new_id() -> Self::Id {
        PermissionId::new()
    }

    fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self {
        let mut permission = Self {
            id,
            user_id: String::new(),
            company_id: input.company_id,
            role: input.role,
            created_at: now,
            updated_at: now,
        };
        permission.apply(input, now);
        permission
    }

    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>) {
        self.user_id = input.user_id.trim().to_string();
        self.company_id = input.company_id;
        self.role = input.role;
        self.updated_at = now;
    }

    fn to_input(&self) -> Self::Input {
        PermissionInput {
            user_id: self.user_id.clone(),
            company_id: self.company_id,
            role: self.role,
        }
    }

    fn validate(input: &Self::Input) -> FieldErrors {
        let mut v = Validator::new();
        v.required("userId", &input.user_id, 100);
        v.finish()
    }

    fn display_name(&self) -> String {
        format!("{} as {}", self.user_id, self.role)
    }

    fn lookup_key(&self) -> String {
        format!("{}@{}", self.user_id, self.company_id.short())
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.user_id.clone(), self.role.to_string()]
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            "userId" => Some(self.user_id.clone()),
            "companyId" => Some(self.company_id.to_string()),
            "role" => Some(self.role.to_string()),
            _ => None,
        }
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some((
            "userId",
            format!("{}|{}", self.user_id.to_lowercase(), self.company_id),
        ))
    }
}
