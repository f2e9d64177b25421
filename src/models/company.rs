//! Company model
//!
//! A legal entity inside an economic group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::economic_group::default_true;
use super::ids::{CompanyId, EconomicGroupId};
use super::resource::{clean_optional, is_currency_code, Resource, Validator};
use crate::audit::EntityType;
use crate::error::FieldErrors;

/// A company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub economic_group_id: EconomicGroupId,
    pub code: String,
    pub legal_name: String,
    #[serde(default)]
    pub trade_name: Option<String>,
    pub tax_id: String,
    /// ISO code of the functional currency
    #[serde(default)]
    pub base_currency: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update body for a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    pub economic_group_id: EconomicGroupId,
    pub code: String,
    pub legal_name: String,
    #[serde(default)]
    pub trade_name: Option<String>,
    pub tax_id: String,
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for Company {
    type Id = CompanyId;
    type Input = CompanyInput;

    const PATH: &'static str = "companies";
    const LABEL: &'static str = "Company";
    const ENTITY: EntityType = EntityType::Company;
    const SOFT_DELETE: bool = true;
    const FACETS: &'static [&'static str] = &["economicGroupId", "isActive", "baseCurrency"];

    fn id(&self) -> Self::Id {
        self.id
    }

    fn new_id() -> Self::Id {
        CompanyId::new()
    }

    fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self {
        let mut company = Self {
            id,
            economic_group_id: input.economic_group_id,
            code: String::new(),
            legal_name: String::new(),
            trade_name: None,
            tax_id: String::new(),
            base_currency: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        company.apply(input, now);
        company
    }

    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>) {
        self.economic_group_id = input.economic_group_id;
        self.code = input.code.trim().to_uppercase();
        self.legal_name = input.legal_name.trim().to_string();
        self.trade_name = clean_optional(input.trade_name);
        self.tax_id = input.tax_id.trim().to_string();
        self.base_currency = clean_optional(input.base_currency).map(|c| c.to_uppercase());
        self.is_active = input.is_active;
        self.updated_at = now;
    }

    fn to_input(&self) -> Self::Input {
        CompanyInput {
            economic_group_id: self.economic_group_id,
            code: self.code.clone(),
            legal_name: self.legal_name.clone(),
            trade_name: self.trade_name.clone(),
            tax_id: self.tax_id.clone(),
            base_currency: self.base_currency.clone(),
            is_active: self.is_active,
        }
    }

    fn validate(input: &Self::Input) -> FieldErrors {
        let mut v = Validator::new();
        v.required("code", &input.code, 20)
            .required("legalName", &input.legal_name, 200)
            .optional("tradeName", input.trade_name.as_deref(), 200)
            .required("taxId", &input.tax_id, 30);
        if let Some(currency) = input.base_currency.as_deref().map(str::trim) {
            v.check(
                "baseCurrency",
                currency.is_empty() || is_currency_code(currency),
                "must be a 3-letter currency code",
            );
        }
        v.finish()
    }

    fn display_name(&self) -> String {
        self.trade_name
            .clone()
            .unwrap_or_else(|| self.legal_name.clone())
    }

    fn lookup_key(&self) -> String {
        self.code.clone()
    }

    fn search_text(&self) -> Vec<String> {
        let mut text = vec![
            self.code.clone(),
            self.legal_name.clone(),
            self.tax_id.clone(),
        ];
        text.extend(self.trade_name.clone());
        text
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            "economicGroupId" => Some(self.economic_group_id.to_string()),
            "isActive" => Some(self.is_active.to_string()),
            "baseCurrency" => self.base_currency.clone(),
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
