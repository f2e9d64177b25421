//! Ledger account model
//!
//! Accounts belong to a chart of accounts and form a hierarchy through
//! `parentId`. Only postable (leaf) accounts receive journal lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::economic_group::default_true;
use super::ids::{AccountId, ChartId};
use super::resource::{Resource, Validator};
use crate::audit::EntityType;
use crate::error::FieldErrors;

/// Classification of a ledger account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

/// Side on which an account's balance normally sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Nature {
    Debit,
    Credit,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "assets" => Some(Self::Asset),
            "liability" | "liabilities" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" | "income" => Some(Self::Revenue),
            "expense" | "expenses" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Normal balance side in double-entry bookkeeping
    pub fn nature(&self) -> Nature {
        match self {
            Self::Asset | Self::Expense => Nature::Debit,
            Self::Liability | Self::Equity | Self::Revenue => Nature::Credit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => write!(f, "DEBIT"),
            Self::Credit => write!(f, "CREDIT"),
        }
    }
}

/// A ledger account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub chart_of_accounts_id: ChartId,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub parent_id: Option<AccountId>,
    /// Depth in the hierarchy, 1 for top-level accounts
    pub level: u32,
    pub is_postable: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub chart_of_accounts_id: ChartId,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub parent_id: Option<AccountId>,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_true")]
    pub is_postable: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_level() -> u32 {
    1
}

impl AccountInput {
    pub fn new(
        chart_of_accounts_id: ChartId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            chart_of_accounts_id,
            code: code.into(),
            name: name.into(),
            account_type,
            parent_id: None,
            level: 1,
            is_postable: true,
            is_active: true,
        }
    }
}

impl Account {
    pub fn nature(&self) -> Nature {
        self.account_type.nature()
    }
}

impl Resource for Account {
    type Id = AccountId;
    type Input = AccountInput;

    const PATH: &'static str = "accounts";
    const LABEL: &'static str = "Account";
    const ENTITY: EntityType = EntityType::Account;
    const SOFT_DELETE: bool = true;
    const FACETS: &'static [&'static str] = &[
        "chartOfAccountsId",
        "accountType",
        "parentId",
        "isPostable",
        "isActive",
    ];

    fn id(&self) -> Self::Id {
        self.id
    }

    fn new_id() -> Self::Id {
        AccountId::new()
    }

    fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self {
        let mut account = Self {
            id,
            chart_of_accounts_id: input.chart_of_accounts_id,
            code: String::new(),
            name: String::new(),
            account_type: input.account_type,
            parent_id: None,
            level: 1,
            is_postable: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        account.apply(input, now);
        account
    }

    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>) {
        self.chart_of_accounts_id = input.chart_of_accounts_id;
        self.code = input.code.trim().to_string();
        self.name = input.name.trim().to_string();
        self.account_type = input.account_type;
        self.parent_id = input.parent_id;
        self.level = input.level;
        self.is_postable = input.is_postable;
        self.is_active = input.is_active;
        self.updated_at = now;
    }

    fn to_input(&self) -> Self::Input {
        AccountInput {
            chart_of_accounts_id: self.chart_of_accounts_id,
            code: self.code.clone(),
            name: self.name.clone(),
            account_type: self.account_type,
            parent_id: self.parent_id,
            level: self.level,
            is_postable: self.is_postable,
            is_active: self.is_active,
        }
    }

    fn validate(input: &Self::Input) -> FieldErrors {
        let mut v = Validator::new();
        v.required("code", &input.code, 30)
            .required("name", &input.name, 200)
            .check("level", (1..=10).contains(&input.level), "must be between 1 and 10")
            .check(
                "parentId",
                input.parent_id.is_some() || input.level == 1,
                "is required below the first level",
            );
        if !v.has("code") {
            v.check(
                "code",
                input
                    .code
                    .trim()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-'),
                "may only contain letters, digits, '.' and '-'",
            );
        }
        v.finish()
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.code, self.name)
    }

    fn lookup_key(&self) -> String {
        self.code.clone()
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.code.clone(), self.name.clone()]
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            "chartOfAccountsId" => Some(self.chart_of_accounts_id.to_string()),
            "accountType" => Some(self.account_type.to_string()),
            "parentId" => self.parent_id.map(|id| id.to_string()),
            "isPostable" => Some(self.is_postable.to_string()),
            "isActive" => Some(self.is_active.to_string()),
            _ => None,
        }
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some((
            "code",
            format!("{}|{}", self.chart_of_accounts_id, self.code.to_lowercase()),
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
