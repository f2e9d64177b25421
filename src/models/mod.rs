//! Core data models for ledgerdesk
//!
//! This module contains the entities of the accounting administration domain
//! and the `Resource` trait that maps each of them to its REST resource.

pub mod account;
pub mod chart;
pub mod company;
pub mod currency;
pub mod economic_group;
pub mod ids;
pub mod party;
pub mod period;
pub mod permission;
pub mod resource;

pub use account::{Account, AccountInput, AccountType, Nature};
pub use chart::{ChartInput, ChartOfAccounts};
pub use company::{Company, CompanyInput};
pub use currency::{Currency, CurrencyInput, ExchangeRate, ExchangeRateInput, RateType};
pub use economic_group::{EconomicGroup, EconomicGroupInput};
pub use ids::{
    AccountId, ChartId, CompanyId, CurrencyId, CustomerId, EconomicGroupId, ExchangeRateId,
    PeriodId, PermissionId, SupplierId,
};
pub use party::{Customer, PartyInput, Supplier};
pub use period::{AccountingPeriod, PeriodInput, PeriodState, PeriodType};
pub use permission::{PermissionInput, PermissionRole, UserCompanyPermission};
pub use resource::{ActionContext, Resource, RuleViolation};
