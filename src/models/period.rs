//! Accounting period model
//!
//! A bounded date range (fiscal year, quarter or month) of an economic group
//! that can be closed to prevent further postings.
//!
//! Lifecycle: created open, optionally closed, optionally reopened, and
//! deletable only while open. A closed period accepts no change except
//! reopening; closing stamps `closedAt` and `closedBy` together and reopening
//! clears both.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EconomicGroupId, PeriodId};
use super::resource::{ActionContext, Resource, RuleViolation, Validator};
use crate::audit::EntityType;
use crate::error::FieldErrors;

/// Rule names answered by the API for period transitions
pub mod rules {
    pub const ALREADY_CLOSED: &str = "PERIOD_ALREADY_CLOSED";
    pub const NOT_CLOSED: &str = "PERIOD_NOT_CLOSED";
    pub const CLOSED: &str = "PERIOD_CLOSED";
}

/// Granularity of an accounting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    FiscalYear,
    Quarter,
    Month,
}

impl PeriodType {
    /// Parse period type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fiscal_year" | "year" | "fy" => Some(Self::FiscalYear),
            "quarter" | "q" => Some(Self::Quarter),
            "month" | "m" => Some(Self::Month),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiscalYear => "FISCAL_YEAR",
            Self::Quarter => "QUARTER",
            Self::Month => "MONTH",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state derived from the `closed` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodState {
    Open,
    Closed,
}

/// An accounting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountingPeriod {
    pub id: PeriodId,
    pub economic_group_id: EconomicGroupId,
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    pub fiscal_year: i32,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub quarter: Option<u32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub closed: bool,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update body for an accounting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInput {
    pub economic_group_id: EconomicGroupId,
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    pub fiscal_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PeriodInput {
    /// A calendar month, e.g. 2025-03 spanning 2025-03-01..2025-03-31
    pub fn month(economic_group_id: EconomicGroupId, year: i32, month: u32) -> Option<Self> {
        let (start_date, end_date) = month_bounds(year, month)?;
        Some(Self {
            economic_group_id,
            period_type: PeriodType::Month,
            fiscal_year: year,
            month: Some(month),
            quarter: None,
            start_date,
            end_date,
        })
    }

    /// A calendar quarter (1..=4)
    pub fn quarter(economic_group_id: EconomicGroupId, year: i32, quarter: u32) -> Option<Self> {
        if !(1..=4).contains(&quarter) {
            return None;
        }
        let (start_date, _) = month_bounds(year, quarter * 3 - 2)?;
        let (_, end_date) = month_bounds(year, quarter * 3)?;
        Some(Self {
            economic_group_id,
            period_type: PeriodType::Quarter,
            fiscal_year: year,
            month: None,
            quarter: Some(quarter),
            start_date,
            end_date,
        })
    }

    /// A calendar fiscal year
    pub fn fiscal_year(economic_group_id: EconomicGroupId, year: i32) -> Option<Self> {
        Some(Self {
            economic_group_id,
            period_type: PeriodType::FiscalYear,
            fiscal_year: year,
            month: None,
            quarter: None,
            start_date: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end_date: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next_month - Duration::days(1)))
}

/// Calendar range named by the type and its ordinal, if those are valid
fn calendar_bounds(input: &PeriodInput) -> Option<(NaiveDate, NaiveDate)> {
    match input.period_type {
        PeriodType::Month => month_bounds(input.fiscal_year, input.month?),
        PeriodType::Quarter => {
            let quarter = input.quarter.filter(|q| (1..=4).contains(q))?;
            let (start, _) = month_bounds(input.fiscal_year, quarter * 3 - 2)?;
            let (_, end) = month_bounds(input.fiscal_year, quarter * 3)?;
            Some((start, end))
        }
        PeriodType::FiscalYear => Some((
            NaiveDate::from_ymd_opt(input.fiscal_year, 1, 1)?,
            NaiveDate::from_ymd_opt(input.fiscal_year, 12, 31)?,
        )),
    }
}

impl AccountingPeriod {
    pub fn state(&self) -> PeriodState {
        if self.closed {
            PeriodState::Closed
        } else {
            PeriodState::Open
        }
    }

    /// Short label: `FY2025`, `2025-Q1` or `2025-03`
    pub fn label(&self) -> String {
        match (self.period_type, self.month, self.quarter) {
            (PeriodType::Month, Some(month), _) => format!("{:04}-{:02}", self.fiscal_year, month),
            (PeriodType::Quarter, _, Some(quarter)) => {
                format!("{:04}-Q{}", self.fiscal_year, quarter)
            }
            _ => format!("FY{:04}", self.fiscal_year),
        }
    }

    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of days covered, inclusive
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    fn close(&mut self, ctx: &ActionContext) -> Result<(), RuleViolation> {
        if self.closed {
            return Err(RuleViolation::new(
                rules::ALREADY_CLOSED,
                format!("Period {} is already closed", self.label()),
            ));
        }
        self.closed = true;
        self.closed_at = Some(ctx.now);
        self.closed_by = Some(
            ctx.user_id
                .clone()
                .unwrap_or_else(|| "system".to_string()),
        );
        self.updated_at = ctx.now;
        Ok(())
    }

    fn reopen(&mut self, ctx: &ActionContext) -> Result<(), RuleViolation> {
        if !self.closed {
            return Err(RuleViolation::new(
                rules::NOT_CLOSED,
                format!("Period {} is not closed", self.label()),
            ));
        }
        self.closed = false;
        self.closed_at = None;
        self.closed_by = None;
        self.updated_at = ctx.now;
        Ok(())
    }
}

impl Resource for AccountingPeriod {
    type Id = PeriodId;
    type Input = PeriodInput;

    const PATH: &'static str = "accounting-periods";
    const LABEL: &'static str = "Accounting period";
    const ENTITY: EntityType = EntityType::AccountingPeriod;
    const FACETS: &'static [&'static str] = &["economicGroupId", "type", "fiscalYear", "closed"];

    fn id(&self) -> Self::Id {
        self.id
    }

    fn new_id() -> Self::Id {
        PeriodId::new()
    }

    fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self {
        let mut period = Self {
            id,
            economic_group_id: input.economic_group_id,
            period_type: input.period_type,
            fiscal_year: input.fiscal_year,
            month: None,
            quarter: None,
            start_date: input.start_date,
            end_date: input.end_date,
            closed: false,
            closed_at: None,
            closed_by: None,
            created_at: now,
            updated_at: now,
        };
        period.apply(input, now);
        period
    }

    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>) {
        self.economic_group_id = input.economic_group_id;
        self.period_type = input.period_type;
        self.fiscal_year = input.fiscal_year;
        // Only the field matching the type is kept
        self.month = match input.period_type {
            PeriodType::Month => input.month,
            _ => None,
        };
        self.quarter = match input.period_type {
            PeriodType::Quarter => input.quarter,
            _ => None,
        };
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.updated_at = now;
    }

    fn to_input(&self) -> Self::Input {
        PeriodInput {
            economic_group_id: self.economic_group_id,
            period_type: self.period_type,
            fiscal_year: self.fiscal_year,
            month: self.month,
            quarter: self.quarter,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    fn validate(input: &Self::Input) -> FieldErrors {
        let mut v = Validator::new();
        v.check(
            "fiscalYear",
            (1900..=9999).contains(&input.fiscal_year),
            "must be between 1900 and 9999",
        )
        .check(
            "endDate",
            input.start_date <= input.end_date,
            "must not be before the start date",
        );

        match input.period_type {
            PeriodType::Month => {
                v.check(
                    "month",
                    input.month.is_some_and(|m| (1..=12).contains(&m)),
                    "must be between 1 and 12 for a monthly period",
                )
                .check(
                    "quarter",
                    input.quarter.is_none(),
                    "must be empty for a monthly period",
                );
            }
            PeriodType::Quarter => {
                v.check(
                    "quarter",
                    input.quarter.is_some_and(|q| (1..=4).contains(&q)),
                    "must be between 1 and 4 for a quarterly period",
                )
                .check(
                    "month",
                    input.month.is_none(),
                    "must be empty for a quarterly period",
                );
            }
            PeriodType::FiscalYear => {
                v.check(
                    "month",
                    input.month.is_none(),
                    "must be empty for a fiscal year",
                )
                .check(
                    "quarter",
                    input.quarter.is_none(),
                    "must be empty for a fiscal year",
                );
            }
        }

        if let Some((first, last)) = calendar_bounds(input) {
            let within = first..=last;
            v.check(
                "startDate",
                within.contains(&input.start_date),
                format!("must fall between {} and {}", first, last),
            )
            .check(
                "endDate",
                within.contains(&input.end_date),
                format!("must fall between {} and {}", first, last),
            );
        }
        v.finish()
    }

    fn display_name(&self) -> String {
        self.label()
    }

    fn lookup_key(&self) -> String {
        self.label()
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.label(),
            self.fiscal_year.to_string(),
            self.period_type.to_string(),
        ]
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            "economicGroupId" => Some(self.economic_group_id.to_string()),
            "type" => Some(self.period_type.to_string()),
            "fiscalYear" => Some(self.fiscal_year.to_string()),
            "closed" => Some(self.closed.to_string()),
            _ => None,
        }
    }

    fn sort_key(&self) -> String {
        // Chronological, with the wider period first on a shared start date
        let rank = match self.period_type {
            PeriodType::FiscalYear => 0,
            PeriodType::Quarter => 1,
            PeriodType::Month => 2,
        };
        format!("{}|{}", self.start_date, rank)
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some((
            "fiscalYear",
            format!("{}|{}", self.economic_group_id, self.label()),
        ))
    }

    fn guard_update(&self) -> Result<(), RuleViolation> {
        if self.closed {
            return Err(RuleViolation::new(
                rules::CLOSED,
                format!("Period {} is closed and cannot be modified", self.label()),
            ));
        }
        Ok(())
    }

    fn guard_delete(&self) -> Result<(), RuleViolation> {
        if self.closed {
            return Err(RuleViolation::new(
                rules::CLOSED,
                format!("Period {} is closed and cannot be deleted", self.label()),
            ));
        }
        Ok(())
    }

    fn perform(
        &mut self,
        action: &str,
        ctx: &ActionContext,
    ) -> Option<Result<(), RuleViolation>> {
        match action {
            "close" => Some(self.close(ctx)),
            "reopen" => Some(self.reopen(ctx)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_2025() -> AccountingPeriod {
        let input = PeriodInput::month(EconomicGroupId::new(), 2025, 3).unwrap();
        AccountingPeriod::build(PeriodId::new(), input, Utc::now())
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, dec_end) = month_bounds(2025, 12).unwrap();
        assert_eq!(dec_end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert!(month_bounds(2025, 13).is_none());
    }

    #[test]
    fn test_month_period() {
        let period = march_2025();
        assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(period.label(), "2025-03");
        assert_eq!(period.days(), 31);
        assert!(!period.closed);
        assert_eq!(period.state(), PeriodState::Open);
    }

    #[test]
    fn test_quarter_and_year() {
        let group = EconomicGroupId::new();
        let q2 = PeriodInput::quarter(group, 2025, 2).unwrap();
        assert_eq!(q2.start_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(q2.end_date, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
        assert!(PeriodInput::quarter(group, 2025, 5).is_none());

        let fy = AccountingPeriod::build(
            PeriodId::new(),
            PeriodInput::fiscal_year(group, 2025).unwrap(),
            Utc::now(),
        );
        assert_eq!(fy.label(), "FY2025");
        assert_eq!(fy.days(), 365);
    }

    #[test]
    fn test_validate_type_consistency() {
        let group = EconomicGroupId::new();
        let mut input = PeriodInput::month(group, 2025, 3).unwrap();
        input.quarter = Some(1);
        assert!(AccountingPeriod::validate(&input).contains_key("quarter"));

        let mut input = PeriodInput::quarter(group, 2025, 1).unwrap();
        input.quarter = None;
        assert!(AccountingPeriod::validate(&input).contains_key("quarter"));

        let mut input = PeriodInput::month(group, 2025, 3).unwrap();
        input.end_date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(AccountingPeriod::validate(&input).contains_key("endDate"));

        assert!(AccountingPeriod::validate(&PeriodInput::month(group, 2025, 3).unwrap()).is_empty());
    }

    #[test]
    fn test_dates_must_fall_within_the_period() {
        let group = EconomicGroupId::new();

        let mut march = PeriodInput::month(group, 2025, 3).unwrap();
        march.start_date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        march.end_date = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        let errors = AccountingPeriod::validate(&march);
        assert_eq!(errors["startDate"], "must fall between 2025-03-01 and 2025-03-31");
        assert!(errors.contains_key("endDate"));

        let mut q1 = PeriodInput::quarter(group, 2025, 1).unwrap();
        q1.end_date = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        let errors = AccountingPeriod::validate(&q1);
        assert!(!errors.contains_key("startDate"));
        assert!(errors.contains_key("endDate"));

        let mut fy = PeriodInput::fiscal_year(group, 2025).unwrap();
        fy.start_date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert!(AccountingPeriod::validate(&fy).contains_key("startDate"));

        // A shorter range inside the month is accepted
        let mut partial = PeriodInput::month(group, 2025, 3).unwrap();
        partial.start_date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(AccountingPeriod::validate(&partial).is_empty());
    }

    #[test]
    fn test_close_and_reopen() {
        let mut period = march_2025();
        let ctx = ActionContext::new(Some("maria".into()));

        period.perform("close", &ctx).unwrap().unwrap();
        assert!(period.closed);
        assert_eq!(period.closed_by.as_deref(), Some("maria"));
        assert!(period.closed_at.is_some());

        let again = period.perform("close", &ctx).unwrap().unwrap_err();
        assert_eq!(again.rule, rules::ALREADY_CLOSED);

        period.perform("reopen", &ctx).unwrap().unwrap();
        assert!(!period.closed);
        assert!(period.closed_at.is_none());
        assert!(period.closed_by.is_none());

        let not_closed = period.perform("reopen", &ctx).unwrap().unwrap_err();
        assert_eq!(not_closed.rule, rules::NOT_CLOSED);
    }

    #[test]
    fn test_closed_period_is_guarded() {
        let mut period = march_2025();
        assert!(period.guard_delete().is_ok());
        assert!(period.guard_update().is_ok());

        period
            .perform("close", &ActionContext::new(None))
            .unwrap()
            .unwrap();
        assert_eq!(period.closed_by.as_deref(), Some("system"));
        assert_eq!(period.guard_delete().unwrap_err().rule, rules::CLOSED);
        assert_eq!(period.guard_update().unwrap_err().rule, rules::CLOSED);
    }

    #[test]
    fn test_unknown_action() {
        let mut period = march_2025();
        assert!(period.perform("archive", &ActionContext::new(None)).is_none());
    }

    #[test]
    fn test_wire_format() {
        let period = march_2025();
        let json = serde_json::to_value(&period).unwrap();
        assert_eq!(json["type"], "MONTH");
        assert_eq!(json["fiscalYear"], 2025);
        assert_eq!(json["startDate"], "2025-03-01");
        assert_eq!(json["closed"], false);
    }

    #[test]
    fn test_sort_key_orders_chronologically() {
        let group = EconomicGroupId::new();
        let now = Utc::now();
        let fy = AccountingPeriod::build(PeriodId::new(), PeriodInput::fiscal_year(group, 2025).unwrap(), now);
        let jan = AccountingPeriod::build(PeriodId::new(), PeriodInput::month(group, 2025, 1).unwrap(), now);
        let feb = AccountingPeriod::build(PeriodId::new(), PeriodInput::month(group, 2025, 2).unwrap(), now);
        assert!(fy.sort_key() < jan.sort_key());
        assert!(jan.sort_key() < feb.sort_key());
    }

    #[test]
    fn test_period_type_parse() {
        assert_eq!(PeriodType::parse("fiscal-year"), Some(PeriodType::FiscalYear));
        assert_eq!(PeriodType::parse("MONTH"), Some(PeriodType::Month));
        assert_eq!(PeriodType::parse("week"), None);
    }
}
