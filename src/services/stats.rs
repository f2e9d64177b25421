//! Dashboard stats cards
//!
//! Client-side aggregation over the list page currently loaded.

use crate::api::Page;
use crate::config::Locale;
use crate::models::{AccountingPeriod, PeriodType, Resource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: String,
    pub value: u64,
}

impl StatCard {
    fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Total from the pagination, plus active/inactive counts on the page for
/// soft-deletable resources
pub fn entity_stats<R: Resource>(page: &Page<R>, locale: Locale) -> Vec<StatCard> {
    let mut cards = vec![StatCard::new("Total", page.pagination.total)];
    if R::SOFT_DELETE {
        let active = page.data.iter().filter(|item| item.is_active()).count() as u64;
        let inactive = page.data.len() as u64 - active;
        cards.push(StatCard::new(locale.active_label(true), active));
        cards.push(StatCard::new(locale.active_label(false), inactive));
    }
    cards
}

/// Total, open/closed and per-type counts for accounting periods
pub fn period_stats(page: &Page<AccountingPeriod>, locale: Locale) -> Vec<StatCard> {
    let closed = page.data.iter().filter(|p| p.closed).count() as u64;
    let open = page.data.len() as u64 - closed;

    let mut cards = vec![
        StatCard::new("Total", page.pagination.total),
        StatCard::new(locale.period_status(false), open),
        StatCard::new(locale.period_status(true), closed),
    ];
    for period_type in [PeriodType::FiscalYear, PeriodType::Quarter, PeriodType::Month] {
        let count = page
            .data
            .iter()
            .filter(|p| p.period_type == period_type)
            .count() as u64;
        cards.push(StatCard::new(period_type.as_str(), count));
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Pagination;
    use crate::models::{
        ActionContext, Currency, CurrencyInput, EconomicGroupId, PeriodId, PeriodInput,
    };
    use chrono::Utc;

    #[test]
    fn test_entity_stats_soft_delete() {
        let now = Utc::now();
        let mut eur = Currency::build(
            Currency::new_id(),
            CurrencyInput::new("EUR", "Euro", "€", 2),
            now,
        );
        eur.deactivate(now);
        let usd = Currency::build(
            Currency::new_id(),
            CurrencyInput::new("USD", "US Dollar", "$", 2),
            now,
        );
        let page = Page {
            data: vec![eur, usd],
            pagination: Pagination::new(1, 2, 7),
        };

        let cards = entity_stats(&page, Locale::En);
        assert_eq!(cards[0], StatCard::new("Total", 7));
        assert_eq!(cards[1], StatCard::new("Active", 1));
        assert_eq!(cards[2], StatCard::new("Inactive", 1));
    }

    #[test]
    fn test_period_stats() {
        let group = EconomicGroupId::new();
        let now = Utc::now();
        let mut march = AccountingPeriod::build(
            PeriodId::new(),
            PeriodInput::month(group, 2025, 3).unwrap(),
            now,
        );
        march
            .perform("close", &ActionContext::new(None))
            .unwrap()
            .unwrap();
        let q1 = AccountingPeriod::build(
            PeriodId::new(),
            PeriodInput::quarter(group, 2025, 1).unwrap(),
            now,
        );
        let page = Page {
            data: vec![march, q1],
            pagination: Pagination::new(1, 10, 2),
        };

        let cards = period_stats(&page, Locale::Es);
        assert_eq!(cards[1], StatCard::new("Abierto", 1));
        assert_eq!(cards[2], StatCard::new("Cerrado", 1));
        assert_eq!(cards[4], StatCard::new("QUARTER", 1));
        assert_eq!(cards[5], StatCard::new("MONTH", 1));
    }
}
