//! Accounting period formatting

use super::table::{or_dash, Tabular};
use crate::config::Locale;
use crate::controller::PeriodRowActions;
use crate::models::AccountingPeriod;

/// Enabled row actions, e.g. `edit, delete, close`
pub fn format_actions(period: &AccountingPeriod) -> String {
    let actions = PeriodRowActions::for_period(period);
    let mut names = Vec::new();
    if actions.can_edit {
        names.push("edit");
    }
    if actions.can_delete {
        names.push("delete");
    }
    if actions.can_close {
        names.push("close");
    }
    if actions.can_reopen {
        names.push("reopen");
    }
    names.join(", ")
}

impl Tabular for AccountingPeriod {
    fn headers() -> &'static [&'static str] {
        &["Period", "Type", "Start", "End", "Status", "Actions"]
    }

    fn row(&self, locale: Locale) -> Vec<String> {
        vec![
            self.label(),
            self.period_type.to_string(),
            locale.format_date(self.start_date),
            locale.format_date(self.end_date),
            locale.period_status(self.closed).to_string(),
            format_actions(self),
        ]
    }

    fn details(&self, locale: Locale) -> Vec<(&'static str, String)> {
        vec![
            ("Group", self.economic_group_id.to_string()),
            ("Type", self.period_type.to_string()),
            ("Fiscal Year", self.fiscal_year.to_string()),
            ("Start", locale.format_date(self.start_date)),
            ("End", locale.format_date(self.end_date)),
            ("Days", self.days().to_string()),
            ("Status", locale.period_status(self.closed).to_string()),
            (
                "Closed At",
                or_dash(self.closed_at.map(|at| locale.format_date(at.date_naive()))),
            ),
            ("Closed By", or_dash(self.closed_by.as_deref())),
            ("Actions", format_actions(self)),
        ]
    }
}
