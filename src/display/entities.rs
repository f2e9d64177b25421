//! Table rows and detail views for the catalog entities

use super::table::{or_dash, Tabular};
use crate::config::Locale;
use crate::models::{
    Account, ChartOfAccounts, Company, Currency, Customer, EconomicGroup, ExchangeRate, Supplier,
    UserCompanyPermission,
};

fn timestamps(
    created: chrono::DateTime<chrono::Utc>,
    updated: chrono::DateTime<chrono::Utc>,
    locale: Locale,
) -> [(&'static str, String); 2] {
    [
        ("Created", locale.format_date(created.date_naive())),
        ("Updated", locale.format_date(updated.date_naive())),
    ]
}

impl Tabular for EconomicGroup {
    fn headers() -> &'static [&'static str] {
        &["Code", "Name", "Status"]
    }

    fn row(&self, locale: Locale) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            locale.active_label(self.is_active).to_string(),
        ]
    }

    fn details(&self, locale: Locale) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Code", self.code.clone()),
            ("Name", self.name.clone()),
            ("Description", or_dash(self.description.as_deref())),
            ("Status", locale.active_label(self.is_active).to_string()),
        ];
        fields.extend(timestamps(self.created_at, self.updated_at, locale));
        fields
    }
}

impl Tabular for Company {
    fn headers() -> &'static [&'static str] {
        &["Code", "Legal Name", "Tax ID", "Currency", "Status"]
    }

    fn row(&self, locale: Locale) -> Vec<String> {
        vec![
            self.code.clone(),
            self.legal_name.clone(),
            self.tax_id.clone(),
            or_dash(self.base_currency.as_deref()),
            locale.active_label(self.is_active).to_string(),
        ]
    }

    fn details(&self, locale: Locale) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Group", self.economic_group_id.to_string()),
            ("Code", self.code.clone()),
            ("Legal Name", self.legal_name.clone()),
            ("Trade Name", or_dash(self.trade_name.as_deref())),
            ("Tax ID", self.tax_id.clone()),
            ("Currency", or_dash(self.base_currency.as_deref())),
            ("Status", locale.active_label(self.is_active).to_string()),
        ];
        fields.extend(timestamps(self.created_at, self.updated_at, locale));
        fields
    }
}

macro_rules! party_tabular {
    ($name:ident) => {
        impl Tabular for $name {
            fn headers() -> &'static [&'static str] {
                &["Code", "Name", "Tax ID", "Email", "Status"]
            }

            fn row(&self, locale: Locale) -> Vec<String> {
                vec![
                    self.code.clone(),
                    self.name.clone(),
                    or_dash(self.tax_id.as_deref()),
                    or_dash(self.email.as_deref()),
                    locale.active_label(self.is_active).to_string(),
                ]
            }

            fn details(&self, locale: Locale) -> Vec<(&'static str, String)> {
                let mut fields = vec![
                    ("Group", self.economic_group_id.to_string()),
                    ("Code", self.code.clone()),
                    ("Name", self.name.clone()),
                    ("Tax ID", or_dash(self.tax_id.as_deref())),
                    ("Email", or_dash(self.email.as_deref())),
                    ("Phone", or_dash(self.phone.as_deref())),
                    ("Status", locale.active_label(self.is_active).to_string()),
                ];
                fields.extend(timestamps(self.created_at, self.updated_at, locale));
                fields
            }
        }
    };
}

party_tabular!(Customer);
party_tabular!(Supplier);

impl Tabular for Currency {
    fn headers() -> &'static [&'static str] {
        &["Code", "Name", "Symbol", "Decimals", "Status"]
    }

    fn row(&self, locale: Locale) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.symbol.clone(),
            self.decimals.to_string(),
            locale.active_label(self.is_active).to_string(),
        ]
    }

    fn details(&self, locale: Locale) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Code", self.code.clone()),
            ("Name", self.name.clone()),
            ("Symbol", self.symbol.clone()),
            ("Decimals", self.decimals.to_string()),
            ("Status", locale.active_label(self.is_active).to_string()),
        ];
        fields.extend(timestamps(self.created_at, self.updated_at, locale));
        fields
    }
}

impl Tabular for ExchangeRate {
    fn headers() -> &'static [&'static str] {
        &["Date", "From", "To", "Rate", "Type"]
    }

    fn row(&self, locale: Locale) -> Vec<String> {
        vec![
            locale.format_date(self.date),
            self.from_currency.clone(),
            self.to_currency.clone(),
            format!("{:.6}", self.rate),
            self.rate_type.to_string(),
        ]
    }

    fn details(&self, locale: Locale) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Group", self.economic_group_id.to_string()),
            ("Date", locale.format_date(self.date)),
            ("From", self.from_currency.clone()),
            ("To", self.to_currency.clone()),
            ("Rate", format!("{:.6}", self.rate)),
            ("Inverse", format!("{:.6}", self.inverse())),
            ("Type", self.rate_type.to_string()),
        ];
        fields.extend(timestamps(self.created_at, self.updated_at, locale));
        fields
    }
}

impl Tabular for ChartOfAccounts {
    fn headers() -> &'static [&'static str] {
        &["Code", "Name", "Status"]
    }

    fn row(&self, locale: Locale) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            locale.active_label(self.is_active).to_string(),
        ]
    }

    fn details(&self, locale: Locale) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Group", self.economic_group_id.to_string()),
            ("Code", self.code.clone()),
            ("Name", self.name.clone()),
            ("Description", or_dash(self.description.as_deref())),
            ("Status", locale.active_label(self.is_active).to_string()),
        ];
        fields.extend(timestamps(self.created_at, self.updated_at, locale));
        fields
    }
}

impl Tabular for Account {
    fn headers() -> &'static [&'static str] {
        &["Code", "Name", "Type", "Level", "Postable", "Status"]
    }

    fn row(&self, locale: Locale) -> Vec<String> {
        // Indent by level so the hierarchy reads top-down
        let indent = "  ".repeat(self.level.saturating_sub(1) as usize);
        vec![
            format!("{}{}", indent, self.code),
            self.name.clone(),
            self.account_type.to_string(),
            self.level.to_string(),
            locale.yes_no(self.is_postable).to_string(),
            locale.active_label(self.is_active).to_string(),
        ]
    }

    fn details(&self, locale: Locale) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Chart", self.chart_of_accounts_id.to_string()),
            ("Code", self.code.clone()),
            ("Name", self.name.clone()),
            ("Type", self.account_type.to_string()),
            ("Nature", self.account_type.nature().to_string()),
            ("Parent", or_dash(self.parent_id)),
            ("Level", self.level.to_string()),
            ("Postable", locale.yes_no(self.is_postable).to_string()),
            ("Status", locale.active_label(self.is_active).to_string()),
        ];
        fields.extend(timestamps(self.created_at, self.updated_at, locale));
        fields
    }
}

impl Tabular for UserCompanyPermission {
    fn headers() -> &'static [&'static str] {
        &["User", "Company", "Role"]
    }

    fn row(&self, _locale: Locale) -> Vec<String> {
        vec![
            self.user_id.clone(),
            self.company_id.to_string(),
            self.role.to_string(),
        ]
    }

    fn details(&self, locale: Locale) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("User", self.user_id.clone()),
            ("Company", self.company_id.to_string()),
            ("Role", self.role.to_string()),
            ("Can Write", locale.yes_no(self.role.can_write()).to_string()),
        ];
        fields.extend(timestamps(self.created_at, self.updated_at, locale));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{format_details, format_table};
    use crate::models::{CurrencyInput, EconomicGroupInput, Resource};
    use chrono::Utc;

    #[test]
    fn test_group_table_has_full_id() {
        let group = EconomicGroup::build(
            EconomicGroup::new_id(),
            EconomicGroupInput::new("HOLD", "Holding"),
            Utc::now(),
        );
        let out = format_table(std::slice::from_ref(&group), Locale::En);
        assert!(out.starts_with("ID"));
        assert!(out.contains(&group.id.to_string()));
        assert!(out.contains("Active"));
    }

    #[test]
    fn test_localized_status() {
        let mut input = CurrencyInput::new("COP", "Peso colombiano", "$", 2);
        input.is_active = false;
        let currency = Currency::build(Currency::new_id(), input, Utc::now());
        let out = format_details(&currency, Locale::Es);
        assert!(out.starts_with("Currency: "));
        assert!(out.contains("Inactivo"));
    }

    #[test]
    fn test_empty_list_message() {
        assert_eq!(format_table::<Currency>(&[], Locale::En), "No records found.");
    }
}
