//! Currency and exchange rate models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::economic_group::default_true;
use super::ids::{CurrencyId, EconomicGroupId, ExchangeRateId};
use super::resource::{is_currency_code, Resource, Validator};
use crate::audit::EntityType;
use crate::error::FieldErrors;

/// A currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: CurrencyId,
    /// ISO 4217 code
    pub code: String,
    pub name: String,
    pub symbol: String,
    /// Minor unit digits
    pub decimals: u8,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInput {
    pub code: String,
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_decimals() -> u8 {
    2
}

impl CurrencyInput {
    pub fn new(code: &str, name: &str, symbol: &str, decimals: u8) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            is_active: true,
        }
    }
}

/// Currencies seeded by `ledgerdesk init`
pub fn default_currencies() -> Vec<CurrencyInput> {
    vec![
        CurrencyInput::new("USD", "US Dollar", "$", 2),
        CurrencyInput::new("EUR", "Euro", "€", 2),
        CurrencyInput::new("GBP", "Pound Sterling", "£", 2),
        CurrencyInput::new("MXN", "Mexican Peso", "$", 2),
        CurrencyInput::new("COP", "Colombian Peso", "$", 2),
    ]
}

impl Resource for Currency {
    type Id = CurrencyId;
    type Input = CurrencyInput;

    const PATH: &'static str = "currencies";
    const LABEL: &'static str = "Currency";
    const ENTITY: EntityType = EntityType::Currency;
    const SOFT_DELETE: bool = true;
    const FACETS: &'static [&'static str] = &["isActive"];

    fn id(&self) -> Self::Id {
        self.id
    }

    fn new_id() -> Self::Id {
        CurrencyId::new()
    }

    fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self {
        let mut currency = Self {
            id,
            code: String::new(),
            name: String::new(),
            symbol: String::new(),
            decimals: 2,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        currency.apply(input, now);
        currency
    }

    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>) {
        self.code = input.code.trim().to_uppercase();
        self.name = input.name.trim().to_string();
        self.symbol = input.symbol.trim().to_string();
        self.decimals = input.decimals;
        self.is_active = input.is_active;
        self.updated_at = now;
    }

    fn to_input(&self) -> Self::Input {
        CurrencyInput {
            code: self.code.clone(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            is_active: self.is_active,
        }
    }

    fn validate(input: &Self::Input) -> FieldErrors {
        let mut v = Validator::new();
        v.required("code", &input.code, 3)
            .required("name", &input.name, 100)
            .required("symbol", &input.symbol, 5)
            .check("decimals", input.decimals <= 4, "must be between 0 and 4");
        if !v.has("code") {
            v.check(
                "code",
                is_currency_code(input.code.trim()),
                "must be a 3-letter currency code",
            );
        }
        v.finish()
    }

    fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.code)
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

/// How an exchange rate was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateType {
    /// Rate of the day
    #[default]
    Spot,
    /// Period average
    Average,
    /// Period-end closing rate
    Closing,
}

impl RateType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spot" => Some(Self::Spot),
            "average" | "avg" => Some(Self::Average),
            "closing" | "close" => Some(Self::Closing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spot => "SPOT",
            Self::Average => "AVERAGE",
            Self::Closing => "CLOSING",
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Units of `to_currency` per one unit of `from_currency` on `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: ExchangeRateId,
    pub economic_group_id: EconomicGroupId,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub rate_type: RateType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateInput {
    pub economic_group_id: EconomicGroupId,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub rate_type: RateType,
}

impl ExchangeRate {
    /// Convert an amount from `from_currency` into `to_currency`
    pub fn convert(&self, amount: f64) -> f64 {
        amount * self.rate
    }

    /// The rate for the opposite direction
    pub fn inverse(&self) -> f64 {
        1.0 / self.rate
    }
}

impl Resource for ExchangeRate {
    type Id = ExchangeRateId;
    type Input = ExchangeRateInput;

    const PATH: &'static str = "exchange-rates";
    const LABEL: &'static str = "Exchange rate";
    const ENTITY: EntityType = EntityType::ExchangeRate;
    const FACETS: &'static [&'static str] = &[
        "economicGroupId",
        "fromCurrency",
        "toCurrency",
        "rateType",
        "date",
    ];

    fn id(&self) -> Self::Id {
        self.id
    }

    fn new_id() -> Self::Id {
        ExchangeRateId::new()
    }

    fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self {
        let mut rate = Self {
            id,
            economic_group_id: input.economic_group_id,
            from_currency: String::new(),
            to_currency: String::new(),
            rate: 0.0,
            date: input.date,
            rate_type: input.rate_type,
            created_at: now,
            updated_at: now,
        };
        rate.apply(input, now);
        rate
    }

    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>) {
        self.economic_group_id = input.economic_group_id;
        self.from_currency = input.from_currency.trim().to_uppercase();
        self.to_currency = input.to_currency.trim().to_uppercase();
        self.rate = input.rate;
        self.date = input.date;
        self.rate_type = input.rate_type;
        self.updated_at = now;
    }

    fn to_input(&self) -> Self::Input {
        ExchangeRateInput {
            economic_group_id: self.economic_group_id,
            from_currency: self.from_currency.clone(),
            to_currency: self.to_currency.clone(),
            rate: self.rate,
            date: self.date,
            rate_type: self.rate_type,
        }
    }

    fn validate(input: &Self::Input) -> FieldErrors {
        let mut v = Validator::new();
        v.check(
            "fromCurrency",
            is_currency_code(input.from_currency.trim()),
            "must be a 3-letter currency code",
        )
        .check(
            "toCurrency",
            is_currency_code(input.to_currency.trim()),
            "must be a 3-letter currency code",
        )
        .check(
            "rate",
            input.rate.is_finite() && input.rate > 0.0,
            "must be greater than zero",
        );
        if !v.has("fromCurrency") && !v.has("toCurrency") {
            v.check(
                "toCurrency",
                !input
                    .from_currency
                    .trim()
                    .eq_ignore_ascii_case(input.to_currency.trim()),
                "must differ from the source currency",
            );
        }
        v.finish()
    }

    fn display_name(&self) -> String {
        format!(
            "{}/{} {} on {}",
            self.from_currency, self.to_currency, self.rate, self.date
        )
    }

    fn lookup_key(&self) -> String {
        format!("{}/{}@{}", self.from_currency, self.to_currency, self.date)
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.from_currency.clone(),
            self.to_currency.clone(),
            self.lookup_key(),
        ]
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            "economicGroupId" => Some(self.economic_group_id.to_string()),
            "fromCurrency" => Some(self.from_currency.clone()),
            "toCurrency" => Some(self.to_currency.clone()),
            "rateType" => Some(self.rate_type.to_string()),
            "date" => Some(self.date.to_string()),
            _ => None,
        }
    }

    fn sort_key(&self) -> String {
        format!(
            "{}{}{}",
            self.from_currency, self.to_currency, self.date
        )
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some((
            "date",
            format!(
                "{}|{}|{}|{}|{}",
                self.economic_group_id,
                self.from_currency,
                self.to_currency,
                self.date,
                self.rate_type
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_input() -> ExchangeRateInput {
        ExchangeRateInput {
            economic_group_id: EconomicGroupId::new(),
            from_currency: "usd".into(),
            to_currency: "cop".into(),
            rate: 4000.0,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            rate_type: RateType::Spot,
        }
    }

    #[test]
    fn test_currency_validation() {
        let errors = Currency::validate(&CurrencyInput::new("US1", "Dollar", "$", 9));
        assert_eq!(errors.get("code").unwrap(), "must be a 3-letter currency code");
        assert!(errors.contains_key("decimals"));
        assert!(Currency::validate(&CurrencyInput::new("USD", "US Dollar", "$", 2)).is_empty());
    }

    #[test]
    fn test_default_currencies_are_valid() {
        for input in default_currencies() {
            assert!(Currency::validate(&input).is_empty(), "{:?}", input);
        }
    }

    #[test]
    fn test_rate_build_uppercases() {
        let rate = ExchangeRate::build(ExchangeRateId::new(), rate_input(), Utc::now());
        assert_eq!(rate.from_currency, "USD");
        assert_eq!(rate.to_currency, "COP");
        assert_eq!(rate.lookup_key(), "USD/COP@2025-03-01");
        assert_eq!(rate.convert(2.0), 8000.0);
        assert_eq!(rate.inverse(), 0.00025);
    }

    #[test]
    fn test_rate_validation() {
        let mut input = rate_input();
        input.rate = 0.0;
        input.to_currency = "USD".into();
        let errors = ExchangeRate::validate(&input);
        assert!(errors.contains_key("rate"));
        assert_eq!(
            errors.get("toCurrency").unwrap(),
            "must differ from the source currency"
        );
    }

    #[test]
    fn test_rate_type_wire_format() {
        assert_eq!(serde_json::to_string(&RateType::Closing).unwrap(), "\"CLOSING\"");
        assert_eq!(RateType::parse("avg"), Some(RateType::Average));
    }
}
