//! Locale context
//!
//! The locale is read once from settings at startup and only changes through
//! `ledgerdesk config --locale`. It picks the date format and the few status
//! words the display layer prints.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Supported display locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Parse a locale tag such as `en`, `es` or `es-CO`
    pub fn parse(s: &str) -> Option<Self> {
        let tag = s.trim().to_lowercase();
        match tag.split(['-', '_']).next() {
            Some("en") => Some(Self::En),
            Some("es") => Some(Self::Es),
            _ => None,
        }
    }

    /// Format a date the way this locale writes it
    pub fn format_date(&self, date: NaiveDate) -> String {
        match self {
            Self::En => date.format("%Y-%m-%d").to_string(),
            Self::Es => date.format("%d/%m/%Y").to_string(),
        }
    }

    pub fn yes_no(&self, value: bool) -> &'static str {
        match (self, value) {
            (Self::En, true) => "Yes",
            (Self::En, false) => "No",
            (Self::Es, true) => "Sí",
            (Self::Es, false) => "No",
        }
    }

    /// Label for an active/inactive record
    pub fn active_label(&self, active: bool) -> &'static str {
        match (self, active) {
            (Self::En, true) => "Active",
            (Self::En, false) => "Inactive",
            (Self::Es, true) => "Activo",
            (Self::Es, false) => "Inactivo",
        }
    }

    /// Label for an open/closed accounting period
    pub fn period_status(&self, closed: bool) -> &'static str {
        match (self, closed) {
            (Self::En, false) => "Open",
            (Self::En, true) => "Closed",
            (Self::Es, false) => "Abierto",
            (Self::Es, true) => "Cerrado",
        }
    }

    /// Message printed for an empty list
    pub fn nothing_found(&self) -> &'static str {
        match self {
            Self::En => "No records found.",
            Self::Es => "No se encontraron registros.",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Es => write!(f, "es"),
        }
    }
}
