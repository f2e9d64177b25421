//! Audit entry data structures
//!
//! Defines the structure of audit log entries including operation types,
//! entity types, and the entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entity was created
    Create,
    /// Entity was updated
    Update,
    /// Entity was deleted or deactivated
    Delete,
    /// Period was closed
    Close,
    /// Period was reopened
    Reopen,
}

impl Operation {
    /// Operation recorded for an action endpoint
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "close" => Some(Self::Close),
            "reopen" => Some(Self::Reopen),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Close => write!(f, "CLOSE"),
            Operation::Reopen => write!(f, "REOPEN"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    EconomicGroup,
    Company,
    Customer,
    Supplier,
    Currency,
    ExchangeRate,
    AccountingPeriod,
    ChartOfAccounts,
    Account,
    Permission,
}

impl EntityType {
    /// Parse from the names accepted by `audit --entity`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "economicgroup" | "group" => Some(Self::EconomicGroup),
            "company" => Some(Self::Company),
            "customer" => Some(Self::Customer),
            "supplier" => Some(Self::Supplier),
            "currency" => Some(Self::Currency),
            "exchangerate" | "rate" => Some(Self::ExchangeRate),
            "accountingperiod" | "period" => Some(Self::AccountingPeriod),
            "chartofaccounts" | "chart" => Some(Self::ChartOfAccounts),
            "account" => Some(Self::Account),
            "permission" | "usercompanypermission" => Some(Self::Permission),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::EconomicGroup => write!(f, "EconomicGroup"),
            EntityType::Company => write!(f, "Company"),
            EntityType::Customer => write!(f, "Customer"),
            EntityType::Supplier => write!(f, "Supplier"),
            EntityType::Currency => write!(f, "Currency"),
            EntityType::ExchangeRate => write!(f, "ExchangeRate"),
            EntityType::AccountingPeriod => write!(f, "AccountingPeriod"),
            EntityType::ChartOfAccounts => write!(f, "ChartOfAccounts"),
            EntityType::Account => write!(f, "Account"),
            EntityType::Permission => write!(f, "UserCompanyPermission"),
        }
    }
}

/// A single audit log entry
///
/// Records a single operation on an entity with optional before/after values
/// for tracking changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable description of the entity (e.g., company name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// User the backend attributed the request to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn base(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            user_id: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Create a new audit entry for a create operation
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Create, entity_type, entity_id, entity_name)
        }
    }

    /// Create a new audit entry for an update or an action
    pub fn change<T: Serialize>(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => super::generate_diff(b, a),
            _ => None,
        };
        Self {
            before,
            after,
            diff_summary,
            ..Self::base(operation, entity_type, entity_id, entity_name)
        }
    }

    /// Create a new audit entry for a delete operation
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Delete, entity_type, entity_id, entity_name)
        }
    }

    pub fn by_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(user) = &self.user_id {
            output.push_str(&format!(" by {}", user));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Close.to_string(), "CLOSE");
        assert_eq!(Operation::from_action("reopen"), Some(Operation::Reopen));
        assert_eq!(Operation::from_action("archive"), None);
    }

    #[test]
    fn test_entity_type_parse() {
        assert_eq!(EntityType::parse("period"), Some(EntityType::AccountingPeriod));
        assert_eq!(EntityType::parse("exchange-rate"), Some(EntityType::ExchangeRate));
        assert_eq!(EntityType::parse("nope"), None);
        assert_eq!(EntityType::Permission.to_string(), "UserCompanyPermission");
    }

    #[test]
    fn test_create_entry() {
        let data = json!({"code": "HOLD", "name": "Holding"});
        let entry = AuditEntry::create(
            EntityType::EconomicGroup,
            "0b6c1f4e-0000-4000-8000-000000000001",
            Some("Holding".to_string()),
            &data,
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_change_entry_has_diff() {
        let before = json!({"closed": false});
        let after = json!({"closed": true});

        let entry = AuditEntry::change(
            Operation::Close,
            EntityType::AccountingPeriod,
            "p1",
            Some("2025-03".to_string()),
            &before,
            &after,
        )
        .by_user(Some("ana".into()));

        assert_eq!(entry.diff_summary.as_deref(), Some("closed: false -> true"));
        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CLOSE AccountingPeriod p1 (2025-03) by ana"));
    }

    #[test]
    fn test_delete_entry() {
        let data = json!({"code": "USD"});
        let entry = AuditEntry::delete(EntityType::Currency, "c1", None, &data);

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::create(EntityType::Company, "c-1", None, &json!({}));

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"company\""));
        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.entity_type, EntityType::Company);
    }
}
