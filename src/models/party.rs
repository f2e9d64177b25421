//! Customer and supplier models
//!
//! Both are third parties of an economic group with the same shape, so they
//! are generated from one macro and differ only in type, path and label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::economic_group::default_true;
use super::ids::{CustomerId, EconomicGroupId, SupplierId};
use super::resource::{clean_optional, Resource, Validator};
use crate::audit::EntityType;
use crate::error::FieldErrors;

/// Create/update body shared by customers and suppliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyInput {
    pub economic_group_id: EconomicGroupId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl PartyInput {
    pub fn new(
        economic_group_id: EconomicGroupId,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            economic_group_id,
            code: code.into(),
            name: name.into(),
            tax_id: None,
            email: None,
            phone: None,
            is_active: true,
        }
    }
}

fn validate_party(input: &PartyInput) -> FieldErrors {
    let mut v = Validator::new();
    v.required("code", &input.code, 20)
        .required("name", &input.name, 200)
        .optional("taxId", input.tax_id.as_deref(), 30)
        .optional("email", input.email.as_deref(), 150)
        .optional("phone", input.phone.as_deref(), 30);
    if let Some(email) = input.email.as_deref().map(str::trim) {
        v.check(
            "email",
            email.is_empty() || (email.contains('@') && !email.starts_with('@')),
            "must be a valid email address",
        );
    }
    v.finish()
}

macro_rules! define_party {
    ($name:ident, $id:ident, $path:literal, $label:literal, $entity:expr) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub id: $id,
            pub economic_group_id: EconomicGroupId,
            pub code: String,
            pub name: String,
            #[serde(default)]
            pub tax_id: Option<String>,
            #[serde(default)]
            pub email: Option<String>,
            #[serde(default)]
            pub phone: Option<String>,
            pub is_active: bool,
            pub created_at: DateTime<Utc>,
            pub updated_at: DateTime<Utc>,
        }

        impl Resource for $name {
            type Id = $id;
            type Input = PartyInput;

            const PATH: &'static str = $path;
            const LABEL: &'static str = $label;
            const ENTITY: EntityType = $entity;
            const SOFT_DELETE: bool = true;
            const FACETS: &'static [&'static str] = &["economicGroupId", "isActive"];

            fn id(&self) -> Self::Id {
                self.id
            }

            fn new_id() -> Self::Id {
                $id::new()
            }

            fn build(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self {
                let mut party = Self {
                    id,
                    economic_group_id: input.economic_group_id,
                    code: String::new(),
                    name: String::new(),
                    tax_id: None,
                    email: None,
                    phone: None,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                };
                party.apply(input, now);
                party
            }

            fn apply(&mut self, input: Self::Input, now: DateTime<Utc>) {
                self.economic_group_id = input.economic_group_id;
                self.code = input.code.trim().to_uppercase();
                self.name = input.name.trim().to_string();
                self.tax_id = clean_optional(input.tax_id);
                self.email = clean_optional(input.email).map(|e| e.to_lowercase());
                self.phone = clean_optional(input.phone);
                self.is_active = input.is_active;
                self.updated_at = now;
            }

            fn to_input(&self) -> Self::Input {
                PartyInput {
                    economic_group_id: self.economic_group_id,
                    code: self.code.clone(),
                    name: self.name.clone(),
                    tax_id: self.tax_id.clone(),
                    email: self.email.clone(),
                    phone: self.phone.clone(),
                    is_active: self.is_active,
                }
            }

            fn validate(input: &Self::Input) -> FieldErrors {
                validate_party(input)
            }

            fn display_name(&self) -> String {
                self.name.clone()
            }

            fn lookup_key(&self) -> String {
                self.code.clone()
            }

            fn search_text(&self) -> Vec<String> {
                let mut text = vec![self.code.clone(), self.name.clone()];
                text.extend(self.tax_id.clone());
                text.extend(self.email.clone());
                text
            }

            fn facet(&self, key: &str) -> Option<String> {
                match key {
                    "economicGroupId" => Some(self.economic_group_id.to_string()),
                    "isActive" => Some(self.is_active.to_string()),
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
    };
}

define_party!(
    Customer,
    CustomerId,
    "customers",
    "Customer",
    EntityType::Customer
);
define_party!(
    Supplier,
    SupplierId,
    "suppliers",
    "Supplier",
    EntityType::Supplier
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_and_supplier_paths() {
        assert_eq!(Customer::PATH, "customers");
        assert_eq!(Supplier::PATH, "suppliers");
    }

    #[test]
    fn test_email_validation() {
        let mut input = PartyInput::new(EconomicGroupId::new(), "C001", "Globex");
        input.email = Some("not-an-email".into());
        assert!(Customer::validate(&input).contains_key("email"));

        input.email = Some("billing@globex.com".into());
        assert!(Customer::validate(&input).is_empty());
    }

    #[test]
    fn test_soft_delete() {
        let input = PartyInput::new(EconomicGroupId::new(), "s01", "Initech");
        let mut supplier = Supplier::build(SupplierId::new(), input, Utc::now());
        assert_eq!(supplier.code, "S01");

        supplier.deactivate(Utc::now());
        assert!(!supplier.is_active());
        assert_eq!(supplier.facet("isActive").as_deref(), Some("false"));
    }

    #[test]
    fn test_round_trip_through_input() {
        let mut input = PartyInput::new(EconomicGroupId::new(), "C9", "Umbrella");
        input.phone = Some("+57 300 000 0000".into());
        let customer = Customer::build(CustomerId::new(), input, Utc::now());

        let again = customer.to_input();
        assert_eq!(again.phone.as_deref(), Some("+57 300 000 0000"));
        assert_eq!(again.code, "C9");
    }
}
