use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw create/update payload as received on the wire.
///
/// Every field is optional so that a missing value is reported as a field
/// violation by [`super::validation::validate`] rather than failing
/// deserialization outright.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub legal_name: Option<String>,
    pub tax_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub mobile_phone: Option<String>,
    pub email: Option<String>,
}

/// A candidate record whose fields have passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    pub tax_id: String,
    pub birth_date: NaiveDate,
    pub mobile_phone: String,
    pub email: String,
}

impl CustomerInput {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        legal_name: impl Into<String>,
        tax_id: impl Into<String>,
        birth_date: NaiveDate,
        mobile_phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            legal_name: legal_name.into(),
            tax_id: tax_id.into(),
            birth_date,
            mobile_phone: mobile_phone.into(),
            email: email.into(),
        }
    }
}

/// Canonical stored representation returned after every read or write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    pub tax_id: String,
    pub birth_date: NaiveDate,
    pub mobile_phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Build a freshly persisted record; both timestamps start at `now`.
    pub fn from_input(id: Uuid, input: CustomerInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            legal_name: input.legal_name,
            tax_id: input.tax_id,
            birth_date: input.birth_date,
            mobile_phone: input.mobile_phone,
            email: input.email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field. `id` and both timestamps are untouched;
    /// the store refreshes `updated_at` when it persists the change.
    pub fn apply(&mut self, input: CustomerInput) {
        self.first_name = input.first_name;
        self.last_name = input.last_name;
        self.legal_name = input.legal_name;
        self.tax_id = input.tax_id;
        self.birth_date = input.birth_date;
        self.mobile_phone = input.mobile_phone;
        self.email = input.email;
    }
}

/// Fields that must be unique across all customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UniqueField {
    TaxId,
    Email,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::TaxId => "taxId",
            UniqueField::Email => "email",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_deserializes_camel_case_and_tolerates_missing_fields() {
        let draft: CustomerDraft = serde_json::from_str(
            r#"{"firstName":"Juan","taxId":"20-12345678-9","birthDate":"1985-06-15"}"#,
        )
        .unwrap();
        assert_eq!(draft.first_name.as_deref(), Some("Juan"));
        assert_eq!(draft.tax_id.as_deref(), Some("20-12345678-9"));
        assert_eq!(draft.birth_date, NaiveDate::from_ymd_opt(1985, 6, 15));
        assert!(draft.email.is_none());
    }

    #[test]
    fn apply_keeps_identity_and_timestamps() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let input = CustomerInput::new(
            "Juan", "Pérez", "JP Servicios SRL", "20-12345678-9",
            NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(), "1165874210", "juan@example.com",
        );
        let mut c = Customer::from_input(id, input.clone(), now);
        assert_eq!(c.created_at, c.updated_at);

        c.apply(CustomerInput { mobile_phone: "1100000000".into(), ..input });
        assert_eq!(c.id, id);
        assert_eq!(c.created_at, now);
        assert_eq!(c.mobile_phone, "1100000000");
    }

    #[test]
    fn customer_serializes_with_wire_names() {
        let input = CustomerInput::new(
            "Ana", "Gómez", "AG SA", "27-87654321-4",
            NaiveDate::from_ymd_opt(1990, 1, 2).unwrap(), "1123456789", "ana@example.com",
        );
        let c = Customer::from_input(Uuid::nil(), input, Utc::now());
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["taxId"], "27-87654321-4");
        assert_eq!(v["birthDate"], "1990-01-02");
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_some());
    }
}
