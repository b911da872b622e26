//! Field rules for customer payloads.
//!
//! Each field owns an ordered list of rules. The first rule a field fails
//! yields that field's message; every violated field is reported together.

use std::fmt;

use chrono::NaiveDate;
use models::customer::{EMAIL_MAX_LEN, LEGAL_NAME_MAX_LEN, NAME_MAX_LEN};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::domain::{CustomerDraft, CustomerInput};

// ASCII classes on purpose: `\d` would also accept non-ASCII digits.
static TAX_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}-[0-9]{8}-[0-9]$").expect("tax id pattern"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]{1,64}@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// All field violations found in one payload, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn violations(&self) -> &[FieldViolation] { &self.0 }

    pub fn field(&self, field: &str) -> Option<&FieldViolation> {
        self.0.iter().find(|v| v.field == field)
    }

    fn collect<T>(&mut self, field: &'static str, outcome: Result<T, String>) -> Option<T> {
        match outcome {
            Ok(v) => Some(v),
            Err(message) => {
                self.0.push(FieldViolation { field, message });
                None
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| format!("{}: {}", v.field, v.message)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Required,
    MaxChars(usize),
    Pattern(&'static Lazy<Regex>, &'static str),
    Email,
}

impl Rule {
    fn check(&self, label: &str, value: &str) -> Result<(), String> {
        match *self {
            Rule::Required if value.trim().is_empty() => Err(format!("{label} is required")),
            Rule::MaxChars(max) if value.chars().count() > max => {
                Err(format!("{label} must not exceed {max} characters"))
            }
            Rule::Pattern(re, expected) if !re.is_match(value) => Err(format!("{label} {expected}")),
            Rule::Email if !EMAIL_RE.is_match(value) => Err(format!("{label} must be a valid email address")),
            _ => Ok(()),
        }
    }
}

fn text(label: &str, value: Option<&str>, rules: &[Rule]) -> Result<String, String> {
    let value = value.ok_or_else(|| format!("{label} is required"))?;
    for rule in rules {
        rule.check(label, value)?;
    }
    Ok(value.to_string())
}

fn past_date(label: &str, value: Option<NaiveDate>, today: NaiveDate) -> Result<NaiveDate, String> {
    let value = value.ok_or_else(|| format!("{label} is required"))?;
    if value >= today {
        return Err(format!("{label} must be in the past"));
    }
    Ok(value)
}

/// Validate a wire payload against the customer field rules.
///
/// `today` is the reference date for the birth date rule.
pub fn validate(draft: &CustomerDraft, today: NaiveDate) -> Result<CustomerInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let first_name = errors.collect(
        "firstName",
        text("first name", draft.first_name.as_deref(), &[Rule::Required, Rule::MaxChars(NAME_MAX_LEN)]),
    );
    let last_name = errors.collect(
        "lastName",
        text("last name", draft.last_name.as_deref(), &[Rule::Required, Rule::MaxChars(NAME_MAX_LEN)]),
    );
    let legal_name = errors.collect(
        "legalName",
        text("legal name", draft.legal_name.as_deref(), &[Rule::Required, Rule::MaxChars(LEGAL_NAME_MAX_LEN)]),
    );
    let tax_id = errors.collect(
        "taxId",
        text(
            "tax id",
            draft.tax_id.as_deref(),
            &[Rule::Required, Rule::Pattern(&TAX_ID_RE, "must have format XX-XXXXXXXX-X")],
        ),
    );
    let birth_date = errors.collect("birthDate", past_date("birth date", draft.birth_date, today));
    let mobile_phone = errors.collect(
        "mobilePhone",
        text(
            "mobile phone",
            draft.mobile_phone.as_deref(),
            &[Rule::Required, Rule::Pattern(&PHONE_RE, "must have exactly 10 digits")],
        ),
    );
    let email = errors.collect(
        "email",
        text("email", draft.email.as_deref(), &[Rule::Required, Rule::Email, Rule::MaxChars(EMAIL_MAX_LEN)]),
    );

    match (first_name, last_name, legal_name, tax_id, birth_date, mobile_phone, email) {
        (Some(first_name), Some(last_name), Some(legal_name), Some(tax_id), Some(birth_date), Some(mobile_phone), Some(email))
            if errors.is_empty() =>
        {
            Ok(CustomerInput { first_name, last_name, legal_name, tax_id, birth_date, mobile_phone, email })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 11, 21).unwrap() }

    fn valid_draft() -> CustomerDraft {
        CustomerDraft {
            first_name: Some("Juan".into()),
            last_name: Some("Pérez".into()),
            legal_name: Some("JP Servicios SRL".into()),
            tax_id: Some("20-12345678-9".into()),
            birth_date: NaiveDate::from_ymd_opt(1985, 6, 15),
            mobile_phone: Some("1165874210".into()),
            email: Some("juan.perez@example.com".into()),
        }
    }

    #[test]
    fn accepts_valid_payload_verbatim() {
        let input = validate(&valid_draft(), today()).unwrap();
        assert_eq!(input.tax_id, "20-12345678-9");
        assert_eq!(input.last_name, "Pérez");
        assert_eq!(input.email, "juan.perez@example.com");
    }

    #[test]
    fn empty_payload_reports_every_field_in_order() {
        let errs = validate(&CustomerDraft::default(), today()).unwrap_err();
        let fields: Vec<&str> = errs.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, ["firstName", "lastName", "legalName", "taxId", "birthDate", "mobilePhone", "email"]);
        assert!(errs.violations().iter().all(|v| v.message.ends_with("is required")));
    }

    #[test]
    fn blank_text_is_required_not_too_long() {
        let draft = CustomerDraft { first_name: Some("   ".into()), ..valid_draft() };
        let errs = validate(&draft, today()).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.field("firstName").unwrap().message, "first name is required");
    }

    #[test]
    fn length_limits_count_characters() {
        let ok = CustomerDraft { last_name: Some("ñ".repeat(100)), ..valid_draft() };
        assert!(validate(&ok, today()).is_ok());

        let draft = CustomerDraft {
            last_name: Some("a".repeat(101)),
            legal_name: Some("b".repeat(151)),
            ..valid_draft()
        };
        let errs = validate(&draft, today()).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert_eq!(errs.field("lastName").unwrap().message, "last name must not exceed 100 characters");
        assert_eq!(errs.field("legalName").unwrap().message, "legal name must not exceed 150 characters");
    }

    #[test]
    fn tax_id_must_match_pattern() {
        for bad in ["20123456789", "2-12345678-9", "20-1234567-9", "20-12345678-91", "AB-12345678-9", " 20-12345678-9"] {
            let draft = CustomerDraft { tax_id: Some(bad.into()), ..valid_draft() };
            let errs = validate(&draft, today()).unwrap_err();
            assert_eq!(errs.field("taxId").unwrap().message, "tax id must have format XX-XXXXXXXX-X", "{bad}");
        }
    }

    #[test]
    fn tax_id_rejects_non_ascii_digits() {
        let draft = CustomerDraft { tax_id: Some("٢٠-12345678-9".into()), ..valid_draft() };
        assert!(validate(&draft, today()).unwrap_err().field("taxId").is_some());
    }

    #[test]
    fn phone_needs_exactly_ten_digits() {
        for bad in ["116587421", "11658742100", "11-6587421", "phone12345"] {
            let draft = CustomerDraft { mobile_phone: Some(bad.into()), ..valid_draft() };
            let errs = validate(&draft, today()).unwrap_err();
            assert_eq!(errs.field("mobilePhone").unwrap().message, "mobile phone must have exactly 10 digits");
        }
    }

    #[test]
    fn birth_date_must_be_strictly_past() {
        let draft = CustomerDraft { birth_date: Some(today()), ..valid_draft() };
        let errs = validate(&draft, today()).unwrap_err();
        assert_eq!(errs.field("birthDate").unwrap().message, "birth date must be in the past");

        let draft = CustomerDraft { birth_date: today().pred_opt(), ..valid_draft() };
        assert!(validate(&draft, today()).is_ok());
    }

    #[test]
    fn email_syntax_checked_before_length() {
        let draft = CustomerDraft { email: Some("not-an-email".into()), ..valid_draft() };
        let errs = validate(&draft, today()).unwrap_err();
        assert_eq!(errs.field("email").unwrap().message, "email must be a valid email address");

        let long = format!("{}@{}.{}.com", "a".repeat(60), "b".repeat(45), "c".repeat(45));
        let draft = CustomerDraft { email: Some(long), ..valid_draft() };
        let errs = validate(&draft, today()).unwrap_err();
        assert_eq!(errs.field("email").unwrap().message, "email must not exceed 150 characters");
    }

    #[test]
    fn email_local_part_capped_at_64_chars() {
        let ok = CustomerDraft { email: Some(format!("{}@example.com", "a".repeat(64))), ..valid_draft() };
        assert!(validate(&ok, today()).is_ok());

        let draft = CustomerDraft { email: Some(format!("{}@example.com", "a".repeat(65))), ..valid_draft() };
        let errs = validate(&draft, today()).unwrap_err();
        assert_eq!(errs.field("email").unwrap().message, "email must be a valid email address");
    }

    #[test]
    fn display_joins_messages() {
        let draft = CustomerDraft { tax_id: None, email: None, ..valid_draft() };
        let errs = validate(&draft, today()).unwrap_err();
        assert_eq!(errs.to_string(), "taxId: tax id is required; email: email is required");
    }
}
