//! Field rules evaluated as a whole.
//!
//! Types implement [`Validate`] by listing their rules against a [`Rules`]
//! collector in field order. Nothing short-circuits: every failing field is
//! reported, in document order, with its full path.

use crate::codec::LetterAddressPolicy;
use crate::types::{Personalisation, Timestamp};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Phone numbers: digits, `+` and parentheses only.
pub static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+()]+$").expect("valid phone number pattern"));

pub static EMAIL_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email address pattern"));

/// Personalisation keys a letter needs to be addressable.
pub const REQUIRED_ADDRESS_LINES: [&str; 3] = ["address_line_1", "address_line_2", "address_line_3"];

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path, e.g. `template.uri` or `notifications[3].phone_number`
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every failed rule of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.path.as_str()).collect()
    }

    /// True if any violation sits at `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.0.iter().any(|v| v.path == path)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for Violations {}

impl From<Vec<Violation>> for Violations {
    fn from(v: Vec<Violation>) -> Self {
        Self(v)
    }
}

/// Values that map unrecognised wire strings to an `Unknown` fallback.
pub trait KnownValue {
    /// The raw wire value when it was not recognised.
    fn unknown_value(&self) -> Option<&str>;
}

/// Implemented by every request and response model.
pub trait Validate {
    fn validate(&self, rules: &mut Rules);
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self, rules: &mut Rules) {
        for (i, item) in self.iter().enumerate() {
            rules.indexed(i, item);
        }
    }
}

/// Collector for one validation pass.
#[derive(Debug)]
pub struct Rules {
    base: String,
    violations: Vec<Violation>,
    warnings: Vec<Violation>,
    letter_address: LetterAddressPolicy,
}

impl Rules {
    pub fn new(letter_address: LetterAddressPolicy) -> Self {
        Self {
            base: String::new(),
            violations: Vec::new(),
            warnings: Vec::new(),
            letter_address,
        }
    }

    fn path(&self, field: &str) -> String {
        match (self.base.is_empty(), field.is_empty()) {
            (true, _) => field.to_string(),
            (false, true) => self.base.clone(),
            (false, false) => format!("{}.{}", self.base, field),
        }
    }

    /// Record `message` at `field` unless `ok`.
    pub fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) {
        if !ok {
            let path = self.path(field);
            self.violations.push(Violation {
                path,
                message: message.into(),
            });
        }
    }

    /// Record a non-fatal finding at `field`.
    pub fn warn(&mut self, field: &str, message: impl Into<String>) {
        let path = self.path(field);
        self.warnings.push(Violation {
            path,
            message: message.into(),
        });
    }

    pub fn non_empty(&mut self, field: &str, value: &str) {
        self.check(field, !value.trim().is_empty(), "must not be empty");
    }

    /// Optional, but not blank when given.
    pub fn non_empty_if_present(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.non_empty(field, v);
        }
    }

    pub fn matches(&mut self, field: &str, value: &str, pattern: &Regex, message: &str) {
        if value.trim().is_empty() {
            self.check(field, false, "must not be empty");
        } else {
            self.check(field, pattern.is_match(value), message);
        }
    }

    pub fn non_negative(&mut self, field: &str, value: i64) {
        self.check(field, value >= 0, format!("must be >= 0, got {}", value));
    }

    pub fn non_negative_f64(&mut self, field: &str, value: f64) {
        self.check(
            field,
            value.is_finite() && value >= 0.0,
            format!("must be a non-negative number, got {}", value),
        );
    }

    pub fn timestamp(&mut self, field: &str, value: &Timestamp) {
        self.check(
            field,
            value.is_offset_aware(),
            format!("'{}' is not an offset-aware ISO-8601 timestamp", value),
        );
    }

    pub fn timestamp_if_present(&mut self, field: &str, value: Option<&Timestamp>) {
        if let Some(ts) = value {
            self.timestamp(field, ts);
        }
    }

    /// Unrecognised enum values are kept but reported as warnings.
    pub fn known<E: KnownValue>(&mut self, field: &str, value: &E) {
        if let Some(raw) = value.unknown_value() {
            self.warn(field, format!("unrecognised value '{}'", raw));
        }
    }

    /// A letter needs the first three address lines to be present and
    /// non-blank. Under [`LetterAddressPolicy::Warn`] a shortfall is only
    /// a warning.
    pub fn address_lines(&mut self, field: &str, personalisation: &Personalisation) {
        for key in REQUIRED_ADDRESS_LINES {
            let present = personalisation
                .get(key)
                .map(|v| match v {
                    serde_json::Value::Null => false,
                    serde_json::Value::String(s) => !s.trim().is_empty(),
                    _ => true,
                })
                .unwrap_or(false);
            if present {
                continue;
            }
            let sub = format!("{}.{}", field, key);
            let message = "letters need at least three address lines";
            match self.letter_address {
                LetterAddressPolicy::Require => self.check(&sub, false, message),
                LetterAddressPolicy::Warn => self.warn(&sub, message),
            }
        }
    }

    /// Validate a nested value under `field`.
    pub fn nested<T: Validate + ?Sized>(&mut self, field: &str, value: &T) {
        let inner = self.path(field);
        let saved = std::mem::replace(&mut self.base, inner);
        value.validate(self);
        self.base = saved;
    }

    pub fn nested_if_present<T: Validate>(&mut self, field: &str, value: Option<&T>) {
        if let Some(v) = value {
            self.nested(field, v);
        }
    }

    fn indexed<T: Validate>(&mut self, index: usize, value: &T) {
        let inner = format!("{}[{}]", self.base, index);
        let saved = std::mem::replace(&mut self.base, inner);
        value.validate(self);
        self.base = saved;
    }

    /// Consume the collector: violations (if any) plus warnings.
    pub fn finish(self) -> (Result<(), Violations>, Vec<Violation>) {
        let outcome = if self.violations.is_empty() {
            Ok(())
        } else {
            Err(Violations(self.violations))
        };
        (outcome, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Inner {
        count: i64,
        phone: String,
    }

    impl Validate for Inner {
        fn validate(&self, rules: &mut Rules) {
            rules.non_negative("count", self.count);
            rules.matches("phone", &self.phone, &PHONE_NUMBER, "must contain only 0-9, + and ()");
        }
    }

    struct Outer {
        name: String,
        inner: Inner,
        items: Vec<Inner>,
    }

    impl Validate for Outer {
        fn validate(&self, rules: &mut Rules) {
            rules.non_empty("name", &self.name);
            rules.nested("inner", &self.inner);
            rules.nested("items", &self.items);
        }
    }

    fn run<T: Validate>(value: &T, policy: LetterAddressPolicy) -> (Result<(), Violations>, Vec<Violation>) {
        let mut rules = Rules::new(policy);
        value.validate(&mut rules);
        rules.finish()
    }

    #[test]
    fn collects_every_failure_in_document_order() {
        let value = Outer {
            name: " ".into(),
            inner: Inner {
                count: -1,
                phone: "+44 (0)7".into(),
            },
            items: vec![
                Inner {
                    count: 1,
                    phone: "07700900000".into(),
                },
                Inner {
                    count: -2,
                    phone: "abc".into(),
                },
            ],
        };
        let (outcome, warnings) = run(&value, LetterAddressPolicy::Require);
        let violations = outcome.unwrap_err();
        assert_eq!(
            violations.paths(),
            vec![
                "name",
                "inner.count",
                "inner.phone",
                "items[1].count",
                "items[1].phone"
            ]
        );
        assert!(warnings.is_empty());
        assert!(violations.to_string().starts_with("name: must not be empty; inner.count: must be >= 0"));
    }

    #[test]
    fn valid_value_passes() {
        let value = Inner {
            count: 0,
            phone: "+(44)7700900000".into(),
        };
        let (outcome, _) = run(&value, LetterAddressPolicy::Require);
        assert!(outcome.is_ok());
    }

    struct Letter(Personalisation);

    impl Validate for Letter {
        fn validate(&self, rules: &mut Rules) {
            rules.address_lines("personalisation", &self.0);
        }
    }

    fn letter(value: serde_json::Value) -> Letter {
        Letter(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn address_lines_required_by_default() {
        let value = letter(json!({"address_line_1": "A", "address_line_3": "C"}));
        let (outcome, _) = run(&value, LetterAddressPolicy::Require);
        let violations = outcome.unwrap_err();
        assert_eq!(violations.paths(), vec!["personalisation.address_line_2"]);
    }

    #[test]
    fn address_lines_downgraded_to_warning() {
        let value = letter(json!({"address_line_1": "A", "address_line_2": ""}));
        let (outcome, warnings) = run(&value, LetterAddressPolicy::Warn);
        assert!(outcome.is_ok());
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].path, "personalisation.address_line_2");
    }
}
