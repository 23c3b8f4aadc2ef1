//! Violation collector: every rule runs, and all failures are reported together.
use crate::errors::{FieldViolation, ServiceError};

#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.0
    }

    /// Required text: absent or blank values are rejected.
    pub fn require_text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            Some(_) => {
                self.push(field, "must not be empty");
                None
            }
            None => {
                self.push(field, "is required");
                None
            }
        }
    }

    /// Optional text that, when supplied, must not be blank.
    pub fn non_blank(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if v.trim().is_empty() => {
                self.push(field, "must not be empty");
                None
            }
            other => other,
        }
    }

    /// Required value parsed from its textual form.
    pub fn require_parsed<T, E>(
        &mut self,
        field: &str,
        value: Option<String>,
        parse: impl FnOnce(&str) -> Result<T, E>,
        expected: &str,
    ) -> Option<T> {
        let raw = self.require_text(field, value)?;
        match parse(raw.trim()) {
            Ok(v) => Some(v),
            Err(_) => {
                self.push(field, format!("must be {expected}"));
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ServiceError> {
        if self.0.is_empty() { Ok(()) } else { Err(ServiceError::Validation(self.0)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_all_violations() {
        let mut v = Violations::new();
        assert!(v.require_text("name", None).is_none());
        assert!(v.require_text("phone", Some("  ".into())).is_none());
        assert!(v.require_parsed("category_id", Some("x".into()), uuid::Uuid::parse_str, "a UUID").is_none());
        match v.finish() {
            Err(ServiceError::Validation(list)) => {
                let fields: Vec<_> = list.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(fields, ["name", "phone", "category_id"]);
                assert_eq!(list[2].message, "must be a UUID");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn optional_blank_text_is_rejected_but_absence_is_fine() {
        let mut v = Violations::new();
        assert_eq!(v.non_blank("location", None), None);
        assert_eq!(v.non_blank("location", Some("Hall A".into())).as_deref(), Some("Hall A"));
        assert!(v.is_empty());
        v.non_blank("location", Some(String::new()));
        assert!(v.finish().is_err());
    }
}
