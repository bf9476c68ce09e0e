//! Reusable payload validators
//!
//! Write-endpoint bodies are validated field by field before any typed
//! deserialization. Each rule inspects one field's `serde_json::Value` and
//! reports a human-readable reason; [`PayloadRules`] runs a rule set over a
//! body and accumulates every failure into the per-field error map used by
//! the `400` envelope.
//!
//! Rules only fire on values of the type they understand: a length rule
//! passes over a missing or non-string value and leaves the complaint to the
//! `required` rule, so a single missing field produces a single message.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::core::error::{ApiError, FieldErrors};

/// One validation rule over a single field value
pub type Rule = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Rule: field must be present and non-null
pub fn required() -> Rule {
    Box::new(|_: &str, value: &Value| {
        if value.is_null() {
            Err("Missing data for required field.".to_string())
        } else {
            Ok(())
        }
    })
}

/// Rule: value must be a string
pub fn text() -> Rule {
    Box::new(|_: &str, value: &Value| {
        if value.is_null() || value.is_string() {
            Ok(())
        } else {
            Err("Not a valid string.".to_string())
        }
    })
}

/// Rule: string length must be within `[min, max]`
pub fn length(min: usize, max: usize) -> Rule {
    Box::new(move |_: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if s.len() < min || s.len() > max {
                return Err(format!("Length must be between {min} and {max}."));
            }
        }
        Ok(())
    })
}

/// Rule: value must be an integer
pub fn integer() -> Rule {
    Box::new(|_: &str, value: &Value| {
        if value.is_null() || value.is_i64() || value.is_u64() {
            Ok(())
        } else {
            Err("Not a valid integer.".to_string())
        }
    })
}

/// Rule: integer must be strictly positive
pub fn positive() -> Rule {
    Box::new(|_: &str, value: &Value| {
        if let Some(n) = value.as_i64() {
            if n <= 0 {
                return Err("Must be greater than 0.".to_string());
            }
        }
        Ok(())
    })
}

/// Rule: integer must have exactly `n` decimal digits (e.g. a 13-digit ISBN)
pub fn digits(n: u32) -> Rule {
    Box::new(move |_: &str, value: &Value| {
        if let Some(num) = value.as_i64() {
            let lower = 10_i64.pow(n - 1);
            let upper = 10_i64.pow(n);
            if num < lower || num >= upper {
                return Err(format!("Must have exactly {n} digits."));
            }
        }
        Ok(())
    })
}

/// Rule: string must look like an email address
pub fn email() -> Rule {
    Box::new(|_: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if !email_regex().is_match(s) {
                return Err("Not a valid email address.".to_string());
            }
        }
        Ok(())
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
    })
}

/// Rule: string must parse as a date in the given chrono format
pub fn date(format: &'static str) -> Rule {
    Box::new(move |_: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if chrono::NaiveDate::parse_from_str(s, format).is_err() {
                return Err("Not a valid date.".to_string());
            }
        }
        Ok(())
    })
}

/// A rule set for one payload shape
#[derive(Default)]
pub struct PayloadRules {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl PayloadRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach rules to a field; order of attachment is the reporting order
    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push((name, rules));
        self
    }

    /// Run every rule over `body`, collecting all failures
    ///
    /// A field absent from the body is treated as `null`, which trips the
    /// `required` rule and silently passes the type-specific ones.
    pub fn validate(&self, body: &Value) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();

        for (name, rules) in &self.fields {
            let value = body.get(name).unwrap_or(&Value::Null);
            for rule in rules {
                if let Err(message) = rule(name, value) {
                    errors.entry(name.to_string()).or_default().push(message);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules() -> PayloadRules {
        PayloadRules::new()
            .field("username", vec![required(), text()])
            .field("password", vec![required(), text(), length(6, 255)])
            .field("email", vec![required(), text(), email()])
    }

    fn errors_of(result: Result<(), ApiError>) -> FieldErrors {
        match result.unwrap_err() {
            ApiError::Validation(map) => map,
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        let body = json!({
            "username": "test",
            "password": "123456",
            "email": "test@gmail.com"
        });
        assert!(rules().validate(&body).is_ok());
    }

    #[test]
    fn test_missing_field_reports_required_only() {
        let body = json!({"username": "test", "password": "123456"});
        let errors = errors_of(rules().validate(&body));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["email"], vec!["Missing data for required field."]);
    }

    #[test]
    fn test_short_password_reports_length() {
        let body = json!({
            "username": "test",
            "password": "0308",
            "email": "test@gmail.com"
        });
        let errors = errors_of(rules().validate(&body));
        assert_eq!(errors["password"], vec!["Length must be between 6 and 255."]);
    }

    #[test]
    fn test_invalid_email_reports_format() {
        let body = json!({
            "username": "test",
            "password": "123456",
            "email": "not-an-email"
        });
        let errors = errors_of(rules().validate(&body));
        assert_eq!(errors["email"], vec!["Not a valid email address."]);
    }

    #[test]
    fn test_multiple_failures_accumulate() {
        let body = json!({"password": "0308"});
        let errors = errors_of(rules().validate(&body));
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("password"));
        assert!(errors.contains_key("email"));
    }

    #[test]
    fn test_wrong_type_reports_type_not_length() {
        let body = json!({
            "username": 42,
            "password": "123456",
            "email": "test@gmail.com"
        });
        let errors = errors_of(rules().validate(&body));
        assert_eq!(errors["username"], vec!["Not a valid string."]);
    }

    #[test]
    fn test_date_rule() {
        let rules = PayloadRules::new().field("birth_date", vec![required(), date("%d-%m-%Y")]);
        assert!(rules.validate(&json!({"birth_date": "03-08-1998"})).is_ok());
        let errors = errors_of(rules.validate(&json!({"birth_date": "1998-08-03"})));
        assert_eq!(errors["birth_date"], vec!["Not a valid date."]);
    }

    #[test]
    fn test_digits_rule() {
        let rules = PayloadRules::new().field("isbn", vec![required(), integer(), digits(13)]);
        assert!(rules.validate(&json!({"isbn": 9789985324530_i64})).is_ok());
        let errors = errors_of(rules.validate(&json!({"isbn": 12345})));
        assert_eq!(errors["isbn"], vec!["Must have exactly 13 digits."]);
    }

    #[test]
    fn test_positive_rule() {
        let rules = PayloadRules::new().field("number_of_pages", vec![integer(), positive()]);
        let errors = errors_of(rules.validate(&json!({"number_of_pages": 0})));
        assert_eq!(errors["number_of_pages"], vec!["Must be greater than 0."]);
    }
}
