use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

/// A single validation failure keyed by the field path it belongs to.
///
/// An empty key marks a model-level error that is not tied to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub key: String,
    pub message: String,
}

impl FieldError {
    pub fn render(&self) -> String {
        if self.key.is_empty() {
            self.message.clone()
        } else {
            format!("{}: {}", self.key, self.message)
        }
    }
}

/// Ordered collection of validation errors gathered while handling a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelState {
    errors: Vec<FieldError>,
}

impl ModelState {
    pub fn add_model_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            key: key.into(),
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn merge(&mut self, other: ModelState) {
        self.errors.extend(other.errors);
    }

    /// Flatten into the human-readable messages carried by the envelope
    pub fn into_messages(self) -> Vec<String> {
        self.errors.iter().map(FieldError::render).collect()
    }
}

impl From<ValidationErrors> for ModelState {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        // HashMap order is unstable; keep responses deterministic
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut state = ModelState::default();
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' validation", error.code));
                state.add_model_error(field.to_string(), message);
            }
        }
        state
    }
}

/// Rejects strings that are empty or only whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 3, message = "Too long"))]
        name: String,
        #[validate(range(min = 1))]
        count: i32,
    }

    #[test]
    fn test_model_level_error_renders_bare_message() {
        let mut state = ModelState::default();
        state.add_model_error("", "Villa Already Exists!");
        assert!(!state.is_valid());
        assert_eq!(state.into_messages(), vec!["Villa Already Exists!"]);
    }

    #[test]
    fn test_field_error_renders_with_key() {
        let mut state = ModelState::default();
        state.add_model_error("/occupancy", "The value 'x' is invalid");
        assert_eq!(
            state.into_messages(),
            vec!["/occupancy: The value 'x' is invalid"]
        );
    }

    #[test]
    fn test_from_validation_errors_is_sorted_and_keyed() {
        let sample = Sample {
            name: "abcd".to_string(),
            count: 0,
        };
        let errors = sample.validate().unwrap_err();
        let state = ModelState::from(errors);

        let keys: Vec<&str> = state.errors().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["count", "name"]);
        assert_eq!(state.errors()[0].message, "failed 'range' validation");
        assert_eq!(state.errors()[1].message, "Too long");
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Pool View").is_ok());
        assert!(validate_not_blank("").is_err());
        let error = validate_not_blank(" \t ").unwrap_err();
        assert_eq!(error.code, "blank");
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut first = ModelState::default();
        first.add_model_error("a", "one");
        let mut second = ModelState::default();
        second.add_model_error("b", "two");
        first.merge(second);
        assert_eq!(first.into_messages(), vec!["a: one", "b: two"]);
    }
}
