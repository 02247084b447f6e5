//! Form inputs and their validation rules.
//!
//! Each form is a plain struct deriving [`Validate`]. Handlers call
//! [`check`] to turn a failed validation into a [`FieldErrors`] map, which is
//! shown back to the user next to the submitted values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::types::DbId;

/// Error messages keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Validate `form`, collecting every failure into a [`FieldErrors`] map.
pub fn check<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(|e| field_errors(&e))
}

/// Flatten validator output into `field -> [messages]`.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        out.insert(field.to_string(), messages);
    }
    out
}

/// Append a single error for `field`.
pub fn add_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

// ---------------------------------------------------------------------------
// Custom rules
// ---------------------------------------------------------------------------

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required.".into());
        return Err(err);
    }
    Ok(())
}

fn slug_chars(value: &str) -> Result<(), ValidationError> {
    let ok = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        let mut err = ValidationError::new("invalid_slug");
        err.message =
            Some("Enter a valid slug of letters, numbers, underscores or hyphens.".into());
        return Err(err);
    }
    Ok(())
}

fn username_chars(value: &str) -> Result<(), ValidationError> {
    let ok = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !ok {
        let mut err = ValidationError::new("invalid_username");
        err.message = Some(
            "Enter a valid username of letters, numbers and @/./+/-/_ characters.".into(),
        );
        return Err(err);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Text and group of a new or edited post. The image travels separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[validate(custom(function = "not_blank"))]
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<DbId>,
}

/// A comment on a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "not_blank"))]
    #[serde(default)]
    pub text: String,
}

/// A new group, created from the admin surface.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GroupForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,
    #[validate(custom(function = "slug_chars"))]
    pub slug: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
}

/// Account registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1 to 150 characters."),
        custom(function = "username_chars")
    )]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long."))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_form_requires_text() {
        let form = PostForm {
            text: "   ".into(),
            group: None,
        };
        let errors = check(&form).unwrap_err();
        assert_eq!(errors["text"], vec!["This field is required.".to_string()]);
    }

    #[test]
    fn post_form_accepts_text_without_group() {
        let form = PostForm {
            text: "hello".into(),
            group: None,
        };
        assert!(check(&form).is_ok());
    }

    #[test]
    fn comment_form_requires_text() {
        assert!(check(&CommentForm::default()).is_err());
        assert!(check(&CommentForm { text: "nice".into() }).is_ok());
    }

    #[test]
    fn group_form_rejects_bad_slug_and_long_title() {
        let form = GroupForm {
            title: "x".repeat(201),
            slug: "has space".into(),
            description: "d".into(),
        };
        let errors = check(&form).unwrap_err();
        assert!(errors.contains_key("title"));
        assert!(errors.contains_key("slug"));
        assert!(!errors.contains_key("description"));
    }

    #[test]
    fn signup_form_rules() {
        let ok = SignupForm {
            username: "leo.t+1".into(),
            email: "leo@example.com".into(),
            password: "long-enough".into(),
        };
        assert!(check(&ok).is_ok());

        let bad = SignupForm {
            username: "no spaces".into(),
            email: "nope".into(),
            password: "short".into(),
        };
        let errors = check(&bad).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn add_error_appends() {
        let mut errors = FieldErrors::new();
        add_error(&mut errors, "group", "Select a valid choice.");
        add_error(&mut errors, "group", "Again.");
        assert_eq!(errors["group"].len(), 2);
    }
}
