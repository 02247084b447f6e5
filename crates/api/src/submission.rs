//! Post form submissions.
//!
//! The create and edit pages accept either `multipart/form-data` (needed for
//! image uploads) or `application/x-www-form-urlencoded`. [`PostSubmission`]
//! reads both into the same shape; [`PostSubmission::bind`] then turns the raw
//! fields into a [`PostForm`] plus per-field errors.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use quill_core::forms::{self, add_error, FieldErrors, PostForm};
use quill_core::media::{is_image_filename, looks_like_image, sanitize_filename};
use quill_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// An uploaded file as received.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Raw fields of a post form.
#[derive(Debug, Clone, Default)]
pub struct PostSubmission {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<UploadedFile>,
}

/// A validated-or-not post form ready for the handler.
#[derive(Debug, Clone)]
pub struct BoundPost {
    pub form: PostForm,
    /// The accepted image with its sanitized filename.
    pub image: Option<UploadedFile>,
    pub errors: FieldErrors,
}

impl BoundPost {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl PostSubmission {
    /// Parse and validate every field. Group existence is checked by the
    /// caller since it needs the database.
    pub fn bind(self) -> BoundPost {
        let mut errors = FieldErrors::new();

        let group = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<DbId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    add_error(&mut errors, "group", INVALID_CHOICE);
                    None
                }
            },
        };

        let form = PostForm {
            text: self.text,
            group,
        };
        if let Err(field_errors) = forms::check(&form) {
            for (field, messages) in field_errors {
                errors.entry(field).or_default().extend(messages);
            }
        }

        let image = match self.image {
            None => None,
            Some(file) => match accept_image(file) {
                Ok(file) => Some(file),
                Err(message) => {
                    add_error(&mut errors, "image", message);
                    None
                }
            },
        };

        BoundPost {
            form,
            image,
            errors,
        }
    }
}

fn accept_image(file: UploadedFile) -> Result<UploadedFile, &'static str> {
    let filename = sanitize_filename(&file.filename).ok_or(INVALID_IMAGE)?;
    if !is_image_filename(&filename) || !looks_like_image(&file.bytes) {
        return Err(INVALID_IMAGE);
    }
    Ok(UploadedFile {
        filename,
        bytes: file.bytes,
    })
}

impl FromRequest<AppState> for PostSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let mut submission = PostSubmission::default();
            for (name, value) in pairs {
                submission.set_text_field(&name, value);
            }
            return Ok(submission);
        }

        // No body at all: an empty form.
        Ok(PostSubmission::default())
    }
}

impl PostSubmission {
    fn set_text_field(&mut self, name: &str, value: String) {
        match name {
            "text" => self.text = value,
            "group" => self.group = Some(value),
            _ => {}
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostSubmission, AppError> {
    let mut submission = PostSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "image" {
            let filename = field.file_name().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            // Browsers send an empty part when no file was picked.
            if filename.is_empty() && bytes.is_empty() {
                continue;
            }
            submission.image = Some(UploadedFile { filename, bytes });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            submission.set_text_field(&name, value);
        }
    }

    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
        0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C,
        0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00,
        0x3B,
    ];

    fn submission(text: &str, group: Option<&str>) -> PostSubmission {
        PostSubmission {
            text: text.into(),
            group: group.map(Into::into),
            image: None,
        }
    }

    #[test]
    fn empty_group_means_no_group() {
        let bound = submission("hello", Some("")).bind();
        assert!(bound.is_valid());
        assert_eq!(bound.form.group, None);
    }

    #[test]
    fn numeric_group_is_parsed() {
        let bound = submission("hello", Some(" 7 ")).bind();
        assert!(bound.is_valid());
        assert_eq!(bound.form.group, Some(7));
    }

    #[test]
    fn garbage_group_is_a_field_error() {
        let bound = submission("hello", Some("abc")).bind();
        assert_eq!(bound.errors["group"], vec![INVALID_CHOICE.to_string()]);
    }

    #[test]
    fn blank_text_is_a_field_error() {
        let bound = submission("  ", None).bind();
        assert!(bound.errors.contains_key("text"));
    }

    #[test]
    fn image_is_sanitized_and_accepted() {
        let mut raw = submission("pic", None);
        raw.image = Some(UploadedFile {
            filename: "../small.gif".into(),
            bytes: Bytes::from_static(SMALL_GIF),
        });
        let bound = raw.bind();
        assert!(bound.is_valid());
        assert_eq!(bound.image.unwrap().filename, "small.gif");
    }

    #[test]
    fn non_image_upload_is_rejected() {
        let mut raw = submission("pic", None);
        raw.image = Some(UploadedFile {
            filename: "notes.txt".into(),
            bytes: Bytes::from_static(b"hello"),
        });
        let bound = raw.bind();
        assert_eq!(bound.errors["image"], vec![INVALID_IMAGE.to_string()]);
        assert!(bound.image.is_none());

        let mut disguised = submission("pic", None);
        disguised.image = Some(UploadedFile {
            filename: "fake.png".into(),
            bytes: Bytes::from_static(b"not really a png"),
        });
        assert!(disguised.bind().errors.contains_key("image"));
    }
}
