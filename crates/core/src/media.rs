//! Uploaded post images.
//!
//! Images are stored below `<media_root>/posts/` and referenced from the post
//! row by their media-relative path, e.g. `posts/small.gif`.

use image::ImageFormat;

/// Sub-directory of the media root that holds post images.
pub const POST_IMAGE_DIR: &str = "posts";

/// File extensions accepted for post images (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpg", "jpeg", "png", "webp"];

/// Reduce an uploaded filename to a safe basename.
///
/// Directory components are dropped, and characters outside
/// `[A-Za-z0-9._-]` become `_`. Returns `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Lowercased extension of `filename`, if any.
pub fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether `filename` carries an accepted image extension.
pub fn is_image_filename(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether `bytes` start with the signature of an accepted image format.
///
/// Only the header is inspected; nothing is decoded.
pub fn looks_like_image(bytes: &[u8]) -> bool {
    matches!(
        image::guess_format(bytes),
        Ok(ImageFormat::Gif | ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP)
    )
}

/// Media-relative path for an image, e.g. `posts/small.gif`.
pub fn post_image_path(filename: &str) -> String {
    format!("{POST_IMAGE_DIR}/{filename}")
}

/// Names to try for `filename`, in order: the name itself, then `_1`, `_2`,
/// ... inserted before the extension. Endless; the caller stops at the first
/// name it manages to claim.
pub fn name_candidates(filename: &str) -> impl Iterator<Item = String> + '_ {
    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
        _ => (filename, String::new()),
    };
    std::iter::once(filename.to_string())
        .chain((1u32..).map(move |n| format!("{stem}_{n}{ext}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(
            sanitize_filename("../../etc/passwd.png").as_deref(),
            Some("passwd.png")
        );
        assert_eq!(
            sanitize_filename("C:\\photos\\cat.jpg").as_deref(),
            Some("cat.jpg")
        );
    }

    #[test]
    fn sanitize_replaces_odd_characters() {
        assert_eq!(
            sanitize_filename("my cat (1).png").as_deref(),
            Some("my_cat__1_.png")
        );
    }

    #[test]
    fn sanitize_rejects_empty_names() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename("dir/"), None);
    }

    #[test]
    fn image_extensions() {
        assert!(is_image_filename("small.gif"));
        assert!(is_image_filename("PHOTO.JPG"));
        assert!(!is_image_filename("notes.txt"));
        assert!(!is_image_filename("gif"));
        assert!(!is_image_filename(".png"));
    }

    /// 2x1 GIF used across the test suite.
    const SMALL_GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
        0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C,
        0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00,
        0x3B,
    ];

    #[test]
    fn sniffs_image_headers() {
        assert!(looks_like_image(SMALL_GIF));
        assert!(looks_like_image(b"\x89PNG\r\n\x1a\n rest"));
        assert!(!looks_like_image(b"plain text, not an image"));
        assert!(!looks_like_image(b""));
    }

    #[test]
    fn relative_path() {
        assert_eq!(post_image_path("small.gif"), "posts/small.gif");
    }

    #[test]
    fn candidates_number_before_the_extension() {
        let names: Vec<_> = name_candidates("a.png").take(3).collect();
        assert_eq!(names, ["a.png", "a_1.png", "a_2.png"]);

        let bare: Vec<_> = name_candidates("README").take(2).collect();
        assert_eq!(bare, ["README", "README_1"]);
    }
}
