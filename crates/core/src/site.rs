//! Site-wide constants and canonical paths.
//!
//! Handlers redirect with these helpers so every redirect target is built
//! in one place.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Number of posts shown on every paginated listing.
pub const POSTS_PER_PAGE: i64 = 10;

/// How long the index page stays in the response cache, in seconds.
pub const INDEX_CACHE_SECS: u64 = 20;

/// Where unauthenticated visitors of login-only pages are sent.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Feed of posts by followed authors.
pub const FOLLOW_INDEX_PATH: &str = "/follow/";

/// `/profile/{username}/`
pub fn profile_path(username: &str) -> String {
    format!("/profile/{username}/")
}

/// `/posts/{id}/`
pub fn post_detail_path(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

/// Bytes escaped in a `next` value: all but unreserved characters and `/`.
const NEXT_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Login redirect that remembers where the visitor was going.
///
/// The target is percent-encoded so it cannot break out of the query string.
pub fn login_redirect(next: &str) -> String {
    format!("{LOGIN_PATH}?next={}", utf8_percent_encode(next, NEXT_PARAM))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_have_trailing_slash() {
        assert_eq!(profile_path("leo"), "/profile/leo/");
        assert_eq!(post_detail_path(7), "/posts/7/");
    }

    #[test]
    fn login_redirect_keeps_plain_paths() {
        assert_eq!(login_redirect("/create/"), "/auth/login/?next=/create/");
    }

    #[test]
    fn login_redirect_encodes_query_characters() {
        assert_eq!(
            login_redirect("/follow/?page=2"),
            "/auth/login/?next=/follow/%3Fpage%3D2"
        );
    }

    #[test]
    fn login_redirect_encodes_separators_and_non_ascii() {
        assert_eq!(
            login_redirect("/a b&c=d#e"),
            "/auth/login/?next=/a%20b%26c%3Dd%23e"
        );
        assert_eq!(
            login_redirect("/profile/l\u{e9}o/"),
            "/auth/login/?next=/profile/l%C3%A9o/"
        );
        assert_eq!(login_redirect("/x-y_z.~/"), "/auth/login/?next=/x-y_z.~/");
    }
}
