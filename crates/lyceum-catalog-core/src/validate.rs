//! Input validation

use std::sync::LazyLock;

use regex::Regex;

use crate::CatalogError;

// Only YouTube links are allowed as lesson videos; links to third-party
// platforms or personal sites are rejected.
static YOUTUBE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?youtube\.com/.+$").expect("static regex compiles")
});

/// Validate a lesson video URL before persistence
pub fn validate_video_url(url: &str) -> Result<(), CatalogError> {
    if YOUTUBE_URL_RE.is_match(url) {
        return Ok(());
    }

    Err(CatalogError::Validation {
        field: "video_url",
        message: "Неверный URL-адрес. Пожалуйста, укажите правильный URL-адрес YouTube. \
                  Нельзя размещать ссылки на сторонние образовательные платформы или личные сайты"
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_youtube_urls() {
        assert!(validate_video_url("https://youtube.com/watch?v=abc").is_ok());
        assert!(validate_video_url("http://www.youtube.com/watch?v=abc").is_ok());
        assert!(validate_video_url("www.youtube.com/shorts/xyz").is_ok());
        assert!(validate_video_url("youtube.com/watch?v=abc").is_ok());
    }

    #[test]
    fn test_rejects_other_hosts() {
        assert!(validate_video_url("https://vimeo.com/12345").is_err());
        assert!(validate_video_url("https://my-site.com/youtube.com/abc").is_err());
        assert!(validate_video_url("https://youtube.org/watch?v=abc").is_err());
    }

    #[test]
    fn test_rejects_bare_host() {
        // The pattern requires a non-empty path after the host
        assert!(validate_video_url("https://youtube.com").is_err());
        assert!(validate_video_url("https://youtube.com/").is_err());
    }

    #[test]
    fn test_validation_error_names_the_field() {
        let err = validate_video_url("https://vimeo.com/1").unwrap_err();
        match err {
            CatalogError::Validation { field, .. } => assert_eq!(field, "video_url"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
