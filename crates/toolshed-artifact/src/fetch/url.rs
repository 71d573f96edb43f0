//! URL construction helpers for repository artifacts

use thiserror::Error;
use url::Url;

/// Directory under the repository base that holds artifacts
pub const TOOLS_SEGMENT: &str = "tools";

/// Appends path segments to `base`, keeping its existing path
///
/// A trailing slash on `base` does not produce an empty segment, so
/// `https://h/root` and `https://h/root/` join to the same URL. Each segment is
/// percent-encoded individually.
///
/// # Errors
///
/// Returns error if `base` cannot be a base (e.g. `mailto:`)
pub fn join_segments<'a, I>(base: &Url, segments: I) -> Result<Url, UrlError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase { url: base.clone() })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Builds `<base>/tools/<name>`
///
/// `name` may contain `/` separators (`mysql/defaults.yaml`); each part becomes
/// its own segment.
pub fn artifact_url(base: &Url, name: &str) -> Result<Url, UrlError> {
    join_segments(
        base,
        std::iter::once(TOOLS_SEGMENT).chain(name.split('/').filter(|s| !s.is_empty())),
    )
}

/// URL construction errors
#[derive(Debug, Error)]
pub enum UrlError {
    /// URL cannot be used as a base
    #[error("URL cannot be a base: {url}")]
    CannotBeABase {
        /// The problematic URL
        url: Url,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_artifact_url_at_host_root() {
        let joined = artifact_url(&url("https://tools.example.com"), "pt-query-digest").unwrap();
        assert_eq!(joined.as_str(), "https://tools.example.com/tools/pt-query-digest");
    }

    #[test]
    fn test_artifact_url_keeps_base_path() {
        let expected = "https://tools.example.com/toolshed/tools/defaults.yaml";
        let without_slash = artifact_url(&url("https://tools.example.com/toolshed"), "defaults.yaml");
        let with_slash = artifact_url(&url("https://tools.example.com/toolshed/"), "defaults.yaml");
        assert_eq!(without_slash.unwrap().as_str(), expected);
        assert_eq!(with_slash.unwrap().as_str(), expected);
    }

    #[test]
    fn test_artifact_url_nested_name() {
        let joined = artifact_url(&url("https://h/"), "mysql/defaults.yaml").unwrap();
        assert_eq!(joined.as_str(), "https://h/tools/mysql/defaults.yaml");
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let joined = join_segments(&url("https://h/"), ["a b", "c?d"]).unwrap();
        assert_eq!(joined.as_str(), "https://h/a%20b/c%3Fd");
    }

    #[test]
    fn test_cannot_be_a_base() {
        let err = artifact_url(&url("mailto:ops@example.com"), "x").unwrap_err();
        assert!(matches!(err, UrlError::CannotBeABase { .. }));
    }
}
