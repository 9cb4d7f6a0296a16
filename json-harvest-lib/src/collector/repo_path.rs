use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::bail;

/// A GitHub repository, `OWNER/NAME`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoPath {
    owner: String,
    name: String,
}

impl RepoPath {
    /// Parse `OWNER/NAME` or any address ending in `/OWNER/NAME`, such as a repository URL.
    ///
    /// Trailing slashes are ignored and the last two path segments are kept.
    pub fn parse(addr: &str) -> Result<Self> {
        let segments: Vec<_> = addr.trim().trim_end_matches('/').split('/').collect();

        if segments.len() < 2 {
            bail!("expected [https://github.com/]OWNER/NAME, got '{addr}'");
        }

        let owner = segments[segments.len() - 2];
        let name = segments[segments.len() - 1];

        if owner.is_empty() || name.is_empty() {
            bail!("invalid repository address: empty owner or repo name: '{addr}'");
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for RepoPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_name() {
        let repo = RepoPath::parse("tokio-rs/tokio").unwrap();
        assert_eq!(repo.owner(), "tokio-rs");
        assert_eq!(repo.name(), "tokio");
        assert_eq!(repo.to_string(), "tokio-rs/tokio");
    }

    #[test]
    fn test_parse_github_url() {
        let repo = RepoPath::parse("https://github.com/serde-rs/serde").unwrap();
        assert_eq!(repo.to_string(), "serde-rs/serde");
    }

    #[test]
    fn test_parse_trailing_slash() {
        let repo = RepoPath::parse("https://github.com/serde-rs/serde/").unwrap();
        assert_eq!(repo.to_string(), "serde-rs/serde");
    }

    #[test]
    fn test_parse_keeps_last_two_segments() {
        let repo = RepoPath::parse("a/b/c/d").unwrap();
        assert_eq!(repo.owner(), "c");
        assert_eq!(repo.name(), "d");
    }

    #[test]
    fn test_parse_single_segment() {
        let _ = RepoPath::parse("tokio").unwrap_err();
        let _ = RepoPath::parse("tokio/").unwrap_err();
        let _ = RepoPath::parse("").unwrap_err();
    }

    #[test]
    fn test_parse_empty_owner() {
        let _ = RepoPath::parse("/tokio").unwrap_err();
        let _ = RepoPath::parse("https://github.com//tokio").unwrap_err();
    }

    #[test]
    fn test_clone_and_equality() {
        let a = RepoPath::parse("https://github.com/tokio-rs/tokio").unwrap();
        let b = RepoPath::parse("tokio-rs/tokio").unwrap();
        assert_eq!(a, b.clone());
    }
}
