//! Trusted-origin matching shared by navigation and permission checks.

use url::Url;

use crate::error::{Result, ViewerError};

/// The single origin the viewer trusts.
///
/// Matching is a prefix match on the serialized URL that only succeeds on a
/// component boundary, so `https://pjsekai.world` matches
/// `https://pjsekai.world/songs` but not `https://pjsekai.world.example`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedOrigin {
    url: Url,
    prefix: String,
}

impl TrustedOrigin {
    /// Parses a trusted origin. Only `http` and `https` are accepted.
    pub fn parse(origin: &str) -> Result<Self> {
        let url = Url::parse(origin).map_err(|e| ViewerError::invalid_url(origin, e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ViewerError::config(format!(
                "trusted origin must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(ViewerError::invalid_url(origin, "missing host"));
        }

        let prefix = url.as_str().trim_end_matches('/').to_string();
        Ok(Self { url, prefix })
    }

    /// The home URL (the origin itself).
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolves a path such as `/about` against the origin.
    pub fn join(&self, path: &str) -> Result<Url> {
        self.url
            .join(path)
            .map_err(|e| ViewerError::invalid_url(path, e.to_string()))
    }

    /// Returns true if `candidate` lies under the trusted prefix.
    pub fn matches(&self, candidate: &str) -> bool {
        let Ok(parsed) = Url::parse(candidate) else {
            return false;
        };
        self.matches_url(&parsed)
    }

    /// Same as [`matches`](Self::matches) for an already parsed URL.
    pub fn matches_url(&self, candidate: &Url) -> bool {
        if candidate.origin() != self.url.origin() {
            return false;
        }

        let serialized = candidate.as_str();
        match serialized.strip_prefix(self.prefix.as_str()) {
            Some(rest) => {
                rest.is_empty()
                    || rest.starts_with('/')
                    || rest.starts_with('?')
                    || rest.starts_with('#')
            }
            None => false,
        }
    }
}
