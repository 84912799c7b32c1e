use regex::Regex;

use crate::error::CompareError;

/// Predicate selecting which identities take part in a comparison. Applied
/// before decomposition and matching.
#[derive(Debug, Clone)]
pub enum IdentityFilter {
    /// Unanchored regular-expression search.
    Regex(Regex),
    /// Literal substring containment.
    Substring(String),
}

impl IdentityFilter {
    /// Compile `pattern` as a regular expression.
    pub fn regex(pattern: &str) -> Result<Self, CompareError> {
        Ok(IdentityFilter::Regex(Regex::new(pattern)?))
    }

    /// Match `needle` literally.
    pub fn substring(needle: impl Into<String>) -> Self {
        IdentityFilter::Substring(needle.into())
    }

    /// Build a filter from an optional user pattern. Blank patterns mean
    /// "no filter".
    pub fn from_pattern(pattern: Option<&str>, literal: bool) -> Result<Option<Self>, CompareError> {
        let Some(pattern) = pattern.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        if literal {
            Ok(Some(Self::substring(pattern)))
        } else {
            Self::regex(pattern).map(Some)
        }
    }

    /// Whether `identity` passes the filter.
    pub fn matches(&self, identity: &str) -> bool {
        match self {
            IdentityFilter::Regex(re) => re.is_match(identity),
            IdentityFilter::Substring(needle) => identity.contains(needle.as_str()),
        }
    }
}

/// `true` when there is no filter or `identity` passes it.
pub(crate) fn admits(filter: Option<&IdentityFilter>, identity: &str) -> bool {
    filter.map_or(true, |f| f.matches(identity))
}
