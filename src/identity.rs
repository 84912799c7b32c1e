//! Convention-based decomposition of benchmark identities into
//! `(implementation, scenario)` labels.
//!
//! `BM_Patternia_Lookup/min_time:1` decomposes to implementation
//! `Patternia` and scenario `Lookup`: the parameter suffix after `/` is
//! dropped, the `BM_` prefix is stripped, and the remainder is split on the
//! first `_`. The heuristic lives behind [`Decompose`] so callers can swap it
//! without touching matching or metric code.

use serde::Serialize;

/// Implementation label reported when an identity has no separator.
pub const UNKNOWN_IMPLEMENTATION: &str = "Unknown";

/// Semantic labels of one identity, borrowed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Decomposition<'a> {
    /// Implementation strategy under test.
    pub implementation: &'a str,
    /// Workload the strategy is measured under.
    pub scenario: &'a str,
}

/// Pure identity decomposition. Implementations must be total: every input
/// string yields a pair.
pub trait Decompose {
    /// Split `identity` into implementation and scenario labels.
    fn decompose<'a>(&self, identity: &'a str) -> Decomposition<'a>;
}

/// Prefix/separator based decomposer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionDecomposer {
    prefix: String,
    separator: char,
    param_delimiter: char,
}

impl Default for ConventionDecomposer {
    fn default() -> Self {
        Self {
            prefix: "BM_".to_string(),
            separator: '_',
            param_delimiter: '/',
        }
    }
}

impl ConventionDecomposer {
    /// Decomposer with custom conventions.
    pub fn new(prefix: impl Into<String>, separator: char, param_delimiter: char) -> Self {
        Self {
            prefix: prefix.into(),
            separator,
            param_delimiter,
        }
    }

    /// Identity with its parameter suffix and conventional prefix removed.
    pub fn core<'a>(&self, identity: &'a str) -> &'a str {
        let core = identity
            .split_once(self.param_delimiter)
            .map_or(identity, |(head, _)| head);
        core.strip_prefix(self.prefix.as_str()).unwrap_or(core)
    }
}

impl Decompose for ConventionDecomposer {
    fn decompose<'a>(&self, identity: &'a str) -> Decomposition<'a> {
        let core = self.core(identity);
        match core.split_once(self.separator) {
            Some((implementation, scenario)) => Decomposition {
                implementation,
                scenario,
            },
            None => Decomposition {
                implementation: UNKNOWN_IMPLEMENTATION,
                scenario: core,
            },
        }
    }
}

/// Decompose with the default `BM_` / `_` / `/` conventions.
pub fn decompose(identity: &str) -> Decomposition<'_> {
    ConventionDecomposer::default().decompose(identity)
}
