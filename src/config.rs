//! YAML configuration.
//!
//! ```yaml
//! paths:
//!   baseline: bench/results/baseline/result.json
//!   current: bench/results/current/result.json
//!   outdir: build/bench/compare
//! filter:
//!   include: "Lookup|Router"
//! regression:
//!   max_regress_pct: 10.0
//!   max_mean_regress_pct: 3.0
//! display:
//!   name_max_len: 28
//! implementations:
//!   preferred: [Patternia, IfElse, Switch, SwitchIndex, StdVisit]
//! duplicates: reject
//! ```
//!
//! Every section is optional. The config only carries values; callers pass
//! them explicitly into the comparator entry points.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    aggregate::DuplicatePolicy,
    error::CompareError,
    filter::IdentityFilter,
    gate::GateThresholds,
    metrics::ImplementationOrder,
    report::{DEFAULT_NAME_MAX_LEN, MIN_NAME_MAX_LEN},
};

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    /// Source and output locations.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Identity filter.
    #[serde(default)]
    pub filter: FilterConfig,
    /// Regression gate thresholds.
    #[serde(default)]
    pub regression: RegressionConfig,
    /// Presentation options.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Implementation ordering for grouped reports.
    #[serde(default)]
    pub implementations: ImplementationsConfig,
    /// Handling of repeated `(identity, kind)` records.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

/// Source and output locations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Baseline result file or directory.
    #[serde(default)]
    pub baseline: Option<PathBuf>,
    /// Current result file or directory.
    #[serde(default)]
    pub current: Option<PathBuf>,
    /// Single-source input file.
    #[serde(default)]
    pub input: Option<PathBuf>,
    /// Output directory.
    #[serde(default)]
    pub outdir: Option<PathBuf>,
}

/// Identity filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Regular expression (or literal, see `literal`) identities must match.
    #[serde(default)]
    pub include: Option<String>,
    /// Treat `include` as a literal substring.
    #[serde(default)]
    pub literal: bool,
}

/// Regression gate thresholds, in percent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegressionConfig {
    /// Master switch; when false both checks are skipped.
    #[serde(default = "RegressionConfig::default_enabled")]
    pub enabled: bool,
    /// Per-row delta limit.
    #[serde(default)]
    pub max_regress_pct: Option<f64>,
    /// Mean delta limit.
    #[serde(default)]
    pub max_mean_regress_pct: Option<f64>,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_regress_pct: None,
            max_mean_regress_pct: None,
        }
    }
}

impl RegressionConfig {
    fn default_enabled() -> bool {
        true
    }
}

/// Presentation options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Maximum display label length.
    #[serde(default = "DisplayConfig::default_name_max_len")]
    pub name_max_len: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            name_max_len: DEFAULT_NAME_MAX_LEN,
        }
    }
}

impl DisplayConfig {
    fn default_name_max_len() -> usize {
        DEFAULT_NAME_MAX_LEN
    }
}

/// Implementation ordering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImplementationsConfig {
    /// Labels listed first, in this order.
    #[serde(default = "ImplementationsConfig::default_preferred")]
    pub preferred: Vec<String>,
}

impl Default for ImplementationsConfig {
    fn default() -> Self {
        Self {
            preferred: Self::default_preferred(),
        }
    }
}

impl ImplementationsConfig {
    fn default_preferred() -> Vec<String> {
        ImplementationOrder::default().preferred().to_vec()
    }
}

impl CompareConfig {
    /// Load from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, CompareError> {
        let content = fs::read_to_string(path).map_err(|source| CompareError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Load from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, CompareError> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, CompareError> {
        serde_yaml::from_str(content).map_err(|source| CompareError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Gate thresholds; both disabled when `regression.enabled` is false.
    pub fn thresholds(&self) -> Result<GateThresholds, CompareError> {
        if !self.regression.enabled {
            return Ok(GateThresholds::default());
        }
        GateThresholds::new(
            self.regression.max_regress_pct,
            self.regression.max_mean_regress_pct,
        )
    }

    /// Compiled identity filter, if one is configured.
    pub fn identity_filter(&self) -> Result<Option<IdentityFilter>, CompareError> {
        IdentityFilter::from_pattern(self.filter.include.as_deref(), self.filter.literal)
    }

    /// Implementation ordering for grouped reports.
    pub fn implementation_order(&self) -> ImplementationOrder {
        ImplementationOrder::new(self.implementations.preferred.iter().cloned())
    }

    /// Display label length, never below the minimum.
    pub fn name_max_len(&self) -> usize {
        self.display.name_max_len.max(MIN_NAME_MAX_LEN)
    }
}
