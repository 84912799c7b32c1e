//! Aggregate extraction: folds raw benchmark records into one metrics slot
//! per identity.

use std::{
    collections::{btree_map, BTreeMap, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::CompareError,
    observability::{log_debug, log_warn},
    record::RawRecord,
};

/// Named statistic over repeated timing samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    /// Arithmetic mean.
    Mean,
    /// Median.
    Median,
    /// Standard deviation.
    Stddev,
    /// Coefficient of variation, as a fraction.
    Cv,
}

impl AggregateKind {
    /// All recognized kinds.
    pub const ALL: [AggregateKind; 4] = [
        AggregateKind::Mean,
        AggregateKind::Median,
        AggregateKind::Stddev,
        AggregateKind::Cv,
    ];

    /// Tag used in `aggregate_name` and in `_<tag>` name suffixes.
    pub fn as_str(self) -> &'static str {
        match self {
            AggregateKind::Mean => "mean",
            AggregateKind::Median => "median",
            AggregateKind::Stddev => "stddev",
            AggregateKind::Cv => "cv",
        }
    }

    /// Parse a tag; unknown tags (e.g. "min") yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Split `"<base>_<tag>"` into base identity and kind.
    pub fn split_suffix(name: &str) -> Option<(&str, Self)> {
        Self::ALL.into_iter().find_map(|kind| {
            name.strip_suffix(kind.as_str())
                .and_then(|rest| rest.strip_suffix('_'))
                .map(|base| (base, kind))
        })
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when two explicit records carry the same `(identity, kind)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the later record and log a warning.
    #[default]
    LastWriteWins,
    /// Fail extraction with [`CompareError::DuplicateAggregate`].
    Reject,
}

/// Statistics recorded for one benchmark identity. Absent values were not
/// reported, which is distinct from a reported zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AggregateMetrics {
    /// Mean CPU time (ns).
    pub mean: Option<f64>,
    /// Median CPU time (ns).
    pub median: Option<f64>,
    /// Standard deviation of CPU time (ns).
    pub stddev: Option<f64>,
    /// Coefficient of variation as a fraction.
    pub cv: Option<f64>,
}

impl AggregateMetrics {
    /// Metrics carrying only a mean.
    pub fn with_mean(mean: f64) -> Self {
        Self {
            mean: Some(mean),
            ..Self::default()
        }
    }

    /// Read one statistic.
    pub fn get(&self, kind: AggregateKind) -> Option<f64> {
        match kind {
            AggregateKind::Mean => self.mean,
            AggregateKind::Median => self.median,
            AggregateKind::Stddev => self.stddev,
            AggregateKind::Cv => self.cv,
        }
    }

    /// Overwrite one statistic.
    pub fn set(&mut self, kind: AggregateKind, value: f64) {
        let slot = match kind {
            AggregateKind::Mean => &mut self.mean,
            AggregateKind::Median => &mut self.median,
            AggregateKind::Stddev => &mut self.stddev,
            AggregateKind::Cv => &mut self.cv,
        };
        *slot = Some(value);
    }
}

/// Mapping from identity to its metrics. Identities are unique and iterate
/// in lexical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSet {
    entries: BTreeMap<String, AggregateMetrics>,
}

impl AggregateSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the metrics for `identity`.
    pub fn insert(&mut self, identity: impl Into<String>, metrics: AggregateMetrics) {
        self.entries.insert(identity.into(), metrics);
    }

    /// Metrics for `identity`, if present.
    pub fn get(&self, identity: &str) -> Option<&AggregateMetrics> {
        self.entries.get(identity)
    }

    /// Whether `identity` is present.
    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    /// Number of identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no identity was extracted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identities in lexical order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(identity, metrics)` pairs in lexical order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, AggregateMetrics> {
        self.entries.iter()
    }
}

impl FromIterator<(String, AggregateMetrics)> for AggregateSet {
    fn from_iter<I: IntoIterator<Item = (String, AggregateMetrics)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AggregateSet {
    type Item = (&'a String, &'a AggregateMetrics);
    type IntoIter = btree_map::Iter<'a, String, AggregateMetrics>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build an [`AggregateSet`], resolving duplicates last-write-wins.
pub fn extract<'a, I>(records: I) -> AggregateSet
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut folder = Folder::default();
    for record in records {
        if let Some((identity, kind)) = folder.push(record) {
            log_warn!(
                component = "extract",
                event = "duplicate_aggregate",
                identity = %identity,
                kind = %kind,
            );
        }
    }
    folder.finish()
}

/// Build an [`AggregateSet`] under an explicit duplicate policy.
pub fn extract_with<'a, I>(records: I, policy: DuplicatePolicy) -> Result<AggregateSet, CompareError>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    match policy {
        DuplicatePolicy::LastWriteWins => Ok(extract(records)),
        DuplicatePolicy::Reject => {
            let mut folder = Folder::default();
            for record in records {
                if let Some((identity, kind)) = folder.push(record) {
                    return Err(CompareError::DuplicateAggregate { identity, kind });
                }
            }
            Ok(folder.finish())
        }
    }
}

enum KindTag<'a> {
    Known(AggregateKind),
    Unknown(&'a str),
    Implicit,
}

/// Identity and aggregate kind of one record, or `None` when the record has
/// no usable name (context rows, malformed entries).
fn resolve(record: &RawRecord) -> Option<(&str, KindTag<'_>)> {
    let explicit = record.aggregate_name();

    if let Some(run_name) = record.run_name() {
        return Some((run_name, explicit.map_or(KindTag::Implicit, tag)));
    }

    let name = record.name()?;
    match explicit {
        Some(agg) => {
            let base = name
                .strip_suffix(agg)
                .and_then(|rest| rest.strip_suffix('_'))
                .filter(|base| !base.is_empty())
                .unwrap_or(name);
            Some((base, tag(agg)))
        }
        None => match AggregateKind::split_suffix(name) {
            Some((base, kind)) if !base.is_empty() => Some((base, KindTag::Known(kind))),
            _ => Some((name, KindTag::Implicit)),
        },
    }
}

fn tag(agg: &str) -> KindTag<'_> {
    match AggregateKind::parse(agg) {
        Some(kind) => KindTag::Known(kind),
        None => KindTag::Unknown(agg),
    }
}

#[derive(Default)]
struct Folder {
    set: AggregateSet,
    explicit: HashSet<(String, AggregateKind)>,
}

impl Folder {
    /// Fold one record in. Returns the `(identity, kind)` pair when it
    /// overwrote an earlier explicit value.
    fn push(&mut self, record: &RawRecord) -> Option<(String, AggregateKind)> {
        let Some((identity, tag)) = resolve(record) else {
            log_debug!(
                component = "extract",
                event = "record_skipped",
                reason = "no identity",
            );
            return None;
        };

        let slot = self.set.entries.entry(identity.to_string()).or_default();
        let value = record.cpu_time?;

        match tag {
            KindTag::Known(kind) => {
                slot.set(kind, value);
                let fresh = self.explicit.insert((identity.to_string(), kind));
                (!fresh).then(|| (identity.to_string(), kind))
            }
            KindTag::Unknown(agg) => {
                log_debug!(
                    component = "extract",
                    event = "aggregate_ignored",
                    identity = %identity,
                    aggregate = %agg,
                );
                None
            }
            KindTag::Implicit => {
                if slot.mean.is_none() {
                    slot.mean = Some(value);
                }
                None
            }
        }
    }

    fn finish(self) -> AggregateSet {
        self.set
    }
}
