//! File boundary: loading benchmark payloads, staging them into the
//! standard layout, and writing rendered artifacts.
//!
//! Nothing here is called from the comparator core. Callers read once up
//! front, run the pure pipeline, and write only after every fatal check has
//! passed.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::CompareError,
    observability::{log_debug, log_info},
    record::BenchmarkFile,
};

/// File name looked up when a directory is given as a source.
pub const RESULT_FILE_NAME: &str = "result.json";

/// `path` itself, or `path/result.json` when `path` is a directory.
pub fn resolve_result_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(RESULT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Read and parse one benchmark payload.
pub fn load_benchmark_file(path: &Path) -> Result<BenchmarkFile, CompareError> {
    let path = resolve_result_path(path);
    if !path.exists() {
        return Err(CompareError::MissingSource(path));
    }
    let content = fs::read_to_string(&path).map_err(|source| CompareError::Io {
        path: path.clone(),
        source,
    })?;
    let file: BenchmarkFile =
        serde_json::from_str(&content).map_err(|source| CompareError::Parse {
            path: path.clone(),
            source,
        })?;
    log_debug!(
        component = "source",
        event = "benchmark_file_loaded",
        path = %path.display(),
        records = file.benchmarks.len(),
    );
    Ok(file)
}

/// Destinations written by [`stage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPaths {
    /// `<dest>/baseline/result.json`.
    pub baseline: PathBuf,
    /// `<dest>/current/result.json`.
    pub current: PathBuf,
}

/// Copy two result files into `<dest>/{baseline,current}/result.json`.
/// Both sources are checked before anything is copied.
pub fn stage(baseline: &Path, current: &Path, dest: &Path) -> Result<StagedPaths, CompareError> {
    let baseline_src = resolve_result_path(baseline);
    let current_src = resolve_result_path(current);
    for src in [&baseline_src, &current_src] {
        if !src.exists() {
            return Err(CompareError::MissingSource(src.clone()));
        }
    }

    let staged = StagedPaths {
        baseline: dest.join("baseline").join(RESULT_FILE_NAME),
        current: dest.join("current").join(RESULT_FILE_NAME),
    };
    copy_file(&baseline_src, &staged.baseline)?;
    copy_file(&current_src, &staged.current)?;
    Ok(staged)
}

fn copy_file(src: &Path, dst: &Path) -> Result<(), CompareError> {
    if let Some(parent) = dst.parent() {
        create_dir(parent)?;
    }
    fs::copy(src, dst).map_err(|source| CompareError::Io {
        path: dst.to_path_buf(),
        source,
    })?;
    log_info!(
        component = "source",
        event = "result_staged",
        from = %src.display(),
        to = %dst.display(),
    );
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), CompareError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| CompareError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// A fully rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the output directory.
    pub file_name: String,
    /// File contents.
    pub contents: String,
}

impl Artifact {
    /// `<prefix>.<extension>` with `contents`.
    pub fn new(prefix: &str, extension: &str, contents: String) -> Self {
        Self {
            file_name: format!("{prefix}.{extension}"),
            contents,
        }
    }
}

/// Write every artifact under `outdir`, creating it if needed. Returns the
/// written paths in input order.
pub fn write_artifacts(outdir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, CompareError> {
    create_dir(outdir)?;
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = outdir.join(&artifact.file_name);
        fs::write(&path, &artifact.contents).map_err(|source| CompareError::Io {
            path: path.clone(),
            source,
        })?;
        log_debug!(
            component = "report",
            event = "artifact_written",
            path = %path.display(),
            bytes = artifact.contents.len(),
        );
        written.push(path);
    }
    Ok(written)
}
