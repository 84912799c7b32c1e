use std::path::{Path, PathBuf};

use anyhow::Context;
use bench_compare::{
    compare_pairwise, compare_scenarios,
    config::CompareConfig,
    evaluate_gate, extract_with,
    report::{self, csv, json, markdown, PairwiseReport, ScenarioReport, SourceInfo, MIN_NAME_MAX_LEN},
    source::{self, Artifact},
    BenchmarkFile, CompareError, ConventionDecomposer, DuplicatePolicy, GateThresholds, IdentityFilter,
    EXIT_GATE_FAILED, EXIT_INPUT_ERROR, EXIT_OK,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_BASELINE: &str = "bench/results/baseline/result.json";
const DEFAULT_CURRENT: &str = "bench/results/current/result.json";
const DEFAULT_SINGLE_INPUT: &str = "build/variant_all.json";
const DEFAULT_COMPARE_OUTDIR: &str = "build/bench/compare";
const DEFAULT_SINGLE_OUTDIR: &str = "build/bench/single";
const DEFAULT_STAGE_DEST: &str = "bench/results";
const DEFAULT_LOG_FILTER: &str = "warn,bench_compare=info";

#[derive(Debug, Parser)]
#[command(name = "bench-compare", version, about = "Compare Google Benchmark aggregate results")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare baseline and current results, optionally gating regressions.
    Compare(CompareArgs),
    /// Compare implementations per scenario within one result file.
    Single(SingleArgs),
    /// Copy two result files into the standard results layout.
    Stage(StageArgs),
}

#[derive(Debug, Args)]
struct CompareArgs {
    /// Baseline result file or directory.
    #[arg(long)]
    baseline: Option<PathBuf>,
    /// Current result file or directory.
    #[arg(long)]
    current: Option<PathBuf>,
    /// Legend label for the baseline.
    #[arg(long, default_value = "baseline")]
    label_baseline: String,
    /// Legend label for the current run.
    #[arg(long, default_value = "current")]
    label_current: String,
    /// Only compare benchmarks whose name matches this regex.
    #[arg(long)]
    include: Option<String>,
    /// Treat --include as a literal substring.
    #[arg(long)]
    literal: bool,
    /// Maximum label length in reports.
    #[arg(long)]
    name_max_len: Option<usize>,
    /// Output directory.
    #[arg(long)]
    outdir: Option<PathBuf>,
    /// Output file prefix.
    #[arg(long, default_value = "bench_compare")]
    prefix: String,
    /// Fail when any benchmark's delta exceeds this percentage. Negative
    /// values demand an improvement.
    #[arg(long, allow_negative_numbers = true)]
    fail_if_regress_pct: Option<f64>,
    /// Fail when the mean delta exceeds this percentage.
    #[arg(long, allow_negative_numbers = true)]
    fail_if_mean_regress_pct: Option<f64>,
    /// YAML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reject repeated aggregates instead of keeping the last one.
    #[arg(long)]
    strict_duplicates: bool,
}

#[derive(Debug, Args)]
struct SingleArgs {
    /// Result file or directory.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Only include benchmarks whose name matches this regex.
    #[arg(long)]
    include: Option<String>,
    /// Treat --include as a literal substring.
    #[arg(long)]
    literal: bool,
    /// Output directory.
    #[arg(long)]
    outdir: Option<PathBuf>,
    /// Output file prefix.
    #[arg(long, default_value = "bench_single")]
    prefix: String,
    /// Report title.
    #[arg(long, default_value = "Benchmark Single Report")]
    title: String,
    /// YAML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reject repeated aggregates instead of keeping the last one.
    #[arg(long)]
    strict_duplicates: bool,
}

#[derive(Debug, Args)]
struct StageArgs {
    /// Baseline result file or directory.
    #[arg(long)]
    baseline: PathBuf,
    /// Current result file or directory.
    #[arg(long)]
    current: PathBuf,
    /// Destination root.
    #[arg(long, default_value = DEFAULT_STAGE_DEST)]
    dest: PathBuf,
}

fn main() {
    init_tracing();
    match try_main() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:?}");
            let code = err
                .downcast_ref::<CompareError>()
                .map_or(EXIT_INPUT_ERROR, CompareError::exit_code);
            std::process::exit(code);
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .try_init();
}

fn try_main() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Compare(args) => run_compare(args),
        Command::Single(args) => run_single(args),
        Command::Stage(args) => run_stage(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CompareConfig> {
    match path {
        Some(path) => CompareConfig::from_yaml_file(path)
            .with_context(|| format!("load config at {}", path.display())),
        None => Ok(CompareConfig::default()),
    }
}

fn resolve_filter(
    flag: Option<&str>,
    literal: bool,
    config: &CompareConfig,
) -> anyhow::Result<Option<IdentityFilter>> {
    let pattern = flag.or(config.filter.include.as_deref());
    IdentityFilter::from_pattern(pattern, literal || config.filter.literal)
        .context("compile include filter")
}

fn resolve_policy(strict: bool, config: &CompareConfig) -> DuplicatePolicy {
    if strict {
        DuplicatePolicy::Reject
    } else {
        config.duplicates
    }
}

fn load_source(path: &Path, what: &str) -> anyhow::Result<BenchmarkFile> {
    source::load_benchmark_file(path)
        .with_context(|| format!("load {what} results from {}", path.display()))
}

fn run_compare(args: CompareArgs) -> anyhow::Result<i32> {
    let config = load_config(args.config.as_deref())?;
    let baseline_path = args
        .baseline
        .or_else(|| config.paths.baseline.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BASELINE));
    let current_path = args
        .current
        .or_else(|| config.paths.current.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CURRENT));
    let outdir = args
        .outdir
        .or_else(|| config.paths.outdir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPARE_OUTDIR));
    let filter = resolve_filter(args.include.as_deref(), args.literal, &config)?;
    let policy = resolve_policy(args.strict_duplicates, &config);
    let name_max_len = args
        .name_max_len
        .map_or_else(|| config.name_max_len(), |n| n.max(MIN_NAME_MAX_LEN));
    let configured = config.thresholds()?;
    let thresholds = GateThresholds::new(
        args.fail_if_regress_pct.or(configured.per_row_pct()),
        args.fail_if_mean_regress_pct.or(configured.mean_pct()),
    )?;

    let baseline_file = load_source(&baseline_path, "baseline")?;
    let current_file = load_source(&current_path, "current")?;
    let baseline = extract_with(&baseline_file.benchmarks, policy).context("extract baseline")?;
    let current = extract_with(&current_file.benchmarks, policy).context("extract current")?;

    let rows = compare_pairwise(&baseline, &current, filter.as_ref())?;
    let verdict = thresholds
        .is_enabled()
        .then(|| evaluate_gate(&rows, &thresholds));

    let mut report = PairwiseReport::assemble(
        SourceInfo {
            label: args.label_baseline,
            path: baseline_path.display().to_string(),
            context: baseline_file.context,
        },
        SourceInfo {
            label: args.label_current,
            path: current_path.display().to_string(),
            context: current_file.context,
        },
        rows,
        name_max_len,
    );
    if let Some(verdict) = verdict {
        report = report.with_verdict(verdict);
    }

    let artifacts = [
        Artifact::new(&args.prefix, "md", markdown::render_pairwise(&report)),
        Artifact::new(&args.prefix, "json", json::render_pairwise(&report)?),
    ];
    let written = source::write_artifacts(&outdir, &artifacts)
        .with_context(|| format!("write reports under {}", outdir.display()))?;

    println!("{}", report.to_table().to_terminal());
    for path in &written {
        println!("Saved report: {}", path.display());
    }

    let Some(verdict) = &report.verdict else {
        return Ok(EXIT_OK);
    };
    for line in report::gate_lines(verdict, &thresholds) {
        println!("{line}");
    }
    Ok(if verdict.passed {
        EXIT_OK
    } else {
        EXIT_GATE_FAILED
    })
}

fn run_single(args: SingleArgs) -> anyhow::Result<i32> {
    let config = load_config(args.config.as_deref())?;
    let input_path = args
        .input
        .or_else(|| config.paths.input.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SINGLE_INPUT));
    let outdir = args
        .outdir
        .or_else(|| config.paths.outdir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SINGLE_OUTDIR));
    let filter = resolve_filter(args.include.as_deref(), args.literal, &config)?;
    let policy = resolve_policy(args.strict_duplicates, &config);
    let order = config.implementation_order();

    let file = load_source(&input_path, "input")?;
    let set = extract_with(&file.benchmarks, policy).context("extract input")?;
    let (group, ranked) =
        compare_scenarios(&set, filter.as_ref(), &ConventionDecomposer::default(), &order)?;

    let report = ScenarioReport::assemble(
        args.title,
        SourceInfo {
            label: "input".to_string(),
            path: input_path.display().to_string(),
            context: file.context,
        },
        group,
        ranked,
        &order,
    );

    let artifacts = [
        Artifact::new(&args.prefix, "md", markdown::render_scenarios(&report)),
        Artifact::new(&args.prefix, "csv", csv::render_points(&report)),
        Artifact::new(&args.prefix, "json", json::render_scenarios(&report)?),
    ];
    let written = source::write_artifacts(&outdir, &artifacts)
        .with_context(|| format!("write reports under {}", outdir.display()))?;

    println!("{}", report.to_table().to_terminal());
    for path in &written {
        println!("Saved report: {}", path.display());
    }
    Ok(EXIT_OK)
}

fn run_stage(args: StageArgs) -> anyhow::Result<i32> {
    let staged = source::stage(&args.baseline, &args.current, &args.dest)
        .context("stage benchmark results")?;
    println!("Staged baseline: {}", staged.baseline.display());
    println!("Staged current: {}", staged.current.display());
    Ok(EXIT_OK)
}
