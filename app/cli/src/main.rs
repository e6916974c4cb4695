use anyhow::{Context, Result};
use benchdiff::{
    analysis_to_json, extract, extract_all, records_to_csv, records_to_json, render_report,
    summarize, summary_to_json, verdict, Analysis, AnalyzerConfig, BenchError, Category,
    EngineRun, Field, Metric,
};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Extract, summarize and compare key-value store benchmark logs
#[derive(Parser)]
#[command(name = "benchdiff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file path (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output formats for extracted records
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// CSV with `NA` for absent fields
    Csv,
    /// JSON array of records
    Json,
}

impl Format {
    fn as_str(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }
}

/// Benchmark categories selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    /// Random reads
    Read,
    /// Bulk writes
    Write,
    /// Read phase followed by a write phase
    Update,
    /// Interleaved reads and writes
    Mixed,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Read => Category::Read,
            CategoryArg::Write => Category::Write,
            CategoryArg::Update => Category::Update,
            CategoryArg::Mixed => Category::Mixed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract per-round records from a benchmark log
    Extract {
        /// Input log file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Output file (use '-' for stdout)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        output: String,

        /// Only extract rounds of this category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },

    /// Summarize a benchmark log per category as JSON
    Summarize {
        /// Input log file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Output file (use '-' for stdout)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        output: String,
    },

    /// Compare a candidate engine's log against a baseline engine's log
    Compare {
        /// Baseline engine's log file
        #[arg(long, value_name = "FILE")]
        baseline: String,

        /// Candidate engine's log file
        #[arg(long, value_name = "FILE")]
        candidate: String,

        /// Display name of the baseline engine
        #[arg(long, value_name = "NAME")]
        baseline_name: Option<String>,

        /// Display name of the candidate engine
        #[arg(long, value_name = "NAME")]
        candidate_name: Option<String>,

        /// Write the JSON analysis to this file (use '-' for stdout)
        #[arg(long, value_name = "FILE")]
        json: Option<String>,

        /// Write the Markdown report to this file (use '-' for stdout)
        #[arg(long, value_name = "FILE")]
        report: Option<String>,

        /// Data preparation time of the baseline run, recorded verbatim
        #[arg(long, value_name = "TEXT")]
        baseline_prep_time: Option<String>,

        /// Data preparation time of the candidate run, recorded verbatim
        #[arg(long, value_name = "TEXT")]
        candidate_prep_time: Option<String>,

        /// Dataset size shared by both runs, recorded verbatim
        #[arg(long, value_name = "TEXT")]
        total_kv_pairs: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity flags
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration if specified
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else {
        AnalyzerConfig::default()
    };

    match cli.command {
        Commands::Extract {
            input,
            output,
            category,
            format,
        } => {
            let category = category.map(Category::from);
            extract_command(&input, &output, category, format, &config, cli.quiet)?;
        }
        Commands::Summarize { input, output } => {
            summarize_command(&input, &output, &config, cli.quiet)?;
        }
        Commands::Compare {
            baseline,
            candidate,
            baseline_name,
            candidate_name,
            json,
            report,
            baseline_prep_time,
            candidate_prep_time,
            total_kv_pairs,
        } => {
            let mut config = config;
            if let Some(name) = baseline_name {
                config.compare.baseline_name = name;
            }
            if let Some(name) = candidate_name {
                config.compare.candidate_name = name;
            }
            config
                .validate()
                .map_err(|e| map_bench_error(e, "Invalid engine names"))?;

            let options = CompareOptions {
                json,
                report,
                baseline_prep_time,
                candidate_prep_time,
                total_kv_pairs,
            };
            compare_command(&baseline, &candidate, options, &config, cli.quiet)?;
        }
    }

    Ok(())
}

/// Set up logging based on verbosity flags
fn setup_logging(verbose: bool, quiet: bool) {
    let log_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logging initialized at {} level", log_level);
}

/// Load configuration from a JSON file
fn load_config(path: &Path) -> Result<AnalyzerConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = AnalyzerConfig::from_json(&text)
        .map_err(|e| map_bench_error(e, &format!("Config file {}", path.display())))?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Read input from file or stdin
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}

/// Write output to file or stdout
fn write_output(output: &str, content: &str) -> Result<()> {
    if output == "-" {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        io::stdout().flush().context("Failed to flush stdout")?;
    } else {
        fs::write(output, content)
            .with_context(|| format!("Failed to write output file: {}", output))?;
    }
    Ok(())
}

/// Execute the extract command
fn extract_command(
    input: &str,
    output: &str,
    category: Option<Category>,
    format: Format,
    config: &AnalyzerConfig,
    quiet: bool,
) -> Result<()> {
    let start_time = Instant::now();
    info!("Extracting records: {} -> {} ({})", input, output, format.as_str());

    let progress = create_progress_bar(quiet, "Reading log");
    let log_text = read_input(input)?;
    progress.finish_and_clear();

    if log_text.trim().is_empty() {
        warn!("Input is empty");
    }

    let progress = create_progress_bar(quiet, "Extracting rounds");
    let records = match category {
        Some(category) => extract(&log_text, category, &config.extractor).collect(),
        None => extract_all(&log_text, &config.extractor),
    };
    progress.finish_and_clear();

    let content = match format {
        Format::Csv => {
            records_to_csv(&records).map_err(|e| map_bench_error(e, "CSV export"))?
        }
        Format::Json => {
            records_to_json(&records).map_err(|e| map_bench_error(e, "JSON export"))?
        }
    };
    write_output(output, &content)?;

    if !quiet {
        eprintln!("✓ Extraction complete");
        for category in Category::ALL {
            let count = records.iter().filter(|r| r.category == category).count();
            if count > 0 {
                eprintln!("  {:<8} {} rounds", category.title(), count);
            }
        }
        eprintln!("  Time:    {:.3}s", start_time.elapsed().as_secs_f64());
    }

    info!("Extracted {} records", records.len());
    Ok(())
}

/// Execute the summarize command
fn summarize_command(
    input: &str,
    output: &str,
    config: &AnalyzerConfig,
    quiet: bool,
) -> Result<()> {
    info!("Summarizing {} -> {}", input, output);

    let progress = create_progress_bar(quiet, "Reading log");
    let log_text = read_input(input)?;
    progress.finish_and_clear();

    let progress = create_progress_bar(quiet, "Summarizing");
    let records = extract_all(&log_text, &config.extractor);
    let summary = summarize(&records);
    progress.finish_and_clear();

    if summary.is_empty() {
        warn!("No complete rounds found in {}", input);
    }

    let json = summary_to_json(&summary).map_err(|e| map_bench_error(e, "JSON export"))?;
    write_output(output, &json)?;

    if !quiet {
        eprintln!("✓ Summary complete");
        for (category, stats) in &summary.categories {
            let latency = stats
                .mean(Field::AvgLatencyUs)
                .map(|v| format!("{:.2} μs", v))
                .unwrap_or_else(|| "-".to_string());
            eprintln!(
                "  {:<8} {} rounds, avg latency {}",
                category.title(),
                stats.count,
                latency
            );
        }
    }

    Ok(())
}

/// Output and metadata options of the compare command
struct CompareOptions {
    json: Option<String>,
    report: Option<String>,
    baseline_prep_time: Option<String>,
    candidate_prep_time: Option<String>,
    total_kv_pairs: Option<String>,
}

/// Execute the compare command
fn compare_command(
    baseline: &str,
    candidate: &str,
    options: CompareOptions,
    config: &AnalyzerConfig,
    quiet: bool,
) -> Result<()> {
    let start_time = Instant::now();
    info!("Comparing {} (candidate) against {} (baseline)", candidate, baseline);

    // Both inputs must exist before any analysis runs.
    let progress = create_progress_bar(quiet, "Reading logs");
    let baseline_text = read_input(baseline)?;
    let candidate_text = read_input(candidate)?;
    progress.finish_and_clear();

    let mut baseline_run = EngineRun::new(&baseline_text);
    let mut candidate_run = EngineRun::new(&candidate_text);
    if let Some(prep) = options.baseline_prep_time {
        baseline_run = baseline_run.with_data_prep_time(prep);
    }
    if let Some(prep) = options.candidate_prep_time {
        candidate_run = candidate_run.with_data_prep_time(prep);
    }
    if let Some(kv) = options.total_kv_pairs {
        baseline_run = baseline_run.with_total_kv_pairs(kv.clone());
        candidate_run = candidate_run.with_total_kv_pairs(kv);
    }

    let progress = create_progress_bar(quiet, "Analyzing");
    let analysis = Analysis::run(baseline_run, candidate_run, config);
    progress.finish_and_clear();

    if let Some(path) = &options.json {
        let json = analysis_to_json(&analysis).map_err(|e| map_bench_error(e, "JSON export"))?;
        write_output(path, &json)?;
        debug!("Wrote JSON analysis to {}", path);
    }

    // The report goes to stdout unless JSON was the only output requested.
    let report_target = match (&options.report, &options.json) {
        (Some(path), _) => Some(path.as_str()),
        (None, None) => Some("-"),
        (None, Some(_)) => None,
    };
    if let Some(path) = report_target {
        write_output(path, &render_report(&analysis))?;
        debug!("Wrote report to {}", path);
    }

    if !quiet {
        print_findings(&analysis);
        eprintln!("  Time:    {:.3}s", start_time.elapsed().as_secs_f64());
    }

    Ok(())
}

/// Print one verdict per comparable category to stderr
fn print_findings(analysis: &Analysis) {
    let comparison = &analysis.comparison;
    eprintln!("✓ Comparison complete");
    for category in comparison.entries.keys() {
        if let Some(verdict) = comparison.verdict(*category, Metric::AvgLatency) {
            eprintln!("  {:<8} {}", category.title(), verdict);
        }
    }
    for category in &comparison.not_comparable {
        eprintln!("  {:<8} not comparable", category.title());
    }
    for (metric, m) in analysis.overall.metrics() {
        eprintln!(
            "  {:<8} {}",
            "Overall",
            verdict(
                &comparison.candidate_name,
                &comparison.baseline_name,
                metric,
                m.percent_improvement
            )
        );
    }
}

/// Create a progress bar (spinner) for operations
fn create_progress_bar(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Map BenchError to anyhow::Error with context
fn map_bench_error(error: BenchError, context: &str) -> anyhow::Error {
    match error {
        BenchError::CsvParseError {
            line,
            column,
            message,
        } => {
            anyhow::anyhow!(
                "{}: CSV parse error at line {}, column {}: {}",
                context,
                line,
                column,
                message
            )
        }
        BenchError::CsvError(e) => anyhow::anyhow!("{}: CSV error: {}", context, e),
        BenchError::JsonError(e) => anyhow::anyhow!("{}: JSON error: {}", context, e),
        BenchError::ConfigError { message } => {
            anyhow::anyhow!("{}: configuration error: {}", context, message)
        }
        BenchError::IoError(e) => anyhow::anyhow!("{}: IO error: {}", context, e),
    }
}
