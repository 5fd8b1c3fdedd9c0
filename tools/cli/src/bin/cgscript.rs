use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use cg_script::{
    lint_script, run_headless, script_json_schema, CompilerConfig, LabelGraph, LintReport,
    PlayTrace, ScriptRaw, Severity, SCRIPT_SCHEMA_VERSION,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "CG story script compiler")]
struct Cli {
    /// Compiler config (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log normalization and resolution decisions.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lint a script JSON file and report every silent recovery.
    Validate {
        script: PathBuf,
        /// Fail when any warning is reported.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Compile a script JSON file into a label graph envelope.
    Compile {
        script: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Export the compiled graph as Graphviz DOT.
    Dot {
        script: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Produce a playthrough trace that always takes the first choice.
    Trace {
        script: PathBuf,
        #[arg(long, default_value_t = 100)]
        steps: usize,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the JSON schema of the script format.
    Schema {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct TraceEnvelope {
    trace_format_version: u16,
    script_schema_version: String,
    graph_fingerprint: String,
    trace: PlayTrace,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Validate { script, strict } => validate_script(&script, &config, strict),
        Command::Compile { script, output } => compile_script(&script, &config, &output),
        Command::Dot { script, output } => export_dot(&script, &config, output.as_deref()),
        Command::Trace {
            script,
            steps,
            output,
        } => trace_script(&script, &config, steps, &output),
        Command::Schema { output } => export_schema(output.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "cg_script=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<CompilerConfig> {
    match path {
        Some(path) => CompilerConfig::load(path).context("load compiler config"),
        None => Ok(CompilerConfig::default()),
    }
}

fn read_script(path: &Path, config: &CompilerConfig) -> Result<ScriptRaw> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    ScriptRaw::from_json_with_limits(&raw, config.limits)
        .context("parse script")?
        .with_context(|| format!("{} is not a script object", path.display()))
}

fn compile_file(path: &Path, config: &CompilerConfig) -> Result<LabelGraph> {
    let script = read_script(path, config)?;
    let graph = script.compile(config);
    tracing::info!(labels = graph.labels.len(), path = %path.display(), "compiled script");
    Ok(graph)
}

fn validate_script(path: &Path, config: &CompilerConfig, strict: bool) -> Result<()> {
    let script = read_script(path, config)?;
    let report = lint_script(&script, config);
    print_report(&report);

    let stats = script.compile(config).stats();
    println!(
        "labels={} scenes={} choices={} unreachable={}",
        stats.total_labels, stats.scene_labels, stats.choice_count, stats.unreachable_labels
    );

    if strict && report.has_warnings() {
        anyhow::bail!(
            "{} warning(s) in {}",
            report.warnings().count(),
            path.display()
        );
    }
    Ok(())
}

fn print_report(report: &LintReport) {
    for issue in &report.issues {
        let tag = match issue.severity() {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        println!("{tag}: {issue}");
    }
}

fn compile_script(path: &Path, config: &CompilerConfig, output: &Path) -> Result<()> {
    let graph = compile_file(path, config)?;
    let json = graph.to_json().context("serialize graph")?;
    write_output(Some(output), &json)?;
    println!("fingerprint={}", graph.fingerprint());
    Ok(())
}

fn export_dot(path: &Path, config: &CompilerConfig, output: Option<&Path>) -> Result<()> {
    let graph = compile_file(path, config)?;
    write_output(output, &graph.to_dot())
}

fn trace_script(path: &Path, config: &CompilerConfig, steps: usize, output: &Path) -> Result<()> {
    let graph = compile_file(path, config)?;
    let graph_fingerprint = graph.fingerprint();
    let trace = run_headless(Arc::new(graph), steps);
    let envelope = TraceEnvelope {
        trace_format_version: 1,
        script_schema_version: SCRIPT_SCHEMA_VERSION.to_string(),
        graph_fingerprint,
        trace,
    };
    let yaml = serde_yaml::to_string(&envelope)?;
    write_output(Some(output), &yaml)
}

fn export_schema(output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(&script_json_schema())?;
    write_output(output, &json)
}

/// Writes to `output`, or stdout when none is given.
fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    let Some(output) = output else {
        println!("{contents}");
        return Ok(());
    };
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, contents).with_context(|| format!("write {}", output.display()))?;
    Ok(())
}
