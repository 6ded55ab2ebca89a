//! trimerge command-line tool.
//!
//! Provides subcommands for merging three versions of a file, and for
//! generating / validating configuration files.

mod output;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use trimerge_core::config::{MarkerStyle, MergeConfig};
use trimerge_core::{ConflictResolver, DiffAlgorithm, Merger, Resolution};

use output::OutputFormat;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// trimerge command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "trimerge",
    version,
    about = "Three-way merge of text files into classified regions"
)]
struct Cli {
    /// Path to the TOML configuration file
    /// [default: <config dir>/trimerge/config.toml].
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge BASE, OURS and THEIRS.
    Merge(MergeArgs),

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file
        /// [default: the --config path].
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a configuration file.
    Validate,
}

#[derive(clap::Args, Debug)]
struct MergeArgs {
    /// Common ancestor.
    base: PathBuf,
    /// Our version.
    ours: PathBuf,
    /// Their version.
    theirs: PathBuf,

    /// Treat lines differing only in whitespace as equal.
    #[arg(short = 'w', long)]
    ignore_whitespace: bool,

    /// Diff algorithm: myers, patience or lcs.
    #[arg(long)]
    algorithm: Option<DiffAlgorithm>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Resolve every conflict to this side.
    #[arg(long, value_enum)]
    prefer: Option<Prefer>,

    /// Include the base lines in conflict markers.
    #[arg(long)]
    diff3: bool,

    /// Write the output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Prefer {
    Ours,
    Theirs,
}

impl From<Prefer> for Resolution {
    fn from(prefer: Prefer) -> Self {
        match prefer {
            Prefer::Ours => Resolution::AcceptOurs,
            Prefer::Theirs => Resolution::AcceptTheirs,
        }
    }
}

/// Exit status when the merge left conflicts open.
const EXIT_CONFLICTS: u8 = 1;
/// Exit status for any error.
const EXIT_ERROR: u8 = 2;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    match cli.command {
        Commands::Init { output } => {
            init_logging("warn");
            cmd_init(output.as_deref().unwrap_or(&config_path))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate => {
            init_logging("warn");
            cmd_validate(&config_path)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Merge(args) => {
            let config = load_config(&config_path, cli.config.is_some())?;
            init_logging(&config.logging.level);
            cmd_merge(config, args)
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("could not determine the user config directory")?;
    Ok(dir.join("trimerge").join("config.toml"))
}

/// Load and validate the configuration. A missing file is only an error when
/// the path was given explicitly.
fn load_config(path: &Path, explicit: bool) -> Result<MergeConfig> {
    if !explicit && !path.exists() {
        return Ok(MergeConfig::default());
    }
    MergeConfig::load_and_validate(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn cmd_merge(mut config: MergeConfig, args: MergeArgs) -> Result<ExitCode> {
    if args.ignore_whitespace {
        config.diff.ignore_whitespace = true;
    }
    if let Some(algorithm) = args.algorithm {
        config.diff.algorithm = algorithm;
    }
    if args.diff3 {
        config.markers.style = MarkerStyle::Diff3;
    }

    let base = read_input(&args.base)?;
    let ours = read_input(&args.ours)?;
    let theirs = read_input(&args.theirs)?;

    let merger = Merger::new(config.merge_options());
    let result = merger
        .merge_file(&args.ours.display().to_string(), &base, &ours, &theirs)
        .context("merge failed")?;

    let mut resolver = ConflictResolver::new(&result);
    if let Some(prefer) = args.prefer {
        resolver.resolve_all(prefer.into());
    }
    let open = resolver.unresolved().len();
    debug!(regions = result.regions.len(), open, "merge finished");

    let rendered = match args.format {
        OutputFormat::Table => output::render_table(&result),
        OutputFormat::Json => output::render_json(&result, &resolver)?,
        format => output::render_document(format, &resolver, &config.markers).context(
            "cannot produce a resolved document; pass --prefer or use --format markers",
        )?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{}", style::success(&format!("Output written to {}", path.display())));
        }
        None if args.format == OutputFormat::Json => println!("{}", rendered),
        None => print!("{}", rendered),
    }

    if open > 0 {
        Ok(ExitCode::from(EXIT_CONFLICTS))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

const DEFAULT_CONFIG: &str = r#"# trimerge configuration
# Every setting is optional; the values below are the defaults.

[diff]
ignore_whitespace = false
algorithm = "myers"      # myers | patience | lcs
timeout_ms = 0           # 0 = no deadline

[markers]
style = "merge"          # merge | diff3
size = 7
ours_label = "ours"
theirs_label = "theirs"
base_label = "base"

[logging]
level = "warn"           # trace | debug | info | warn | error
"#;

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(output, DEFAULT_CONFIG).context("failed to write config file")?;

    println!(
        "{}",
        style::success(&format!(
            "Default configuration written to {}",
            output.display()
        ))
    );
    println!();
    println!("Next steps:");
    println!("  1. Edit the config file to taste");
    println!(
        "  2. Validate with: trimerge validate --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let config =
        MergeConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    match config.validate() {
        Ok(()) => {
            println!("  [OK] All values are valid");
        }
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("{}", style::header("Configuration summary:"));
    println!("  Algorithm        : {}", config.diff.algorithm);
    println!("  Ignore whitespace: {}", config.diff.ignore_whitespace);
    println!(
        "  Diff timeout     : {}",
        match config.diff.timeout_ms {
            0 => "none".to_string(),
            ms => format!("{}ms", ms),
        }
    );
    println!(
        "  Marker style     : {}",
        match config.markers.style {
            MarkerStyle::Merge => "merge",
            MarkerStyle::Diff3 => "diff3",
        }
    );
    println!("  Marker size      : {}", config.markers.size);
    println!(
        "  Labels           : {} / {} / {}",
        config.markers.ours_label, config.markers.base_label, config.markers.theirs_label
    );
    println!("  Log level        : {}", config.logging.level);
    println!();
    println!("{}", style::dim("Configuration is valid."));

    Ok(())
}
