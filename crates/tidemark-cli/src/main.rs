//! `tidemark` - generate CSS design tokens from the token source of truth.
//!
//! Usage:
//!   tidemark [generate] [--source <path>] [--output <path>] [--stdout] [--strict]
//!   tidemark check                        - exit 3 if the stylesheet is stale
//!   tidemark convert <hex>...             - print OKLCH values
//!   tidemark inspect [--json]             - show parsed palettes and the resolved focus ring

use std::error::Error as _;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tidemark_core::pipeline::{self, Freshness, Generated};
use tidemark_core::{color_space, Config, TidemarkError};
use tidemark_parse::Document;
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
/// Exit code for `check` when the output does not match the source.
const EXIT_STALE: u8 = 3;

#[derive(Parser)]
#[command(name = "tidemark", version)]
#[command(about = "Derive focus-ring CSS custom properties from design-token sources")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file (default: ./tidemark.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate the stylesheet (default)
    Generate {
        #[command(flatten)]
        paths: PathArgs,
        /// Print the stylesheet instead of writing it
        #[arg(long)]
        stdout: bool,
        /// Fail instead of falling back on missing tokens or colors
        #[arg(long)]
        strict: bool,
    },

    /// Verify the stylesheet matches the token source (ignores the timestamp)
    Check {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Convert hex colors to OKLCH using the built-in table
    Convert {
        #[arg(required = true)]
        colors: Vec<String>,
    },

    /// Show what the token source resolves to
    Inspect {
        #[arg(long)]
        source: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Default)]
struct PathArgs {
    /// Token source (overrides paths.source)
    #[arg(long)]
    source: Option<PathBuf>,
    /// Generated stylesheet (overrides paths.output)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl PathArgs {
    fn apply(self, config: &mut Config) {
        if let Some(source) = self.source {
            config.paths.source = source;
        }
        if let Some(output) = self.output {
            config.paths.output = output;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    ExitCode::from(exit_status(run(cli)))
}

/// Map a run result to the process exit code, reporting any error.
fn exit_status(result: Result<u8, TidemarkError>) -> u8 {
    match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            EXIT_FAILURE
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tidemark={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<u8, TidemarkError> {
    let Cli { command, config, .. } = cli;
    let load_config = || Config::load(config.as_deref());

    let command = command.unwrap_or(Command::Generate {
        paths: PathArgs::default(),
        stdout: false,
        strict: false,
    });

    match command {
        Command::Generate {
            paths,
            stdout,
            strict,
        } => {
            let mut config = load_config()?;
            paths.apply(&mut config);
            config.strict |= strict;
            generate(&config, stdout)
        }
        Command::Check { paths } => {
            let mut config = load_config()?;
            paths.apply(&mut config);
            check(&config)
        }
        Command::Convert { colors } => {
            convert(&colors);
            Ok(EXIT_SUCCESS)
        }
        Command::Inspect { source, json } => {
            let mut config = load_config()?;
            if let Some(source) = source {
                config.paths.source = source;
            }
            inspect(&config, json)
        }
    }
}

fn generate(config: &Config, stdout: bool) -> Result<u8, TidemarkError> {
    if stdout {
        let generated = pipeline::build(config, Utc::now())?;
        print!("{}", generated.css);
        return Ok(EXIT_SUCCESS);
    }

    let report = pipeline::generate(config)?;
    let focus = &report.generated.focus;
    println!(
        "Focus ring: {} -> {} ({})",
        focus.light.hex, focus.light_css.value, focus.light.resolution
    );
    if focus.dark.hex != focus.light.hex {
        println!(
            "Focus ring (dark): {} -> {} ({})",
            focus.dark.hex, focus.dark_css.value, focus.dark.resolution
        );
    }
    println!("Wrote {}", report.output.display());
    Ok(EXIT_SUCCESS)
}

fn check(config: &Config) -> Result<u8, TidemarkError> {
    let output = config.paths.output.display();
    match pipeline::check(config)? {
        Freshness::UpToDate => {
            println!("{output} is up to date");
            Ok(EXIT_SUCCESS)
        }
        Freshness::Stale { generated_at } => {
            match generated_at {
                Some(at) => eprintln!("{output} is stale (generated {at}); run `tidemark generate`"),
                None => eprintln!("{output} is stale; run `tidemark generate`"),
            }
            Ok(EXIT_STALE)
        }
        Freshness::Missing => {
            eprintln!("{output} does not exist; run `tidemark generate`");
            Ok(EXIT_STALE)
        }
    }
}

fn convert(colors: &[String]) {
    for color in colors {
        let conversion = color_space::to_oklch(color);
        println!("{}\t{}", conversion.input, conversion.value);
    }
}

fn inspect(config: &Config, json: bool) -> Result<u8, TidemarkError> {
    let document = pipeline::load_document(&config.paths.source)?;
    let generated = pipeline::build_from(&document, config, Utc::now());

    if json {
        let mut out = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &inspect_json(config, &document, &generated))
            .map_err(std::io::Error::from)?;
        writeln!(out)?;
        return Ok(EXIT_SUCCESS);
    }

    println!("Source: {}", config.paths.source.display());
    for palette in document.palettes() {
        let shades: Vec<String> = palette
            .shades
            .iter()
            .map(|(shade, hex)| format!("{shade}={hex}"))
            .collect();
        println!("  {} {}", palette.name, shades.join(" "));
    }
    let focus = &generated.focus;
    println!(
        "Focus ring: {} -> {} ({})",
        focus.light.hex, focus.light_css.value, focus.light.resolution
    );
    println!(
        "Focus ring (dark): {} -> {} ({})",
        focus.dark.hex, focus.dark_css.value, focus.dark.resolution
    );
    for degradation in &generated.degradations {
        println!("  fallback: {degradation}");
    }
    for diagnostic in &document.diagnostics {
        println!("  skipped line {}: {}", diagnostic.line, diagnostic.message);
    }
    Ok(EXIT_SUCCESS)
}

fn inspect_json(config: &Config, document: &Document, generated: &Generated) -> serde_json::Value {
    serde_json::json!({
        "source": config.paths.source,
        "palettes": document.palettes(),
        "roles": document.roles,
        "focus": generated.focus,
        "degradations": generated.degradations,
        "diagnostics": document.diagnostics,
    })
}

/// Print the error and its cause chain.
fn report_error(error: &TidemarkError) {
    tracing::error!("{error}");
    let mut cause = error.source();
    while let Some(inner) = cause {
        eprintln!("  caused by: {inner}");
        cause = inner.source();
    }
}
