use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use vcr_core::normalizer::normalize_uri;
use vcr_core::{HttpInteraction, MatchAttribute};

/// VCR — canonical HTTP interaction CLI
///
/// Normalize, check, and fingerprint recorded HTTP interactions.
#[derive(Parser)]
#[command(name = "vcr", version, about, long_about = None)]
struct Cli {
    /// Log normalization decisions (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of an interaction
    Normalize {
        /// Path to interaction .json file
        file: PathBuf,
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Exit 1 unless the interaction is already canonical
    Check {
        /// Path to interaction .json file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the SHA-256 of an interaction's canonical form
    Hash {
        /// Path to interaction .json file
        file: PathBuf,
    },

    /// Print the canonical form of a URI
    Uri {
        /// URI to normalize
        uri: String,
    },

    /// Show the request attributes a matcher would compare
    Matcher {
        /// Path to interaction .json file
        file: PathBuf,
        /// Attributes to match on (method, uri, body, headers)
        #[arg(long, value_delimiter = ',', default_values_t = MatchAttribute::DEFAULT)]
        match_on: Vec<MatchAttribute>,
    },

    /// Show version information
    Version,
}

const EXIT_OK: i32 = 0;
const EXIT_NOT_CANONICAL: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let exit_code = match cli.command {
        Commands::Normalize { file, compact } => cmd_normalize(&file, compact),
        Commands::Check { file, json } => cmd_check(&file, json),
        Commands::Hash { file } => cmd_hash(&file),
        Commands::Uri { uri } => {
            println!("{}", normalize_uri(&uri));
            EXIT_OK
        }
        Commands::Matcher { file, match_on } => cmd_matcher(&file, match_on),
        Commands::Version => {
            println!(
                "vcr {} (vcr-core {})",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_VERSION")
            );
            EXIT_OK
        }
    };

    process::exit(exit_code);
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

// ── Commands ──────────────────────────────────────────────

fn cmd_normalize(file: &Path, compact: bool) -> i32 {
    let interaction = match load_interaction(file) {
        Ok(interaction) => interaction,
        Err(msg) => return report_error(&msg),
    };
    let rendered = if compact {
        serde_json::to_string(&interaction)
    } else {
        serde_json::to_string_pretty(&interaction)
    };
    match rendered {
        Ok(text) => {
            println!("{}", text);
            EXIT_OK
        }
        Err(e) => report_error(&format!("cannot serialize interaction: {}", e)),
    }
}

fn cmd_check(file: &Path, json: bool) -> i32 {
    let text = match read_file(file) {
        Ok(text) => text,
        Err(msg) => return report_error(&msg),
    };
    let original: serde_json::Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => return report_error(&format!("{}: invalid JSON: {}", file.display(), e)),
    };
    let interaction = match parse_interaction(file, &text) {
        Ok(interaction) => interaction,
        Err(msg) => return report_error(&msg),
    };
    let canonical = match serde_json::to_value(&interaction) {
        Ok(value) => value,
        Err(e) => return report_error(&format!("cannot serialize interaction: {}", e)),
    };

    let is_canonical = original == canonical;
    debug!("{}: canonical = {}", file.display(), is_canonical);

    if json {
        let report = serde_json::json!({
            "file": file.display().to_string(),
            "canonical": is_canonical,
        });
        println!("{}", report);
    } else if is_canonical {
        println!("{} {}", "canonical".green().bold(), file.display());
    } else {
        eprintln!("{} {}", "not canonical".yellow().bold(), file.display());
    }

    if is_canonical {
        EXIT_OK
    } else {
        EXIT_NOT_CANONICAL
    }
}

fn cmd_hash(file: &Path) -> i32 {
    let interaction = match load_interaction(file) {
        Ok(interaction) => interaction,
        Err(msg) => return report_error(&msg),
    };
    match interaction.canonical_hash() {
        Ok(hash) => {
            println!("{}", hash);
            EXIT_OK
        }
        Err(e) => report_error(&e.to_string()),
    }
}

fn cmd_matcher(file: &Path, match_on: Vec<MatchAttribute>) -> i32 {
    let interaction = match load_interaction(file) {
        Ok(interaction) => interaction,
        Err(msg) => return report_error(&msg),
    };
    let matcher = interaction.request().matcher(match_on);
    match serde_json::to_string_pretty(&matcher) {
        Ok(text) => {
            println!("{}", text);
            EXIT_OK
        }
        Err(e) => report_error(&format!("cannot serialize matcher: {}", e)),
    }
}

// ── Helpers ───────────────────────────────────────────────

fn read_file(file: &Path) -> Result<String, String> {
    fs::read_to_string(file).map_err(|e| format!("{}: {}", file.display(), e))
}

fn parse_interaction(file: &Path, text: &str) -> Result<HttpInteraction, String> {
    serde_json::from_str(text).map_err(|e| format!("{}: invalid interaction: {}", file.display(), e))
}

fn load_interaction(file: &Path) -> Result<HttpInteraction, String> {
    let text = read_file(file)?;
    parse_interaction(file, &text)
}

fn report_error(msg: &str) -> i32 {
    eprintln!("{}: {}", "error".red().bold(), msg);
    EXIT_ERROR
}
