//! Movie Intent Extractor CLI
//!
//! A thin wrapper around movie-intent-core that provides the command-line interface.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use movie_intent_core::cache::FileCache;
use movie_intent_core::http::HttpClient;
use movie_intent_core::{classify_with_max_len, Config, Intent};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "movie-intent")]
#[command(about = "Classify movie chat messages into structured intents")]
struct Args {
    /// User message in natural language (reads one message per stdin line if omitted)
    user_text: Option<String>,

    /// Fetch a JSON URL through the response cache instead of classifying
    #[arg(long = "fetch", value_name = "URL")]
    fetch_url: Option<String>,

    /// Cache time-to-live in seconds for --fetch (defaults to config)
    #[arg(long)]
    ttl: Option<u64>,

    /// Bypass the response cache for --fetch
    #[arg(long = "no-cache")]
    no_cache: bool,

    /// Path to a TOML config file (defaults to ./movie_intent.toml)
    #[arg(long = "config")]
    config_path: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v')]
    verbose: bool,
}

// ============================================================================
// Output
// ============================================================================

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MOVIE_INTENT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

// ============================================================================
// Modes
// ============================================================================

fn classify_line(line: &str, config: &Config) -> Option<Intent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(classify_with_max_len(line, config.extract.max_input_len))
}

fn run_classify_stdin(config: &Config, pretty: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if let Some(intent) = classify_line(&line, config) {
            writeln!(out, "{}", to_json(&intent, pretty)?)?;
        }
    }
    Ok(())
}

fn run_fetch(url: &str, args: &Args, config: &Config) -> Result<()> {
    let client = HttpClient::new(&config.http)?;
    let ttl = args.ttl.unwrap_or(config.cache.ttl_secs);

    let cache = if args.no_cache {
        FileCache::disabled()
    } else {
        FileCache::from_config(&config.cache)
    };
    debug!(url, ttl, cache_dir = %cache.dir().display(), "fetching");

    // Only successful responses are worth remembering
    let mut failed = None;
    let result = cache.try_remember(url, ttl, || {
        let response = client.get_json(url, &[]);
        if response.ok {
            Ok(serde_json::to_value(&response)?)
        } else {
            let reason = response
                .error
                .clone()
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            failed = Some(response);
            Err(anyhow!(reason))
        }
    });

    let value = match result {
        Ok(value) => value,
        Err(e) => {
            warn!(url, error = %e, "fetch failed");
            serde_json::to_value(&failed)?
        }
    };

    println!("{}", to_json(&value, args.pretty)?);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config::load(args.config_path.as_deref())?;
    debug!(?config, "loaded configuration");

    if let Some(ref url) = args.fetch_url {
        return run_fetch(url, &args, &config);
    }

    match args.user_text {
        Some(ref text) => {
            let intent = classify_with_max_len(text, config.extract.max_input_len);
            println!("{}", to_json(&intent, args.pretty)?);
        }
        None => run_classify_stdin(&config, args.pretty)?,
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch_args() {
        let args = Args::parse_from(["movie-intent", "--fetch", "http://localhost/x", "--ttl", "5", "--no-cache"]);
        assert_eq!(args.fetch_url.as_deref(), Some("http://localhost/x"));
        assert_eq!(args.ttl, Some(5));
        assert!(args.no_cache);
        assert!(args.user_text.is_none());
    }

    #[test]
    fn test_classify_line_skips_blank() {
        let config = Config::default();
        assert!(classify_line("   ", &config).is_none());
        let intent = classify_line("Recommend sci-fi 7+", &config).unwrap();
        assert_eq!(intent.name(), "find_by_genre_and_rating");
    }

    #[test]
    fn test_classify_line_respects_max_len() {
        let config = Config {
            extract: movie_intent_core::config::ExtractSettings { max_input_len: 13 },
            ..Default::default()
        };
        // "Find a comedy" survives, the year is cut off
        let intent = classify_line("Find a comedy from 1999", &config).unwrap();
        assert_eq!(intent.slots().year, None);
        assert!(intent.slots().genre.is_some());
    }

    #[test]
    fn test_json_output_modes() {
        let intent = movie_intent_core::classify("What's it about?");
        let compact = to_json(&intent, false).unwrap();
        let pretty = to_json(&intent, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert!(compact.contains("\"name\":\"details_followup\""));
    }
}
