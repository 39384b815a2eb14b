use clap::{Parser, Subcommand};
use rule_lexer::config::{LexicalPreferences, RuntimeConfig};
use rule_lexer::logging;
use rule_lexer::utils::{Position, SourceMap};
use rule_lexer::{Matcher, ScannerSet, Token, Tokenizer, TokenizerError};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process;

/// Tokenize rule expressions and probe the token matchers.
#[derive(Parser, Debug)]
#[command(name = "rulelex", author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file with [lexical] and [logging] sections.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of one token per line.
    #[arg(long, global = true)]
    json: bool,

    /// Restrict scanning to these scanner keys, in canonical order.
    #[arg(long, global = true, value_delimiter = ',')]
    scanners: Vec<String>,

    /// Keep identifier case as written.
    #[arg(long, global = true)]
    case_sensitive: bool,

    /// Print per-category token counts after tokenizing.
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tokenize an expression (read from stdin when omitted).
    Tokenize { expression: Option<String> },

    /// Apply a named matcher to the tokens of an expression.
    Match {
        name: String,
        expression: String,

        /// Token index to start matching at.
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// List the scanner keys in scanning order.
    Scanners,
}

#[derive(Serialize)]
struct MatchReport<'a> {
    matcher: &'a str,
    offset: usize,
    matched: bool,
    consumed: usize,
    tokens: &'a [Token],
}

fn main() {
    let cli = Cli::parse();

    if let Err(message) = run(&cli) {
        eprintln!("{}", message.trim_end());
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => RuntimeConfig::load(path).map_err(|e| format!("error: {}\n", e))?,
        None => RuntimeConfig::default(),
    };

    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;

    if let Some(path) = &cli.config {
        rule_lexer::log_info!("Loaded runtime configuration", "path" => path.display());
    }

    let tokenizer = build_tokenizer(cli, config.lexical);

    match &cli.command {
        Command::Tokenize { expression } => {
            let input = match expression {
                Some(expression) => expression.clone(),
                None => read_stdin()?,
            };
            tokenize_command(cli, &tokenizer, &input)
        }
        Command::Match {
            name,
            expression,
            offset,
        } => match_command(cli, &tokenizer, name, expression, *offset),
        Command::Scanners => {
            for key in tokenizer.scanners().keys() {
                if let Some(scanner) = tokenizer.scanners().get(key) {
                    println!("{:<22} {:<20} {}", key, scanner.category(), scanner.pattern());
                }
            }
            Ok(())
        }
    }
}

fn build_tokenizer(cli: &Cli, mut preferences: LexicalPreferences) -> Tokenizer {
    preferences.case_sensitive |= cli.case_sensitive;
    preferences.collect_metrics |= cli.metrics;

    if cli.scanners.is_empty() {
        return Tokenizer::with_preferences(preferences);
    }

    let scanners = ScannerSet::with_case_sensitivity(preferences.case_sensitive)
        .restrict_to(&cli.scanners[..]);
    Tokenizer::with_preferences(preferences).using_scanners(scanners)
}

fn tokenize_command(cli: &Cli, tokenizer: &Tokenizer, input: &str) -> Result<(), String> {
    let (tokens, metrics) = tokenizer
        .tokenize_with_metrics(input)
        .map_err(|e| render_error(input, &e))?;

    if cli.json {
        let output = if cli.metrics {
            serde_json::json!({ "tokens": tokens, "metrics": metrics })
        } else {
            serde_json::json!({ "tokens": tokens })
        };
        let text = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    for token in &tokens {
        println!(
            "{:<20} {:<9} {:<24} {}",
            token.category(),
            token.value().type_name(),
            token.value().to_string(),
            token
        );
    }

    if cli.metrics {
        println!();
        println!("tokens: {}", metrics.total_tokens);
        println!("whitespace skipped: {}", metrics.whitespace_skipped);
        println!("max nesting: {}", metrics.max_nesting);
        for (category, count) in &metrics.category_counts {
            println!("  {:<20} {}", category, count);
        }
    }

    Ok(())
}

fn match_command(
    cli: &Cli,
    tokenizer: &Tokenizer,
    name: &str,
    input: &str,
    offset: usize,
) -> Result<(), String> {
    let tokens = tokenizer
        .tokenize(input)
        .map_err(|e| render_error(input, &e))?;
    let outcome = Matcher::named(name).match_tokens(&tokens, offset);

    if cli.json {
        let report = MatchReport {
            matcher: name,
            offset,
            matched: outcome.matched,
            consumed: outcome.consumed(),
            tokens: outcome.tokens,
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    if outcome.matched {
        println!("matched {} token(s) at {}", outcome.consumed(), offset);
        for token in outcome.tokens {
            println!("  {:<20} {}", token.category(), token);
        }
    } else {
        println!("no match at {}", offset);
    }

    Ok(())
}

fn render_error(input: &str, error: &TokenizerError) -> String {
    let position = error
        .position()
        .unwrap_or_else(|| Position::locate(input, input.len()));
    SourceMap::new(input).format_error(position, &error.to_string())
}

fn read_stdin() -> Result<String, String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("error: failed to read stdin: {}\n", e))?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
