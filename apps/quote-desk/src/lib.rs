//! # quote-desk: Quotation Draft Front
//!
//! Holds the quotation being edited, recomputes it after every change and
//! produces the submission payload. All pricing is delegated to
//! `quote-core`.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        quote-desk                                       │
//! │                                                                         │
//! │  main.rs ────► calls run()                                              │
//! │                                                                         │
//! │  lib.rs ─────► logging, configuration, CLI dispatch                     │
//! │                                                                         │
//! │  commands/ ──► price_items, add_line, update_line, submit_quotation     │
//! │                                                                         │
//! │  state/ ─────► DraftState (reducer), ConfigState (QUOTE_* env vars)     │
//! │                                                                         │
//! │  error.rs ───► ApiError { code, message }                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## CLI
//! ```text
//! quote-desk totals <FILE> [--format json|text]   price a list of rows or a quotation
//! quote-desk submit <FILE>                        validate a quotation, print the payload
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quote_core::{LineItem, Quotation};

use error::ApiError;
use state::{ConfigState, DraftState};

/// Quotation totals and submission from the command line
#[derive(Debug, Parser)]
#[command(name = "quote-desk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a JSON array of line items, or a quotation
    Totals {
        /// Input JSON file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Load a quotation as a draft, validate it and print the submission payload
    Submit {
        /// Quotation JSON file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Accepted shapes for `totals` input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalsInput {
    Items(Vec<LineItem>),
    Quotation(Box<Quotation>),
}

impl TotalsInput {
    fn into_items(self) -> Vec<LineItem> {
        match self {
            TotalsInput::Items(items) => items,
            TotalsInput::Quotation(quotation) => quotation.items,
        }
    }
}

/// Runs the CLI.
///
/// ## Startup Sequence
/// 1. Parse arguments
/// 2. Initialize logging (`-v` or `RUST_LOG`)
/// 3. Load `QUOTE_*` configuration
/// 4. Execute the command and print its output to stdout
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ConfigState::load()?;
    info!(
        tenant_id = %config.tenant_id,
        currency = %config.currency_code,
        "Configuration loaded"
    );

    let output = execute(cli.command, &config)?;
    println!("{}", output);
    Ok(())
}

/// Executes one command and returns what should be printed.
pub fn execute(command: Command, config: &ConfigState) -> Result<String, ApiError> {
    match command {
        Command::Totals { file, format } => {
            let input: TotalsInput = serde_json::from_str(&read_input(&file)?)?;
            let items = input.into_items();
            let breakdown = commands::price_items(&items)?;

            match format {
                OutputFormat::Json => Ok(to_json(&breakdown)?),
                OutputFormat::Text => Ok(commands::render_text(&items, &breakdown, config)),
            }
        }
        Command::Submit { file } => {
            let quotation: Quotation = serde_json::from_str(&read_input(&file)?)?;
            let drafts = DraftState::new();
            commands::open_quotation(&drafts, quotation)?;
            let submission = commands::submit_quotation(&drafts, config, Utc::now())?;
            to_json(&submission)
        }
    }
}

fn read_input(path: &Path) -> Result<String, ApiError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ApiError::not_found("File", &path.display().to_string()),
        _ => ApiError::internal(format!("Cannot read {}: {}", path.display(), e)),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set
/// - otherwise `-v` raises the level: warn, info, debug, trace
///
/// Logs go to stderr so stdout stays clean JSON.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn,quote_desk_lib=info",
        1 => "info,quote_desk_lib=debug",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_input(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const ITEMS: &str = r#"[
        {
            "productId": "SKU-1",
            "quantity": "2",
            "unitPrice": "100.00",
            "discountPercentage": "10",
            "taxEntries": [{ "name": "VAT", "rate": "5" }]
        },
        {
            "productId": "SKU-2",
            "quantity": "1",
            "unitPrice": "100.00",
            "taxEntries": [
                { "name": "VAT", "rate": "5" },
                { "name": "Levy", "rate": "3" }
            ]
        }
    ]"#;

    const QUOTATION: &str = r#"{
        "id": "8f2d6c1e-0000-4000-8000-000000000042",
        "tenantId": "00000000-0000-0000-0000-000000000001",
        "quotationNumber": "QT-2024-0042",
        "title": "Office chairs",
        "issuedOn": "2024-03-01",
        "items": [
            {
                "productId": "CHAIR-1",
                "quantity": "4",
                "unitPrice": "120.00",
                "discountPercentage": "5",
                "taxEntries": [{ "name": "VAT", "rate": "20" }]
            }
        ],
        "createdAt": "2024-03-01T09:00:00Z",
        "updatedAt": "2024-03-01T09:00:00Z"
    }"#;

    #[test]
    fn test_cli_parses_totals() {
        let cli = Cli::try_parse_from(["quote-desk", "-vv", "totals", "in.json", "--format", "text"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Totals {
                format: OutputFormat::Text,
                ..
            }
        ));
    }

    #[test]
    fn test_totals_json_from_items() {
        let file = write_input(ITEMS);
        let output = execute(
            Command::Totals {
                file: file.path().to_path_buf(),
                format: OutputFormat::Json,
            },
            &ConfigState::default(),
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["totals"]["subtotal"], "300.00");
        assert_eq!(json["totals"]["discountAmount"], "20.00");
        assert_eq!(json["totals"]["taxAmount"], "17.00");
        assert_eq!(json["totals"]["total"], "297.00");
        assert_eq!(json["lines"][0]["totalAmount"], "189.00");
    }

    #[test]
    fn test_totals_text_from_quotation() {
        let file = write_input(QUOTATION);
        let output = execute(
            Command::Totals {
                file: file.path().to_path_buf(),
                format: OutputFormat::Text,
            },
            &ConfigState::default(),
        )
        .unwrap();

        // 4 × 120.00 = 480.00, −24.00, VAT 20% of 456.00 = 91.20
        assert!(output.contains("$480.00"));
        assert!(output.contains("$547.20"));
    }

    #[test]
    fn test_submit_prints_payload() {
        let file = write_input(QUOTATION);
        let output = execute(
            Command::Submit {
                file: file.path().to_path_buf(),
            },
            &ConfigState::default(),
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["quotation"]["quotationNumber"], "QT-2024-0042");
        assert_eq!(json["quotation"]["expiresOn"], "2024-03-31");
        assert_eq!(json["totals"]["total"], "547.20");
        assert_eq!(json["taxSummary"][0]["name"], "VAT");
    }

    #[test]
    fn test_invalid_row_fails_with_position() {
        let file = write_input(
            r#"[{ "productId": "A", "quantity": "1", "unitPrice": "1.00" },
                { "productId": "B", "quantity": "-1", "unitPrice": "1.00" }]"#,
        );
        let err = execute(
            Command::Totals {
                file: file.path().to_path_buf(),
                format: OutputFormat::Json,
            },
            &ConfigState::default(),
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidLineItem);
        assert!(err.message.contains("#2"));
    }

    #[test]
    fn test_oversized_row_is_an_error_not_a_crash() {
        let file = write_input(
            r#"[{ "productId": "A", "quantity": "1000000000000000", "unitPrice": "1000000000000000" }]"#,
        );
        let err = execute(
            Command::Totals {
                file: file.path().to_path_buf(),
                format: OutputFormat::Json,
            },
            &ConfigState::default(),
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidLineItem);
        assert!(err.message.contains("too large"));
    }

    #[test]
    fn test_missing_and_malformed_input() {
        let missing = execute(
            Command::Submit {
                file: PathBuf::from("/nonexistent/quotation.json"),
            },
            &ConfigState::default(),
        )
        .unwrap_err();
        assert_eq!(missing.code, ErrorCode::NotFound);

        let file = write_input("{ not json");
        let malformed = execute(
            Command::Totals {
                file: file.path().to_path_buf(),
                format: OutputFormat::Json,
            },
            &ConfigState::default(),
        )
        .unwrap_err();
        assert_eq!(malformed.code, ErrorCode::ValidationError);
    }
}
