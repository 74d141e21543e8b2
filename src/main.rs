//! @ai:module:intent CLI entry point for the SCSS documentation comment parser
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on parser, linter, config, output

use clap::{Parser, Subcommand, ValueEnum};
use scss_comment_parser::{linter, output, Config, OutputFormat, ScssCommentParser};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scssdoc")]
#[command(author, version, about = "Parse and check SCSS documentation comments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its documentation comments grouped by construct
    Parse {
        /// Path to the SCSS file
        path: PathBuf,

        /// Path to a configuration file (defaults to .scssdoc.toml next to the input)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "json-pretty")]
        format: Format,
    },

    /// Check documentation comments for unknown annotations and malformed blocks
    Check {
        /// Path to file or directory to check
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Path to a configuration file (defaults to .scssdoc.toml in the checked directory)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Treat unknown annotations as errors
        #[arg(long, default_value = "false")]
        strict: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn load_config(explicit: Option<&Path>, input: &Path) -> scss_comment_parser::Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => {
            let dir = if input.is_dir() {
                input
            } else {
                input.parent().unwrap_or(Path::new("."))
            };
            Config::discover(dir)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            path,
            config,
            format,
        } => {
            let config = match load_config(config.as_deref(), &path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            };

            if !path.is_file() {
                eprintln!("Error: parse command requires a file path");
                return ExitCode::from(2);
            }

            let parser = ScssCommentParser::new(config.registry());
            let rendered = parser
                .parse_file(&path)
                .and_then(|parsed| output::format_parse_result(&parsed, format.into()));
            match rendered {
                Ok(text) => {
                    println!("{}", text);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }

        Commands::Check {
            path,
            config,
            strict,
            format,
        } => {
            let mut config = match load_config(config.as_deref(), &path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            };
            config.strict |= strict;

            let parser = ScssCommentParser::new(config.registry());
            let result = if path.is_file() {
                linter::check_file(&path, &parser, &config)
            } else {
                linter::check_directory(&path, &parser, &config)
            };

            match result {
                Ok(lint_result) => {
                    match output::format_lint_result(&lint_result, format.into()) {
                        Ok(text) => println!("{}", text),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            return ExitCode::from(2);
                        }
                    }

                    if lint_result.passed() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(1)
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }
    }
}
