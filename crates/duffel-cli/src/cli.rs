//! duffel CLI - query and merge configuration files
//!
//! Usage:
//!   duffel get config.yaml database.host
//!   duffel keys base.yaml override.yaml --key database
//!   duffel dump base.yaml override.yaml --format json
//!   duffel check config.yaml

use clap::{Parser, Subcommand};
use colored::Colorize;
use duffel_core::{Conf, Value, DEFAULT_SEPARATOR};
use std::path::PathBuf;
use std::process::ExitCode;

/// duffel - compound-key configuration queries over merged files
#[derive(Parser)]
#[command(name = "duffel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a specific value from the configuration
    Get {
        /// Configuration file(s), merged in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Compound key of the value (e.g., database.host)
        key: String,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Default value if the key is not found
        #[arg(short, long)]
        default: Option<String>,

        /// Compound-key separator
        #[arg(short, long, default_value = DEFAULT_SEPARATOR)]
        separator: String,
    },

    /// List top-level keys of the configuration or of a sub-mapping
    Keys {
        /// Configuration file(s), merged in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Compound key of a sub-mapping; lists the root when omitted
        #[arg(short, long)]
        key: Option<String>,

        /// Compound-key separator
        #[arg(short, long, default_value = DEFAULT_SEPARATOR)]
        separator: String,
    },

    /// Export the merged configuration
    Dump {
        /// Configuration file(s), merged in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: yaml, json
        #[arg(short, long, default_value = "yaml")]
        format: String,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Quick syntax check without querying
    Check {
        /// Configuration file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Run the CLI with the given arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            files,
            key,
            format,
            default,
            separator,
        } => cmd_get(files, &key, &format, default, &separator),

        Commands::Keys {
            files,
            key,
            separator,
        } => cmd_keys(files, key, &separator),

        Commands::Dump {
            files,
            format,
            output,
        } => cmd_dump(files, &format, output),

        Commands::Check { files } => cmd_check(files),
    }
}

fn load_config(files: &[PathBuf], separator: &str) -> Result<Conf, String> {
    if files.is_empty() {
        return Err("No configuration files specified".to_string());
    }

    let merged =
        Conf::load_merged(files).map_err(|e| format!("Failed to load configuration: {}", e))?;

    if separator == DEFAULT_SEPARATOR {
        return Ok(merged);
    }

    // Rebuild under the requested separator
    Conf::from_sources_with_separator([merged.to_value()], separator).map_err(|e| e.to_string())
}

fn cmd_get(
    files: Vec<PathBuf>,
    key: &str,
    format: &str,
    default: Option<String>,
    separator: &str,
) -> ExitCode {
    let conf = match load_config(&files, separator) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match conf.get(key) {
        Ok(value) => {
            print_value(&value, format);
            ExitCode::SUCCESS
        }
        Err(_) => {
            if let Some(default_val) = default {
                println!("{}", default_val);
                ExitCode::SUCCESS
            } else {
                eprintln!("{}: Key '{}' not found", "Error".red(), key);
                ExitCode::from(1)
            }
        }
    }
}

fn print_value(value: &Value, format: &str) {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(value).unwrap());
        }
        "yaml" => {
            let yaml = serde_yaml::to_string(value).unwrap();
            print!("{}", yaml);
        }
        _ => {
            // Text format - scalars print bare, structures as YAML
            match value {
                Value::String(s) => println!("{}", s),
                Value::Integer(i) => println!("{}", i),
                Value::Float(f) => println!("{}", f),
                Value::Bool(b) => println!("{}", b),
                Value::Null => println!("null"),
                _ => {
                    let yaml = serde_yaml::to_string(value).unwrap();
                    print!("{}", yaml);
                }
            }
        }
    }
}

fn cmd_keys(files: Vec<PathBuf>, key: Option<String>, separator: &str) -> ExitCode {
    let conf = match load_config(&files, separator) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let node = match &key {
        Some(k) => match conf.node(k) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("{}: {}", "Error".red(), e);
                return ExitCode::from(1);
            }
        },
        None => conf,
    };

    for name in node.keys() {
        println!("{}", name);
    }
    ExitCode::SUCCESS
}

fn cmd_dump(files: Vec<PathBuf>, format: &str, output: Option<PathBuf>) -> ExitCode {
    let conf = match load_config(&files, DEFAULT_SEPARATOR) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let result = match format {
        "json" => conf.to_json(),
        _ => conf.to_yaml(),
    };

    match result {
        Ok(content) => {
            if let Some(output_path) = output {
                if let Err(e) = std::fs::write(&output_path, &content) {
                    eprintln!("{}: {}", "Error writing file".red(), e);
                    return ExitCode::from(2);
                }
                eprintln!("{} Wrote to {}", "✓".green(), output_path.display());
            } else {
                print!("{}", content);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn cmd_check(files: Vec<PathBuf>) -> ExitCode {
    let mut failures = 0;

    for file in &files {
        match Conf::from_file(file) {
            Ok(_) => {
                println!("{} {}", "✓".green(), file.display());
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}", "✗".red(), file.display());
                eprintln!("{}", e);
            }
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
