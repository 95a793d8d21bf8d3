//! Command-line interface for raml-highlight
//! Highlights a RAML file and prints the classified fragments or the include targets.
//!
//! Usage:
//!   ramlhl `<path>` [--config `<file>`] [--format `<format>`] [--tab-size `<n>`]
//!   ramlhl --list-formats

mod output;

use clap::{value_parser, Arg, ArgAction, Command};
use output::{Format, FORMATS};
use raml_highlight::raml::{Highlighter, RamlMode};
use raml_highlight_config::{ConfigError, Loader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Picked up from the working directory when no `--config` is given.
const LOCAL_CONFIG: &str = "raml-highlight.toml";

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("error formatting tokens: {0}")]
    Json(#[from] serde_json::Error),
    #[error("format '{0}' not supported")]
    UnknownFormat(String),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("ramlhl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Highlight RAML files with embedded Markdown, JSON and XML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the RAML file")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (token-json, token-simple, links)")
                .default_value("token-json"),
        )
        .arg(
            Arg::new("tab-size")
                .long("tab-size")
                .help("Visual width of a tab when computing columns")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("A path is required unless listing formats");
        std::process::exit(1);
    };
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("token-json");
    let config = matches.get_one::<String>("config").map(String::as_str);
    let tab_size = matches.get_one::<u32>("tab-size").copied();

    match handle_highlight_command(path, format, config, tab_size) {
        Ok(rendered) => print!("{rendered}"),
        Err(error) => {
            eprintln!("Error: {error}");
            if matches!(error, CliError::UnknownFormat(_)) {
                eprintln!("\nAvailable formats:");
                for (name, _) in FORMATS {
                    eprintln!("  {name}");
                }
            }
            std::process::exit(1);
        }
    }
}

/// Handle the highlight command
fn handle_highlight_command(
    path: &str,
    format: &str,
    config: Option<&str>,
    tab_size: Option<u32>,
) -> Result<String, CliError> {
    let format = Format::parse(format).ok_or_else(|| CliError::UnknownFormat(format.to_string()))?;

    let mut loader = match config {
        Some(file) => Loader::new().with_file(file),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    if let Some(tab_size) = tab_size {
        loader = loader.set_override("render.tab_size", i64::from(tab_size))?;
    }
    let settings = loader.build()?;
    debug!(?settings, "loaded configuration");

    let source = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })?;

    let mode = RamlMode::new(settings.mode_options());
    let highlighter = Highlighter::new(&mode)
        .with_tab_size(settings.render.tab_size)
        .with_text(&source);

    let rendered = match format {
        Format::TokenJson => output::token_json(&highlighter)? + "\n",
        Format::TokenSimple => output::token_simple(&highlighter),
        Format::Links => {
            let parent = Path::new(path)
                .parent()
                .map(|dir| dir.to_string_lossy().into_owned())
                .unwrap_or_default();
            output::links(&highlighter, &parent)
        }
    };
    Ok(rendered)
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available output formats:\n");
    for (name, description) in FORMATS {
        println!("  {name}");
        println!("    {description}");
        println!();
    }
}
