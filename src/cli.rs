use crate::{
    app::{self, App, AppOptions},
    catalog::{self, Game},
    config::AppConfig,
    fetch::{self, CatalogSource},
    theme::ThemeState,
    ui, view,
};
use anyhow::{bail, Result};
use std::{
    io::{self, Write},
    path::PathBuf,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => bail!("Unknown format: {value} (use 'text' or 'json')"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum CliAction {
    Ui(AppOptions),
    List {
        filter: Option<String>,
        format: OutputFormat,
        source: AppOptions,
    },
    Show {
        name: String,
        format: OutputFormat,
        source: AppOptions,
    },
    Help,
    Version,
}

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args)? {
        CliAction::Ui(source) => {
            let mut app = App::initialize(&source);
            ui::run(&mut app)
        }
        CliAction::List {
            filter,
            format,
            source,
        } => {
            let loaded = load_catalog(&source);
            let visible = catalog::filter_games(&loaded.games, filter.as_deref().unwrap_or(""));
            print_list(&mut io::stdout().lock(), &visible, format)
        }
        CliAction::Show {
            name,
            format,
            source,
        } => {
            let loaded = load_catalog(&source);
            show_game(&mut io::stdout().lock(), &loaded, &name, format)
        }
        CliAction::Help => {
            print_help();
            Ok(())
        }
        CliAction::Version => {
            println!("Dependo v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn parse_args(args: &[String]) -> Result<CliAction> {
    match args.first().map(String::as_str) {
        Some("help") => return Ok(CliAction::Help),
        Some("version") => return Ok(CliAction::Version),
        _ => {}
    }

    let mut format = OutputFormat::Text;
    let mut source = AppOptions::default();
    let mut filter = None;
    let mut tokens = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(CliAction::Help),
            "--version" | "-V" => return Ok(CliAction::Version),
            "--format" => {
                let Some(value) = iter.next() else {
                    bail!("--format requires a value");
                };
                format = OutputFormat::parse(value)?;
            }
            "--url" => {
                let Some(value) = iter.next() else {
                    bail!("--url requires a value");
                };
                source.url = Some(value.to_string());
            }
            "--file" => {
                let Some(value) = iter.next() else {
                    bail!("--file requires a path");
                };
                source.file = Some(PathBuf::from(value));
            }
            "--filter" => {
                let Some(value) = iter.next() else {
                    bail!("--filter requires a value");
                };
                filter = Some(value.to_string());
            }
            value if value.starts_with("--format=") => {
                format = OutputFormat::parse(value.trim_start_matches("--format="))?;
            }
            value if value.starts_with("--url=") => {
                source.url = Some(value.trim_start_matches("--url=").to_string());
            }
            value if value.starts_with("--file=") => {
                source.file = Some(PathBuf::from(value.trim_start_matches("--file=")));
            }
            value if value.starts_with("--filter=") => {
                filter = Some(value.trim_start_matches("--filter=").to_string());
            }
            value if value.starts_with('-') => bail!("Unknown option: {value}"),
            _ => tokens.push(arg.to_string()),
        }
    }

    let Some(head) = tokens.first() else {
        return Ok(CliAction::Ui(source));
    };
    match head.as_str() {
        "list" => {
            if filter.is_none() && tokens.len() > 1 {
                filter = Some(tokens[1..].join(" "));
            }
            Ok(CliAction::List {
                filter,
                format,
                source,
            })
        }
        "show" => {
            if tokens.len() < 2 {
                bail!("show requires a game name");
            }
            Ok(CliAction::Show {
                name: tokens[1..].join(" "),
                format,
                source,
            })
        }
        other => bail!("Unknown command: {other} (use 'list' or 'show')"),
    }
}

struct LoadedCatalog {
    games: Vec<Game>,
    fetch_failed: bool,
}

fn load_catalog(options: &AppOptions) -> LoadedCatalog {
    let (mut config, warning) = AppConfig::load();
    if let Some(warning) = warning {
        eprintln!("{warning}");
    }
    if let Some(url) = &options.url {
        config.catalog_url = url.clone();
    }
    let source = app::catalog_source(&config, options.file.as_deref());
    load_from(source.as_ref())
}

/// Fetch failures go to stderr and leave an empty catalog behind.
fn load_from(source: &dyn CatalogSource) -> LoadedCatalog {
    let outcome = fetch::load_games(source);
    let fetch_failed = outcome.error.is_some();
    if let Some(error) = outcome.error {
        eprintln!("Failed to load game data from {}: {error}", source.describe());
    }
    let mut games = outcome.games;
    catalog::sort_games(&mut games);
    LoadedCatalog {
        games,
        fetch_failed,
    }
}

fn show_game(
    out: &mut impl Write,
    loaded: &LoadedCatalog,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    match catalog::find_game(&loaded.games, name) {
        Some(game) => print_details(out, game, format),
        None if loaded.fetch_failed => {
            writeln!(out, "No games found.")?;
            Ok(())
        }
        None => bail!("No game named \"{name}\" in the catalog"),
    }
}

fn print_list(out: &mut impl Write, games: &[&Game], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(games)?)?;
        }
        OutputFormat::Text => {
            if games.is_empty() {
                writeln!(out, "No games found.")?;
                return Ok(());
            }
            for game in games {
                writeln!(out, "{}", game.name)?;
                writeln!(out, "  {}", view::summary_line(game))?;
            }
        }
    }
    Ok(())
}

fn print_details(out: &mut impl Write, game: &Game, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(game)?)?;
        }
        OutputFormat::Text => {
            let palette = ThemeState::default().palette();
            let details = view::details_view(game, &palette);
            writeln!(out, "{}", game.name)?;
            for line in details.plain_lines() {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}

fn print_help() {
    println!("Dependo v{}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  dependo                         Launch TUI");
    println!("  dependo list [query]            List games, optionally filtered by name");
    println!("  dependo show <name>             Show dependencies, fixes and download links");
    println!();
    println!("Options:");
    println!("  --filter <query>                Name filter for list (case-insensitive)");
    println!("  --format <json|text>            Output format for list/show");
    println!("  --url <url>                     Fetch the catalog from another URL");
    println!("  --file <path>                   Read the catalog from a local JSON file");
    println!("  -h, --help                      Show help");
    println!("  -V, --version                   Show version");
}
