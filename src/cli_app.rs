//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize, control};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

#[cfg(feature = "http")]
use incident_deck::api::HttpDataSource;
use incident_deck::api::{DataSource, SortDirection, SortOption, SortSpec, StaticDataSource};
use incident_deck::core::config::Config;
use incident_deck::core::errors::DeckError;
use incident_deck::tui::item::{BrowsableItem, ENGLISH, detail_content};
use incident_deck::tui::model::View;
use incident_deck::tui::preferences::{ContrastPreference, SessionOverrides, StartView};
use incident_deck::tui::text::truncate;
use incident_deck::tui::theme::SemanticToken;
use incident_deck::tui::{DashboardRuntimeConfig, run_dashboard};

/// Browse incidents and alerts from the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "ideck",
    author,
    version,
    about = "Incident Deck - terminal dashboard for incidents and alerts",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Launch the interactive dashboard.
    Dashboard(DashboardArgs),
    /// Print one page of a collection.
    List(ListArgs),
    /// Print the full record for one incident or alert.
    Show(ShowArgs),
    /// View configuration state.
    Config(ConfigArgs),
}

/// Which server collection a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Collection {
    Incidents,
    Alerts,
}

impl From<Collection> for View {
    fn from(value: Collection) -> Self {
        match value {
            Collection::Incidents => Self::Incidents,
            Collection::Alerts => Self::Alerts,
        }
    }
}

#[derive(Debug, Clone, Args, Default)]
struct DashboardArgs {
    /// View to open on start (overrides the saved preference).
    #[arg(long, value_enum, value_name = "VIEW")]
    view: Option<Collection>,
    /// Serve built-in demo data instead of calling the API.
    #[arg(long)]
    demo: bool,
    /// Force the high-contrast palette for this session.
    #[arg(long)]
    high_contrast: bool,
}

#[derive(Debug, Clone, Args)]
struct ListArgs {
    /// Collection to list.
    #[arg(value_enum)]
    kind: Collection,
    /// 1-based page number.
    #[arg(long, default_value_t = 1, value_name = "N")]
    page: u32,
    /// Sort field (menu label or API key, e.g. `created` or `created_at`).
    #[arg(long, value_name = "FIELD")]
    sort: Option<String>,
    /// Sort ascending instead of descending.
    #[arg(long, requires = "sort")]
    asc: bool,
    /// Serve built-in demo data instead of calling the API.
    #[arg(long)]
    demo: bool,
}

#[derive(Debug, Clone, Args)]
struct ShowArgs {
    /// Collection the record belongs to.
    #[arg(value_enum)]
    kind: Collection,
    /// Record identifier.
    #[arg(value_name = "ID")]
    id: String,
    /// Serve built-in demo data instead of calling the API.
    #[arg(long)]
    demo: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand, Serialize)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

impl From<DeckError> for CliError {
    fn from(value: DeckError) -> Self {
        match value {
            DeckError::NotFound { .. }
            | DeckError::InvalidConfig { .. }
            | DeckError::MissingConfig { .. }
            | DeckError::ConfigParse { .. } => Self::User(value.to_string()),
            other => Self::Runtime(other.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Dashboard(args) => run_dashboard_command(cli, args),
        Command::List(args) => run_list(cli, args),
        Command::Show(args) => run_show(cli, args),
        Command::Config(args) => run_config(cli, args),
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Ok(Config::load(cli.config.as_deref())?)
}

fn build_source(config: &Config, demo: bool) -> Result<Arc<dyn DataSource>, CliError> {
    if demo {
        let page_size = usize::try_from(config.api.page_size).unwrap_or(25);
        return Ok(Arc::new(StaticDataSource::demo(page_size)));
    }
    #[cfg(feature = "http")]
    return Ok(Arc::new(HttpDataSource::from_config(&config.api)));
    #[cfg(not(feature = "http"))]
    Err(CliError::User(
        "built without the http feature; pass --demo".to_string(),
    ))
}

// ──────────────────── dashboard ────────────────────

fn run_dashboard_command(cli: &Cli, args: &DashboardArgs) -> Result<(), CliError> {
    if cli.json {
        return Err(CliError::User(
            "the dashboard is interactive; --json is not supported".to_string(),
        ));
    }
    if !io::stdout().is_terminal() {
        return Err(CliError::User(
            "the dashboard needs an interactive terminal".to_string(),
        ));
    }

    let config = load_config(cli)?;
    let source = build_source(&config, args.demo)?;
    let overrides = session_overrides(args);
    run_dashboard(DashboardRuntimeConfig {
        config,
        source,
        overrides,
        no_color: cli.no_color,
    })?;
    Ok(())
}

fn session_overrides(args: &DashboardArgs) -> SessionOverrides {
    SessionOverrides {
        start_view: args.view.map(|kind| match View::from(kind) {
            View::Incidents => StartView::Incidents,
            View::Alerts => StartView::Alerts,
        }),
        contrast: args.high_contrast.then_some(ContrastPreference::ForceHigh),
        hint_verbosity: None,
    }
}

// ──────────────────── list ────────────────────

#[derive(Debug, Serialize)]
struct ListRow {
    id: String,
    status: String,
    label: String,
}

fn row<T: BrowsableItem>(item: &T) -> (ListRow, SemanticToken) {
    (
        ListRow {
            id: item.id().to_string(),
            status: item.status_label(),
            label: item.list_label(),
        },
        item.status_token(),
    )
}

fn resolve_sort(
    options: &[SortOption],
    field: Option<&str>,
    asc: bool,
) -> Result<Option<SortSpec>, CliError> {
    let Some(field) = field else {
        return Ok(None);
    };
    let wanted = field.trim().to_ascii_lowercase();
    let option = options
        .iter()
        .find(|opt| opt.key == wanted || opt.label == wanted)
        .ok_or_else(|| {
            let known: Vec<&str> = options.iter().map(|opt| opt.label).collect();
            CliError::User(format!(
                "unknown sort field '{field}' (expected one of: {})",
                known.join(", ")
            ))
        })?;
    Ok(Some(SortSpec {
        field: option.key.to_string(),
        direction: if asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        },
    }))
}

fn run_list(cli: &Cli, args: &ListArgs) -> Result<(), CliError> {
    if args.page == 0 {
        return Err(CliError::User("--page is 1-based".to_string()));
    }
    let config = load_config(cli)?;
    let source = build_source(&config, args.demo)?;
    let view = View::from(args.kind);

    let (rows, meta) = match view {
        View::Incidents => {
            let sort = resolve_sort(
                incident_deck::api::Incident::sort_options(),
                args.sort.as_deref(),
                args.asc,
            )?;
            let page = source.fetch_incidents(args.page, sort.as_ref())?;
            (page.items.iter().map(row).collect::<Vec<_>>(), page.meta)
        }
        View::Alerts => {
            let sort = resolve_sort(
                incident_deck::api::Alert::sort_options(),
                args.sort.as_deref(),
                args.asc,
            )?;
            let page = source.fetch_alerts(args.page, sort.as_ref())?;
            (page.items.iter().map(row).collect::<Vec<_>>(), page.meta)
        }
    };

    match output_mode(cli) {
        OutputMode::Human => {
            let mut stdout = io::stdout().lock();
            writeln!(
                stdout,
                "{}",
                format!("{:<12} {:<13} {}", "ID", "STATUS", view.label()).bold()
            )?;
            for (row, token) in &rows {
                writeln!(
                    stdout,
                    "{:<12} {} {}",
                    row.id,
                    paint_token(&format!("{:<13}", row.status), *token),
                    truncate(&row.label, 80)
                )?;
            }
            let total = meta
                .total_pages
                .map_or_else(String::new, |t| format!(" of {t}"));
            let more = if meta.has_next { ", more available" } else { "" };
            writeln!(
                stdout,
                "{}",
                format!("page {}{total}{more}", meta.current_page).dimmed()
            )?;
        }
        OutputMode::Json => {
            let items: Vec<&ListRow> = rows.iter().map(|(row, _)| row).collect();
            let payload = json!({
                "command": "list",
                "kind": view.as_str(),
                "items": items,
                "meta": meta,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn paint_token(text: &str, token: SemanticToken) -> ColoredString {
    match token {
        SemanticToken::Critical => text.red().bold(),
        SemanticToken::Danger => text.red(),
        SemanticToken::Warning => text.yellow(),
        SemanticToken::Success => text.green(),
        SemanticToken::Accent => text.cyan(),
        SemanticToken::Muted => text.dimmed(),
        SemanticToken::Neutral => text.normal(),
    }
}

// ──────────────────── show ────────────────────

fn run_show(cli: &Cli, args: &ShowArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let source = build_source(&config, args.demo)?;
    let view = View::from(args.kind);

    match view {
        View::Incidents => {
            let item = source.fetch_incident(&args.id)?;
            emit_detail(cli, view, &item)
        }
        View::Alerts => {
            let item = source.fetch_alert(&args.id)?;
            emit_detail(cli, view, &item)
        }
    }
}

fn emit_detail<T: BrowsableItem + Serialize>(
    cli: &Cli,
    view: View,
    item: &T,
) -> Result<(), CliError> {
    match output_mode(cli) {
        OutputMode::Human => {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", detail_content(item, false, &ENGLISH))?;
            stdout.flush()?;
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "show",
                "kind": view.as_str(),
                "item": serde_json::to_value(item)?,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────── config ────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = load_config(cli)?;

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", config.to_toml_redacted()?);
                }
                OutputMode::Json => {
                    let mut value = serde_json::to_value(&config)?;
                    if config.api.token.is_some() {
                        value["api"]["token"] = Value::from("<redacted>");
                    }
                    let payload = json!({
                        "command": "config show",
                        "config": value,
                        "hash": config.stable_hash()?,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
    }
}

// ──────────────────── output ────────────────────

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("DECK_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
