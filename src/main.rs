use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use reqwest::Url;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod api;
mod channel;
mod config;
mod logs;
mod render;
mod schema;
mod settings;
mod status;

use api::{ApiClient, Lifecycle};
use channel::{ChannelEvent, WsConnector};
use config::EditSession;
use logs::{LogSource, LogTail, LogUpdate, PaneCommand};
use settings::DashboardSettings;
use status::{DetailView, Fleet};

pub type Result<T> = anyhow::Result<T>;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Parser)]
#[command(name = "fleet-console")]
#[command(about = "Operator console for a fleet of bot processes", long_about = None)]
struct Cli {
    /// Base URL of the bot manager.
    #[arg(
        long,
        global = true,
        env = "FLEET_CONSOLE_SERVER",
        default_value = "http://127.0.0.1:8080"
    )]
    server: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live fleet overview from the status stream.
    Fleet,
    /// Live status of one bot.
    Watch { id: String },
    /// Tail a bot's log. Type k/j/u/d/b/c/q + Enter to scroll, clear or quit.
    Logs {
        id: String,

        /// Height of the log window in rows.
        #[arg(long, default_value_t = 40)]
        rows: usize,
    },
    /// Tail the manager's own log.
    ManagerLogs {
        /// Height of the log window in rows.
        #[arg(long, default_value_t = 40)]
        rows: usize,
    },
    /// Print a bot's whole log file.
    DumpLogs { id: String },
    /// One-shot fleet list.
    List,
    Start { id: String },
    Stop { id: String },
    Restart { id: String },
    Delete { id: String },
    /// Create a bot from the server's template.
    Create {
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Inspect or edit a bot's configuration.
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
    /// Inspect or edit dashboard settings.
    Settings {
        #[command(subcommand)]
        cmd: SettingsCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// List editable fields, or describe a single one.
    Show { id: String, path: Option<String> },
    /// Apply `path=value` edits and save. `\n` in a value is a line break.
    Set {
        id: String,

        #[arg(required = true)]
        assignments: Vec<String>,

        /// Print the rebuilt configuration instead of saving it.
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    /// Apply `group.key=value` edits and save.
    Set {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base = Url::parse(&cli.server).with_context(|| format!("bad --server {}", cli.server))?;
    let api = ApiClient::new(base);

    match cli.cmd {
        Commands::Fleet => watch_status(&api, None).await?,
        Commands::Watch { id } => watch_status(&api, Some(DetailView::new(id))).await?,
        Commands::Logs { id, rows } => tail_logs(&api, LogSource::Bot(id), rows).await?,
        Commands::ManagerLogs { rows } => tail_logs(&api, LogSource::Manager, rows).await?,
        Commands::DumpLogs { id } => print!("{}", api.log_text(&id).await?),
        Commands::List => print!("{}", render::fleet_table(&api.list().await?)),
        Commands::Start { id } => lifecycle(&api, Lifecycle::Start, &id).await?,
        Commands::Stop { id } => lifecycle(&api, Lifecycle::Stop, &id).await?,
        Commands::Restart { id } => lifecycle(&api, Lifecycle::Restart, &id).await?,
        Commands::Delete { id } => lifecycle(&api, Lifecycle::Delete, &id).await?,
        Commands::Create { name } => {
            let created = api.create(&name).await?;
            println!("Created {}", created.id);
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommand::Show { id, path } => {
                let session = EditSession::open(&id, api.fetch_config(&id).await?);
                match path {
                    None => print!("{}", render::config_form(session.fields())),
                    Some(path) => {
                        let field = session
                            .field(&path)
                            .ok_or_else(|| anyhow!("no editable field {} in config of {}", path, id))?;
                        print!("{}", render::field_detail(field));
                    }
                }
            }
            ConfigCommand::Set {
                id,
                assignments,
                dry_run,
            } => edit_config(&api, &id, &assignments, dry_run).await?,
        },
        Commands::Settings { cmd } => match cmd {
            SettingsCommand::Show => {
                let settings = api.fetch_settings().await?;
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            SettingsCommand::Set { assignments } => {
                let mut settings = load_settings(&api).await;
                for a in &assignments {
                    let (key, value) = split_assignment(a)?;
                    settings.assign(key, value)?;
                }
                api.save_settings(&settings).await?;
                println!("Settings saved");
            }
        },
    }

    Ok(())
}

fn split_assignment(s: &str) -> Result<(&str, &str)> {
    s.split_once('=')
        .map(|(k, v)| (k.trim(), v))
        .ok_or_else(|| anyhow!("expected path=value, got {:?}", s))
}

async fn lifecycle(api: &ApiClient, op: Lifecycle, id: &str) -> Result<()> {
    api.lifecycle(op, id).await?;
    println!("{:?} requested for {}", op, id);
    Ok(())
}

async fn edit_config(api: &ApiClient, id: &str, assignments: &[String], dry_run: bool) -> Result<()> {
    let mut session = EditSession::open(id, api.fetch_config(id).await?);
    for a in assignments {
        let (path, value) = split_assignment(a)?;
        session.set(path, value.replace("\\n", "\n"))?;
    }

    eprint!("{}", render::config_changes(session.dirty_fields()));
    let rebuilt = session.build();
    if dry_run {
        println!("{}", serde_json::to_string_pretty(&rebuilt)?);
        return Ok(());
    }
    api.save_config(id, &rebuilt).await?;
    println!("Configuration of {} saved", session.entity_id());
    Ok(())
}

/// Settings as stored on the server, or the defaults if they cannot be read.
async fn load_settings(api: &ApiClient) -> DashboardSettings {
    match api.fetch_settings().await {
        Ok(s) => s,
        Err(err) => {
            warn!("using default settings: {err:#}");
            DashboardSettings::default()
        }
    }
}

/// Fleet table, or a single bot's card when `detail` is set, redrawn on
/// every status event until Ctrl-C.
async fn watch_status(api: &ApiClient, mut detail: Option<DetailView>) -> Result<()> {
    let (handle, mut rx) = status::open(WsConnector, api.base())?;
    let mut fleet = Fleet::default();

    loop {
        let event = tokio::select! {
            event = rx.recv() => event,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(event) = event else { break };
        let is_snapshot = matches!(event, ChannelEvent::Message(_));
        fleet.apply(event);

        let body = match detail.as_mut() {
            None if fleet.has_data() => render::fleet_table(fleet.entities()),
            None => "waiting for status...\n".to_string(),
            Some(view) => {
                if is_snapshot {
                    view.observe(fleet.entities());
                }
                match view.current() {
                    Some(current) => render::detail_card(current),
                    None => format!("waiting for bot {}...\n", view.id()),
                }
            }
        };
        println!(
            "{}{}[{}]",
            CLEAR_SCREEN,
            body,
            render::connection_line(fleet.state())
        );
    }

    handle.close();
    Ok(())
}

/// Scrollable log window redrawn on every update. Operator commands arrive
/// one per stdin line. Leaving the view closes the stream.
async fn tail_logs(api: &ApiClient, source: LogSource, rows: usize) -> Result<()> {
    let settings = load_settings(api).await;
    let (handle, mut rx) = logs::open(WsConnector, api.base(), &source)?;
    let mut tail = LogTail::new(settings.logs.max_lines, rows, settings.logs.auto_scroll);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut unseen = 0usize;

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                match tail.apply(event) {
                    LogUpdate::Reset | LogUpdate::Cleared => unseen = 0,
                    LogUpdate::Appended { follow: false, .. } if !tail.at_bottom() => unseen += 1,
                    LogUpdate::Appended { .. } | LogUpdate::Unchanged => {}
                }
            }
            line = input.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match PaneCommand::parse(&line, rows) {
                        Some(cmd) => {
                            if !tail.command(cmd) {
                                break;
                            }
                        }
                        None => continue,
                    },
                    Ok(None) => stdin_open = false,
                    Err(err) => {
                        warn!("stdin closed: {err}");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        if tail.at_bottom() {
            unseen = 0;
        }
        print!("{}{}", CLEAR_SCREEN, render::log_pane(&tail, unseen));
    }

    handle.close();
    Ok(())
}
