//! FeverWatch MCP server entry point.

use std::sync::Arc;
use tokio::sync::Mutex;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use fever_watch::ReadingLogReader;
use fever_watch_mcp::config::{resolve_device_id, resolve_display_config, resolve_log_path};
use fever_watch_mcp::protocol::ProtocolHandler;
use fever_watch_mcp::repl::ReplSettings;
use fever_watch_mcp::session::MonitorSession;
use fever_watch_mcp::tools::ToolRegistry;
use fever_watch_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "fever-watch-mcp",
    about = "MCP server for FeverWatch: record, review and trend a child's body temperature",
    version
)]
struct Cli {
    /// Path to the .ftw reading log.
    #[arg(short, long, global = true)]
    log: Option<String>,

    /// Device to monitor when a request names none.
    #[arg(short, long, global = true)]
    device: Option<String>,

    /// Display zone: an IANA name (e.g. Asia/Kolkata) or a UTC offset (e.g. +05:30).
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Validate a .ftw reading log.
    Validate,

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Example:
    ///   fever-watch-mcp completions bash > ~/.local/share/bash-completion/completions/fever-watch-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let log_path = resolve_log_path(cli.log.as_deref());
    let device_id = resolve_device_id(cli.device.as_deref());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let display = resolve_display_config(cli.tz.as_deref())?;
            tracing::info!("FeverWatch MCP server");
            tracing::info!("Reading log: {log_path}");
            let session = MonitorSession::open(&log_path, &device_id, display)?;
            let session = Arc::new(Mutex::new(session));
            let handler = ProtocolHandler::new(session.clone());
            let transport = StdioTransport::new(handler);
            transport.run().await?;
            session.lock().await.save()?;
        }

        Commands::Validate => {
            match ReadingLogReader::read_from_file(std::path::Path::new(&log_path)) {
                Ok(store) => {
                    println!("Valid reading log: {log_path}");
                    println!("  Readings:   {}", store.count());
                    println!("  Devices:    {}", store.device_ids().join(", "));
                    println!("  Thresholds: {}", store.thresholds.len());
                    println!("  Alerts:     {}", store.alerts.len());
                }
                Err(e) => {
                    eprintln!("Invalid reading log: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Info => {
            let capabilities = fever_watch_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "fever-watch-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            let display = resolve_display_config(cli.tz.as_deref())?;
            fever_watch_mcp::repl::run(ReplSettings {
                log_path,
                device_id,
                display,
            })?;
        }
    }

    Ok(())
}
