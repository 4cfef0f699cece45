//! Interactive REPL for the FeverWatch MCP server.
//!
//! Launch with `fever-watch-mcp repl`. Type `/help` for commands, Tab for
//! completion.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};

use fever_watch::{
    group_by_hour, DisplayConfig, TemperatureUnit, COLLAPSED_HISTORY_LEN, MAX_THRESHOLD_C,
    MIN_THRESHOLD_C,
};

use crate::session::MonitorSession;
use crate::tools::ToolRegistry;

const COMMANDS: &[(&str, &str)] = &[
    ("/status", "Show fever status of the monitored device"),
    ("/history", "Show recent readings grouped by hour (/history all)"),
    ("/alerts", "List fever alerts"),
    ("/threshold", "Show or set the fever threshold (/threshold 38.5 [c|f])"),
    ("/record", "Record a reading now (/record 37.2 [c|f])"),
    ("/tools", "List available MCP tools"),
    ("/info", "Show server capabilities and the open log"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// Where the REPL reads and writes.
pub struct ReplSettings {
    pub log_path: String,
    pub device_id: String,
    pub display: DisplayConfig,
}

#[derive(Default)]
struct FeverHelper;

impl Completer for FeverHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];
        if input.contains(' ') {
            return Ok((pos, Vec::new()));
        }

        let matches: Vec<Pair> = COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| Pair {
                display: format!("{cmd:<16} {desc}"),
                replacement: format!("{cmd} "),
            })
            .collect();
        Ok((0, matches))
    }
}

impl Hinter for FeverHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|(cmd, _)| cmd.starts_with(line) && *cmd != line)
            .map(|(cmd, _)| cmd[line.len()..].to_string())
    }
}

impl Highlighter for FeverHelper {}
impl Validator for FeverHelper {}
impl Helper for FeverHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Run the interactive REPL.
pub fn run(settings: ReplSettings) -> anyhow::Result<()> {
    let mut session = MonitorSession::open(&settings.log_path, &settings.device_id, settings.display)?;

    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mfever-watch-mcp v{}\x1b[0m \x1b[90mmonitoring {}\x1b[0m",
        env!("CARGO_PKG_VERSION"),
        session.device_id()
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<FeverHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(FeverHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".fever_watch_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let prompt = " \x1b[36mfever>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&session),
                    "tools" => cmd_tools(),
                    "status" => cmd_status(&session),
                    "history" => cmd_history(args, &session),
                    "alerts" => cmd_alerts(&session),
                    "threshold" => cmd_threshold(args, &mut session),
                    "record" => cmd_record(args, &mut session),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);
    session.save()?;

    Ok(())
}

/// Split `38.5 f` into a value and unit.
fn parse_value_and_unit(args: &str) -> Result<(f64, TemperatureUnit), String> {
    let mut parts = args.split_whitespace();
    let value: f64 = parts
        .next()
        .ok_or_else(|| "missing value".to_string())?
        .parse()
        .map_err(|e| format!("not a number: {e}"))?;
    let unit = match parts.next() {
        Some(raw) => raw
            .parse::<TemperatureUnit>()
            .map_err(|e| e.to_string())?,
        None => TemperatureUnit::Celsius,
    };
    Ok((value, unit))
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
}

fn cmd_info(session: &MonitorSession) {
    let capabilities = crate::types::InitializeResult::default_result();
    let tools = ToolRegistry::list_tools();
    let store = session.store();
    eprintln!();
    eprintln!(
        "  Server:   {} v{}",
        capabilities.server_info.name, capabilities.server_info.version
    );
    eprintln!("  Protocol: {}", capabilities.protocol_version);
    eprintln!("  Tools:    {}", tools.len());
    eprintln!("  Log:      {}", session.file_path().display());
    eprintln!("  Readings: {} across {:?}", store.count(), store.device_ids());
    eprintln!("  Zone:     {}", session.formatter().zone());
    eprintln!();
}

fn cmd_tools() {
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!("  {} MCP tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        eprintln!(
            "    {:<24} {}",
            tool.name,
            tool.description.as_deref().unwrap_or("")
        );
    }
    eprintln!();
}

fn cmd_status(session: &MonitorSession) {
    let report = session.status(session.device_id());
    let formatter = session.formatter();
    eprintln!();
    eprintln!("  {}: {}", report.device_id, report.status.label());
    match (report.current_temperature, report.last_updated.as_deref()) {
        (Some(temp), Some(ts)) => eprintln!(
            "    Latest:    {temp:.1}°C at {} ({})",
            formatter.format_absolute(Some(ts)),
            formatter.format_relative(ts)
        ),
        _ => eprintln!("    No readings yet"),
    }
    eprintln!("    Threshold: {:.1}°C", report.threshold);
    eprintln!();
}

fn cmd_history(args: &str, session: &MonitorSession) {
    let limit = if args == "all" {
        None
    } else {
        Some(COLLAPSED_HISTORY_LEN)
    };
    let threshold = session.store().threshold(session.device_id());
    let groups = group_by_hour(
        &session.store().samples(session.device_id()),
        session.formatter().zone(),
        limit,
    );

    eprintln!();
    if groups.is_empty() {
        eprintln!("  No readings yet");
    }
    for group in &groups {
        eprintln!("  {}  (updated {})", group.label, group.latest_update);
        for sample in &group.samples {
            let marker = if sample.temperature_c >= threshold { " fever" } else { "" };
            eprintln!(
                "    {}  {:.1}°C{marker}",
                session.formatter().format_time_only(Some(&sample.raw_timestamp)),
                sample.temperature_c
            );
        }
    }
    eprintln!();
}

fn cmd_alerts(session: &MonitorSession) {
    let alerts = session.alerts(session.device_id());
    let formatter = session.formatter();
    eprintln!();
    if alerts.is_empty() {
        eprintln!("  No fever alerts");
    }
    for alert in alerts {
        let state = match alert.resolved_at.as_deref() {
            Some(ts) => format!("resolved {}", formatter.format_absolute(Some(ts))),
            None if alert.resolved => "resolved".to_string(),
            None => "\x1b[31mactive\x1b[0m".to_string(),
        };
        eprintln!(
            "  {}  {:.1}°C (threshold {:.1}°C)  {state}",
            formatter.format_absolute(Some(&alert.timestamp)),
            alert.temperature_c,
            alert.threshold_c
        );
    }
    eprintln!();
}

fn cmd_threshold(args: &str, session: &mut MonitorSession) {
    let device_id = session.device_id().to_string();
    if args.is_empty() {
        let setting = session.threshold(&device_id);
        eprintln!(
            "  Threshold for {device_id}: {:.1}°C ({:.1}°F)",
            setting.threshold,
            TemperatureUnit::Fahrenheit.convert_celsius(setting.threshold)
        );
        return;
    }

    match parse_value_and_unit(args) {
        Ok((value, unit)) => match session.set_threshold(&device_id, value, unit) {
            Ok(setting) => eprintln!("  Threshold set to {:.1}°C", setting.threshold),
            Err(e) => eprintln!("  {e}"),
        },
        Err(e) => eprintln!(
            "  Usage: /threshold <{MIN_THRESHOLD_C}-{MAX_THRESHOLD_C}> [c|f] ({e})"
        ),
    }
}

fn cmd_record(args: &str, session: &mut MonitorSession) {
    let device_id = session.device_id().to_string();
    match parse_value_and_unit(args) {
        Ok((value, unit)) => match session.record(&device_id, value, unit, None) {
            Ok(result) => eprintln!(
                "  Recorded #{} {:.1}°C at {}",
                result.reading_id,
                result.temperature_c,
                session.formatter().format_absolute(Some(&result.timestamp))
            ),
            Err(e) => eprintln!("  {e}"),
        },
        Err(e) => eprintln!("  Usage: /record <temperature> [c|f] ({e})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_and_unit_parsing() {
        let (value, unit) = parse_value_and_unit("100.4 f").unwrap();
        assert!((value - 100.4).abs() < 1e-9);
        assert_eq!(unit, TemperatureUnit::Fahrenheit);

        let (_, unit) = parse_value_and_unit("38").unwrap();
        assert_eq!(unit, TemperatureUnit::Celsius);

        assert!(parse_value_and_unit("").is_err());
        assert!(parse_value_and_unit("hot").is_err());
        assert!(parse_value_and_unit("38 kelvin").is_err());
    }
}
