// ABOUTME: Session replay scripts: one navigator operation per line
// ABOUTME: Parses session and loglevel lines and renders the session after each step

use anyhow::{Context, Result, bail};
use canopy_logging::{Level, parse_log_level, reload_from_env, update_log_level, update_module_level};
use canopy_types::{ActivationMode, NodeId, ViewMode};
use canopy_workspace::{DocumentSession, Navigator};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Open { id: NodeId, mode: ActivationMode },
    Activate { id: NodeId, mode: ActivationMode },
    Close(NodeId),
    Next,
    Previous,
    Goto(String),
    Mode(ViewMode),
    /// Change the global or one module's log level
    LogLevel { module: Option<String>, level: Level },
    /// Re-read log levels from the environment
    ReloadLogEnv,
}

impl Step {
    /// Parse one script line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let arg = words.next();
        let flag = words.next();
        if let Some(extra) = words.next() {
            bail!("unexpected argument '{extra}'");
        }

        let step = match (verb, arg) {
            ("open", Some(id)) => Step::Open {
                id: NodeId::from(id),
                mode: parse_mode(flag)?,
            },
            ("activate", Some(id)) => Step::Activate {
                id: NodeId::from(id),
                mode: parse_mode(flag)?,
            },
            ("close", Some(id)) if flag.is_none() => Step::Close(NodeId::from(id)),
            ("next", None) => Step::Next,
            ("prev" | "previous", None) => Step::Previous,
            ("goto", Some(file_id)) if flag.is_none() => Step::Goto(file_id.to_string()),
            ("mode", Some("visual")) => Step::Mode(ViewMode::Visual),
            ("mode", Some("code")) => Step::Mode(ViewMode::Code),
            ("loglevel", Some("env")) if flag.is_none() => Step::ReloadLogEnv,
            ("loglevel", Some(directive)) if flag.is_none() => parse_log_step(directive)?,
            _ => bail!("unrecognized command '{line}'"),
        };
        Ok(Some(step))
    }

    /// Run the step, returning how many session events it produced
    pub fn apply(&self, navigator: &mut Navigator) -> Result<usize> {
        let events = match self {
            Step::Open { id, mode } => navigator.open_node(id, *mode),
            Step::Activate { id, mode } => navigator.activate(id, *mode),
            Step::Close(id) => navigator.close(id),
            Step::Next => navigator.next(),
            Step::Previous => navigator.previous(),
            Step::Goto(file_id) => navigator.goto_file(file_id),
            Step::Mode(mode) => navigator.set_view_mode(*mode),
            Step::LogLevel { module, level } => {
                match module {
                    Some(module) => update_module_level(module, *level)?,
                    None => update_log_level(*level)?,
                }
                return Ok(0);
            }
            Step::ReloadLogEnv => {
                reload_from_env()?;
                return Ok(0);
            }
        };
        Ok(events.len())
    }
}

fn parse_mode(flag: Option<&str>) -> Result<ActivationMode> {
    match flag {
        None | Some("soft") => Ok(ActivationMode::Soft),
        Some("hard") => Ok(ActivationMode::Hard),
        Some(other) => bail!("unknown activation mode '{other}'"),
    }
}

/// `debug` sets the global level, `canopy_tree=trace` one module's
fn parse_log_step(directive: &str) -> Result<Step> {
    let (module, level) = match directive.split_once('=') {
        Some((module, level)) => (Some(module.to_string()), level),
        None => (None, directive),
    };
    Ok(Step::LogLevel {
        module,
        level: parse_log_level(level)?,
    })
}

/// Parse a whole script, reporting the failing line number
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if let Some(step) =
            Step::parse(line).with_context(|| format!("line {}", number + 1))?
        {
            steps.push(step);
        }
    }
    Ok(steps)
}

/// Tabs in order with the active one marked `*` and the preview marked `~`
pub fn render_session(session: &DocumentSession) -> String {
    let mut out = String::new();
    let tabs: Vec<String> = session
        .documents()
        .into_iter()
        .map(|doc| {
            let active = if session.active_id() == Some(&doc.id) { "*" } else { "" };
            let soft = if doc.is_soft() { "~" } else { "" };
            format!("{active}{soft}{}", doc.id)
        })
        .collect();
    let mru: Vec<&str> = session.mru_ids().iter().map(NodeId::as_str).collect();

    let _ = writeln!(out, "  tabs:   [{}]", tabs.join(", "));
    let _ = writeln!(
        out,
        "  active: {}",
        session.active_id().map(NodeId::as_str).unwrap_or("-")
    );
    let _ = writeln!(out, "  mru:    [{}]", mru.join(", "));
    let _ = write!(out, "  view:   {:?}", session.view_mode());
    out
}
