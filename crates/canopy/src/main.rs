// ABOUTME: Entry point for the canopy binary: loads a solution and runs one subcommand
// ABOUTME: Prints explorer trees, ranked quick search hits or replayed session states

mod cli;
mod replay;

use anyhow::{Context, Result};
use canopy_events::NullEventBus;
use canopy_logging::{LoggingConfig, info, init_logging_with_reload, parse_log_level};
use canopy_quick::{MatchField, QuickResult};
use canopy_tree::{CollapsedSet, ExplorerState};
use canopy_types::{BotProject, NavigatorConfig, NodeId};
use canopy_workspace::Navigator;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use cli::{Args, Command};

fn setup_logging(args: &Args) -> Result<()> {
    let level = parse_log_level(&args.log_level).context("Invalid --log-level")?;
    let mut config = LoggingConfig::from_env()
        .context("Failed to create logging config from environment")?
        .with_level(level);
    config.output.file = args.log_file;

    // Replay scripts adjust levels at runtime through the global handle
    init_logging_with_reload(config).context("Failed to initialize canopy logging")?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<NavigatorConfig> {
    match path {
        Some(path) => {
            let config = NavigatorConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            Ok(config.sanitized())
        }
        None => Ok(NavigatorConfig::default()),
    }
}

fn load_projects(path: &Path) -> Result<Vec<BotProject>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read solution {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse solution {}", path.display()))
}

fn navigator(config: NavigatorConfig, solution: &Path) -> Result<Navigator> {
    let projects = load_projects(solution)?;
    let mut navigator = Navigator::new(config, Arc::new(NullEventBus))?;
    navigator.set_projects(projects)?;
    Ok(navigator)
}

fn run_tree(config: NavigatorConfig, solution: &Path, collapsed: &[String]) -> Result<()> {
    let navigator = navigator(config, solution)?;
    let snapshot = navigator.snapshot();
    let collapsed: CollapsedSet = collapsed.iter().map(|id| NodeId::from(id.as_str())).collect();
    let mut explorer = ExplorerState::new(collapsed);

    for row in explorer.rows(&snapshot, None) {
        let marker = match (row.has_children, row.collapsed) {
            (true, true) => "+",
            (true, false) => "-",
            (false, _) => " ",
        };
        println!(
            "{}{marker} {}  [{}]",
            "  ".repeat(row.level),
            row.label,
            row.id
        );
    }
    Ok(())
}

/// Wrap matched char spans in brackets
fn highlight(text: &str, spans: &[(usize, usize)]) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * 2);
    for (i, ch) in text.chars().enumerate() {
        if spans.iter().any(|(start, _)| *start == i) {
            out.push('[');
        }
        out.push(ch);
        if spans.iter().any(|(_, end)| *end == i) {
            out.push(']');
        }
    }
    out
}

fn render_result(result: &QuickResult) -> String {
    let label = match result.hit.field(MatchField::Label) {
        Some(m) => highlight(&result.item.label, &m.spans),
        None => result.item.label.clone(),
    };
    let path: Vec<String> = result
        .item
        .path
        .iter()
        .enumerate()
        .map(|(i, segment)| match result.hit.field(MatchField::Path(i)) {
            Some(m) => highlight(segment, &m.spans),
            None => segment.clone(),
        })
        .collect();

    format!(
        "[{:>5}] {label}  ({})  {}",
        result.hit.score,
        path.join("/"),
        result.item.id
    )
}

fn run_search(config: NavigatorConfig, solution: &Path, query: &str) -> Result<()> {
    let mut navigator = navigator(config, solution)?;
    navigator.open_palette(false);
    navigator.set_query(query);

    let results = navigator.palette().results();
    if results.is_empty() {
        println!("no results");
    }
    for result in results {
        println!("{}", render_result(result));
    }
    Ok(())
}

fn run_replay(config: NavigatorConfig, solution: &Path, script: &Path) -> Result<()> {
    let mut navigator = navigator(config, solution)?;
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let steps = replay::parse_script(&text)
        .with_context(|| format!("Invalid script {}", script.display()))?;

    for (line, step) in text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .zip(&steps)
    {
        let events = step.apply(&mut navigator)?;
        println!("> {line}  ({events} events)");
        println!("{}", replay::render_session(&navigator.session()));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args)?;

    let config = load_config(args.config.as_deref())?;
    info!(locale = %config.locale, "Canopy starting");

    match &args.command {
        Command::Tree {
            solution,
            collapsed,
        } => run_tree(config, solution, collapsed),
        Command::Search { solution, query } => run_search(config, solution, query),
        Command::Replay { solution, script } => run_replay(config, solution, script),
    }
}
