// ABOUTME: Fixed palette command list and its executor
// ABOUTME: Commands resolve to navigation outcomes relative to the active project

use canopy_types::ProjectId;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Commands reachable from the palette's command mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandId {
    ShowAppSettings,
    ShowBotSettings,
}

/// What executing a command asks the host to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "route", rename_all = "camelCase")]
pub enum CommandOutcome {
    Navigate(String),
    /// The command needs an active project and none was given
    Unavailable,
}

impl CommandId {
    pub const ALL: [CommandId; 2] = [CommandId::ShowAppSettings, CommandId::ShowBotSettings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowAppSettings => "showAppSettings",
            Self::ShowBotSettings => "showBotSettings",
        }
    }

    /// Palette label: `> ` followed by the start-cased identifier
    pub fn label(&self) -> String {
        format!("> {}", start_case(self.as_str()))
    }

    pub fn execute(&self, active_project: Option<&ProjectId>) -> CommandOutcome {
        match self {
            Self::ShowAppSettings => CommandOutcome::Navigate("/settings".to_string()),
            Self::ShowBotSettings => match active_project {
                Some(project) if !project.is_empty() => {
                    CommandOutcome::Navigate(format!("/bot/{project}/botProjectsSettings"))
                }
                _ => CommandOutcome::Unavailable,
            },
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for CommandId {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// `showAppSettings` -> `Show App Settings`
fn start_case(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    for (i, ch) in identifier.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.push(ch);
        } else {
            out.push(ch);
        }
    }
    out
}
