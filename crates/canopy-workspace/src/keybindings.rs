// ABOUTME: Keyboard chords for the document group: palette shortcuts and in-palette keys
// ABOUTME: The platform modifier is Cmd on macOS and Ctrl elsewhere; Ctrl also works on macOS

use canopy_quick::PaletteKey;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    #[default]
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Other
        }
    }
}

/// A key press with its modifiers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    fn platform_modifier(&self, platform: Platform) -> bool {
        self.ctrl || (platform == Platform::Mac && self.meta)
    }
}

/// Group-level shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Shortcut {
    /// Open the palette over tree nodes
    GoToAsset,
    /// Open the palette in command mode
    ShowAllCommands,
}

impl Shortcut {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GoToAsset => "Go to asset",
            Self::ShowAllCommands => "Show all commands",
        }
    }

    /// Key caps as shown to the user
    pub fn keys(&self, platform: Platform) -> Vec<&'static str> {
        let (shift, modifier) = match platform {
            Platform::Mac => ("⇧", "⌘"),
            Platform::Other => ("shift", "ctrl"),
        };
        match self {
            Self::GoToAsset => vec![modifier, "p"],
            Self::ShowAllCommands => vec![shift, modifier, "p"],
        }
    }

    pub fn opens_command_mode(&self) -> bool {
        matches!(self, Self::ShowAllCommands)
    }
}

/// Resolve a chord to a group shortcut
pub fn match_shortcut(chord: &KeyChord, platform: Platform) -> Option<Shortcut> {
    if !chord.platform_modifier(platform) || !chord.key.eq_ignore_ascii_case("p") {
        return None;
    }
    Some(if chord.shift {
        Shortcut::ShowAllCommands
    } else {
        Shortcut::GoToAsset
    })
}

/// Resolve a chord to a key the open palette handles
pub fn palette_key(chord: &KeyChord) -> Option<PaletteKey> {
    match chord.key.as_str() {
        "up" | "ArrowUp" => Some(PaletteKey::Up),
        "down" | "ArrowDown" => Some(PaletteKey::Down),
        "enter" | "Enter" => Some(PaletteKey::Enter),
        "escape" | "Escape" => Some(PaletteKey::Escape),
        _ => None,
    }
}

/// A row of the empty-state shortcut table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutHint {
    pub shortcut: Shortcut,
    pub label: &'static str,
    pub keys: Vec<&'static str>,
}

/// Hints shown when no document is open
pub fn empty_state_hints(platform: Platform) -> Vec<ShortcutHint> {
    [Shortcut::ShowAllCommands, Shortcut::GoToAsset]
        .into_iter()
        .map(|shortcut| ShortcutHint {
            shortcut,
            label: shortcut.label(),
            keys: shortcut.keys(platform),
        })
        .collect()
}
