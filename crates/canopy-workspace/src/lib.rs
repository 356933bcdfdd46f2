// ABOUTME: Document session, session store and document group coordination for the navigator
// ABOUTME: The Navigator facade ties the tree index, quick search and session together

pub mod document;
pub mod editor;
pub mod error;
pub mod group;
pub mod keybindings;
pub mod navigator;
pub mod session;
pub mod store;


pub use document::{Document, DocumentItem, DocumentKind};
pub use editor::{EditorTarget, resolve_editor};
pub use error::SessionError;
pub use group::{BreadcrumbCallout, BreadcrumbItem, DocumentGroup, breadcrumb, find_file_node};
pub use keybindings::{
    KeyChord, Platform, Shortcut, ShortcutHint, empty_state_hints, match_shortcut, palette_key,
};
pub use navigator::{Navigator, NavigatorOutcome};
pub use session::{DocumentSession, SessionCommand};
pub use store::{SessionStore, SubscriptionId};
