//! Central registry for all user-facing message templates.
//!
//! Organized by domain:
//! - `workspace` - workspace lookup and creation
//! - `role` - role assignment
//! - `hints` - troubleshooting text attached to failures
//! - `cli` - command line output
//!
//! ```rust
//! use fabric_messages::MESSAGES;
//!
//! let text = MESSAGES.workspace.ensuring;
//! assert!(text.contains("{name}"));
//! ```

mod cli;
mod hints;
mod role;
mod workspace;

pub use cli::{CliMessages, CLI_MESSAGES};
pub use hints::{HintMessages, HINT_MESSAGES};
pub use role::{RoleMessages, ROLE_MESSAGES};
pub use workspace::{WorkspaceMessages, WORKSPACE_MESSAGES};

/// Unified messages struct containing all domain-specific message modules
pub struct Messages {
    pub workspace: WorkspaceMessages,
    pub role: RoleMessages,
    pub hints: HintMessages,
    pub cli: CliMessages,
}

/// Global messages constant - main entry point for all message templates
pub const MESSAGES: Messages = Messages {
    workspace: WORKSPACE_MESSAGES,
    role: ROLE_MESSAGES,
    hints: HINT_MESSAGES,
    cli: CLI_MESSAGES,
};
