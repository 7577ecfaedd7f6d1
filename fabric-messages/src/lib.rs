//! fabric-messages
//!
//! Centralized message templates for the Fabric provisioning tools.
//! Provides the template registry, a message builder, and the `msg!` macro
//! used for log lines, error texts and troubleshooting hints.

pub mod builder;
pub mod macros;
pub mod messages;

pub use builder::MessageBuilder;
pub use messages::MESSAGES;
