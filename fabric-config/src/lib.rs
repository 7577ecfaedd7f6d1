//! Configuration for Fabric workspace provisioning.
//!
//! Settings come from a YAML file and are then overridden by environment
//! variables, so CI pipelines can inject secrets and per-environment capacity
//! ids without touching the checked-in file.
//!
//! ```yaml
//! api:
//!   base_url: https://api.fabric.microsoft.com
//! principals:
//!   admin_group_id: 22222222-2222-2222-2222-222222222222
//! environments:
//!   dev:
//!     workspace_name: "[D] Fabric Blueprint"
//!     capacity_id: 00000000-0000-0000-0000-000000000001
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod loader;

pub use config::{ApiSettings, AuthSettings, EnvironmentTarget, FabricConfig, PrincipalSettings};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
