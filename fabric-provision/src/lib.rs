//! # Fabric Provision
//!
//! Ensures a Microsoft Fabric workspace exists, is backed by a capacity, and
//! grants roles to a set of administrative principals. Every call re-derives
//! its view of the world from the Fabric REST API, so running it again after a
//! success is a no-op that returns the same workspace.
//!
//! The two outside collaborators sit behind traits:
//!
//! - [`TokenCredential`] issues bearer tokens for a scope
//! - [`Transport`] performs one HTTP exchange
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fabric_provision::{
//!     ensure_workspace_exists, ReqwestTransport, StaticTokenCredential, WorkspaceProvisioner,
//! };
//!
//! # async fn example() -> fabric_provision::Result<()> {
//! let transport = ReqwestTransport::new("https://api.fabric.microsoft.com")?;
//! let provisioner = WorkspaceProvisioner::new(transport);
//! let credential = StaticTokenCredential::new("eyJ0eXAi...");
//!
//! let id = ensure_workspace_exists(
//!     &provisioner,
//!     "[D] Fabric Blueprint",
//!     "00000000-0000-0000-0000-000000000001",
//!     "11111111-1111-1111-1111-111111111111",
//!     &credential,
//!     None,
//! )
//! .await?;
//! println!("{id}");
//! # Ok(())
//! # }
//! ```

pub mod credential;
pub mod error;
pub mod provisioner;
pub mod response;
pub mod transport;
pub mod types;

pub use credential::{AccessToken, AuthError, ClientSecretCredential, StaticTokenCredential, TokenCredential};
pub use error::{ProvisionError, Result};
pub use provisioner::{ensure_workspace_exists, ProvisionSettings, WorkspaceProvisioner};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport, TransportError};
pub use types::{
    AssignmentOutcome, PrincipalAssignment, PrincipalType, WorkspaceDescriptor, WorkspaceRole,
    WorkspaceSummary,
};

/// Default Fabric REST endpoint
pub const FABRIC_API_BASE_URL: &str = "https://api.fabric.microsoft.com";

/// OAuth scope requested for Fabric API tokens
pub const FABRIC_TOKEN_SCOPE: &str = "https://api.fabric.microsoft.com/.default";

/// Longest diagnostic body carried by an error
pub const ERROR_TEXT_MAX_LENGTH: usize = 500;
