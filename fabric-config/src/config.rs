//! Configuration file structure

use crate::error::{ConfigError, Result};
use fabric_provision::{
    credential::DEFAULT_AUTHORITY_HOST, PrincipalAssignment, PrincipalType, ProvisionSettings,
    WorkspaceRole, FABRIC_API_BASE_URL, FABRIC_TOKEN_SCOPE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Root structure of `fabric.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Fabric REST API endpoint and deadlines
    #[serde(default)]
    pub api: ApiSettings,

    /// Service principal credentials for the client-credentials grant
    #[serde(default)]
    pub auth: AuthSettings,

    /// Principals granted a role on every ensured workspace
    #[serde(default)]
    pub principals: PrincipalSettings,

    /// Deployment targets keyed by environment name
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_token_scope")]
    pub token_scope: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_create_timeout_secs")]
    pub create_timeout_secs: u64,
}

fn default_base_url() -> String {
    FABRIC_API_BASE_URL.to_string()
}

fn default_token_scope() -> String {
    FABRIC_TOKEN_SCOPE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_create_timeout_secs() -> u64 {
    60
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_scope: default_token_scope(),
            request_timeout_secs: default_request_timeout_secs(),
            create_timeout_secs: default_create_timeout_secs(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub tenant_id: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_authority_host")]
    pub authority_host: String,
}

fn default_authority_host() -> String {
    DEFAULT_AUTHORITY_HOST.to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            authority_host: default_authority_host(),
        }
    }
}

impl AuthSettings {
    /// All three client-credentials fields are present.
    pub fn has_client_secret(&self) -> bool {
        [&self.tenant_id, &self.client_id, &self.client_secret]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.client_secret.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("AuthSettings")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &secret)
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalSettings {
    /// Object ID of the deployment service principal (not its client ID)
    #[serde(default)]
    pub service_principal_object_id: String,

    /// Optional Entra ID group for human administrators
    #[serde(default)]
    pub admin_group_id: String,

    #[serde(default)]
    pub role: WorkspaceRole,
}

/// One deployment target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentTarget {
    #[serde(default)]
    pub workspace_name: String,

    /// Only needed when the workspace does not exist yet
    #[serde(default)]
    pub capacity_id: String,
}

impl FabricConfig {
    /// Look up a deployment target by name.
    pub fn environment(&self, name: &str) -> Result<&EnvironmentTarget> {
        self.environments
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: name.to_string(),
                available: self.environments.keys().cloned().collect(),
            })
    }

    /// Service principal first, then the admin group, both with the configured role.
    pub fn principal_assignments(&self) -> Vec<PrincipalAssignment> {
        vec![
            PrincipalAssignment::new(
                self.principals.service_principal_object_id.trim(),
                PrincipalType::ServicePrincipal,
                self.principals.role,
            ),
            PrincipalAssignment::new(
                self.principals.admin_group_id.trim(),
                PrincipalType::Group,
                self.principals.role,
            ),
        ]
    }

    pub fn provision_settings(&self) -> ProvisionSettings {
        ProvisionSettings {
            token_scope: self.api.token_scope.clone(),
            request_timeout: Duration::from_secs(self.api.request_timeout_secs),
            create_timeout: Duration::from_secs(self.api.create_timeout_secs),
        }
    }

    /// Reject values that can never work.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".to_string()));
        }
        if self.api.request_timeout_secs == 0 || self.api.create_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api timeouts must be at least one second".to_string(),
            ));
        }
        for (name, target) in &self.environments {
            if target.workspace_name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "environments.{name}.workspace_name must not be empty"
                )));
            }
        }
        Ok(())
    }
}
