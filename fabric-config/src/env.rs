//! Environment variable overrides applied on top of the file.

use crate::config::FabricConfig;
use tracing::debug;

pub const TENANT_ID_VAR: &str = "FABRIC_TENANT_ID";
pub const CLIENT_ID_VAR: &str = "FABRIC_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "FABRIC_CLIENT_SECRET";
pub const API_BASE_URL_VAR: &str = "FABRIC_API_BASE_URL";
pub const SP_OBJECT_ID_VAR: &str = "DEPLOYMENT_SP_OBJECT_ID";
pub const ADMIN_GROUP_ID_VAR: &str = "FABRIC_ADMIN_GROUP_ID";
pub const ACCESS_TOKEN_VAR: &str = "FABRIC_ACCESS_TOKEN";

/// `FABRIC_CAPACITY_ID_<ENV>` for an environment name such as `pre-prod`.
pub fn capacity_var(environment: &str) -> String {
    format!(
        "FABRIC_CAPACITY_ID_{}",
        environment.to_uppercase().replace('-', "_")
    )
}

/// Value of `key`, treating unset and blank the same.
fn non_blank(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl FabricConfig {
    /// Overlay values from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from `lookup`. Blank values leave the file value alone.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fields: [(&str, &mut String); 6] = [
            (TENANT_ID_VAR, &mut self.auth.tenant_id),
            (CLIENT_ID_VAR, &mut self.auth.client_id),
            (CLIENT_SECRET_VAR, &mut self.auth.client_secret),
            (API_BASE_URL_VAR, &mut self.api.base_url),
            (SP_OBJECT_ID_VAR, &mut self.principals.service_principal_object_id),
            (ADMIN_GROUP_ID_VAR, &mut self.principals.admin_group_id),
        ];
        for (key, field) in fields {
            if let Some(value) = non_blank(&lookup, key) {
                debug!(variable = key, "Applying environment override");
                *field = value;
            }
        }

        for (name, target) in self.environments.iter_mut() {
            let key = capacity_var(name);
            if let Some(value) = non_blank(&lookup, &key) {
                debug!(variable = %key, environment = %name, "Applying capacity override");
                target.capacity_id = value;
            }
        }
    }
}
