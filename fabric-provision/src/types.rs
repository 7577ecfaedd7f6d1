//! Data model shared by the provisioner and its callers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A workspace known to exist remotely.
///
/// `capacity_id` is what the caller supplied, not what the server reports;
/// an existing workspace is never moved to a different capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDescriptor {
    pub name: String,
    pub id: String,
    pub capacity_id: Option<String>,
}

/// Kind of identity a role is granted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrincipalType {
    ServicePrincipal,
    Group,
}

impl PrincipalType {
    /// Human readable name used in log lines and errors
    pub fn description(&self) -> &'static str {
        match self {
            Self::ServicePrincipal => "Service Principal",
            Self::Group => "Entra ID group",
        }
    }

    /// Which identifier an operator should look up when a reference is rejected
    pub fn object_id_kind(&self) -> &'static str {
        match self {
            Self::ServicePrincipal => "Service Principal Object ID (not Client ID)",
            Self::Group => "Entra ID group Object ID",
        }
    }
}

/// Workspace role names accepted by the Fabric API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkspaceRole {
    #[default]
    Admin,
    Member,
    Contributor,
    Viewer,
}

impl fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "Admin",
            Self::Member => "Member",
            Self::Contributor => "Contributor",
            Self::Viewer => "Viewer",
        };
        f.write_str(name)
    }
}

impl FromStr for WorkspaceRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "contributor" => Ok(Self::Contributor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!(
                "Invalid role '{s}'. Use 'Admin', 'Member', 'Contributor', or 'Viewer'"
            )),
        }
    }
}

/// One principal that should hold `role` on the workspace.
///
/// An empty `principal_id` means "not configured" and is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalAssignment {
    pub principal_id: String,
    pub principal_type: PrincipalType,
    pub role: WorkspaceRole,
}

impl PrincipalAssignment {
    pub fn new(
        principal_id: impl Into<String>,
        principal_type: PrincipalType,
        role: WorkspaceRole,
    ) -> Self {
        Self {
            principal_id: principal_id.into(),
            principal_type,
            role,
        }
    }

    pub fn service_principal_admin(object_id: impl Into<String>) -> Self {
        Self::new(object_id, PrincipalType::ServicePrincipal, WorkspaceRole::Admin)
    }

    pub fn group_admin(group_id: impl Into<String>) -> Self {
        Self::new(group_id, PrincipalType::Group, WorkspaceRole::Admin)
    }

    pub fn is_configured(&self) -> bool {
        !self.principal_id.trim().is_empty()
    }
}

/// Result of a single role assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    Assigned,
    AlreadyAssigned,
    Skipped,
}

/// Workspace entry as returned by `GET /v1/workspaces`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummary {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_id: Option<String>,
}

/// One page of the workspace listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkspaceListPage {
    #[serde(default)]
    pub value: Vec<WorkspaceSummary>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateWorkspaceRequest<'a> {
    pub display_name: &'a str,
    pub capacity_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedWorkspace {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoleAssignmentRequest<'a> {
    pub principal: PrincipalRef<'a>,
    pub role: WorkspaceRole,
}

#[derive(Debug, Serialize)]
pub(crate) struct PrincipalRef<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,
}
