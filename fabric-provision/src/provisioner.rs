//! Create-or-reuse reconciliation for Fabric workspaces.
//!
//! `ensure` runs list → create (only when absent) → role assignments, in that
//! order, on a single task. There is no locking between concurrent callers;
//! a create that loses a naming race is resolved by listing again.

use crate::credential::TokenCredential;
use crate::error::{ProvisionError, Result};
use crate::response::{
    duplicate_name_signal, existing_assignment_signal, parse_error_response, DuplicateSignal,
};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use crate::types::{
    AssignmentOutcome, CreateWorkspaceRequest, CreatedWorkspace, PrincipalAssignment,
    PrincipalRef, PrincipalType, RoleAssignmentRequest, WorkspaceDescriptor, WorkspaceListPage,
    WorkspaceSummary,
};
use crate::FABRIC_TOKEN_SCOPE;
use fabric_messages::{msg, MESSAGES};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const WORKSPACES_PATH: &str = "/v1/workspaces";

/// Deadline for listing and role assignment calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for workspace creation
pub const CREATE_WORKSPACE_TIMEOUT: Duration = Duration::from_secs(60);

const OP_LIST: &str = "checking workspace existence";
const OP_CREATE: &str = "creating workspace";

/// Tunables for a provisioner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSettings {
    pub token_scope: String,
    pub request_timeout: Duration,
    pub create_timeout: Duration,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            token_scope: FABRIC_TOKEN_SCOPE.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            create_timeout: CREATE_WORKSPACE_TIMEOUT,
        }
    }
}

pub struct WorkspaceProvisioner<T> {
    transport: T,
    settings: ProvisionSettings,
}

impl<T: Transport> WorkspaceProvisioner<T> {
    pub fn new(transport: T) -> Self {
        Self::with_settings(transport, ProvisionSettings::default())
    }

    pub fn with_settings(transport: T, settings: ProvisionSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &ProvisionSettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Make sure `name` exists and every configured principal holds its role.
    ///
    /// An existing workspace is reused as-is: `capacity_id` is neither checked
    /// nor applied to it, and may be empty in that case. Role assignments run
    /// in order and independently; the first failure is returned after all of
    /// them were attempted, except an [`ProvisionError::Auth`] which stops
    /// immediately.
    pub async fn ensure(
        &self,
        name: &str,
        capacity_id: &str,
        principals: &[PrincipalAssignment],
        credential: &dyn TokenCredential,
    ) -> Result<WorkspaceDescriptor> {
        if name.trim().is_empty() {
            return Err(ProvisionError::Config(
                MESSAGES.workspace.error_name_empty.to_string(),
            ));
        }

        info!(workspace = %name, "{}", msg!(MESSAGES.workspace.ensuring, name = name));

        let id = match self.find_workspace(name, credential).await? {
            Some(existing) => existing.id,
            None => {
                info!(workspace = %name, "{}", msg!(MESSAGES.workspace.not_found, name = name));
                self.create_workspace(name, capacity_id, credential).await?
            }
        };

        self.apply_role_assignments(&id, principals, credential)
            .await?;

        info!(workspace = %name, workspace_id = %id, "{}", msg!(MESSAGES.workspace.ready, name = name));

        Ok(WorkspaceDescriptor {
            name: name.to_string(),
            id,
            capacity_id: (!capacity_id.trim().is_empty()).then(|| capacity_id.to_string()),
        })
    }

    /// Every workspace visible to the caller, following continuation tokens.
    pub async fn list_workspaces(
        &self,
        credential: &dyn TokenCredential,
    ) -> Result<Vec<WorkspaceSummary>> {
        let token = self.bearer(credential).await?;
        let mut workspaces = Vec::new();
        let mut continuation: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut request =
                ApiRequest::get(WORKSPACES_PATH, token.clone(), self.settings.request_timeout);
            if let Some(next) = &continuation {
                request = request.with_query("continuationToken", next.clone());
            }

            let response = self.send(request, OP_LIST).await?;
            if !response.is_success() {
                return Err(remote_query_error("Listing workspaces", &response));
            }

            let page: WorkspaceListPage = serde_json::from_str(&response.body).map_err(|e| {
                ProvisionError::RemoteInvariant(msg!(
                    MESSAGES.workspace.error_list_unparseable,
                    error = e.to_string()
                ))
            })?;
            debug!(count = page.value.len(), "Fetched workspace page");
            workspaces.extend(page.value);

            match page.continuation_token {
                Some(next) if !next.is_empty() => {
                    if !seen_tokens.insert(next.clone()) {
                        return Err(ProvisionError::RemoteInvariant(
                            "workspace listing repeated its continuation token".to_string(),
                        ));
                    }
                    continuation = Some(next);
                }
                _ => break,
            }
        }

        Ok(workspaces)
    }

    /// The workspace whose display name equals `name` exactly, if any.
    pub async fn find_workspace(
        &self,
        name: &str,
        credential: &dyn TokenCredential,
    ) -> Result<Option<WorkspaceSummary>> {
        let found = self
            .list_workspaces(credential)
            .await?
            .into_iter()
            .find(|ws| ws.display_name == name);

        if let Some(ws) = &found {
            info!(
                workspace = %name,
                workspace_id = %ws.id,
                "{}",
                msg!(MESSAGES.workspace.found, name = name, id = ws.id.as_str())
            );
        }
        Ok(found)
    }

    /// Create `name` on `capacity_id` and return the new id.
    ///
    /// Only `201 Created` with a non-empty `id` counts as success. A duplicate
    /// name rejection is resolved by listing again and reusing the winner.
    pub async fn create_workspace(
        &self,
        name: &str,
        capacity_id: &str,
        credential: &dyn TokenCredential,
    ) -> Result<String> {
        if capacity_id.trim().is_empty() {
            return Err(ProvisionError::Config(msg!(
                MESSAGES.workspace.error_capacity_required,
                name = name
            )));
        }

        let token = self.bearer(credential).await?;
        let payload = serde_json::to_value(CreateWorkspaceRequest {
            display_name: name,
            capacity_id,
        })
        .map_err(|e| ProvisionError::Validation(format!("Failed to encode create request: {e}")))?;

        info!(
            workspace = %name,
            capacity_id = %capacity_id,
            "{}",
            msg!(MESSAGES.workspace.creating, name = name, capacity = capacity_id)
        );

        let request = ApiRequest::post(WORKSPACES_PATH, token, payload, self.settings.create_timeout);
        let response = self.send(request, OP_CREATE).await?;

        match response.status {
            201 => {
                let created: CreatedWorkspace =
                    serde_json::from_str(&response.body).map_err(|e| {
                        ProvisionError::RemoteInvariant(msg!(
                            MESSAGES.workspace.error_create_unparseable,
                            error = e.to_string()
                        ))
                    })?;
                match created.id.filter(|id| !id.trim().is_empty()) {
                    Some(id) => {
                        info!(
                            workspace = %name,
                            workspace_id = %id,
                            "{}",
                            msg!(MESSAGES.workspace.created, name = name, id = id.as_str())
                        );
                        Ok(id)
                    }
                    None => Err(ProvisionError::RemoteInvariant(
                        MESSAGES.workspace.error_create_missing_id.to_string(),
                    )),
                }
            }
            status if response.is_success() => Err(ProvisionError::RemoteInvariant(msg!(
                MESSAGES.workspace.error_create_unexpected_status,
                status = status.to_string()
            ))),
            400 => {
                let detail = parse_error_response(&response);
                let rejection = ProvisionError::Validation(msg!(
                    MESSAGES.workspace.error_create_invalid,
                    detail = detail.message.as_str()
                ));
                if duplicate_name_signal(&detail, &response.body).is_some() {
                    self.adopt_concurrent_workspace(name, credential, rejection)
                        .await
                } else {
                    Err(rejection)
                }
            }
            403 => Err(ProvisionError::Permission(
                MESSAGES.workspace.error_create_forbidden.to_string(),
            )),
            404 => Err(ProvisionError::Config(msg!(
                MESSAGES.workspace.error_capacity_not_found,
                capacity = capacity_id
            ))),
            409 => {
                let conflict = remote_query_error("Workspace creation", &response);
                self.adopt_concurrent_workspace(name, credential, conflict)
                    .await
            }
            _ => Err(remote_query_error("Workspace creation", &response)),
        }
    }

    /// Grant one role. Empty principal ids are skipped without a request.
    ///
    /// Only `200`, `201` and `409` count as success; other 2xx codes are errors.
    pub async fn assign_role(
        &self,
        workspace_id: &str,
        assignment: &PrincipalAssignment,
        credential: &dyn TokenCredential,
    ) -> Result<AssignmentOutcome> {
        let principal = assignment.principal_type.description();
        let role = assignment.role.to_string();

        if !assignment.is_configured() {
            match assignment.principal_type {
                PrincipalType::ServicePrincipal => {
                    warn!("{}", msg!(MESSAGES.role.skipped_missing_id, principal = principal))
                }
                PrincipalType::Group => {
                    debug!("{}", msg!(MESSAGES.role.skipped_not_configured, principal = principal))
                }
            }
            return Ok(AssignmentOutcome::Skipped);
        }

        let token = self.bearer(credential).await?;
        let payload = serde_json::to_value(RoleAssignmentRequest {
            principal: PrincipalRef {
                id: &assignment.principal_id,
                principal_type: assignment.principal_type,
            },
            role: assignment.role,
        })
        .map_err(|e| ProvisionError::Validation(format!("Failed to encode role assignment: {e}")))?;

        info!(
            workspace_id = %workspace_id,
            principal_id = %assignment.principal_id,
            "{}",
            msg!(MESSAGES.role.assigning, principal = principal, role = role.as_str())
        );

        let path = format!("{WORKSPACES_PATH}/{workspace_id}/roleAssignments");
        let request = ApiRequest::post(path, token, payload, self.settings.request_timeout);
        let response = self
            .send(request, &format!("assigning {principal} role"))
            .await?;

        let already_assigned = || -> Result<AssignmentOutcome> {
            info!(
                principal_id = %assignment.principal_id,
                "{}",
                msg!(MESSAGES.role.already_assigned, principal = principal, role = role.as_str())
            );
            Ok(AssignmentOutcome::AlreadyAssigned)
        };

        match response.status {
            409 => already_assigned(),
            200 | 201 => {
                info!(
                    principal_id = %assignment.principal_id,
                    "{}",
                    msg!(MESSAGES.role.assigned, principal = principal, role = role.as_str())
                );
                Ok(AssignmentOutcome::Assigned)
            }
            400 => {
                let detail = parse_error_response(&response);
                match existing_assignment_signal(&detail, &response.body) {
                    Some(DuplicateSignal::ErrorCode) => already_assigned(),
                    Some(DuplicateSignal::ResponseText) => {
                        warn!(
                            principal_id = %assignment.principal_id,
                            "{}",
                            msg!(MESSAGES.role.matched_by_text, principal = principal)
                        );
                        already_assigned()
                    }
                    None => Err(ProvisionError::Validation(msg!(
                        MESSAGES.role.error_invalid_request,
                        principal = principal,
                        detail = detail.message.as_str()
                    ))),
                }
            }
            404 => Err(ProvisionError::Config(msg!(
                MESSAGES.role.error_invalid_principal,
                principal = principal,
                id = assignment.principal_id.as_str(),
                kind = assignment.principal_type.object_id_kind()
            ))),
            _ => Err(remote_query_error(
                format!("{principal} role assignment"),
                &response,
            )),
        }
    }

    /// Apply every assignment in order, returning each outcome.
    pub async fn apply_role_assignments(
        &self,
        workspace_id: &str,
        principals: &[PrincipalAssignment],
        credential: &dyn TokenCredential,
    ) -> Result<Vec<AssignmentOutcome>> {
        let mut outcomes = Vec::with_capacity(principals.len());
        let mut first_failure: Option<ProvisionError> = None;

        for assignment in principals {
            match self.assign_role(workspace_id, assignment, credential).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e @ ProvisionError::Auth(_)) => return Err(e),
                Err(e) => {
                    error!(
                        principal_id = %assignment.principal_id,
                        "{}",
                        msg!(
                            MESSAGES.role.failed_continuing,
                            principal = assignment.principal_type.description(),
                            error = e.to_string()
                        )
                    );
                    first_failure.get_or_insert(e);
                }
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => Ok(outcomes),
        }
    }

    async fn adopt_concurrent_workspace(
        &self,
        name: &str,
        credential: &dyn TokenCredential,
        otherwise: ProvisionError,
    ) -> Result<String> {
        match self.find_workspace(name, credential).await? {
            Some(existing) => {
                info!(
                    workspace = %name,
                    workspace_id = %existing.id,
                    "{}",
                    msg!(
                        MESSAGES.workspace.created_concurrently,
                        name = name,
                        id = existing.id.as_str()
                    )
                );
                Ok(existing.id)
            }
            None => Err(otherwise),
        }
    }

    async fn bearer(&self, credential: &dyn TokenCredential) -> Result<String> {
        let token = credential.acquire_token(&self.settings.token_scope).await?;
        Ok(token.secret().to_string())
    }

    async fn send(&self, request: ApiRequest, operation: &str) -> Result<ApiResponse> {
        debug!(method = %request.method, path = %request.path, "Fabric API request");
        self.transport
            .send(request)
            .await
            .map_err(|e| ProvisionError::from_transport(e, operation))
    }
}

fn remote_query_error(operation: impl Into<String>, response: &ApiResponse) -> ProvisionError {
    let detail = parse_error_response(response);
    ProvisionError::RemoteQuery {
        operation: operation.into(),
        status: response.status,
        detail: detail.message,
    }
}

/// Ensure `workspace_name` exists with the deployment service principal and
/// the optional admin group as `Admin`, returning the workspace id.
///
/// Failures are logged together with troubleshooting steps before being
/// returned.
pub async fn ensure_workspace_exists<T: Transport>(
    provisioner: &WorkspaceProvisioner<T>,
    workspace_name: &str,
    capacity_id: &str,
    service_principal_object_id: &str,
    credential: &dyn TokenCredential,
    admin_group_id: Option<&str>,
) -> Result<String> {
    let principals = [
        PrincipalAssignment::service_principal_admin(service_principal_object_id),
        PrincipalAssignment::group_admin(admin_group_id.unwrap_or_default()),
    ];

    match provisioner
        .ensure(workspace_name, capacity_id, &principals, credential)
        .await
    {
        Ok(descriptor) => Ok(descriptor.id),
        Err(e) => {
            error!(workspace = %workspace_name, "Failed to ensure workspace exists: {}", e);
            if let Some(hint) = e.hint() {
                warn!("{}\n{}", MESSAGES.hints.header, hint);
            }
            Err(e)
        }
    }
}
