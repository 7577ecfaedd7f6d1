//! Workspace lookup and creation messages

pub struct WorkspaceMessages {
    // ============================================================================
    // Progress
    // ============================================================================
    pub ensuring: &'static str,
    pub found: &'static str,
    pub not_found: &'static str,
    pub creating: &'static str,
    pub created: &'static str,
    pub created_concurrently: &'static str,
    pub ready: &'static str,

    // ============================================================================
    // Errors
    // ============================================================================
    pub error_name_empty: &'static str,
    pub error_capacity_required: &'static str,
    pub error_capacity_not_found: &'static str,
    pub error_create_forbidden: &'static str,
    pub error_create_invalid: &'static str,
    pub error_create_missing_id: &'static str,
    pub error_create_unparseable: &'static str,
    pub error_create_unexpected_status: &'static str,
    pub error_list_unparseable: &'static str,
}

pub const WORKSPACE_MESSAGES: WorkspaceMessages = WorkspaceMessages {
    // Progress
    ensuring: "Ensuring workspace '{name}' exists",
    found: "Workspace '{name}' already exists (ID: {id})",
    not_found: "Workspace '{name}' not found, creating new workspace",
    creating: "Creating workspace '{name}' with capacity '{capacity}'",
    created: "Workspace '{name}' created successfully (ID: {id})",
    created_concurrently: "Workspace '{name}' was created by another caller, reusing ID {id}",
    ready: "Workspace '{name}' is ready for deployment",

    // Errors
    error_name_empty: "Workspace name must not be empty",
    error_capacity_required: "Capacity ID is required to auto-create a Fabric workspace. \
Either manually create a workspace named '{name}' in Fabric, \
or set FABRIC_CAPACITY_ID_<ENV> for this environment to enable auto-creation.",
    error_capacity_not_found: "Invalid capacity ID '{capacity}'. Verify the FABRIC_CAPACITY_ID_<ENV> value is correct.",
    error_create_forbidden: "Service Principal lacks workspace creation permissions.\n\n\
Possible causes:\n\
1. Missing tenant setting: in Fabric Admin Portal → Tenant Settings → Developer Settings, \
enable 'Service principals can create workspaces, connections, and deployment pipelines'\n\
2. Missing capacity admin role: in Azure Portal → Fabric Capacity → Settings → Capacity administrators, \
add the Service Principal",
    error_create_invalid: "Invalid workspace creation request: {detail}",
    error_create_missing_id: "Workspace creation returned HTTP 201 but the response did not contain a valid 'id' field. \
Inspect the Fabric API response for details.",
    error_create_unparseable: "Workspace creation returned HTTP 201 but the response body is not valid JSON: {error}",
    error_create_unexpected_status: "Workspace creation returned HTTP {status}; only 201 Created is accepted",
    error_list_unparseable: "Failed to parse workspace list response as JSON: {error}",
};
