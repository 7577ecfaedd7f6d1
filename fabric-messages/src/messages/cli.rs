//! Command line output

pub struct CliMessages {
    pub list_header: &'static str,
    pub list_entry: &'static str,
    pub list_empty: &'static str,
    pub check_missing: &'static str,
    pub error_generic: &'static str,
    pub error_missing_credentials: &'static str,
    pub error_missing_workspace_name: &'static str,
}

pub const CLI_MESSAGES: CliMessages = CliMessages {
    list_header: "Found {count} workspace(s):",
    list_entry: "{name} ({id})",
    list_empty: "No workspaces are visible to this principal",
    check_missing: "Workspace '{name}' does not exist",
    error_generic: "ERROR: {error}",
    error_missing_credentials: "Missing credentials. Set FABRIC_ACCESS_TOKEN, \
or FABRIC_TENANT_ID, FABRIC_CLIENT_ID and FABRIC_CLIENT_SECRET",
    error_missing_workspace_name: "No workspace name given. Pass --name, or --env for an environment with a workspace_name",
};
