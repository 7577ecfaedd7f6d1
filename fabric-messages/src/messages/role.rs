//! Role assignment messages

pub struct RoleMessages {
    pub assigning: &'static str,
    pub assigned: &'static str,
    pub already_assigned: &'static str,
    pub skipped_missing_id: &'static str,
    pub skipped_not_configured: &'static str,
    pub matched_by_text: &'static str,
    pub failed_continuing: &'static str,

    pub error_invalid_request: &'static str,
    pub error_invalid_principal: &'static str,
}

pub const ROLE_MESSAGES: RoleMessages = RoleMessages {
    assigning: "Adding {principal} as {role} to workspace",
    assigned: "{principal} added as {role} successfully",
    already_assigned: "{principal} already has {role} access",
    skipped_missing_id: "{principal} ID not set. Skipping role assignment.",
    skipped_not_configured: "No {principal} configured. Skipping role assignment.",
    matched_by_text: "{principal} role assignment treated as existing from response text; \
the API returned no structured error code",
    failed_continuing: "{principal} role assignment failed, continuing with remaining principals: {error}",

    error_invalid_request: "Invalid {principal} role assignment request: {detail}",
    error_invalid_principal: "Invalid {principal} Object ID '{id}'. \
Verify the value contains a valid {kind}. Find it in Azure Portal → Microsoft Entra ID.",
};
