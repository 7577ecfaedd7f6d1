//! Troubleshooting hints attached to provisioning failures

pub struct HintMessages {
    pub header: &'static str,
    pub workspace_permissions: &'static str,
    pub capacity: &'static str,
    pub object_id: &'static str,
}

pub const HINT_MESSAGES: HintMessages = HintMessages {
    header: "TROUBLESHOOTING:",
    workspace_permissions: concat!(
        "  1. Fabric Tenant Setting:\n",
        "     - Open Fabric Admin Portal (https://app.fabric.microsoft.com/admin-portal)\n",
        "     - Navigate to: Tenant Settings → Developer Settings\n",
        "     - Enable: 'Service principals can create workspaces, connections, and deployment pipelines'\n",
        "  2. Capacity Administrator Assignment:\n",
        "     - Open Azure Portal → Your Fabric Capacity → Settings → Capacity administrators\n",
        "     - Add the Service Principal by Client ID or Enterprise Application name",
    ),
    capacity: concat!(
        "  1. Verify FABRIC_CAPACITY_ID_<ENV> is set for the target environment\n",
        "  2. Get the capacity ID from the Fabric portal: Settings → Admin Portal → Capacity Settings\n",
        "  3. Ensure the capacity is active and not paused",
    ),
    object_id: concat!(
        "  1. Go to Azure Portal → Microsoft Entra ID → Enterprise Applications\n",
        "  2. Search for your application by Client ID (Application ID)\n",
        "  3. Copy the 'Object ID' field (NOT the Application ID)\n",
        "  4. Set DEPLOYMENT_SP_OBJECT_ID to this Object ID value",
    ),
};
