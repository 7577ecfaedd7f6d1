//! Shared fakes for fabric-provision integration tests
//!
//! `FakeFabric` keeps workspaces and role assignments in memory and answers
//! the three endpoints the provisioner uses. Individual responses can be
//! scripted to exercise error paths.

#![allow(dead_code)]

use async_trait::async_trait;
use fabric_provision::{
    AccessToken, ApiRequest, ApiResponse, AuthError, TokenCredential, Transport, TransportError,
    WorkspaceSummary,
};
use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct FakeState {
    workspaces: Vec<WorkspaceSummary>,
    assignments: HashSet<(String, String)>,
    requests: Vec<ApiRequest>,
    list_calls: usize,
    create_calls: usize,
    assign_calls: usize,
    next_id: usize,
    page_size: Option<usize>,
    list_responses: VecDeque<ApiResponse>,
    create_responses: VecDeque<ApiResponse>,
    assign_responses: VecDeque<ApiResponse>,
    transport_failures: VecDeque<TransportError>,
}

#[derive(Default)]
pub struct FakeFabric {
    state: Mutex<FakeState>,
}

impl FakeFabric {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace(self, display_name: &str, id: &str) -> Self {
        self.add_workspace(display_name, id);
        self
    }

    pub fn add_workspace(&self, display_name: &str, id: &str) {
        self.state.lock().unwrap().workspaces.push(WorkspaceSummary {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: None,
            kind: Some("Workspace".to_string()),
            capacity_id: None,
        });
    }

    /// Split listings into pages of `size` entries linked by continuation tokens.
    pub fn with_page_size(self, size: usize) -> Self {
        self.state.lock().unwrap().page_size = Some(size);
        self
    }

    pub fn script_list(&self, response: ApiResponse) {
        self.state.lock().unwrap().list_responses.push_back(response);
    }

    pub fn script_create(&self, response: ApiResponse) {
        self.state.lock().unwrap().create_responses.push_back(response);
    }

    pub fn script_assign(&self, response: ApiResponse) {
        self.state.lock().unwrap().assign_responses.push_back(response);
    }

    pub fn fail_next(&self, error: TransportError) {
        self.state.lock().unwrap().transport_failures.push_back(error);
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn assign_calls(&self) -> usize {
        self.state.lock().unwrap().assign_calls
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn has_assignment(&self, workspace_id: &str, principal_id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .assignments
            .contains(&(workspace_id.to_string(), principal_id.to_string()))
    }

    fn list(state: &mut FakeState, request: &ApiRequest) -> ApiResponse {
        state.list_calls += 1;
        if let Some(scripted) = state.list_responses.pop_front() {
            return scripted;
        }

        let start: usize = request
            .query_value("continuationToken")
            .and_then(|t| t.strip_prefix("page-"))
            .and_then(|n| n.parse().ok())
            .unwrap_or(0);
        let size = state.page_size.unwrap_or(usize::MAX);
        let page: Vec<&WorkspaceSummary> = state.workspaces.iter().skip(start).take(size).collect();
        let next = start.saturating_add(size);

        let mut body = json!({ "value": page });
        if next < state.workspaces.len() {
            body["continuationToken"] = json!(format!("page-{next}"));
        }
        ApiResponse::json(200, &body)
    }

    fn create(state: &mut FakeState, request: &ApiRequest) -> ApiResponse {
        state.create_calls += 1;
        if let Some(scripted) = state.create_responses.pop_front() {
            return scripted;
        }

        let body = request.body.clone().unwrap_or(Value::Null);
        let name = body["displayName"].as_str().unwrap_or_default().to_string();
        if state.workspaces.iter().any(|ws| ws.display_name == name) {
            return ApiResponse::json(
                400,
                &json!({"errorCode": "WorkspaceNameAlreadyExists", "message": "Workspace name already exists"}),
            );
        }

        state.next_id += 1;
        let id = format!("ws-{}", state.next_id);
        state.workspaces.push(WorkspaceSummary {
            id: id.clone(),
            display_name: name.clone(),
            description: None,
            kind: Some("Workspace".to_string()),
            capacity_id: body["capacityId"].as_str().map(str::to_string),
        });
        ApiResponse::json(201, &json!({"id": id, "displayName": name}))
    }

    fn assign(state: &mut FakeState, request: &ApiRequest) -> ApiResponse {
        state.assign_calls += 1;
        if let Some(scripted) = state.assign_responses.pop_front() {
            return scripted;
        }

        let workspace_id = request
            .path
            .trim_start_matches("/v1/workspaces/")
            .trim_end_matches("/roleAssignments")
            .to_string();
        if !state.workspaces.iter().any(|ws| ws.id == workspace_id) {
            return ApiResponse::json(404, &json!({"errorCode": "WorkspaceNotFound"}));
        }

        let body = request.body.clone().unwrap_or(Value::Null);
        let principal_id = body["principal"]["id"].as_str().unwrap_or_default().to_string();
        if state.assignments.insert((workspace_id, principal_id)) {
            ApiResponse::json(201, &json!({"role": body["role"]}))
        } else {
            ApiResponse::json(
                409,
                &json!({"errorCode": "PrincipalAlreadyHasWorkspaceRolePermissions"}),
            )
        }
    }
}

#[async_trait]
impl Transport for FakeFabric {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if let Some(failure) = state.transport_failures.pop_front() {
            return Err(failure);
        }

        let is_post = request.method == reqwest::Method::POST;
        let response = match (is_post, request.path.as_str()) {
            (false, "/v1/workspaces") => Self::list(&mut state, &request),
            (true, "/v1/workspaces") => Self::create(&mut state, &request),
            (true, path) if path.ends_with("/roleAssignments") => {
                Self::assign(&mut state, &request)
            }
            _ => ApiResponse::new(405, "unsupported"),
        };
        Ok(response)
    }
}

/// Credential that counts acquisitions and can be told to fail.
pub struct FakeCredential {
    calls: AtomicUsize,
    fail_after: Option<usize>,
}

impl FakeCredential {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_after: None,
        }
    }

    pub fn failing() -> Self {
        Self::failing_after(0)
    }

    /// Succeed `n` times, then fail every call.
    pub fn failing_after(n: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_after: Some(n),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenCredential for FakeCredential {
    async fn acquire_token(&self, _scope: &str) -> Result<AccessToken, AuthError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_after {
            Some(limit) if call >= limit => Err(AuthError::new("credential revoked")),
            _ => Ok(AccessToken::new("fake-token", None)),
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("fabric_provision=debug")
        .try_init();
}
