use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use roster_chaincode::{wire_payload, Chaincode, Invocation, Operation, WireResponse};
use roster_store::InMemoryLedger;
use roster_types::EntityKind;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ServerResult;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub chaincode: Arc<Chaincode<InMemoryLedger>>,
}

impl AppState {
    pub fn new(chaincode: Chaincode<InMemoryLedger>) -> Self {
        Self {
            chaincode: Arc::new(chaincode),
        }
    }

    /// Run an invocation and render its payload, or `{"ok": true}` when it
    /// has none.
    fn run<I, S>(&self, function: &str, args: I) -> ServerResult<Json<Value>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let payload = self.chaincode.execute(&Invocation::new(function, args))?;
        Ok(Json(match payload {
            Some(bytes) => wire_payload(&bytes),
            None => json!({ "ok": true }),
        }))
    }

    fn list_kind(&self, kind: EntityKind) -> ServerResult<Json<Value>> {
        let range = kind.range();
        self.run(Operation::GetAllEmployee.name(), [range.start, range.end])
    }
}

// ---------------------------------------------------------------------------
// Service endpoints
// ---------------------------------------------------------------------------

pub async fn root_handler() -> &'static str {
    "Roster employee registry. The REST API is under /api."
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn info_handler(State(state): State<AppState>) -> Json<Value> {
    let operations: Vec<&str> = Operation::all().map(|op| op.name()).collect();
    Json(json!({
        "name": "roster-server",
        "version": env!("CARGO_PKG_VERSION"),
        "app_version": state.chaincode.config().app_version,
        "operations": operations,
    }))
}

/// Generic dispatch: `{"function": ..., "args": [...]}`.
pub async fn invoke_handler(
    State(state): State<AppState>,
    Json(invocation): Json<Invocation>,
) -> (StatusCode, Json<WireResponse>) {
    let response = state.chaincode.invoke(&invocation);
    let status =
        StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.to_wire()))
}

// ---------------------------------------------------------------------------
// REST API
// ---------------------------------------------------------------------------

pub async fn get_all_data(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    state.run(Operation::ReadAllData.name(), Vec::<String>::new())
}

pub async fn domain_list(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    state.list_kind(EntityKind::Domain)
}

pub async fn company_list(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    state.list_kind(EntityKind::Company)
}

pub async fn employee_list(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    state.list_kind(EntityKind::Employee)
}

pub async fn employee_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    state.run(Operation::GetEmployeeById.name(), [id])
}

pub async fn employee_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    state.run(Operation::GetHistory.name(), [id])
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path((id, domain_name)): Path<(String, String)>,
) -> ServerResult<Json<Value>> {
    state.run(Operation::DeleteEmployee.name(), [id, domain_name])
}

pub async fn disable_domain(
    State(state): State<AppState>,
    Path((id, domain_name)): Path<(String, String)>,
) -> ServerResult<Json<Value>> {
    state.run(Operation::DisableDomain.name(), [id, domain_name])
}

pub async fn disable_company(
    State(state): State<AppState>,
    Path((id, company_name)): Path<(String, String)>,
) -> ServerResult<Json<Value>> {
    state.run(Operation::DisableCompany.name(), [id, company_name])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDomain {
    pub id: String,
    pub domain_name: String,
}

pub async fn add_domain(
    State(state): State<AppState>,
    Json(body): Json<AddDomain>,
) -> ServerResult<Json<Value>> {
    state.run(Operation::InitDomain.name(), [body.id, body.domain_name])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCompany {
    pub id: String,
    pub company_name: String,
}

pub async fn add_company(
    State(state): State<AppState>,
    Json(body): Json<AddCompany>,
) -> ServerResult<Json<Value>> {
    state.run(Operation::InitCompany.name(), [body.id, body.company_name])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEmployee {
    pub id: String,
    pub employee_name: String,
    pub designation: String,
    pub dob: String,
    pub domain_id: String,
    pub domain_name: String,
    pub company_id: String,
    pub company_name: String,
}

pub async fn add_employee(
    State(state): State<AppState>,
    Json(body): Json<AddEmployee>,
) -> ServerResult<Json<Value>> {
    state.run(
        Operation::InitEmployee.name(),
        [
            body.id,
            body.employee_name,
            body.designation,
            body.dob,
            body.domain_id,
            body.domain_name,
            body.company_id,
            body.company_name,
        ],
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDomain {
    pub id: String,
    pub new_domain_id: String,
    pub domain_name: String,
}

pub async fn change_employee_domain(
    State(state): State<AppState>,
    Json(body): Json<ChangeDomain>,
) -> ServerResult<Json<Value>> {
    state.run(
        Operation::SetDomain.name(),
        [body.id, body.new_domain_id, body.domain_name],
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCompany {
    pub id: String,
    pub new_company_id: String,
    pub company_name: String,
}

pub async fn change_employee_company(
    State(state): State<AppState>,
    Json(body): Json<ChangeCompany>,
) -> ServerResult<Json<Value>> {
    state.run(
        Operation::SetCompany.name(),
        [body.id, body.new_company_id, body.company_name],
    )
}
