//! Fake Google OAuth + Sheets API server for integration tests.
//!
//! Serves:
//! - `POST /token`: verifies the RS256 JWT-bearer assertion against
//!   [`TEST_PUBLIC_KEY`](super::fixtures::TEST_PUBLIC_KEY) and issues a fixed
//!   access token;
//! - `GET /v4/spreadsheets/{id}/values/{range}`: returns the configured grid
//!   for a known sheet, `400` for an unknown one, `401` without the token.
//!
//! Point the service-account `token_uri` at [`FakeSheetsApi::token_uri`] and
//! `SHEETS_API_BASE` at [`FakeSheetsApi::base_url`].

use super::fixtures::{TEST_CLIENT_EMAIL, TEST_PUBLIC_KEY};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const ACCESS_TOKEN: &str = "ya29.test-access-token";

#[derive(Default)]
struct ApiState {
    spreadsheet_id: String,
    sheets: HashMap<String, Vec<Vec<Value>>>,
    token_requests: usize,
    value_requests: Vec<ValueRequest>,
    /// The `scope` claim of the last accepted assertion.
    last_scope: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValueRequest {
    pub spreadsheet_id: String,
    pub range: String,
    pub query: HashMap<String, String>,
}

/// Handle to the running fake server.
pub struct FakeSheetsApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeSheetsApi {
    pub async fn start(spreadsheet_id: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState {
            spreadsheet_id: spreadsheet_id.to_string(),
            ..ApiState::default()
        }));

        let app = Router::new()
            .route("/token", post(token))
            .route("/v4/spreadsheets/{id}/values/{range}", get(values))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn token_uri(&self) -> String {
        format!("http://{}/token", self.addr)
    }

    /// Serve `grid` for worksheet `name`.
    pub async fn put_sheet(&self, name: &str, grid: Vec<Vec<Value>>) {
        self.state.lock().await.sheets.insert(name.to_string(), grid);
    }

    pub async fn token_requests(&self) -> usize {
        self.state.lock().await.token_requests
    }

    pub async fn value_requests(&self) -> Vec<ValueRequest> {
        self.state.lock().await.value_requests.clone()
    }

    pub async fn last_scope(&self) -> Option<String> {
        self.state.lock().await.last_scope.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TokenForm {
    grant_type: String,
    assertion: String,
}

#[derive(Deserialize)]
struct Claims {
    iss: String,
    scope: String,
}

async fn token(
    State(state): State<Arc<Mutex<ApiState>>>,
    Form(form): Form<TokenForm>,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.token_requests += 1;

    if form.grant_type != "urn:ietf:params:oauth:grant-type:jwt-bearer" {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "unsupported_grant_type"})));
    }

    let key = DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap();
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_aud = false;
    match decode::<Claims>(&form.assertion, &key, &validation) {
        Ok(data) if data.claims.iss == TEST_CLIENT_EMAIL => {
            state.last_scope = Some(data.claims.scope);
            (
                StatusCode::OK,
                Json(json!({"access_token": ACCESS_TOKEN, "expires_in": 3599, "token_type": "Bearer"})),
            )
        }
        _ => (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))),
    }
}

async fn values(
    Path((id, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    State(state): State<Arc<Mutex<ApiState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.value_requests.push(ValueRequest {
        spreadsheet_id: id.clone(),
        range: range.clone(),
        query,
    });

    let authorised = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"));
    if !authorised {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": {"code": 401}})));
    }
    if id != state.spreadsheet_id {
        return (StatusCode::NOT_FOUND, Json(json!({"error": {"code": 404, "message": "Requested entity was not found."}})));
    }
    match state.sheets.get(&range) {
        Some(grid) if grid.is_empty() => (StatusCode::OK, Json(json!({"range": range, "majorDimension": "ROWS"}))),
        Some(grid) => (
            StatusCode::OK,
            Json(json!({"range": format!("{range}!A1:Z1000"), "majorDimension": "ROWS", "values": grid})),
        ),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": format!("Unable to parse range: {range}")}})),
        ),
    }
}
