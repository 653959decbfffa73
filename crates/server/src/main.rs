// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bms_interop_api::{
    ApiError, BmsDalDatabase, DalSession, JsonResponseBuilder, OperationResult, PASSWORD_PARAM,
    SessionExpiryOption,
};
use bms_interop_persistence::ConnectionParameters;
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};

use crate::session::{SessionToken, SessionUser};

/// BMS Interop Server - HTTP front end for the DAL database adapter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Connection URL of the central database.
    #[arg(long)]
    central_url: String,

    /// Connection URL of the local database, if any.
    #[arg(long)]
    local_url: Option<String>,

    /// Database user applied to both connections.
    #[arg(long)]
    db_user: Option<String>,

    /// Database password applied to both connections.
    #[arg(long)]
    db_password: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Open the database connections at startup instead of on first login.
    #[arg(long)]
    initialise: bool,
}

impl Args {
    fn parameters(&self, url: &str) -> ConnectionParameters {
        let params = ConnectionParameters::new(url);
        match &self.db_user {
            Some(user) => {
                params.with_credentials(user, self.db_password.clone().unwrap_or_default())
            }
            None => params,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    database: Arc<BmsDalDatabase>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct LoginRequest {
    user_name: String,
    password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct LoginResponse {
    session_id: String,
    user_id: String,
    user_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct OperationResponse {
    template: String,
    entity: String,
}

#[derive(Debug, Deserialize)]
struct DalQuery {
    filter: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    error: bool,
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status = match &err {
            ApiError::AuthenticationFailed { .. } | ApiError::NotLoggedIn => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::InvalidInput { .. } | ApiError::UnsupportedOperation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnknownTable(_) | ApiError::UnknownOperation(_) => StatusCode::NOT_FOUND,
            ApiError::NotYetImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Configuration(_)
            | ApiError::Database { .. }
            | ApiError::MissingReferenceData(_)
            | ApiError::NotInitialized => {
                error!(error = %err, "Adapter error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Runs an adapter call on the blocking thread pool.
async fn run_blocking<T, F>(app_state: &AppState, call: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&BmsDalDatabase) -> Result<T, ApiError> + Send + 'static,
{
    let database = Arc::clone(&app_state.database);
    tokio::task::spawn_blocking(move || call(&database))
        .await
        .map_err(|e| {
            error!(error = %e, "Blocking task failed");
            HttpError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: String::from("Internal error"),
            }
        })?
        .map_err(HttpError::from)
}

fn generate_session_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    format!("session_{timestamp}_{}", rand::random::<u64>())
}

/// Handler for POST `/login` endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(user_name = %req.user_name, "Handling login request");

    let session_id = generate_session_id();
    let params = BTreeMap::from([(PASSWORD_PARAM.to_string(), req.password)]);
    let user_name = req.user_name;
    let session = session_id.clone();

    let user = run_blocking(&app_state, move |database| {
        database.do_login(&session, &user_name, SessionExpiryOption::default(), &params)
    })
    .await?;

    Ok(Json(LoginResponse {
        session_id,
        user_id: user.user_id,
        user_name: user.user_name,
    }))
}

/// Handler for POST `/logout` endpoint. Unknown sessions are ignored.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionToken(token): SessionToken,
) -> StatusCode {
    let session = DalSession::new(token, "");
    app_state.database.do_logout(&session);
    StatusCode::NO_CONTENT
}

/// Handler for GET `/operations` endpoint.
async fn handle_list_operations(
    AxumState(app_state): AxumState<AppState>,
) -> Json<Vec<OperationResponse>> {
    Json(
        app_state
            .database
            .get_operations()
            .iter()
            .map(|operation| OperationResponse {
                template: operation.template().to_string(),
                entity: operation.entity_name().to_string(),
            })
            .collect(),
    )
}

/// Handler for GET `/group/list` endpoint.
async fn handle_list_group(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session, _): SessionUser,
) -> Result<Json<Value>, HttpError> {
    let document = run_blocking(&app_state, move |database| {
        let mut builder = JsonResponseBuilder::new();
        database.perform_list_group(&session, &mut builder)?;
        Ok(builder.into_json())
    })
    .await?;
    Ok(Json(document))
}

/// Handler for GET `/group/list/all` endpoint.
async fn handle_list_all_group(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session, _): SessionUser,
) -> Result<Json<Value>, HttpError> {
    let document = run_blocking(&app_state, move |database| {
        let mut builder = JsonResponseBuilder::new();
        database.perform_list_all_group(&session, &mut builder)?;
        Ok(builder.into_json())
    })
    .await?;
    Ok(Json(document))
}

/// Handler for GET `/field/list/{table}` endpoint. Needs no session.
async fn handle_list_field(
    AxumState(app_state): AxumState<AppState>,
    Path(table): Path<String>,
) -> Result<Json<Value>, HttpError> {
    let session = DalSession::new("", "");
    let mut builder = JsonResponseBuilder::new();
    app_state
        .database
        .perform_list_field(&session, &table, &mut builder)?;
    Ok(Json(builder.into_json()))
}

/// Handler for GET `/dal/{*path}` endpoint.
///
/// Executes the operation whose template matches the path.
async fn handle_dal(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session, user): SessionUser,
    Path(path): Path<String>,
    Query(query): Query<DalQuery>,
) -> Result<Json<OperationResult>, HttpError> {
    info!(user_name = %user.user_name, %path, "Handling DAL request");

    let result = run_blocking(&app_state, move |database| {
        database.execute(&session, &path, query.filter.as_deref())
    })
    .await
    .inspect_err(|e| warn!(status = %e.status, message = %e.message, "DAL request failed"))?;
    Ok(Json(result))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/operations", get(handle_list_operations))
        .route("/group/list", get(handle_list_group))
        .route("/group/list/all", get(handle_list_all_group))
        .route("/field/list/{table}", get(handle_list_field))
        .route("/dal/{*path}", get(handle_dal))
        .with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Cannot listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing BMS Interop Server");

    let central = args.parameters(&args.central_url);
    let local = args.local_url.as_deref().map(|url| args.parameters(url));
    let initialise = args.initialise;

    let database = tokio::task::spawn_blocking(move || {
        let builder = BmsDalDatabase::builder(central)
            .progress(Arc::new(|message: &str| info!("{message}")))
            .initialise_now(initialise);
        match local {
            Some(local) => builder.local(local).build(),
            None => builder.build(),
        }
    })
    .await??;
    info!(path = %database.get_database_path(), "Adapter ready");

    let database = Arc::new(database);
    let app: Router = build_router(AppState {
        database: Arc::clone(&database),
    });

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tokio::task::spawn_blocking(move || database.shutdown()).await?;
    info!("Server stopped");
    Ok(())
}
