//! HTTP surface. Thin pass-through: handlers marshal the core's structured
//! results and map its error taxonomy onto status codes, nothing else.

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Json, Response},
  routing::get,
  Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::host_os::{self, HostInfo};
use crate::profile::{CreateProfileRequest, ProfileManager, ProfileResponse, RegistryError};
use crate::proxy;
use crate::screen::{self, ScreenSize};
use crate::session_manager::{SessionError, SessionStatus, SessionSummary};

#[derive(Clone)]
pub struct ApiState {
  pub profiles: Arc<ProfileManager>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiMessage {
  pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorBody {
  pub error: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub errors: Vec<String>,
}

/// Error half of every handler: carries the status code and a body that is
/// safe to show. Operational detail stays in the server log.
pub struct ApiError {
  status: StatusCode,
  body: ApiErrorBody,
}

impl ApiError {
  fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status,
      body: ApiErrorBody {
        error: message.into(),
        errors: Vec::new(),
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status, Json(self.body)).into_response()
  }
}

impl From<RegistryError> for ApiError {
  fn from(e: RegistryError) -> Self {
    match e {
      RegistryError::Validation(errors) => Self {
        status: StatusCode::BAD_REQUEST,
        body: ApiErrorBody {
          error: "Profile validation failed".to_string(),
          errors,
        },
      },
      RegistryError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, e.to_string()),
      RegistryError::Encryption(_) => {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
      RegistryError::Persistence(_) => Self::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to persist profile store",
      ),
      RegistryError::Session(session_error) => session_error.into(),
    }
  }
}

impl From<SessionError> for ApiError {
  fn from(e: SessionError) -> Self {
    match e {
      SessionError::Conflict { .. } => Self::new(StatusCode::CONFLICT, e.to_string()),
      SessionError::NotActive(_) => Self::new(StatusCode::CONFLICT, e.to_string()),
      SessionError::Proxy(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      SessionError::Engine(engine_error) => {
        log::error!("Engine failure surfaced to API: {engine_error}");
        Self::new(
          StatusCode::INTERNAL_SERVER_ERROR,
          "Browser engine operation failed",
        )
      }
    }
  }
}

#[derive(OpenApi)]
#[openapi(
  paths(
    get_profiles,
    create_profile,
    get_profile,
    delete_profile,
    launch_profile,
    stop_profile,
    profile_status,
    navigate_profile,
    get_sessions,
    validate_proxy,
    get_screen_sizes,
    get_host_info,
    health,
  ),
  components(schemas(
    ApiMessage,
    ApiErrorBody,
    CreateProfileRequest,
    ProfileResponse,
    crate::profile::ScreenConfig,
    crate::profile::ProfileStatus,
    crate::session_manager::SessionState,
    ScreenSize,
    SessionStatus,
    SessionSummary,
    ValidateProxyRequest,
    ValidateProxyResponse,
    ScreenSizesResponse,
    HostInfo,
    HealthResponse,
    NavigateRequest,
  )),
  tags(
    (name = "profiles", description = "Profile management endpoints"),
    (name = "sessions", description = "Session lifecycle endpoints"),
    (name = "utility", description = "Validation and host utility endpoints"),
  )
)]
struct ApiDoc;

pub fn router(state: ApiState) -> Router {
  let (api_routes, _) = OpenApiRouter::new()
    .routes(routes!(get_profiles, create_profile))
    .routes(routes!(get_profile, delete_profile))
    .routes(routes!(launch_profile))
    .routes(routes!(stop_profile))
    .routes(routes!(profile_status))
    .routes(routes!(navigate_profile))
    .routes(routes!(get_sessions))
    .routes(routes!(validate_proxy))
    .routes(routes!(get_screen_sizes))
    .routes(routes!(get_host_info))
    .routes(routes!(health))
    .split_for_parts();

  let api = ApiDoc::openapi();

  api_routes
    .route("/openapi.json", get(move || async move { Json(api) }))
    .layer(CorsLayer::permissive())
    .with_state(state)
}

/// Bind and serve. The preferred port falls back to an OS-assigned one on
/// conflict; the bound port is logged either way.
pub async fn serve(state: ApiState, preferred_port: u16) -> Result<(), String> {
  let listener = match TcpListener::bind(format!("127.0.0.1:{preferred_port}")).await {
    Ok(listener) => listener,
    Err(_) => {
      log::warn!("Port {preferred_port} unavailable, falling back to a random port");
      TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| format!("Failed to bind to any port: {e}"))?
    }
  };

  let actual_port = listener
    .local_addr()
    .map_err(|e| format!("Failed to get local address: {e}"))?
    .port();
  log::info!("API server listening on 127.0.0.1:{actual_port}");

  axum::serve(listener, router(state))
    .await
    .map_err(|e| format!("API server error: {e}"))
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(id)
    .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid profile ID: {id}")))
}

async fn profile_response(state: &ApiState, profile: &crate::profile::Profile) -> ProfileResponse {
  let proxy_url = state.profiles.proxy_url_for_display(profile).await;
  ProfileResponse::from_profile(profile, proxy_url.as_deref())
}

// Profiles

#[utoipa::path(
  get,
  path = "/api/profiles",
  responses(
    (status = 200, description = "List of all profiles", body = [ProfileResponse]),
  ),
  tag = "profiles"
)]
async fn get_profiles(State(state): State<ApiState>) -> Json<Vec<ProfileResponse>> {
  let profiles = state.profiles.list().await;
  let mut responses = Vec::with_capacity(profiles.len());
  for profile in &profiles {
    responses.push(profile_response(&state, profile).await);
  }
  Json(responses)
}

#[utoipa::path(
  post,
  path = "/api/profiles",
  request_body = CreateProfileRequest,
  responses(
    (status = 200, description = "Profile created", body = ProfileResponse),
    (status = 400, description = "Validation failed", body = ApiErrorBody),
    (status = 500, description = "Internal server error", body = ApiErrorBody)
  ),
  tag = "profiles"
)]
async fn create_profile(
  State(state): State<ApiState>,
  Json(request): Json<CreateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
  let profile = state.profiles.create(&request).await?;
  Ok(Json(profile_response(&state, &profile).await))
}

#[utoipa::path(
  get,
  path = "/api/profiles/{id}",
  params(("id" = String, Path, description = "Profile ID")),
  responses(
    (status = 200, description = "Profile details", body = ProfileResponse),
    (status = 404, description = "Profile not found", body = ApiErrorBody)
  ),
  tag = "profiles"
)]
async fn get_profile(
  State(state): State<ApiState>,
  Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
  let id = parse_id(&id)?;
  let profile = state
    .profiles
    .get(id)
    .await
    .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("Profile {id} not found")))?;
  Ok(Json(profile_response(&state, &profile).await))
}

#[utoipa::path(
  delete,
  path = "/api/profiles/{id}",
  params(("id" = String, Path, description = "Profile ID")),
  responses(
    (status = 200, description = "Profile deleted", body = ApiMessage),
    (status = 404, description = "Profile not found", body = ApiErrorBody),
    (status = 409, description = "Session operation in progress", body = ApiErrorBody)
  ),
  tag = "profiles"
)]
async fn delete_profile(
  State(state): State<ApiState>,
  Path(id): Path<String>,
) -> Result<Json<ApiMessage>, ApiError> {
  let id = parse_id(&id)?;
  state.profiles.delete(id).await?;
  Ok(Json(ApiMessage {
    message: "Profile deleted successfully".to_string(),
  }))
}

// Sessions

#[utoipa::path(
  post,
  path = "/api/profiles/{id}/launch",
  params(("id" = String, Path, description = "Profile ID")),
  responses(
    (status = 200, description = "Session launched", body = SessionSummary),
    (status = 404, description = "Profile not found", body = ApiErrorBody),
    (status = 409, description = "Session already active or launching", body = ApiErrorBody),
    (status = 500, description = "Engine or vault failure", body = ApiErrorBody)
  ),
  tag = "sessions"
)]
async fn launch_profile(
  State(state): State<ApiState>,
  Path(id): Path<String>,
) -> Result<Json<SessionSummary>, ApiError> {
  let id = parse_id(&id)?;
  let summary = state.profiles.launch(id).await?;
  Ok(Json(summary))
}

#[utoipa::path(
  post,
  path = "/api/profiles/{id}/stop",
  params(("id" = String, Path, description = "Profile ID")),
  responses(
    (status = 200, description = "Session stopped", body = ApiMessage),
    (status = 404, description = "Profile not found", body = ApiErrorBody),
    (status = 409, description = "No active session", body = ApiErrorBody)
  ),
  tag = "sessions"
)]
async fn stop_profile(
  State(state): State<ApiState>,
  Path(id): Path<String>,
) -> Result<Json<ApiMessage>, ApiError> {
  let id = parse_id(&id)?;
  state.profiles.stop(id).await?;
  Ok(Json(ApiMessage {
    message: "Browser stopped".to_string(),
  }))
}

#[utoipa::path(
  get,
  path = "/api/profiles/{id}/status",
  params(("id" = String, Path, description = "Profile ID")),
  responses(
    (status = 200, description = "Session state and metadata", body = SessionStatus),
    (status = 404, description = "Profile not found", body = ApiErrorBody)
  ),
  tag = "sessions"
)]
async fn profile_status(
  State(state): State<ApiState>,
  Path(id): Path<String>,
) -> Result<Json<SessionStatus>, ApiError> {
  let id = parse_id(&id)?;
  if state.profiles.get(id).await.is_none() {
    return Err(ApiError::new(
      StatusCode::NOT_FOUND,
      format!("Profile {id} not found"),
    ));
  }
  Ok(Json(state.profiles.sessions().status(id).await))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NavigateRequest {
  pub url: String,
}

#[utoipa::path(
  post,
  path = "/api/profiles/{id}/navigate",
  params(("id" = String, Path, description = "Profile ID")),
  request_body = NavigateRequest,
  responses(
    (status = 200, description = "Navigation issued", body = ApiMessage),
    (status = 409, description = "No active session", body = ApiErrorBody),
    (status = 500, description = "Engine failure", body = ApiErrorBody)
  ),
  tag = "sessions"
)]
async fn navigate_profile(
  State(state): State<ApiState>,
  Path(id): Path<String>,
  Json(request): Json<NavigateRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
  let id = parse_id(&id)?;
  state
    .profiles
    .sessions()
    .navigate(id, &request.url)
    .await
    .map_err(ApiError::from)?;
  Ok(Json(ApiMessage {
    message: format!("Navigated to {}", request.url),
  }))
}

#[utoipa::path(
  get,
  path = "/api/sessions",
  responses((status = 200, description = "All active sessions", body = [SessionSummary])),
  tag = "sessions"
)]
async fn get_sessions(State(state): State<ApiState>) -> Json<Vec<SessionSummary>> {
  Json(state.profiles.sessions().active_sessions().await)
}

// Utility

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateProxyRequest {
  pub proxy: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateProxyResponse {
  pub valid: bool,
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
  pub sanitized_url: Option<String>,
}

#[utoipa::path(
  post,
  path = "/api/validate-proxy",
  request_body = ValidateProxyRequest,
  responses((status = 200, description = "Structured validation result", body = ValidateProxyResponse)),
  tag = "utility"
)]
async fn validate_proxy(Json(request): Json<ValidateProxyRequest>) -> Json<ValidateProxyResponse> {
  let validation = proxy::validate_proxy_url(&request.proxy);
  let sanitized_url = validation
    .valid
    .then(|| proxy::sanitize_proxy_url(&request.proxy));
  Json(ValidateProxyResponse {
    valid: validation.valid,
    errors: validation.errors,
    warnings: validation.warnings,
    sanitized_url,
  })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScreenSizesResponse {
  pub common_sizes: Vec<ScreenSize>,
  pub description: String,
}

#[utoipa::path(
  get,
  path = "/api/screen-sizes",
  responses((status = 200, description = "Default screen size suggestions", body = ScreenSizesResponse)),
  tag = "utility"
)]
async fn get_screen_sizes() -> Json<ScreenSizesResponse> {
  Json(ScreenSizesResponse {
    common_sizes: screen::default_screen_sizes(),
    description: "Common screen resolutions with realistic usage weights".to_string(),
  })
}

#[utoipa::path(
  get,
  path = "/api/host-info",
  responses((status = 200, description = "Host system information", body = HostInfo)),
  tag = "utility"
)]
async fn get_host_info() -> Json<HostInfo> {
  Json(host_os::host_info())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
  pub status: String,
  pub total_profiles: usize,
  pub active_browsers: usize,
  pub host_os: String,
  pub encryption_available: bool,
}

#[utoipa::path(
  get,
  path = "/health",
  responses((status = 200, description = "Service health", body = HealthResponse)),
  tag = "utility"
)]
async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
  Json(HealthResponse {
    status: "healthy".to_string(),
    total_profiles: state.profiles.list().await.len(),
    active_browsers: state.profiles.sessions().active_count().await,
    host_os: state.profiles.host_os().to_string(),
    encryption_available: state.profiles.vault().is_available(),
  })
}
