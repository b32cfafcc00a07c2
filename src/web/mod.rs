// src/web/mod.rs

pub mod handlers;
pub mod sessions;
pub mod types;

pub use sessions::SessionRegistry;
pub use types::*;

use crate::core::ConfigManager;
use crate::pipeline::{EmailGenerator, EmailPipeline};
use crate::session::{FormFields, SubmitSource};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, put, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[get("/health")]
pub async fn health(state: &State<AppState>) -> ApiResult<TextResponse> {
    handlers::health_handler(state).await
}

#[post("/sessions")]
pub async fn create_session(state: &State<AppState>) -> Json<DataResponse<SessionView>> {
    handlers::create_session_handler(state).await
}

#[get("/sessions/<id>")]
pub async fn get_session(id: &str, state: &State<AppState>) -> ApiResult<DataResponse<SessionView>> {
    handlers::get_session_handler(id, state).await
}

#[delete("/sessions/<id>")]
pub async fn delete_session(id: &str, state: &State<AppState>) -> ApiResult<ActionResponse> {
    handlers::delete_session_handler(id, state).await
}

#[put("/sessions/<id>/form", data = "<form>")]
pub async fn update_form(
    id: &str,
    form: Json<FormFields>,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    handlers::update_form_handler(id, form, state).await
}

#[post("/sessions/<id>/generate/url")]
pub async fn generate_from_url(
    id: &str,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    handlers::generate_handler(id, SubmitSource::Url, state).await
}

#[post("/sessions/<id>/generate/manual")]
pub async fn generate_from_manual(
    id: &str,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    handlers::generate_handler(id, SubmitSource::Manual, state).await
}

#[post("/sessions/<id>/reset")]
pub async fn reset_session(id: &str, state: &State<AppState>) -> ApiResult<DataResponse<SessionView>> {
    handlers::reset_handler(id, state).await
}

#[post("/sessions/<id>/regenerate")]
pub async fn regenerate(id: &str, state: &State<AppState>) -> ApiResult<DataResponse<SessionView>> {
    handlers::regenerate_handler(id, state).await
}

#[put("/sessions/<id>/draft", data = "<request>")]
pub async fn edit_draft(
    id: &str,
    request: Json<EditDraftRequest>,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    handlers::edit_draft_handler(id, request, state).await
}

#[get("/sessions/<id>/download")]
pub async fn download_draft(
    id: &str,
    state: &State<AppState>,
) -> Result<TextFileResponse, ApiError> {
    handlers::download_handler(id, state).await
}

#[get("/portfolio/count")]
pub async fn portfolio_count(state: &State<AppState>) -> ApiResult<DataResponse<PortfolioCount>> {
    handlers::portfolio_count_handler(state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be parsed".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Verify field names and types".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the API around an already-built state.
pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                health,
                create_session,
                get_session,
                delete_session,
                update_form,
                generate_from_url,
                generate_from_manual,
                reset_session,
                regenerate,
                edit_draft,
                download_draft,
                portfolio_count,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: &ConfigManager, port: u16) -> Result<()> {
    config.ensure_directories().await?;

    let pipeline = EmailPipeline::from_config(config).await?;
    let store = pipeline.portfolio().store().clone();
    let generator: Arc<dyn EmailGenerator> = Arc::new(pipeline);

    info!("Starting cold mail API server on port {}", port);
    info!("Portfolio store: {}", config.environment.store_path.display());
    info!("Portfolio source: {}", config.environment.portfolio_csv.display());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    let state = AppState::new(generator, store).with_session_ttl(Duration::from_secs(
        config.environment.session_ttl_seconds,
    ));

    let _rocket = build_rocket(state)
        .configure(figment)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}
