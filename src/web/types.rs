// src/web/types.rs
use rocket::http::{ContentType, Status};
use rocket::response::{self, status, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::EmailGenerator;
use crate::portfolio::PortfolioStore;
use crate::session::{FormFields, Notice, Session, SessionPhase};
use crate::types::JobRecord;
use crate::web::sessions::SessionRegistry;

/// Shared state handed to every route.
pub struct AppState {
    pub generator: Arc<dyn EmailGenerator>,
    pub portfolio: Arc<dyn PortfolioStore>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(generator: Arc<dyn EmailGenerator>, portfolio: Arc<dyn PortfolioStore>) -> Self {
        Self {
            generator,
            portfolio,
            sessions: SessionRegistry::default(),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = SessionRegistry::new(ttl);
        self
    }
}

/// A plain-text attachment, e.g. the drafted email.
pub struct TextFileResponse {
    pub content: String,
    pub filename: String,
}

impl<'r> Responder<'r, 'static> for TextFileResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::Plain)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.content.len(), std::io::Cursor::new(self.content))
            .ok()
    }
}

pub type ApiError = status::Custom<Json<StandardErrorResponse>>;
pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct EditDraftRequest {
    pub text: String,
}

/// What clients see of a session: its form and phase, plus the notice raised
/// by the request that produced this view (none for plain reads).
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SessionView {
    pub id: String,
    pub state: &'static str,
    pub form: FormFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobRecord>,
    pub links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl SessionView {
    pub fn new(id: &str, session: &Session, notice: Option<Notice>) -> Self {
        let (state, job, links, draft) = match session.phase() {
            SessionPhase::Idle => ("idle", None, Vec::new(), None),
            SessionPhase::Drafted { job, links, draft } => (
                "drafted",
                Some(job.clone()),
                links.clone(),
                Some(draft.as_str().to_string()),
            ),
        };

        Self {
            id: id.to_string(),
            state,
            form: session.form().clone(),
            job,
            links,
            draft,
            notice,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct PortfolioCount {
    pub count: usize,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }

    /// Wrap in the given HTTP status.
    pub fn with_status(self, status: Status) -> ApiError {
        status::Custom(status, Json(self))
    }
}
