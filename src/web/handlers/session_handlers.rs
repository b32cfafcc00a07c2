// src/web/handlers/session_handlers.rs
use crate::session::{FormFields, Notice, NoticeKind, Session, SubmitSource, Transition};
use crate::web::types::{
    ActionResponse, ApiError, ApiResult, AppState, DataResponse, EditDraftRequest,
    SessionView, StandardErrorResponse, TextFileResponse,
};

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

fn session_not_found(id: &str) -> ApiError {
    StandardErrorResponse::new(
        format!("Session '{}' not found", id),
        "SESSION_NOT_FOUND".to_string(),
        vec!["Create a new session with POST /api/sessions".to_string()],
    )
    .with_status(Status::NotFound)
}

fn notice_error(notice: Notice) -> ApiError {
    let (status, code, suggestions) = match notice.kind {
        NoticeKind::Validation => (
            Status::UnprocessableEntity,
            "VALIDATION_ERROR",
            vec!["Fill in your name and job title, then try again".to_string()],
        ),
        NoticeKind::Rejected => (
            Status::Conflict,
            "NO_DRAFT",
            vec!["Generate an email first".to_string()],
        ),
        NoticeKind::Error | NoticeKind::Success => (
            Status::BadGateway,
            "GENERATION_ERROR",
            vec![
                "Check that the job URL is reachable".to_string(),
                "Try again in a few moments".to_string(),
            ],
        ),
    };

    StandardErrorResponse::new(notice.message, code.to_string(), suggestions).with_status(status)
}

/// Successful transitions come back as the session view; failure notices as errors.
fn respond(
    id: &str,
    session: &Session,
    notice: Option<Notice>,
    message: &str,
) -> ApiResult<DataResponse<SessionView>> {
    match notice {
        Some(notice) if notice.kind != NoticeKind::Success => Err(notice_error(notice)),
        notice => {
            let message = notice
                .as_ref()
                .map(|n| n.message.clone())
                .unwrap_or_else(|| message.to_string());
            Ok(Json(DataResponse::success(
                message,
                SessionView::new(id, session, notice),
            )))
        }
    }
}

async fn apply<F>(
    state: &State<AppState>,
    id: &str,
    message: &str,
    transition: F,
) -> ApiResult<DataResponse<SessionView>>
where
    F: FnOnce(Session) -> Transition,
{
    let shared = state.sessions.get(id).ok_or_else(|| session_not_found(id))?;
    let mut guard = shared.lock().await;

    let Transition { session, notice } = transition(std::mem::take(&mut *guard));
    *guard = session;

    respond(id, &guard, notice, message)
}

pub async fn create_session_handler(state: &State<AppState>) -> Json<DataResponse<SessionView>> {
    let (id, shared) = state.sessions.create();
    let session = shared.lock().await;
    info!("Created session {} ({} active)", id, state.sessions.len());

    Json(DataResponse::success(
        "Session created".to_string(),
        SessionView::new(&id.to_string(), &session, None),
    ))
}

pub async fn get_session_handler(
    id: &str,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    let shared = state.sessions.get(id).ok_or_else(|| session_not_found(id))?;
    let session = shared.lock().await;
    respond(id, &session, None, "Session loaded")
}

pub async fn delete_session_handler(
    id: &str,
    state: &State<AppState>,
) -> ApiResult<ActionResponse> {
    if !state.sessions.remove(id) {
        return Err(session_not_found(id));
    }
    info!("Deleted session {}", id);
    Ok(Json(ActionResponse::success(
        format!("Session '{}' deleted", id),
        "deleted".to_string(),
    )))
}

pub async fn update_form_handler(
    id: &str,
    form: Json<FormFields>,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    let form = form.into_inner();
    apply(state, id, "Form updated", move |session| session.update_form(form)).await
}

pub async fn generate_handler(
    id: &str,
    source: SubmitSource,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    let shared = state.sessions.get(id).ok_or_else(|| session_not_found(id))?;

    // Held across the pipeline run so one session's transitions stay ordered.
    let mut guard = shared.lock().await;
    let current = std::mem::take(&mut *guard);

    info!("Session {} generating from {:?} input", id, source);
    let Transition { session, notice } = current.submit(source, state.generator.as_ref()).await;
    *guard = session;

    if let Some(notice) = notice.as_ref().filter(|n| n.kind != NoticeKind::Success) {
        warn!("Session {} generation did not complete: {}", id, notice.message);
    }

    respond(id, &guard, notice, "Email generated")
}

pub async fn reset_handler(
    id: &str,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    apply(state, id, "All fields reset", Session::reset).await
}

pub async fn regenerate_handler(
    id: &str,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    apply(state, id, "Draft cleared, ready to generate again", Session::regenerate).await
}

pub async fn edit_draft_handler(
    id: &str,
    request: Json<EditDraftRequest>,
    state: &State<AppState>,
) -> ApiResult<DataResponse<SessionView>> {
    let text = request.into_inner().text;
    apply(state, id, "Draft updated", move |session| session.edit_draft(text)).await
}

pub async fn download_handler(
    id: &str,
    state: &State<AppState>,
) -> Result<TextFileResponse, ApiError> {
    let shared = state.sessions.get(id).ok_or_else(|| session_not_found(id))?;
    let session = shared.lock().await;

    match session.download() {
        Some(download) => Ok(TextFileResponse {
            content: download.content,
            filename: download.file_name.to_string(),
        }),
        None => Err(notice_error(Notice {
            kind: NoticeKind::Rejected,
            message: "There is no draft to download yet".to_string(),
        })),
    }
}
