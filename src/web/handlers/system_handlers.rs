// src/web/handlers/system_handlers.rs
use crate::web::types::{
    ApiResult, AppState, DataResponse, PortfolioCount, StandardErrorResponse, TextResponse,
};

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn health_handler(state: &State<AppState>) -> ApiResult<TextResponse> {
    info!("Health check ({} active sessions)", state.sessions.len());
    match state.portfolio.health_check().await {
        Ok(()) => Ok(Json(TextResponse::success("OK".to_string()))),
        Err(e) => {
            error!("Portfolio store health check failed: {:#}", e);
            Err(StandardErrorResponse::new(
                "Portfolio store unavailable".to_string(),
                "STORE_UNAVAILABLE".to_string(),
                vec!["Check the store path is readable and writable".to_string()],
            )
            .with_status(Status::ServiceUnavailable))
        }
    }
}

pub async fn portfolio_count_handler(state: &State<AppState>) -> ApiResult<DataResponse<PortfolioCount>> {
    match state.portfolio.count().await {
        Ok(count) => Ok(Json(DataResponse::success(
            format!("Portfolio holds {} entries", count),
            PortfolioCount { count },
        ))),
        Err(e) => {
            error!("Failed to count portfolio entries: {:#}", e);
            Err(StandardErrorResponse::new(
                "Portfolio store unavailable".to_string(),
                "PORTFOLIO_ERROR".to_string(),
                vec!["Check the store path is writable".to_string()],
            )
            .with_status(Status::InternalServerError))
        }
    }
}
