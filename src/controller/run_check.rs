use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use tracing::error;

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::tvl_check::run_tvl_check,
};

/// On-demand trigger. Responds with fixed short bodies only; internal error
/// detail stays in the logs.
#[get("/run-check")]
pub async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<Query>,
) -> Result<HttpResponse, Error> {
    if let Some(secret) = &state.config.trigger_secret {
        if query.key.as_deref() != Some(secret.as_str()) {
            return Ok(HttpResponse::Unauthorized().body("Unauthorized"));
        }
    }

    match run_tvl_check(&state).await {
        Ok(()) => Ok(HttpResponse::Ok().body("TVL check completed")),
        Err(e) => {
            error!("manual TVL check failed: {}", e);
            Ok(HttpResponse::InternalServerError().body("TVL check failed"))
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct Query {
    key: Option<String>,
}
