use crate::api::api_error::APIError;
use crate::api::model::{SetTxtRequest, SetTxtResult};
use crate::api::server::AppState;
use crate::error::Error;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route("/set-txt", post(set_txt))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.api_timeout))
        .with_state(state)
}

async fn set_txt(
    State(state): State<AppState>,
    WithRejection(body, _): WithRejection<Bytes, APIError>,
) -> Result<Json<SetTxtResult>, APIError> {
    // The body is JSON whatever the request's content type claims.
    let payload: SetTxtRequest = serde_json::from_slice(&body).map_err(Error::from)?;
    let host = state
        .txt_store
        .write()
        .await
        .add_txt(&payload.host, payload.value.clone())
        .await
        .map_err(|err| {
            tracing::debug!("rejected TXT record for \"{}\": {err}", payload.host);
            err
        })?;
    tracing::info!("added TXT record for {host} containing \"{}\"", payload.value);
    Ok(Json(SetTxtResult {
        host,
        value: payload.value,
    }))
}
