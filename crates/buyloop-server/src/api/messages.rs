use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use buyloop_core::Message;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SendMessageBody {
    pub text: String,
}

pub(super) async fn list_messages(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let store = state.store.read().await;
    if store.business(&id).is_none() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("business {id} not found"),
        ));
    }
    let data = store.messages(&id).to_vec();
    drop(store);

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn send_message(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageBody>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), ApiError> {
    let message = state
        .store
        .write()
        .await
        .send_message(&id, &body.text)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: message,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
