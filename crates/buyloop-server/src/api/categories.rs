use axum::{extract::State, Extension, Json};
use buyloop_core::available_categories;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<String>>> {
    let data = available_categories(state.store.read().await.businesses());

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}
