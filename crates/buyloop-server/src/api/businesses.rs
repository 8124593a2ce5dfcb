use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use buyloop_core::{
    filter_with_distance, format_distance, Business, Coordinates, FilterSpec, NewBusiness,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta, SearchDefaults};

#[derive(Debug, Default, Deserialize)]
pub(super) struct BusinessSearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub distance_km: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl BusinessSearchQuery {
    /// Fill gaps from the server defaults and reject unusable origins.
    fn into_spec(self, defaults: SearchDefaults) -> Result<FilterSpec, String> {
        let reference_point = Coordinates::new(
            self.lat.unwrap_or(defaults.reference_point.lat),
            self.lng.unwrap_or(defaults.reference_point.lng),
        );
        if !reference_point.is_valid() {
            return Err(format!(
                "lat/lng [{}, {}] is not a valid coordinate pair",
                reference_point.lat, reference_point.lng
            ));
        }

        let distance_km = self.distance_km.unwrap_or(defaults.distance_km);
        if !distance_km.is_finite() {
            return Err("distance_km must be a finite number".to_string());
        }

        Ok(FilterSpec::around(reference_point)
            .with_text(self.q.unwrap_or_default())
            .with_category(self.category.unwrap_or_default())
            .within_km(distance_km))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct BusinessListItem {
    #[serde(flatten)]
    pub business: Business,
    pub distance_km: Option<f64>,
    pub distance_label: Option<String>,
}

pub(super) async fn list_businesses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<BusinessSearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<BusinessListItem>>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;
    let spec = query
        .into_spec(state.defaults)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let store = state.store.read().await;
    let data: Vec<BusinessListItem> = filter_with_distance(store.businesses(), &spec)
        .into_iter()
        .map(|ranked| BusinessListItem {
            business: ranked.business.clone(),
            distance_km: ranked.distance_km,
            distance_label: ranked.distance_km.map(format_distance),
        })
        .collect();
    drop(store);

    tracing::debug!(results = data.len(), active = spec.is_active(), "business search");

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Serialize)]
pub(super) struct BusinessDetail {
    #[serde(flatten)]
    pub business: Business,
    pub visits: u64,
}

/// Detail view; each fetch counts as a visit.
pub(super) async fn get_business(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BusinessDetail>>, ApiError> {
    let mut store = state.store.write().await;
    let business = store.business(&id).cloned().ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("business {id} not found"),
        )
    })?;
    let visits = store
        .record_visit(&id)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    drop(store);

    Ok(Json(ApiResponse {
        data: BusinessDetail { business, visits },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_business(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(new): Json<NewBusiness>,
) -> Result<(StatusCode, Json<ApiResponse<Business>>), ApiError> {
    let business = state
        .store
        .write()
        .await
        .add_business(new)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: business,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
