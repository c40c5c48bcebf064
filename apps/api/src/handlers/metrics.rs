use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use bizdesk_application::AuthContext;
use bizdesk_domain::{CreateDashboardMetricInput, UpdateDashboardMetricInput};

use crate::dto::{
    CreateDashboardMetricRequest, DashboardMetricResponse, DashboardMetricsListQuery,
    UpdateDashboardMetricRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_metrics_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<DashboardMetricsListQuery>,
) -> ApiResult<Json<Vec<DashboardMetricResponse>>> {
    let metrics = state
        .dashboard_metric_service
        .list_metrics(&context, &query.into())
        .await?
        .into_iter()
        .map(DashboardMetricResponse::from)
        .collect();

    Ok(Json(metrics))
}

pub async fn get_metric_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(metric_id): Path<String>,
) -> ApiResult<Json<DashboardMetricResponse>> {
    let metric = state
        .dashboard_metric_service
        .get_metric(&context, metric_id.as_str())
        .await?;

    Ok(Json(DashboardMetricResponse::from(metric)))
}

pub async fn create_metric_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(payload): Json<CreateDashboardMetricRequest>,
) -> ApiResult<(StatusCode, Json<DashboardMetricResponse>)> {
    let input = CreateDashboardMetricInput::from(payload);
    let metric = state
        .dashboard_metric_service
        .create_metric(&context, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(DashboardMetricResponse::from(metric))))
}

pub async fn update_metric_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(metric_id): Path<String>,
    Json(payload): Json<UpdateDashboardMetricRequest>,
) -> ApiResult<Json<DashboardMetricResponse>> {
    let input = UpdateDashboardMetricInput::from(payload);
    let metric = state
        .dashboard_metric_service
        .update_metric(&context, metric_id.as_str(), &input)
        .await?;

    Ok(Json(DashboardMetricResponse::from(metric)))
}

pub async fn delete_metric_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(metric_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .dashboard_metric_service
        .delete_metric(&context, metric_id.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
