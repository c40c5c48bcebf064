use bizdesk_domain::{
    CreateDashboardMetricInput, DashboardMetricRecord, DashboardMetricsListParams,
    UpdateDashboardMetricInput,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a dashboard metric record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-metric-response.ts"
)]
pub struct DashboardMetricResponse {
    pub id: String,
    pub user_id: String,
    pub period: String,
    pub investment: f64,
    #[ts(type = "number")]
    pub visitors: u64,
    #[ts(type = "number")]
    pub bot_conversations: u64,
    #[ts(type = "number")]
    pub human_conversations: u64,
    #[ts(type = "number")]
    pub proposals: u64,
    #[ts(type = "number")]
    pub closed_deals: u64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl From<DashboardMetricRecord> for DashboardMetricResponse {
    fn from(record: DashboardMetricRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            period: record.period,
            investment: record.investment,
            visitors: record.visitors,
            bot_conversations: record.bot_conversations,
            human_conversations: record.human_conversations,
            proposals: record.proposals,
            closed_deals: record.closed_deals,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Incoming payload for metric creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-dashboard-metric-request.ts"
)]
pub struct CreateDashboardMetricRequest {
    pub user_id: String,
    pub period: String,
    pub investment: f64,
    #[ts(type = "number")]
    pub visitors: u64,
    #[ts(type = "number")]
    pub bot_conversations: u64,
    #[ts(type = "number")]
    pub human_conversations: u64,
    #[ts(type = "number")]
    pub proposals: u64,
    #[ts(type = "number")]
    pub closed_deals: u64,
}

impl From<CreateDashboardMetricRequest> for CreateDashboardMetricInput {
    fn from(request: CreateDashboardMetricRequest) -> Self {
        Self {
            user_id: request.user_id,
            period: request.period,
            investment: request.investment,
            visitors: request.visitors,
            bot_conversations: request.bot_conversations,
            human_conversations: request.human_conversations,
            proposals: request.proposals,
            closed_deals: request.closed_deals,
        }
    }
}

/// Incoming payload for a partial metric update.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-dashboard-metric-request.ts"
)]
pub struct UpdateDashboardMetricRequest {
    #[ts(optional)]
    pub user_id: Option<String>,
    #[ts(optional)]
    pub period: Option<String>,
    #[ts(optional)]
    pub investment: Option<f64>,
    #[ts(type = "number | null")]
    pub visitors: Option<u64>,
    #[ts(type = "number | null")]
    pub bot_conversations: Option<u64>,
    #[ts(type = "number | null")]
    pub human_conversations: Option<u64>,
    #[ts(type = "number | null")]
    pub proposals: Option<u64>,
    #[ts(type = "number | null")]
    pub closed_deals: Option<u64>,
}

impl From<UpdateDashboardMetricRequest> for UpdateDashboardMetricInput {
    fn from(request: UpdateDashboardMetricRequest) -> Self {
        Self {
            user_id: request.user_id,
            period: request.period,
            investment: request.investment,
            visitors: request.visitors,
            bot_conversations: request.bot_conversations,
            human_conversations: request.human_conversations,
            proposals: request.proposals,
            closed_deals: request.closed_deals,
        }
    }
}

/// Query string filters for metric listing.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-metrics-list-query.ts"
)]
pub struct DashboardMetricsListQuery {
    #[ts(optional)]
    pub year: Option<i32>,
    #[ts(optional)]
    pub month: Option<u32>,
    #[ts(optional)]
    pub week: Option<u32>,
    #[ts(type = "string | null")]
    pub start_date: Option<NaiveDate>,
    #[ts(type = "string | null")]
    pub end_date: Option<NaiveDate>,
}

impl From<DashboardMetricsListQuery> for DashboardMetricsListParams {
    fn from(query: DashboardMetricsListQuery) -> Self {
        Self {
            year: query.year,
            month: query.month,
            week: query.week,
            start_date: query.start_date,
            end_date: query.end_date,
        }
    }
}
