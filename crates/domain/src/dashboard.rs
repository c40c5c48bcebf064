use bizdesk_core::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One period of marketing and sales funnel metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetricRecord {
    /// Record identifier.
    pub id: String,
    /// Owner of the metrics.
    pub user_id: String,
    /// Period label, usually the first day of the period.
    pub period: String,
    /// Money invested in the period.
    pub investment: f64,
    /// Visitors reached.
    pub visitors: u64,
    /// Conversations handled by the bot.
    pub bot_conversations: u64,
    /// Conversations handled by people.
    pub human_conversations: u64,
    /// Proposals sent.
    pub proposals: u64,
    /// Deals closed.
    pub closed_deals: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a metric record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDashboardMetricInput {
    /// Owner of the metrics.
    pub user_id: String,
    /// Period label.
    pub period: String,
    /// Money invested in the period.
    pub investment: f64,
    /// Visitors reached.
    pub visitors: u64,
    /// Conversations handled by the bot.
    pub bot_conversations: u64,
    /// Conversations handled by people.
    pub human_conversations: u64,
    /// Proposals sent.
    pub proposals: u64,
    /// Deals closed.
    pub closed_deals: u64,
}

impl CreateDashboardMetricInput {
    /// Checks field invariants.
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("user_id", &self.user_id)?;
        require_non_empty("period", &self.period)?;
        validate_investment(self.investment)
    }
}

/// Partial update of a metric record; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDashboardMetricInput {
    /// Owner of the metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Period label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// Money invested in the period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment: Option<f64>,
    /// Visitors reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitors: Option<u64>,
    /// Conversations handled by the bot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_conversations: Option<u64>,
    /// Conversations handled by people.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_conversations: Option<u64>,
    /// Proposals sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposals: Option<u64>,
    /// Deals closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_deals: Option<u64>,
}

impl UpdateDashboardMetricInput {
    /// Checks field invariants; an update must change at least one field.
    pub fn validate(&self) -> AppResult<()> {
        if self.is_empty() {
            return Err(AppError::Validation(
                "metric update must change at least one field".to_owned(),
            ));
        }

        if let Some(user_id) = &self.user_id {
            require_non_empty("user_id", user_id)?;
        }
        if let Some(period) = &self.period {
            require_non_empty("period", period)?;
        }
        if let Some(investment) = self.investment {
            validate_investment(investment)?;
        }

        Ok(())
    }

    /// Returns whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the set fields to a record.
    pub fn apply_to(&self, record: &mut DashboardMetricRecord) {
        if let Some(user_id) = &self.user_id {
            record.user_id.clone_from(user_id);
        }
        if let Some(period) = &self.period {
            record.period.clone_from(period);
        }
        if let Some(investment) = self.investment {
            record.investment = investment;
        }
        if let Some(visitors) = self.visitors {
            record.visitors = visitors;
        }
        if let Some(value) = self.bot_conversations {
            record.bot_conversations = value;
        }
        if let Some(value) = self.human_conversations {
            record.human_conversations = value;
        }
        if let Some(proposals) = self.proposals {
            record.proposals = proposals;
        }
        if let Some(closed_deals) = self.closed_deals {
            record.closed_deals = closed_deals;
        }
    }
}

/// Filters for listing metric records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetricsListParams {
    /// Calendar year, or the ISO week-numbering year when `week` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Month of year, 1 to 12.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    /// ISO week of year, 1 to 53.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    /// Inclusive lower bound of the period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound of the period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl DashboardMetricsListParams {
    /// Checks filter ranges.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(AppError::Validation(format!(
                    "month must be between 1 and 12, got {month}"
                )));
            }
        }

        if let Some(week) = self.week {
            if !(1..=53).contains(&week) {
                return Err(AppError::Validation(format!(
                    "week must be between 1 and 53, got {week}"
                )));
            }
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AppError::Validation(format!(
                    "start_date {start} must not be after end_date {end}"
                )));
            }
        }

        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }

    Ok(())
}

fn validate_investment(investment: f64) -> AppResult<()> {
    if !investment.is_finite() || investment < 0.0 {
        return Err(AppError::Validation(format!(
            "investment must be a finite non-negative amount, got {investment}"
        )));
    }

    Ok(())
}
