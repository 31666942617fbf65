/// Analytics endpoints
///
/// Read-only aggregations over the whole users collection. Each handler
/// takes one snapshot of the collection and hands it to the matching
/// function in [`roster_shared::analytics`].
///
/// # Endpoints
///
/// - `GET /analytics/department-stats`
/// - `GET /analytics/salary-ranges`
/// - `GET /analytics/role-summary`
/// - `GET /analytics/active-users-trend?days=N` (default 30)
/// - `GET /analytics/department-age-distribution`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;
use roster_shared::{
    analytics::{
        self, AgeDistribution, DailyRegistrations, DepartmentStats, RoleSummary, SalaryRange,
        DEFAULT_TREND_DAYS,
    },
    models::user::User,
};
use serde::Deserialize;

/// Query parameters for the registration trend
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    /// Lookback window in days
    pub days: Option<u32>,
}

async fn snapshot(state: &AppState) -> ApiResult<Vec<User>> {
    Ok(state.stores.users.list_users().await?)
}

/// Average salary, head count and average age per department
pub async fn department_stats(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DepartmentStats>>> {
    let users = snapshot(&state).await?;
    Ok(Json(analytics::department_stats(&users)))
}

/// Users bucketed by salary
///
/// Buckets are reported by lower bound; salaries of 200000 and above fall in
/// the `"200000+"` bucket.
pub async fn salary_ranges(State(state): State<AppState>) -> ApiResult<Json<Vec<SalaryRange>>> {
    let users = snapshot(&state).await?;
    Ok(Json(analytics::salary_ranges(&users)))
}

/// Count, average age, departments and average salary per role
pub async fn role_summary(State(state): State<AppState>) -> ApiResult<Json<Vec<RoleSummary>>> {
    let users = snapshot(&state).await?;
    Ok(Json(analytics::role_summary(&users)))
}

/// Active registrations per day over the last `days` days
///
/// # Errors
///
/// - `400 Bad Request`: `days` is not a non-negative integer
pub async fn active_users_trend(
    State(state): State<AppState>,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<DailyRegistrations>>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);

    let users = snapshot(&state).await?;
    let trend = analytics::active_users_trend(&users, days, Utc::now());

    tracing::debug!(days, rows = trend.len(), "Computed active users trend");

    Ok(Json(trend))
}

/// Age spread per department
pub async fn department_age_distribution(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AgeDistribution>>> {
    let users = snapshot(&state).await?;
    Ok(Json(analytics::department_age_distribution(&users)))
}
