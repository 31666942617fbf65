/// Integration tests for the analytics endpoints
///
/// Users are seeded straight into the in-memory store so that creation
/// timestamps can be placed inside or outside the trend window.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{seeded_user, TestContext};
use roster_shared::models::user::UserRole;
use serde_json::json;

#[tokio::test]
async fn test_department_stats() {
    let now = Utc::now();
    let ctx = TestContext::with_users(vec![
        seeded_user("Ann", Some("Eng"), UserRole::User, Some(20), Some(100.0), now),
        seeded_user("Ben", Some("Eng"), UserRole::User, Some(30), Some(200.0), now),
        seeded_user("Cid", None, UserRole::Guest, None, None, now),
    ]);

    let (status, body) = ctx.get("/analytics/department-stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "department": null,
                "avg_salary": null,
                "employee_count": 1,
                "avg_age": null
            },
            {
                "department": "Eng",
                "avg_salary": 150.0,
                "employee_count": 2,
                "avg_age": 25.0
            }
        ])
    );
}

#[tokio::test]
async fn test_salary_ranges() {
    let now = Utc::now();
    let ctx = TestContext::with_users(vec![
        seeded_user("Low", Some("Ops"), UserRole::User, None, Some(10_000.0), now),
        seeded_user("Mid", Some("Ops"), UserRole::User, None, Some(60_000.0), now),
        seeded_user("Edge", Some("Ops"), UserRole::User, None, Some(75_000.0), now),
        seeded_user("Top", Some("Ops"), UserRole::Admin, None, Some(250_000.0), now),
        seeded_user("Unpaid", Some("Ops"), UserRole::Guest, None, None, now),
    ]);

    let (status, body) = ctx.get("/analytics/salary-ranges").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "bucket": 0, "count": 1, "users": ["Low"] },
            { "bucket": 50000, "count": 1, "users": ["Mid"] },
            { "bucket": 75000, "count": 1, "users": ["Edge"] },
            { "bucket": "200000+", "count": 1, "users": ["Top"] }
        ])
    );
}

#[tokio::test]
async fn test_role_summary() {
    let now = Utc::now();
    let ctx = TestContext::with_users(vec![
        seeded_user("A", Some("Eng"), UserRole::Admin, Some(40), Some(100_000.0), now),
        seeded_user("B", Some("Sales"), UserRole::Admin, Some(30), None, now),
        seeded_user("C", Some("Eng"), UserRole::User, Some(25), Some(50_000.0), now),
    ]);

    let (status, body) = ctx.get("/analytics/role-summary").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["role"], "admin");
    assert_eq!(rows[0]["count"], 2);
    assert_eq!(rows[0]["avg_age"], 35.0);
    assert_eq!(rows[0]["departments"], json!(["Eng", "Sales"]));
    // Missing salary counts toward the denominator
    assert_eq!(rows[0]["avg_salary"], 50_000.0);

    assert_eq!(rows[1]["role"], "user");
    assert_eq!(rows[1]["avg_salary"], 50_000.0);
}

#[tokio::test]
async fn test_active_users_trend() {
    let now = Utc::now();
    let mut inactive = seeded_user("Gone", None, UserRole::User, None, None, now);
    inactive.is_active = false;

    let ctx = TestContext::with_users(vec![
        seeded_user("Today1", None, UserRole::User, None, None, now),
        seeded_user("Today2", None, UserRole::User, None, None, now),
        seeded_user("Recent", None, UserRole::User, None, None, now - Duration::days(3)),
        seeded_user("Old", None, UserRole::User, None, None, now - Duration::days(45)),
        inactive,
    ]);

    let (status, body) = ctx.get("/analytics/active-users-trend").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0]["date"],
        (now - Duration::days(3)).date_naive().to_string()
    );
    assert_eq!(rows[0]["count"], 1);
    assert_eq!(rows[1]["date"], now.date_naive().to_string());
    assert_eq!(rows[1]["count"], 2);

    let (_, body) = ctx.get("/analytics/active-users-trend?days=60").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_active_users_trend_empty_window() {
    let long_ago = Utc::now() - Duration::days(90);
    let ctx = TestContext::with_users(vec![seeded_user(
        "Old",
        Some("Eng"),
        UserRole::User,
        None,
        None,
        long_ago,
    )]);

    let (status, body) = ctx.get("/analytics/active-users-trend?days=30").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = ctx.get("/analytics/active-users-trend?days=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_active_users_trend_zero_days() {
    let now = Utc::now();
    let ctx = TestContext::with_users(vec![
        seeded_user("Earlier", None, UserRole::User, None, None, now - Duration::minutes(1)),
        seeded_user("Upcoming", None, UserRole::User, None, None, now + Duration::hours(1)),
    ]);

    let (status, body) = ctx.get("/analytics/active-users-trend?days=0").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["count"], 1);
    assert_eq!(
        rows[0]["date"],
        (now + Duration::hours(1)).date_naive().to_string()
    );
}

#[tokio::test]
async fn test_active_users_trend_widest_window() {
    let now = Utc::now();
    let ctx = TestContext::with_users(vec![
        seeded_user("Recent", None, UserRole::User, None, None, now),
        seeded_user("Decades", None, UserRole::User, None, None, now - Duration::days(20_000)),
    ]);

    for days in [u32::MAX.to_string(), "4000000000".to_string()] {
        let (status, body) = ctx
            .get(&format!("/analytics/active-users-trend?days={}", days))
            .await;
        assert_eq!(status, StatusCode::OK, "days={}", days);
        assert_eq!(body.as_array().unwrap().len(), 2, "days={}", days);
    }

    // One past the largest window is not a valid day count
    let (status, _) = ctx
        .get(&format!(
            "/analytics/active-users-trend?days={}",
            u64::from(u32::MAX) + 1
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_department_age_distribution() {
    let now = Utc::now();
    let ctx = TestContext::with_users(vec![
        seeded_user("A", Some("Eng"), UserRole::User, Some(22), None, now),
        seeded_user("B", Some("Eng"), UserRole::User, Some(41), None, now),
        seeded_user("C", Some("Eng"), UserRole::User, None, None, now),
        seeded_user("D", Some("Ops"), UserRole::User, Some(35), None, now),
    ]);

    let (status, body) = ctx.get("/analytics/department-age-distribution").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "department": "Eng",
                "min_age": 22,
                "max_age": 41,
                "avg_age": 31.5,
                "ages": [22, 41]
            },
            {
                "department": "Ops",
                "min_age": 35,
                "max_age": 35,
                "avg_age": 35.0,
                "ages": [35]
            }
        ])
    );
}

#[tokio::test]
async fn test_analytics_over_empty_collection() {
    let ctx = TestContext::new();

    for uri in [
        "/analytics/department-stats",
        "/analytics/salary-ranges",
        "/analytics/role-summary",
        "/analytics/active-users-trend",
        "/analytics/department-age-distribution",
    ] {
        let (status, body) = ctx.get(uri).await;
        assert_eq!(status, StatusCode::OK, "GET {}", uri);
        assert_eq!(body, json!([]), "GET {}", uri);
    }
}
