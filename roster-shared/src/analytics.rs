/// Analytics pipelines over the user collection
///
/// Each view is an independent pure function from a snapshot of the users
/// collection to a result sequence. They mirror document-store aggregation
/// pipelines: group by a key, accumulate, project, sort.
///
/// | View | Group key | Output |
/// |------|-----------|--------|
/// | [`department_stats`] | department | average salary, member count, average age |
/// | [`salary_ranges`] | salary bucket | count and member names |
/// | [`role_summary`] | role | count, average age, departments, total/count salary |
/// | [`active_users_trend`] | creation day | active registrations per day |
/// | [`department_age_distribution`] | department | min/max/average age and all ages |
///
/// # Conventions
///
/// - Absent optional fields are skipped by averages, minima and maxima, like
///   `$avg`/`$min`/`$max` skip missing values. An average over no values is
///   `None`.
/// - Averages are rounded half-to-even at the stated precision, matching the
///   `$round` stage.
/// - Users without a department form their own `None` group, listed first.
///
/// # Example
///
/// ```
/// use roster_shared::analytics::round_to;
///
/// assert_eq!(round_to(150.0, 2), 150.0);
/// assert_eq!(round_to(26.666_666, 1), 26.7);
/// ```

use crate::models::user::{User, UserRole};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Lower bounds of the salary buckets; the last value closes the last bucket
pub const SALARY_BOUNDARIES: [u64; 6] = [0, 30_000, 50_000, 75_000, 100_000, 200_000];

/// Label of the bucket catching salaries at or above the last boundary
pub const OVERFLOW_BUCKET: &str = "200000+";

/// Lookback window of the active-users trend when none is given
pub const DEFAULT_TREND_DAYS: u32 = 30;

/// Rounds half-to-even at `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

fn average<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

fn group_by_department(users: &[User]) -> BTreeMap<Option<&str>, Vec<&User>> {
    let mut groups: BTreeMap<Option<&str>, Vec<&User>> = BTreeMap::new();
    for user in users {
        groups
            .entry(user.department.as_deref())
            .or_default()
            .push(user);
    }
    groups
}

/// One row of [`department_stats`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStats {
    pub department: Option<String>,
    pub avg_salary: Option<f64>,
    pub employee_count: u64,
    pub avg_age: Option<f64>,
}

/// Groups users by department: average salary (2 dp), count, average age (1 dp)
pub fn department_stats(users: &[User]) -> Vec<DepartmentStats> {
    group_by_department(users)
        .into_iter()
        .map(|(department, members)| DepartmentStats {
            department: department.map(str::to_string),
            avg_salary: average(members.iter().filter_map(|u| u.salary)).map(|v| round_to(v, 2)),
            employee_count: members.len() as u64,
            avg_age: average(members.iter().filter_map(|u| u.age.map(f64::from)))
                .map(|v| round_to(v, 1)),
        })
        .collect()
}

/// Salary bucket key
///
/// Serializes as the bucket's lower bound, or as `"200000+"` for overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SalaryBucket {
    /// `[lower, next boundary)`
    From(u64),
    /// At or above the last boundary
    Overflow,
}

impl SalaryBucket {
    /// Finds the bucket of a salary
    ///
    /// Values outside `[0, 200000)` land in the overflow bucket.
    pub fn for_salary(salary: f64) -> Self {
        SALARY_BOUNDARIES
            .windows(2)
            .find(|w| salary >= w[0] as f64 && salary < w[1] as f64)
            .map_or(SalaryBucket::Overflow, |w| SalaryBucket::From(w[0]))
    }
}

impl Serialize for SalaryBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SalaryBucket::From(lower) => serializer.serialize_u64(*lower),
            SalaryBucket::Overflow => serializer.serialize_str(OVERFLOW_BUCKET),
        }
    }
}

/// One row of [`salary_ranges`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryRange {
    pub bucket: SalaryBucket,
    pub count: u64,
    pub users: Vec<String>,
}

/// Buckets users by salary
///
/// Only non-empty buckets are reported, ascending, overflow last. Users
/// without a salary are not bucketed.
pub fn salary_ranges(users: &[User]) -> Vec<SalaryRange> {
    let mut buckets: BTreeMap<SalaryBucket, Vec<String>> = BTreeMap::new();
    for user in users {
        if let Some(salary) = user.salary {
            buckets
                .entry(SalaryBucket::for_salary(salary))
                .or_default()
                .push(user.name.clone());
        }
    }

    buckets
        .into_iter()
        .map(|(bucket, users)| SalaryRange {
            bucket,
            count: users.len() as u64,
            users,
        })
        .collect()
}

/// One row of [`role_summary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleSummary {
    pub role: UserRole,
    pub count: u64,
    pub avg_age: Option<f64>,
    pub departments: Vec<String>,
    pub avg_salary: f64,
}

/// Groups users by role
///
/// `avg_salary` is `sum(salary) / count` over every member of the role:
/// members without a salary add nothing to the sum but still count.
pub fn role_summary(users: &[User]) -> Vec<RoleSummary> {
    let mut groups: BTreeMap<UserRole, Vec<&User>> = BTreeMap::new();
    for user in users {
        groups.entry(user.role).or_default().push(user);
    }

    groups
        .into_iter()
        .map(|(role, members)| {
            let count = members.len() as u64;
            let total_salary: f64 = members.iter().filter_map(|u| u.salary).sum();
            let departments: BTreeSet<&str> = members
                .iter()
                .filter_map(|u| u.department.as_deref())
                .collect();

            RoleSummary {
                role,
                count,
                avg_age: average(members.iter().filter_map(|u| u.age.map(f64::from)))
                    .map(|v| round_to(v, 1)),
                departments: departments.into_iter().map(str::to_string).collect(),
                avg_salary: round_to(total_salary / count as f64, 2),
            }
        })
        .collect()
}

/// One row of [`active_users_trend`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRegistrations {
    /// UTC calendar day, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub count: u64,
}

/// Counts active users created in the last `days` days, per UTC day
///
/// Sorted ascending by date. Empty when nobody registered in the window.
/// A window reaching past the earliest representable instant covers all time.
pub fn active_users_trend(users: &[User], days: u32, now: DateTime<Utc>) -> Vec<DailyRegistrations> {
    let since = now
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for user in users.iter().filter(|u| u.is_active && u.created_at >= since) {
        *per_day.entry(user.created_at.date_naive()).or_default() += 1;
    }

    per_day
        .into_iter()
        .map(|(date, count)| DailyRegistrations { date, count })
        .collect()
}

/// One row of [`department_age_distribution`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeDistribution {
    pub department: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub avg_age: Option<f64>,
    pub ages: Vec<i32>,
}

/// Groups users by department: min, max and average age (1 dp) plus every age
pub fn department_age_distribution(users: &[User]) -> Vec<AgeDistribution> {
    group_by_department(users)
        .into_iter()
        .map(|(department, members)| {
            let ages: Vec<i32> = members.iter().filter_map(|u| u.age).collect();

            AgeDistribution {
                department: department.map(str::to_string),
                min_age: ages.iter().copied().min(),
                max_age: ages.iter().copied().max(),
                avg_age: average(ages.iter().map(|&a| f64::from(a))).map(|v| round_to(v, 1)),
                ages,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use uuid::Uuid;

    fn user(name: &str, department: Option<&str>, salary: Option<f64>, age: Option<i32>) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            age,
            role: UserRole::User,
            salary,
            department: department.map(str::to_string),
            created_at: Utc::now(),
            is_active: true,
        }
    }

    #[test]
    fn test_round_to_half_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(25.0, 1), 25.0);
        assert_eq!(round_to(1.0 / 3.0, 2), 0.33);
    }

    #[test]
    fn test_department_stats_averages() {
        let users = vec![
            user("Ann", Some("Eng"), Some(100.0), Some(20)),
            user("Bob", Some("Eng"), Some(200.0), Some(30)),
        ];

        let stats = department_stats(&users);
        assert_eq!(
            stats,
            vec![DepartmentStats {
                department: Some("Eng".to_string()),
                avg_salary: Some(150.0),
                employee_count: 2,
                avg_age: Some(25.0),
            }]
        );
    }

    #[test]
    fn test_department_stats_skips_missing_values() {
        let users = vec![
            user("Ann", Some("Ops"), Some(90_000.0), None),
            user("Bob", Some("Ops"), None, Some(41)),
            user("Cid", None, None, None),
        ];

        let stats = department_stats(&users);
        assert_eq!(stats.len(), 2);

        // Users without a department come first
        assert_eq!(stats[0].department, None);
        assert_eq!(stats[0].avg_salary, None);
        assert_eq!(stats[0].avg_age, None);

        assert_eq!(stats[1].employee_count, 2);
        assert_eq!(stats[1].avg_salary, Some(90_000.0));
        assert_eq!(stats[1].avg_age, Some(41.0));
    }

    #[test]
    fn test_salary_bucket_boundaries() {
        assert_eq!(SalaryBucket::for_salary(0.0), SalaryBucket::From(0));
        assert_eq!(SalaryBucket::for_salary(29_999.99), SalaryBucket::From(0));
        assert_eq!(SalaryBucket::for_salary(30_000.0), SalaryBucket::From(30_000));
        assert_eq!(SalaryBucket::for_salary(199_999.0), SalaryBucket::From(100_000));
        assert_eq!(SalaryBucket::for_salary(200_000.0), SalaryBucket::Overflow);
        assert_eq!(SalaryBucket::for_salary(250_000.0), SalaryBucket::Overflow);
    }

    #[test]
    fn test_salary_ranges_overflow_and_order() {
        let users = vec![
            user("Rich", Some("Exec"), Some(250_000.0), Some(50)),
            user("Mid", Some("Eng"), Some(60_000.0), Some(30)),
            user("Low", Some("Eng"), Some(10_000.0), Some(22)),
            user("Low2", Some("Ops"), Some(20_000.0), Some(23)),
            user("None", Some("Ops"), None, Some(23)),
        ];

        let ranges = salary_ranges(&users);
        let buckets: Vec<_> = ranges.iter().map(|r| r.bucket).collect();
        assert_eq!(
            buckets,
            vec![
                SalaryBucket::From(0),
                SalaryBucket::From(50_000),
                SalaryBucket::Overflow
            ]
        );

        assert_eq!(ranges[0].count, 2);
        assert_eq!(ranges[0].users, vec!["Low", "Low2"]);
        assert_eq!(ranges[2].users, vec!["Rich"]);

        let value = serde_json::to_value(&ranges).unwrap();
        assert_eq!(value[0]["bucket"], json!(0));
        assert_eq!(value[2]["bucket"], json!("200000+"));
    }

    #[test]
    fn test_role_summary_divides_total_by_count() {
        let mut admin = user("Ann", Some("Eng"), Some(100.0), Some(40));
        admin.role = UserRole::Admin;
        let users = vec![
            admin,
            user("Bob", Some("Eng"), Some(100.0), Some(20)),
            user("Cid", Some("Ops"), None, Some(25)),
            user("Dee", Some("Eng"), Some(101.0), None),
        ];

        let summary = role_summary(&users);
        assert_eq!(summary.len(), 2);

        assert_eq!(summary[0].role, UserRole::Admin);
        assert_eq!(summary[0].count, 1);
        assert_eq!(summary[0].avg_salary, 100.0);

        let regular = &summary[1];
        assert_eq!(regular.role, UserRole::User);
        assert_eq!(regular.count, 3);
        // (100 + 101) / 3, Cid counts without a salary
        assert_eq!(regular.avg_salary, 67.0);
        assert_eq!(regular.avg_age, Some(22.5));
        assert_eq!(regular.departments, vec!["Eng", "Ops"]);
    }

    #[test]
    fn test_active_users_trend_groups_by_day() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap();

        let mut users = Vec::new();
        for (day, hour, active) in [(30, 9, true), (30, 18, true), (2, 10, true), (29, 8, false)] {
            let mut u = user("U", None, None, None);
            u.created_at = at(day, hour);
            u.is_active = active;
            users.push(u);
        }
        // Outside the 30 day window
        let mut old = user("Old", None, None, None);
        old.created_at = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        users.push(old);

        let trend = active_users_trend(&users, 30, now);
        assert_eq!(
            trend,
            vec![
                DailyRegistrations {
                    date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                    count: 1
                },
                DailyRegistrations {
                    date: NaiveDate::from_ymd_opt(2025, 3, 30).unwrap(),
                    count: 2
                },
            ]
        );

        let value = serde_json::to_value(&trend).unwrap();
        assert_eq!(value[0]["date"], json!("2025-03-02"));
    }

    #[test]
    fn test_active_users_trend_empty_window() {
        let now = Utc::now();
        let mut old = user("Old", None, None, None);
        old.created_at = now - Duration::days(45);

        assert!(active_users_trend(&[old], DEFAULT_TREND_DAYS, now).is_empty());
        assert!(active_users_trend(&[], DEFAULT_TREND_DAYS, now).is_empty());
    }

    #[test]
    fn test_active_users_trend_window_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();

        let mut at_now = user("Now", None, None, None);
        at_now.created_at = now;
        let mut earlier = user("Earlier", None, None, None);
        earlier.created_at = now - Duration::seconds(1);
        let mut ancient = user("Ancient", None, None, None);
        ancient.created_at = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        let users = vec![at_now, earlier, ancient];

        // Zero days keeps only registrations at or after `now`
        let today = active_users_trend(&users, 0, now);
        assert_eq!(
            today,
            vec![DailyRegistrations {
                date: now.date_naive(),
                count: 1
            }]
        );

        // Window wider than the calendar range covers everyone
        let all_time = active_users_trend(&users, u32::MAX, now);
        let total: u64 = all_time.iter().map(|d| d.count).sum();
        assert_eq!(total, 3);
        assert_eq!(all_time[0].date, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }

    #[test]
    fn test_department_age_distribution() {
        let users = vec![
            user("Ann", Some("Eng"), None, Some(20)),
            user("Bob", Some("Eng"), None, Some(31)),
            user("Cid", Some("Eng"), None, None),
            user("Dee", Some("Eng"), None, Some(25)),
        ];

        let distribution = department_age_distribution(&users);
        assert_eq!(distribution.len(), 1);

        let eng = &distribution[0];
        assert_eq!(eng.min_age, Some(20));
        assert_eq!(eng.max_age, Some(31));
        assert_eq!(eng.avg_age, Some(25.3));
        assert_eq!(eng.ages.len(), 3);
    }
}
