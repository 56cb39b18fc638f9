//! Aggregate complaint statistics for the admin dashboard

use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::domain::complaint::{ComplaintCategory, ComplaintFilter, ComplaintPriority, ComplaintStatus};
use crate::domain::repositories::RepositoryProvider;
use crate::shared::DomainResult;

/// Number of calendar months in the trend series, current month included
pub const TREND_MONTHS: u32 = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overview {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
    pub urgent: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct ComplaintAnalytics {
    pub overview: Overview,
    /// Every category, zero when absent
    pub by_category: Vec<(ComplaintCategory, u64)>,
    /// Every priority, zero when absent
    pub by_priority: Vec<(ComplaintPriority, u64)>,
    /// Oldest month first
    pub monthly_trend: Vec<MonthlyCount>,
}

pub struct AnalyticsService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AnalyticsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn summary(&self) -> DomainResult<ComplaintAnalytics> {
        let complaints = self.repos.complaints();
        let count_status = move |status| complaints.count(ComplaintFilter::all().with_status(status));

        let overview = Overview {
            total: complaints.count(ComplaintFilter::all()).await?,
            open: count_status(ComplaintStatus::Open).await?,
            in_progress: count_status(ComplaintStatus::InProgress).await?,
            resolved: count_status(ComplaintStatus::Resolved).await?,
            closed: count_status(ComplaintStatus::Closed).await?,
            urgent: complaints
                .count(ComplaintFilter::all().with_priority(ComplaintPriority::Urgent))
                .await?,
        };

        let by_category = fill(&ComplaintCategory::ALL, complaints.count_by_category().await?);
        let by_priority = fill(&ComplaintPriority::ALL, complaints.count_by_priority().await?);

        let now = Utc::now();
        let stamps = complaints.created_since(trend_start(now)).await?;

        Ok(ComplaintAnalytics {
            overview,
            by_category,
            by_priority,
            monthly_trend: monthly_buckets(now, &stamps),
        })
    }
}

/// Report every variant in declaration order, defaulting missing ones to zero
fn fill<T: Copy + PartialEq>(all: &[T], counts: Vec<(T, u64)>) -> Vec<(T, u64)> {
    all.iter()
        .map(|variant| {
            let count = counts
                .iter()
                .find(|(v, _)| v == variant)
                .map_or(0, |(_, n)| *n);
            (*variant, count)
        })
        .collect()
}

/// (year, month) stepped back `months` calendar months
fn months_back(year: i32, month: u32, months: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - months as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Midnight UTC on the first day of the oldest trend month
pub fn trend_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = months_back(now.year(), now.month(), TREND_MONTHS - 1);
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Bucket creation timestamps into the trailing months ending at `now`.
/// Months with no complaints are reported as zero.
pub fn monthly_buckets(now: DateTime<Utc>, stamps: &[DateTime<Utc>]) -> Vec<MonthlyCount> {
    let mut buckets: Vec<MonthlyCount> = (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = months_back(now.year(), now.month(), back);
            MonthlyCount {
                year,
                month,
                count: 0,
            }
        })
        .collect();

    for stamp in stamps {
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.year == stamp.year() && b.month == stamp.month())
        {
            bucket.count += 1;
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn months_back_wraps_years() {
        assert_eq!(months_back(2024, 3, 0), (2024, 3));
        assert_eq!(months_back(2024, 3, 3), (2023, 12));
        assert_eq!(months_back(2024, 1, 11), (2023, 2));
        assert_eq!(months_back(2024, 12, 24), (2022, 12));
    }

    #[test]
    fn trend_starts_on_the_first_of_the_oldest_month() {
        assert_eq!(
            trend_start(at(2024, 3, 15)),
            Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn buckets_are_ascending_and_zero_filled() {
        let now = at(2024, 3, 15);
        let stamps = [at(2024, 3, 1), at(2024, 3, 2), at(2023, 4, 30), at(2022, 1, 1)];
        let buckets = monthly_buckets(now, &stamps);

        assert_eq!(buckets.len(), TREND_MONTHS as usize);
        assert_eq!((buckets[0].year, buckets[0].month), (2023, 4));
        assert_eq!((buckets[11].year, buckets[11].month), (2024, 3));
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[11].count, 2);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 3);
    }

    #[test]
    fn fill_reports_every_variant() {
        let filled = fill(
            &ComplaintPriority::ALL,
            vec![(ComplaintPriority::Urgent, 4)],
        );
        assert_eq!(
            filled,
            vec![
                (ComplaintPriority::Low, 0),
                (ComplaintPriority::Medium, 0),
                (ComplaintPriority::High, 0),
                (ComplaintPriority::Urgent, 4),
            ]
        );
    }

    #[tokio::test]
    async fn summary_counts_statuses_and_urgency() {
        use crate::application::complaints::{ComplaintDraft, ComplaintService};
        use crate::application::events::create_event_bus;
        use crate::domain::user::{CreateUserDto, UserRole};
        use crate::test_support::test_repositories;

        let repos = test_repositories().await;
        let customer = repos
            .users()
            .create_user(CreateUserDto {
                name: "Alice".into(),
                email: "alice@example.com".into(),
                password_hash: "hash".into(),
                role: UserRole::Customer,
            })
            .await
            .unwrap()
            .actor();
        let admin = crate::domain::user::Actor::new("admin", UserRole::Admin);

        let complaints = ComplaintService::new(repos.clone(), create_event_bus());
        for priority in [ComplaintPriority::Urgent, ComplaintPriority::Low, ComplaintPriority::Urgent] {
            let c = complaints
                .create(
                    &customer,
                    ComplaintDraft {
                        title: "t".into(),
                        description: "d".into(),
                        category: Some(ComplaintCategory::Billing),
                        priority: Some(priority),
                    },
                )
                .await
                .unwrap();
            if priority == ComplaintPriority::Low {
                complaints
                    .update_status(&admin, &c.id, ComplaintStatus::Resolved, None)
                    .await
                    .unwrap();
            }
        }

        let stats = AnalyticsService::new(repos).summary().await.unwrap();
        assert_eq!(
            stats.overview,
            Overview {
                total: 3,
                open: 2,
                in_progress: 0,
                resolved: 1,
                closed: 0,
                urgent: 2,
            }
        );
        assert!(stats.by_category.contains(&(ComplaintCategory::Billing, 3)));
        assert!(stats.by_category.contains(&(ComplaintCategory::General, 0)));
        assert_eq!(stats.monthly_trend.last().unwrap().count, 3);
    }
}
