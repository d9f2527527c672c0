use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;

use crate::models::{AnalyticsSummary, ApplicationRecord, Priority, Status, TrendPoint};

/// Fold the record set into aggregate counts, rates, and the trailing
/// 30-day creation trend. Pure and order-independent.
pub fn summarize(records: &[ApplicationRecord]) -> AnalyticsSummary {
    summarize_at(records, Utc::now())
}

/// Like summarize() with an explicit "now" pinning the trend window.
pub fn summarize_at(records: &[ApplicationRecord], now: DateTime<Utc>) -> AnalyticsSummary {
    let total = records.len();

    let by_status: Vec<(Status, usize)> = Status::ALL
        .iter()
        .map(|&s| (s, records.iter().filter(|r| r.status == s).count()))
        .collect();

    let by_priority: Vec<(Priority, usize)> = Priority::ALL
        .iter()
        .map(|&p| (p, records.iter().filter(|r| r.priority == p).count()))
        .collect();

    // Response rate: of everything actually applied to, how much moved
    // beyond "applied".
    let applied_pool = records
        .iter()
        .filter(|r| {
            matches!(
                r.status,
                Status::Applied | Status::Interview | Status::Offer | Status::Rejected
            )
        })
        .count();
    let responded = records
        .iter()
        .filter(|r| matches!(r.status, Status::Interview | Status::Offer | Status::Rejected))
        .count();
    let response_rate = if applied_pool > 0 {
        responded as f64 / applied_pool as f64 * 100.0
    } else {
        0.0
    };

    let offers = records.iter().filter(|r| r.status == Status::Offer).count();
    let success_rate = if total > 0 {
        offers as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    // Average whole days from application to the last update, over records
    // where the employer has reacted.
    let eligible: Vec<&ApplicationRecord> = records
        .iter()
        .filter(|r| {
            r.applied_date.is_some() && !matches!(r.status, Status::Wishlist | Status::Applied)
        })
        .collect();
    let average_time_to_response = if eligible.is_empty() {
        0.0
    } else {
        let day_sum: i64 = eligible
            .iter()
            .map(|r| days_between(r.applied_date.as_deref(), &r.updated_at))
            .sum();
        day_sum as f64 / eligible.len() as f64
    };

    // Sparse per-day creation counts within the trailing 30 days; BTreeMap
    // keeps the buckets date-ascending.
    let window_start = now - Duration::days(30);
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let Ok(created) = DateTime::parse_from_rfc3339(&record.created_at) else {
            continue;
        };
        if created.with_timezone(&Utc) >= window_start {
            let day = created.with_timezone(&Local).format("%Y-%m-%d").to_string();
            *buckets.entry(day).or_insert(0) += 1;
        }
    }
    let trend = buckets
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect();

    AnalyticsSummary {
        total,
        by_status,
        by_priority,
        response_rate: round1(response_rate),
        success_rate: round1(success_rate),
        average_time_to_response: round1(average_time_to_response),
        trend,
    }
}

/// Calendar-day difference from an applied date (midnight) to an RFC 3339
/// timestamp, truncated to whole days. Unparseable inputs count as zero.
fn days_between(applied_date: Option<&str>, updated_at: &str) -> i64 {
    let Some(applied) = applied_date else { return 0 };
    let Ok(applied) = NaiveDate::parse_from_str(applied, "%Y-%m-%d") else {
        return 0;
    };
    let Ok(updated) = DateTime::parse_from_rfc3339(updated_at) else {
        return 0;
    };
    (updated.naive_utc() - applied.and_time(NaiveTime::MIN)).num_days()
}

/// Round to one decimal place, half away from zero.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SecondsFormat;

    fn record(id: &str, status: Status, priority: Priority) -> ApplicationRecord {
        ApplicationRecord {
            id: id.to_string(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            status,
            priority,
            applied_date: None,
            location: None,
            salary: None,
            job_type: None,
            description: None,
            notes: None,
            url: None,
            contact_email: None,
            contact_name: None,
            next_follow_up: None,
            created_at: "2020-01-01T00:00:00.000Z".to_string(),
            updated_at: "2020-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn empty_input_yields_zero_state() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        for status in Status::ALL {
            assert_eq!(summary.status_count(status), 0);
        }
        for priority in Priority::ALL {
            assert_eq!(summary.priority_count(priority), 0);
        }
        assert_eq!(summary.response_rate, 0.0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.average_time_to_response, 0.0);
        assert!(summary.trend.is_empty());
    }

    #[test]
    fn rates_for_one_of_each_applied_status() {
        let records = vec![
            record("a", Status::Applied, Priority::Low),
            record("b", Status::Interview, Priority::Medium),
            record("c", Status::Offer, Priority::High),
            record("d", Status::Rejected, Priority::Low),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.response_rate, 75.0);
        assert_eq!(summary.success_rate, 25.0);
        assert_eq!(summary.status_count(Status::Wishlist), 0);
        assert_eq!(summary.status_count(Status::Offer), 1);
        assert_eq!(summary.priority_count(Priority::Low), 2);
    }

    #[test]
    fn wishlist_stays_out_of_the_applied_pool() {
        let records = vec![
            record("a", Status::Wishlist, Priority::Low),
            record("b", Status::Applied, Priority::Low),
            record("c", Status::Interview, Priority::Low),
        ];
        let summary = summarize(&records);
        // pool = {applied, interview}, responded = {interview}
        assert_eq!(summary.response_rate, 50.0);
    }

    #[test]
    fn rates_round_half_away_from_zero() {
        // 1 responded of 16 applied: 6.25% -> 6.3
        let mut records = vec![record("r", Status::Interview, Priority::Low)];
        for i in 0..15 {
            records.push(record(&format!("a{i}"), Status::Applied, Priority::Low));
        }
        let summary = summarize(&records);
        assert_eq!(summary.response_rate, 6.3);

        // 1 offer of 3 total: 33.333...% -> 33.3
        let records = vec![
            record("a", Status::Offer, Priority::Low),
            record("b", Status::Applied, Priority::Low),
            record("c", Status::Applied, Priority::Low),
        ];
        assert_eq!(summarize(&records).success_rate, 33.3);
    }

    #[test]
    fn average_time_to_response_over_responded_records() {
        let mut a = record("a", Status::Interview, Priority::Low);
        a.applied_date = Some("2026-08-01".to_string());
        a.updated_at = "2026-08-11T12:00:00.000Z".to_string(); // 10.5 -> 10 days

        let mut b = record("b", Status::Rejected, Priority::Low);
        b.applied_date = Some("2026-08-01".to_string());
        b.updated_at = "2026-08-06T00:00:00.000Z".to_string(); // 5 days

        // Still waiting: excluded even with an applied date.
        let mut c = record("c", Status::Applied, Priority::Low);
        c.applied_date = Some("2026-08-01".to_string());
        c.updated_at = "2026-08-30T00:00:00.000Z".to_string();

        // No applied date: excluded.
        let d = record("d", Status::Offer, Priority::Low);

        let summary = summarize(&[a, b, c, d]);
        assert_eq!(summary.average_time_to_response, 7.5);
    }

    #[test]
    fn trend_buckets_recent_creations_by_day() {
        let now = Utc::now();
        let iso = |dt: DateTime<Utc>| dt.to_rfc3339_opts(SecondsFormat::Millis, true);
        let day = |dt: DateTime<Utc>| dt.with_timezone(&Local).format("%Y-%m-%d").to_string();

        let mut a = record("a", Status::Applied, Priority::Low);
        a.created_at = iso(now);
        let mut b = record("b", Status::Applied, Priority::Low);
        b.created_at = iso(now);
        let mut c = record("c", Status::Applied, Priority::Low);
        c.created_at = iso(now - Duration::days(3));
        // Outside the trailing 30 days: never bucketed.
        let mut d = record("d", Status::Applied, Priority::Low);
        d.created_at = iso(now - Duration::days(40));

        let summary = summarize_at(&[a, b, c, d], now);
        assert_eq!(summary.trend.len(), 2);
        assert_eq!(summary.trend[0].date, day(now - Duration::days(3)));
        assert_eq!(summary.trend[0].count, 1);
        assert_eq!(summary.trend[1].date, day(now));
        assert_eq!(summary.trend[1].count, 2);
    }

    #[test]
    fn unparseable_created_at_is_skipped_by_trend() {
        let mut a = record("a", Status::Applied, Priority::Low);
        a.created_at = "not a timestamp".to_string();
        let summary = summarize(&[a]);
        assert!(summary.trend.is_empty());
        assert_eq!(summary.total, 1);
    }

    #[test]
    fn round1_is_half_away_from_zero() {
        assert_eq!(round1(6.25), 6.3);
        assert_eq!(round1(33.333_333), 33.3);
        assert_eq!(round1(74.95), 75.0);
        assert_eq!(round1(0.0), 0.0);
    }
}
