//! Derived views over the engagement store used by the client dashboard:
//! follow-up scheduling status, lead scoring, tag counts and the
//! interaction timeline.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::db::{Client, FollowUp, Interaction, InteractionType};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FollowUpStatus {
    Overdue,
    Today,
    ThisWeek,
    Upcoming,
}

impl FollowUpStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FollowUpStatus::Overdue => "Overdue",
            FollowUpStatus::Today => "Today",
            FollowUpStatus::ThisWeek => "This Week",
            FollowUpStatus::Upcoming => "Upcoming",
        }
    }
}

/// Classify a scheduled date relative to `now`.
///
/// The distance is rounded up to whole days: one hour ahead counts as day 1
/// (`ThisWeek`), one hour ago as day 0 (`Today`). Only dates at least a full
/// day in the past are `Overdue`.
pub fn follow_up_status(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> FollowUpStatus {
    let diff_ms = (scheduled - now).num_milliseconds();
    // ceil for signed integers
    let days = diff_ms.div_euclid(MILLIS_PER_DAY) + i64::from(diff_ms.rem_euclid(MILLIS_PER_DAY) != 0);

    if days < 0 {
        FollowUpStatus::Overdue
    } else if days == 0 {
        FollowUpStatus::Today
    } else if days <= 7 {
        FollowUpStatus::ThisWeek
    } else {
        FollowUpStatus::Upcoming
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpStats {
    pub overdue: usize,
    pub today: usize,
    pub this_week: usize,
    pub completed: usize,
}

/// Status counts across all follow-ups (completed ones included) plus the
/// number completed.
pub fn follow_up_stats(follow_ups: &[FollowUp], now: DateTime<Utc>) -> FollowUpStats {
    follow_ups.iter().fold(FollowUpStats::default(), |mut stats, f| {
        match follow_up_status(f.scheduled_date, now) {
            FollowUpStatus::Overdue => stats.overdue += 1,
            FollowUpStatus::Today => stats.today += 1,
            FollowUpStatus::ThisWeek => stats.this_week += 1,
            FollowUpStatus::Upcoming => {}
        }
        if f.completed {
            stats.completed += 1;
        }
        stats
    })
}

pub fn pending_follow_ups(follow_ups: &[FollowUp]) -> Vec<&FollowUp> {
    follow_ups.iter().filter(|f| !f.completed).collect()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ScoreLevel {
    High,
    Medium,
    Low,
}

pub fn score_level(score: i32) -> ScoreLevel {
    if score >= 80 {
        ScoreLevel::High
    } else if score >= 60 {
        ScoreLevel::Medium
    } else {
        ScoreLevel::Low
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreBucket {
    pub range: &'static str,
    pub count: usize,
    /// Share of all clients, 0-100
    pub percentage: f64,
}

/// Lead scores bucketed the way the scoring dashboard charts them
pub fn score_distribution(clients: &[Client]) -> Vec<ScoreBucket> {
    let buckets: [(&'static str, fn(i32) -> bool); 5] = [
        ("90-100", |s| s >= 90),
        ("80-89", |s| (80..90).contains(&s)),
        ("70-79", |s| (70..80).contains(&s)),
        ("60-69", |s| (60..70).contains(&s)),
        ("Below 60", |s| s < 60),
    ];
    let total = clients.len();

    buckets
        .into_iter()
        .map(|(range, in_bucket)| {
            let count = clients.iter().filter(|c| in_bucket(c.lead_score)).count();
            let percentage = if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            ScoreBucket {
                range,
                count,
                percentage,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagCount {
    /// Label shown on the dashboard
    pub label: &'static str,
    /// Tag value matched on clients
    pub tag: &'static str,
    pub count: usize,
}

/// Dashboard tag labels and the client tag each one counts
const TRACKED_TAGS: [(&str, &str); 5] = [
    ("VIP", "VIP"),
    ("Follow-Up Urgent", "Follow-up"),
    ("New Client", "Active"),
    ("Contract Renewal", "Contract Renewal"),
    ("Needs Attention", "Needs Attention"),
];

pub fn tag_counts(clients: &[Client]) -> Vec<TagCount> {
    TRACKED_TAGS
        .into_iter()
        .map(|(label, tag)| TagCount {
            label,
            tag,
            count: clients
                .iter()
                .filter(|c| c.tags.iter().any(|t| t == tag))
                .count(),
        })
        .collect()
}

/// Filters for the interaction timeline; `None` means "all".
#[derive(Debug, Clone, Default)]
pub struct TimelineFilter {
    pub client_id: Option<i32>,
    pub interaction_type: Option<InteractionType>,
    /// Only interactions from the last N days
    pub days: Option<i64>,
}

pub fn timeline(
    interactions: &[Interaction],
    filter: &TimelineFilter,
    now: DateTime<Utc>,
) -> Vec<Interaction> {
    // A window reaching past the representable range means no lower bound
    let since = filter
        .days
        .and_then(Duration::try_days)
        .and_then(|span| now.checked_sub_signed(span));
    let mut items: Vec<Interaction> = interactions
        .iter()
        .filter(|i| filter.client_id.map_or(true, |id| i.client_id == id))
        .filter(|i| {
            filter
                .interaction_type
                .map_or(true, |t| i.interaction_type == t)
        })
        .filter(|i| since.map_or(true, |s| i.created_at >= s))
        .cloned()
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::FollowUpChannel;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn follow_up(id: i32, scheduled: DateTime<Utc>, completed: bool) -> FollowUp {
        FollowUp {
            id,
            client_id: 1,
            channel: FollowUpChannel::Email,
            message: "ping".to_string(),
            scheduled_date: scheduled,
            completed,
            reminder: true,
            created_at: scheduled,
        }
    }

    fn client(id: i32, score: i32, tags: &[&str]) -> Client {
        Client {
            id,
            name: format!("Client {}", id),
            email: format!("c{}@x.com", id),
            company: None,
            lead_score: score,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: at("2024-01-01T00:00:00Z"),
        }
    }

    fn interaction(id: i32, client_id: i32, kind: InteractionType, created: &str) -> Interaction {
        Interaction {
            id,
            client_id,
            interaction_type: kind,
            title: format!("Interaction {}", id),
            description: None,
            duration: None,
            created_at: at(created),
        }
    }

    #[test]
    fn test_past_follow_up_is_overdue() {
        let now = at("2024-06-10T12:00:00Z");
        assert_eq!(
            follow_up_status(at("2024-06-08T12:00:00Z"), now),
            FollowUpStatus::Overdue
        );
        assert_eq!(
            follow_up_status(now - Duration::days(1), now),
            FollowUpStatus::Overdue
        );
    }

    #[test]
    fn test_status_boundaries() {
        let now = at("2024-06-10T12:00:00Z");
        assert_eq!(follow_up_status(now, now), FollowUpStatus::Today);
        assert_eq!(
            follow_up_status(now - Duration::hours(3), now),
            FollowUpStatus::Today
        );
        assert_eq!(
            follow_up_status(now + Duration::hours(1), now),
            FollowUpStatus::ThisWeek
        );
        assert_eq!(
            follow_up_status(now + Duration::days(3), now),
            FollowUpStatus::ThisWeek
        );
        assert_eq!(
            follow_up_status(now + Duration::days(7), now),
            FollowUpStatus::ThisWeek
        );
        assert_eq!(
            follow_up_status(now + Duration::days(8), now),
            FollowUpStatus::Upcoming
        );
    }

    #[test]
    fn test_follow_up_stats_and_pending() {
        let now = at("2024-06-10T12:00:00Z");
        let list = vec![
            follow_up(1, now - Duration::days(2), false),
            follow_up(2, now, false),
            follow_up(3, now + Duration::days(2), true),
            follow_up(4, now + Duration::days(30), false),
        ];

        let stats = follow_up_stats(&list, now);
        assert_eq!(
            stats,
            FollowUpStats {
                overdue: 1,
                today: 1,
                this_week: 1,
                completed: 1,
            }
        );

        let pending: Vec<i32> = pending_follow_ups(&list).iter().map(|f| f.id).collect();
        assert_eq!(pending, vec![1, 2, 4]);
    }

    #[test]
    fn test_score_levels() {
        assert_eq!(score_level(94), ScoreLevel::High);
        assert_eq!(score_level(80), ScoreLevel::High);
        assert_eq!(score_level(79), ScoreLevel::Medium);
        assert_eq!(score_level(60), ScoreLevel::Medium);
        assert_eq!(score_level(59), ScoreLevel::Low);
    }

    #[test]
    fn test_score_distribution() {
        let clients = vec![client(1, 94, &[]), client(2, 76, &[]), client(3, 58, &[]), client(4, 90, &[])];
        let dist = score_distribution(&clients);

        let counts: Vec<(&str, usize)> = dist.iter().map(|b| (b.range, b.count)).collect();
        assert_eq!(
            counts,
            vec![("90-100", 2), ("80-89", 0), ("70-79", 1), ("60-69", 0), ("Below 60", 1)]
        );
        assert_eq!(dist[0].percentage, 50.0);
        assert!(score_distribution(&[]).iter().all(|b| b.percentage == 0.0));
    }

    #[test]
    fn test_tag_counts_use_client_tags() {
        let clients = vec![
            client(1, 94, &["VIP", "Active"]),
            client(2, 76, &["Contract Renewal", "Follow-up"]),
            client(3, 58, &["Needs Attention", "Inactive"]),
        ];
        let counts = tag_counts(&clients);

        let by_label: Vec<(&str, usize)> = counts.iter().map(|t| (t.label, t.count)).collect();
        assert_eq!(
            by_label,
            vec![
                ("VIP", 1),
                ("Follow-Up Urgent", 1),
                ("New Client", 1),
                ("Contract Renewal", 1),
                ("Needs Attention", 1),
            ]
        );
    }

    #[test]
    fn test_timeline_filters_and_sorts() {
        let now = at("2024-06-30T00:00:00Z");
        let items = vec![
            interaction(1, 1, InteractionType::Email, "2024-06-01T00:00:00Z"),
            interaction(2, 2, InteractionType::Phone, "2024-06-20T00:00:00Z"),
            interaction(3, 1, InteractionType::Meeting, "2024-06-25T00:00:00Z"),
            interaction(4, 1, InteractionType::Email, "2024-04-01T00:00:00Z"),
        ];

        let all = timeline(&items, &TimelineFilter::default(), now);
        let ids: Vec<i32> = all.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);

        let filter = TimelineFilter {
            client_id: Some(1),
            interaction_type: None,
            days: Some(30),
        };
        let ids: Vec<i32> = timeline(&items, &filter, now).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1]);

        let filter = TimelineFilter {
            interaction_type: Some(InteractionType::Email),
            ..Default::default()
        };
        let ids: Vec<i32> = timeline(&items, &filter, now).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_timeline_window_beyond_range_is_unbounded() {
        let now = at("2024-06-30T00:00:00Z");
        let items = vec![
            interaction(1, 1, InteractionType::Email, "2024-06-01T00:00:00Z"),
            interaction(2, 1, InteractionType::Phone, "1990-01-01T00:00:00Z"),
        ];
        let filter = TimelineFilter {
            days: Some(i64::MAX),
            ..Default::default()
        };
        let ids: Vec<i32> = timeline(&items, &filter, now).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
