//! Read-only dashboard endpoints derived from the engagement store.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::dashboard::{
    follow_up_stats, follow_up_status, pending_follow_ups, score_distribution, score_level,
    tag_counts, timeline, FollowUpStats, FollowUpStatus, ScoreBucket, ScoreLevel, TagCount,
    TimelineFilter,
};
use crate::db::{FollowUp, Interaction, InteractionType};
use crate::AppState;

use super::error::ApiError;

/// Longest timeline window accepted, about a century
const MAX_TIMELINE_DAYS: i64 = 36_500;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingFollowUp {
    #[serde(flatten)]
    pub follow_up: FollowUp,
    pub status: FollowUpStatus,
    pub status_label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FollowUpOverview {
    pub stats: FollowUpStats,
    pub pending: Vec<PendingFollowUp>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredClient {
    pub id: i32,
    pub name: String,
    pub company: Option<String>,
    pub lead_score: i32,
    pub level: ScoreLevel,
}

#[derive(Debug, Serialize)]
pub struct LeadScoring {
    pub clients: Vec<ScoredClient>,
    pub distribution: Vec<ScoreBucket>,
}

/// Raw timeline query; values are parsed by hand so a bad one gets the
/// standard error envelope. `all` or an empty value disables a filter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineQuery {
    pub client_id: Option<String>,
    #[serde(rename = "type")]
    pub interaction_type: Option<String>,
    pub days: Option<String>,
}

impl TimelineQuery {
    fn into_filter(self) -> Result<TimelineFilter, ApiError> {
        fn active(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        }
        let invalid = || ApiError::bad_request("Invalid timeline filter");

        let client_id = active(self.client_id)
            .map(|v| v.parse::<i32>().map_err(|_| invalid()))
            .transpose()?;
        let interaction_type = active(self.interaction_type)
            .map(|v| v.parse::<InteractionType>().map_err(|_| invalid()))
            .transpose()?;
        let days = active(self.days)
            .map(|v| {
                v.parse::<i64>()
                    .ok()
                    .filter(|d| (0..=MAX_TIMELINE_DAYS).contains(d))
                    .ok_or_else(invalid)
            })
            .transpose()?;

        Ok(TimelineFilter {
            client_id,
            interaction_type,
            days,
        })
    }
}

/// Follow-up counters plus every pending follow-up with its status
pub async fn follow_ups(State(state): State<Arc<AppState>>) -> Json<FollowUpOverview> {
    let all = state.storage.read().get_all_follow_ups();
    let now = Utc::now();

    let pending = pending_follow_ups(&all)
        .into_iter()
        .map(|f| {
            let status = follow_up_status(f.scheduled_date, now);
            PendingFollowUp {
                follow_up: f.clone(),
                status,
                status_label: status.label(),
            }
        })
        .collect();

    Json(FollowUpOverview {
        stats: follow_up_stats(&all, now),
        pending,
    })
}

/// Clients ranked by lead score, highest first
pub async fn lead_scoring(State(state): State<Arc<AppState>>) -> Json<LeadScoring> {
    let clients = state.storage.read().get_all_clients();

    let mut scored: Vec<ScoredClient> = clients
        .iter()
        .map(|c| ScoredClient {
            id: c.id,
            name: c.name.clone(),
            company: c.company.clone(),
            lead_score: c.lead_score,
            level: score_level(c.lead_score),
        })
        .collect();
    scored.sort_by(|a, b| b.lead_score.cmp(&a.lead_score).then(a.id.cmp(&b.id)));

    Json(LeadScoring {
        clients: scored,
        distribution: score_distribution(&clients),
    })
}

pub async fn tags(State(state): State<Arc<AppState>>) -> Json<Vec<TagCount>> {
    let clients = state.storage.read().get_all_clients();
    Json(tag_counts(&clients))
}

pub async fn interaction_timeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<Vec<Interaction>>, ApiError> {
    let filter = query.into_filter()?;
    let interactions = state.storage.read().get_all_interactions();
    Ok(Json(timeline(&interactions, &filter, Utc::now())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(client_id: Option<&str>, kind: Option<&str>, days: Option<&str>) -> TimelineQuery {
        TimelineQuery {
            client_id: client_id.map(String::from),
            interaction_type: kind.map(String::from),
            days: days.map(String::from),
        }
    }

    #[test]
    fn test_timeline_query_parses_filters() {
        let filter = query(Some("2"), Some("phone"), Some("30")).into_filter().unwrap();
        assert_eq!(filter.client_id, Some(2));
        assert_eq!(filter.interaction_type, Some(InteractionType::Phone));
        assert_eq!(filter.days, Some(30));
    }

    #[test]
    fn test_timeline_query_all_means_unfiltered() {
        let filter = query(Some("all"), Some(""), None).into_filter().unwrap();
        assert!(filter.client_id.is_none());
        assert!(filter.interaction_type.is_none());
        assert!(filter.days.is_none());
    }

    #[test]
    fn test_timeline_query_rejects_garbage() {
        assert!(query(Some("abc"), None, None).into_filter().is_err());
        assert!(query(None, Some("fax"), None).into_filter().is_err());
        assert!(query(None, None, Some("-1")).into_filter().is_err());
        assert!(query(None, None, Some("36501")).into_filter().is_err());
        assert!(query(None, None, Some("9999999999999")).into_filter().is_err());
        assert!(query(None, None, Some("36500")).into_filter().is_ok());
    }
}
