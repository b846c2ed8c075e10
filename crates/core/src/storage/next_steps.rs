use crate::domain::recommendation::{Recommendation, RecommendationCategory, RecommendationId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const PENDING: &str = "pending";

/// Follow-up item created from a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextStep {
    pub user_id: Uuid,
    pub recommendation_id: RecommendationId,
    pub title: String,
    pub description: String,
    pub category: RecommendationCategory,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
}

impl NextStep {
    pub fn from_recommendation(
        user_id: Uuid,
        rec: &Recommendation,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            recommendation_id: rec.id,
            title: rec.title.clone(),
            description: rec.rationale.clone(),
            category: rec.id.category(),
            status: PENDING,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn carries_title_and_rationale() {
        let user_id = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let rec = Recommendation::for_id(RecommendationId::TermGap);

        let step = NextStep::from_recommendation(user_id, &rec, at);
        assert_eq!(step.user_id, user_id);
        assert_eq!(step.title, "Term Cover Gap");
        assert_eq!(step.description, rec.rationale);
        assert_eq!(step.category, RecommendationCategory::Insurance);
        assert_eq!(step.status, "pending");
        assert_eq!(step.created_at, at);
    }
}
