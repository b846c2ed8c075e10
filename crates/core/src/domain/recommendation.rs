use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationId {
    Efund,
    EquityBoost,
    TermGap,
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Investment,
    Insurance,
}

impl RecommendationId {
    pub const ALL: [RecommendationId; 4] = [
        RecommendationId::Efund,
        RecommendationId::EquityBoost,
        RecommendationId::TermGap,
        RecommendationId::Health,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationId::Efund => "efund",
            RecommendationId::EquityBoost => "equity_boost",
            RecommendationId::TermGap => "term_gap",
            RecommendationId::Health => "health",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    pub fn category(self) -> RecommendationCategory {
        match self {
            RecommendationId::Efund | RecommendationId::EquityBoost => {
                RecommendationCategory::Investment
            }
            RecommendationId::TermGap | RecommendationId::Health => {
                RecommendationCategory::Insurance
            }
        }
    }
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RecommendationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationCategory::Investment => "investment",
            RecommendationCategory::Insurance => "insurance",
        }
    }
}

/// A single advisory suggestion. Text fields are fixed per id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: RecommendationId,
    pub title: String,
    pub rationale: String,
    pub product: String,
    pub cta: String,
}

impl Recommendation {
    pub fn for_id(id: RecommendationId) -> Self {
        let (title, rationale, product, cta) = match id {
            RecommendationId::Efund => (
                "Build Emergency Fund",
                "Savings rate is good; top up liquid funds to reach 6 months.",
                "Liquid Funds",
                "Add Task",
            ),
            RecommendationId::EquityBoost => (
                "Increase Equity Allocation",
                "Long-term goals need equity; consider index funds or SIPs.",
                "Index Funds",
                "Create SIP",
            ),
            RecommendationId::TermGap => (
                "Term Cover Gap",
                "Term insurance less than recommended multiple of income.",
                "Term Insurance",
                "Add Task",
            ),
            RecommendationId::Health => (
                "Increase Health Cover",
                "Family size suggests higher health cover.",
                "Family Floater",
                "Add Task",
            ),
        };

        Self {
            id,
            title: title.to_string(),
            rationale: rationale.to_string(),
            product: product.to_string(),
            cta: cta.to_string(),
        }
    }
}
