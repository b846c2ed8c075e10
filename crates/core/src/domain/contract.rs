use crate::domain::snapshot::{
    Allocation, ClientProfile, FamilyMember, InsuranceSnapshot, InvestmentSnapshot,
};
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

/// Investment inputs in one of two explicit shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum InvestmentInput {
    Snapshot(InvestmentSnapshot),
    Profile {
        profile: ClientProfile,
        #[serde(default)]
        allocation: Allocation,
    },
}

/// Insurance inputs in one of two explicit shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum InsuranceInput {
    Snapshot(InsuranceSnapshot),
    Profile {
        profile: ClientProfile,
        #[serde(default)]
        family: Vec<FamilyMember>,
    },
}

impl InvestmentInput {
    pub fn to_snapshot(&self) -> Cow<'_, InvestmentSnapshot> {
        match self {
            InvestmentInput::Snapshot(s) => Cow::Borrowed(s),
            InvestmentInput::Profile {
                profile,
                allocation,
            } => Cow::Owned(profile.investment_snapshot(allocation.clone())),
        }
    }

    pub fn into_snapshot(self) -> InvestmentSnapshot {
        match self {
            InvestmentInput::Snapshot(s) => s,
            InvestmentInput::Profile {
                profile,
                allocation,
            } => profile.investment_snapshot(allocation),
        }
    }
}

impl InsuranceInput {
    pub fn to_snapshot(&self) -> InsuranceSnapshot {
        match self {
            InsuranceInput::Snapshot(s) => *s,
            InsuranceInput::Profile { profile, family } => profile.insurance_snapshot(family),
        }
    }

    pub fn into_snapshot(self) -> InsuranceSnapshot {
        match self {
            InsuranceInput::Snapshot(s) => s,
            InsuranceInput::Profile { profile, family } => profile.insurance_snapshot(&family),
        }
    }
}

/// One row of the asset-allocation view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationRow {
    pub category: String,
    pub value: Option<f64>,
    pub share: Option<f64>,
}

impl AllocationRow {
    fn amount(&self) -> f64 {
        self.value
            .filter(|v| *v != 0.0)
            .or(self.share)
            .unwrap_or(0.0)
    }
}

/// Folds view rows into an allocation map keyed by lower-cased category.
/// Blank categories are skipped; a repeated category keeps the last row.
pub fn allocation_from_rows(rows: &[AllocationRow]) -> Allocation {
    let mut out = Allocation::new();
    for row in rows {
        let key = row.category.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        out.insert(key, row.amount());
    }
    out
}

/// Document accepted by the evaluate surfaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub investment: Option<InvestmentInput>,
    #[serde(default)]
    pub insurance: Option<InsuranceInput>,
}

impl AdvisoryRequest {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.investment.is_some() || self.insurance.is_some(),
            "advisory request must carry an investment or insurance input"
        );
        Ok(())
    }
}
