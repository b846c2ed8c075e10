use crate::domain::contract::{allocation_from_rows, AdvisoryRequest};
use crate::domain::recommendation::{Recommendation, RecommendationId};
use crate::rules::{self, RuleThresholds};
use crate::storage::next_steps::NextStep;
use crate::storage::ClientStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Both rule families evaluated for one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorySheet {
    pub client_id: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
    pub investment: Vec<Recommendation>,
    pub insurance: Vec<Recommendation>,
}

impl AdvisorySheet {
    pub fn evaluate(request: AdvisoryRequest, thresholds: &RuleThresholds) -> anyhow::Result<Self> {
        request.validate()?;

        let investment = request
            .investment
            .map(|input| rules::evaluate_investment(&input.into_snapshot(), thresholds))
            .unwrap_or_default();
        let insurance = request
            .insurance
            .map(|input| rules::evaluate_insurance(&input.into_snapshot(), thresholds))
            .unwrap_or_default();

        Ok(Self {
            client_id: request.client_id,
            generated_at: Utc::now(),
            investment,
            insurance,
        })
    }

    pub fn find(&self, id: RecommendationId) -> Option<&Recommendation> {
        self.investment
            .iter()
            .chain(self.insurance.iter())
            .find(|r| r.id == id)
    }

    pub fn recommendation_count(&self) -> usize {
        self.investment.len() + self.insurance.len()
    }
}

/// Evaluates a stored client. `None` when the client has no profile.
pub async fn advise_client(
    store: &dyn ClientStore,
    client_id: Uuid,
    thresholds: &RuleThresholds,
) -> anyhow::Result<Option<AdvisorySheet>> {
    let (profile, allocation_rows, family) = tokio::try_join!(
        store.fetch_profile(client_id),
        store.fetch_allocation(client_id),
        store.fetch_family(client_id),
    )?;

    let Some(profile) = profile else {
        tracing::debug!(%client_id, "no profile for client");
        return Ok(None);
    };

    let allocation = allocation_from_rows(&allocation_rows);
    let investment =
        rules::evaluate_investment(&profile.investment_snapshot(allocation), thresholds);
    let insurance = rules::evaluate_insurance(&profile.insurance_snapshot(&family), thresholds);

    tracing::info!(
        %client_id,
        investment_len = investment.len(),
        insurance_len = insurance.len(),
        family_len = family.len(),
        "client advised"
    );

    Ok(Some(AdvisorySheet {
        client_id: Some(client_id),
        generated_at: Utc::now(),
        investment,
        insurance,
    }))
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextStepOutcome {
    Created { next_step_id: Uuid, step: NextStep },
    /// Dry run: the step that would have been written.
    Planned(NextStep),
    ClientNotFound,
    /// The recommendation does not currently fire for this client.
    NotApplicable,
}

/// Re-evaluates the client and forwards one fired recommendation as a next step.
pub async fn forward_next_step(
    store: &dyn ClientStore,
    client_id: Uuid,
    recommendation_id: RecommendationId,
    thresholds: &RuleThresholds,
    dry_run: bool,
) -> anyhow::Result<NextStepOutcome> {
    let Some(sheet) = advise_client(store, client_id, thresholds).await? else {
        return Ok(NextStepOutcome::ClientNotFound);
    };
    let Some(rec) = sheet.find(recommendation_id) else {
        tracing::warn!(%client_id, %recommendation_id, "recommendation not applicable; skipping");
        return Ok(NextStepOutcome::NotApplicable);
    };

    let step = NextStep::from_recommendation(client_id, rec, Utc::now());
    if dry_run {
        return Ok(NextStepOutcome::Planned(step));
    }

    let next_step_id = store.insert_next_step(&step).await?;
    Ok(NextStepOutcome::Created { next_step_id, step })
}
