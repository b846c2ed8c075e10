//! Advisory rule engine.
//!
//! Two independent rule families, each a pure function of its snapshot. Within
//! a family the rules are checked in a fixed order and fired recommendations
//! are appended in that order.

pub mod thresholds;

use crate::domain::contract::{InsuranceInput, InvestmentInput};
use crate::domain::recommendation::{Recommendation, RecommendationId};
use crate::domain::snapshot::{
    Allocation, ClientProfile, FamilyMember, InsuranceSnapshot, InvestmentSnapshot,
};
pub use thresholds::RuleThresholds;

pub fn investment_recs(input: &InvestmentInput, thresholds: &RuleThresholds) -> Vec<Recommendation> {
    evaluate_investment(&input.to_snapshot(), thresholds)
}

pub fn insurance_recs(input: &InsuranceInput, thresholds: &RuleThresholds) -> Vec<Recommendation> {
    evaluate_insurance(&input.to_snapshot(), thresholds)
}

pub fn investment_recs_from_snapshot(snapshot: &InvestmentSnapshot) -> Vec<Recommendation> {
    evaluate_investment(snapshot, &RuleThresholds::default())
}

pub fn investment_recs_from_profile(
    profile: &ClientProfile,
    allocation: &Allocation,
) -> Vec<Recommendation> {
    let snapshot = profile.investment_snapshot(allocation.clone());
    evaluate_investment(&snapshot, &RuleThresholds::default())
}

pub fn insurance_recs_from_snapshot(snapshot: &InsuranceSnapshot) -> Vec<Recommendation> {
    evaluate_insurance(snapshot, &RuleThresholds::default())
}

pub fn insurance_recs_from_profile(
    profile: &ClientProfile,
    family: &[FamilyMember],
) -> Vec<Recommendation> {
    evaluate_insurance(&profile.insurance_snapshot(family), &RuleThresholds::default())
}

pub fn evaluate_investment(
    snapshot: &InvestmentSnapshot,
    thresholds: &RuleThresholds,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if snapshot.savings_rate > thresholds.min_savings_rate
        && snapshot.emergency_fund_months < thresholds.emergency_fund_months
    {
        recs.push(Recommendation::for_id(RecommendationId::Efund));
    }

    let equity_pct = snapshot.allocation.equity_pct();
    if equity_pct < thresholds.min_equity_pct {
        recs.push(Recommendation::for_id(RecommendationId::EquityBoost));
    }

    tracing::debug!(
        savings_rate = snapshot.savings_rate,
        emergency_fund_months = snapshot.emergency_fund_months,
        equity_pct,
        fired = recs.len(),
        "investment rules evaluated"
    );
    recs
}

pub fn evaluate_insurance(
    snapshot: &InsuranceSnapshot,
    thresholds: &RuleThresholds,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if snapshot.term_cover_multiple < thresholds.term_cover_multiple {
        recs.push(Recommendation::for_id(RecommendationId::TermGap));
    }

    let family_size = snapshot.effective_family_size();
    if snapshot.health_cover < thresholds.min_health_cover
        && family_size > f64::from(thresholds.large_family_size)
    {
        recs.push(Recommendation::for_id(RecommendationId::Health));
    }

    tracing::debug!(
        term_cover_multiple = snapshot.term_cover_multiple,
        health_cover = snapshot.health_cover,
        family_size,
        fired = recs.len(),
        "insurance rules evaluated"
    );
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inv(v: serde_json::Value) -> Vec<RecommendationId> {
        let snapshot: InvestmentSnapshot = serde_json::from_value(v).unwrap();
        investment_recs_from_snapshot(&snapshot)
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    fn ins(v: serde_json::Value) -> Vec<RecommendationId> {
        let snapshot: InsuranceSnapshot = serde_json::from_value(v).unwrap();
        insurance_recs_from_snapshot(&snapshot)
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn repeated_calls_are_identical() {
        let snapshot: InvestmentSnapshot = serde_json::from_value(json!({
            "savingsRate": 40, "emergencyFundMonths": 1, "allocation": {"equity": 10}
        }))
        .unwrap();
        let first = investment_recs_from_snapshot(&snapshot);
        let second = investment_recs_from_snapshot(&snapshot);
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![RecommendationId::Efund, RecommendationId::EquityBoost]
        );
    }

    #[test]
    fn efund_needs_rate_strictly_above_25() {
        let ids = inv(json!({"savingsRate": 26, "emergencyFundMonths": 5, "allocation": {"equity": 50}}));
        assert!(ids.contains(&RecommendationId::Efund));

        let ids = inv(json!({"savingsRate": 25, "emergencyFundMonths": 5, "allocation": {"equity": 50}}));
        assert!(!ids.contains(&RecommendationId::Efund));
    }

    #[test]
    fn efund_stops_at_six_months() {
        let ids = inv(json!({"savingsRate": 50, "emergencyFundMonths": 6, "allocation": {"equity": 50}}));
        assert!(ids.is_empty());
    }

    #[test]
    fn equity_boost_below_40_only() {
        let ids = inv(json!({"savingsRate": 10, "emergencyFundMonths": 12, "allocation": {"equity": 39}}));
        assert!(ids.contains(&RecommendationId::EquityBoost));

        let ids = inv(json!({"savingsRate": 10, "emergencyFundMonths": 12, "allocation": {"equity": 40}}));
        assert!(!ids.contains(&RecommendationId::EquityBoost));
    }

    #[test]
    fn recommends_emergency_fund_when_reserves_low() {
        let ids = inv(json!({"savingsRate": 30, "emergencyFundMonths": 3, "allocation": {"equity": 50}}));
        assert_eq!(ids, vec![RecommendationId::Efund]);
    }

    #[test]
    fn recommends_equity_boost_when_equity_low() {
        let ids = inv(json!({"savingsRate": 10, "emergencyFundMonths": 12, "allocation": {"equity": 20}}));
        assert_eq!(ids, vec![RecommendationId::EquityBoost]);
    }

    #[test]
    fn empty_insurance_snapshot_flags_term_gap_only() {
        assert_eq!(ins(json!({})), vec![RecommendationId::TermGap]);
    }

    #[test]
    fn empty_investment_snapshot_only_flags_equity() {
        // Savings rate defaults to 0, equity to 0.
        assert_eq!(inv(json!({})), vec![RecommendationId::EquityBoost]);
    }

    #[test]
    fn profile_shape_derives_multiple_and_family_size() {
        let profile: ClientProfile =
            serde_json::from_value(json!({"monthly_income": 100000, "term_cover": 500000})).unwrap();
        let family = vec![FamilyMember::default(); 4];

        let ids: Vec<_> = insurance_recs_from_profile(&profile, &family)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![RecommendationId::TermGap, RecommendationId::Health]);
    }

    #[test]
    fn well_covered_household_gets_nothing() {
        let ids = ins(json!({"termCoverMultiple": 12, "healthCover": 1500000, "familySize": 5}));
        assert!(ids.is_empty());

        let ids = ins(json!({"termCoverMultiple": 12, "healthCover": 500000, "familySize": 3}));
        assert!(ids.is_empty());
    }

    #[test]
    fn term_gap_stops_at_ten_times_income() {
        let ids = ins(json!({"termCoverMultiple": 10, "healthCover": 0, "familySize": 1}));
        assert!(!ids.contains(&RecommendationId::TermGap));

        let ids = ins(json!({"termCoverMultiple": 9.99, "healthCover": 0, "familySize": 1}));
        assert_eq!(ids, vec![RecommendationId::TermGap]);
    }

    #[test]
    fn health_stops_at_ten_lakh_cover() {
        let ids = ins(json!({"termCoverMultiple": 12, "healthCover": 1000000, "familySize": 4}));
        assert!(!ids.contains(&RecommendationId::Health));

        let ids = ins(json!({"termCoverMultiple": 12, "healthCover": 999999, "familySize": 4}));
        assert_eq!(ids, vec![RecommendationId::Health]);
    }

    #[test]
    fn null_fields_evaluate_as_defaults() {
        let ids = ins(json!({"termCoverMultiple": 12, "healthCover": null, "familySize": 5}));
        assert_eq!(ids, vec![RecommendationId::Health]);

        let ids = inv(json!({"savingsRate": 30, "emergencyFundMonths": null, "allocation": {"equity": null}}));
        assert_eq!(ids, vec![RecommendationId::Efund, RecommendationId::EquityBoost]);
    }

    #[test]
    fn missing_allocation_counts_as_zero_equity() {
        let ids = inv(json!({"savingsRate": 30, "emergencyFundMonths": 2}));
        assert_eq!(ids, vec![RecommendationId::Efund, RecommendationId::EquityBoost]);
    }

    #[test]
    fn profile_shape_investment_uses_separate_allocation() {
        let profile = ClientProfile {
            monthly_income: Some(100_000.0),
            monthly_expenses: Some(60_000.0),
            emergency_fund_months: Some(2.0),
            ..Default::default()
        };
        let allocation: Allocation = [("equity", 70.0)].into_iter().collect();

        let ids: Vec<_> = investment_recs_from_profile(&profile, &allocation)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![RecommendationId::Efund]);
    }

    #[test]
    fn tagged_inputs_honor_custom_thresholds() {
        let thresholds = RuleThresholds {
            emergency_fund_months: 3.0,
            term_cover_multiple: 15.0,
            ..Default::default()
        };

        let input: InvestmentInput = serde_json::from_value(json!({
            "shape": "snapshot", "savingsRate": 30, "emergencyFundMonths": 4, "allocation": {"equity": 60}
        }))
        .unwrap();
        assert!(investment_recs(&input, &thresholds).is_empty());

        let input: InsuranceInput = serde_json::from_value(json!({
            "shape": "snapshot", "termCoverMultiple": 12
        }))
        .unwrap();
        let recs = insurance_recs(&input, &thresholds);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, RecommendationId::TermGap);
    }
}
