use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// Cut-offs for every rule. Comparisons against them are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// `efund` needs a savings rate above this.
    pub min_savings_rate: f64,
    /// `efund` needs fewer reserve months than this.
    pub emergency_fund_months: f64,
    pub min_equity_pct: f64,
    /// Recommended term cover as a multiple of annual income.
    pub term_cover_multiple: f64,
    pub min_health_cover: f64,
    /// `health` needs a household larger than this.
    pub large_family_size: u32,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            min_savings_rate: 25.0,
            emergency_fund_months: 6.0,
            min_equity_pct: 40.0,
            term_cover_multiple: 10.0,
            min_health_cover: 1_000_000.0,
            large_family_size: 3,
        }
    }
}

impl RuleThresholds {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Some(v) = env_f64("ADVISOR_MIN_SAVINGS_RATE") {
            out.min_savings_rate = v;
        }
        if let Some(v) = env_f64("ADVISOR_EMERGENCY_MONTHS") {
            out.emergency_fund_months = v;
        }
        if let Some(v) = env_f64("ADVISOR_MIN_EQUITY_PCT") {
            out.min_equity_pct = v;
        }
        if let Some(v) = env_f64("ADVISOR_TERM_MULTIPLIER") {
            out.term_cover_multiple = v;
        }
        if let Some(v) = env_f64("ADVISOR_MIN_HEALTH_COVER") {
            out.min_health_cover = v;
        }
        if let Ok(s) = std::env::var("ADVISOR_LARGE_FAMILY_SIZE") {
            if let Ok(n) = s.trim().parse::<u32>() {
                out.large_family_size = n;
            }
        }

        out
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let checks = [
            ("min_savings_rate", self.min_savings_rate),
            ("emergency_fund_months", self.emergency_fund_months),
            ("min_equity_pct", self.min_equity_pct),
            ("term_cover_multiple", self.term_cover_multiple),
            ("min_health_cover", self.min_health_cover),
        ];
        for (name, value) in checks {
            ensure!(
                value.is_finite() && value >= 0.0,
                "threshold {name} must be a finite non-negative number (got {value})"
            );
        }
        Ok(())
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok()?.trim().parse::<f64>().ok()
}
