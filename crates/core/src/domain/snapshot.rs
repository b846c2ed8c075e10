use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Compact investment inputs, already derived by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestmentSnapshot {
    #[serde(deserialize_with = "null_as_zero")]
    pub savings_rate: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub emergency_fund_months: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub allocation: Allocation,
}

/// Compact insurance inputs, already derived by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceSnapshot {
    #[serde(deserialize_with = "null_as_zero")]
    pub term_cover_multiple: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub health_cover: f64,
    #[serde(deserialize_with = "null_as_one")]
    pub family_size: f64,
}

impl Default for InsuranceSnapshot {
    fn default() -> Self {
        Self {
            term_cover_multiple: 0.0,
            health_cover: 0.0,
            family_size: 1.0,
        }
    }
}

impl InsuranceSnapshot {
    /// A household is never smaller than one person.
    pub fn effective_family_size(&self) -> f64 {
        if self.family_size > 0.0 {
            self.family_size
        } else {
            1.0
        }
    }
}

fn null_as_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(0.0))
}

fn null_as_one<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(1.0))
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Asset class name to percentage (or amount). Null entries read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Allocation(BTreeMap<String, f64>);

impl<'de> Deserialize<'de> for Allocation {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<f64>>::deserialize(d)?;
        Ok(raw
            .into_iter()
            .map(|(k, v)| (k, v.unwrap_or(0.0)))
            .collect())
    }
}

impl Allocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset_class: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(asset_class.into(), value)
    }

    pub fn get(&self, asset_class: &str) -> Option<f64> {
        self.0.get(asset_class).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `equity`, then `equity_pct`, then 0. A zero `equity` entry falls through.
    pub fn equity_pct(&self) -> f64 {
        self.get("equity")
            .filter(|v| *v != 0.0)
            .or_else(|| self.get("equity_pct"))
            .unwrap_or(0.0)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Allocation {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Raw profile record as stored in the `profiles` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    pub monthly_income: Option<f64>,
    pub monthly_expenses: Option<f64>,
    pub emergency_fund_months: Option<f64>,
    pub term_cover: Option<f64>,
    pub health_cover: Option<f64>,
}

impl ClientProfile {
    /// Whole-percent savings rate, clamped at 0. Zero when income is unknown.
    pub fn savings_rate(&self) -> f64 {
        let income = self.monthly_income.unwrap_or(0.0);
        let expenses = self.monthly_expenses.unwrap_or(0.0);
        if income > 0.0 {
            ((1.0 - expenses / income) * 100.0).round().max(0.0)
        } else {
            0.0
        }
    }

    pub fn annual_income(&self) -> f64 {
        self.monthly_income.unwrap_or(0.0) * 12.0
    }

    /// Term cover as a multiple of annual income; zero income divides by 1.
    pub fn term_cover_multiple(&self) -> f64 {
        let Some(term_cover) = self.term_cover.filter(|v| *v != 0.0) else {
            return 0.0;
        };
        let annual_income = self.annual_income();
        let divisor = if annual_income == 0.0 { 1.0 } else { annual_income };
        term_cover / divisor
    }

    pub fn investment_snapshot(&self, allocation: Allocation) -> InvestmentSnapshot {
        InvestmentSnapshot {
            savings_rate: self.savings_rate(),
            emergency_fund_months: self.emergency_fund_months.unwrap_or(0.0),
            allocation,
        }
    }

    pub fn insurance_snapshot(&self, family: &[FamilyMember]) -> InsuranceSnapshot {
        InsuranceSnapshot {
            term_cover_multiple: self.term_cover_multiple(),
            health_cover: self.health_cover.unwrap_or(0.0),
            family_size: family.len().max(1) as f64,
        }
    }
}

/// Household member record. Only the count feeds the rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyMember {
    pub name: Option<String>,
    #[serde(alias = "relationship")]
    pub relation: Option<String>,
    pub marital_status: Option<String>,
}
