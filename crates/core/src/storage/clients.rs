use crate::domain::contract::AllocationRow;
use crate::domain::snapshot::{ClientProfile, FamilyMember};
use crate::storage::next_steps::NextStep;
use crate::storage::{ClientStore, StoreError};
use anyhow::Context;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PgClientStore {
    pool: sqlx::PgPool,
}

impl PgClientStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ClientStore for PgClientStore {
    async fn fetch_profile(&self, client_id: Uuid) -> anyhow::Result<Option<ClientProfile>> {
        // Numeric columns may be `numeric`; cast so they decode as f64.
        let row = sqlx::query_as::<
            _,
            (
                Option<f64>,
                Option<f64>,
                Option<f64>,
                Option<f64>,
                Option<f64>,
            ),
        >(
            "SELECT monthly_income::float8, monthly_expenses::float8, \
                    emergency_fund_months::float8, term_cover::float8, health_cover::float8 \
             FROM profiles \
             WHERE id = $1 \
             LIMIT 1",
        )
        .persistent(false)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| StoreError::new("profiles", "select", Some(client_id)))?;

        Ok(row.map(
            |(monthly_income, monthly_expenses, emergency_fund_months, term_cover, health_cover)| {
                ClientProfile {
                    monthly_income,
                    monthly_expenses,
                    emergency_fund_months,
                    term_cover,
                    health_cover,
                }
            },
        ))
    }

    async fn fetch_allocation(&self, client_id: Uuid) -> anyhow::Result<Vec<AllocationRow>> {
        let rows = sqlx::query_as::<_, (Option<String>, Option<f64>, Option<f64>)>(
            "SELECT category, value::float8, share::float8 \
             FROM vw_asset_allocation \
             WHERE user_id = $1",
        )
        .persistent(false)
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| StoreError::new("vw_asset_allocation", "select", Some(client_id)))?;

        Ok(rows
            .into_iter()
            .map(|(category, value, share)| AllocationRow {
                category: category.unwrap_or_default(),
                value,
                share,
            })
            .collect())
    }

    async fn fetch_family(&self, client_id: Uuid) -> anyhow::Result<Vec<FamilyMember>> {
        let rows = sqlx::query_as::<_, (Option<String>, Option<String>, Option<String>)>(
            "SELECT name, relationship, marital_status \
             FROM family_members \
             WHERE user_id = $1 \
             ORDER BY created_at ASC",
        )
        .persistent(false)
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| StoreError::new("family_members", "select", Some(client_id)))?;

        Ok(rows
            .into_iter()
            .map(|(name, relation, marital_status)| FamilyMember {
                name,
                relation,
                marital_status,
            })
            .collect())
    }

    async fn insert_next_step(&self, step: &NextStep) -> anyhow::Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO next_steps (user_id, title, description, category, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .persistent(false)
        .bind(step.user_id)
        .bind(&step.title)
        .bind(&step.description)
        .bind(step.category.as_str())
        .bind(step.status)
        .bind(step.created_at)
        .fetch_one(&self.pool)
        .await
        .with_context(|| StoreError::new("next_steps", "insert", Some(step.user_id)))?;

        tracing::info!(
            client_id = %step.user_id,
            recommendation_id = %step.recommendation_id,
            next_step_id = %id,
            "next step created"
        );
        Ok(id)
    }
}
