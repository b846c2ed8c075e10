pub mod clients;
pub mod error;
pub mod next_steps;

use crate::domain::contract::AllocationRow;
use crate::domain::snapshot::{ClientProfile, FamilyMember};
use next_steps::NextStep;
use uuid::Uuid;

pub use clients::PgClientStore;
pub use error::StoreError;

/// Read access to client records plus the single write we make (next steps).
/// The tables belong to the hosted backend; nothing here creates or migrates them.
#[async_trait::async_trait]
pub trait ClientStore: Send + Sync {
    async fn fetch_profile(&self, client_id: Uuid) -> anyhow::Result<Option<ClientProfile>>;

    async fn fetch_allocation(&self, client_id: Uuid) -> anyhow::Result<Vec<AllocationRow>>;

    async fn fetch_family(&self, client_id: Uuid) -> anyhow::Result<Vec<FamilyMember>>;

    async fn insert_next_step(&self, step: &NextStep) -> anyhow::Result<Uuid>;
}
