use std::fmt;
use uuid::Uuid;

/// Attached as context to failed store calls so callers can downcast it.
#[derive(Debug, Clone)]
pub struct StoreError {
    pub table: &'static str,
    pub stage: &'static str,
    pub client_id: Option<Uuid>,
}

impl StoreError {
    pub fn new(table: &'static str, stage: &'static str, client_id: Option<Uuid>) -> Self {
        Self {
            table,
            stage,
            client_id,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error (table={}, stage={}", self.table, self.stage)?;
        if let Some(client_id) = self.client_id {
            write!(f, ", client_id={client_id}")?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for StoreError {}
