//! Reference [`Gateway`] implementation keeping the source of truth in
//! process memory. The demo binary and the integration tests run against it;
//! real deployments put an HTTP client behind the same trait.

use concierge_core::{Gateway, GatewayError, GatewayResult, Resource};
use error_stack::Report;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

mod hotel;

/// The server's side of a resource's lifecycle: assign an id on create,
/// apply a patch on update, and say which scope a row belongs to.
pub trait Materialize: Resource {
    fn materialize(new: Self::New) -> Self;

    fn patch(&mut self, patch: Self::Patch);

    fn scope(&self) -> Self::Scope;
}

#[derive(Debug)]
pub struct MemoryGateway<R: Resource> {
    rows: Arc<RwLock<Vec<R>>>,
}

impl<R: Resource> Clone for MemoryGateway<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<R: Materialize> MemoryGateway<R> {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    pub fn seeded(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }
}

impl<R: Materialize> Default for MemoryGateway<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Materialize> Gateway<R> for MemoryGateway<R> {
    async fn list(&self, scope: &R::Scope) -> GatewayResult<Vec<R>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| row.scope() == *scope)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &R::Id) -> GatewayResult<R> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id() == id)
            .cloned()
            .ok_or_else(|| Report::new(GatewayError::not_found()))
    }

    async fn create(&self, new: R::New) -> GatewayResult<R> {
        let row = R::materialize(new);
        debug!(resource = R::NAME, id = %row.id(), "row created");
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &R::Id, patch: R::Patch) -> GatewayResult<R> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| Report::new(GatewayError::not_found()))?;
        row.patch(patch);
        Ok(row.clone())
    }

    async fn delete(&self, id: &R::Id) -> GatewayResult<()> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        if rows.len() == before {
            return Err(Report::new(GatewayError::not_found()));
        }
        debug!(resource = R::NAME, id = %id, "row deleted");
        Ok(())
    }
}
