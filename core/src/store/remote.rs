// korb/src/store/remote.rs

//! The authenticated-side store: the remote service contract and the thin
//! [`CartStore`] adapter over it.

use crate::error::{KorbError, KorbResult};
use crate::model::{CartAddition, LineItem};
use crate::store::CartStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Server API for the authenticated cart (authenticated context implied).
///
/// Quantity-bearing operations are **relative**: the client sends the delta
/// and the server applies it against its own row, so two optimistic clients
/// cannot overwrite each other with stale absolute values. Implementations
/// surface failures as `anyhow::Error`; the adapter below adds the
/// operation context.
#[async_trait]
pub trait RemoteCartService: Send + Sync {
  async fn list(&self) -> anyhow::Result<Vec<LineItem>>;
  async fn add_or_increment(&self, addition: &CartAddition) -> anyhow::Result<()>;
  async fn update_quantity(&self, product_id: &str, option_id: Option<&str>, delta: i64) -> anyhow::Result<()>;
  async fn delete_line(&self, product_id: &str, option_id: Option<&str>) -> anyhow::Result<()>;
  async fn delete_lines(&self, product_ids: &[String]) -> anyhow::Result<()>;
}

/// [`CartStore`] adapter delegating 1:1 to a [`RemoteCartService`].
///
/// Deliberately thin: no retries, no pipelining, no client-side state. A
/// failed write is reported to the caller and corrected by the next list.
pub struct AuthedCartStore {
  remote: Arc<dyn RemoteCartService>,
}

impl AuthedCartStore {
  pub fn new(remote: Arc<dyn RemoteCartService>) -> Self {
    Self { remote }
  }
}

#[async_trait]
impl CartStore for AuthedCartStore {
  async fn list(&self) -> KorbResult<Vec<LineItem>> {
    self
      .remote
      .list()
      .await
      .map_err(|source| KorbError::RemoteRead { source })
  }

  async fn add_or_increment(&self, addition: &CartAddition) -> KorbResult<()> {
    debug!(product_id = %addition.product.product_id, quantity = addition.quantity, "Dispatching remote add.");
    self
      .remote
      .add_or_increment(addition)
      .await
      .map_err(|source| KorbError::RemoteWrite {
        operation: "add_or_increment".to_string(),
        source,
      })
  }

  async fn update_quantity(&self, product_id: &str, option_id: Option<&str>, delta: i64) -> KorbResult<()> {
    debug!(product_id, ?option_id, delta, "Dispatching remote quantity delta.");
    self
      .remote
      .update_quantity(product_id, option_id, delta)
      .await
      .map_err(|source| KorbError::RemoteWrite {
        operation: "update_quantity".to_string(),
        source,
      })
  }

  async fn delete_line(&self, product_id: &str, option_id: Option<&str>) -> KorbResult<()> {
    self
      .remote
      .delete_line(product_id, option_id)
      .await
      .map_err(|source| KorbError::RemoteWrite {
        operation: "delete_line".to_string(),
        source,
      })
  }

  async fn delete_lines(&self, product_ids: &[String]) -> KorbResult<()> {
    self
      .remote
      .delete_lines(product_ids)
      .await
      .map_err(|source| KorbError::RemoteWrite {
        operation: "delete_lines".to_string(),
        source,
      })
  }
}
