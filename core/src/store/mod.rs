// korb/src/store/mod.rs

//! The dual-store abstraction: one mutation interface, two implementations
//! selected by auth state.
//!
//! The engine never branches on "is the user logged in" at its call sites;
//! it dispatches every mutation through [`CartStore`] and lets the active
//! adapter decide what that means. The guest adapter resolves deltas into
//! absolute values inside its own snapshot; the authenticated adapter
//! forwards deltas untouched so the server applies them itself
//! (delta-as-command, which avoids lost-update races between optimistic
//! client state and server state).

pub mod local;
pub mod remote;

use crate::error::KorbResult;
use crate::model::{CartAddition, LineItem};
use async_trait::async_trait;

pub use local::{GuestCartStore, JsonFileStore, LocalStore, MemoryLocalStore};
pub use remote::{AuthedCartStore, RemoteCartService};

/// Which backing store is currently authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
  /// Unauthenticated session: the locally persisted snapshot owns the cart.
  Guest,
  /// Authenticated session: the remote cart service owns the cart.
  Authenticated,
}

/// Store-agnostic mutation interface the engine drives.
///
/// Quantity changes are expressed as relative deltas. Each operation is a
/// discrete request/response unit; callers await completion before issuing
/// the next mutation on the same line.
#[async_trait]
pub trait CartStore: Send + Sync {
  /// Reads the full cart from the authoritative store.
  async fn list(&self) -> KorbResult<Vec<LineItem>>;

  /// Adds the addition's target or increments it when it already exists.
  async fn add_or_increment(&self, addition: &CartAddition) -> KorbResult<()>;

  /// Applies a relative quantity delta to the bare product
  /// (`option_id: None`) or the matching option row.
  async fn update_quantity(&self, product_id: &str, option_id: Option<&str>, delta: i64) -> KorbResult<()>;

  /// Removes one option row, or the whole line when `option_id` is absent.
  async fn delete_line(&self, product_id: &str, option_id: Option<&str>) -> KorbResult<()>;

  /// Bulk-removes whole lines by product id.
  async fn delete_lines(&self, product_ids: &[String]) -> KorbResult<()>;
}
