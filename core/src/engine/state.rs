// korb/src/engine/state.rs

use crate::model::CartView;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Explicitly owned, shared cell for the in-memory cart view.
///
/// This replaces the module-level mutable cart state of the reference
/// system with an injected container: the engine owns one, the UI layer
/// clones handles off it, and its lifecycle is bound to the session (filled
/// on load, cleared on logout).
///
/// IMPORTANT: Lock guards obtained from this struct are blocking and MUST
/// NOT be held across `.await` suspension points in asynchronous code.
#[derive(Debug, Default)]
pub struct CartState(Arc<RwLock<CartView>>);

impl CartState {
  pub fn new(view: CartView) -> Self {
    CartState(Arc::new(RwLock::new(view)))
  }

  /// Acquires a read lock. The returned guard MUST be dropped before any
  /// `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, CartView> {
    self.0.read()
  }

  /// Acquires a write lock. The returned guard MUST be dropped before any
  /// `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, CartView> {
    self.0.write()
  }

  /// Clones the current view out of the cell.
  pub fn snapshot(&self) -> CartView {
    self.0.read().clone()
  }
}

impl Clone for CartState {
  fn clone(&self) -> Self {
    CartState(Arc::clone(&self.0))
  }
}
