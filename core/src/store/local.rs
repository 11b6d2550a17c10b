// korb/src/store/local.rs

//! The guest-side store: a durable local snapshot plus the [`CartStore`]
//! adapter that mutates it.

use crate::error::KorbResult;
use crate::model::{CartAddition, CartView, LineItem};
use crate::store::CartStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Durable key-value storage for the guest cart snapshot.
///
/// Both operations are synchronous, effectively instantaneous, and
/// infallible by construction: a store that cannot produce a snapshot
/// produces an empty one. This mirrors browser-local-storage semantics,
/// where a read never raises and a failed write degrades silently.
pub trait LocalStore: Send + Sync {
  fn load(&self) -> Vec<LineItem>;
  fn save(&self, items: &[LineItem]);
}

/// In-process [`LocalStore`] for tests, examples and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
  items: RwLock<Vec<LineItem>>,
}

impl MemoryLocalStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_items(items: Vec<LineItem>) -> Self {
    Self {
      items: RwLock::new(items),
    }
  }
}

impl LocalStore for MemoryLocalStore {
  fn load(&self) -> Vec<LineItem> {
    self.items.read().clone()
  }

  fn save(&self, items: &[LineItem]) {
    *self.items.write() = items.to_vec();
  }
}

/// [`LocalStore`] backed by a JSON snapshot file (camelCase wire shape).
///
/// A missing, unreadable or undecodable file loads as an empty cart with a
/// warning; a failed save is logged and otherwise swallowed. The cart must
/// keep working when the disk does not.
#[derive(Debug)]
pub struct JsonFileStore {
  path: PathBuf,
}

impl JsonFileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &std::path::Path {
    &self.path
  }
}

impl LocalStore for JsonFileStore {
  fn load(&self) -> Vec<LineItem> {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "No guest cart snapshot yet; starting empty.");
        return Vec::new();
      }
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "Failed to read guest cart snapshot; starting empty.");
        return Vec::new();
      }
    };
    match serde_json::from_str(&raw) {
      Ok(items) => items,
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "Guest cart snapshot is not valid JSON; starting empty.");
        Vec::new()
      }
    }
  }

  fn save(&self, items: &[LineItem]) {
    let json = match serde_json::to_string(items) {
      Ok(json) => json,
      Err(e) => {
        warn!(error = %e, "Failed to serialize guest cart snapshot; skipping save.");
        return;
      }
    };
    if let Err(e) = std::fs::write(&self.path, json) {
      warn!(path = %self.path.display(), error = %e, "Failed to persist guest cart snapshot.");
    }
  }
}

/// [`CartStore`] over a [`LocalStore`]: load the snapshot, apply the
/// mutation with the shared [`CartView`] primitives, write the absolute
/// result back. None of these operations can fail at the storage layer;
/// invariant-rejected mutations leave the snapshot unchanged.
pub struct GuestCartStore {
  local: Arc<dyn LocalStore>,
}

impl GuestCartStore {
  pub fn new(local: Arc<dyn LocalStore>) -> Self {
    Self { local }
  }

  fn mutate(&self, apply: impl FnOnce(&mut CartView)) {
    let mut view = CartView::from_items(self.local.load());
    apply(&mut view);
    self.local.save(&view.into_items());
  }
}

#[async_trait]
impl CartStore for GuestCartStore {
  async fn list(&self) -> KorbResult<Vec<LineItem>> {
    Ok(self.local.load())
  }

  async fn add_or_increment(&self, addition: &CartAddition) -> KorbResult<()> {
    self.mutate(|view| view.upsert(addition));
    Ok(())
  }

  async fn update_quantity(&self, product_id: &str, option_id: Option<&str>, delta: i64) -> KorbResult<()> {
    self.mutate(|view| {
      if !view.apply_delta(product_id, option_id, delta) {
        debug!(product_id, ?option_id, delta, "Quantity delta rejected by snapshot; no-op.");
      }
    });
    Ok(())
  }

  async fn delete_line(&self, product_id: &str, option_id: Option<&str>) -> KorbResult<()> {
    self.mutate(|view| view.remove(product_id, option_id));
    Ok(())
  }

  async fn delete_lines(&self, product_ids: &[String]) -> KorbResult<()> {
    self.mutate(|view| {
      for product_id in product_ids {
        view.remove(product_id, None);
      }
    });
    Ok(())
  }
}
