// korb/src/engine/mod.rs

//! The cart reconciliation engine: the single source of truth for which
//! store is authoritative and for applying every mutation exactly once, to
//! exactly the correct store, while keeping an in-memory view synchronized
//! for pricing and rendering.
//!
//! Per-session state machine:
//!  - `Guest` (initial when unauthenticated): every mutation applies only
//!    to the persistent local snapshot.
//!  - `Authenticated`: every mutation applies only to the remote cart
//!    service; the view is refreshed from the last successful remote read.
//!  - `Guest -> Authenticated` fires once per login event and triggers the
//!    merge of the guest snapshot into the remote cart.
//!  - `Authenticated -> Guest` (logout) clears the in-memory view and never
//!    writes local storage.
//!
//! The engine is built for a single logical thread of control: intents
//! arrive serially from the UI event model, remote operations are awaited
//! one at a time, and nothing here retries or pipelines. Invariant
//! violations are silent no-ops; remote failures are reported to the caller
//! and corrected by the next `load_view`.

pub mod state;

pub use state::CartState;

use crate::collab::{AuthProvider, Notifier};
use crate::error::{KorbError, KorbResult};
use crate::model::{CartAddition, CartView, LineItem, OptionRef, ProductRef, Selection};
use crate::store::{AuthedCartStore, CartStore, GuestCartStore, LocalStore, RemoteCartService, StoreMode};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct CartEngine {
  state: CartState,
  mode: RwLock<StoreMode>,
  guest: GuestCartStore,
  authed: AuthedCartStore,
  // Kept separately from the guest adapter: the merge reads the raw
  // snapshot without mutating it.
  local: Arc<dyn LocalStore>,
  notifier: Arc<dyn Notifier>,
  // Claimed by the first observer of a login transition; released only on
  // merge failure (retry on a later login) or logout.
  merge_claimed: AtomicBool,
}

impl CartEngine {
  /// Builds an engine over the two backing stores. The initial mode is
  /// sampled from the auth provider; a session that starts authenticated
  /// had no guest-to-authenticated transition, so it never merges.
  pub fn new(
    local: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteCartService>,
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    let authenticated = auth.is_authenticated();
    let mode = if authenticated {
      StoreMode::Authenticated
    } else {
      StoreMode::Guest
    };
    debug!(?mode, "Cart engine initialized.");
    Self {
      state: CartState::default(),
      mode: RwLock::new(mode),
      guest: GuestCartStore::new(Arc::clone(&local)),
      authed: AuthedCartStore::new(remote),
      local,
      notifier,
      merge_claimed: AtomicBool::new(authenticated),
    }
  }

  /// A cloneable handle onto the in-memory view, for rendering layers.
  pub fn state(&self) -> CartState {
    self.state.clone()
  }

  pub fn mode(&self) -> StoreMode {
    *self.mode.read()
  }

  fn active_store(&self) -> &dyn CartStore {
    match *self.mode.read() {
      StoreMode::Guest => &self.guest,
      StoreMode::Authenticated => &self.authed,
    }
  }

  // --- Reads ---

  /// Reads the authoritative store and replaces the in-memory view, every
  /// line starting unchecked. A failed remote read falls back to an empty
  /// view plus a user-visible notification rather than an error; it is the
  /// correction point for any earlier optimistic divergence.
  #[instrument(name = "CartEngine::load_view", skip(self), fields(mode = ?self.mode()))]
  pub async fn load_view(&self) -> KorbResult<CartView> {
    let items = match self.active_store().list().await {
      Ok(items) => items,
      Err(e) => {
        warn!(error = %e, "Cart read failed; presenting an empty cart.");
        self.notifier.notify("We couldn't load your cart. Please try again.");
        Vec::new()
      }
    };
    let view = CartView::from_items(items);
    *self.state.write() = view.clone();
    Ok(view)
  }

  // --- Selection (pure view mutations, no backing store involved) ---

  pub fn set_checked(&self, index: usize, checked: bool) {
    self.state.write().set_checked(index, checked);
  }

  /// Selecting "all" on an empty cart is a no-op by construction.
  pub fn set_all_checked(&self, checked: bool) {
    self.state.write().set_all_checked(checked);
  }

  pub fn selection(&self) -> Selection {
    self.state.read().selection()
  }

  // --- Mutations ---

  /// Add-to-cart entry point. Creates the line on first add, increments the
  /// existing target otherwise; the view and the authoritative store see
  /// the same upsert.
  #[instrument(name = "CartEngine::add_or_increment", skip(self, addition), fields(product_id = %addition.product.product_id))]
  pub async fn add_or_increment(&self, addition: &CartAddition) -> KorbResult<()> {
    if addition.quantity == 0 {
      debug!("Zero-quantity addition rejected; view unchanged.");
      return Ok(());
    }
    self.state.write().upsert(addition);
    self.active_store().add_or_increment(addition).await
  }

  /// Applies `delta` to the bare product (`option_id: None`) or the
  /// matching option row. A result below 1 is rejected as a silent no-op
  /// regardless of what the caller's UI allowed.
  ///
  /// The view mutation is optimistic: a failed remote write propagates to
  /// the caller but is not rolled back here; the next [`Self::load_view`]
  /// re-derives the truth.
  #[instrument(name = "CartEngine::change_quantity", skip(self), err(Display))]
  pub async fn change_quantity(
    &self,
    product_id: &str,
    option_id: Option<&str>,
    current_quantity: u32,
    delta: i64,
  ) -> KorbResult<()> {
    // Wire convention: an empty option id means the bare product. Normalize
    // here so the store sees the same target the view mutated.
    let option_id = option_id.filter(|id| !id.is_empty());
    let next = current_quantity as i64 + delta;
    if next < 1 {
      debug!(current_quantity, delta, "Quantity change below 1 rejected; no-op.");
      return Ok(());
    }
    if !self.state.write().apply_delta(product_id, option_id, delta) {
      debug!("Quantity delta found no valid target in the view; no-op.");
      return Ok(());
    }
    self.active_store().update_quantity(product_id, option_id, delta).await
  }

  /// Removes one option row (`option_id` non-empty) or the whole line. A
  /// line left with no options and no bare quantity disappears entirely;
  /// that enforcement happens at this mutation boundary, not at display
  /// time. Confirmation is the caller's concern; the engine only exposes
  /// the operation.
  #[instrument(name = "CartEngine::remove_line", skip(self), err(Display))]
  pub async fn remove_line(&self, product_id: &str, option_id: Option<&str>) -> KorbResult<()> {
    // Empty option id means "the whole line" on the wire; normalize before
    // dispatch so the remote delete is not addressed to option "".
    let option_id = option_id.filter(|id| !id.is_empty());
    self.state.write().remove(product_id, option_id);
    self.active_store().delete_line(product_id, option_id).await
  }

  /// Removes every checked line from the view and bulk-deletes the same
  /// subset from the authoritative store. No-op when nothing is checked.
  #[instrument(name = "CartEngine::remove_selected", skip(self), err(Display))]
  pub async fn remove_selected(&self) -> KorbResult<()> {
    let product_ids = self.state.write().remove_checked();
    if product_ids.is_empty() {
      debug!("No checked lines to remove.");
      return Ok(());
    }
    self.active_store().delete_lines(&product_ids).await
  }

  // --- Session transitions ---

  /// Consumes the login transition event: switches to the remote store and
  /// submits the guest snapshot exactly once.
  ///
  /// The trigger is idempotent under re-delivery: an atomic claim means a
  /// second observer of the same login (e.g. two mounted components) finds
  /// the merge already claimed and returns immediately. On merge failure
  /// the claim is released and the guest snapshot is left untouched, so a
  /// subsequent login attempt retries the push. Each line-level push is
  /// atomic on its own; there is no cross-line rollback.
  #[instrument(name = "CartEngine::handle_login", skip(self), err(Display))]
  pub async fn handle_login(&self) -> KorbResult<()> {
    if self
      .merge_claimed
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      debug!("Login transition already consumed; merge not re-submitted.");
      *self.mode.write() = StoreMode::Authenticated;
      return Ok(());
    }

    *self.mode.write() = StoreMode::Authenticated;
    let snapshot = self.local.load();
    if snapshot.is_empty() {
      info!("Guest cart empty at login; nothing to merge.");
      self.load_view().await?;
      return Ok(());
    }

    match self.push_snapshot(&snapshot).await {
      Ok(pushed) => {
        info!(pushed, "Guest cart merged into remote cart.");
        // The local snapshot is now superseded: every read goes to the
        // remote store. It is not erased here.
        self.load_view().await?;
        Ok(())
      }
      Err(e) => {
        self.merge_claimed.store(false, Ordering::SeqCst);
        warn!(error = %e, "Guest cart merge failed; snapshot preserved for retry.");
        Err(e)
      }
    }
  }

  /// Consumes the logout transition: back to the guest store with an empty
  /// in-memory view. Local storage is not written; whatever guest snapshot
  /// existed before login is still there.
  pub fn handle_logout(&self) {
    *self.mode.write() = StoreMode::Guest;
    self.state.write().clear();
    self.merge_claimed.store(false, Ordering::SeqCst);
    info!("Session logged out; in-memory cart cleared.");
  }

  /// Pushes every guest line (bare quantity, then each option) to the
  /// remote service as relative adds. The server decides how duplicates
  /// against a pre-existing remote cart combine; this only guarantees the
  /// full snapshot is submitted once.
  async fn push_snapshot(&self, snapshot: &[LineItem]) -> KorbResult<usize> {
    let additions: Vec<CartAddition> = snapshot.iter().flat_map(line_additions).collect();
    let total = additions.len();
    let mut pushed = 0usize;
    for addition in &additions {
      self
        .authed
        .add_or_increment(addition)
        .await
        .map_err(|e| KorbError::MergeFailure {
          pushed,
          total,
          source: anyhow::Error::new(e),
        })?;
      pushed += 1;
    }
    Ok(pushed)
  }
}

/// Decomposes one stored line into the relative-add commands that rebuild
/// it remotely.
fn line_additions(item: &LineItem) -> Vec<CartAddition> {
  let product = ProductRef {
    product_id: item.product_id.clone(),
    product_name: item.product_name.clone(),
    category_name: item.category_name.clone(),
    price: item.price,
    shipping_price: item.shipping_price,
    images: item.images.clone(),
    option_required: item.option_required,
  };
  let mut additions = Vec::new();
  if item.quantity > 0 {
    additions.push(CartAddition {
      product: product.clone(),
      option: None,
      quantity: item.quantity,
    });
  }
  for opt in &item.options {
    additions.push(CartAddition {
      product: product.clone(),
      option: Some(OptionRef {
        option_id: opt.option_id.clone(),
        option_name: opt.option_name.clone(),
        option_price: opt.option_price,
      }),
      quantity: opt.quantity,
    });
  }
  additions
}
