// korb/src/collab.rs

//! Contracts for the external collaborators the cart core sits between.
//!
//! Implementations are out of scope here: an application wires in its own
//! auth session, dialog UI, toast/notification channel and payment widget.
//! The engine and controller only ever see these traits, which keeps both
//! testable against plain fakes.

use crate::model::CheckoutLine;
use async_trait::async_trait;

/// Read-only view of the authentication state.
///
/// The login transition itself is delivered by calling
/// [`crate::engine::CartEngine::handle_login`] exactly when the provider's
/// login event fires; this trait only answers "is a session active right
/// now", which the engine samples at construction time.
pub trait AuthProvider: Send + Sync {
  fn is_authenticated(&self) -> bool;
}

/// Awaited before every destructive cart operation. Returning false aborts
/// the operation with no mutation anywhere.
#[async_trait]
pub trait ConfirmationDialog: Send + Sync {
  async fn confirm(&self, title: &str, description: &str) -> bool;
}

/// Transient, non-blocking user-visible notices (e.g. "couldn't load your
/// cart"). Never used for confirmation flows.
pub trait Notifier: Send + Sync {
  fn notify(&self, message: &str);
}

/// Hand-off target for checkout: receives the checked `{product_id,
/// quantity}` pairs and returns an opaque payment session identifier that
/// is consumed downstream, not here.
#[async_trait]
pub trait PaymentSession: Send + Sync {
  async fn begin(&self, lines: &[CheckoutLine]) -> anyhow::Result<String>;
}
