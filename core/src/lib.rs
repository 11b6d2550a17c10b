// src/lib.rs

//! korb: an ASYNC, store-agnostic shopping cart reconciliation engine.
//!
//! korb keeps one shopping cart consistent across two mutually exclusive
//! backing stores with features like:
//!  - A guest cart persisted in durable local storage and an authenticated,
//!    server-authoritative cart behind one mutation interface.
//!  - A per-session state machine that picks the authoritative store from
//!    auth state and merges the guest snapshot into the remote cart exactly
//!    once at login.
//!  - Relative-delta quantity commands toward the server, absolute writes
//!    into the local snapshot, optimistic in-memory views reconciled by the
//!    next read.
//!  - Mutation-boundary invariant enforcement: no duplicate product or
//!    option rows, no empty placeholder lines, no quantities below 1.
//!  - A pure, integer-only pricing calculator with a configurable
//!    free-shipping threshold, summing only selected lines.
//!  - An intent-level controller gating destructive operations behind an
//!    external confirmation dialog and handing checkout off to a payment
//!    session collaborator.

// Declare modules according to the planned structure
pub mod collab;
pub mod controller;
pub mod engine;
pub mod error;
pub mod model;
pub mod pricing;
pub mod store;

// --- Re-exports for the Public API ---

// Core data shapes users will interact with frequently
pub use crate::model::{CartAddition, CartOption, CartView, CheckoutLine, LineItem, OptionRef, ProductRef, Selection, ViewLine};

// The engine, its shared view cell, and the intent boundary
pub use crate::controller::CartController;
pub use crate::engine::{CartEngine, CartState};

// Store abstraction and the bundled adapters
pub use crate::store::{
  AuthedCartStore, CartStore, GuestCartStore, JsonFileStore, LocalStore, MemoryLocalStore, RemoteCartService,
  StoreMode,
};

// Collaborator contracts an application implements
pub use crate::collab::{AuthProvider, ConfirmationDialog, Notifier, PaymentSession};

// Pricing
pub use crate::pricing::{cart_totals, line_shipping, line_subtotal, CartTotals, PricingPolicy};

pub use crate::error::{KorbError, KorbResult};

/*
    Core Workflow:
    1. Implement the collaborator contracts: `RemoteCartService` over your
       cart API, `AuthProvider` over your session, plus a
       `ConfirmationDialog`, `Notifier`, and `PaymentSession`.
    2. Pick a `LocalStore` for the guest snapshot (`JsonFileStore` for a
       durable cart, `MemoryLocalStore` for tests).
    3. Build a `CartEngine::new(local, remote, auth, notifier)` and wrap it
       in a `CartController` with your `PricingPolicy`.
    4. Call `controller.refresh()` to load the view, dispatch UI intents
       through the controller, and render from `engine.state()`.
    5. Forward the auth provider's login event to `engine.handle_login()`
       (the guest cart merges once) and logout to `engine.handle_logout()`.
*/
