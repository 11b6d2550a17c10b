// korb_core/examples/guest_session.rs

use async_trait::async_trait;
use korb::{
  AuthProvider, CartAddition, CartController, CartEngine, CheckoutLine, ConfirmationDialog, KorbResult, LineItem,
  LocalStore, MemoryLocalStore, Notifier, PaymentSession, PricingPolicy, ProductRef, RemoteCartService,
};
use std::sync::Arc;
use tracing::info;

// 1. Minimal collaborators for a guest-only walkthrough. The remote service
//    is never reached while unauthenticated, so a panicking stub keeps us
//    honest about that.
struct UnreachableRemote;

#[async_trait]
impl RemoteCartService for UnreachableRemote {
  async fn list(&self) -> anyhow::Result<Vec<LineItem>> {
    unreachable!("guest sessions never touch the remote cart")
  }
  async fn add_or_increment(&self, _addition: &CartAddition) -> anyhow::Result<()> {
    unreachable!("guest sessions never touch the remote cart")
  }
  async fn update_quantity(&self, _product_id: &str, _option_id: Option<&str>, _delta: i64) -> anyhow::Result<()> {
    unreachable!("guest sessions never touch the remote cart")
  }
  async fn delete_line(&self, _product_id: &str, _option_id: Option<&str>) -> anyhow::Result<()> {
    unreachable!("guest sessions never touch the remote cart")
  }
  async fn delete_lines(&self, _product_ids: &[String]) -> anyhow::Result<()> {
    unreachable!("guest sessions never touch the remote cart")
  }
}

struct GuestAuth;
impl AuthProvider for GuestAuth {
  fn is_authenticated(&self) -> bool {
    false
  }
}

struct LogNotifier;
impl Notifier for LogNotifier {
  fn notify(&self, message: &str) {
    info!("notice: {}", message);
  }
}

struct AlwaysYes;
#[async_trait]
impl ConfirmationDialog for AlwaysYes {
  async fn confirm(&self, title: &str, _description: &str) -> bool {
    info!("auto-confirming: {}", title);
    true
  }
}

struct LogPayment;
#[async_trait]
impl PaymentSession for LogPayment {
  async fn begin(&self, lines: &[CheckoutLine]) -> anyhow::Result<String> {
    info!("payment hand-off for {} line(s)", lines.len());
    Ok("demo-session".to_string())
  }
}

fn keyboard(quantity: u32) -> CartAddition {
  CartAddition {
    product: ProductRef {
      product_id: "kb-87".to_string(),
      product_name: "87-key keyboard".to_string(),
      category_name: "peripherals".to_string(),
      price: 24_000,
      shipping_price: 3_000,
      images: vec!["kb-87.jpg".to_string()],
      option_required: false,
    },
    option: None,
    quantity,
  }
}

#[tokio::main]
async fn main() -> KorbResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Guest Session Example ---");

  // 2. Wire up the engine over an in-memory guest snapshot.
  let local = Arc::new(MemoryLocalStore::new());
  let engine = Arc::new(CartEngine::new(
    local.clone(),
    Arc::new(UnreachableRemote),
    Arc::new(GuestAuth),
    Arc::new(LogNotifier),
  ));
  let controller = CartController::new(
    engine.clone(),
    PricingPolicy::default(),
    Arc::new(AlwaysYes),
    Arc::new(LogPayment),
  );

  // 3. Add twice: the second add increments instead of duplicating.
  controller.add_to_cart(&keyboard(1)).await?;
  controller.add_to_cart(&keyboard(1)).await?;
  info!("snapshot after adds: {:?}", local.load());

  // 4. Select everything and price it. 24_000 * 2 = 48_000, which is below
  //    the 50_000 threshold, so shipping applies.
  let totals = controller.toggle_all(true);
  info!("totals: subtotal={} shipping={}", totals.subtotal, totals.shipping);

  // 5. One more unit crosses the free-shipping boundary.
  let totals = controller.change_quantity("kb-87", None, 2, 1).await?;
  info!("totals after +1: subtotal={} shipping={}", totals.subtotal, totals.shipping);

  // 6. Hand the checked subset to the payment session.
  let session = controller.checkout().await?;
  info!("checkout session: {:?}", session);

  Ok(())
}
