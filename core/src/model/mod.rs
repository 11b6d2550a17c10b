// korb/src/model/mod.rs

pub mod line_item;
pub mod view;

pub use line_item::{CartAddition, CartOption, CheckoutLine, LineItem, OptionRef, ProductRef};
pub use view::{CartView, Selection, ViewLine};
