//! # Cart Module
//!
//! The in-progress, mutable collection of lines for one not-yet-finalized
//! transaction.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                                   │
//! │                                                                         │
//! │  Operator Action            Operation              State Change         │
//! │  ───────────────            ─────────              ────────────         │
//! │                                                                         │
//! │  Scan / tap product ──────► add_line() ──────────► merge or append     │
//! │                                                                         │
//! │  Tap +/- stepper ─────────► update_quantity() ───► qty = max(1, q+Δ)   │
//! │                                                                         │
//! │  Tap trash icon ──────────► remove_line() ───────► line deleted        │
//! │                                                                         │
//! │  VENTA/DEVOLUCIÓN/PRESUP. ► set_mode() ──────────► mode only, lines    │
//! │                                                    untouched            │
//! │                                                                         │
//! │  Checkout success/cancel ─► clear() ─────────────► empty cart          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id (adding again increments quantity)
//! - Quantity ≥ 1 on every line; `update_quantity` can never reach zero
//! - Total = Σ(unit price × quantity), exact integer arithmetic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, TransactionMode};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart: a product snapshot plus a quantity.
///
/// ## Price Freezing
/// The price, name and location are captured when the product is added.
/// If the catalog changes afterwards, the line keeps showing what the
/// operator agreed to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product id (for catalog lookup and reconciliation).
    pub product_id: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price in centavos at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Storage location at time of adding (frozen, shown for picking).
    pub location: String,

    /// Quantity in cart, always ≥ 1.
    pub quantity: i64,

    /// When this line was added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a line from a product snapshot with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            location: product.location.clone(),
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Line total (unit price × quantity) in centavos.
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: an ordered sequence of lines plus the current mode.
///
/// Lifecycle: created empty when a POS session starts or after a prior
/// transaction finalizes; cleared on successful checkout or explicit
/// cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in insertion order.
    lines: Vec<CartLine>,

    /// Sale, Return or Quote. Switching never touches the lines.
    mode: TransactionMode,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart in Sale mode.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            mode: TransactionMode::default(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart, merging by product id.
    ///
    /// ## Behavior
    /// - Product already in cart: its quantity increments by 1
    /// - Otherwise: a new line with quantity 1 is appended
    ///
    /// Fails only on the cart-size and per-line-quantity ceilings.
    pub fn add_line(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            if line.quantity >= MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: line.quantity + 1,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity += 1;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_product(product));
        Ok(())
    }

    /// Removes the line for `product_id`.
    ///
    /// A missing id is a silent no-op: it cannot corrupt state, so it is
    /// not surfaced as an error. Returns whether a line was removed.
    pub fn remove_line(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Adjusts the quantity of the line for `product_id` by `delta`.
    ///
    /// The resulting quantity is clamped to `max(1, current + delta)`:
    /// this operation can never drive a line to zero. Use [`remove_line`]
    /// to delete a line entirely. A missing id is a silent no-op.
    ///
    /// [`remove_line`]: Cart::remove_line
    pub fn update_quantity(&mut self, product_id: &str, delta: i64) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line
                .quantity
                .saturating_add(delta)
                .clamp(1, MAX_LINE_QUANTITY);
        }
    }

    /// Switches the transaction mode. Lines and quantities are untouched.
    pub fn set_mode(&mut self, mode: TransactionMode) {
        self.mode = mode;
    }

    /// Current transaction mode.
    #[inline]
    pub fn mode(&self) -> TransactionMode {
        self.mode
    }

    /// Clears all lines; used after checkout success or cancellation.
    ///
    /// The mode survives a clear: an operator processing several returns
    /// in a row stays in Return mode.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Lines in insertion order.
    #[inline]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Grand total in centavos: Σ(unit price × quantity). Pure.
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents())
    }

    /// Checks if the cart is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// When the cart was created or last cleared.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            sku: format!("SKU-{}", id),
            barcode: format!("750{}", id),
            price_cents,
            cost_cents: price_cents / 2,
            stock: 25,
            category: "Herramientas".to_string(),
            location: "Pasillo 1".to_string(),
            supplier: "Truper Tools".to_string(),
        }
    }

    #[test]
    fn test_add_line_snapshots_product() {
        let mut cart = Cart::new();
        let product = test_product("1", 18550);

        cart.add_line(&product).unwrap();

        let line = &cart.lines()[0];
        assert_eq!(line.product_id, "1");
        assert_eq!(line.sku, "SKU-1");
        assert_eq!(line.unit_price_cents, 18550);
        assert_eq!(line.location, "Pasillo 1");
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_add_same_product_merges_into_one_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 10000);

        // A at $100 qty 1, add A again → one line, qty 2, $200.00
        cart.add_line(&product).unwrap();
        cart.add_line(&product).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total_cents(), 20000);
    }

    #[test]
    fn test_repeated_adds_accumulate_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 500);

        for _ in 0..7 {
            cart.add_line(&product).unwrap();
        }

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_update_quantity_clamps_at_one() {
        let mut cart = Cart::new();
        let product = test_product("1", 500);
        cart.add_line(&product).unwrap();

        cart.update_quantity("1", 4);
        assert_eq!(cart.lines()[0].quantity, 5);

        cart.update_quantity("1", -100);
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.update_quantity("1", i64::MIN);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity_missing_id_is_noop() {
        let mut cart = Cart::new();
        let product = test_product("1", 500);
        cart.add_line(&product).unwrap();

        cart.update_quantity("no-such-id", 3);
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 500)).unwrap();
        cart.add_line(&test_product("2", 700)).unwrap();

        assert!(cart.remove_line("1"));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].product_id, "2");

        // Missing id: silent no-op
        assert!(!cart.remove_line("1"));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_total_is_exact_sum() {
        let mut cart = Cart::new();
        let hammer = test_product("1", 18550);
        let screwdrivers = test_product("3", 22000);

        cart.add_line(&hammer).unwrap();
        cart.add_line(&hammer).unwrap();
        cart.add_line(&screwdrivers).unwrap();

        assert_eq!(cart.total_cents(), 59100); // $591.00
        // Reads have no side effects and never drift
        for _ in 0..1000 {
            assert_eq!(cart.total_cents(), 59100);
        }
    }

    #[test]
    fn test_mode_switch_preserves_lines_and_total() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 18550)).unwrap();
        cart.update_quantity("1", 1);

        let total_before = cart.total_cents();

        cart.set_mode(TransactionMode::Return);
        assert_eq!(cart.mode(), TransactionMode::Return);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total_cents(), total_before);

        cart.set_mode(TransactionMode::Quote);
        assert_eq!(cart.total_cents(), total_before);
    }

    #[test]
    fn test_clear_empties_lines_but_keeps_mode() {
        let mut cart = Cart::new();
        cart.set_mode(TransactionMode::Return);
        cart.add_line(&test_product("1", 500)).unwrap();

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_cents(), 0);
        assert_eq!(cart.mode(), TransactionMode::Return);
    }

    #[test]
    fn test_quantity_ceiling() {
        let mut cart = Cart::new();
        let product = test_product("1", 500);
        cart.add_line(&product).unwrap();
        cart.update_quantity("1", MAX_LINE_QUANTITY); // clamped to max

        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);
        let err = cart.add_line(&product).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_cart_line_ceiling() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_LINES {
            cart.add_line(&test_product(&format!("p{}", i), 100)).unwrap();
        }

        let err = cart.add_line(&test_product("one-too-many", 100)).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
    }
}
