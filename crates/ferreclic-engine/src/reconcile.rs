//! # Stock Reconciliation
//!
//! Applies the stock deltas implied by a finalized transaction to the
//! catalog.
//!
//! ## Delta Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reconciliation Rules                                 │
//! │                                                                         │
//! │  Mode     Per line            Example (qty 2, stock 25)                │
//! │  ────     ────────            ─────────────────────────                │
//! │  Sale     stock -= quantity   25 → 23                                  │
//! │  Return   stock += quantity   23 → 25                                  │
//! │  Quote    no mutation         25 → 25                                  │
//! │                                                                         │
//! │  Every delta is computed from the same immutable TransactionRecord,    │
//! │  so one reconciliation call can never mix two transactions.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! A failed `adjust_stock` call becomes a `StockAdjustmentFailed` warning
//! and reconciliation moves on to the next line: the record already
//! exists, so the operator is told stock may be inconsistent rather than
//! having the checkout blocked. Oversell (stock below zero after a Sale
//! delta) is flagged the same way, as data for the inventory screen.

use tracing::warn;

use ferreclic_core::{TransactionMode, TransactionRecord};

use crate::catalog::CatalogMutation;
use crate::error::CheckoutWarning;

// =============================================================================
// Stock Delta
// =============================================================================

/// One product's stock movement implied by a finalized transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDelta {
    /// Product whose stock moves.
    pub product_id: String,
    /// Signed movement: negative for Sale, positive for Return.
    pub delta: i64,
}

/// Pure mapping from a finalized record to its stock deltas.
///
/// Quotes map to no deltas at all.
pub fn stock_deltas(record: &TransactionRecord) -> Vec<StockDelta> {
    let multiplier = record.mode.stock_multiplier();
    if multiplier == 0 {
        return Vec::new();
    }

    record
        .lines
        .iter()
        .map(|line| StockDelta {
            product_id: line.product_id.clone(),
            delta: multiplier * line.quantity,
        })
        .collect()
}

// =============================================================================
// Application
// =============================================================================

/// Applies a record's deltas to the catalog, one atomic call per product.
///
/// Returns the warnings to surface to the operator; an empty vector
/// means every delta applied cleanly.
pub fn reconcile<C>(catalog: &mut C, record: &TransactionRecord) -> Vec<CheckoutWarning>
where
    C: CatalogMutation + ?Sized,
{
    let mut warnings = Vec::new();

    for StockDelta { product_id, delta } in stock_deltas(record) {
        match catalog.adjust_stock(&product_id, delta) {
            Ok(stock) => {
                if record.mode == TransactionMode::Sale && stock < 0 {
                    warn!(record_id = %record.id, product_id = %product_id, stock = %stock, "Product oversold");
                    warnings.push(CheckoutWarning::Oversold { product_id, stock });
                }
            }
            Err(err) => {
                warn!(record_id = %record.id, product_id = %product_id, error = %err, "Stock adjustment failed");
                warnings.push(CheckoutWarning::StockAdjustmentFailed {
                    product_id,
                    reason: err.to_string(),
                });
            }
        }
    }

    warnings
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ferreclic_core::{PaymentMethod, RecordLine};

    use crate::catalog::{CatalogError, CatalogLookup, MemoryCatalog};

    fn record(mode: TransactionMode) -> TransactionRecord {
        TransactionRecord {
            id: "r-1".to_string(),
            created_at: Utc::now(),
            lines: vec![
                RecordLine {
                    product_id: "1".to_string(),
                    sku: "HER-MAN-001".to_string(),
                    name: "Martillo de Uña 16oz".to_string(),
                    unit_price_cents: 18550,
                    quantity: 2,
                    line_total_cents: 37100,
                },
                RecordLine {
                    product_id: "3".to_string(),
                    sku: "HER-MAN-012".to_string(),
                    name: "Juego Desarmadores (6 pzas)".to_string(),
                    unit_price_cents: 22000,
                    quantity: 1,
                    line_total_cents: 22000,
                },
            ],
            total_cents: 59100,
            mode,
            client: None,
            payment: match mode {
                TransactionMode::Sale => Some(PaymentMethod::Cash),
                _ => None,
            },
        }
    }

    #[test]
    fn test_sale_deltas_are_negative() {
        let deltas = stock_deltas(&record(TransactionMode::Sale));
        assert_eq!(
            deltas,
            vec![
                StockDelta {
                    product_id: "1".to_string(),
                    delta: -2
                },
                StockDelta {
                    product_id: "3".to_string(),
                    delta: -1
                },
            ]
        );
    }

    #[test]
    fn test_return_deltas_are_positive() {
        let deltas = stock_deltas(&record(TransactionMode::Return));
        assert_eq!(deltas[0].delta, 2);
        assert_eq!(deltas[1].delta, 1);
    }

    #[test]
    fn test_quote_has_no_deltas() {
        assert!(stock_deltas(&record(TransactionMode::Quote)).is_empty());
    }

    #[test]
    fn test_sale_then_return_round_trips_stock() {
        let mut catalog = MemoryCatalog::seeded();

        let warnings = reconcile(&mut catalog, &record(TransactionMode::Sale));
        assert!(warnings.is_empty());
        assert_eq!(catalog.get_product("1").unwrap().stock, 23);
        assert_eq!(catalog.get_product("3").unwrap().stock, 14);

        let warnings = reconcile(&mut catalog, &record(TransactionMode::Return));
        assert!(warnings.is_empty());
        assert_eq!(catalog.get_product("1").unwrap().stock, 25);
        assert_eq!(catalog.get_product("3").unwrap().stock, 15);
    }

    #[test]
    fn test_quote_leaves_stock_untouched() {
        let mut catalog = MemoryCatalog::seeded();
        let before: Vec<i64> = catalog.products().iter().map(|p| p.stock).collect();

        let warnings = reconcile(&mut catalog, &record(TransactionMode::Quote));

        assert!(warnings.is_empty());
        let after: Vec<i64> = catalog.products().iter().map(|p| p.stock).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_oversell_is_flagged_not_blocked() {
        let mut products = crate::catalog::seed_products();
        products[0].stock = 1; // hammer: selling 2 drives it to -1
        let mut catalog = MemoryCatalog::with_products(products);

        let warnings = reconcile(&mut catalog, &record(TransactionMode::Sale));

        assert_eq!(
            warnings,
            vec![CheckoutWarning::Oversold {
                product_id: "1".to_string(),
                stock: -1
            }]
        );
        // Stock was still adjusted; nothing was rolled back
        assert_eq!(catalog.get_product("1").unwrap().stock, -1);
        assert_eq!(catalog.get_product("3").unwrap().stock, 14);
    }

    #[test]
    fn test_returns_never_flag_oversell() {
        let mut products = crate::catalog::seed_products();
        products[0].stock = -5; // already oversold on paper
        let mut catalog = MemoryCatalog::with_products(products);

        let warnings = reconcile(&mut catalog, &record(TransactionMode::Return));
        assert!(warnings.is_empty());
        assert_eq!(catalog.get_product("1").unwrap().stock, -3);
    }

    /// Catalog that refuses every mutation, to exercise the warning path.
    struct RefusingCatalog;

    impl CatalogMutation for RefusingCatalog {
        fn adjust_stock(&mut self, _product_id: &str, _delta: i64) -> Result<i64, CatalogError> {
            Err(CatalogError::Unavailable("store offline".to_string()))
        }
    }

    #[test]
    fn test_mutation_failure_becomes_warning_per_line() {
        let mut catalog = RefusingCatalog;
        let warnings = reconcile(&mut catalog, &record(TransactionMode::Sale));

        assert_eq!(warnings.len(), 2);
        assert!(warnings
            .iter()
            .all(|w| matches!(w, CheckoutWarning::StockAdjustmentFailed { .. })));
    }
}
