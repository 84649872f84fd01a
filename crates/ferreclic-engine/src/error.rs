//! # Engine Error Types
//!
//! Error taxonomy for the transaction engine.
//!
//! ## Error vs Warning
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Errors and Warnings in Checkout                         │
//! │                                                                         │
//! │  EngineError (operation rejected, cart preserved)                      │
//! │  ├── EmptyCart          - checkout invoked with nothing to sell        │
//! │  ├── InvalidStage       - operation illegal in the current stage       │
//! │  ├── PaymentRequired    - Sale confirmed without a payment method      │
//! │  ├── PaymentNotAccepted - Return/Quote confirmed with one              │
//! │  ├── ProductNotFound    - add_line for an unknown catalog id           │
//! │  └── Cart               - cart ceiling violations (from core)          │
//! │                                                                         │
//! │  CheckoutWarning (confirm succeeded, operator is informed)             │
//! │  ├── StockAdjustmentFailed - catalog mutation failed, no rollback      │
//! │  ├── SinkFailed            - record handoff unacknowledged             │
//! │  └── Oversold              - a Sale drove stock below zero             │
//! │                                                                         │
//! │  Every EngineError is recoverable: the cart survives and the           │
//! │  operator can fix the input and retry.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use ferreclic_core::{CoreError, TransactionMode};

use crate::checkout::CheckoutStage;

// =============================================================================
// Engine Error
// =============================================================================

/// Errors surfaced by the POS session operation API.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Checkout invoked on an empty cart ("checkout unavailable").
    #[error("Checkout unavailable: cart is empty")]
    EmptyCart,

    /// The operation is illegal in the current checkout stage, e.g.
    /// confirming while browsing or editing the cart during review.
    #[error("Cannot {action} while checkout is {stage:?}")]
    InvalidStage {
        action: &'static str,
        stage: CheckoutStage,
    },

    /// A Sale was confirmed without choosing a payment method.
    #[error("A payment method is required to confirm a sale")]
    PaymentRequired,

    /// A payment method was supplied for a mode that takes none.
    #[error("{mode:?} checkout does not take a payment method")]
    PaymentNotAccepted { mode: TransactionMode },

    /// `add_line` referenced a product the catalog does not know.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cart rule violation (ceilings), propagated from core.
    #[error(transparent)]
    Cart(#[from] CoreError),
}

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Checkout Warnings
// =============================================================================

/// Non-fatal conditions attached to a successful confirmation.
///
/// The transaction record is considered created even when these occur;
/// the engine does not retry and does not roll back (see the
/// reconciliation policy in `reconcile`). Serialized so the shell can
/// show them to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutWarning {
    /// The catalog mutation for one line failed; stock may be
    /// inconsistent with the recorded transaction.
    #[error("Stock adjustment failed for {product_id}: {reason}")]
    StockAdjustmentFailed { product_id: String, reason: String },

    /// The transaction sink did not acknowledge the record. Stock
    /// adjustments already applied stay applied.
    #[error("Transaction record not acknowledged: {reason}")]
    SinkFailed { reason: String },

    /// A Sale drove stock below zero. Data-quality signal for the
    /// inventory screen, never a blocker.
    #[error("Product {product_id} oversold: stock now {stock}")]
    Oversold { product_id: String, stock: i64 },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::EmptyCart.to_string(),
            "Checkout unavailable: cart is empty"
        );

        let err = EngineError::InvalidStage {
            action: "add a line",
            stage: CheckoutStage::Reviewing,
        };
        assert_eq!(err.to_string(), "Cannot add a line while checkout is Reviewing");
    }

    #[test]
    fn test_core_error_propagates_transparently() {
        let core = CoreError::CartTooLarge { max: 100 };
        let engine: EngineError = core.into();
        assert_eq!(engine.to_string(), "Cart cannot have more than 100 lines");
    }

    #[test]
    fn test_warning_serialization_carries_kind_tag() {
        let warning = CheckoutWarning::Oversold {
            product_id: "1".to_string(),
            stock: -2,
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "oversold");
        assert_eq!(json["stock"], -2);
    }
}
