//! # Domain Types
//!
//! Core domain types used throughout the FERRECLIC transaction engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌───────────────────┐   ┌──────────────────┐    │
//! │  │    Product      │   │ TransactionRecord │   │ TransactionMode  │    │
//! │  │  ─────────────  │   │  ───────────────  │   │  ──────────────  │    │
//! │  │  id             │   │  id (UUID)        │   │  Sale            │    │
//! │  │  sku / barcode  │   │  lines (frozen)   │   │  Return          │    │
//! │  │  price_cents    │   │  total_cents      │   │  Quote           │    │
//! │  │  stock          │   │  mode / payment   │   └──────────────────┘    │
//! │  └─────────────────┘   └───────────────────┘                           │
//! │                                                                         │
//! │  Product is owned by the catalog collaborator; the engine only         │
//! │  snapshots it into cart lines and adjusts its stock through the        │
//! │  CatalogMutation seam after a confirmed checkout.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Product
// =============================================================================

/// A product in the hardware-store catalog.
///
/// Owned by the catalog collaborator. The transaction engine never mutates
/// a `Product` directly: stock moves only through reconciliation, and every
/// other field only through catalog-management operations.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown to the operator and on the ticket.
    pub name: String,

    /// Stock Keeping Unit - internal business code (e.g. "HER-MAN-001").
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: String,

    /// Unit price in centavos.
    pub price_cents: i64,

    /// Unit cost in centavos (for margin reporting).
    pub cost_cents: i64,

    /// Current stock level.
    ///
    /// Signed on purpose: a Sale reconciled against a stale count may
    /// drive this negative, and the inventory screen highlights it.
    pub stock: i64,

    /// Category (e.g. "Herramientas", "Plomería").
    pub category: String,

    /// Storage location, aisle/shelf (e.g. "Pasillo 1, Estante A").
    pub location: String,

    /// Supplier name.
    pub supplier: String,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the unit cost as a Money type.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Unit margin (price minus cost).
    #[inline]
    pub fn margin(&self) -> Money {
        self.price() - self.cost()
    }

    /// Whether the inventory screen should highlight this product.
    ///
    /// Covers both the low-stock warning and the negative-stock
    /// (oversold) data-quality signal.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Transaction Mode
// =============================================================================

/// Classification of the in-progress transaction.
///
/// Switching modes never clears the cart; it only changes how checkout
/// interprets the lines and how reconciliation moves stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionMode {
    /// Regular sale: stock decreases, payment method required.
    Sale,
    /// Return: stock increases, confirmation only.
    Return,
    /// Quote (presupuesto): non-committing estimate, stock untouched.
    Quote,
}

impl TransactionMode {
    /// Per-unit stock movement implied by this mode.
    ///
    /// Multiplied by each line quantity during reconciliation:
    /// Sale -1, Return +1, Quote 0.
    #[inline]
    pub const fn stock_multiplier(&self) -> i64 {
        match self {
            TransactionMode::Sale => -1,
            TransactionMode::Return => 1,
            TransactionMode::Quote => 0,
        }
    }

    /// Whether confirming in this mode requires a payment method.
    #[inline]
    pub const fn requires_payment(&self) -> bool {
        matches!(self, TransactionMode::Sale)
    }
}

impl Default for TransactionMode {
    fn default() -> Self {
        TransactionMode::Sale
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid. Only meaningful for `TransactionMode::Sale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

// =============================================================================
// Transaction Record
// =============================================================================

/// A line inside a finalized transaction.
///
/// Uses the snapshot pattern: the product data is frozen at finalization
/// time so later catalog edits cannot rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecordLine {
    /// Product the line refers to.
    pub product_id: String,
    /// SKU at finalization time (frozen).
    pub sku: String,
    /// Product name at finalization time (frozen).
    pub name: String,
    /// Unit price in centavos at finalization time (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold/returned/quoted.
    pub quantity: i64,
    /// Line total (unit price × quantity).
    pub line_total_cents: i64,
}

impl RecordLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// The immutable result of a confirmed checkout.
///
/// Created only by the checkout pipeline; never mutated afterwards.
/// Handed append-only to whatever persistence/reporting collaborator
/// consumes the `TransactionSink` seam.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the checkout was confirmed.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Ordered copy of the cart lines at finalization time.
    pub lines: Vec<RecordLine>,

    /// Grand total in centavos.
    pub total_cents: i64,

    /// Sale, Return or Quote.
    pub mode: TransactionMode,

    /// Optional client reference (e.g. "Constructora del Norte").
    pub client: Option<String>,

    /// Payment method; present iff `mode == Sale`.
    pub payment: Option<PaymentMethod>,
}

impl TransactionRecord {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
