//! # ferreclic-core: Pure Business Logic for the FERRECLIC POS
//!
//! This crate is the **heart** of the FERRECLIC transaction engine. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FERRECLIC Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Frontend (mobile web shell)                     │   │
//! │  │    Search UI ──► Cart UI ──► Checkout UI ──► Confirmation      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ IPC                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ferreclic-engine (orchestration)                   │   │
//! │  │    session, checkout stages, reconciliation, catalog seams     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ ferreclic-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │  Record   │  │  centavos │  │ CartLine  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, TransactionRecord, modes)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart and CartLine with merge/clamp semantics
//! - [`error`] - Domain error types
//! - [`validation`] - Catalog input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use ferreclic_core::Money` instead of
// `use ferreclic_core::money::Money`

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::{PaymentMethod, Product, RecordLine, TransactionMode, TransactionRecord};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps a single ticket printable.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches fat-finger entries (typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Stock level below which the inventory screen flags a product.
///
/// Matches the red-dot rule on the inventory list (stock < 10).
pub const LOW_STOCK_THRESHOLD: i64 = 10;
