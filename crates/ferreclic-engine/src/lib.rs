//! # ferreclic-engine: Transaction Engine for the FERRECLIC POS
//!
//! Orchestrates the checkout flow on top of [`ferreclic_core`]: one
//! [`PosSession`] per terminal drives a cart through
//! browse → review → confirm → reconcile, against collaborators injected
//! as traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ferreclic-engine                                   │
//! │                                                                         │
//! │   ┌──────────────────────────────────────────────────────────────┐     │
//! │   │                      PosSession                              │     │
//! │   │   cart ops · mode switch · checkout stages · confirm         │     │
//! │   └───────┬──────────────────┬─────────────────┬─────────────────┘     │
//! │           │                  │                 │                       │
//! │     CatalogLookup      CatalogMutation   TransactionSink              │
//! │     (search, add)      (reconciliation)  (record handoff)             │
//! │           │                  │                 │                       │
//! │   ┌───────▼──────────────────▼─────┐   ┌───────▼───────┐              │
//! │   │ MemoryCatalog (demo/tests)     │   │ MemorySink    │              │
//! │   │ or the shell's real store      │   │ or real store │              │
//! │   └────────────────────────────────┘   └───────────────┘              │
//! │                                                                         │
//! │   Assistant (separate seam): stateless ask() + context assembly,      │
//! │   never on the checkout path.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - The operation API ([`PosSession`], [`Confirmation`])
//! - [`checkout`] - Explicit Browsing/Reviewing/Finalized stage machine
//! - [`reconcile`] - Stock delta computation and application
//! - [`catalog`] - Catalog capabilities and the in-memory implementation
//! - [`sink`] - Transaction record handoff
//! - [`assistant`] - Assistant seam and context assembly
//! - [`error`] - [`EngineError`] and [`CheckoutWarning`]
//!
//! ## Example
//!
//! ```rust
//! use ferreclic_core::PaymentMethod;
//! use ferreclic_engine::{MemoryCatalog, MemorySink, PosSession};
//!
//! let mut session = PosSession::new(MemoryCatalog::seeded(), MemorySink::new());
//!
//! session.add_line("1").unwrap();          // hammer, $185.50
//! session.add_line("1").unwrap();          // scanned twice → qty 2
//! session.begin_checkout().unwrap();
//!
//! let confirmation = session
//!     .confirm(Some(PaymentMethod::Cash), None)
//!     .unwrap();
//!
//! assert_eq!(confirmation.record.total_cents, 37100);
//! assert!(session.cart().is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod assistant;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod reconcile;
pub mod session;
pub mod sink;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use assistant::{Assistant, AssistantError};
pub use catalog::{CatalogError, CatalogLookup, CatalogMutation, MemoryCatalog};
pub use checkout::{CheckoutStage, StageMachine};
pub use error::{CheckoutWarning, EngineError, EngineResult};
pub use reconcile::{reconcile, stock_deltas, StockDelta};
pub use session::{Confirmation, PosSession};
pub use sink::{MemorySink, SinkError, TransactionSink};
