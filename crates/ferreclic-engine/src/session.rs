//! # POS Session
//!
//! The operation API of the transaction engine: one session per terminal,
//! driving one cart through browse → review → confirm → reconcile.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PosSession                                       │
//! │                                                                         │
//! │  Operator Event        Operation            Collaborator               │
//! │  ──────────────        ─────────            ────────────               │
//! │  type in search box ─► search_products ───► CatalogLookup (read)       │
//! │  tap search result ──► add_line ──────────► CatalogLookup (snapshot)   │
//! │  tap +/-, trash ─────► update/remove ─────► (cart only)                │
//! │  VENTA/DEV./PRESUP. ─► set_mode ──────────► (cart only)                │
//! │  tap Cobrar ─────────► begin_checkout ────► (stage machine)            │
//! │  tap Volver ─────────► abort_checkout ────► (stage machine, no-op)     │
//! │  tap Efectivo/etc. ──► confirm ───────────► CatalogMutation + Sink     │
//! │                                                                         │
//! │  Single-threaded and cooperative: operations are discrete,             │
//! │  synchronous steps; there is never more than one mutator. Sharing a    │
//! │  catalog across terminals would make adjust_stock the critical         │
//! │  section - that serialization belongs to the catalog implementor.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use ferreclic_core::{
    Cart, PaymentMethod, Product, RecordLine, TransactionMode, TransactionRecord,
};

use crate::catalog::{CatalogLookup, CatalogMutation};
use crate::checkout::{CheckoutStage, StageMachine};
use crate::error::{CheckoutWarning, EngineError, EngineResult};
use crate::reconcile;
use crate::sink::TransactionSink;

// =============================================================================
// Confirmation
// =============================================================================

/// The result of a successful confirm: the immutable record plus any
/// non-fatal warnings the operator should see.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// The finalized transaction.
    pub record: TransactionRecord,
    /// Reconciliation/sink warnings; empty on a fully clean checkout.
    pub warnings: Vec<CheckoutWarning>,
}

// =============================================================================
// POS Session
// =============================================================================

/// One terminal's transaction engine, with its collaborators injected.
///
/// The catalog and sink are owned by the session for its lifetime; tests
/// inject `MemoryCatalog`/`MemorySink`, the shell injects the real store.
#[derive(Debug)]
pub struct PosSession<C, S> {
    catalog: C,
    sink: S,
    cart: Cart,
    checkout: StageMachine,
}

impl<C, S> PosSession<C, S>
where
    C: CatalogLookup + CatalogMutation,
    S: TransactionSink,
{
    /// Creates a session with an empty cart in Sale mode.
    pub fn new(catalog: C, sink: S) -> Self {
        PosSession {
            catalog,
            sink,
            cart: Cart::new(),
            checkout: StageMachine::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// The in-progress cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current transaction mode.
    pub fn mode(&self) -> TransactionMode {
        self.cart.mode()
    }

    /// Current checkout stage.
    pub fn stage(&self) -> CheckoutStage {
        self.checkout.stage()
    }

    /// The injected catalog (read side).
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The injected transaction sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Searches the catalog. Read-only, allowed in any stage.
    pub fn search_products(&self, query: &str) -> Vec<Product> {
        self.catalog.find_products(query)
    }

    // -------------------------------------------------------------------------
    // Cart operations (Browsing only)
    // -------------------------------------------------------------------------

    /// Looks up a product and adds it to the cart (merge by id).
    pub fn add_line(&mut self, product_id: &str) -> EngineResult<()> {
        self.ensure_browsing("add a line")?;

        let product = self
            .catalog
            .get_product(product_id)
            .ok_or_else(|| EngineError::ProductNotFound(product_id.to_string()))?;

        self.cart.add_line(&product)?;
        debug!(product_id = %product_id, lines = self.cart.line_count(), "Line added");
        Ok(())
    }

    /// Removes the line for `product_id`; missing ids are a silent no-op.
    pub fn remove_line(&mut self, product_id: &str) -> EngineResult<()> {
        self.ensure_browsing("remove a line")?;
        self.cart.remove_line(product_id);
        debug!(product_id = %product_id, "Line removed");
        Ok(())
    }

    /// Adjusts a line quantity by `delta`, clamped to stay ≥ 1.
    pub fn update_quantity(&mut self, product_id: &str, delta: i64) -> EngineResult<()> {
        self.ensure_browsing("update a quantity")?;
        self.cart.update_quantity(product_id, delta);
        Ok(())
    }

    /// Switches between Sale, Return and Quote. Lines are preserved.
    pub fn set_mode(&mut self, mode: TransactionMode) -> EngineResult<()> {
        self.ensure_browsing("switch mode")?;
        self.cart.set_mode(mode);
        debug!(?mode, "Mode switched");
        Ok(())
    }

    /// Explicit cancellation: empties the cart.
    pub fn clear_cart(&mut self) -> EngineResult<()> {
        self.ensure_browsing("clear the cart")?;
        self.cart.clear();
        debug!("Cart cleared");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Checkout pipeline
    // -------------------------------------------------------------------------

    /// Enters the read-only Review stage. Requires ≥ 1 line.
    pub fn begin_checkout(&mut self) -> EngineResult<()> {
        if self.cart.is_empty() {
            return Err(EngineError::EmptyCart);
        }
        self.checkout.begin_review()?;
        debug!(total = %self.cart.total(), lines = self.cart.line_count(), "Review started");
        Ok(())
    }

    /// Returns from Review to the cart. No side effects to unwind.
    pub fn abort_checkout(&mut self) -> EngineResult<()> {
        self.checkout.abort()?;
        debug!("Review aborted");
        Ok(())
    }

    /// Finalizes the reviewed cart into an immutable record, reconciles
    /// stock, hands the record to the sink and clears the cart.
    ///
    /// ## Payment Rules
    /// - Sale: `payment` is required
    /// - Return/Quote: `payment` must be `None`
    ///
    /// ## Failure Policy
    /// Stage and payment violations reject the confirm outright with the
    /// cart intact. Once the record is built, reconciliation and sink
    /// failures degrade to [`CheckoutWarning`]s: the record exists, the
    /// cart empties, and the operator is told what to double-check.
    pub fn confirm(
        &mut self,
        payment: Option<PaymentMethod>,
        client: Option<String>,
    ) -> EngineResult<Confirmation> {
        if !self.checkout.is_reviewing() {
            return Err(EngineError::InvalidStage {
                action: "confirm",
                stage: self.checkout.stage(),
            });
        }

        let mode = self.cart.mode();
        match (mode.requires_payment(), &payment) {
            (true, None) => return Err(EngineError::PaymentRequired),
            (false, Some(_)) => return Err(EngineError::PaymentNotAccepted { mode }),
            _ => {}
        }

        let record = self.build_record(payment, client);
        self.checkout.finalize()?;

        let mut warnings = reconcile::reconcile(&mut self.catalog, &record);

        if let Err(err) = self.sink.record_transaction(&record) {
            warn!(record_id = %record.id, error = %err, "Transaction sink failed");
            warnings.push(CheckoutWarning::SinkFailed {
                reason: err.to_string(),
            });
        }

        self.cart.clear();
        self.checkout.reset();

        info!(
            record_id = %record.id,
            ?mode,
            total = %record.total(),
            lines = record.lines.len(),
            warnings = warnings.len(),
            "Transaction finalized"
        );

        Ok(Confirmation { record, warnings })
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn ensure_browsing(&self, action: &'static str) -> EngineResult<()> {
        match self.checkout.stage() {
            CheckoutStage::Browsing => Ok(()),
            stage => Err(EngineError::InvalidStage { action, stage }),
        }
    }

    fn build_record(
        &self,
        payment: Option<PaymentMethod>,
        client: Option<String>,
    ) -> TransactionRecord {
        let lines = self
            .cart
            .lines()
            .iter()
            .map(|l| RecordLine {
                product_id: l.product_id.clone(),
                sku: l.sku.clone(),
                name: l.name.clone(),
                unit_price_cents: l.unit_price_cents,
                quantity: l.quantity,
                line_total_cents: l.line_total_cents(),
            })
            .collect();

        TransactionRecord {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            lines,
            total_cents: self.cart.total_cents(),
            mode: self.cart.mode(),
            client,
            payment,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
