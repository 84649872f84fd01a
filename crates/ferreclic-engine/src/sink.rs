//! # Transaction Sink
//!
//! The append-only handoff point for finalized transactions.
//!
//! On Confirm the checkout pipeline hands the immutable
//! [`TransactionRecord`] to whatever persistence/reporting collaborator
//! sits behind this seam. The engine does not retry a failed
//! acknowledgement and does not roll back stock that was already
//! adjusted; the failure surfaces as a `CheckoutWarning::SinkFailed`.

use thiserror::Error;

use ferreclic_core::TransactionRecord;

// =============================================================================
// Sink Error
// =============================================================================

/// Failures of the transaction sink collaborator.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink refused the record (e.g. schema mismatch downstream).
    #[error("Record rejected: {0}")]
    Rejected(String),

    /// The sink could not be reached.
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Capability
// =============================================================================

/// Consumes finalized transaction records, append-only.
pub trait TransactionSink {
    /// Records one finalized transaction. Quotes arrive here too; the
    /// record's mode tells the sink whether it is a committed
    /// transaction or a non-committing estimate.
    fn record_transaction(&mut self, record: &TransactionRecord) -> Result<(), SinkError>;
}

// =============================================================================
// In-Memory Sink
// =============================================================================

/// Sink backed by a `Vec`, like the prototype's in-page sales list.
/// Serves the demo shell and the engine tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<TransactionRecord>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        MemorySink {
            records: Vec::new(),
        }
    }

    /// Recorded transactions, oldest first.
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Number of recorded transactions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TransactionSink for MemorySink {
    fn record_transaction(&mut self, record: &TransactionRecord) -> Result<(), SinkError> {
        self.records.push(record.clone());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ferreclic_core::{PaymentMethod, RecordLine, TransactionMode};

    fn sample_record() -> TransactionRecord {
        TransactionRecord {
            id: "r-1".to_string(),
            created_at: Utc::now(),
            lines: vec![RecordLine {
                product_id: "1".to_string(),
                sku: "HER-MAN-001".to_string(),
                name: "Martillo de Uña 16oz".to_string(),
                unit_price_cents: 18550,
                quantity: 2,
                line_total_cents: 37100,
            }],
            total_cents: 37100,
            mode: TransactionMode::Sale,
            client: Some("Juan Pérez".to_string()),
            payment: Some(PaymentMethod::Cash),
        }
    }

    #[test]
    fn test_memory_sink_appends() {
        let mut sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.record_transaction(&sample_record()).unwrap();
        sink.record_transaction(&sample_record()).unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records()[0].total_cents, 37100);
    }

    #[test]
    fn test_record_payload_serializes_for_downstream() {
        // Downstream consumers receive JSON; make sure the handoff shape
        // is stable and camelCased
        let payload = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(payload["totalCents"], 37100);
        assert_eq!(payload["mode"], "sale");
        assert_eq!(payload["payment"], "cash");
        assert_eq!(payload["lines"][0]["unitPriceCents"], 18550);
    }
}
