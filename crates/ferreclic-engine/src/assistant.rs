//! # Assistant Boundary
//!
//! Seam for the conversational store assistant.
//!
//! The assistant is a stateless request/response call to an external
//! text-generation service; nothing is retained between calls and the
//! engine never blocks the cart or checkout on it. The backend
//! implementation (HTTP client, API keys) lives in the shell. What the
//! engine owns is the context the backend receives: a bounded inventory
//! summary plus a recent-sales line, assembled here so every backend
//! sees the store the same way.

use thiserror::Error;

use ferreclic_core::Product;

/// At most this many products are summarized into the assistant context;
/// the prompt budget of the backing model is not the catalog's problem.
pub const CONTEXT_PRODUCT_LIMIT: usize = 20;

// =============================================================================
// Assistant Error
// =============================================================================

/// Failures of the assistant collaborator.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The backend is not configured (e.g. missing API key).
    #[error("Assistant not configured: {0}")]
    NotConfigured(String),

    /// The backend call failed or returned nothing usable.
    #[error("Assistant unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Capability
// =============================================================================

/// One-shot question to the store assistant.
pub trait Assistant {
    /// Asks a single question with a snapshot of the catalog and a
    /// sales summary as context. Stateless: no conversation memory.
    fn ask(
        &self,
        prompt: &str,
        inventory: &[Product],
        sales_summary: &str,
    ) -> Result<String, AssistantError>;
}

// =============================================================================
// Context Assembly
// =============================================================================

/// Builds the system context block handed to the assistant backend.
///
/// Format per product: `- {name} (Stock: {n}, Price: {money}, Location: {loc})`,
/// capped at [`CONTEXT_PRODUCT_LIMIT`] entries.
pub fn build_context(inventory: &[Product], sales_summary: &str) -> String {
    let inventory_summary = inventory
        .iter()
        .take(CONTEXT_PRODUCT_LIMIT)
        .map(|p| {
            format!(
                "- {} (Stock: {}, Price: {}, Location: {})",
                p.name,
                p.stock,
                p.price(),
                p.location
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are the store assistant for a hardware-store POS. Help the \
owner sell more, keep inventory organized, and answer trade questions \
concisely.\n\nCurrent inventory:\n{}\n\nRecent sales: {}",
        inventory_summary, sales_summary
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_products;

    #[test]
    fn test_context_includes_stock_price_location() {
        let context = build_context(&seed_products(), "no sales yet");

        assert!(context.contains(
            "- Martillo de Uña 16oz (Stock: 25, Price: $185.50, Location: Pasillo 1, Estante A)"
        ));
        assert!(context.contains("Recent sales: no sales yet"));
    }

    #[test]
    fn test_context_caps_product_count() {
        let mut inventory = Vec::new();
        for i in 0..50 {
            let mut p = seed_products().remove(0);
            p.id = format!("p{}", i);
            p.name = format!("Producto {}", i);
            inventory.push(p);
        }

        let context = build_context(&inventory, "");
        let product_lines = context.lines().filter(|l| l.starts_with("- ")).count();
        assert_eq!(product_lines, CONTEXT_PRODUCT_LIMIT);
    }

    #[test]
    fn test_context_with_empty_inventory() {
        let context = build_context(&[], "quiet week");
        assert!(context.contains("Current inventory:\n\n"));
        assert!(context.contains("quiet week"));
    }
}
