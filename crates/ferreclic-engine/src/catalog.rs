//! # Catalog Seams
//!
//! The transaction engine never owns the product catalog; it consumes it
//! through two narrow capabilities.
//!
//! ## Why Traits?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Boundary                                   │
//! │                                                                         │
//! │   PosSession ──reads──► CatalogLookup   (find_products, get_product)   │
//! │   Reconciler ──writes─► CatalogMutation (adjust_stock, atomic/call)    │
//! │                                                                         │
//! │   The original prototype shared one mutable product array between      │
//! │   every screen. Passing the catalog in as a capability keeps the       │
//! │   engine testable against MemoryCatalog and lets the shell own the     │
//! │   real store.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use tracing::debug;

use ferreclic_core::validation::{
    validate_barcode, validate_price_cents, validate_product_name, validate_sku,
};
use ferreclic_core::{CoreResult, Product};

// =============================================================================
// Catalog Error
// =============================================================================

/// Failures of the catalog collaborator.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no product with this id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The catalog store could not be reached or refused the call.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Capabilities
// =============================================================================

/// Read-only product lookup, consumed at add-to-cart time and for the
/// search box. The cart snapshots whatever the lookup returns.
pub trait CatalogLookup {
    /// Searches by name, SKU or barcode. An empty query yields no results.
    fn find_products(&self, query: &str) -> Vec<Product>;

    /// Fetches a single product by id.
    fn get_product(&self, product_id: &str) -> Option<Product>;
}

/// Stock mutation, invoked only by the reconciler. Each call must be
/// applied atomically by the implementor.
pub trait CatalogMutation {
    /// Adds `delta` (may be negative) to the product's stock and returns
    /// the resulting level. Stock is allowed to go negative; flagging
    /// oversell is the caller's concern.
    fn adjust_stock(&mut self, product_id: &str, delta: i64) -> Result<i64, CatalogError>;
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// Catalog backed by a plain `Vec`, like the prototype's in-page product
/// state. Serves the demo shell and every engine test.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: Vec<Product>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        MemoryCatalog {
            products: Vec::new(),
        }
    }

    /// Creates a catalog from existing products.
    pub fn with_products(products: Vec<Product>) -> Self {
        MemoryCatalog { products }
    }

    /// Creates a catalog pre-loaded with the demo hardware-store data.
    pub fn seeded() -> Self {
        MemoryCatalog {
            products: seed_products(),
        }
    }

    /// Inserts or replaces a product after validating its fields.
    ///
    /// Catalog-management path: used by the inventory screen, never by
    /// the transaction engine itself.
    pub fn upsert_product(&mut self, product: Product) -> CoreResult<()> {
        validate_sku(&product.sku)?;
        validate_product_name(&product.name)?;
        validate_barcode(&product.barcode)?;
        validate_price_cents("price", product.price_cents)?;
        validate_price_cents("cost", product.cost_cents)?;

        if let Some(existing) = self.products.iter_mut().find(|p| p.id == product.id) {
            *existing = product;
        } else {
            self.products.push(product);
        }
        Ok(())
    }

    /// All products, in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogLookup for MemoryCatalog {
    fn find_products(&self, query: &str) -> Vec<Product> {
        let query = query.trim();
        if query.is_empty() {
            // Matches the search box: nothing typed, nothing listed
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.sku.to_lowercase().contains(&needle)
                    || p.barcode.contains(query)
            })
            .cloned()
            .collect()
    }

    fn get_product(&self, product_id: &str) -> Option<Product> {
        self.products.iter().find(|p| p.id == product_id).cloned()
    }
}

impl CatalogMutation for MemoryCatalog {
    fn adjust_stock(&mut self, product_id: &str, delta: i64) -> Result<i64, CatalogError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.to_string()))?;

        product.stock += delta;
        debug!(product_id = %product_id, delta = %delta, stock = %product.stock, "Stock adjusted");
        Ok(product.stock)
    }
}

// =============================================================================
// Seed Data
// =============================================================================

/// The demo dataset: a small hardware store's shelf.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Martillo de Uña 16oz".to_string(),
            sku: "HER-MAN-001".to_string(),
            barcode: "7501234567890".to_string(),
            price_cents: 18550,
            cost_cents: 12000,
            stock: 25,
            category: "Herramientas".to_string(),
            location: "Pasillo 1, Estante A".to_string(),
            supplier: "Truper Tools".to_string(),
        },
        Product {
            id: "2".to_string(),
            name: "Taladro Percutor 1/2\"".to_string(),
            sku: "HER-ELE-055".to_string(),
            barcode: "7509876543210".to_string(),
            price_cents: 125000,
            cost_cents: 85000,
            stock: 8,
            category: "Eléctricos".to_string(),
            location: "Pasillo 2, Vitrina".to_string(),
            supplier: "Bosch Mex".to_string(),
        },
        Product {
            id: "3".to_string(),
            name: "Juego Desarmadores (6 pzas)".to_string(),
            sku: "HER-MAN-012".to_string(),
            barcode: "7505555555555".to_string(),
            price_cents: 22000,
            cost_cents: 14000,
            stock: 15,
            category: "Herramientas".to_string(),
            location: "Pasillo 1, Estante B".to_string(),
            supplier: "Urrea".to_string(),
        },
        Product {
            id: "4".to_string(),
            name: "Pintura Vinílica Blanca 19L".to_string(),
            sku: "CON-PIN-100".to_string(),
            barcode: "7501112223334".to_string(),
            price_cents: 110000,
            cost_cents: 75000,
            stock: 12,
            category: "Construcción".to_string(),
            location: "Bodega 1".to_string(),
            supplier: "Comex".to_string(),
        },
        Product {
            id: "5".to_string(),
            name: "Tubo PVC 4\" x 3m".to_string(),
            sku: "PLO-TUB-004".to_string(),
            barcode: "7504443332221".to_string(),
            price_cents: 28000,
            cost_cents: 19000,
            stock: 50,
            category: "Plomería".to_string(),
            location: "Patio Trasero".to_string(),
            supplier: "Amanco".to_string(),
        },
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_nothing() {
        let catalog = MemoryCatalog::seeded();
        assert!(catalog.find_products("").is_empty());
        assert!(catalog.find_products("   ").is_empty());
    }

    #[test]
    fn test_search_by_name_is_case_insensitive() {
        let catalog = MemoryCatalog::seeded();
        let hits = catalog.find_products("martillo");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sku, "HER-MAN-001");
    }

    #[test]
    fn test_search_by_sku_and_barcode() {
        let catalog = MemoryCatalog::seeded();

        let by_sku = catalog.find_products("her-man");
        assert_eq!(by_sku.len(), 2); // hammer + screwdriver set

        let by_barcode = catalog.find_products("7504443332221");
        assert_eq!(by_barcode.len(), 1);
        assert_eq!(by_barcode[0].sku, "PLO-TUB-004");
    }

    #[test]
    fn test_get_product() {
        let catalog = MemoryCatalog::seeded();
        assert!(catalog.get_product("1").is_some());
        assert!(catalog.get_product("no-such-id").is_none());
    }

    #[test]
    fn test_adjust_stock() {
        let mut catalog = MemoryCatalog::seeded();

        let stock = catalog.adjust_stock("1", -2).unwrap();
        assert_eq!(stock, 23);

        let stock = catalog.adjust_stock("1", 2).unwrap();
        assert_eq!(stock, 25);
    }

    #[test]
    fn test_adjust_stock_may_go_negative() {
        let mut catalog = MemoryCatalog::seeded();
        let stock = catalog.adjust_stock("2", -10).unwrap();
        assert_eq!(stock, -2);
    }

    #[test]
    fn test_adjust_stock_unknown_product() {
        let mut catalog = MemoryCatalog::seeded();
        let err = catalog.adjust_stock("ghost", 1).unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound(_)));
    }

    #[test]
    fn test_upsert_validates_and_replaces() {
        let mut catalog = MemoryCatalog::new();
        let mut product = seed_products().remove(0);

        catalog.upsert_product(product.clone()).unwrap();
        assert_eq!(catalog.len(), 1);

        product.price_cents = 19900;
        catalog.upsert_product(product).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_product("1").unwrap().price_cents, 19900);
    }

    #[test]
    fn test_upsert_rejects_bad_input() {
        let mut catalog = MemoryCatalog::new();

        let mut bad_sku = seed_products().remove(0);
        bad_sku.sku = "".to_string();
        assert!(catalog.upsert_product(bad_sku).is_err());

        let mut bad_price = seed_products().remove(0);
        bad_price.price_cents = -100;
        assert!(catalog.upsert_product(bad_price).is_err());

        assert!(catalog.is_empty());
    }
}
