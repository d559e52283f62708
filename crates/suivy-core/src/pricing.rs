//! Catalog pricing of unit orders and payment lines.

use tracing::warn;

use suivy_domain::{Catalog, PurchaseOrder, UnitOrder};

/// Prices catalog line items. Unknown codes degrade to a zero price with a
/// warning; they never fail an operation.
pub struct PricingService;

impl PricingService {
    pub fn unit_price(catalog: &Catalog, code: &str) -> f64 {
        match catalog.price(code) {
            Some(price) => price,
            None => {
                warn!("unknown catalog code `{}` priced at zero", code);
                0.0
            }
        }
    }

    /// Pre-tax value of a list of (code, quantity) lines.
    pub fn lines_total_ht(catalog: &Catalog, lines: &[UnitOrder]) -> f64 {
        lines
            .iter()
            .map(|line| Self::unit_price(catalog, &line.code) * line.quantity)
            .sum()
    }

    /// Pre-tax total of an order as derived from its catalog line items.
    pub fn order_total_ht(catalog: &Catalog, order: &PurchaseOrder) -> f64 {
        Self::lines_total_ht(catalog, &order.unit_orders)
    }
}
