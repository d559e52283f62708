//! Read-only unit-price catalog shared by orders and payments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maps unit codes to their pre-tax unit price, plus the applicable tax rate.
/// Owned by an external catalog collaborator; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub prices: BTreeMap<String, f64>,
    pub tax_rate_pct: f64,
}

impl Catalog {
    pub fn new(tax_rate_pct: f64) -> Self {
        Self {
            prices: BTreeMap::new(),
            tax_rate_pct,
        }
    }

    pub fn with_price(mut self, code: impl Into<String>, price: f64) -> Self {
        self.prices.insert(code.into(), price);
        self
    }

    pub fn price(&self, code: &str) -> Option<f64> {
        self.prices.get(code).copied()
    }

    /// Converts a pre-tax amount to its tax-inclusive value.
    pub fn with_tax(&self, amount_ht: f64) -> f64 {
        amount_ht * (1.0 + self.tax_rate_pct / 100.0)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_tax_derives_ttc_from_ht() {
        let catalog = Catalog::new(20.0);
        assert!((catalog.with_tax(100.0) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_codes_have_no_price() {
        let catalog = Catalog::default().with_price("UO-DEV", 450.0);
        assert_eq!(catalog.price("UO-DEV"), Some(450.0));
        assert_eq!(catalog.price("UO-MISSING"), None);
    }
}
