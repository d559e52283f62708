//! Domain models for purchase orders and their catalog line items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::payment::Payment;

/// A catalog line item: a priced unit code and the quantity ordered or paid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitOrder {
    pub code: String,
    pub quantity: f64,
}

impl UnitOrder {
    pub fn new(code: impl Into<String>, quantity: f64) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }
}

/// A contracted day-budget issued to a provider, referenced in two external
/// ticketing systems and consumed in half-day increments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub external_ref: String,
    pub billing_ref: String,
    pub ordered_days: f64,
    pub daily_rate: f64,
    #[serde(default, with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_moment: DayMoment,
    #[serde(default)]
    pub unit_orders: Vec<UnitOrder>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl PurchaseOrder {
    pub fn new(
        external_ref: impl Into<String>,
        billing_ref: impl Into<String>,
        ordered_days: f64,
        daily_rate: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_ref: external_ref.into(),
            billing_ref: billing_ref.into(),
            ordered_days,
            daily_rate,
            start_date: None,
            start_moment: DayMoment::Morning,
            unit_orders: Vec::new(),
            payments: Vec::new(),
        }
    }

    pub fn with_start(mut self, date: NaiveDate, moment: DayMoment) -> Self {
        self.start_date = Some(date);
        self.start_moment = moment;
        self
    }

    pub fn with_unit_order(mut self, unit: UnitOrder) -> Self {
        self.unit_orders.push(unit);
        self
    }

    /// Ordered monetary value: day-budget times daily rate, in currency HT.
    pub fn ordered_amount(&self) -> f64 {
        self.ordered_days * self.daily_rate
    }

    /// Total quantity ordered for a unit code across all line items.
    pub fn ordered_quantity(&self, code: &str) -> f64 {
        self.unit_orders
            .iter()
            .filter(|unit| unit.code == code)
            .map(|unit| unit.quantity)
            .sum()
    }

    /// Sort key implementing the "orders with no start date sort last" rule.
    pub fn start_sort_key(&self) -> NaiveDate {
        self.start_date.unwrap_or(NaiveDate::MAX)
    }
}

impl Identifiable for PurchaseOrder {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for PurchaseOrder {
    fn display_label(&self) -> String {
        format!("order:{} [{}]", self.external_ref, self.billing_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_amount_is_days_times_rate() {
        let order = PurchaseOrder::new("EJ-100", "SRV-1", 20.0, 500.0);
        assert_eq!(order.ordered_amount(), 10_000.0);
    }

    #[test]
    fn ordered_quantity_sums_repeated_codes() {
        let order = PurchaseOrder::new("EJ-100", "SRV-1", 20.0, 500.0)
            .with_unit_order(UnitOrder::new("UO-DEV", 3.0))
            .with_unit_order(UnitOrder::new("UO-DEV", 2.0))
            .with_unit_order(UnitOrder::new("UO-REC", 1.0));
        assert_eq!(order.ordered_quantity("UO-DEV"), 5.0);
        assert_eq!(order.ordered_quantity("UO-REC"), 1.0);
        assert_eq!(order.ordered_quantity("UO-MISSING"), 0.0);
    }

    #[test]
    fn missing_start_date_sorts_after_any_real_date() {
        let dated = PurchaseOrder::new("EJ-1", "S-1", 1.0, 100.0)
            .with_start(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                DayMoment::Morning,
            );
        let undated = PurchaseOrder::new("EJ-2", "S-2", 1.0, 100.0);
        assert!(dated.start_sort_key() < undated.start_sort_key());
    }

    #[test]
    fn malformed_start_date_deserializes_to_none() {
        let raw = r#"{
            "id": "7f4df1f2-5f73-4b41-9b4f-1fbe3e9f7a01",
            "external_ref": "EJ-1",
            "billing_ref": "S-1",
            "ordered_days": 5.0,
            "daily_rate": 450.0,
            "start_date": "not-a-date"
        }"#;
        let order: PurchaseOrder = serde_json::from_str(raw).unwrap();
        assert_eq!(order.start_date, None);
        assert_eq!(order.start_moment, DayMoment::Morning);
    }
}
