//! Payment validation and ledger summaries for purchase orders.

use std::collections::BTreeMap;

use uuid::Uuid;

use suivy_domain::{
    Catalog, Payment, PaymentKind, PaymentSummary, Provider, PurchaseOrder, TeamRoster,
};

use crate::{
    error::{CoreError, Overpayment},
    pricing::PricingService,
};

/// Slack allowed on the percentage cap, in percentage points.
const PERCENT_EPSILON: f64 = 0.1;

/// Validates payments against an order and produces new order snapshots.
/// Every operation is all-or-nothing: a rejected payment returns an error and
/// the caller's snapshot is never touched.
pub struct PaymentService;

impl PaymentService {
    /// Appends a payment to a copy of the order after validating it in full.
    pub fn record(order: &PurchaseOrder, payment: Payment) -> Result<PurchaseOrder, CoreError> {
        Self::validate(order, &payment)?;
        let mut accepted = order.clone();
        accepted.payments.push(payment);
        Ok(accepted)
    }

    /// Records a payment on one of a roster provider's orders, addressed by
    /// provider id and order index, returning the new provider snapshot.
    pub fn record_at(
        roster: &TeamRoster,
        provider_id: Uuid,
        order_index: usize,
        payment: Payment,
    ) -> Result<Provider, CoreError> {
        let provider = roster
            .provider(provider_id)
            .ok_or(CoreError::ProviderNotFound(provider_id))?;
        let order = provider
            .orders
            .get(order_index)
            .ok_or(CoreError::OrderIndexOutOfRange {
                provider: provider_id,
                index: order_index,
                len: provider.orders.len(),
            })?;

        let accepted = Self::record(order, payment)?;
        let mut updated = provider.clone();
        updated.orders[order_index] = accepted;
        Ok(updated)
    }

    /// Corrects a payment's external service reference. Monetary validation
    /// is untouched: only the metadata changes.
    pub fn amend_service_ref(
        order: &PurchaseOrder,
        payment_id: Uuid,
        service_ref: impl Into<String>,
    ) -> Result<PurchaseOrder, CoreError> {
        let mut amended = order.clone();
        let payment = amended
            .payments
            .iter_mut()
            .find(|payment| payment.id == payment_id)
            .ok_or(CoreError::PaymentNotFound(payment_id))?;
        payment.service_ref = Some(service_ref.into());
        Ok(amended)
    }

    /// Quantity already paid for a unit code across the order's payments.
    pub fn paid_quantity(order: &PurchaseOrder, code: &str) -> f64 {
        order
            .payments
            .iter()
            .filter_map(|payment| match &payment.kind {
                PaymentKind::Units { lines } => Some(lines),
                PaymentKind::Percentage { .. } => None,
            })
            .flatten()
            .filter(|line| line.code == code)
            .map(|line| line.quantity)
            .sum()
    }

    /// Sum of the order's percentage-based payments.
    pub fn paid_percentage(order: &PurchaseOrder) -> f64 {
        order
            .payments
            .iter()
            .filter_map(|payment| match payment.kind {
                PaymentKind::Percentage { percent } => Some(percent),
                PaymentKind::Units { .. } => None,
            })
            .sum()
    }

    /// Pre-tax amount paid so far: unit lines priced by the catalog,
    /// percentages applied to the order's catalog-derived total.
    pub fn paid_ht(order: &PurchaseOrder, catalog: &Catalog) -> f64 {
        let total_ht = PricingService::order_total_ht(catalog, order);
        order
            .payments
            .iter()
            .map(|payment| match &payment.kind {
                PaymentKind::Units { lines } => PricingService::lines_total_ht(catalog, lines),
                PaymentKind::Percentage { percent } => percent / 100.0 * total_ht,
            })
            .sum()
    }

    /// Monetary position of the order's ledger, TTC derived from HT.
    pub fn summarize(order: &PurchaseOrder, catalog: &Catalog) -> PaymentSummary {
        PaymentSummary::from_parts(
            PricingService::order_total_ht(catalog, order),
            Self::paid_ht(order, catalog),
            catalog.tax_rate_pct,
        )
    }

    fn validate(order: &PurchaseOrder, payment: &Payment) -> Result<(), CoreError> {
        match &payment.kind {
            PaymentKind::Units { lines } => {
                // A single submission may repeat a code; validate the
                // aggregated quantities so acceptance stays atomic.
                let mut requested: BTreeMap<&str, f64> = BTreeMap::new();
                for line in lines {
                    *requested.entry(line.code.as_str()).or_insert(0.0) += line.quantity;
                }
                for (code, quantity) in requested {
                    let ordered = order.ordered_quantity(code);
                    let already_paid = Self::paid_quantity(order, code);
                    if already_paid + quantity > ordered {
                        return Err(Overpayment::UnitQuantityExceeded {
                            code: code.to_string(),
                            ordered,
                            already_paid,
                            requested: quantity,
                        }
                        .into());
                    }
                }
                Ok(())
            }
            PaymentKind::Percentage { percent } => {
                let already_paid = Self::paid_percentage(order);
                if already_paid + percent > 100.0 + PERCENT_EPSILON {
                    return Err(Overpayment::PercentageExceeded {
                        already_paid,
                        requested: *percent,
                    }
                    .into());
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use suivy_domain::UnitOrder;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::new(20.0)
            .with_price("UO-DEV", 450.0)
            .with_price("UO-REC", 900.0)
    }

    fn order_with_units() -> PurchaseOrder {
        PurchaseOrder::new("EJ-1", "S-1", 10.0, 450.0)
            .with_unit_order(UnitOrder::new("UO-DEV", 8.0))
            .with_unit_order(UnitOrder::new("UO-REC", 2.0))
    }

    #[test]
    fn unit_payments_accumulate_until_the_ordered_quantity() {
        let order = order_with_units();
        let order = PaymentService::record(
            &order,
            Payment::units(date(2024, 2, 1), vec![UnitOrder::new("UO-DEV", 5.0)]),
        )
        .unwrap();
        let order = PaymentService::record(
            &order,
            Payment::units(date(2024, 3, 1), vec![UnitOrder::new("UO-DEV", 3.0)]),
        )
        .unwrap();

        assert_eq!(PaymentService::paid_quantity(&order, "UO-DEV"), 8.0);
        let rejected = PaymentService::record(
            &order,
            Payment::units(date(2024, 4, 1), vec![UnitOrder::new("UO-DEV", 0.5)]),
        );
        assert!(matches!(
            rejected,
            Err(CoreError::Overpayment(Overpayment::UnitQuantityExceeded { .. }))
        ));
    }

    #[test]
    fn a_payment_with_one_bad_line_is_rejected_whole() {
        let order = order_with_units();
        let rejected = PaymentService::record(
            &order,
            Payment::units(
                date(2024, 2, 1),
                vec![
                    UnitOrder::new("UO-REC", 1.0),
                    UnitOrder::new("UO-DEV", 9.0), // exceeds the 8 ordered
                ],
            ),
        );
        assert!(rejected.is_err());
        // The good line was not applied either.
        assert_eq!(PaymentService::paid_quantity(&order, "UO-REC"), 0.0);
        assert!(order.payments.is_empty());
    }

    #[test]
    fn repeated_codes_in_one_submission_are_validated_together() {
        let order = order_with_units();
        let rejected = PaymentService::record(
            &order,
            Payment::units(
                date(2024, 2, 1),
                vec![
                    UnitOrder::new("UO-DEV", 5.0),
                    UnitOrder::new("UO-DEV", 4.0),
                ],
            ),
        );
        assert!(rejected.is_err());
    }

    #[test]
    fn percentage_payments_cap_at_one_hundred_with_slack() {
        let order = order_with_units();
        let order =
            PaymentService::record(&order, Payment::percentage(date(2024, 2, 1), 60.0)).unwrap();
        let rejected = PaymentService::record(&order, Payment::percentage(date(2024, 3, 1), 41.0));
        assert!(matches!(
            rejected,
            Err(CoreError::Overpayment(Overpayment::PercentageExceeded { .. }))
        ));
        // The ledger still holds only the accepted 60%.
        assert_eq!(PaymentService::paid_percentage(&order), 60.0);

        // 40.05 squeaks under the 0.1 point slack.
        let accepted = PaymentService::record(&order, Payment::percentage(date(2024, 3, 1), 40.05));
        assert!(accepted.is_ok());
    }

    #[test]
    fn summaries_derive_ttc_and_never_go_negative() {
        let catalog = catalog();
        let order = order_with_units();
        // Total HT: 8 x 450 + 2 x 900 = 5400.
        let order =
            PaymentService::record(&order, Payment::percentage(date(2024, 2, 1), 50.0)).unwrap();

        let summary = PaymentService::summarize(&order, &catalog);
        assert_eq!(summary.total_ht, 5400.0);
        assert_eq!(summary.paid_ht, 2700.0);
        assert!((summary.paid_ttc - 3240.0).abs() < 1e-9);
        assert_eq!(summary.remaining_ht, 2700.0);
    }

    #[test]
    fn amending_a_service_ref_leaves_amounts_alone() {
        let catalog = catalog();
        let order = order_with_units();
        let order =
            PaymentService::record(&order, Payment::percentage(date(2024, 2, 1), 30.0)).unwrap();
        let payment_id = order.payments[0].id;

        let amended = PaymentService::amend_service_ref(&order, payment_id, "SF-0042").unwrap();
        assert_eq!(
            amended.payments[0].service_ref.as_deref(),
            Some("SF-0042")
        );
        assert_eq!(
            PaymentService::summarize(&amended, &catalog),
            PaymentService::summarize(&order, &catalog)
        );

        let missing = PaymentService::amend_service_ref(&order, Uuid::new_v4(), "SF-0001");
        assert!(matches!(missing, Err(CoreError::PaymentNotFound(_))));
    }

    #[test]
    fn roster_addressing_errors_abort_without_mutation() {
        let mut roster = TeamRoster::new("Plateau");
        let provider_id = roster.add_provider(
            Provider::new("Dupont", "Martin", "Acme", 100.0).with_order(order_with_units()),
        );

        let unknown = PaymentService::record_at(
            &roster,
            Uuid::new_v4(),
            0,
            Payment::percentage(date(2024, 2, 1), 10.0),
        );
        assert!(matches!(unknown, Err(CoreError::ProviderNotFound(_))));

        let out_of_range = PaymentService::record_at(
            &roster,
            provider_id,
            7,
            Payment::percentage(date(2024, 2, 1), 10.0),
        );
        assert!(matches!(
            out_of_range,
            Err(CoreError::OrderIndexOutOfRange { index: 7, .. })
        ));

        let updated = PaymentService::record_at(
            &roster,
            provider_id,
            0,
            Payment::percentage(date(2024, 2, 1), 10.0),
        )
        .unwrap();
        assert_eq!(updated.orders[0].payments.len(), 1);
        // The roster's own snapshot is untouched.
        assert!(roster.provider(provider_id).unwrap().orders[0]
            .payments
            .is_empty());
    }
}
