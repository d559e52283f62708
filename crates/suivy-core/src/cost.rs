//! Month-by-month cost distribution across a provider's purchase orders.

use std::collections::BTreeMap;

use suivy_domain::{
    ConsumptionHistory, ConsumptionSnapshot, CostCurve, MonthlyCost, OrderCost, PeriodKey,
    Provider, PurchaseOrder, TeamRoster,
};

use crate::EPSILON;

/// Distributes each period's consumed days over the order sequence with one
/// cursor shared across the provider's entire history, so consumption booked
/// in a later month keeps filling wherever the earlier months stopped.
pub struct CostService;

impl CostService {
    pub fn distribute(provider: &Provider, history: &ConsumptionHistory) -> CostCurve {
        let orders = provider.sorted_orders();
        let mut cumulative_days = 0.0_f64;
        let mut points = Vec::new();

        // Periods iterate in ascending order; the cursor never moves back.
        for (&period, &days) in history.entries() {
            let mut days_left = days;
            let mut by_order: Vec<OrderCost> = Vec::new();

            while days_left > EPSILON {
                match covering_order(&orders, cumulative_days) {
                    Some((order, range_high)) => {
                        let portion = days_left.min(range_high - cumulative_days);
                        accrue(&mut by_order, order, portion);
                        cumulative_days += portion;
                        days_left -= portion;
                    }
                    None => {
                        // Every order exhausted: unbudgeted overrun priced at
                        // the last known rate.
                        if let Some(&last) = orders.last() {
                            accrue(&mut by_order, last, days_left);
                            cumulative_days += days_left;
                        }
                        days_left = 0.0;
                    }
                }
            }

            let total = by_order.iter().map(|cost| cost.cost).sum();
            points.push(MonthlyCost {
                period,
                by_order,
                total,
            });
        }

        CostCurve {
            provider_id: provider.id,
            points,
        }
    }

    /// Curves for every provider in the roster with a recorded history.
    pub fn curves(roster: &TeamRoster, consumption: &ConsumptionSnapshot) -> Vec<CostCurve> {
        roster
            .providers
            .iter()
            .filter_map(|provider| {
                consumption
                    .history(provider.id)
                    .map(|history| Self::distribute(provider, history))
            })
            .collect()
    }

    /// Sums period totals across providers into one global cost curve.
    pub fn aggregate(curves: &[CostCurve]) -> BTreeMap<PeriodKey, f64> {
        let mut totals: BTreeMap<PeriodKey, f64> = BTreeMap::new();
        for curve in curves {
            for point in &curve.points {
                *totals.entry(point.period).or_insert(0.0) += point.total;
            }
        }
        totals
    }
}

/// First order whose cumulative day-range covers the cursor: lower bound
/// inclusive, tolerance on the upper bound so a cursor within epsilon of an
/// order's end counts as having exhausted it.
fn covering_order<'a>(
    orders: &[&'a PurchaseOrder],
    cursor: f64,
) -> Option<(&'a PurchaseOrder, f64)> {
    let mut range_low = 0.0_f64;
    for &order in orders {
        let range_high = range_low + order.ordered_days;
        if cursor >= range_low && cursor < range_high - EPSILON {
            return Some((order, range_high));
        }
        range_low = range_high;
    }
    None
}

fn accrue(by_order: &mut Vec<OrderCost>, order: &PurchaseOrder, portion: f64) {
    let cost = portion * order.daily_rate;
    match by_order.iter_mut().find(|entry| entry.order_id == order.id) {
        Some(entry) => {
            entry.days += portion;
            entry.cost += cost;
        }
        None => by_order.push(OrderCost {
            order_id: order.id,
            external_ref: order.external_ref.clone(),
            days: portion,
            cost,
        }),
    }
}
