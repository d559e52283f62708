//! Output snapshots produced by the engine: allocation report rows, monthly
//! cost curves, and payment summaries.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{DayMoment, PeriodKey};
use crate::order::UnitOrder;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Lifecycle state of an order under the chronological bucket rule.
pub enum OrderState {
    Completed,
    InProgress,
    Future,
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderState::Completed => "Completed",
            OrderState::InProgress => "In progress",
            OrderState::Future => "Future",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Outcome of an exhaustion projection. `Closed` marks orders already fully
/// consumed, for which no projection runs.
pub enum EndEstimate {
    Closed,
    AlreadyComplete,
    Never,
    On { date: NaiveDate, moment: DayMoment },
}

impl fmt::Display for EndEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndEstimate::Closed => f.write_str("Closed"),
            EndEstimate::AlreadyComplete => f.write_str("Already complete"),
            EndEstimate::Never => f.write_str("Never"),
            EndEstimate::On { date, moment } => write!(f, "{} ({})", date, moment),
        }
    }
}

/// One line of the allocation report: a single order for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderReportRow {
    pub provider_id: Uuid,
    pub provider_name: String,
    pub company: String,
    pub order_id: Uuid,
    pub external_ref: String,
    pub billing_ref: String,
    pub state: OrderState,
    pub ordered_days: f64,
    pub daily_rate: f64,
    pub amount_ht: f64,
    pub start_date: Option<NaiveDate>,
    pub consumed_days: f64,
    pub remaining_days: f64,
    pub estimated_end: EndEstimate,
    pub unit_orders: Vec<UnitOrder>,
}

impl OrderReportRow {
    /// Report convention: order amounts read in thousands of currency units.
    pub fn amount_keur(&self) -> f64 {
        self.amount_ht / 1000.0
    }
}

/// Cost attributed to one order within one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderCost {
    pub order_id: Uuid,
    pub external_ref: String,
    pub days: f64,
    pub cost: f64,
}

/// Costs for one period, split by order, with the period total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyCost {
    pub period: PeriodKey,
    pub by_order: Vec<OrderCost>,
    pub total: f64,
}

/// A provider's month-by-month cost curve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostCurve {
    pub provider_id: Uuid,
    pub points: Vec<MonthlyCost>,
}

impl CostCurve {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|point| point.total).sum()
    }
}

/// Monetary position of one order's payment ledger. TTC values are always
/// derived from HT, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentSummary {
    pub total_ht: f64,
    pub total_ttc: f64,
    pub paid_ht: f64,
    pub paid_ttc: f64,
    pub remaining_ht: f64,
    pub remaining_ttc: f64,
}

impl PaymentSummary {
    pub fn from_parts(total_ht: f64, paid_ht: f64, tax_rate_pct: f64) -> Self {
        let ttc = |amount: f64| amount * (1.0 + tax_rate_pct / 100.0);
        let remaining_ht = (total_ht - paid_ht).max(0.0);
        Self {
            total_ht,
            total_ttc: ttc(total_ht),
            paid_ht,
            paid_ttc: ttc(paid_ht),
            remaining_ht,
            remaining_ttc: ttc(remaining_ht),
        }
    }
}
