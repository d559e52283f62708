//! Domain models for payments recorded against purchase orders.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Displayable, Identifiable};
use crate::order::UnitOrder;

/// A partial payment against one purchase order. Payments are append-only:
/// only the external service reference may be corrected after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub request_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ref: Option<String>,
    pub kind: PaymentKind,
}

impl Payment {
    pub fn units(request_date: NaiveDate, lines: Vec<UnitOrder>) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_date,
            service_ref: None,
            kind: PaymentKind::Units { lines },
        }
    }

    pub fn percentage(request_date: NaiveDate, percent: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_date,
            service_ref: None,
            kind: PaymentKind::Percentage { percent },
        }
    }

    pub fn with_service_ref(mut self, service_ref: impl Into<String>) -> Self {
        self.service_ref = Some(service_ref.into());
        self
    }
}

impl Identifiable for Payment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Payment {
    fn display_label(&self) -> String {
        format!("payment:{} [{}]", self.id, self.kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
/// Distinguishes unit-quantity payments from percentage-of-total payments.
pub enum PaymentKind {
    #[serde(rename = "unit")]
    Units { lines: Vec<UnitOrder> },
    Percentage { percent: f64 },
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentKind::Units { lines } => write!(f, "unit x{}", lines.len()),
            PaymentKind::Percentage { percent } => write!(f, "{percent}%"),
        }
    }
}
