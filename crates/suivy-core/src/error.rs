use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(Uuid),
    #[error("Order index {index} out of range for provider {provider} ({len} orders)")]
    OrderIndexOutOfRange {
        provider: Uuid,
        index: usize,
        len: usize,
    },
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),
    #[error("Invalid attendance rate: {0}")]
    InvalidAttendanceRate(f64),
    #[error("Payment rejected: {0}")]
    Overpayment(#[from] Overpayment),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Typed rejection reasons for payments. A rejected payment leaves the order
/// snapshot untouched; there is no partial acceptance.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Overpayment {
    #[error(
        "unit `{code}`: {requested} requested with {already_paid} already paid \
         exceeds the {ordered} ordered"
    )]
    UnitQuantityExceeded {
        code: String,
        ordered: f64,
        already_paid: f64,
        requested: f64,
    },
    #[error("{requested}% requested with {already_paid}% already paid exceeds 100%")]
    PercentageExceeded { already_paid: f64, requested: f64 },
}
