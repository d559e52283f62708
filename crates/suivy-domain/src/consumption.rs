//! Per-provider consumption histories keyed by period.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::PeriodKey;

/// Day counts consumed per period for a single provider, in half-day
/// increments. One entry per period; re-imports overwrite, never add.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionHistory {
    entries: BTreeMap<PeriodKey, f64>,
}

impl ConsumptionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, period: PeriodKey, days: f64) {
        self.entries.insert(period, days);
    }

    pub fn with_period(mut self, period: PeriodKey, days: f64) -> Self {
        self.set(period, days);
        self
    }

    pub fn get(&self, period: PeriodKey) -> Option<f64> {
        self.entries.get(&period).copied()
    }

    /// Periods in ascending order, `Initial` first.
    pub fn entries(&self) -> impl Iterator<Item = (&PeriodKey, &f64)> {
        self.entries.iter()
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Consumption histories for a whole team, keyed by the resolved provider id.
/// Identity resolution happens upstream at ingestion; the engine never joins
/// on free-text names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionSnapshot {
    per_provider: BTreeMap<Uuid, ConsumptionHistory>,
}

impl ConsumptionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_history(&mut self, provider_id: Uuid, history: ConsumptionHistory) {
        self.per_provider.insert(provider_id, history);
    }

    pub fn with_history(mut self, provider_id: Uuid, history: ConsumptionHistory) -> Self {
        self.set_history(provider_id, history);
        self
    }

    pub fn history(&self, provider_id: Uuid) -> Option<&ConsumptionHistory> {
        self.per_provider.get(&provider_id)
    }

    pub fn histories(&self) -> impl Iterator<Item = (&Uuid, &ConsumptionHistory)> {
        self.per_provider.iter()
    }

    /// Total consumed days for a provider, zero when none were recorded.
    pub fn total_for(&self, provider_id: Uuid) -> f64 {
        self.history(provider_id)
            .map(ConsumptionHistory::total)
            .unwrap_or(0.0)
    }
}
