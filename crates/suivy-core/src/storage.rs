use std::path::PathBuf;

use suivy_domain::{ConsumptionSnapshot, TeamRoster};

use crate::CoreError;

/// Describes a persisted backup artifact for a roster.
#[derive(Debug, Clone)]
pub struct RosterBackupInfo {
    pub roster: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing team rosters,
/// their consumption snapshots, and backups. The engine never calls this
/// itself; the calling layer serializes reads and writes around it.
pub trait TeamStorage: Send + Sync {
    fn save_roster(&self, name: &str, roster: &TeamRoster) -> Result<(), CoreError>;
    fn load_roster(&self, name: &str) -> Result<TeamRoster, CoreError>;
    fn list_rosters(&self) -> Result<Vec<String>, CoreError>;
    fn delete_roster(&self, name: &str) -> Result<(), CoreError>;
    fn backup_roster(
        &self,
        name: &str,
        roster: &TeamRoster,
        note: Option<&str>,
    ) -> Result<RosterBackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<RosterBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &RosterBackupInfo) -> Result<TeamRoster, CoreError>;
    fn save_consumption(
        &self,
        name: &str,
        snapshot: &ConsumptionSnapshot,
    ) -> Result<(), CoreError>;
    fn load_consumption(&self, name: &str) -> Result<ConsumptionSnapshot, CoreError>;
}

/// Detects data-entry anomalies within a roster snapshot: rates outside
/// their domain, orders missing a start date, ledgers already past their cap.
pub fn roster_warnings(roster: &TeamRoster) -> Vec<String> {
    let mut warnings = Vec::new();

    for provider in &roster.providers {
        if !(0.0..=100.0).contains(&provider.attendance_pct) {
            warnings.push(format!(
                "provider {} has attendance {}% outside 0-100",
                provider.display_name(),
                provider.attendance_pct
            ));
        }
        for order in &provider.orders {
            if order.start_date.is_none() {
                warnings.push(format!(
                    "order {} for {} has no usable start date",
                    order.external_ref,
                    provider.display_name()
                ));
            }
            if order.ordered_days < 0.0 || order.daily_rate < 0.0 {
                warnings.push(format!(
                    "order {} for {} carries a negative day-budget or rate",
                    order.external_ref,
                    provider.display_name()
                ));
            }
            let paid_pct = crate::payment::PaymentService::paid_percentage(order);
            if paid_pct > 100.0 {
                warnings.push(format!(
                    "order {} for {} has {}% recorded in percentage payments",
                    order.external_ref,
                    provider.display_name(),
                    paid_pct
                ));
            }
        }
    }

    warnings
}
