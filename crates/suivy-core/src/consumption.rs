//! Cut-off-scoped refresh of consumption histories.

use suivy_domain::{ConsumptionHistory, ConsumptionSnapshot, PeriodKey};

/// Applies freshly ingested consumption to stored histories. Periods at or
/// before the analysis cut-off are overwritten (last import wins); periods
/// after it are preserved untouched. A new snapshot is returned; inputs are
/// never mutated.
pub struct ConsumptionService;

impl ConsumptionService {
    pub fn refresh(
        stored: &ConsumptionHistory,
        incoming: &ConsumptionHistory,
        cutoff: PeriodKey,
    ) -> ConsumptionHistory {
        let mut refreshed = stored.clone();
        for (&period, &days) in incoming.entries() {
            if period <= cutoff {
                refreshed.set(period, days);
            }
        }
        refreshed
    }

    pub fn refresh_snapshot(
        stored: &ConsumptionSnapshot,
        incoming: &ConsumptionSnapshot,
        cutoff: PeriodKey,
    ) -> ConsumptionSnapshot {
        let mut refreshed = stored.clone();
        for (&provider_id, history) in incoming.histories() {
            let base = stored.history(provider_id).cloned().unwrap_or_default();
            refreshed.set_history(provider_id, Self::refresh(&base, history, cutoff));
        }
        refreshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn periods_at_or_before_the_cutoff_are_overwritten() {
        let stored = ConsumptionHistory::new()
            .with_period(PeriodKey::Initial, 3.0)
            .with_period(PeriodKey::month(2024, 1), 8.0)
            .with_period(PeriodKey::month(2024, 2), 5.0);
        let incoming = ConsumptionHistory::new()
            .with_period(PeriodKey::Initial, 4.0)
            .with_period(PeriodKey::month(2024, 1), 6.5)
            .with_period(PeriodKey::month(2024, 2), 9.0);

        let refreshed =
            ConsumptionService::refresh(&stored, &incoming, PeriodKey::month(2024, 1));

        assert_eq!(refreshed.get(PeriodKey::Initial), Some(4.0));
        assert_eq!(refreshed.get(PeriodKey::month(2024, 1)), Some(6.5));
        // Past the cut-off: the stored value survives.
        assert_eq!(refreshed.get(PeriodKey::month(2024, 2)), Some(5.0));
    }

    #[test]
    fn refresh_never_drops_stored_periods_missing_from_the_import() {
        let stored = ConsumptionHistory::new()
            .with_period(PeriodKey::month(2023, 12), 2.0)
            .with_period(PeriodKey::month(2024, 1), 8.0);
        let incoming = ConsumptionHistory::new().with_period(PeriodKey::month(2024, 1), 7.0);

        let refreshed =
            ConsumptionService::refresh(&stored, &incoming, PeriodKey::month(2024, 1));
        assert_eq!(refreshed.get(PeriodKey::month(2023, 12)), Some(2.0));
        assert_eq!(refreshed.get(PeriodKey::month(2024, 1)), Some(7.0));
    }

    #[test]
    fn snapshot_refresh_adds_providers_seen_for_the_first_time() {
        let known = Uuid::new_v4();
        let newcomer = Uuid::new_v4();
        let stored = ConsumptionSnapshot::new().with_history(
            known,
            ConsumptionHistory::new().with_period(PeriodKey::month(2024, 1), 8.0),
        );
        let incoming = ConsumptionSnapshot::new()
            .with_history(
                known,
                ConsumptionHistory::new().with_period(PeriodKey::month(2024, 1), 9.0),
            )
            .with_history(
                newcomer,
                ConsumptionHistory::new().with_period(PeriodKey::month(2024, 1), 1.5),
            );

        let refreshed = ConsumptionService::refresh_snapshot(
            &stored,
            &incoming,
            PeriodKey::month(2024, 1),
        );
        assert_eq!(refreshed.total_for(known), 9.0);
        assert_eq!(refreshed.total_for(newcomer), 1.5);
    }
}
