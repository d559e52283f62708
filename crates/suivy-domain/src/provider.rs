//! Domain models for providers and team rosters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Displayable, Identifiable, NamedEntity};
use crate::order::PurchaseOrder;

/// An external provider under contract, with the purchase orders issued to
/// them. The engine reads providers; it never mutates them in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub surname: String,
    pub given_name: String,
    pub company: String,
    /// Fraction of a working day the provider is actually present, 0-100.
    pub attendance_pct: f64,
    #[serde(default)]
    pub orders: Vec<PurchaseOrder>,
}

impl Provider {
    pub fn new(
        surname: impl Into<String>,
        given_name: impl Into<String>,
        company: impl Into<String>,
        attendance_pct: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            surname: surname.into(),
            given_name: given_name.into(),
            company: company.into(),
            attendance_pct,
            orders: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: PurchaseOrder) -> Self {
        self.orders.push(order);
        self
    }

    /// Roster display convention: "SURNAME Given".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.surname.to_uppercase(), self.given_name)
    }

    /// Orders ascending by start date, date-less orders last.
    pub fn sorted_orders(&self) -> Vec<&PurchaseOrder> {
        let mut orders: Vec<&PurchaseOrder> = self.orders.iter().collect();
        orders.sort_by_key(|order| order.start_sort_key());
        orders
    }

    pub fn order(&self, id: Uuid) -> Option<&PurchaseOrder> {
        self.orders.iter().find(|order| order.id == id)
    }
}

impl Identifiable for Provider {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Provider {
    fn name(&self) -> &str {
        &self.surname
    }
}

impl Displayable for Provider {
    fn display_label(&self) -> String {
        format!("{} ({})", self.display_name(), self.company)
    }
}

/// A named collection of providers, persisted and edited as one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRoster {
    pub name: String,
    pub providers: Vec<Provider>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamRoster {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            providers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_provider(&mut self, provider: Provider) -> Uuid {
        let id = provider.id;
        self.providers.push(provider);
        self.updated_at = Utc::now();
        id
    }

    pub fn provider(&self, id: Uuid) -> Option<&Provider> {
        self.providers.iter().find(|provider| provider.id == id)
    }

    /// Replaces a provider snapshot, bumping the roster's updated timestamp.
    pub fn replace_provider(&mut self, provider: Provider) -> bool {
        match self.providers.iter_mut().find(|p| p.id == provider.id) {
            Some(slot) => {
                *slot = provider;
                self.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

impl NamedEntity for TeamRoster {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DayMoment;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn display_name_uppercases_the_surname() {
        let provider = Provider::new("Dupont", "Martin", "Acme Conseil", 100.0);
        assert_eq!(provider.display_name(), "DUPONT Martin");
    }

    #[test]
    fn sorted_orders_put_undated_orders_last() {
        let provider = Provider::new("Durand", "Julie", "Acme Conseil", 100.0)
            .with_order(PurchaseOrder::new("EJ-3", "S-3", 5.0, 400.0))
            .with_order(
                PurchaseOrder::new("EJ-2", "S-2", 5.0, 400.0)
                    .with_start(date(2024, 3, 1), DayMoment::Morning),
            )
            .with_order(
                PurchaseOrder::new("EJ-1", "S-1", 5.0, 400.0)
                    .with_start(date(2024, 1, 1), DayMoment::Morning),
            );

        let sorted = provider.sorted_orders();
        let refs: Vec<&str> = sorted.iter().map(|o| o.external_ref.as_str()).collect();
        assert_eq!(refs, vec!["EJ-1", "EJ-2", "EJ-3"]);
    }

    #[test]
    fn replace_provider_swaps_the_snapshot() {
        let mut roster = TeamRoster::new("Plateau");
        let id = roster.add_provider(Provider::new("Petit", "Thomas", "Acme", 80.0));
        let mut updated = roster.provider(id).unwrap().clone();
        updated.attendance_pct = 60.0;
        assert!(roster.replace_provider(updated));
        assert_eq!(roster.provider(id).unwrap().attendance_pct, 60.0);

        let stranger = Provider::new("Inconnu", "X", "Acme", 50.0);
        assert!(!roster.replace_provider(stranger));
    }
}
