//! In-memory departure schedule

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::departure::{Departure, DeparturesService};
use crate::domain::tariff::TransportMode;
use crate::shared::errors::DomainResult;

pub struct InMemoryDepartures {
    schedule: RwLock<Vec<Departure>>,
}

impl InMemoryDepartures {
    pub fn new(schedule: Vec<Departure>) -> Self {
        Self {
            schedule: RwLock::new(schedule),
        }
    }

    pub async fn add(&self, departure: Departure) {
        self.schedule.write().await.push(departure);
    }

    /// Earliest departure on the lane leaving at or after `now`
    pub async fn next_departure_after(
        &self,
        origin: &str,
        destination: &str,
        transport: TransportMode,
        now: DateTime<Utc>,
    ) -> Option<Departure> {
        self.schedule
            .read()
            .await
            .iter()
            .filter(|d| d.serves(origin, destination, transport) && d.departs_at >= now)
            .min_by_key(|d| d.departs_at)
            .cloned()
    }
}

impl Default for InMemoryDepartures {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl DeparturesService for InMemoryDepartures {
    async fn next_departure(
        &self,
        origin: &str,
        destination: &str,
        transport: TransportMode,
    ) -> DomainResult<Option<Departure>> {
        Ok(self
            .next_departure_after(origin, destination, transport, Utc::now())
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn departure(transport: TransportMode, days: i64) -> Departure {
        Departure {
            origin: "China".into(),
            destination: "Cameroon".into(),
            transport,
            departs_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap() + Duration::days(days),
            label: None,
        }
    }

    #[tokio::test]
    async fn picks_earliest_future_departure_on_lane() {
        let schedule = InMemoryDepartures::new(vec![
            departure(TransportMode::Sea, 10),
            departure(TransportMode::Sea, -2),
            departure(TransportMode::Sea, 4),
            departure(TransportMode::AirNormal, 1),
        ]);
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();

        let next = schedule
            .next_departure_after("China", "Cameroon", TransportMode::Sea, now)
            .await
            .unwrap();
        assert_eq!(next.departs_at, now + Duration::days(4));

        assert!(schedule
            .next_departure_after("China", "Gabon", TransportMode::Sea, now)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn departure_at_exactly_now_counts() {
        let schedule = InMemoryDepartures::default();
        schedule.add(departure(TransportMode::AirExpress, 0)).await;
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();

        assert!(schedule
            .next_departure_after("China", "Cameroon", TransportMode::AirExpress, now)
            .await
            .is_some());
    }
}
