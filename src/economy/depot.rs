//! Train depot: the ordered supply of trains not yet owned by any entity.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrainId(pub u32);

impl std::fmt::Display for TrainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Train({})", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,
    /// Train type ("2", "3/5", "4").
    pub name: String,
    pub distance: u32,
    pub price: i64,
}

impl Train {
    pub fn new(id: TrainId, name: impl Into<String>, distance: u32, price: i64) -> Self {
        Self {
            id,
            name: name.into(),
            distance,
            price,
        }
    }
}

/// Ordered train supply.
///
/// Only the front of `upcoming` is for sale, plus any trains discarded back
/// to the depot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depot {
    upcoming: Vec<Train>,
    discarded: Vec<Train>,
}

impl Depot {
    #[must_use]
    pub fn new(upcoming: Vec<Train>) -> Self {
        Self {
            upcoming,
            discarded: Vec::new(),
        }
    }

    /// Build a depot from `(name, distance, price, count)` rows, assigning
    /// train IDs in order.
    #[must_use]
    pub fn from_rows(rows: &[(String, u32, i64, u32)]) -> Self {
        let mut next = 0;
        let mut upcoming = Vec::new();
        for (name, distance, price, count) in rows {
            for _ in 0..*count {
                upcoming.push(Train::new(TrainId(next), name.clone(), *distance, *price));
                next += 1;
            }
        }
        Self::new(upcoming)
    }

    #[must_use]
    pub fn upcoming(&self) -> &[Train] {
        &self.upcoming
    }

    #[must_use]
    pub fn discarded(&self) -> &[Train] {
        &self.discarded
    }

    /// Trains currently for sale.
    pub fn available(&self) -> impl Iterator<Item = &Train> {
        self.upcoming.first().into_iter().chain(self.discarded.iter())
    }

    #[must_use]
    pub fn is_available(&self, id: TrainId) -> bool {
        self.available().any(|t| t.id == id)
    }

    #[must_use]
    pub fn cheapest_price(&self) -> Option<i64> {
        self.available().map(|t| t.price).min()
    }

    /// Remove an available train from the depot.
    pub fn take(&mut self, id: TrainId) -> Option<Train> {
        if self.upcoming.first().is_some_and(|t| t.id == id) {
            return Some(self.upcoming.remove(0));
        }
        let pos = self.discarded.iter().position(|t| t.id == id)?;
        Some(self.discarded.remove(pos))
    }

    pub fn discard(&mut self, train: Train) {
        self.discarded.push(train);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depot() -> Depot {
        Depot::from_rows(&[("2".to_string(), 2, 80, 2), ("4".to_string(), 4, 180, 1)])
    }

    #[test]
    fn test_from_rows_assigns_ids_in_order() {
        let depot = depot();
        let ids: Vec<_> = depot.upcoming().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(depot.upcoming()[2].name, "4");
    }

    #[test]
    fn test_only_front_is_available() {
        let mut depot = depot();

        assert!(depot.is_available(TrainId(0)));
        assert!(!depot.is_available(TrainId(1)));
        assert!(depot.take(TrainId(1)).is_none());

        let train = depot.take(TrainId(0)).unwrap();
        assert_eq!(train.price, 80);
        assert!(depot.is_available(TrainId(1)));
    }

    #[test]
    fn test_discarded_trains_are_for_sale() {
        let mut depot = depot();
        let train = depot.take(TrainId(0)).unwrap();
        depot.discard(train);

        assert!(depot.is_available(TrainId(0)));
        assert!(depot.is_available(TrainId(1)));
        assert_eq!(depot.cheapest_price(), Some(80));
        assert!(depot.take(TrainId(0)).is_some());
        assert!(depot.discarded().is_empty());
    }
}
