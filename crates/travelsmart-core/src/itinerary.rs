//! Ordered itinerary and the edits the planner UI performs on it.
//!
//! An `Itinerary` value is treated as an immutable snapshot by the route
//! pipeline: edits happen on a clone which then replaces the current one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CoreError;
use crate::models::{legs, Coordinate, Destination, DestinationId, Leg, TransportMode};

/// Request to append a destination; the id is assigned by the itinerary.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDestination {
    pub city: String,
    pub coordinates: Coordinate,
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default)]
    pub transport: TransportMode,
}

fn default_days() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Destination>", into = "Vec<Destination>")]
pub struct Itinerary {
    destinations: Vec<Destination>,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an itinerary, rejecting duplicate ids and zero-day stays.
    pub fn from_destinations(destinations: Vec<Destination>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(destinations.len());
        for destination in &destinations {
            destination.validate()?;
            if !seen.insert(destination.id) {
                return Err(CoreError::DuplicateDestination(destination.id));
            }
        }
        Ok(Self { destinations })
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn get(&self, id: DestinationId) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    pub fn legs(&self) -> impl Iterator<Item = Leg<'_>> + '_ {
        legs(&self.destinations)
    }

    /// Sum of all stays, in days.
    pub fn total_days(&self) -> u64 {
        self.destinations.iter().map(|d| u64::from(d.days)).sum()
    }

    /// Append a destination and return its new id (one past the highest id in use).
    pub fn add(&mut self, new: NewDestination) -> Result<DestinationId, CoreError> {
        let id = match self.destinations.iter().map(|d| d.id).max() {
            Some(max) => max.checked_add(1).ok_or(CoreError::IdsExhausted(max))?,
            None => 1,
        };
        let destination = Destination {
            id,
            city: new.city.trim().to_string(),
            coordinates: new.coordinates,
            days: new.days,
            transport: new.transport,
        };
        destination.validate()?;
        self.destinations.push(destination);
        Ok(id)
    }

    /// Move the entry at `from` to position `to`, shifting the rest.
    ///
    /// Returns false when nothing moved.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, CoreError> {
        let len = self.destinations.len();
        for index in [from, to] {
            if index >= len {
                return Err(CoreError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(false);
        }
        let moved = self.destinations.remove(from);
        self.destinations.insert(to, moved);
        Ok(true)
    }

    pub fn set_days(&mut self, id: DestinationId, days: u32) -> Result<(), CoreError> {
        if days < 1 {
            return Err(CoreError::InvalidDays { id, days });
        }
        self.get_mut(id)?.days = days;
        Ok(())
    }

    pub fn set_transport(&mut self, id: DestinationId, transport: TransportMode) -> Result<(), CoreError> {
        self.get_mut(id)?.transport = transport;
        Ok(())
    }

    pub fn remove(&mut self, id: DestinationId) -> Result<Destination, CoreError> {
        let index = self
            .destinations
            .iter()
            .position(|d| d.id == id)
            .ok_or(CoreError::UnknownDestination(id))?;
        Ok(self.destinations.remove(index))
    }

    fn get_mut(&mut self, id: DestinationId) -> Result<&mut Destination, CoreError> {
        self.destinations
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(CoreError::UnknownDestination(id))
    }
}

impl TryFrom<Vec<Destination>> for Itinerary {
    type Error = CoreError;

    fn try_from(value: Vec<Destination>) -> Result<Self, Self::Error> {
        Itinerary::from_destinations(value)
    }
}

impl From<Itinerary> for Vec<Destination> {
    fn from(value: Itinerary) -> Self {
        value.destinations
    }
}

/// Four-city European sample trip used to seed a fresh planner.
pub fn demo_itinerary() -> Itinerary {
    let stops = [
        (1, "Madrid", -3.7038, 40.4168, 2),
        (2, "París", 2.3522, 48.8566, 3),
        (3, "Ámsterdam", 4.8952, 52.3702, 2),
        (4, "Roma", 12.4964, 41.9028, 4),
    ];
    let destinations = stops
        .into_iter()
        .filter_map(|(id, city, lon, lat, days)| {
            Coordinate::new(lon, lat)
                .ok()
                .map(|coordinates| Destination::new(id, city, coordinates, days))
        })
        .collect();
    Itinerary { destinations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(itinerary: &Itinerary) -> Vec<DestinationId> {
        itinerary.destinations().iter().map(|d| d.id).collect()
    }

    fn barcelona() -> NewDestination {
        NewDestination {
            city: "Barcelona".to_string(),
            coordinates: Coordinate::new(2.1734, 41.3851).unwrap(),
            days: 2,
            transport: TransportMode::Unspecified,
        }
    }

    #[test]
    fn demo_has_four_stops() {
        let demo = demo_itinerary();
        assert_eq!(ids(&demo), vec![1, 2, 3, 4]);
        assert_eq!(demo.total_days(), 11);
        assert_eq!(demo.legs().count(), 3);
    }

    #[test]
    fn add_assigns_next_id_after_highest() {
        let mut itinerary = demo_itinerary();
        itinerary.reorder(3, 0).unwrap();

        let id = itinerary.add(barcelona()).unwrap();
        assert_eq!(id, 5);
        assert_eq!(ids(&itinerary), vec![4, 1, 2, 3, 5]);

        let mut empty = Itinerary::new();
        assert_eq!(empty.add(barcelona()).unwrap(), 1);
    }

    #[test]
    fn add_fails_cleanly_when_ids_run_out() {
        let last = Destination::new(u64::MAX, "Edge", Coordinate::new(0.0, 0.0).unwrap(), 1);
        let mut itinerary = Itinerary::from_destinations(vec![last]).unwrap();

        assert_eq!(
            itinerary.add(barcelona()),
            Err(CoreError::IdsExhausted(u64::MAX))
        );
        assert_eq!(itinerary.len(), 1);
    }

    #[test]
    fn total_days_does_not_overflow() {
        let stays = (1..=3)
            .map(|id| Destination::new(id, "Long stay", Coordinate::new(0.0, 0.0).unwrap(), 4_000_000_000))
            .collect();
        let itinerary = Itinerary::from_destinations(stays).unwrap();
        assert_eq!(itinerary.total_days(), 12_000_000_000);
    }

    #[test]
    fn add_rejects_zero_days() {
        let mut itinerary = Itinerary::new();
        let mut stop = barcelona();
        stop.days = 0;
        assert!(matches!(itinerary.add(stop), Err(CoreError::InvalidDays { .. })));
        assert!(itinerary.is_empty());
    }

    #[test]
    fn reorder_moves_like_a_splice() {
        let mut itinerary = demo_itinerary();
        assert!(itinerary.reorder(0, 2).unwrap());
        assert_eq!(ids(&itinerary), vec![2, 3, 1, 4]);

        assert!(itinerary.reorder(3, 1).unwrap());
        assert_eq!(ids(&itinerary), vec![2, 4, 3, 1]);

        assert!(!itinerary.reorder(1, 1).unwrap());
        assert_eq!(
            itinerary.reorder(0, 4),
            Err(CoreError::IndexOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn set_days_requires_at_least_one() {
        let mut itinerary = demo_itinerary();
        itinerary.set_days(2, 5).unwrap();
        assert_eq!(itinerary.get(2).unwrap().days, 5);

        assert!(itinerary.set_days(2, 0).is_err());
        assert_eq!(itinerary.get(2).unwrap().days, 5);
        assert_eq!(itinerary.set_days(99, 1), Err(CoreError::UnknownDestination(99)));
    }

    #[test]
    fn transport_and_removal() {
        let mut itinerary = demo_itinerary();
        itinerary.set_transport(1, TransportMode::Train).unwrap();
        assert_eq!(itinerary.legs().next().unwrap().mode(), TransportMode::Train);

        let removed = itinerary.remove(1).unwrap();
        assert_eq!(removed.city, "Madrid");
        assert_eq!(ids(&itinerary), vec![2, 3, 4]);
        assert!(itinerary.remove(1).is_err());
    }

    #[test]
    fn deserialization_validates_ids() {
        let duplicate = serde_json::json!([
            { "id": 1, "city": "A", "coordinates": [0.0, 0.0], "days": 1 },
            { "id": 1, "city": "B", "coordinates": [1.0, 1.0], "days": 1 }
        ]);
        assert!(serde_json::from_value::<Itinerary>(duplicate).is_err());

        let valid = serde_json::json!([
            { "id": 7, "city": "A", "coordinates": [0.0, 0.0], "days": 1, "transport": "car" }
        ]);
        let itinerary: Itinerary = serde_json::from_value(valid).unwrap();
        assert_eq!(itinerary.get(7).unwrap().transport, TransportMode::Car);
    }
}
