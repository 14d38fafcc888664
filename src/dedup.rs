// Deduplication of offers across sources by the ids of both slices

use crate::flight::FlightRecord;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Outbound id followed by inbound id. `None` until both slices have ids.
pub fn composite_key(flight: &FlightRecord) -> Option<CompositeKey> {
    match flight.slices.as_slice() {
        [outbound, inbound] => {
            let outbound_id = outbound.id.as_deref()?;
            let inbound_id = inbound.id.as_deref()?;
            Some(CompositeKey(format!("{}{}", outbound_id, inbound_id)))
        }
        _ => None,
    }
}

/// Drops every offer whose composite key was already seen, first occurrence wins.
/// Offers without a key can't be compared and are passed through.
pub fn dedupe(flights: Vec<FlightRecord>) -> Vec<FlightRecord> {
    let mut seen = HashSet::with_capacity(flights.len());

    flights
        .into_iter()
        .filter(|flight| match composite_key(flight) {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect()
}
