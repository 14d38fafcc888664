// Identifier synthesis: slice id = flight number + departure time in epoch millis

use crate::flight::{FlightRecord, Slice};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesisError {
    #[error("Invalid departure time {value:?} for flight {flight_number}: {reason}")]
    InvalidDeparture {
        flight_number: String,
        value: String,
        reason: String,
    },
}

// Departure times without an offset are read as UTC, as the field name promises
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
// A bare date is UTC midnight
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn epoch_millis(departure_date_time_utc: &str) -> Result<i64, chrono::ParseError> {
    let rfc3339_error = match DateTime::parse_from_rfc3339(departure_date_time_utc) {
        Ok(departure) => return Ok(departure.timestamp_millis()),
        Err(e) => e,
    };

    if let Ok(naive) = NaiveDateTime::parse_from_str(departure_date_time_utc, NAIVE_FORMAT) {
        return Ok(naive.and_utc().timestamp_millis());
    }

    NaiveDate::parse_from_str(departure_date_time_utc, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
        .map_err(|_| rfc3339_error)
}

pub fn slice_id(flight_number: &str, departure_date_time_utc: &str) -> Result<String, SynthesisError> {
    let millis =
        epoch_millis(departure_date_time_utc).map_err(|e| SynthesisError::InvalidDeparture {
            flight_number: flight_number.to_string(),
            value: departure_date_time_utc.to_string(),
            reason: e.to_string(),
        })?;

    Ok(format!("{}{}", flight_number, millis))
}

fn attach_slice_id(slice: &mut Slice) -> Result<(), SynthesisError> {
    slice.id = Some(slice_id(&slice.flight_number, &slice.departure_date_time_utc)?);
    Ok(())
}

/// Sets `id` on every slice of every flight. One bad timestamp fails the whole batch
/// rather than leaving an id that could collide with a real one.
pub fn attach_ids(mut flights: Vec<FlightRecord>) -> Result<Vec<FlightRecord>, SynthesisError> {
    for flight in &mut flights {
        for slice in &mut flight.slices {
            attach_slice_id(slice)?;
        }
    }

    Ok(flights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};
    use test_case::test_case;

    #[test_case("2019-08-08T04:30:00.000Z", 1565238600000 ; "rfc3339 with millis")]
    #[test_case("2019-08-08T04:30:00Z", 1565238600000 ; "rfc3339 without fraction")]
    #[test_case("2019-08-08T06:30:00+02:00", 1565238600000 ; "rfc3339 with offset")]
    #[test_case("2019-08-08T04:30:00.123Z", 1565238600123 ; "sub second precision")]
    #[test_case("2019-08-08T04:30:00", 1565238600000 ; "naive read as utc")]
    #[test_case("2019-08-08T04:30:00.123", 1565238600123 ; "naive with millis")]
    #[test_case("2019-08-08", 1565222400000 ; "date only is utc midnight")]
    fn test_epoch_millis(value: &str, expected: i64) {
        assert_eq!(epoch_millis(value).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("yesterday" ; "free text")]
    #[test_case("2019-13-08T04:30:00Z" ; "month out of range")]
    #[test_case("2019-08-32" ; "day out of range")]
    fn test_epoch_millis_rejects(value: &str) {
        assert!(epoch_millis(value).is_err());
    }

    #[test]
    fn test_slice_id_is_number_then_millis() {
        assert_eq!(
            slice_id("144", "2019-08-08T04:30:00.000Z").unwrap(),
            "1441565238600000"
        );
    }

    #[test]
    fn test_slice_id_is_deterministic() {
        let first = slice_id("8542", "2019-08-10T05:35:00.000Z").unwrap();
        let second = slice_id("8542", "2019-08-10T05:35:00.000Z").unwrap();
        // Same instant written differently still gives the same id
        let third = slice_id("8542", "2019-08-10T07:35:00+02:00").unwrap();

        assert_eq!(first, "85421565415300000");
        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn test_attach_ids_sets_every_slice_and_keeps_other_fields() {
        let mut extra = Map::new();
        extra.insert("price".to_string(), Value::from(129));
        let mut outbound = Slice::new("144", "2019-08-08T04:30:00.000Z");
        outbound
            .extra
            .insert("origin_name".to_string(), Value::from("Schonefeld"));

        let flights = vec![
            FlightRecord {
                slices: vec![outbound, Slice::new("8542", "2019-08-10T05:35:00.000Z")],
                extra,
            },
            FlightRecord {
                slices: vec![
                    Slice::new("7", "2019-08-08T04:30:00Z"),
                    Slice::new("8", "2019-08-10T05:35:00Z"),
                ],
                extra: Map::new(),
            },
        ];

        let flights = attach_ids(flights).unwrap();

        assert_eq!(flights[0].slices[0].id.as_deref(), Some("1441565238600000"));
        assert_eq!(flights[0].slices[1].id.as_deref(), Some("85421565415300000"));
        assert_eq!(flights[1].slices[0].id.as_deref(), Some("71565238600000"));
        assert_eq!(flights[1].slices[1].id.as_deref(), Some("81565415300000"));
        assert_eq!(flights[0].extra.get("price"), Some(&Value::from(129)));
        assert_eq!(
            flights[0].slices[0].extra.get("origin_name"),
            Some(&Value::from("Schonefeld"))
        );
    }

    #[test]
    fn test_attach_ids_overwrites_source_supplied_id() {
        let mut slice = Slice::new("144", "2019-08-08T04:30:00.000Z");
        slice.id = Some("from-the-source".to_string());
        let flights = vec![FlightRecord {
            slices: vec![slice.clone(), slice],
            extra: Map::new(),
        }];

        let flights = attach_ids(flights).unwrap();

        assert_eq!(flights[0].slices[0].id.as_deref(), Some("1441565238600000"));
    }

    #[test]
    fn test_attach_ids_fails_on_bad_timestamp() {
        let flights = vec![FlightRecord {
            slices: vec![
                Slice::new("144", "2019-08-08T04:30:00.000Z"),
                Slice::new("8542", "not a date"),
            ],
            extra: Map::new(),
        }];

        match attach_ids(flights) {
            Err(SynthesisError::InvalidDeparture {
                flight_number,
                value,
                ..
            }) => {
                assert_eq!(flight_number, "8542");
                assert_eq!(value, "not a date");
            }
            other => panic!("Expected invalid departure, got {:?}", other),
        }
    }
}
