use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// Body returned by a single flight source: `{ "flights": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FlightBatch {
    pub flights: Vec<FlightRecord>,
}

// One flight offer. Well-formed offers carry exactly two slices (outbound + inbound).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FlightRecord {
    // Missing means zero slices; the normalizer drops such offers one by one
    #[serde(default)]
    pub slices: Vec<Slice>,
    // Provider fields we don't interpret (price, etc.)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// A single leg of an offer
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Slice {
    // Synthesized from flight number + departure, never trusted from the source
    #[serde(
        default,
        deserialize_with = "ignore_non_string_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub flight_number: String,
    pub departure_date_time_utc: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// A source id of any other JSON type is discarded instead of failing the batch
fn ignore_non_string_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Ok(Some(id)),
        _ => Ok(None),
    }
}

pub const EXPECTED_SLICES: usize = 2;

impl FlightRecord {
    pub fn is_well_formed(&self) -> bool {
        self.slices.len() == EXPECTED_SLICES
    }
}

impl Slice {
    pub fn new(flight_number: impl Into<String>, departure_date_time_utc: impl Into<String>) -> Self {
        Self {
            id: None,
            flight_number: flight_number.into(),
            departure_date_time_utc: departure_date_time_utc.into(),
            extra: Map::new(),
        }
    }
}

// Final output of one aggregation call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub flights: Vec<FlightRecord>,
}
