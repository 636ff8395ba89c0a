use alloc::string::String;
use chrono::{DateTime, Utc};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StartTransactionRequest {
    pub connector_id: usize,
    pub id_tag: String,
    /// Meter register at session start, in Wh.
    pub meter_start: u64,
    pub timestamp: DateTime<Utc>,
}
