use chrono::{DateTime, Utc};

use super::super::types::Reason;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StopTransactionRequest {
    /// Meter register at session end, in Wh.
    pub meter_stop: u64,
    pub timestamp: DateTime<Utc>,
    pub transaction_id: i32,
    pub reason: Reason,
}
