use alloc::string::String;
use chrono::{DateTime, Utc};

use super::super::types::{ChargePointErrorCode, ChargePointStatus};

/// Connector status report. `info`, `vendor_id` and `vendor_error_code` are
/// optional in OCPP 1.6 but this charge point always sends them (empty when
/// it has nothing to say), so the struct keeps them mandatory.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatusNotificationRequest {
    pub connector_id: usize,
    pub status: ChargePointStatus,
    pub error_code: ChargePointErrorCode,
    pub info: String,
    pub timestamp: DateTime<Utc>,
    pub vendor_id: String,
    pub vendor_error_code: String,
}
