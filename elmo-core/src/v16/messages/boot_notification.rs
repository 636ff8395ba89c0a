use alloc::string::String;

/// Charge point identity, sent once after connecting. The simulator always
/// has a full identity in its configuration, so every field is mandatory
/// here; blanks go out as empty strings, not omitted keys.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BootNotificationRequest {
    pub charge_point_vendor: String,
    pub charge_point_model: String,
    pub charge_point_serial_number: String,
    pub charge_box_serial_number: String,
    pub firmware_version: String,
    pub iccid: String,
    pub imsi: String,
    pub meter_type: String,
    pub meter_serial_number: String,
}
