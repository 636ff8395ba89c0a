use elmo_core::v16::messages::boot_notification::BootNotificationRequest;

/// Static identity and sizing of the simulated charge point. Plain data a
/// host can load from whatever settings store it keeps; the default is the
/// virtual "Elmo" station.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChargePointConfig {
    /// Identity sent as-is in BootNotification.
    pub boot_info: BootNotificationRequest,
    /// Tag presented on Authorize and StartTransaction.
    pub rfid_tag: String,
    pub number_of_connectors: usize,
    /// Seed for the telemetry rng; a fixed value replays the same session.
    pub seed: u64,
}

impl Default for ChargePointConfig {
    fn default() -> Self {
        Self {
            boot_info: BootNotificationRequest {
                charge_point_vendor: "Elmo".into(),
                charge_point_model: "Elmo-Virtual1".into(),
                charge_point_serial_number: "elm.001.13.1".into(),
                charge_box_serial_number: "elm.001.13.1.01".into(),
                firmware_version: "0.9.87".into(),
                iccid: String::new(),
                imsi: String::new(),
                meter_type: "ELM NQC-ACDC".into(),
                meter_serial_number: "elm.001.13.1.01".into(),
            },
            rfid_tag: "04E91C5A2B7D10".into(),
            number_of_connectors: 2,
            seed: 0,
        }
    }
}
