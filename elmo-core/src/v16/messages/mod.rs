pub mod authorize;
pub mod boot_notification;
pub mod diagnostics_status_notification;
pub mod firmware_status_notification;
pub mod heart_beat;
pub mod meter_values;
pub mod start_transaction;
pub mod status_notification;
pub mod stop_transaction;
