mod charge_point_error_code;
mod charge_point_status;
mod diagnostics_status;
mod firmware_status;
mod measurand;
mod meter_value;
mod reason;
mod sampled_value;
mod unit_of_measure;

pub use charge_point_error_code::ChargePointErrorCode;
pub use charge_point_status::ChargePointStatus;
pub use diagnostics_status::DiagnosticsStatus;
pub use firmware_status::FirmwareStatus;
pub use measurand::Measurand;
pub use meter_value::MeterValue;
pub use reason::Reason;
pub use sampled_value::SampledValue;
pub use unit_of_measure::UnitOfMeasure;
