use alloc::string::String;

use super::{Measurand, UnitOfMeasure};

/// One reading inside a MeterValues entry. Values travel as strings on the
/// wire; the simulator always knows what it measured, so measurand and unit
/// are mandatory.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct SampledValue {
    pub measurand: Measurand,
    pub unit: UnitOfMeasure,
    pub value: String,
}
