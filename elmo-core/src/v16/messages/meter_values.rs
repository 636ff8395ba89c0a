use alloc::vec::Vec;

use super::super::types::MeterValue;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MeterValuesRequest {
    pub connector_id: usize,
    pub transaction_id: i32,
    pub meter_value: Vec<MeterValue>,
}
