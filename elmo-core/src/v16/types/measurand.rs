/// The measurands the simulated meter reports. Wire names per OCPP 1.6;
/// everything else in the standard's list is simply never emitted.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Measurand {
    Voltage,
    #[serde(rename = "Current.Import")]
    CurrentImport,
    #[serde(rename = "Energy.Active.Import.Register")]
    EnergyActiveImportRegister,
    #[serde(rename = "Power.Active.Import")]
    PowerActiveImport,
    SoC,
}
