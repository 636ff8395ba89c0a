#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitOfMeasure {
    Wh,
    W,
    A,
    V,
    Percent,
}
