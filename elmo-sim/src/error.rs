use thiserror::Error;

/// Validation failures of the simulation core. All of them are synchronous
/// and local; there is no transient failure mode here and nothing is retried
/// or silently defaulted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No vehicle profile registered under the requested name.
    #[error("unknown vehicle profile \"{0}\"")]
    ProfileNotFound(String),

    /// Simulation tick intervals must be strictly positive.
    #[error("invalid tick interval: {0} s")]
    InvalidInterval(f64),

    /// Action name outside the supported OCPP 1.6 call set.
    #[error("unsupported OCPP action \"{0}\"")]
    UnsupportedAction(String),

    /// MeterValues needs a SoC, or an energy baseline plus battery capacity
    /// to derive one.
    #[error("cannot encode MeterValues: no SoC and nothing to derive it from")]
    MissingMeterContext,

    /// The connector has no transaction that the central system has
    /// confirmed, so there is nothing to meter or stop.
    #[error("connector {0} has no active transaction")]
    NoActiveTransaction(usize),

    /// Connector id outside the configured range.
    #[error("no such connector: {0}")]
    UnknownConnector(usize),
}
