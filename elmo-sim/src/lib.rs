//! Simulation core of the Elmo virtual charge point.
//!
//! Two halves: a charging-session engine that produces plausible electrical
//! telemetry for a selected vehicle (charge-curve tapering, voltage sag,
//! bounded jitter), and an OCPP 1.6 call encoder that turns logical actions
//! into wire frames plus local tracking records. Everything is synchronous
//! and transport-agnostic; the host owns the socket, the tick loop and the
//! correlation of responses against `CallTracking::unique_id`.

pub mod chargepoint;
pub mod config;
pub mod connector;
pub mod correlation;
pub mod encoder;
pub mod error;
pub mod profile;
pub mod session;

pub use chargepoint::ChargePoint;
pub use config::ChargePointConfig;
pub use connector::Connector;
pub use correlation::CorrelationIds;
pub use encoder::{
    CallAction, CallEncoder, CallRequest, CallTracking, MeterContext, OutboundMessage,
};
pub use error::Error;
pub use profile::{ChargingCurve, VehicleProfile, VehicleRegistry};
pub use session::{SessionSimulator, SessionState, TelemetrySample};
