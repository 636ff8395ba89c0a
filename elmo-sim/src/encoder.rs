//! Maps logical actions onto OCPP 1.6 Call frames.
//!
//! The action set is closed: payload construction is total over
//! [`CallRequest`], and name-driven surfaces go through
//! [`CallAction::from_str`], which rejects anything it does not know. An
//! unknown action can therefore never leave as a protocol-legal empty
//! payload.

use std::{str::FromStr, sync::Arc};

use chrono::Utc;
use elmo_core::{
    format::frame::Call,
    v16::{
        messages::{
            authorize::AuthorizeRequest, boot_notification::BootNotificationRequest,
            diagnostics_status_notification::DiagnosticsStatusNotificationRequest,
            firmware_status_notification::FirmwareStatusNotificationRequest,
            heart_beat::HeartbeatRequest, meter_values::MeterValuesRequest,
            start_transaction::StartTransactionRequest,
            status_notification::StatusNotificationRequest,
            stop_transaction::StopTransactionRequest,
        },
        types::{
            ChargePointErrorCode, ChargePointStatus, DiagnosticsStatus, FirmwareStatus, Measurand,
            MeterValue, Reason, SampledValue, UnitOfMeasure,
        },
    },
};
use serde::Serialize;

use crate::{correlation::CorrelationIds, error::Error, session::TelemetrySample};

/// The calls this charge point can originate.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallAction {
    Heartbeat,
    BootNotification,
    Authorize,
    StatusNotification,
    StartTransaction,
    StopTransaction,
    MeterValues,
    DiagnosticsStatusNotification,
    FirmwareStatusNotification,
}

impl CallAction {
    pub fn as_str(self) -> &'static str {
        match self {
            CallAction::Heartbeat => "Heartbeat",
            CallAction::BootNotification => "BootNotification",
            CallAction::Authorize => "Authorize",
            CallAction::StatusNotification => "StatusNotification",
            CallAction::StartTransaction => "StartTransaction",
            CallAction::StopTransaction => "StopTransaction",
            CallAction::MeterValues => "MeterValues",
            CallAction::DiagnosticsStatusNotification => "DiagnosticsStatusNotification",
            CallAction::FirmwareStatusNotification => "FirmwareStatusNotification",
        }
    }
}

impl std::fmt::Display for CallAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Heartbeat" => Ok(CallAction::Heartbeat),
            "BootNotification" => Ok(CallAction::BootNotification),
            "Authorize" => Ok(CallAction::Authorize),
            "StatusNotification" => Ok(CallAction::StatusNotification),
            "StartTransaction" => Ok(CallAction::StartTransaction),
            "StopTransaction" => Ok(CallAction::StopTransaction),
            "MeterValues" => Ok(CallAction::MeterValues),
            "DiagnosticsStatusNotification" => Ok(CallAction::DiagnosticsStatusNotification),
            "FirmwareStatusNotification" => Ok(CallAction::FirmwareStatusNotification),
            other => Err(Error::UnsupportedAction(other.into())),
        }
    }
}

/// Inputs for one MeterValues call. Either `soc_percent` is supplied (the
/// usual case, straight from a telemetry sample) or it is derived from the
/// session energy and the battery capacity.
#[derive(Debug, Clone, Copy)]
pub struct MeterContext {
    pub connector_id: usize,
    pub transaction_id: i32,
    pub voltage_v: u32,
    pub current_a: u32,
    pub power_w: u32,
    /// Current meter register, in Wh.
    pub energy_wh: u64,
    pub soc_percent: Option<u8>,
    /// Register value at session start; only needed when deriving SoC.
    pub meter_start_wh: Option<u64>,
    pub battery_capacity_wh: Option<f64>,
}

impl MeterContext {
    pub fn from_sample(connector_id: usize, transaction_id: i32, sample: &TelemetrySample) -> Self {
        Self {
            connector_id,
            transaction_id,
            voltage_v: sample.voltage_v,
            current_a: sample.current_a,
            power_w: sample.power_w,
            energy_wh: sample.energy_wh,
            soc_percent: Some(sample.soc),
            meter_start_wh: None,
            battery_capacity_wh: None,
        }
    }

    fn resolve_soc(&self) -> Result<u8, Error> {
        if let Some(soc) = self.soc_percent {
            return Ok(soc.min(100));
        }
        match (self.meter_start_wh, self.battery_capacity_wh) {
            (Some(start), Some(capacity)) if capacity > 0.0 => {
                let session_wh = self.energy_wh as f64 - start as f64;
                Ok((session_wh / capacity * 100.0).clamp(0.0, 100.0).round() as u8)
            }
            _ => Err(Error::MissingMeterContext),
        }
    }
}

/// One outbound call with its typed parameters.
#[derive(Debug, Clone)]
pub enum CallRequest {
    Heartbeat,
    BootNotification(BootNotificationRequest),
    Authorize {
        id_tag: String,
    },
    StatusNotification {
        connector_id: usize,
        status: ChargePointStatus,
    },
    StartTransaction {
        connector_id: usize,
        id_tag: String,
        meter_start: u64,
    },
    StopTransaction {
        connector_id: usize,
        meter_stop: u64,
        transaction_id: i32,
        reason: Reason,
    },
    MeterValues(MeterContext),
    DiagnosticsStatusNotification {
        status: DiagnosticsStatus,
    },
    FirmwareStatusNotification {
        status: FirmwareStatus,
    },
}

impl CallRequest {
    pub fn action(&self) -> CallAction {
        match self {
            CallRequest::Heartbeat => CallAction::Heartbeat,
            CallRequest::BootNotification(_) => CallAction::BootNotification,
            CallRequest::Authorize { .. } => CallAction::Authorize,
            CallRequest::StatusNotification { .. } => CallAction::StatusNotification,
            CallRequest::StartTransaction { .. } => CallAction::StartTransaction,
            CallRequest::StopTransaction { .. } => CallAction::StopTransaction,
            CallRequest::MeterValues(_) => CallAction::MeterValues,
            CallRequest::DiagnosticsStatusNotification { .. } => {
                CallAction::DiagnosticsStatusNotification
            }
            CallRequest::FirmwareStatusNotification { .. } => {
                CallAction::FirmwareStatusNotification
            }
        }
    }

    /// Connector the call concerns; 0 for charge-point-level actions.
    pub fn connector_id(&self) -> usize {
        match self {
            CallRequest::StatusNotification { connector_id, .. }
            | CallRequest::StartTransaction { connector_id, .. }
            | CallRequest::StopTransaction { connector_id, .. } => *connector_id,
            CallRequest::MeterValues(ctx) => ctx.connector_id,
            _ => 0,
        }
    }

    fn into_payload(self) -> Result<serde_json::Value, Error> {
        let now = Utc::now();
        let payload = match self {
            CallRequest::Heartbeat => to_value(HeartbeatRequest {}),
            CallRequest::BootNotification(boot) => to_value(boot),
            CallRequest::Authorize { id_tag } => to_value(AuthorizeRequest { id_tag }),
            CallRequest::StatusNotification {
                connector_id,
                status,
            } => to_value(StatusNotificationRequest {
                connector_id,
                status,
                error_code: ChargePointErrorCode::NoError,
                info: String::new(),
                timestamp: now,
                vendor_id: String::new(),
                vendor_error_code: String::new(),
            }),
            CallRequest::StartTransaction {
                connector_id,
                id_tag,
                meter_start,
            } => to_value(StartTransactionRequest {
                connector_id,
                id_tag,
                meter_start,
                timestamp: now,
            }),
            CallRequest::StopTransaction {
                meter_stop,
                transaction_id,
                reason,
                ..
            } => to_value(StopTransactionRequest {
                meter_stop,
                timestamp: now,
                transaction_id,
                reason,
            }),
            CallRequest::MeterValues(ctx) => {
                let soc = ctx.resolve_soc()?;
                to_value(MeterValuesRequest {
                    connector_id: ctx.connector_id,
                    transaction_id: ctx.transaction_id,
                    meter_value: vec![MeterValue {
                        timestamp: now,
                        sampled_value: vec![
                            reading(Measurand::Voltage, UnitOfMeasure::V, ctx.voltage_v),
                            reading(Measurand::CurrentImport, UnitOfMeasure::A, ctx.current_a),
                            reading(
                                Measurand::EnergyActiveImportRegister,
                                UnitOfMeasure::Wh,
                                ctx.energy_wh,
                            ),
                            reading(Measurand::PowerActiveImport, UnitOfMeasure::W, ctx.power_w),
                            reading(Measurand::SoC, UnitOfMeasure::Percent, soc),
                        ],
                    }],
                })
            }
            CallRequest::DiagnosticsStatusNotification { status } => {
                to_value(DiagnosticsStatusNotificationRequest { status })
            }
            CallRequest::FirmwareStatusNotification { status } => {
                to_value(FirmwareStatusNotificationRequest { status })
            }
        };
        Ok(payload)
    }
}

fn to_value<T: Serialize>(payload: T) -> serde_json::Value {
    serde_json::to_value(payload).unwrap()
}

fn reading(measurand: Measurand, unit: UnitOfMeasure, value: impl ToString) -> SampledValue {
    SampledValue {
        measurand,
        unit,
        value: value.to_string(),
    }
}

/// Local record for correlating a later response or timeout with a call.
/// Lives with whoever transmits the frame; this crate never sees it again.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallTracking {
    pub unique_id: String,
    pub action: CallAction,
    pub connector_id: usize,
}

/// Encoded wire frame plus its tracking record.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub frame: String,
    pub tracking: CallTracking,
}

/// Builds Call frames. Stateless between calls: no ordering preconditions
/// are enforced here (sequencing discipline belongs to the connector owner);
/// the only side effect is drawing fresh ids from the shared source.
pub struct CallEncoder {
    ids: Arc<CorrelationIds>,
}

impl CallEncoder {
    pub fn new(ids: Arc<CorrelationIds>) -> Self {
        Self { ids }
    }

    pub fn encode(&self, request: CallRequest) -> Result<OutboundMessage, Error> {
        let action = request.action();
        let connector_id = request.connector_id();
        let call = Call {
            unique_id: self.ids.next_id(),
            action: action.to_string(),
            payload: request.into_payload()?,
        };
        let frame = call.encode();
        log::debug!("encoded {} call {}", action, call.unique_id);
        Ok(OutboundMessage {
            frame,
            tracking: CallTracking {
                unique_id: call.unique_id,
                action,
                connector_id,
            },
        })
    }
}
