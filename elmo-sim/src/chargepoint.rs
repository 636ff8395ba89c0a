//! The charge point facade: configuration, connectors and the shared
//! machinery behind them.

use std::sync::Arc;

use elmo_core::v16::types::{ChargePointStatus, DiagnosticsStatus, FirmwareStatus, Reason};

use crate::{
    config::ChargePointConfig,
    connector::Connector,
    correlation::CorrelationIds,
    encoder::{CallEncoder, CallRequest, OutboundMessage},
    error::Error,
    profile::VehicleRegistry,
    session::SessionSimulator,
};

/// One simulated charge point. Owns its connectors and session machinery;
/// the vehicle registry and the correlation id source are injected, shared
/// handles, so several charge points in one process draw ids from the same
/// pool and see the same vehicle table.
///
/// Every operation just returns the frame to transmit; sockets, retries and
/// response correlation stay with the host.
pub struct ChargePoint {
    config: ChargePointConfig,
    registry: Arc<VehicleRegistry>,
    encoder: CallEncoder,
    simulator: SessionSimulator,
    connectors: Vec<Connector>,
}

impl ChargePoint {
    pub fn new(
        config: ChargePointConfig,
        registry: Arc<VehicleRegistry>,
        ids: Arc<CorrelationIds>,
    ) -> Self {
        let connectors = (1..=config.number_of_connectors).map(Connector::new).collect();
        let simulator = SessionSimulator::with_seed(config.seed);
        Self {
            config,
            registry,
            encoder: CallEncoder::new(ids),
            simulator,
            connectors,
        }
    }

    /// Vehicle names to offer wherever an operator picks a car.
    pub fn vehicle_names(&self) -> Vec<&str> {
        self.registry.names().collect()
    }

    pub fn connector(&self, connector_id: usize) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id() == connector_id)
    }

    pub fn boot_notification(&self) -> Result<OutboundMessage, Error> {
        self.encoder
            .encode(CallRequest::BootNotification(self.config.boot_info.clone()))
    }

    pub fn heartbeat(&self) -> Result<OutboundMessage, Error> {
        self.encoder.encode(CallRequest::Heartbeat)
    }

    pub fn authorize(&self) -> Result<OutboundMessage, Error> {
        self.encoder.encode(CallRequest::Authorize {
            id_tag: self.config.rfid_tag.clone(),
        })
    }

    pub fn diagnostics_status(&self, status: DiagnosticsStatus) -> Result<OutboundMessage, Error> {
        self.encoder
            .encode(CallRequest::DiagnosticsStatusNotification { status })
    }

    pub fn firmware_status(&self, status: FirmwareStatus) -> Result<OutboundMessage, Error> {
        self.encoder
            .encode(CallRequest::FirmwareStatusNotification { status })
    }

    pub fn status_notification(
        &mut self,
        connector_id: usize,
        status: ChargePointStatus,
    ) -> Result<OutboundMessage, Error> {
        let connector = find_connector(&mut self.connectors, connector_id)?;
        connector.status_notification(&self.encoder, status)
    }

    pub fn begin_transaction(
        &mut self,
        connector_id: usize,
        vehicle: &str,
        initial_soc: f64,
        meter_start_wh: u64,
    ) -> Result<OutboundMessage, Error> {
        let connector = find_connector(&mut self.connectors, connector_id)?;
        connector.begin_transaction(
            &self.encoder,
            &self.registry,
            vehicle,
            &self.config.rfid_tag,
            initial_soc,
            meter_start_wh,
        )
    }

    pub fn transaction_started(
        &mut self,
        connector_id: usize,
        transaction_id: i32,
    ) -> Result<(), Error> {
        find_connector(&mut self.connectors, connector_id)?.transaction_started(transaction_id)
    }

    pub fn meter_tick(
        &mut self,
        connector_id: usize,
        interval_seconds: f64,
    ) -> Result<OutboundMessage, Error> {
        let connector = find_connector(&mut self.connectors, connector_id)?;
        connector.meter_tick(
            &self.encoder,
            &self.registry,
            &mut self.simulator,
            interval_seconds,
        )
    }

    pub fn end_transaction(
        &mut self,
        connector_id: usize,
        reason: Reason,
    ) -> Result<OutboundMessage, Error> {
        find_connector(&mut self.connectors, connector_id)?.end_transaction(&self.encoder, reason)
    }
}

fn find_connector(connectors: &mut [Connector], id: usize) -> Result<&mut Connector, Error> {
    connectors
        .iter_mut()
        .find(|c| c.id() == id)
        .ok_or(Error::UnknownConnector(id))
}
