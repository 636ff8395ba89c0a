//! Per-connector session coordination.
//!
//! A [`Connector`] owns its session state exclusively. Every mutation,
//! whether caller-driven (start, stop, status change) or tick-driven
//! (metering), goes through `&mut self`, so there is a single serialized
//! mutation path per socket and no two writers ever race on one session.

use chrono::Utc;
use elmo_core::v16::types::{ChargePointStatus, Reason};

use crate::{
    encoder::{CallEncoder, CallRequest, MeterContext, OutboundMessage},
    error::Error,
    profile::VehicleRegistry,
    session::{SessionSimulator, SessionState, TelemetrySample},
};

#[derive(Debug, Clone)]
struct ActiveTransaction {
    /// Id assigned by the central system; `None` until the host relays the
    /// StartTransaction response.
    transaction_id: Option<i32>,
    state: SessionState,
    last_sample: Option<TelemetrySample>,
}

/// One physical charging socket.
pub struct Connector {
    id: usize,
    status: ChargePointStatus,
    transaction: Option<ActiveTransaction>,
}

impl Connector {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            status: ChargePointStatus::Available,
            transaction: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn status(&self) -> ChargePointStatus {
        self.status
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Most recent telemetry of the open session, for display.
    pub fn last_sample(&self) -> Option<&TelemetrySample> {
        self.transaction.as_ref().and_then(|t| t.last_sample.as_ref())
    }

    /// Record the new status and encode the StatusNotification for it.
    pub fn status_notification(
        &mut self,
        encoder: &CallEncoder,
        status: ChargePointStatus,
    ) -> Result<OutboundMessage, Error> {
        self.status = status;
        encoder.encode(CallRequest::StatusNotification {
            connector_id: self.id,
            status,
        })
    }

    /// Open a session for the named vehicle and encode StartTransaction.
    /// The meter register at this moment becomes the session's zero
    /// reference.
    pub fn begin_transaction(
        &mut self,
        encoder: &CallEncoder,
        registry: &VehicleRegistry,
        vehicle: &str,
        id_tag: &str,
        initial_soc: f64,
        meter_start_wh: u64,
    ) -> Result<OutboundMessage, Error> {
        let profile = registry.lookup(vehicle)?;
        let msg = encoder.encode(CallRequest::StartTransaction {
            connector_id: self.id,
            id_tag: id_tag.to_owned(),
            meter_start: meter_start_wh,
        })?;
        log::debug!(
            "connector {}: session opened for {} at {} Wh, {:.0}% SoC",
            self.id,
            profile.name,
            meter_start_wh,
            initial_soc
        );
        self.status = ChargePointStatus::Charging;
        self.transaction = Some(ActiveTransaction {
            transaction_id: None,
            state: SessionState::begin(
                profile.name,
                initial_soc,
                meter_start_wh as f64,
                Utc::now(),
            ),
            last_sample: None,
        });
        Ok(msg)
    }

    /// Record the transaction id the central system assigned. Response
    /// parsing happens in the transport layer; only the result lands here.
    pub fn transaction_started(&mut self, transaction_id: i32) -> Result<(), Error> {
        let tx = self
            .transaction
            .as_mut()
            .ok_or(Error::NoActiveTransaction(self.id))?;
        tx.transaction_id = Some(transaction_id);
        Ok(())
    }

    /// Advance the session by one interval and encode the MeterValues call
    /// for the fresh sample. Fails until the central system has confirmed
    /// the transaction, since there is no id to report against.
    pub fn meter_tick(
        &mut self,
        encoder: &CallEncoder,
        registry: &VehicleRegistry,
        simulator: &mut SessionSimulator,
        interval_seconds: f64,
    ) -> Result<OutboundMessage, Error> {
        let tx = self
            .transaction
            .as_mut()
            .ok_or(Error::NoActiveTransaction(self.id))?;
        let transaction_id = tx
            .transaction_id
            .ok_or(Error::NoActiveTransaction(self.id))?;
        let profile = registry.lookup(&tx.state.vehicle)?;

        let (sample, next) = simulator.advance(profile, &tx.state, interval_seconds)?;
        tx.state = next;
        tx.last_sample = Some(sample);

        encoder.encode(CallRequest::MeterValues(MeterContext::from_sample(
            self.id,
            transaction_id,
            &sample,
        )))
    }

    /// Close the session and encode StopTransaction from its final meter
    /// register. The session state is discarded; ticks simply stop.
    pub fn end_transaction(
        &mut self,
        encoder: &CallEncoder,
        reason: Reason,
    ) -> Result<OutboundMessage, Error> {
        let tx = self
            .transaction
            .take()
            .ok_or(Error::NoActiveTransaction(self.id))?;
        let Some(transaction_id) = tx.transaction_id else {
            self.transaction = Some(tx);
            return Err(Error::NoActiveTransaction(self.id));
        };

        log::debug!(
            "connector {}: session closed after {:.0} Wh",
            self.id,
            tx.state.session_energy_wh()
        );
        self.status = ChargePointStatus::Finishing;
        encoder.encode(CallRequest::StopTransaction {
            connector_id: self.id,
            meter_stop: tx.state.energy_wh.round() as u64,
            transaction_id,
            reason,
        })
    }
}
