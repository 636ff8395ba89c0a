//! The charging-session engine: given a vehicle profile and the session
//! state, produce the next physically plausible telemetry sample.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{error::Error, profile::VehicleProfile};

/// Relative voltage sag at rated power. Scales linearly with load; a DC
/// charger at full tilt sits a few percent below its open-circuit voltage.
const MAX_VOLTAGE_SAG: f64 = 0.03;

/// Default jitter amplitudes: power wobbles a few percent around the curve,
/// the current reading carries additional BMS/measurement noise.
const POWER_JITTER: f64 = 0.04;
const CURRENT_JITTER: f64 = 0.02;

/// State of one charging session, owned by exactly one connector. Created at
/// StartTransaction, advanced by every metering tick, discarded at
/// StopTransaction.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionState {
    /// Registry key of the vehicle on the cable.
    pub vehicle: String,
    /// SoC at plug-in, in percent. Fixed for the session.
    pub initial_soc: f64,
    /// Current SoC in percent; never decreases, clamped at 100.
    pub soc: f64,
    /// Meter register in Wh; never decreases.
    pub energy_wh: f64,
    /// Register value when the transaction started. Zero reference for
    /// reconstructing SoC from metered energy.
    pub meter_start_wh: f64,
    pub last_sample_at: DateTime<Utc>,
}

impl SessionState {
    pub fn begin(
        vehicle: impl Into<String>,
        initial_soc: f64,
        meter_start_wh: f64,
        started_at: DateTime<Utc>,
    ) -> Self {
        let initial_soc = initial_soc.clamp(0.0, 100.0);
        Self {
            vehicle: vehicle.into(),
            initial_soc,
            soc: initial_soc,
            energy_wh: meter_start_wh,
            meter_start_wh,
            last_sample_at: started_at,
        }
    }

    /// Energy delivered during this session so far, in Wh.
    pub fn session_energy_wh(&self) -> f64 {
        self.energy_wh - self.meter_start_wh
    }
}

/// One reported reading, rounded to the whole units the meter reports over
/// OCPP. Unrounded precision stays in `SessionState`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySample {
    pub initial_soc: f64,
    pub soc: u8,
    pub power_w: u32,
    pub current_a: u32,
    pub voltage_v: u32,
    pub energy_wh: u64,
    pub timestamp: DateTime<Utc>,
}

/// Advances sessions in time. The rng is owned here and seedable, so a fixed
/// seed replays a session sample-for-sample; the jitter amplitudes can be
/// pinned to zero to make the output a pure function of the curve.
pub struct SessionSimulator {
    rng: SmallRng,
    power_jitter: f64,
    current_jitter: f64,
}

impl SessionSimulator {
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self {
            rng,
            power_jitter: POWER_JITTER,
            current_jitter: CURRENT_JITTER,
        }
    }

    /// Override the fluctuation amplitudes. Zero on both makes `advance`
    /// fully deterministic regardless of seed.
    pub fn with_jitter(mut self, power_jitter: f64, current_jitter: f64) -> Self {
        self.power_jitter = power_jitter;
        self.current_jitter = current_jitter;
        self
    }

    /// One metering tick: evaluate the charge curve at the current SoC,
    /// apply jitter and voltage sag, integrate energy over the interval and
    /// re-anchor SoC to the meter register.
    ///
    /// SoC is reconstructed from metered energy relative to the session
    /// start, not integrated from the curve, so it always agrees with the
    /// register value that actually goes out over OCPP.
    pub fn advance(
        &mut self,
        profile: &VehicleProfile,
        state: &SessionState,
        interval_seconds: f64,
    ) -> Result<(TelemetrySample, SessionState), Error> {
        if !(interval_seconds > 0.0) {
            return Err(Error::InvalidInterval(interval_seconds));
        }

        let base_power = profile.charging_power_at(state.soc);
        let power = (base_power * (1.0 + self.draw(self.power_jitter))).max(0.0);

        let load = (power / profile.max_power_w).min(1.0);
        let voltage = profile.nominal_voltage_v * (1.0 - MAX_VOLTAGE_SAG * load);

        let current = power / voltage * (1.0 + self.draw(self.current_jitter));

        let energy = state.energy_wh + power * interval_seconds / 3600.0;
        let soc = (state.initial_soc
            + (energy - state.meter_start_wh) / profile.battery_capacity_wh * 100.0)
            .min(100.0);

        let timestamp = state.last_sample_at
            + Duration::milliseconds((interval_seconds * 1000.0).round() as i64);

        let sample = TelemetrySample {
            initial_soc: state.initial_soc,
            soc: soc.round() as u8,
            power_w: power.round() as u32,
            current_a: current.round() as u32,
            voltage_v: voltage.round() as u32,
            energy_wh: energy.round() as u64,
            timestamp,
        };
        log::trace!(
            "{}: soc {:.2}% -> {:.2}%, {:.0} W, register {:.0} Wh",
            state.vehicle,
            state.soc,
            soc,
            power,
            energy
        );

        let mut next = state.clone();
        next.soc = soc;
        next.energy_wh = energy;
        next.last_sample_at = timestamp;
        Ok((sample, next))
    }

    fn draw(&mut self, amplitude: f64) -> f64 {
        if amplitude == 0.0 {
            return 0.0;
        }
        self.rng.random_range(-amplitude..=amplitude)
    }
}

impl Default for SessionSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::VehicleRegistry;

    fn tesla_session(initial_soc: f64, meter_start: f64) -> SessionState {
        SessionState::begin("Tesla Model Y", initial_soc, meter_start, Utc::now())
    }

    #[test]
    fn zero_jitter_follows_the_curve_exactly() {
        let registry = VehicleRegistry::builtin();
        let tesla = registry.lookup("Tesla Model Y").unwrap();
        let mut sim = SessionSimulator::with_seed(1).with_jitter(0.0, 0.0);
        let state = tesla_session(50.0, 0.0);

        let (sample, next) = sim.advance(tesla, &state, 30.0).unwrap();

        // Curve at 50%: 250 kW - (50-30)/30 * 130 kW = 163333.3 W.
        assert_eq!(sample.power_w, 163_333);
        // Sag: 400 V * (1 - 0.03 * 163333.3/250000) = 392.16 V.
        assert_eq!(sample.voltage_v, 392);
        // Current from the unrounded pair: 163333.3 / 392.16 = 416.5 A.
        assert_eq!(sample.current_a, 416);
        // 163333.3 W for 30 s = 1361.1 Wh.
        assert_eq!(sample.energy_wh, 1361);
        assert_eq!(sample.soc, 52);
        assert!((next.soc - 52.268_518).abs() < 1e-3);
        assert_eq!(sample.timestamp, state.last_sample_at + Duration::seconds(30));
    }

    #[test]
    fn same_seed_replays_the_same_session() {
        let registry = VehicleRegistry::builtin();
        let tesla = registry.lookup("Tesla Model Y").unwrap();
        let mut a = SessionSimulator::with_seed(99);
        let mut b = SessionSimulator::with_seed(99);
        let mut state_a = tesla_session(20.0, 4_000.0);
        let mut state_b = state_a.clone();

        for _ in 0..10 {
            let (sample_a, next_a) = a.advance(tesla, &state_a, 30.0).unwrap();
            let (sample_b, next_b) = b.advance(tesla, &state_b, 30.0).unwrap();
            assert_eq!(sample_a, sample_b);
            state_a = next_a;
            state_b = next_b;
        }
    }

    #[test]
    fn jittered_power_stays_in_band() {
        let registry = VehicleRegistry::builtin();
        let kona = registry.lookup("Hyundai Kona Electric").unwrap();
        let mut sim = SessionSimulator::with_seed(7);
        let mut state = tesla_session(10.0, 0.0);
        state.vehicle = "Hyundai Kona Electric".into();

        for _ in 0..100 {
            let base = kona.charging_power_at(state.soc);
            let (sample, next) = sim.advance(kona, &state, 10.0).unwrap();
            assert!(f64::from(sample.power_w) >= base * 0.96 - 1.0);
            assert!(f64::from(sample.power_w) <= base * 1.04 + 1.0);
            state = next;
        }
    }

    #[test]
    fn energy_and_soc_never_decrease() {
        let registry = VehicleRegistry::builtin();
        let zoe = registry.lookup("Renault Zoe").unwrap();
        let mut sim = SessionSimulator::with_seed(3);
        let mut state = SessionState::begin("Renault Zoe", 70.0, 12_345.0, Utc::now());

        let mut last_energy = state.energy_wh;
        let mut last_soc = state.soc;
        for _ in 0..500 {
            let (_, next) = sim.advance(zoe, &state, 60.0).unwrap();
            assert!(next.energy_wh >= last_energy);
            assert!(next.soc >= last_soc);
            assert!(next.soc <= 100.0);
            last_energy = next.energy_wh;
            last_soc = next.soc;
            state = next;
        }
        assert_eq!(state.soc, 100.0);
    }

    #[test]
    fn full_battery_draws_nothing() {
        let registry = VehicleRegistry::builtin();
        let tesla = registry.lookup("Tesla Model Y").unwrap();
        let mut sim = SessionSimulator::with_seed(5);
        let mut state = tesla_session(100.0, 30_000.0);

        let (sample, next) = sim.advance(tesla, &state, 30.0).unwrap();
        assert_eq!(sample.power_w, 0);
        assert_eq!(sample.current_a, 0);
        // No load, no sag.
        assert_eq!(sample.voltage_v, 400);
        assert_eq!(sample.energy_wh, 30_000);
        assert_eq!(sample.soc, 100);
        state = next;
        assert_eq!(state.energy_wh, 30_000.0);
        assert_eq!(state.soc, 100.0);
    }

    #[test]
    fn soc_is_anchored_to_the_meter_register() {
        let registry = VehicleRegistry::builtin();
        let id4 = registry.lookup("Volkswagen ID.4").unwrap();
        let mut sim = SessionSimulator::with_seed(11);
        let mut state = SessionState::begin("Volkswagen ID.4", 35.0, 2_000.0, Utc::now());

        for _ in 0..50 {
            let (_, next) = sim.advance(id4, &state, 30.0).unwrap();
            state = next;
        }
        let expected =
            35.0 + (state.energy_wh - state.meter_start_wh) / id4.battery_capacity_wh * 100.0;
        assert!((state.soc - expected.min(100.0)).abs() < 1e-9);
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        let registry = VehicleRegistry::builtin();
        let tesla = registry.lookup("Tesla Model Y").unwrap();
        let mut sim = SessionSimulator::with_seed(0);
        let state = tesla_session(40.0, 0.0);

        assert_eq!(
            sim.advance(tesla, &state, 0.0).err().unwrap(),
            Error::InvalidInterval(0.0)
        );
        assert_eq!(
            sim.advance(tesla, &state, -15.0).err().unwrap(),
            Error::InvalidInterval(-15.0)
        );
        assert!(sim.advance(tesla, &state, f64::NAN).is_err());
    }
}
