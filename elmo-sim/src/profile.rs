//! Vehicle electrical profiles and the registry the host injects wherever a
//! vehicle has to be resolved by name.

use crate::error::Error;

/// Piecewise-linear SoC -> power taper, as a fixed table of knot points
/// `(soc %, power W)`. Knots are sorted by SoC and span 0..=100.
#[derive(Debug, Clone, Copy)]
pub struct ChargingCurve {
    knots: &'static [(f64, f64)],
}

impl ChargingCurve {
    pub(crate) const fn new(knots: &'static [(f64, f64)]) -> Self {
        Self { knots }
    }

    /// Power the vehicle accepts at the given state of charge.
    ///
    /// Interpolates linearly between knots. A full battery accepts nothing,
    /// which makes the taper discontinuous at exactly 100 %.
    pub fn power_at(&self, soc: f64) -> f64 {
        if soc >= 100.0 {
            return 0.0;
        }
        let soc = soc.max(0.0);
        for pair in self.knots.windows(2) {
            let (s0, p0) = pair[0];
            let (s1, p1) = pair[1];
            if soc < s1 {
                return p0 + (soc - s0) / (s1 - s0) * (p1 - p0);
            }
        }
        self.knots.last().map(|&(_, p)| p).unwrap_or(0.0)
    }
}

/// Electrical characteristics of one vehicle model. Immutable configuration
/// data, defined once at startup.
#[derive(Debug, Clone, Copy)]
pub struct VehicleProfile {
    pub name: &'static str,
    pub battery_capacity_wh: f64,
    pub max_power_w: f64,
    pub nominal_voltage_v: f64,
    pub curve: ChargingCurve,
}

impl VehicleProfile {
    /// Curve power at `soc`, guarded to `[0, max_power_w]`.
    pub fn charging_power_at(&self, soc: f64) -> f64 {
        self.curve.power_at(soc).clamp(0.0, self.max_power_w)
    }
}

/// The lookup table of known vehicles. Built explicitly by the host and
/// passed by reference into whatever needs it; there is deliberately no
/// process-global instance.
pub struct VehicleRegistry {
    profiles: Vec<VehicleProfile>,
}

impl VehicleRegistry {
    /// Registry with the built-in production vehicle set.
    pub fn builtin() -> Self {
        Self {
            profiles: BUILTIN_PROFILES.to_vec(),
        }
    }

    /// Profile names in declaration order; stable across calls.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name)
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Result<&VehicleProfile, Error> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.into()))
    }
}

const BUILTIN_PROFILES: &[VehicleProfile] = &[
    VehicleProfile {
        name: "Tesla Model Y",
        battery_capacity_wh: 60_000.0,
        max_power_w: 250_000.0,
        nominal_voltage_v: 400.0,
        curve: ChargingCurve::new(&[
            (0.0, 250_000.0),
            (30.0, 250_000.0),
            (60.0, 120_000.0),
            (80.0, 60_000.0),
            (100.0, 20_000.0),
        ]),
    },
    VehicleProfile {
        name: "Volkswagen ID.4",
        battery_capacity_wh: 77_000.0,
        max_power_w: 135_000.0,
        nominal_voltage_v: 400.0,
        curve: ChargingCurve::new(&[
            (0.0, 135_000.0),
            (40.0, 135_000.0),
            (80.0, 60_000.0),
            (100.0, 20_000.0),
        ]),
    },
    VehicleProfile {
        name: "Renault Zoe",
        battery_capacity_wh: 52_000.0,
        max_power_w: 50_000.0,
        nominal_voltage_v: 400.0,
        curve: ChargingCurve::new(&[
            (0.0, 50_000.0),
            (80.0, 50_000.0),
            (100.0, 22_000.0),
        ]),
    },
    VehicleProfile {
        name: "Fiat 500e",
        battery_capacity_wh: 42_000.0,
        max_power_w: 85_000.0,
        nominal_voltage_v: 400.0,
        curve: ChargingCurve::new(&[
            (0.0, 85_000.0),
            (50.0, 85_000.0),
            (80.0, 35_000.0),
            (100.0, 15_000.0),
        ]),
    },
    VehicleProfile {
        name: "Hyundai Kona Electric",
        battery_capacity_wh: 64_000.0,
        max_power_w: 77_000.0,
        nominal_voltage_v: 400.0,
        curve: ChargingCurve::new(&[
            (0.0, 77_000.0),
            (60.0, 77_000.0),
            (80.0, 40_000.0),
            (100.0, 15_000.0),
        ]),
    },
    VehicleProfile {
        name: "Kia e-Niro",
        battery_capacity_wh: 64_000.0,
        max_power_w: 77_000.0,
        nominal_voltage_v: 400.0,
        curve: ChargingCurve::new(&[
            (0.0, 77_000.0),
            (60.0, 77_000.0),
            (80.0, 40_000.0),
            (100.0, 15_000.0),
        ]),
    },
    VehicleProfile {
        name: "Peugeot e-208",
        battery_capacity_wh: 50_000.0,
        max_power_w: 100_000.0,
        nominal_voltage_v: 400.0,
        curve: ChargingCurve::new(&[
            (0.0, 100_000.0),
            (80.0, 100_000.0),
            (100.0, 22_000.0),
        ]),
    },
    VehicleProfile {
        name: "Cupra Born",
        battery_capacity_wh: 58_000.0,
        max_power_w: 120_000.0,
        nominal_voltage_v: 400.0,
        curve: ChargingCurve::new(&[
            (0.0, 120_000.0),
            (40.0, 120_000.0),
            (80.0, 40_000.0),
            (100.0, 20_000.0),
        ]),
    },
    VehicleProfile {
        name: "Porsche Taycan",
        battery_capacity_wh: 93_000.0,
        max_power_w: 270_000.0,
        nominal_voltage_v: 800.0,
        curve: ChargingCurve::new(&[
            (0.0, 270_000.0),
            (30.0, 270_000.0),
            (60.0, 150_000.0),
            (80.0, 60_000.0),
            (100.0, 20_000.0),
        ]),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_stays_within_rated_bounds() {
        let registry = VehicleRegistry::builtin();
        for name in registry.names().collect::<Vec<_>>() {
            let profile = registry.lookup(name).unwrap();
            for soc in 0..=100 {
                let p = profile.charging_power_at(soc as f64);
                assert!(
                    (0.0..=profile.max_power_w).contains(&p),
                    "{name} at {soc}%: {p} W out of [0, {}]",
                    profile.max_power_w
                );
            }
        }
    }

    #[test]
    fn curve_tapers_monotonically() {
        let registry = VehicleRegistry::builtin();
        for name in registry.names().collect::<Vec<_>>() {
            let profile = registry.lookup(name).unwrap();
            let mut prev = profile.charging_power_at(0.0);
            for soc in 1..=100 {
                let p = profile.charging_power_at(soc as f64);
                assert!(p <= prev + 1e-9, "{name}: power rose at {soc}%");
                prev = p;
            }
        }
    }

    #[test]
    fn tesla_knee_points() {
        let registry = VehicleRegistry::builtin();
        let tesla = registry.lookup("Tesla Model Y").unwrap();
        assert_eq!(tesla.charging_power_at(0.0), 250_000.0);
        assert_eq!(tesla.charging_power_at(29.9).round(), 250_000.0);
        // Inside the first taper segment: 250 kW - (50-30)/30 * 130 kW.
        assert!((tesla.charging_power_at(50.0) - 163_333.333_333).abs() < 1e-3);
        assert_eq!(tesla.charging_power_at(100.0), 0.0);
        assert_eq!(tesla.charging_power_at(120.0), 0.0);
    }

    #[test]
    fn negative_soc_clamps_to_curve_start() {
        let registry = VehicleRegistry::builtin();
        let zoe = registry.lookup("Renault Zoe").unwrap();
        assert_eq!(zoe.charging_power_at(-5.0), 50_000.0);
    }

    #[test]
    fn lookup_is_exact_and_repeatable() {
        let registry = VehicleRegistry::builtin();
        let a = registry.lookup("Porsche Taycan").unwrap();
        let b = registry.lookup("Porsche Taycan").unwrap();
        assert_eq!(a.name, b.name);
        assert_eq!(a.battery_capacity_wh, b.battery_capacity_wh);
        assert!(registry.lookup("porsche taycan").is_err());
    }

    #[test]
    fn unknown_vehicle_fails_lookup() {
        let registry = VehicleRegistry::builtin();
        let err = registry.lookup("Nonexistent Car").err().unwrap();
        assert_eq!(err, Error::ProfileNotFound("Nonexistent Car".into()));
    }

    #[test]
    fn names_keep_declaration_order() {
        let registry = VehicleRegistry::builtin();
        let first: Vec<_> = registry.names().collect();
        let second: Vec<_> = registry.names().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 9);
        assert_eq!(first[0], "Tesla Model Y");
        assert_eq!(first[8], "Porsche Taycan");
    }
}
