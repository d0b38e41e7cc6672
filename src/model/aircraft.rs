// src/model/aircraft.rs

use crate::simulation::config::{GLIDER_SPAWN_PROBABILITY, LIGHT_SPAWN_PROBABILITY};
use crate::simulation::random::RandomSource;
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Stable handle for an aircraft held in the tower's arena.
    pub struct AircraftId;
}

/// Reported fuel for anything that cannot run dry.
pub const UNLIMITED_FUEL: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelModel {
    /// Fuel drawn uniformly from `min..=max` ticks at creation.
    Finite { min: i32, max: i32 },
    Unlimited,
}

/// Fixed per-type behaviour, looked up instead of dispatched virtually.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub time_to_takeoff: u32,
    pub time_to_land: u32,
    pub fuel: FuelModel,
}

pub const COMMERCIAL: Profile = Profile {
    time_to_takeoff: 4,
    time_to_land: 6,
    fuel: FuelModel::Finite { min: 40, max: 80 },
};

pub const LIGHT: Profile = Profile {
    time_to_takeoff: 4,
    time_to_land: 6,
    fuel: FuelModel::Finite { min: 20, max: 40 },
};

pub const GLIDER: Profile = Profile {
    time_to_takeoff: 6,
    time_to_land: 8,
    fuel: FuelModel::Unlimited,
};

/// A glider coupled behind a light aircraft. Owned by its tug; dropped on
/// detach and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowedGlider;

impl TowedGlider {
    pub fn profile(&self) -> &'static Profile {
        &GLIDER
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AircraftKind {
    Commercial,
    Light { tow: Option<TowedGlider> },
    Glider,
}

impl AircraftKind {
    pub fn profile(&self) -> &'static Profile {
        match self {
            AircraftKind::Commercial => &COMMERCIAL,
            AircraftKind::Light { .. } => &LIGHT,
            AircraftKind::Glider => &GLIDER,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AircraftKind::Commercial => "Commercial",
            AircraftKind::Light { .. } => "Light",
            AircraftKind::Glider => "Glider",
        }
    }
}

/// The type a spawn draw can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Glider,
    Light,
    Commercial,
}

/// Maps one uniform draw onto the cumulative bands
/// `[0, glider)`, `[glider, glider + light)`, `[.., .. + commercial)`.
/// Draws past the last band spawn nothing.
pub fn spawn_kind(draw: f64, commercial_probability: f64) -> Option<SpawnKind> {
    let glider = GLIDER_SPAWN_PROBABILITY;
    let light = glider + LIGHT_SPAWN_PROBABILITY;
    let commercial = light + commercial_probability;

    if draw < glider {
        Some(SpawnKind::Glider)
    } else if draw < light {
        Some(SpawnKind::Light)
    } else if draw < commercial {
        Some(SpawnKind::Commercial)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aircraft {
    pub kind: AircraftKind,
    /// Ticks spent contending for the runway.
    pub waiting_time: u32,
    /// Ticks of flight left. Only meaningful while airborne.
    fuel: i32,
    /// Set when a tow pair is rushed to the front of the arrivals queue.
    pub expedited: bool,
}

impl Aircraft {
    fn with_fuel(kind: AircraftKind, rng: &mut impl RandomSource) -> Self {
        let fuel = match kind.profile().fuel {
            FuelModel::Finite { min, max } => rng.uniform_int_inclusive(min, max),
            FuelModel::Unlimited => UNLIMITED_FUEL,
        };
        Self {
            kind,
            waiting_time: 0,
            fuel,
            expedited: false,
        }
    }

    pub fn commercial(rng: &mut impl RandomSource) -> Self {
        Self::with_fuel(AircraftKind::Commercial, rng)
    }

    pub fn light(towing: bool, rng: &mut impl RandomSource) -> Self {
        let tow = towing.then_some(TowedGlider);
        Self::with_fuel(AircraftKind::Light { tow }, rng)
    }

    pub fn glider() -> Self {
        Self {
            kind: AircraftKind::Glider,
            waiting_time: 0,
            fuel: UNLIMITED_FUEL,
            expedited: false,
        }
    }

    /// Departure spawns pair every light aircraft with a glider; arrival
    /// spawns never tow.
    pub fn spawn(kind: SpawnKind, for_departure: bool, rng: &mut impl RandomSource) -> Self {
        match (kind, for_departure) {
            (SpawnKind::Glider, true) => Self::light(true, rng),
            (SpawnKind::Glider, false) => Self::glider(),
            (SpawnKind::Light, _) => Self::light(false, rng),
            (SpawnKind::Commercial, _) => Self::commercial(rng),
        }
    }

    pub fn profile(&self) -> &'static Profile {
        self.kind.profile()
    }

    /// A towing pair takes off at the glider's pace.
    pub fn time_to_takeoff(&self) -> u32 {
        match &self.kind {
            AircraftKind::Light { tow: Some(glider) } => glider.profile().time_to_takeoff,
            kind => kind.profile().time_to_takeoff,
        }
    }

    pub fn time_to_land(&self) -> u32 {
        self.profile().time_to_land
    }

    pub fn fuel(&self) -> i32 {
        match self.profile().fuel {
            FuelModel::Unlimited => UNLIMITED_FUEL,
            FuelModel::Finite { .. } => self.fuel,
        }
    }

    pub fn decrement_fuel(&mut self) {
        if let FuelModel::Finite { .. } = self.profile().fuel {
            self.fuel = self.fuel.saturating_sub(1);
        }
    }

    pub fn increment_waiting_time(&mut self) {
        self.waiting_time += 1;
    }

    pub fn reset_waiting_time(&mut self) {
        self.waiting_time = 0;
    }

    pub fn is_towing(&self) -> bool {
        matches!(self.kind, AircraftKind::Light { tow: Some(_) })
    }

    /// Drops the towed glider, returning whether one was attached.
    pub fn detach_glider(&mut self) -> bool {
        match &mut self.kind {
            AircraftKind::Light { tow } => tow.take().is_some(),
            _ => false,
        }
    }

    pub fn is_out_of_fuel(&self) -> bool {
        self.fuel() <= 0
    }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<11} Fuel: {}, Waiting time: {}",
            format!("{}.", self.kind.label()),
            self.fuel(),
            self.waiting_time
        )?;
        if self.is_towing() {
            write!(f, ", towing a glider")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::random::SimRng;

    #[test]
    fn glider_fuel_is_always_unlimited() {
        let mut glider = Aircraft::glider();
        assert_eq!(glider.fuel(), UNLIMITED_FUEL);
        for _ in 0..10_000 {
            glider.decrement_fuel();
        }
        assert_eq!(glider.fuel(), UNLIMITED_FUEL);
        assert!(!glider.is_out_of_fuel());
    }

    #[test]
    fn light_takeoff_follows_tow() {
        let mut rng = SimRng::new(42);
        assert_eq!(Aircraft::light(false, &mut rng).time_to_takeoff(), 4);

        let mut pair = Aircraft::light(true, &mut rng);
        assert_eq!(pair.time_to_takeoff(), 6);
        assert!(pair.detach_glider());
        assert_eq!(pair.time_to_takeoff(), 4);
        assert!(!pair.detach_glider());
    }

    #[test]
    fn landing_times_per_type() {
        let mut rng = SimRng::new(1);
        assert_eq!(Aircraft::commercial(&mut rng).time_to_land(), 6);
        assert_eq!(Aircraft::light(true, &mut rng).time_to_land(), 6);
        assert_eq!(Aircraft::glider().time_to_land(), 8);
    }

    #[test]
    fn fuel_drawn_within_type_range() {
        let mut rng = SimRng::new(9);
        for _ in 0..500 {
            let c = Aircraft::commercial(&mut rng).fuel();
            assert!((40..=80).contains(&c), "commercial fuel {c}");
            let l = Aircraft::light(false, &mut rng).fuel();
            assert!((20..=40).contains(&l), "light fuel {l}");
        }
    }

    #[test]
    fn engined_aircraft_burn_fuel() {
        let mut rng = SimRng::new(5);
        let mut plane = Aircraft::commercial(&mut rng);
        let start = plane.fuel();
        for _ in 0..start {
            plane.decrement_fuel();
        }
        assert_eq!(plane.fuel(), 0);
        assert!(plane.is_out_of_fuel());
    }

    #[test]
    fn spawn_bands_are_cumulative() {
        assert_eq!(spawn_kind(0.0, 0.01), Some(SpawnKind::Glider));
        assert_eq!(spawn_kind(0.002, 0.01), Some(SpawnKind::Light));
        assert_eq!(spawn_kind(0.0069, 0.01), Some(SpawnKind::Light));
        assert_eq!(spawn_kind(0.007, 0.01), Some(SpawnKind::Commercial));
        assert_eq!(spawn_kind(0.017, 0.01), None);
        assert_eq!(spawn_kind(0.5, 0.0), None);
    }

    #[test]
    fn departure_light_spawns_tow_glider() {
        let mut rng = SimRng::new(2);
        assert!(Aircraft::spawn(SpawnKind::Glider, true, &mut rng).is_towing());
        assert!(!Aircraft::spawn(SpawnKind::Light, true, &mut rng).is_towing());
        assert_eq!(
            Aircraft::spawn(SpawnKind::Glider, false, &mut rng).kind,
            AircraftKind::Glider
        );
    }

    #[test]
    fn waiting_time_resets() {
        let mut glider = Aircraft::glider();
        glider.increment_waiting_time();
        glider.increment_waiting_time();
        assert_eq!(glider.waiting_time, 2);
        glider.reset_waiting_time();
        assert_eq!(glider.waiting_time, 0);
    }
}
