// src/simulation/engine.rs

use crate::error::{check_probability, ConfigError};
use crate::model::aircraft::{spawn_kind, Aircraft, AircraftId};
use crate::model::holding::TimedHoldingBuffer;
use crate::model::queue::{AircraftQueue, Fleet};
use crate::simulation::config::{BREAKDOWN_PROBABILITY, REPAIR_TICKS};
use crate::simulation::random::{RandomSource, SimRng};
use crate::simulation::stats::ControlStats;
use crate::strategy::ordering::QueueOrder;
use crate::strategy::traits::{RunwayDecision, RunwayPolicy};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Landing,
    TakeOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunwayUse {
    pub aircraft: AircraftId,
    pub movement: Movement,
}

/// The single runway. Free for a new assignment once `busy_ticks` is zero.
#[derive(Debug, Clone, Default)]
pub struct Runway {
    occupant: Option<RunwayUse>,
    busy_ticks: u32,
}

impl Runway {
    pub fn occupant(&self) -> Option<RunwayUse> {
        self.occupant
    }

    pub fn busy_ticks(&self) -> u32 {
        self.busy_ticks
    }
}

/// The scheduler: owns both queues, the repair yard and the runway, and
/// advances them one tick at a time.
///
/// Every aircraft lives in `fleet` and its id sits in exactly one of
/// arrivals, departures, the repair yard or the runway.
#[derive(Debug)]
pub struct ControlTower<R = SimRng> {
    fleet: Fleet,
    arrivals: AircraftQueue,
    departures: AircraftQueue,
    repair_yard: TimedHoldingBuffer<AircraftId>,
    runway: Runway,
    policy: Box<dyn RunwayPolicy>,
    commercial_probability: f64,
    rng: R,
    stats: ControlStats,
    ticks_run: u64,
}

impl<R: RandomSource> ControlTower<R> {
    /// A tower with empty queues, zeroed statistics and an idle runway.
    pub fn new(
        commercial_probability: f64,
        policy: Box<dyn RunwayPolicy>,
        rng: R,
    ) -> Result<Self, ConfigError> {
        check_probability("commercial", commercial_probability)?;

        let stats = ControlStats::new(commercial_probability, policy.label());
        debug!("{} queue enabled", policy.label());

        Ok(Self {
            fleet: Fleet::with_key(),
            arrivals: AircraftQueue::new(policy.arrivals_order()),
            departures: AircraftQueue::new(QueueOrder::WaitingTime),
            repair_yard: TimedHoldingBuffer::new(REPAIR_TICKS),
            runway: Runway::default(),
            policy,
            commercial_probability,
            rng,
            stats,
            ticks_run: 0,
        })
    }

    /// Runs one full tick. The phases always run in this order.
    pub fn tick(&mut self) {
        self.check_crashes();
        self.arrivals_one_tick();
        self.departures_one_tick();
        self.repair_yard_one_tick();
        self.runway_one_tick();
        self.ticks_run += 1;
    }

    // =================================================================
    // PHASE 1: CRASHES
    // =================================================================

    /// Removes every arrival that has run out of fuel.
    pub fn check_crashes(&mut self) {
        let fleet = &self.fleet;
        let crashed = self.arrivals.extract(|id| fleet[id].is_out_of_fuel());
        for id in crashed {
            if let Some(aircraft) = self.fleet.remove(id) {
                warn!("CRASH HAS OCCURRED: {}", aircraft);
            }
            self.stats.record_crash();
        }
    }

    // =================================================================
    // PHASE 2: ARRIVALS
    // =================================================================

    /// Possibly spawns one arrival, then ages the whole arrivals queue,
    /// newcomer included.
    pub fn arrivals_one_tick(&mut self) {
        self.generate_arrival();

        // Uniform aging keeps the queue order intact.
        for id in self.arrivals.iter() {
            let aircraft = &mut self.fleet[id];
            aircraft.increment_waiting_time();
            aircraft.decrement_fuel();
        }
    }

    pub fn generate_arrival(&mut self) -> Option<AircraftId> {
        let kind = spawn_kind(self.rng.uniform_double(), self.commercial_probability)?;
        let aircraft = Aircraft::spawn(kind, false, &mut self.rng);
        debug!("New {} in arrivals", aircraft.kind.label());
        Some(self.admit_arrival(aircraft))
    }

    // =================================================================
    // PHASE 3: DEPARTURES
    // =================================================================

    /// Possibly spawns one departure, then ages the departures queue.
    /// Fuel is not burnt on the ground.
    pub fn departures_one_tick(&mut self) {
        self.generate_departure();

        for id in self.departures.iter() {
            self.fleet[id].increment_waiting_time();
        }
    }

    pub fn generate_departure(&mut self) -> Option<AircraftId> {
        let kind = spawn_kind(self.rng.uniform_double(), self.commercial_probability)?;
        let aircraft = Aircraft::spawn(kind, true, &mut self.rng);
        if aircraft.is_towing() {
            debug!("New {} (with Glider) in departures", aircraft.kind.label());
        } else {
            debug!("New {} in departures", aircraft.kind.label());
        }
        Some(self.admit_departure(aircraft))
    }

    // =================================================================
    // PHASE 4: REPAIR YARD
    // =================================================================

    /// Moves broken-down departures into the yard, ages the yard, and puts
    /// repaired aircraft back into departures with a cleared wait.
    pub fn repair_yard_one_tick(&mut self) {
        let rng = &mut self.rng;
        let broken = self
            .departures
            .extract(|_| rng.uniform_double() < BREAKDOWN_PROBABILITY);
        for id in broken {
            debug!("Breakdown: {} sent to repair yard", self.fleet[id]);
            self.repair_yard.add(id);
        }

        self.repair_yard.tick();

        for id in self.repair_yard.take_finished() {
            self.fleet[id].reset_waiting_time();
            self.departures.push(id, &self.fleet);
            debug!("Aircraft repaired, added back to departures");
        }
    }

    // =================================================================
    // PHASE 5: RUNWAY
    // =================================================================

    pub fn runway_one_tick(&mut self) {
        self.runway.busy_ticks = self.runway.busy_ticks.saturating_sub(1);
        if self.runway.busy_ticks > 0 {
            debug!("Runway busy for {}", self.runway.busy_ticks);
            return;
        }

        if let Some(finished) = self.runway.occupant.take() {
            self.clear_runway(finished);
        }

        if self.arrivals.expedite_tow_pairs(&mut self.fleet) > 0 {
            debug!("Tow pair detached and moved to the front of arrivals");
        }

        let arrival = self.arrivals.front().map(|id| &self.fleet[id]);
        let departure = self.departures.front().map(|id| &self.fleet[id]);
        match self.policy.choose(arrival, departure) {
            RunwayDecision::Land => self.land(),
            RunwayDecision::TakeOff => self.launch(),
            RunwayDecision::Idle => {}
        }
    }

    /// Books the finished movement. A tug that took off still towing has to
    /// come back down, so it rejoins arrivals; everything else leaves the
    /// simulation.
    fn clear_runway(&mut self, finished: RunwayUse) {
        let id = finished.aircraft;
        self.stats.add_waiting_time(self.fleet[id].waiting_time);

        if finished.movement == Movement::TakeOff && self.fleet[id].is_towing() {
            debug!("Tow pair airborne, joining arrivals: {}", self.fleet[id]);
            self.arrivals.push(id, &self.fleet);
        } else {
            self.fleet.remove(id);
        }
    }

    fn land(&mut self) {
        let Some(id) = self.arrivals.pop_front() else {
            return;
        };
        self.runway.busy_ticks = self.fleet[id].time_to_land();
        self.runway.occupant = Some(RunwayUse {
            aircraft: id,
            movement: Movement::Landing,
        });
        self.stats.record_landing();
        debug!("ARRIVAL: {}", self.fleet[id]);
    }

    fn launch(&mut self) {
        let Some(id) = self.departures.pop_front() else {
            return;
        };
        self.runway.busy_ticks = self.fleet[id].time_to_takeoff();
        self.runway.occupant = Some(RunwayUse {
            aircraft: id,
            movement: Movement::TakeOff,
        });
        self.stats.record_departure();
        debug!("DEPARTURE: {}", self.fleet[id]);
    }

    // =================================================================
    // ENTRY POINTS & ACCESSORS
    // =================================================================

    /// Puts an aircraft straight into the arrivals queue.
    pub fn admit_arrival(&mut self, aircraft: Aircraft) -> AircraftId {
        let id = self.fleet.insert(aircraft);
        self.arrivals.push(id, &self.fleet);
        id
    }

    /// Puts an aircraft straight into the departures queue.
    pub fn admit_departure(&mut self, aircraft: Aircraft) -> AircraftId {
        let id = self.fleet.insert(aircraft);
        self.departures.push(id, &self.fleet);
        id
    }

    pub fn aircraft(&self, id: AircraftId) -> Option<&Aircraft> {
        self.fleet.get(id)
    }

    /// Aircraft waiting to land, in service order.
    pub fn arrivals(&self) -> impl Iterator<Item = &Aircraft> + '_ {
        self.arrivals.iter().map(move |id| &self.fleet[id])
    }

    /// Aircraft waiting to take off, in service order.
    pub fn departures(&self) -> impl Iterator<Item = &Aircraft> + '_ {
        self.departures.iter().map(move |id| &self.fleet[id])
    }

    pub fn arrivals_queue(&self) -> &AircraftQueue {
        &self.arrivals
    }

    pub fn departures_queue(&self) -> &AircraftQueue {
        &self.departures
    }

    pub fn repair_yard(&self) -> &TimedHoldingBuffer<AircraftId> {
        &self.repair_yard
    }

    /// Repaired aircraft not yet returned to departures.
    pub fn repair_yard_finished(&self) -> Vec<&Aircraft> {
        self.repair_yard
            .peek_finished()
            .into_iter()
            .map(|&id| &self.fleet[id])
            .collect()
    }

    /// Aircraft still under repair.
    pub fn repair_yard_waiting(&self) -> Vec<&Aircraft> {
        self.repair_yard
            .peek_waiting()
            .into_iter()
            .map(|&id| &self.fleet[id])
            .collect()
    }

    pub fn runway(&self) -> &Runway {
        &self.runway
    }

    pub fn runway_occupant(&self) -> Option<&Aircraft> {
        self.runway.occupant.map(|u| &self.fleet[u.aircraft])
    }

    /// Number of aircraft currently held anywhere in the tower.
    pub fn fleet_len(&self) -> usize {
        self.fleet.len()
    }

    pub fn stats(&self) -> &ControlStats {
        &self.stats
    }

    pub fn into_stats(self) -> ControlStats {
        self.stats
    }

    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    pub fn policy_label(&self) -> &'static str {
        self.policy.label()
    }
}
