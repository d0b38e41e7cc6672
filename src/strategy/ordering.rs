// src/strategy/ordering.rs

use crate::model::aircraft::Aircraft;
use std::cmp::Ordering;

/// Total orders for the runway queues. `Less` is served first.
///
/// Both are pure: comparing never changes an aircraft. Tow pairs are
/// rushed forward by a separate pass (see `AircraftQueue::expedite_tow_pairs`)
/// which sets `expedited` before ordering happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOrder {
    /// Expedited aircraft first, then ascending waiting time.
    WaitingTime,
    /// Ascending remaining fuel.
    Fuel,
}

impl QueueOrder {
    pub fn compare(self, a: &Aircraft, b: &Aircraft) -> Ordering {
        match self {
            QueueOrder::WaitingTime => b
                .expedited
                .cmp(&a.expedited)
                .then(a.waiting_time.cmp(&b.waiting_time)),
            QueueOrder::Fuel => a.fuel().cmp(&b.fuel()),
        }
    }

    /// Whether queues in this order run the tow-pair expedite pass.
    pub fn expedites_tow_pairs(self) -> bool {
        matches!(self, QueueOrder::WaitingTime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::random::SimRng;

    #[test]
    fn waiting_time_ascending() {
        let mut a = Aircraft::glider();
        let b = Aircraft::glider();
        a.waiting_time = 3;
        assert_eq!(QueueOrder::WaitingTime.compare(&b, &a), Ordering::Less);
        assert_eq!(QueueOrder::WaitingTime.compare(&a, &b), Ordering::Greater);
        assert_eq!(QueueOrder::WaitingTime.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn expedited_beats_waiting_time() {
        let mut rng = SimRng::new(1);
        let mut pair = Aircraft::light(false, &mut rng);
        pair.waiting_time = 100;
        pair.expedited = true;
        let fresh = Aircraft::glider();
        assert_eq!(QueueOrder::WaitingTime.compare(&pair, &fresh), Ordering::Less);
    }

    #[test]
    fn comparing_does_not_detach() {
        let mut rng = SimRng::new(1);
        let pair = Aircraft::light(true, &mut rng);
        let other = Aircraft::glider();
        for _ in 0..10 {
            let _ = QueueOrder::WaitingTime.compare(&pair, &other);
        }
        assert!(pair.is_towing());
    }

    #[test]
    fn fuel_ascending_with_gliders_last() {
        let mut rng = SimRng::new(4);
        let light = Aircraft::light(false, &mut rng);
        let glider = Aircraft::glider();
        assert_eq!(QueueOrder::Fuel.compare(&light, &glider), Ordering::Less);
    }
}
