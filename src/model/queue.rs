// src/model/queue.rs

use crate::model::aircraft::{Aircraft, AircraftId};
use crate::strategy::ordering::QueueOrder;
use slotmap::SlotMap;
use std::cmp::Ordering;

/// Arena owning every aircraft currently known to a tower.
pub type Fleet = SlotMap<AircraftId, Aircraft>;

/// A runway queue of aircraft handles, kept sorted by its [`QueueOrder`].
///
/// The queue never owns aircraft, only their ids; moving an aircraft
/// between queues is moving its id.
#[derive(Debug, Clone)]
pub struct AircraftQueue {
    order: QueueOrder,
    ids: Vec<AircraftId>,
}

impl AircraftQueue {
    pub fn new(order: QueueOrder) -> Self {
        Self {
            order,
            ids: Vec::new(),
        }
    }

    pub fn order(&self) -> QueueOrder {
        self.order
    }

    fn compare(&self, fleet: &Fleet, a: AircraftId, b: AircraftId) -> Ordering {
        self.order.compare(&fleet[a], &fleet[b])
    }

    /// Inserts behind every aircraft that does not order after it.
    pub fn push(&mut self, id: AircraftId, fleet: &Fleet) {
        let at = self
            .ids
            .partition_point(|&other| self.compare(fleet, other, id) != Ordering::Greater);
        self.ids.insert(at, id);
    }

    pub fn front(&self) -> Option<AircraftId> {
        self.ids.first().copied()
    }

    pub fn pop_front(&mut self) -> Option<AircraftId> {
        if self.ids.is_empty() {
            None
        } else {
            Some(self.ids.remove(0))
        }
    }

    /// Ids in service order.
    pub fn iter(&self) -> impl Iterator<Item = AircraftId> + '_ {
        self.ids.iter().copied()
    }

    pub fn contains(&self, id: AircraftId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Removes every id for which `pred` holds, visiting in service order,
    /// and returns them in that order.
    pub fn extract(&mut self, mut pred: impl FnMut(AircraftId) -> bool) -> Vec<AircraftId> {
        let mut taken = Vec::new();
        self.ids.retain(|&id| {
            if pred(id) {
                taken.push(id);
                false
            } else {
                true
            }
        });
        taken
    }

    /// Restores service order after keys changed unevenly.
    pub fn resort(&mut self, fleet: &Fleet) {
        let order = self.order;
        self.ids
            .sort_by(|&a, &b| order.compare(&fleet[a], &fleet[b]));
    }

    /// Detaches every towed glider in the queue and marks the tug expedited,
    /// so the pair is served ahead of everything else. Each pair is handled
    /// once: after detaching there is nothing left to trigger on.
    ///
    /// Only queues whose order expedites tow pairs are affected. Returns how
    /// many pairs were expedited.
    pub fn expedite_tow_pairs(&mut self, fleet: &mut Fleet) -> usize {
        if !self.order.expedites_tow_pairs() {
            return 0;
        }
        let mut expedited = 0;
        for &id in &self.ids {
            let aircraft = &mut fleet[id];
            if aircraft.detach_glider() {
                aircraft.expedited = true;
                expedited += 1;
            }
        }
        if expedited > 0 {
            self.resort(fleet);
        }
        expedited
    }
}
