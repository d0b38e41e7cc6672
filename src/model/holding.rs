// src/model/holding.rs

/// Holds items for a fixed number of ticks before they may be collected.
///
/// Residents are kept in insertion order. Removal goes by slot, never by
/// comparing items, so equal-valued residents are safe.
#[derive(Debug, Clone)]
pub struct TimedHoldingBuffer<T> {
    residents: Vec<Resident<T>>,
    release_threshold: u32,
}

#[derive(Debug, Clone)]
struct Resident<T> {
    item: T,
    dwell: u32,
}

impl<T> TimedHoldingBuffer<T> {
    pub fn new(release_threshold: u32) -> Self {
        Self {
            residents: Vec::new(),
            release_threshold,
        }
    }

    pub fn release_threshold(&self) -> u32 {
        self.release_threshold
    }

    /// Inserts with a dwell of zero.
    pub fn add(&mut self, item: T) {
        self.residents.push(Resident { item, dwell: 0 });
    }

    /// Ages every resident by one tick.
    pub fn tick(&mut self) {
        for resident in &mut self.residents {
            resident.dwell = resident.dwell.saturating_add(1);
        }
    }

    fn is_finished(&self, resident: &Resident<T>) -> bool {
        resident.dwell >= self.release_threshold
    }

    /// Residents whose dwell has reached the threshold. Does not remove them.
    pub fn peek_finished(&self) -> Vec<&T> {
        self.residents
            .iter()
            .filter(|r| self.is_finished(r))
            .map(|r| &r.item)
            .collect()
    }

    /// Residents still serving their time.
    pub fn peek_waiting(&self) -> Vec<&T> {
        self.residents
            .iter()
            .filter(|r| !self.is_finished(r))
            .map(|r| &r.item)
            .collect()
    }

    /// Every resident, finished or not.
    pub fn peek_all(&self) -> Vec<&T> {
        self.residents.iter().map(|r| &r.item).collect()
    }

    /// Removes and returns every finished resident, in insertion order.
    pub fn take_finished(&mut self) -> Vec<T> {
        let threshold = self.release_threshold;
        let (finished, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.residents)
            .into_iter()
            .partition(|r| r.dwell >= threshold);
        self.residents = waiting;
        finished.into_iter().map(|r| r.item).collect()
    }

    pub fn len(&self) -> usize {
        self.residents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_buffer_is_a_no_op() {
        let mut buffer: TimedHoldingBuffer<u8> = TimedHoldingBuffer::new(3);
        buffer.tick();
        assert!(buffer.peek_finished().is_empty());
        assert!(buffer.take_finished().is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn late_entrant_keeps_waiting() {
        let mut buffer = TimedHoldingBuffer::new(50);
        for name in ["a", "b", "c", "d"] {
            buffer.add(name);
        }
        for _ in 0..30 {
            buffer.tick();
        }
        buffer.add("e");
        for _ in 0..20 {
            buffer.tick();
        }

        assert_eq!(buffer.peek_finished(), vec![&"a", &"b", &"c", &"d"]);
        assert_eq!(buffer.peek_waiting(), vec![&"e"]);
        assert_eq!(buffer.peek_all().len(), 5);

        let finished = buffer.take_finished();
        assert_eq!(finished, vec!["a", "b", "c", "d"]);
        assert_eq!(buffer.peek_all(), vec![&"e"]);
    }

    #[test]
    fn duplicate_values_are_removed_by_slot() {
        let mut buffer = TimedHoldingBuffer::new(2);
        buffer.add(7);
        buffer.tick();
        buffer.add(7);
        buffer.tick();

        assert_eq!(buffer.take_finished(), vec![7]);
        assert_eq!(buffer.len(), 1);
        buffer.tick();
        assert_eq!(buffer.take_finished(), vec![7]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn zero_threshold_releases_immediately() {
        let mut buffer = TimedHoldingBuffer::new(0);
        buffer.add('x');
        assert_eq!(buffer.peek_finished(), vec![&'x']);
    }

    proptest! {
        #[test]
        fn released_exactly_at_threshold(threshold in 0u32..200, ticks in 0u32..400) {
            let mut buffer = TimedHoldingBuffer::new(threshold);
            buffer.add(());
            for _ in 0..ticks {
                buffer.tick();
            }
            let finished = !buffer.peek_finished().is_empty();
            prop_assert_eq!(finished, ticks >= threshold);
            prop_assert_eq!(buffer.peek_waiting().is_empty(), finished);
        }
    }
}
