use crate::counter::CounterId;
use crate::message::ProbeMessage;
use crate::role::Role;
use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

/// Events the probe world schedules and processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Deliver a remote call to an endpoint's dispatch table.
    Deliver {
        /// Destination role.
        to: Role,
        /// The call being delivered.
        message: ProbeMessage,
    },
    /// Deliver a replicated counter value to the remote mirror.
    Replicate {
        /// Which counter changed.
        which: CounterId,
        /// The replicated value.
        value: u32,
    },
    /// One fixed-rate driver tick on the authoritative side.
    Tick,
}

/// An event scheduled for execution at a specific logical time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    time: Duration,
    event: Event,
    sequence: u64, // deterministic tiebreak for same-time events
}

impl ScheduledEvent {
    /// Creates a new scheduled event.
    pub fn new(time: Duration, event: Event, sequence: u64) -> Self {
        Self {
            time,
            event,
            sequence,
        }
    }

    /// The scheduled execution time.
    pub fn time(&self) -> Duration {
        self.time
    }

    /// A reference to the event.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Consumes the scheduled event and returns the event.
    pub fn into_event(self) -> Event {
        self.event
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max heap; reverse so the earliest time pops first,
        // with the sequence number breaking same-time ties deterministically.
        match other.time.cmp(&self.time) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            earlier => earlier,
        }
    }
}

/// A priority queue delivering events in chronological order.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<ScheduledEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Schedules an event for execution.
    pub fn schedule(&mut self, event: ScheduledEvent) {
        self.heap.push(event);
    }

    /// Removes and returns the earliest scheduled event.
    pub fn pop_earliest(&mut self) -> Option<ScheduledEvent> {
        self.heap.pop()
    }

    /// Returns `true` if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_time_order() {
        let mut queue = EventQueue::new();
        queue.schedule(ScheduledEvent::new(
            Duration::from_millis(300),
            Event::Tick,
            2,
        ));
        queue.schedule(ScheduledEvent::new(
            Duration::from_millis(100),
            Event::Replicate {
                which: CounterId::A,
                value: 1,
            },
            0,
        ));
        queue.schedule(ScheduledEvent::new(
            Duration::from_millis(200),
            Event::Tick,
            1,
        ));

        let first = queue.pop_earliest().expect("queue not empty");
        assert_eq!(first.time(), Duration::from_millis(100));
        assert_eq!(
            first.event(),
            &Event::Replicate {
                which: CounterId::A,
                value: 1,
            }
        );

        let times: Vec<Duration> = std::iter::from_fn(|| queue.pop_earliest())
            .map(|scheduled| scheduled.time())
            .collect();
        assert_eq!(
            times,
            vec![Duration::from_millis(200), Duration::from_millis(300)]
        );
    }

    #[test]
    fn same_time_orders_by_sequence() {
        let mut queue = EventQueue::new();
        let time = Duration::from_millis(50);
        for sequence in [2u64, 0, 1] {
            queue.schedule(ScheduledEvent::new(
                time,
                Event::Replicate {
                    which: CounterId::A,
                    value: sequence as u32,
                },
                sequence,
            ));
        }

        let values: Vec<u32> = std::iter::from_fn(|| queue.pop_earliest())
            .map(|scheduled| match scheduled.into_event() {
                Event::Replicate { value, .. } => value,
                other => panic!("unexpected event: {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![0, 1, 2]);
    }
}
