//! Cancellable task scheduler on a driven clock
//!
//! Stands in for the host UI runtime's periodic callbacks. Every scheduled
//! task returns a handle; the owner cancels handles on teardown so nothing
//! fires after the screen that scheduled it is gone. The clock only moves
//! when `advance` is called, which keeps sessions deterministic under test.

/// Smallest allowed repeat interval (seconds)
pub const MIN_INTERVAL: f64 = 0.001;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Task<T> {
    handle: TaskHandle,
    payload: T,
    due: f64,
    /// Repeat interval, `None` for one-shot tasks
    interval: Option<f64>,
}

/// A task that came due
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub handle: TaskHandle,
    pub payload: T,
    /// Scheduler time the task was due at
    pub at: f64,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: f64,
    /// Due time of the task being processed; tasks scheduled from its
    /// handler are timed from here rather than from `now`
    firing_at: Option<f64>,
    next_id: u64,
    tasks: Vec<Task<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            firing_at: None,
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Current scheduler time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of pending tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    fn push(&mut self, payload: T, delay: f64, interval: Option<f64>) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            handle,
            payload,
            due: self.firing_at.unwrap_or(self.now) + delay.max(0.0),
            interval,
        });
        handle
    }

    /// Run `payload` once after `delay` seconds
    pub fn schedule_once(&mut self, delay: f64, payload: T) -> TaskHandle {
        self.push(payload, delay, None)
    }

    /// Run `payload` every `interval` seconds, first after one interval
    pub fn schedule_interval(&mut self, interval: f64, payload: T) -> TaskHandle {
        let interval = interval.max(MIN_INTERVAL);
        self.push(payload, interval, Some(interval))
    }

    /// Cancel a task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        if !self.tasks.is_empty() {
            log::debug!("Cancelling {} scheduled tasks", self.tasks.len());
        }
        self.tasks.clear();
        self.firing_at = None;
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    /// Move the clock forward. Due tasks are collected with `next_due`.
    pub fn advance(&mut self, dt: f64) {
        self.firing_at = None;
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
    }
}

impl<T: Clone> Scheduler<T> {
    /// Pop the earliest due task, ties broken by scheduling order. Periodic
    /// tasks re-arm one interval later, so a long `advance` yields one firing
    /// per elapsed interval.
    pub fn next_due(&mut self) -> Option<Fired<T>> {
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.now + crate::consts::TIME_EPSILON)
            .min_by(|(_, a), (_, b)| {
                a.due
                    .partial_cmp(&b.due)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.handle.0.cmp(&b.handle.0))
            })
            .map(|(i, _)| i);
        let Some(idx) = idx else {
            self.firing_at = None;
            return None;
        };

        match self.tasks[idx].interval {
            Some(interval) => {
                let task = &mut self.tasks[idx];
                let at = task.due;
                task.due += interval;
                self.firing_at = Some(at);
                Some(Fired {
                    handle: task.handle,
                    payload: task.payload.clone(),
                    at,
                })
            }
            None => {
                let task = self.tasks.remove(idx);
                self.firing_at = Some(task.due);
                Some(Fired {
                    handle: task.handle,
                    payload: task.payload,
                    at: task.due,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler<&'static str>) -> Vec<&'static str> {
        let mut fired = Vec::new();
        while let Some(f) = scheduler.next_due() {
            fired.push(f.payload);
        }
        fired
    }

    #[test]
    fn test_once_fires_once() {
        let mut s = Scheduler::new();
        let h = s.schedule_once(0.5, "once");
        s.advance(0.4);
        assert!(drain(&mut s).is_empty());
        s.advance(0.1);
        assert_eq!(drain(&mut s), vec!["once"]);
        assert!(!s.is_scheduled(h));
        s.advance(10.0);
        assert!(drain(&mut s).is_empty());
    }

    #[test]
    fn test_interval_catches_up() {
        let mut s = Scheduler::new();
        s.schedule_interval(0.1, "tick");
        s.advance(0.35);
        assert_eq!(drain(&mut s), vec!["tick", "tick", "tick"]);
        s.advance(0.05);
        assert_eq!(drain(&mut s), vec!["tick"]);
    }

    #[test]
    fn test_interval_accumulates_to_whole_seconds() {
        let mut s = Scheduler::new();
        s.schedule_interval(0.1, "tick");
        let mut count = 0;
        for _ in 0..600 {
            s.advance(0.1);
            count += drain(&mut s).len();
        }
        assert_eq!(count, 600);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut s = Scheduler::new();
        let a = s.schedule_interval(1.0, "a");
        s.schedule_once(1.0, "b");
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        s.advance(2.0);
        assert_eq!(drain(&mut s), vec!["b"]);
    }

    #[test]
    fn test_cancel_between_firings() {
        let mut s = Scheduler::new();
        s.schedule_once(0.1, "stop");
        let tick = s.schedule_interval(0.1, "tick");
        s.advance(0.1);

        let first = s.next_due().unwrap();
        assert_eq!(first.payload, "stop");
        s.cancel(tick);
        assert!(s.next_due().is_none());
    }

    #[test]
    fn test_order_by_due_then_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule_once(0.3, "late");
        s.schedule_once(0.1, "first");
        s.schedule_once(0.1, "second");
        s.advance(1.0);
        assert_eq!(drain(&mut s), vec!["first", "second", "late"]);
    }

    #[test]
    fn test_handler_schedules_from_due_time() {
        let mut s = Scheduler::new();
        s.schedule_once(1.0, "first");
        s.advance(1.4);
        assert_eq!(s.next_due().unwrap().payload, "first");
        // Scheduled while handling "first": timed from 1.0, not 1.4
        s.schedule_once(0.3, "follow-up");
        assert_eq!(s.next_due().unwrap().payload, "follow-up");
        assert!(s.next_due().is_none());
        // Outside a handler, timing starts from the clock
        s.schedule_once(0.5, "later");
        assert!(s.next_due().is_none());
    }

    #[test]
    fn test_cancel_all() {
        let mut s = Scheduler::new();
        s.schedule_interval(0.1, "a");
        s.schedule_once(0.2, "b");
        s.cancel_all();
        assert_eq!(s.pending(), 0);
        s.advance(5.0);
        assert!(drain(&mut s).is_empty());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut s = Scheduler::new();
        s.schedule_interval(0.0, "spin");
        s.advance(0.0025);
        assert_eq!(drain(&mut s).len(), 2);
    }
}
