use core::time::Duration;
use std::time::Instant;

const LOG_TARGET: &str = "  schedule";

#[derive(Debug, Clone)]
struct Task {
    name: String,
    interval: Duration,
    deadline: Instant,
}

/// Poll deadlines for a fixed set of named tasks.
///
/// Every task starts out due at the schedule's start time.
#[derive(Debug, Clone)]
pub struct Schedule {
    start: Instant,
    tasks: Vec<Task>,
}

impl Schedule {
    #[must_use]
    pub const fn new(start: Instant) -> Self {
        Self { start, tasks: Vec::new() }
    }

    /// Register a task polled every `interval`, replacing the interval of an existing task with the same name
    pub fn add(&mut self, name: impl Into<String>, interval: Duration) {
        let name = name.into();
        log::info!(target: LOG_TARGET, "({name}) set schedule to: {interval:?}");

        if let Some(task) = self.tasks.iter_mut().find(|t| t.name == name) {
            task.interval = interval;
            return;
        }

        self.tasks.push(Task {
            name,
            interval,
            deadline: self.start,
        });
    }

    /// Name and deadline of the task due soonest; ties go to the task registered first
    #[must_use]
    pub fn next_due(&self) -> Option<(&str, Instant)> {
        self.tasks
            .iter()
            .min_by_key(|t| t.deadline)
            .map(|t| (t.name.as_str(), t.deadline))
    }

    /// Record that `name` was polled at `now`, pushing its deadline one interval forward.
    ///
    /// Returns `false` if no such task exists.
    pub fn mark_polled(&mut self, name: &str, now: Instant) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.name == name) else {
            return false;
        };

        task.deadline = now + task.interval;
        log::debug!(target: LOG_TARGET, "({name}) next poll in {:?}", task.interval);
        true
    }

    /// Task names in registration order
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
