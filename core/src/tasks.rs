//! Explicit timed-task records advanced by the single-threaded step loop.
//!
//! Anything that has to "wait N seconds, then do something" is scheduled as a
//! [`TimedTask`] carrying its remaining duration and the action to hand back
//! once it elapses. Owners advance their queue once per step and act on the
//! returned actions themselves.

use std::time::Duration;

/// Delayed action waiting for its duration to elapse.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedTask<A> {
    remaining: Duration,
    duration: Duration,
    action: A,
}

impl<A> TimedTask<A> {
    /// Time left before the task completes.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Total delay the task was scheduled with.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Action handed back when the task completes.
    #[must_use]
    pub const fn action(&self) -> &A {
        &self.action
    }

    /// Fraction of the delay that already elapsed, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = self.duration.saturating_sub(self.remaining);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Ordered collection of pending [`TimedTask`] records.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskQueue<A> {
    tasks: Vec<TimedTask<A>>,
}

impl<A> Default for TaskQueue<A> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<A> TaskQueue<A> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to complete once `delay` of stepped time elapsed.
    pub fn schedule(&mut self, delay: Duration, action: A) {
        self.tasks.push(TimedTask {
            remaining: delay,
            duration: delay,
            action,
        });
    }

    /// Advances every pending task by `dt` and returns the actions that
    /// completed, in the order they were scheduled.
    ///
    /// A task completes exactly once, on the first advance that brings its
    /// remaining time to zero.
    pub fn advance(&mut self, dt: Duration) -> Vec<A> {
        for task in &mut self.tasks {
            task.remaining = task.remaining.saturating_sub(dt);
        }

        let mut completed = Vec::new();
        let mut pending = Vec::with_capacity(self.tasks.len());
        for task in self.tasks.drain(..) {
            if task.remaining.is_zero() {
                completed.push(task.action);
            } else {
                pending.push(task);
            }
        }
        self.tasks = pending;
        completed
    }

    /// Iterator over the pending tasks in scheduling order.
    pub fn iter(&self) -> impl Iterator<Item = &TimedTask<A>> {
        self.tasks.iter()
    }

    /// Returns the first pending task whose action satisfies `predicate`.
    pub fn find(&self, predicate: impl Fn(&A) -> bool) -> Option<&TimedTask<A>> {
        self.tasks.iter().find(|task| predicate(&task.action))
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Reports whether no task is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
