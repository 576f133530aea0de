//! Named one-shot task scheduling
//!
//! The session owns exactly three timers: the recurring tick and the two
//! expiry one-shots. Each name holds at most one pending deadline;
//! scheduling a name again replaces the old deadline, so a stale timer can
//! never fire after the state it belonged to has moved on, and two tick
//! streams cannot coexist.

/// The named timers a session can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    /// Recurring simulation tick (re-armed by the caller after each fire)
    Tick,
    /// Bonus food disappears
    BonusExpiry,
    /// Speed boost ends
    BoostExpiry,
}

const TASK_COUNT: usize = 3;

impl TaskId {
    #[inline]
    fn index(self) -> usize {
        match self {
            TaskId::Tick => 0,
            TaskId::BonusExpiry => 1,
            TaskId::BoostExpiry => 2,
        }
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        match index {
            0 => TaskId::Tick,
            1 => TaskId::BonusExpiry,
            _ => TaskId::BoostExpiry,
        }
    }
}

/// Pending deadlines, one slot per [`TaskId`].
///
/// Deadlines are host-clock milliseconds; the table never reads a clock
/// itself, callers pass `now` in.
#[derive(Debug, Clone, Default)]
pub struct TaskTable {
    due: [Option<f64>; TASK_COUNT],
}

impl TaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `id` to fire at `due_ms`, replacing any pending deadline.
    pub fn schedule(&mut self, id: TaskId, due_ms: f64) {
        self.due[id.index()] = Some(due_ms);
    }

    /// Discard the pending deadline for `id`, if any.
    pub fn cancel(&mut self, id: TaskId) {
        self.due[id.index()] = None;
    }

    /// Pending deadline for `id`.
    pub fn deadline(&self, id: TaskId) -> Option<f64> {
        self.due[id.index()]
    }

    /// Remove and return the earliest task due at or before `now_ms`.
    ///
    /// Ties resolve in `TaskId` declaration order. Returns the task and the
    /// deadline it was armed for (which the caller needs to re-arm a
    /// recurring task without drift).
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TaskId, f64)> {
        let mut earliest: Option<(usize, f64)> = None;
        for (index, slot) in self.due.iter().enumerate() {
            if let Some(due) = *slot
                && due <= now_ms
                && earliest.is_none_or(|(_, best)| due < best)
            {
                earliest = Some((index, due));
            }
        }
        let (index, due) = earliest?;
        self.due[index] = None;
        Some((TaskId::from_index(index), due))
    }
}
