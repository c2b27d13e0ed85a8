/// Instantaneous, advisory snapshot of pool state. Values are read from
/// relaxed atomic counters and may be stale by the time the caller looks.
#[derive(Debug, Clone)]
pub struct PoolMetrics {
    pub workers: usize,
    pub idle_workers: usize,
    pub queued_tasks: usize,
    pub submitted_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
}

impl PoolMetrics {
    pub fn utilization(&self) -> f64 {
        if self.workers == 0 {
            return 0.0;
        }
        // Counters are sampled independently, so idle may momentarily
        // read ahead of workers.
        self.workers.saturating_sub(self.idle_workers) as f64 / self.workers as f64
    }

    pub fn success_rate(&self) -> f64 {
        let finished = self.completed_tasks + self.failed_tasks;
        if finished == 0 {
            return 1.0;
        }
        self.completed_tasks as f64 / finished as f64
    }
}
