//! Run observers: hooks the retry controller calls as a run advances.

use crate::controller::{AttemptRecord, RunOutcome};
use crate::target::Target;

/// Receives run progress. All methods default to no-ops.
pub trait RunObserver: Send + Sync {
    fn run_started(&self, _target: &Target, _max_attempts: u32) {}

    fn attempt_started(&self, _target: &Target, _attempt: u32, _max_attempts: u32) {}

    fn attempt_finished(&self, _target: &Target, _record: &AttemptRecord) {}

    fn run_finished(&self, _target: &Target, _outcome: &RunOutcome) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
