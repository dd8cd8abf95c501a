/// Host hook used to defer a draw pass to a later turn of the host event loop.
///
/// The engine calls `schedule_redraw` once per redraw request; requests are
/// not coalesced. The host is expected to eventually call
/// [`BarChart::render_if_pending`](crate::api::BarChart::render_if_pending)
/// from the scheduled callback.
pub trait RedrawScheduler {
    fn schedule_redraw(&mut self);
}

/// Scheduler that only counts requests.
///
/// Tests and polling hosts drain it with `take_requests` and then render
/// synchronously, which keeps draw passes deterministic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManualScheduler {
    requested: usize,
    total_requested: usize,
}

impl ManualScheduler {
    /// Requests received since the last `take_requests`.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.requested
    }

    /// Requests received over the scheduler's lifetime.
    #[must_use]
    pub fn total_requests(&self) -> usize {
        self.total_requested
    }

    pub fn take_requests(&mut self) -> usize {
        std::mem::take(&mut self.requested)
    }
}

impl RedrawScheduler for ManualScheduler {
    fn schedule_redraw(&mut self) {
        self.requested += 1;
        self.total_requested += 1;
    }
}

/// Scheduler for hosts that render on their own cadence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

impl RedrawScheduler for NoopScheduler {
    fn schedule_redraw(&mut self) {}
}

impl<F: FnMut()> RedrawScheduler for F {
    fn schedule_redraw(&mut self) {
        self()
    }
}
