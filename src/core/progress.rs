//! Progress indicator lifecycle
//!
//! Wraps a [`ProgressSurface`] so it is shown once per job, only ever moves
//! forward, and is dismissed exactly once.

use crate::adapters::traits::ProgressSurface;
use crate::domain::ids::JobId;

/// Lifecycle state of the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Hidden,
    Visible { percent: u8 },
    Dismissed,
}

/// Progress indicator for the active job
pub struct ProgressIndicator {
    surface: Box<dyn ProgressSurface>,
    state: IndicatorState,
}

impl ProgressIndicator {
    pub fn new(surface: Box<dyn ProgressSurface>) -> Self {
        Self {
            surface,
            state: IndicatorState::Hidden,
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, IndicatorState::Visible { .. })
    }

    /// Show the indicator for a new job, resetting it to 0%
    pub fn show(&mut self, job_id: &JobId) {
        self.surface.show(job_id);
        self.state = IndicatorState::Visible { percent: 0 };
    }

    /// Forward a progress value; no-op unless visible and advancing
    pub fn update(&mut self, percent: u8) {
        let percent = percent.min(100);
        if let IndicatorState::Visible { percent: shown } = self.state {
            if percent > shown {
                self.surface.update(percent);
                self.state = IndicatorState::Visible { percent };
            }
        }
    }

    /// Dismiss the indicator; later calls are no-ops
    pub fn dismiss(&mut self) {
        if self.is_visible() {
            self.surface.dismiss();
            self.state = IndicatorState::Dismissed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::headless::{EventLog, HeadlessSurface, UiEvent};

    fn indicator() -> (ProgressIndicator, EventLog) {
        let log = EventLog::new();
        let indicator = ProgressIndicator::new(Box::new(HeadlessSurface::new(log.clone())));
        (indicator, log)
    }

    #[test]
    fn test_updates_only_move_forward() {
        let (mut indicator, log) = indicator();
        let id = JobId::generate();
        indicator.show(&id);
        indicator.update(10);
        indicator.update(5);
        indicator.update(10);
        indicator.update(200);

        assert_eq!(
            log.events(),
            vec![
                UiEvent::ProgressShown(id),
                UiEvent::ProgressUpdated(10),
                UiEvent::ProgressUpdated(100),
            ]
        );
        assert_eq!(indicator.state(), IndicatorState::Visible { percent: 100 });
    }

    #[test]
    fn test_dismissed_exactly_once() {
        let (mut indicator, log) = indicator();
        indicator.show(&JobId::generate());
        indicator.dismiss();
        indicator.dismiss();
        indicator.update(50);

        assert_eq!(log.count(|e| matches!(e, UiEvent::ProgressDismissed)), 1);
        assert_eq!(log.count(|e| matches!(e, UiEvent::ProgressUpdated(_))), 0);
        assert_eq!(indicator.state(), IndicatorState::Dismissed);
    }

    #[test]
    fn test_dismiss_before_show_is_noop() {
        let (mut indicator, log) = indicator();
        indicator.dismiss();
        assert!(log.events().is_empty());
        assert_eq!(indicator.state(), IndicatorState::Hidden);
    }
}
