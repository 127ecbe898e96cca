use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::easing::Easing;

/// Reveal progress of the drawn values along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationPhase {
    pub phase_x: f64,
    pub phase_y: f64,
}

impl Default for AnimationPhase {
    fn default() -> Self {
        Self {
            phase_x: 1.0,
            phase_y: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseAxis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PhaseTrack {
    duration_millis: u64,
    easing: Easing,
    started_at_millis: u64,
}

impl PhaseTrack {
    /// Eased phase at `now_millis` and whether the track has finished.
    fn sample(&self, now_millis: u64) -> (f64, bool) {
        if self.duration_millis == 0 {
            return (self.easing.apply(1.0), true);
        }
        let elapsed = now_millis.saturating_sub(self.started_at_millis) as f64;
        let linear = (elapsed / self.duration_millis as f64).min(1.0);
        (self.easing.apply(linear), linear >= 1.0)
    }
}

/// Drives `phase_x`/`phase_y` from 0 to 1 over time.
///
/// Phases default to 1 (fully drawn). While two tracks run, only the one
/// with the longer duration requests redraws.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartAnimator {
    phase: AnimationPhase,
    x: Option<PhaseTrack>,
    y: Option<PhaseTrack>,
    driver: Option<PhaseAxis>,
}

impl ChartAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    #[must_use]
    pub fn phase_x(&self) -> f64 {
        self.phase.phase_x
    }

    #[must_use]
    pub fn phase_y(&self) -> f64 {
        self.phase.phase_y
    }

    /// Sets `phase_x` clamped to `[0, 1]`; non-finite input is ignored.
    pub fn set_phase_x(&mut self, phase: f64) {
        if let Some(phase) = clamp_phase(phase) {
            self.phase.phase_x = phase;
        }
    }

    /// Sets `phase_y` clamped to `[0, 1]`; non-finite input is ignored.
    pub fn set_phase_y(&mut self, phase: f64) {
        if let Some(phase) = clamp_phase(phase) {
            self.phase.phase_y = phase;
        }
    }

    pub fn animate_x(&mut self, duration_millis: u64, easing: Easing, now_millis: u64) {
        self.start_x(duration_millis, easing, now_millis);
        self.driver = Some(PhaseAxis::X);
        debug!(duration_millis, ?easing, "x reveal animation started");
    }

    pub fn animate_y(&mut self, duration_millis: u64, easing: Easing, now_millis: u64) {
        self.start_y(duration_millis, easing, now_millis);
        self.driver = Some(PhaseAxis::Y);
        debug!(duration_millis, ?easing, "y reveal animation started");
    }

    pub fn animate_xy(
        &mut self,
        duration_x_millis: u64,
        duration_y_millis: u64,
        easing_x: Easing,
        easing_y: Easing,
        now_millis: u64,
    ) {
        self.start_x(duration_x_millis, easing_x, now_millis);
        self.start_y(duration_y_millis, easing_y, now_millis);
        self.driver = Some(if duration_x_millis > duration_y_millis {
            PhaseAxis::X
        } else {
            PhaseAxis::Y
        });
        debug!(
            duration_x_millis,
            duration_y_millis,
            driver = ?self.driver,
            "xy reveal animation started"
        );
    }

    /// Advances running tracks. Returns `true` when the driving track moved
    /// and the host should redraw.
    pub fn tick(&mut self, now_millis: u64) -> bool {
        let mut redraw = false;

        if let Some(track) = self.x {
            let (phase, finished) = track.sample(now_millis);
            self.set_phase_x(phase);
            redraw |= self.driver == Some(PhaseAxis::X);
            if finished {
                self.x = None;
            }
        }
        if let Some(track) = self.y {
            let (phase, finished) = track.sample(now_millis);
            self.set_phase_y(phase);
            redraw |= self.driver == Some(PhaseAxis::Y);
            if finished {
                self.y = None;
            }
        }

        if !self.is_running() && self.driver.take().is_some() {
            debug!("reveal animation finished");
        }
        trace!(
            phase_x = self.phase.phase_x,
            phase_y = self.phase.phase_y,
            redraw,
            "animator tick"
        );
        redraw
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    /// Stops both tracks, leaving the phases where they are.
    pub fn stop(&mut self) {
        self.x = None;
        self.y = None;
        self.driver = None;
    }

    fn start_x(&mut self, duration_millis: u64, easing: Easing, now_millis: u64) {
        self.phase.phase_x = 0.0;
        self.x = Some(PhaseTrack {
            duration_millis,
            easing,
            started_at_millis: now_millis,
        });
    }

    fn start_y(&mut self, duration_millis: u64, easing: Easing, now_millis: u64) {
        self.phase.phase_y = 0.0;
        self.y = Some(PhaseTrack {
            duration_millis,
            easing,
            started_at_millis: now_millis,
        });
    }
}

fn clamp_phase(phase: f64) -> Option<f64> {
    phase.is_finite().then(|| phase.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::ChartAnimator;
    use crate::animation::Easing;

    #[test]
    fn phase_setters_clamp_and_ignore_nan() {
        let mut animator = ChartAnimator::new();
        animator.set_phase_x(1.7);
        animator.set_phase_y(-0.3);
        assert_eq!(animator.phase_x(), 1.0);
        assert_eq!(animator.phase_y(), 0.0);

        animator.set_phase_y(f64::NAN);
        assert_eq!(animator.phase_y(), 0.0);
    }

    #[test]
    fn linear_x_animation_tracks_elapsed_time() {
        let mut animator = ChartAnimator::new();
        animator.animate_x(400, Easing::Linear, 1_000);
        assert_eq!(animator.phase_x(), 0.0);

        assert!(animator.tick(1_100));
        assert!((animator.phase_x() - 0.25).abs() <= 1e-9);
        assert!(animator.is_running());

        assert!(animator.tick(1_500));
        assert_eq!(animator.phase_x(), 1.0);
        assert!(!animator.is_running());
        assert!(!animator.tick(1_600));
    }

    #[test]
    fn longer_track_drives_redraw() {
        let mut animator = ChartAnimator::new();
        animator.animate_xy(500, 200, Easing::Linear, Easing::Linear, 0);

        assert!(animator.tick(100));
        // y finishes first; x keeps driving.
        assert!(animator.tick(300));
        assert_eq!(animator.phase_y(), 1.0);
        assert!((animator.phase_x() - 0.6).abs() <= 1e-9);
    }

    #[test]
    fn tied_durations_let_y_drive() {
        let mut animator = ChartAnimator::new();
        animator.animate_xy(200, 200, Easing::Linear, Easing::Linear, 0);
        assert!(animator.tick(200));
        assert!(!animator.is_running());
    }

    #[test]
    fn non_driving_track_runs_silently() {
        let mut animator = ChartAnimator::new();
        animator.animate_y(1_000, Easing::Linear, 0);
        animator.animate_x(100, Easing::Linear, 0);

        assert!(animator.tick(100));
        assert!(animator.is_running());
        assert!(!animator.tick(500));
        assert!((animator.phase_y() - 0.5).abs() <= 1e-9);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut animator = ChartAnimator::new();
        animator.animate_y(0, Easing::InOutCubic, 50);
        assert!(animator.tick(50));
        assert_eq!(animator.phase_y(), 1.0);
        assert!(!animator.is_running());
    }

    #[test]
    fn overshooting_easing_is_clamped() {
        let mut animator = ChartAnimator::new();
        animator.animate_x(100, Easing::OutBack, 0);
        animator.tick(80);
        assert_eq!(animator.phase_x(), 1.0);
        animator.tick(100);
        assert!((animator.phase_x() - 1.0).abs() <= 1e-9);
    }
}
