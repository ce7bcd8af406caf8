//! Card motion state machine for the top card of the deck.
//!
//! ```text
//!   Idle --pointer_down--> Dragging --pointer_up, |dx| <= threshold--> Idle
//!                             |
//!                             +--pointer_up, |dx| > threshold--> Exiting(Gesture)
//!   Idle --request_exit-----------------------------------> Exiting(Programmatic)
//! ```
//!
//! A gesture exit completes on release. A programmatic exit completes when
//! the caller reports the end of the timed animation via
//! [`CardMotion::finish_exit`]. Either way completion is reported once.

use std::time::Duration;

use serde::Serialize;

use crate::decisions::Decision;

/// Release offset (px) beyond which a drag commits.
pub const DEFAULT_SWIPE_THRESHOLD_PX: f64 = 100.0;

/// Duration of a button or keyboard triggered exit.
pub const DEFAULT_EXIT_DURATION: Duration = Duration::from_millis(300);

/// Horizontal distance a card travels when it leaves.
pub const DEFAULT_EXIT_DISTANCE_PX: f64 = 500.0;

/// Offset (px) at which rotation reaches [`MAX_ROTATION_DEG`].
const ROTATION_RANGE_PX: f64 = 200.0;

const MAX_ROTATION_DEG: f64 = 25.0;

/// Opacity stays at 1 up to this offset, then falls to 0 at
/// [`ROTATION_RANGE_PX`].
const OPACITY_PLATEAU_PX: f64 = 100.0;

/// Offset (px) at which an indicator overlay is fully visible.
const OVERLAY_RANGE_PX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Right saves, left dismisses.
    pub fn decision(self) -> Decision {
        match self {
            Direction::Right => Decision::Save,
            Direction::Left => Decision::Dismiss,
        }
    }

    pub fn from_decision(decision: Decision) -> Self {
        match decision {
            Decision::Save => Direction::Right,
            Decision::Dismiss => Direction::Left,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    pub threshold_px: f64,
    pub exit_duration: Duration,
    pub exit_distance_px: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            exit_duration: DEFAULT_EXIT_DURATION,
            exit_distance_px: DEFAULT_EXIT_DISTANCE_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitMode {
    /// Released past the threshold; the card's own momentum carries it off.
    Gesture,
    /// Requested by a button or key; runs the timed exit animation.
    Programmatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MotionState {
    Idle,
    Dragging { offset: f64 },
    Exiting { direction: Direction, mode: ExitMode },
}

/// Outcome of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Below threshold; the card is back at rest.
    SnappedBack,
    /// Past threshold; the decision is final.
    Committed(Direction),
    /// The card was not being dragged.
    Ignored,
}

/// Outcome of a programmatic exit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequest {
    /// Run the exit animation, then call [`CardMotion::finish_exit`].
    Animate { direction: Direction, duration: Duration },
    /// The card is busy (dragging or already leaving).
    Ignored,
}

/// Presentation values derived from the motion state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardTransform {
    pub offset_x: f64,
    pub rotation_deg: f64,
    pub opacity: f64,
    pub save_overlay: f64,
    pub pass_overlay: f64,
}

#[derive(Debug, Clone)]
pub struct CardMotion {
    config: MotionConfig,
    state: MotionState,
    completed: bool,
}

impl CardMotion {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            state: MotionState::Idle,
            completed: false,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.state, MotionState::Exiting { .. })
    }

    pub fn pointer_down(&mut self) -> bool {
        if self.state != MotionState::Idle {
            return false;
        }
        self.state = MotionState::Dragging { offset: 0.0 };
        true
    }

    /// Track the horizontal offset from the pointer-down position.
    pub fn pointer_move(&mut self, offset: f64) -> bool {
        match &mut self.state {
            MotionState::Dragging { offset: current } if offset.is_finite() => {
                *current = offset;
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self) -> Release {
        let MotionState::Dragging { offset } = self.state else {
            return Release::Ignored;
        };

        if offset.abs() <= self.config.threshold_px {
            self.state = MotionState::Idle;
            return Release::SnappedBack;
        }

        let direction = if offset > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        };
        self.state = MotionState::Exiting {
            direction,
            mode: ExitMode::Gesture,
        };
        self.completed = true;
        Release::Committed(direction)
    }

    pub fn request_exit(&mut self, direction: Direction) -> ExitRequest {
        if self.state != MotionState::Idle {
            return ExitRequest::Ignored;
        }
        self.state = MotionState::Exiting {
            direction,
            mode: ExitMode::Programmatic,
        };
        ExitRequest::Animate {
            direction,
            duration: self.config.exit_duration,
        }
    }

    /// Report the end of a programmatic exit animation.
    ///
    /// Returns the direction the first time it is called for a programmatic
    /// exit and `None` on every later call.
    pub fn finish_exit(&mut self) -> Option<Direction> {
        match self.state {
            MotionState::Exiting {
                direction,
                mode: ExitMode::Programmatic,
            } if !self.completed => {
                self.completed = true;
                Some(direction)
            }
            _ => None,
        }
    }

    pub fn transform(&self) -> CardTransform {
        match self.state {
            MotionState::Idle => drag_transform(0.0),
            MotionState::Dragging { offset } => drag_transform(offset),
            MotionState::Exiting {
                direction,
                mode: ExitMode::Gesture,
            } => drag_transform(direction.sign() * self.config.exit_distance_px),
            MotionState::Exiting {
                mode: ExitMode::Programmatic,
                ..
            } => self.exit_frame(0.0),
        }
    }

    /// Transform at `progress` (0..=1) through the exit animation.
    ///
    /// Indicator overlays are forced to full intensity for the exit
    /// direction. Outside an exit this is the resting transform.
    pub fn exit_frame(&self, progress: f64) -> CardTransform {
        let MotionState::Exiting { direction, .. } = self.state else {
            return drag_transform(0.0);
        };
        let offset = direction.sign() * self.config.exit_distance_px * ease_out_cubic(progress);
        let mut frame = drag_transform(offset);
        match direction {
            Direction::Right => {
                frame.save_overlay = 1.0;
                frame.pass_overlay = 0.0;
            }
            Direction::Left => {
                frame.save_overlay = 0.0;
                frame.pass_overlay = 1.0;
            }
        }
        frame
    }
}

impl Default for CardMotion {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

fn drag_transform(offset: f64) -> CardTransform {
    CardTransform {
        offset_x: offset,
        rotation_deg: interpolate(
            offset,
            &[-ROTATION_RANGE_PX, ROTATION_RANGE_PX],
            &[-MAX_ROTATION_DEG, MAX_ROTATION_DEG],
        ),
        opacity: interpolate(
            offset,
            &[
                -ROTATION_RANGE_PX,
                -OPACITY_PLATEAU_PX,
                OPACITY_PLATEAU_PX,
                ROTATION_RANGE_PX,
            ],
            &[0.0, 1.0, 1.0, 0.0],
        ),
        save_overlay: interpolate(offset, &[0.0, OVERLAY_RANGE_PX], &[0.0, 1.0]),
        pass_overlay: interpolate(offset, &[-OVERLAY_RANGE_PX, 0.0], &[1.0, 0.0]),
    }
}

/// Piecewise-linear map of `x` through `input` -> `output`, clamped at both
/// ends. `input` must be ascending and the same length as `output`.
fn interpolate(x: f64, input: &[f64], output: &[f64]) -> f64 {
    debug_assert_eq!(input.len(), output.len());
    let (Some(&first), Some(&last)) = (input.first(), input.last()) else {
        return 0.0;
    };
    if x <= first {
        return output[0];
    }
    if x >= last {
        return output[output.len() - 1];
    }
    for i in 1..input.len() {
        if x <= input[i] {
            let span = input[i] - input[i - 1];
            let t = if span == 0.0 { 1.0 } else { (x - input[i - 1]) / span };
            return output[i - 1] + t * (output[i] - output[i - 1]);
        }
    }
    output[output.len() - 1]
}

fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}
