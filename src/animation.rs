//! Hover bounce for forecast cards.
//!
//! Each card owns a [`CardAnimation`]. Entering the card starts a fixed
//! sequence of steps that lift it along a sine ease; every step is delivered
//! later with the [`StepToken`] handed out when it was scheduled. Leaving the
//! card snaps it back and invalidates any token still in flight.

use std::time::Duration;

/// Number of steps from rest to full lift.
pub const RISE_STEPS: u8 = 10;
/// Maximum lift in logical pixels (negative is up).
pub const RISE_HEIGHT: f32 = 10.0;
pub const STEP_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Rising { step: u8 },
    Settled,
}

/// Identifies one scheduled step. Stale once the card is left, cancelled,
/// or re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepToken(u64);

#[derive(Debug, Clone)]
pub struct CardAnimation {
    phase: Phase,
    generation: u64,
    offset: f32,
}

impl Default for CardAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl CardAnimation {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            offset: 0.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current vertical offset, in `[-RISE_HEIGHT, 0]`.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Rising { .. })
    }

    /// Starts a rise unless one is already running. Returns the token for
    /// the first step to schedule.
    pub fn pointer_entered(&mut self) -> Option<StepToken> {
        if self.is_animating() {
            return None;
        }
        self.generation += 1;
        self.phase = Phase::Rising { step: 0 };
        self.offset = 0.0;
        Some(StepToken(self.generation))
    }

    pub fn pointer_left(&mut self) {
        self.cancel();
    }

    /// Stops any running sequence and puts the card back at rest.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.offset = 0.0;
    }

    /// Applies one scheduled step. Returns the token for the next step, or
    /// `None` if the sequence finished or `token` is stale.
    pub fn advance(&mut self, token: StepToken) -> Option<StepToken> {
        if token.0 != self.generation {
            return None;
        }
        let Phase::Rising { step } = self.phase else {
            return None;
        };

        let step = step + 1;
        self.offset = lift_at(step);

        if step >= RISE_STEPS {
            self.phase = Phase::Settled;
            None
        } else {
            self.phase = Phase::Rising { step };
            Some(token)
        }
    }
}

fn lift_at(step: u8) -> f32 {
    let progress = f32::from(step) / f32::from(RISE_STEPS);
    -RISE_HEIGHT * (progress * std::f32::consts::FRAC_PI_2).sin()
}
