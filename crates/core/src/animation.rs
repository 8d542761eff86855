use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationMode {
    Running,
    Paused,
}

/// Nominal display refresh the spray animation is tuned for.
pub const FRAME_RATE: f64 = 60.0;
const MAX_FRAME_DELTA: f64 = 0.25;

/// Converts wall time into whole animation frames. Returns the frames due,
/// the fractional frame carried forward and the new last tick.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn advance_frame_clock(
    carry: f64,
    last_tick: Option<f64>,
    now_seconds: f64,
    mode: AnimationMode,
) -> (u32, f64, Option<f64>) {
    let delta = last_tick
        .map(|last| (now_seconds - last).max(0.0).min(MAX_FRAME_DELTA))
        .unwrap_or(0.0);

    match mode {
        AnimationMode::Running => {
            let elapsed = delta.mul_add(FRAME_RATE, carry);
            let frames = elapsed.floor();
            (frames as u32, elapsed - frames, Some(now_seconds))
        }
        AnimationMode::Paused => (0, 0.0, Some(now_seconds)),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    carry: f64,
    last_tick: Option<f64>,
}

impl FrameClock {
    pub fn advance(&mut self, now: Duration, mode: AnimationMode) -> u32 {
        let (frames, carry, last_tick) =
            advance_frame_clock(self.carry, self.last_tick, now.as_secs_f64(), mode);
        self.carry = carry;
        self.last_tick = last_tick;
        frames
    }
}
