use crate::foundation::error::{LyricsError, LyricsResult};

/// Playback position source, in seconds.
pub trait PlaybackClock {
    fn elapsed_time(&self) -> f64;
    fn total_time(&self) -> f64;
    fn is_paused(&self) -> bool;
}

/// Clock driven explicitly by the host (tests, headless runs).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManualClock {
    elapsed: f64,
    total: f64,
    paused: bool,
}

impl ManualClock {
    /// A playing clock at position 0.
    pub fn new(total: f64) -> LyricsResult<Self> {
        if !total.is_finite() || total < 0.0 {
            return Err(LyricsError::config(format!(
                "total time must be finite and >= 0, got {total}"
            )));
        }
        Ok(Self {
            elapsed: 0.0,
            total,
            paused: false,
        })
    }

    /// Jump to `t`, clamped to `[0, total]`.
    pub fn seek(&mut self, t: f64) -> LyricsResult<()> {
        if !t.is_finite() {
            return Err(LyricsError::config("seek position must be finite"));
        }
        self.elapsed = t.clamp(0.0, self.total);
        Ok(())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Move forward by `dt` while playing; stops at the end of the track.
    pub fn advance(&mut self, dt: f64) {
        if !self.paused && dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.total);
        }
    }
}

impl PlaybackClock for ManualClock {
    fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    fn total_time(&self) -> f64 {
        self.total
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
