use crate::foundation::error::{LyricsError, LyricsResult};

/// Horizontal placement of a lyric line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// One timed lyric line.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LyricLine {
    pub text: String,
    /// Seconds from the start of the track.
    pub start_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub alignment: LineAlignment,
}

impl LyricLine {
    pub fn new(text: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            duration,
            alignment: LineAlignment::default(),
        }
    }

    pub fn with_alignment(mut self, alignment: LineAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// True if `t` lies in `[start, start + duration)`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time()
    }

    /// Structural break with no words.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Blank line long enough to count as an instrumental break.
    pub fn is_intermission(&self, min_duration: f64) -> bool {
        self.is_blank() && self.duration > min_duration
    }
}

/// Ordered lyric lines of one song.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TimingTable {
    lines: Vec<LyricLine>,
}

impl TimingTable {
    pub fn new(lines: Vec<LyricLine>) -> LyricsResult<Self> {
        let table = Self { lines };
        table.validate()?;
        Ok(table)
    }

    /// Parse `[{ "text", "start_time", "duration", "alignment" }, ...]`.
    pub fn from_json_str(s: &str) -> LyricsResult<Self> {
        let table: Self = serde_json::from_str(s)?;
        table.validate()?;
        Ok(table)
    }

    /// Start times must be finite and non-decreasing; durations finite and non-negative.
    pub fn validate(&self) -> LyricsResult<()> {
        let mut prev_start = f64::NEG_INFINITY;
        for (i, line) in self.lines.iter().enumerate() {
            if !line.start_time.is_finite() || !line.duration.is_finite() || line.duration < 0.0 {
                return Err(LyricsError::config(format!(
                    "line {i}: start_time and duration must be finite, duration >= 0"
                )));
            }
            if line.start_time < prev_start {
                return Err(LyricsError::config(format!(
                    "line {i}: start_time {} goes backwards (previous {prev_start})",
                    line.start_time
                )));
            }
            prev_start = line.start_time;
        }
        Ok(())
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// End of the last line to finish.
    pub fn end_time(&self) -> f64 {
        self.lines.iter().map(LyricLine::end_time).fold(0.0, f64::max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lyrics/timing.rs"]
mod tests;
