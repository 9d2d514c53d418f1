use crate::{
    foundation::core::Rgba8,
    foundation::error::{LyricsError, LyricsResult},
    lyrics::state::FadeParams,
    text::measure::FontKind,
};

/// Options controlling lyrics layout, fading, animation and scrolling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Index distance at which inactive lines reach their minimum alpha.
    pub max_fade_distance: u32,
    /// Alpha of a line at distance 0 from the reference line.
    pub fade_alpha_near: f64,
    /// Alpha lost between distance 0 and `max_fade_distance`.
    pub fade_alpha_span: f64,
    /// Empty lines longer than this are intermissions.
    pub intermission_min_duration_s: f64,

    /// Vertical anchor of the reference line, as a fraction of the view height.
    pub active_anchor: f64,
    pub line_gap_px: f64,
    pub line_width_fraction: f64,
    /// Inset for left/right aligned lines.
    pub side_margin_px: f64,
    pub font: FontKind,
    pub font_size_px: f32,

    pub active_scale: f64,
    pub inactive_scale: f64,
    pub active_color: Rgba8,
    pub inactive_color: Rgba8,

    pub translate_duration_s: f64,
    pub fade_duration_s: f64,
    pub scale_duration_s: f64,

    /// Pixels scrolled per input unit.
    pub scroll_speed: f64,
    /// Input deltas smaller than this (in units) are ignored.
    pub min_scroll_delta: f64,
    /// Return to the live position when playback resumes.
    pub snap_on_resume: bool,

    pub intermission_bar_width_px: f64,
    pub intermission_bar_height_px: f64,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            max_fade_distance: 3,
            fade_alpha_near: 225.0,
            fade_alpha_span: 200.0,
            intermission_min_duration_s: 1.5,
            active_anchor: 0.35,
            line_gap_px: 16.0,
            line_width_fraction: 0.9,
            side_margin_px: 40.0,
            font: FontKind::Bold,
            font_size_px: 32.0,
            active_scale: 1.0,
            inactive_scale: 0.92,
            active_color: Rgba8::WHITE,
            inactive_color: Rgba8::new(200, 200, 210, 255),
            translate_duration_s: 0.45,
            fade_duration_s: 0.3,
            scale_duration_s: 0.25,
            scroll_speed: 40.0,
            min_scroll_delta: 0.05,
            snap_on_resume: true,
            intermission_bar_width_px: 160.0,
            intermission_bar_height_px: 6.0,
        }
    }
}

impl LyricsConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> LyricsResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> LyricsResult<()> {
        if self.max_fade_distance == 0 {
            return Err(LyricsError::config("max_fade_distance must be >= 1"));
        }
        let near_ok = (0.0..=255.0).contains(&self.fade_alpha_near);
        let span_ok = self.fade_alpha_span >= 0.0 && self.fade_alpha_span <= self.fade_alpha_near;
        if !near_ok || !span_ok {
            return Err(LyricsError::config(format!(
                "fade alphas must satisfy 0 <= span <= near <= 255, got near {} span {}",
                self.fade_alpha_near, self.fade_alpha_span
            )));
        }
        if !(0.0..=1.0).contains(&self.active_anchor) {
            return Err(LyricsError::config(format!(
                "active_anchor must be in [0, 1], got {}",
                self.active_anchor
            )));
        }
        if !(self.line_width_fraction > 0.0 && self.line_width_fraction <= 1.0) {
            return Err(LyricsError::config(format!(
                "line_width_fraction must be in (0, 1], got {}",
                self.line_width_fraction
            )));
        }
        if !(self.font_size_px.is_finite() && self.font_size_px > 0.0) {
            return Err(LyricsError::config(format!(
                "font_size_px must be finite and > 0, got {}",
                self.font_size_px
            )));
        }
        for (name, v) in [
            ("intermission_min_duration_s", self.intermission_min_duration_s),
            ("line_gap_px", self.line_gap_px),
            ("side_margin_px", self.side_margin_px),
            ("translate_duration_s", self.translate_duration_s),
            ("fade_duration_s", self.fade_duration_s),
            ("scale_duration_s", self.scale_duration_s),
            ("min_scroll_delta", self.min_scroll_delta),
            ("intermission_bar_width_px", self.intermission_bar_width_px),
            ("intermission_bar_height_px", self.intermission_bar_height_px),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(LyricsError::config(format!(
                    "{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        for (name, v) in [
            ("active_scale", self.active_scale),
            ("inactive_scale", self.inactive_scale),
            ("scroll_speed", self.scroll_speed),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(LyricsError::config(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    pub fn fade_params(&self) -> FadeParams {
        FadeParams {
            max_distance: self.max_fade_distance as usize,
            alpha_near: self.fade_alpha_near,
            alpha_span: self.fade_alpha_span,
            intermission_min_duration: self.intermission_min_duration_s,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
