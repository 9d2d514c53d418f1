use crate::foundation::error::{LyricsError, LyricsResult};

/// Font role requested from the text measurement collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontKind {
    #[default]
    Regular,
    Bold,
}

/// Text measurement collaborator.
///
/// Glyph shaping and rasterization live outside this crate; layout only needs sizes and
/// line-break positions.
pub trait TextMeasurer {
    /// Size of `text` set on a single line. Empty text reports the line height.
    fn measure(&mut self, text: &str, font: FontKind, size_px: f32) -> LyricsResult<(f64, f64)>;

    /// Byte offset at which `text` must break to fit in `max_width_px`.
    ///
    /// Returns `text.len()` when the whole text fits. The offset is always a char boundary.
    fn measure_wrap_break(
        &mut self,
        text: &str,
        font: FontKind,
        size_px: f32,
        max_width_px: f64,
    ) -> LyricsResult<usize>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure(&mut self, text: &str, font: FontKind, size_px: f32) -> LyricsResult<(f64, f64)> {
        (**self).measure(text, font, size_px)
    }

    fn measure_wrap_break(
        &mut self,
        text: &str,
        font: FontKind,
        size_px: f32,
        max_width_px: f64,
    ) -> LyricsResult<usize> {
        (**self).measure_wrap_break(text, font, size_px, max_width_px)
    }
}

/// Result of wrapping a text payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub width: f64,
    pub height: f64,
}

/// Break `text` into lines no wider than `max_width_px` (when given) and measure the block.
pub fn wrap_text(
    measurer: &mut dyn TextMeasurer,
    text: &str,
    font: FontKind,
    size_px: f32,
    max_width_px: Option<f64>,
) -> LyricsResult<WrappedText> {
    if text.is_empty() {
        let (_, h) = measurer.measure("", font, size_px)?;
        return Ok(WrappedText {
            lines: Vec::new(),
            width: 0.0,
            height: h,
        });
    }

    let mut lines = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let cut = match max_width_px {
            Some(max_w) => measurer.measure_wrap_break(rest, font, size_px, max_w)?,
            None => rest.len(),
        };
        if cut > rest.len() || !rest.is_char_boundary(cut) {
            return Err(LyricsError::invalid_state(format!(
                "measurer returned break offset {cut} outside a char boundary"
            )));
        }
        // Always make progress, even if a single glyph is wider than the line.
        let cut = if cut == 0 {
            rest.chars().next().map_or(rest.len(), char::len_utf8)
        } else {
            cut
        };
        let (line, tail) = rest.split_at(cut);
        lines.push(line.trim_end().to_string());
        rest = tail.trim_start();
    }

    let mut width = 0.0f64;
    let mut height = 0.0f64;
    for line in &lines {
        let (w, h) = measurer.measure(line, font, size_px)?;
        width = width.max(w);
        height += h;
    }
    Ok(WrappedText {
        lines,
        width,
        height,
    })
}

/// Deterministic measurer with a fixed advance per character.
///
/// Used by tests and the headless CLI; widths are `chars * advance_em * size_px`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasurer {
    pub advance_em: f64,
    pub line_height_em: f64,
    /// Bold text is this much wider.
    pub bold_factor: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            advance_em: 0.5,
            line_height_em: 1.25,
            bold_factor: 1.1,
        }
    }
}

impl MonospaceMeasurer {
    fn advance(&self, font: FontKind, size_px: f32) -> f64 {
        let base = self.advance_em * f64::from(size_px);
        match font {
            FontKind::Regular => base,
            FontKind::Bold => base * self.bold_factor,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&mut self, text: &str, font: FontKind, size_px: f32) -> LyricsResult<(f64, f64)> {
        let w = text.chars().count() as f64 * self.advance(font, size_px);
        Ok((w, self.line_height_em * f64::from(size_px)))
    }

    fn measure_wrap_break(
        &mut self,
        text: &str,
        font: FontKind,
        size_px: f32,
        max_width_px: f64,
    ) -> LyricsResult<usize> {
        let advance = self.advance(font, size_px);
        let fit = if advance > 0.0 {
            (max_width_px / advance).floor().max(0.0) as usize
        } else {
            usize::MAX
        };
        if text.chars().count() <= fit {
            return Ok(text.len());
        }
        // Byte offset just past the last char that fits.
        let hard = text
            .char_indices()
            .nth(fit)
            .map_or(text.len(), |(i, _)| i);
        // Prefer the last whitespace inside the fitting prefix.
        let soft = text[..hard]
            .char_indices()
            .filter(|(_, c)| c.is_whitespace())
            .map(|(i, _)| i)
            .last();
        Ok(match soft {
            Some(i) if i > 0 => i,
            _ => hard,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
