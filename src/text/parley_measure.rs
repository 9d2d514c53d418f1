use crate::{
    foundation::error::{LyricsError, LyricsResult},
    text::measure::{FontKind, TextMeasurer},
};

/// [`TextMeasurer`] backed by Parley shaping over caller-supplied font bytes.
pub struct ParleyMeasurer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    regular_family: String,
    bold_family: Option<String>,
}

impl std::fmt::Debug for ParleyMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyMeasurer")
            .field("regular_family", &self.regular_family)
            .field("bold_family", &self.bold_family)
            .finish()
    }
}

impl ParleyMeasurer {
    /// Register the regular (and optional bold) font faces.
    pub fn new(regular: &[u8], bold: Option<&[u8]>) -> LyricsResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let regular_family = register_family(&mut font_ctx, regular)?;
        let bold_family = bold
            .map(|bytes| register_family(&mut font_ctx, bytes))
            .transpose()?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            regular_family,
            bold_family,
        })
    }

    /// Family name resolved for the regular face.
    pub fn family_name(&self) -> &str {
        &self.regular_family
    }

    fn layout(
        &mut self,
        text: &str,
        font: FontKind,
        size_px: f32,
        max_width_px: Option<f32>,
    ) -> LyricsResult<parley::Layout<()>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LyricsError::config("text size_px must be finite and > 0"));
        }
        let family = match font {
            FontKind::Bold => self.bold_family.as_ref().unwrap_or(&self.regular_family),
            FontKind::Regular => &self.regular_family,
        }
        .clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(max_width_px);
        Ok(layout)
    }
}

fn register_family(font_ctx: &mut parley::FontContext, bytes: &[u8]) -> LyricsResult<String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| LyricsError::resource("no font families registered from font bytes"))?;
    Ok(font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| LyricsError::resource("registered font family has no name"))?
        .to_string())
}

impl TextMeasurer for ParleyMeasurer {
    fn measure(&mut self, text: &str, font: FontKind, size_px: f32) -> LyricsResult<(f64, f64)> {
        let layout = self.layout(text, font, size_px, None)?;
        let mut w = 0.0f64;
        let mut h = 0.0f64;
        for line in layout.lines() {
            let m = line.metrics();
            w = w.max(f64::from(m.advance));
            h += f64::from(m.ascent + m.descent + m.leading);
        }
        if h <= 0.0 {
            // Empty text still occupies one line.
            h = f64::from(size_px) * 1.2;
        }
        Ok((w, h))
    }

    fn measure_wrap_break(
        &mut self,
        text: &str,
        font: FontKind,
        size_px: f32,
        max_width_px: f64,
    ) -> LyricsResult<usize> {
        let layout = self.layout(text, font, size_px, Some(max_width_px as f32))?;
        Ok(layout
            .lines()
            .next()
            .map_or(text.len(), |line| line.text_range().end.min(text.len())))
    }
}
