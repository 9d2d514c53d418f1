use crate::{
    foundation::core::Bounds,
    foundation::error::{LyricsError, LyricsResult},
    layout::spec::{ContentAlignment, LayoutSpec, Placement, PosSpec, SizeSpec},
};

/// Natural size of a node, asked for during the measure phase.
pub trait IntrinsicSize {
    /// Natural `(width, height)` when laid out no wider than `max_width`.
    fn intrinsic_size(&mut self, max_width: f64) -> LyricsResult<(f64, f64)>;

    /// Natural width / height ratio, if the content has one.
    fn aspect_ratio(&self) -> Option<f64> {
        None
    }
}

/// Fixed natural size; also used for content with no intrinsic size at all.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedIntrinsic {
    pub w: f64,
    pub h: f64,
}

impl IntrinsicSize for FixedIntrinsic {
    fn intrinsic_size(&mut self, _max_width: f64) -> LyricsResult<(f64, f64)> {
        Ok((self.w, self.h))
    }

    fn aspect_ratio(&self) -> Option<f64> {
        (self.w > 0.0 && self.h > 0.0).then(|| self.w / self.h)
    }
}

/// Resolve `spec` against `parent` (and the reference sibling's bounds, if any).
///
/// Pure: identical inputs always produce identical bounds.
pub fn resolve(
    spec: &LayoutSpec,
    parent: Bounds,
    reference: Option<Bounds>,
    intrinsic: &mut dyn IntrinsicSize,
) -> LyricsResult<Bounds> {
    if spec.reference.is_some() && !spec.uses_reference() {
        tracing::warn!(
            "layout spec has a relative_to reference but no axis uses it; ignoring the relation"
        );
    }
    let (w, h) = measure(spec, parent, reference, intrinsic)?;
    let x = position_axis(
        spec.x,
        spec.wrap_negative,
        parent.x,
        parent.w,
        w,
        reference.map(|r| (r.x, r.w)),
    )?;
    let y = position_axis(
        spec.y,
        spec.wrap_negative,
        parent.y,
        parent.h,
        h,
        reference.map(|r| (r.y, r.h)),
    )?;
    let out = Bounds { x, y, w, h };
    if !out.is_finite() {
        return Err(LyricsError::config(format!(
            "layout resolved to non-finite bounds {out:?}"
        )));
    }
    Ok(out)
}

/// Measure phase: `(width, height)` of a node.
pub fn measure(
    spec: &LayoutSpec,
    parent: Bounds,
    reference: Option<Bounds>,
    intrinsic: &mut dyn IntrinsicSize,
) -> LyricsResult<(f64, f64)> {
    let mut w = known_size(spec.width, parent.w, reference.map(|r| r.w))?;
    let mut h = known_size(spec.height, parent.h, reference.map(|r| r.h))?;

    if spec.width == SizeSpec::Intrinsic || spec.height == SizeSpec::Intrinsic {
        let (iw, ih) = intrinsic.intrinsic_size(w.unwrap_or(parent.w).max(0.0))?;
        if spec.width == SizeSpec::Intrinsic {
            w = Some(iw);
        }
        if spec.height == SizeSpec::Intrinsic {
            h = Some(ih);
        }
    }

    let ratio = || {
        spec.aspect_ratio
            .or_else(|| intrinsic.aspect_ratio())
            .ok_or_else(|| LyricsError::config("aspect-ratio derive without a known ratio"))
    };
    match (w, h) {
        (Some(w), Some(h)) => Ok((w.max(0.0), h.max(0.0))),
        (None, Some(h)) => {
            let w = h * ratio()?;
            Ok((w.max(0.0), h.max(0.0)))
        }
        (Some(w), None) => {
            let h = w / ratio()?;
            Ok((w.max(0.0), h.max(0.0)))
        }
        (None, None) => Err(LyricsError::config(
            "aspect-ratio derive needs one known dimension",
        )),
    }
}

fn known_size(size: SizeSpec, parent: f64, reference: Option<f64>) -> LyricsResult<Option<f64>> {
    Ok(match size {
        SizeSpec::Fixed(px) => Some(px),
        SizeSpec::Proportional(frac) => Some(frac * parent),
        SizeSpec::FromReference => Some(reference.ok_or_else(|| {
            LyricsError::invalid_relation("inherited size without a resolved reference")
        })?),
        SizeSpec::Intrinsic | SizeSpec::FromAspectRatio => None,
    })
}

/// Position phase for one axis, in absolute coordinates.
fn position_axis(
    pos: PosSpec,
    wrap_negative: bool,
    parent_start: f64,
    parent_extent: f64,
    own: f64,
    reference: Option<(f64, f64)>,
) -> LyricsResult<f64> {
    Ok(match pos {
        PosSpec::Offset(v) if wrap_negative && v < 0.0 => parent_start + parent_extent - own + v,
        PosSpec::Offset(v) => parent_start + v,
        PosSpec::Proportional(frac) => parent_start + frac * parent_extent,
        PosSpec::Centered { anchor_far, offset } => {
            let mut p = parent_start + parent_extent * 0.5 - own * 0.5;
            if anchor_far {
                p -= own;
            }
            p + offset
        }
        PosSpec::AnchoredFar(v) => parent_start + parent_extent - own - v,
        PosSpec::RelativeTo { placement, offset } => {
            let (r_start, r_extent) = reference.ok_or_else(|| {
                LyricsError::invalid_relation("relative_to without a resolved reference")
            })?;
            match placement {
                Placement::Aligned => r_start + offset,
                Placement::After => r_start + r_extent + offset,
                Placement::Before => r_start - own - offset,
            }
        }
    })
}

/// Vertical shift that aligns content spanning `[top, bottom]` inside `container`.
pub fn content_alignment_offset(
    container: Bounds,
    top: f64,
    bottom: f64,
    align: ContentAlignment,
) -> f64 {
    if align == ContentAlignment::Start {
        return 0.0;
    }
    let content = (bottom - top).max(0.0);
    let target_top = container.y + align_offset(container.h, content, align);
    target_top - top
}

fn align_offset(container: f64, content: f64, align: ContentAlignment) -> f64 {
    let rem = (container - content).max(0.0);
    match align {
        ContentAlignment::Start => 0.0,
        ContentAlignment::Center => rem * 0.5,
        ContentAlignment::End => rem,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
