use crate::foundation::{
    error::{LyricsError, LyricsResult},
    ids::DrawableId,
};

/// How one dimension of a node is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SizeSpec {
    /// Ask the node: wrapped text block, image pixels, or the parent's extent for containers.
    #[default]
    Intrinsic,
    /// Explicit size in pixels.
    Fixed(f64),
    /// Fraction of the parent's matching dimension.
    Proportional(f64),
    /// Derived from the other (already known) dimension and the aspect ratio.
    FromAspectRatio,
    /// Inherit the reference drawable's matching dimension.
    FromReference,
}

impl SizeSpec {
    fn is_explicit(self) -> bool {
        matches!(self, Self::Fixed(_) | Self::Proportional(_))
    }
}

/// Where a node sits along one axis of its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PosSpec {
    /// Explicit offset from the parent's start edge.
    Offset(f64),
    /// Fraction of the parent's extent.
    Proportional(f64),
    /// `parent/2 - own/2`, minus `own` again when `anchor_far` is set, plus `offset`.
    Centered { anchor_far: bool, offset: f64 },
    /// Far edge placed `offset` pixels inside the parent's far edge.
    AnchoredFar(f64),
    /// Placed against the reference sibling's resolved bounds.
    RelativeTo { placement: Placement, offset: f64 },
}

impl Default for PosSpec {
    fn default() -> Self {
        Self::Offset(0.0)
    }
}

/// Relation to the reference sibling used by [`PosSpec::RelativeTo`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// Same start position as the sibling.
    #[default]
    Aligned,
    /// After the sibling, including its extent ("place after").
    After,
    /// Before the sibling: own far edge against the sibling's start edge.
    Before,
}

/// Vertical alignment of a container's content inside its own bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ContentAlignment {
    /// Children keep their resolved positions.
    #[default]
    Start,
    /// The children's total extent is centred vertically.
    Center,
    /// The children's total extent is pushed to the bottom edge.
    End,
}

/// Declarative description of how a node's size and position derive from its parent or a
/// sibling drawable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutSpec {
    pub width: SizeSpec,
    pub height: SizeSpec,
    pub x: PosSpec,
    pub y: PosSpec,
    /// Width / height ratio used by [`SizeSpec::FromAspectRatio`].
    pub aspect_ratio: Option<f64>,
    /// Negative [`PosSpec::Offset`] values count from the far edge.
    pub wrap_negative: bool,
    /// Sibling used by [`SizeSpec::FromReference`] and [`PosSpec::RelativeTo`].
    pub reference: Option<DrawableId>,
}

impl LayoutSpec {
    /// Start building a spec with the flag-style builder.
    pub fn builder() -> LayoutSpecBuilder {
        LayoutSpecBuilder::default()
    }

    /// Spec filling the whole parent.
    pub fn fill() -> Self {
        Self {
            width: SizeSpec::Proportional(1.0),
            height: SizeSpec::Proportional(1.0),
            ..Self::default()
        }
    }

    /// True if any axis consumes [`LayoutSpec::reference`].
    pub fn uses_reference(&self) -> bool {
        matches!(self.width, SizeSpec::FromReference)
            || matches!(self.height, SizeSpec::FromReference)
            || matches!(self.x, PosSpec::RelativeTo { .. })
            || matches!(self.y, PosSpec::RelativeTo { .. })
    }

    /// Reject contradictory combinations that do not depend on the tree.
    pub fn validate(&self) -> LyricsResult<()> {
        for (axis, size) in [("width", self.width), ("height", self.height)] {
            match size {
                SizeSpec::Fixed(px) if !px.is_finite() || px < 0.0 => {
                    return Err(LyricsError::config(format!(
                        "{axis} must be finite and >= 0, got {px}"
                    )));
                }
                SizeSpec::Proportional(f) if !f.is_finite() => {
                    return Err(LyricsError::config(format!(
                        "{axis} fraction must be finite"
                    )));
                }
                _ => {}
            }
        }
        if self.width == SizeSpec::FromAspectRatio && self.height == SizeSpec::FromAspectRatio {
            return Err(LyricsError::config(
                "aspect-ratio derive needs one known dimension, both axes request it",
            ));
        }
        if let Some(ratio) = self.aspect_ratio
            && (!ratio.is_finite() || ratio <= 0.0)
        {
            return Err(LyricsError::config(format!(
                "aspect ratio must be finite and > 0, got {ratio}"
            )));
        }
        for (axis, pos) in [("x", self.x), ("y", self.y)] {
            let v = match pos {
                PosSpec::Offset(v) | PosSpec::Proportional(v) | PosSpec::AnchoredFar(v) => v,
                PosSpec::Centered { offset, .. } | PosSpec::RelativeTo { offset, .. } => offset,
            };
            if !v.is_finite() {
                return Err(LyricsError::config(format!("{axis} offset must be finite")));
            }
        }
        if self.reference.is_none() && self.uses_reference() {
            return Err(LyricsError::config(
                "relative_to / inherited size requested without a reference drawable",
            ));
        }
        Ok(())
    }
}

/// Flag-style builder producing a validated [`LayoutSpec`].
///
/// Mirrors the way layouts are usually described ("explicit width, centered on x, keep
/// aspect") while rejecting combinations the variant form cannot express.
#[derive(Clone, Debug, Default)]
pub struct LayoutSpecBuilder {
    spec: LayoutSpec,
    keep_aspect: bool,
}

impl LayoutSpecBuilder {
    pub fn explicit_width(mut self, px: f64) -> Self {
        self.spec.width = SizeSpec::Fixed(px);
        self
    }

    pub fn explicit_height(mut self, px: f64) -> Self {
        self.spec.height = SizeSpec::Fixed(px);
        self
    }

    pub fn proportional_width(mut self, frac: f64) -> Self {
        self.spec.width = SizeSpec::Proportional(frac);
        self
    }

    pub fn proportional_height(mut self, frac: f64) -> Self {
        self.spec.height = SizeSpec::Proportional(frac);
        self
    }

    /// Derive the dimension that is not explicitly set from the aspect ratio.
    pub fn keep_aspect(mut self, ratio: Option<f64>) -> Self {
        self.keep_aspect = true;
        self.spec.aspect_ratio = ratio;
        self
    }

    pub fn x(mut self, x: PosSpec) -> Self {
        self.spec.x = x;
        self
    }

    pub fn y(mut self, y: PosSpec) -> Self {
        self.spec.y = y;
        self
    }

    pub fn center_x(self) -> Self {
        self.x(PosSpec::Centered {
            anchor_far: false,
            offset: 0.0,
        })
    }

    pub fn center_y(self) -> Self {
        self.y(PosSpec::Centered {
            anchor_far: false,
            offset: 0.0,
        })
    }

    pub fn wrap_negative(mut self) -> Self {
        self.spec.wrap_negative = true;
        self
    }

    /// Set the sibling used by relative placement / inherited size.
    pub fn relative_to(mut self, target: DrawableId) -> Self {
        self.spec.reference = Some(target);
        self
    }

    pub fn inherit_width(mut self) -> Self {
        self.spec.width = SizeSpec::FromReference;
        self
    }

    pub fn inherit_height(mut self) -> Self {
        self.spec.height = SizeSpec::FromReference;
        self
    }

    pub fn build(mut self) -> LyricsResult<LayoutSpec> {
        if self.keep_aspect {
            match (self.spec.width.is_explicit(), self.spec.height.is_explicit()) {
                (true, true) => {
                    return Err(LyricsError::config(
                        "aspect-ratio derive requested with both width and height explicitly set",
                    ));
                }
                (true, false) => self.spec.height = SizeSpec::FromAspectRatio,
                (false, _) => self.spec.width = SizeSpec::FromAspectRatio,
            }
        }
        self.spec.validate()?;
        Ok(self.spec)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/spec.rs"]
mod tests;
