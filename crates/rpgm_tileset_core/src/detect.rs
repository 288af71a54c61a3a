//! Sheet format detection
//!
//! The sheet format is recognised from its size in subtiles. A1 and A2 sheets
//! share the same size, so for those the caller has to decide.

use crate::layout::LayoutKind;
use crate::LayoutError;

/// Outcome of matching a sheet size against the known layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMatch {
    Exact(LayoutKind),
    /// Geometry alone cannot tell these apart
    Ambiguous([LayoutKind; 2]),
}

impl LayoutMatch {
    pub fn candidates(&self) -> &[LayoutKind] {
        match self {
            LayoutMatch::Exact(kind) => std::slice::from_ref(kind),
            LayoutMatch::Ambiguous(kinds) => kinds,
        }
    }
}

/// A recognised sheet, possibly still waiting on operator decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub layout: LayoutMatch,
    pub subtile_width: u32,
    pub subtile_height: u32,
    /// The measured grid implies more subtiles than the sheet provides
    pub margin_warning: bool,
}

impl Detection {
    pub fn needs_disambiguation(&self) -> bool {
        matches!(self.layout, LayoutMatch::Ambiguous(_))
    }

    /// Settle the detection into a single layout.
    ///
    /// `choice` is required when the match is ambiguous and must be one of
    /// the candidates. `allow_margin` confirms proceeding past a margin warning.
    pub fn resolve(
        &self,
        choice: Option<LayoutKind>,
        allow_margin: bool,
    ) -> Result<LayoutKind, LayoutError> {
        if self.margin_warning && !allow_margin {
            return Err(LayoutError::SuspectedMargin {
                width: self.subtile_width,
                height: self.subtile_height,
            });
        }

        match (self.layout, choice) {
            (LayoutMatch::Exact(kind), None) => Ok(kind),
            (LayoutMatch::Exact(kind), Some(choice)) if choice == kind => Ok(kind),
            (LayoutMatch::Exact(kind), Some(choice)) => Err(LayoutError::LayoutMismatch {
                detected: kind,
                requested: choice,
            }),
            (LayoutMatch::Ambiguous(candidates), Some(choice)) if candidates.contains(&choice) => {
                Ok(choice)
            }
            (LayoutMatch::Ambiguous(candidates), _) => {
                Err(LayoutError::AmbiguousLayout { candidates })
            }
        }
    }
}

/// Match a sheet size, measured in subtiles, against the known layouts.
///
/// `available_subtiles` is how many subtiles the image actually provides once
/// margin and spacing are accounted for.
pub fn detect_layout(
    subtile_width: u32,
    subtile_height: u32,
    available_subtiles: u64,
) -> Result<Detection, LayoutError> {
    let layout = match (subtile_width, subtile_height) {
        (32, 24) => LayoutMatch::Ambiguous([LayoutKind::A1, LayoutKind::A2]),
        (32, 16) => LayoutMatch::Exact(LayoutKind::A3),
        (32, 30) => LayoutMatch::Exact(LayoutKind::A4),
        _ => {
            return Err(LayoutError::UnrecognizedLayout {
                width: subtile_width,
                height: subtile_height,
            })
        }
    };

    let margin_warning = margin_suspected(subtile_width, subtile_height, available_subtiles);
    if margin_warning {
        tracing::warn!(
            "Sheet measures {}x{} subtiles but only {} are addressable; margins or spacing suspected",
            subtile_width,
            subtile_height,
            available_subtiles
        );
    }

    Ok(Detection {
        layout,
        subtile_width,
        subtile_height,
        margin_warning,
    })
}

/// Whether a measured grid implies more subtiles than are available
pub fn margin_suspected(subtile_width: u32, subtile_height: u32, available_subtiles: u64) -> bool {
    u64::from(subtile_width) * u64::from(subtile_height) > available_subtiles
}
