#![forbid(unsafe_code)]

//! Fill roles for the map layers.
//!
//! The renderer draws paths; this module decides what each path looks like.
//! Roles resolve to colors through a [`Palette`] so a host can restyle the
//! map without touching selection logic.

use std::fmt;

use crate::catalog::Catalog;
use crate::selection::Selection;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the `#` is optional).
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// What a polygon represents visually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillRole {
    /// Has initiatives.
    Content,
    /// Nothing to show yet.
    Muted,
    /// The selected municipality.
    Focused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub content: Rgb,
    pub muted: Rgb,
    pub focused: Rgb,
    pub stroke: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            content: Rgb::new(0x23, 0x37, 0xEC),
            muted: Rgb::new(0xA6, 0xAF, 0xF6),
            focused: Rgb::new(0x00, 0x0F, 0x92),
            stroke: Rgb::new(0xEB, 0xEC, 0xFB),
        }
    }
}

impl Palette {
    #[inline]
    pub fn fill(&self, role: FillRole) -> Rgb {
        match role {
            FillRole::Content => self.content,
            FillRole::Muted => self.muted,
            FillRole::Focused => self.focused,
        }
    }
}

/// Paint for one polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPaint {
    pub fill: FillRole,
    /// Stroke width in screen pixels (non-scaling).
    pub stroke_width: u8,
}

/// Region fill: `Content` with municipality initiatives, else `Muted`. The
/// selected region drops its outline.
pub fn region_paint(catalog: &Catalog, selection: &Selection, code: &str) -> PathPaint {
    PathPaint {
        fill: if catalog.content.has_region_content(code) {
            FillRole::Content
        } else {
            FillRole::Muted
        },
        stroke_width: if selection.region_code() == Some(code) { 0 } else { 1 },
    }
}

/// Municipality fill: `Focused` for the selected one, else `Content`.
pub fn municipal_paint(selection: &Selection, code: &str) -> PathPaint {
    let focused = selection.municipal().is_some_and(|m| m.code == code);
    PathPaint {
        fill: if focused {
            FillRole::Focused
        } else {
            FillRole::Content
        },
        stroke_width: 1,
    }
}

/// Paint for every visible path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaintLayers {
    /// Every region, in collection order.
    pub regions: Vec<(String, PathPaint)>,
    /// Municipalities of the selected region, in list order. Empty when
    /// nothing is selected.
    pub municipals: Vec<(String, PathPaint)>,
}

impl PaintLayers {
    pub fn compute(catalog: &Catalog, selection: &Selection) -> Self {
        let regions = catalog
            .regions
            .iter()
            .map(|r| (r.code.clone(), region_paint(catalog, selection, &r.code)))
            .collect();
        let municipals = selection
            .region_code()
            .map(|code| {
                catalog
                    .containment
                    .municipals_in(code)
                    .iter()
                    .map(|m| (m.code.clone(), municipal_paint(selection, &m.code)))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            regions,
            municipals,
        }
    }
}
