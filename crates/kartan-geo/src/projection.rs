#![forbid(unsafe_code)]

//! Screen transforms for the map.
//!
//! Two layers, applied in order:
//!
//! 1. [`FitProjection`] maps feed coordinates to screen space once per
//!    viewport. Y is reflected (screen Y grows downward) and then stretched,
//!    which gives the elongated country a usable height on wide screens.
//! 2. [`ZoomTransform`] is the pan/zoom state on top of the projected map.
//!    Focus transforms are set directly; interactive zooming is clamped to
//!    the scale extent and the translate extent (the viewport itself).

use crate::geometry::{Bounds, Point};

/// Screen size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Negative sizes collapse to zero.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.width.max(0.0), self.height.max(0.0))
    }
}

/// Reflected identity projection fitted into a padded extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitProjection {
    pub k: f64,
    pub tx: f64,
    pub ty: f64,
    pub stretch_y: f64,
}

impl Default for FitProjection {
    fn default() -> Self {
        Self {
            k: 1.0,
            tx: 0.0,
            ty: 0.0,
            stretch_y: 1.0,
        }
    }
}

impl FitProjection {
    pub const DEFAULT_PADDING: f64 = 20.0;
    pub const DEFAULT_STRETCH_Y: f64 = 2.0;

    /// Fit `bounds` into `[padding, padding] .. [width, height / stretch_y * 0.9]`.
    ///
    /// The fit happens before stretching, so the stretched map fills the
    /// upper 90% of the viewport.
    #[must_use]
    pub fn fit(bounds: Bounds, viewport: Viewport, padding: f64, stretch_y: f64) -> Self {
        let stretch_y = if stretch_y > 0.0 { stretch_y } else { 1.0 };
        let viewport = viewport.clamped();
        let x0 = padding;
        let y0 = padding;
        let w = (viewport.width - x0).max(0.0);
        let h = (viewport.height / stretch_y * 0.9 - y0).max(0.0);

        if bounds.is_empty() {
            return Self {
                k: 1.0,
                tx: x0,
                ty: y0,
                stretch_y,
            };
        }

        let dx = bounds.width();
        let dy = bounds.height();
        let k = [w / dx, h / dy]
            .into_iter()
            .filter(|s| s.is_finite())
            .fold(f64::INFINITY, f64::min);
        let k = if k.is_finite() { k } else { 1.0 };

        Self {
            k,
            tx: x0 + (w - k * (bounds.min_x + bounds.max_x)) / 2.0,
            ty: y0 + (h + k * (bounds.min_y + bounds.max_y)) / 2.0,
            stretch_y,
        }
    }

    /// Feed coordinates to screen coordinates.
    #[inline]
    pub fn project(&self, p: Point) -> Point {
        Point::new(
            self.k * p.x + self.tx,
            (self.ty - self.k * p.y) * self.stretch_y,
        )
    }

    /// Screen coordinates back to feed coordinates.
    #[inline]
    pub fn invert(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.tx) / self.k,
            (self.ty - p.y / self.stretch_y) / self.k,
        )
    }

    /// Screen-space box of a feed-space box.
    pub fn project_bounds(&self, b: Bounds) -> Bounds {
        if b.is_empty() {
            return Bounds::EMPTY;
        }
        Bounds::from_corners(
            self.project(Point::new(b.min_x, b.min_y)),
            self.project(Point::new(b.max_x, b.max_y)),
        )
    }
}

/// Pan/zoom state: `screen = projected * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };
    pub const MIN_SCALE: f64 = 1.0;
    pub const MAX_SCALE: f64 = 8.0;
    /// Fraction of the viewport a focused region fills.
    pub const FOCUS_FILL: f64 = 0.9;

    #[must_use]
    pub const fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    #[inline]
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Scale that makes `bounds` (screen space) fill the focus fraction.
    pub fn focus_scale(bounds: Bounds, viewport: Viewport) -> f64 {
        let k = (viewport.width / bounds.width()).min(viewport.height / bounds.height());
        if k.is_finite() && k > 0.0 {
            k * Self::FOCUS_FILL
        } else {
            1.0
        }
    }

    /// Center `bounds` in the viewport at the focus scale.
    #[must_use]
    pub fn focus_bounds(bounds: Bounds, viewport: Viewport) -> Self {
        if bounds.is_empty() {
            return Self::IDENTITY;
        }
        let k = Self::focus_scale(bounds, viewport);
        let c = bounds.center();
        Self {
            k,
            x: viewport.width / 2.0 - k * c.x,
            y: viewport.height / 2.0 - k * c.y,
        }
    }

    /// Center `point` at the region's focus scale, in the part of the
    /// viewport left visible above a bottom drawer of `drawer_height`.
    #[must_use]
    pub fn focus_point(
        region_bounds: Bounds,
        point: Point,
        viewport: Viewport,
        drawer_height: f64,
    ) -> Self {
        if region_bounds.is_empty() {
            return Self::IDENTITY;
        }
        let k = Self::focus_scale(region_bounds, viewport);
        let visible = (viewport.height - drawer_height.max(0.0)).max(0.0);
        Self {
            k,
            x: viewport.width / 2.0 - k * point.x,
            y: visible / 2.0 - k * point.y,
        }
    }

    /// Multiply the scale by `factor` about the viewport center, clamped to
    /// the scale extent, then constrained to the viewport.
    #[must_use]
    pub fn zoom_by(self, factor: f64, viewport: Viewport) -> Self {
        let target = (self.k * factor).clamp(Self::MIN_SCALE, Self::MAX_SCALE);
        let p0 = viewport.center();
        let p1 = self.invert(p0);
        let scaled = Self { k: target, ..self };
        let moved = scaled.apply(p1);
        Self {
            k: target,
            x: scaled.x + p0.x - moved.x,
            y: scaled.y + p0.y - moved.y,
        }
        .constrain(viewport)
    }

    /// Keep the translate extent `[0, 0] .. [width, height]` covering the
    /// viewport, centering it when it is smaller than the viewport.
    #[must_use]
    pub fn constrain(self, viewport: Viewport) -> Self {
        let dx0 = self.invert_x(0.0);
        let dx1 = self.invert_x(viewport.width) - viewport.width;
        let dy0 = self.invert_y(0.0);
        let dy1 = self.invert_y(viewport.height) - viewport.height;
        let tx = shift(dx0, dx1);
        let ty = shift(dy0, dy1);
        Self {
            k: self.k,
            x: self.x + self.k * tx,
            y: self.y + self.k * ty,
        }
    }

    #[inline]
    fn invert_x(&self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    #[inline]
    fn invert_y(&self, y: f64) -> f64 {
        (y - self.y) / self.k
    }
}

fn shift(d0: f64, d1: f64) -> f64 {
    if d1 > d0 {
        (d0 + d1) / 2.0
    } else {
        let low = d0.min(0.0);
        if low != 0.0 { low } else { d1.max(0.0) }
    }
}
