#![forbid(unsafe_code)]

//! Planar geometry primitives.
//!
//! Coordinates are whatever the feed uses (SWEREF 99 TM metres for the
//! Swedish administrative boundaries). Nothing here assumes a unit; all
//! predicates are plain Euclidean.

/// A position in feed coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
///
/// The empty box has inverted infinite edges so that [`Bounds::include`]
/// works without a special first case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    /// Box containing nothing.
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    /// Box spanning two corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Whether no point has been included.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grow to include `p`.
    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_x - self.min_x }
    }

    #[inline]
    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_y - self.min_y }
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Closed containment test (edges count as inside).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Where a point lies relative to a ring or polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Inside,
    Boundary,
    Outside,
}

/// A linear ring. The closing edge back to the first vertex is implicit; a
/// repeated closing vertex (as GeoJSON requires) is harmless.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Edges including the implicit closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace signed area (positive for counter-clockwise rings).
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            / 2.0
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::EMPTY;
        for &p in &self.points {
            b.include(p);
        }
        b
    }

    /// Area-weighted centroid; vertex mean for zero-area rings.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let a = self.signed_area();
        if a.abs() <= f64::EPSILON {
            let n = self.points.len() as f64;
            let (sx, sy) = self
                .points
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            return Some(Point::new(sx / n, sy / n));
        }
        let (cx, cy) = self.edges().fold((0.0, 0.0), |(cx, cy), (p, q)| {
            let cross = p.x * q.y - q.x * p.y;
            (cx + (p.x + q.x) * cross, cy + (p.y + q.y) * cross)
        });
        Some(Point::new(cx / (6.0 * a), cy / (6.0 * a)))
    }

    /// Even-odd point location with an explicit boundary check.
    pub fn locate(&self, p: Point) -> Location {
        if self.is_degenerate() {
            return Location::Outside;
        }
        let mut inside = false;
        for (a, b) in self.edges() {
            if on_segment(p, a, b) {
                return Location::Boundary;
            }
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        if inside {
            Location::Inside
        } else {
            Location::Outside
        }
    }
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let scale = (b.x - a.x).abs() + (b.y - a.y).abs();
    if cross.abs() > 1e-12 * scale.max(1.0) {
        return false;
    }
    Bounds::from_corners(a, b).contains(p)
}

/// A simple polygon: one exterior ring and zero or more holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    #[must_use]
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Exterior area minus hole area.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(Ring::area).sum();
        (self.exterior.area() - holes).max(0.0)
    }

    pub fn bounds(&self) -> Bounds {
        self.exterior.bounds()
    }

    pub fn locate(&self, p: Point) -> Location {
        match self.exterior.locate(p) {
            Location::Outside => Location::Outside,
            Location::Boundary => Location::Boundary,
            Location::Inside => {
                for hole in &self.holes {
                    match hole.locate(p) {
                        Location::Inside => return Location::Outside,
                        Location::Boundary => return Location::Boundary,
                        Location::Outside => {}
                    }
                }
                Location::Inside
            }
        }
    }

    /// Closed containment: boundary points are inside, hole interiors are not.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.locate(p) != Location::Outside
    }

    /// Area-weighted centroid with holes subtracted.
    pub fn centroid(&self) -> Option<Point> {
        let outer = self.exterior.centroid()?;
        let outer_area = self.exterior.area();
        let mut sx = outer.x * outer_area;
        let mut sy = outer.y * outer_area;
        let mut area = outer_area;
        for hole in &self.holes {
            if let Some(c) = hole.centroid() {
                let ha = hole.area();
                sx -= c.x * ha;
                sy -= c.y * ha;
                area -= ha;
            }
        }
        if area <= f64::EPSILON {
            return Some(outer);
        }
        Some(Point::new(sx / area, sy / area))
    }

    /// A point guaranteed to lie in the polygon's interior when one exists.
    ///
    /// Uses the centroid when it is strictly inside, otherwise the middle of
    /// the widest interior span on the horizontal line through the middle of
    /// the bounding box. Degenerate polygons fall back to their first vertex.
    pub fn representative_point(&self) -> Option<Point> {
        if let Some(c) = self.centroid() {
            if self.locate(c) == Location::Inside {
                return Some(c);
            }
        }
        if let Some(p) = self.scanline_point() {
            return Some(p);
        }
        self.exterior.points().first().copied()
    }

    fn scanline_point(&self) -> Option<Point> {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return None;
        }
        let y = (bounds.min_y + bounds.max_y) / 2.0;
        let mut crossings: Vec<f64> = std::iter::once(&self.exterior)
            .chain(self.holes.iter())
            .flat_map(Ring::edges)
            .filter(|(a, b)| (a.y > y) != (b.y > y))
            .map(|(a, b)| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
            .collect();
        crossings.sort_by(f64::total_cmp);

        crossings
            .chunks_exact(2)
            .filter(|span| span[1] > span[0])
            .max_by(|l, r| (l[1] - l[0]).total_cmp(&(r[1] - r[0])))
            .map(|span| Point::new((span[0] + span[1]) / 2.0, y))
    }
}

/// Polygonal geometry of a feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    /// The geometry as simple polygons (multi-part geometry flattened).
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Self::Polygon(p) => std::slice::from_ref(p),
            Self::MultiPolygon(parts) => parts,
        }
    }

    pub fn area(&self) -> f64 {
        self.polygons().iter().map(Polygon::area).sum()
    }

    pub fn bounds(&self) -> Bounds {
        self.polygons()
            .iter()
            .fold(Bounds::EMPTY, |acc, p| acc.union(&p.bounds()))
    }

    /// Closed containment against any part.
    pub fn contains(&self, p: Point) -> bool {
        self.polygons().iter().any(|poly| poly.contains(p))
    }

    /// Area-weighted centroid over all parts.
    pub fn centroid(&self) -> Option<Point> {
        let mut sx = 0.0;
        let mut sy = 0.0;
        let mut total = 0.0;
        let mut fallback = None;
        for poly in self.polygons() {
            let Some(c) = poly.centroid() else { continue };
            fallback.get_or_insert(c);
            let a = poly.area();
            sx += c.x * a;
            sy += c.y * a;
            total += a;
        }
        if total <= f64::EPSILON {
            return fallback;
        }
        Some(Point::new(sx / total, sy / total))
    }

    /// Interior point of the largest part.
    pub fn representative_point(&self) -> Option<Point> {
        self.polygons()
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .and_then(Polygon::representative_point)
    }
}
