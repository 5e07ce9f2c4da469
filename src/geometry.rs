use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Smallest rectangle enclosing every input rectangle, or `None` for an empty input.
pub fn bounding_box<'a, I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a Rect>,
{
    let mut iter = rects.into_iter();
    let first = iter.next()?;
    let mut min_x = first.left();
    let mut min_y = first.top();
    let mut max_x = first.right();
    let mut max_y = first.bottom();
    for rect in iter {
        min_x = min_x.min(rect.left());
        min_y = min_y.min(rect.top());
        max_x = max_x.max(rect.right());
        max_y = max_y.max(rect.bottom());
    }
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sum_x / count, sum_y / count))
}

/// Angle of the vector `from -> to` in degrees, normalized to `[0, 360)`.
pub fn bearing_degrees(from: Point, to: Point) -> f64 {
    let angle = (to.y - from.y).atan2(to.x - from.x).to_degrees();
    if angle < 0.0 { angle + 360.0 } else { angle }
}

pub(crate) fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper crossing of two segments. Touching endpoints and collinear overlaps do not count.
pub fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    const EPS: f64 = 1e-9;
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    ((o1 > EPS && o2 < -EPS) || (o1 < -EPS && o2 > EPS))
        && ((o3 > EPS && o4 < -EPS) || (o3 < -EPS && o4 > EPS))
}

/// Acute angle between the lines through two segments, in degrees `[0, 90]`.
pub fn acute_angle_degrees(a: Point, b: Point, c: Point, d: Point) -> f64 {
    let u = (b.x - a.x, b.y - a.y);
    let v = (d.x - c.x, d.y - c.y);
    let len = (u.0 * u.0 + u.1 * u.1).sqrt() * (v.0 * v.0 + v.1 * v.1).sqrt();
    if len <= f64::EPSILON {
        return 0.0;
    }
    let cos = ((u.0 * v.0 + u.1 * v.1) / len).abs().clamp(0.0, 1.0);
    cos.acos().to_degrees()
}
