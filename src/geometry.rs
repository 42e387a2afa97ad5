//! Path normalization applied to every icon before substitution.
//!
//! Subpaths are oriented even-odd style: a subpath not enclosed by any
//! other is clockwise (y axis pointing down), and each level of nesting
//! flips the direction. Output uses absolute commands only.

use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use crate::error::GeometryError;

/// Rewrites icon path data into canonical form.
pub trait PathNormalizer: Send + Sync {
    /// `translate` moves every point by `(dx, dy)` after reorientation.
    fn normalize(&self, data: &str, translate: Option<(f64, f64)>) -> Result<String, GeometryError>;
}

/// Leaves path data untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl PathNormalizer for Passthrough {
    fn normalize(&self, data: &str, _translate: Option<(f64, f64)>) -> Result<String, GeometryError> {
        Ok(data.to_string())
    }
}

/// Even-odd reorientation plus optional translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalWinding;

impl PathNormalizer for CanonicalWinding {
    fn normalize(&self, data: &str, translate: Option<(f64, f64)>) -> Result<String, GeometryError> {
        // Nothing drawable (blank data, bare move-tos) normalizes to "".
        let mut subpaths = parse_subpaths(data)?;
        reorient(&mut subpaths);
        if let Some((dx, dy)) = translate {
            for subpath in &mut subpaths {
                subpath.translate(dx, dy);
            }
        }
        Ok(subpaths.iter().map(SubPath::to_path_data).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

impl Point {
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    fn offset(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Line(Point),
    Quad(Point, Point),
    Cubic(Point, Point, Point),
}

impl Segment {
    fn end(&self) -> Point {
        match self {
            Segment::Line(p) | Segment::Quad(_, p) | Segment::Cubic(_, _, p) => *p,
        }
    }

    fn points_mut(&mut self) -> Vec<&mut Point> {
        match self {
            Segment::Line(p) => vec![p],
            Segment::Quad(c, p) => vec![c, p],
            Segment::Cubic(c1, c2, p) => vec![c1, c2, p],
        }
    }

    /// The same curve traversed backwards, ending at `start`.
    fn reversed(&self, start: Point) -> Segment {
        match self {
            Segment::Line(_) => Segment::Line(start),
            Segment::Quad(c, _) => Segment::Quad(*c, start),
            Segment::Cubic(c1, c2, _) => Segment::Cubic(*c2, *c1, start),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SubPath {
    start: Point,
    segments: Vec<Segment>,
    closed: bool,
}

const CURVE_SAMPLES: usize = 8;

impl SubPath {
    fn new(start: Point) -> Self {
        Self { start, segments: Vec::new(), closed: false }
    }

    /// Sampled outline used for area and containment tests.
    fn polygon(&self) -> Vec<Point> {
        let mut points = vec![self.start];
        let mut current = self.start;
        for segment in &self.segments {
            match segment {
                Segment::Line(p) => points.push(*p),
                Segment::Quad(c, p) => {
                    for step in 1..=CURVE_SAMPLES {
                        let t = step as f64 / CURVE_SAMPLES as f64;
                        points.push(current.lerp(*c, t).lerp(c.lerp(*p, t), t));
                    }
                }
                Segment::Cubic(c1, c2, p) => {
                    for step in 1..=CURVE_SAMPLES {
                        let t = step as f64 / CURVE_SAMPLES as f64;
                        let a = current.lerp(*c1, t);
                        let b = c1.lerp(*c2, t);
                        let c = c2.lerp(*p, t);
                        points.push(a.lerp(b, t).lerp(b.lerp(c, t), t));
                    }
                }
            }
            current = segment.end();
        }
        points
    }

    /// Shoelace area; positive means clockwise on a y-down canvas.
    fn signed_area(&self) -> f64 {
        let points = self.polygon();
        let n = points.len();
        (0..n)
            .map(|i| {
                let (a, b) = (points[i], points[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }

    /// Zero-area outlines count as clockwise.
    fn is_clockwise(&self) -> bool {
        self.signed_area() >= 0.0
    }

    fn reverse(&mut self) {
        let mut segments = std::mem::take(&mut self.segments);
        if self.closed {
            // Walk the implicit closing edge explicitly so curves survive.
            if segments.last().map(Segment::end) != Some(self.start) {
                segments.push(Segment::Line(self.start));
            }
        }

        let mut starts = vec![self.start];
        starts.extend(segments.iter().map(Segment::end));
        let new_start = starts.pop().unwrap_or(self.start);

        self.segments = segments
            .iter()
            .rev()
            .zip(starts.into_iter().rev())
            .map(|(segment, start)| segment.reversed(start))
            .collect();
        self.start = new_start;
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.start.offset(dx, dy);
        for segment in &mut self.segments {
            for point in segment.points_mut() {
                point.offset(dx, dy);
            }
        }
    }

    fn to_path_data(&self) -> String {
        let mut out = format!("M{} {}", num(self.start.x), num(self.start.y));
        let mut segments = self.segments.as_slice();
        if self.closed {
            if let Some((Segment::Line(last), rest)) = segments.split_last() {
                if *last == self.start {
                    segments = rest;
                }
            }
        }

        let mut current = self.start;
        for segment in segments {
            match segment {
                Segment::Line(p) if p.y == current.y && p.x != current.x => {
                    out.push_str(&format!("H{}", num(p.x)));
                }
                Segment::Line(p) if p.x == current.x && p.y != current.y => {
                    out.push_str(&format!("V{}", num(p.y)));
                }
                Segment::Line(p) => out.push_str(&format!("L{} {}", num(p.x), num(p.y))),
                Segment::Quad(c, p) => {
                    out.push_str(&format!("Q{} {} {} {}", num(c.x), num(c.y), num(p.x), num(p.y)))
                }
                Segment::Cubic(c1, c2, p) => out.push_str(&format!(
                    "C{} {} {} {} {} {}",
                    num(c1.x),
                    num(c1.y),
                    num(c2.x),
                    num(c2.y),
                    num(p.x),
                    num(p.y)
                )),
            }
            current = segment.end();
        }
        if self.closed {
            out.push('Z');
        }
        out
    }
}

fn parse_subpaths(data: &str) -> Result<Vec<SubPath>, GeometryError> {
    let mut subpaths: Vec<SubPath> = Vec::new();
    for segment in SimplifyingPathParser::from(data) {
        let segment = segment.map_err(|e| GeometryError::InvalidPathData { reason: e.to_string() })?;
        match segment {
            SimplePathSegment::MoveTo { x, y } => subpaths.push(SubPath::new(Point::new(x, y))),
            SimplePathSegment::ClosePath => {
                if let Some(current) = subpaths.last_mut() {
                    current.closed = true;
                }
            }
            other => {
                let Some(current) = subpaths.last_mut() else {
                    return Err(GeometryError::InvalidPathData {
                        reason: "drawing command before the first move-to".to_string(),
                    });
                };
                current.segments.push(match other {
                    SimplePathSegment::LineTo { x, y } => Segment::Line(Point::new(x, y)),
                    SimplePathSegment::Quadratic { x1, y1, x, y } => {
                        Segment::Quad(Point::new(x1, y1), Point::new(x, y))
                    }
                    SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                        Segment::Cubic(Point::new(x1, y1), Point::new(x2, y2), Point::new(x, y))
                    }
                    _ => continue,
                });
            }
        }
    }
    // A bare move-to draws nothing.
    subpaths.retain(|s| !s.segments.is_empty());
    Ok(subpaths)
}

fn contains(polygon: &[Point], point: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len().saturating_sub(1);
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Orient each subpath by its nesting parity, keeping the original order.
fn reorient(subpaths: &mut [SubPath]) {
    let polygons: Vec<_> = subpaths.iter().map(SubPath::polygon).collect();
    let areas: Vec<_> = subpaths.iter().map(|s| s.signed_area().abs()).collect();

    let mut by_area: Vec<usize> = (0..subpaths.len()).collect();
    by_area.sort_by(|&a, &b| areas[b].total_cmp(&areas[a]));

    let mut is_hole = vec![false; subpaths.len()];
    for (rank, &index) in by_area.iter().enumerate() {
        // The smallest larger subpath that encloses this one is its parent.
        let parent = by_area[..rank]
            .iter()
            .rev()
            .find(|&&candidate| contains(&polygons[candidate], subpaths[index].start));
        let hole = parent.is_some_and(|&p| !is_hole[p]);
        is_hole[index] = hole;
    }

    for ((subpath, hole), area) in subpaths.iter_mut().zip(is_hole).zip(areas) {
        // Strokes and degenerate shapes have no inside to orient.
        if area == 0.0 {
            continue;
        }
        if subpath.is_clockwise() == hole {
            subpath.reverse();
        }
    }
}

/// Three decimals at most; integral values print without a fraction.
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}
