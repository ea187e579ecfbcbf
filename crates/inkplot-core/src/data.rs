//! Stroke data model
//!
//! This module provides:
//! - [`Point`]: a planar sample plus its captured weight (pressure, width or radius)
//! - [`Stroke`]: one continuous pen-down interval
//! - [`Character`]: the strokes captured for one logical symbol
//! - [`Document`]: either a flat list of strokes or a list of characters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A captured sample: planar position plus an uncalibrated weight.
///
/// Serialized as the JSON triple `[x, y, w]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Weight (pen pressure, stroke width or radius)
    pub w: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64, w: f64) -> Self {
        Self { x, y, w }
    }

    /// Euclidean distance in the XY plane
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear blend towards `other` at parameter `t`
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.w + (other.w - self.w) * t,
        )
    }

    /// Same position with a different weight
    pub fn with_w(self, w: f64) -> Point {
        Point { w, ..self }
    }
}

impl From<[f64; 3]> for Point {
    fn from([x, y, w]: [f64; 3]) -> Self {
        Self { x, y, w }
    }
}

impl From<Point> for [f64; 3] {
    fn from(p: Point) -> Self {
        [p.x, p.y, p.w]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, w={:.3})", self.x, self.y, self.w)
    }
}

/// One continuous pen-down interval. Point order defines drawing direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Create a stroke from its samples
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Apply `f` to every point, producing a new stroke
    pub fn map_points<F>(&self, f: F) -> Stroke
    where
        F: FnMut(&Point) -> Point,
    {
        Stroke::new(self.points.iter().map(f).collect())
    }

    /// Total polyline length in the XY plane
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point> for Stroke {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Stroke {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Strokes captured as one logical symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Character {
    strokes: Vec<Stroke>,
}

impl Character {
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn into_strokes(self) -> Vec<Stroke> {
        self.strokes
    }

    /// Number of points across all strokes
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    /// True when no stroke carries a point
    pub fn is_blank(&self) -> bool {
        self.point_count() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.strokes.iter().flat_map(|s| s.iter())
    }
}

impl From<Vec<Stroke>> for Character {
    fn from(strokes: Vec<Stroke>) -> Self {
        Self::new(strokes)
    }
}

/// Capture mode of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// One symbol: a flat list of strokes
    #[default]
    Single,
    /// Several symbols laid out on a page
    Document,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Document => write!(f, "document"),
        }
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "strokes" => Ok(InputMode::Single),
            "document" | "characters" => Ok(InputMode::Document),
            other => Err(format!("unknown input mode '{}'", other)),
        }
    }
}

/// Complete pipeline input
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Single-character mode
    Strokes(Vec<Stroke>),
    /// Multi-character mode
    Characters(Vec<Character>),
}

impl Default for Document {
    fn default() -> Self {
        Document::Strokes(Vec::new())
    }
}

impl Document {
    pub fn mode(&self) -> InputMode {
        match self {
            Document::Strokes(_) => InputMode::Single,
            Document::Characters(_) => InputMode::Document,
        }
    }

    pub fn stroke_count(&self) -> usize {
        match self {
            Document::Strokes(strokes) => strokes.len(),
            Document::Characters(chars) => chars.iter().map(|c| c.strokes().len()).sum(),
        }
    }

    pub fn point_count(&self) -> usize {
        match self {
            Document::Strokes(strokes) => strokes.iter().map(Stroke::len).sum(),
            Document::Characters(chars) => chars.iter().map(Character::point_count).sum(),
        }
    }

    /// True when the document carries no point at all
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Copy of the document with zero-point strokes removed.
    ///
    /// Characters themselves are kept even when they end up blank, since the
    /// layout still reserves spacing for them.
    pub fn without_empty_strokes(&self) -> Document {
        fn keep(strokes: &[Stroke]) -> Vec<Stroke> {
            strokes.iter().filter(|s| !s.is_empty()).cloned().collect()
        }

        match self {
            Document::Strokes(strokes) => Document::Strokes(keep(strokes)),
            Document::Characters(chars) => Document::Characters(
                chars
                    .iter()
                    .map(|c| Character::new(keep(c.strokes())))
                    .collect(),
            ),
        }
    }
}

impl From<Vec<Stroke>> for Document {
    fn from(strokes: Vec<Stroke>) -> Self {
        Document::Strokes(strokes)
    }
}

impl From<Vec<Character>> for Document {
    fn from(chars: Vec<Character>) -> Self {
        Document::Characters(chars)
    }
}
