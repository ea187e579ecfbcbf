//! Bounds and view fitting for 2D previews.

use inkplot_core::constants::VIEW_PADDING;
use inkplot_core::ViewTransform;

/// Bounding box accumulator used while building a preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            max_x: f64::MIN,
            min_y: f64::MAX,
            max_y: f64::MIN,
        }
    }

    pub fn update(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn merge(&mut self, other: &Bounds) {
        if other.is_valid() {
            self.update(other.min_x, other.min_y);
            self.update(other.max_x, other.max_y);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// View that centers `bounds` in a `width` x `height` canvas with a 5% margin.
///
/// Invalid bounds give the identity view. Point-like content is centered at
/// unit zoom.
pub fn fit_view(bounds: &Bounds, width: f64, height: f64) -> ViewTransform {
    if !bounds.is_valid() {
        return ViewTransform::default();
    }

    let (cx, cy) = bounds.center();
    let content_width = bounds.width();
    let content_height = bounds.height();

    let zoom = if content_width == 0.0 && content_height == 0.0 {
        1.0
    } else {
        let available_width = width * (1.0 - VIEW_PADDING * 2.0);
        let available_height = height * (1.0 - VIEW_PADDING * 2.0);
        let scale_x = if content_width > 0.0 {
            available_width / content_width
        } else {
            f64::INFINITY
        };
        let scale_y = if content_height > 0.0 {
            available_height / content_height
        } else {
            f64::INFINITY
        };
        scale_x.min(scale_y)
    };

    ViewTransform::new(zoom, width / 2.0 - cx * zoom, height / 2.0 - cy * zoom)
}
