use crate::simulation::{Rgba, Scene, Shape, GRASS_DARK};
use std::collections::BTreeMap;

/// Canvas points keyed by opaque RGB colour.
pub type ColorGroups = BTreeMap<(u8, u8, u8), Vec<(f64, f64)>>;

/// Side of the largest even square of half-block pixels that fits
/// `cols` x `rows` terminal cells. The square spans `side` columns and
/// `side / 2` rows.
pub const fn half_block_side(cols: u16, rows: u16) -> u16 {
    let side = if cols < rows.saturating_mul(2) {
        cols
    } else {
        rows.saturating_mul(2)
    };
    side - side % 2
}

/// A [`Scene`] flattened onto a fixed pixel grid.
///
/// Front ends without a vector canvas paint each pixel as a half-block
/// character. Pixels are opaque; translucent shapes are blended onto
/// whatever was painted before them.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Raster {
    pub fn new(width: usize, height: usize, background: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width * height],
        }
    }

    /// Scales `scene` to `width` x `height` pixels and paints it in order.
    pub fn paint(scene: &Scene, width: usize, height: usize) -> Self {
        let mut raster = Self::new(width, height, GRASS_DARK);
        if width == 0 || height == 0 || scene.width <= 0.0 || scene.height <= 0.0 {
            return raster;
        }

        let scale = Scale {
            x: to_f64(width) / scene.width,
            y: to_f64(height) / scene.height,
        };
        for shape in &scene.shapes {
            raster.draw(shape, scale);
        }
        raster
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Row-major pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, Rgba)> + '_ {
        let width = self.width.max(1);
        self.pixels
            .iter()
            .enumerate()
            .map(move |(index, color)| (index % width, index / width, *color))
    }

    /// Buckets pixels by colour as canvas points, flipping y so row 0 is
    /// the top of a canvas whose bounds are `[0, width - 1]` x `[0, height - 1]`.
    pub fn color_groups(&self) -> ColorGroups {
        let top = self.height.saturating_sub(1);
        let mut groups = ColorGroups::new();
        for (x, y, color) in self.pixels() {
            groups
                .entry((color.r, color.g, color.b))
                .or_default()
                .push((to_f64(x), to_f64(top - y)));
        }
        groups
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color.over(*pixel);
        }
    }

    fn draw(&mut self, shape: &Shape, scale: Scale) {
        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                if let Some(fill) = fill {
                    self.fill_where(scale, *fill, |px, py| {
                        px >= *x && px < x + width && py >= *y && py < y + height
                    });
                }
                if let Some(stroke) = stroke {
                    let corners = [
                        (*x, *y),
                        (x + width, *y),
                        (x + width, y + height),
                        (*x, y + height),
                    ];
                    self.outline(&corners, scale, *stroke);
                }
            }
            Shape::Circle {
                x,
                y,
                radius,
                fill,
                stroke,
            } => {
                if let Some(fill) = fill {
                    self.fill_where(scale, *fill, |px, py| {
                        (px - x).hypot(py - y) <= *radius
                    });
                }
                if let Some(stroke) = stroke {
                    // one pixel wide ring just inside the edge
                    let band = 1.0 / scale.x.min(scale.y);
                    self.fill_where(scale, *stroke, |px, py| {
                        let distance = (px - x).hypot(py - y);
                        distance <= *radius && distance > radius - band
                    });
                }
            }
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                color,
            } => self.line((*x1, *y1), (*x2, *y2), scale, *color),
            Shape::Polygon {
                points,
                fill,
                stroke,
            } => {
                if let Some(fill) = fill {
                    self.fill_where(scale, *fill, |px, py| contains(points, px, py));
                }
                if let Some(stroke) = stroke {
                    self.outline(points, scale, *stroke);
                }
            }
        }
    }

    /// Blends `color` into every pixel whose centre, in scene units, passes `inside`.
    fn fill_where(&mut self, scale: Scale, color: Rgba, inside: impl Fn(f64, f64) -> bool) {
        for py in 0..self.height {
            for px in 0..self.width {
                let sx = (to_f64(px) + 0.5) / scale.x;
                let sy = (to_f64(py) + 0.5) / scale.y;
                if inside(sx, sy) {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn outline(&mut self, points: &[(f64, f64)], scale: Scale, color: Rgba) {
        for (index, start) in points.iter().enumerate() {
            let end = points[(index + 1) % points.len()];
            self.line(*start, end, scale, color);
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn line(&mut self, from: (f64, f64), to: (f64, f64), scale: Scale, color: Rgba) {
        let (x1, y1) = (from.0 * scale.x, from.1 * scale.y);
        let (x2, y2) = (to.0 * scale.x, to.1 * scale.y);
        let steps = (x2 - x1).abs().max((y2 - y1).abs()).ceil().max(1.0);

        let mut last = None;
        for step in 0..=(steps as u32) {
            let t = f64::from(step) / steps;
            let x = t.mul_add(x2 - x1, x1).floor();
            let y = t.mul_add(y2 - y1, y1).floor();
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let pixel = (x as usize, y as usize);
            // translucent strokes must not blend twice into one pixel
            if last != Some(pixel) {
                self.blend(pixel.0, pixel.1, color);
                last = Some(pixel);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scale {
    x: f64,
    y: f64,
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(value: usize) -> f64 {
    value as f64
}

/// Even-odd point in polygon test.
fn contains(points: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut previous = match points.last() {
        Some(point) => *point,
        None => return false,
    };
    for &(px, py) in points {
        let (qx, qy) = previous;
        if (py > y) != (qy > y) && x < (qx - px) * (y - py) / (qy - py) + px {
            inside = !inside;
        }
        previous = (px, py);
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldData, Hotspot};
    use crate::simulation::{FieldCollaborator, FieldSimulation, GRASS_LIGHT};

    const RED: Rgba = Rgba::hex(0xFF_0000);

    fn scene(shapes: Vec<Shape>) -> Scene {
        Scene {
            width: 10.0,
            height: 10.0,
            shapes,
        }
    }

    #[test]
    fn filled_rect_covers_only_its_pixels() {
        let raster = Raster::paint(
            &scene(vec![Shape::Rect {
                x: 2.0,
                y: 2.0,
                width: 3.0,
                height: 3.0,
                fill: Some(RED),
                stroke: None,
            }]),
            10,
            10,
        );

        assert_eq!(raster.get(2, 2), Some(RED));
        assert_eq!(raster.get(4, 4), Some(RED));
        assert_eq!(raster.get(5, 5), Some(GRASS_DARK));
        assert_eq!(raster.get(1, 3), Some(GRASS_DARK));
        assert_eq!(raster.get(10, 0), None);
    }

    #[test]
    fn translucent_fill_blends_with_background() {
        let raster = Raster::paint(
            &scene(vec![Shape::Circle {
                x: 5.0,
                y: 5.0,
                radius: 2.0,
                fill: Some(Rgba::new(255, 255, 255, 0.5)),
                stroke: None,
            }]),
            10,
            10,
        );

        let centre = raster.get(5, 5);
        assert_eq!(centre, Some(Rgba::new(255, 255, 255, 0.5).over(GRASS_DARK)));
        assert_ne!(centre, Some(GRASS_DARK));
        assert_eq!(raster.get(0, 0), Some(GRASS_DARK));
    }

    #[test]
    fn triangle_fill_uses_even_odd_rule() {
        let triangle = vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)];
        assert!(contains(&triangle, 1.0, 1.0));
        assert!(!contains(&triangle, 9.0, 9.0));
        assert!(!contains(&[], 1.0, 1.0));
    }

    #[test]
    fn scene_is_scaled_to_the_raster() {
        let mut field = FieldSimulation::new();
        field.initialize(Some(&FieldData {
            grid: serde_json::Value::Null,
            hotspots: vec![Hotspot::at(0, 0)],
            is_maturity_analysis: false,
        }));

        let raster = Raster::paint(&field.scene(500.0), 40, 40);
        assert_eq!((raster.width(), raster.height()), (40, 40));
        assert_eq!(raster.pixels().count(), 1600);
        // cell (1, 0) is light grass; sample its centre
        assert_eq!(raster.get(6, 2), Some(GRASS_LIGHT));
        // the hotspot marker tints the centre of cell (0, 0)
        assert_ne!(raster.get(2, 2), Some(GRASS_DARK));
    }

    #[test]
    fn color_groups_flip_rows() {
        let raster = Raster::paint(
            &Scene {
                width: 2.0,
                height: 2.0,
                shapes: vec![Shape::Rect {
                    x: 0.0,
                    y: 0.0,
                    width: 1.0,
                    height: 1.0,
                    fill: Some(RED),
                    stroke: None,
                }],
            },
            2,
            2,
        );

        let groups = raster.color_groups();
        assert_eq!(groups.get(&(255, 0, 0)), Some(&vec![(0.0, 1.0)]));
        let grass = (GRASS_DARK.r, GRASS_DARK.g, GRASS_DARK.b);
        assert_eq!(groups.get(&grass).map(Vec::len), Some(3));
    }

    #[test]
    fn half_block_side_is_even_and_fits() {
        assert_eq!(half_block_side(80, 20), 40);
        assert_eq!(half_block_side(31, 40), 30);
        assert_eq!(half_block_side(7, 2), 4);
        assert_eq!(half_block_side(1, 10), 0);
    }

    #[test]
    fn empty_raster_paints_nothing() {
        let raster = Raster::paint(&scene(Vec::new()), 0, 0);
        assert_eq!(raster.pixels().count(), 0);
    }
}
