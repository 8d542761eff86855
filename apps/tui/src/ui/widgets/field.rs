use agrod_core::raster::half_block_side;
use agrod_core::simulation::{Rgba, GRASS_DARK};
use agrod_core::{FieldSimulation, Raster};
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::Frame;

/// Scene units; the raster rescales to whatever square fits.
const SCENE_WIDTH: f64 = 500.0;

pub const fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Largest square of half-block pixels that fits `area`, centred.
pub fn square_area(area: Rect) -> Rect {
    let side = half_block_side(area.width, area.height);
    let rows = side / 2;
    Rect {
        x: area.x + (area.width - side) / 2,
        y: area.y + (area.height - rows) / 2,
        width: side,
        height: rows,
    }
}

pub fn render_field(f: &mut Frame<'_>, area: Rect, field: &FieldSimulation) {
    let square = square_area(area);
    if square.width < 2 {
        return;
    }

    let side = usize::from(square.width);
    let groups = Raster::paint(&field.scene(SCENE_WIDTH), side, side).color_groups();
    let bound = f64::from(square.width - 1);

    let canvas = Canvas::default()
        .marker(Marker::HalfBlock)
        .background_color(to_color(GRASS_DARK))
        .x_bounds([0.0, bound])
        .y_bounds([0.0, bound])
        .paint(move |ctx| {
            for ((r, g, b), coords) in &groups {
                ctx.draw(&Points {
                    coords,
                    color: Color::Rgb(*r, *g, *b),
                });
            }
        });

    f.render_widget(canvas, square);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_area_keeps_pixels_square() {
        let square = square_area(Rect::new(0, 0, 80, 20));
        assert_eq!((square.width, square.height), (40, 20));
        assert_eq!(square.x, 20);

        let tall = square_area(Rect::new(2, 1, 31, 40));
        assert_eq!((tall.width, tall.height), (30, 15));
        assert_eq!(tall.x, 2);
        assert_eq!(tall.y, 13);
    }
}
