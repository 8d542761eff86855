use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use crate::model::{FieldData, Hotspot, MaturityLevel};
use crate::notify::Level;
use crate::view::title_case;

/// Cells per side of the field.
pub const GRID_SIZE: i32 = 10;
/// Spray ends once this many frames have been drawn.
pub const SPRAY_FRAMES: u32 = 21;
/// Spray radius growth per frame, in canvas pixels.
pub const SPRAY_GROWTH: f64 = 2.0;
pub const CONGRATULATION_DELAY: Duration = Duration::from_secs(1);
/// Shown for both pesticides and inspection tools.
pub const MISSING_TOOL_WARNING: &str = "Please select a pesticide first";

/// Entry points the detection controller drives. Anything owning a field
/// view can stand in for the simulation.
pub trait FieldCollaborator {
    fn initialize(&mut self, field: Option<&FieldData>);
    fn start(&mut self);
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const CENTER: Self = Self {
        x: GRID_SIZE / 2,
        y: GRID_SIZE / 2,
    };

    pub const fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < GRID_SIZE && self.y >= 0 && self.y < GRID_SIZE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimKey {
    Up,
    Down,
    Left,
    Right,
    Space,
}

impl SimKey {
    pub const fn delta(self) -> Option<(i32, i32)> {
        match self {
            Self::Up => Some((0, -1)),
            Self::Down => Some((0, 1)),
            Self::Left => Some((-1, 0)),
            Self::Right => Some((1, 0)),
            Self::Space => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SprayOutcome {
    Inactive,
    MissingSelection,
    Treated { tool: String, field_cleared: bool },
    Inspected { maturity: Option<MaturityLevel> },
    Nothing { maturity_analysis: bool },
}

impl SprayOutcome {
    /// Banner for this outcome, if any.
    pub fn message(&self) -> Option<(Level, String)> {
        let message = match self {
            Self::Inactive => return None,
            Self::MissingSelection => (Level::Warning, MISSING_TOOL_WARNING.to_string()),
            Self::Treated { tool, .. } => (
                Level::Success,
                format!("Successfully sprayed {} on diseased area!", title_case(tool)),
            ),
            Self::Inspected { maturity } => (Level::Info, inspection_message(maturity.as_ref()).to_string()),
            Self::Nothing { maturity_analysis } => (
                Level::Info,
                if *maturity_analysis {
                    "No coconut tree at this location. Move to a tree to examine it."
                } else {
                    "No disease detected at this location. Move to a yellow spot to spray effectively."
                }
                .to_string(),
            ),
        };
        Some(message)
    }

    /// Follow-up banner shown after [`CONGRATULATION_DELAY`].
    pub const fn delayed_message(&self) -> Option<(Level, &'static str)> {
        match self {
            Self::Treated {
                field_cleared: true,
                ..
            } => Some((
                Level::Success,
                "Great job! You've successfully treated all diseased areas in this field.",
            )),
            _ => None,
        }
    }
}

fn inspection_message(maturity: Option<&MaturityLevel>) -> &'static str {
    match maturity {
        Some(MaturityLevel::Immature) => {
            "This coconut tree is still immature. No action needed at this time."
        }
        Some(MaturityLevel::Mature) => {
            "This coconut tree is mature but not yet ready for harvest. Continue monitoring."
        }
        Some(MaturityLevel::ReadyForHarvest) => {
            "This coconut tree is ready for harvest! Coconuts can be collected now."
        }
        _ => "Coconut tree examined. Assessment complete.",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Moved,
    Blocked,
    Sprayed,
}

impl KeyOutcome {
    /// Whether the key should be swallowed instead of reaching the host.
    pub const fn consumed(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SprayAnimation {
    frames: u32,
}

impl SprayAnimation {
    fn radius(self) -> f64 {
        f64::from(self.frames) * SPRAY_GROWTH
    }
}

#[derive(Debug, Clone)]
pub struct FieldSimulation {
    grid: serde_json::Value,
    hotspots: Vec<Hotspot>,
    maturity_analysis: bool,
    drone: Cell,
    active: bool,
    spray: Option<SprayAnimation>,
}

impl Default for FieldSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSimulation {
    pub const fn new() -> Self {
        Self {
            grid: serde_json::Value::Null,
            hotspots: Vec::new(),
            maturity_analysis: false,
            drone: Cell::CENTER,
            active: false,
            spray: None,
        }
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn drone(&self) -> Cell {
        self.drone
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    pub const fn grid(&self) -> &serde_json::Value {
        &self.grid
    }

    pub const fn is_maturity_analysis(&self) -> bool {
        self.maturity_analysis
    }

    pub const fn is_spraying(&self) -> bool {
        self.spray.is_some()
    }

    /// Frames already advanced in the running spray.
    pub fn spray_frames(&self) -> Option<u32> {
        self.spray.map(|spray| spray.frames)
    }

    /// Moves the drone by one step. Returns whether it moved.
    pub fn move_drone(&mut self, dx: i32, dy: i32) -> bool {
        if !self.active {
            return false;
        }

        let target = Cell {
            x: self.drone.x + dx,
            y: self.drone.y + dy,
        };
        if !target.in_bounds() {
            tracing::debug!(x = target.x, y = target.y, "drone move rejected at field edge");
            return false;
        }

        self.drone = target;
        true
    }

    /// Sprays (or inspects) the cell under the drone using `tool`.
    pub fn spray(&mut self, tool: Option<&str>) -> SprayOutcome {
        if !self.active {
            return SprayOutcome::Inactive;
        }

        let Some(tool) = tool.filter(|tool| !tool.is_empty()) else {
            return SprayOutcome::MissingSelection;
        };

        self.spray = Some(SprayAnimation { frames: 0 });

        let drone = self.drone;
        let Some(index) = self
            .hotspots
            .iter()
            .position(|hotspot| hotspot.x == drone.x && hotspot.y == drone.y)
        else {
            return SprayOutcome::Nothing {
                maturity_analysis: self.maturity_analysis,
            };
        };

        if self.maturity_analysis {
            return SprayOutcome::Inspected {
                maturity: self.hotspots[index].maturity.clone(),
            };
        }

        self.hotspots
            .retain(|hotspot| hotspot.x != drone.x || hotspot.y != drone.y);
        tracing::info!(
            x = drone.x,
            y = drone.y,
            remaining = self.hotspots.len(),
            "hotspot treated"
        );

        SprayOutcome::Treated {
            tool: tool.to_string(),
            field_cleared: self.hotspots.is_empty(),
        }
    }

    pub fn handle_key(&mut self, key: SimKey, tool: Option<&str>) -> (KeyOutcome, Option<SprayOutcome>) {
        if !self.active {
            return (KeyOutcome::Ignored, None);
        }

        match key.delta() {
            Some((dx, dy)) => {
                let outcome = if self.move_drone(dx, dy) {
                    KeyOutcome::Moved
                } else {
                    KeyOutcome::Blocked
                };
                (outcome, None)
            }
            None => (KeyOutcome::Sprayed, Some(self.spray(tool))),
        }
    }

    /// Advances the spray animation by one drawn frame.
    pub fn advance_frame(&mut self) {
        if let Some(spray) = self.spray.as_mut() {
            spray.frames += 1;
            if spray.frames >= SPRAY_FRAMES {
                self.spray = None;
            }
        }
    }

    /// Whether a host loop should keep scheduling frames.
    pub const fn wants_frames(&self) -> bool {
        self.active
    }

    pub fn scene(&self, canvas_width: f64) -> Scene {
        let cell = canvas_width / f64::from(GRID_SIZE);
        let mut scene = Scene {
            width: canvas_width,
            height: canvas_width,
            shapes: Vec::new(),
        };

        draw_grid(&mut scene, cell);
        for hotspot in &self.hotspots {
            let (cx, cy) = cell_center(hotspot.x, hotspot.y, cell);
            if self.maturity_analysis {
                draw_tree(&mut scene, cx, cy, cell, hotspot.maturity.as_ref());
            } else {
                scene.shapes.push(Shape::Circle {
                    x: cx,
                    y: cy,
                    radius: cell / 3.0,
                    fill: Some(Rgba::new(255, 255, 0, 0.7)),
                    stroke: Some(Rgba::hex(0xFFA000)),
                });
            }
        }
        draw_drone(&mut scene, self.drone, cell);

        // the overlay follows the drone while it fades
        if let Some(spray) = self.spray {
            let (cx, cy) = cell_center(self.drone.x, self.drone.y, cell);
            let fade = 1.0 - f64::from(spray.frames) / f64::from(SPRAY_FRAMES);
            scene.shapes.push(Shape::Circle {
                x: cx,
                y: cy,
                radius: spray.radius(),
                fill: Some(Rgba::new(0, 200, 200, 0.3 * fade)),
                stroke: Some(Rgba::new(0, 150, 150, 0.5 * fade)),
            });
        }

        scene
    }
}

impl FieldCollaborator for FieldSimulation {
    fn initialize(&mut self, field: Option<&FieldData>) {
        let Some(field) = field else {
            return;
        };

        self.grid = field.grid.clone();
        self.hotspots = field.hotspots.clone();
        self.maturity_analysis = field.is_maturity_analysis;
        self.drone = Cell::CENTER;
        tracing::debug!(
            hotspots = self.hotspots.len(),
            maturity = self.maturity_analysis,
            "field initialized"
        );
    }

    fn start(&mut self) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 1.0,
        }
    }

    /// Composites `self` over an opaque `base`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn over(self, base: Self) -> Self {
        let alpha = self.a.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| {
            f64::from(top)
                .mul_add(alpha, f64::from(bottom) * (1.0 - alpha))
                .round() as u8
        };
        Self {
            r: mix(self.r, base.r),
            g: mix(self.g, base.g),
            b: mix(self.b, base.b),
            a: 1.0,
        }
    }
}

pub const GRASS_DARK: Rgba = Rgba::hex(0x4C_AF50);
pub const GRASS_LIGHT: Rgba = Rgba::hex(0x8B_C34A);
pub const GRID_LINE: Rgba = Rgba::hex(0x2E_7D32);

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgba,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
    },
}

/// Draw list in canvas pixels, origin top-left, painted in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

fn cell_center(x: i32, y: i32, cell: f64) -> (f64, f64) {
    (
        f64::from(x).mul_add(cell, cell / 2.0),
        f64::from(y).mul_add(cell, cell / 2.0),
    )
}

fn draw_grid(scene: &mut Scene, cell: f64) {
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let fill = if (x + y) % 2 == 0 { GRASS_DARK } else { GRASS_LIGHT };
            scene.shapes.push(Shape::Rect {
                x: f64::from(x) * cell,
                y: f64::from(y) * cell,
                width: cell,
                height: cell,
                fill: Some(fill),
                stroke: Some(GRID_LINE),
            });
        }
    }
}

fn draw_drone(scene: &mut Scene, drone: Cell, cell: f64) {
    let (cx, cy) = cell_center(drone.x, drone.y, cell);
    let size = cell * 0.7;

    scene.shapes.push(Shape::Circle {
        x: cx,
        y: cy,
        radius: size / 3.0,
        fill: Some(Rgba::hex(0x30_3F9F)),
        stroke: Some(Rgba::hex(0x1A_237E)),
    });

    let arm = size / 2.0;
    for step in 0..4 {
        let angle = f64::from(step) * FRAC_PI_2;
        let end_x = angle.cos().mul_add(arm, cx);
        let end_y = angle.sin().mul_add(arm, cy);
        scene.shapes.push(Shape::Line {
            x1: cx,
            y1: cy,
            x2: end_x,
            y2: end_y,
            color: Rgba::hex(0x90_A4AE),
        });
        scene.shapes.push(Shape::Circle {
            x: end_x,
            y: end_y,
            radius: size / 8.0,
            fill: Some(Rgba::hex(0xCF_D8DC)),
            stroke: Some(Rgba::hex(0x60_7D8B)),
        });
    }
}

struct TreePalette {
    leaf: Rgba,
    coconut: Rgba,
    indicator: Rgba,
}

fn tree_palette(maturity: Option<&MaturityLevel>) -> TreePalette {
    match maturity {
        Some(MaturityLevel::Immature) => TreePalette {
            leaf: Rgba::hex(0x4C_AF50),
            coconut: Rgba::hex(0xA5_D6A7),
            indicator: Rgba::hex(0x21_96F3),
        },
        Some(MaturityLevel::Mature) => TreePalette {
            leaf: Rgba::hex(0x2E_7D32),
            coconut: Rgba::hex(0xCD_DC39),
            indicator: Rgba::hex(0xFF_9800),
        },
        Some(MaturityLevel::ReadyForHarvest) => TreePalette {
            leaf: Rgba::hex(0x1B_5E20),
            coconut: Rgba::hex(0x8B_4513),
            indicator: Rgba::hex(0x4C_AF50),
        },
        _ => TreePalette {
            leaf: Rgba::hex(0x2E_7D32),
            coconut: Rgba::hex(0xF5_F5DC),
            indicator: Rgba::hex(0x21_96F3),
        },
    }
}

fn draw_tree(scene: &mut Scene, x: f64, y: f64, cell: f64, maturity: Option<&MaturityLevel>) {
    let palette = tree_palette(maturity);
    let bark = Rgba::hex(0x5D_4037);

    scene.shapes.push(Shape::Polygon {
        points: vec![
            (x, cell.mul_add(0.3, y)),
            (cell.mul_add(-0.1, x), y),
            (cell.mul_add(0.1, x), y),
        ],
        fill: Some(Rgba::hex(0x8B_4513)),
        stroke: Some(bark),
    });

    let leaf_length = cell * 0.4;
    for leaf in 0..6 {
        let angle = f64::from(leaf) * TAU / 6.0;
        let end_x = angle.cos().mul_add(leaf_length, x);
        let end_y = angle.sin().mul_add(leaf_length, y);
        scene.shapes.push(Shape::Line {
            x1: x,
            y1: y,
            x2: end_x,
            y2: end_y,
            color: palette.leaf,
        });
        scene.shapes.push(Shape::Circle {
            x: end_x,
            y: end_y,
            radius: cell * 0.05,
            fill: Some(palette.leaf),
            stroke: None,
        });
    }

    if maturity.is_some_and(MaturityLevel::bears_fruit) {
        let distance = cell * 0.2;
        for coconut in 0..3 {
            let angle = f64::from(coconut) * TAU / 3.0;
            scene.shapes.push(Shape::Circle {
                x: angle.cos().mul_add(distance, x),
                y: angle.sin().mul_add(distance, y),
                radius: cell * 0.08,
                fill: Some(palette.coconut),
                stroke: Some(bark),
            });
        }
    }

    scene.shapes.push(Shape::Circle {
        x,
        y: cell.mul_add(0.3, y),
        radius: cell * 0.1,
        fill: Some(palette.indicator),
        stroke: Some(Rgba::hex(0xFF_FFFF)),
    });
}
