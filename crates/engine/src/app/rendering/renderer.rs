use std::sync::Arc;

use glam::Vec2;
use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{world_to_screen, Camera3D, HudData, Primitive, SceneWorld, Viewport};

use super::hud::draw_hud;
use super::raster::Canvas;

const HOVER_COLOR: [u8; 4] = [255, 215, 0, 255];
const PARTICLE_COLOR: [u8; 4] = [170, 150, 110, 160];
const MAX_BRIGHTNESS: f32 = 3.0;
/// Edges whose endpoints land further than this many viewports away are
/// skipped rather than rasterised.
const OFFSCREEN_LIMIT_VIEWPORTS: f32 = 4.0;

const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(
        &mut self,
        world: &SceneWorld,
        hud: Option<&HudData>,
    ) -> Result<(), Error> {
        if self.viewport.is_empty() {
            return Ok(());
        }
        let viewport = self.viewport;
        let mut canvas = Canvas::new(self.pixels.frame_mut(), viewport.width, viewport.height);
        draw_scene(&mut canvas, world, viewport);
        if let Some(hud) = hud {
            draw_hud(&mut canvas, hud);
        }
        self.pixels.render()
    }
}

fn draw_scene(canvas: &mut Canvas<'_>, world: &SceneWorld, viewport: Viewport) {
    canvas.clear(world.clear_color());
    let camera = world.camera();
    let hovered = world.visual_state().hovered_entity;

    for primitive in world.visible_primitives() {
        let is_hovered = hovered.is_some() && primitive.owner == hovered;
        let color = if is_hovered {
            HOVER_COLOR
        } else {
            shade(primitive.color, primitive.pose.brightness)
        };
        for (from, to) in projected_box_edges(primitive, camera, viewport) {
            canvas.line(from, to, color);
        }
    }

    for particle in world.particles() {
        if let Some(px) = world_to_screen(*particle, camera, viewport) {
            canvas.put(px.x.round() as i32, px.y.round() as i32, PARTICLE_COLOR);
        }
    }
}

fn shade(color: [u8; 4], brightness: f32) -> [u8; 4] {
    let factor = if brightness.is_finite() {
        brightness.clamp(0.0, MAX_BRIGHTNESS)
    } else {
        1.0
    };
    let scale = |channel: u8| (channel as f32 * factor).round().min(255.0) as u8;
    [scale(color[0]), scale(color[1]), scale(color[2]), color[3]]
}

fn on_screen_enough(px: Vec2, viewport: Viewport) -> bool {
    let limit_x = viewport.width as f32 * OFFSCREEN_LIMIT_VIEWPORTS;
    let limit_y = viewport.height as f32 * OFFSCREEN_LIMIT_VIEWPORTS;
    px.x.abs() <= limit_x && px.y.abs() <= limit_y
}

/// Screen-space edges of the primitive's posed box. Edges with an endpoint
/// behind the near plane are dropped.
fn projected_box_edges(
    primitive: &Primitive,
    camera: &Camera3D,
    viewport: Viewport,
) -> Vec<((i32, i32), (i32, i32))> {
    let corners = primitive.world_bounds().corners();
    let projected: Vec<Option<Vec2>> = corners
        .iter()
        .map(|corner| {
            world_to_screen(*corner, camera, viewport).filter(|px| on_screen_enough(*px, viewport))
        })
        .collect();

    BOX_EDGES
        .iter()
        .filter_map(|(a, b)| {
            let from = projected[*a]?;
            let to = projected[*b]?;
            Some((
                (from.x.round() as i32, from.y.round() as i32),
                (to.x.round() as i32, to.y.round() as i32),
            ))
        })
        .collect()
}
