use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use lane_runner::prelude::*;

/// Installs a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[derive(Clone, Copy, Debug)]
pub enum KindStyle {
    Circle { color: [u8; 3], radius: i32 },
    Rect { color: [u8; 3], half_w: i32, half_h: i32 },
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World rectangle mapped onto the image.
    pub world_min: Vec2,
    pub world_max: Vec2,
    pub background: [u8; 3],
    pub lane_color: [u8; 3],
    pub finish_color: [u8; 3],
    pub lanes: Vec<f32>,
    styles: HashMap<EntityKind, KindStyle>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), world_min: Vec2, world_max: Vec2) -> Self {
        Self {
            image_size,
            world_min,
            world_max,
            background: [18, 22, 34],
            lane_color: [44, 52, 72],
            finish_color: [240, 240, 240],
            lanes: Vec::new(),
            styles: default_styles(),
        }
    }

    /// Frames the whole layout with a small margin, drawing `config`'s lanes.
    pub fn for_layout(layout: &LevelLayout, config: &LevelConfig, image_size: (u32, u32)) -> Self {
        let min_x = layout.plan.start_x.min(0.0) - 2.0;
        let max_x = layout.finish.x + 4.0;
        let mut rc = Self::new(
            image_size,
            Vec2::new(min_x, config.cannonball_height - 2.0),
            Vec2::new(max_x, config.hazard_height() + 2.0),
        );
        rc.lanes = config.lane_heights.clone();
        rc
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn set_kind_style(&mut self, kind: impl Into<EntityKind>, style: KindStyle) {
        self.styles.insert(kind.into(), style);
    }

    fn to_pixel(&self, p: Vec2) -> (i32, i32) {
        let (w, h) = self.image_size;
        let extent = (self.world_max - self.world_min).max(Vec2::splat(f32::EPSILON));
        let t = (p - self.world_min) / extent;
        let px = t.x * (w as f32 - 1.0);
        // Image rows grow downward.
        let py = (1.0 - t.y) * (h as f32 - 1.0);
        (px.round() as i32, py.round() as i32)
    }
}

fn default_styles() -> HashMap<EntityKind, KindStyle> {
    let mut styles = HashMap::new();
    let regular = [
        (FruitKind::Apple, [214, 48, 49]),
        (FruitKind::Grape, [142, 68, 173]),
        (FruitKind::Watermelon, [39, 174, 96]),
        (FruitKind::Dragonfruit, [232, 67, 147]),
    ];
    for (kind, color) in regular {
        styles.insert(kind.into(), KindStyle::Circle { color, radius: 3 });
    }
    for kind in [
        FruitKind::GoldApple,
        FruitKind::GoldGrape,
        FruitKind::GoldWatermelon,
        FruitKind::GoldDragonfruit,
    ] {
        styles.insert(
            kind.into(),
            KindStyle::Circle {
                color: [241, 196, 15],
                radius: 4,
            },
        );
    }
    styles.insert(
        FruitKind::HeartFruit.into(),
        KindStyle::Circle {
            color: [255, 118, 117],
            radius: 4,
        },
    );
    styles.insert(
        FruitKind::RottenApple.into(),
        KindStyle::Circle {
            color: [110, 90, 50],
            radius: 3,
        },
    );
    styles.insert(
        ObstacleKind::Building.into(),
        KindStyle::Rect {
            color: [127, 140, 141],
            half_w: 4,
            half_h: 10,
        },
    );
    styles.insert(
        ObstacleKind::Missile.into(),
        KindStyle::Rect {
            color: [230, 126, 34],
            half_w: 5,
            half_h: 2,
        },
    );
    styles.insert(
        ObstacleKind::Cannonball.into(),
        KindStyle::Circle {
            color: [60, 60, 60],
            radius: 4,
        },
    );
    styles.insert(
        EntityKind::Hazard(HazardKind::ThunderCloud),
        KindStyle::Rect {
            color: [149, 165, 166],
            half_w: 7,
            half_h: 3,
        },
    );
    styles
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn draw_style(img: &mut RgbImage, (cx, cy): (i32, i32), style: KindStyle) {
    match style {
        KindStyle::Circle { color, radius } => {
            let r2 = radius * radius;
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx * dx + dy * dy <= r2 {
                        put(img, cx + dx, cy + dy, color);
                    }
                }
            }
        }
        KindStyle::Rect {
            color,
            half_w,
            half_h,
        } => {
            for dy in -half_h..=half_h {
                for dx in -half_w..=half_w {
                    put(img, cx + dx, cy + dy, color);
                }
            }
        }
    }
}

/// Draws lanes, every request and the finish line of `layout`.
pub fn render_layout_to_png(
    layout: &LevelLayout,
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = rc.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(rc.background));

    for &lane in &rc.lanes {
        let (_, y) = rc.to_pixel(Vec2::new(rc.world_min.x, lane));
        for x in 0..w as i32 {
            put(&mut img, x, y, rc.lane_color);
        }
    }

    for request in &layout.requests {
        if let Some(style) = rc.styles.get(&request.kind) {
            draw_style(&mut img, rc.to_pixel(request.position), *style);
        }
    }

    let (fx, _) = rc.to_pixel(Vec2::new(layout.finish.x, 0.0));
    for y in 0..h as i32 {
        if (y / 4) % 2 == 0 {
            put(&mut img, fx, y, rc.finish_color);
        }
    }

    img.save(path.as_ref())?;
    tracing::info!("Wrote {}.", path.as_ref().display());
    Ok(())
}
