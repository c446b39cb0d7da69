use crate::graph::{Geometry, SceneGraph};
use crate::light::{Light, SpotLight};
use crate::material::{Material, MaterialId};
use gallery_common::{NodeId, Rgb, Transform};
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};
use std::path::PathBuf;

/// Spotlight colors, assigned round-robin by hanging order.
pub const ACCENT_PALETTE: [Rgb; 6] = [
    Rgb::from_hex(0x2bbcff),
    Rgb::from_hex(0xff2bd6),
    Rgb::from_hex(0xfeda2c),
    Rgb::from_hex(0x25b230),
    Rgb::from_hex(0x7c3aed),
    Rgb::from_hex(0xff7a18),
];

const WALL_X: f32 = 12.5;
const HANG_Y: f32 = 2.3;
const FIRST_Z: f32 = 12.0;
const SPACING: f32 = 6.0;
const CANVAS_WIDTH: f32 = 3.35;
const CANVAS_HEIGHT: f32 = 2.2;
const FRAME_MARGIN: f32 = 0.25;
const FRAME_DEPTH: f32 = 0.12;
/// Canvas sits this far in front of the frame center so the faces never z-fight.
const CANVAS_OFFSET: f32 = 0.08;
const FRAME_COLOR: u32 = 0x0d0d14;

/// What to hang: a title, an optional image, and an optional accent override.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaintingDescriptor {
    pub title: String,
    /// Local image file. `None` hangs a placeholder canvas.
    pub image: Option<PathBuf>,
    /// Overrides the palette color for this painting's spotlight and placeholder.
    pub accent: Option<Rgb>,
}

impl PaintingDescriptor {
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Where a painting hangs: center, yaw, and canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub ry: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Even indices hang on the left wall, odd on the right, each step further down the hall.
    pub fn for_index(index: usize) -> Self {
        let side = if index % 2 == 0 { -1.0 } else { 1.0 };
        let ry = if side < 0.0 { FRAC_PI_2 } else { -FRAC_PI_2 };
        Self {
            position: Vec3::new(side * WALL_X, HANG_Y, FIRST_Z - index as f32 * SPACING),
            ry,
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }

    /// Unit normal of the canvas face, pointing into the hall.
    pub fn facing(&self) -> Vec3 {
        Vec3::new(self.ry.sin(), 0.0, self.ry.cos())
    }
}

/// A painting as hung: its resolved accent and the nodes created for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPainting {
    pub title: String,
    pub placement: Placement,
    pub accent: Rgb,
    pub frame: NodeId,
    pub canvas: NodeId,
    pub spot: NodeId,
}

/// Hang every descriptor in order. Returns the placements, which are also recorded on the scene.
pub fn hang_paintings(
    scene: &mut SceneGraph,
    descriptors: &[PaintingDescriptor],
) -> Vec<PlacedPainting> {
    let frame_material = scene.add_material(Material::standard("frame", FRAME_COLOR, 0.4, 0.35));
    let mut placed = Vec::with_capacity(descriptors.len());
    for (index, desc) in descriptors.iter().enumerate() {
        let accent = desc
            .accent
            .unwrap_or(ACCENT_PALETTE[index % ACCENT_PALETTE.len()]);
        let placement = Placement::for_index(index);
        let p = hang_one(scene, desc, placement, accent, frame_material);
        tracing::debug!(
            title = %p.title,
            x = placement.position.x,
            z = placement.position.z,
            accent = %accent,
            textured = desc.image.is_some(),
            "hung painting"
        );
        scene.record_painting(p.clone());
        placed.push(p);
    }
    placed
}

fn hang_one(
    scene: &mut SceneGraph,
    desc: &PaintingDescriptor,
    placement: Placement,
    accent: Rgb,
    frame_material: MaterialId,
) -> PlacedPainting {
    let Placement {
        position,
        ry,
        width,
        height,
    } = placement;
    let facing = placement.facing();

    let frame = scene.add_mesh(
        format!("{} frame", desc.title),
        Geometry::Box {
            width: width + FRAME_MARGIN,
            height: height + FRAME_MARGIN,
            depth: FRAME_DEPTH,
        },
        frame_material,
        Transform::at_yaw(position, ry),
    );

    let canvas_material = match &desc.image {
        Some(path) => Material::textured(path.clone()),
        None => Material::placeholder(accent),
    };
    let canvas_material = scene.add_material(canvas_material);
    let canvas = scene.add_mesh(
        format!("{} canvas", desc.title),
        Geometry::Plane { width, height },
        canvas_material,
        Transform::at_yaw(position + facing * CANVAS_OFFSET, ry),
    );

    let spot = scene.add_light(Light::Spot(SpotLight {
        color: accent,
        intensity: 0.7,
        range: 12.0,
        angle: FRAC_PI_6,
        penumbra: 0.4,
        decay: 1.2,
        position: position + facing * 1.0 + Vec3::new(0.0, 1.8, 0.0),
        target: position,
    }));

    PlacedPainting {
        title: desc.title.clone(),
        placement,
        accent,
        frame,
        canvas,
        spot,
    }
}
