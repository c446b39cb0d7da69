//! CPU-side packing of the scene into GPU-ready instance and uniform data.

use bytemuck::{Pod, Zeroable};
use gallery_assets::{ImageDigest, ImageLibrary};
use gallery_render::RenderView;
use gallery_scene::{Geometry, Light, Material, Mesh, SceneGraph};
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;

/// Positional lights past this many are dropped, in scene order.
pub const MAX_LIGHTS: usize = 16;

const KIND_POINT: f32 = 0.0;
const KIND_SPOT: f32 = 1.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
    /// Linear emissive color premultiplied by intensity.
    pub emissive: [f32; 4],
    /// Roughness, metalness.
    pub surface: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, material: &Material) -> Self {
        let cols = model.to_cols_array_2d();
        let [r, g, b] = material.color.to_linear();
        let e = Vec3::from(material.emissive.to_linear()) * material.emissive_intensity;
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: [r, g, b, 1.0],
            emissive: [e.x, e.y, e.z, 0.0],
            surface: [material.roughness, material.metalness, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub(crate) struct GpuLight {
    /// xyz position, w range.
    pub position_range: [f32; 4],
    /// Linear rgb, w intensity.
    pub color_intensity: [f32; 4],
    /// Spot direction, w cosine of the outer cone.
    pub direction_cos: [f32; 4],
    /// Kind, decay, cosine of the inner cone.
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub particle_model: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Linear fog rgb, w 1 when fog is on.
    pub fog_color: [f32; 4],
    /// near, far.
    pub fog_params: [f32; 4],
    /// Summed ambient light, linear.
    pub ambient: [f32; 4],
    /// rgb, opacity.
    pub particle_color: [f32; 4],
    /// Light count, particle size.
    pub counts: [f32; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
}

/// Scene-wide lighting and fog. Built once; the scene's lights never move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Environment {
    pub ambient: [f32; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
    pub light_count: usize,
    pub fog_color: [f32; 4],
    pub fog_params: [f32; 4],
    pub clear: wgpu::Color,
}

impl Environment {
    pub fn from_scene(scene: &SceneGraph) -> Self {
        let mut ambient = Vec3::ZERO;
        let mut lights = [GpuLight::default(); MAX_LIGHTS];
        let mut count = 0;
        let mut dropped = 0;
        for light in scene.lights() {
            let packed = match *light {
                Light::Ambient { color, intensity } => {
                    ambient += Vec3::from(color.to_linear()) * intensity;
                    continue;
                }
                Light::Point {
                    color,
                    intensity,
                    range,
                    decay,
                    position,
                } => GpuLight {
                    position_range: position.extend(range).to_array(),
                    color_intensity: Vec3::from(color.to_linear()).extend(intensity).to_array(),
                    direction_cos: [0.0, -1.0, 0.0, -1.0],
                    params: [KIND_POINT, decay, -1.0, 0.0],
                },
                Light::Spot(spot) => {
                    let (outer, inner) = spot.cone_cosines();
                    GpuLight {
                        position_range: spot.position.extend(spot.range).to_array(),
                        color_intensity: Vec3::from(spot.color.to_linear())
                            .extend(spot.intensity)
                            .to_array(),
                        direction_cos: spot.direction().extend(outer).to_array(),
                        params: [KIND_SPOT, spot.decay, inner, 0.0],
                    }
                }
            };
            if count == MAX_LIGHTS {
                dropped += 1;
                continue;
            }
            lights[count] = packed;
            count += 1;
        }
        if dropped > 0 {
            tracing::warn!(dropped, max = MAX_LIGHTS, "scene has more lights than the shader supports");
        }

        let (fog_color, fog_params, clear) = match scene.fog() {
            Some(fog) => {
                let [r, g, b] = fog.color.to_linear();
                (
                    [r, g, b, 1.0],
                    [fog.near, fog.far, 0.0, 0.0],
                    wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: 1.0,
                    },
                )
            }
            None => ([0.0; 4], [0.0; 4], wgpu::Color::BLACK),
        };

        Self {
            ambient: ambient.extend(1.0).to_array(),
            lights,
            light_count: count,
            fog_color,
            fog_params,
            clear,
        }
    }

    /// Per-frame uniforms: this environment plus the camera and particle state.
    pub fn uniforms(&self, scene: &SceneGraph, view: &RenderView) -> Uniforms {
        let v = view.view_matrix();
        let p = view.projection_matrix();
        let (particle_model, particle_color, particle_size) = match scene.particles() {
            Some(field) => {
                let [r, g, b] = field.color.to_linear();
                (field.model_matrix(), [r, g, b, field.opacity], field.size)
            }
            None => (Mat4::IDENTITY, [0.0; 4], 0.0),
        };
        Uniforms {
            view_proj: (p * v).to_cols_array_2d(),
            view: v.to_cols_array_2d(),
            proj: p.to_cols_array_2d(),
            particle_model: particle_model.to_cols_array_2d(),
            camera_pos: view.eye.extend(1.0).to_array(),
            fog_color: self.fog_color,
            fog_params: self.fog_params,
            ambient: self.ambient,
            particle_color,
            counts: [self.light_count as f32, particle_size, 0.0, 0.0],
            lights: self.lights,
        }
    }
}

/// Static mesh instances grouped by draw call.
#[derive(Debug, Default)]
pub(crate) struct SceneBatches {
    pub cubes: Vec<InstanceData>,
    pub planes: Vec<InstanceData>,
    /// Image-mapped planes, one group per distinct image.
    pub canvases: BTreeMap<ImageDigest, Vec<InstanceData>>,
}

impl SceneBatches {
    pub fn collect(scene: &SceneGraph, images: &ImageLibrary) -> Self {
        let mut batches = Self::default();
        for mesh in scene.meshes() {
            let Some(material) = scene.material(mesh.material) else {
                tracing::warn!(mesh = %mesh.name, "mesh references a missing material, skipped");
                continue;
            };
            batches.push(mesh, material, images);
        }
        batches
    }

    fn push(&mut self, mesh: &Mesh, material: &Material, images: &ImageLibrary) {
        let instance = InstanceData::new(mesh.model_matrix(), material);
        match mesh.geometry {
            Geometry::Box { .. } => self.cubes.push(instance),
            Geometry::Plane { .. } => {
                let digest = material.map.as_deref().and_then(|p| images.digest_for(p));
                match digest {
                    Some(digest) => self.canvases.entry(digest).or_default().push(instance),
                    None => self.planes.push(instance),
                }
            }
        }
    }

    pub fn canvas_count(&self) -> usize {
        self.canvases.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_common::Rgb;
    use gallery_scene::{PaintingDescriptor, build_gallery, default_paintings};

    #[test]
    fn default_gallery_batches_by_geometry() {
        let scene = build_gallery(&default_paintings(), 42);
        let b = SceneBatches::collect(&scene, &ImageLibrary::new());
        // 6 walls, 6 trims, 6 frames
        assert_eq!(b.cubes.len(), 18);
        // floor, ceiling, 6 placeholder canvases
        assert_eq!(b.planes.len(), 8);
        assert_eq!(b.canvas_count(), 0);
    }

    #[test]
    fn image_missing_from_library_renders_as_flat_plane() {
        let scene = build_gallery(
            &[PaintingDescriptor {
                title: "Lost".into(),
                image: Some("lost.png".into()),
                accent: None,
            }],
            1,
        );
        let b = SceneBatches::collect(&scene, &ImageLibrary::new());
        assert_eq!(b.planes.len(), 3);
        assert!(b.canvases.is_empty());
    }

    #[test]
    fn placeholder_instances_carry_accent_glow() {
        let accent = Rgb::from_hex(0xff2bd6);
        let scene = build_gallery(
            &[PaintingDescriptor {
                title: "Glow".into(),
                image: None,
                accent: Some(accent),
            }],
            1,
        );
        let b = SceneBatches::collect(&scene, &ImageLibrary::new());
        let canvas = b.planes.last().unwrap();
        let [r, g, bl] = accent.to_linear();
        assert_eq!(&canvas.color[..3], &[r, g, bl]);
        assert!((canvas.emissive[0] - r * 0.15).abs() < 1e-6);
        assert_eq!(canvas.surface[0], 0.65);
    }

    #[test]
    fn environment_packs_ambient_and_positional_lights() {
        let scene = build_gallery(&default_paintings(), 42);
        let env = Environment::from_scene(&scene);
        // 4 points + 6 spots; ambient is folded into one term
        assert_eq!(env.light_count, 10);
        assert!((env.ambient[0] - 0.25).abs() < 1e-6);
        let spots = env.lights[..env.light_count]
            .iter()
            .filter(|l| l.params[0] == KIND_SPOT)
            .count();
        assert_eq!(spots, 6);
        let spot = env.lights[4];
        assert!(spot.params[2] > spot.direction_cos[3], "inner cone must be narrower");
        assert_eq!(env.fog_params[..2], [8.0, 60.0]);
        assert_eq!(env.fog_color[3], 1.0);
    }

    #[test]
    fn excess_lights_are_dropped() {
        let mut scene = SceneGraph::new();
        for i in 0..(MAX_LIGHTS + 3) {
            scene.add_light(Light::point(0xffffff, 1.0, 10.0, Vec3::new(i as f32, 2.0, 0.0)));
        }
        let env = Environment::from_scene(&scene);
        assert_eq!(env.light_count, MAX_LIGHTS);
        assert_eq!(env.clear, wgpu::Color::BLACK);
    }

    #[test]
    fn uniforms_follow_the_view() {
        let scene = build_gallery(&default_paintings(), 42);
        let env = Environment::from_scene(&scene);
        let view = RenderView::default();
        let u = env.uniforms(&scene, &view);
        assert_eq!(u.camera_pos[..3], view.eye.to_array());
        assert_eq!(u.counts[0], 10.0);
        assert_eq!(u.counts[1], 0.035);
        assert_eq!(u.particle_color[3], 0.45);
        let vp = Mat4::from_cols_array_2d(&u.view_proj);
        assert!(vp.abs_diff_eq(view.view_projection(), 1e-5));
    }
}
