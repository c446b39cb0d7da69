use gallery_scene::{Geometry, Light, SceneGraph, SceneNode};
use gallery_walk::PointerLockRig;
use glam::{Mat4, Vec3};
use std::fmt::Write;

/// Camera state a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl RenderView {
    pub fn from_rig(rig: &PointerLockRig) -> Self {
        Self {
            eye: rig.position,
            target: rig.position + rig.look_direction(),
            fov_degrees: rig.fov.to_degrees(),
            aspect: rig.aspect,
            near: rig.near,
            far: rig.far,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_rig(&PointerLockRig::default())
    }
}

/// Renderer-agnostic interface.
///
/// The renderer reads the scene and a view, then produces output. Mutable access to the
/// renderer itself is allowed for GPU resources; the scene stays shared.
pub trait Renderer {
    type Output;

    fn render(&mut self, scene: &SceneGraph, view: &RenderView) -> Self::Output;
}

/// Dumps the scene as text: camera, fog, every node, then the hung paintings.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &SceneGraph, view: &RenderView) -> String {
        let mut out = String::new();
        let s = scene.summary();
        let _ = writeln!(
            out,
            "=== Gallery (meshes={}, lights={}, particles={}, materials={}, paintings={}) ===",
            s.meshes, s.lights, s.particles, s.materials, s.paintings
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );
        if let Some(fog) = scene.fog() {
            let _ = writeln!(out, "Fog: {} {:.0}..{:.0}", fog.color, fog.near, fog.far);
        }

        for (id, node) in scene.nodes() {
            match node {
                SceneNode::Mesh(mesh) => {
                    let p = mesh.transform.position;
                    let shape = match mesh.geometry {
                        Geometry::Plane { width, height } => format!("plane {width}x{height}"),
                        Geometry::Box {
                            width,
                            height,
                            depth,
                        } => format!("box {width}x{height}x{depth}"),
                    };
                    let material = scene
                        .material(mesh.material)
                        .map(|m| m.name.as_str())
                        .unwrap_or("?");
                    let _ = writeln!(
                        out,
                        "  {id} mesh {:<14} {shape:<18} mat={material:<12} pos=({:.2}, {:.2}, {:.2})",
                        mesh.name, p.x, p.y, p.z
                    );
                }
                SceneNode::Light(light) => {
                    let _ = match light {
                        Light::Ambient { color, intensity } => {
                            writeln!(out, "  {id} ambient {color} x{intensity}")
                        }
                        Light::Point {
                            color,
                            intensity,
                            position: p,
                            ..
                        } => writeln!(
                            out,
                            "  {id} point   {color} x{intensity} at ({:.2}, {:.2}, {:.2})",
                            p.x, p.y, p.z
                        ),
                        Light::Spot(spot) => {
                            let p = spot.position;
                            writeln!(
                                out,
                                "  {id} spot    {} x{} at ({:.2}, {:.2}, {:.2})",
                                spot.color, spot.intensity, p.x, p.y, p.z
                            )
                        }
                    };
                }
                SceneNode::Particles(field) => {
                    let _ = writeln!(
                        out,
                        "  {id} particles n={} rot={:.3}",
                        field.len(),
                        field.rotation_y()
                    );
                }
            }
        }

        for painting in scene.paintings() {
            let p = painting.placement.position;
            let wall = if p.x < 0.0 { "left" } else { "right" };
            let _ = writeln!(
                out,
                "  painting {:?} {wall} wall z={:.1} accent={}",
                painting.title, p.z, painting.accent
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_scene::{PaintingDescriptor, build_gallery, default_paintings};

    #[test]
    fn empty_scene_has_header_only() {
        let scene = SceneGraph::new();
        let out = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(out.contains("meshes=0"));
        assert!(!out.contains("Fog:"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn gallery_dump_lists_every_node_and_painting() {
        let scene = build_gallery(&default_paintings(), 42);
        let out = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(out.contains("meshes=26"));
        assert!(out.contains("Fog: #070812 8..60"));
        assert!(out.contains("particles n=900"));
        assert!(out.contains("\"Painting 01\" left wall z=12.0"));
        assert!(out.contains("\"Painting 02\" right wall z=6.0"));
        // header, camera, fog, nodes, paintings
        assert_eq!(out.lines().count(), 3 + scene.node_count() + 6);
    }

    #[test]
    fn custom_titles_appear() {
        let scene = build_gallery(&[PaintingDescriptor::placeholder("Ocean Dream")], 1);
        let out = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(out.contains("Ocean Dream"));
    }

    #[test]
    fn view_follows_rig() {
        let mut rig = PointerLockRig::default();
        rig.position = Vec3::new(1.0, 1.65, 2.0);
        let view = RenderView::from_rig(&rig);
        assert_eq!(view.eye, rig.position);
        assert!((view.target - Vec3::new(1.0, 1.65, 1.0)).length() < 1e-5);
        assert!((view.fov_degrees - 70.0).abs() < 1e-4);
        let a = view.view_projection();
        let b = rig.view_projection();
        assert!(a.abs_diff_eq(b, 1e-4));
    }
}
