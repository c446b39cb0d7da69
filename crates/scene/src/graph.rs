use crate::light::Light;
use crate::material::{Material, MaterialId};
use crate::painting::PlacedPainting;
use crate::particles::ParticleField;
use gallery_common::{NodeId, Rgb, Transform};
use glam::{Mat4, Vec3};

/// Primitive shapes the gallery is built from. Sizes are in scene meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// A single-sided rectangle in its local XY plane, facing +Z.
    Plane { width: f32, height: f32 },
    /// An axis-aligned box centered on its origin.
    Box { width: f32, height: f32, depth: f32 },
}

impl Geometry {
    /// Scale that turns the unit primitive (1 × 1 plane or 1 × 1 × 1 cube) into this shape.
    pub fn extent(&self) -> Vec3 {
        match *self {
            Self::Plane { width, height } => Vec3::new(width, height, 1.0),
            Self::Box {
                width,
                height,
                depth,
            } => Vec3::new(width, height, depth),
        }
    }
}

/// A positioned solid with a material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: MaterialId,
    pub transform: Transform,
}

impl Mesh {
    /// Model matrix including the geometry's extent.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix() * Mat4::from_scale(self.geometry.extent())
    }
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// Fog blend factor at `distance`: 0 before `near`, 1 past `far`.
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Mesh(Mesh),
    Light(Light),
    Particles(ParticleField),
}

/// Node counts by kind, for logs and the debug renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub meshes: usize,
    pub lights: usize,
    pub particles: usize,
    pub materials: usize,
    pub paintings: usize,
}

/// The root scene container.
///
/// Composition is purely additive: there is no removal or reparenting API, so a `NodeId`
/// stays valid for the life of the graph.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    materials: Vec<Material>,
    paintings: Vec<PlacedPainting>,
    fog: Option<Fog>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    fn push(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn add_mesh(
        &mut self,
        name: impl Into<String>,
        geometry: Geometry,
        material: MaterialId,
        transform: Transform,
    ) -> NodeId {
        self.push(SceneNode::Mesh(Mesh {
            name: name.into(),
            geometry,
            material,
            transform,
        }))
    }

    pub fn add_light(&mut self, light: Light) -> NodeId {
        self.push(SceneNode::Light(light))
    }

    pub fn add_particles(&mut self, field: ParticleField) -> NodeId {
        self.push(SceneNode::Particles(field))
    }

    pub(crate) fn record_painting(&mut self, painting: PlacedPainting) {
        self.paintings.push(painting);
    }

    pub fn set_fog(&mut self, fog: Fog) {
        self.fog = Some(fog);
    }

    pub fn fog(&self) -> Option<Fog> {
        self.fog
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn mesh(&self, id: NodeId) -> Option<&Mesh> {
        match self.node(id) {
            Some(SceneNode::Mesh(m)) => Some(m),
            _ => None,
        }
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Mesh(m) => Some(m),
            _ => None,
        })
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Light(l) => Some(l),
            _ => None,
        })
    }

    pub fn light(&self, id: NodeId) -> Option<&Light> {
        match self.node(id) {
            Some(SceneNode::Light(l)) => Some(l),
            _ => None,
        }
    }

    /// The first particle field in the scene, if any.
    pub fn particles(&self) -> Option<&ParticleField> {
        self.nodes.iter().find_map(|n| match n {
            SceneNode::Particles(p) => Some(p),
            _ => None,
        })
    }

    pub fn particles_mut(&mut self) -> Option<&mut ParticleField> {
        self.nodes.iter_mut().find_map(|n| match n {
            SceneNode::Particles(p) => Some(p),
            _ => None,
        })
    }

    pub fn paintings(&self) -> &[PlacedPainting] {
        &self.paintings
    }

    pub fn summary(&self) -> SceneSummary {
        let mut s = SceneSummary {
            materials: self.materials.len(),
            paintings: self.paintings.len(),
            ..SceneSummary::default()
        };
        for node in &self.nodes {
            match node {
                SceneNode::Mesh(_) => s.meshes += 1,
                SceneNode::Light(_) => s.lights += 1,
                SceneNode::Particles(_) => s.particles += 1,
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_starts_empty() {
        let g = SceneGraph::new();
        assert_eq!(g.node_count(), 0);
        assert!(g.particles().is_none());
        assert!(g.fog().is_none());
    }

    #[test]
    fn node_ids_are_dense_and_stable() {
        let mut g = SceneGraph::new();
        let mat = g.add_material(Material::standard("m", 0x101010, 1.0, 0.0));
        let a = g.add_mesh(
            "a",
            Geometry::Plane {
                width: 1.0,
                height: 1.0,
            },
            mat,
            Transform::default(),
        );
        let b = g.add_light(Light::point(0xffffff, 1.0, 10.0, Vec3::Y));
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert!(g.mesh(a).is_some());
        assert!(g.mesh(b).is_none());
        assert!(g.light(b).is_some());
    }

    #[test]
    fn model_matrix_applies_extent_then_transform() {
        let mesh = Mesh {
            name: "box".into(),
            geometry: Geometry::Box {
                width: 2.0,
                height: 4.0,
                depth: 0.5,
            },
            material: MaterialId(0),
            transform: Transform::at_yaw(Vec3::new(1.0, 2.0, 3.0), 0.0),
        };
        let corner = mesh.model_matrix().transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(2.0, 4.0, 3.25)).length() < 1e-6);
    }

    #[test]
    fn particles_are_mutable_in_place() {
        let mut g = SceneGraph::new();
        g.add_particles(ParticleField::scatter(10, 3));
        g.particles_mut().unwrap().advance(1.0);
        assert!(g.particles().unwrap().rotation_y() > 0.0);
    }

    #[test]
    fn fog_factor_is_linear_between_near_and_far() {
        let fog = Fog {
            color: Rgb::from_hex(0x070812),
            near: 8.0,
            far: 60.0,
        };
        assert_eq!(fog.factor(0.0), 0.0);
        assert_eq!(fog.factor(8.0), 0.0);
        assert!((fog.factor(34.0) - 0.5).abs() < 1e-6);
        assert_eq!(fog.factor(100.0), 1.0);
    }

    #[test]
    fn summary_counts_by_kind() {
        let mut g = SceneGraph::new();
        let mat = g.add_material(Material::standard("m", 0x101010, 1.0, 0.0));
        g.add_mesh(
            "a",
            Geometry::Plane {
                width: 1.0,
                height: 1.0,
            },
            mat,
            Transform::default(),
        );
        g.add_light(Light::Ambient {
            color: Rgb::WHITE,
            intensity: 0.25,
        });
        g.add_particles(ParticleField::scatter(4, 0));
        let s = g.summary();
        assert_eq!(s.meshes, 1);
        assert_eq!(s.lights, 1);
        assert_eq!(s.particles, 1);
        assert_eq!(s.materials, 1);
    }
}
