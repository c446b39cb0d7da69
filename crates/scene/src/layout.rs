//! The gallery floor plan: hall shell, lights, particles and paintings.

use crate::graph::{Fog, Geometry, SceneGraph};
use crate::light::Light;
use crate::material::{Material, MaterialId};
use crate::painting::{PaintingDescriptor, hang_paintings};
use crate::particles::{PARTICLE_COUNT, ParticleField};
use gallery_common::{Rgb, Transform};
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

const FLOOR_SIZE: f32 = 80.0;
const CEILING_HEIGHT: f32 = 6.0;
const WALL_THICKNESS: f32 = 0.5;
const TRIM_HEIGHT: f32 = 0.12;
const TRIM_THICKNESS: f32 = 0.55;

/// Wall segments as `(width, height, x, y, z, ry)`.
const WALLS: [(f32, f32, f32, f32, f32, f32); 6] = [
    // main corridor
    (60.0, 6.0, 0.0, 3.0, -10.0, 0.0),
    (60.0, 6.0, 0.0, 3.0, 10.0, 0.0),
    (0.5, 6.0, -30.0, 3.0, 0.0, 0.0),
    (0.5, 6.0, 30.0, 3.0, 0.0, 0.0),
    // short segments that read as openings to side rooms
    (10.0, 6.0, -15.0, 3.0, 0.0, 0.0),
    (10.0, 6.0, 15.0, 3.0, 0.0, 0.0),
];

/// The six untitled placeholder paintings hung when no manifest is given.
pub fn default_paintings() -> Vec<PaintingDescriptor> {
    (1..=6)
        .map(|i| PaintingDescriptor::placeholder(format!("Painting {i:02}")))
        .collect()
}

/// Assemble the whole gallery. Deterministic for a given descriptor list and particle seed.
pub fn build_gallery(paintings: &[PaintingDescriptor], particle_seed: u64) -> SceneGraph {
    let _span = tracing::info_span!("build_gallery").entered();
    let mut scene = SceneGraph::new();

    scene.set_fog(Fog {
        color: Rgb::from_hex(0x070812),
        near: 8.0,
        far: 60.0,
    });

    let wall = scene.add_material(Material::standard("wall", 0x0f1028, 0.9, 0.0));
    let trim = scene.add_material(Material::standard("trim", 0x1b1f3a, 0.7, 0.15));
    let floor = scene.add_material(Material::standard("floor", 0x0b0c18, 0.95, 0.0));
    let ceiling = scene.add_material(Material::standard("ceiling", 0x0a0b14, 1.0, 0.0));

    let slab = Geometry::Plane {
        width: FLOOR_SIZE,
        height: FLOOR_SIZE,
    };
    scene.add_mesh(
        "floor",
        slab,
        floor,
        Transform {
            rotation: Quat::from_rotation_x(-FRAC_PI_2),
            ..Transform::default()
        },
    );
    scene.add_mesh(
        "ceiling",
        slab,
        ceiling,
        Transform {
            position: Vec3::new(0.0, CEILING_HEIGHT, 0.0),
            rotation: Quat::from_rotation_x(FRAC_PI_2),
            ..Transform::default()
        },
    );

    for (i, &(w, h, x, y, z, ry)) in WALLS.iter().enumerate() {
        add_wall(&mut scene, i, wall, trim, w, h, Vec3::new(x, y, z), ry);
    }

    add_lights(&mut scene);
    scene.add_particles(ParticleField::scatter(PARTICLE_COUNT, particle_seed));
    hang_paintings(&mut scene, paintings);

    let summary = scene.summary();
    tracing::info!(
        meshes = summary.meshes,
        lights = summary.lights,
        paintings = summary.paintings,
        "gallery assembled"
    );
    scene
}

#[allow(clippy::too_many_arguments)]
fn add_wall(
    scene: &mut SceneGraph,
    index: usize,
    wall: MaterialId,
    trim: MaterialId,
    width: f32,
    height: f32,
    center: Vec3,
    ry: f32,
) {
    scene.add_mesh(
        format!("wall {index}"),
        Geometry::Box {
            width,
            height,
            depth: WALL_THICKNESS,
        },
        wall,
        Transform::at_yaw(center, ry),
    );
    // baseboard trim, sitting on the floor
    scene.add_mesh(
        format!("trim {index}"),
        Geometry::Box {
            width,
            height: TRIM_HEIGHT,
            depth: TRIM_THICKNESS,
        },
        trim,
        Transform::at_yaw(Vec3::new(center.x, TRIM_HEIGHT / 2.0, center.z), ry),
    );
}

fn add_lights(scene: &mut SceneGraph) {
    scene.add_light(Light::Ambient {
        color: Rgb::WHITE,
        intensity: 0.25,
    });
    // key, pink, gold
    scene.add_light(Light::point(0x2bbcff, 1.1, 50.0, Vec3::new(-10.0, 4.2, 2.0)));
    scene.add_light(Light::point(0xff2bd6, 1.2, 55.0, Vec3::new(12.0, 4.0, -4.0)));
    scene.add_light(Light::point(0xfeda2c, 0.8, 45.0, Vec3::new(0.0, 4.5, 0.0)));
    // portal glow at the far end
    scene.add_light(Light::point(0x7c3aed, 1.6, 60.0, Vec3::new(0.0, 2.5, -24.0)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SceneNode;

    #[test]
    fn default_gallery_counts() {
        let scene = build_gallery(&default_paintings(), 42);
        let s = scene.summary();
        // floor + ceiling + 6 walls + 6 trims + 6 frames + 6 canvases
        assert_eq!(s.meshes, 26);
        // ambient + 4 points + 6 spots
        assert_eq!(s.lights, 11);
        assert_eq!(s.particles, 1);
        assert_eq!(s.paintings, 6);
        assert_eq!(scene.particles().unwrap().len(), 900);
    }

    #[test]
    fn floor_faces_up_and_ceiling_faces_down() {
        let scene = build_gallery(&[], 0);
        let floor = scene.meshes().find(|m| m.name == "floor").unwrap();
        let ceiling = scene.meshes().find(|m| m.name == "ceiling").unwrap();
        assert!((floor.transform.rotation * Vec3::Z - Vec3::Y).length() < 1e-6);
        assert!((ceiling.transform.rotation * Vec3::Z + Vec3::Y).length() < 1e-6);
        assert_eq!(ceiling.transform.position.y, 6.0);
    }

    #[test]
    fn trim_sits_on_floor_under_each_wall() {
        let scene = build_gallery(&[], 0);
        let trims: Vec<_> = scene
            .meshes()
            .filter(|m| m.name.starts_with("trim"))
            .collect();
        assert_eq!(trims.len(), 6);
        for t in trims {
            assert_eq!(t.transform.position.y, 0.06);
        }
    }

    #[test]
    fn fog_matches_hall_atmosphere() {
        let scene = build_gallery(&[], 0);
        let fog = scene.fog().unwrap();
        assert_eq!(fog.color, Rgb::from_hex(0x070812));
        assert_eq!((fog.near, fog.far), (8.0, 60.0));
    }

    #[test]
    fn portal_light_is_at_far_end() {
        let scene = build_gallery(&[], 0);
        let portal = scene.lights().find(|l| l.color() == Rgb::from_hex(0x7c3aed));
        assert!(matches!(
            portal,
            Some(Light::Point { position, intensity, .. }) if position.z == -24.0 && *intensity == 1.6
        ));
    }

    #[test]
    fn assembly_is_deterministic() {
        let a = build_gallery(&default_paintings(), 5);
        let b = build_gallery(&default_paintings(), 5);
        assert_eq!(a.node_count(), b.node_count());
        for ((_, na), (_, nb)) in a.nodes().zip(b.nodes()) {
            assert_eq!(na, nb);
        }
    }

    #[test]
    fn default_paintings_are_untitled_placeholders() {
        let p = default_paintings();
        assert_eq!(p.len(), 6);
        assert_eq!(p[0].title, "Painting 01");
        assert!(p.iter().all(|d| d.image.is_none() && d.accent.is_none()));
    }

    #[test]
    fn gallery_has_one_particle_field() {
        let scene = build_gallery(&[], 0);
        let n = scene
            .nodes()
            .filter(|(_, n)| matches!(n, SceneNode::Particles(_)))
            .count();
        assert_eq!(n, 1);
    }
}
