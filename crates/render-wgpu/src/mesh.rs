use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

const fn v(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex {
        position,
        normal,
        uv,
    }
}

/// Unit cube centered on the origin, 4 vertices per face so normals stay flat.
pub(crate) fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z
        v([-p, -p,  p], [0.0, 0.0, 1.0], [0.0, 1.0]),
        v([ p, -p,  p], [0.0, 0.0, 1.0], [1.0, 1.0]),
        v([ p,  p,  p], [0.0, 0.0, 1.0], [1.0, 0.0]),
        v([-p,  p,  p], [0.0, 0.0, 1.0], [0.0, 0.0]),
        // -Z
        v([ p, -p, -p], [0.0, 0.0, -1.0], [0.0, 1.0]),
        v([-p, -p, -p], [0.0, 0.0, -1.0], [1.0, 1.0]),
        v([-p,  p, -p], [0.0, 0.0, -1.0], [1.0, 0.0]),
        v([ p,  p, -p], [0.0, 0.0, -1.0], [0.0, 0.0]),
        // +X
        v([ p, -p,  p], [1.0, 0.0, 0.0], [0.0, 1.0]),
        v([ p, -p, -p], [1.0, 0.0, 0.0], [1.0, 1.0]),
        v([ p,  p, -p], [1.0, 0.0, 0.0], [1.0, 0.0]),
        v([ p,  p,  p], [1.0, 0.0, 0.0], [0.0, 0.0]),
        // -X
        v([-p, -p, -p], [-1.0, 0.0, 0.0], [0.0, 1.0]),
        v([-p, -p,  p], [-1.0, 0.0, 0.0], [1.0, 1.0]),
        v([-p,  p,  p], [-1.0, 0.0, 0.0], [1.0, 0.0]),
        v([-p,  p, -p], [-1.0, 0.0, 0.0], [0.0, 0.0]),
        // +Y
        v([-p,  p,  p], [0.0, 1.0, 0.0], [0.0, 1.0]),
        v([ p,  p,  p], [0.0, 1.0, 0.0], [1.0, 1.0]),
        v([ p,  p, -p], [0.0, 1.0, 0.0], [1.0, 0.0]),
        v([-p,  p, -p], [0.0, 1.0, 0.0], [0.0, 0.0]),
        // -Y
        v([-p, -p, -p], [0.0, -1.0, 0.0], [0.0, 1.0]),
        v([ p, -p, -p], [0.0, -1.0, 0.0], [1.0, 1.0]),
        v([ p, -p,  p], [0.0, -1.0, 0.0], [1.0, 0.0]),
        v([-p, -p,  p], [0.0, -1.0, 0.0], [0.0, 0.0]),
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,
        4,5,6, 6,7,4,
        8,9,10, 10,11,8,
        12,13,14, 14,15,12,
        16,17,18, 18,19,16,
        20,21,22, 22,23,20,
    ];
    (vertices, indices)
}

/// Unit plane in XY facing +Z. UV origin is the top-left corner, matching image rows.
pub(crate) fn plane_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let n = [0.0, 0.0, 1.0];
    let vertices = vec![
        v([-p, -p, 0.0], n, [0.0, 1.0]),
        v([p, -p, 0.0], n, [1.0, 1.0]),
        v([p, p, 0.0], n, [1.0, 0.0]),
        v([-p, p, 0.0], n, [0.0, 0.0]),
    ];
    (vertices, vec![0, 1, 2, 2, 3, 0])
}

/// Corner offsets of a camera-facing particle sprite.
pub(crate) const SPRITE_CORNERS: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];
pub(crate) const SPRITE_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Every triangle winds counter-clockwise when seen from the side its normal points to.
    fn assert_front_faces_outward(vertices: &[Vertex], indices: &[u16]) {
        for tri in indices.chunks(3) {
            let a = Vec3::from(vertices[tri[0] as usize].position);
            let b = Vec3::from(vertices[tri[1] as usize].position);
            let c = Vec3::from(vertices[tri[2] as usize].position);
            let n = Vec3::from(vertices[tri[0] as usize].normal);
            let face = (b - a).cross(c - a).normalize();
            assert!((face - n).length() < 1e-6, "triangle {tri:?} winds against {n}");
        }
    }

    #[test]
    fn cube_has_six_flat_faces() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
        assert_front_faces_outward(&verts, &indices);
        for vert in &verts {
            assert!(vert.position.iter().all(|c| c.abs() == 0.5));
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let (verts, indices) = plane_mesh();
        assert_eq!(verts.len(), 4);
        assert_front_faces_outward(&verts, &indices);
        // top-left corner samples the first image row
        let top_left = verts.iter().find(|v| v.position[0] < 0.0 && v.position[1] > 0.0);
        assert_eq!(top_left.map(|v| v.uv), Some([0.0, 0.0]));
    }

    #[test]
    fn sprite_quad_winds_toward_the_viewer() {
        for tri in SPRITE_INDICES.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| {
                let [x, y] = SPRITE_CORNERS[tri[k] as usize];
                Vec3::new(x, y, 0.0)
            });
            assert!((b - a).cross(c - a).z > 0.0);
        }
    }
}
