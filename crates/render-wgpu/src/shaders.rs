/// Shared uniform block. Layout mirrors `frame::Uniforms`.
const UNIFORMS: &str = r#"
struct Light {
    position_range: vec4<f32>,
    color_intensity: vec4<f32>,
    direction_cos: vec4<f32>,
    params: vec4<f32>,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    particle_model: mat4x4<f32>,
    camera_pos: vec4<f32>,
    fog_color: vec4<f32>,
    fog_params: vec4<f32>,
    ambient: vec4<f32>,
    particle_color: vec4<f32>,
    counts: vec4<f32>,
    lights: array<Light, 16>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

fn apply_fog(color: vec3<f32>, world_pos: vec3<f32>) -> vec3<f32> {
    if (uniforms.fog_color.w < 0.5) {
        return color;
    }
    let d = distance(uniforms.camera_pos.xyz, world_pos);
    let span = max(uniforms.fog_params.y - uniforms.fog_params.x, 0.0001);
    let f = clamp((d - uniforms.fog_params.x) / span, 0.0, 1.0);
    return mix(color, uniforms.fog_color.rgb, f);
}
"#;

/// Lit surfaces: instanced boxes and planes, flat or image-mapped.
const SURFACE: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
    @location(7) color: vec4<f32>,
    @location(8) emissive: vec4<f32>,
    @location(9) surface: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) color: vec4<f32>,
    @location(4) emissive: vec3<f32>,
    @location(5) surface: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.uv = vertex.uv;
    out.color = instance.color;
    out.emissive = instance.emissive.rgb;
    out.surface = instance.surface.xy;
    return out;
}

fn shade(in: VertexOutput, base: vec3<f32>) -> vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(uniforms.camera_pos.xyz - in.world_pos);
    let roughness = in.surface.x;
    let metalness = in.surface.y;
    let diffuse_color = base * (1.0 - metalness * 0.5);
    let spec_color = mix(vec3<f32>(0.04), base, metalness);
    let shininess = mix(64.0, 4.0, roughness);

    var color = uniforms.ambient.rgb * diffuse_color;
    let count = u32(uniforms.counts.x);
    for (var i = 0u; i < count; i = i + 1u) {
        let light = uniforms.lights[i];
        let to_light = light.position_range.xyz - in.world_pos;
        let d = length(to_light);
        let l = to_light / max(d, 0.0001);
        var atten = pow(clamp(1.0 - d / light.position_range.w, 0.0, 1.0), light.params.y);
        if (light.params.x > 0.5) {
            let cd = dot(-l, light.direction_cos.xyz);
            atten = atten * smoothstep(light.direction_cos.w, light.params.z, cd);
        }
        let ndl = max(dot(n, l), 0.0);
        let h = normalize(l + v);
        let spec = pow(max(dot(n, h), 0.0), shininess) * (1.0 - roughness) * ndl;
        let radiance = light.color_intensity.rgb * light.color_intensity.w * atten;
        color = color + radiance * (diffuse_color * ndl + spec_color * spec);
    }
    color = color + in.emissive;
    return vec4<f32>(apply_fog(color, in.world_pos), in.color.a);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return shade(in, in.color.rgb);
}

@group(1) @binding(0)
var canvas_texture: texture_2d<f32>;
@group(1) @binding(1)
var canvas_sampler: sampler;

@fragment
fn fs_textured(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(canvas_texture, canvas_sampler, in.uv);
    return shade(in, texel.rgb * in.color.rgb);
}
"#;

/// Dust motes: camera-facing round sprites, alpha blended.
const PARTICLES: &str = r#"
struct SpriteInput {
    @location(0) corner: vec2<f32>,
    @location(1) center: vec3<f32>,
};

struct SpriteOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) world_pos: vec3<f32>,
};

@vertex
fn vs_particle(in: SpriteInput) -> SpriteOutput {
    let world = uniforms.particle_model * vec4<f32>(in.center, 1.0);
    var view_pos = uniforms.view * world;
    view_pos = vec4<f32>(view_pos.xy + in.corner * uniforms.counts.y, view_pos.zw);

    var out: SpriteOutput;
    out.clip_position = uniforms.proj * view_pos;
    out.corner = in.corner;
    out.world_pos = world.xyz;
    return out;
}

@fragment
fn fs_particle(in: SpriteOutput) -> @location(0) vec4<f32> {
    let r = length(in.corner) * 2.0;
    if (r > 1.0) {
        discard;
    }
    let c = apply_fog(uniforms.particle_color.rgb, in.world_pos);
    return vec4<f32>(c, uniforms.particle_color.a);
}
"#;

pub fn surface_shader() -> String {
    format!("{UNIFORMS}{SURFACE}")
}

pub fn particle_shader() -> String {
    format!("{UNIFORMS}{PARTICLES}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::MAX_LIGHTS;

    #[test]
    fn shaders_share_the_uniform_block() {
        for src in [surface_shader(), particle_shader()] {
            assert!(src.contains("var<uniform> uniforms: Uniforms;"));
            assert_eq!(src.matches("struct Uniforms").count(), 1);
        }
    }

    #[test]
    fn entry_points_exist() {
        let surface = surface_shader();
        for entry in ["fn vs_main", "fn fs_main", "fn fs_textured"] {
            assert!(surface.contains(entry), "{entry} missing");
        }
        let particle = particle_shader();
        assert!(particle.contains("fn vs_particle") && particle.contains("fn fs_particle"));
    }

    #[test]
    fn light_array_matches_cpu_capacity() {
        assert!(UNIFORMS.contains(&format!("array<Light, {MAX_LIGHTS}>")));
    }
}
