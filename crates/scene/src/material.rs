use gallery_common::Rgb;
use std::path::PathBuf;

/// Index into the scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// A standard lit surface: base color, roughness/metalness, optional emission and image map.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Rgb,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    /// Image shown on the surface. When present it replaces `color`.
    pub map: Option<PathBuf>,
}

impl Material {
    pub fn standard(name: &str, hex: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            name: name.to_string(),
            color: Rgb::from_hex(hex),
            roughness,
            metalness,
            emissive: Rgb::from_hex(0x000000),
            emissive_intensity: 0.0,
            map: None,
        }
    }

    /// Stand-in for a painting with no image: flat accent color with a faint glow,
    /// so the canvas reads as unloaded art instead of a dark hole.
    pub fn placeholder(accent: Rgb) -> Self {
        Self {
            name: format!("placeholder {accent}"),
            color: accent,
            roughness: 0.65,
            metalness: 0.15,
            emissive: accent,
            emissive_intensity: 0.15,
            map: None,
        }
    }

    pub fn textured(image: PathBuf) -> Self {
        Self {
            name: format!("canvas {}", image.display()),
            color: Rgb::WHITE,
            roughness: 0.7,
            metalness: 0.05,
            emissive: Rgb::from_hex(0x000000),
            emissive_intensity: 0.0,
            map: Some(image),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.map.is_none() && self.emissive_intensity > 0.0 && self.emissive == self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_glows_in_its_accent() {
        let m = Material::placeholder(Rgb::from_hex(0xff2bd6));
        assert!(m.is_placeholder());
        assert_eq!(m.emissive, Rgb::from_hex(0xff2bd6));
        assert_eq!(m.emissive_intensity, 0.15);
        assert_eq!(m.roughness, 0.65);
    }

    #[test]
    fn textured_material_is_not_a_placeholder() {
        let m = Material::textured(PathBuf::from("art/ocean.png"));
        assert!(!m.is_placeholder());
        assert_eq!(m.map.as_deref(), Some(std::path::Path::new("art/ocean.png")));
    }

    #[test]
    fn standard_material_has_no_emission() {
        let m = Material::standard("wall", 0x0f1028, 0.9, 0.0);
        assert_eq!(m.emissive_intensity, 0.0);
        assert!(!m.is_placeholder());
    }
}
