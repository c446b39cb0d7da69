use crate::AssetError;
use gallery_common::Rgb;
use gallery_scene::PaintingDescriptor;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    /// YAML for `.yaml`/`.yml`, JSON for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Top level of a manifest: either a bare list or `{ "paintings": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestFile {
    List(Vec<ManifestEntry>),
    Wrapped { paintings: Vec<ManifestEntry> },
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    title: String,
    #[serde(default)]
    image: Option<PathBuf>,
    #[serde(default)]
    accent: Option<AccentValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AccentValue {
    Hex(u32),
    Text(String),
}

impl ManifestEntry {
    fn into_descriptor(self, base_dir: &Path) -> Result<PaintingDescriptor, AssetError> {
        let accent = match self.accent {
            None => None,
            Some(AccentValue::Hex(hex)) if hex <= 0xff_ffff => Some(Rgb::from_hex(hex)),
            Some(AccentValue::Hex(hex)) => {
                return Err(AssetError::InvalidAccent {
                    title: self.title,
                    value: format!("{hex:#x}"),
                });
            }
            Some(AccentValue::Text(text)) => match Rgb::parse(&text) {
                Some(rgb) => Some(rgb),
                None => {
                    return Err(AssetError::InvalidAccent {
                        title: self.title,
                        value: text,
                    });
                }
            },
        };
        let image = self.image.map(|p| {
            if p.is_relative() {
                base_dir.join(p)
            } else {
                p
            }
        });
        Ok(PaintingDescriptor {
            title: self.title,
            image,
            accent,
        })
    }
}

/// Parse manifest text. Relative image paths resolve against `base_dir`.
pub fn parse_manifest(
    text: &str,
    format: ManifestFormat,
    base_dir: &Path,
) -> Result<Vec<PaintingDescriptor>, AssetError> {
    let file: ManifestFile = match format {
        ManifestFormat::Json => serde_json::from_str(text)?,
        ManifestFormat::Yaml => serde_yaml::from_str(text)?,
    };
    let entries = match file {
        ManifestFile::List(entries) | ManifestFile::Wrapped { paintings: entries } => entries,
    };
    entries
        .into_iter()
        .map(|e| e.into_descriptor(base_dir))
        .collect()
}

/// Read and parse a manifest file, choosing the format by extension.
pub fn load_manifest(path: &Path) -> Result<Vec<PaintingDescriptor>, AssetError> {
    let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let paintings = parse_manifest(&text, ManifestFormat::from_path(path), base_dir)?;
    tracing::debug!(path = %path.display(), count = paintings.len(), "loaded painting manifest");
    Ok(paintings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_list_parses_titles_images_and_accents() {
        let text = r##"[
            { "title": "Ocean Dream", "image": "art/ocean.png" },
            { "title": "Neon Bloom", "accent": "#ff2bd6" },
            { "title": "Gold", "accent": 16702252 }
        ]"##;
        let p = parse_manifest(text, ManifestFormat::Json, Path::new("/gallery")).unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p[0].image, Some(PathBuf::from("/gallery/art/ocean.png")));
        assert_eq!(p[0].accent, None);
        assert_eq!(p[1].accent, Some(Rgb::from_hex(0xff2bd6)));
        assert_eq!(p[1].image, None);
        assert_eq!(p[2].accent, Some(Rgb::from_hex(0xfeda2c)));
    }

    #[test]
    fn yaml_wrapped_form_parses() {
        let text = "paintings:\n  - title: First\n  - title: Second\n    accent: '25b230'\n";
        let p = parse_manifest(text, ManifestFormat::Yaml, Path::new(".")).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p[1].accent, Some(Rgb::from_hex(0x25b230)));
    }

    #[test]
    fn absolute_image_paths_are_kept() {
        let text = r#"[{ "title": "A", "image": "/abs/a.png" }]"#;
        let p = parse_manifest(text, ManifestFormat::Json, Path::new("/base")).unwrap();
        assert_eq!(p[0].image, Some(PathBuf::from("/abs/a.png")));
    }

    #[test]
    fn bad_accent_is_rejected() {
        let text = r#"[{ "title": "Broken", "accent": "pink" }]"#;
        let err = parse_manifest(text, ManifestFormat::Json, Path::new(".")).unwrap_err();
        assert!(matches!(err, AssetError::InvalidAccent { ref title, .. } if title == "Broken"));

        let text = r#"[{ "title": "Huge", "accent": 305419896 }]"#;
        assert!(parse_manifest(text, ManifestFormat::Json, Path::new(".")).is_err());
    }

    #[test]
    fn missing_title_is_a_parse_error() {
        let text = r#"[{ "image": "a.png" }]"#;
        assert!(parse_manifest(text, ManifestFormat::Json, Path::new(".")).is_err());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("p.yml")),
            ManifestFormat::Yaml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("p.YAML")),
            ManifestFormat::Yaml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("p.json")),
            ManifestFormat::Json
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("paintings")),
            ManifestFormat::Json
        );
    }

    #[test]
    fn load_manifest_resolves_against_file_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hall.json");
        std::fs::write(&path, r#"{ "paintings": [{ "title": "A", "image": "a.png" }] }"#).unwrap();
        let p = load_manifest(&path).unwrap();
        assert_eq!(p[0].image, Some(dir.path().join("a.png")));
    }

    #[test]
    fn load_missing_manifest_reports_path() {
        let err = load_manifest(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
