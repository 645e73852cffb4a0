use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use mediscan_common::decode::{media_type_for_path, read_image_file};
use mediscan_common::{DetectionResult, ImageFile, UploadFile};

/// ドロップ/選択されたパス（受付が決まるまで中身は読まない）
#[derive(Debug, Clone)]
pub struct PickedPath(pub PathBuf);

impl UploadFile for PickedPath {
    fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn media_type(&self) -> String {
        media_type_for_path(&self.0).to_string()
    }
}

pub struct RgbaImage {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

pub fn load_image_file(path: &Path) -> Result<ImageFile> {
    read_image_file(path).with_context(|| format!("read {}", path.display()))
}

pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).context("decode image")?;
    let rgba = image.to_rgba8();
    Ok(RgbaImage {
        size: [rgba.width() as usize, rgba.height() as usize],
        pixels: rgba.into_raw(),
    })
}

pub fn save_result(path: &Path, result: &DetectionResult) -> Result<()> {
    let content = serde_json::to_string_pretty(result)?;
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn default_result_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("result");
    format!("{stem}.result.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picked_path_media_type() {
        let png = PickedPath(PathBuf::from("/tmp/chest.PNG"));
        assert_eq!(png.file_name(), "chest.PNG");
        assert_eq!(png.media_type(), "image/png");

        let pdf = PickedPath(PathBuf::from("document.pdf"));
        assert!(!pdf.media_type().starts_with("image/"));
    }

    #[test]
    fn test_default_result_name() {
        assert_eq!(default_result_name("chest.png"), "chest.result.json");
        assert_eq!(default_result_name(""), "result.result.json");
    }

    #[test]
    fn test_decode_rgba_rejects_garbage() {
        assert!(decode_rgba(b"not an image").is_err());
    }

    #[test]
    fn test_save_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chest.result.json");
        save_result(&path, &DetectionResult::default()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"highlightedAreas\""));
    }
}
