//! ネイティブ環境での画像デコード（`native` feature）

use crate::error::{Error, Result};
use crate::types::{ImageDimensions, ImageFile};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// 画像として扱えないファイルのMIMEタイプ
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// バイト列を画像としてデコードし、寸法を返す
pub fn probe_dimensions(bytes: &[u8]) -> Result<ImageDimensions> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::Decode(e.to_string()))?;

    if reader.format().is_none() {
        return Err(Error::Decode("unrecognized image format".to_string()));
    }

    let image = reader.decode().map_err(|e| Error::Decode(e.to_string()))?;
    Ok(ImageDimensions {
        width: image.width(),
        height: image.height(),
    })
}

/// 拡張子からMIMEタイプを推定
pub fn media_type_for_path(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MEDIA_TYPE)
}

/// ファイルを読み込んで `ImageFile` を作る（形式の検証はしない）
pub fn read_image_file(path: &Path) -> Result<ImageFile> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(ImageFile::new(name, media_type_for_path(path), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Rgb([40, 40, 40]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("PNGエンコード失敗");
        out.into_inner()
    }

    #[test]
    fn test_probe_dimensions_png() {
        let dims = probe_dimensions(&png_bytes(64, 48)).expect("デコード失敗");
        assert_eq!(dims, ImageDimensions { width: 64, height: 48 });
    }

    #[test]
    fn test_probe_dimensions_garbage() {
        let err = probe_dimensions(b"%PDF-1.7 not an image").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_probe_dimensions_truncated_png() {
        let mut bytes = png_bytes(32, 32);
        bytes.truncate(bytes.len() / 2);
        assert!(matches!(probe_dimensions(&bytes), Err(Error::Decode(_))));
    }

    #[test]
    fn test_media_type_for_path() {
        assert_eq!(media_type_for_path(Path::new("chest.png")), "image/png");
        assert_eq!(media_type_for_path(Path::new("CHEST.JPG")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("document.pdf")), UNKNOWN_MEDIA_TYPE);
        assert_eq!(media_type_for_path(Path::new("noext")), UNKNOWN_MEDIA_TYPE);
    }
}
