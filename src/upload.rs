//! Image ingestion: validates an upload and decodes it into a [`SourceImage`].
//!
//! Validation order matters: HEIC/HEIF is rejected with its own message
//! before the generic non-image check, and every rejection is reported
//! synchronously without touching any prior session state.

use crate::error::{Result, XmasifyError};
use crate::image::{ImageFormat, SourceImage};
use std::path::Path;

/// Validates a declared media type (with file-name fallback) and resolves
/// the accepted format.
///
/// Accepts `image/jpeg`, `image/png` and `image/webp` only.
pub fn validate_media_type(declared: &str, file_name: &str) -> Result<ImageFormat> {
    let declared_lower = declared.to_lowercase();
    let name_lower = file_name.to_lowercase();

    // HEIC support was removed; reject it explicitly so the user gets a
    // clear message instead of a generic "unsupported type".
    if declared_lower.contains("heic")
        || declared_lower.contains("heif")
        || name_lower.ends_with(".heic")
        || name_lower.ends_with(".heif")
    {
        return Err(XmasifyError::UnsupportedImage(
            "HEIC format is not supported. Please use JPG, PNG or WEBP.".into(),
        ));
    }

    if !declared_lower.starts_with("image/") {
        return Err(XmasifyError::UnsupportedImage(format!(
            "File type '{declared}' is not supported. Please upload an image."
        )));
    }

    ImageFormat::from_mime_type(&declared_lower).ok_or_else(|| {
        XmasifyError::UnsupportedImage(format!(
            "File type '{declared}' is not supported. Please use JPG, PNG or WEBP."
        ))
    })
}

/// Loads and validates a photo from disk.
///
/// The declared type is derived from the file extension; the decoded bytes
/// must carry matching magic bytes so a mislabeled file cannot slip through.
pub fn load_source(path: impl AsRef<Path>) -> Result<SourceImage> {
    let path = path.as_ref();

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let declared = declared_mime_type(path);

    let format = validate_media_type(&declared, file_name)?;

    let data = std::fs::read(path)?;

    match ImageFormat::from_magic_bytes(&data) {
        Some(detected) if detected == format => {}
        Some(detected) => {
            tracing::debug!(
                declared = format.mime_type(),
                detected = detected.mime_type(),
                "file extension disagrees with content, trusting content"
            );
            return Ok(SourceImage {
                data,
                format: detected,
                path: Some(path.to_path_buf()),
            });
        }
        None => {
            return Err(XmasifyError::UnsupportedImage(format!(
                "'{}' does not look like a valid JPG, PNG or WEBP image.",
                path.display()
            )));
        }
    }

    Ok(SourceImage {
        data,
        format,
        path: Some(path.to_path_buf()),
    })
}

fn declared_mime_type(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    match ext.as_str() {
        "png" => "image/png".into(),
        "jpg" | "jpeg" => "image/jpeg".into(),
        "webp" => "image/webp".into(),
        "heic" => "image/heic".into(),
        "heif" => "image/heif".into(),
        "gif" | "bmp" | "avif" => format!("image/{ext}"),
        _ => "application/octet-stream".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];

    #[test]
    fn test_accepts_supported_types() {
        assert_eq!(
            validate_media_type("image/png", "pet.png").unwrap(),
            ImageFormat::Png
        );
        assert_eq!(
            validate_media_type("image/jpeg", "pet.jpg").unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(
            validate_media_type("image/webp", "pet.webp").unwrap(),
            ImageFormat::WebP
        );
    }

    #[test]
    fn test_rejects_heic_by_type() {
        let err = validate_media_type("image/heic", "pet.heic").unwrap_err();
        assert!(err.to_string().contains("HEIC format is not supported"));
    }

    #[test]
    fn test_rejects_heic_by_extension_fallback() {
        // Declared type may be generic on some systems; the extension
        // still identifies the format.
        let err = validate_media_type("application/octet-stream", "IMG_0042.HEIC").unwrap_err();
        assert!(err.to_string().contains("HEIC format is not supported"));
    }

    #[test]
    fn test_rejects_non_image_type() {
        let err = validate_media_type("application/pdf", "doc.pdf").unwrap_err();
        assert!(err.to_string().contains("'application/pdf'"));
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_rejects_unaccepted_image_type() {
        let err = validate_media_type("image/gif", "anim.gif").unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_load_source_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pet.png");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&PNG_MAGIC).unwrap();

        let source = load_source(&path).unwrap();
        assert_eq!(source.format, ImageFormat::Png);
        assert_eq!(source.data, PNG_MAGIC);
        assert_eq!(source.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_source_trusts_content_over_extension() {
        // JPEG bytes saved with a .png name: the content wins.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mislabeled.png");
        std::fs::write(&path, JPEG_MAGIC).unwrap();

        let source = load_source(&path).unwrap();
        assert_eq!(source.format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_load_source_rejects_heic_before_reading() {
        let err = load_source("photo.heic").unwrap_err();
        assert!(err.to_string().contains("HEIC format is not supported"));
    }

    #[test]
    fn test_rejected_upload_leaves_session_untouched() {
        use crate::image::SourceImage;
        use crate::session::Session;

        let mut session = Session::new();
        session.select_source(SourceImage::new(PNG_MAGIC.to_vec(), ImageFormat::Png));

        // A rejected file never reaches the session; the active source stays.
        assert!(load_source("holiday.heic").is_err());
        assert_eq!(session.source().unwrap().data, PNG_MAGIC);
        assert!(session.generated().is_none());
    }

    #[test]
    fn test_load_source_rejects_garbage_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"not an image at all").unwrap();

        let err = load_source(&path).unwrap_err();
        assert!(err.to_string().contains("does not look like a valid"));
    }
}
