use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::warn;

use crate::config::ProcessingConfig;
use crate::types::ProductImage;

/// Shortest byte sequence that can carry a recognized header
const MIN_IMAGE_BYTES: usize = 10;

const SIGNATURES: [&[u8]; 5] = [
    b"\xff\xd8\xff",
    b"\x89PNG\r\n\x1a\n",
    b"RIFF",
    b"GIF87a",
    b"GIF89a",
];

/// Whether the bytes start with a JPEG, PNG, WebP or GIF signature
pub fn has_image_signature(data: &[u8]) -> bool {
    data.len() >= MIN_IMAGE_BYTES && SIGNATURES.iter().any(|sig| data.starts_with(sig))
}

/// Check an image against the processing limits.
///
/// Rejected images are logged and yield `None`; accepted paths are made absolute.
pub async fn validate_image(image: &ProductImage, config: &ProcessingConfig) -> Option<ProductImage> {
    match image {
        ProductImage::Path(path) => validate_path(path, config).await.map(ProductImage::Path),
        ProductImage::Bytes(data) => {
            validate_bytes(data, config).then(|| ProductImage::Bytes(data.clone()))
        }
    }
}

fn validate_bytes(data: &[u8], config: &ProcessingConfig) -> bool {
    if data.is_empty() {
        return false;
    }
    if data.len() as u64 > config.max_image_size {
        warn!(bytes = data.len(), "image data too large");
        return false;
    }
    if !has_image_signature(data) {
        warn!("invalid image data format");
        return false;
    }
    true
}

async fn validate_path(path: &Path, config: &ProcessingConfig) -> Option<PathBuf> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => {
            warn!(path = %path.display(), "image file not found");
            return None;
        }
    };

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if !config.is_supported_format(extension) {
        warn!(path = %path.display(), extension = %extension, "unsupported image format");
        return None;
    }

    if metadata.len() > config.max_image_size {
        warn!(path = %path.display(), bytes = metadata.len(), "image file too large");
        return None;
    }

    let mut header = [0u8; MIN_IMAGE_BYTES];
    let header_ok = match tokio::fs::File::open(path).await {
        Ok(mut file) => file.read_exact(&mut header).await.is_ok() && has_image_signature(&header),
        Err(_) => false,
    };
    if !header_ok {
        warn!(path = %path.display(), "image file has no recognized signature");
        return None;
    }

    match std::path::absolute(path) {
        Ok(absolute) => Some(absolute),
        Err(_) => Some(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_signatures() {
        assert!(has_image_signature(PNG_HEADER));
        assert!(has_image_signature(b"\xff\xd8\xff\xe0\0\x10JFIF\0"));
        assert!(has_image_signature(b"GIF89a\x01\0\x01\0\0"));
        assert!(!has_image_signature(b"GIF89a"));
        assert!(!has_image_signature(b"%PDF-1.7 not an image"));
    }

    #[tokio::test]
    async fn test_bytes_over_limit_are_rejected() {
        let config = ProcessingConfig {
            max_image_size: 12,
            ..ProcessingConfig::default()
        };
        let mut data = PNG_HEADER.to_vec();
        data.extend_from_slice(&[0; 32]);

        let result = validate_image(&ProductImage::Bytes(data), &config).await;
        assert!(result.is_none());

        let result = validate_image(&ProductImage::Bytes(PNG_HEADER[..12].to_vec()), &config).await;
        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_path_checks() {
        let dir = TempDir::new().unwrap();
        let config = ProcessingConfig::default();

        let mut png = Builder::new().suffix(".png").tempfile_in(dir.path()).unwrap();
        png.write_all(PNG_HEADER).unwrap();
        let accepted = validate_image(&ProductImage::Path(png.path().to_path_buf()), &config).await;
        assert!(matches!(accepted, Some(ProductImage::Path(p)) if p.is_absolute()));

        let mut bmp = Builder::new().suffix(".bmp").tempfile_in(dir.path()).unwrap();
        bmp.write_all(PNG_HEADER).unwrap();
        let rejected = validate_image(&ProductImage::Path(bmp.path().to_path_buf()), &config).await;
        assert!(rejected.is_none());

        let mut fake = Builder::new().suffix(".jpg").tempfile_in(dir.path()).unwrap();
        fake.write_all(b"plain text, not a jpeg").unwrap();
        let rejected = validate_image(&ProductImage::Path(fake.path().to_path_buf()), &config).await;
        assert!(rejected.is_none());

        let missing = dir.path().join("missing.png");
        assert!(validate_image(&ProductImage::Path(missing), &config).await.is_none());
    }
}
