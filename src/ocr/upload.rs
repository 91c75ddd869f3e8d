use std::path::Path;

use super::OcrError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, OcrError> {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name)
            .ok_or_else(|| OcrError::UnsupportedMedia(file_name.clone()))?;
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Reads an image from disk, refusing non-images and files above `max_bytes`.
    pub async fn from_path(path: &Path, max_bytes: u64) -> Result<Self, OcrError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if content_type_for(&file_name).is_none() {
            return Err(OcrError::UnsupportedMedia(file_name));
        }

        let size = tokio::fs::metadata(path).await?.len();
        if size > max_bytes {
            return Err(OcrError::TooLarge {
                file_name,
                size,
                limit: max_bytes,
            });
        }

        let bytes = tokio::fs::read(path).await?;
        Self::new(file_name, bytes)
    }
}

pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_image_content_types() {
        assert_eq!(content_type_for("shot.PNG"), Some("image/png"));
        assert_eq!(content_type_for("a.b.jpeg"), Some("image/jpeg"));
        assert_eq!(content_type_for("notes.txt"), None);
        assert_eq!(content_type_for("README"), None);
    }

    #[tokio::test]
    async fn from_path_enforces_type_and_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = dir.path().join("flyer.png");
        std::fs::write(&image, [0u8; 64]).expect("write image");
        let text = dir.path().join("flyer.txt");
        std::fs::write(&text, b"hello").expect("write text");

        let upload = ImageUpload::from_path(&image, 1024).await.expect("image loads");
        assert_eq!(upload.file_name, "flyer.png");
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.bytes.len(), 64);

        assert!(matches!(
            ImageUpload::from_path(&image, 10).await,
            Err(OcrError::TooLarge { size: 64, .. })
        ));
        assert!(matches!(
            ImageUpload::from_path(&text, 1024).await,
            Err(OcrError::UnsupportedMedia(_))
        ));
    }
}
