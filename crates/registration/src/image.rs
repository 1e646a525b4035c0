use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// A representative photo held in memory until submission.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Wraps raw bytes, guessing the content type from the file name.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Reads a photo from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let metadata = fs::metadata(path).map_err(|source| ImageError::Read {
            path: display.clone(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(ImageError::NotAFile(display));
        }

        let bytes = fs::read(path).map_err(|source| ImageError::Read {
            path: display.clone(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(display);

        tracing::debug!("loaded image {file_name} ({} bytes)", bytes.len());
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Bytes are elided; a photo would flood the logs.
impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(ImageFile::from_bytes("a.JPG", vec![]).content_type, "image/jpeg");
        assert_eq!(ImageFile::from_bytes("a.png", vec![]).content_type, "image/png");
        assert_eq!(
            ImageFile::from_bytes("photo", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn debug_elides_bytes() {
        let image = ImageFile::from_bytes("a.png", vec![0; 10]);
        let out = format!("{image:?}");
        assert!(out.contains("size: 10"));
        assert!(!out.contains("bytes"));
    }
}
