use agrod_core::UploadedImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Not an image file: {0}")]
    Unsupported(PathBuf),
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Media type for the extensions an image picker would accept.
pub fn media_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

pub fn load_image(path: &Path) -> Result<UploadedImage, UploadError> {
    let media_type = media_type(path).ok_or_else(|| UploadError::Unsupported(path.to_path_buf()))?;
    let bytes = std::fs::read(path).map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    tracing::debug!(file = %file_name, bytes = bytes.len(), media_type, "image read from disk");
    Ok(UploadedImage::from_bytes(file_name, media_type, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_image_as_data_uri() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("Leaf.PNG");
        std::fs::File::create(&path)?.write_all(b"hi")?;

        let image = load_image(&path)?;
        assert_eq!(image.file_name, "Leaf.PNG");
        assert_eq!(image.byte_len, 2);
        assert_eq!(image.data_uri, "data:image/png;base64,aGk=");
        Ok(())
    }

    #[test]
    fn rejects_non_image_extensions() -> Result<(), Box<dyn std::error::Error>> {
        let file = tempfile::Builder::new().suffix(".txt").tempfile()?;
        let error = load_image(file.path()).err();
        assert!(matches!(error, Some(UploadError::Unsupported(_))));
        Ok(())
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load_image(Path::new("/definitely/not/here.jpg")).err();
        let message = error.map(|error| error.to_string()).unwrap_or_default();
        assert!(message.starts_with("Could not read /definitely/not/here.jpg"));
    }

    #[test]
    fn media_types_cover_common_formats() {
        assert_eq!(media_type(Path::new("a.jpeg")), Some("image/jpeg"));
        assert_eq!(media_type(Path::new("a.WebP")), Some("image/webp"));
        assert_eq!(media_type(Path::new("noext")), None);
    }
}
