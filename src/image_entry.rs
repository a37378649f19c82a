use crate::config::file_suffix;
use crate::error::{ImageListError, Result};
use image::io::Reader as ImageReader;
use image::{DynamicImage, GenericImageView};
use log::trace;
use std::path::{Path, PathBuf};

pub struct ImageEntry {
    path: PathBuf,
    image: Option<DynamicImage>,
}

impl ImageEntry {
    pub fn new(path: PathBuf) -> Self {
        Self { path, image: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    #[cfg(test)]
    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    /// Decodes the pixel data unless it is already present.
    pub fn load(&mut self) -> Result<&DynamicImage> {
        let image = match self.image.take() {
            Some(image) => image,
            None => {
                let image = ImageReader::open(&self.path)
                    .map_err(image::ImageError::IoError)
                    .and_then(|r| r.decode())
                    .map_err(|source| ImageListError::Decode {
                        path: self.path.clone(),
                        source,
                    })?;
                trace!(
                    "Image decoded: {} ({}x{})",
                    self.path.display(),
                    image.width(),
                    image.height()
                );
                image
            }
        };
        Ok(self.image.insert(image))
    }

    pub fn channels(&self) -> Option<u8> {
        self.image.as_ref().map(|i| i.color().channel_count())
    }

    pub fn width(&self) -> Option<u32> {
        self.image.as_ref().map(|i| i.width())
    }

    pub fn height(&self) -> Option<u32> {
        self.image.as_ref().map(|i| i.height())
    }

    /// File name up to the first dot.
    pub fn base_name(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.find('.') {
            Some(idx) => name[..idx].to_string(),
            None => name,
        }
    }

    /// Lowercase extension after the last dot.
    pub fn suffix(&self) -> String {
        file_suffix(&self.path).unwrap_or_default()
    }

    /// Size on disk, zero when the file can no longer be read.
    pub fn file_size(&self) -> u64 {
        std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pastie-entry-{}-{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn names_follow_first_and_last_dot() {
        let entry = ImageEntry::new(PathBuf::from("/data/shot.2015.PNG"));
        assert_eq!(entry.base_name(), "shot");
        assert_eq!(entry.suffix(), "png");

        let hidden = ImageEntry::new(PathBuf::from("/data/.JPG"));
        assert_eq!(hidden.base_name(), "");
        assert_eq!(hidden.suffix(), "jpg");
    }

    #[test]
    fn load_decodes_pixel_data() {
        let dir = scratch_dir("decode");
        let path = dir.join("rgb.png");
        RgbImage::new(12, 7).save(&path).unwrap();

        let mut entry = ImageEntry::new(path);
        assert!(!entry.is_loaded());
        assert_eq!(entry.width(), None);

        entry.load().unwrap();
        assert!(entry.is_loaded());
        assert_eq!(entry.channels(), Some(3));
        assert_eq!(entry.width(), Some(12));
        assert_eq!(entry.height(), Some(7));
    }

    #[test]
    fn load_reports_undecodable_file() {
        let dir = scratch_dir("garbage");
        let path = dir.join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let mut entry = ImageEntry::new(path);
        assert!(matches!(entry.load(), Err(ImageListError::Decode { .. })));
        assert!(!entry.is_loaded());
    }
}
