use crate::error::Result;
use crate::image_list::{ImageList, ImageListEvent};
use crate::overlay::OverlayPainter;
use cached::{Cached, SizedCache};
use image::RgbaImage;
use log::trace;
use std::path::{Path, PathBuf};

/// Rendered previews keyed by image path. A failed render is cached as `None`
/// so it is not retried every frame.
pub struct PreviewCache<T> {
    cache: SizedCache<PathBuf, Option<T>>,
}

impl<T: Clone> PreviewCache<T> {
    pub fn with_size(size: usize) -> Self {
        Self {
            cache: SizedCache::with_size(size),
        }
    }

    pub fn handle_event(&mut self, images: &ImageList, event: &ImageListEvent) {
        match event {
            // Rendering always decodes first, so only a cached failure can be stale here.
            ImageListEvent::RowChanged(row) => {
                if let Some(entry) = images.entry(*row) {
                    let path = entry.path().to_path_buf();
                    let failed = matches!(self.cache.cache_get(&path), Some(None));
                    if failed {
                        trace!("Retrying preview of {}", path.display());
                        self.cache.cache_remove(&path);
                    }
                }
            }
            ImageListEvent::ModelReset => self.cache.cache_clear(),
            _ => (),
        }
    }

    /// Preview of the current image, rendered through `make` on a cache miss.
    /// `Ok(None)` when the list is empty or the last render of this image failed.
    pub fn current<F>(
        &mut self,
        images: &mut ImageList,
        painter: &mut dyn OverlayPainter,
        make: F,
    ) -> Result<Option<T>>
    where
        F: FnOnce(&Path, RgbaImage) -> T,
    {
        let path = match images.current() {
            Some(entry) => entry.path().to_path_buf(),
            None => return Ok(None),
        };
        if let Some(preview) = self.cache.cache_get(&path) {
            return Ok(preview.clone());
        }
        match images.render_current(painter) {
            Ok(canvas) => {
                let preview = make(&path, canvas);
                self.cache.cache_set(path, Some(preview.clone()));
                Ok(Some(preview))
            }
            Err(err) => {
                self.cache.cache_set(path, None);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::ImageListError;
    use crate::overlay::AnnotationPainter;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pastie-preview-{}-{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn feed(cache: &mut PreviewCache<(u32, u32)>, images: &ImageList) {
        let events: Vec<_> = images.receiver.try_iter().collect();
        for event in events.iter() {
            cache.handle_event(images, event);
        }
    }

    #[test]
    fn first_preview_is_rendered_once() {
        let dir = scratch_dir("once");
        let path = dir.join("a.png");
        RgbaImage::new(5, 4).save(&path).unwrap();
        let mut images = ImageList::new(Settings::default());
        images.load([&path]);
        let mut cache = PreviewCache::with_size(4);
        let mut painter = AnnotationPainter::new();
        let mut renders = 0;

        for _ in 0..3 {
            let preview = cache
                .current(&mut images, &mut painter, |_, canvas| {
                    renders += 1;
                    canvas.dimensions()
                })
                .unwrap();
            assert_eq!(preview, Some((5, 4)));
            feed(&mut cache, &images);
        }
        assert_eq!(renders, 1);
    }

    #[test]
    fn failed_preview_is_retried_after_decode() {
        let dir = scratch_dir("retry");
        let path = dir.join("late.png");
        std::fs::write(&path, b"not yet an image").unwrap();
        let mut images = ImageList::new(Settings::default());
        images.load([&path]);
        let mut cache = PreviewCache::with_size(4);
        let mut painter = AnnotationPainter::new();

        let res = cache.current(&mut images, &mut painter, |_, c| c.dimensions());
        assert!(matches!(res, Err(ImageListError::Decode { .. })));
        feed(&mut cache, &images);
        let res = cache.current(&mut images, &mut painter, |_, c| c.dimensions());
        assert_eq!(res.unwrap(), None);

        RgbaImage::new(3, 2).save(&path).unwrap();
        images.ensure_loaded(0).unwrap();
        feed(&mut cache, &images);
        let res = cache.current(&mut images, &mut painter, |_, c| c.dimensions());
        assert_eq!(res.unwrap(), Some((3, 2)));
    }

    #[test]
    fn reset_drops_previews() {
        let dir = scratch_dir("reset");
        let path = dir.join("a.png");
        RgbaImage::new(2, 2).save(&path).unwrap();
        let mut images = ImageList::new(Settings::default());
        images.load([&path]);
        let mut cache = PreviewCache::with_size(4);
        let mut painter = AnnotationPainter::new();
        let mut renders = 0;

        let mut render = |cache: &mut PreviewCache<(u32, u32)>, images: &mut ImageList| {
            cache
                .current(images, &mut painter, |_, c| {
                    renders += 1;
                    c.dimensions()
                })
                .unwrap()
        };
        render(&mut cache, &mut images);
        images.clear();
        feed(&mut cache, &images);
        assert_eq!(render(&mut cache, &mut images), None);
        images.load([&path]);
        render(&mut cache, &mut images);
        assert_eq!(renders, 2);
    }
}
