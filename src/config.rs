use std::path::Path;

pub const DEFAULT_EXTENSIONS: [&str; 3] = ["png", "jpg", "bmp"];
pub const DEFAULT_CACHE_SIZE: usize = 10;

/// Lowercase text after the last dot of the file name, so `.png` counts as a png.
pub fn file_suffix(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let idx = name.rfind('.')?;
    let suffix = &name[idx + 1..];
    (!suffix.is_empty()).then(|| suffix.to_lowercase())
}

#[derive(Debug, Clone)]
pub struct Settings {
    extensions: Vec<String>,
    pub preview_cache_size: usize,
}

impl Settings {
    pub fn new<I, S>(extensions: I, preview_cache_size: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exts: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !exts.contains(&ext) {
                exts.push(ext);
            }
        }
        Self {
            extensions: exts,
            preview_cache_size: preview_cache_size.max(1),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_allowed(&self, path: &Path) -> bool {
        match file_suffix(path) {
            Some(ext) => self.extensions.iter().any(|e| e == &ext),
            None => false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS, DEFAULT_CACHE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_ignores_case() {
        let settings = Settings::default();
        assert!(settings.is_allowed(Path::new("/tmp/a.PNG")));
        assert!(settings.is_allowed(Path::new("b.Jpg")));
        assert!(!settings.is_allowed(Path::new("c.txt")));
        assert!(!settings.is_allowed(Path::new("no_extension")));
    }

    #[test]
    fn dot_files_use_their_suffix() {
        let settings = Settings::default();
        assert!(settings.is_allowed(Path::new("/tmp/.png")));
        assert_eq!(file_suffix(Path::new(".BMP")), Some("bmp".to_string()));
        assert_eq!(file_suffix(Path::new("archive.tar.GZ")), Some("gz".to_string()));
        assert_eq!(file_suffix(Path::new("trailing.")), None);
        assert_eq!(file_suffix(Path::new("plain")), None);
    }

    #[test]
    fn extensions_are_normalized() {
        let settings = Settings::new([".PNG", "png", " tif ", ""], 0);
        assert_eq!(settings.extensions(), &["png".to_string(), "tif".to_string()]);
        assert_eq!(settings.preview_cache_size, 1);
    }
}
