use std::path::{Path, PathBuf};

pub const FILTER_NAME: &str = "Image Files";

/// Source of user chosen paths for the open and save actions.
pub trait FilePicker {
    fn pick_images(&self, directory: &Path, extensions: &[String]) -> Vec<PathBuf>;
    fn pick_save_path(&self, suggested: &Path, extensions: &[String]) -> Option<PathBuf>;
}

pub struct NativeFilePicker;

impl FilePicker for NativeFilePicker {
    fn pick_images(&self, directory: &Path, extensions: &[String]) -> Vec<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open Image")
            .set_directory(directory)
            .add_filter(FILTER_NAME, extensions)
            .pick_files()
            .unwrap_or_default()
    }

    fn pick_save_path(&self, suggested: &Path, extensions: &[String]) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save Image")
            .add_filter(FILTER_NAME, extensions);
        if let Some(dir) = suggested.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = suggested.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy().into_owned());
        }
        dialog.save_file()
    }
}
