use crate::config::Settings;
use crate::dialogs::FilePicker;
use crate::error::{ImageListError, Result};
use crate::image_entry::ImageEntry;
use crate::overlay::OverlayPainter;
use crate::table::{format_size, Cell, Column, TableModel};
use crossbeam::channel::{unbounded, Receiver, Sender};
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{error, trace};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Pixels of overlay stroke per image pixel, applied to the image width.
const OVERLAY_RATIO_PER_PIXEL: f64 = 1e-3;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ImageListEvent {
    RowsInserted { first: usize, last: usize },
    RowsRemoved { first: usize, last: usize },
    RowChanged(usize),
    ModelReset,
    CurrentChanged {
        previous: Option<usize>,
        current: Option<usize>,
    },
}

/// Ordered collection of images with a current row and a multi-row selection.
///
/// Every mutation is reported on `receiver`; the owner drains it once per frame.
pub struct ImageList {
    settings: Settings,
    entries: Vec<ImageEntry>,
    current: Option<usize>,
    selection: BTreeSet<usize>,
    sender: Sender<ImageListEvent>,
    pub receiver: Receiver<ImageListEvent>,
}

impl ImageList {
    pub fn new(settings: Settings) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            settings,
            entries: Vec::new(),
            current: None,
            selection: BTreeSet::new(),
            sender,
            receiver,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, row: usize) -> Option<&ImageEntry> {
        self.entries.get(row)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &ImageEntry> {
        self.entries.iter()
    }

    fn emit(&self, event: ImageListEvent) {
        if let Err(err) = self.sender.send(event) {
            error!("Can't deliver image list event: {}", err);
        }
    }

    /// Appends every existing regular file with an allowed extension.
    /// Anything else is skipped without an error. Returns the number of rows added.
    pub fn load<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut added = 0;
        for path in paths {
            let path = path.as_ref();
            if path.is_file() && self.settings.is_allowed(path) {
                self.add(ImageEntry::new(path.to_path_buf()));
                added += 1;
            } else {
                trace!("Skipping {}", path.display());
            }
        }
        added
    }

    fn add(&mut self, entry: ImageEntry) {
        let row = self.entries.len();
        trace!("Image added: {}", entry.path().display());
        self.entries.push(entry);
        self.emit(ImageListEvent::RowsInserted {
            first: row,
            last: row,
        });
    }

    pub fn remove(&mut self, row: usize) -> bool {
        if row >= self.entries.len() {
            return false;
        }
        let entry = self.entries.remove(row);
        trace!("Image removed: {}", entry.path().display());

        self.selection = self
            .selection
            .iter()
            .filter(|&&r| r != row)
            .map(|&r| if r > row { r - 1 } else { r })
            .collect();
        self.emit(ImageListEvent::RowsRemoved {
            first: row,
            last: row,
        });

        match self.current {
            Some(cur) if cur > row => self.current = Some(cur - 1),
            Some(cur) if cur == row => {
                self.current = if self.entries.is_empty() {
                    None
                } else {
                    Some(row.min(self.entries.len() - 1))
                };
                self.emit(ImageListEvent::CurrentChanged {
                    previous: Some(cur),
                    current: self.current,
                });
            }
            _ => (),
        }
        true
    }

    /// Removes every selected row. Returns the number of rows removed.
    pub fn remove_selected(&mut self) -> usize {
        let rows: Vec<usize> = self.selection.iter().rev().copied().collect();
        rows.into_iter().filter(|&row| self.remove(row)).count()
    }

    pub fn clear(&mut self) {
        trace!("Clearing {} images", self.entries.len());
        self.entries.clear();
        self.current = None;
        self.selection.clear();
        self.emit(ImageListEvent::ModelReset);
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Current row, falling back to the first row when nothing is current yet.
    pub fn current_row(&mut self) -> Option<usize> {
        if self.current.is_none() && !self.entries.is_empty() {
            self.set_current(0);
        }
        self.current
    }

    pub fn current(&mut self) -> Option<&ImageEntry> {
        let row = self.current_row()?;
        self.entries.get(row)
    }

    pub fn set_current(&mut self, row: usize) -> bool {
        if row >= self.entries.len() || self.current == Some(row) {
            return false;
        }
        let previous = self.current.replace(row);
        self.emit(ImageListEvent::CurrentChanged {
            previous,
            current: Some(row),
        });
        true
    }

    /// Moves forward in display order. Starts at the first row when nothing is current.
    pub fn next_image(&mut self) -> bool {
        let row = self.current.map(|row| row + 1).unwrap_or(0);
        self.set_current(row)
    }

    pub fn prev_image(&mut self) -> bool {
        match self.current {
            Some(row) if row > 0 => self.set_current(row - 1),
            _ => false,
        }
    }

    pub fn select(&mut self, row: usize) {
        if row < self.entries.len() {
            self.selection.insert(row);
        }
    }

    /// Plain click: the row becomes both the only selected row and the current one.
    pub fn select_only(&mut self, row: usize) {
        if row >= self.entries.len() {
            return;
        }
        self.clear_selection();
        self.select(row);
        self.set_current(row);
    }

    pub fn toggle_selected(&mut self, row: usize) {
        if !self.selection.remove(&row) {
            self.select(row);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.selection.contains(&row)
    }

    pub fn selected_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.selection.iter().copied()
    }

    /// Selected entries in display order.
    pub fn selected(&self) -> Vec<&ImageEntry> {
        self.selection
            .iter()
            .filter_map(|&row| self.entries.get(row))
            .collect()
    }

    /// Decodes a row's pixel data if needed. Rows out of range are ignored.
    pub fn ensure_loaded(&mut self, row: usize) -> Result<()> {
        let entry = match self.entries.get_mut(row) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        if !entry.is_loaded() {
            entry.load()?;
            self.emit(ImageListEvent::RowChanged(row));
        }
        Ok(())
    }

    /// Copy of the current image with the overlay drawn on it.
    pub fn render_current(&mut self, painter: &mut dyn OverlayPainter) -> Result<RgbaImage> {
        let row = self.current_row().ok_or(ImageListError::NoCurrentImage)?;
        self.ensure_loaded(row)?;
        let entry = &mut self.entries[row];
        let mut canvas = entry.load()?.to_rgba8();

        painter.set_ratio((OVERLAY_RATIO_PER_PIXEL * canvas.width() as f64) as f32);
        painter.draw_overlay(entry, &mut canvas);
        Ok(canvas)
    }

    /// Writes the current image with its overlay. The format follows the extension of `path`.
    pub fn save(&mut self, path: &Path, painter: &mut dyn OverlayPainter) -> Result<()> {
        let canvas = self.render_current(painter)?;
        let format = ImageFormat::from_path(path)
            .map_err(|e| ImageListError::from_save(path.to_path_buf(), e))?;
        let image = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()),
            _ => DynamicImage::ImageRgba8(canvas),
        };
        image
            .save_with_format(path, format)
            .map_err(|e| ImageListError::from_save(path.to_path_buf(), e))?;
        trace!("Image saved: {}", path.display());
        Ok(())
    }

    pub fn load_file_picker(&mut self, picker: &dyn FilePicker) -> usize {
        let dir = std::env::current_dir().unwrap_or_default();
        let files = picker.pick_images(&dir, self.settings.extensions());
        self.load(files)
    }

    /// Asks for a target path starting at the current image. `None` when the dialog was cancelled.
    pub fn save_file_picker(
        &mut self,
        picker: &dyn FilePicker,
        painter: &mut dyn OverlayPainter,
    ) -> Result<Option<PathBuf>> {
        let suggested = self
            .current()
            .ok_or(ImageListError::NoCurrentImage)?
            .path()
            .to_path_buf();
        match picker.pick_save_path(&suggested, self.settings.extensions()) {
            Some(path) => {
                self.save(&path, painter)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}

impl TableModel for ImageList {
    fn row_count(&self) -> usize {
        self.entries.len()
    }

    fn data(&self, row: usize, col: usize) -> Option<Cell> {
        let entry = self.entries.get(row)?;
        match Column::from_index(col)? {
            Column::Name => Some(Cell::Text(entry.base_name())),
            Column::Type => Some(Cell::Text(entry.suffix())),
            Column::Size => Some(Cell::Text(format_size(entry.file_size()))),
            Column::Channels => entry.channels().map(|c| Cell::Number(c as u32)),
            Column::Width => entry.width().map(Cell::Number),
            Column::Height => entry.height().map(Cell::Number),
        }
    }
}
