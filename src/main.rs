mod config;
mod dialogs;
mod error;
mod image_entry;
mod image_list;
mod overlay;
mod preview;
mod table;
mod widgets;

use clap::Parser;
use config::Settings;
use dialogs::NativeFilePicker;
use eframe::egui::{self, Context, Key, TextureHandle};
use image_list::{ImageList, ImageListEvent};
use log::{error, info, trace, warn, LevelFilter};
use overlay::AnnotationPainter;
use preview::PreviewCache;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use widgets::{to_color_image, ImageTable, ImageView, TableAction};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct CliArguments {
    path: Vec<PathBuf>,

    /// Accepted image extensions, compared case-insensitively.
    #[clap(long = "ext", default_values = &["png", "jpg", "bmp"])]
    extensions: Vec<String>,

    #[clap(long, default_value = "info")]
    log_level: LevelFilter,

    /// Number of rendered previews kept in memory.
    #[clap(long, default_value_t = config::DEFAULT_CACHE_SIZE)]
    cache_size: usize,
}

fn main() {
    let args = CliArguments::parse();
    if let Err(err) = SimpleLogger::new().with_level(args.log_level).init() {
        eprintln!("Failed to initialize logger: {}", err);
    }

    let settings = Settings::new(&args.extensions, args.cache_size);
    let mut images = ImageList::new(settings);
    let added = images.load(&args.path);
    info!("Loaded {} of {} paths", added, args.path.len());

    let mut options = eframe::NativeOptions::default();
    options.initial_window_size = Some(egui::Vec2::new(1000 as _, 700 as _));
    eframe::run_native(
        "Pastie",
        options,
        Box::new(move |_cc| Box::new(PastieApp::new(images))),
    );
}

struct PastieApp {
    images: ImageList,
    painter: AnnotationPainter,
    picker: NativeFilePicker,
    previews: PreviewCache<TextureHandle>,
    status: String,
}

impl PastieApp {
    fn new(images: ImageList) -> Self {
        let cache_size = images.settings().preview_cache_size;
        Self {
            images,
            painter: AnnotationPainter::new(),
            picker: NativeFilePicker,
            previews: PreviewCache::with_size(cache_size),
            status: String::new(),
        }
    }

    fn process_list_events(&mut self) {
        let events: Vec<ImageListEvent> = self.images.receiver.try_iter().collect();
        for event in events {
            self.previews.handle_event(&self.images, &event);
            match event {
                ImageListEvent::RowsInserted { first, last } => {
                    trace!("Rows inserted: {}..={}", first, last);
                }
                ImageListEvent::RowsRemoved { first, last } => {
                    trace!("Rows removed: {}..={}", first, last);
                }
                ImageListEvent::RowChanged(row) => trace!("Row changed: {}", row),
                ImageListEvent::ModelReset => trace!("Image list reset"),
                ImageListEvent::CurrentChanged { current, .. } => {
                    if let Some(row) = current {
                        if let Err(err) = self.images.ensure_loaded(row) {
                            warn!("{}", err);
                            self.status = err.to_string();
                        }
                    }
                }
            }
        }
    }

    fn current_preview(&mut self, ctx: &Context) -> Option<TextureHandle> {
        let preview = self
            .previews
            .current(&mut self.images, &mut self.painter, |path, canvas| {
                let name = format!("{}_preview", path.display());
                ctx.load_texture(name, to_color_image(&canvas))
            });
        match preview {
            Ok(preview) => preview,
            Err(err) => {
                warn!("Failed to render preview: {}", err);
                self.status = err.to_string();
                None
            }
        }
    }

    fn open_images(&mut self) {
        let added = self.images.load_file_picker(&self.picker);
        self.status = format!("Opened {} images", added);
    }

    fn save_current(&mut self) {
        match self.images.save_file_picker(&self.picker, &mut self.painter) {
            Ok(Some(path)) => {
                info!("Saved {}", path.display());
                self.status = format!("Saved {}", path.display());
            }
            Ok(None) => (),
            Err(err) => {
                error!("{}", err);
                self.status = err.to_string();
            }
        }
    }

    fn handle_keys(&mut self, ctx: &Context) {
        let (next, prev) = {
            let input = ctx.input();
            (
                input.key_pressed(Key::ArrowRight) || input.key_pressed(Key::ArrowDown),
                input.key_pressed(Key::ArrowLeft) || input.key_pressed(Key::ArrowUp),
            )
        };
        if next {
            self.images.next_image();
        }
        if prev {
            self.images.prev_image();
        }
    }

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open…").clicked() {
                self.open_images();
            }
            if ui
                .add_enabled(!self.images.is_empty(), egui::Button::new("Save…"))
                .clicked()
            {
                self.save_current();
            }
            ui.separator();
            if ui.button("◀ Previous").clicked() {
                self.images.prev_image();
            }
            if ui.button("Next ▶").clicked() {
                self.images.next_image();
            }
            ui.separator();
            let has_selection = self.images.selected_rows().next().is_some();
            if ui
                .add_enabled(has_selection, egui::Button::new("Remove selected"))
                .clicked()
            {
                let removed = self.images.remove_selected();
                self.status = format!("Removed {} images", removed);
            }
            if ui.button("Clear").clicked() {
                self.images.clear();
            }
        });
    }
}

impl eframe::App for PastieApp {
    fn on_exit_event(&mut self) -> bool {
        trace!("Closing application");
        true
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.process_list_events();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar_ui(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let selected = self.images.selected().len();
            ui.label(format!(
                "{} images, {} selected. {}",
                self.images.len(),
                selected,
                self.status
            ));
        });

        let mut action = None;
        egui::SidePanel::left("images")
            .resizable(true)
            .default_width(480.0)
            .show(ctx, |ui| {
                action = ImageTable::new(&self.images).ui(ui);
            });
        match action {
            Some(TableAction::SetCurrent(row)) => self.images.select_only(row),
            Some(TableAction::ToggleSelected(row)) => self.images.toggle_selected(row),
            None => (),
        }

        let preview = self.current_preview(ctx);
        let title = match self.images.current_index().and_then(|r| self.images.entry(r)) {
            Some(entry) => format!("Pastie - {}", entry.path().display()),
            None => "Pastie".to_string(),
        };
        frame.set_window_title(&title);

        egui::CentralPanel::default().show(ctx, |ui| {
            ImageView::new(preview.as_ref()).ui(ui);
        });
    }
}
