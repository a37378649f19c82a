mod image_table;
mod image_view;

pub use image_table::{ImageTable, TableAction};
pub use image_view::{to_color_image, ImageView};
