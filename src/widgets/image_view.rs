use eframe::egui::*;
use image::RgbaImage;

pub fn to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as _, image.height() as _];
    let pixels = image.as_flat_samples();
    ColorImage::from_rgba_unmultiplied(size, pixels.as_slice())
}

pub struct ImageView<'a> {
    texture: Option<&'a TextureHandle>,
}

impl<'a> ImageView<'a> {
    pub fn new(texture: Option<&'a TextureHandle>) -> Self {
        Self { texture }
    }

    fn calc_scale(image_size: Vec2, in_size: Vec2) -> f32 {
        let w_scale = in_size.x / image_size.x;
        let h_scale = in_size.y / image_size.y;
        w_scale.min(h_scale).min(1.0)
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        match self.texture {
            None => {
                ui.centered_and_justified(|ui| ui.label("No image"));
            }
            Some(texture) => {
                let size = texture.size_vec2();
                let scale = Self::calc_scale(size, ui.available_size_before_wrap());
                ui.with_layout(
                    Layout::centered_and_justified(Direction::LeftToRight),
                    |ui| ui.image(texture, size * scale),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_images_shrink_to_fit() {
        let scale = ImageView::calc_scale(vec2(2000.0, 1000.0), vec2(500.0, 500.0));
        assert_eq!(scale, 0.25);
    }

    #[test]
    fn small_images_are_not_enlarged() {
        let scale = ImageView::calc_scale(vec2(20.0, 10.0), vec2(500.0, 500.0));
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn color_image_keeps_dimensions() {
        let color = to_color_image(&RgbaImage::new(3, 2));
        assert_eq!(color.size, [3, 2]);
        assert_eq!(color.pixels.len(), 6);
    }
}
