use crate::image_entry::ImageEntry;
use image::{Rgba, RgbaImage};
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Draws annotation graphics onto a pixel buffer.
///
/// The ratio scales stroke widths so overlays look alike regardless of the
/// image resolution. The image list sets it before every `draw_overlay` call.
pub trait OverlayPainter {
    fn set_ratio(&mut self, ratio: f32);
    fn draw_overlay(&mut self, entry: &ImageEntry, canvas: &mut RgbaImage);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    fn to_rgba(&self) -> Rgba<u8> {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Rgba([c(self.r), c(self.g), c(self.b), c(self.a)])
    }
}

impl Default for Color4 {
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnnotationKind {
    Arrow {
        start: (f32, f32),
        end: (f32, f32),
        color: Color4,
        thickness: f32,
    },
    Rectangle {
        min: (f32, f32),
        max: (f32, f32),
        color: Color4,
        thickness: f32,
    },
    Text {
        pos: (f32, f32),
        content: String,
        font_size: f32,
        color: Color4,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnnotationFile {
    pub annotations: Vec<Annotation>,
}

/// `shot.png` keeps its annotations in `shot.png.annotz`.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    let mut name = image_path.as_os_str().to_os_string();
    name.push(".annotz");
    PathBuf::from(name)
}

pub fn read_annotations(image_path: &Path) -> Vec<Annotation> {
    let path = sidecar_path(image_path);
    if !path.is_file() {
        return Vec::new();
    }
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|data| {
            serde_json::from_str::<AnnotationFile>(&data).map_err(|e| e.to_string())
        });
    match parsed {
        Ok(file) => file.annotations,
        Err(err) => {
            warn!("Ignoring annotations in {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

/// Rasterizes rectangle and arrow annotations read from the entry's sidecar file.
pub struct AnnotationPainter {
    ratio: f32,
}

impl AnnotationPainter {
    pub fn new() -> Self {
        Self { ratio: 1.0 }
    }

    pub fn paint(&self, annotations: &[Annotation], canvas: &mut RgbaImage) {
        for ann in annotations {
            match &ann.kind {
                AnnotationKind::Rectangle {
                    min,
                    max,
                    color,
                    thickness,
                } => {
                    let t = self.stroke(*thickness);
                    let c = color.to_rgba();
                    draw_line(canvas, *min, (max.0, min.1), t, c);
                    draw_line(canvas, (max.0, min.1), *max, t, c);
                    draw_line(canvas, *max, (min.0, max.1), t, c);
                    draw_line(canvas, (min.0, max.1), *min, t, c);
                }
                AnnotationKind::Arrow {
                    start,
                    end,
                    color,
                    thickness,
                } => {
                    let t = self.stroke(*thickness);
                    let c = color.to_rgba();
                    draw_line(canvas, *start, *end, t, c);
                    let dx = end.0 - start.0;
                    let dy = end.1 - start.1;
                    let len = (dx * dx + dy * dy).sqrt();
                    if len > 0.0 {
                        let dir = (dx / len, dy / len);
                        let perp = (-dir.1, dir.0);
                        let head_len = (t * 4.0).max(10.0 * self.ratio);
                        let p1 = (
                            end.0 - dir.0 * head_len + perp.0 * head_len * 0.4,
                            end.1 - dir.1 * head_len + perp.1 * head_len * 0.4,
                        );
                        let p2 = (
                            end.0 - dir.0 * head_len - perp.0 * head_len * 0.4,
                            end.1 - dir.1 * head_len - perp.1 * head_len * 0.4,
                        );
                        draw_line(canvas, *end, p1, t, c);
                        draw_line(canvas, *end, p2, t, c);
                        draw_line(canvas, p1, p2, t, c);
                    }
                }
                // No font rasterizer here; text only shows up in annotation editors.
                AnnotationKind::Text { .. } => (),
            }
        }
    }

    fn stroke(&self, thickness: f32) -> f32 {
        (thickness * self.ratio).max(1.0)
    }
}

impl Default for AnnotationPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayPainter for AnnotationPainter {
    fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
    }

    fn draw_overlay(&mut self, entry: &ImageEntry, canvas: &mut RgbaImage) {
        let annotations = read_annotations(entry.path());
        trace!(
            "Drawing {} annotations on {} (ratio {:.3})",
            annotations.len(),
            entry.path().display(),
            self.ratio
        );
        self.paint(&annotations, canvas);
    }
}

/// Clips a segment against an axis aligned box (Liang-Barsky).
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let mut t0 = 0.0;
    let mut t1 = 1.0;
    let edges = [
        (-dx, from.0 - min.0),
        (dx, max.0 - from.0),
        (-dy, from.1 - min.1),
        (dy, max.1 - from.1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = r.max(t0);
        } else {
            if r < t0 {
                return None;
            }
            t1 = r.min(t1);
        }
    }
    Some((
        (from.0 + dx * t0, from.1 + dy * t0),
        (from.0 + dx * t1, from.1 + dy * t1),
    ))
}

fn draw_line(img: &mut RgbaImage, from: (f32, f32), to: (f32, f32), thickness: f32, color: Rgba<u8>) {
    let coords = [from.0, from.1, to.0, to.1, thickness];
    if coords.iter().any(|v| !v.is_finite()) {
        return;
    }
    let (w, h) = (img.width() as i64, img.height() as i64);
    let half_t = ((thickness / 2.0).max(0.5) as i64).min(w.max(h));
    let pad = half_t as f64 + 1.0;
    let clipped = clip_segment(
        (from.0 as f64, from.1 as f64),
        (to.0 as f64, to.1 as f64),
        (-pad, -pad),
        (w as f64 + pad, h as f64 + pad),
    );
    let (from, to) = match clipped {
        Some(segment) => segment,
        None => return,
    };

    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let len = (dx * dx + dy * dy).sqrt();
    let diagonal = ((w * w + h * h) as f64).sqrt() + 2.0 * pad;
    let steps = (len.min(diagonal) * 2.0) as i64;

    for i in 0..=steps {
        let t = i as f64 / steps.max(1) as f64;
        let cx = (from.0 + dx * t) as i64;
        let cy = (from.1 + dy * t) as i64;
        for oy in -half_t..=half_t {
            for ox in -half_t..=half_t {
                let px = cx + ox;
                let py = cy + oy;
                if px >= 0 && px < w && py >= 0 && py < h {
                    img.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}
