//! Render every filter over a synthetic portrait and write the results
//! as PNGs, for eyeballing the recipes without a real photo.
//!
//! Usage:
//!   cargo run --example preview_filters
//!
//! Output lands in `target/filter-previews/`.

use facefilter::{DetectionError, FaceDetector, FaceRegion, FilterKind, FilterProcessor};
use image::{Rgba, RgbaImage};

/// A detector that "finds" the face we painted into the synthetic portrait.
struct PaintedFace(FaceRegion);

impl FaceDetector for PaintedFace {
    fn detect(&self, _: &[u8], _: u32, _: u32) -> Result<Vec<FaceRegion>, DetectionError> {
        Ok(vec![self.0])
    }
}

fn synthetic_portrait(width: u32, height: u32, face: &FaceRegion) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([70, 90, 120, 255]));

    // A skin-toned rectangle standing in for the face
    for y in face.y..face.y + face.height as i32 {
        for x in face.x..face.x + face.width as i32 {
            img.put_pixel(x as u32, y as u32, Rgba([224, 172, 105, 255]));
        }
    }

    // Darker bands where eyes and mouth would sit, so the tone filters
    // have something visible to brighten
    let eye_y = face.y + (face.height as f32 * 0.35) as i32;
    let mouth_y = face.y + (face.height as f32 * 0.7) as i32;
    for y in [eye_y, mouth_y] {
        for x in face.x + 10..face.x + face.width as i32 - 10 {
            img.put_pixel(x as u32, y as u32, Rgba([120, 80, 60, 255]));
        }
    }

    img
}

fn main() {
    let face = FaceRegion {
        x: 120,
        y: 100,
        width: 160,
        height: 200,
    };
    let portrait = synthetic_portrait(400, 400, &face);

    let mut png = Vec::new();
    use image::ImageEncoder;
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(
            portrait.as_raw(),
            portrait.width(),
            portrait.height(),
            image::ExtendedColorType::Rgba8,
        )
        .expect("failed to encode the synthetic portrait");

    let out_dir = std::path::Path::new("target/filter-previews");
    std::fs::create_dir_all(out_dir).expect("failed to create output directory");
    std::fs::write(out_dir.join("original.png"), &png).expect("failed to write original");

    for filter in FilterKind::ALL {
        let frame = FilterProcessor::new(png.clone())
            .expect("synthetic portrait should validate")
            .filter(filter)
            .intensity(80.0)
            .face_detector(Box::new(PaintedFace(face)))
            .process()
            .expect("processing the synthetic portrait failed");

        let path = out_dir.join(format!("{filter}.png"));
        std::fs::write(&path, &frame.data).expect("failed to write preview");
        println!(
            "{:<16} ({:?}) → {}",
            filter.to_string(),
            filter.category(),
            path.display()
        );
    }
}
