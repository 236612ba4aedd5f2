use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_ellipse_mut, draw_line_segment_mut, draw_polygon_mut,
    Blend,
};
use imageproc::point::Point;

use crate::face_detector::FaceRegion;
use crate::region;
use crate::AnimalOverlay;

/// Outer bunny ear fill (light pink).
const LIGHT_PINK: [u8; 3] = [0xFF, 0xB6, 0xC1];

/// Inner bunny ear / cat nose fill (hot pink).
const HOT_PINK: [u8; 3] = [0xFF, 0x69, 0xB4];

/// Whisker stroke and dog nose fill.
const CHARCOAL: [u8; 3] = [0x33, 0x33, 0x33];

/// Dog nostril fill.
const BLACK: [u8; 3] = [0x00, 0x00, 0x00];

/// Outer bear ear fill (saddle brown).
const SADDLE_BROWN: [u8; 3] = [0x8B, 0x45, 0x13];

/// Inner bear ear fill (chocolate).
const CHOCOLATE: [u8; 3] = [0xD2, 0x69, 0x1E];

/// Draw one animal recipe over every detected face.
///
/// Shapes composite source-over, one at a time, each at
/// `alpha = intensity/100` — so inner shapes blend over already-blended
/// outer ones. Zero faces means zero shapes; geometry that falls off
/// the frame clips per pixel.
pub(crate) fn apply(
    buffer: &mut RgbaImage,
    overlay: AnimalOverlay,
    faces: &[FaceRegion],
    intensity: f32,
) {
    let alpha = intensity / 100.0;
    if faces.is_empty() || alpha <= 0.0 {
        return;
    }

    let mut canvas = Blend(std::mem::replace(buffer, RgbaImage::new(0, 0)));
    for face in faces {
        match overlay {
            AnimalOverlay::BunnyEars => draw_bunny_ears(&mut canvas, face, alpha),
            AnimalOverlay::CatFeatures => draw_cat_features(&mut canvas, face, alpha),
            AnimalOverlay::DogNose => draw_dog_nose(&mut canvas, face, alpha),
            AnimalOverlay::BearFace => draw_bear_face(&mut canvas, face, alpha),
        }
    }
    *buffer = canvas.0;
}

fn tint(rgb: [u8; 3], alpha: f32) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], (alpha * 255.0).round() as u8])
}

/// Two upright ellipses above the face, with smaller inner ellipses.
fn draw_bunny_ears(canvas: &mut Blend<RgbaImage>, face: &FaceRegion, alpha: f32) {
    let ear_rx = face.width as f32 * 0.15;
    let ear_ry = face.height as f32 * 0.4;
    // Ears sit 70% of their height above the face top
    let ear_y = (face.y as f32 - ear_ry * 0.7).round() as i32;
    let left_x = region::anchor(face, 0.25, 0.0).0.round() as i32;
    let right_x = region::anchor(face, 0.75, 0.0).0.round() as i32;

    let outer = tint(LIGHT_PINK, alpha);
    for ear_x in [left_x, right_x] {
        draw_filled_ellipse_mut(
            canvas,
            (ear_x, ear_y),
            ear_rx.round() as i32,
            ear_ry.round() as i32,
            outer,
        );
    }

    let inner = tint(HOT_PINK, alpha);
    for ear_x in [left_x, right_x] {
        draw_filled_ellipse_mut(
            canvas,
            (ear_x, ear_y),
            (ear_rx * 0.6).round() as i32,
            (ear_ry * 0.7).round() as i32,
            inner,
        );
    }
}

/// Three whiskers per side plus a triangular nose.
fn draw_cat_features(canvas: &mut Blend<RgbaImage>, face: &FaceRegion, alpha: f32) {
    let whisker = tint(CHARCOAL, alpha);
    let whisker_y = region::anchor(face, 0.0, 0.5).1;
    let length = face.width as f32 * 0.3;
    let left = face.x as f32;
    let right = face.x as f32 + face.width as f32;

    for i in 0..3 {
        let y = whisker_y + (i as f32 - 1.0) * 10.0;
        // Two adjacent rows stand in for a 2 px stroke
        for dy in [0.0, 1.0] {
            draw_line_segment_mut(canvas, (left - length, y + dy), (left, y + dy), whisker);
            draw_line_segment_mut(canvas, (right, y + dy), (right + length, y + dy), whisker);
        }
    }

    let (nose_x, nose_y) = region::anchor(face, 0.5, 0.45);
    let (nose_x, nose_y) = (nose_x.round() as i32, nose_y.round() as i32);
    draw_polygon_mut(
        canvas,
        &[
            Point::new(nose_x, nose_y),
            Point::new(nose_x - 8, nose_y + 10),
            Point::new(nose_x + 8, nose_y + 10),
        ],
        tint(HOT_PINK, alpha),
    );
}

/// A wide snout ellipse with two nostrils.
fn draw_dog_nose(canvas: &mut Blend<RgbaImage>, face: &FaceRegion, alpha: f32) {
    let (nose_x, nose_y) = region::anchor(face, 0.5, 0.5);
    let nose_size = face.width as f32 * 0.08;

    draw_filled_ellipse_mut(
        canvas,
        (nose_x.round() as i32, nose_y.round() as i32),
        nose_size.round() as i32,
        (nose_size * 0.7).round() as i32,
        tint(CHARCOAL, alpha),
    );

    let nostril = tint(BLACK, alpha);
    for side in [-1.0f32, 1.0] {
        let nostril_x = nose_x + side * nose_size * 0.3;
        draw_filled_ellipse_mut(
            canvas,
            (nostril_x.round() as i32, nose_y.round() as i32),
            (nose_size * 0.2).round() as i32,
            (nose_size * 0.1).round() as i32,
            nostril,
        );
    }
}

/// Round ears at the top corners of the face, with inner circles.
fn draw_bear_face(canvas: &mut Blend<RgbaImage>, face: &FaceRegion, alpha: f32) {
    let ear_radius = face.width as f32 * 0.12;
    let (left_x, ear_y) = region::anchor(face, 0.2, 0.1);
    let right_x = region::anchor(face, 0.8, 0.1).0;
    let ear_y = ear_y.round() as i32;

    let outer = tint(SADDLE_BROWN, alpha);
    for ear_x in [left_x, right_x] {
        draw_filled_circle_mut(
            canvas,
            (ear_x.round() as i32, ear_y),
            ear_radius.round() as i32,
            outer,
        );
    }

    let inner = tint(CHOCOLATE, alpha);
    for ear_x in [left_x, right_x] {
        draw_filled_circle_mut(
            canvas,
            (ear_x.round() as i32, ear_y),
            (ear_radius * 0.6).round() as i32,
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([60, 60, 60, 255]))
    }

    fn face(x: i32, y: i32, width: u32, height: u32) -> FaceRegion {
        FaceRegion {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn zero_faces_draws_nothing() {
        for overlay in [
            AnimalOverlay::BunnyEars,
            AnimalOverlay::CatFeatures,
            AnimalOverlay::DogNose,
            AnimalOverlay::BearFace,
        ] {
            let mut buffer = solid(64, 64);
            let original = buffer.clone();
            apply(&mut buffer, overlay, &[], 100.0);
            assert_eq!(buffer, original, "{overlay:?} drew with zero faces");
        }
    }

    #[test]
    fn zero_intensity_draws_nothing() {
        let mut buffer = solid(64, 64);
        let original = buffer.clone();
        apply(&mut buffer, AnimalOverlay::DogNose, &[face(10, 10, 40, 40)], 0.0);
        assert_eq!(buffer, original);
    }

    #[test]
    fn bunny_ears_paint_pink_above_the_face() {
        let mut buffer = solid(200, 240);
        apply(
            &mut buffer,
            AnimalOverlay::BunnyEars,
            &[face(60, 100, 80, 80)],
            100.0,
        );

        // Left ear center: (60 + 20, 100 - 32·0.7) ≈ (80, 78); the inner
        // ellipse covers the center, so it reads hot pink at full alpha
        assert_eq!(buffer.get_pixel(80, 78).0, [0xFF, 0x69, 0xB4, 255]);
        // Just inside the outer ellipse's horizontal extent (rx = 12)
        assert_eq!(buffer.get_pixel(90, 78).0, [0xFF, 0xB6, 0xC1, 255]);
        // Right ear mirrors at x = 60 + 60 = 120
        assert_eq!(buffer.get_pixel(120, 78).0, [0xFF, 0x69, 0xB4, 255]);
        // Far corner untouched
        assert_eq!(buffer.get_pixel(5, 230).0, [60, 60, 60, 255]);
    }

    #[test]
    fn partial_alpha_blends_instead_of_replacing() {
        let mut buffer = solid(200, 240);
        apply(
            &mut buffer,
            AnimalOverlay::BunnyEars,
            &[face(60, 100, 80, 80)],
            50.0,
        );
        let pixel = buffer.get_pixel(90, 78).0;
        // Halfway between the background and light pink, give or take rounding
        assert!(pixel[0] > 140 && pixel[0] < 175, "r = {}", pixel[0]);
        assert!(pixel[3] == 255);
    }

    #[test]
    fn cat_whiskers_extend_past_the_face_sides() {
        let mut buffer = solid(200, 200);
        apply(
            &mut buffer,
            AnimalOverlay::CatFeatures,
            &[face(60, 60, 80, 80)],
            100.0,
        );

        // Middle whisker row: y = 60 + 40 = 100, reaching 24 px out from x=60
        assert_eq!(buffer.get_pixel(50, 100).0, [0x33, 0x33, 0x33, 255]);
        // And out from the right edge x=140
        assert_eq!(buffer.get_pixel(150, 100).0, [0x33, 0x33, 0x33, 255]);
        // Upper and lower whisker rows sit 10 px away
        assert_eq!(buffer.get_pixel(50, 90).0, [0x33, 0x33, 0x33, 255]);
        assert_eq!(buffer.get_pixel(50, 110).0, [0x33, 0x33, 0x33, 255]);
        // Between whisker rows: untouched
        assert_eq!(buffer.get_pixel(50, 95).0, [60, 60, 60, 255]);
        // Nose triangle at (100, 96): a pixel just below the apex is filled
        assert_eq!(buffer.get_pixel(100, 100).0, [0xFF, 0x69, 0xB4, 255]);
    }

    #[test]
    fn dog_nose_centers_on_the_face() {
        let mut buffer = solid(200, 200);
        apply(
            &mut buffer,
            AnimalOverlay::DogNose,
            &[face(50, 50, 100, 100)],
            100.0,
        );

        // Nose center (100, 100), rx = 8: nostrils at ±2.4 px overlay it
        // in black; the snout ellipse shows at the horizontal edges
        assert_eq!(buffer.get_pixel(102, 100).0, [0x00, 0x00, 0x00, 255]);
        assert_eq!(buffer.get_pixel(107, 100).0, [0x33, 0x33, 0x33, 255]);
        assert_eq!(buffer.get_pixel(93, 100).0, [0x33, 0x33, 0x33, 255]);
        // Above the snout: untouched
        assert_eq!(buffer.get_pixel(100, 90).0, [60, 60, 60, 255]);
    }

    #[test]
    fn bear_ears_sit_at_the_top_corners() {
        let mut buffer = solid(200, 200);
        apply(
            &mut buffer,
            AnimalOverlay::BearFace,
            &[face(50, 50, 100, 100)],
            100.0,
        );

        // Left ear center (70, 60), radius 12, inner radius 7
        assert_eq!(buffer.get_pixel(70, 60).0, [0xD2, 0x69, 0x1E, 255]);
        assert_eq!(buffer.get_pixel(80, 60).0, [0x8B, 0x45, 0x13, 255]);
        // Right ear center (130, 60)
        assert_eq!(buffer.get_pixel(130, 60).0, [0xD2, 0x69, 0x1E, 255]);
        // Face center: untouched
        assert_eq!(buffer.get_pixel(100, 100).0, [60, 60, 60, 255]);
    }

    #[test]
    fn overlays_draw_once_per_face() {
        let mut buffer = solid(300, 200);
        let faces = [face(20, 60, 80, 80), face(180, 60, 80, 80)];
        apply(&mut buffer, AnimalOverlay::BearFace, &faces, 100.0);

        // Left ear of each face: (20+16, 60+8) and (180+16, 60+8)
        assert_eq!(buffer.get_pixel(36, 68).0, [0xD2, 0x69, 0x1E, 255]);
        assert_eq!(buffer.get_pixel(196, 68).0, [0xD2, 0x69, 0x1E, 255]);
    }

    #[test]
    fn face_at_the_frame_edge_clips_instead_of_panicking() {
        let mut buffer = solid(64, 64);
        // Ears land above y = 0 and left of x = 0
        apply(
            &mut buffer,
            AnimalOverlay::BunnyEars,
            &[face(-20, 5, 60, 60)],
            100.0,
        );
        apply(
            &mut buffer,
            AnimalOverlay::CatFeatures,
            &[face(-20, 5, 60, 60)],
            100.0,
        );
    }
}
