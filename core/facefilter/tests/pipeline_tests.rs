use facefilter::storage::{ImageStore, MemStore, NewProcessedImage};
use facefilter::{
    AnimalOverlay, BeautifyFilter, DetectionError, FaceDetector, FaceRegion, FilterKind,
    FilterProcessor, OutputFormat,
};
use image::RgbaImage;

/// Detector stub returning a fixed region set, standing in for a real
/// backend in end-to-end runs.
struct FixedDetector(Vec<FaceRegion>);

impl FaceDetector for FixedDetector {
    fn detect(&self, _: &[u8], _: u32, _: u32) -> Result<Vec<FaceRegion>, DetectionError> {
        Ok(self.0.clone())
    }
}

struct FailingDetector;

impl FaceDetector for FailingDetector {
    fn detect(&self, _: &[u8], _: u32, _: u32) -> Result<Vec<FaceRegion>, DetectionError> {
        Err(DetectionError("backend unavailable".into()))
    }
}

fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            255,
        ])
    })
}

fn encode_png(img: &RgbaImage) -> Vec<u8> {
    use image::codecs::png::PngEncoder;
    use image::ImageEncoder;

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
    buffer
}

fn decode_rgba(data: &[u8]) -> RgbaImage {
    image::load_from_memory(data).unwrap().to_rgba8()
}

fn one_face() -> FaceRegion {
    FaceRegion {
        x: 20,
        y: 20,
        width: 50,
        height: 50,
    }
}

#[test]
fn unfiltered_png_round_trip_is_lossless() {
    let img = gradient_rgba(100, 80);
    let frame = FilterProcessor::new(encode_png(&img))
        .unwrap()
        .process()
        .unwrap();

    assert_eq!(frame.width, 100);
    assert_eq!(frame.height, 80);
    assert_eq!(decode_rgba(&frame.data), img);
}

#[test]
fn every_filter_at_zero_intensity_is_an_identity() {
    let img = gradient_rgba(100, 100);
    let png = encode_png(&img);

    for filter in FilterKind::ALL {
        let frame = FilterProcessor::new(png.clone())
            .unwrap()
            .filter(filter)
            .intensity(0.0)
            .face_detector(Box::new(FixedDetector(vec![one_face()])))
            .process()
            .unwrap();
        assert_eq!(
            decode_rgba(&frame.data),
            img,
            "{filter} changed pixels at zero intensity"
        );
    }
}

#[test]
fn smooth_skin_end_to_end_moves_channels_toward_mid_gray() {
    let img = RgbaImage::from_pixel(50, 50, image::Rgba([28, 228, 128, 255]));
    let frame = FilterProcessor::new(encode_png(&img))
        .unwrap()
        .filter(FilterKind::Beautify(BeautifyFilter::SmoothSkin))
        .intensity(100.0)
        .process()
        .unwrap();

    let output = decode_rgba(&frame.data);
    // 10% of the way toward 128: 28 → 38, 228 → 218, 128 stays put
    assert_eq!(output.get_pixel(25, 25).0, [38, 218, 128, 255]);
}

#[test]
fn eye_enhancement_end_to_end_brightens_only_the_band() {
    let img = RgbaImage::from_pixel(100, 100, image::Rgba([100, 100, 100, 255]));
    let face = FaceRegion {
        x: 10,
        y: 10,
        width: 50,
        height: 50,
    };
    let frame = FilterProcessor::new(encode_png(&img))
        .unwrap()
        .filter(FilterKind::Beautify(BeautifyFilter::EnhanceEyes))
        .intensity(100.0)
        .face_detector(Box::new(FixedDetector(vec![face])))
        .process()
        .unwrap();

    let output = decode_rgba(&frame.data);
    assert_eq!(output.get_pixel(30, 30).0, [120, 120, 120, 255]);
    assert_eq!(output.get_pixel(30, 40).0, [100, 100, 100, 255]);
    assert_eq!(output.get_pixel(5, 30).0, [100, 100, 100, 255]);
}

#[test]
fn face_slim_changes_only_the_face_box() {
    let mut img = gradient_rgba(100, 100);
    // A hard vertical edge inside the face box makes the warp visible
    for y in 20..70 {
        for x in 55..60 {
            img.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
        }
    }
    let frame = FilterProcessor::new(encode_png(&img))
        .unwrap()
        .filter(FilterKind::Beautify(BeautifyFilter::FaceSlim))
        .intensity(100.0)
        .face_detector(Box::new(FixedDetector(vec![one_face()])))
        .process()
        .unwrap();

    let output = decode_rgba(&frame.data);
    let mut changed_inside = false;
    for y in 0..100u32 {
        for x in 0..100u32 {
            let inside = (20..70).contains(&x) && (20..70).contains(&y);
            if inside {
                changed_inside |= output.get_pixel(x, y) != img.get_pixel(x, y);
            } else {
                assert_eq!(
                    output.get_pixel(x, y),
                    img.get_pixel(x, y),
                    "pixel ({x}, {y}) outside the face box changed"
                );
            }
        }
    }
    assert!(changed_inside, "the warp left the face box untouched");
}

#[test]
fn overlays_draw_nothing_without_faces() {
    let img = gradient_rgba(80, 80);
    let png = encode_png(&img);

    for overlay in [
        AnimalOverlay::BunnyEars,
        AnimalOverlay::CatFeatures,
        AnimalOverlay::DogNose,
        AnimalOverlay::BearFace,
    ] {
        let frame = FilterProcessor::new(png.clone())
            .unwrap()
            .filter(FilterKind::Animal(overlay))
            .intensity(100.0)
            .face_detector(Box::new(FixedDetector(vec![])))
            .process()
            .unwrap();
        assert_eq!(decode_rgba(&frame.data), img, "{overlay:?} drew shapes");
    }
}

#[test]
fn overlays_paint_over_detected_faces() {
    let img = RgbaImage::from_pixel(200, 200, image::Rgba([60, 60, 60, 255]));
    let face = FaceRegion {
        x: 50,
        y: 50,
        width: 100,
        height: 100,
    };
    let frame = FilterProcessor::new(encode_png(&img))
        .unwrap()
        .filter(FilterKind::Animal(AnimalOverlay::BearFace))
        .intensity(100.0)
        .face_detector(Box::new(FixedDetector(vec![face])))
        .process()
        .unwrap();

    let output = decode_rgba(&frame.data);
    // Left ear center at (70, 60) reads the inner-circle fill
    assert_eq!(output.get_pixel(70, 60).0, [0xD2, 0x69, 0x1E, 255]);
    // The face interior stays untouched
    assert_eq!(output.get_pixel(100, 120).0, [60, 60, 60, 255]);
    assert_eq!(frame.faces, vec![face]);
}

#[test]
fn detection_failure_still_produces_an_image() {
    let img = gradient_rgba(64, 64);
    let frame = FilterProcessor::new(encode_png(&img))
        .unwrap()
        .filter(FilterKind::Beautify(BeautifyFilter::EnhanceEyes))
        .intensity(100.0)
        .face_detector(Box::new(FailingDetector))
        .process()
        .unwrap();

    assert_eq!(decode_rgba(&frame.data), img);
    assert!(frame.faces.is_empty());
}

#[test]
fn unknown_filter_id_passes_through_end_to_end() {
    let img = gradient_rgba(64, 64);
    let frame = FilterProcessor::new(encode_png(&img))
        .unwrap()
        .filter_id("sparkle-unicorn")
        .intensity(80.0)
        .face_detector(Box::new(FixedDetector(vec![one_face()])))
        .process()
        .unwrap();

    assert_eq!(decode_rgba(&frame.data), img);
}

#[test]
fn jpeg_output_is_jpeg() {
    let img = gradient_rgba(64, 64);
    let frame = FilterProcessor::new(encode_png(&img))
        .unwrap()
        .filter(FilterKind::Beautify(BeautifyFilter::SmoothSkin))
        .format(OutputFormat::Jpeg)
        .quality(0.8)
        .process()
        .unwrap();

    assert_eq!(frame.data[0], 0xFF);
    assert_eq!(frame.data[1], 0xD8);
}

#[test]
fn jpeg_input_is_accepted() {
    let img = gradient_rgba(64, 64);
    let jpeg = {
        let png_frame = FilterProcessor::new(encode_png(&img))
            .unwrap()
            .format(OutputFormat::Jpeg)
            .process()
            .unwrap();
        png_frame.data
    };

    let frame = FilterProcessor::new(jpeg)
        .unwrap()
        .filter(FilterKind::Beautify(BeautifyFilter::SmoothSkin))
        .process()
        .unwrap();
    assert_eq!(frame.width, 64);
    assert_eq!(frame.height, 64);
}

#[test]
fn processed_frames_flow_into_the_store() {
    let img = gradient_rgba(48, 48);
    let frame = FilterProcessor::new(encode_png(&img))
        .unwrap()
        .filter(FilterKind::Animal(AnimalOverlay::DogNose))
        .intensity(70.0)
        .face_detector(Box::new(FixedDetector(vec![one_face()])))
        .process()
        .unwrap();

    let store = MemStore::new();
    let record = store.create(NewProcessedImage {
        original_name: "portrait.png".to_string(),
        processed_data: frame.to_data_uri(),
        filter_type: FilterKind::Animal(AnimalOverlay::DogNose).to_string(),
        intensity: 70.0,
    });

    let fetched = store.get(&record.id).unwrap();
    assert_eq!(fetched.filter_type, "dog-nose");
    assert!(fetched.processed_data.starts_with("data:image/png;base64,"));
    assert_eq!(store.recent(10).len(), 1);
}
