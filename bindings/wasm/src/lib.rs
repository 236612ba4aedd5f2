use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Options for filter processing, passed as a JavaScript object.
///
/// All fields are optional. An unrecognized `filter` id is not an error:
/// the image comes back unmodified, matching the pipeline's fail-soft
/// contract for legacy ids.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessOptions {
    pub filter: Option<String>,
    pub intensity: Option<f32>,
    pub format: Option<String>,
    pub quality: Option<f32>,
}

fn format_to_str(format: &facefilter::OutputFormat) -> &'static str {
    match format {
        facefilter::OutputFormat::Png => "png",
        facefilter::OutputFormat::Jpeg => "jpeg",
    }
}

fn string_to_format(format: &str) -> Result<facefilter::OutputFormat, JsValue> {
    match format {
        "png" => Ok(facefilter::OutputFormat::Png),
        "jpeg" => Ok(facefilter::OutputFormat::Jpeg),
        _ => Err(make_error(
            "INVALID_OPTIONS",
            &format!("unknown format: {format}"),
        )),
    }
}

/// Create a JS `Error` with a `code` property.
fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

/// Convert a `FilterError` into a JS `Error` with a machine-readable `code`.
fn to_js_error(e: facefilter::FilterError) -> JsValue {
    let (code, message) = match &e {
        facefilter::FilterError::DecodeError(_) => ("DECODE_ERROR", e.to_string()),
        facefilter::FilterError::UnsupportedFormat => ("UNSUPPORTED_FORMAT", e.to_string()),
        facefilter::FilterError::PayloadTooLarge(_) => ("PAYLOAD_TOO_LARGE", e.to_string()),
        facefilter::FilterError::ZeroDimensions => ("ZERO_DIMENSIONS", e.to_string()),
        facefilter::FilterError::EncodeError(_) => ("ENCODE_ERROR", e.to_string()),
        facefilter::FilterError::InvalidIntensity(_) => ("INVALID_INTENSITY", e.to_string()),
        facefilter::FilterError::InvalidQuality(_) => ("INVALID_QUALITY", e.to_string()),
    };
    make_error(code, &message)
}

fn parse_options(options: JsValue) -> Result<ProcessOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ProcessOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid options: {e}")))
    }
}

/// Apply parsed `ProcessOptions` to a `FilterProcessor`, returning the
/// configured processor ready to run.
fn apply_options(
    mut processor: facefilter::FilterProcessor,
    opts: &ProcessOptions,
) -> Result<facefilter::FilterProcessor, JsValue> {
    if let Some(ref id) = opts.filter {
        processor = processor.filter_id(id);
    }
    if let Some(intensity) = opts.intensity {
        processor = processor.intensity(intensity);
    }
    if let Some(ref format) = opts.format {
        processor = processor.format(string_to_format(format)?);
    }
    if let Some(quality) = opts.quality {
        processor = processor.quality(quality);
    }
    Ok(processor)
}

/// Build a plain JS object from a `ProcessedFrame`.
fn build_frame_object(frame: &facefilter::ProcessedFrame) -> Result<JsValue, JsValue> {
    let obj = js_sys::Object::new();
    let data = js_sys::Uint8Array::from(&frame.data[..]);
    js_sys::Reflect::set(&obj, &"data".into(), &data)?;
    js_sys::Reflect::set(
        &obj,
        &"format".into(),
        &JsValue::from_str(format_to_str(&frame.format)),
    )?;
    js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(frame.width))?;
    js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(frame.height))?;
    js_sys::Reflect::set(
        &obj,
        &"originalSize".into(),
        &JsValue::from(frame.original_size as u32),
    )?;

    let faces = js_sys::Array::new();
    for face in &frame.faces {
        let face_obj = js_sys::Object::new();
        js_sys::Reflect::set(&face_obj, &"x".into(), &JsValue::from(face.x))?;
        js_sys::Reflect::set(&face_obj, &"y".into(), &JsValue::from(face.y))?;
        js_sys::Reflect::set(&face_obj, &"width".into(), &JsValue::from(face.width))?;
        js_sys::Reflect::set(&face_obj, &"height".into(), &JsValue::from(face.height))?;
        faces.push(&face_obj);
    }
    js_sys::Reflect::set(&obj, &"faces".into(), &faces)?;

    Ok(JsValue::from(obj))
}

/// Apply a filter to an image with the given options.
///
/// @param input - Raw image bytes (JPEG or PNG)
/// @param options - Optional object with fields: filter, intensity,
///   format, quality
#[wasm_bindgen(js_name = "processImage")]
pub fn process_image(input: Vec<u8>, options: JsValue) -> Result<JsValue, JsValue> {
    let opts = parse_options(options)?;

    let processor = facefilter::FilterProcessor::new(input).map_err(to_js_error)?;
    let processor = apply_options(processor, &opts)?;

    let frame = processor.process().map_err(to_js_error)?;

    build_frame_object(&frame)
}

/// Apply a filter to a base64 data URI and return the result as a data
/// URI string, ready to assign to an `img.src`.
///
/// @param uri - Input image as `data:image/png;base64,…` or the JPEG equivalent
/// @param options - Optional object with fields: filter, intensity,
///   format, quality
#[wasm_bindgen(js_name = "processDataUri")]
pub fn process_data_uri(uri: String, options: JsValue) -> Result<JsValue, JsValue> {
    let opts = parse_options(options)?;

    let processor = facefilter::FilterProcessor::from_data_uri(&uri).map_err(to_js_error)?;
    let processor = apply_options(processor, &opts)?;

    let frame = processor.process().map_err(to_js_error)?;

    Ok(JsValue::from_str(&frame.to_data_uri()))
}
