mod error;
mod gpx_types;
mod options;
mod parser;
mod tags;
mod timestamp;
mod writer;

use wasm_bindgen::prelude::*;

pub use crate::error::{ErrorKind, GpxError};
pub use crate::gpx_types::{FixType, Gpx, Route, Track, UnknownFixType, Waypoint};
pub use crate::options::WriteOptions;
pub use crate::parser::{parse_gpx, parse_gpx_bytes, parse_gpx_reader};
pub use crate::writer::{write_gpx, write_gpx_to, write_gpx_with_options};

/// Parse a GPX string, returned as a JS object.
#[wasm_bindgen(js_name = parseGpx)]
pub fn parse_gpx_js(gpx_string: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let gpx = parser::parse_gpx(gpx_string)?;
    serde_wasm_bindgen::to_value(&gpx).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse a GPX string, returned as a JSON string.
#[wasm_bindgen(js_name = parseGpxToJsonString)]
pub fn parse_gpx_to_json_string(gpx_string: &str) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let gpx = parser::parse_gpx(gpx_string)?;
    serde_json::to_string(&gpx).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Write a GPX object (as returned by `parseGpx`) back to XML.
#[wasm_bindgen(js_name = writeGpx)]
pub fn write_gpx_js(gpx: JsValue, options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let gpx: Gpx =
        serde_wasm_bindgen::from_value(gpx).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(writer::write_gpx_with_options(&gpx, &opts)?)
}

fn parse_options(options: JsValue) -> Result<WriteOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(WriteOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
