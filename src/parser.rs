use std::io::Read;
use std::str::FromStr;

use log::{debug, trace};
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::GpxError;
use crate::gpx_types::*;
use crate::tags::{self, Tag};
use crate::timestamp::parse_timestamp;

type Result<T> = std::result::Result<T, GpxError>;

const DECIMAL: &str = "decimal number";
const INTEGER: &str = "non-negative integer";

/// Parse a GPX XML string into a [`Gpx`].
///
/// Parsing stops at the first error; no partial document is returned.
pub fn parse_gpx(xml: &str) -> Result<Gpx> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let mut gpx = parse_root_attributes(&e)?;
                parse_root_children(&mut gpx, &mut reader)?;
                debug!(
                    "parsed GPX: {} waypoints, {} tracks, {} routes",
                    gpx.waypoints.len(),
                    gpx.tracks.len(),
                    gpx.routes.len()
                );
                return Ok(gpx);
            }
            Ok(Event::Empty(e)) => return parse_root_attributes(&e),
            Ok(Event::Eof) => {
                return Err(GpxError::MalformedDocument(
                    "document has no root element".to_string(),
                ));
            }
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }
}

/// Parse UTF-8 encoded GPX bytes.
pub fn parse_gpx_bytes(bytes: &[u8]) -> Result<Gpx> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| GpxError::MalformedDocument(format!("input is not valid UTF-8: {e}")))?;
    parse_gpx(xml)
}

/// Read a whole GPX document from `input` and parse it.
pub fn parse_gpx_reader<R: Read>(mut input: R) -> Result<Gpx> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    parse_gpx_bytes(&bytes)
}

/// Check the root tag and read its `version`/`creator` attributes.
fn parse_root_attributes(root: &BytesStart<'_>) -> Result<Gpx> {
    if Tag::from_name(root.local_name().as_ref()) != Some(Tag::Gpx) {
        return Err(GpxError::MalformedDocument(format!(
            "expected <{}> root element, found <{}>",
            Tag::Gpx.as_str(),
            String::from_utf8_lossy(root.name().as_ref())
        )));
    }

    let mut gpx = Gpx::default();
    for attr_result in root.attributes() {
        let attr = attr_result.map_err(|e| GpxError::XmlParse(e.into()))?;
        let value = || -> Result<String> {
            let raw = utf8(&attr.value)?;
            let unescaped =
                quick_xml::escape::unescape(raw).map_err(|e| GpxError::XmlParse(e.into()))?;
            Ok(unescaped.into_owned())
        };
        match attr.key.local_name().as_ref() {
            k if k == tags::VERSION.as_bytes() => gpx.version = Some(value()?),
            k if k == tags::CREATOR.as_bytes() => gpx.creator = Some(value()?),
            _ => {}
        }
    }
    Ok(gpx)
}

/// Walk the direct children of <gpx>. Called after receiving Event::Start for the root.
fn parse_root_children<'a>(gpx: &mut Gpx, reader: &mut Reader<&'a [u8]>) -> Result<()> {
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match Tag::from_name(e.local_name().as_ref()) {
                Some(Tag::Wpt) => gpx.waypoints.push(parse_point(&e, reader, Tag::Wpt)?),
                Some(Tag::Trk) => gpx.tracks.push(parse_track(reader)?),
                Some(Tag::Rte) => gpx.routes.push(parse_route(reader)?),
                _ => skip_element(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match Tag::from_name(e.local_name().as_ref()) {
                Some(Tag::Wpt) => gpx.waypoints.push(parse_empty_point(&e, Tag::Wpt)?),
                Some(Tag::Trk) => gpx.tracks.push(Track::default()),
                Some(Tag::Rte) => gpx.routes.push(Route::default()),
                _ => {}
            },
            Ok(Event::End(_)) => return Ok(()),
            Ok(Event::Eof) => return Err(unexpected_eof(Tag::Gpx)),
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }
}

/// Parse lat/lon attributes from a point element's start tag.
fn parse_lat_lon(e: &BytesStart<'_>, tag: Tag) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| GpxError::XmlParse(e.into()))?;
        let key = attr.key.local_name();
        let (slot, attribute) = match key.as_ref() {
            k if k == tags::LAT.as_bytes() => (&mut lat, tags::LAT),
            k if k == tags::LON.as_bytes() => (&mut lon, tags::LON),
            _ => continue,
        };
        let val = utf8(&attr.value)?;
        *slot = Some(val.parse::<f64>().map_err(|_| GpxError::InvalidAttribute {
            element: tag.as_str(),
            attribute,
            value: val.to_string(),
        })?);
    }

    let lat = lat.ok_or(GpxError::MissingAttribute {
        element: tag.as_str(),
        attribute: tags::LAT,
    })?;
    let lon = lon.ok_or(GpxError::MissingAttribute {
        element: tag.as_str(),
        attribute: tags::LON,
    })?;

    Ok((lat, lon))
}

fn parse_empty_point(e: &BytesStart<'_>, tag: Tag) -> Result<Waypoint> {
    let (lat, lon) = parse_lat_lon(e, tag)?;
    Ok(Waypoint::new(lat, lon))
}

/// Parse a point element (wpt, rtept, trkpt) and its children.
/// Called after receiving Event::Start for the point element.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
    tag: Tag,
) -> Result<Waypoint> {
    let (lat, lon) = parse_lat_lon(start, tag)?;
    let mut point = Waypoint::new(lat, lon);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match point_field(&e) {
                Some(field) => {
                    let text = read_text(reader, field)?;
                    set_point_field(&mut point, field, text)?;
                }
                None => skip_element(reader, &e)?,
            },
            Ok(Event::Empty(e)) => {
                if let Some(field) = point_field(&e) {
                    set_point_field(&mut point, field, String::new())?;
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof(tag)),
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(point)
}

fn point_field(e: &BytesStart<'_>) -> Option<Tag> {
    Tag::from_name(e.local_name().as_ref()).filter(|tag| {
        matches!(
            tag,
            Tag::Ele
                | Tag::Time
                | Tag::Speed
                | Tag::Magvar
                | Tag::GeoidHeight
                | Tag::Name
                | Tag::Cmt
                | Tag::Desc
                | Tag::Src
                | Tag::Sym
                | Tag::Type
                | Tag::Fix
                | Tag::Sat
                | Tag::Hdop
                | Tag::Vdop
                | Tag::Pdop
                | Tag::AgeOfGpsData
                | Tag::AgeOfDgpsData
                | Tag::DgpsId
        )
    })
}

/// Free-text fields keep empty content as an empty string; every other
/// field needs text to coerce.
fn is_text_field(field: Tag) -> bool {
    matches!(
        field,
        Tag::Name | Tag::Cmt | Tag::Desc | Tag::Src | Tag::Sym | Tag::Type
    )
}

/// Store the text of a point child element. A repeated element overwrites
/// the earlier value.
fn set_point_field(point: &mut Waypoint, field: Tag, text: String) -> Result<()> {
    if text.is_empty() && !is_text_field(field) {
        return Err(empty_element(field));
    }
    match field {
        Tag::Ele => point.elevation = Some(coerce(field, text, DECIMAL)?),
        Tag::Time => match parse_timestamp(&text) {
            Some(time) => point.time = Some(time),
            None => return Err(coercion_error(field, "timestamp", text)),
        },
        Tag::Speed => point.speed = Some(coerce(field, text, DECIMAL)?),
        Tag::Magvar => point.magnetic_declination = Some(coerce(field, text, DECIMAL)?),
        Tag::GeoidHeight => point.geoid_height = Some(coerce(field, text, DECIMAL)?),
        Tag::Name => point.name = Some(text),
        Tag::Cmt => point.comment = Some(text),
        Tag::Desc => point.description = Some(text),
        Tag::Src => point.src = Some(text),
        Tag::Sym => point.sym = Some(text),
        Tag::Type => point.point_type = Some(text),
        Tag::Fix => point.fix = Some(coerce(field, text, "fix type")?),
        Tag::Sat => point.sat = Some(coerce(field, text, INTEGER)?),
        Tag::Hdop => point.hdop = Some(coerce(field, text, DECIMAL)?),
        Tag::Vdop => point.vdop = Some(coerce(field, text, DECIMAL)?),
        Tag::Pdop => point.pdop = Some(coerce(field, text, DECIMAL)?),
        Tag::AgeOfGpsData | Tag::AgeOfDgpsData => {
            point.age_of_gps_data = Some(coerce(field, text, DECIMAL)?)
        }
        Tag::DgpsId => point.dgps_id = Some(coerce(field, text, INTEGER)?),
        _ => {}
    }
    Ok(())
}

/// Scalar fields shared by <trk> and <rte>.
#[derive(Default)]
struct Details {
    name: Option<String>,
    comment: Option<String>,
    description: Option<String>,
    src: Option<String>,
    number: Option<u32>,
    kind: Option<String>,
}

impl Details {
    fn field(e: &BytesStart<'_>) -> Option<Tag> {
        Tag::from_name(e.local_name().as_ref()).filter(|tag| {
            matches!(
                tag,
                Tag::Name | Tag::Cmt | Tag::Desc | Tag::Src | Tag::Number | Tag::Type
            )
        })
    }

    fn set(&mut self, field: Tag, text: String) -> Result<()> {
        if text.is_empty() && !is_text_field(field) {
            return Err(empty_element(field));
        }
        match field {
            Tag::Name => self.name = Some(text),
            Tag::Cmt => self.comment = Some(text),
            Tag::Desc => self.description = Some(text),
            Tag::Src => self.src = Some(text),
            Tag::Number => self.number = Some(coerce(field, text, INTEGER)?),
            Tag::Type => self.kind = Some(text),
            _ => {}
        }
        Ok(())
    }
}

/// Parse a <rte> element.
fn parse_route<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Route> {
    let mut details = Details::default();
    let mut points = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if let Some(field) = Details::field(&e) {
                    let text = read_text(reader, field)?;
                    details.set(field, text)?;
                } else if Tag::from_name(e.local_name().as_ref()) == Some(Tag::Rtept) {
                    points.push(parse_point(&e, reader, Tag::Rtept)?);
                } else {
                    skip_element(reader, &e)?;
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(field) = Details::field(&e) {
                    details.set(field, String::new())?;
                } else if Tag::from_name(e.local_name().as_ref()) == Some(Tag::Rtept) {
                    points.push(parse_empty_point(&e, Tag::Rtept)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof(Tag::Rte)),
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(Route {
        points,
        name: details.name,
        comment: details.comment,
        description: details.description,
        src: details.src,
        number: details.number,
        route_type: details.kind,
    })
}

/// Parse a <trk> element. Points of all its segments end up in one list.
fn parse_track<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Track> {
    let mut details = Details::default();
    let mut points = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if let Some(field) = Details::field(&e) {
                    let text = read_text(reader, field)?;
                    details.set(field, text)?;
                } else if Tag::from_name(e.local_name().as_ref()) == Some(Tag::Trkseg) {
                    parse_segment(reader, &mut points)?;
                } else {
                    skip_element(reader, &e)?;
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(field) = Details::field(&e) {
                    details.set(field, String::new())?;
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof(Tag::Trk)),
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(Track {
        points,
        name: details.name,
        comment: details.comment,
        description: details.description,
        src: details.src,
        number: details.number,
        track_type: details.kind,
    })
}

/// Parse a <trkseg> element, appending its points to `points`.
fn parse_segment<'a>(reader: &mut Reader<&'a [u8]>, points: &mut Vec<Waypoint>) -> Result<()> {
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match Tag::from_name(e.local_name().as_ref()) {
                Some(Tag::Trkpt) => points.push(parse_point(&e, reader, Tag::Trkpt)?),
                _ => skip_element(reader, &e)?,
            },
            Ok(Event::Empty(e)) => {
                if Tag::from_name(e.local_name().as_ref()) == Some(Tag::Trkpt) {
                    points.push(parse_empty_point(&e, Tag::Trkpt)?);
                }
            }
            Ok(Event::End(_)) => return Ok(()),
            Ok(Event::Eof) => return Err(unexpected_eof(Tag::Trkseg)),
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }
}

/// Read the text content of the element just opened, up to its end tag.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text<'a>(reader: &mut Reader<&'a [u8]>, tag: Tag) -> Result<String> {
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => text.push_str(utf8(e.as_ref())?),
            Ok(Event::CData(e)) => text.push_str(utf8(e.as_ref())?),
            Ok(Event::GeneralRef(e)) => push_reference(&mut text, &e)?,
            Ok(Event::Start(e)) => skip_element(reader, &e)?,
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof(tag)),
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(text)
}

/// Resolve a character reference (&#60; &#x3C;) or one of the predefined entities.
fn push_reference(text: &mut String, e: &BytesRef<'_>) -> Result<()> {
    if let Ok(Some(ch)) = e.resolve_char_ref() {
        text.push(ch);
        return Ok(());
    }
    let ch = match utf8(e.as_ref())? {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        name => {
            return Err(GpxError::MalformedDocument(format!(
                "unknown entity reference '&{name};'"
            )));
        }
    };
    text.push(ch);
    Ok(())
}

fn skip_element<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'a>) -> Result<()> {
    trace!(
        "skipping <{}>",
        String::from_utf8_lossy(start.name().as_ref())
    );
    reader.read_to_end(start.name()).map_err(GpxError::XmlParse)?;
    Ok(())
}

fn coerce<T: FromStr>(field: Tag, text: String, expected: &'static str) -> Result<T> {
    match text.parse::<T>() {
        Ok(value) => Ok(value),
        Err(_) => Err(coercion_error(field, expected, text)),
    }
}

fn coercion_error(field: Tag, expected: &'static str, value: String) -> GpxError {
    GpxError::TypeCoercion {
        element: field.as_str(),
        expected,
        value,
    }
}

fn empty_element(field: Tag) -> GpxError {
    coercion_error(field, "text content", String::new())
}

fn unexpected_eof(tag: Tag) -> GpxError {
    GpxError::MalformedDocument(format!(
        "unexpected end of document inside <{}>",
        tag.as_str()
    ))
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| GpxError::MalformedDocument(format!("invalid UTF-8 in document: {e}")))
}
