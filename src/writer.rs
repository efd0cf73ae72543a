use std::io::Write;

use log::debug;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::GpxError;
use crate::gpx_types::*;
use crate::options::WriteOptions;
use crate::tags::{self, Tag};
use crate::timestamp::format_timestamp;

type Result<T> = std::result::Result<T, GpxError>;

/// Write a GPX document to a string with default options.
pub fn write_gpx(gpx: &Gpx) -> Result<String> {
    write_gpx_with_options(gpx, &WriteOptions::default())
}

pub fn write_gpx_with_options(gpx: &Gpx, opts: &WriteOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_gpx_to(gpx, &mut buf, opts)?;
    String::from_utf8(buf)
        .map_err(|e| GpxError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Write a GPX document to `out`. Only a failing sink makes this fail.
pub fn write_gpx_to<W: Write>(gpx: &Gpx, out: W, opts: &WriteOptions) -> Result<()> {
    let mut writer = Writer::new(out);

    if opts.xml_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }

    let mut root = BytesStart::new(Tag::Gpx.as_str());
    if let Some(version) = &gpx.version {
        root.push_attribute((tags::VERSION, version.as_str()));
    }
    if let Some(creator) = &gpx.creator {
        root.push_attribute((tags::CREATOR, creator.as_str()));
    }
    writer.write_event(Event::Start(root))?;

    for wpt in &gpx.waypoints {
        write_point(&mut writer, Tag::Wpt, wpt)?;
    }
    for trk in &gpx.tracks {
        write_track(&mut writer, trk, opts)?;
    }
    for rte in &gpx.routes {
        write_route(&mut writer, rte, opts)?;
    }

    writer.write_event(Event::End(BytesEnd::new(Tag::Gpx.as_str())))?;
    writer.get_mut().flush()?;

    debug!(
        "wrote GPX: {} waypoints, {} tracks, {} routes",
        gpx.waypoints.len(),
        gpx.tracks.len(),
        gpx.routes.len()
    );
    Ok(())
}

/// Child elements of a point, in output order. Absent values are left out.
fn point_fields(pt: &Waypoint) -> Vec<(Tag, String)> {
    let mut fields = Vec::new();
    push_field(&mut fields, Tag::Ele, pt.elevation);
    push_field(&mut fields, Tag::Time, pt.time.as_ref().map(format_timestamp));
    push_field(&mut fields, Tag::Speed, pt.speed);
    push_field(&mut fields, Tag::Magvar, pt.magnetic_declination);
    push_field(&mut fields, Tag::GeoidHeight, pt.geoid_height);
    push_field(&mut fields, Tag::Name, pt.name.as_deref());
    push_field(&mut fields, Tag::Cmt, pt.comment.as_deref());
    push_field(&mut fields, Tag::Desc, pt.description.as_deref());
    push_field(&mut fields, Tag::Src, pt.src.as_deref());
    push_field(&mut fields, Tag::Sym, pt.sym.as_deref());
    push_field(&mut fields, Tag::Type, pt.point_type.as_deref());
    push_field(&mut fields, Tag::Fix, pt.fix);
    push_field(&mut fields, Tag::Sat, pt.sat);
    push_field(&mut fields, Tag::Hdop, pt.hdop);
    push_field(&mut fields, Tag::Vdop, pt.vdop);
    push_field(&mut fields, Tag::Pdop, pt.pdop);
    push_field(&mut fields, Tag::AgeOfGpsData, pt.age_of_gps_data);
    push_field(&mut fields, Tag::DgpsId, pt.dgps_id);
    fields
}

fn push_field<T: ToString>(fields: &mut Vec<(Tag, String)>, tag: Tag, value: Option<T>) {
    if let Some(value) = value {
        fields.push((tag, value.to_string()));
    }
}

/// Write a point element (wpt, rtept, trkpt). A point without optional
/// fields becomes an empty element.
fn write_point<W: Write>(writer: &mut Writer<W>, tag: Tag, pt: &Waypoint) -> Result<()> {
    let mut start = BytesStart::new(tag.as_str());
    start.push_attribute((tags::LAT, pt.latitude.to_string().as_str()));
    start.push_attribute((tags::LON, pt.longitude.to_string().as_str()));

    let fields = point_fields(pt);
    if fields.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for (field, text) in &fields {
        write_text_element(writer, *field, text)?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: Tag, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}

fn write_optional<W: Write>(writer: &mut Writer<W>, tag: Tag, value: Option<&str>) -> Result<()> {
    match value {
        Some(text) => write_text_element(writer, tag, text),
        None => Ok(()),
    }
}

/// Write a <trk> with all of its points in a single <trkseg>.
fn write_track<W: Write>(writer: &mut Writer<W>, trk: &Track, opts: &WriteOptions) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(Tag::Trk.as_str())))?;

    write_optional(writer, Tag::Name, trk.name.as_deref())?;
    write_optional(writer, Tag::Cmt, trk.comment.as_deref())?;
    if !opts.legacy_layout {
        write_optional(writer, Tag::Desc, trk.description.as_deref())?;
    }
    write_optional(writer, Tag::Src, trk.src.as_deref())?;
    write_optional(writer, Tag::Number, trk.number.map(|n| n.to_string()).as_deref())?;
    write_optional(writer, Tag::Type, trk.track_type.as_deref())?;

    writer.write_event(Event::Start(BytesStart::new(Tag::Trkseg.as_str())))?;
    for pt in &trk.points {
        write_point(writer, Tag::Trkpt, pt)?;
    }
    writer.write_event(Event::End(BytesEnd::new(Tag::Trkseg.as_str())))?;

    writer.write_event(Event::End(BytesEnd::new(Tag::Trk.as_str())))?;
    Ok(())
}

/// Write a <rte>. With `legacy_layout` its points follow the element
/// instead of being nested in it.
fn write_route<W: Write>(writer: &mut Writer<W>, rte: &Route, opts: &WriteOptions) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(Tag::Rte.as_str())))?;

    write_optional(writer, Tag::Name, rte.name.as_deref())?;
    write_optional(writer, Tag::Cmt, rte.comment.as_deref())?;
    write_optional(writer, Tag::Desc, rte.description.as_deref())?;
    write_optional(writer, Tag::Src, rte.src.as_deref())?;
    write_optional(writer, Tag::Number, rte.number.map(|n| n.to_string()).as_deref())?;
    write_optional(writer, Tag::Type, rte.route_type.as_deref())?;

    if opts.legacy_layout {
        writer.write_event(Event::End(BytesEnd::new(Tag::Rte.as_str())))?;
        for pt in &rte.points {
            write_point(writer, Tag::Rtept, pt)?;
        }
        return Ok(());
    }

    for pt in &rte.points {
        write_point(writer, Tag::Rtept, pt)?;
    }
    writer.write_event(Event::End(BytesEnd::new(Tag::Rte.as_str())))?;
    Ok(())
}
