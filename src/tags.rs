//! Element and attribute names of the GPX wire format.

pub const LAT: &str = "lat";
pub const LON: &str = "lon";
pub const VERSION: &str = "version";
pub const CREATOR: &str = "creator";

/// Every element the reader and writer know about. Anything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Gpx,
    Wpt,
    Trk,
    Trkseg,
    Trkpt,
    Rte,
    Rtept,
    Name,
    Cmt,
    Desc,
    Src,
    Number,
    Type,
    Ele,
    Time,
    Speed,
    Magvar,
    GeoidHeight,
    Sym,
    Fix,
    Sat,
    Hdop,
    Vdop,
    Pdop,
    AgeOfGpsData,
    /// GPX 1.1 spelling, read as `AgeOfGpsData`.
    AgeOfDgpsData,
    DgpsId,
}

impl Tag {
    pub fn from_name(name: &[u8]) -> Option<Self> {
        let tag = match name {
            b"gpx" => Tag::Gpx,
            b"wpt" => Tag::Wpt,
            b"trk" => Tag::Trk,
            b"trkseg" => Tag::Trkseg,
            b"trkpt" => Tag::Trkpt,
            b"rte" => Tag::Rte,
            b"rtept" => Tag::Rtept,
            b"name" => Tag::Name,
            b"cmt" => Tag::Cmt,
            b"desc" => Tag::Desc,
            b"src" => Tag::Src,
            b"number" => Tag::Number,
            b"type" => Tag::Type,
            b"ele" => Tag::Ele,
            b"time" => Tag::Time,
            b"speed" => Tag::Speed,
            b"magvar" => Tag::Magvar,
            b"geoidheight" => Tag::GeoidHeight,
            b"sym" => Tag::Sym,
            b"fix" => Tag::Fix,
            b"sat" => Tag::Sat,
            b"hdop" => Tag::Hdop,
            b"vdop" => Tag::Vdop,
            b"pdop" => Tag::Pdop,
            b"ageofgpsdata" => Tag::AgeOfGpsData,
            b"ageofdgpsdata" => Tag::AgeOfDgpsData,
            b"dgpsid" => Tag::DgpsId,
            _ => return None,
        };
        Some(tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Gpx => "gpx",
            Tag::Wpt => "wpt",
            Tag::Trk => "trk",
            Tag::Trkseg => "trkseg",
            Tag::Trkpt => "trkpt",
            Tag::Rte => "rte",
            Tag::Rtept => "rtept",
            Tag::Name => "name",
            Tag::Cmt => "cmt",
            Tag::Desc => "desc",
            Tag::Src => "src",
            Tag::Number => "number",
            Tag::Type => "type",
            Tag::Ele => "ele",
            Tag::Time => "time",
            Tag::Speed => "speed",
            Tag::Magvar => "magvar",
            Tag::GeoidHeight => "geoidheight",
            Tag::Sym => "sym",
            Tag::Fix => "fix",
            Tag::Sat => "sat",
            Tag::Hdop => "hdop",
            Tag::Vdop => "vdop",
            Tag::Pdop => "pdop",
            Tag::AgeOfGpsData => "ageofgpsdata",
            Tag::AgeOfDgpsData => "ageofdgpsdata",
            Tag::DgpsId => "dgpsid",
        }
    }
}
