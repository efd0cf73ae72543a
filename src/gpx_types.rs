use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A parsed GPX document: waypoints, tracks and routes in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gpx {
    pub version: Option<String>,
    pub creator: Option<String>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// A single GPX point (used for wpt, rtept, trkpt).
///
/// `time` carries no offset: it is read and written as the naive clock value
/// found in the document. It is written with whole seconds only, so any
/// sub-second part is dropped on write.
///
/// An empty string in a text field (`name`, `sym`, ...) is written as an
/// empty element and read back as `Some("")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub time: Option<NaiveDateTime>,
    pub speed: Option<f32>,
    pub magnetic_declination: Option<f64>,
    pub geoid_height: Option<f64>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub src: Option<String>,
    pub sym: Option<String>,
    #[serde(rename = "type")]
    pub point_type: Option<String>,
    pub fix: Option<FixType>,
    pub sat: Option<u32>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
    pub pdop: Option<f64>,
    pub age_of_gps_data: Option<f64>,
    pub dgps_id: Option<u32>,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            time: None,
            speed: None,
            magnetic_declination: None,
            geoid_height: None,
            name: None,
            comment: None,
            description: None,
            src: None,
            sym: None,
            point_type: None,
            fix: None,
            sat: None,
            hdop: None,
            vdop: None,
            pdop: None,
            age_of_gps_data: None,
            dgps_id: None,
        }
    }
}

/// A GPX track (<trk>).
///
/// Points of every `<trkseg>` are flattened into `points`; segment
/// boundaries are not kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(default)]
    pub points: Vec<Waypoint>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub src: Option<String>,
    pub number: Option<u32>,
    #[serde(rename = "type")]
    pub track_type: Option<String>,
}

/// A GPX route (<rte>).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default)]
    pub points: Vec<Waypoint>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub src: Option<String>,
    pub number: Option<u32>,
    #[serde(rename = "type")]
    pub route_type: Option<String>,
}

/// Kind of GPS fix of a point (<fix>).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixType {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    ThreeD,
    #[serde(rename = "dgps")]
    Dgps,
    #[serde(rename = "pps")]
    Pps,
}

impl FixType {
    pub const ALL: [FixType; 5] = [
        FixType::None,
        FixType::TwoD,
        FixType::ThreeD,
        FixType::Dgps,
        FixType::Pps,
    ];

    /// The wire token of this fix type.
    pub fn as_str(self) -> &'static str {
        match self {
            FixType::None => "none",
            FixType::TwoD => "2d",
            FixType::ThreeD => "3d",
            FixType::Dgps => "dgps",
            FixType::Pps => "pps",
        }
    }
}

impl fmt::Display for FixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a `<fix>` token is not one of the five known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFixType(pub String);

impl fmt::Display for UnknownFixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown fix type '{}'", self.0)
    }
}

impl std::error::Error for UnknownFixType {}

impl FromStr for FixType {
    type Err = UnknownFixType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FixType::ALL
            .into_iter()
            .find(|fix| fix.as_str() == s)
            .ok_or_else(|| UnknownFixType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_tokens() {
        for fix in FixType::ALL {
            assert_eq!(fix.as_str().parse::<FixType>(), Ok(fix));
        }
        assert_eq!(FixType::ThreeD.to_string(), "3d");
    }

    #[test]
    fn test_fix_is_case_sensitive() {
        assert!("3D".parse::<FixType>().is_err());
        assert!("DGPS".parse::<FixType>().is_err());
        assert_eq!(
            "bogus".parse::<FixType>(),
            Err(UnknownFixType("bogus".to_string()))
        );
    }

    #[test]
    fn test_new_waypoint_has_no_optional_fields() {
        let pt = Waypoint::new(35.0, 139.0);
        assert_eq!(pt.latitude, 35.0);
        assert_eq!(pt.longitude, 139.0);
        assert_eq!(pt, Waypoint::new(35.0, 139.0));
        assert!(pt.elevation.is_none());
        assert!(pt.fix.is_none());
        assert!(pt.dgps_id.is_none());
    }

    #[test]
    fn test_serde_uses_wire_tokens() {
        let mut pt = Waypoint::new(1.5, 2.5);
        pt.fix = Some(FixType::Dgps);
        pt.point_type = Some("POI".to_string());
        let json = serde_json::to_value(&pt).unwrap();
        assert_eq!(json["fix"], "dgps");
        assert_eq!(json["type"], "POI");
        assert_eq!(json["latitude"], 1.5);
        assert!(json["ageOfGpsData"].is_null());

        let back: Waypoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, pt);
    }
}
