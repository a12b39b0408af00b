/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! extraction of observer and peer readings from the labeled-field text format of the swarm beacon.
//!
//! Record example:
//! ```text
//!   GPS Latitude: 39.0
//!   GPS Longitude: -76.0
//!   GPS Altitude: 100 m
//!   GPS Speed: 20 km/h
//!
//!   ID: A1
//!   Name: Scout
//!   Location: 39.001, -76.0
//!   Altitude: 120 m
//!   Speed: 30 km/h
//!   Course: 400°
//!   Last Update: 1500 ms ago
//!   Distance: 111.19 m
//!   Relative Altitude: 20 m
//!   ID: B2
//!   ...
//! ```
//! Each field is matched on its own by a label pattern, i.e. fields can be in any order, on separate lines
//! or all on one line, and can be missing. A peer block starts with an `ID:` label and extends up to the next
//! one. The observer reading needs all four GPS fields in this order, peers need at least `Name:` and
//! `Location:`. All other peer fields default to 0.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use uom::si::{f64::{Length,Velocity}, length::meter, velocity::kilometer_per_hour};
use odin_common::angle::Angle360;

use crate::{ObserverReading, PeerReading, ParseResult};

// we match a permissive superset of decimal numbers and leave the validation to f64::from_str
const NUM: &str = r"[-+]?[\d.]+";

// capture group conventions: 'v' is the value, a matched 'q' is a qualifier that disqualifies the label
// (e.g. "Altitude:" should not match "GPS Altitude:" or "Relative Altitude:")
lazy_static! {
    static ref OBSERVER_RE: Regex = Regex::new( &format!(
        r"GPS\s+Latitude:\s*(?P<lat>{NUM})\s*GPS\s+Longitude:\s*(?P<lon>{NUM})\s*GPS\s+Altitude:\s*(?P<alt>{NUM})\s*m\s*GPS\s+Speed:\s*(?P<spd>{NUM})\s*km/h"
    )).unwrap();

    // an empty id still starts a new block (which is then dropped). Values can be on the next line
    static ref ID_RE: Regex = Regex::new( r"\bID:\s*(?P<v>[A-Za-z0-9_\-]*)").unwrap();

    static ref NAME_RE: Regex = Regex::new( r"\bName:\s*(?P<v>[^\r\n]*)").unwrap();
    static ref LOCATION_RE: Regex = Regex::new( &format!( r"\bLocation:\s*(?P<lat>{NUM})\s*,\s*(?P<lon>{NUM})")).unwrap();
    static ref ALTITUDE_RE: Regex = Regex::new( &format!( r"(?P<q>GPS\s+|Relative\s+)?\bAltitude:\s*(?P<v>{NUM})\s*m")).unwrap();
    static ref SPEED_RE: Regex = Regex::new( &format!( r"(?P<q>GPS\s+)?\bSpeed:\s*(?P<v>{NUM})\s*km/h")).unwrap();
    static ref COURSE_RE: Regex = Regex::new( &format!( r"\bCourse:\s*(?P<v>{NUM})\s*°")).unwrap();
    static ref LAST_UPDATE_RE: Regex = Regex::new( r"\bLast\s+Update:\s*(?P<v>\d+)\s*ms\s+ago").unwrap();
    static ref DISTANCE_RE: Regex = Regex::new( &format!( r"\bDistance:\s*(?P<v>{NUM})\s*m")).unwrap();
    static ref REL_ALTITUDE_RE: Regex = Regex::new( &format!( r"\bRelative\s+Altitude:\s*(?P<v>{NUM})\s*m")).unwrap();

    // where a free text value (name) ends if there is no line break
    static ref FIELD_LABEL_RE: Regex = Regex::new(
        r"\b(?:Location|Relative\s+Altitude|Altitude|Speed|Course|Last\s+Update|Distance|ID|Name|GPS\s+\w+):"
    ).unwrap();
}

/* #region field primitives ***************************************************************************/

/// the value text of the first unqualified match of a labeled field pattern
pub fn labeled_text<'a> (re: &Regex, text: &'a str)->Option<&'a str> {
    re.captures_iter( text)
        .find( |caps| caps.name("q").is_none())
        .and_then( |caps| caps.name("v"))
        .map( |m| m.as_str())
}

/// a labeled decimal field, None if the label is missing or the value does not parse
pub fn labeled_f64 (re: &Regex, text: &str)->Option<f64> {
    labeled_text( re, text).and_then( |s| s.parse::<f64>().ok()).filter( |v| v.is_finite())
}

pub fn labeled_u64 (re: &Regex, text: &str)->Option<u64> {
    labeled_text( re, text).and_then( |s| s.parse::<u64>().ok())
}

/// a free text field that ends at the line end or at the next known field label, whitespace trimmed
pub fn labeled_free_text<'a> (re: &Regex, text: &'a str)->Option<&'a str> {
    labeled_text( re, text).map( |v| {
        let v = match FIELD_LABEL_RE.find(v) {
            Some(m) => &v[..m.start()],
            None => v
        };
        v.trim()
    })
}

fn parse_f64 (s: &str)->Option<f64> {
    s.parse::<f64>().ok().filter( |v| v.is_finite())
}

/* #endregion field primitives */

/// extract everything we can from one record. This never fails - a record without recognizable
/// content yields an empty [`ParseResult`]
pub fn parse_record (record: &str)->ParseResult {
    let observer = parse_observer( record);
    let peers: Vec<PeerReading> = peer_blocks( record).into_iter()
        .filter_map( |(id,block)| parse_peer( id, block))
        .collect();

    debug!("parsed record: observer: {}, peers: {}", observer.is_some(), peers.len());
    ParseResult { observer, peers }
}

/// the first complete (all four fields present and parseable) observer reading in `text`
pub fn parse_observer (text: &str)->Option<ObserverReading> {
    OBSERVER_RE.captures_iter( text).find_map( |caps| {
        let lat = parse_f64( caps.name("lat")?.as_str())?;
        let lon = parse_f64( caps.name("lon")?.as_str())?;
        let alt = parse_f64( caps.name("alt")?.as_str())?;
        let spd = parse_f64( caps.name("spd")?.as_str())?;
        Some( ObserverReading::new( lat, lon, alt, spd))
    })
}

/// split `text` into (id, block) pairs. Blocks do not include their `ID:` label and end at the next one
pub fn peer_blocks (text: &str)->Vec<(&str,&str)> {
    let mut blocks = Vec::new();
    let mut current: Option<(&str,usize)> = None; // id and start of block

    for caps in ID_RE.captures_iter( text) {
        let (Some(label), Some(id)) = (caps.get(0), caps.name("v")) else { continue };

        if let Some((prev_id, start)) = current {
            blocks.push( (prev_id, &text[start..label.start()]) );
        }
        // "ID:" directly followed by the next field label has no value
        let id = if FIELD_LABEL_RE.find_at( text, id.start()).is_some_and( |m| m.start() == id.start()) { "" } else { id.as_str() };
        current = Some( (id, label.end()) );
    }

    if let Some((id, start)) = current {
        blocks.push( (id, &text[start..]) );
    }
    blocks
}

/// parse a single peer block. Returns None if id, name or location are missing
pub fn parse_peer (id: &str, block: &str)->Option<PeerReading> {
    if id.is_empty() {
        return None
    }

    let name = labeled_free_text( &NAME_RE, block)?;
    let (latitude, longitude) = LOCATION_RE.captures( block).and_then( |caps| {
        Some( (parse_f64( caps.name("lat")?.as_str())?, parse_f64( caps.name("lon")?.as_str())?) )
    })?;

    let altitude = labeled_f64( &ALTITUDE_RE, block).unwrap_or(0.0);
    let speed = labeled_f64( &SPEED_RE, block).unwrap_or(0.0);
    let course = labeled_f64( &COURSE_RE, block).unwrap_or(0.0);
    let reported_age_ms = labeled_u64( &LAST_UPDATE_RE, block).unwrap_or(0);

    // relayed values, might get replaced by our own fusion
    let distance = labeled_f64( &DISTANCE_RE, block).map( Length::new::<meter>);
    let relative_altitude = labeled_f64( &REL_ALTITUDE_RE, block).map( Length::new::<meter>);

    Some( PeerReading {
        id: id.to_string(),
        name: name.to_string(),
        latitude,
        longitude,
        altitude: Length::new::<meter>(altitude),
        speed: Velocity::new::<kilometer_per_hour>(speed),
        course: Angle360::from_degrees(course),
        reported_age_ms,
        distance,
        relative_altitude,
        bearing: None
    })
}
