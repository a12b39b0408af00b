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

//! import of drone swarm beacon telemetry.
//!
//! The beacon (ground station) sends a continuous text stream of blank-line separated records, each of
//! which can contain a reading of the receiver's own GPS position and any number of peer (drone) blocks.
//! Processing is split into
//!   - [`framer`]: cutting the unbounded stream into complete records
//!   - [`telemetry`]: tolerant extraction of observer and peer readings from a record
//!   - [`fuse`]: distance, bearing and relative altitude from observer to peers
//!   - [`store`]: merging peer readings into the table of known drones
//!
//! None of these raise errors for malformed input - missing or garbled fields degrade to defaults or
//! to omitted readings. Only the transport ([`connector`]) and configuration can fail.

use std::fmt;
use serde::{Serialize,Serializer};
use uom::si::{f64::{Length,Velocity}, length::meter, velocity::kilometer_per_hour};
use odin_common::{angle::Angle360, geo::GeoPoint};

pub mod errors;
pub mod config;
pub mod framer;
pub mod telemetry;
pub mod fuse;
pub mod transcript;
pub mod store;
pub mod processor;
pub mod connector;

pub use config::{SwarmConfig, load_config};
pub use store::{DroneStore, DroneEntry, SwarmStore, SharedStore, new_shared_store, format_age};
pub use connector::TelemetryConnector;
pub use processor::{TelemetryProcessor, ProcessStats};

/// the position and ground speed of the receiving station ("my GPS").
/// A new reading always replaces the previous one as a whole
#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
pub struct ObserverReading {
    pub latitude: f64,  // degrees
    pub longitude: f64, // degrees
    #[serde(serialize_with="ser_meters")]
    pub altitude: Length,
    #[serde(serialize_with="ser_kmh")]
    pub speed: Velocity,
}

impl ObserverReading {
    pub fn new (latitude: f64, longitude: f64, altitude_m: f64, speed_kmh: f64)->Self {
        ObserverReading {
            latitude,
            longitude,
            altitude: Length::new::<meter>(altitude_m),
            speed: Velocity::new::<kilometer_per_hour>(speed_kmh)
        }
    }

    pub fn position (&self)->GeoPoint { GeoPoint::from_lat_lon_degrees( self.latitude, self.longitude) }
}

impl fmt::Display for ObserverReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Observer( pos: [{:.6},{:.6}], alt: {:.1}m, spd: {:.1}km/h )",
            self.latitude, self.longitude, self.altitude.get::<meter>(), self.speed.get::<kilometer_per_hour>())
    }
}

/// snapshot of a peer vehicle as reported in one telemetry record.
/// `distance`, `relative_altitude` and `bearing` are relative to the observer and only set if either
/// the source stamped them into the record or the same record contained an observer reading
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct PeerReading {
    pub id: String,
    pub name: String,

    pub latitude: f64,  // degrees
    pub longitude: f64, // degrees
    #[serde(serialize_with="ser_meters")]
    pub altitude: Length,
    #[serde(serialize_with="ser_kmh")]
    pub speed: Velocity,
    pub course: Angle360,
    pub reported_age_ms: u64, // as reported by the source, *not* our reception time

    #[serde(skip_serializing_if="odin_common::is_none", serialize_with="ser_opt_meters")]
    pub distance: Option<Length>,
    #[serde(skip_serializing_if="odin_common::is_none", serialize_with="ser_opt_meters")]
    pub relative_altitude: Option<Length>,
    #[serde(skip_serializing_if="odin_common::is_none")]
    pub bearing: Option<Angle360>,
}

impl PeerReading {
    /// a reading with all optional fields set to their defaults
    pub fn new (id: impl ToString, name: impl ToString, latitude: f64, longitude: f64)->Self {
        PeerReading {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            altitude: Length::new::<meter>(0.0),
            speed: Velocity::new::<kilometer_per_hour>(0.0),
            course: Angle360::ZERO,
            reported_age_ms: 0,
            distance: None,
            relative_altitude: None,
            bearing: None
        }
    }

    pub fn position (&self)->GeoPoint { GeoPoint::from_lat_lon_degrees( self.latitude, self.longitude) }

    pub fn altitude_m (&self)->f64 { self.altitude.get::<meter>() }
    pub fn speed_kmh (&self)->f64 { self.speed.get::<kilometer_per_hour>() }
    pub fn distance_m (&self)->Option<f64> { self.distance.map( |d| d.get::<meter>()) }
    pub fn relative_altitude_m (&self)->Option<f64> { self.relative_altitude.map( |d| d.get::<meter>()) }
}

impl fmt::Display for PeerReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Peer( id: {}, name: \"{}\", pos: [{:.6},{:.6}], alt: {:.1}m, spd: {:.1}km/h, crs: {:.0}",
            self.id, self.name, self.latitude, self.longitude, self.altitude_m(), self.speed_kmh(), self.course)?;
        if self.reported_age_ms > 0 { write!( f, ", age: {}ms", self.reported_age_ms)?; }
        if let Some(d) = self.distance_m() { write!( f, ", dist: {:.2}m", d)?; }
        if let Some(d) = self.relative_altitude_m() { write!( f, ", rel_alt: {:.1}m", d)?; }
        if let Some(b) = self.bearing { write!( f, ", brg: {:.0}", b)?; }
        write!( f, " )")
    }
}

/// what we extracted from a single record. Both parts are optional - an empty result is not an error
#[derive(Debug,Clone,Default,PartialEq)]
pub struct ParseResult {
    pub observer: Option<ObserverReading>,
    pub peers: Vec<PeerReading>
}

impl ParseResult {
    pub fn is_empty (&self)->bool { self.observer.is_none() && self.peers.is_empty() }
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.observer {
            Some(obs) => writeln!( f, "{obs}")?,
            None => writeln!( f, "Observer( none )")?
        }
        for peer in &self.peers {
            writeln!( f, "  {peer}")?;
        }
        Ok(())
    }
}

//--- serialization helpers (we want plain numbers in the units of the wire format)

fn ser_meters<S: Serializer> (len: &Length, s: S)->Result<S::Ok,S::Error> {
    s.serialize_f64( len.get::<meter>())
}

fn ser_opt_meters<S: Serializer> (len: &Option<Length>, s: S)->Result<S::Ok,S::Error> {
    match len {
        Some(len) => s.serialize_some( &len.get::<meter>()),
        None => s.serialize_none()
    }
}

fn ser_kmh<S: Serializer> (v: &Velocity, s: S)->Result<S::Ok,S::Error> {
    s.serialize_f64( v.get::<kilometer_per_hour>())
}
