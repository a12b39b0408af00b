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
#![allow(non_snake_case)]

//! great circle computations on a spherical earth model with radius `MEAN_EARTH_RADIUS`.
//! This is accurate to about 0.5% which is more than enough for relative positions of nearby
//! vehicles. Use an ellipsoid model if you need survey grade distances.

use std::fmt;
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::meter};

use crate::angle::Angle360;
use crate::geo_constants::MEAN_EARTH_RADIUS;

/// a surface position in geodetic degrees
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64
}

impl GeoPoint {
    pub fn from_lon_lat_degrees (longitude: f64, latitude: f64)->Self {
        GeoPoint { longitude, latitude }
    }

    pub fn from_lat_lon_degrees (latitude: f64, longitude: f64)->Self {
        GeoPoint { longitude, latitude }
    }

    #[inline] pub fn lat_rad (&self)->f64 { self.latitude.to_radians() }
    #[inline] pub fn lon_rad (&self)->f64 { self.longitude.to_radians() }

    pub fn haversine_distance_to (&self, other: &GeoPoint)->Length { haversine_distance( self, other) }

    pub fn bearing_to (&self, other: &GeoPoint)->Angle360 { initial_bearing( self, other) }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "[{:.*},{:.*}]", p, self.latitude, p, self.longitude),
            None => write!(f, "[{},{}]", self.latitude, self.longitude)
        }
    }
}

/// great circle distance between two points using the haversine formula
pub fn haversine_distance (p1: &GeoPoint, p2: &GeoPoint)->Length {
    let φ1 = p1.lat_rad();
    let φ2 = p2.lat_rad();
    let Δφ = (p2.latitude - p1.latitude).to_radians();
    let Δλ = (p2.longitude - p1.longitude).to_radians();

    let sin_Δφ = (Δφ / 2.0).sin();
    let sin_Δλ = (Δλ / 2.0).sin();
    let a = (sin_Δφ * sin_Δφ + φ1.cos() * φ2.cos() * sin_Δλ * sin_Δλ).clamp( 0.0, 1.0); // rounding can push a above 1
    let c = 2.0 * a.sqrt().atan2( (1.0 - a).sqrt());

    Length::new::<meter>( MEAN_EARTH_RADIUS * c)
}

/// forward azimuth at `p1` of the great circle from `p1` to `p2`.
/// Coincident points yield 0 (atan2(0,0))
pub fn initial_bearing (p1: &GeoPoint, p2: &GeoPoint)->Angle360 {
    let φ1 = p1.lat_rad();
    let φ2 = p2.lat_rad();
    let Δλ = (p2.longitude - p1.longitude).to_radians();

    let y = Δλ.sin() * φ2.cos();
    let x = φ1.cos() * φ2.sin() - φ1.sin() * φ2.cos() * Δλ.cos();

    Angle360::from_radians( y.atan2(x))
}
