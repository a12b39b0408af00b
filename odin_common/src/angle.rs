/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
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

use std::{fmt::{self,Write}, cmp};
use serde::{Serialize,Deserialize};

/// reduce degrees into [0,360). Note that we do not rely on the sign semantics of `%`, which
/// keeps the sign of the dividend (-30 % 360 == -30)
#[inline]
pub fn normalize_360 (d: f64) -> f64 {
    ((d % 360.0) + 360.0) % 360.0
}

/// a full circle angle such as a heading, course or bearing, always kept in [0,360) degrees
#[derive(Copy,Clone,Default,Serialize,Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Angle360 {
    value: f64
}

impl Angle360 {
    pub const ZERO: Angle360 = Angle360 { value: 0.0 };

    #[inline]
    pub fn from_degrees (deg: f64) -> Self {
        Angle360 { value: normalize_360(deg) }
    }

    #[inline]
    pub fn from_radians (rad: f64) -> Self {
        Angle360 { value: normalize_360(rad.to_degrees()) }
    }

    #[inline] pub fn degrees (&self)->f64 { self.value }
    #[inline] pub fn radians (&self)->f64 { self.value.to_radians() }
}

impl From<f64> for Angle360 {
    fn from (deg: f64)->Self { Angle360::from_degrees(deg) }
}

impl From<Angle360> for f64 {
    fn from (a: Angle360)->Self { a.value }
}

/// honors precision, width, fill and alignment (right aligned by default, like numbers)
impl fmt::Display for Angle360 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match f.precision() {
            Some(p) => format!("{:.*}°", p, self.value),
            None => format!("{}°", self.value)
        };

        let pad = f.width().map_or( 0, |w| w.saturating_sub( s.chars().count()));
        let (pre, post) = match f.align() {
            Some(fmt::Alignment::Left) => (0, pad),
            Some(fmt::Alignment::Center) => (pad/2, pad - pad/2),
            _ => (pad, 0)
        };
        let fill = f.fill();

        for _ in 0..pre { f.write_char( fill)?; }
        f.write_str( &s)?;
        for _ in 0..post { f.write_char( fill)?; }
        Ok(())
    }
}

impl fmt::Debug for Angle360 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Angle360({})", self.value) }
}

impl cmp::PartialEq for Angle360 {
    fn eq(&self, other: &Self) -> bool { self.value == other.value }
}

impl cmp::PartialOrd for Angle360 {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> { self.value.partial_cmp(&other.value) }
}
