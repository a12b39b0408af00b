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

use uom::si::{f64::Length, length::meter};
use odin_common::{angle::Angle360, geo::{haversine_distance, initial_bearing}, round_to};

use crate::{ObserverReading, PeerReading};

/// observer to peer great circle distance rounded to cm. This is what we store in the reading
pub fn fused_distance (observer: &ObserverReading, peer: &PeerReading)->Length {
    let d = haversine_distance( &observer.position(), &peer.position());
    Length::new::<meter>( round_to( d.get::<meter>(), 2))
}

/// observer to peer distance rounded to whole meters, for list and map labels
pub fn display_distance (observer: &ObserverReading, peer: &PeerReading)->Length {
    let d = haversine_distance( &observer.position(), &peer.position());
    Length::new::<meter>( d.get::<meter>().round())
}

/// signed altitude difference, negative if the peer is below the observer
pub fn relative_altitude (observer: &ObserverReading, peer: &PeerReading)->Length {
    peer.altitude - observer.altitude
}

/// forward azimuth from observer to peer. Coincident positions yield 0°
pub fn bearing (observer: &ObserverReading, peer: &PeerReading)->Angle360 {
    initial_bearing( &observer.position(), &peer.position())
}

/// set distance, relative altitude and bearing of all `peers` if we have an observer reading, replacing
/// whatever the source relayed. Without observer the peers are left as they are.
/// Returns the number of enriched peers
pub fn enrich (observer: Option<&ObserverReading>, peers: &mut [PeerReading])->usize {
    let Some(observer) = observer else { return 0 };

    for peer in peers.iter_mut() {
        peer.distance = Some( fused_distance( observer, peer));
        peer.relative_altitude = Some( relative_altitude( observer, peer));
        peer.bearing = Some( bearing( observer, peer));
    }
    peers.len()
}
