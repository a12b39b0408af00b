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

use std::{collections::HashMap, sync::{Arc,PoisonError,RwLock,RwLockReadGuard,RwLockWriteGuard}, time::Duration};
use serde::Serialize;
use tracing::debug;
use odin_common::datetime::EpochMillis;

use crate::{ObserverReading, PeerReading, ParseResult, transcript::Transcript, errors::Result};

/// the last reading we got for a drone, together with the time we received it
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct DroneEntry {
    pub reading: PeerReading,
    pub last_update: EpochMillis, // our reception time, not the age reported by the source
}

impl DroneEntry {
    pub fn id (&self)->&str { self.reading.id.as_str() }

    pub fn age (&self, now: EpochMillis)->Duration { now.duration_since( self.last_update) }

    pub fn is_stale (&self, now: EpochMillis, threshold: Duration)->bool { self.age(now) > threshold }
}

/// the table of known drones, keyed by id.
///
/// Merging a reading replaces the whole entry for its id - fields that were defaulted in the new reading
/// do not fall back to previous values. Entries are never dropped by a merge, staleness is computed at
/// read time and it is up to the caller to decide what to do with stale drones
#[derive(Debug,Clone,Default)]
pub struct DroneStore {
    drones: HashMap<String,DroneEntry>
}

impl DroneStore {
    pub fn new ()->Self { DroneStore { drones: HashMap::new() } }

    /// insert or replace the entries for `peers`, returning the number of merged readings.
    /// The last update time of an entry never goes backwards, even if `arrival` does
    pub fn merge (&mut self, peers: impl IntoIterator<Item=PeerReading>, arrival: EpochMillis)->usize {
        let mut n = 0;
        for reading in peers {
            let last_update = match self.drones.get( &reading.id) {
                Some(e) => e.last_update.max( arrival),
                None => arrival
            };
            debug!("merge drone {} at {}", reading.id, last_update);
            self.drones.insert( reading.id.clone(), DroneEntry { reading, last_update });
            n += 1;
        }
        n
    }

    pub fn get (&self, id: &str)->Option<&DroneEntry> { self.drones.get(id) }

    pub fn len (&self)->usize { self.drones.len() }
    pub fn is_empty (&self)->bool { self.drones.is_empty() }

    /// all known ids in ascending order
    pub fn ids (&self)->Vec<String> {
        let mut ids: Vec<String> = self.drones.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// entries in unspecified order
    pub fn iter (&self)->impl Iterator<Item=&DroneEntry> { self.drones.values() }

    /// time since we last received a reading for `id`
    pub fn age_of (&self, id: &str, now: EpochMillis)->Option<Duration> {
        self.drones.get(id).map( |e| e.age(now))
    }

    pub fn stale_ids (&self, now: EpochMillis, threshold: Duration)->Vec<String> {
        let mut ids: Vec<String> = self.drones.values()
            .filter( |e| e.is_stale( now, threshold))
            .map( |e| e.reading.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// explicit eviction for callers that want it - this is never done implicitly
    pub fn remove_stale (&mut self, now: EpochMillis, threshold: Duration)->Vec<String> {
        let ids = self.stale_ids( now, threshold);
        for id in &ids {
            self.drones.remove( id);
        }
        ids
    }

    /// a copy of all entries sorted by id
    pub fn snapshot (&self)->Vec<DroneEntry> {
        let mut entries: Vec<DroneEntry> = self.drones.values().cloned().collect();
        entries.sort_by( |a,b| a.reading.id.cmp( &b.reading.id));
        entries
    }

    pub fn to_json (&self)->Result<String> {
        Ok( serde_json::to_string( &self.snapshot())? )
    }

    pub fn clear (&mut self) { self.drones.clear() }
}

/// everything a presentation layer needs: the current observer reading, the known drones and the raw
/// transcript of what we received
#[derive(Debug,Clone,Default)]
pub struct SwarmStore {
    pub observer: Option<ObserverReading>,
    pub drones: DroneStore,
    pub transcript: Transcript,
    pub last_record: Option<EpochMillis>,
}

impl SwarmStore {
    pub fn new (transcript_lines: usize)->Self {
        SwarmStore {
            observer: None,
            drones: DroneStore::new(),
            transcript: Transcript::new( transcript_lines),
            last_record: None
        }
    }

    /// update the store with the (already fused) result of one record. An observer reading replaces
    /// the previous one as a whole, a record without observer leaves it unchanged.
    /// Returns the number of merged peers
    pub fn apply (&mut self, record: &str, parsed: ParseResult, arrival: EpochMillis)->usize {
        self.transcript.push_record( record);
        self.last_record = Some(arrival);

        if let Some(obs) = parsed.observer {
            self.observer = Some(obs);
        }
        self.drones.merge( parsed.peers, arrival)
    }

    pub fn clear (&mut self) {
        self.observer = None;
        self.drones.clear();
        self.transcript.clear();
        self.last_record = None;
    }
}

/// the store is written by a single processor and read by any number of presentation tasks
pub type SharedStore = Arc<RwLock<SwarmStore>>;

pub fn new_shared_store (transcript_lines: usize)->SharedStore {
    Arc::new( RwLock::new( SwarmStore::new( transcript_lines)))
}

// all updates happen in `apply`, a poisoned lock does not mean a half-applied record

pub fn read_store (store: &SharedStore)->RwLockReadGuard<'_,SwarmStore> {
    store.read().unwrap_or_else( PoisonError::into_inner)
}

pub fn write_store (store: &SharedStore)->RwLockWriteGuard<'_,SwarmStore> {
    store.write().unwrap_or_else( PoisonError::into_inner)
}

/// human readable staleness ("350 ms ago", "12 seconds ago", "3 minutes ago")
pub fn format_age (age: Duration)->String {
    let ms = age.as_millis();
    if ms < 1000 {
        format!("{} ms ago", ms)
    } else if ms < 60_000 {
        format!("{} seconds ago", ms / 1000)
    } else {
        format!("{} minutes ago", ms / 60_000)
    }
}
