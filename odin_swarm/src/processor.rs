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

use std::{fmt, ops::AddAssign};
use tracing::{debug,warn};
use odin_common::datetime::EpochMillis;

use crate::{
    framer::RecordFramer, telemetry::parse_record, fuse::enrich,
    store::{SharedStore, write_store}
};

/// what a `process` call did
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct ProcessStats {
    pub records: usize,
    pub observers: usize, // records with observer reading
    pub peers: usize,     // merged peer readings
}

impl AddAssign for ProcessStats {
    fn add_assign (&mut self, other: Self) {
        self.records += other.records;
        self.observers += other.observers;
        self.peers += other.peers;
    }
}

impl fmt::Display for ProcessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "records: {}, observers: {}, peers: {}", self.records, self.observers, self.peers)
    }
}

/// turns text fragments into store updates: framing, parsing, fusion and merge.
/// This is the only writer of the store
pub struct TelemetryProcessor {
    framer: RecordFramer,
    store: SharedStore,
    max_residual: usize, // 0: no warning
    residual_warned: bool,
}

impl TelemetryProcessor {
    pub fn new (store: SharedStore)->Self {
        TelemetryProcessor { framer: RecordFramer::new(), store, max_residual: 0, residual_warned: false }
    }

    /// warn (once per overrun) if unterminated input grows beyond `max_residual` bytes
    pub fn with_max_residual (mut self, max_residual: usize)->Self {
        self.max_residual = max_residual;
        self
    }

    pub fn residual (&self)->&str { self.framer.residual() }

    /// feed the next fragment of the stream. Each record that is completed by it is applied to the
    /// store with the same `arrival` time
    pub fn process (&mut self, fragment: &str, arrival: EpochMillis)->ProcessStats {
        let mut stats = ProcessStats::default();
        for record in self.framer.feed( fragment) {
            stats += apply_record( &self.store, &record, arrival);
        }
        self.check_residual();
        stats
    }

    /// parse, fuse and merge a single record that was framed elsewhere
    pub fn process_record (&mut self, record: &str, arrival: EpochMillis)->ProcessStats {
        apply_record( &self.store, record, arrival)
    }

    /// drop buffered input (e.g. after the connection was closed). The store is not changed
    pub fn reset (&mut self) {
        if !self.framer.residual().is_empty() {
            debug!("discarding {} bytes of unterminated input", self.framer.residual_len());
        }
        self.framer.clear();
        self.residual_warned = false;
    }

    fn check_residual (&mut self) {
        if self.max_residual > 0 {
            let len = self.framer.residual_len();
            if len > self.max_residual {
                if !self.residual_warned {
                    warn!("unterminated telemetry input exceeds {} bytes ({})", self.max_residual, len);
                    self.residual_warned = true;
                }
            } else {
                self.residual_warned = false;
            }
        }
    }
}

fn apply_record (store: &SharedStore, record: &str, arrival: EpochMillis)->ProcessStats {
    let mut parsed = parse_record( record);
    enrich( parsed.observer.as_ref(), &mut parsed.peers);

    let observers = if parsed.observer.is_some() { 1 } else { 0 };
    let peers = write_store( store).apply( record, parsed, arrival);

    ProcessStats { records: 1, observers, peers }
}
