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

use odin_swarm::framer::RecordFramer;

const STREAM: &str = "GPS Latitude: 39.0\nGPS Longitude: -76.0\nGPS Altitude: 100 m\nGPS Speed: 20 km/h\n\n\
ID: A1\nName: Scout\nLocation: 39.001, -76.0\nCourse: 400°\n\n\
ID: B2\nName: Relay\nLocation: 39.002, -76.001\nID: C3\nName: Mapper\nLocation: 39.0, -76.002\n\n";

fn feed_all (framer: &mut RecordFramer, fragments: &[&str])->Vec<String> {
    let mut records = Vec::new();
    for frag in fragments {
        records.extend( framer.feed( frag));
    }
    records
}

// run with "cargo test test_framer -- --nocapture"

#[test]
fn test_framer_single_feed() {
    let mut framer = RecordFramer::new();
    let records: Vec<String> = framer.feed( "A\n\nB\nB2\n\nC").collect();

    println!("records: {records:?}, residual: {:?}", framer.residual());
    assert_eq!( records, vec!["A", "B\nB2"]);
    assert_eq!( framer.residual(), "C");
}

#[test]
fn test_framer_fragmentation_invariance() {
    let mut framer = RecordFramer::new();
    let expected = feed_all( &mut framer, &[STREAM]);
    assert_eq!( expected.len(), 3);
    assert!( framer.residual().is_empty());

    // every possible two-way split
    for i in 0..=STREAM.len() {
        if !STREAM.is_char_boundary(i) { continue }
        let mut framer = RecordFramer::new();
        let records = feed_all( &mut framer, &[&STREAM[..i], &STREAM[i..]]);
        assert_eq!( records, expected, "split at {i}");
        assert!( framer.residual().is_empty());
    }

    // one char at a time
    let chars: Vec<String> = STREAM.chars().map( |c| c.to_string()).collect();
    let fragments: Vec<&str> = chars.iter().map( |s| s.as_str()).collect();
    let mut framer = RecordFramer::new();
    assert_eq!( feed_all( &mut framer, &fragments), expected);
}

#[test]
fn test_framer_residual_preservation() {
    let mut framer = RecordFramer::new();

    assert_eq!( framer.feed( "ID: A1\nName: Sc").count(), 0);
    assert_eq!( framer.residual(), "ID: A1\nName: Sc");

    assert_eq!( framer.feed( "out\n").count(), 0);
    assert_eq!( framer.residual(), "ID: A1\nName: Scout\n");

    let records: Vec<String> = framer.feed( "\nID: B2").collect();
    assert_eq!( records, vec!["ID: A1\nName: Scout"]);
    assert_eq!( framer.residual(), "ID: B2");
}

#[test]
fn test_framer_skips_blank_records() {
    let mut framer = RecordFramer::new();
    let records: Vec<String> = framer.feed( "\n\n  \n\nA\n\n\n\n\t\n\nB\n\n").collect();
    assert_eq!( records, vec!["A", "B"]);
    assert_eq!( framer.residual(), "");
}

#[test]
fn test_framer_crlf() {
    let mut framer = RecordFramer::new();
    let records: Vec<String> = framer.feed( "A\r\nA2\r\n\r\nB\r\n\r\n").collect();
    assert_eq!( records, vec!["A\r\nA2", "B"]);

    // delimiter split between '\r' and '\n'
    let mut framer = RecordFramer::new();
    assert_eq!( framer.feed( "C\r\n\r").count(), 0);
    let records: Vec<String> = framer.feed( "\nD").collect();
    assert_eq!( records, vec!["C"]);
    assert_eq!( framer.residual(), "D");
}

#[test]
fn test_framer_keeps_unpulled_records() {
    let mut framer = RecordFramer::new();
    {
        let mut records = framer.feed( "A\n\nB\n\n");
        assert_eq!( records.next().as_deref(), Some("A"));
    }
    let records: Vec<String> = framer.feed( "").collect();
    assert_eq!( records, vec!["B"]);
}

#[test]
fn test_framer_clear() {
    let mut framer = RecordFramer::new();
    assert_eq!( framer.feed( "ID: A1\nName: Scout\n").count(), 0);
    assert!( framer.residual_len() > 0);

    framer.clear();
    assert_eq!( framer.residual_len(), 0);

    // nothing of the dropped input is replayed
    let records: Vec<String> = framer.feed( "ID: B2\n\n").collect();
    assert_eq!( records, vec!["ID: B2"]);
}
