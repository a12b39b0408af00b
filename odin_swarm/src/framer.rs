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

use memchr::memchr;

/// splits an unbounded text stream into blank-line separated records.
///
/// Fragments can be cut at arbitrary positions - whatever follows the last record delimiter is kept in
/// the residual buffer until a later fragment completes it. A delimiter is a line break that is directly
/// followed by another line break, where line breaks can be either `\n` or `\r\n`.
///
/// Note there is no limit for the residual buffer, i.e. a source that never sends a blank line will make it
/// grow without bounds. Callers that need a ceiling have to check [`RecordFramer::residual_len`]
#[derive(Debug,Default)]
pub struct RecordFramer {
    residual: String,
    scan_pos: usize, // no delimiter starts before this byte offset of residual
}

impl RecordFramer {
    pub fn new ()->Self {
        RecordFramer { residual: String::with_capacity(4096), scan_pos: 0 }
    }

    /// append `fragment` and return an iterator over the records that are now complete.
    /// Records that are not pulled from the iterator stay buffered and are returned by the next `feed`
    pub fn feed<'a> (&'a mut self, fragment: &str)->Records<'a> {
        self.residual.push_str( fragment);
        Records { framer: self }
    }

    pub fn residual (&self)->&str { self.residual.as_str() }
    pub fn residual_len (&self)->usize { self.residual.len() }

    /// drop whatever is buffered (e.g. when the stream is closed)
    pub fn clear (&mut self) {
        self.residual.clear();
        self.scan_pos = 0;
    }

    fn next_record (&mut self)->Option<String> {
        while let Some((rec_end, delim_end)) = self.find_delimiter() {
            let rec = &self.residual[..rec_end];
            let rec = rec.strip_suffix('\r').unwrap_or(rec);
            let record = if rec.trim().is_empty() { None } else { Some(rec.to_string()) };

            self.residual.replace_range( ..delim_end, "");
            self.scan_pos = 0;

            if record.is_some() { return record } // whitespace-only records are skipped
        }
        None
    }

    /// return (record end, delimiter end) byte offsets of the first delimiter in the residual buffer
    fn find_delimiter (&mut self)->Option<(usize,usize)> {
        let bytes = self.residual.as_bytes();
        let mut pos = self.scan_pos;

        while let Some(i) = memchr( b'\n', &bytes[pos..]) {
            let nl = pos + i;
            let rest = &bytes[nl+1..];

            if rest.starts_with( b"\n") {
                return Some( (nl, nl+2) )
            } else if rest.starts_with( b"\r\n") {
                return Some( (nl, nl+3) )
            } else if rest.is_empty() || rest == b"\r" {
                self.scan_pos = nl; // could still become a delimiter with the next fragment
                return None
            }
            pos = nl+1;
        }

        self.scan_pos = bytes.len();
        None
    }
}

/// the lazy sequence of records that are complete after a [`RecordFramer::feed`]
pub struct Records<'a> {
    framer: &'a mut RecordFramer
}

impl Iterator for Records<'_> {
    type Item = String;

    fn next (&mut self)->Option<String> {
        self.framer.next_record()
    }
}
