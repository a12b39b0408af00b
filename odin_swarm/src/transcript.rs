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

use odin_common::collections::RingBuffer;

/// the last N non-empty raw lines of the records we received, oldest first
#[derive(Debug,Clone)]
pub struct Transcript {
    lines: RingBuffer<String>
}

impl Transcript {
    pub fn new (max_lines: usize)->Self {
        Transcript { lines: RingBuffer::new( max_lines) }
    }

    pub fn push_record (&mut self, record: &str) {
        for line in record.lines() {
            let line = line.trim_end();
            if !line.is_empty() {
                self.lines.push( line.to_string());
            }
        }
    }

    pub fn lines (&self)->impl Iterator<Item=&str> { self.lines.iter().map( |s| s.as_str()) }

    pub fn len (&self)->usize { self.lines.len() }
    pub fn is_empty (&self)->bool { self.lines.is_empty() }

    pub fn text (&self)->String { self.lines.to_vec().join("\n") }

    pub fn clear (&mut self) { self.lines.clear() }
}

impl Default for Transcript {
    fn default()->Self { Transcript::new(20) }
}
