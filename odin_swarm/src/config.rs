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

use std::{fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize,de::DeserializeOwned};
use odin_common::datetime::{secs,millis};
use crate::errors::{OdinSwarmError,Result};

/// configuration for a telemetry import. Missing fields in a config file get their default values
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct SwarmConfig {
    pub source: String,            // "tcp://host:port", a file path or "-" for stdin
    pub read_buffer: usize,        // max bytes per transport read
    pub transcript_lines: usize,   // number of raw record lines we keep for display
    pub stale_after: Duration,     // presentation threshold for flagging drones that did not update
    pub max_residual: usize,       // warn if unterminated input exceeds this many bytes (0: never)
    pub update_interval: Duration, // how often monitors refresh
}

impl Default for SwarmConfig {
    fn default()->Self {
        SwarmConfig {
            source: "-".to_string(),
            read_buffer: 4096,
            transcript_lines: 20,
            stale_after: secs(30),
            max_residual: 65536,
            update_interval: millis(1000),
        }
    }
}

/// read a RON config file
pub fn load_config <C: DeserializeOwned> (path: impl AsRef<Path>)->Result<C> {
    let path = path.as_ref();
    if path.is_file() {
        let contents = fs::read_to_string(path)?;
        ron::from_str::<C>( contents.as_str()).map_err( |e| OdinSwarmError::ConfigParseError( format!("{}: {}", path.display(), e)))
    } else {
        Err( OdinSwarmError::ConfigFileNotFound( path.display().to_string()) )
    }
}
