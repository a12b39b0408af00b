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

use std::{fmt, path::PathBuf, sync::Arc};
use tokio::{self, net::TcpStream, io::{AsyncRead, AsyncReadExt}, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{info,warn,error};
use odin_common::datetime::EpochMillis;

use crate::errors::{Result, OdinSwarmError, op_failed};
use crate::{SwarmConfig, SharedStore, TelemetryProcessor, ProcessStats};

/// where telemetry text comes from
#[derive(Debug,Clone,PartialEq)]
pub enum TelemetrySource {
    Tcp(String), // host:port
    File(PathBuf),
    Stdin
}

impl TelemetrySource {
    /// "tcp://host:port", "-" for stdin, everything without a scheme is a file path
    pub fn parse (url: &str)->Result<Self> {
        let url = url.trim();
        if url == "-" {
            Ok( TelemetrySource::Stdin )
        } else if let Some(addr) = url.strip_prefix("tcp://") {
            if addr.is_empty() {
                Err( OdinSwarmError::UnsupportedSource( url.to_string()) )
            } else {
                Ok( TelemetrySource::Tcp( addr.to_string()) )
            }
        } else if url.is_empty() || url.contains("://") {
            Err( OdinSwarmError::UnsupportedSource( url.to_string()) )
        } else {
            Ok( TelemetrySource::File( PathBuf::from(url)) )
        }
    }
}

impl fmt::Display for TelemetrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetrySource::Tcp(addr) => write!( f, "tcp://{}", addr),
            TelemetrySource::File(path) => write!( f, "{}", path.display()),
            TelemetrySource::Stdin => write!( f, "-")
        }
    }
}

pub type TelemetryReader = Box<dyn AsyncRead + Unpin + Send>;

pub async fn open_source (source: &TelemetrySource)->Result<TelemetryReader> {
    let reader: TelemetryReader = match source {
        TelemetrySource::Tcp(addr) => Box::new( TcpStream::connect( addr.as_str()).await? ),
        TelemetrySource::File(path) => Box::new( tokio::fs::File::open( path).await? ),
        TelemetrySource::Stdin => Box::new( tokio::io::stdin() )
    };
    Ok(reader)
}

/// incremental UTF-8 decoding of byte chunks that can split multi-byte characters.
/// Invalid sequences are replaced with U+FFFD, incomplete ones at the end of a chunk are kept for the next
#[derive(Debug,Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>
}

impl Utf8Decoder {
    pub fn new ()->Self { Utf8Decoder { pending: Vec::with_capacity(4) } }

    pub fn decode (&mut self, bytes: &[u8])->String {
        self.pending.extend_from_slice( bytes);

        let buf = self.pending.as_slice();
        let mut text = String::with_capacity( buf.len());
        let mut pos = 0;
        let mut n_invalid = 0;

        while pos < buf.len() {
            match std::str::from_utf8( &buf[pos..]) {
                Ok(s) => {
                    text.push_str( s);
                    pos = buf.len();
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    text.push_str( &String::from_utf8_lossy( &buf[pos..pos+valid]));
                    match e.error_len() {
                        Some(len) => { // invalid sequence
                            text.push( char::REPLACEMENT_CHARACTER);
                            n_invalid += 1;
                            pos += valid + len;
                        }
                        None => { // incomplete at end of chunk
                            pos += valid;
                            break;
                        }
                    }
                }
            }
        }

        if n_invalid > 0 {
            warn!("replaced {} invalid UTF-8 sequence(s) in telemetry input", n_invalid);
        }
        self.pending.drain( ..pos);
        text
    }

    /// number of bytes waiting for the rest of their character
    pub fn pending_len (&self)->usize { self.pending.len() }
}

/// read `reader` until EOF or cancellation and feed everything into `processor`.
/// Whatever is buffered at that point (unterminated record or partial character) is dropped - it is never
/// replayed. Read errors are returned, parse problems never are
pub async fn process_stream<R> (mut reader: R, processor: &mut TelemetryProcessor, buf_size: usize, cancel: &CancellationToken)->Result<ProcessStats>
    where R: AsyncRead + Unpin
{
    let mut buf = vec![0u8; buf_size.max(1)];
    let mut decoder = Utf8Decoder::new();
    let mut stats = ProcessStats::default();

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                processor.reset();
                return Ok(stats)
            }
            res = reader.read( &mut buf) => {
                match res {
                    Ok(0) => {
                        processor.reset();
                        return Ok(stats)
                    }
                    Ok(len) => {
                        let text = decoder.decode( &buf[..len]);
                        stats += processor.process( &text, EpochMillis::now());
                    }
                    Err(e) => {
                        error!("telemetry read failed: {}", e);
                        processor.reset();
                        return Err( e.into() )
                    }
                }
            }
        }
    }
}

/// runs the import of a configured telemetry source as a tokio task that updates a shared store
pub struct TelemetryConnector {
    config: Arc<SwarmConfig>,
    store: SharedStore,
    task: Option<JoinHandle<Result<ProcessStats>>>,
    cancel: CancellationToken,
}

impl TelemetryConnector {
    pub fn new (config: Arc<SwarmConfig>, store: SharedStore)->Self {
        TelemetryConnector { config, store, task: None, cancel: CancellationToken::new() }
    }

    /// spawn the import task. This has to be called from within a tokio runtime
    pub fn start (&mut self)->Result<()> {
        if self.is_running() {
            return Err( op_failed!("telemetry connector for {} already running", self.config.source) )
        }

        let source = TelemetrySource::parse( &self.config.source)?;
        let mut processor = TelemetryProcessor::new( self.store.clone()).with_max_residual( self.config.max_residual);
        let buf_size = self.config.read_buffer;
        let cancel = CancellationToken::new();
        self.cancel = cancel.clone();

        let task = tokio::spawn( async move { run_import( source, &mut processor, buf_size, &cancel).await });
        self.task = Some(task);

        Ok(())
    }

    /// stop reading. Already merged records stay in the store, unterminated input is discarded
    pub fn terminate (&mut self) {
        if self.task.is_some() {
            self.cancel.cancel();
        }
    }

    pub fn is_running (&self)->bool {
        self.task.as_ref().is_some_and( |task| !task.is_finished())
    }

    /// wait for the import task to finish (EOF, error or `terminate`)
    pub async fn join (&mut self)->Result<ProcessStats> {
        match self.task.take() {
            Some(task) => task.await.map_err( |e| op_failed!("telemetry task failed: {}", e))?,
            None => Ok( ProcessStats::default() )
        }
    }
}

async fn run_import (source: TelemetrySource, processor: &mut TelemetryProcessor, buf_size: usize, cancel: &CancellationToken)->Result<ProcessStats> {
    let reader = open_source( &source).await.inspect_err( |e| error!("cannot open {}: {}", source, e))?;
    info!("telemetry import from {} started", source);

    let stats = process_stream( reader, processor, buf_size, cancel).await?;
    info!("telemetry import from {} stopped ({})", source, stats);
    Ok(stats)
}

impl Drop for TelemetryConnector {
    fn drop (&mut self) {
        self.terminate();
    }
}
