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

use tokio::{self, io::AsyncReadExt};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use odin_swarm::{
    framer::RecordFramer, telemetry::parse_record, fuse::enrich,
    connector::{TelemetrySource, Utf8Decoder, open_source}
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "print the parsed (and fused) content of each record of a swarm telemetry stream")]
pub struct Args {
    /// print peers as JSON instead of text
    #[arg(short,long)]
    pub json: bool,

    #[arg(short,long, default_value_t = 4096)]
    pub buffer: usize,

    /// "tcp://host:port", a file path or "-" for stdin
    #[arg(default_value = "-")]
    pub source: String
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("warn")))
        .with_writer( std::io::stderr)
        .init();

    let args = Args::parse();
    let source = TelemetrySource::parse( &args.source)?;
    let mut reader = open_source( &source).await?;

    let mut buf = vec![0u8; args.buffer.max(1)];
    let mut decoder = Utf8Decoder::new();
    let mut framer = RecordFramer::new();

    loop {
        let len = reader.read( &mut buf).await?;
        if len == 0 { break }

        let text = decoder.decode( &buf[..len]);
        for record in framer.feed( &text) {
            let mut res = parse_record( &record);
            enrich( res.observer.as_ref(), &mut res.peers);

            if args.json {
                println!("{}", serde_json::to_string( &res.peers)?);
            } else {
                print!("{res}");
            }
        }
    }

    if !framer.residual().trim().is_empty() {
        eprintln!("ignored unterminated input: {:?}", framer.residual());
    }
    Ok(())
}
