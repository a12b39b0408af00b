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

use std::sync::Arc;
use tokio::{self, time::interval};
use anyhow::Result;
use clap::Parser;
use uom::si::{length::meter, velocity::kilometer_per_hour};
use tracing_subscriber::EnvFilter;
use odin_common::datetime::EpochMillis;
use odin_swarm::{
    SwarmConfig, SwarmStore, TelemetryConnector, load_config, new_shared_store, format_age,
    fuse::display_distance, store::read_store
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "import a swarm telemetry stream and periodically print the known drones")]
pub struct Args {
    /// RON config file (defaults are used if not set)
    #[arg(short,long)]
    pub config: Option<String>,

    /// overrides the configured source ("tcp://host:port", file path or "-")
    #[arg(short,long)]
    pub source: Option<String>,

    /// show the last received raw lines
    #[arg(short,long)]
    pub transcript: bool,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .with_writer( std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config: SwarmConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => SwarmConfig::default()
    };
    if let Some(source) = &args.source {
        config.source = source.clone();
    }
    let config = Arc::new( config);

    let store = new_shared_store( config.transcript_lines);
    let mut connector = TelemetryConnector::new( config.clone(), store.clone());
    connector.start()?;

    let mut ticker = interval( config.update_interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                connector.terminate();
                break;
            }
            _ = ticker.tick() => {
                print_store( &read_store( &store), &config, args.transcript);
                if !connector.is_running() { break }
            }
        }
    }

    let stats = connector.join().await?;
    print_store( &read_store( &store), &config, args.transcript);
    println!("processed {stats}");

    Ok(())
}

fn print_store (store: &SwarmStore, config: &SwarmConfig, show_transcript: bool) {
    let now = EpochMillis::now();

    println!("------------------------------------------------------------------------- {now}");
    match &store.observer {
        Some(obs) => println!("my GPS: {:.6}, {:.6}  alt: {:.1} m  spd: {:.1} km/h",
            obs.latitude, obs.longitude, obs.altitude.get::<meter>(), obs.speed.get::<kilometer_per_hour>()),
        None => println!("my GPS: -")
    }

    println!("{:<8} {:<16} {:>11} {:>11} {:>8} {:>8} {:>5} {:>8} {:>8} {:>5}  {}",
        "id", "name", "lat", "lon", "alt[m]", "spd", "crs", "dist[m]", "rel[m]", "brg", "last update");

    for e in store.drones.snapshot() {
        let r = &e.reading;
        let age = e.age(now);
        let dist = match &store.observer {
            Some(obs) => Some( display_distance( obs, r).get::<meter>()),
            None => r.distance_m().map( f64::round)
        };

        println!("{:<8} {:<16} {:>11.6} {:>11.6} {:>8.1} {:>8.1} {:>5.0} {:>8} {:>8} {:>5}  {}{}",
            r.id, r.name, r.latitude, r.longitude, r.altitude_m(), r.speed_kmh(), r.course,
            opt_fmt( dist, 0), opt_fmt( r.relative_altitude_m(), 1),
            r.bearing.map( |b| format!("{:.0}", b)).unwrap_or_else( || "-".to_string()),
            format_age( age),
            if e.is_stale( now, config.stale_after) { "  STALE" } else { "" }
        );
    }

    if show_transcript && !store.transcript.is_empty() {
        println!("--- raw:");
        for line in store.transcript.lines() {
            println!("  {line}");
        }
    }
}

fn opt_fmt (v: Option<f64>, decimals: usize)->String {
    match v {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string()
    }
}
