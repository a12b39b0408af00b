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

use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::{self, io::AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use odin_swarm::{
    SwarmConfig, TelemetryConnector, TelemetryProcessor, ProcessStats, new_shared_store, load_config,
    connector::{TelemetrySource, Utf8Decoder, process_stream}, errors::OdinSwarmError, store::read_store
};

const SAMPLE: &str = include_str!("../resources/swarm_sample.txt");

fn sample_path ()->String {
    format!("{}/resources/swarm_sample.txt", env!("CARGO_MANIFEST_DIR"))
}

// run with "cargo test test_connector -- --nocapture"

#[test]
fn test_utf8_decoder() {
    let bytes = "Course: 40°\n".as_bytes();
    let split = bytes.iter().position( |b| *b == 0xC2).unwrap() + 1; // inside '°'

    let mut decoder = Utf8Decoder::new();
    let a = decoder.decode( &bytes[..split]);
    assert_eq!( a, "Course: 40");
    assert_eq!( decoder.pending_len(), 1);

    let b = decoder.decode( &bytes[split..]);
    assert_eq!( b, "°\n");
    assert_eq!( decoder.pending_len(), 0);

    // invalid bytes are replaced, not dropped
    let c = decoder.decode( b"ID: A\xFF1");
    assert_eq!( c, "ID: A\u{FFFD}1");
}

#[test]
fn test_telemetry_source() {
    assert_eq!( TelemetrySource::parse("-").unwrap(), TelemetrySource::Stdin);
    assert_eq!( TelemetrySource::parse("tcp://127.0.0.1:4711").unwrap(), TelemetrySource::Tcp("127.0.0.1:4711".to_string()));
    assert_eq!( TelemetrySource::parse("data/swarm.txt").unwrap(), TelemetrySource::File( PathBuf::from("data/swarm.txt")));

    assert!( matches!( TelemetrySource::parse("udp://127.0.0.1:4711"), Err(OdinSwarmError::UnsupportedSource(_))));
    assert!( matches!( TelemetrySource::parse("tcp://"), Err(OdinSwarmError::UnsupportedSource(_))));
    assert!( matches!( TelemetrySource::parse(""), Err(OdinSwarmError::UnsupportedSource(_))));
}

#[tokio::test]
async fn test_process_stream_small_reads() {
    let store = new_shared_store( 20);
    let mut processor = TelemetryProcessor::new( store.clone());
    let cancel = CancellationToken::new();

    // 7 byte reads split '°' characters
    let stats = process_stream( SAMPLE.as_bytes(), &mut processor, 7, &cancel).await.unwrap();
    println!("{stats}");
    assert_eq!( stats, ProcessStats { records: 6, observers: 2, peers: 5 });

    let store = read_store( &store);
    assert_eq!( store.drones.get("D103").unwrap().reading.course.degrees(), 50.0);
}

#[tokio::test]
async fn test_process_stream_cancel() {
    let store = new_shared_store( 20);
    let (mut tx, rx) = tokio::io::duplex( 256);
    let cancel = CancellationToken::new();

    let task = {
        let store = store.clone();
        let cancel = cancel.clone();
        tokio::spawn( async move {
            let mut processor = TelemetryProcessor::new( store);
            let res = process_stream( rx, &mut processor, 64, &cancel).await;
            (res, processor.residual().to_string())
        })
    };

    tx.write_all( b"ID: A\nName: a\nLocation: 1, 1\n\nID: B\nName: b\nLocation: 2, 2\n").await.unwrap();

    let mut n = 0;
    while read_store( &store).drones.is_empty() && n < 100 {
        tokio::time::sleep( Duration::from_millis(10)).await;
        n += 1;
    }
    cancel.cancel();

    let (res, residual) = task.await.unwrap();
    assert_eq!( res.unwrap().records, 1);
    assert!( residual.is_empty()); // unterminated B is dropped, not replayed

    let store = read_store( &store);
    assert_eq!( store.drones.ids(), vec!["A"]);
}

#[tokio::test]
async fn test_connector_file_source() {
    let config = Arc::new( SwarmConfig { source: sample_path(), read_buffer: 16, ..SwarmConfig::default() });
    let store = new_shared_store( config.transcript_lines);

    let mut connector = TelemetryConnector::new( config, store.clone());
    connector.start().unwrap();

    let stats = connector.join().await.unwrap();
    assert_eq!( stats, ProcessStats { records: 6, observers: 2, peers: 5 });
    assert!( !connector.is_running());

    let store = read_store( &store);
    assert_eq!( store.drones.len(), 4);
    assert!( store.observer.is_some());
}

#[tokio::test]
async fn test_connector_errors() {
    let store = new_shared_store( 20);

    let config = Arc::new( SwarmConfig { source: "udp://localhost:1".to_string(), ..SwarmConfig::default() });
    let mut connector = TelemetryConnector::new( config, store.clone());
    assert!( connector.start().is_err());

    let config = Arc::new( SwarmConfig { source: "no/such/telemetry.txt".to_string(), ..SwarmConfig::default() });
    let mut connector = TelemetryConnector::new( config, store.clone());
    connector.start().unwrap();
    assert!( matches!( connector.join().await, Err(OdinSwarmError::IOError(_))));
}

#[tokio::test]
async fn test_connector_terminate() {
    // a source that does not end by itself
    let listener = tokio::net::TcpListener::bind( "127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = Arc::new( SwarmConfig { source: format!("tcp://{addr}"), ..SwarmConfig::default() });
    let store = new_shared_store( 20);
    let mut connector = TelemetryConnector::new( config, store.clone());
    connector.start().unwrap();

    let (mut socket, _) = listener.accept().await.unwrap();
    socket.write_all( b"ID: T1\nName: tcp\nLocation: 3, 4\n\nID: T2\n").await.unwrap();

    let mut n = 0;
    while read_store( &store).drones.is_empty() && n < 100 {
        tokio::time::sleep( Duration::from_millis(10)).await;
        n += 1;
    }
    assert!( connector.is_running());
    assert!( connector.start().is_err()); // already running

    connector.terminate();
    let stats = connector.join().await.unwrap();
    assert_eq!( stats.records, 1);
    assert_eq!( read_store( &store).drones.ids(), vec!["T1"]);
}

#[test]
fn test_load_config() {
    let path = format!("{}/configs/swarm.ron", env!("CARGO_MANIFEST_DIR"));
    let config: SwarmConfig = load_config( &path).unwrap();
    println!("{config:#?}");

    assert_eq!( config.source, "tcp://127.0.0.1:4711");
    assert_eq!( config.stale_after, Duration::from_secs(30));
    assert_eq!( config.transcript_lines, SwarmConfig::default().transcript_lines);

    assert!( matches!( load_config::<SwarmConfig>("no/such/config.ron"), Err(OdinSwarmError::ConfigFileNotFound(_))));

    // missing fields get defaults
    let partial: SwarmConfig = ron::from_str( "SwarmConfig( source: \"-\" )").unwrap();
    assert_eq!( partial, SwarmConfig::default());
}
