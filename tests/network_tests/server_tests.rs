//! Server Tests
//!
//! End-to-end tests over real TCP connections on the loopback interface.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lankv::events::MemorySink;
use lankv::network::{Dispatcher, Server};
use lankv::replication::NoBroadcast;
use lankv::{Client, Store};

// =============================================================================
// Helper Functions
// =============================================================================

fn start_server() -> (SocketAddr, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let dispatcher = Dispatcher::new(Store::open().unwrap(), Arc::new(NoBroadcast), sink.clone());
    let server = Server::bind("127.0.0.1:0", dispatcher).unwrap();
    let addr = server.local_addr().unwrap();

    thread::spawn(move || server.run());

    (addr, sink)
}

fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream
}

fn exchange(stream: &mut TcpStream, request: &[u8], reply_len: usize) -> Vec<u8> {
    stream.write_all(request).unwrap();
    let mut reply = vec![0u8; reply_len];
    stream.read_exact(&mut reply).unwrap();
    reply
}

// =============================================================================
// Wire Scenarios
// =============================================================================

#[test]
fn test_put_then_get_over_tcp() {
    let (addr, _) = start_server();
    let mut stream = connect(addr);

    assert_eq!(exchange(&mut stream, b"put13key212stored value", 3), b"ack");
    assert_eq!(exchange(&mut stream, b"get13key", 18), b"val212stored value");
}

#[test]
fn test_get_on_empty_store_is_nil() {
    let (addr, _) = start_server();
    let mut stream = connect(addr);

    assert_eq!(exchange(&mut stream, b"get14key1", 3), b"nil");
}

#[test]
fn test_bye_closes_without_reply() {
    let (addr, _) = start_server();
    let mut stream = connect(addr);

    stream.write_all(b"bye").unwrap();

    let mut rest = Vec::new();
    stream.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());
}

#[test]
fn test_zero_digit_count_delete_is_err() {
    let (addr, _) = start_server();
    let mut stream = connect(addr);

    assert_eq!(exchange(&mut stream, b"del0", 3), b"err");
}

#[test]
fn test_malformed_digit_keeps_connection_usable() {
    let (addr, _) = start_server();
    let mut stream = connect(addr);

    assert_eq!(exchange(&mut stream, b"getx", 3), b"err");
    assert_eq!(exchange(&mut stream, b"put11k11v", 3), b"ack");
    assert_eq!(exchange(&mut stream, b"get11k", 6), b"val11v");
}

#[test]
fn test_unknown_command_is_silently_ignored() {
    let (addr, _) = start_server();
    let mut stream = connect(addr);

    assert_eq!(exchange(&mut stream, b"zzzget11k", 3), b"nil");
}

#[test]
fn test_delete_then_get_is_nil() {
    let (addr, _) = start_server();
    let mut stream = connect(addr);

    assert_eq!(exchange(&mut stream, b"put13key15value", 3), b"ack");
    assert_eq!(exchange(&mut stream, b"del13key", 3), b"ack");
    assert_eq!(exchange(&mut stream, b"get13key", 3), b"nil");
    assert_eq!(exchange(&mut stream, b"del13key", 3), b"ack");
}

#[test]
fn test_connections_share_one_store() {
    let (addr, _) = start_server();
    let mut writer = connect(addr);
    let mut reader = connect(addr);

    assert_eq!(exchange(&mut writer, b"put13key16shared", 3), b"ack");
    assert_eq!(exchange(&mut reader, b"get13key", 11), b"val16shared");
}

#[test]
fn test_stalled_client_does_not_block_others() {
    let (addr, _) = start_server();

    // Half a command, never finished
    let mut stalled = connect(addr);
    stalled.write_all(b"put13ke").unwrap();

    let mut other = connect(addr);
    assert_eq!(exchange(&mut other, b"put11a11b", 3), b"ack");
    assert_eq!(exchange(&mut other, b"get11a", 6), b"val11b");
}

#[test]
fn test_events_reach_injected_sink() {
    let (addr, sink) = start_server();
    let mut stream = connect(addr);

    assert_eq!(exchange(&mut stream, b"put11k11v", 3), b"ack");
    assert_eq!(exchange(&mut stream, b"get11k", 6), b"val11v");
    // The value-sent line follows the reply; one more round trip orders it
    assert_eq!(exchange(&mut stream, b"get11z", 3), b"nil");

    let lines = sink.lines();
    assert!(lines[0].ends_with(": client connected"));
    assert!(lines.contains(&"command received: put".to_string()));
    assert!(lines.contains(&"received arg v".to_string()));
    assert!(lines.contains(&"sent to client: val11v".to_string()));
}

// =============================================================================
// Client Tests
// =============================================================================

#[test]
fn test_client_round_trip() {
    let (addr, _) = start_server();
    let mut client = Client::connect(addr).unwrap();

    assert_eq!(client.get(b"key").unwrap(), None);
    client.put(b"key", b"stored value").unwrap();
    assert_eq!(client.get(b"key").unwrap(), Some(b"stored value".to_vec()));
    client.delete(b"key").unwrap();
    assert_eq!(client.get(b"key").unwrap(), None);
    client.bye().unwrap();
}

#[test]
fn test_client_binary_values() {
    let (addr, _) = start_server();
    let mut client = Client::connect(addr).unwrap();

    let value: Vec<u8> = (0..=255).collect();
    client.put(&[0x00, 0xFF], &value).unwrap();
    assert_eq!(client.get(&[0x00, 0xFF]).unwrap(), Some(value));
}

#[test]
fn test_concurrent_clients_on_one_key() {
    let (addr, _) = start_server();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let mut client = Client::connect(addr).unwrap();
                client.put(b"race", format!("writer-{}", i).as_bytes()).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut client = Client::connect(addr).unwrap();
    let value = client.get(b"race").unwrap().unwrap();
    let value = String::from_utf8(value).unwrap();
    assert!((0..8).any(|i| value == format!("writer-{}", i)), "got {}", value);
}
