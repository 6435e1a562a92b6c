//! Loopback tests driving the real TCP server
//!
//! The server's poll loop is stepped manually from the test thread, so
//! these run deterministically without spawning the run() loop.

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use rigmock_protocol::DUMP_STATE;
use rigmock_sim::{NoopRelease, RadioState, RigServer};

fn start_server() -> RigServer {
    RigServer::bind("127.0.0.1:0", RadioState::new(), Box::new(NoopRelease)).unwrap()
}

fn connect(server: &RigServer) -> TcpStream {
    let client = TcpStream::connect(server.local_addr().unwrap()).unwrap();
    client.set_nonblocking(true).unwrap();
    client
}

/// Step the server until `want` reply bytes have arrived (or give up)
fn pump(server: &mut RigServer, client: &mut TcpStream, want: usize) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    for _ in 0..500 {
        server.poll();
        match client.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(err) if err.kind() == ErrorKind::WouldBlock => {}
            Err(err) => panic!("client read failed: {err}"),
        }
        if buf.len() >= want {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }
    String::from_utf8(buf).unwrap()
}

/// Step the server until the session table reaches `count`
fn pump_until_sessions(server: &mut RigServer, count: usize) {
    for _ in 0..500 {
        server.poll();
        if server.session_count() == count {
            return;
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!(
        "session count never reached {count}, still {}",
        server.session_count()
    );
}

#[test]
fn test_dump_state_over_tcp() {
    let mut server = start_server();
    let mut client = connect(&server);

    client.write_all(b"\\dump_state\n").unwrap();
    let reply = pump(&mut server, &mut client, DUMP_STATE.len());
    assert_eq!(reply, DUMP_STATE);
}

#[test]
fn test_get_freq_over_tcp() {
    let mut server = start_server();
    let mut client = connect(&server);

    client.write_all(b"f\n").unwrap();
    assert_eq!(pump(&mut server, &mut client, 9), "21200500\n");
}

#[test]
fn test_set_freq_visible_to_second_client() {
    let mut server = start_server();
    let mut writer = connect(&server);
    let mut reader = connect(&server);
    pump_until_sessions(&mut server, 2);

    writer.write_all(b"F 14074000\n").unwrap();
    assert_eq!(pump(&mut server, &mut writer, 7), "RPRT 0\n");

    reader.write_all(b"f\n").unwrap();
    assert_eq!(pump(&mut server, &mut reader, 9), "14074000\n");
    assert_eq!(server.radio().frequency_hz, 14_074_000);
}

#[test]
fn test_extended_command_over_tcp() {
    let mut server = start_server();
    let mut client = connect(&server);

    client.write_all(b"+\\get_mode\n").unwrap();
    let want = "get_mode:\nMode: USB\nPassband: 2400\nRPRT 0\n";
    assert_eq!(pump(&mut server, &mut client, want.len()), want);
}

#[test]
fn test_pipelined_commands_all_answered() {
    let mut server = start_server();
    let mut client = connect(&server);

    client.write_all(b"f\nm\nv\n").unwrap();
    let want = "21200500\nUSB\n2400\nVFO\n";
    assert_eq!(pump(&mut server, &mut client, want.len()), want);
}

#[test]
fn test_client_disconnect_removes_session() {
    let mut server = start_server();
    let client = connect(&server);
    pump_until_sessions(&mut server, 1);

    drop(client);
    pump_until_sessions(&mut server, 0);
}

#[test]
fn test_empty_line_hangs_up() {
    let mut server = start_server();
    let mut client = connect(&server);
    pump_until_sessions(&mut server, 1);

    client.write_all(b"\n").unwrap();
    pump_until_sessions(&mut server, 0);
}

#[test]
fn test_one_client_closing_leaves_others_working() {
    let mut server = start_server();
    let quitter = connect(&server);
    let mut stayer = connect(&server);
    pump_until_sessions(&mut server, 2);

    drop(quitter);
    pump_until_sessions(&mut server, 1);

    stayer.write_all(b"f\n").unwrap();
    assert_eq!(pump(&mut server, &mut stayer, 9), "21200500\n");
}
