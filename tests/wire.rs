//! End-to-end wire test: a session writing over a real TCP socket, with the
//! client side decoding packets through the same codec.

use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::FramedRead;

use hestia::protocol::capabilities::{CLIENT_DEPRECATE_EOF, CLIENT_PROTOCOL_41};
use hestia::protocol::{Packet, PacketCodec};
use hestia::session::SessionRegistry;
use hestia::{AuthContext, ColumnType, Field, QueryResult, ServerConfig, Session, SqlError};

/// Route session tracing through the env filter; repeated init attempts from
/// parallel tests are fine.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn tcp_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (server, client) = tokio::join!(
        async { listener.accept().await.unwrap().0 },
        async { TcpStream::connect(addr).await.unwrap() },
    );
    (server, client)
}

async fn read_n(client: TcpStream, n: usize) -> Vec<Packet> {
    let mut reader = FramedRead::new(client, PacketCodec);
    let mut packets = Vec::new();
    for _ in 0..n {
        packets.push(reader.next().await.unwrap().unwrap());
    }
    packets
}

fn users_result() -> QueryResult {
    QueryResult::with_rows(
        vec![
            Field::new("id", ColumnType::Long),
            Field::new("name", ColumnType::VarString),
        ],
        vec![
            vec![Some(Bytes::from_static(b"1")), Some(Bytes::from_static(b"ada"))],
            vec![Some(Bytes::from_static(b"2")), None],
        ],
    )
}

#[tokio::test]
async fn test_full_response_over_tcp() {
    init_tracing();
    let (server, client) = tcp_pair().await;
    let session = Session::accept(1, server, &ServerConfig::default());
    session.authenticate(AuthContext::new(
        CLIENT_PROTOCOL_41 | CLIENT_DEPRECATE_EOF,
        "app_user",
        0x21,
        vec![],
    ));

    assert_ne!(session.address(), "unknown");

    session.write_result(&users_result()).await.unwrap();
    session.close().await;
    assert_eq!(session.address(), "unknown");

    // count, 2 column defs, 2 rows, OK-shaped terminal
    let packets = read_n(client, 6).await;
    assert_eq!(&packets[0].payload[..], &[2]);
    assert_eq!(packets[5].payload[0], 0xFE);
    // Row 2 carries a raw "2" then the NULL marker
    assert_eq!(&packets[4].payload[..], &[1, b'2', 0xFB]);
}

#[tokio::test]
async fn test_error_packet_over_tcp() {
    init_tracing();
    let (server, client) = tcp_pair().await;
    let session = Session::accept(2, server, &ServerConfig::default());
    session.authenticate(AuthContext::new(CLIENT_PROTOCOL_41, "app_user", 0x21, vec![]));

    let err = SqlError::new(1049, "42000", "Unknown database 'nope'").into();
    session.write_error(&err).await.unwrap();
    session.close().await;

    let packets = read_n(client, 1).await;
    let payload = &packets[0].payload;
    assert_eq!(payload[0], 0xFF);
    assert_eq!(&payload[1..3], &1049u16.to_le_bytes());
    assert_eq!(&payload[4..9], b"42000");
}

#[tokio::test]
async fn test_registry_sees_live_tcp_sessions() {
    init_tracing();
    let registry = SessionRegistry::new();
    let (server, _client) = tcp_pair().await;
    let session = Arc::new(Session::accept(3, server, &ServerConfig::default()));
    session.authenticate(AuthContext::new(CLIENT_PROTOCOL_41, "admin", 0x21, vec![]));
    session.set_schema("sbtest");
    registry.register(session.clone());

    let infos = registry.list();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].user, "admin");
    assert_eq!(infos[0].schema, "sbtest");
    assert!(infos[0].address.starts_with("127.0.0.1:"));

    registry.unregister(3).unwrap().close().await;
}
