use tafl_client::protocol::PROTOCOL_VERSION;
use tafl_client::{
    ApiError, Coord, GameApi, GameStatus, Message, PositionResponse, Skeleton, Stub, TcpTransport,
    Transport, START_POSITION,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::time::Duration;

struct DummyEngine;

#[async_trait::async_trait]
impl GameApi for DummyEngine {
    async fn fetch_position(&self, _game_id: &str) -> Result<PositionResponse, ApiError> {
        Ok(PositionResponse::new(START_POSITION, GameStatus::InProgress))
    }
    async fn legal_moves(&self, _game_id: &str, _player: &str, _from: Coord) -> Result<String, ApiError> {
        Ok("[(1, 3)]".to_string())
    }
    async fn make_move(
        &self,
        _game_id: &str,
        _player: &str,
        _from: Coord,
        _to: Coord,
    ) -> Result<PositionResponse, ApiError> {
        Err(ApiError::status(409, "not your turn"))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stub_skeleton_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let transport = TcpTransport::new(socket);
        let mut skeleton = Skeleton::new(DummyEngine, transport);
        skeleton.run().await.unwrap();
    });

    let stub = Stub::new(TcpTransport::connect(addr).await?);

    let pos = stub.fetch_position("g1").await?;
    assert_eq!(pos.fen, START_POSITION);
    assert_eq!(pos.winner, 'x');

    let list = stub.legal_moves("g1", "Helga", Coord::new(0, 3)).await?;
    assert_eq!(list, "[(1, 3)]");

    let err = stub
        .make_move("g1", "Helga", Coord::new(0, 3), Coord::new(1, 3))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::status(409, "not your turn"));

    drop(stub);
    server.await.unwrap();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_raw_frames_round_trip() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut transport = TcpTransport::new(socket);
        let msg = transport.recv().await.unwrap();
        transport.send(msg).await.unwrap();
    });

    let mut client = TcpTransport::connect(addr).await?;
    let msg = Message::MakeMove {
        seq: 3,
        game_id: "g1".to_string(),
        player: "Helga".to_string(),
        from: Coord::new(0, 3),
        to: Coord::new(1, 3),
    };
    client.send(msg.clone()).await?;
    assert_eq!(client.recv().await?, msg);

    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_length_prefix() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // all 0xFF bytes, far above MAX_MESSAGE_SIZE
        socket.write_all(&[0xFF, 0xFF, 0xFF, 0xFF]).await.unwrap();
        socket.flush().await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let result = transport.recv().await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("too large"));

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_length_frame() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[0u8, 0, 0, 0]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    assert!(transport.recv().await.is_err());

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_truncated_frame() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // promise 100 bytes, deliver 10, then hang up
        socket.write_all(&100u32.to_be_bytes()).await.unwrap();
        socket.write_all(&[0u8; 10]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let result = tokio::time::timeout(Duration::from_secs(2), transport.recv()).await;
    assert!(result.is_err() || result.unwrap().is_err());

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_bincode_payload() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        // out-of-range enum discriminant
        let garbage = [0xFFu8, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
        socket.write_all(&(garbage.len() as u32).to_be_bytes()).await.unwrap();
        socket.write_all(&garbage).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let result = transport.recv().await;
    assert!(result.unwrap_err().to_string().contains("Deserialization"));

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_peer_closes_connection() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let mut transport = TcpTransport::connect(addr).await?;
    server_task.await?;
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("closed") || err.to_string().contains("reset"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_custom_size_limit_applies_to_sends() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_task = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        TcpTransport::new(socket).recv().await.unwrap()
    });

    let stream = tokio::net::TcpStream::connect(addr).await?;
    let mut transport = TcpTransport::with_config(stream, Duration::from_secs(1), 16);
    let big = Message::Destinations {
        seq: 0,
        list: "[(1, 2), (3, 4), (5, 6), (7, 8)]".to_string(),
    };
    let err = transport.send(big).await.unwrap_err();
    assert!(err.to_string().contains("too large"));

    // small frames still go through
    transport
        .send(Message::Handshake { version: PROTOCOL_VERSION })
        .await?;
    assert_eq!(
        server_task.await?,
        Message::Handshake { version: PROTOCOL_VERSION }
    );
    Ok(())
}
