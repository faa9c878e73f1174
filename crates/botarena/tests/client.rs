//! Integration tests for `GameClient` against a local platform stub.

use std::time::Duration;

use botarena::prelude::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Map, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use uuid::Uuid;

type PlatformWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

// =========================================================================
// Mock game: the first bot to move wins.
// =========================================================================

#[derive(Default)]
struct FirstMoveWins {
    moves: Vec<Value>,
}

impl Game for FirstMoveWins {
    fn on_start(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
        self.reset();
        let first = ctx.bot(0).cloned().ok_or(GameError::RosterSize {
            expected: 2,
            actual: 0,
        })?;
        ctx.request_move(&json!({"turn": 0}), &first)?;
        Ok(())
    }

    fn on_move_received(
        &mut self,
        ctx: &mut GameContext,
        sender: &BotIdentity,
        data: Value,
    ) -> Result<(), GameError> {
        self.moves.push(data);
        let scores: Scores = ctx
            .bots()
            .iter()
            .map(|b| (b.clone(), if b == sender { 1 } else { 0 }))
            .collect();
        self.send_finished(ctx, scores)
    }

    fn reset(&mut self) {
        self.moves.clear();
    }
}

// =========================================================================
// Platform stub helpers
// =========================================================================

fn bot(n: u128) -> BotIdentity {
    BotIdentity::new(Uuid::from_u128(n), format!("bot-{n}"), "owner")
}

async fn platform() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let port = listener.local_addr().expect("local addr").port();
    (listener, port)
}

async fn accept(listener: TcpListener) -> PlatformWs {
    let (stream, _) = listener.accept().await.expect("should accept");
    tokio_tungstenite::accept_async(stream).await.expect("handshake")
}

fn config(port: u16, on_close: ClosePolicy) -> Config {
    let mut config = Config::default();
    config.platform.host = "127.0.0.1".into();
    config.platform.port = Some(port);
    config.platform.on_close = on_close;
    config.platform.game.token = Some("game-token".into());
    config
}

async fn send(ws: &mut PlatformWs, envelope: Envelope) {
    let text = serde_json::to_string(&envelope).unwrap();
    ws.send(Message::text(text)).await.unwrap();
}

async fn recv(ws: &mut PlatformWs) -> Envelope {
    let msg = ws.next().await.expect("a frame").expect("no error");
    serde_json::from_str(msg.into_text().unwrap().as_str()).expect("valid envelope")
}

async fn close(mut ws: PlatformWs, code: CloseCode, reason: &str) {
    ws.close(Some(CloseFrame {
        code,
        reason: reason.to_owned().into(),
    }))
    .await
    .unwrap();
    while let Some(Ok(_)) = ws.next().await {}
}

async fn run(client: GameClient<FirstMoveWins>) -> Result<(), ClientError> {
    tokio::time::timeout(Duration::from_secs(10), client.run())
        .await
        .expect("client should finish")
}

fn start() -> Envelope {
    Envelope::new(Payload::Start(SessionDescriptor {
        name: Some("Tic Tac Toe".into()),
        module_name: "3x3".into(),
        version: "1.0".into(),
        settings: Map::new(),
        bots: vec![bot(1), bot(2)],
    }))
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_full_round_against_platform() {
    let (listener, port) = platform().await;

    let server = tokio::spawn(async move {
        let mut ws = accept(listener).await;

        let register = recv(&mut ws).await;
        assert_eq!(register.payload, Payload::Register("game-token".into()));
        send(&mut ws, Envelope::new(Payload::Register(String::new()))).await;

        send(&mut ws, start()).await;
        let request = recv(&mut ws).await;
        assert_eq!(request.payload, Payload::Move(json!({"turn": 0})));
        assert_eq!(request.recipients.unwrap().as_slice(), &[bot(1)]);

        send(&mut ws, Envelope::new(Payload::Move(json!(5))).with_sender(bot(1))).await;
        let finished = recv(&mut ws).await;
        let expected: Scores = [(bot(1), 1), (bot(2), 0)].into_iter().collect();
        assert_eq!(finished.payload, Payload::Finished(expected));

        close(ws, CloseCode::Normal, "done").await;
    });

    let client = GameClient::new(config(port, ClosePolicy::BestEffort), FirstMoveWins::default());
    run(client).await.expect("best-effort close ends cleanly");
    server.await.expect("platform assertions");
}

#[tokio::test]
async fn test_close_under_fail_fast_is_connection_lost() {
    let (listener, port) = platform().await;

    let server = tokio::spawn(async move {
        let mut ws = accept(listener).await;
        recv(&mut ws).await;
        close(ws, CloseCode::Away, "platform restarting").await;
    });

    let client = GameClient::new(config(port, ClosePolicy::FailFast), FirstMoveWins::default());
    let err = run(client).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Session(SessionError::ConnectionLost { code: 1001, .. })
    ));
    assert_eq!(err.exit_code(), 3);
    server.await.unwrap();
}

#[tokio::test]
async fn test_platform_error_exits_with_code_2() {
    let (listener, port) = platform().await;

    let server = tokio::spawn(async move {
        let mut ws = accept(listener).await;
        recv(&mut ws).await;
        send(&mut ws, Envelope::new(Payload::Error("unknown game token".into()))).await;
        while let Some(Ok(_)) = ws.next().await {}
    });

    let client = GameClient::new(config(port, ClosePolicy::FailFast), FirstMoveWins::default());
    let err = run(client).await.unwrap_err();
    assert!(matches!(
        &err,
        ClientError::Session(SessionError::Platform(m)) if m == "unknown game token"
    ));
    assert_eq!(err.exit_code(), 2);
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_frame_is_answered_and_session_continues() {
    let (listener, port) = platform().await;

    let server = tokio::spawn(async move {
        let mut ws = accept(listener).await;
        recv(&mut ws).await;

        ws.send(Message::text("{not json")).await.unwrap();
        let reply = recv(&mut ws).await;
        assert!(matches!(reply.payload, Payload::Error(_)));

        send(&mut ws, Envelope::new(Payload::Move(json!(1)))).await;
        let reply = recv(&mut ws).await;
        assert_eq!(
            reply.payload,
            Payload::Error("needed a sender but none was provided".into())
        );

        send(&mut ws, start()).await;
        let request = recv(&mut ws).await;
        assert!(matches!(request.payload, Payload::Move(_)));

        close(ws, CloseCode::Normal, "done").await;
    });

    let client = GameClient::new(config(port, ClosePolicy::BestEffort), FirstMoveWins::default());
    run(client).await.unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn test_connect_failure_exits_with_code_1() {
    let (listener, port) = platform().await;
    drop(listener);

    let client = GameClient::new(config(port, ClosePolicy::FailFast), FirstMoveWins::default());
    let err = run(client).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_missing_token_fails_before_connecting() {
    let (listener, port) = platform().await;
    drop(listener);

    let mut config = config(port, ClosePolicy::FailFast);
    config.platform.game.token = None;
    let err = run(GameClient::new(config, FirstMoveWins::default())).await.unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
    assert_eq!(err.exit_code(), 4);
}
