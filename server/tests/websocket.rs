use actix_web::{test, web, App};
use awc::ws;
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Debug;

use paint_server::config::Config;
use paint_server::connection::ConnectionIdSource;
use paint_server::handlers::root;
use paint_server::server::spawn_server;
use system::{ClientMessage, Color, LineSegment, Point, ServerMessage};

async fn next_message<S>(socket: &mut S) -> ServerMessage
where
    S: Stream<Item = Result<ws::Frame, actix_web_actors::ws::ProtocolError>> + Unpin,
{
    loop {
        match socket.next().await {
            Some(Ok(ws::Frame::Text(bytes))) => {
                let text = std::str::from_utf8(&bytes).expect("utf-8 frame");
                return ServerMessage::from_json(text).expect("valid json");
            }
            Some(Ok(ws::Frame::Ping(_))) | Some(Ok(ws::Frame::Pong(_))) => continue,
            other => panic!("unexpected frame {:?}", other),
        }
    }
}

async fn send_text<S>(socket: &mut S, text: String)
where
    S: Sink<ws::Message> + Unpin,
    S::Error: Debug,
{
    socket
        .send(ws::Message::Text(text))
        .await
        .expect("frame must be sent");
}

async fn send_message<S>(socket: &mut S, message: &ClientMessage)
where
    S: Sink<ws::Message> + Unpin,
    S::Error: Debug,
{
    send_text(socket, message.to_json().expect("must encode")).await;
}

#[actix_rt::test]
async fn it_syncs_clients_over_websocket() {
    let srv_tx = spawn_server(&Config::default());
    let connection_ids = web::Data::new(ConnectionIdSource::new());
    let mut srv = test::start(move || {
        App::new()
            .data(srv_tx.clone())
            .app_data(connection_ids.clone())
            .configure(root)
    });

    let mut a = srv.ws_at("/ws/").await.expect("a must connect");
    let a_id = match next_message(&mut a).await {
        ServerMessage::Initialize(payload) => payload.self_id,
        other => panic!("unexpected {:?}", other),
    };

    let mut b = srv.ws_at("/ws/").await.expect("b must connect");
    let b_id = match next_message(&mut b).await {
        ServerMessage::Initialize(payload) => {
            assert!(payload.players.contains_key(&a_id));
            payload.self_id
        }
        other => panic!("unexpected {:?}", other),
    };
    match next_message(&mut a).await {
        ServerMessage::UpdatePlayers(players) => assert!(players.contains_key(&b_id)),
        other => panic!("unexpected {:?}", other),
    }

    // unknown events and wrongly typed payloads are dropped, a stays connected
    send_text(&mut a, r#"{"event":"chat","data":"hi"}"#.to_owned()).await;
    send_text(&mut a, r#"{"event":"updatePosition","data":{"x":null,"y":3}}"#.to_owned()).await;
    let segment = LineSegment::new(
        Point::new(0.0, 0.0),
        Point::new(10.0, 10.0),
        Color::from("#ff0000"),
    );
    send_message(&mut a, &ClientMessage::DrawLine(segment.clone())).await;
    assert_eq!(next_message(&mut b).await, ServerMessage::DrawLine(segment));

    send_message(&mut b, &ClientMessage::UpdatePosition(Point::new(3.0, 4.0))).await;
    match next_message(&mut a).await {
        ServerMessage::UpdatePlayers(players) => {
            assert_eq!(players.len(), 2);
            assert_eq!(players[&b_id].position(), Point::new(3.0, 4.0));
        }
        other => panic!("unexpected {:?}", other),
    }

    b.send(ws::Message::Close(None))
        .await
        .expect("close must be sent");
    match next_message(&mut a).await {
        ServerMessage::UpdatePlayers(players) => {
            assert!(!players.contains_key(&b_id));
            assert!(players.contains_key(&a_id));
        }
        other => panic!("unexpected {:?}", other),
    }
}
