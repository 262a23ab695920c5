use actix::{Actor, ActorContext, AsyncContext, Handler, Message, Running, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use std::sync::atomic::{AtomicU64, Ordering};

use system::{ClientMessage, ConnectionId};

use crate::connection_tx_storage::ConnectionTx;
use crate::server::ServerTx;

#[derive(Debug)]
pub enum ConnectionCommand {
    Connect {
        from: ConnectionId,
        tx: ConnectionTx,
    },
    Disconnect {
        from: ConnectionId,
    },
    ClientMessage {
        from: ConnectionId,
        message: ClientMessage,
    },
}

#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// Encoded `ServerMessage`, written out as a text frame.
    Message(String),
}

/// Hands out connection ids. Ids are never reused while the process lives.
#[derive(Debug)]
pub struct ConnectionIdSource(AtomicU64);

impl ConnectionIdSource {
    pub fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    pub fn next_id(&self) -> ConnectionId {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for ConnectionIdSource {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Message)]
#[rtype(result = "()")]
struct ConnectionActorMessage(ConnectionEvent);

struct ConnectionActor {
    connection_id: ConnectionId,
    srv_tx: ServerTx,
}

impl ConnectionActor {
    fn forward(&self, command: ConnectionCommand, ctx: &mut ws::WebsocketContext<Self>) {
        if self.srv_tx.send(command).is_err() {
            log::error!("Server task is gone, closing {}", self.connection_id);
            ctx.stop();
        }
    }
}

impl Actor for ConnectionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ConnectionEvent>();

        self.forward(
            ConnectionCommand::Connect {
                from: self.connection_id,
                tx,
            },
            ctx,
        );

        let addr = ctx.address();
        let connection_id = self.connection_id;

        tokio::spawn(async move {
            log::debug!("connection {} green thread - started", connection_id);
            while let Some(event) = rx.recv().await {
                if !addr.connected() {
                    break;
                }
                addr.do_send(ConnectionActorMessage(event));
            }
            log::debug!("connection {} green thread - terminated", connection_id);
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        let command = ConnectionCommand::Disconnect {
            from: self.connection_id,
        };
        if self.srv_tx.send(command).is_err() {
            log::error!(
                "Server task is gone, cannot release {}",
                self.connection_id
            );
        }
        Running::Stop
    }
}

/// Ingress
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Text(text)) => {
                log::debug!("Ingress size: {}", text.len());
                match ClientMessage::from_json(&text) {
                    Ok(message) => {
                        log::debug!("Ingress {:?}", message);
                        self.forward(
                            ConnectionCommand::ClientMessage {
                                from: self.connection_id,
                                message,
                            },
                            ctx,
                        );
                    }
                    Err(error) => {
                        log::warn!("Dropping frame from {}: {}", self.connection_id, error);
                    }
                }
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(error) => {
                log::warn!("Protocol error on {}: {}", self.connection_id, error);
                ctx.stop();
            }
            _ => (),
        }
    }
}

/// Egress
impl Handler<ConnectionActorMessage> for ConnectionActor {
    type Result = ();

    fn handle(
        &mut self,
        msg: ConnectionActorMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Self::Result {
        match msg.0 {
            ConnectionEvent::Message(text) => {
                log::debug!("Egress {}", text);
                ctx.text(text);
            }
        }
    }
}

pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    srv_tx: web::Data<ServerTx>,
    connection_ids: web::Data<ConnectionIdSource>,
) -> Result<HttpResponse, Error> {
    ws::start(
        ConnectionActor {
            connection_id: connection_ids.next_id(),
            srv_tx: srv_tx.get_ref().clone(),
        },
        &req,
        stream,
    )
}
