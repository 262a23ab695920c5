use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use super::connection::{ConnectionCommand, ConnectionEvent};
use crate::config::Config;
use crate::connection_tx_storage::ConnectionTxStorage;
use crate::server_state::{Delivery, ServerState};

pub type ServerTx = UnboundedSender<ConnectionCommand>;

struct Server {
    server_state: ServerState,
    connections: ConnectionTxStorage,
}

impl Server {
    fn new(config: &Config) -> Self {
        Self {
            server_state: ServerState::new(config.reset_code.clone()),
            connections: ConnectionTxStorage::new(),
        }
    }

    fn handle_connection_command(&mut self, command: ConnectionCommand) {
        let deliveries = match command {
            ConnectionCommand::Connect { from, tx } => {
                self.connections.insert(from, tx);
                log::debug!("{} open connections", self.connections.len());
                self.server_state.connect(from)
            }
            ConnectionCommand::Disconnect { from } => {
                if self.connections.remove(&from).is_none() {
                    log::debug!("Connection {} had no open channel", from);
                }
                self.server_state.disconnect(&from)
            }
            ConnectionCommand::ClientMessage { from, message } => {
                self.server_state.handle_message(&from, message)
            }
        };
        for delivery in deliveries {
            self.deliver(delivery);
        }
    }

    fn deliver(&self, delivery: Delivery) {
        if delivery.recipients.is_empty() {
            return;
        }
        let text = match delivery.message.to_json() {
            Ok(text) => text,
            Err(error) => {
                log::error!("Dropping {}: {}", delivery.message.event_name(), error);
                return;
            }
        };
        log::debug!(
            "Egress {} to {:?}",
            delivery.message.event_name(),
            delivery.recipients
        );
        for connection_id in &delivery.recipients {
            self.connections
                .send(connection_id, ConnectionEvent::Message(text.clone()));
        }
    }
}

/// Starts the task that owns all canvas state. Every mutation goes through
/// the returned channel, one command at a time.
pub fn spawn_server(config: &Config) -> ServerTx {
    let (srv_tx, mut srv_rx) = unbounded_channel::<ConnectionCommand>();
    let mut server = Server::new(config);

    tokio::spawn(async move {
        while let Some(command) = srv_rx.recv().await {
            server.handle_connection_command(command);
        }
        log::info!("server task terminated");
    });

    srv_tx
}
