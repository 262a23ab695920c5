use crate::connection::ConnectionEvent;
use std::collections::HashMap;
use system::ConnectionId;

pub type ConnectionTx = tokio::sync::mpsc::UnboundedSender<ConnectionEvent>;

pub struct ConnectionTxStorage {
    connection_txs: HashMap<ConnectionId, ConnectionTx>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self {
            connection_txs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, connection_id: ConnectionId, tx: ConnectionTx) {
        self.connection_txs.insert(connection_id, tx);
    }

    pub fn send(&self, to: &ConnectionId, message: ConnectionEvent) {
        if let Some(tx) = self.connection_txs.get(to) {
            if tx.send(message).is_err() {
                log::warn!("Connection {} is already closed", to);
            }
        } else {
            log::warn!("No channel for connection {}", to);
        }
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(connection_id)
    }

    pub fn len(&self) -> usize {
        self.connection_txs.len()
    }
}
