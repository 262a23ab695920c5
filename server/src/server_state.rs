use std::collections::HashMap;
use system::rand::{self, Rng};
use system::{
    ClientMessage, ConnectionId, DrawLog, InitializePayload, LineSegment, PlayersSnapshot, Point,
    ServerMessage, SessionRegistry,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Connected and already on the canvas, but no name given yet.
    Connecting,
    Joined { username: String },
}

/// One message and everyone it goes to.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub recipients: Vec<ConnectionId>,
    pub message: ServerMessage,
}

pub struct ServerState {
    registry: SessionRegistry,
    draw_log: DrawLog,
    connection_states: HashMap<ConnectionId, ConnectionState>,
    reset_code: String,
}

impl ServerState {
    pub fn new(reset_code: impl Into<String>) -> Self {
        Self {
            registry: SessionRegistry::new(),
            draw_log: DrawLog::new(),
            connection_states: HashMap::new(),
            reset_code: reset_code.into(),
        }
    }

    pub fn connect(&mut self, connection_id: ConnectionId) -> Vec<Delivery> {
        self.connect_with_rng(connection_id, &mut rand::thread_rng())
    }

    pub fn connect_with_rng<R: Rng + ?Sized>(
        &mut self,
        connection_id: ConnectionId,
        rng: &mut R,
    ) -> Vec<Delivery> {
        if self.connection_states.contains_key(&connection_id) {
            log::warn!("Connection {} is already connected", connection_id);
            return Vec::new();
        }
        let player = self.registry.on_connect_with_rng(connection_id, rng);
        self.connection_states
            .insert(connection_id, ConnectionState::Connecting);
        log::info!(
            "Connection {} connected with color {}",
            connection_id,
            player.color
        );

        let players = self.registry.snapshot();
        vec![
            Delivery {
                recipients: vec![connection_id],
                message: ServerMessage::Initialize(InitializePayload {
                    self_id: connection_id,
                    players: players.clone(),
                    drawn_lines: self.draw_log.all().to_vec(),
                }),
            },
            Delivery {
                recipients: self.others(&connection_id),
                message: ServerMessage::UpdatePlayers(players),
            },
        ]
    }

    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> Vec<Delivery> {
        let state = self.connection_states.remove(connection_id);
        if self.registry.on_disconnect(connection_id).is_none() {
            log::debug!("Connection {} is not connected", connection_id);
            return Vec::new();
        }
        match state {
            Some(ConnectionState::Joined { username }) => {
                log::info!("Connection {} ({}) disconnected", connection_id, username)
            }
            _ => log::info!("Connection {} disconnected", connection_id),
        }

        vec![Delivery {
            recipients: self.everyone(),
            message: ServerMessage::UpdatePlayers(self.registry.snapshot()),
        }]
    }

    pub fn handle_message(
        &mut self,
        from: &ConnectionId,
        message: ClientMessage,
    ) -> Vec<Delivery> {
        if !self.connection_states.contains_key(from) {
            log::debug!("Ignoring {:?} from unknown connection {}", message, from);
            return Vec::new();
        }
        match message {
            ClientMessage::Join(username) => {
                self.join(from, username);
                Vec::new()
            }
            ClientMessage::UpdatePosition(position) => self.update_position(from, position),
            ClientMessage::DrawLine(segment) => self.draw_line(from, segment),
            ClientMessage::ResetDrawing(code) => self.reset_drawing(from, &code),
        }
    }

    fn join(&mut self, from: &ConnectionId, username: String) {
        log::info!("Connection {} joined as {:?}", from, username);
        self.connection_states
            .insert(*from, ConnectionState::Joined { username });
    }

    fn update_position(&mut self, from: &ConnectionId, position: Point) -> Vec<Delivery> {
        if !self.registry.update_position(from, position) {
            log::debug!("Position update for unknown player {}", from);
            return Vec::new();
        }
        vec![Delivery {
            recipients: self.others(from),
            message: ServerMessage::UpdatePlayers(self.registry.snapshot()),
        }]
    }

    fn draw_line(&mut self, from: &ConnectionId, segment: LineSegment) -> Vec<Delivery> {
        self.draw_log.append(segment.clone());
        vec![Delivery {
            recipients: self.others(from),
            message: ServerMessage::DrawLine(segment),
        }]
    }

    fn reset_drawing(&mut self, from: &ConnectionId, code: &str) -> Vec<Delivery> {
        if code != self.reset_code {
            log::warn!("Connection {} sent a wrong reset code", from);
            return Vec::new();
        }
        log::info!(
            "Connection {} cleared {} segments",
            from,
            self.draw_log.len()
        );
        self.draw_log.clear();
        vec![Delivery {
            recipients: self.everyone(),
            message: ServerMessage::ClearDrawing,
        }]
    }

    pub fn players(&self) -> PlayersSnapshot {
        self.registry.snapshot()
    }

    pub fn drawn_lines(&self) -> &[LineSegment] {
        self.draw_log.all()
    }

    pub fn connection_state(&self, connection_id: &ConnectionId) -> Option<&ConnectionState> {
        self.connection_states.get(connection_id)
    }

    fn everyone(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.registry.ids().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn others(&self, without: &ConnectionId) -> Vec<ConnectionId> {
        let mut ids = self.everyone();
        ids.retain(|id| id != without);
        ids
    }
}
