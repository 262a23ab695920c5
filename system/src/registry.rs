use crate::{Color, ConnectionId, Player, PlayersSnapshot, Point};
use rand::Rng;
use std::collections::HashMap;

/// Players of every live connection. Entries exist exactly as long as the
/// connection does.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    players: HashMap<ConnectionId, Player>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
        }
    }

    pub fn on_connect(&mut self, id: ConnectionId, color: Color) -> Player {
        let player = Player::new(id, color);
        self.players.insert(id, player.clone());
        player
    }

    pub fn on_connect_with_rng<R: Rng + ?Sized>(
        &mut self,
        id: ConnectionId,
        rng: &mut R,
    ) -> Player {
        self.on_connect(id, Color::random(rng))
    }

    pub fn on_disconnect(&mut self, id: &ConnectionId) -> Option<Player> {
        self.players.remove(id)
    }

    /// Returns `false` without touching anything when `id` is not registered,
    /// e.g. a position update that lost the race against its disconnect.
    pub fn update_position(&mut self, id: &ConnectionId, position: Point) -> bool {
        if let Some(player) = self.players.get_mut(id) {
            player.x = position.x;
            player.y = position.y;
            true
        } else {
            false
        }
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.players.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ConnectionId> + '_ {
        self.players.keys()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn snapshot(&self) -> PlayersSnapshot {
        self.players
            .iter()
            .map(|(id, player)| (*id, player.clone()))
            .collect()
    }
}
