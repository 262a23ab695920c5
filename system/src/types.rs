use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type ConnectionId = u64;

/// Every player, keyed by the connection it belongs to.
pub type PlayersSnapshot = BTreeMap<ConnectionId, Player>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Display color as the client sent it, or `#rrggbb` when generated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rgb: u32 = rng.gen_range(0..=0xFF_FFFF);
        Self(format!("#{:06x}", rgb))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: ConnectionId,
    pub x: f64,
    pub y: f64,
    pub color: Color,
}

impl Player {
    pub fn new(id: ConnectionId, color: Color) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            color,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
    pub color: Color,
}

impl LineSegment {
    pub fn new(from: Point, to: Point, color: Color) -> Self {
        Self { from, to, color }
    }
}
