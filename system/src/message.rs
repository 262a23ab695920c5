use crate::{ConnectionId, LineSegment, PlayersSnapshot, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frames that fail with `Malformed` are dropped; the connection stays open.
#[derive(Debug)]
pub enum ProtocolError {
    Malformed(serde_json::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(e) => write!(f, "malformed client message: {}", e),
            ProtocolError::Encode(e) => write!(f, "cannot encode server message: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Malformed(e) | ProtocolError::Encode(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Display name. Older clients send it as `joinGame`.
    #[serde(alias = "joinGame")]
    Join(String),
    DrawLine(LineSegment),
    UpdatePosition(Point),
    ResetDrawing(String),
}

impl ClientMessage {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Malformed)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializePayload {
    pub self_id: ConnectionId,
    pub players: PlayersSnapshot,
    pub drawn_lines: Vec<LineSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    Initialize(InitializePayload),
    UpdatePlayers(PlayersSnapshot),
    DrawLine(LineSegment),
    ClearDrawing,
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Malformed)
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::Initialize(_) => "initialize",
            ServerMessage::UpdatePlayers(_) => "updatePlayers",
            ServerMessage::DrawLine(_) => "drawLine",
            ServerMessage::ClearDrawing => "clearDrawing",
        }
    }
}
