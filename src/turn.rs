use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::server::ClientId;
use crate::tile::TileId;


// How a move changes the board. Clients classify moves themselves; the server trusts them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, Serialize, Deserialize)]
pub enum MoveKind {
    // Equal ranks collide: both pieces leave the board.
    Draw,
    // Move into an empty tile.
    Normal,
    // Attacker wins and takes the target tile.
    AggressiveWin,
    // Attacker loses and leaves the board; defender stays.
    AggressiveLose,
}

impl MoveKind {
    pub fn from_code(code: i32) -> Result<Self, TurnError> {
        match code {
            0 => Ok(MoveKind::Draw),
            1 => Ok(MoveKind::Normal),
            2 => Ok(MoveKind::AggressiveWin),
            3 => Ok(MoveKind::AggressiveLose),
            _ => Err(TurnError::InvalidMoveKind { code }),
        }
    }

    pub fn to_code(self) -> i32 {
        match self {
            MoveKind::Draw => 0,
            MoveKind::Normal => 1,
            MoveKind::AggressiveWin => 2,
            MoveKind::AggressiveLose => 3,
        }
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TurnError {
    InvalidMoveKind { code: i32 },
    TileOutOfRange { tile: u32 },
    PieceMissing { tile: TileId },
    TileOccupied { tile: TileId },
    // A piece cannot move onto or attack its own tile.
    SameTile { tile: TileId },
}


// A move as sent over the network. Kept raw so that malformed input can be reported
// precisely, and relayed verbatim once accepted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TurnRequest {
    pub turn_index: u32,
    pub source: u32,
    pub target: u32,
    pub kind: i32,
}

impl TurnRequest {
    pub fn new(turn_index: u32, source: u32, target: u32, kind: MoveKind) -> Self {
        TurnRequest { turn_index, source, target, kind: kind.to_code() }
    }

    pub fn to_turn_move(&self) -> Result<TurnMove, TurnError> {
        let tile = |idx| TileId::new(idx).ok_or(TurnError::TileOutOfRange { tile: idx });
        Ok(TurnMove {
            source: tile(self.source)?,
            target: tile(self.target)?,
            kind: MoveKind::from_code(self.kind)?,
        })
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TurnMove {
    pub source: TileId,
    pub target: TileId,
    pub kind: MoveKind,
}


// An accepted move. History entries are never modified.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRecord {
    pub actor: ClientId,
    pub turn_index: u32,
    pub turn_move: TurnMove,
}
