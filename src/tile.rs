use std::fmt;

use serde::{Deserialize, Serialize};


pub const NUM_COLS: u8 = 9;
pub const NUM_ROWS: u8 = 8;
pub const TOTAL_TILES: u8 = NUM_COLS * NUM_ROWS;


// Tiles are numbered row by row starting from Black's back row: tile 0 is Black's corner,
// tile 71 is White's corner.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TileId {
    idx: u8,
}

impl TileId {
    pub fn new(idx: u32) -> Option<Self> {
        if idx < u32::from(TOTAL_TILES) {
            Some(TileId { idx: idx as u8 })
        } else {
            None
        }
    }
}

impl TryFrom<u32> for TileId {
    type Error = String;
    fn try_from(idx: u32) -> Result<Self, Self::Error> {
        TileId::new(idx).ok_or_else(|| format!("tile {idx} is outside of 0..{TOTAL_TILES}"))
    }
}

impl From<TileId> for u32 {
    fn from(tile: TileId) -> u32 { u32::from(tile.idx) }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.idx) }
}
