// Textual piece placements exchanged during the handshake.
//
// Format: "rank=<Rank>;tileId=<0..71>;owner=<ALLIANCE>;alliance=<ALLIANCE>". The keys always
// come in this order. Values are sliced between consecutive keys, so a value may not contain
// the next key.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alliance::Alliance;
use crate::piece::{Piece, Rank};
use crate::tile::TileId;


const RANK_KEY: &str = "rank=";
const TILE_KEY: &str = ";tileId=";
const OWNER_KEY: &str = ";owner=";
const ALLIANCE_KEY: &str = ";alliance=";


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PlacementError {
    MissingField { field: String },
    UnknownRank { rank: String },
    InvalidTile { tile: String },
    UnknownAlliance { alliance: String },
    // Two placements claim the same tile with different pieces.
    TileConflict { tile: TileId },
}

fn missing(key: &str) -> PlacementError {
    PlacementError::MissingField {
        field: key.trim_start_matches(';').trim_end_matches('=').to_owned(),
    }
}

// Returns the values for `keys`, in order. Each key is searched after the end of the previous one.
fn split_fields<'a, const N: usize>(
    s: &'a str, keys: [&str; N],
) -> Result<[&'a str; N], PlacementError> {
    let mut bounds = [(0, 0); N];
    let mut pos = 0;
    for (i, key) in keys.iter().enumerate() {
        let start = s[pos..].find(key).ok_or_else(|| missing(key))? + pos;
        bounds[i] = (start, start + key.len());
        pos = start + key.len();
    }
    let mut values = [""; N];
    for i in 0..N {
        let value_start = bounds[i].1;
        let value_end = if i + 1 < N { bounds[i + 1].0 } else { s.len() };
        values[i] = s[value_start..value_end].trim();
    }
    Ok(values)
}

fn parse_alliance(value: &str) -> Result<Alliance, PlacementError> {
    value.parse().map_err(|_| PlacementError::UnknownAlliance { alliance: value.to_owned() })
}

pub fn parse_placement(s: &str) -> Result<Piece, PlacementError> {
    let [rank, tile, owner, alliance] =
        split_fields(s.trim(), [RANK_KEY, TILE_KEY, OWNER_KEY, ALLIANCE_KEY])?;
    let rank = rank
        .parse::<Rank>()
        .map_err(|_| PlacementError::UnknownRank { rank: rank.to_owned() })?;
    let tile = tile
        .parse::<u32>()
        .ok()
        .and_then(TileId::new)
        .ok_or_else(|| PlacementError::InvalidTile { tile: tile.to_owned() })?;
    Ok(Piece {
        rank,
        tile,
        owner: parse_alliance(owner)?,
        alliance: parse_alliance(alliance)?,
    })
}

// Decodes a whole layout. Repeating the same placement is allowed, but a tile cannot hold two
// different pieces.
pub fn parse_layout<S: AsRef<str>>(placements: &[S]) -> Result<Vec<Piece>, PlacementError> {
    let mut by_tile: HashMap<TileId, Piece> = HashMap::new();
    let mut pieces = Vec::new();
    for placement in placements {
        let piece = parse_placement(placement.as_ref())?;
        match by_tile.get(&piece.tile) {
            Some(existing) if *existing == piece => {}
            Some(_) => return Err(PlacementError::TileConflict { tile: piece.tile }),
            None => {
                by_tile.insert(piece.tile, piece);
                pieces.push(piece);
            }
        }
    }
    Ok(pieces)
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rank={};tileId={};owner={};alliance={}",
            self.rank, self.tile, self.owner, self.alliance
        )
    }
}
