// Authoritative mirror of board occupancy. The server never evaluates game rules: it replays
// moves the way the moving client classified them.

use std::collections::BTreeMap;

use enum_map::EnumMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::alliance::Alliance;
use crate::piece::Piece;
use crate::placement::PlacementError;
use crate::tile::TileId;
use crate::turn::{MoveKind, TurnError, TurnMove};


// Sparse: a missing key means an empty tile. Keys always match `Piece::tile`.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Board {
    pieces: BTreeMap<TileId, Piece>,
}

impl Board {
    pub fn new() -> Self { Self::default() }

    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Result<Self, PlacementError> {
        let mut board = Board::new();
        board.merge_layout(&pieces.into_iter().collect_vec())?;
        Ok(board)
    }

    pub fn get(&self, tile: TileId) -> Option<&Piece> { self.pieces.get(&tile) }
    pub fn is_occupied(&self, tile: TileId) -> bool { self.pieces.contains_key(&tile) }
    pub fn num_pieces(&self) -> usize { self.pieces.len() }
    pub fn is_empty(&self) -> bool { self.pieces.is_empty() }
    pub fn count_alliance(&self, alliance: Alliance) -> usize { self.census()[alliance] }
    pub fn census(&self) -> EnumMap<Alliance, usize> {
        let mut census = EnumMap::default();
        for piece in self.pieces.values() {
            census[piece.alliance] += 1;
        }
        census
    }

    // Snapshot for the wire, ordered by tile.
    pub fn snapshot(&self) -> Vec<Piece> { self.pieces.values().copied().collect() }

    // Adds pieces to the board. Either all pieces are added or none: re-placing an identical
    // piece is a no-op, placing a different piece on an occupied tile is an error.
    pub fn merge_layout(&mut self, pieces: &[Piece]) -> Result<(), PlacementError> {
        for (a, b) in pieces.iter().tuple_combinations() {
            if a.tile == b.tile && a != b {
                return Err(PlacementError::TileConflict { tile: a.tile });
            }
        }
        for piece in pieces {
            if let Some(existing) = self.pieces.get(&piece.tile) {
                if existing != piece {
                    return Err(PlacementError::TileConflict { tile: piece.tile });
                }
            }
        }
        for piece in pieces {
            self.pieces.insert(piece.tile, *piece);
        }
        Ok(())
    }

    pub fn remove(&mut self, tile: TileId) -> Option<Piece> { self.pieces.remove(&tile) }

    fn relocate(&mut self, from: TileId, to: TileId) -> Result<(), TurnError> {
        let piece = self.pieces.remove(&from).ok_or(TurnError::PieceMissing { tile: from })?;
        self.pieces.insert(to, piece.relocated(to));
        Ok(())
    }
}

// Computes the board after `turn_move`. The input board is left untouched, so a failed move
// never leaves a half-applied state behind.
pub fn apply_move(board: &Board, turn_move: &TurnMove) -> Result<Board, TurnError> {
    let TurnMove { source, target, kind } = *turn_move;
    if source == target {
        return Err(TurnError::SameTile { tile: source });
    }
    if !board.is_occupied(source) {
        return Err(TurnError::PieceMissing { tile: source });
    }
    let mut next = board.clone();
    match kind {
        MoveKind::Draw => {
            next.remove(source);
            next.remove(target);
        }
        MoveKind::Normal => {
            // Moving onto an occupied tile is an attack, which must be classified as such.
            if next.is_occupied(target) {
                return Err(TurnError::TileOccupied { tile: target });
            }
            next.relocate(source, target)?;
        }
        MoveKind::AggressiveWin => {
            next.remove(target);
            next.relocate(source, target)?;
        }
        MoveKind::AggressiveLose => {
            next.remove(source);
        }
    }
    Ok(next)
}
