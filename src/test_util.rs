// Test utilities shared by unit and integration tests.

use rand::SeedableRng;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;

use crate::alliance::Alliance;
use crate::piece::{Piece, Rank};
use crate::tile::{TOTAL_TILES, TileId};


// Random tests verify statistical properties that should always hold, but let's fix the seed
// to avoid sporadic failures.
pub fn deterministic_rng() -> StdRng { StdRng::seed_from_u64(0) }

// A full army packed into the alliance's back rows: Black from tile 0 up, White from tile 71
// down.
pub fn sample_layout(alliance: Alliance) -> Vec<Piece> {
    let tiles: Box<dyn Iterator<Item = u8>> = match alliance {
        Alliance::Black => Box::new(0..TOTAL_TILES),
        Alliance::White => Box::new((0..TOTAL_TILES).rev()),
    };
    let ranks = Rank::iter().flat_map(|rank| std::iter::repeat_n(rank, rank.allowance().into()));
    ranks
        .zip(tiles)
        .filter_map(|(rank, idx)| {
            let tile = TileId::new(idx.into())?;
            Some(Piece::new(rank, tile, alliance, alliance))
        })
        .collect()
}

pub fn sample_placements(alliance: Alliance) -> Vec<String> {
    sample_layout(alliance).iter().map(Piece::to_string).collect()
}

