use derive_new::new;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::alliance::Alliance;
use crate::tile::TileId;


// Ordered from the strongest to the weakest. Names are used verbatim in placement strings.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Display, EnumString, Serialize,
    Deserialize,
)]
pub enum Rank {
    Spy,
    GeneralFive,
    GeneralFour,
    GeneralThree,
    GeneralTwo,
    GeneralOne,
    Colonel,
    LtCol,
    Major,
    Captain,
    LtOne,
    LtTwo,
    Sergeant,
    Private,
    Flag,
}

impl Rank {
    // How many pieces of this rank each side starts with.
    pub fn allowance(self) -> u8 {
        match self {
            Rank::Spy => 2,
            Rank::Private => 6,
            _ => 1,
        }
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, new, Serialize, Deserialize)]
pub struct Piece {
    pub rank: Rank,
    pub tile: TileId,
    pub owner: Alliance,
    pub alliance: Alliance,
}

impl Piece {
    pub fn relocated(self, tile: TileId) -> Self { Piece { tile, ..self } }
}


#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn full_army() {
        assert_eq!(Rank::iter().map(Rank::allowance).sum::<u8>(), 21);
    }

    #[test]
    fn rank_names() {
        assert_eq!(Rank::LtCol.to_string(), "LtCol");
        assert_eq!("GeneralFive".parse::<Rank>().unwrap(), Rank::GeneralFive);
        assert!("Marshal".parse::<Rank>().is_err());
    }
}
