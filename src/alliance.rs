use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};


// Placement strings and logs spell alliances in upper case ("WHITE"), but parsing accepts any case.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Display, EnumString,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Alliance {
    White,
    Black,
}

impl Alliance {
    pub fn opponent(self) -> Alliance {
        match self {
            Alliance::White => Alliance::Black,
            Alliance::Black => Alliance::White,
        }
    }

    pub fn from_coin(heads: bool) -> Alliance { if heads { Alliance::White } else { Alliance::Black } }
}
