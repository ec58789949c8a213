#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod alliance;
pub mod board;
pub mod error;
pub mod event;
pub mod piece;
pub mod placement;
pub mod player;
pub mod rules;
pub mod server;
pub mod session;
pub mod test_util;
pub mod tile;
pub mod turn;

pub use alliance::Alliance;
pub use board::{Board, apply_move};
pub use event::{GeneralsClientEvent, GeneralsServerEvent};
pub use piece::{Piece, Rank};
pub use placement::{PlacementError, parse_layout, parse_placement};
pub use player::Participant;
pub use rules::{AlliancePolicy, GuestDeparturePolicy, ReadinessPolicy, SessionRules};
pub use server::{ClientId, Clients, IncomingEvent, ServerOptions, ServerState};
pub use session::{Session, SessionError, SessionPhase};
pub use tile::TileId;
pub use turn::{MoveKind, MoveRecord, TurnError, TurnMove, TurnRequest};
