use serde::{Deserialize, Serialize};

use crate::alliance::Alliance;
use crate::piece::Piece;
use crate::player::Participant;
use crate::server::ClientId;
use crate::session::SessionError;
use crate::turn::TurnRequest;


#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneralsServerEvent {
    // Sent to a new connection before anything else.
    IdentityAssigned {
        client_id: ClientId,
    },
    // Sent to everybody else when a connection arrives.
    PeerJoined {
        client_id: ClientId,
    },
    SetupGame {
        is_host: bool,
        assigned_alliance: Option<Alliance>,
        roster: Vec<Participant>,
        board: Vec<Piece>,
    },
    MatchStarted {
        roster: Vec<Participant>,
        first_mover: Alliance,
        board: Vec<Piece>,
        turn_index: u32,
    },
    // Relays an accepted move to the other participant. `request` is exactly what the actor sent.
    MoveMade {
        actor: ClientId,
        request: TurnRequest,
    },
    PeerLeft {
        client_id: ClientId,
    },
    // The session is over and all its state is gone. Clients need to reconnect to play again.
    SessionReset,
    Rejection(SessionError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneralsClientEvent {
    // Layout uses the placement string format, see `placement.rs`. May be empty.
    Ready {
        placements: Vec<String>,
    },
    MakeMove(TurnRequest),
    Leave,
}
