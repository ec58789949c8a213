// State of the one and only match hosted by the server.
//
// `Session` knows nothing about networking: `ServerState` calls into it and turns the outcomes
// into events. All methods leave the session unchanged when they return an error.

use std::collections::HashMap;

use itertools::Itertools;
use log::{error, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::alliance::Alliance;
use crate::board::{Board, apply_move};
use crate::internal_error_message;
use crate::piece::Piece;
use crate::placement::PlacementError;
use crate::player::Participant;
use crate::rules::{AlliancePolicy, GuestDeparturePolicy, ReadinessPolicy, SessionRules};
use crate::server::ClientId;
use crate::tile::TileId;
use crate::turn::{MoveRecord, TurnError, TurnRequest};


pub const MAX_PARTICIPANTS: usize = 2;

// Turn index before the match starts. The first move of a match has index 1.
pub const PRE_GAME_TURN_INDEX: u32 = 0;
pub const FIRST_TURN_INDEX: u32 = 1;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    AwaitingPeer,
    ReadyPending,
    Running,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SessionError {
    SessionFull,
    AlreadyJoined,
    NotParticipant,
    AlreadyStarted,
    NotRunning,
    WrongTurnIndex { expected: u32, got: u32 },
    NotYourTurn,
    InvalidMove(TurnError),
    InvalidPlacement(PlacementError),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct JoinOutcome {
    pub is_host: bool,
    pub assigned_alliance: Option<Alliance>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MatchStart {
    pub first_mover: Alliance,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LeaveOutcome {
    NotParticipant,
    // The session has been reset.
    HostLeft,
    // The session has been reset because a running match lost its guest.
    MatchAbandoned,
    // The guest is gone, the session goes on.
    GuestLeft,
}


#[derive(Debug)]
pub struct Session {
    host_id: Option<ClientId>,
    participants: Vec<Participant>, // host first
    board: Board,
    move_history: Vec<MoveRecord>,
    turn_index: u32,
    first_mover: Option<Alliance>,
    current_mover: Option<Alliance>,
    running: bool,
    // Tiles each participant filled during the handshake. Used to take back the layout of
    // a guest who leaves before the match starts.
    placed_tiles: HashMap<ClientId, Vec<TileId>>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            host_id: None,
            participants: Vec::new(),
            board: Board::new(),
            move_history: Vec::new(),
            turn_index: PRE_GAME_TURN_INDEX,
            first_mover: None,
            current_mover: None,
            running: false,
            placed_tiles: HashMap::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.running {
            SessionPhase::Running
        } else {
            match self.participants.len() {
                0 => SessionPhase::Idle,
                1 => SessionPhase::AwaitingPeer,
                _ => SessionPhase::ReadyPending,
            }
        }
    }

    pub fn host_id(&self) -> Option<ClientId> { self.host_id }
    pub fn participants(&self) -> &[Participant] { &self.participants }
    // Only participants that are still connected count.
    pub fn participant(&self, id: ClientId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id && p.is_connected)
    }
    pub fn is_participant(&self, id: ClientId) -> bool { self.participant(id).is_some() }
    pub fn board(&self) -> &Board { &self.board }
    pub fn move_history(&self) -> &[MoveRecord] { &self.move_history }
    pub fn turn_index(&self) -> u32 { self.turn_index }
    pub fn first_mover(&self) -> Option<Alliance> { self.first_mover }
    pub fn current_mover(&self) -> Option<Alliance> { self.current_mover }
    pub fn current_mover_id(&self) -> Option<ClientId> {
        let mover = self.current_mover?;
        self.participants.iter().find(|p| p.alliance == Some(mover)).map(|p| p.id)
    }

    pub fn reset(&mut self) { *self = Session::new(); }

    pub fn join(&mut self, id: ClientId, rules: &SessionRules) -> Result<JoinOutcome, SessionError> {
        if self.is_participant(id) {
            return Err(SessionError::AlreadyJoined);
        }
        if self.participants.len() >= MAX_PARTICIPANTS {
            return Err(SessionError::SessionFull);
        }
        let is_host = self.host_id.is_none();
        let assigned_alliance = match rules.alliance_policy {
            AlliancePolicy::HostFirst => Some(if is_host { Alliance::White } else { Alliance::Black }),
            AlliancePolicy::Random => None,
        };
        if is_host {
            self.host_id = Some(id);
        }
        self.participants.push(Participant::new(id, is_host, assigned_alliance));
        Ok(JoinOutcome { is_host, assigned_alliance })
    }

    // Merges the participant's layout into the board and marks them as ready. Returns
    // `Some` if this started the match.
    pub fn ready(
        &mut self, id: ClientId, layout: &[Piece], rules: &SessionRules, rng: &mut impl Rng,
    ) -> Result<Option<MatchStart>, SessionError> {
        if !self.is_participant(id) {
            return Err(SessionError::NotParticipant);
        }
        if self.running {
            return Err(SessionError::AlreadyStarted);
        }
        let new_tiles = layout
            .iter()
            .map(|p| p.tile)
            .filter(|&tile| !self.board.is_occupied(tile))
            .unique()
            .collect_vec();
        self.board.merge_layout(layout).map_err(SessionError::InvalidPlacement)?;
        self.placed_tiles.entry(id).or_default().extend(new_tiles);
        if let Some(participant) = self.participants.iter_mut().find(|p| p.id == id) {
            participant.is_ready = true;
        }

        let can_start = self.participants.len() == MAX_PARTICIPANTS
            && match rules.readiness_policy {
                ReadinessPolicy::AnyReady => true,
                ReadinessPolicy::AllReady => self.participants.iter().all(|p| p.is_ready),
            };
        Ok(if can_start { Some(self.start(rules, rng)) } else { None })
    }

    fn start(&mut self, rules: &SessionRules, rng: &mut impl Rng) -> MatchStart {
        if rules.alliance_policy == AlliancePolicy::Random {
            let host_alliance = Alliance::from_coin(rng.random_bool(0.5));
            for p in self.participants.iter_mut() {
                p.alliance =
                    Some(if p.is_host { host_alliance } else { host_alliance.opponent() });
            }
        }
        // Independent from alliance assignment.
        let first_mover = Alliance::from_coin(rng.random_bool(0.5));
        self.first_mover = Some(first_mover);
        self.current_mover = Some(first_mover);
        self.turn_index = FIRST_TURN_INDEX;
        self.running = true;
        info!(
            "Match started: {}; {} moves first; pieces: {}",
            roster_summary(&self.participants),
            first_mover,
            census_summary(&self.board),
        );
        MatchStart { first_mover }
    }

    // Validates the move against the turn order, applies it to the board and advances the turn.
    pub fn try_move(
        &mut self, id: ClientId, request: &TurnRequest,
    ) -> Result<MoveRecord, SessionError> {
        if !self.running {
            return Err(SessionError::NotRunning);
        }
        let participant = self.participant(id).ok_or(SessionError::NotParticipant)?;
        if request.turn_index != self.turn_index {
            return Err(SessionError::WrongTurnIndex {
                expected: self.turn_index,
                got: request.turn_index,
            });
        }
        let Some(mover) = self.current_mover else {
            error!("{}", internal_error_message!("running session without a mover"));
            return Err(SessionError::NotRunning);
        };
        if participant.alliance != Some(mover) {
            return Err(SessionError::NotYourTurn);
        }
        let turn_move = request.to_turn_move().map_err(SessionError::InvalidMove)?;
        let board = apply_move(&self.board, &turn_move).map_err(SessionError::InvalidMove)?;

        let record = MoveRecord {
            actor: id,
            turn_index: self.turn_index,
            turn_move,
        };
        self.board = board;
        self.move_history.push(record);
        self.turn_index += 1;
        self.current_mover = Some(mover.opponent());
        Ok(record)
    }

    pub fn leave(&mut self, id: ClientId, rules: &SessionRules) -> LeaveOutcome {
        if !self.is_participant(id) {
            return LeaveOutcome::NotParticipant;
        }
        if self.host_id == Some(id) {
            self.reset();
            return LeaveOutcome::HostLeft;
        }
        if self.running {
            match rules.guest_departure_policy {
                GuestDeparturePolicy::EndSession => {
                    self.reset();
                    return LeaveOutcome::MatchAbandoned;
                }
                GuestDeparturePolicy::KeepRunning => {
                    // Keep the participant record: the turn order still refers to its alliance.
                    if let Some(participant) = self.participants.iter_mut().find(|p| p.id == id) {
                        participant.is_connected = false;
                    }
                    return LeaveOutcome::GuestLeft;
                }
            }
        }
        self.participants.retain(|p| p.id != id);
        for tile in self.placed_tiles.remove(&id).unwrap_or_default() {
            self.board.remove(tile);
        }
        LeaveOutcome::GuestLeft
    }
}


fn roster_summary(participants: &[Participant]) -> String {
    participants
        .iter()
        .map(|p| match p.alliance {
            Some(alliance) => format!("{:?} as {}", p.id, alliance),
            None => format!("{:?} unassigned", p.id),
        })
        .join(", ")
}

fn census_summary(board: &Board) -> String {
    board.census().iter().map(|(alliance, count)| format!("{alliance} {count}")).join(", ")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_summary_mentions_alliances() {
        let host = Participant::new(ClientId(1), true, Some(Alliance::White));
        let guest = Participant::new(ClientId(2), false, None);
        assert_eq!(
            roster_summary(&[host, guest]),
            "ClientId(1) as WHITE, ClientId(2) unassigned"
        );
    }

    #[test]
    fn census_summary_counts_both_sides() {
        let board = Board::from_pieces([Piece::new(
            crate::piece::Rank::Flag,
            TileId::new(5).unwrap(),
            Alliance::Black,
            Alliance::Black,
        )])
        .unwrap();
        assert_eq!(census_summary(&board), "WHITE 0, BLACK 1");
    }
}
