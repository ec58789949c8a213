use serde::{Deserialize, Serialize};

use crate::alliance::Alliance;
use crate::server::ClientId;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Participant {
    pub id: ClientId,
    pub is_host: bool,
    // None until assigned: at join with `AlliancePolicy::HostFirst`, at match start otherwise.
    pub alliance: Option<Alliance>,
    pub is_ready: bool,
    // Cleared when a guest leaves a match that keeps running. The record stays so that the
    // seat remains taken, but the client has no say in the session anymore.
    pub is_connected: bool,
}

impl Participant {
    pub fn new(id: ClientId, is_host: bool, alliance: Option<Alliance>) -> Self {
        Participant {
            id,
            is_host,
            alliance,
            is_ready: false,
            is_connected: true,
        }
    }
}
