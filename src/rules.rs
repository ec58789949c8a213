use serde::{Deserialize, Serialize};


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AlliancePolicy {
    // Host plays White, guest plays Black. Known to both sides right after joining.
    HostFirst,
    // Fair coin for the host once the match starts; the guest gets the other side.
    Random,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ReadinessPolicy {
    // The first ready signal received while both participants are present starts the match.
    AnyReady,
    // Each participant has to signal readiness.
    AllReady,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GuestDeparturePolicy {
    // The session keeps running with a single participant. The host can only wait or leave.
    KeepRunning,
    // A running match ends as if the host left.
    EndSession,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRules {
    pub alliance_policy: AlliancePolicy,
    pub readiness_policy: ReadinessPolicy,
    pub guest_departure_policy: GuestDeparturePolicy,
}

impl Default for SessionRules {
    fn default() -> Self {
        SessionRules {
            alliance_policy: AlliancePolicy::HostFirst,
            readiness_policy: ReadinessPolicy::AnyReady,
            guest_departure_policy: GuestDeparturePolicy::EndSession,
        }
    }
}
