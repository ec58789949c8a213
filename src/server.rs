// Handshake and move relay. `ServerState` owns the `Session` and processes one `IncomingEvent`
// at a time; the transport feeds it events and drains per-client channels.

use std::collections::{HashMap, hash_map};
use std::sync::{Arc, Mutex, MutexGuard, mpsc};

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::event::{GeneralsClientEvent, GeneralsServerEvent};
use crate::placement::parse_layout;
use crate::rules::SessionRules;
use crate::session::{LeaveOutcome, Session, SessionError};
use crate::turn::TurnRequest;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct ClientId(pub u64);

#[derive(Debug)]
pub enum IncomingEvent {
    Connected(ClientId),
    Network(ClientId, GeneralsClientEvent),
    Disconnected(ClientId),
}


#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerOptions {
    pub rules: SessionRules,
    // Tell clients why their input was dropped. When off, invalid input is discarded silently
    // (and still logged), which is what older clients expect.
    pub rejection_feedback: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        ServerOptions {
            rules: SessionRules::default(),
            rejection_feedback: true,
        }
    }
}


pub struct Client {
    events_tx: mpsc::Sender<GeneralsServerEvent>,
    // Set once the dispatcher has processed `Connected`. Broadcasts skip clients that have not
    // been told their own id yet.
    announced: bool,
}

impl Client {
    fn send(&self, event: GeneralsServerEvent) {
        // Sending fails only if the writer is gone, in which case `Disconnected` is on its way.
        let _ = self.events_tx.send(event);
    }
}

pub struct Clients {
    map: HashMap<ClientId, Client>,
}

impl Clients {
    pub fn new() -> Self { Self { map: HashMap::new() } }

    pub fn add_client(&mut self, events_tx: mpsc::Sender<GeneralsServerEvent>) -> ClientId {
        let client = Client { events_tx, announced: false };
        loop {
            let id = ClientId(rand::random());
            match self.map.entry(id) {
                hash_map::Entry::Occupied(_) => {}
                hash_map::Entry::Vacant(e) => {
                    e.insert(client);
                    return id;
                }
            }
        }
    }

    pub fn remove_client(&mut self, id: ClientId) { self.map.remove(&id); }

    fn announce(&mut self, id: ClientId) {
        if let Some(client) = self.map.get_mut(&id) {
            client.announced = true;
        }
    }

    fn send(&self, id: ClientId, event: GeneralsServerEvent) {
        if let Some(client) = self.map.get(&id) {
            client.send(event);
        }
    }

    fn send_to_all(&self, ids: impl IntoIterator<Item = ClientId>, event: &GeneralsServerEvent) {
        for id in ids {
            self.send(id, event.clone());
        }
    }

    fn broadcast_except(&self, except: ClientId, event: &GeneralsServerEvent) {
        for (&id, client) in &self.map {
            if id != except && client.announced {
                client.send(event.clone());
            }
        }
    }
}

pub fn lock_clients(clients: &Mutex<Clients>) -> MutexGuard<'_, Clients> {
    // A panic elsewhere doesn't make the client registry inconsistent.
    clients.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}


pub struct ServerState {
    clients: Arc<Mutex<Clients>>,
    options: ServerOptions,
    session: Session,
    rng: StdRng,
}

impl ServerState {
    pub fn new(options: ServerOptions, clients: Arc<Mutex<Clients>>) -> Self {
        Self::with_rng(options, clients, StdRng::from_os_rng())
    }

    pub fn with_rng(options: ServerOptions, clients: Arc<Mutex<Clients>>, rng: StdRng) -> Self {
        ServerState {
            clients,
            options,
            session: Session::new(),
            rng,
        }
    }

    pub fn session(&self) -> &Session { &self.session }

    pub fn apply_event(&mut self, event: IncomingEvent) {
        let clients = Arc::clone(&self.clients);
        let mut clients = lock_clients(&clients);
        match event {
            IncomingEvent::Connected(client_id) => {
                self.process_join(&mut clients, client_id);
            }
            IncomingEvent::Network(client_id, event) => match event {
                GeneralsClientEvent::Ready { placements } => {
                    self.process_ready(&clients, client_id, &placements);
                }
                GeneralsClientEvent::MakeMove(request) => {
                    self.process_make_move(&clients, client_id, request);
                }
                GeneralsClientEvent::Leave => {
                    self.process_leave(&clients, client_id);
                }
            },
            IncomingEvent::Disconnected(client_id) => {
                self.process_leave(&clients, client_id);
                clients.remove_client(client_id);
            }
        }
    }

    fn reject(&self, clients: &Clients, client_id: ClientId, error: SessionError) {
        warn!("Rejected input from {:?}: {:?}", client_id, error);
        if self.options.rejection_feedback {
            clients.send(client_id, GeneralsServerEvent::Rejection(error));
        }
    }

    fn participant_ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.session.participants().iter().filter(|p| p.is_connected).map(|p| p.id)
    }

    fn process_join(&mut self, clients: &mut Clients, client_id: ClientId) {
        clients.send(client_id, GeneralsServerEvent::IdentityAssigned { client_id });
        clients.announce(client_id);
        clients.broadcast_except(client_id, &GeneralsServerEvent::PeerJoined { client_id });
        match self.session.join(client_id, &self.options.rules) {
            Ok(outcome) => {
                info!(
                    "{:?} joined as {}",
                    client_id,
                    if outcome.is_host { "host" } else { "guest" }
                );
                clients.send(client_id, GeneralsServerEvent::SetupGame {
                    is_host: outcome.is_host,
                    assigned_alliance: outcome.assigned_alliance,
                    roster: self.session.participants().to_vec(),
                    board: self.session.board().snapshot(),
                });
            }
            Err(error) => self.reject(clients, client_id, error),
        }
    }

    fn process_ready(&mut self, clients: &Clients, client_id: ClientId, placements: &[String]) {
        let layout = match parse_layout(placements) {
            Ok(layout) => layout,
            Err(error) => {
                self.reject(clients, client_id, SessionError::InvalidPlacement(error));
                return;
            }
        };
        match self.session.ready(client_id, &layout, &self.options.rules, &mut self.rng) {
            Ok(None) => {
                info!("{:?} is ready with {} pieces", client_id, layout.len());
            }
            Ok(Some(start)) => {
                let event = GeneralsServerEvent::MatchStarted {
                    roster: self.session.participants().to_vec(),
                    first_mover: start.first_mover,
                    board: self.session.board().snapshot(),
                    turn_index: self.session.turn_index(),
                };
                clients.send_to_all(self.participant_ids(), &event);
            }
            Err(error) => self.reject(clients, client_id, error),
        }
    }

    fn process_make_move(&mut self, clients: &Clients, client_id: ClientId, request: TurnRequest) {
        match self.session.try_move(client_id, &request) {
            Ok(record) => {
                info!(
                    "Turn {}: {:?} {:?} {} -> {}",
                    record.turn_index,
                    client_id,
                    record.turn_move.kind,
                    record.turn_move.source,
                    record.turn_move.target,
                );
                let event = GeneralsServerEvent::MoveMade { actor: client_id, request };
                clients.send_to_all(self.participant_ids().filter(|&id| id != client_id), &event);
            }
            Err(error) => self.reject(clients, client_id, error),
        }
    }

    fn process_leave(&mut self, clients: &Clients, client_id: ClientId) {
        match self.session.leave(client_id, &self.options.rules) {
            LeaveOutcome::NotParticipant => {}
            LeaveOutcome::HostLeft => {
                info!("Host {:?} left, session reset", client_id);
                clients.broadcast_except(client_id, &GeneralsServerEvent::SessionReset);
            }
            LeaveOutcome::MatchAbandoned => {
                info!("Guest {:?} left a running match, session reset", client_id);
                clients.broadcast_except(client_id, &GeneralsServerEvent::SessionReset);
            }
            LeaveOutcome::GuestLeft => {
                info!("Guest {:?} left", client_id);
                let event = GeneralsServerEvent::PeerLeft { client_id };
                clients.send_to_all(self.participant_ids().filter(|&id| id != client_id), &event);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn registry_survives_poisoned_lock() {
        let clients = Arc::new(Mutex::new(Clients::new()));
        let poisoner = Arc::clone(&clients);
        let result = thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poisoning the registry");
        })
        .join();
        assert!(result.is_err());
        assert!(clients.is_poisoned());

        let (tx, rx) = mpsc::channel();
        let id = lock_clients(&clients).add_client(tx);
        lock_clients(&clients).send(id, GeneralsServerEvent::SessionReset);
        assert_eq!(rx.try_recv(), Ok(GeneralsServerEvent::SessionReset));
    }
}
