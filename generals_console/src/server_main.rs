// Transport for `ServerState`: a websocket per client, with a reader and a writer thread each.
// All events go through a single channel into the thread that owns the state, so the session is
// only ever touched by one thread.

use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use anyhow::{Context, anyhow};
use generals_online::event::{GeneralsClientEvent, GeneralsServerEvent};
use generals_online::server::{Clients, IncomingEvent, ServerState, lock_clients};
use log::{error, info, warn};
use tungstenite::protocol::Role;

use crate::network::{self, CommunicationError};
use crate::server_config::ServerConfig;


fn handle_connection(
    stream: TcpStream, tx: mpsc::Sender<IncomingEvent>, clients: Arc<Mutex<Clients>>,
) -> anyhow::Result<()> {
    let peer_addr = stream.peer_addr().map_or_else(|_| "?".to_owned(), |addr| addr.to_string());
    let socket = tungstenite::accept(stream)
        .map_err(|err| anyhow!("Websocket handshake with {peer_addr} failed: {err}"))?;
    let mut in_socket = network::clone_websocket(&socket, Role::Server)
        .with_context(|| format!("Cannot clone socket for {peer_addr}"))?;
    let mut out_socket = socket;

    let (client_tx, client_rx) = mpsc::channel::<GeneralsServerEvent>();
    let client_id = lock_clients(&clients).add_client(client_tx);
    info!("Client {:?} connected from {}", client_id, peer_addr);
    tx.send(IncomingEvent::Connected(client_id))
        .map_err(|_| anyhow!("Server loop is not running"))?;

    // Server -> Client. Ends when the server drops the client.
    thread::spawn(move || {
        for event in client_rx {
            if let Err(err) = network::write_obj(&mut out_socket, &event) {
                warn!("Cannot write to client {:?}: {:?}", client_id, err);
                break;
            }
        }
    });

    // Client -> Server
    loop {
        match network::read_obj::<GeneralsClientEvent, _>(&mut in_socket) {
            Ok(event) => {
                if tx.send(IncomingEvent::Network(client_id, event)).is_err() {
                    break;
                }
            }
            Err(err) => {
                match err {
                    CommunicationError::ConnectionClosed => {
                        info!("Client {:?} disconnected", client_id)
                    }
                    err => warn!(
                        "Client {:?} disconnected due to read error: {:?}",
                        client_id, err
                    ),
                }
                let _ = tx.send(IncomingEvent::Disconnected(client_id));
                break;
            }
        }
    }
    Ok(())
}

pub fn run(config: ServerConfig) -> anyhow::Result<()> {
    info!("Starting server with {:?}", config.options);
    let (tx, rx) = mpsc::channel();
    let clients = Arc::new(Mutex::new(Clients::new()));
    let clients_view = Arc::clone(&clients);
    let options = config.options.clone();
    thread::spawn(move || {
        let mut server_state = ServerState::new(options, clients);
        for event in rx {
            server_state.apply_event(event);
        }
        error!("Unexpected end of events stream");
    });

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .with_context(|| format!("Cannot listen on port {}", config.port))?;
    info!("Listening to connections on {}...", listener.local_addr()?);
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let tx = tx.clone();
                let clients = Arc::clone(&clients_view);
                thread::spawn(move || {
                    if let Err(err) = handle_connection(stream, tx, clients) {
                        warn!("{:#}", err);
                    }
                });
            }
            Err(err) => {
                warn!("Cannot establish connection: {}", err);
            }
        }
    }
    Err(anyhow!("Unexpected end of TcpListener::incoming"))
}
