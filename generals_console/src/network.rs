// JSON-over-websocket framing: one event per text message.

use std::io;
use std::net::TcpStream;

use serde::{Serialize, de};
use tungstenite::protocol::Role;
use tungstenite::{Message, WebSocket};


pub const DEFAULT_PORT: u16 = 38718;


#[derive(Debug)]
pub enum CommunicationError {
    ConnectionClosed,
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    Protocol(String),
}

pub fn write_obj<T, S>(socket: &mut WebSocket<S>, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
    S: io::Read + io::Write,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    socket.send(Message::text(serialized)).map_err(CommunicationError::Socket)
}

pub fn read_obj<T, S>(socket: &mut WebSocket<S>) -> Result<T, CommunicationError>
where
    T: de::DeserializeOwned,
    S: io::Read + io::Write,
{
    loop {
        let msg = match socket.read() {
            Ok(msg) => msg,
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                return Err(CommunicationError::ConnectionClosed);
            }
            Err(err) => return Err(CommunicationError::Socket(err)),
        };
        match &msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).map_err(CommunicationError::Serde);
            }
            Message::Close(_) => return Err(CommunicationError::ConnectionClosed),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            Message::Binary(_) => {
                return Err(CommunicationError::Protocol(format!("Expected text, got {:?}", msg)));
            }
        }
    }
}

// Reads and writes happen on different threads, each with its own `WebSocket` over the same
// TCP stream.
// Improvement potential: Switch to non-blocking IO and serve both directions from one thread.
pub fn clone_websocket(socket: &WebSocket<TcpStream>, role: Role) -> io::Result<WebSocket<TcpStream>> {
    let stream = socket.get_ref().try_clone()?;
    Ok(WebSocket::from_raw_socket(stream, role, None))
}
