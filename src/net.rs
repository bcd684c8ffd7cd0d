use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info};

use crate::error::ProtocolError;
use crate::protocol::{Hello, PeerMove, decode_hello, decode_move, encode_line};

type Reader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type Writer = Box<dyn AsyncWrite + Send + Unpin>;

/// Result of waiting for the next peer message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Received {
    Move(PeerMove),
    /// The peer hung up, or [`PeerChannel::close`] was called.
    Closed,
}

/// Duplex line channel to the other player.
///
/// All methods take `&self`, so one task can block in [`PeerChannel::receive`]
/// while another sends or closes through a shared `Arc`.
pub struct PeerChannel {
    reader: Mutex<Reader>,
    writer: Mutex<Writer>,
    closed: watch::Sender<bool>,
    peer_addr: Option<SocketAddr>,
}

impl PeerChannel {
    /// Wraps any byte stream, e.g. a `TcpStream` or one end of `tokio::io::duplex`.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(read_half);
        let writer: Writer = Box::new(write_half);
        let (closed, _) = watch::channel(false);
        Self {
            reader: Mutex::new(BufReader::new(reader)),
            writer: Mutex::new(writer),
            closed,
            peer_addr: None,
        }
    }

    /// Connects to a listening peer.
    pub async fn connect(address: &str, port: u16) -> Result<Self, ProtocolError> {
        let stream = TcpStream::connect((address, port)).await?;
        let peer_addr = stream.peer_addr().ok();
        info!(?peer_addr, "connected to peer");
        let mut channel = Self::from_stream(stream);
        channel.peer_addr = peer_addr;
        Ok(channel)
    }

    /// Waits on `port` for exactly one peer.
    pub async fn listen(port: u16) -> Result<Self, ProtocolError> {
        PeerListener::bind(port).await?.accept().await
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    pub fn is_connected(&self) -> bool {
        !*self.closed.borrow()
    }

    pub async fn send(&self, peer_move: &PeerMove) -> Result<(), ProtocolError> {
        self.send_line(&encode_line(&peer_move.to_frame())?).await
    }

    /// Blocks until a full move arrives or the channel closes.
    ///
    /// A frame that is not a move is an error; the caller should stop reading.
    pub async fn receive(&self) -> Result<Received, ProtocolError> {
        match self.receive_line().await? {
            Some(line) => Ok(Received::Move(decode_move(&line)?)),
            None => Ok(Received::Closed),
        }
    }

    /// Releases the connection. A pending [`PeerChannel::receive`] returns
    /// [`Received::Closed`].
    pub async fn close(&self) {
        if self.closed.send_replace(true) {
            return;
        }
        debug!("closing peer channel");
        let mut writer = self.writer.lock().await;
        if let Err(err) = writer.shutdown().await {
            debug!(?err, "peer channel shutdown failed");
        }
    }

    /// Listener side of the opening exchange: announce the seed, wait for the
    /// joiner to echo it. Returns the joiner's hello.
    pub async fn offer_hello(&self, hello: &Hello) -> Result<Hello, ProtocolError> {
        self.send_line(&encode_line(hello)?).await?;
        let line = self.receive_line().await?.ok_or(ProtocolError::HandshakeClosed)?;
        let reply = decode_hello(&line)?;
        if reply.seed != hello.seed {
            return Err(ProtocolError::SeedMismatch {
                sent: hello.seed,
                echoed: reply.seed,
            });
        }
        Ok(reply)
    }

    /// Joiner side of the opening exchange: read the listener's hello and echo
    /// its seed under `name`. Returns the listener's hello.
    pub async fn answer_hello(&self, name: &str) -> Result<Hello, ProtocolError> {
        let line = self.receive_line().await?.ok_or(ProtocolError::HandshakeClosed)?;
        let offer = decode_hello(&line)?;
        let reply = Hello {
            seed: offer.seed,
            name: name.to_string(),
        };
        self.send_line(&encode_line(&reply)?).await?;
        Ok(offer)
    }

    async fn send_line(&self, line: &str) -> Result<(), ProtocolError> {
        if !self.is_connected() {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "peer channel closed").into());
        }
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// `None` once the channel is closed from either end.
    async fn receive_line(&self) -> Result<Option<String>, ProtocolError> {
        let closed = self.closed.subscribe();
        if *closed.borrow() {
            return Ok(None);
        }
        let mut reader = self.reader.lock().await;
        let mut line = String::new();
        let read = tokio::select! {
            read = reader.read_line(&mut line) => Some(read),
            _ = wait_closed(closed) => None,
        };
        match read {
            None => Ok(None),
            Some(Ok(0)) => {
                self.closed.send_replace(true);
                info!("peer hung up");
                Ok(None)
            }
            Some(Ok(_)) => Ok(Some(line)),
            Some(Err(err)) if is_disconnect(&err) => {
                self.closed.send_replace(true);
                info!(?err, "peer connection dropped");
                Ok(None)
            }
            Some(Err(err)) => Err(err.into()),
        }
    }
}

/// Accepts the single peer of a hosted game.
pub struct PeerListener {
    listener: TcpListener,
}

impl PeerListener {
    pub async fn bind(port: u16) -> Result<Self, ProtocolError> {
        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        info!(addr = ?listener.local_addr().ok(), "waiting for peer");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ProtocolError> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn accept(&self) -> Result<PeerChannel, ProtocolError> {
        let (stream, peer_addr) = self.listener.accept().await?;
        info!(%peer_addr, "peer connected");
        let mut channel = PeerChannel::from_stream(stream);
        channel.peer_addr = Some(peer_addr);
        Ok(channel)
    }
}

async fn wait_closed(mut closed: watch::Receiver<bool>) {
    loop {
        let is_closed = *closed.borrow_and_update();
        if is_closed || closed.changed().await.is_err() {
            return;
        }
    }
}

fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}
