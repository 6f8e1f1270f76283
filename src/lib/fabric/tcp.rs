//! TCP fabric for multi-process deployment.
//!
//! Each link carries the same discrete messages as the in-process fabric,
//! framed on the socket with a `u32` little-endian length prefix. The
//! coordinator listens and accepts exactly one connection per category; each
//! worker connects and announces its category in a hello message. Any
//! membership mismatch (unknown label, duplicate category) is fatal, since
//! the static topology has no recovery path.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::{TcpListener, TcpStream};

use log::{debug, info};

use crate::category::{Category, NUM_CATEGORIES};
use crate::errors::{Result, StorymillError};
use crate::fabric::Channel;

/// Upper bound on a single message, to reject garbage length prefixes.
const MAX_MESSAGE_LEN: usize = 64 * 1024 * 1024;

/// One end of a TCP link.
pub struct TcpChannel {
    peer: String,
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl TcpChannel {
    fn new(peer: String, stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true).map_err(|source| StorymillError::Transport {
            peer: peer.clone(),
            source,
        })?;
        let read_half = stream.try_clone().map_err(|source| StorymillError::Transport {
            peer: peer.clone(),
            source,
        })?;
        Ok(Self { peer, reader: BufReader::new(read_half), writer: BufWriter::new(stream) })
    }

    fn io_err(&self, source: std::io::Error) -> StorymillError {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            StorymillError::Disconnected { peer: self.peer.clone() }
        } else {
            StorymillError::Transport { peer: self.peer.clone(), source }
        }
    }
}

impl Channel for TcpChannel {
    fn peer(&self) -> &str {
        &self.peer
    }

    fn send(&mut self, payload: &[u8]) -> Result<()> {
        let len = u32::try_from(payload.len()).map_err(|_| StorymillError::ProtocolViolation {
            peer: self.peer.clone(),
            reason: format!("message of {} bytes exceeds the frame limit", payload.len()),
        })?;
        self.writer.write_all(&len.to_le_bytes()).map_err(|e| self.io_err(e))?;
        self.writer.write_all(payload).map_err(|e| self.io_err(e))?;
        self.writer.flush().map_err(|e| self.io_err(e))?;
        Ok(())
    }

    fn recv(&mut self) -> Result<Vec<u8>> {
        let mut len_bytes = [0u8; 4];
        self.reader.read_exact(&mut len_bytes).map_err(|e| self.io_err(e))?;
        let len = u32::from_le_bytes(len_bytes) as usize;
        if len > MAX_MESSAGE_LEN {
            return Err(StorymillError::ProtocolViolation {
                peer: self.peer.clone(),
                reason: format!("frame length {len} exceeds the {MAX_MESSAGE_LEN} byte limit"),
            });
        }
        let mut payload = vec![0u8; len];
        self.reader.read_exact(&mut payload).map_err(|e| self.io_err(e))?;
        Ok(payload)
    }
}

/// Coordinator side of group formation: accept exactly one worker per
/// category.
///
/// Blocks until all four workers have connected and announced themselves.
/// Returns the links in [`Category::ALL`] order.
pub fn accept_workers(addr: &str) -> Result<Vec<(Category, TcpChannel)>> {
    let listener = TcpListener::bind(addr).map_err(|source| StorymillError::Transport {
        peer: "workers".to_string(),
        source,
    })?;
    info!("Coordinator listening on {addr}");

    let mut links: Vec<Option<TcpChannel>> = (0..NUM_CATEGORIES).map(|_| None).collect();
    let mut accepted = 0;
    while accepted < NUM_CATEGORIES {
        let (stream, remote) = listener.accept().map_err(|source| StorymillError::Transport {
            peer: "workers".to_string(),
            source,
        })?;
        let mut link = TcpChannel::new("worker".to_string(), stream)?;

        let hello = link.recv()?;
        let label = String::from_utf8(hello).map_err(|_| StorymillError::ProtocolViolation {
            peer: "worker".to_string(),
            reason: "hello message is not valid UTF-8".to_string(),
        })?;
        let category =
            Category::from_label(&label).ok_or_else(|| StorymillError::InvalidProcessGroup {
                reason: format!("worker announced unknown category '{label}'"),
            })?;

        let slot = &mut links[category.rank() - 1];
        if slot.is_some() {
            return Err(StorymillError::InvalidProcessGroup {
                reason: format!("two workers announced category '{category}'"),
            });
        }
        link.peer = category.label().to_string();
        debug!("Accepted {category} worker from {remote}");
        *slot = Some(link);
        accepted += 1;
    }

    let mut group = Vec::with_capacity(NUM_CATEGORIES);
    for (category, link) in Category::ALL.into_iter().zip(links) {
        let link = link.ok_or_else(|| StorymillError::InvalidProcessGroup {
            reason: format!("no worker connected for category '{category}'"),
        })?;
        group.push((category, link));
    }
    Ok(group)
}

/// Worker side of group formation: connect and announce our category.
pub fn connect_to_coordinator(addr: &str, category: Category) -> Result<TcpChannel> {
    let stream = TcpStream::connect(addr).map_err(|source| StorymillError::Transport {
        peer: "coordinator".to_string(),
        source,
    })?;
    let mut link = TcpChannel::new("coordinator".to_string(), stream)?;
    link.send(category.label().as_bytes())?;
    debug!("Connected to coordinator at {addr} as {category}");
    Ok(link)
}
