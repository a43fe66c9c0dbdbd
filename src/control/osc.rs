//! OSC-over-UDP control transport.
//!
//! A background thread owns the socket, decodes datagrams and pushes flattened messages onto an
//! unbounded single-producer/single-consumer queue. The frame loop drains that queue to empty at
//! the top of every frame, applying messages in arrival order. Nothing is dropped once decoded; a
//! backlog beyond the configured mark is only logged.

use std::net::{SocketAddr, UdpSocket};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use rosc::{OscPacket, OscType};

use crate::control::message::ControlMessage;
use crate::foundation::error::{EngineError, EngineResult};

/// Default listening address.
pub const DEFAULT_BIND: &str = "0.0.0.0:12345";
/// Default backlog at which the receiver starts warning.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
/// Largest datagram accepted.
const MAX_DATAGRAM: usize = 64 * 1024;
/// Socket read timeout; bounds how long shutdown waits for the thread.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Producer half of the control queue.
#[derive(Clone, Debug)]
pub struct ControlSender {
    tx: Sender<ControlMessage>,
    high_water: usize,
}

impl ControlSender {
    /// Enqueue without blocking. Returns `true` when the backlog is past the high-water mark.
    pub fn push(&self, msg: ControlMessage) -> EngineResult<bool> {
        self.tx
            .send(msg)
            .map_err(|_| EngineError::control("control queue consumer dropped"))?;
        Ok(self.tx.len() > self.high_water)
    }
}

/// Consumer half of the control queue, owned by the frame loop.
#[derive(Debug)]
pub struct ControlQueue {
    rx: Receiver<ControlMessage>,
}

impl ControlQueue {
    /// Take every pending message without blocking, oldest first.
    pub fn drain(&self) -> Vec<ControlMessage> {
        self.rx.try_iter().collect()
    }
}

/// Lossless control queue; `high_water` only sets where backlog warnings start.
pub fn control_channel(high_water: usize) -> (ControlSender, ControlQueue) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (
        ControlSender {
            tx,
            high_water: high_water.max(1),
        },
        ControlQueue { rx },
    )
}

/// Decode one UDP payload into messages; bundles are flattened in order.
pub fn decode_datagram(buf: &[u8]) -> EngineResult<Vec<ControlMessage>> {
    let (_rest, packet) = rosc::decoder::decode_udp(buf)
        .map_err(|e| EngineError::control(format!("malformed OSC packet: {e:?}")))?;
    let mut out = Vec::new();
    flatten(packet, &mut out);
    Ok(out)
}

fn flatten(packet: OscPacket, out: &mut Vec<ControlMessage>) {
    match packet {
        OscPacket::Message(msg) => {
            let args = msg.args.iter().filter_map(numeric_arg).collect();
            out.push(ControlMessage::new(msg.addr, args));
        }
        OscPacket::Bundle(bundle) => {
            for p in bundle.content {
                flatten(p, out);
            }
        }
    }
}

fn numeric_arg(arg: &OscType) -> Option<f32> {
    match arg {
        OscType::Float(f) => Some(*f),
        OscType::Double(d) => Some(*d as f32),
        OscType::Int(i) => Some(*i as f32),
        OscType::Long(l) => Some(*l as f32),
        _ => None,
    }
}

/// Running receiver thread. Dropping it stops the thread.
#[derive(Debug)]
pub struct OscReceiver {
    local_addr: SocketAddr,
    stop_tx: Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl OscReceiver {
    /// Bind `bind` and start forwarding decoded messages into `sender`.
    pub fn spawn(bind: &str, sender: ControlSender) -> EngineResult<Self> {
        let sock = UdpSocket::bind(bind).with_context(|| format!("bind OSC socket {bind}"))?;
        sock.set_read_timeout(Some(POLL_INTERVAL))
            .context("set OSC socket read timeout")?;
        let local_addr = sock.local_addr().context("query OSC socket address")?;
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);

        let join = std::thread::Builder::new()
            .name("osc".to_string())
            .spawn(move || receive_loop(&sock, &sender, &stop_rx))
            .context("spawn OSC thread")?;
        tracing::info!(%local_addr, "listening for OSC");

        Ok(Self {
            local_addr,
            stop_tx,
            join: Some(join),
        })
    }

    /// Address the socket is bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for OscReceiver {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

fn receive_loop(sock: &UdpSocket, sender: &ControlSender, stop_rx: &Receiver<()>) {
    let mut buf = vec![0u8; MAX_DATAGRAM];
    let mut backlogged: u64 = 0;
    loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }
        let (len, from) = match sock.recv_from(&mut buf) {
            Ok(v) => v,
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "OSC receive failed");
                std::thread::sleep(POLL_INTERVAL);
                continue;
            }
        };
        let messages = match decode_datagram(&buf[..len]) {
            Ok(m) => m,
            Err(err) => {
                tracing::debug!(%from, error = %err, "ignoring datagram");
                continue;
            }
        };
        for msg in messages {
            match sender.push(msg) {
                Ok(false) => {}
                Ok(true) => {
                    backlogged += 1;
                    if backlogged.is_power_of_two() {
                        tracing::warn!(backlogged, "control queue backlog past high-water mark");
                    }
                }
                Err(_) => {
                    tracing::debug!("control queue closed; stopping OSC thread");
                    return;
                }
            }
        }
    }
    tracing::info!("OSC receiver stopped");
}

#[cfg(test)]
#[path = "../../tests/unit/control/osc.rs"]
mod tests;
