use super::frame::{self, Frame, MAX_FRAME_LEN};
use crate::{error, event, info};
use std::time::Duration;
use strum_macros::Display;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Fixed deadline for establishing the simulator session.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Depth of the single-consumer inbound queue. The reader parks on a full
/// queue, so delivery order is preserved under backpressure.
const EVENT_QUEUE_DEPTH: usize = 64;

#[derive(Debug, Display)]
pub enum LinkError {
    ConnectTimeout,
    NoConnection,
}

impl std::error::Error for LinkError {}

/// TCP session to the simulator.
///
/// Owns two pump tasks: a reader that decodes length-prefixed frames into the
/// single-consumer event queue handed out by [`SimLink::connect`], and a
/// writer that drains outbound command frames fire-and-forget. Neither pump
/// ever waits on the other; an acknowledgement is just a later inbound frame.
pub struct SimLink {
    commands: mpsc::UnboundedSender<Frame>,
    cancel: CancellationToken,
}

impl SimLink {
    /// Connects to the simulator and spawns both pump tasks.
    ///
    /// # Returns
    /// The link handle and the inbound frame queue. The queue closes when the
    /// simulator hangs up or the stream turns out to be corrupted.
    pub async fn connect(addr: &str) -> Result<(SimLink, mpsc::Receiver<Frame>), LinkError> {
        let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| LinkError::ConnectTimeout)?
            .map_err(|_| LinkError::NoConnection)?;
        let (read_half, write_half) = stream.into_split();
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(read_pump(read_half, event_tx, cancel.clone()));
        tokio::spawn(write_pump(write_half, cmd_rx, cancel.clone()));
        Ok((SimLink { commands: cmd_tx, cancel }, event_rx))
    }

    /// Provides a cloned handle to the outbound command queue.
    pub fn commands(&self) -> mpsc::UnboundedSender<Frame> { self.commands.clone() }

    /// Stops both pump tasks. Idempotent.
    pub fn shutdown(&self) { self.cancel.cancel(); }
}

impl Drop for SimLink {
    fn drop(&mut self) { self.cancel.cancel(); }
}

async fn read_pump(
    mut reader: OwnedReadHalf,
    events: mpsc::Sender<Frame>,
    cancel: CancellationToken,
) {
    loop {
        let mut prefix = [0u8; 4];
        tokio::select! {
            () = cancel.cancelled() => return,
            res = reader.read_exact(&mut prefix) => match res {
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    info!("Simulator closed the link");
                    return;
                }
                Err(e) => {
                    error!("Link read failed: {e}");
                    return;
                }
            },
        }
        let len = u32::from_be_bytes(prefix) as usize;
        if len > MAX_FRAME_LEN {
            error!("Oversized frame announced ({len} bytes), dropping link");
            return;
        }
        let mut body = vec![0u8; len];
        if let Err(e) = reader.read_exact(&mut body).await {
            error!("Link read failed mid-frame: {e}");
            return;
        }
        match frame::decode(&body) {
            Ok(f) => {
                if events.send(f).await.is_err() {
                    // Receiver gone, the sequence has terminated.
                    return;
                }
            }
            Err(e) => {
                error!("Undecodable frame on the link ({e}), dropping link");
                return;
            }
        }
    }
}

async fn write_pump(
    mut writer: OwnedWriteHalf,
    mut commands: mpsc::UnboundedReceiver<Frame>,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => return,
            cmd = commands.recv() => cmd,
        };
        let Some(outbound) = next else { return };
        let bytes = match frame::encode(&outbound) {
            Ok(b) => b,
            Err(e) => {
                error!("Unencodable outbound frame ({e}): {outbound:?}");
                return;
            }
        };
        if let Err(e) = writer.write_all(&bytes).await {
            error!("Link write failed: {e}");
            return;
        }
        event!("Sent {} {} {} to simulator", outbound.device, outbound.index, outbound.operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comms::frame::{BoardId, DeviceKind, FrameAction, FramePayload, Operation, Priority};
    use tokio::net::TcpListener;

    fn pressure_feed(value: f32) -> Frame {
        Frame {
            dst: BoardId::Software,
            src: BoardId::Rocket,
            priority: Priority::Low,
            action: FrameAction::Feed,
            device: DeviceKind::Sensor,
            index: 3,
            operation: Operation::Read,
            payload: FramePayload::Float(value),
        }
    }

    async fn read_one(stream: &mut TcpStream) -> Frame {
        let mut prefix = [0u8; 4];
        stream.read_exact(&mut prefix).await.unwrap();
        let mut body = vec![0u8; u32::from_be_bytes(prefix) as usize];
        stream.read_exact(&mut body).await.unwrap();
        frame::decode(&body).unwrap()
    }

    #[tokio::test]
    async fn link_delivers_frames_and_tolerates_silence() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let ((link, mut events), (mut sim_side, _)) =
            tokio::join!(async { SimLink::connect(&addr).await.unwrap() }, async {
                listener.accept().await.unwrap()
            });

        // First frame, then a quiet line, then a second frame. Silence must
        // not surface anywhere, the queue just stays empty.
        sim_side.write_all(&frame::encode(&pressure_feed(12.5)).unwrap()).await.unwrap();
        assert_eq!(events.recv().await.unwrap(), pressure_feed(12.5));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(events.try_recv().is_err());
        sim_side.write_all(&frame::encode(&pressure_feed(57.0)).unwrap()).await.unwrap();
        assert_eq!(events.recv().await.unwrap(), pressure_feed(57.0));

        // Outbound direction: fire-and-forget command lands on the sim side.
        let cmd = Frame::service(DeviceKind::Relay, 1, Operation::Open, FramePayload::Empty);
        link.commands().send(cmd.clone()).unwrap();
        assert_eq!(read_one(&mut sim_side).await, cmd);

        link.shutdown();
    }

    #[tokio::test]
    async fn link_closes_queue_when_simulator_hangs_up() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let ((_link, mut events), (sim_side, _)) =
            tokio::join!(async { SimLink::connect(&addr).await.unwrap() }, async {
                listener.accept().await.unwrap()
            });
        drop(sim_side);
        assert!(events.recv().await.is_none());
    }
}
