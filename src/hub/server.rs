//! # Subscriber Server
//!
//! WebSocket endpoint for telemetry subscribers. Every accepted connection
//! runs in its own task: hub events flow out as text frames, inbound text
//! frames are parsed as control events and forwarded to the pipeline.
//! A subscriber that stalls, errors or disconnects only ends its own
//! session.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::hub::events::ControlEvent;
use crate::hub::BroadcastHub;
use crate::relay::gate::GateCommand;

/// Listener accepting subscriber connections
pub struct SubscriberServer {
    listener: TcpListener,
    hub: Arc<BroadcastHub>,
    commands: UnboundedSender<GateCommand>,
}

impl SubscriberServer {
    /// Bind the subscriber endpoint
    ///
    /// # Arguments
    ///
    /// * `addr` - Address to listen on
    /// * `hub` - Hub the sessions subscribe to
    /// * `commands` - Pipeline intake for gate commands
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn bind(
        addr: SocketAddr,
        hub: Arc<BroadcastHub>,
        commands: UnboundedSender<GateCommand>,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Subscriber endpoint listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            hub,
            commands,
        })
    }

    /// Address actually bound, useful with an OS-assigned port
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be read back.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept subscriber connections until the task is dropped
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    debug!("Subscriber connection from {}", peer);
                    tokio::spawn(handle_subscriber(
                        stream,
                        peer,
                        Arc::clone(&self.hub),
                        self.commands.clone(),
                    ));
                }
                Err(error) => {
                    error!("Failed to accept subscriber connection: {}", error);
                }
            }
        }
    }
}

/// Run one subscriber session from handshake to unregistration
async fn handle_subscriber(
    stream: TcpStream,
    peer: SocketAddr,
    hub: Arc<BroadcastHub>,
    commands: UnboundedSender<GateCommand>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws_stream) => ws_stream,
        Err(error) => {
            warn!("WebSocket handshake failed with {}: {}", peer, error);
            return;
        }
    };

    let mut subscription = hub.register(peer).await;
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    loop {
        tokio::select! {
            event = subscription.events.recv() => match event {
                Ok(frame) => {
                    if let Err(error) = ws_tx.send(WsMessage::Text(frame.to_string())).await {
                        debug!("Send to {} failed: {}", peer, error);
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Subscriber {} fell {} events behind, disconnecting", peer, skipped);
                    break;
                }
                Err(RecvError::Closed) => break,
            },

            message = ws_rx.next() => match message {
                Some(Ok(WsMessage::Text(text))) => handle_control(&text, peer, &commands),
                Some(Ok(WsMessage::Binary(_))) => {
                    warn!("Unexpected binary frame from {} (ignored)", peer);
                }
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => break,
                Some(Err(error)) => {
                    debug!("WebSocket error from {}: {}", peer, error);
                    break;
                }
            },
        }
    }

    hub.unregister(subscription.id).await;
}

/// Parse one control frame; malformed text is ignored, never fatal
fn handle_control(text: &str, peer: SocketAddr, commands: &UnboundedSender<GateCommand>) {
    let event: ControlEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(error) => {
            warn!("Ignoring malformed control message from {}: {}", peer, error);
            return;
        }
    };

    let command = match event {
        ControlEvent::Start => GateCommand::Start,
        ControlEvent::Stop => GateCommand::Stop,
    };

    info!("Subscriber {} requested {:?}", peer, command);
    if commands.send(command).is_err() {
        warn!("Pipeline command intake closed, {:?} dropped", command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flightlog::FlightLog;
    use std::time::Duration;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio_tungstenite::connect_async;

    struct TestServer {
        addr: SocketAddr,
        hub: Arc<BroadcastHub>,
        command_rx: UnboundedReceiver<GateCommand>,
        _tmp: tempfile::TempDir,
    }

    async fn start_server() -> TestServer {
        let tmp = tempfile::tempdir().unwrap();
        let (log, _) = FlightLog::spawn(tmp.path().join("logs"));
        let hub = Arc::new(BroadcastHub::new(log, 16));
        let (commands, command_rx) = mpsc::unbounded_channel();

        let server = SubscriberServer::bind("127.0.0.1:0".parse().unwrap(), Arc::clone(&hub), commands)
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        TestServer {
            addr,
            hub,
            command_rx,
            _tmp: tmp,
        }
    }

    async fn wait_for_count(hub: &BroadcastHub, expected: usize) {
        for _ in 0..200 {
            if hub.subscriber_count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("subscriber count never reached {expected}");
    }

    #[tokio::test]
    async fn test_start_command_reaches_pipeline() {
        let mut server = start_server().await;
        let (mut ws, _) = connect_async(format!("ws://{}", server.addr)).await.unwrap();

        ws.send(WsMessage::Text(r#"{"event":"start"}"#.to_string()))
            .await
            .unwrap();

        assert_eq!(server.command_rx.recv().await, Some(GateCommand::Start));
    }

    #[tokio::test]
    async fn test_malformed_control_keeps_session_alive() {
        let mut server = start_server().await;
        let (mut ws, _) = connect_async(format!("ws://{}", server.addr)).await.unwrap();

        ws.send(WsMessage::Text("definitely not json".to_string()))
            .await
            .unwrap();
        ws.send(WsMessage::Text(r#"{"event":"reboot"}"#.to_string()))
            .await
            .unwrap();
        ws.send(WsMessage::Text(r#"{"event":"stop"}"#.to_string()))
            .await
            .unwrap();

        // Only the well-formed control event makes it through
        assert_eq!(server.command_rx.recv().await, Some(GateCommand::Stop));
    }

    #[tokio::test]
    async fn test_published_events_reach_subscriber() {
        let server = start_server().await;
        let (ws, _) = connect_async(format!("ws://{}", server.addr)).await.unwrap();
        let (_, mut ws_rx) = ws.split();

        wait_for_count(&server.hub, 1).await;
        server.hub.publish(Arc::from(r#"{"event":"telemetryData","data":{"type":1}}"#));

        let frame = ws_rx.next().await.expect("frame").unwrap();
        assert_eq!(
            frame.into_text().unwrap(),
            r#"{"event":"telemetryData","data":{"type":1}}"#
        );
    }

    #[tokio::test]
    async fn test_disconnect_unregisters_subscriber() {
        let server = start_server().await;
        let (mut ws, _) = connect_async(format!("ws://{}", server.addr)).await.unwrap();

        wait_for_count(&server.hub, 1).await;
        ws.close(None).await.unwrap();
        wait_for_count(&server.hub, 0).await;
    }
}
