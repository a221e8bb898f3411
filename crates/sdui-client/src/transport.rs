//! WebSocket driver
//!
//! Connects to `/ws?instance=...`, sends the bootstrap action on every
//! open, replays each inbound command array into the shared view, and
//! follows [`ChannelMachine`] for reconnects. When the reconnect budget is
//! spent it probes `/status` once over HTTP and stops.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use sdui_types::{ActionMessage, StatusResponse};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::channel::{ChannelMachine, ChannelState, CloseOutcome};
use crate::config::ClientConfig;
use crate::http::HttpChannel;
use crate::interpreter::Interpreter;
use crate::view::{ClientView, Connectivity, Transport};

pub const BOOTSTRAP_ACTION: &str = "show-app";

/// Progress reported to whoever drives the UI.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    State(ChannelState),
    /// A command array of this length was replayed.
    Rendered(usize),
    /// Result of the one-shot probe after giving up.
    Probe(Result<StatusResponse, String>),
}

/// How a single connection ended.
enum SessionEnd {
    /// Server closed or the socket failed.
    Closed,
    /// The local action sender was dropped.
    Finished,
}

pub struct SocketClient {
    config: ClientConfig,
    instance: String,
    bootstrap: ActionMessage,
    interpreter: Interpreter,
    view: Arc<Mutex<ClientView>>,
    machine: ChannelMachine,
    events: Option<mpsc::UnboundedSender<ClientEvent>>,
}

impl SocketClient {
    pub fn new(config: ClientConfig, instance: impl Into<String>) -> Self {
        let machine = ChannelMachine::new(config.reconnect);
        Self {
            config,
            instance: instance.into(),
            bootstrap: ActionMessage::new(BOOTSTRAP_ACTION),
            interpreter: Interpreter::standard(),
            view: Arc::new(Mutex::new(ClientView::standard())),
            machine,
            events: None,
        }
    }

    pub fn with_bootstrap(mut self, bootstrap: ActionMessage) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_interpreter(mut self, interpreter: Interpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<ClientEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn view(&self) -> Arc<Mutex<ClientView>> {
        self.view.clone()
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    fn emit(&self, event: ClientEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    fn set_state(&self, state: ChannelState) {
        debug!("Channel {}", state);
        self.emit(ClientEvent::State(state));
    }

    /// Drive the channel until the action sender is dropped or the
    /// reconnect budget is spent. Returns the final state.
    pub async fn run(mut self, mut actions: mpsc::Receiver<ActionMessage>) -> ChannelState {
        let url = match self.config.socket_url(&self.instance) {
            Ok(url) => url,
            Err(e) => {
                warn!("{}", e);
                self.machine.terminate();
                self.set_state(ChannelState::Terminated);
                return ChannelState::Terminated;
            }
        };

        loop {
            if !self.machine.connect() {
                break;
            }
            self.set_state(ChannelState::Connecting);

            match connect_async(url.as_str()).await {
                Ok((socket, _)) => {
                    self.machine.on_open();
                    self.set_state(ChannelState::Open);
                    info!("Connected to {}", url);
                    self.view
                        .lock()
                        .await
                        .set_connectivity(Connectivity::Connected(Transport::WebSocket));

                    let end = self.pump(socket, &mut actions).await;
                    self.view
                        .lock()
                        .await
                        .set_connectivity(Connectivity::Disconnected);
                    if let SessionEnd::Finished = end {
                        self.machine.terminate();
                        self.set_state(ChannelState::Terminated);
                        return ChannelState::Terminated;
                    }
                    info!("Disconnected from server");
                }
                Err(e) => warn!("Connection to {} failed: {}", url, e),
            }

            match self.machine.on_close() {
                CloseOutcome::Reconnect { delay, attempt } => {
                    self.set_state(ChannelState::Disconnected);
                    info!("Reconnecting in {}ms (attempt {})", delay.as_millis(), attempt);
                    tokio::time::sleep(delay).await;
                }
                CloseOutcome::GiveUp => {
                    warn!("Max reconnection attempts reached");
                    self.set_state(ChannelState::Terminated);
                    self.probe().await;
                    break;
                }
            }
        }

        self.machine.state()
    }

    async fn pump<S>(
        &self,
        socket: tokio_tungstenite::WebSocketStream<S>,
        actions: &mut mpsc::Receiver<ActionMessage>,
    ) -> SessionEnd
    where
        S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
    {
        let (mut sink, mut stream) = socket.split();

        if let Err(e) = send_action(&mut sink, &self.bootstrap).await {
            warn!("Failed to send {}: {}", self.bootstrap.action, e);
            return SessionEnd::Closed;
        }

        loop {
            tokio::select! {
                message = stream.next() => match message {
                    Some(Ok(Message::Text(text))) => self.replay(text.as_str()).await,
                    Some(Ok(Message::Close(frame))) => {
                        debug!("Close frame: {:?}", frame);
                        return SessionEnd::Closed;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        return SessionEnd::Closed;
                    }
                    None => return SessionEnd::Closed,
                },
                action = actions.recv() => match action {
                    Some(action) => {
                        if let Err(e) = send_action(&mut sink, &action).await {
                            warn!("Failed to send {}: {}", action.action, e);
                            return SessionEnd::Closed;
                        }
                    }
                    None => {
                        let _ = sink.send(Message::Close(None)).await;
                        return SessionEnd::Finished;
                    }
                },
            }
        }
    }

    async fn replay(&self, text: &str) {
        let mut view = self.view.lock().await;
        match self.interpreter.interpret_text(&mut view, text) {
            Ok(count) => {
                drop(view);
                self.emit(ClientEvent::Rendered(count));
            }
            Err(e) => view.warn(format!("Ignoring message that is not a command array: {}", e)),
        }
    }

    async fn probe(&self) {
        let http = HttpChannel::new(&self.config.http_url, self.instance.clone());
        let result = http.probe().await.map_err(|e| e.to_string());
        match &result {
            Ok(status) => info!(
                "Server reachable over HTTP: {} ({})",
                status.status, status.environment
            ),
            Err(e) => warn!("Server unreachable over HTTP: {}", e),
        }
        self.emit(ClientEvent::Probe(result));
    }
}

async fn send_action<S>(sink: &mut S, action: &ActionMessage) -> crate::error::Result<()>
where
    S: futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let json = serde_json::to_string(action)?;
    debug!("-> {}", json);
    sink.send(Message::text(json)).await?;
    Ok(())
}
