pub mod error;
pub mod models;

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use {error::*, models::*};


pub type MessageHandler = Box<dyn Fn(Value) + Send + Sync>;
pub type ErrorHandler = Box<dyn Fn(&Error) + Send + Sync>;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct Handlers {
    on_message: MessageHandler,
    on_error: Option<ErrorHandler>,
}

impl Handlers {
    fn report(&self, e: Error) {
        error!("{}", e);
        if let Some(on_error) = &self.on_error {
            on_error(&e);
        }
    }
}

enum SessionEnd {
    Closed,
    Shutdown,
}

/// Parses one inbound text frame. Malformed payloads are logged and dropped.
pub fn decode_message(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Dropping malformed push message: {}", e);
            None
        }
    }
}

///
/// Best-effort live update listener. Runs as its own task and reconnects
/// with linear backoff until the policy gives up or `disconnect` is called.
/// Nothing here returns an error to the caller; failures go to the
/// optional error handler.
///
pub struct PushChannel {
    state: watch::Receiver<ChannelState>,
    outbound: mpsc::UnboundedSender<String>,
    shutdown: watch::Sender<bool>,
}

impl PushChannel {
    /// Must be called from within a tokio runtime.
    pub fn connect(
        url: &str,
        policy: ReconnectPolicy,
        on_message: MessageHandler,
        on_error: Option<ErrorHandler>,
    ) -> Self {
        // Published before the task starts so `closed` never sees the idle state
        let (state_tx, state) = watch::channel(ChannelState::Connecting);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);

        tokio::spawn(run(
            url.to_string(),
            policy,
            Handlers { on_message, on_error },
            state_tx,
            outbound_rx,
            shutdown_rx,
        ));

        Self { state, outbound, shutdown }
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    ///
    /// Queues a JSON message. Does nothing and returns false unless the
    /// channel is currently connected.
    ///
    pub fn send<T: Serialize + ?Sized>(&self, payload: &T) -> bool {
        if self.state() != ChannelState::Connected {
            debug!("Push channel not connected, message not sent");
            return false;
        }
        match serde_json::to_string(payload) {
            Ok(text) => self.outbound.send(text).is_ok(),
            Err(e) => {
                error!("Could not serialize push message: {}", e);
                false
            }
        }
    }

    /// Closes the connection for good. No reconnect is scheduled.
    pub fn disconnect(&self) {
        self.shutdown.send_replace(true);
    }

    /// Resolves once the channel has disconnected or given up.
    pub async fn closed(&self) -> ChannelState {
        let mut state = self.state.clone();
        let res = state.wait_for(ChannelState::is_terminal).await.map(|s| *s);
        res.unwrap_or(ChannelState::Stopped)
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

async fn run(
    url: String,
    policy: ReconnectPolicy,
    handlers: Handlers,
    state: watch::Sender<ChannelState>,
    mut outbound: mpsc::UnboundedReceiver<String>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut attempt = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }

        state.send_replace(ChannelState::Connecting);
        let connected = tokio::select! {
            res = connect_async(url.as_str()) => res,
            _ = shutdown.changed() => break,
        };

        match connected {
            Ok((socket, _)) => {
                info!("Push channel connected to {}", url);
                attempt = 0;
                // Anything queued for a previous connection is stale
                while outbound.try_recv().is_ok() {}
                state.send_replace(ChannelState::Connected);

                match pump(socket, &handlers, &mut outbound, &mut shutdown).await {
                    SessionEnd::Shutdown => break,
                    SessionEnd::Closed => warn!("Push channel closed"),
                }
            }
            Err(e) => handlers.report(Error::ConnectError(e.to_string())),
        }

        if attempt >= policy.max_attempts {
            info!("Push channel giving up after {} reconnect attempts", attempt);
            state.send_replace(ChannelState::Stopped);
            return;
        }

        attempt += 1;
        state.send_replace(ChannelState::BackoffWait { attempt });
        let delay = policy.delay_for(attempt);
        debug!("Push channel reconnecting in {:?} (attempt {})", delay, attempt);

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => break,
        }
    }

    info!("Push channel disconnected");
    state.send_replace(ChannelState::Disconnected);
}

async fn pump(
    socket: Socket,
    handlers: &Handlers,
    outbound: &mut mpsc::UnboundedReceiver<String>,
    shutdown: &mut watch::Receiver<bool>,
) -> SessionEnd {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if let Some(value) = decode_message(text.as_str()) {
                        (handlers.on_message)(value);
                    }
                }
                Some(Ok(Message::Close(_))) | None => return SessionEnd::Closed,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    handlers.report(Error::StreamError(e.to_string()));
                    return SessionEnd::Closed;
                }
            },
            queued = outbound.recv() => match queued {
                Some(text) => {
                    if let Err(e) = sink.send(Message::text(text)).await {
                        handlers.report(Error::StreamError(e.to_string()));
                        return SessionEnd::Closed;
                    }
                }
                None => return SessionEnd::Shutdown,
            },
            _ = shutdown.changed() => {
                if let Err(e) = sink.close().await {
                    debug!("Push channel close handshake failed: {}", e);
                }
                return SessionEnd::Shutdown;
            }
        }
    }
}
