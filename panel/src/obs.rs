//! Connection management for the obs-websocket control socket.
//!
//! One task owns the socket. The UI talks to it through [`ObsClient`] and
//! hears back on the panel message channel, so request replies and
//! unsolicited events arrive on the same path in arrival order.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::time::Duration;

use futures::{sink::SinkExt, stream::StreamExt};
use slate_types::{Request, RequestEnvelope, Response, ResponseStatus, ServerMessage};
use tokio::net::TcpStream;
use tokio::select;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::state::{ConnectionState, PanelMessage};

/// Delay between reconnection attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Errors surfaced to callers of [`ObsClient::send`].
#[derive(Debug, thiserror::Error)]
pub enum ObsError {
    #[error("not connected to OBS")]
    NotConnected,
    #[error("connection lost before the reply arrived")]
    ConnectionLost,
    #[error("request rejected by OBS: {0}")]
    Rejected(String),
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("connection task is gone")]
    TaskGone,
}

/// Commands accepted by the connection task.
pub(crate) enum Command {
    /// Send a request and deliver the outcome on the oneshot channel
    Send {
        request: Request,
        response: oneshot::Sender<Result<Response, ObsError>>,
    },
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingReplies = HashMap<String, oneshot::Sender<Result<Response, ObsError>>>;

/// Handle for issuing requests to OBS.
///
/// Clones share one connection task, and the handle stays valid across
/// reconnects, so holders never need to re-acquire it.
#[derive(Clone)]
pub struct ObsClient {
    commands: mpsc::UnboundedSender<Command>,
}

impl ObsClient {
    /// Spawn the connection task for `url` and return a handle to it.
    ///
    /// Connectivity transitions and forwarded events are posted to `events`;
    /// `ctx` is nudged after every post so the UI repaints promptly.
    pub fn spawn(
        url: String,
        events: Sender<PanelMessage>,
        ctx: egui::Context,
        rt: &tokio::runtime::Handle,
    ) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        rt.spawn(connection_loop(url, command_rx, events, ctx));
        Self { commands }
    }

    /// Handle wired to a bare channel, for tests that assert on the
    /// commands the panel issues.
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (commands, command_rx) = mpsc::unbounded_channel();
        (Self { commands }, command_rx)
    }

    /// Send a request and wait for the matching response.
    ///
    /// Fails immediately while disconnected; nothing is queued for later.
    /// A response with error status comes back as [`ObsError::Rejected`].
    pub async fn send(&self, request: Request) -> Result<Response, ObsError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.commands
            .send(Command::Send {
                request,
                response: response_tx,
            })
            .map_err(|_| ObsError::TaskGone)?;
        let response = response_rx.await.map_err(|_| ObsError::TaskGone)??;
        match response.status {
            ResponseStatus::Ok => Ok(response),
            ResponseStatus::Error => Err(ObsError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "no reason given".to_string()),
            )),
        }
    }

    /// Issue a request and deliver a successful response back onto the panel
    /// channel, keyed by the request kind, so replies read like any other
    /// event. Failures are logged and produce nothing.
    pub fn send_as_event(
        &self,
        request: Request,
        events: Sender<PanelMessage>,
        ctx: egui::Context,
        rt: &tokio::runtime::Handle,
    ) {
        let client = self.clone();
        let kind = request.kind();
        rt.spawn(async move {
            match client.send(request).await {
                Ok(response) => {
                    let _ = events.send(PanelMessage::Reply {
                        request: kind,
                        response,
                    });
                    ctx.request_repaint();
                }
                Err(err) => {
                    tracing::warn!("{} request failed: {}", kind.name(), err);
                }
            }
        });
    }
}

/// Keep one connection to OBS alive, retrying forever on a fixed delay.
async fn connection_loop(
    url: String,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: Sender<PanelMessage>,
    ctx: egui::Context,
) {
    loop {
        tracing::info!("Connecting to OBS at {}", url);
        match connect_async(&url).await {
            Ok((socket, _)) => {
                tracing::info!("Connected to OBS");
                let _ = events.send(PanelMessage::ConnectionChanged(ConnectionState::Connected));
                ctx.request_repaint();

                run_session(socket, &mut commands, &events, &ctx).await;

                tracing::warn!("Connection to OBS lost");
                let _ = events.send(PanelMessage::ConnectionChanged(
                    ConnectionState::Disconnected,
                ));
                ctx.request_repaint();
            }
            Err(err) => {
                tracing::warn!("Unable to connect to OBS: {}", err);
                let _ = events.send(PanelMessage::ConnectionChanged(
                    ConnectionState::Disconnected,
                ));
                ctx.request_repaint();
            }
        }

        if !wait_before_reconnect(&mut commands).await {
            return;
        }
    }
}

/// Sit out the reconnect delay, failing any commands that arrive in the
/// meantime. Returns false once every client handle is gone.
async fn wait_before_reconnect(commands: &mut mpsc::UnboundedReceiver<Command>) -> bool {
    let delay = tokio::time::sleep(RECONNECT_DELAY);
    tokio::pin!(delay);
    loop {
        select! {
            _ = &mut delay => return true,
            command = commands.recv() => match command {
                Some(Command::Send { response, .. }) => {
                    let _ = response.send(Err(ObsError::NotConnected));
                }
                None => return false,
            },
        }
    }
}

/// Drive one established connection until it drops.
///
/// Outgoing requests get a session-local `message-id`; the matching reply
/// resolves the pending entry. Anything still pending when the socket goes
/// away resolves with a connection-lost error.
async fn run_session(
    socket: Socket,
    commands: &mut mpsc::UnboundedReceiver<Command>,
    events: &Sender<PanelMessage>,
    ctx: &egui::Context,
) {
    let (mut sink, mut stream) = socket.split();
    let mut pending: PendingReplies = HashMap::new();
    let mut next_id: u64 = 1;

    loop {
        select! {
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => handle_text(&text, &mut pending, events, ctx),
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) => {
                    tracing::info!("OBS closed the connection");
                    break;
                }
                // Binary and raw frames are not part of the 4.x protocol
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::error!("WebSocket error: {}", err);
                    break;
                }
                None => break,
            },
            command = commands.recv() => match command {
                Some(Command::Send { request, response }) => {
                    let message_id = next_id.to_string();
                    next_id += 1;
                    let envelope = RequestEnvelope {
                        message_id: message_id.clone(),
                        request,
                    };
                    match serde_json::to_string(&envelope) {
                        Ok(payload) => {
                            tracing::debug!("Sending request: {}", payload);
                            if let Err(err) = sink.send(Message::Text(payload.into())).await {
                                tracing::error!("Failed to send request: {}", err);
                                let _ = response.send(Err(ObsError::ConnectionLost));
                                break;
                            }
                            pending.insert(message_id, response);
                        }
                        Err(err) => {
                            let _ = response.send(Err(ObsError::Encode(err)));
                        }
                    }
                }
                None => break,
            },
        }
    }

    // Whatever is still in flight will never be answered on this socket
    for (_, response) in pending.drain() {
        let _ = response.send(Err(ObsError::ConnectionLost));
    }
}

/// Route one text frame: replies resolve their pending request, events go
/// onto the panel channel, anything else is noise.
fn handle_text(
    text: &str,
    pending: &mut PendingReplies,
    events: &Sender<PanelMessage>,
    ctx: &egui::Context,
) {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::Reply(response)) => match pending.remove(&response.message_id) {
            Some(reply) => {
                let _ = reply.send(Ok(response));
            }
            None => {
                tracing::debug!("Reply for unknown message-id {}", response.message_id);
            }
        },
        Ok(ServerMessage::Update(update)) => {
            tracing::debug!("Status update: {}", update.description());
            let _ = events.send(PanelMessage::Status(update));
            ctx.request_repaint();
        }
        Err(err) => {
            tracing::debug!("Ignoring unparseable message: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PanelChannels;
    use serde_json::json;
    use slate_types::StatusUpdate;
    use std::sync::mpsc::Receiver;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    /// Single-connection stand-in for obs-websocket. Answers both filename
    /// requests; optionally pushes a recording update after the first reply
    /// and then drops the socket.
    async fn serve_one(listener: TcpListener, push_update_then_close: bool) {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut socket = accept_async(stream).await.expect("handshake failed");

        while let Some(Ok(message)) = socket.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            let envelope: RequestEnvelope =
                serde_json::from_str(&text).expect("malformed request");
            let reply = match envelope.request {
                Request::GetFilenameFormatting => json!({
                    "message-id": envelope.message_id,
                    "status": "ok",
                    "filename-formatting": "%hh%mm_Demo_Scene_2",
                }),
                Request::SetFilenameFormatting { .. } => json!({
                    "message-id": envelope.message_id,
                    "status": "ok",
                }),
            };
            socket
                .send(Message::Text(reply.to_string().into()))
                .await
                .expect("reply failed");

            if push_update_then_close {
                socket
                    .send(Message::Text(
                        json!({"update-type": "RecordingStarting"}).to_string().into(),
                    ))
                    .await
                    .expect("push failed");
                break;
            }
        }
    }

    /// Reject every request, like OBS does while a recording is active.
    async fn serve_rejections(listener: TcpListener) {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut socket = accept_async(stream).await.expect("handshake failed");

        while let Some(Ok(message)) = socket.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            let envelope: RequestEnvelope =
                serde_json::from_str(&text).expect("malformed request");
            let reply = json!({
                "message-id": envelope.message_id,
                "status": "error",
                "error": "recording active",
            });
            socket
                .send(Message::Text(reply.to_string().into()))
                .await
                .expect("reply failed");
        }
    }

    /// Drain the panel channel without blocking the test runtime.
    async fn next_message(rx: &Receiver<PanelMessage>) -> PanelMessage {
        for _ in 0..200 {
            if let Ok(message) = rx.try_recv() {
                return message;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("no panel message arrived in time");
    }

    async fn bound_listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        (listener, url)
    }

    #[tokio::test]
    async fn test_request_resolves_with_the_matching_response() {
        let (listener, url) = bound_listener().await;
        tokio::spawn(serve_one(listener, false));

        let channels = PanelChannels::new();
        let client = ObsClient::spawn(
            url,
            channels.sender(),
            egui::Context::default(),
            &tokio::runtime::Handle::current(),
        );

        let response = client
            .send(Request::GetFilenameFormatting)
            .await
            .expect("request failed");
        assert_eq!(response.status, ResponseStatus::Ok);
        assert_eq!(
            response.filename_formatting.as_deref(),
            Some("%hh%mm_Demo_Scene_2")
        );
    }

    #[tokio::test]
    async fn test_connectivity_and_updates_arrive_as_messages() {
        let (listener, url) = bound_listener().await;
        tokio::spawn(serve_one(listener, true));

        let channels = PanelChannels::new();
        let client = ObsClient::spawn(
            url,
            channels.sender(),
            egui::Context::default(),
            &tokio::runtime::Handle::current(),
        );

        let first = next_message(&channels.rx).await;
        assert!(matches!(
            first,
            PanelMessage::ConnectionChanged(ConnectionState::Connected)
        ));

        client
            .send(Request::SetFilenameFormatting {
                filename_formatting: "%hh%mm_Demo_Scene_3".to_string(),
            })
            .await
            .expect("request failed");

        let second = next_message(&channels.rx).await;
        assert!(matches!(
            second,
            PanelMessage::Status(StatusUpdate::RecordingStarting)
        ));

        // The server hangs up after pushing the update
        let third = next_message(&channels.rx).await;
        assert!(matches!(
            third,
            PanelMessage::ConnectionChanged(ConnectionState::Disconnected)
        ));
    }

    #[tokio::test]
    async fn test_requests_fail_immediately_while_disconnected() {
        // Grab a port with nothing listening on it
        let (listener, url) = bound_listener().await;
        drop(listener);

        let channels = PanelChannels::new();
        let client = ObsClient::spawn(
            url,
            channels.sender(),
            egui::Context::default(),
            &tokio::runtime::Handle::current(),
        );

        let err = client
            .send(Request::GetFilenameFormatting)
            .await
            .expect_err("must fail while disconnected");
        assert!(matches!(err, ObsError::NotConnected));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_rejected() {
        let (listener, url) = bound_listener().await;
        tokio::spawn(serve_rejections(listener));

        let channels = PanelChannels::new();
        let client = ObsClient::spawn(
            url,
            channels.sender(),
            egui::Context::default(),
            &tokio::runtime::Handle::current(),
        );

        let err = client
            .send(Request::GetFilenameFormatting)
            .await
            .expect_err("must surface the rejection");
        match err {
            ObsError::Rejected(reason) => assert_eq!(reason, "recording active"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
