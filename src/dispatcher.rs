//! Session dispatcher.
//!
//! Owns the transport, the state machine, and the window for one session,
//! and routes inbound frames per their command_id: responses correlate to a
//! pending [`WindowFuture`], keep-alive and unbind get an immediate reply on
//! the I/O task, and message PDUs are handed to a [`Handler`] running on a
//! separate tokio task so a slow or blocking handler can't stall the read
//! loop. Grounded on `connection.rs`'s `Connection` + `client/default.rs`'s
//! per-command matching, generalized to the server-capable routing table.

use crate::client::types::BindType;
use crate::codec::{CodecError, Frame};
use crate::connection::Connection;
use crate::datatypes::*;
use crate::state::{SessionState, StateError, StateMachine};
use crate::window::{Window, WindowError, WindowOutcome};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::interval;

const MAX_SEQUENCE_NUMBER: u32 = 0x7FFF_FFFF;

/// Errors raised while dispatching a session's inbound or outbound traffic.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("handler raised an exception: {0}")]
    HandlerException(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    /// The command_status a dispatcher should reply with for this error.
    pub fn command_status(&self) -> CommandStatus {
        match self {
            DispatchError::State(e) => e.command_status(),
            DispatchError::Window(e) => e.command_status(),
            DispatchError::Codec(e) => e.to_command_status(),
            DispatchError::HandlerException(_) => CommandStatus::SystemError,
            DispatchError::Io(_) => CommandStatus::SystemError,
        }
    }
}

/// Per-session metadata: identity, state, sequence numbers, counters.
pub struct Session {
    session_id: u64,
    /// The session's bind/unbind/close state machine.
    pub state: StateMachine,
    peer_system_id: Mutex<String>,
    bind_type: Mutex<Option<BindType>>,
    created_at: Instant,
    sequence: AtomicU32,
    attributes: Mutex<HashMap<String, String>>,
    messages_sent: AtomicU64,
    messages_received: AtomicU64,
}

impl Session {
    pub fn new(session_id: u64) -> Session {
        Session {
            session_id,
            state: StateMachine::new(),
            peer_system_id: Mutex::new(String::new()),
            bind_type: Mutex::new(None),
            created_at: Instant::now(),
            sequence: AtomicU32::new(1),
            attributes: Mutex::new(HashMap::new()),
            messages_sent: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
        }
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn peer_system_id(&self) -> String {
        self.peer_system_id.lock().unwrap().clone()
    }

    pub fn set_peer_system_id(&self, system_id: impl Into<String>) {
        *self.peer_system_id.lock().unwrap() = system_id.into();
    }

    pub fn bind_type(&self) -> Option<BindType> {
        *self.bind_type.lock().unwrap()
    }

    fn set_bind_type(&self, bind_type: BindType) {
        *self.bind_type.lock().unwrap() = Some(bind_type);
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Next outbound sequence number, wrapping from 0x7FFFFFFF back to 1.
    pub fn next_sequence_number(&self) -> u32 {
        loop {
            let current = self.sequence.load(Ordering::Relaxed);
            let next = if current >= MAX_SEQUENCE_NUMBER { 1 } else { current + 1 };
            if self
                .sequence
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return current;
            }
        }
    }

    pub fn set_attribute(&self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.lock().unwrap().insert(key.into(), value.into());
    }

    pub fn attribute(&self, key: &str) -> Option<String> {
        self.attributes.lock().unwrap().get(key).cloned()
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }
}

/// Configuration for a [`Dispatcher`], mirroring the builder pattern used by
/// `client::builder::ClientBuilder`.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Maximum number of in-flight requests (default 512).
    pub window_size: usize,
    /// How long a request may remain unanswered before timing out (default 30s).
    pub request_timeout: Duration,
    /// How long `offer` blocks for a free window slot by default (default 5s).
    pub wait_timeout: Duration,
    /// Idle interval before an enquire_link keep-alive is emitted (default 30s).
    pub enquire_link_interval: Duration,
    /// system_id this dispatcher replies with in bind responses (server role).
    pub local_system_id: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            window_size: 512,
            request_timeout: Duration::from_secs(30),
            wait_timeout: Duration::from_secs(5),
            enquire_link_interval: Duration::from_secs(30),
            local_system_id: String::new(),
        }
    }
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn with_enquire_link_interval(mut self, interval: Duration) -> Self {
        self.enquire_link_interval = interval;
        self
    }

    pub fn with_local_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.local_system_id = system_id.into();
        self
    }
}

/// User-supplied business logic for a bound SMPP session.
///
/// Every method has a default implementation so a handler only needs to
/// override what it actually cares about; everything else falls back to
/// rejecting the request with `SystemError` (or, for `authenticate`,
/// rejecting the bind).
pub trait Handler: Send + Sync + 'static {
    /// Authenticate an inbound bind request. Returning `false` rejects the
    /// bind with `BindFailed` and closes the transport.
    fn authenticate(
        &self,
        session: &Session,
        system_id: &str,
        password: &str,
        bind_type: BindType,
    ) -> impl Future<Output = bool> + Send {
        let _ = (session, system_id, password, bind_type);
        async { false }
    }

    fn handle_submit_sm(
        &self,
        session: &Session,
        request: &SubmitSm,
    ) -> impl Future<Output = Result<SubmitSmResponse, DispatchError>> + Send {
        let _ = session;
        let seq = request.sequence_number;
        async move { Ok(SubmitSmResponse::error(seq, CommandStatus::SystemError)) }
    }

    fn handle_submit_multi(
        &self,
        session: &Session,
        request: &SubmitMulti,
    ) -> impl Future<Output = Result<SubmitMultiResponse, DispatchError>> + Send {
        let _ = session;
        let seq = request.sequence_number;
        async move {
            Ok(SubmitMultiResponse {
                command_status: CommandStatus::SystemError,
                sequence_number: seq,
                message_id: MessageId::new(b"").expect("empty message id is valid"),
                no_unsuccess: 0,
                unsuccess_sme: Vec::new(),
            })
        }
    }

    fn handle_deliver_sm(
        &self,
        session: &Session,
        request: &DeliverSm,
    ) -> impl Future<Output = Result<DeliverSmResponse, DispatchError>> + Send {
        let _ = session;
        let seq = request.sequence_number;
        async move {
            Ok(DeliverSmResponse {
                command_status: CommandStatus::SystemError,
                sequence_number: seq,
                message_id: MessageId::new(b"").expect("empty message id is valid"),
            })
        }
    }

    fn handle_data_sm(
        &self,
        session: &Session,
        request: &DataSm,
    ) -> impl Future<Output = Result<DataSmResponse, DispatchError>> + Send {
        let _ = session;
        let seq = request.sequence_number;
        async move {
            Ok(DataSmResponse {
                command_status: CommandStatus::SystemError,
                sequence_number: seq,
                message_id: MessageId::new(b"").expect("empty message id is valid"),
                optional_parameters: Vec::new(),
            })
        }
    }

    fn handle_query_sm(
        &self,
        session: &Session,
        request: &QuerySm,
    ) -> impl Future<Output = Result<QuerySmResponse, DispatchError>> + Send {
        let _ = session;
        let seq = request.sequence_number;
        let message_id = request.message_id.clone();
        async move {
            Ok(QuerySmResponse {
                command_status: CommandStatus::SystemError,
                sequence_number: seq,
                message_id,
                final_date: None,
                message_state: MessageState::Unknown,
                error_code: 0,
            })
        }
    }

    fn handle_cancel_sm(
        &self,
        session: &Session,
        request: &CancelSm,
    ) -> impl Future<Output = Result<CancelSmResponse, DispatchError>> + Send {
        let _ = session;
        let seq = request.sequence_number;
        async move {
            CancelSmResponse::new(seq, CommandStatus::SystemError)
                .map_err(|e| DispatchError::HandlerException(e.to_string()))
        }
    }

    fn handle_replace_sm(
        &self,
        session: &Session,
        request: &ReplaceSm,
    ) -> impl Future<Output = Result<ReplaceSmResponse, DispatchError>> + Send {
        let _ = session;
        let seq = request.sequence_number;
        async move {
            ReplaceSmResponse::new(seq, CommandStatus::SystemError)
                .map_err(|e| DispatchError::HandlerException(e.to_string()))
        }
    }

    /// alert_notification has no response; the default implementation logs
    /// and does nothing.
    fn handle_alert_notification(
        &self,
        session: &Session,
        notification: &AlertNotification,
    ) -> impl Future<Output = ()> + Send {
        let _ = session;
        let source = notification.source_addr.clone();
        async move {
            tracing::debug!(?source, "alert_notification received, no handler installed");
        }
    }
}

/// Drives one session's I/O loop: reads frames, routes them per the inbound
/// table, and writes outbound responses produced either inline or by a
/// handler task.
pub struct Dispatcher<H: Handler> {
    connection: Connection,
    session: Arc<Session>,
    window: Arc<Window>,
    handler: Arc<H>,
    config: DispatcherConfig,
    /// Outbound frames produced off the I/O task (by a spawned handler or
    /// bind call), paired with whether the session must close once the
    /// frame is on the wire (a failed bind reply, per spec.md's "on failure
    /// reply with error status and close").
    outbound_tx: mpsc::UnboundedSender<(Frame, bool)>,
    outbound_rx: mpsc::UnboundedReceiver<(Frame, bool)>,
}

impl<H: Handler> Dispatcher<H> {
    pub fn new(connection: Connection, session_id: u64, handler: H, config: DispatcherConfig) -> Self {
        let window = Arc::new(Window::new(config.window_size, config.request_timeout));
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        Dispatcher {
            connection,
            session: Arc::new(Session::new(session_id)),
            window,
            handler: Arc::new(handler),
            config,
            outbound_tx,
            outbound_rx,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    async fn write_frame(&mut self, frame: &Frame) -> Result<(), DispatchError> {
        self.connection.write_frame(frame).await?;
        self.session.messages_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Submit a request onto the wire, correlating the response through the
    /// window. Validates transmit capability before sending.
    pub async fn send_request(&mut self, request: Frame) -> Result<crate::window::WindowFuture, DispatchError> {
        self.session.state.validate_can_transmit()?;
        let future = self.window.offer(request, self.config.wait_timeout).await?;
        if let Err(e) = self.connection.write_frame(future.request()).await {
            self.window.fail(future.sequence_number(), WindowError::SessionClosed);
            return Err(e.into());
        }
        self.session.messages_sent.fetch_add(1, Ordering::Relaxed);
        Ok(future)
    }

    /// Run the session to completion: connect, process frames until the
    /// peer closes or an unbind exchange completes, then tear down.
    pub async fn run(mut self) -> Result<(), DispatchError> {
        self.session.state.on_connect()?;

        let mut enquire_ticker = interval(self.config.enquire_link_interval);
        let mut expire_ticker = interval(self.config.request_timeout / 4);
        enquire_ticker.tick().await;
        expire_ticker.tick().await;
        let mut missed_enquire_ticks = 0u32;
        let mut closing = false;

        while !closing {
            tokio::select! {
                frame = self.connection.read_frame() => {
                    match frame {
                        Ok(Some(frame)) => {
                            missed_enquire_ticks = 0;
                            self.session.messages_received.fetch_add(1, Ordering::Relaxed);
                            if let Err(e) = self.handle_inbound(frame, &mut closing).await {
                                tracing::warn!(error = %e, "error dispatching inbound frame");
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            tracing::warn!(error = %e, "connection read failed, closing session");
                            break;
                        }
                    }
                }
                Some((response, close_after)) = self.outbound_rx.recv() => {
                    if let Err(e) = self.write_frame(&response).await {
                        tracing::warn!(error = %e, "failed to write outbound frame");
                        break;
                    }
                    if close_after {
                        closing = true;
                    }
                }
                _ = enquire_ticker.tick() => {
                    if matches!(
                        self.session.state.state(),
                        SessionState::BoundTx | SessionState::BoundRx | SessionState::BoundTrx
                    ) {
                        missed_enquire_ticks += 1;
                        if missed_enquire_ticks >= 2 {
                            tracing::warn!("no read traffic for two enquire_link intervals, closing session");
                            break;
                        }
                        let seq = self.session.next_sequence_number();
                        let frame = Frame::EnquireLink(EnquireLink::new(seq));
                        if let Err(e) = self.write_frame(&frame).await {
                            tracing::warn!(error = %e, "failed to send keep-alive enquire_link");
                            break;
                        }
                    }
                }
                _ = expire_ticker.tick() => {
                    let expired = self.window.expire_old_requests();
                    if expired > 0 {
                        tracing::debug!(count = expired, "expired stale pending requests");
                    }
                }
            }
        }

        self.session.state.on_close();
        self.window.close();
        Ok(())
    }

    async fn handle_inbound(&mut self, frame: Frame, closing: &mut bool) -> Result<(), DispatchError> {
        match frame {
            // Checked before the response-bit guard below: an unrecognized
            // command_id always gets generic_nack'd, even if its high bit
            // happens to look like a response.
            Frame::Unknown { sequence_number, .. } => {
                let response = Frame::GenericNack(GenericNack::invalid_command_id(sequence_number));
                self.write_frame(&response).await?;
            }

            _ if frame.is_response() => {
                let seq = frame.sequence_number();
                let is_unbind_resp = frame.command_id() == Some(CommandId::UnbindResp);
                if !self.window.complete(seq, frame) {
                    tracing::warn!(seq, "unsolicited response, no matching pending request");
                }
                if is_unbind_resp {
                    *closing = true;
                }
            }

            Frame::EnquireLink(req) => {
                let response = Frame::EnquireLinkResp(EnquireLinkResponse::new(req.sequence_number));
                self.write_frame(&response).await?;
            }

            Frame::Unbind(req) => {
                let response = Frame::UnbindResp(UnbindResponse::new(req.sequence_number));
                self.write_frame(&response).await?;
                self.session.state.on_unbind()?;
                *closing = true;
            }

            Frame::GenericNack(nack) => {
                if !self.window.complete(nack.sequence_number, Frame::GenericNack(nack)) {
                    tracing::warn!("received generic_nack with no matching pending request");
                }
            }

            Frame::BindTransmitter(bind) => self.spawn_bind_transmitter(bind),
            Frame::BindReceiver(bind) => self.spawn_bind_receiver(bind),
            Frame::BindTransceiver(bind) => self.spawn_bind_transceiver(bind),

            Frame::SubmitSm(req) => self.spawn_submit_sm(*req),
            Frame::SubmitMulti(req) => self.spawn_submit_multi(*req),
            Frame::DeliverSm(req) => self.spawn_deliver_sm(*req),
            Frame::DataSm(req) => self.spawn_data_sm(*req),
            Frame::QuerySm(req) => self.spawn_query_sm(req),
            Frame::CancelSm(req) => self.spawn_cancel_sm(req),
            Frame::ReplaceSm(req) => self.spawn_replace_sm(*req),
            Frame::AlertNotification(notification) => self.spawn_alert_notification(notification),

            Frame::Outbind(_) => {
                tracing::debug!("received outbind on a bound-session-only dispatcher, ignoring");
            }

            other => {
                tracing::warn!(command_id = ?other.command_id(), "unhandled request PDU");
            }
        }
        Ok(())
    }

    fn spawn_bind_transmitter(&self, bind: BindTransmitter) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        let local_system_id = self.config.local_system_id.clone();
        tokio::spawn(async move {
            let seq = bind.sequence_number;
            let system_id = bind.system_id.as_str().unwrap_or("").to_string();
            let password = bind.password.as_ref().and_then(|p| p.as_str().ok()).unwrap_or("");
            let ok = handler
                .authenticate(&session, &system_id, password, BindType::Transmitter)
                .await;
            let (response, close_after) = if ok && session.state.on_bind(BindType::Transmitter).is_ok() {
                session.set_peer_system_id(system_id);
                (
                    Frame::BindTransmitterResp(BindTransmitterResponse {
                        command_status: CommandStatus::Ok,
                        sequence_number: seq,
                        system_id: SystemId::from(local_system_id.as_str()),
                        sc_interface_version: None,
                    }),
                    false,
                )
            } else {
                (
                    Frame::BindTransmitterResp(BindTransmitterResponse {
                        command_status: CommandStatus::BindFailed,
                        sequence_number: seq,
                        system_id: SystemId::default(),
                        sc_interface_version: None,
                    }),
                    true,
                )
            };
            let _ = outbound_tx.send((response, close_after));
        });
    }

    fn spawn_bind_receiver(&self, bind: BindReceiver) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        let local_system_id = self.config.local_system_id.clone();
        tokio::spawn(async move {
            let seq = bind.sequence_number;
            let system_id = bind.system_id.as_str().unwrap_or("").to_string();
            let password = bind.password.as_ref().and_then(|p| p.as_str().ok()).unwrap_or("");
            let ok = handler
                .authenticate(&session, &system_id, password, BindType::Receiver)
                .await;
            let (response, close_after) = if ok && session.state.on_bind(BindType::Receiver).is_ok() {
                session.set_peer_system_id(system_id);
                (
                    Frame::BindReceiverResp(BindReceiverResponse {
                        command_status: CommandStatus::Ok,
                        sequence_number: seq,
                        system_id: SystemId::from(local_system_id.as_str()),
                        sc_interface_version: None,
                    }),
                    false,
                )
            } else {
                (
                    Frame::BindReceiverResp(BindReceiverResponse {
                        command_status: CommandStatus::BindFailed,
                        sequence_number: seq,
                        system_id: SystemId::default(),
                        sc_interface_version: None,
                    }),
                    true,
                )
            };
            let _ = outbound_tx.send((response, close_after));
        });
    }

    fn spawn_bind_transceiver(&self, bind: BindTransceiver) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        let local_system_id = self.config.local_system_id.clone();
        tokio::spawn(async move {
            let seq = bind.sequence_number;
            let system_id = bind.system_id.as_str().unwrap_or("").to_string();
            let password = bind.password.as_ref().and_then(|p| p.as_str().ok()).unwrap_or("");
            let ok = handler
                .authenticate(&session, &system_id, password, BindType::Transceiver)
                .await;
            let (response, close_after) = if ok && session.state.on_bind(BindType::Transceiver).is_ok() {
                session.set_peer_system_id(system_id);
                (
                    Frame::BindTransceiverResp(BindTransceiverResponse {
                        command_status: CommandStatus::Ok,
                        sequence_number: seq,
                        system_id: SystemId::from(local_system_id.as_str()),
                        sc_interface_version: None,
                    }),
                    false,
                )
            } else {
                (
                    Frame::BindTransceiverResp(BindTransceiverResponse {
                        command_status: CommandStatus::BindFailed,
                        sequence_number: seq,
                        system_id: SystemId::default(),
                        sc_interface_version: None,
                    }),
                    true,
                )
            };
            let _ = outbound_tx.send((response, close_after));
        });
    }

    fn spawn_submit_sm(&self, req: SubmitSm) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        tokio::spawn(async move {
            let seq = req.sequence_number;
            let response = match handler.handle_submit_sm(&session, &req).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!(error = %e, seq, "submit_sm handler failed");
                    SubmitSmResponse::error(seq, e.command_status())
                }
            };
            let _ = outbound_tx.send((Frame::SubmitSmResp(response), false));
        });
    }

    fn spawn_submit_multi(&self, req: SubmitMulti) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        tokio::spawn(async move {
            let seq = req.sequence_number;
            let response = match handler.handle_submit_multi(&session, &req).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!(error = %e, seq, "submit_multi handler failed");
                    SubmitMultiResponse {
                        command_status: e.command_status(),
                        sequence_number: seq,
                        message_id: MessageId::new(b"").expect("empty message id is valid"),
                        no_unsuccess: 0,
                        unsuccess_sme: Vec::new(),
                    }
                }
            };
            let _ = outbound_tx.send((Frame::SubmitMultiResp(response), false));
        });
    }

    fn spawn_deliver_sm(&self, req: DeliverSm) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        tokio::spawn(async move {
            let seq = req.sequence_number;
            let response = match handler.handle_deliver_sm(&session, &req).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!(error = %e, seq, "deliver_sm handler failed");
                    DeliverSmResponse {
                        command_status: e.command_status(),
                        sequence_number: seq,
                        message_id: MessageId::new(b"").expect("empty message id is valid"),
                    }
                }
            };
            let _ = outbound_tx.send((Frame::DeliverSmResp(response), false));
        });
    }

    fn spawn_data_sm(&self, req: DataSm) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        tokio::spawn(async move {
            let seq = req.sequence_number;
            let response = match handler.handle_data_sm(&session, &req).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!(error = %e, seq, "data_sm handler failed");
                    DataSmResponse {
                        command_status: e.command_status(),
                        sequence_number: seq,
                        message_id: MessageId::new(b"").expect("empty message id is valid"),
                        optional_parameters: Vec::new(),
                    }
                }
            };
            let _ = outbound_tx.send((Frame::DataSmResp(response), false));
        });
    }

    fn spawn_query_sm(&self, req: QuerySm) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        tokio::spawn(async move {
            let seq = req.sequence_number;
            let message_id = req.message_id.clone();
            let response = match handler.handle_query_sm(&session, &req).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!(error = %e, seq, "query_sm handler failed");
                    QuerySmResponse {
                        command_status: e.command_status(),
                        sequence_number: seq,
                        message_id,
                        final_date: None,
                        message_state: MessageState::Unknown,
                        error_code: 0,
                    }
                }
            };
            let _ = outbound_tx.send((Frame::QuerySmResp(response), false));
        });
    }

    fn spawn_cancel_sm(&self, req: CancelSm) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        tokio::spawn(async move {
            let seq = req.sequence_number;
            let response = match handler.handle_cancel_sm(&session, &req).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!(error = %e, seq, "cancel_sm handler failed");
                    CancelSmResponse::new(seq, e.command_status())
                        .expect("status-only cancel_sm_resp is always valid")
                }
            };
            let _ = outbound_tx.send((Frame::CancelSmResp(response), false));
        });
    }

    fn spawn_replace_sm(&self, req: ReplaceSm) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        let outbound_tx = self.outbound_tx.clone();
        tokio::spawn(async move {
            let seq = req.sequence_number;
            let response = match handler.handle_replace_sm(&session, &req).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!(error = %e, seq, "replace_sm handler failed");
                    ReplaceSmResponse::new(seq, e.command_status())
                        .expect("status-only replace_sm_resp is always valid")
                }
            };
            let _ = outbound_tx.send((Frame::ReplaceSmResp(response), false));
        });
    }

    fn spawn_alert_notification(&self, notification: AlertNotification) {
        let handler = self.handler.clone();
        let session = self.session.clone();
        tokio::spawn(async move {
            handler.handle_alert_notification(&session, &notification).await;
        });
    }
}
