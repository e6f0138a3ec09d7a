//! The game client: ties transport, protocol, and session together.
//!
//! # Concurrency model
//!
//! Two tasks, one channel:
//!
//! ```text
//! receive task:  conn.recv → StreamReader.push → enqueue Inbound
//!                                                     │ (mpsc, FIFO)
//! consumer task: next_event → MessageRouter.dispatch ─┘
//!                (owns SessionStateMachine + PathSelector)
//! ```
//!
//! The receive task is producer-only: it decodes frames and enqueues
//! them, and never touches session state. The task that owns the
//! `GameClient` — typically whichever drives the UI — is the single
//! consumer and the single writer of the `Session`. Commands are sent
//! from the consumer side and await the socket directly.
//!
//! There are no timeouts and no reconnects here: a server that goes
//! silent blocks `next_event` forever, and any terminal receive
//! condition is final for this connection instance. Callers wanting
//! either policy wrap the transport or drop the client.

use std::sync::Arc;

use lexgrid_board::{PathOutcome, PathSelector};
use lexgrid_protocol::{
    ClientCommand, FrameCodec, FramingMode, Message, ServerEvent, StreamReader,
};
use lexgrid_session::{Session, SessionStateMachine};
use lexgrid_transport::{Connection, TcpConnection, TransportError};
use tokio::sync::mpsc;
use tokio::sync::Notify;

use crate::{ClientConfig, LexgridError, MessageRouter, SessionObserver};

/// What the receive task hands to the consumer.
#[derive(Debug)]
enum Inbound {
    /// One complete, decoded wire message.
    Message(Message),
    /// The connection is gone. Sent exactly once, last.
    Closed { error: Option<LexgridError> },
}

/// An event returned by [`GameClient::next_event`].
#[derive(Debug)]
pub enum ClientEvent {
    /// A server message was applied to the session.
    Server(ServerEvent),
    /// The connection ended. `error` is `None` for a clean close,
    /// `Some` for a transport failure or a malformed stream.
    Disconnected { error: Option<LexgridError> },
}

/// A connected word-game client.
///
/// Generic over the connection so tests can substitute an in-memory
/// transport; production code uses [`TcpConnection`].
pub struct GameClient<C: Connection<Error = TransportError> = TcpConnection> {
    conn: Arc<C>,
    codec: FrameCodec,
    router: MessageRouter,
    path: PathSelector,
    inbound: mpsc::UnboundedReceiver<Inbound>,
    shutdown: Arc<Notify>,
}

impl GameClient<TcpConnection> {
    /// Dials the configured server and starts the receive task.
    ///
    /// # Errors
    /// Returns the transport error when the dial fails. The attempt is
    /// never retried; the caller decides whether to try again.
    pub async fn connect(config: ClientConfig) -> Result<Self, LexgridError> {
        let mut machine = SessionStateMachine::new();
        machine.begin_connect()?;

        let conn = match TcpConnection::connect(&config.addr()).await {
            Ok(conn) => conn,
            Err(e) => {
                machine.connect_failed();
                return Err(e.into());
            }
        };
        machine.connect_established()?;

        Ok(Self::with_machine(conn, config.framing, machine))
    }
}

impl<C: Connection<Error = TransportError>> GameClient<C> {
    /// Wraps an already-established connection.
    ///
    /// The session starts in `Connected`, exactly as after a
    /// successful dial.
    pub fn from_connection(conn: C, framing: FramingMode) -> Self {
        let mut machine = SessionStateMachine::new();
        machine
            .begin_connect()
            .expect("fresh machine starts disconnected");
        machine
            .connect_established()
            .expect("begin_connect just ran");
        Self::with_machine(conn, framing, machine)
    }

    fn with_machine(
        conn: C,
        framing: FramingMode,
        machine: SessionStateMachine,
    ) -> Self {
        let conn = Arc::new(conn);
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(Notify::new());

        tokio::spawn(receive_loop(
            Arc::clone(&conn),
            framing,
            tx,
            Arc::clone(&shutdown),
        ));

        Self {
            conn,
            codec: FrameCodec::new(framing),
            router: MessageRouter::with_machine(machine),
            path: PathSelector::new(),
            inbound: rx,
            shutdown,
        }
    }

    /// The current session snapshot.
    pub fn session(&self) -> &Session {
        self.router.session()
    }

    /// Registers a session observer.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.router.subscribe(observer);
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Asks the server to create a room and make us its host.
    pub async fn create_room(
        &mut self,
        player_name: impl Into<String>,
        topic: impl Into<String>,
        level_count: u32,
        level_duration: u32,
        max_players: u32,
    ) -> Result<(), LexgridError> {
        self.issue_and_send(ClientCommand::CreateRoom {
            player_name: player_name.into(),
            topic: topic.into(),
            level_count,
            level_duration,
            max_players,
        })
        .await
    }

    /// Asks the server to add us to an existing room.
    pub async fn join_room(
        &mut self,
        room_code: impl Into<String>,
        player_name: impl Into<String>,
    ) -> Result<(), LexgridError> {
        self.issue_and_send(ClientCommand::JoinRoom {
            room_code: room_code.into(),
            player_name: player_name.into(),
        })
        .await
    }

    /// Flips our ready flag (the sent value is derived from the last
    /// confirmed roster; the UI keeps showing confirmed state only).
    pub async fn toggle_ready(&mut self) -> Result<(), LexgridError> {
        self.issue_and_send(ClientCommand::ToggleReady).await
    }

    /// Starts the game. Host only — rejected locally otherwise.
    pub async fn start_game(&mut self) -> Result<(), LexgridError> {
        self.issue_and_send(ClientCommand::StartGame).await
    }

    /// Feeds a grid tap into the selection path.
    pub fn tap_cell(&mut self, row: usize, col: usize) -> PathOutcome {
        let letter = self
            .session()
            .grid
            .as_ref()
            .and_then(|grid| grid.letter(row, col));
        self.path.try_add(row, col, letter)
    }

    /// The word selected so far.
    pub fn current_word(&self) -> &str {
        self.path.word()
    }

    /// Abandons the current selection.
    pub fn clear_selection(&mut self) {
        self.path.reset();
    }

    /// Submits the selected word.
    ///
    /// Returns `Ok(false)` without sending anything when fewer than
    /// two cells are selected — a single tap is not a word.
    pub async fn submit_word(&mut self) -> Result<bool, LexgridError> {
        let width = self
            .session()
            .grid
            .as_ref()
            .map(|grid| grid.width())
            .unwrap_or(0);
        let Some((word, path)) = self.path.submit(width) else {
            return Ok(false);
        };
        self.issue_and_send(ClientCommand::SubmitWord { word, path })
            .await?;
        Ok(true)
    }

    /// Validates, encodes, and sends one command. A local rejection
    /// surfaces here and guarantees zero bytes went out.
    async fn issue_and_send(
        &mut self,
        command: ClientCommand,
    ) -> Result<(), LexgridError> {
        let message = self.router.machine.issue(command)?;
        let bytes = self.codec.encode(&message)?;
        self.conn.send(&bytes).await?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------

    /// Waits for the next applied event.
    ///
    /// Dropped messages (unknown kinds, out-of-state events) are
    /// skipped transparently. Returns `Disconnected` exactly once when
    /// the connection ends, then `None` forever after.
    pub async fn next_event(&mut self) -> Option<ClientEvent> {
        loop {
            match self.inbound.recv().await {
                Some(Inbound::Message(message)) => {
                    let Some(event) = self.router.dispatch(&message) else {
                        continue;
                    };
                    // The server has ruled on the word; the selection
                    // is spent either way.
                    if matches!(
                        event,
                        ServerEvent::WordAccepted(_) | ServerEvent::WordRejected(_)
                    ) {
                        self.path.reset();
                    }
                    return Some(ClientEvent::Server(event));
                }
                Some(Inbound::Closed { error }) => {
                    if self.router.machine.transport_closed() {
                        self.path.reset();
                        return Some(ClientEvent::Disconnected { error });
                    }
                    // Already disconnected: swallow the duplicate.
                }
                None => {
                    // Receive task is gone. If it died without a Closed
                    // item (it shouldn't), still disconnect exactly once.
                    if self.router.machine.transport_closed() {
                        self.path.reset();
                        return Some(ClientEvent::Disconnected { error: None });
                    }
                    return None;
                }
            }
        }
    }

    /// Closes the connection from our side.
    ///
    /// The pending receive unblocks and [`next_event`](Self::next_event)
    /// yields `Disconnected`. Closing twice is a no-op.
    pub async fn disconnect(&mut self) {
        self.shutdown.notify_one();
        let _ = self.conn.close().await;
    }
}

/// The receive task: sole producer of inbound items.
///
/// Decodes and enqueues — never touches session state. Exits after
/// enqueueing exactly one `Closed` item, whichever end hung up first.
async fn receive_loop<C: Connection<Error = TransportError>>(
    conn: Arc<C>,
    framing: FramingMode,
    tx: mpsc::UnboundedSender<Inbound>,
    shutdown: Arc<Notify>,
) {
    let mut reader = StreamReader::new(framing);

    loop {
        let chunk = tokio::select! {
            _ = shutdown.notified() => {
                tracing::debug!(conn = %conn.id(), "receive loop shut down locally");
                let _ = tx.send(Inbound::Closed { error: None });
                return;
            }
            result = conn.recv() => result,
        };

        match chunk {
            Ok(Some(chunk)) => match reader.push(&chunk) {
                Ok(messages) => {
                    for message in messages {
                        if tx.send(Inbound::Message(message)).is_err() {
                            // Consumer dropped the client; nothing left
                            // to deliver to.
                            return;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(
                        conn = %conn.id(),
                        error = %e,
                        "malformed frame, closing connection"
                    );
                    let _ = conn.close().await;
                    let _ = tx.send(Inbound::Closed {
                        error: Some(e.into()),
                    });
                    return;
                }
            },
            Ok(None) => {
                tracing::info!(conn = %conn.id(), "server closed the connection");
                let _ = tx.send(Inbound::Closed { error: None });
                return;
            }
            Err(e) => {
                tracing::debug!(conn = %conn.id(), error = %e, "receive failed");
                let _ = tx.send(Inbound::Closed {
                    error: Some(e.into()),
                });
                return;
            }
        }
    }
}
