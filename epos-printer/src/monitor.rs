//! Connection monitoring and retry queue
//!
//! [`PrinterMonitor`] owns the transport, publishes the connection state on
//! a watch channel, and keeps a FIFO queue of documents that failed to
//! transmit. A periodic heartbeat probes the printer; once it answers,
//! queued documents are replayed oldest-first.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PrinterConfig;
use crate::document::{DocumentBuilder, PaperSize};
use crate::transport::Transport;

/// Connection state machine driven by probe and transmission outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Outcome of one print attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    Success,
    Error,
}

/// Monitors one printer: heartbeat, status events, and failed-document replay
pub struct PrinterMonitor<T: Transport> {
    transport: T,
    paper: PaperSize,
    queue: Mutex<VecDeque<Vec<String>>>,
    status_tx: watch::Sender<ConnectionStatus>,
    heartbeat_interval: Duration,
    retry_on_error: bool,
    debug: bool,
}

impl<T: Transport> PrinterMonitor<T> {
    pub fn new(transport: T, config: &PrinterConfig) -> Self {
        let (status_tx, _) = watch::channel(ConnectionStatus::Disconnected);
        Self {
            transport,
            paper: config.paper,
            queue: Mutex::new(VecDeque::new()),
            status_tx,
            heartbeat_interval: Duration::from_millis(config.heartbeat_interval_ms),
            retry_on_error: config.retry_on_error,
            debug: config.debug,
        }
    }

    /// Current connection status
    pub fn status(&self) -> ConnectionStatus {
        *self.status_tx.borrow()
    }

    /// Subscribe to status transitions
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    /// Number of documents waiting for replay
    pub async fn queued_documents(&self) -> usize {
        self.queue.lock().await.len()
    }

    fn set_status(&self, status: ConnectionStatus) {
        let changed = self.status_tx.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        });
        if changed && self.debug {
            debug!(?status, "printer status changed");
        }
    }

    /// Serialize and transmit the buffer's document.
    ///
    /// On success the buffer is reset. On failure the status switches to
    /// [`ConnectionStatus::Error`] and, when retry is enabled, the exact
    /// fragment sequence is queued for replay before the buffer is reset —
    /// the document is never lost.
    pub async fn print(&self, builder: &mut DocumentBuilder) -> PrintOutcome {
        let document = builder.serialize();
        match self.transport.send(&document).await {
            Ok(()) => {
                builder.reset();
                PrintOutcome::Success
            }
            Err(error) => {
                warn!(error = %error, "print failed");
                self.set_status(ConnectionStatus::Error);
                if self.retry_on_error {
                    let snapshot = builder.export_fragments();
                    builder.reset();
                    let mut queue = self.queue.lock().await;
                    queue.push_back(snapshot);
                    if self.debug {
                        debug!(queued = queue.len(), "document queued for retry");
                    }
                }
                PrintOutcome::Error
            }
        }
    }

    /// Run one heartbeat cycle: probe the printer, update the status, and
    /// replay queued documents while it answers.
    pub async fn probe(&self) {
        if self.status() == ConnectionStatus::Disconnected {
            self.set_status(ConnectionStatus::Connecting);
        }

        if !self.transport.check_online().await {
            self.set_status(ConnectionStatus::Error);
            return;
        }

        self.set_status(ConnectionStatus::Connected);
        self.replay_queued().await;
    }

    /// Drain the retry queue FIFO, stopping at the first failed replay
    async fn replay_queued(&self) {
        loop {
            let snapshot = { self.queue.lock().await.pop_front() };
            let Some(snapshot) = snapshot else {
                break;
            };

            info!("replaying queued document");
            let mut replay = DocumentBuilder::new(self.paper);
            replay.import_fragments(snapshot);
            let document = replay.serialize();

            if let Err(error) = self.transport.send(&document).await {
                warn!(error = %error, "replay failed, keeping document queued");
                self.set_status(ConnectionStatus::Error);
                self.queue.lock().await.push_front(replay.export_fragments());
                break;
            }
        }
    }

    /// Heartbeat loop; runs until the token is cancelled
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        info!("printer monitor started");
        let mut ticker = interval(self.heartbeat_interval);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("printer monitor received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    self.probe().await;
                }
            }
        }
    }
}
