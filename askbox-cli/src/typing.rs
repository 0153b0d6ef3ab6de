//! Delayed reply display ("bot is typing").
//!
//! Replies are resolved immediately; only their display waits. The worker
//! handles requests strictly in arrival order and sleeps until
//! `received_at + delay`, so a reply queued mid-delay never overtakes an
//! earlier one.

use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct DisplayRequest {
    pub request_id: u64,
    pub text: String,
    pub received_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Typing { request_id: u64 },
    Reply { request_id: u64, text: String },
}

pub async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<DisplayRequest>,
    tx: std::sync::mpsc::Sender<DisplayEvent>,
    delay: Duration,
) {
    while let Some(req) = rx.recv().await {
        let _ = tx.send(DisplayEvent::Typing {
            request_id: req.request_id,
        });

        tokio::time::sleep_until(tokio::time::Instant::from_std(req.received_at + delay)).await;

        let sent = tx.send(DisplayEvent::Reply {
            request_id: req.request_id,
            text: req.text,
        });
        if sent.is_err() {
            // display side is gone
            break;
        }
    }
}

/// Spawn the worker on the current runtime.
pub fn spawn(
    delay: Duration,
) -> (
    mpsc::UnboundedSender<DisplayRequest>,
    std::sync::mpsc::Receiver<DisplayEvent>,
) {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (ev_tx, ev_rx) = std::sync::mpsc::channel();
    tokio::spawn(run_worker(req_rx, ev_tx, delay));
    (req_tx, ev_rx)
}
