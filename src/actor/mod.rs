//! Collaborator actors. Everything under this module talks to the Core
//! through a channel and never mutates shared state directly (§5).

pub mod animator;
pub mod app;
pub mod border;
pub mod bridge;
pub mod dimmer;
pub mod event_tap;
pub mod interceptor;
pub mod observer;
pub mod persistence;

use tracing::Span;

/// Sender half of an actor channel. Every event carries the `Span` active
/// when it was sent, so the Core's single draining loop can re-enter the
/// sender's tracing context instead of logging everything under its own.
pub struct Sender<T> {
    tx: tokio::sync::mpsc::UnboundedSender<(Span, T)>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self { Self { tx: self.tx.clone() } }
}

impl<T> Sender<T> {
    pub fn send(&self, event: T) {
        let span = Span::current();
        if self.tx.send((span, event)).is_err() {
            tracing::debug!("send on a closed actor channel");
        }
    }
}

pub struct Receiver<T> {
    rx: tokio::sync::mpsc::UnboundedReceiver<(Span, T)>,
}

impl<T> Receiver<T> {
    pub async fn recv(&mut self) -> Option<(Span, T)> { self.rx.recv().await }

    pub fn try_recv(&mut self) -> Option<(Span, T)> { self.rx.try_recv().ok() }
}

pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    (Sender { tx }, Receiver { rx })
}
