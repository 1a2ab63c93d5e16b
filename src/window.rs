//! Sliding-window request/response multiplexer.
//!
//! A session may have many requests in flight at once, each correlated to
//! its eventual response by sequence number. [`Window`] bounds how many can
//! be outstanding at a time, hands out a [`WindowFuture`] per accepted
//! request, and resolves that future when a matching response arrives, the
//! request times out, or the session closes.

use crate::codec::Frame;
use crate::datatypes::CommandStatus;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{oneshot, OwnedSemaphorePermit, Semaphore};

const MAX_SEQUENCE_NUMBER: u32 = 0x7FFF_FFFF;

/// Errors a [`Window`] can surface to a caller.
#[derive(Debug, Error, Clone)]
pub enum WindowError {
    #[error("window is full, no free slot within the wait timeout")]
    WindowFull,

    #[error("request timed out waiting for a response")]
    RequestTimedOut,

    #[error("session closed, pending request failed")]
    SessionClosed,
}

impl WindowError {
    /// The command_status a dispatcher should reply with for this error.
    pub fn command_status(&self) -> CommandStatus {
        match self {
            WindowError::WindowFull => CommandStatus::MessageQueueFull,
            WindowError::RequestTimedOut => CommandStatus::SystemError,
            WindowError::SessionClosed => CommandStatus::SystemError,
        }
    }
}

/// The terminal state a [`WindowFuture`] resolves to.
#[derive(Debug, Clone)]
pub enum WindowOutcome {
    /// A matching response arrived.
    Completed(Frame),
    /// The request failed for a transport-level reason (e.g. write failure).
    Failed(WindowError),
    /// The caller cancelled the future before it completed.
    Cancelled,
    /// No response arrived within the per-request timeout.
    TimedOut,
}

struct PendingEntry {
    sender: oneshot::Sender<WindowOutcome>,
    created_at: Instant,
    timeout: Duration,
    _permit: OwnedSemaphorePermit,
}

type PendingMap = Mutex<HashMap<u32, PendingEntry>>;

/// A handle to a single outstanding request.
///
/// Polling this future (or `.await`ing it) blocks until [`Window::complete`],
/// [`Window::fail`], an expiry sweep, [`Window::close`], or
/// [`WindowFuture::cancel`] resolves it.
pub struct WindowFuture {
    sequence_number: u32,
    request: Frame,
    created_at: Instant,
    receiver: oneshot::Receiver<WindowOutcome>,
    pending: Arc<PendingMap>,
}

impl WindowFuture {
    /// The sequence number assigned to this request.
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// The request frame this future is waiting on a response for.
    pub fn request(&self) -> &Frame {
        &self.request
    }

    /// When this request was accepted into the window.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Cancel this request. Removes the pending entry if still present and
    /// resolves the future to `Cancelled`. Does not un-send the wire
    /// request; the caller is responsible for any application-level
    /// compensation.
    pub fn cancel(&mut self) {
        let mut pending = self.pending.lock().unwrap();
        if let Some(entry) = pending.remove(&self.sequence_number) {
            let _ = entry.sender.send(WindowOutcome::Cancelled);
        }
    }
}

impl Future for WindowFuture {
    type Output = WindowOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            // The sender side was dropped without sending, which only
            // happens if the entry was removed from `pending` by something
            // other than complete/fail/expire/close/cancel.
            Poll::Ready(Err(_)) => Poll::Ready(WindowOutcome::Cancelled),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Bounds in-flight requests for a session and correlates responses back to
/// their originating request by sequence number.
pub struct Window {
    request_timeout: Duration,
    semaphore: Arc<Semaphore>,
    pending: Arc<PendingMap>,
    next_sequence: AtomicU32,
    closed: AtomicBool,
    size: usize,
}

impl Window {
    /// A window of `size` slots, where a request with no matching response
    /// after `request_timeout` is treated as timed out.
    pub fn new(size: usize, request_timeout: Duration) -> Window {
        Window {
            request_timeout,
            semaphore: Arc::new(Semaphore::new(size)),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_sequence: AtomicU32::new(1),
            closed: AtomicBool::new(false),
            size,
        }
    }

    fn next_sequence_number(&self) -> u32 {
        loop {
            let current = self.next_sequence.load(Ordering::Relaxed);
            let next = if current >= MAX_SEQUENCE_NUMBER { 1 } else { current + 1 };
            if self
                .next_sequence
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return current;
            }
        }
    }

    /// Accept `request` into the window, blocking up to `wait_timeout` for a
    /// free slot. Assigns a fresh sequence number and returns a future that
    /// resolves when a response for it arrives.
    pub async fn offer(
        &self,
        request: Frame,
        wait_timeout: Duration,
    ) -> Result<WindowFuture, WindowError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(WindowError::SessionClosed);
        }

        let permit = tokio::time::timeout(wait_timeout, self.semaphore.clone().acquire_owned())
            .await
            .map_err(|_| WindowError::WindowFull)?
            .expect("semaphore is never closed while the window is open");

        if self.closed.load(Ordering::Acquire) {
            return Err(WindowError::SessionClosed);
        }

        Ok(self.insert_pending(request, permit))
    }

    /// Non-blocking variant of [`Window::offer`]. Returns `None` instead of
    /// waiting if there is no free slot right now.
    pub fn try_offer(&self, request: Frame) -> Option<WindowFuture> {
        if self.closed.load(Ordering::Acquire) {
            return None;
        }
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;
        Some(self.insert_pending(request, permit))
    }

    fn insert_pending(&self, request: Frame, permit: OwnedSemaphorePermit) -> WindowFuture {
        let sequence_number = self.next_sequence_number();
        let created_at = Instant::now();
        let (sender, receiver) = oneshot::channel();

        let mut pending = self.pending.lock().unwrap();
        pending.insert(
            sequence_number,
            PendingEntry {
                sender,
                created_at,
                timeout: self.request_timeout,
                _permit: permit,
            },
        );
        drop(pending);

        WindowFuture {
            sequence_number,
            request,
            created_at,
            receiver,
            pending: Arc::clone(&self.pending),
        }
    }

    /// Complete the pending request for `sequence_number` with `response`.
    /// Returns `false` if there was no matching pending entry (an
    /// unsolicited response).
    pub fn complete(&self, sequence_number: u32, response: Frame) -> bool {
        let mut pending = self.pending.lock().unwrap();
        match pending.remove(&sequence_number) {
            Some(entry) => {
                let _ = entry.sender.send(WindowOutcome::Completed(response));
                true
            }
            None => false,
        }
    }

    /// Fail the pending request for `sequence_number` with `error`. Returns
    /// `false` if there was no matching pending entry.
    pub fn fail(&self, sequence_number: u32, error: WindowError) -> bool {
        let mut pending = self.pending.lock().unwrap();
        match pending.remove(&sequence_number) {
            Some(entry) => {
                let _ = entry.sender.send(WindowOutcome::Failed(error));
                true
            }
            None => false,
        }
    }

    /// Sweep pending requests older than their per-request timeout,
    /// resolving each to `TimedOut` and freeing its slot. Returns how many
    /// were expired.
    pub fn expire_old_requests(&self) -> usize {
        let now = Instant::now();
        let mut pending = self.pending.lock().unwrap();
        let expired: Vec<u32> = pending
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.created_at) >= entry.timeout)
            .map(|(seq, _)| *seq)
            .collect();

        for seq in &expired {
            if let Some(entry) = pending.remove(seq) {
                let _ = entry.sender.send(WindowOutcome::TimedOut);
            }
        }

        expired.len()
    }

    /// Fail every pending request with `SessionClosed` and reject any
    /// further `offer`/`try_offer` calls.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        let mut pending = self.pending.lock().unwrap();
        for (_, entry) in pending.drain() {
            let _ = entry.sender.send(WindowOutcome::Failed(WindowError::SessionClosed));
        }
    }

    /// Number of requests currently in flight.
    pub fn size(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Number of free slots right now.
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Whether the window has no free slots right now.
    pub fn is_full(&self) -> bool {
        self.available_slots() == 0
    }

    /// The configured window size.
    pub fn capacity(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::EnquireLink;

    fn sample_request(seq: u32) -> Frame {
        Frame::EnquireLink(EnquireLink::new(seq))
    }

    #[tokio::test]
    async fn offer_assigns_sequence_numbers_starting_at_one() {
        let window = Window::new(4, Duration::from_secs(5));
        let f1 = window.offer(sample_request(0), Duration::from_millis(50)).await.unwrap();
        let f2 = window.offer(sample_request(0), Duration::from_millis(50)).await.unwrap();
        assert_eq!(f1.sequence_number(), 1);
        assert_eq!(f2.sequence_number(), 2);
    }

    #[tokio::test]
    async fn size_and_available_slots_sum_to_capacity() {
        let window = Window::new(3, Duration::from_secs(5));
        let _f1 = window.offer(sample_request(0), Duration::from_millis(50)).await.unwrap();
        let _f2 = window.offer(sample_request(0), Duration::from_millis(50)).await.unwrap();
        assert_eq!(window.size() + window.available_slots(), window.capacity());
        assert_eq!(window.size(), 2);
        assert_eq!(window.available_slots(), 1);
    }

    #[tokio::test]
    async fn offer_blocks_until_full_window_times_out() {
        let window = Window::new(1, Duration::from_secs(5));
        let _f1 = window.offer(sample_request(0), Duration::from_millis(50)).await.unwrap();
        let err = window
            .offer(sample_request(0), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, WindowError::WindowFull));
    }

    #[tokio::test]
    async fn try_offer_is_non_blocking_when_full() {
        let window = Window::new(1, Duration::from_secs(5));
        let _f1 = window.try_offer(sample_request(0)).unwrap();
        assert!(window.try_offer(sample_request(0)).is_none());
    }

    #[tokio::test]
    async fn complete_resolves_future_and_frees_slot() {
        let window = Window::new(1, Duration::from_secs(5));
        let future = window.offer(sample_request(0), Duration::from_millis(50)).await.unwrap();
        let seq = future.sequence_number();
        assert!(window.complete(seq, sample_request(seq)));
        let outcome = future.await;
        assert!(matches!(outcome, WindowOutcome::Completed(_)));
        assert_eq!(window.available_slots(), 1);
    }

    #[tokio::test]
    async fn complete_on_unknown_sequence_returns_false() {
        let window = Window::new(1, Duration::from_secs(5));
        assert!(!window.complete(999, sample_request(999)));
    }

    #[tokio::test]
    async fn expire_old_requests_times_out_stale_entries() {
        let window = Window::new(1, Duration::from_millis(10));
        let future = window.offer(sample_request(0), Duration::from_millis(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(window.expire_old_requests(), 1);
        assert!(matches!(future.await, WindowOutcome::TimedOut));
    }

    #[tokio::test]
    async fn close_fails_all_pending_and_rejects_new_offers() {
        let window = Window::new(2, Duration::from_secs(5));
        let future = window.offer(sample_request(0), Duration::from_millis(50)).await.unwrap();
        window.close();
        assert!(matches!(future.await, WindowOutcome::Failed(WindowError::SessionClosed)));
        let err = window
            .offer(sample_request(0), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, WindowError::SessionClosed));
    }

    #[tokio::test]
    async fn cancel_resolves_future_and_frees_slot() {
        let window = Window::new(1, Duration::from_secs(5));
        let mut future = window.offer(sample_request(0), Duration::from_millis(50)).await.unwrap();
        future.cancel();
        assert!(matches!(future.await, WindowOutcome::Cancelled));
        assert_eq!(window.available_slots(), 1);
    }
}
