//! Message-observing stream decorator
//!
//! Wraps an inbound or outbound gRPC message stream, forwarding every item
//! untouched and logging each message as it passes.

use futures::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tonic::Status;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Received by this side (requests on a server, responses on a client)
    Inbound,
    /// Sent by this side (responses on a server, requests on a client)
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "receive",
            Direction::Outbound => "send",
        }
    }
}

#[pin_project]
#[derive(Debug)]
pub struct ObservedStream<S> {
    #[pin]
    inner: S,
    method: &'static str,
    direction: Direction,
    messages: u64,
}

impl<S> ObservedStream<S> {
    pub fn new(inner: S, method: &'static str, direction: Direction) -> Self {
        Self {
            inner,
            method,
            direction,
            messages: 0,
        }
    }

    pub fn inbound(inner: S, method: &'static str) -> Self {
        Self::new(inner, method, Direction::Inbound)
    }

    pub fn outbound(inner: S, method: &'static str) -> Self {
        Self::new(inner, method, Direction::Outbound)
    }

    /// Messages passed through so far
    pub fn messages(&self) -> u64 {
        self.messages
    }
}

impl<S, T> Stream for ObservedStream<S>
where
    S: Stream<Item = Result<T, Status>>,
{
    type Item = Result<T, Status>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let polled = this.inner.poll_next(cx);

        if let Poll::Ready(item) = &polled {
            match item {
                Some(Ok(_)) => {
                    *this.messages += 1;
                    debug!(
                        method = *this.method,
                        direction = this.direction.as_str(),
                        message_type = std::any::type_name::<T>(),
                        seq = *this.messages,
                        "stream message"
                    );
                }
                Some(Err(status)) => {
                    warn!(
                        method = *this.method,
                        direction = this.direction.as_str(),
                        code = ?status.code(),
                        reason = status.message(),
                        "stream error"
                    );
                }
                None => {
                    debug!(
                        method = *this.method,
                        direction = this.direction.as_str(),
                        total = *this.messages,
                        "stream closed"
                    );
                }
            }
        }

        polled
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
