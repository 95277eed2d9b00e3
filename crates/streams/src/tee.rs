//! Fan-out ("tee") over a single async byte source.
//!
//! [`tee`] splits one reader into two independently owned readers backed by a
//! shared bounded buffer. Each branch reads at its own pace; a branch that
//! races ahead parks until the laggard frees buffer space, so neither side
//! can force unbounded buffering of the other. Dropping a branch closes it:
//! no further bytes are buffered for a closed side and the surviving side
//! keeps reading straight from the source.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

use futures::io::AsyncRead;

/// Upper bound on bytes buffered for the branch that is behind.
const BRANCH_BUFFER_LIMIT: usize = 64 * 1024;
const READ_CHUNK: usize = 8 * 1024;

/// Splits `source` into two independent readers observing the same bytes.
pub fn tee<R: AsyncRead + Unpin>(source: R) -> (TeeReader<R>, TeeReader<R>) {
    let shared = Arc::new(Mutex::new(Shared {
        source: Some(source),
        finished: None,
        sides: [Side::default(), Side::default()],
    }));
    (TeeReader { shared: Arc::clone(&shared), index: 0 }, TeeReader { shared, index: 1 })
}

/// One branch of a teed stream. Implements [`AsyncRead`].
pub struct TeeReader<R> {
    shared: Arc<Mutex<Shared<R>>>,
    index: usize,
}

enum Finished {
    Eof,
    // io::Error is not Clone, so the terminal error is stored decomposed and
    // rebuilt for whichever branch observes it.
    Failed(io::ErrorKind, String),
}

struct Side {
    buf: VecDeque<u8>,
    open: bool,
    waker: Option<Waker>,
}

impl Default for Side {
    fn default() -> Self {
        Self { buf: VecDeque::new(), open: true, waker: None }
    }
}

struct Shared<R> {
    source: Option<R>,
    finished: Option<Finished>,
    sides: [Side; 2],
}

impl<R> Shared<R> {
    fn wake(&mut self, index: usize) {
        if let Some(waker) = self.sides[index].waker.take() {
            waker.wake();
        }
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for TeeReader<R> {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, dest: &mut [u8]) -> Poll<io::Result<usize>> {
        let me = self.index;
        let other = 1 - me;
        let shared = Arc::clone(&self.shared);
        let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            // Serve buffered bytes first; consuming frees space the other
            // branch may be parked on.
            if !shared.sides[me].buf.is_empty() {
                let n = dest.len().min(shared.sides[me].buf.len());
                for (slot, byte) in dest.iter_mut().zip(shared.sides[me].buf.drain(..n)) {
                    *slot = byte;
                }
                shared.wake(other);
                return Poll::Ready(Ok(n));
            }
            match &shared.finished {
                Some(Finished::Eof) => return Poll::Ready(Ok(0)),
                Some(Finished::Failed(kind, message)) => {
                    return Poll::Ready(Err(io::Error::new(*kind, message.clone())));
                },
                None => {},
            }
            // Backpressure: the other branch is too far behind. Park until it
            // consumes; its next read wakes us.
            if shared.sides[other].open && shared.sides[other].buf.len() >= BRANCH_BUFFER_LIMIT {
                shared.sides[me].waker = Some(cx.waker().clone());
                return Poll::Pending;
            }
            let Some(source) = shared.source.as_mut() else {
                return Poll::Ready(Ok(0));
            };
            let mut chunk = [0u8; READ_CHUNK];
            match Pin::new(source).poll_read(cx, &mut chunk) {
                Poll::Pending => {
                    shared.sides[me].waker = Some(cx.waker().clone());
                    return Poll::Pending;
                },
                Poll::Ready(Ok(0)) => {
                    shared.finished = Some(Finished::Eof);
                    shared.source = None;
                    shared.wake(other);
                },
                Poll::Ready(Ok(n)) => {
                    for index in [me, other] {
                        if shared.sides[index].open {
                            shared.sides[index].buf.extend(&chunk[..n]);
                        }
                    }
                    shared.wake(other);
                },
                Poll::Ready(Err(error)) => {
                    shared.finished = Some(Finished::Failed(error.kind(), error.to_string()));
                    shared.source = None;
                    shared.wake(other);
                },
            }
        }
    }
}

impl<R> Drop for TeeReader<R> {
    fn drop(&mut self) {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.sides[self.index].open = false;
        shared.sides[self.index].buf.clear();
        // The other branch may be parked on our backpressure; let it resume
        // reading directly from the source.
        shared.wake(1 - self.index);
    }
}
