//! Bounded body collection, draining, and JSON decoding over async readers.

use exn::ResultExt;
use futures::io::{AsyncRead, AsyncReadExt};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

const CHUNK_SIZE: usize = 8 * 1024;

/// Collects an entire body into memory, failing once it exceeds `limit` bytes.
///
/// Auxiliary documents (oEmbed, remote linked-data contexts) are the only
/// things this workspace ever buffers whole, and those are expected to be
/// small. The limit keeps a hostile endpoint from ballooning memory.
#[instrument(skip(reader))]
pub async fn read_limited<R: AsyncRead + Unpin>(mut reader: R, limit: usize) -> Result<Vec<u8>> {
    let mut collected = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut chunk).await.or_raise(|| ErrorKind::Io)?;
        if n == 0 {
            return Ok(collected);
        }
        if collected.len() + n > limit {
            exn::bail!(ErrorKind::TooLarge(limit));
        }
        collected.extend_from_slice(&chunk[..n]);
    }
}

/// Reads a stream to the end, discarding every byte. Returns the byte count.
///
/// Used to honor the "drain before returning" contract of pipeline extractors
/// without holding the body in memory.
#[instrument(skip(reader))]
pub async fn drain<R: AsyncRead + Unpin>(mut reader: R) -> Result<u64> {
    let mut discarded: u64 = 0;
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut chunk).await.or_raise(|| ErrorKind::Io)?;
        if n == 0 {
            return Ok(discarded);
        }
        discarded += n as u64;
    }
}

/// Collects a bounded body and deserializes it as JSON.
#[instrument(skip(reader))]
pub async fn read_json<R, T>(reader: R, limit: usize) -> Result<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let body = read_limited(reader, limit).await?;
    serde_json::from_slice(&body).or_raise(|| ErrorKind::MalformedJson)
}
