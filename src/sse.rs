//! Server-Sent Events (SSE) processing for streaming agent runs.
//!
//! This module converts the raw byte stream of a `/run_sse` response into
//! structured [`AgentEvent`] values, handling record framing, incremental
//! UTF-8 decoding, and per-record error recovery.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability::{STREAM_CHUNKS, STREAM_DECODE_ERRORS, STREAM_ERRORS, STREAM_EVENTS};
use crate::types::AgentEvent;

/// Process a stream of bytes into a stream of agent events.
///
/// Records are delimited by blank lines; only `data: ` lines are
/// consumed. A record without a data line is skipped without surfacing
/// anything. A record whose JSON payload fails to parse yields a
/// [`Error::Serialization`] item for that record only; the stream keeps
/// going with the next record. The stream ends when the transport ends;
/// an unterminated trailing record is dropped.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<AgentEvent>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    // State machine: undecoded bytes carried between chunks, plus the
    // decoded text buffer awaiting a record terminator.
    let pending: Vec<u8> = Vec::new();
    let buffer = String::new();

    stream::unfold(
        (stream, pending, buffer),
        move |(mut stream, mut pending, mut buffer)| async move {
            loop {
                // First drain any complete records already in the buffer.
                match extract_event(&buffer) {
                    Some((Extracted::Event(event), remaining)) => {
                        buffer = remaining;
                        match &event {
                            Ok(_) => STREAM_EVENTS.click(),
                            Err(_) => STREAM_DECODE_ERRORS.click(),
                        }
                        return Some((event, (stream, pending, buffer)));
                    }
                    Some((Extracted::Skip, remaining)) => {
                        buffer = remaining;
                        continue;
                    }
                    None => {}
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => {
                        STREAM_CHUNKS.click();
                        pending.extend_from_slice(&bytes);
                        match drain_utf8(&mut pending) {
                            Ok(text) => buffer.push_str(&text),
                            Err(e) => {
                                STREAM_ERRORS.click();
                                return Some((Err(e), (stream, pending, buffer)));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, pending, buffer)));
                    }
                    None => {
                        // End of stream; a record never terminated by a
                        // blank line is dropped, as the transport ended
                        // mid-record.
                        return None;
                    }
                }
            }
        },
    )
}

/// Outcome of scanning the buffer for one complete record.
enum Extracted {
    /// A record with a data payload, parsed or not.
    Event(Result<AgentEvent>),
    /// A complete record with no `data: ` line; consumed silently.
    Skip,
}

/// Extract a complete SSE record from a buffer string.
///
/// Records are delimited by double newlines. Within a record only lines
/// prefixed `data: ` matter; when several are present the last wins.
fn extract_event(buffer: &str) -> Option<(Extracted, String)> {
    let (record, rest) = buffer.split_once("\n\n")?;
    let rest = rest.to_string();

    let mut data = None;
    for line in record.lines() {
        if let Some(payload) = line.strip_prefix("data: ") {
            data = Some(payload);
        }
    }

    let Some(json_str) = data else {
        return Some((Extracted::Skip, rest));
    };

    match serde_json::from_str::<AgentEvent>(json_str) {
        Ok(event) => Some((Extracted::Event(Ok(event)), rest)),
        Err(e) => Some((
            Extracted::Event(Err(Error::serialization(
                format!("Failed to parse event JSON: {e}"),
                Some(Box::new(e)),
            ))),
            rest,
        )),
    }
}

/// Decode the valid UTF-8 prefix of `pending`, leaving any trailing bytes
/// of an incomplete multi-byte character for the next chunk.
fn drain_utf8(pending: &mut Vec<u8>) -> Result<String> {
    match String::from_utf8(std::mem::take(pending)) {
        Ok(text) => Ok(text),
        Err(err) => {
            let utf8_err = err.utf8_error();
            if utf8_err.error_len().is_some() {
                return Err(Error::encoding(
                    format!("Invalid UTF-8 in stream: {utf8_err}"),
                    Some(Box::new(utf8_err)),
                ));
            }
            let valid_up_to = utf8_err.valid_up_to();
            let mut bytes = err.into_bytes();
            *pending = bytes.split_off(valid_up_to);
            match String::from_utf8(bytes) {
                Ok(text) => Ok(text),
                Err(e) => Err(Error::encoding(
                    format!("Invalid UTF-8 in stream: {e}"),
                    Some(Box::new(e)),
                )),
            }
        }
    }
}
