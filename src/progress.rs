//! Session-scoped progress event channel
//!
//! The backend pushes human-readable progress while it works on a request,
//! out of band from the request/response call. The channel is opened once
//! per session lifetime (not per request) and delivers discrete
//! `{session_id, message}` events with no ordering or delivery guarantee:
//! zero, one, or many per request cycle, possibly after the response has
//! already resolved. Filtering by session id and in-flight status is the
//! coordinator's job, not the transport's.
//!
//! Transport is server-sent events: the response body is consumed as a
//! byte stream and framed incrementally, so events split across network
//! chunks parse correctly.

use crate::config::BackendConfig;
use crate::error::DatachatError;
use bytes::{Buf, BytesMut};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One progress event from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Session the event belongs to
    pub session_id: String,
    /// Human-readable status text
    pub message: String,
}

/// Incremental SSE frame parser
///
/// Accumulates raw bytes and yields complete events as they arrive.
/// Frames are separated by a blank line; `data:` lines carry the JSON
/// payload. Unparsable payloads are dropped with a warning.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: BytesMut,
}

impl SseParser {
    /// Create an empty parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning any events completed by it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<ProgressEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(frame) = self.take_frame() {
            if let Some(event) = parse_frame(&frame) {
                events.push(event);
            }
        }
        events
    }

    /// Split one complete frame off the front of the buffer, if present
    ///
    /// A frame ends at a blank line; both bare-LF and CRLF delimited
    /// streams are accepted, whichever boundary comes first.
    fn take_frame(&mut self) -> Option<String> {
        let lf = self
            .buffer
            .windows(2)
            .position(|window| window == b"\n\n")
            .map(|at| (at, 2));
        let crlf = self
            .buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|at| (at, 4));

        let (at, len) = match (lf, crlf) {
            (Some(lf), Some(crlf)) => {
                if lf.0 <= crlf.0 {
                    lf
                } else {
                    crlf
                }
            }
            (Some(lf), None) => lf,
            (None, Some(crlf)) => crlf,
            (None, None) => return None,
        };
        let frame = self.buffer.split_to(at);
        self.buffer.advance(len);
        Some(String::from_utf8_lossy(&frame).into_owned())
    }
}

/// Extract a progress event from one SSE frame
fn parse_frame(frame: &str) -> Option<ProgressEvent> {
    let mut data = String::new();
    for line in frame.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.trim_start());
        }
        // "event:" and comment lines carry no payload for this protocol
    }

    if data.is_empty() {
        return None;
    }

    match serde_json::from_str::<ProgressEvent>(&data) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(error = %e, "Dropping unparsable progress payload");
            None
        }
    }
}

/// A live subscription to the backend's progress stream
///
/// Owns the pump task reading the SSE byte stream; dropping the channel
/// aborts it. Events come out of [`ProgressChannel::recv`].
pub struct ProgressChannel {
    receiver: mpsc::UnboundedReceiver<ProgressEvent>,
    pump: JoinHandle<()>,
}

impl ProgressChannel {
    /// Open the progress stream for a session
    ///
    /// Connects once and stays subscribed for the session's lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error when the stream endpoint cannot be reached or
    /// answers with a non-success status.
    pub async fn connect(config: &BackendConfig, session_id: &str) -> Result<Self, DatachatError> {
        let url = format!(
            "{}{}?session_id={}",
            config.url.trim_end_matches('/'),
            config.progress_path,
            session_id
        );

        // No overall timeout: the stream is expected to stay open as long
        // as the session does. Only the connect phase is bounded.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("datachat/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let response = client
            .get(&url)
            .header("Accept", "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DatachatError::Channel(format!(
                "progress endpoint returned status {}",
                status.as_u16()
            )));
        }

        tracing::info!(%url, "Progress channel connected");

        let (sender, receiver) = mpsc::unbounded_channel();
        let pump = tokio::spawn(async move {
            let mut parser = SseParser::new();
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(bytes) => {
                        for event in parser.push(&bytes) {
                            if sender.send(event).is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Progress stream interrupted");
                        break;
                    }
                }
            }
            tracing::debug!("Progress stream closed");
        });

        Ok(Self { receiver, pump })
    }

    /// Await the next progress event
    ///
    /// Returns `None` once the stream has closed and all buffered events
    /// were consumed.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.receiver.recv().await
    }

    /// Take every event currently buffered, without waiting
    ///
    /// The pump keeps pushing while no request is in flight, so events can
    /// queue up between requests. Callers drain them before starting a new
    /// request so stale events meet the coordinator's filter instead of
    /// being replayed into the next cycle.
    pub fn drain(&mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for ProgressChannel {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut parser = SseParser::new();
        let events = parser.push(
            b"event: progress\ndata: {\"session_id\":\"s1\",\"message\":\"Running query\"}\n\n",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].session_id, "s1");
        assert_eq!(events[0].message, "Running query");
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut parser = SseParser::new();
        let events = parser.push(b"data: {\"session_id\":\"s1\",");
        assert!(events.is_empty());

        let events = parser.push(b"\"message\":\"halfway\"}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "halfway");
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut parser = SseParser::new();
        let chunk = concat!(
            "data: {\"session_id\":\"s1\",\"message\":\"one\"}\n\n",
            "data: {\"session_id\":\"s1\",\"message\":\"two\"}\n\n",
        );
        let events = parser.push(chunk.as_bytes());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "one");
        assert_eq!(events[1].message, "two");
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut parser = SseParser::new();
        let events =
            parser.push(b"data: {\"session_id\":\"s1\",\"message\":\"crlf\"}\r\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "crlf");
    }

    #[test]
    fn test_pure_crlf_frame_boundaries() {
        let mut parser = SseParser::new();
        let chunk = concat!(
            "data: {\"session_id\":\"s1\",\"message\":\"one\"}\r\n\r\n",
            "data: {\"session_id\":\"s1\",\"message\":\"two\"}\r\n\r\n",
        );
        let events = parser.push(chunk.as_bytes());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "one");
        assert_eq!(events[1].message, "two");
    }

    #[test]
    fn test_crlf_frame_split_across_chunks() {
        let mut parser = SseParser::new();
        // The boundary itself is split between chunks
        let events = parser.push(b"data: {\"session_id\":\"s1\",\"message\":\"half\"}\r\n");
        assert!(events.is_empty());
        let events = parser.push(b"\r\ndata: ");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "half");
    }

    #[test]
    fn test_mixed_lf_and_crlf_frames_in_order() {
        let mut parser = SseParser::new();
        let chunk = concat!(
            "data: {\"session_id\":\"s1\",\"message\":\"lf\"}\n\n",
            "data: {\"session_id\":\"s1\",\"message\":\"crlf\"}\r\n\r\n",
        );
        let events = parser.push(chunk.as_bytes());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "lf");
        assert_eq!(events[1].message, "crlf");
    }

    #[test]
    fn test_unparsable_payload_dropped() {
        let mut parser = SseParser::new();
        let events = parser.push(b"data: not json\n\n");
        assert!(events.is_empty());

        // The parser recovers for the next frame
        let events =
            parser.push(b"data: {\"session_id\":\"s1\",\"message\":\"ok\"}\n\n");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_comment_and_event_lines_ignored() {
        let mut parser = SseParser::new();
        let events = parser.push(b": keep-alive\n\nevent: progress\n\n");
        assert!(events.is_empty());
    }
}
