// ABOUTME: Event transport seam and its server-sent events implementation
// ABOUTME: A 200 response to the stream request acknowledges the connection

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{RealtimeError, RealtimeResult};

/// One event pushed by the server
#[derive(Debug, Clone, PartialEq)]
pub struct EventFrame {
    pub event: String,
    pub data: Value,
}

impl EventFrame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Frames until the server closes the stream; an `Err` item ends it
pub type EventStream = BoxStream<'static, RealtimeResult<EventFrame>>;

#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Open an authenticated event stream. Returning `Ok` means the server
    /// acknowledged the connection.
    async fn open(&self, token: &str) -> RealtimeResult<EventStream>;
}

/// Incremental `text/event-stream` parser
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them
    pub fn push(&mut self, chunk: &[u8]) -> Vec<EventFrame> {
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut frames = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(frame) = parse_block(&String::from_utf8_lossy(&block)) {
                frames.push(frame);
            }
        }
        frames
    }
}

fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn parse_block(block: &str) -> Option<EventFrame> {
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();

    for line in block.lines() {
        if line.starts_with(':') {
            continue;
        }
        if let Some(name) = field(line, "event") {
            event = Some(name.trim().to_string());
        } else if let Some(value) = field(line, "data") {
            data.push(value);
        }
    }

    // Comment-only blocks are keep-alives
    if data.is_empty() {
        return None;
    }

    let raw = data.join("\n");
    let data = serde_json::from_str(&raw).unwrap_or(Value::String(raw));

    Some(EventFrame {
        event: event.unwrap_or_else(|| "message".to_string()),
        data,
    })
}

/// Event stream over HTTP server-sent events
pub struct SseTransport {
    http_client: Client,
    events_url: String,
}

impl SseTransport {
    pub fn new(events_url: impl Into<String>, connect_timeout: Duration) -> RealtimeResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| RealtimeError::Configuration(e.to_string()))?;

        Ok(Self {
            http_client,
            events_url: events_url.into(),
        })
    }
}

#[async_trait]
impl EventTransport for SseTransport {
    async fn open(&self, token: &str) -> RealtimeResult<EventStream> {
        debug!("Opening event stream at {}", self.events_url);

        let response = self
            .http_client
            .get(&self.events_url)
            .bearer_auth(token)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RealtimeError::Handshake {
                status: response.status().as_u16(),
            });
        }

        info!("Event stream connected");

        let stream = async_stream::stream! {
            let mut parser = SseParser::new();
            let mut byte_stream = response.bytes_stream();

            while let Some(chunk_result) = byte_stream.next().await {
                match chunk_result {
                    Ok(bytes) => {
                        for frame in parser.push(&bytes) {
                            yield Ok(frame);
                        }
                    }
                    Err(e) => {
                        yield Err(RealtimeError::Stream(e.to_string()));
                        return;
                    }
                }
            }
        };

        Ok(stream.boxed())
    }
}
