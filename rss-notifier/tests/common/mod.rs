#![allow(dead_code)]

use async_trait::async_trait;
use rss_notifier::{FeedItem, FeedSource, Notifier, NotifierError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn news_item(n: usize) -> FeedItem {
    FeedItem::new(
        format!("https://example.com/news/{}", n),
        format!("Story {}", n),
    )
}

/// Feed source serving canned items per URL.
#[derive(Default)]
pub struct StaticFeedSource {
    feeds: HashMap<String, Vec<FeedItem>>,
    failing: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl StaticFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, items: Vec<FeedItem>) -> Self {
        self.feeds.insert(url.to_string(), items);
        self
    }

    pub fn with_failing_feed(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    fn source_name(&self) -> String {
        "static".to_string()
    }

    async fn fetch_items(&self, feed_url: &str) -> Result<Vec<FeedItem>> {
        self.requested.lock().unwrap().push(feed_url.to_string());

        if self.failing.contains(feed_url) {
            return Err(NotifierError::FeedFetch {
                url: feed_url.to_string(),
                reason: "HTTP 503: Service Unavailable".to_string(),
            });
        }

        self.feeds
            .get(feed_url)
            .cloned()
            .ok_or_else(|| NotifierError::FeedFetch {
                url: feed_url.to_string(),
                reason: "HTTP 404: Not Found".to_string(),
            })
    }
}

/// Notifier that keeps every accepted message and rejects messages matching
/// any configured pattern.
#[derive(Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<String>>,
    attempts: Mutex<usize>,
    reject_containing: Vec<String>,
    reject_all: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(mut self, pattern: &str) -> Self {
        self.reject_containing.push(pattern.to_string());
        self
    }

    pub fn rejecting_everything() -> Self {
        Self {
            reject_all: true,
            ..Self::default()
        }
    }

    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    /// Delivered messages that announce a single item.
    pub fn delivered_links(&self) -> Vec<String> {
        self.delivered()
            .iter()
            .filter_map(|msg| {
                msg.lines()
                    .find_map(|line| line.strip_prefix("Link: "))
                    .map(str::to_string)
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.delivered()
            .into_iter()
            .filter(|msg| msg.starts_with("Limit reached."))
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn notifier_name(&self) -> String {
        "recording".to_string()
    }

    async fn deliver(&self, text: &str) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;

        if self.reject_all || self.reject_containing.iter().any(|p| text.contains(p.as_str())) {
            return Err(NotifierError::Delivery {
                status: 500,
                body: "invalid_payload".to_string(),
            });
        }

        self.delivered.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Minimal HTTP/1.1 server answering every request with the same canned
/// response. Returns its base URL and the requests it has seen.
pub async fn spawn_http_server(
    status: u16,
    content_type: &str,
    body: &str,
) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));

    let seen = captured.clone();
    let content_type = content_type.to_string();
    let body = body.to_string();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            if let Some(request) = read_request(&mut socket).await {
                seen.lock().unwrap().push(request);
            }

            let reason = if status == 200 { "OK" } else { "Status" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                content_type,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}", addr), captured)
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (k, v) = line.split_once(':')?;
            Some((k.trim().to_string(), v.trim().to_string()))
        })
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    Some(CapturedRequest {
        method,
        path,
        headers,
        body,
    })
}
