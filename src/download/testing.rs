//! In-crate fakes for the transport and sleep seams.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{DownloadError, Sleeper, Transport};

/// One scripted transport reply.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(Vec<u8>),
    Status(u16),
    Timeout,
}

impl Reply {
    pub(crate) fn body_of(len: usize) -> Self {
        Self::Body(vec![b'a'; len])
    }

    fn into_result(self, url: &str) -> Result<Vec<u8>, DownloadError> {
        match self {
            Self::Body(body) => Ok(body),
            Self::Status(status) => Err(DownloadError::http_status(url, status)),
            Self::Timeout => Err(DownloadError::timeout(url)),
        }
    }
}

/// Transport replaying scripted replies per URL.
///
/// Replies for a URL are consumed in order; the last one repeats forever.
/// URLs without a script get `fallback`.
#[derive(Debug)]
pub(crate) struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    fallback: Reply,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new(fallback: Reply) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn script(self, url: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(url.to_string(), replies.into());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(url.to_string());

        let reply = {
            let mut scripts = self
                .scripts
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            match scripts.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        reply.unwrap_or_else(|| self.fallback.clone()).into_result(url)
    }
}

/// Sleeper that records requested waits and returns immediately.
#[derive(Debug, Default)]
pub(crate) struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub(crate) fn waits(&self) -> Vec<Duration> {
        self.waits
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(duration);
    }
}
