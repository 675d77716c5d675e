//! Fakes shared by unit tests.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::chat::composer::{MessageSender, Outbound, SendReceipt};
use crate::poller::UpdateSource;
use crate::update::UpdateBatch;

pub enum Reply {
    Batch(Vec<Value>),
    NoContent,
    Fail,
    /// A fetch that never completes.
    Hang,
}

/// Update source replaying a fixed script, then "no content" forever.
pub struct ScriptedSource {
    replies: Mutex<VecDeque<Reply>>,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl UpdateSource for ScriptedSource {
    async fn fetch_updates(&self) -> Result<Option<UpdateBatch>> {
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Batch(values)) => Ok(Some(UpdateBatch::from_values(values))),
            Some(Reply::NoContent) | None => Ok(None),
            Some(Reply::Fail) => anyhow::bail!("connection reset"),
            Some(Reply::Hang) => std::future::pending().await,
        }
    }
}

/// Sender handing out increasing message ids, or failing or hanging on
/// every send.
pub struct FakeSender {
    next_id: Mutex<i64>,
    fail: bool,
    hang: bool,
    sent: Mutex<Vec<Outbound>>,
}

impl FakeSender {
    pub fn new(first_id: i64) -> Self {
        Self {
            next_id: Mutex::new(first_id),
            fail: false,
            hang: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(0)
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::new(0)
        }
    }

    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for FakeSender {
    async fn send(&self, outbound: &Outbound) -> Result<SendReceipt> {
        self.sent.lock().unwrap().push(outbound.clone());
        if self.fail {
            anyhow::bail!("connection refused");
        }
        if self.hang {
            std::future::pending::<()>().await;
        }
        let mut next = self.next_id.lock().unwrap();
        let message_id = *next;
        *next += 1;
        Ok(SendReceipt { message_id })
    }
}
