// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Delivery of one-time codes. The store only cares whether a send reported
//! success; how the code reaches a phone or inbox is up to the sender.

use crate::error::Result;
use crate::utils::{http_client, mask_contact};
use serde::Serialize;

pub trait Notifier {
    /// `Ok(true)` means delivered.
    fn send(&self, destination: &str, code: &str) -> Result<bool>;
}

/// Development sender: writes the delivery to the log and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, destination: &str, code: &str) -> Result<bool> {
        tracing::info!(to = %mask_contact(destination), code, "one-time code sent");
        Ok(true)
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    destination: &'a str,
    code: &'a str,
}

/// POSTs `{"destination", "code"}` to a relay endpoint that does the actual
/// SMS/email delivery. A 2xx response counts as delivered.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: http_client()?,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, destination: &str, code: &str) -> Result<bool> {
        let res = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { destination, code })
            .send()?;
        let ok = res.status().is_success();
        if ok {
            tracing::info!(to = %mask_contact(destination), "one-time code relayed");
        } else {
            tracing::warn!(status = %res.status(), "webhook rejected one-time code");
        }
        Ok(ok)
    }
}
