// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit events: what happened, to whom, from where.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use strum::{Display, EnumString};
use uuid::Uuid;
use warden_core::EventId;

/// What an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum AuditEventKind {
    /// Successful interactive login.
    Login,
    /// Failed interactive login.
    LoginError,
    /// Session logout.
    Logout,
    /// New account registration.
    Register,
    /// Failed account registration.
    RegisterError,
    /// Authorization code exchanged for tokens.
    CodeToToken,
    /// Token refresh.
    RefreshToken,
    /// Password change.
    UpdatePassword,
}

impl AuditEventKind {
    /// Whether this kind records a failure.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            AuditEventKind::LoginError | AuditEventKind::RegisterError
        )
    }
}

/// One audit event, fanned out to every active event listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Unique event id.
    pub id: EventId,
    /// When the event happened.
    pub time: DateTime<Utc>,
    /// What happened.
    pub kind: AuditEventKind,
    /// Realm the event belongs to.
    pub realm: String,
    /// Client application involved, when known.
    pub client: Option<String>,
    /// User involved, when known.
    pub user: Option<String>,
    /// Network address the request came from.
    pub ip_address: Option<String>,
    /// Free-form key-value context, sorted by key.
    pub details: BTreeMap<String, String>,
}

impl AuditEvent {
    /// Creates an event with a fresh id and the current time.
    pub fn new(kind: AuditEventKind, realm: impl Into<String>) -> Self {
        Self {
            id: EventId(Uuid::new_v4().to_string()),
            time: Utc::now(),
            kind,
            realm: realm.into(),
            client: None,
            user: None,
            ip_address: None,
            details: BTreeMap::new(),
        }
    }

    /// Sets the client application.
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Sets the user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the source address.
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    /// Adds one context detail.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}
