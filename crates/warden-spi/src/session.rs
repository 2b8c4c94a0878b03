// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sessions: the per-request side of the provider contract.
//!
//! The [`SessionFactory`] is process-wide and long-lived. Each request gets
//! a fresh [`Session`], which hands out providers lazily: the first request
//! for a (SPI, id) pair calls the factory's `create`, later requests return
//! the cached instance. Closing the session closes its providers in reverse
//! creation order.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use uuid::Uuid;
use warden_core::{ProviderEvent, ProviderEventListener, SessionId, WardenError};
use warden_profile::Profile;

use crate::provider::{Provider, Spi};
use crate::registry::{FactoryHolder, SpiRecord, SpiRegistry};

/// Process-wide entry point for sessions and lifecycle events.
///
/// Owns the built registry, the resolved profile, and the event listeners.
/// Constructed by [`crate::builder::RegistryBuilder::build`].
pub struct SessionFactory {
    registry: Arc<SpiRegistry>,
    listeners: Vec<Arc<dyn ProviderEventListener>>,
    profile: Profile,
    down: AtomicBool,
}

impl SessionFactory {
    pub(crate) fn new(
        registry: Arc<SpiRegistry>,
        listeners: Vec<Arc<dyn ProviderEventListener>>,
        profile: Profile,
    ) -> Self {
        Self {
            registry,
            listeners,
            profile,
            down: AtomicBool::new(false),
        }
    }

    /// The built registry.
    pub fn registry(&self) -> &SpiRegistry {
        &self.registry
    }

    /// The profile the registry was built under.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Opens a fresh session.
    pub fn create_session(&self) -> Session {
        let id = SessionId(Uuid::new_v4().to_string());
        debug!(session = %id, "session created");
        Session {
            id,
            registry: Arc::clone(&self.registry),
            state: Mutex::new(SessionState::default()),
            closed: AtomicBool::new(false),
        }
    }

    /// Fans `event` out to every listener, synchronously, in registration
    /// order.
    pub fn dispatch(&self, event: &ProviderEvent) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }

    /// Shuts the factory side of the process down. Idempotent.
    ///
    /// Dispatches [`ProviderEvent::Shutdown`], then closes factories in
    /// reverse initialization order. Close errors are logged, not
    /// propagated: one misbehaving factory must not keep the rest open.
    pub async fn shutdown(&self) {
        if self.down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.dispatch(&ProviderEvent::Shutdown);
        for record in self.registry.records().iter().rev() {
            for entry in record.factories.iter().rev() {
                if let Err(error) = entry.holder.close().await {
                    warn!(
                        spi = record.name,
                        provider = %entry.id,
                        %error,
                        "factory close failed"
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for SessionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFactory")
            .field("registry", &self.registry)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Object-safe view of a cached provider: downcast for typed access,
/// `close` for teardown.
trait ErasedProvider: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn close(&self) -> Result<(), WardenError>;
}

struct ProviderHolder<P: ?Sized + Provider> {
    provider: Arc<P>,
}

impl<P: ?Sized + Provider> ErasedProvider for ProviderHolder<P> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn close(&self) -> Result<(), WardenError> {
        self.provider.close()
    }
}

type ProviderKey = (&'static str, String);

#[derive(Default)]
struct SessionState {
    cache: BTreeMap<ProviderKey, Box<dyn ErasedProvider>>,
    /// Keys whose `create` is currently on the stack. A repeat request for
    /// one of these is a cycle.
    creating: BTreeSet<ProviderKey>,
    /// Cache keys in creation order; closed in reverse.
    created: Vec<ProviderKey>,
}

/// One request's view of the provider registry.
///
/// Sessions are cheap and short-lived. They are not `Clone`, and they are
/// not meant for concurrent use: the reentrancy the cycle guard tracks is
/// a factory requesting providers from within `create`, on the same call
/// stack.
pub struct Session {
    id: SessionId,
    registry: Arc<SpiRegistry>,
    state: Mutex<SessionState>,
    closed: AtomicBool,
}

impl Session {
    /// This session's id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The default provider of `spi`.
    ///
    /// Fails with `ProviderNotFound` (pseudo-id `default`) when the SPI
    /// has no active factory and no configured default.
    pub fn provider<P: ?Sized + Provider>(&self, spi: &Spi<P>) -> Result<Arc<P>, WardenError> {
        let record = self.record(spi)?;
        let Some(default_id) = record.default_id.clone() else {
            return Err(WardenError::ProviderNotFound {
                spi: spi.name().to_string(),
                provider: "default".to_string(),
            });
        };
        self.obtain(record, &default_id)
    }

    /// The provider of `spi` with implementation id `id`.
    pub fn provider_by_id<P: ?Sized + Provider>(
        &self,
        spi: &Spi<P>,
        id: &str,
    ) -> Result<Arc<P>, WardenError> {
        let record = self.record(spi)?;
        self.obtain(record, id)
    }

    /// One provider per active factory of `spi`, sorted by descending
    /// order, then ascending id.
    pub fn all_providers<P: ?Sized + Provider>(
        &self,
        spi: &Spi<P>,
    ) -> Result<Vec<Arc<P>>, WardenError> {
        let record = self.record(spi)?;
        let mut ids: Vec<(i32, &str)> = record
            .factories
            .iter()
            .map(|entry| (entry.order, entry.id.as_str()))
            .collect();
        ids.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        ids.into_iter()
            .map(|(_, id)| self.obtain(record, id))
            .collect()
    }

    /// Closes the session and its providers, reverse creation order.
    /// Idempotent; close errors are logged, not propagated.
    pub fn close(&mut self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let state = std::mem::take(
            self.state
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        );
        Self::close_providers(&self.id, &state);
        debug!(session = %self.id, "session closed");
    }

    fn close_providers(id: &SessionId, state: &SessionState) {
        for key in state.created.iter().rev() {
            if let Some(holder) = state.cache.get(key) {
                if let Err(error) = holder.close() {
                    warn!(
                        session = %id,
                        spi = key.0,
                        provider = %key.1,
                        %error,
                        "provider close failed"
                    );
                }
            }
        }
    }

    fn record<P: ?Sized + Provider>(&self, spi: &Spi<P>) -> Result<&SpiRecord, WardenError> {
        let record =
            self.registry
                .record(spi.name())
                .ok_or_else(|| WardenError::SpiNotFound {
                    spi: spi.name().to_string(),
                })?;
        if record.provider_type != spi.provider_type() {
            return Err(WardenError::Internal(format!(
                "SPI '{}' is registered with a different provider type",
                spi.name()
            )));
        }
        Ok(record)
    }

    fn obtain<P: ?Sized + Provider>(
        &self,
        record: &SpiRecord,
        id: &str,
    ) -> Result<Arc<P>, WardenError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(WardenError::SessionClosed);
        }
        let entry = record
            .factory(id)
            .ok_or_else(|| WardenError::ProviderNotFound {
                spi: record.name.to_string(),
                provider: id.to_string(),
            })?;
        let holder = entry
            .holder
            .as_any()
            .downcast_ref::<FactoryHolder<P>>()
            .ok_or_else(|| {
                WardenError::Internal(format!(
                    "factory '{}/{}' has an unexpected provider type",
                    record.name, id
                ))
            })?;

        let key: ProviderKey = (record.name, id.to_string());
        {
            let mut state = self.state();
            if let Some(cached) = state.cache.get(&key) {
                let cached = cached
                    .as_any()
                    .downcast_ref::<ProviderHolder<P>>()
                    .ok_or_else(|| {
                        WardenError::Internal(format!(
                            "cached provider '{}/{}' has an unexpected type",
                            record.name, id
                        ))
                    })?;
                return Ok(Arc::clone(&cached.provider));
            }
            if state.creating.contains(&key) {
                return Err(WardenError::ProviderCycle {
                    spi: record.name.to_string(),
                    provider: id.to_string(),
                });
            }
            state.creating.insert(key.clone());
        }

        // Lock released: `create` may reenter the session for other
        // providers.
        let created: Result<Arc<P>, WardenError> = holder.inner.create(self).map(Arc::from);

        let mut state = self.state();
        state.creating.remove(&key);
        let provider = created?;
        state.cache.insert(
            key.clone(),
            Box::new(ProviderHolder {
                provider: Arc::clone(&provider),
            }),
        );
        state.created.push(key);
        Ok(provider)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let state = std::mem::take(
            self.state
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if !state.created.is_empty() {
            warn!(
                session = %self.id,
                providers = state.created.len(),
                "session dropped without close"
            );
        }
        Self::close_providers(&self.id, &state);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish()
    }
}
