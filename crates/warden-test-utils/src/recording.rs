// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event capture for lifecycle assertions.

use std::sync::{Mutex, PoisonError};

use warden_core::{ProviderEvent, ProviderEventListener};

/// Captures every dispatched [`ProviderEvent`] for later assertions.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ProviderEvent>>,
}

impl RecordingListener {
    /// Snapshot of the events seen so far, in dispatch order.
    pub fn events(&self) -> Vec<ProviderEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProviderEventListener for RecordingListener {
    fn on_event(&self, event: &ProviderEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_events_in_dispatch_order() {
        let listener = RecordingListener::default();
        listener.on_event(&ProviderEvent::PostInit);
        listener.on_event(&ProviderEvent::PackageDeployed {
            package: "acme".to_string(),
        });

        assert_eq!(
            listener.events(),
            vec![
                ProviderEvent::PostInit,
                ProviderEvent::PackageDeployed {
                    package: "acme".to_string()
                },
            ]
        );
    }
}
