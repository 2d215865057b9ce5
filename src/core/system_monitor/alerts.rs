//! Temperature alert dispatch.
//!
//! Decides whether a poll cycle's readings warrant an alert, enforces the
//! cooldown between alerts, delivers to every subscribed destination and
//! prunes destinations that reject delivery.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::classifier::Thresholds;
use super::metrics::{TempStatus, TemperatureReading};
use crate::core::delivery::DeliverySink;
use crate::ui::report::{alert_page, PageBudget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn from_status(status: TempStatus) -> Option<Self> {
        match status {
            TempStatus::Normal => None,
            TempStatus::Warning => Some(AlertLevel::Warning),
            TempStatus::Critical => Some(AlertLevel::Critical),
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::Warning => f.write_str("WARNING"),
            AlertLevel::Critical => f.write_str("CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreachState {
    Idle,
    Breach(AlertLevel),
}

/// Breach level of a poll cycle, taken from its hottest reading
pub fn assess(readings: &[TemperatureReading]) -> BreachState {
    readings
        .iter()
        .max_by(|a, b| a.temperature.total_cmp(&b.temperature))
        .and_then(|hottest| AlertLevel::from_status(hottest.status()))
        .map_or(BreachState::Idle, BreachState::Breach)
}

/// Mutable alert state shared between the poll loop and on-demand commands
#[derive(Debug, Clone, Default)]
pub struct AlertState {
    pub last_alert: Option<DateTime<Utc>>,
    /// Subscribed destinations, each tagged with the subscription it came from
    pub destinations: HashMap<String, u64>,
    pub subscriptions: u64,
}

impl AlertState {
    fn subscribe(&mut self, destination: &str) -> bool {
        if self.destinations.contains_key(destination) {
            return false;
        }
        self.subscriptions += 1;
        self.destinations
            .insert(destination.to_string(), self.subscriptions);
        true
    }
}

/// Alert target registry
pub trait DestinationRegistry {
    /// Returns false when the destination was already subscribed
    fn subscribe(&self, destination: &str) -> bool;
    /// Returns false when the destination was not subscribed
    fn unsubscribe(&self, destination: &str) -> bool;
    /// Subscribed destinations, sorted
    fn list_subscribed(&self) -> Vec<String>;
}

/// Result of evaluating one poll cycle for alerting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No reading breached a threshold
    Idle,
    SuppressedByCooldown { remaining: chrono::Duration },
    SuppressedNoDestinations,
    Dispatched {
        level: AlertLevel,
        delivered: Vec<String>,
        failed: Vec<(String, String)>,
    },
}

impl DispatchOutcome {
    /// A dispatch that reached none of its destinations
    pub fn reached_nobody(&self) -> bool {
        matches!(self, DispatchOutcome::Dispatched { delivered, .. } if delivered.is_empty())
    }
}

pub struct AlertCoordinator {
    state: Mutex<AlertState>,
    cooldown: chrono::Duration,
    thresholds: Thresholds,
    host: String,
    budget: PageBudget,
}

impl AlertCoordinator {
    pub fn new<I>(thresholds: Thresholds, cooldown: std::time::Duration, destinations: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            state: Mutex::new({
                let mut state = AlertState::default();
                for destination in destinations {
                    state.subscribe(&destination);
                }
                state
            }),
            cooldown: chrono::Duration::from_std(cooldown).unwrap_or(chrono::Duration::MAX),
            thresholds,
            host: "localhost".to_string(),
            budget: PageBudget::default(),
        }
    }

    /// Host name shown in alert pages
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn cooldown(&self) -> std::time::Duration {
        self.cooldown.to_std().unwrap_or_default()
    }

    pub fn last_alert(&self) -> Option<DateTime<Utc>> {
        self.state.lock().last_alert
    }

    /// Evaluate a poll cycle and deliver an alert when one is due.
    ///
    /// The cooldown window starts at `now` whenever a delivery is attempted,
    /// including when every destination fails.
    pub async fn on_poll<S: DeliverySink>(
        &self,
        readings: &[TemperatureReading],
        sink: &S,
        now: DateTime<Utc>,
    ) -> DispatchOutcome {
        let level = match assess(readings) {
            BreachState::Idle => return DispatchOutcome::Idle,
            BreachState::Breach(level) => level,
        };

        let destinations: Vec<(String, u64)> = {
            let mut state = self.state.lock();

            if let Some(last) = state.last_alert {
                let elapsed = now - last;
                if elapsed < self.cooldown {
                    let remaining = self.cooldown - elapsed;
                    log::debug!(
                        "{} alert suppressed, cooldown has {}s remaining",
                        level,
                        remaining.num_seconds()
                    );
                    return DispatchOutcome::SuppressedByCooldown { remaining };
                }
            }

            if state.destinations.is_empty() {
                log::info!("{} alert not sent, no destinations subscribed", level);
                return DispatchOutcome::SuppressedNoDestinations;
            }

            state.last_alert = Some(now);
            let mut list: Vec<(String, u64)> = state
                .destinations
                .iter()
                .map(|(destination, id)| (destination.clone(), *id))
                .collect();
            list.sort();
            list
        };

        let page = alert_page(level, readings, &self.thresholds, now, &self.host, &self.budget);
        log::info!("Dispatching {} alert to {} destination(s)", level, destinations.len());

        let results = join_all(destinations.iter().map(|(destination, id)| {
            let page = &page;
            async move { (destination, *id, sink.deliver(destination, page).await) }
        }))
        .await;

        let mut delivered = Vec::new();
        let mut failed = Vec::new();
        let mut rejected = Vec::new();
        for (destination, id, result) in results {
            match result {
                Ok(()) => delivered.push(destination.clone()),
                Err(e) => {
                    failed.push((destination.clone(), e.to_string()));
                    rejected.push((destination, id, e));
                }
            }
        }

        if !rejected.is_empty() {
            let mut state = self.state.lock();
            for (destination, id, e) in rejected {
                // a subscription made while the delivery was in flight is kept
                if state.destinations.get(destination) == Some(&id) {
                    state.destinations.remove(destination);
                    log::warn!("Removing alert destination {}: {}", destination, e);
                } else {
                    log::warn!("Alert delivery to {} failed: {}", destination, e);
                }
            }
        }

        if delivered.is_empty() {
            log::error!(
                "{} alert delivered to zero reachable destinations ({} failed)",
                level,
                failed.len()
            );
        }

        DispatchOutcome::Dispatched {
            level,
            delivered,
            failed,
        }
    }
}

impl DestinationRegistry for AlertCoordinator {
    fn subscribe(&self, destination: &str) -> bool {
        let added = self.state.lock().subscribe(destination);
        if added {
            log::info!("Alerts enabled for {}", destination);
        }
        added
    }

    fn unsubscribe(&self, destination: &str) -> bool {
        let removed = self.state.lock().destinations.remove(destination).is_some();
        if removed {
            log::info!("Alerts disabled for {}", destination);
        }
        removed
    }

    fn list_subscribed(&self) -> Vec<String> {
        let mut list: Vec<String> = self.state.lock().destinations.keys().cloned().collect();
        list.sort();
        list
    }
}
