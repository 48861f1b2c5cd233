//! Background stock and expiry monitors.
//!
//! One scheduler task owns both checks: a single `tokio::select!` over a
//! cancellation token and two interval timers. There is nothing to remount
//! and no second timer to leak, and the previous-tick state lives as a plain
//! local on the task. Cancellation is tied to server shutdown.
//!
//! Deduplication is layered: the stock check suppresses re-emission from its
//! own previous tick and from a 24-hour unread-notification window; the
//! expiry check re-emits freely and relies on the write-layer idempotency
//! key to collapse duplicates.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use pawmill_core::{parse_rfc3339, AccountSettings, OwnerId, ServiceError};
use pawmill_kv::KVStore;

use inventory::service::InventoryService;
use labels::expiry::{classify_date, classify_datetime, parse_date, ExpiryStatus};
use labels::service::LabelsService;

use crate::model::NotificationKind;
use crate::service::notification::NewNotification;
use crate::service::AlertsService;

/// Process-level monitor cadence. Not per-account: the scheduler scans every
/// account on each tick.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Stock check period (seconds).
    pub stock_interval_secs: u64,
    /// Delay before the first stock check.
    pub stock_initial_delay_secs: u64,
    /// Expiry check period (seconds); the first check runs immediately.
    pub expiry_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            stock_interval_secs: 3600,
            stock_initial_delay_secs: 2,
            expiry_interval_secs: 1800,
        }
    }
}

/// Service handles the monitors read from and write to.
pub struct MonitorDeps {
    pub alerts: Arc<AlertsService>,
    pub inventory: Arc<InventoryService>,
    pub labels: Arc<LabelsService>,
    pub kv: Arc<dyn KVStore>,
}

/// Hours of unread-stock-notification history that suppress a re-emit.
const STOCK_SUPPRESS_WINDOW_HOURS: i64 = 24;

/// Start the scheduler. Returns a token that stops it when cancelled.
pub fn start(deps: MonitorDeps, config: MonitorConfig) -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        info!(
            stock_interval = config.stock_interval_secs,
            expiry_interval = config.expiry_interval_secs,
            "monitor scheduler started"
        );

        let mut stock_timer = interval_at(
            Instant::now() + Duration::from_secs(config.stock_initial_delay_secs),
            Duration::from_secs(config.stock_interval_secs),
        );
        stock_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut expiry_timer = interval(Duration::from_secs(config.expiry_interval_secs));
        expiry_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Ingredients that were low on the previous stock tick, per account.
        let mut prev_low: HashMap<String, HashSet<String>> = HashMap::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("monitor scheduler stopped");
                    break;
                }
                _ = stock_timer.tick() => {
                    debug!("stock monitor tick");
                    stock_tick(&deps, &mut prev_low);
                }
                _ = expiry_timer.tick() => {
                    debug!("expiry monitor tick");
                    expiry_tick(&deps);
                }
            }
        }
    });

    token
}

fn stock_tick(deps: &MonitorDeps, prev_low: &mut HashMap<String, HashSet<String>>) {
    let owners = match deps.inventory.owners() {
        Ok(owners) => owners,
        Err(e) => {
            error!("stock monitor: listing accounts failed: {e}");
            return;
        }
    };

    let old = std::mem::take(prev_low);
    for owner in owners {
        let seen_last_tick = old.get(owner.as_str());
        match stock_check(deps, &owner, seen_last_tick) {
            Ok((emitted, now_low)) => {
                if emitted > 0 {
                    info!(owner = %owner, emitted, "stock monitor: low-stock notifications");
                }
                prev_low.insert(owner.0.clone(), now_low);
            }
            Err(e) => {
                error!(owner = %owner, "stock monitor check failed: {e}");
                // Keep the previous tick's memory so a transient failure
                // does not cause a burst of re-emits next time.
                if let Some(set) = seen_last_tick {
                    prev_low.insert(owner.0.clone(), set.clone());
                }
            }
        }
    }
}

/// One account's stock scan. Low is boundary inclusive (current == minimum
/// is low). A low ingredient is suppressed if it was low on the previous
/// tick, or if an unread stock notification for it is newer than 24 h.
fn stock_check(
    deps: &MonitorDeps,
    owner: &OwnerId,
    seen_last_tick: Option<&HashSet<String>>,
) -> Result<(usize, HashSet<String>), ServiceError> {
    let low = deps.inventory.low_stock(owner)?;
    let mut now_low = HashSet::with_capacity(low.len());
    let mut emitted = 0;

    for ingredient in low {
        now_low.insert(ingredient.id.clone());

        if seen_last_tick.is_some_and(|set| set.contains(&ingredient.id)) {
            continue;
        }
        if deps
            .alerts
            .has_recent_unread_stock(owner, &ingredient.id, STOCK_SUPPRESS_WINDOW_HOURS)?
        {
            continue;
        }

        let created = deps.alerts.notify(owner, NewNotification {
            kind: NotificationKind::Stock,
            title: format!("Low stock: {}", ingredient.name),
            message: format!(
                "{} is at {} {} (minimum {} {})",
                ingredient.name,
                ingredient.current_stock,
                ingredient.unit,
                ingredient.min_stock,
                ingredient.unit,
            ),
            related_id: Some(ingredient.id.clone()),
            variant: None,
        })?;
        if created.is_some() {
            emitted += 1;
        }
    }

    Ok((emitted, now_low))
}

fn expiry_tick(deps: &MonitorDeps) {
    let owners = match deps.labels.owners() {
        Ok(owners) => owners,
        Err(e) => {
            error!("expiry monitor: listing accounts failed: {e}");
            return;
        }
    };
    // One scan for every account's overrides instead of a read per account.
    let overridden = match AccountSettings::load_overridden(deps.kv.as_ref()) {
        Ok(map) => map,
        Err(e) => {
            error!("expiry monitor: loading settings failed: {e}");
            return;
        }
    };

    for owner in owners {
        let settings = overridden.get(owner.as_str()).cloned().unwrap_or_default();
        match expiry_check(deps, &owner, &settings) {
            Ok(emitted) if emitted > 0 => {
                info!(owner = %owner, emitted, "expiry monitor: notifications");
            }
            Ok(_) => {}
            Err(e) => error!(owner = %owner, "expiry monitor check failed: {e}"),
        }
    }
}

/// One account's expiry scan: every sanitary label (hour-granular) and every
/// standard label (day-granular). Re-emission on subsequent ticks is
/// intentional and absorbed by the idempotency key; the expiring and expired
/// phases carry distinct variants so one does not mask the other.
fn expiry_check(
    deps: &MonitorDeps,
    owner: &OwnerId,
    settings: &AccountSettings,
) -> Result<usize, ServiceError> {
    let now = Utc::now();
    let today = now.date_naive();
    let mut emitted = 0;

    for label in deps.labels.all_sanitary_labels(owner)? {
        let Some(expiry) = parse_rfc3339(&label.expiry_at) else {
            warn!(owner = %owner, label = %label.id, "sanitary label has a bad expiry, skipping");
            continue;
        };
        let status = classify_datetime(expiry, now, settings.sanitary_expiring_window_hours);
        let input = match status {
            ExpiryStatus::Valid => continue,
            ExpiryStatus::Expiring => NewNotification {
                kind: NotificationKind::SanitaryExpiry,
                title: "Sanitary label expiring soon".into(),
                message: format!(
                    "{} expires at {} (within {} h)",
                    label.product_name, label.expiry_at, settings.sanitary_expiring_window_hours,
                ),
                related_id: Some(label.id.clone()),
                variant: Some("expiring".into()),
            },
            ExpiryStatus::Expired => NewNotification {
                kind: NotificationKind::SanitaryExpiry,
                title: "Sanitary label expired".into(),
                message: format!("{} expired at {}", label.product_name, label.expiry_at),
                related_id: Some(label.id.clone()),
                variant: Some("expired".into()),
            },
        };
        if deps.alerts.notify(owner, input)?.is_some() {
            emitted += 1;
        }
    }

    for label in deps.labels.all_labels(owner)? {
        let Some(expiry) = parse_date(&label.expiry_date) else {
            warn!(owner = %owner, label = %label.id, "label has a bad expiry date, skipping");
            continue;
        };
        let status = classify_date(expiry, today, settings.label_expiring_window_days);
        let input = match status {
            ExpiryStatus::Valid => continue,
            ExpiryStatus::Expiring => NewNotification {
                kind: NotificationKind::Expiry,
                title: "Label expiring soon".into(),
                message: format!(
                    "{} (batch {}) expires on {}",
                    label.product_name, label.batch_code, label.expiry_date,
                ),
                related_id: Some(label.id.clone()),
                variant: Some("expiring".into()),
            },
            ExpiryStatus::Expired => NewNotification {
                kind: NotificationKind::Expiry,
                title: "Label expired".into(),
                message: format!(
                    "{} (batch {}) expired on {}",
                    label.product_name, label.batch_code, label.expiry_date,
                ),
                related_id: Some(label.id.clone()),
                variant: Some("expired".into()),
            },
        };
        if deps.alerts.notify(owner, input)?.is_some() {
            emitted += 1;
        }
    }

    Ok(emitted)
}
