use std::collections::HashMap;

use chrono::{Duration, Utc};

use pawmill_core::{docstore, new_id, now_rfc3339, ListParams, ListResult, OwnerId, ServiceError};
use pawmill_sql::Value;

use crate::model::{Notification, NotificationKind};
use super::AlertsService;

pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_id: Option<String>,
    /// Distinguishes same-kind notifications about the same entity that must
    /// both land on one day (an expiring warning followed by an expired one).
    pub variant: Option<String>,
}

/// Idempotency key: kind, related entity, optional variant, UTC day bucket.
/// Two emissions with the same key on the same day collapse into one row.
pub(crate) fn dedup_key(
    kind: NotificationKind,
    related_id: Option<&str>,
    variant: Option<&str>,
    day: &str,
) -> String {
    let related = related_id.unwrap_or("-");
    match variant {
        Some(v) => format!("{}:{}:{}:{}", kind.as_str(), related, v, day),
        None => format!("{}:{}:{}", kind.as_str(), related, day),
    }
}

impl AlertsService {
    /// Insert a notification unless one with the same idempotency key
    /// already exists today; in that case Ok(None), not an error. The
    /// UNIQUE constraint does the arbitration, so concurrent emitters
    /// cannot both win.
    pub fn notify(
        &self,
        owner: &OwnerId,
        input: NewNotification,
    ) -> Result<Option<Notification>, ServiceError> {
        if input.title.trim().is_empty() {
            return Err(ServiceError::Validation("notification title is required".into()));
        }

        let id = new_id();
        let now = now_rfc3339();
        let day = Utc::now().format("%Y-%m-%d").to_string();
        let key = dedup_key(
            input.kind,
            input.related_id.as_deref(),
            input.variant.as_deref(),
            &day,
        );

        let record = Notification {
            id: id.clone(),
            title: input.title,
            message: input.message,
            kind: input.kind,
            read: false,
            related_id: input.related_id.clone(),
            created_at: Some(now.clone()),
        };

        let result = docstore::insert(self.sql.as_ref(), "notifications", owner, &id, &record, &[
            ("kind", Value::Text(input.kind.as_str().to_string())),
            ("related_id", match input.related_id {
                Some(r) => Value::Text(r),
                None => Value::Null,
            }),
            ("read", Value::Integer(0)),
            ("dedup_key", Value::Text(key)),
            ("created_at", Value::Text(now)),
        ]);

        match result {
            Ok(()) => Ok(Some(record)),
            Err(ServiceError::Conflict(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn get_notification(&self, owner: &OwnerId, id: &str) -> Result<Notification, ServiceError> {
        docstore::get(self.sql.as_ref(), "notifications", owner, id)
    }

    /// The feed, newest first.
    pub fn list_notifications(
        &self,
        owner: &OwnerId,
        params: &ListParams,
        unread_only: bool,
    ) -> Result<ListResult<Notification>, ServiceError> {
        let limit = params.limit.min(500);
        let mut f: Vec<(&str, Value)> = Vec::new();
        if unread_only {
            f.push(("read", Value::Integer(0)));
        }
        docstore::list(
            self.sql.as_ref(),
            "notifications",
            owner,
            &f,
            "created_at",
            limit,
            params.offset,
        )
    }

    pub fn unread_count(&self, owner: &OwnerId) -> Result<i64, ServiceError> {
        docstore::count(self.sql.as_ref(), "notifications", owner, &[("read", Value::Integer(0))])
    }

    pub fn mark_read(&self, owner: &OwnerId, id: &str) -> Result<Notification, ServiceError> {
        let mut n: Notification = docstore::get(self.sql.as_ref(), "notifications", owner, id)?;
        if !n.read {
            n.read = true;
            self.persist_read_flag(owner, id, &n)?;
        }
        Ok(n)
    }

    pub fn mark_all_read(&self, owner: &OwnerId) -> Result<usize, ServiceError> {
        let unread: Vec<Notification> = self.load_all(owner)?
            .into_iter()
            .filter(|n| !n.read)
            .collect();
        let count = unread.len();
        for mut n in unread {
            n.read = true;
            let id = n.id.clone();
            self.persist_read_flag(owner, &id, &n)?;
        }
        Ok(count)
    }

    pub fn delete_notification(&self, owner: &OwnerId, id: &str) -> Result<(), ServiceError> {
        docstore::delete(self.sql.as_ref(), "notifications", owner, id)
    }

    /// Is there an unread stock notification for this ingredient newer than
    /// `window_hours`? The stock monitor uses this as its suppression query.
    pub fn has_recent_unread_stock(
        &self,
        owner: &OwnerId,
        ingredient_id: &str,
        window_hours: i64,
    ) -> Result<bool, ServiceError> {
        let cutoff = (Utc::now() - Duration::hours(window_hours)).to_rfc3339();
        let rows = self.sql.query(
            "SELECT COUNT(*) AS cnt FROM notifications \
             WHERE owner_id = ?1 AND kind = 'stock' AND related_id = ?2 \
               AND read = 0 AND created_at >= ?3",
            &[
                Value::Text(owner.0.clone()),
                Value::Text(ingredient_id.to_string()),
                Value::Text(cutoff),
            ],
        )?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) > 0)
    }

    /// Batch corrective pass for rows predating the idempotency key: group
    /// by (title, message, related id), keep the most recent per group,
    /// delete the rest. Returns how many rows were deleted.
    pub fn dedup_sweep(&self, owner: &OwnerId) -> Result<usize, ServiceError> {
        let all = self.load_all(owner)?;

        let mut groups: HashMap<(String, String, String), Vec<Notification>> = HashMap::new();
        for n in all {
            let key = (
                n.title.clone(),
                n.message.clone(),
                n.related_id.clone().unwrap_or_default(),
            );
            groups.entry(key).or_default().push(n);
        }

        let mut deleted = 0;
        for (_, mut group) in groups {
            if group.len() < 2 {
                continue;
            }
            // Newest first; id as a deterministic tie-break.
            group.sort_by(|a, b| {
                (b.created_at.as_deref(), b.id.as_str()).cmp(&(a.created_at.as_deref(), a.id.as_str()))
            });
            for n in &group[1..] {
                self.delete_notification(owner, &n.id)?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    fn persist_read_flag(
        &self,
        owner: &OwnerId,
        id: &str,
        record: &Notification,
    ) -> Result<(), ServiceError> {
        docstore::update(self.sql.as_ref(), "notifications", owner, id, record, &[
            ("read", Value::Integer(record.read as i64)),
        ])
    }

    fn load_all(&self, owner: &OwnerId) -> Result<Vec<Notification>, ServiceError> {
        let rows = self.sql.query(
            "SELECT data FROM notifications WHERE owner_id = ?1",
            &[Value::Text(owner.0.clone())],
        )?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
            out.push(serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil;

    pub(crate) fn stock_notification(ingredient: &str) -> NewNotification {
        NewNotification {
            kind: NotificationKind::Stock,
            title: format!("Low stock: {ingredient}"),
            message: format!("{ingredient} is at or below its minimum"),
            related_id: Some(ingredient.to_string()),
            variant: None,
        }
    }

    #[test]
    fn same_day_duplicate_collapses_to_ok_none() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");

        let first = svc.notify(&owner, stock_notification("ing1")).unwrap();
        assert!(first.is_some());

        let second = svc.notify(&owner, stock_notification("ing1")).unwrap();
        assert!(second.is_none());

        let feed = svc
            .list_notifications(&owner, &ListParams::default(), false)
            .unwrap();
        assert_eq!(feed.total, 1);
    }

    #[test]
    fn different_entity_kind_variant_or_owner_all_pass() {
        let svc = testutil::service();
        let alice = OwnerId::from("alice");
        let bob = OwnerId::from("bob");

        assert!(svc.notify(&alice, stock_notification("ing1")).unwrap().is_some());
        // Different ingredient.
        assert!(svc.notify(&alice, stock_notification("ing2")).unwrap().is_some());
        // Same entity, different kind.
        assert!(svc
            .notify(&alice, NewNotification {
                kind: NotificationKind::General,
                title: "note".into(),
                message: "m".into(),
                related_id: Some("ing1".into()),
                variant: None,
            })
            .unwrap()
            .is_some());
        // Same kind and entity, different variant.
        for variant in ["expiring", "expired"] {
            assert!(svc
                .notify(&alice, NewNotification {
                    kind: NotificationKind::SanitaryExpiry,
                    title: variant.into(),
                    message: "m".into(),
                    related_id: Some("lbl1".into()),
                    variant: Some(variant.into()),
                })
                .unwrap()
                .is_some());
        }
        // Same everything, different account.
        assert!(svc.notify(&bob, stock_notification("ing1")).unwrap().is_some());
    }

    #[test]
    fn read_flags_and_counts() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");

        let a = svc.notify(&owner, stock_notification("a")).unwrap().unwrap();
        svc.notify(&owner, stock_notification("b")).unwrap().unwrap();
        svc.notify(&owner, stock_notification("c")).unwrap().unwrap();
        assert_eq!(svc.unread_count(&owner).unwrap(), 3);

        let read = svc.mark_read(&owner, &a.id).unwrap();
        assert!(read.read);
        assert_eq!(svc.unread_count(&owner).unwrap(), 2);

        let unread_only = svc
            .list_notifications(&owner, &ListParams::default(), true)
            .unwrap();
        assert_eq!(unread_only.total, 2);

        assert_eq!(svc.mark_all_read(&owner).unwrap(), 2);
        assert_eq!(svc.unread_count(&owner).unwrap(), 0);
        // Idempotent.
        assert_eq!(svc.mark_all_read(&owner).unwrap(), 0);
    }

    #[test]
    fn recent_unread_stock_window() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");

        assert!(!svc.has_recent_unread_stock(&owner, "ing1", 24).unwrap());

        let n = svc.notify(&owner, stock_notification("ing1")).unwrap().unwrap();
        assert!(svc.has_recent_unread_stock(&owner, "ing1", 24).unwrap());
        assert!(!svc.has_recent_unread_stock(&owner, "other", 24).unwrap());

        // Reading it clears the suppression.
        svc.mark_read(&owner, &n.id).unwrap();
        assert!(!svc.has_recent_unread_stock(&owner, "ing1", 24).unwrap());
    }

    /// Rows written before the idempotency key existed (or on different
    /// days) can hold duplicates; the sweep keeps the most recent per
    /// (title, message, related) group.
    #[test]
    fn sweep_keeps_most_recent_of_each_group() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");

        let insert_raw = |id: &str, title: &str, created: &str| {
            let n = Notification {
                id: id.into(),
                title: title.into(),
                message: "m".into(),
                kind: NotificationKind::Stock,
                read: false,
                related_id: Some("ing1".into()),
                created_at: Some(created.into()),
            };
            docstore::insert(svc.sql.as_ref(), "notifications", &owner, id, &n, &[
                ("kind", Value::Text("stock".into())),
                ("related_id", Value::Text("ing1".into())),
                ("read", Value::Integer(0)),
                // Synthetic keys, as if emitted on different days.
                ("dedup_key", Value::Text(format!("test:{id}"))),
                ("created_at", Value::Text(created.into())),
            ])
            .unwrap();
        };

        // Three sharing (title, message, related), two unrelated.
        insert_raw("n1", "Low stock: chicken", "2025-03-01T08:00:00+00:00");
        insert_raw("n2", "Low stock: chicken", "2025-03-02T08:00:00+00:00");
        insert_raw("n3", "Low stock: chicken", "2025-03-03T08:00:00+00:00");
        insert_raw("n4", "Low stock: beef", "2025-03-01T09:00:00+00:00");
        insert_raw("n5", "Low stock: salmon", "2025-03-01T10:00:00+00:00");

        let deleted = svc.dedup_sweep(&owner).unwrap();
        assert_eq!(deleted, 2);

        let remaining = svc
            .list_notifications(&owner, &ListParams::default(), false)
            .unwrap();
        assert_eq!(remaining.total, 3);
        let ids: Vec<_> = remaining.items.iter().map(|n| n.id.as_str()).collect();
        // The most recent duplicate survives; the unrelated two are untouched.
        assert!(ids.contains(&"n3"));
        assert!(!ids.contains(&"n1"));
        assert!(!ids.contains(&"n2"));
        assert!(ids.contains(&"n4"));
        assert!(ids.contains(&"n5"));

        // Running it again is a no-op.
        assert_eq!(svc.dedup_sweep(&owner).unwrap(), 0);
    }
}
