use serde::Serialize;
use tracing::warn;

use pawmill_core::{docstore, new_id, now_rfc3339, ListParams, ListResult, OwnerId, ServiceError};
use pawmill_sql::Value;

use alerts::model::NotificationKind;
use alerts::service::notification::NewNotification;

use crate::model::{Production, ProductionStatus};
use super::ProductionService;

pub struct CreateProductionInput {
    pub batch_code: String,
    pub product_id: Option<String>,
    pub protein: Option<String>,
}

#[derive(Debug, Default)]
pub struct ProductionFilters {
    pub status: Option<ProductionStatus>,
    pub product_id: Option<String>,
}

/// Aggregate numbers for the reports page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStats {
    pub total: usize,
    pub open_count: usize,
    pub in_progress_count: usize,
    pub finished_count: usize,
    /// Average yield of finished runs with both weights recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_yield_pct: Option<f64>,
}

impl ProductionService {
    /// Create a production run with status `open`. The batch code must be
    /// unused within the account: checked explicitly before anything is
    /// written, with the UNIQUE constraint as the backstop for races.
    pub fn create_production(
        &self,
        owner: &OwnerId,
        input: CreateProductionInput,
    ) -> Result<Production, ServiceError> {
        if input.batch_code.trim().is_empty() {
            return Err(ServiceError::Validation("batch code is required".into()));
        }
        if let Some(product_id) = &input.product_id {
            // The reference must resolve within the same account.
            let _ = self.get_product(owner, product_id)?;
        }

        let dup = self.sql.query(
            "SELECT id FROM productions WHERE owner_id = ?1 AND batch_code = ?2",
            &[Value::Text(owner.0.clone()), Value::Text(input.batch_code.clone())],
        )?;
        if !dup.is_empty() {
            return Err(ServiceError::Conflict(format!(
                "batch code {} already exists",
                input.batch_code
            )));
        }

        let id = new_id();
        let now = now_rfc3339();
        let record = Production {
            id: id.clone(),
            batch_code: input.batch_code.clone(),
            product_id: input.product_id.clone(),
            protein: input.protein,
            initial_cleaning_done: false,
            ppe_used: false,
            final_cleaning_done: false,
            visual_analysis_passed: false,
            frozen_weight_kg: None,
            thawed_weight_kg: None,
            clean_weight_kg: None,
            final_weight_kg: None,
            thaw_time: None,
            dehydrator_entry_time: None,
            dehydrator_exit_time: None,
            ambient_temp_c: None,
            dehydrator_temp_c: None,
            package_count: None,
            package_size_g: None,
            status: ProductionStatus::Open,
            created_at: Some(now.clone()),
            updated_at: Some(now.clone()),
        };

        docstore::insert(self.sql.as_ref(), "productions", owner, &id, &record, &[
            ("batch_code", Value::Text(input.batch_code)),
            ("product_id", match input.product_id {
                Some(p) => Value::Text(p),
                None => Value::Null,
            }),
            ("status", Value::Text(record.status.as_str().to_string())),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_production(&self, owner: &OwnerId, id: &str) -> Result<Production, ServiceError> {
        docstore::get(self.sql.as_ref(), "productions", owner, id)
    }

    pub fn list_productions(
        &self,
        owner: &OwnerId,
        params: &ListParams,
        filters: &ProductionFilters,
    ) -> Result<ListResult<Production>, ServiceError> {
        let limit = params.limit.min(500);
        let mut f: Vec<(&str, Value)> = Vec::new();
        if let Some(status) = filters.status {
            f.push(("status", Value::Text(status.as_str().to_string())));
        }
        if let Some(product_id) = &filters.product_id {
            f.push(("product_id", Value::Text(product_id.clone())));
        }
        docstore::list(self.sql.as_ref(), "productions", owner, &f, "created_at", limit, params.offset)
    }

    /// Merge-patch update. Status may only move forward along the
    /// lifecycle; a patch that would move it backward is rejected before
    /// anything is written.
    pub fn update_production(
        &self,
        owner: &OwnerId,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Production, ServiceError> {
        let current: Production = docstore::get(self.sql.as_ref(), "productions", owner, id)?;
        let updated: Production = docstore::apply_patch(&current, patch)?;

        if updated.batch_code.trim().is_empty() {
            return Err(ServiceError::Validation("batch code is required".into()));
        }
        if updated.status < current.status {
            return Err(ServiceError::Validation(format!(
                "status cannot move backward ({} -> {})",
                current.status.as_str(),
                updated.status.as_str()
            )));
        }

        self.persist_production(owner, id, &updated)?;
        Ok(updated)
    }

    pub fn delete_production(&self, owner: &OwnerId, id: &str) -> Result<(), ServiceError> {
        docstore::delete(self.sql.as_ref(), "productions", owner, id)
    }

    /// The open → in_progress transition, gated on the checkpoints that
    /// must hold before work starts: initial cleaning, PPE, and both the
    /// frozen and thawed weights recorded.
    pub fn start_production(&self, owner: &OwnerId, id: &str) -> Result<Production, ServiceError> {
        let mut production = self.get_production(owner, id)?;

        if production.status != ProductionStatus::Open {
            return Err(ServiceError::Validation(format!(
                "production is {}, only open productions can be started",
                production.status.as_str()
            )));
        }
        let ready = production.initial_cleaning_done
            && production.ppe_used
            && production.frozen_weight_kg.is_some()
            && production.thawed_weight_kg.is_some();
        if !ready {
            return Err(ServiceError::Validation(
                "cannot start: initial cleaning, PPE and both frozen and thawed weights are required".into(),
            ));
        }

        production.status = ProductionStatus::InProgress;
        production.updated_at = Some(now_rfc3339());
        self.persist_production(owner, id, &production)?;
        Ok(production)
    }

    /// Finish a production unconditionally.
    ///
    /// NOTE: this is a trusted manual override. It force-sets
    /// `final_cleaning_done` and `visual_analysis_passed` to true and stamps
    /// the dehydrator exit time if missing, without verifying that any of
    /// those steps actually happened. A run finished this way will claim
    /// all quality checkpoints passed even if none were ever ticked. Kept
    /// deliberately; the pinning test below documents the behavior.
    pub fn finish_production(&self, owner: &OwnerId, id: &str) -> Result<Production, ServiceError> {
        let mut production = self.get_production(owner, id)?;
        let now = now_rfc3339();

        production.status = ProductionStatus::Finished;
        production.final_cleaning_done = true;
        production.visual_analysis_passed = true;
        if production.dehydrator_exit_time.is_none() {
            production.dehydrator_exit_time = Some(now.clone());
        }
        production.updated_at = Some(now);

        self.persist_production(owner, id, &production)?;

        // Surface completion in the notification feed. The run is already
        // persisted; a feed failure must not undo it.
        let note = NewNotification {
            kind: NotificationKind::Production,
            title: format!("Production finished: {}", production.batch_code),
            message: match production.yield_pct() {
                Some(pct) => format!(
                    "Batch {} finished with a yield of {:.1}%",
                    production.batch_code, pct
                ),
                None => format!("Batch {} finished", production.batch_code),
            },
            related_id: Some(production.id.clone()),
            variant: None,
        };
        if let Err(e) = self.alerts.notify(owner, note) {
            warn!(owner = %owner, production = %production.id, "finish notification failed: {e}");
        }

        Ok(production)
    }

    pub fn production_stats(&self, owner: &OwnerId) -> Result<ProductionStats, ServiceError> {
        let all = self.all_productions(owner)?;

        let mut stats = ProductionStats {
            total: all.len(),
            open_count: 0,
            in_progress_count: 0,
            finished_count: 0,
            avg_yield_pct: None,
        };
        let mut yields = Vec::new();
        for p in &all {
            match p.status {
                ProductionStatus::Open => stats.open_count += 1,
                ProductionStatus::InProgress => stats.in_progress_count += 1,
                ProductionStatus::Finished => {
                    stats.finished_count += 1;
                    if let Some(y) = p.yield_pct() {
                        yields.push(y);
                    }
                }
            }
        }
        if !yields.is_empty() {
            stats.avg_yield_pct = Some(yields.iter().sum::<f64>() / yields.len() as f64);
        }
        Ok(stats)
    }

    fn persist_production(
        &self,
        owner: &OwnerId,
        id: &str,
        record: &Production,
    ) -> Result<(), ServiceError> {
        docstore::update(self.sql.as_ref(), "productions", owner, id, record, &[
            ("batch_code", Value::Text(record.batch_code.clone())),
            ("product_id", match record.product_id.clone() {
                Some(p) => Value::Text(p),
                None => Value::Null,
            }),
            ("status", Value::Text(record.status.as_str().to_string())),
            ("updated_at", Value::Text(record.updated_at.clone().unwrap_or_default())),
        ])
    }

    fn all_productions(&self, owner: &OwnerId) -> Result<Vec<Production>, ServiceError> {
        let rows = self.sql.query(
            "SELECT data FROM productions WHERE owner_id = ?1",
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

    fn batch(code: &str) -> CreateProductionInput {
        CreateProductionInput {
            batch_code: code.into(),
            product_id: None,
            protein: Some("chicken".into()),
        }
    }

    fn make_startable(svc: &ProductionService, owner: &OwnerId, id: &str) -> Production {
        svc.update_production(owner, id, serde_json::json!({
            "initialCleaningDone": true,
            "ppeUsed": true,
            "frozenWeightKg": 10.0,
            "thawedWeightKg": 9.2,
        }))
        .unwrap()
    }

    #[test]
    fn duplicate_batch_code_rejected_before_any_write() {
        let svc = testutil::service();
        let alice = OwnerId::from("alice");
        let bob = OwnerId::from("bob");

        svc.create_production(&alice, batch("B-2025-001")).unwrap();
        assert!(matches!(
            svc.create_production(&alice, batch("B-2025-001")),
            Err(ServiceError::Conflict(_))
        ));
        let list = svc
            .list_productions(&alice, &ListParams::default(), &ProductionFilters::default())
            .unwrap();
        assert_eq!(list.total, 1);

        // A different account may reuse the code.
        assert!(svc.create_production(&bob, batch("B-2025-001")).is_ok());
    }

    #[test]
    fn missing_product_reference_rejected() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        let result = svc.create_production(&owner, CreateProductionInput {
            batch_code: "B-1".into(),
            product_id: Some("nope".into()),
            protein: None,
        });
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn status_cannot_move_backward() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        let p = svc.create_production(&owner, batch("B-1")).unwrap();

        // Forward via patch is fine.
        let updated = svc
            .update_production(&owner, &p.id, serde_json::json!({"status": "in_progress"}))
            .unwrap();
        assert_eq!(updated.status, ProductionStatus::InProgress);

        svc.finish_production(&owner, &p.id).unwrap();
        let back = svc.update_production(&owner, &p.id, serde_json::json!({"status": "open"}));
        assert!(matches!(back, Err(ServiceError::Validation(_))));

        // Unchanged after the rejected patch.
        assert_eq!(
            svc.get_production(&owner, &p.id).unwrap().status,
            ProductionStatus::Finished
        );
    }

    #[test]
    fn start_requires_the_four_checkpoints() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        let p = svc.create_production(&owner, batch("B-1")).unwrap();

        assert!(matches!(
            svc.start_production(&owner, &p.id),
            Err(ServiceError::Validation(_))
        ));

        make_startable(&svc, &owner, &p.id);
        let started = svc.start_production(&owner, &p.id).unwrap();
        assert_eq!(started.status, ProductionStatus::InProgress);

        // Starting again is rejected: no longer open.
        assert!(matches!(
            svc.start_production(&owner, &p.id),
            Err(ServiceError::Validation(_))
        ));
    }

    /// Pins the finish shortcut: finishing force-completes the quality
    /// checkpoints even when none of them were ever ticked. If this test
    /// starts failing because finish now verifies checkpoints, that is a
    /// deliberate business-rule change, not a regression fix.
    #[test]
    fn finish_force_completes_checkpoints_without_verification() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        let p = svc.create_production(&owner, batch("B-1")).unwrap();
        assert!(!p.final_cleaning_done);
        assert!(!p.visual_analysis_passed);

        let finished = svc.finish_production(&owner, &p.id).unwrap();
        assert_eq!(finished.status, ProductionStatus::Finished);
        assert!(finished.final_cleaning_done);
        assert!(finished.visual_analysis_passed);
        assert!(finished.dehydrator_exit_time.is_some());
    }

    #[test]
    fn finish_lands_in_the_notification_feed() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");
        let p = svc.create_production(&owner, batch("B-7")).unwrap();
        svc.update_production(&owner, &p.id, serde_json::json!({
            "frozenWeightKg": 10.0,
            "finalWeightKg": 3.5,
        }))
        .unwrap();

        svc.finish_production(&owner, &p.id).unwrap();

        let feed = svc
            .alerts
            .list_notifications(&owner, &ListParams::default(), false)
            .unwrap();
        assert_eq!(feed.total, 1);
        let note = &feed.items[0];
        assert_eq!(note.kind, NotificationKind::Production);
        assert_eq!(note.related_id.as_deref(), Some(p.id.as_str()));
        assert!(note.message.contains("35.0%"));
    }

    #[test]
    fn productions_are_owner_isolated() {
        let svc = testutil::service();
        let alice = OwnerId::from("alice");
        let bob = OwnerId::from("bob");
        let p = svc.create_production(&alice, batch("B-1")).unwrap();

        assert!(svc.get_production(&bob, &p.id).is_err());
        assert!(svc
            .update_production(&bob, &p.id, serde_json::json!({"protein": "beef"}))
            .is_err());
        assert!(svc.delete_production(&bob, &p.id).is_err());
        assert!(svc.finish_production(&bob, &p.id).is_err());
    }

    #[test]
    fn stats_count_by_status_and_average_yield() {
        let svc = testutil::service();
        let owner = OwnerId::from("acct1");

        svc.create_production(&owner, batch("B-1")).unwrap();

        let b2 = svc.create_production(&owner, batch("B-2")).unwrap();
        make_startable(&svc, &owner, &b2.id);
        svc.start_production(&owner, &b2.id).unwrap();

        for (code, frozen, final_kg) in [("B-3", 10.0, 3.0), ("B-4", 10.0, 4.0)] {
            let p = svc.create_production(&owner, batch(code)).unwrap();
            svc.update_production(&owner, &p.id, serde_json::json!({
                "frozenWeightKg": frozen,
                "finalWeightKg": final_kg,
            }))
            .unwrap();
            svc.finish_production(&owner, &p.id).unwrap();
        }

        let stats = svc.production_stats(&owner).unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.open_count, 1);
        assert_eq!(stats.in_progress_count, 1);
        assert_eq!(stats.finished_count, 2);
        assert_eq!(stats.avg_yield_pct, Some(35.0));
    }
}
