use chrono::Utc;

use pawmill_core::{docstore, new_id, now_rfc3339, ListParams, ListResult, OwnerId, ServiceError};
use pawmill_sql::Value;

use crate::expiry::{classify_date, parse_date, ExpiryStatus};
use crate::model::{Label, LabelView};
use super::LabelsService;

pub struct CreateLabelInput {
    pub product_name: String,
    pub batch_code: String,
    pub production_id: Option<String>,
    pub production_date: String,
    pub expiry_date: String,
    pub quantity: u32,
}

#[derive(Debug, Default)]
pub struct LabelFilters {
    pub production_id: Option<String>,
    pub printed: Option<bool>,
}

fn check_dates(production_date: &str, expiry_date: &str) -> Result<(), ServiceError> {
    let produced = parse_date(production_date)
        .ok_or_else(|| ServiceError::Validation("productionDate must be YYYY-MM-DD".into()))?;
    let expiry = parse_date(expiry_date)
        .ok_or_else(|| ServiceError::Validation("expiryDate must be YYYY-MM-DD".into()))?;
    if expiry < produced {
        return Err(ServiceError::Validation(
            "expiryDate is before productionDate".into(),
        ));
    }
    Ok(())
}

impl LabelsService {
    pub fn create_label(&self, owner: &OwnerId, input: CreateLabelInput) -> Result<Label, ServiceError> {
        if input.product_name.trim().is_empty() {
            return Err(ServiceError::Validation("product name is required".into()));
        }
        if input.batch_code.trim().is_empty() {
            return Err(ServiceError::Validation("batch code is required".into()));
        }
        check_dates(&input.production_date, &input.expiry_date)?;

        let id = new_id();
        let now = now_rfc3339();
        let record = Label {
            id: id.clone(),
            product_name: input.product_name,
            batch_code: input.batch_code,
            production_id: input.production_id.clone(),
            production_date: input.production_date,
            expiry_date: input.expiry_date.clone(),
            printed: false,
            quantity: input.quantity.max(1),
            created_at: Some(now.clone()),
            updated_at: Some(now.clone()),
        };

        docstore::insert(self.sql.as_ref(), "labels", owner, &id, &record, &[
            ("production_id", match input.production_id {
                Some(p) => Value::Text(p),
                None => Value::Null,
            }),
            ("printed", Value::Integer(0)),
            ("expiry_date", Value::Text(input.expiry_date)),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_label(&self, owner: &OwnerId, id: &str) -> Result<Label, ServiceError> {
        docstore::get(self.sql.as_ref(), "labels", owner, id)
    }

    pub fn list_labels(
        &self,
        owner: &OwnerId,
        params: &ListParams,
        filters: &LabelFilters,
    ) -> Result<ListResult<Label>, ServiceError> {
        let limit = params.limit.min(500);
        let mut f: Vec<(&str, Value)> = Vec::new();
        if let Some(ref p) = filters.production_id {
            f.push(("production_id", Value::Text(p.clone())));
        }
        if let Some(printed) = filters.printed {
            f.push(("printed", Value::Integer(printed as i64)));
        }
        docstore::list(self.sql.as_ref(), "labels", owner, &f, "created_at", limit, params.offset)
    }

    pub fn update_label(
        &self,
        owner: &OwnerId,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Label, ServiceError> {
        let current: Label = docstore::get(self.sql.as_ref(), "labels", owner, id)?;
        let updated: Label = docstore::apply_patch(&current, patch)?;
        check_dates(&updated.production_date, &updated.expiry_date)?;

        self.persist_label(owner, id, &updated)?;
        Ok(updated)
    }

    pub fn delete_label(&self, owner: &OwnerId, id: &str) -> Result<(), ServiceError> {
        docstore::delete(self.sql.as_ref(), "labels", owner, id)
    }

    pub fn mark_label_printed(&self, owner: &OwnerId, id: &str) -> Result<Label, ServiceError> {
        let mut label: Label = docstore::get(self.sql.as_ref(), "labels", owner, id)?;
        label.printed = true;
        label.updated_at = Some(now_rfc3339());
        self.persist_label(owner, id, &label)?;
        Ok(label)
    }

    /// Attach the derived status. Computed against today's date and the
    /// account's expiring window; nothing is written back.
    pub fn label_view(&self, owner: &OwnerId, label: Label) -> Result<LabelView, ServiceError> {
        let window = self.settings(owner)?.label_expiring_window_days;
        Self::view_with_window(label, window)
    }

    pub(crate) fn view_with_window(label: Label, window_days: i64) -> Result<LabelView, ServiceError> {
        let expiry = parse_date(&label.expiry_date)
            .ok_or_else(|| ServiceError::Internal(format!("label {} has a bad expiry date", label.id)))?;
        let status = classify_date(expiry, Utc::now().date_naive(), window_days);
        Ok(LabelView { label, status })
    }

    /// Labels currently inside the expiring window (not yet expired).
    pub fn expiring_labels(&self, owner: &OwnerId) -> Result<Vec<LabelView>, ServiceError> {
        self.classified_labels(owner, ExpiryStatus::Expiring)
    }

    /// Labels whose expiry date has passed.
    pub fn expired_labels(&self, owner: &OwnerId) -> Result<Vec<LabelView>, ServiceError> {
        self.classified_labels(owner, ExpiryStatus::Expired)
    }

    fn classified_labels(
        &self,
        owner: &OwnerId,
        want: ExpiryStatus,
    ) -> Result<Vec<LabelView>, ServiceError> {
        let window = self.settings(owner)?.label_expiring_window_days;
        let mut out = Vec::new();
        for label in self.all_labels(owner)? {
            let view = Self::view_with_window(label, window)?;
            if view.status == want {
                out.push(view);
            }
        }
        Ok(out)
    }

    /// Every label for an account, unpaged. The expiry monitor scans this.
    pub fn all_labels(&self, owner: &OwnerId) -> Result<Vec<Label>, ServiceError> {
        let rows = self.sql.query(
            "SELECT data FROM labels WHERE owner_id = ?1 ORDER BY expiry_date",
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

    /// Accounts that have labels of either kind. Drives the monitor scan.
    pub fn owners(&self) -> Result<Vec<OwnerId>, ServiceError> {
        let mut owners = docstore::owners(self.sql.as_ref(), "labels")?;
        for o in docstore::owners(self.sql.as_ref(), "sanitary_labels")? {
            if !owners.contains(&o) {
                owners.push(o);
            }
        }
        Ok(owners)
    }

    fn persist_label(&self, owner: &OwnerId, id: &str, record: &Label) -> Result<(), ServiceError> {
        docstore::update(self.sql.as_ref(), "labels", owner, id, record, &[
            ("production_id", match record.production_id.clone() {
                Some(p) => Value::Text(p),
                None => Value::Null,
            }),
            ("printed", Value::Integer(record.printed as i64)),
            ("expiry_date", Value::Text(record.expiry_date.clone())),
            ("updated_at", Value::Text(record.updated_at.clone().unwrap_or_default())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil;
    use chrono::Duration;

    pub(crate) fn day_offset(days: i64) -> String {
        (Utc::now().date_naive() + Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    pub(crate) fn input(product: &str, expiry_in_days: i64) -> CreateLabelInput {
        CreateLabelInput {
            product_name: product.into(),
            batch_code: "B-001".into(),
            production_id: None,
            production_date: day_offset(-1),
            expiry_date: day_offset(expiry_in_days),
            quantity: 1,
        }
    }

    #[test]
    fn bad_dates_rejected() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");

        let mut bad = input("A", 10);
        bad.expiry_date = "junk".into();
        assert!(matches!(
            svc.create_label(&owner, bad),
            Err(ServiceError::Validation(_))
        ));

        let mut inverted = input("A", 10);
        inverted.production_date = day_offset(5);
        inverted.expiry_date = day_offset(2);
        assert!(svc.create_label(&owner, inverted).is_err());
    }

    #[test]
    fn status_is_derived_not_stored() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");
        let label = svc.create_label(&owner, input("A", 3)).unwrap();

        // The stored document has no status field at all.
        let json = serde_json::to_value(&label).unwrap();
        assert!(json.get("status").is_none());

        let view = svc.label_view(&owner, label).unwrap();
        assert_eq!(view.status, ExpiryStatus::Expiring);
    }

    #[test]
    fn expiring_and_expired_queries() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");

        // The create path only rejects expiry before production, so an
        // already-expired label just needs both dates in the past.
        let mut past = input("Old", -2);
        past.production_date = day_offset(-30);
        svc.create_label(&owner, past).unwrap();
        svc.create_label(&owner, input("Soon", 3)).unwrap();
        svc.create_label(&owner, input("Fine", 60)).unwrap();

        let expiring = svc.expiring_labels(&owner).unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].label.product_name, "Soon");

        let expired = svc.expired_labels(&owner).unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].label.product_name, "Old");
    }

    #[test]
    fn mark_printed_flips_flag() {
        let (svc, _dir) = testutil::service();
        let owner = OwnerId::from("acct1");
        let label = svc.create_label(&owner, input("A", 30)).unwrap();
        assert!(!label.printed);

        let printed = svc.mark_label_printed(&owner, &label.id).unwrap();
        assert!(printed.printed);

        let only_printed = svc
            .list_labels(&owner, &ListParams::default(), &LabelFilters {
                production_id: None,
                printed: Some(true),
            })
            .unwrap();
        assert_eq!(only_printed.total, 1);
    }
}
