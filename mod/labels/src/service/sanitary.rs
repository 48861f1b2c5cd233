use chrono::Utc;

use pawmill_core::{
    docstore, new_id, now_rfc3339, parse_rfc3339, ListParams, ListResult, OwnerId, ServiceError,
};
use pawmill_sql::Value;

use crate::expiry::{classify_datetime, ExpiryStatus};
use crate::model::{SanitaryLabel, SanitaryLabelView};
use super::LabelsService;

pub struct CreateSanitaryLabelInput {
    pub product_name: String,
    pub batch_code: Option<String>,
    pub prepared_at: String,
    pub expiry_at: String,
    pub responsible: String,
}

impl LabelsService {
    pub fn create_sanitary_label(
        &self,
        owner: &OwnerId,
        input: CreateSanitaryLabelInput,
    ) -> Result<SanitaryLabel, ServiceError> {
        if input.product_name.trim().is_empty() {
            return Err(ServiceError::Validation("product name is required".into()));
        }
        if input.responsible.trim().is_empty() {
            return Err(ServiceError::Validation("responsible is required".into()));
        }
        let prepared = parse_rfc3339(&input.prepared_at)
            .ok_or_else(|| ServiceError::Validation("preparedAt must be RFC 3339".into()))?;
        let expiry = parse_rfc3339(&input.expiry_at)
            .ok_or_else(|| ServiceError::Validation("expiryAt must be RFC 3339".into()))?;
        if expiry < prepared {
            return Err(ServiceError::Validation("expiryAt is before preparedAt".into()));
        }

        let id = new_id();
        let now = now_rfc3339();
        let record = SanitaryLabel {
            id: id.clone(),
            product_name: input.product_name,
            batch_code: input.batch_code,
            prepared_at: input.prepared_at,
            expiry_at: input.expiry_at.clone(),
            printed: false,
            responsible: input.responsible,
            created_at: Some(now.clone()),
            updated_at: Some(now.clone()),
        };

        docstore::insert(self.sql.as_ref(), "sanitary_labels", owner, &id, &record, &[
            ("printed", Value::Integer(0)),
            ("expiry_at", Value::Text(input.expiry_at)),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_sanitary_label(&self, owner: &OwnerId, id: &str) -> Result<SanitaryLabel, ServiceError> {
        docstore::get(self.sql.as_ref(), "sanitary_labels", owner, id)
    }

    pub fn list_sanitary_labels(
        &self,
        owner: &OwnerId,
        params: &ListParams,
    ) -> Result<ListResult<SanitaryLabel>, ServiceError> {
        let limit = params.limit.min(500);
        docstore::list(
            self.sql.as_ref(),
            "sanitary_labels",
            owner,
            &[],
            "created_at",
            limit,
            params.offset,
        )
    }

    pub fn update_sanitary_label(
        &self,
        owner: &OwnerId,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<SanitaryLabel, ServiceError> {
        let current: SanitaryLabel = docstore::get(self.sql.as_ref(), "sanitary_labels", owner, id)?;
        let updated: SanitaryLabel = docstore::apply_patch(&current, patch)?;
        if parse_rfc3339(&updated.expiry_at).is_none() || parse_rfc3339(&updated.prepared_at).is_none()
        {
            return Err(ServiceError::Validation("timestamps must be RFC 3339".into()));
        }

        self.persist_sanitary(owner, id, &updated)?;
        Ok(updated)
    }

    pub fn delete_sanitary_label(&self, owner: &OwnerId, id: &str) -> Result<(), ServiceError> {
        docstore::delete(self.sql.as_ref(), "sanitary_labels", owner, id)
    }

    pub fn mark_sanitary_printed(&self, owner: &OwnerId, id: &str) -> Result<SanitaryLabel, ServiceError> {
        let mut label: SanitaryLabel = docstore::get(self.sql.as_ref(), "sanitary_labels", owner, id)?;
        label.printed = true;
        label.updated_at = Some(now_rfc3339());
        self.persist_sanitary(owner, id, &label)?;
        Ok(label)
    }

    /// Attach derived status and remaining hours, hour-granular.
    pub fn sanitary_view(
        &self,
        owner: &OwnerId,
        label: SanitaryLabel,
    ) -> Result<SanitaryLabelView, ServiceError> {
        let window = self.settings(owner)?.sanitary_expiring_window_hours;
        Self::sanitary_view_with_window(label, window)
    }

    pub(crate) fn sanitary_view_with_window(
        label: SanitaryLabel,
        window_hours: i64,
    ) -> Result<SanitaryLabelView, ServiceError> {
        let expiry = parse_rfc3339(&label.expiry_at).ok_or_else(|| {
            ServiceError::Internal(format!("sanitary label {} has a bad expiry", label.id))
        })?;
        let now = Utc::now();
        let status = classify_datetime(expiry, now, window_hours);
        Ok(SanitaryLabelView {
            status,
            hours_until_expiry: (expiry - now).num_hours(),
            label,
        })
    }

    /// Sanitary labels inside the warning window (not yet expired).
    pub fn expiring_sanitary(&self, owner: &OwnerId) -> Result<Vec<SanitaryLabelView>, ServiceError> {
        self.classified_sanitary(owner, ExpiryStatus::Expiring)
    }

    /// Sanitary labels past their expiry instant.
    pub fn expired_sanitary(&self, owner: &OwnerId) -> Result<Vec<SanitaryLabelView>, ServiceError> {
        self.classified_sanitary(owner, ExpiryStatus::Expired)
    }

    fn classified_sanitary(
        &self,
        owner: &OwnerId,
        want: ExpiryStatus,
    ) -> Result<Vec<SanitaryLabelView>, ServiceError> {
        let window = self.settings(owner)?.sanitary_expiring_window_hours;
        let mut out = Vec::new();
        for label in self.all_sanitary_labels(owner)? {
            let view = Self::sanitary_view_with_window(label, window)?;
            if view.status == want {
                out.push(view);
            }
        }
        Ok(out)
    }

    /// Every sanitary label for an account, unpaged. The expiry monitor
    /// scans this.
    pub fn all_sanitary_labels(&self, owner: &OwnerId) -> Result<Vec<SanitaryLabel>, ServiceError> {
        let rows = self.sql.query(
            "SELECT data FROM sanitary_labels WHERE owner_id = ?1 ORDER BY expiry_at",
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

    fn persist_sanitary(
        &self,
        owner: &OwnerId,
        id: &str,
        record: &SanitaryLabel,
    ) -> Result<(), ServiceError> {
        docstore::update(self.sql.as_ref(), "sanitary_labels", owner, id, record, &[
            ("printed", Value::Integer(record.printed as i64)),
            ("expiry_at", Value::Text(record.expiry_at.clone())),
            ("updated_at", Value::Text(record.updated_at.clone().unwrap_or_default())),
        ])
    }
}
