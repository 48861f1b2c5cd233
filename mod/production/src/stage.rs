//! Production lifecycle stage resolver.
//!
//! A pure classification over a production's fields: no stored state, the
//! same record always resolves to the same view. The workflow has three
//! stages; which one is current is inferred from the status and the
//! workflow timestamps, first match wins.

use serde::Serialize;

use crate::model::{Production, ProductionStatus};

/// The three workflow stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Thawing,
    ProductionWeighing,
    AnalysisFinalization,
}

impl Stage {
    pub const ALL: [Stage; 3] = [
        Stage::Thawing,
        Stage::ProductionWeighing,
        Stage::AnalysisFinalization,
    ];
}

/// Resolved stage state: the current stage and the stages already done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageView {
    pub current: Stage,
    pub completed: Vec<Stage>,
}

/// Classify a production into its stage view. Priority order, first match
/// wins:
///
/// 1. finished → all stages completed;
/// 2. dehydrator exit recorded → stage 3 current;
/// 3. dehydrator entry recorded → stage 2 current;
/// 4. thaw time recorded → stage 2 current while the run is still open;
///    once in progress, a thaw time alone carries no completion signal and
///    stage 1 stays current;
/// 5. nothing recorded → stage 1 current.
pub fn resolve(production: &Production) -> StageView {
    if production.status == ProductionStatus::Finished {
        return StageView {
            current: Stage::AnalysisFinalization,
            completed: Stage::ALL.to_vec(),
        };
    }
    if production.dehydrator_exit_time.is_some() {
        return StageView {
            current: Stage::AnalysisFinalization,
            completed: vec![Stage::Thawing, Stage::ProductionWeighing],
        };
    }
    if production.dehydrator_entry_time.is_some() {
        return StageView {
            current: Stage::ProductionWeighing,
            completed: vec![Stage::Thawing],
        };
    }
    if production.thaw_time.is_some() && production.status == ProductionStatus::Open {
        return StageView {
            current: Stage::ProductionWeighing,
            completed: vec![Stage::Thawing],
        };
    }
    StageView {
        current: Stage::Thawing,
        completed: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production(status: ProductionStatus) -> Production {
        Production {
            id: "p1".into(),
            batch_code: "B-1".into(),
            product_id: None,
            protein: None,
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
            status,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn finished_completes_all_stages() {
        // Even with no timestamps recorded at all.
        let view = resolve(&production(ProductionStatus::Finished));
        assert_eq!(view.current, Stage::AnalysisFinalization);
        assert_eq!(view.completed, Stage::ALL.to_vec());
    }

    #[test]
    fn no_timestamps_means_stage_one_regardless_of_status() {
        for status in [ProductionStatus::Open, ProductionStatus::InProgress] {
            let view = resolve(&production(status));
            assert_eq!(view.current, Stage::Thawing);
            assert!(view.completed.is_empty());
        }
    }

    #[test]
    fn dehydrator_exit_puts_finalization_current() {
        let mut p = production(ProductionStatus::InProgress);
        p.thaw_time = Some("2025-03-01T08:00:00+00:00".into());
        p.dehydrator_entry_time = Some("2025-03-01T10:00:00+00:00".into());
        p.dehydrator_exit_time = Some("2025-03-02T06:00:00+00:00".into());

        let view = resolve(&p);
        assert_eq!(view.current, Stage::AnalysisFinalization);
        assert_eq!(
            view.completed,
            vec![Stage::Thawing, Stage::ProductionWeighing]
        );
    }

    #[test]
    fn dehydrator_entry_puts_weighing_current() {
        let mut p = production(ProductionStatus::InProgress);
        p.thaw_time = Some("2025-03-01T08:00:00+00:00".into());
        p.dehydrator_entry_time = Some("2025-03-01T10:00:00+00:00".into());

        let view = resolve(&p);
        assert_eq!(view.current, Stage::ProductionWeighing);
        assert_eq!(view.completed, vec![Stage::Thawing]);
    }

    /// A thaw time advances an open run to stage 2; on an in-progress run
    /// it carries no completion signal and stage 1 stays current.
    #[test]
    fn thaw_time_only_advances_open_runs() {
        let mut open = production(ProductionStatus::Open);
        open.thaw_time = Some("2025-03-01T08:00:00+00:00".into());
        let view = resolve(&open);
        assert_eq!(view.current, Stage::ProductionWeighing);
        assert_eq!(view.completed, vec![Stage::Thawing]);

        let mut in_progress = production(ProductionStatus::InProgress);
        in_progress.thaw_time = Some("2025-03-01T08:00:00+00:00".into());
        let view = resolve(&in_progress);
        assert_eq!(view.current, Stage::Thawing);
        assert!(view.completed.is_empty());
    }

    #[test]
    fn finished_wins_over_timestamps() {
        let mut p = production(ProductionStatus::Finished);
        p.thaw_time = Some("2025-03-01T08:00:00+00:00".into());

        let view = resolve(&p);
        assert_eq!(view.completed.len(), 3);
    }
}
