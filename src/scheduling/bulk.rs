use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;

use crate::models::TimeOffRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletePartition {
    pub eligible: Vec<i32>,
    pub ineligible: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BulkRejection {
    #[error("{count} selected {} not pending and cannot be deleted", request_phrase(.count))]
    Ineligible { count: usize },

    #[error("No pending requests selected")]
    NothingEligible,
}

fn request_phrase(count: &usize) -> &'static str {
    noun(*count, "request is", "requests are")
}

fn noun(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Splits a selection into deletable (pending) and non-deletable ids, keeping
/// selection order. Ids missing from the collection are non-deletable.
pub fn partition_for_delete(selected: &[i32], requests: &[TimeOffRequest]) -> DeletePartition {
    let mut seen = HashSet::new();
    let mut partition = DeletePartition::default();

    for id in selected.iter().copied().filter(|id| seen.insert(*id)) {
        match requests.iter().find(|r| r.id == id) {
            Some(request) if request.is_pending() => partition.eligible.push(id),
            _ => partition.ineligible.push(id),
        }
    }

    partition
}

/// Ids to delete, or why nothing will be deleted.
pub fn plan_delete(selected: &[i32], requests: &[TimeOffRequest]) -> Result<Vec<i32>, BulkRejection> {
    let partition = partition_for_delete(selected, requests);

    if !partition.ineligible.is_empty() {
        return Err(BulkRejection::Ineligible {
            count: partition.ineligible.len(),
        });
    }
    if partition.eligible.is_empty() {
        return Err(BulkRejection::NothingEligible);
    }

    Ok(partition.eligible)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub success_count: usize,
    pub error_count: usize,
    pub deleted_ids: Vec<i32>,
    pub failed_ids: Vec<i32>,
}

impl BulkOutcome {
    pub fn message(&self) -> String {
        match (self.success_count, self.error_count) {
            (s, 0) => format!("Deleted {} {}", s, noun(s, "request", "requests")),
            (0, e) => format!("Failed to delete {} {}", e, noun(e, "request", "requests")),
            (s, e) => format!(
                "Deleted {} {}; {} failed",
                s,
                noun(s, "request", "requests"),
                e
            ),
        }
    }
}

/// Runs `op` for each id one at a time, in order. A failure is counted and
/// the run moves on to the next id.
pub async fn run_sequential<F, Fut, E>(ids: Vec<i32>, mut op: F) -> BulkOutcome
where
    F: FnMut(i32) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut outcome = BulkOutcome::default();

    for id in ids {
        match op(id).await {
            Ok(()) => {
                outcome.success_count += 1;
                outcome.deleted_ids.push(id);
                metrics::counter!("bulk_delete_items_total", "outcome" => "success").increment(1);
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Bulk item failed, continuing");
                outcome.error_count += 1;
                outcome.failed_ids.push(id);
                metrics::counter!("bulk_delete_items_total", "outcome" => "error").increment(1);
            }
        }
    }

    tracing::info!(
        success = outcome.success_count,
        errors = outcome.error_count,
        "Bulk run finished"
    );

    outcome
}
