use std::path::Path;

use tokio::task::JoinSet;
use tracktime_core::Month;

use crate::ledger::{self, MinuteTotals, SyncKey};
use crate::{Enricher, SyncError};

/// Minutes to add to (or remove from) a task's spent time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeChange {
    pub key: SyncKey,
    pub minutes: i64,
}

/// The result of pushing one change.
#[derive(Debug)]
pub struct PushOutcome {
    pub change: TimeChange,
    pub result: Result<(), SyncError>,
}

/// Differences between what was tracked and what the ledger says was pushed.
///
/// Tasks that only appear in the ledger had their entries removed since the
/// last push and get a negative change.
pub fn pending_changes(tracked: &MinuteTotals, synced: &MinuteTotals) -> Vec<TimeChange> {
    let mut keys: Vec<&SyncKey> = tracked.keys().chain(synced.keys()).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter_map(|key| {
            let minutes = tracked.get(key).copied().unwrap_or_default()
                - synced.get(key).copied().unwrap_or_default();
            (minutes != 0).then(|| TimeChange {
                key: key.clone(),
                minutes,
            })
        })
        .collect()
}

/// Pushes the month's unsynced time and records what succeeded in the ledger.
///
/// Each service is pushed from its own task. A service that fails as a
/// whole is logged and its tasks stay pending for the next run.
pub async fn push_month(
    base_dir: &Path,
    month: Month,
    enricher: &Enricher,
) -> Result<Vec<PushOutcome>, SyncError> {
    let tracked = ledger::tracked_minutes(base_dir, month)?;
    let path = ledger::ledger_path(base_dir, month);
    let mut synced = ledger::read_ledger(&path)?;
    let changes = pending_changes(&tracked, &synced);
    tracing::debug!(%month, pending = changes.len(), "computed pending time changes");

    let mut tasks = JoinSet::new();
    for provider in enricher.providers() {
        let mine: Vec<TimeChange> = changes
            .iter()
            .filter(|change| provider.handles(&change.key.kind))
            .cloned()
            .collect();
        if mine.is_empty() {
            continue;
        }
        let provider = provider.clone();
        tasks.spawn(async move { (provider.name(), provider.push(mine).await) });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(pushed))) => outcomes.extend(pushed),
            Ok((provider, Err(err))) => {
                tracing::warn!(provider, error = %err, "push failed");
            }
            Err(err) => tracing::warn!(error = %err, "push task did not complete"),
        }
    }
    outcomes.sort_by(|a, b| a.change.key.cmp(&b.change.key));

    let mut changed = false;
    for outcome in outcomes.iter().filter(|outcome| outcome.result.is_ok()) {
        *synced.entry(outcome.change.key.clone()).or_default() += outcome.change.minutes;
        changed = true;
    }
    if changed {
        synced.retain(|_, minutes| *minutes != 0);
        ledger::write_ledger(&path, &synced)?;
    }

    Ok(outcomes)
}
