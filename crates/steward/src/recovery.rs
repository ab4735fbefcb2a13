//! Replay of journal records left pending by an interrupted run.

use diagnostics::*;
use oplog::JournalEntry;

use crate::operation::Operation;
use crate::steward::State;
use crate::{RecoveryResult, StewardError};

/// Replay every pending record in journal order.
///
/// A record that replays cleanly is snapshotted and marked committed. A
/// record that fails is logged and left pending; the remaining records
/// are still attempted. Only a failure to read the journal itself is
/// returned as an error.
pub(crate) fn recover(state: &mut State) -> Result<RecoveryResult, StewardError> {
    let pending = state.journal.pending_entries()?;
    let mut result = RecoveryResult {
        pending_count: pending.len(),
        ..Default::default()
    };
    if pending.is_empty() {
        debug!("no pending journal records");
        return Ok(result);
    }

    let count = pending.len();
    info!("replaying {count} pending journal records", count: count);

    for entry in &pending {
        let id = entry.id.as_str();
        let op = entry.op.as_str();
        match replay(state, entry) {
            Ok(()) => {
                result.recovered_count += 1;
                info!("replayed {op} {id}", op: op, id: id);
            }
            Err(e) => {
                result.failed_count += 1;
                let reason = e.to_string();
                warn!("replay of {op} {id} failed: {reason}", op: op, id: id, reason: reason);
            }
        }
    }

    let recovered = result.recovered_count;
    let failed = result.failed_count;
    info!(
        "recovery finished: {recovered} replayed, {failed} failed",
        recovered: recovered,
        failed: failed
    );
    Ok(result)
}

fn replay(state: &mut State, entry: &JournalEntry) -> Result<(), StewardError> {
    let op = Operation::from_entry(entry)?;
    op.apply(&mut state.root)?;
    state.snapshot()?;
    _ = state.journal.mark_committed(&entry.id)?;
    Ok(())
}
