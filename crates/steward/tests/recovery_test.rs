use std::fs;

use anyhow::Result;
use oplog::{Journal, OperationType, PARAM_CONTENT, PARAM_DST, PARAM_PATH, PARAM_SRC, params};
use steward::{EntryStatus, IMAGE_FILE, JOURNAL_FILE, Steward};
use tempfile::tempdir;

/// A pending WRITE left behind by a crash is applied on the next open
#[test]
fn test_crash_before_commit_is_replayed() -> Result<()> {
    let temp_dir = tempdir()?;
    let home = temp_dir.path();

    let journal = Journal::new(home.join(JOURNAL_FILE));
    let id = journal.append_pending(
        OperationType::Write,
        params([(PARAM_PATH, "/x.txt"), (PARAM_CONTENT, "hello")]),
    )?;

    let steward = Steward::open_in(home)?;
    assert_eq!(steward.read("/x.txt")?, "hello");

    let recovery = steward.last_recovery();
    assert_eq!(recovery.pending_count, 1);
    assert_eq!(recovery.recovered_count, 1);
    assert_eq!(recovery.failed_count, 0);

    // Replay commits the original record without adding new ones
    let entries = steward.journal_entries()?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, id);
    assert_eq!(entries[0].status, EntryStatus::Committed);
    Ok(())
}

#[test]
fn test_replay_runs_on_top_of_image() -> Result<()> {
    let temp_dir = tempdir()?;
    let home = temp_dir.path();

    {
        let steward = Steward::open_in(home)?;
        steward.mkdir("/data")?;
        steward.write("/data/a.txt", "a")?;
    }

    // Interrupted after the journal append, before the image was saved
    let journal = Journal::new(home.join(JOURNAL_FILE));
    _ = journal.append_pending(
        OperationType::Move,
        params([(PARAM_SRC, "/data/a.txt"), (PARAM_DST, "/data/b.txt")]),
    )?;
    _ = journal.append_pending(
        OperationType::Copy,
        params([(PARAM_SRC, "/data/b.txt"), (PARAM_DST, "/c.txt")]),
    )?;

    let steward = Steward::open_in(home)?;
    assert_eq!(steward.list("/data")?, vec!["b.txt"]);
    assert_eq!(steward.read("/c.txt")?, "a");
    assert_eq!(steward.last_recovery().recovered_count, 2);
    assert!(steward.pending_entries()?.is_empty());

    // The replayed state was snapshotted
    drop(steward);
    let steward = Steward::open_in(home)?;
    assert!(!steward.last_recovery().was_needed());
    assert_eq!(steward.read("/c.txt")?, "a");
    Ok(())
}

#[test]
fn test_failed_replay_is_skipped_and_stays_pending() -> Result<()> {
    let temp_dir = tempdir()?;
    let home = temp_dir.path();

    let journal = Journal::new(home.join(JOURNAL_FILE));
    let bad = journal.append_pending(
        OperationType::Rmdir,
        params([(PARAM_PATH, "/never-created")]),
    )?;
    let incomplete = journal.append_pending(OperationType::Write, params([(PARAM_PATH, "/y")]))?;
    _ = journal.append_pending(OperationType::Mkdir, params([(PARAM_PATH, "/ok")]))?;

    let steward = Steward::open_in(home)?;
    assert!(steward.exists("/ok")?);
    assert!(!steward.exists("/y")?);

    let recovery = steward.last_recovery();
    assert_eq!(recovery.pending_count, 3);
    assert_eq!(recovery.recovered_count, 1);
    assert_eq!(recovery.failed_count, 2);

    let still_pending: Vec<_> = steward
        .pending_entries()?
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(still_pending, vec![bad, incomplete]);
    Ok(())
}

#[test]
fn test_validation_failure_is_replayed_next_open() -> Result<()> {
    let temp_dir = tempdir()?;
    let home = temp_dir.path();

    {
        let steward = Steward::open_in(home)?;
        // Parent is missing, so the record stays pending
        assert!(steward.mkdir("/later/child").is_err());
        assert_eq!(steward.pending_entries()?.len(), 1);
    }

    // Once the parent exists the pending record succeeds on replay
    {
        let journal = Journal::new(home.join(JOURNAL_FILE));
        let all = journal.read_all()?;
        assert_eq!(all.len(), 1);
    }
    let steward = Steward::open_in(home)?;
    assert_eq!(steward.last_recovery().failed_count, 1);
    steward.mkdir("/later")?;
    drop(steward);

    let steward = Steward::open_in(home)?;
    assert_eq!(steward.last_recovery().recovered_count, 1);
    assert!(steward.exists("/later/child")?);
    Ok(())
}

#[test]
fn test_corrupt_image_starts_fresh_and_still_recovers() -> Result<()> {
    let temp_dir = tempdir()?;
    let home = temp_dir.path();

    {
        let steward = Steward::open_in(home)?;
        steward.mkdir("/lost")?;
    }
    fs::write(home.join(IMAGE_FILE), b"{ truncated")?;

    let journal = Journal::new(home.join(JOURNAL_FILE));
    _ = journal.append_pending(OperationType::Touch, params([(PARAM_PATH, "/fresh")]))?;

    let steward = Steward::open_in(home)?;
    assert_eq!(steward.list("/")?, vec!["fresh"]);
    Ok(())
}

#[test]
fn test_corrupt_journal_lines_do_not_block_open() -> Result<()> {
    let temp_dir = tempdir()?;
    let home = temp_dir.path();

    let journal_path = home.join(JOURNAL_FILE);
    let journal = Journal::new(&journal_path);
    _ = journal.append_pending(OperationType::Mkdir, params([(PARAM_PATH, "/one")]))?;
    let mut text = fs::read_to_string(&journal_path)?;
    text.push_str("this line is not a record\n");
    fs::write(&journal_path, text)?;
    _ = journal.append_pending(OperationType::Mkdir, params([(PARAM_PATH, "/two")]))?;

    let steward = Steward::open_in(home)?;
    assert_eq!(steward.list("/")?, vec!["one", "two"]);
    assert_eq!(steward.last_recovery().recovered_count, 2);

    // The unreadable line survives the commit rewrites
    assert!(fs::read_to_string(&journal_path)?.contains("this line is not a record"));
    Ok(())
}
