use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use anyhow::Result;
use tempfile::tempdir;

fn simfs(home: &Path, args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_simfs"))
        .arg("--dir")
        .arg(home)
        .args(args)
        .env_remove("SIMFS_LOG")
        .output()?)
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_one_shot_commands_persist() -> Result<()> {
    let temp_dir = tempdir()?;
    let home = temp_dir.path();

    let out = simfs(home, &["mkdir", "/docs"])?;
    assert!(out.status.success());
    assert_eq!(stdout_of(&out), "ok\n");

    let out = simfs(home, &["write", "/docs/note.txt", "two words"])?;
    assert!(out.status.success());

    let out = simfs(home, &["cat", "/docs/note.txt"])?;
    assert_eq!(stdout_of(&out), "two words\n");

    let out = simfs(home, &["ls", "/docs"])?;
    assert_eq!(stdout_of(&out), "note.txt\n");

    assert!(home.join("fs.img").exists());
    assert!(home.join("fs.journal").exists());
    Ok(())
}

#[test]
fn test_failed_command_sets_exit_status() -> Result<()> {
    let temp_dir = tempdir()?;
    let out = simfs(temp_dir.path(), &["rmdir", "/nothing"])?;
    assert!(!out.status.success());
    assert_eq!(stdout_of(&out), "ERROR: Path not found: /nothing\n");
    Ok(())
}

#[test]
fn test_script_on_stdin() -> Result<()> {
    let temp_dir = tempdir()?;
    let mut child = Command::new(env!("CARGO_BIN_EXE_simfs"))
        .arg("--dir")
        .arg(temp_dir.path())
        .env_remove("SIMFS_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(b"mkdir /a\ncp /a /b\nls\nexit\n")?;
    }
    let out = child.wait_with_output()?;
    assert!(out.status.success());
    assert_eq!(stdout_of(&out), "ok\nok\na\nb\n");
    Ok(())
}

#[test]
fn test_separate_journal_flag() -> Result<()> {
    let temp_dir = tempdir()?;
    let journal = temp_dir.path().join("logs").join("ops.journal");
    let journal_arg = journal.to_string_lossy().into_owned();

    let out = simfs(temp_dir.path(), &["--journal", &journal_arg, "touch", "/f"])?;
    assert!(out.status.success());
    assert!(journal.exists());
    assert!(!temp_dir.path().join("fs.journal").exists());
    Ok(())
}
