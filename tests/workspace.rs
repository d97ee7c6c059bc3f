mod common;

use common::{is_empty_dir, scratch_dir};
use polyexec::workspace::Workspace;

use std::fs;

use anyhow::Result;

#[test]
fn stage_writes_source() -> Result<()> {
    common::init();
    let root = scratch_dir("ws_stage");

    let ws = Workspace::stage(&root, "main.c", "int main() { return 0; }\n")?;
    assert!(ws.dir().starts_with(&root));
    assert_eq!(ws.source_path(), ws.dir().join("main.c"));
    assert_eq!(fs::read_to_string(ws.source_path())?, "int main() { return 0; }\n");

    let stdin = ws.put("stdin.txt", "John\n25\n")?;
    assert_eq!(fs::read_to_string(stdin)?, "John\n25\n");
    assert_eq!(ws.artifact_path("main"), ws.dir().join("main"));

    drop(ws);
    assert!(is_empty_dir(&root));
    Ok(())
}

#[test]
fn concurrent_workspaces_are_distinct() -> Result<()> {
    common::init();
    let root = scratch_dir("ws_distinct");

    let a = Workspace::stage(&root, "Main.java", "public class Main {}")?;
    let b = Workspace::stage(&root, "Main.java", "public class Main {}")?;
    assert_ne!(a.dir(), b.dir());

    drop(a);
    assert!(b.source_path().exists());
    drop(b);
    assert!(is_empty_dir(&root));
    Ok(())
}

#[test]
fn drop_tolerates_missing_dir() -> Result<()> {
    common::init();
    let root = scratch_dir("ws_missing");

    let ws = Workspace::stage(&root, "main.py", "print(1)\n")?;
    fs::remove_dir_all(ws.dir())?;
    drop(ws);
    assert!(is_empty_dir(&root));
    Ok(())
}

#[test]
fn stage_fails_on_missing_root() {
    common::init();
    let root = scratch_dir("ws_no_root").join("absent");
    let err = Workspace::stage(&root, "main.c", "x").unwrap_err();
    assert!(format!("{:#}", err).contains("failed to create workspace"));
}
