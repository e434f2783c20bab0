mod common;

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use common::TestEmitter;
use packyard::fs::sidecar::read_sidecar;
use packyard::logging::JsonlSink;
use packyard::types::{ApplyMode, Action};
use packyard::Packyard;

const MANIFEST: &str = "target etc/app\nnew 0644 root root config.yml\nsecrets.env\n";

fn setup(workdir: &Path) {
    std::fs::create_dir_all(workdir.join("etc/app")).unwrap();
    let live = workdir.join("etc/app/secrets.env");
    std::fs::write(&live, b"token=hunter2\n").unwrap();
    std::fs::set_permissions(&live, std::fs::Permissions::from_mode(0o600)).unwrap();
}

#[test]
fn commit_stages_both_trees_and_writes_scripts() {
    let td = tempfile::tempdir().unwrap();
    let workdir = td.path().join("job1");
    setup(&workdir);

    let api = Packyard::new(TestEmitter::default(), JsonlSink::default());
    let entries = api.parse_manifest(MANIFEST, &workdir).unwrap();
    assert_eq!(entries.len(), 2);

    let plan = api.plan(&entries, &workdir);
    // 2 top-level trees + 2 subdir creates + 2 staging + 3 scripts
    assert_eq!(plan.actions.len(), 9);

    let report = api.apply(&plan, ApplyMode::Commit).unwrap();
    assert!(report.ok(), "errors: {:?}", report.errors);
    assert_eq!(report.executed.len(), 9);

    // Existing file staged into both trees, bytes and mode intact
    let staged = workdir.join("restore/etc__app/secrets.env");
    assert_eq!(std::fs::read(&staged).unwrap(), b"token=hunter2\n");
    assert_eq!(
        std::fs::metadata(&staged).unwrap().permissions().mode() & 0o7777,
        0o600
    );
    assert!(workdir.join("deploy/etc__app/secrets.env").is_file());

    // New file: placeholder under deploy/ only
    let placeholder = workdir.join("deploy/etc__app/config.yml");
    assert_eq!(std::fs::metadata(&placeholder).unwrap().len(), 0);
    assert!(!workdir.join("restore/etc__app/config.yml").exists());

    // Three executable scripts
    for name in ["restore.sh", "deploy.sh", "diff.sh"] {
        let md = std::fs::metadata(workdir.join(name)).unwrap();
        assert_eq!(md.permissions().mode() & 0o111, 0o111, "{name} executable");
    }

    // Deploy script: parent creation for the new file, plain copy plus the
    // permission triple for the existing one
    let deploy = std::fs::read_to_string(workdir.join("deploy.sh")).unwrap();
    assert!(deploy.contains("mkdir -p 'etc/app'"));
    assert!(deploy.contains("chmod 0644 'etc/app/config.yml'"));
    assert!(deploy.contains("chmod 0600 'etc/app/secrets.env'"));
    assert!(deploy.contains("chown"));
    assert!(deploy.contains("chgrp"));

    // Sidecar records both entries; the staged payload is hashed
    let sc = read_sidecar(&workdir).unwrap();
    assert_eq!(sc.entries.len(), 2);
    let existing = sc.entries.iter().find(|e| !e.new).unwrap();
    assert_eq!(existing.staged_as, "etc__app/secrets.env");
    assert!(existing.payload_hash.is_some());
    let newly = sc.entries.iter().find(|e| e.new).unwrap();
    assert_eq!(newly.mode, "0644");
    assert_eq!(newly.owner, "root");
}

#[test]
fn plan_orders_directories_staging_then_scripts() {
    let td = tempfile::tempdir().unwrap();
    let workdir = td.path().join("job1");
    setup(&workdir);

    let api = Packyard::new(TestEmitter::default(), JsonlSink::default());
    let entries = api.parse_manifest(MANIFEST, &workdir).unwrap();
    let plan = api.plan(&entries, &workdir);

    let kinds: Vec<u8> = plan
        .actions
        .iter()
        .map(|a| match a {
            Action::CreateDirectory { .. } => 0,
            Action::StageNewFile { .. } | Action::StageExistingFile { .. } => 1,
            Action::GenerateScript { .. } => 2,
        })
        .collect();
    let mut sorted = kinds.clone();
    sorted.sort_unstable();
    assert_eq!(kinds, sorted, "directories, then staging, then scripts");
    assert_eq!(kinds.iter().filter(|k| **k == 0).count(), 4);
    assert_eq!(kinds.iter().filter(|k| **k == 1).count(), 2);
    assert_eq!(kinds.iter().filter(|k| **k == 2).count(), 3);
}

#[test]
fn subdir_creation_is_deduplicated_in_first_seen_order() {
    let td = tempfile::tempdir().unwrap();
    let workdir = td.path().join("job1");
    std::fs::create_dir_all(&workdir).unwrap();

    let manifest = "target etc/app\nnew 0644 root root a\nnew 0644 root root b\ntarget var/lib\nnew 0600 app app c\n";
    let api = Packyard::new(TestEmitter::default(), JsonlSink::default());
    let entries = api.parse_manifest(manifest, &workdir).unwrap();
    let plan = api.plan(&entries, &workdir);

    let dirs: Vec<String> = plan
        .actions
        .iter()
        .filter_map(|a| match a {
            Action::CreateDirectory { path } => {
                Some(path.strip_prefix(&workdir).unwrap().display().to_string())
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        dirs,
        vec![
            "restore",
            "deploy",
            "restore/etc__app",
            "deploy/etc__app",
            "restore/var__lib",
            "deploy/var__lib",
        ]
    );
}

#[test]
fn reapply_refuses_to_restage_but_directories_stay_idempotent() {
    let td = tempfile::tempdir().unwrap();
    let workdir = td.path().join("job1");
    setup(&workdir);

    let api = Packyard::new(TestEmitter::default(), JsonlSink::default());
    let entries = api.parse_manifest(MANIFEST, &workdir).unwrap();
    let plan = api.plan(&entries, &workdir);
    assert!(api.apply(&plan, ApplyMode::Commit).unwrap().ok());

    // Directory creation is a no-op the second time; the first staging
    // action then surfaces the occupied destination.
    let report = api.apply(&plan, ApplyMode::Commit).unwrap();
    assert!(!report.ok());
    assert!(report.errors[0].contains("already occupied"), "{:?}", report.errors);
    // The directory prefix of the plan completed before the refusal
    assert_eq!(report.executed.len(), 4);
}
