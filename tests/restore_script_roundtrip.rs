mod common;

use std::os::unix::fs::PermissionsExt;
use std::process::Command;

use common::TestEmitter;
use packyard::logging::JsonlSink;
use packyard::types::ApplyMode;
use packyard::Packyard;

/// Stage a live file, clobber it (a deployment gone wrong), then run the
/// generated restore script: the original bytes and mode come back.
#[test]
fn generated_restore_script_reproduces_original_file() {
    let td = tempfile::tempdir().unwrap();
    let workdir = td.path().join("job1");
    std::fs::create_dir_all(workdir.join("etc/app")).unwrap();
    let live = workdir.join("etc/app/secrets.env");
    std::fs::write(&live, b"token=hunter2\n").unwrap();
    std::fs::set_permissions(&live, std::fs::Permissions::from_mode(0o600)).unwrap();

    let api = Packyard::new(TestEmitter::default(), JsonlSink::default());
    let entries = api
        .parse_manifest("target etc/app\nsecrets.env\n", &workdir)
        .unwrap();
    let plan = api.plan(&entries, &workdir);
    assert!(api.apply(&plan, ApplyMode::Commit).unwrap().ok());

    // Simulate the deployment overwriting the live file
    std::fs::write(&live, b"token=CHANGED\n").unwrap();
    std::fs::set_permissions(&live, std::fs::Permissions::from_mode(0o644)).unwrap();

    // Relative canonical paths resolve against the working directory, so
    // run the script from there, exactly as an operator would.
    let status = Command::new("sh")
        .arg(workdir.join("restore.sh"))
        .current_dir(&workdir)
        .status()
        .unwrap();
    assert!(status.success());

    assert_eq!(std::fs::read(&live).unwrap(), b"token=hunter2\n");
    assert_eq!(
        std::fs::metadata(&live).unwrap().permissions().mode() & 0o7777,
        0o600
    );
}
