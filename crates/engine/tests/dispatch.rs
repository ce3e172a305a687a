//! Dispatcher behavior over a fabricated repository layout
//!
//! These tests exercise ordering, short-circuiting, stdin forwarding and
//! environment assembly without needing the git binary: the dispatcher
//! only cares about the hooks directory layout.

#![allow(clippy::unwrap_used)]

use shipit_core::Error;
use shipit_engine::{BareRepository, Dispatcher, SubhookRegistry};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

fn fake_repo(home: &Path) -> BareRepository {
    let repo_dir = home.join("demo.git");
    fs::create_dir_all(repo_dir.join("hooks/post-receive.d")).unwrap();
    BareRepository::from_path(&repo_dir).unwrap()
}

fn install_entry(repo: &BareRepository, name: &str, body: &str, mode: u32) {
    let path = repo.hooks_dir().join("post-receive.d").join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
}

fn appender_script(tag: &str, log: &Path) -> String {
    format!("#!/bin/sh\necho {tag} >> \"{}\"\n", log.display())
}

#[test]
fn runs_subhooks_in_filename_order_not_registration_order() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = fake_repo(tmp.path());
    let log = tmp.path().join("order.log");

    // Register deliberately out of order; the registry copy path is the
    // same one `add-subhook` uses.
    let registry = SubhookRegistry::for_repository(&repo);
    for tag in ["c", "a", "b"] {
        let src = tmp.path().join(format!("{tag}.sh"));
        fs::write(&src, appender_script(tag, &log)).unwrap();
        registry.add(&src, Some(format!("{tag}0-{tag}.sh").as_str())).unwrap();
    }

    let code = Dispatcher::new(&repo, false).run("1 2 refs/heads/master\n").unwrap();

    assert_eq!(code, 0);
    assert_eq!(fs::read_to_string(&log).unwrap(), "a\nb\nc\n");
}

#[test]
fn stops_at_first_failure_and_returns_its_exit_code() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = fake_repo(tmp.path());
    let log = tmp.path().join("order.log");

    install_entry(&repo, "10-a.sh", &appender_script("a", &log), 0o755);
    install_entry(
        &repo,
        "20-b.sh",
        &format!("#!/bin/sh\necho b >> \"{}\"\nexit 7\n", log.display()),
        0o755,
    );
    install_entry(&repo, "30-c.sh", &appender_script("c", &log), 0o755);

    let code = Dispatcher::new(&repo, false).run("1 2 refs/heads/master\n").unwrap();

    assert_eq!(code, 7);
    assert_eq!(fs::read_to_string(&log).unwrap(), "a\nb\n");
}

#[test]
fn forwards_push_metadata_unchanged_on_stdin() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = fake_repo(tmp.path());
    let captured = tmp.path().join("stdin.txt");

    install_entry(
        &repo,
        "10-capture.sh",
        &format!("#!/bin/sh\ncat > \"{}\"\n", captured.display()),
        0o755,
    );

    let input = "aaa bbb refs/heads/master\nccc ddd refs/tags/v1\n";
    let code = Dispatcher::new(&repo, false).run(input).unwrap();

    assert_eq!(code, 0);
    assert_eq!(fs::read_to_string(&captured).unwrap(), input);
}

#[test]
fn exports_repo_path_and_variable_file_values() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = fake_repo(tmp.path());
    let env_dump = tmp.path().join("env.txt");

    install_entry(
        &repo,
        "10-vars.source.sh",
        "#!/usr/bin/env bash\n\nexport WORK_DIR=/srv/deploy/demo\n",
        0o755,
    );
    install_entry(
        &repo,
        "20-dump.sh",
        &format!(
            "#!/bin/sh\nprintf '%s\\n%s\\n' \"$SHIPIT_REPO_PATH\" \"$WORK_DIR\" > \"{}\"\n",
            env_dump.display()
        ),
        0o755,
    );

    let code = Dispatcher::new(&repo, false).run("1 2 refs/heads/master\n").unwrap();
    assert_eq!(code, 0);

    let dump = fs::read_to_string(&env_dump).unwrap();
    let mut lines = dump.lines();
    assert_eq!(
        Path::new(lines.next().unwrap()),
        fs::canonicalize(repo.path()).unwrap()
    );
    assert_eq!(lines.next().unwrap(), "/srv/deploy/demo");
}

#[test]
fn variable_files_are_parsed_not_executed() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = fake_repo(tmp.path());
    let log = tmp.path().join("order.log");

    // If this file were executed it would leave a marker in the log.
    install_entry(
        &repo,
        "10-vars.source.sh",
        &format!("#!/bin/sh\necho polluted >> \"{}\"\nX=1\n", log.display()),
        0o755,
    );
    install_entry(&repo, "20-a.sh", &appender_script("a", &log), 0o755);

    let code = Dispatcher::new(&repo, false).run("1 2 refs/heads/master\n").unwrap();

    assert_eq!(code, 0);
    assert_eq!(fs::read_to_string(&log).unwrap(), "a\n");
}

#[test]
fn empty_registry_succeeds_with_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = fake_repo(tmp.path());

    let code = Dispatcher::new(&repo, false).run("1 2 refs/heads/master\n").unwrap();
    assert_eq!(code, 0);
}

#[test]
fn non_executable_subhook_is_a_configuration_error() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = fake_repo(tmp.path());
    install_entry(&repo, "10-a.sh", "#!/bin/sh\n", 0o644);

    let err = Dispatcher::new(&repo, false)
        .run("1 2 refs/heads/master\n")
        .unwrap_err();
    assert!(matches!(err, Error::SubhookNotExecutable { .. }), "got {err:?}");
}

#[test]
fn directory_entry_is_a_configuration_error() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = fake_repo(tmp.path());
    fs::create_dir(repo.hooks_dir().join("post-receive.d/10-subdir")).unwrap();

    let err = Dispatcher::new(&repo, false)
        .run("1 2 refs/heads/master\n")
        .unwrap_err();
    assert!(matches!(err, Error::SubhookNotExecutable { .. }));
}

#[test]
fn debug_mode_sets_flag_without_changing_exit_semantics() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = fake_repo(tmp.path());
    let flag_dump = tmp.path().join("flag.txt");

    install_entry(
        &repo,
        "10-flag.sh",
        &format!(
            "#!/bin/sh\nprintf '%s' \"$SHIPIT_HOOK_DEBUG\" > \"{}\"\nexit 5\n",
            flag_dump.display()
        ),
        0o755,
    );

    let code = Dispatcher::new(&repo, true).run("1 2 refs/heads/master\n").unwrap();

    assert_eq!(code, 5);
    assert_eq!(fs::read_to_string(&flag_dump).unwrap(), "1");
}
