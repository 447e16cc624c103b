mod support;

use ide_ext_core::{ExtensionDeclaration, ExtensionError, ExtensionKind, RegisterOutcome};
use std::cell::Cell;
use std::rc::Rc;
use support::{call_log, calls, clear, extension, failing_extension, recording_manager};

#[test]
fn alone_general_extension_initializes_on_register() {
    let log = call_log();
    let mut manager = recording_manager(&log);

    let outcome = manager
        .register(
            "ext/tools/clock",
            extension(&log, "ext/tools/clock", ExtensionDeclaration::general().alone()),
            false,
        )
        .expect("register should succeed");

    assert_eq!(outcome, RegisterOutcome::Initialized);
    assert_eq!(calls(&log, "init:"), vec!["init:ext/tools/clock"]);
    let status = manager
        .extension_status("ext/tools/clock")
        .expect("status should exist");
    assert!(status.registered);
    assert!(status.inited);
    assert!(!status.enabled);
}

#[test]
fn registering_twice_keeps_first_instance_and_one_manifest_record() {
    let log = call_log();
    let second_log = call_log();
    let mut manager = recording_manager(&log);
    let declaration = ExtensionDeclaration::general()
        .alone()
        .with_name("Clock")
        .with_dev("core team");

    manager
        .register(
            "ext/tools/clock",
            extension(&log, "ext/tools/clock", declaration.clone()),
            false,
        )
        .expect("first register should succeed");
    let outcome = manager
        .register(
            "ext/tools/clock",
            extension(&second_log, "ext/tools/clock", declaration),
            false,
        )
        .expect("second register should succeed");

    assert_eq!(outcome, RegisterOutcome::AlreadyRegistered);
    assert_eq!(calls(&log, "init:").len(), 1);
    assert!(second_log.borrow().is_empty());

    let records = manager.manifest_records().expect("manifest should list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "ext/tools/clock");
    assert_eq!(records[0].name, "Clock");
    assert_eq!(records[0].dev, "core team");
    assert_eq!(records[0].kind, ExtensionKind::General);
    assert!(records[0].enabled);
}

#[test]
fn shared_general_extension_is_only_declared_without_force() {
    let log = call_log();
    let mut manager = recording_manager(&log);

    let outcome = manager
        .register(
            "ext/lib/keywords",
            extension(&log, "ext/lib/keywords", ExtensionDeclaration::general()),
            false,
        )
        .expect("declare should succeed");

    assert_eq!(outcome, RegisterOutcome::Declared);
    assert!(!manager.is_registered("ext/lib/keywords"));
    assert!(manager.registered_paths().is_empty());
    assert!(calls(&log, "init:").is_empty());
    assert_eq!(manager.manifest_records().expect("manifest should list").len(), 1);

    let forced = manager
        .register(
            "ext/lib/keywords",
            extension(&log, "ext/lib/keywords", ExtensionDeclaration::general()),
            true,
        )
        .expect("forced register should succeed");
    assert_eq!(forced, RegisterOutcome::Initialized);
    assert!(manager.is_registered("ext/lib/keywords"));
    assert_eq!(manager.manifest_records().expect("manifest should list").len(), 1);
}

#[test]
fn registering_dependent_initializes_dependency_first() {
    let log = call_log();
    let mut manager = recording_manager(&log);

    manager
        .register(
            "ext/lib/d",
            extension(&log, "ext/lib/d", ExtensionDeclaration::general()),
            false,
        )
        .expect("declare D");
    manager
        .register(
            "ext/app/c",
            extension(
                &log,
                "ext/app/c",
                ExtensionDeclaration::general()
                    .depends_on("ext/lib/d")
                    .with_markup("<div id=\"c\"/>"),
            ),
            true,
        )
        .expect("register C");

    assert_eq!(
        *log.borrow(),
        vec![
            "markup:<div id=\"c\"/>".to_string(),
            "init:ext/lib/d".to_string(),
            "init:ext/app/c".to_string(),
        ]
    );
    assert!(manager.is_registered("ext/lib/d"));
    assert_eq!(manager.used_by("ext/lib/d"), vec!["ext/app/c"]);
    assert_eq!(manager.registered_paths(), vec!["ext/app/c", "ext/lib/d"]);
}

#[test]
fn unknown_dependency_path_fails_registration() {
    let log = call_log();
    let mut manager = recording_manager(&log);

    let err = manager
        .register(
            "ext/app/c",
            extension(
                &log,
                "ext/app/c",
                ExtensionDeclaration::general().alone().depends_on("ext/lib/missing"),
            ),
            false,
        )
        .expect_err("unknown dependency must fail");

    assert_eq!(
        err,
        ExtensionError::MissingDependency {
            extension: "ext/app/c".to_string(),
            dependency: "ext/lib/missing".to_string(),
        }
    );
    let status = manager.extension_status("ext/app/c").expect("status should exist");
    assert!(status.registered);
    assert!(!status.inited);
}

#[test]
fn invalid_path_is_rejected_without_mutation() {
    let log = call_log();
    let mut manager = recording_manager(&log);

    for path in ["", "ext//code", "ext/co de", "/ext/code"] {
        let err = manager
            .register(
                path,
                extension(&log, path, ExtensionDeclaration::general().alone()),
                false,
            )
            .expect_err("invalid path must fail");
        assert_eq!(err.error_code(), "ext_invalid_path");
    }
    assert!(manager.manifest_records().expect("manifest should list").is_empty());
    assert!(log.borrow().is_empty());
}

#[test]
fn failed_init_leaves_registered_half_state_and_register_retries() {
    let log = call_log();
    let fail_init = Rc::new(Cell::new(true));
    let mut manager = recording_manager(&log);

    let err = manager
        .register(
            "ext/tools/flaky",
            failing_extension(
                &log,
                "ext/tools/flaky",
                ExtensionDeclaration::general().alone(),
                fail_init.clone(),
            ),
            false,
        )
        .expect_err("failing init must surface");
    assert_eq!(err.error_code(), "ext_init_failed");
    let status = manager
        .extension_status("ext/tools/flaky")
        .expect("status should exist");
    assert!(status.registered);
    assert!(!status.inited);

    fail_init.set(false);
    let outcome = manager
        .register(
            "ext/tools/flaky",
            extension(&log, "ext/tools/flaky", ExtensionDeclaration::general().alone()),
            false,
        )
        .expect("retry should succeed");
    assert_eq!(outcome, RegisterOutcome::Initialized);
    assert_eq!(calls(&log, "init:"), vec!["init:ext/tools/flaky"]);
    assert_eq!(manager.registered_paths(), vec!["ext/tools/flaky"]);
}

#[test]
fn unregister_with_registered_dependents_is_blocked() {
    let log = call_log();
    let mut manager = recording_manager(&log);
    manager
        .register(
            "ext/lib/d",
            extension(&log, "ext/lib/d", ExtensionDeclaration::general()),
            false,
        )
        .expect("declare D");
    manager
        .register(
            "ext/app/c",
            extension(
                &log,
                "ext/app/c",
                ExtensionDeclaration::general().alone().depends_on("ext/lib/d"),
            ),
            false,
        )
        .expect("register C");
    clear(&log);

    let err = manager
        .unregister("ext/lib/d", false)
        .expect_err("in-use dependency must not unregister");
    assert_eq!(
        err,
        ExtensionError::DependencyInUse {
            path: "ext/lib/d".to_string(),
            dependents: vec!["ext/app/c".to_string()],
        }
    );
    let alerts = calls(&log, "alert:");
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].starts_with("alert:Could not disable extension|"));
    assert!(alerts[0].contains(" - ext/app/c"));
    assert!(manager.is_registered("ext/lib/d"));
    assert!(calls(&log, "destroy:").is_empty());

    clear(&log);
    manager
        .unregister("ext/lib/d", true)
        .expect_err("silent unregister is still blocked");
    assert!(calls(&log, "alert:").is_empty());
}

#[test]
fn unregister_cascades_to_unshared_general_dependencies() {
    let log = call_log();
    let mut manager = recording_manager(&log);
    manager
        .register(
            "ext/lib/d",
            extension(&log, "ext/lib/d", ExtensionDeclaration::general()),
            false,
        )
        .expect("declare D");
    manager
        .register(
            "ext/lib/pinned",
            extension(&log, "ext/lib/pinned", ExtensionDeclaration::general().alone()),
            false,
        )
        .expect("register pinned");
    manager
        .register(
            "ext/app/c",
            extension(
                &log,
                "ext/app/c",
                ExtensionDeclaration::general()
                    .alone()
                    .depends_on("ext/lib/d")
                    .depends_on("ext/lib/pinned"),
            ),
            false,
        )
        .expect("register C");
    clear(&log);

    manager.unregister("ext/app/c", false).expect("unregister C");

    assert!(!manager.is_registered("ext/app/c"));
    assert!(!manager.is_registered("ext/lib/d"));
    assert!(manager.is_registered("ext/lib/pinned"));
    assert_eq!(
        calls(&log, "destroy:"),
        vec!["destroy:ext/lib/d", "destroy:ext/app/c"]
    );

    let records = manager.manifest_records().expect("manifest should list");
    let enabled: Vec<(&str, bool)> = records
        .iter()
        .map(|record| (record.path.as_str(), record.enabled))
        .collect();
    assert_eq!(
        enabled,
        vec![
            ("ext/lib/d", false),
            ("ext/lib/pinned", true),
            ("ext/app/c", false),
        ]
    );
}

#[test]
fn dependency_cycle_registers_once_and_stays_blocked() {
    let log = call_log();
    let mut manager = recording_manager(&log);
    manager
        .register(
            "ext/lib/b",
            extension(&log, "ext/lib/b", ExtensionDeclaration::general().depends_on("ext/lib/a")),
            false,
        )
        .expect("declare B");
    manager
        .register(
            "ext/lib/a",
            extension(&log, "ext/lib/a", ExtensionDeclaration::general().depends_on("ext/lib/b")),
            true,
        )
        .expect("register A");

    assert_eq!(calls(&log, "init:"), vec!["init:ext/lib/b", "init:ext/lib/a"]);
    assert_eq!(manager.used_by("ext/lib/a"), vec!["ext/lib/b"]);
    assert_eq!(manager.used_by("ext/lib/b"), vec!["ext/lib/a"]);

    let err = manager
        .unregister("ext/lib/a", true)
        .expect_err("cycle members keep each other in use");
    assert_eq!(err.error_code(), "ext_dependency_in_use");
    assert!(manager.is_registered("ext/lib/a"));
    assert!(manager.is_registered("ext/lib/b"));
}

#[test]
fn unregister_reports_unknown_and_declared_only_paths() {
    let log = call_log();
    let mut manager = recording_manager(&log);
    manager
        .register(
            "ext/lib/d",
            extension(&log, "ext/lib/d", ExtensionDeclaration::general()),
            false,
        )
        .expect("declare D");

    assert_eq!(
        manager.unregister("ext/lib/none", false),
        Err(ExtensionError::NotFound("ext/lib/none".to_string()))
    );
    assert_eq!(
        manager.unregister("ext/lib/d", false),
        Err(ExtensionError::NotRegistered("ext/lib/d".to_string()))
    );
}

#[test]
fn re_registering_flips_manifest_record_back_to_enabled() {
    let log = call_log();
    let mut manager = recording_manager(&log);
    let register = |manager: &mut ide_ext_core::ExtensionManager| {
        manager.register(
            "ext/tools/clock",
            extension(&log, "ext/tools/clock", ExtensionDeclaration::general().alone()),
            false,
        )
    };

    register(&mut manager).expect("first register");
    manager.unregister("ext/tools/clock", false).expect("unregister");
    let records = manager.manifest_records().expect("manifest should list");
    assert!(!records[0].enabled);

    let outcome = register(&mut manager).expect("second register");
    assert_eq!(outcome, RegisterOutcome::Initialized);
    let records = manager.manifest_records().expect("manifest should list");
    assert_eq!(records.len(), 1);
    assert!(records[0].enabled);
    assert_eq!(
        calls(&log, "init:"),
        vec!["init:ext/tools/clock", "init:ext/tools/clock"]
    );
}
