//! Unit tests for the test case catalogue: per-format case sets, the rpm
//! watchdog workaround, tgz name parameterization and the bounded health
//! check retries embedded in the scripts.

use std::collections::HashSet;

use install_check::core::catalogue::{catalogue, helper_scripts, PackageFormat};
use install_check::core::models::{ImageIdentity, TestCase};

fn image(name: &str) -> ImageIdentity {
    ImageIdentity {
        name: name.to_string(),
        tag: "latest".to_string(),
    }
}

fn deb_image() -> ImageIdentity {
    image("clickhouse/install-deb-test")
}

fn rpm_image() -> ImageIdentity {
    image("clickhouse/install-rpm-test")
}

#[test]
fn deb_catalogue_has_server_keeper_and_binary_cases() {
    let cases = catalogue(PackageFormat::Deb, &deb_image());
    let names: Vec<&str> = cases.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Install server deb",
            "Install keeper deb",
            "Install clickhouse binary in deb",
        ]
    );
    assert!(cases[0].script.contains("apt-get install"));
    assert!(cases[0].script.contains("server_test.sh"));
    assert!(cases[1].script.contains("keeper_test.sh"));
    assert!(cases[2].script.contains("binary_test.sh"));
}

#[test]
fn deb_server_case_keeps_the_watchdog_enabled() {
    let cases = catalogue(PackageFormat::Deb, &deb_image());
    assert!(!cases[0].script.contains("CLICKHOUSE_WATCHDOG_ENABLE"));
}

#[test]
fn rpm_server_case_disables_the_watchdog() {
    let cases = catalogue(PackageFormat::Rpm, &rpm_image());
    assert_eq!(cases.len(), 3);
    assert!(cases[0].script.contains("yum localinstall --disablerepo=* -y"));
    assert!(cases[0]
        .script
        .contains("echo CLICKHOUSE_WATCHDOG_ENABLE=0 > /etc/default/clickhouse-server"));
    // The keeper has no watchdog integration, so its case stays untouched.
    assert!(!cases[1].script.contains("CLICKHOUSE_WATCHDOG_ENABLE"));
}

#[test]
fn tgz_case_names_carry_the_image_they_run_in() {
    let in_deb = catalogue(PackageFormat::Tgz, &deb_image());
    let in_rpm = catalogue(PackageFormat::Tgz, &rpm_image());

    assert_eq!(in_deb.len(), 2);
    assert_eq!(
        in_deb[0].name,
        "Install server tgz in clickhouse/install-deb-test"
    );
    assert_eq!(
        in_rpm[1].name,
        "Install keeper tgz in clickhouse/install-rpm-test"
    );
    // Same scripts, different names, so running both stays collision free.
    assert_eq!(in_deb[0].script, in_rpm[0].script);
    assert_ne!(in_deb[0].name, in_rpm[0].name);
}

#[test]
fn tgz_script_autodetects_the_package_convention() {
    let cases = catalogue(PackageFormat::Tgz, &deb_image());
    assert!(cases[0].script.contains("/etc/debian_version"));
    assert!(cases[0].script.contains("doinst.sh"));
    assert!(cases[0].script.contains("/etc/yum.conf"));
}

#[test]
fn keeper_health_check_has_a_bounded_retry_budget() {
    let scripts = helper_scripts();
    let keeper = scripts
        .iter()
        .find(|(name, _)| *name == "keeper_test.sh")
        .map(|(_, body)| *body)
        .unwrap();

    // 20 x 1s for the TCP port, then 5 x 1s for the mntr answer.
    assert!(keeper.contains("for i in {1..20}"));
    assert!(keeper.contains("for i in {1..5}"));
    assert!(keeper.contains("sleep 1"));
    assert!(keeper.contains("echo mntr"));
    assert!(keeper.contains("grep zk_version"));
}

#[test]
fn server_health_check_queries_through_the_client() {
    let scripts = helper_scripts();
    assert_eq!(scripts.len(), 3);
    let server = scripts
        .iter()
        .find(|(name, _)| *name == "server_test.sh")
        .map(|(_, body)| *body)
        .unwrap();
    assert!(server.contains("clickhouse-client -q 'SELECT version()'"));
}

#[test]
fn full_plan_has_unique_sanitized_names() {
    let mut all = catalogue(PackageFormat::Deb, &deb_image());
    all.extend(catalogue(PackageFormat::Rpm, &rpm_image()));
    all.extend(catalogue(PackageFormat::Tgz, &deb_image()));
    all.extend(catalogue(PackageFormat::Tgz, &rpm_image()));

    let mut seen = HashSet::new();
    for case in &all {
        assert!(
            seen.insert(case.sanitized_name()),
            "duplicate sanitized name: {}",
            case.sanitized_name()
        );
    }
    assert_eq!(all.len(), 10);
}

#[test]
fn sanitized_names_are_filesystem_safe() {
    let case = TestCase::new("Install server tgz in clickhouse/install-deb-test", "");
    assert_eq!(
        case.sanitized_name(),
        "install_server_tgz_in_clickhouse_install-deb-test"
    );
}
