//! # Test Case Catalogue Module
//!
//! Pure data: for each package format and target (server, keeper, standalone
//! binary) the shell script that installs the package and verifies the
//! service comes up. The health checks are protocol-level: the server is
//! queried through the command line client with bounded retries, the keeper
//! is polled on its TCP port and then asked `mntr` until `zk_version` shows
//! up in the answer.

use crate::core::models::{ImageIdentity, TestCase};

/// The package formats the harness knows how to exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    Deb,
    Rpm,
    Tgz,
}

/// Starts the server and requires a trivial query to succeed.
/// Retries live in the caller scripts where needed; under systemd the unit
/// start already blocks until the server is ready.
const SERVER_TEST: &str = r#"#!/bin/bash
systemctl start clickhouse-server
clickhouse-client -q 'SELECT version()'"#;

/// Starts the keeper and polls it: up to 20 attempts for the TCP port to
/// open, then up to 5 attempts for `mntr` to answer with `zk_version`.
const KEEPER_TEST: &str = r#"#!/bin/bash
systemctl start clickhouse-keeper
for i in {1..20}; do
    echo wait for clickhouse-keeper to being up
    > /dev/tcp/127.0.0.1/9181 2>/dev/null && break || sleep 1
done
for i in {1..5}; do
    echo wait for clickhouse-keeper to answer on mntr request
    exec 13<>/dev/tcp/127.0.0.1/9181
    echo mntr >&13
    cat <&13 | grep zk_version && break || sleep 1
    exec 13>&-
done
exec 13>&-"#;

/// Installs the self-contained binary and runs both the server and the
/// keeper smoke checks against it.
const BINARY_TEST: &str = r#"#!/bin/bash
chmod +x /packages/clickhouse
/packages/clickhouse install
clickhouse-server start --daemon
for i in {1..5}; do
    clickhouse-client -q 'SELECT version()' && break || sleep 1
done
clickhouse-keeper start --daemon
for i in {1..20}; do
    echo wait for clickhouse-keeper to being up
    > /dev/tcp/127.0.0.1/9181 2>/dev/null && break || sleep 1
done
for i in {1..5}; do
    echo wait for clickhouse-keeper to answer on mntr request
    exec 13<>/dev/tcp/127.0.0.1/9181
    echo mntr >&13
    cat <&13 | grep zk_version && break || sleep 1
    exec 13>&-
done
exec 13>&-"#;

/// Helper scripts shared by all catalogue entries; the harness driver
/// materializes them into the workspace once, before any case runs.
pub fn helper_scripts() -> [(&'static str, &'static str); 3] {
    [
        ("server_test.sh", SERVER_TEST),
        ("keeper_test.sh", KEEPER_TEST),
        ("binary_test.sh", BINARY_TEST),
    ]
}

/// Builds an install-then-check script. `disable_watchdog` injects the
/// override that turns the server watchdog off before the health check runs.
fn install_script(install: &str, disable_watchdog: bool, check: &str) -> String {
    let mut script = format!("#!/bin/bash -ex\n{install}\n");
    if disable_watchdog {
        script.push_str("echo CLICKHOUSE_WATCHDOG_ENABLE=0 > /etc/default/clickhouse-server\n");
    }
    script.push_str(&format!("bash -ex /packages/{check}\n"));
    script
}

fn deb_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "Install server deb",
            install_script(
                "apt-get install /packages/clickhouse-{server,client,common}*deb",
                false,
                "server_test.sh",
            ),
        ),
        TestCase::new(
            "Install keeper deb",
            install_script(
                "apt-get install /packages/clickhouse-keeper*deb",
                false,
                "keeper_test.sh",
            ),
        ),
        TestCase::new(
            "Install clickhouse binary in deb",
            "bash -ex /packages/binary_test.sh",
        ),
    ]
}

fn rpm_cases() -> Vec<TestCase> {
    // systemd in the centos family ignores the Type=notify watchdog, so the
    // server case must run with the watchdog disabled.
    vec![
        TestCase::new(
            "Install server rpm",
            install_script(
                "yum localinstall --disablerepo=* -y /packages/clickhouse-{server,client,common}*rpm",
                true,
                "server_test.sh",
            ),
        ),
        TestCase::new(
            "Install keeper rpm",
            install_script(
                "yum localinstall --disablerepo=* -y /packages/clickhouse-keeper*rpm",
                false,
                "keeper_test.sh",
            ),
        ),
        TestCase::new(
            "Install clickhouse binary in rpm",
            "bash -ex /packages/binary_test.sh",
        ),
    ]
}

const SERVER_TGZ: &str = r#"#!/bin/bash -ex
[ -f /etc/debian_version ] && CONFIGURE=configure || CONFIGURE=
for pkg in /packages/clickhouse-{common,client,server}*tgz; do
    package=${pkg%-*}
    package=${package##*/}
    tar xf "$pkg"
    "/$package/install/doinst.sh" $CONFIGURE
done
[ -f /etc/yum.conf ] && echo CLICKHOUSE_WATCHDOG_ENABLE=0 > /etc/default/clickhouse-server
bash -ex /packages/server_test.sh
"#;

const KEEPER_TGZ: &str = r#"#!/bin/bash -ex
[ -f /etc/debian_version ] && CONFIGURE=configure || CONFIGURE=
for pkg in /packages/clickhouse-keeper*tgz; do
    package=${pkg%-*}
    package=${package##*/}
    tar xf "$pkg"
    "/$package/install/doinst.sh" $CONFIGURE
done
bash -ex /packages/keeper_test.sh
"#;

/// The tgz archives are checked against several base images, so the case
/// names carry the image they run in to stay unique within one invocation.
fn tgz_cases(image: &ImageIdentity) -> Vec<TestCase> {
    vec![
        TestCase::new(format!("Install server tgz in {}", image.name), SERVER_TGZ),
        TestCase::new(format!("Install keeper tgz in {}", image.name), KEEPER_TGZ),
    ]
}

/// Returns the test cases for one package format, in run order.
pub fn catalogue(format: PackageFormat, image: &ImageIdentity) -> Vec<TestCase> {
    match format {
        PackageFormat::Deb => deb_cases(),
        PackageFormat::Rpm => rpm_cases(),
        PackageFormat::Tgz => tgz_cases(image),
    }
}
