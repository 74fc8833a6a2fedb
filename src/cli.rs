// src/cli.rs
use clap::{Arg, ArgAction, ArgMatches, Command};

/// Parsed command line arguments for a single check invocation.
///
/// Every toggle defaults to enabled; the `--no-*` flags switch the
/// corresponding stage off, which is mostly useful for local debugging
/// (e.g. re-running against already downloaded packages).
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Check name, used to locate the packages and the reporting channel.
    pub check_name: String,
    pub download: bool,
    pub deb: bool,
    pub rpm: bool,
    pub tgz: bool,
}

fn build_cli() -> Command {
    let mut cmd = Command::new("install-check")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("The tool to check if the built packages are able to install and start")
        .arg(
            Arg::new("check_name")
                .value_name("CHECK_NAME")
                .required(true)
                .help("check name, used to download the packages"),
        );

    // Each stage gets a `--<stage>`/`--no-<stage>` pair; the positive form is
    // hidden since it only restates the default, but keeping it allows the
    // last flag on the command line to win.
    for (name, no_name, help) in [
        (
            "download",
            "no-download",
            "if set, the packages won't be downloaded, useful for debug",
        ),
        ("deb", "no-deb", "if set, the deb packages won't be checked"),
        ("rpm", "no-rpm", "if set, the rpm packages won't be checked"),
        ("tgz", "no-tgz", "if set, the tgz packages won't be checked"),
    ] {
        cmd = cmd
            .arg(
                Arg::new(name)
                    .long(name)
                    .action(ArgAction::SetTrue)
                    .overrides_with(no_name)
                    .hide(true),
            )
            .arg(
                Arg::new(no_name)
                    .long(no_name)
                    .action(ArgAction::SetTrue)
                    .overrides_with(name)
                    .help(help),
            );
    }

    cmd
}

fn stage_enabled(matches: &ArgMatches, name: &str, no_name: &str) -> bool {
    matches.get_flag(name) || !matches.get_flag(no_name)
}

fn extract_args(matches: &ArgMatches) -> CheckArgs {
    CheckArgs {
        check_name: matches
            .get_one::<String>("check_name")
            .expect("required argument")
            .clone(),
        download: stage_enabled(matches, "download", "no-download"),
        deb: stage_enabled(matches, "deb", "no-deb"),
        rpm: stage_enabled(matches, "rpm", "no-rpm"),
        tgz: stage_enabled(matches, "tgz", "no-tgz"),
    }
}

/// Parses the process arguments, exiting with a usage message on error.
pub fn parse_args() -> CheckArgs {
    extract_args(&build_cli().get_matches())
}
