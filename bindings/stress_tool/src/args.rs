use std::path::PathBuf;

use crosscheck_core::prelude::RuntimeArguments;

/// A cassandra-stress command, as understood by both the reference tool and the reimplementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StressCommand {
    /// Populate the standard table of a keyspace.
    Write,
    /// Read back and validate the rows that [StressCommand::Write] produces.
    Read,
    /// Run `operation` from a user-profile workload definition.
    User { profile: PathBuf, operation: String },
}

impl StressCommand {
    pub fn user(profile: impl Into<PathBuf>, operation: impl Into<String>) -> Self {
        StressCommand::User {
            profile: profile.into(),
            operation: operation.into(),
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            StressCommand::Write => "write",
            StressCommand::Read => "read",
            StressCommand::User { .. } => "user",
        }
    }
}

/// Build the argument vector for one stress tool run, without the launch command.
///
/// `keyspace` is only used by [StressCommand::Write] and [StressCommand::Read]. A user profile
/// names its own keyspace.
pub fn build_args(
    command: &StressCommand,
    node_address: &str,
    keyspace: &str,
    runtime_args: &RuntimeArguments,
) -> Vec<String> {
    let mut args = vec![
        command.verb().to_string(),
        "no-warmup".to_string(),
        format!("n={}", runtime_args.workload_size()),
    ];

    if let StressCommand::User { profile, operation } = command {
        args.push(format!("profile={}", profile.display()));
        args.push(format!("ops({operation}=1)"));
    }

    args.push("-node".to_string());
    args.push(node_address.to_string());

    args.push("-rate".to_string());
    args.push(rate_clause(runtime_args));

    match command {
        StressCommand::Write | StressCommand::Read => {
            args.push("-schema".to_string());
            args.push(format!("keyspace={keyspace}"));
        }
        StressCommand::User { .. } => {
            args.push("-pop".to_string());
            args.push(format!("seq=1..{}", runtime_args.workload_size()));
        }
    }

    if let Some(hdr_log_file) = runtime_args.hdr_log_file() {
        args.push("-log".to_string());
        args.push(log_clause(hdr_log_file.display(), runtime_args));
    }

    args
}

fn rate_clause(runtime_args: &RuntimeArguments) -> String {
    let threads = format!("threads={}", runtime_args.concurrency());
    match runtime_args.throttle() {
        Some(throttle) => format!("{threads} throttle={throttle}"),
        None => threads,
    }
}

fn log_clause(hdr_log_file: impl std::fmt::Display, runtime_args: &RuntimeArguments) -> String {
    let hdrfile = format!("hdrfile={hdr_log_file}");
    if runtime_args.has_default_log_interval() {
        hdrfile
    } else {
        format!("{hdrfile} interval={}", runtime_args.log_interval_s())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn write_with_defaults() {
        let args = build_args(
            &StressCommand::Write,
            "127.0.0.1",
            "ks_cassandra_42_20240101_00h00m00s",
            &RuntimeArguments::default(),
        );

        assert_eq!(
            args,
            strings(&[
                "write",
                "no-warmup",
                "n=100",
                "-node",
                "127.0.0.1",
                "-rate",
                "threads=1",
                "-schema",
                "keyspace=ks_cassandra_42_20240101_00h00m00s",
            ])
        );
    }

    #[test]
    fn single_rate_clause_with_throttle() {
        let runtime_args = RuntimeArguments::new(1000, 4)
            .unwrap()
            .with_throttle("500/s")
            .unwrap();

        let args = build_args(&StressCommand::Read, "10.0.0.1", "ks", &runtime_args);

        assert_eq!(args.iter().filter(|a| *a == "-rate").count(), 1);
        let rate = args.iter().position(|a| a == "-rate").unwrap();
        assert_eq!(args[rate + 1], "threads=4 throttle=500/s");
        assert_eq!(args[2], "n=1000");
    }

    #[test]
    fn no_throttle_sub_clause_when_unset() {
        let args = build_args(&StressCommand::Read, "10.0.0.1", "ks", &RuntimeArguments::default());
        assert!(args.iter().all(|a| !a.contains("throttle")));
    }

    #[test]
    fn default_log_interval_is_omitted() {
        let runtime_args = RuntimeArguments::default().with_hdr_log("/tmp/hdr_log.hlog");

        let args = build_args(&StressCommand::Write, "127.0.0.1", "ks", &runtime_args);

        assert_eq!(
            args[args.len() - 2..].to_vec(),
            strings(&["-log", "hdrfile=/tmp/hdr_log.hlog"])
        );
    }

    #[test]
    fn custom_log_interval_is_passed() {
        for (interval, clause) in [(2.0, "interval=2"), (0.5, "interval=0.5")] {
            let runtime_args = RuntimeArguments::default()
                .with_log_interval(interval)
                .unwrap()
                .with_hdr_log("out.hlog");

            let args = build_args(&StressCommand::Write, "127.0.0.1", "ks", &runtime_args);

            assert_eq!(
                args.last().unwrap(),
                &format!("hdrfile=out.hlog {clause}")
            );
        }
    }

    #[test]
    fn user_profile_has_population_instead_of_schema() {
        let args = build_args(
            &StressCommand::user("profiles/int.yaml", "insert"),
            "127.0.0.1",
            "ignored",
            &RuntimeArguments::default(),
        );

        assert_eq!(
            args,
            strings(&[
                "user",
                "no-warmup",
                "n=100",
                "profile=profiles/int.yaml",
                "ops(insert=1)",
                "-node",
                "127.0.0.1",
                "-rate",
                "threads=1",
                "-pop",
                "seq=1..100",
            ])
        );
    }
}
