use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `qms` binary.
#[derive(Debug, Parser)]
#[command(name = "qms", version, about = "Audit assessment progress and scoring")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding sections.json and responses.json (overrides general.data_dir)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            data_dir: self.data_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "qms",
            "--format",
            "table",
            "--verbose",
            "progress",
            "-a",
            "asm-1",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Progress(ref args) if args.assessment == "asm-1"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["qms", "score", "-a", "asm-1", "--format", "raw", "-q"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Score(_)));
    }

    #[test]
    fn answer_parses_patch_fields() {
        let cli = Cli::try_parse_from([
            "qms",
            "answer",
            "-a",
            "asm-1",
            "q-4.1-a",
            "--score",
            "2",
            "--justification",
            "Partially documented",
            "--section",
            "s4-1",
        ])
        .expect("cli should parse");

        let Commands::Answer(args) = cli.command else {
            panic!("expected answer command");
        };
        assert_eq!(args.question, "q-4.1-a");
        assert_eq!(args.score, Some(2));
        assert!(!args.clear_score);
        assert_eq!(args.justification.as_deref(), Some("Partially documented"));
        assert_eq!(args.section.as_deref(), Some("s4-1"));
    }

    #[test]
    fn answer_rejects_out_of_range_score() {
        for value in ["0", "4"] {
            let parsed =
                Cli::try_parse_from(["qms", "answer", "-a", "asm-1", "q1", "--score", value]);
            assert!(parsed.is_err(), "score {value} should be rejected");
        }
    }

    #[test]
    fn score_conflicts_with_clear_score() {
        let parsed = Cli::try_parse_from([
            "qms",
            "answer",
            "-a",
            "asm-1",
            "q1",
            "--score",
            "1",
            "--clear-score",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn data_dir_flag_is_global() {
        let cli = Cli::try_parse_from(["qms", "progress", "-a", "asm-1", "--data-dir", "/tmp/qms"])
            .expect("cli should parse");
        assert_eq!(cli.global_flags().data_dir.as_deref(), Some(Path::new("/tmp/qms")));
    }
}
