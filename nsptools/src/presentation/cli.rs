use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Split large NSP/XCI dumps into FAT32-sized parts and join them back",
    long_about = None
)]
pub struct Cli {
    /// TOML file with [split] / [combine] sections; flags override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// -v for info logs, -vv for debug (RUST_LOG wins when set)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print "Progress: NN%" lines instead of a progress bar
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a file into <name>_part_<N> files inside split_output/ next to it
    Split {
        file: PathBuf,

        /// Maximum part size in MiB (default 4000)
        #[arg(long = "part-size-mib")]
        part_size_mib: Option<u64>,

        /// Delete parts left in split_output/ by an earlier run of the same file
        #[arg(long)]
        overwrite: bool,
    },

    /// Join the parts found in a directory into output.nsp / output.xci
    Combine { dir: PathBuf },

    /// List the parts a combine would use, in order
    Parts { dir: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_split_with_overrides() {
        let cli = Cli::try_parse_from([
            "nsptools",
            "-vv",
            "split",
            "game.nsp",
            "--part-size-mib",
            "2000",
            "--overwrite",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Split {
                file,
                part_size_mib,
                overwrite,
            } => {
                assert_eq!(file, PathBuf::from("game.nsp"));
                assert_eq!(part_size_mib, Some(2000));
                assert!(overwrite);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["nsptools", "combine", "parts/", "--plain"]).unwrap();
        assert!(cli.plain);
        assert!(matches!(cli.command, Commands::Combine { .. }));
    }
}
