use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use libpass_core::PassRegistry;

/// Parsed command line.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Input file (stdin when absent)
    pub input: Option<PathBuf>,
    /// Path to config file (default: ~/.config/libpass/config.toml)
    pub config: Option<String>,
    /// Print manager metrics as JSON after the run
    pub metrics: bool,
    /// Debug-level logging
    pub verbose: bool,
    /// Argument strings of the passes selected by flag
    pub selected: Vec<String>,
}

/// Build the command line. Every registered pass contributes a
/// `--<arg_str>` flag, plus `-<arg_char>` when it has one.
pub fn command(registry: &PassRegistry) -> Command {
    let mut cmd = Command::new("libpass")
        .about("Run passes of the libpass text pipeline")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .value_parser(value_parser!(PathBuf))
                .help("Input file (reads stdin when omitted)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to config file (default: ~/.config/libpass/config.toml)"),
        )
        .arg(
            Arg::new("metrics")
                .long("metrics")
                .action(ArgAction::SetTrue)
                .help("Print pass manager metrics as JSON after the run"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        );

    for pass in registry.descriptors() {
        let mut arg = Arg::new(pass.arg_string().to_string())
            .long(pass.arg_string().to_string())
            .action(ArgAction::SetTrue)
            .help(pass.description().to_string());
        if let Some(c) = pass.arg_char() {
            arg = arg.short(c);
        }
        cmd = cmd.arg(arg);
    }

    cmd
}

impl CliArgs {
    pub fn from_matches(registry: &PassRegistry, matches: &ArgMatches) -> Self {
        let selected = registry
            .descriptors()
            .filter(|pass| matches.get_flag(pass.arg_string()))
            .map(|pass| pass.arg_string().to_string())
            .collect();

        Self {
            input: matches.get_one::<PathBuf>("input").cloned(),
            config: matches.get_one::<String>("config").cloned(),
            metrics: matches.get_flag("metrics"),
            verbose: matches.get_flag("verbose"),
            selected,
        }
    }

    /// Parse `args` (including the binary name) against `registry`.
    #[cfg(test)]
    pub fn try_parse_from<I, T>(registry: &PassRegistry, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command(registry).try_get_matches_from(args)?;
        Ok(Self::from_matches(registry, &matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes;
    use libpass_manager::PassManager;

    fn registry() -> PassRegistry {
        let mut registry = PassRegistry::new();
        PassManager::register(&mut registry).unwrap();
        passes::register_all(&mut registry).unwrap();
        registry
    }

    #[test]
    fn pass_flags_are_generated() {
        let registry = registry();
        let cmd = command(&registry);
        let longs: Vec<&str> = cmd.get_arguments().filter_map(|a| a.get_long()).collect();

        assert!(longs.contains(&"pm-dump"));
        assert!(longs.contains(&"tokenize"));
        assert!(longs.contains(&"report"));
    }

    #[test]
    fn parses_selected_passes_and_options() {
        let registry = registry();
        let args = CliArgs::try_parse_from(
            &registry,
            ["libpass", "--report", "-e", "--metrics", "input.txt"],
        )
        .unwrap();

        assert_eq!(args.selected, vec!["emit", "report"]);
        assert!(args.metrics);
        assert!(!args.verbose);
        assert_eq!(args.input, Some(PathBuf::from("input.txt")));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let registry = registry();
        assert!(CliArgs::try_parse_from(&registry, ["libpass", "--nope"]).is_err());
    }
}
