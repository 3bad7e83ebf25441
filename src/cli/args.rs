use crate::backend::FetchRequest;
use crate::constants::exit_codes;
use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use log::LevelFilter;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// Generate a Kedro project from a cookiecutter template in the current directory.
#[derive(Parser, Debug, Clone)]
#[command(author, about, long_about = None, disable_version_flag = true)]
pub struct Args {
    /// Template to use: a local directory, a VCS repository URL, an abbreviation such as
    /// `gh:owner/repo`, or the path or URL of a zip archive.
    #[arg(value_name = "TEMPLATE", required_unless_present_any = ["version", "v"])]
    pub template: Option<String>,

    /// The branch, tag or commit to check out after cloning.
    #[arg(short, long, value_name = "REF")]
    pub checkout: Option<String>,

    /// Directory inside the repository holding `cookiecutter.json`.
    #[arg(short, long, value_name = "PATH")]
    pub directory: Option<String>,

    /// Password for a protected zip archive.
    #[arg(short, long, value_name = "TEXT")]
    pub password: Option<String>,

    /// Show detailed progress and debug information.
    #[arg(long)]
    pub verbose: bool,

    /// Suppress all non-error messages.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show the version and exit.
    #[arg(long)]
    pub version: bool,

    /// `-v` shows the version, `-vv` is `--verbose`.
    #[arg(short = 'v', action = ArgAction::Count, hide = true)]
    pub v: u8,
}

impl Args {
    pub fn wants_version(&self) -> bool {
        self.version || self.v == 1
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.v >= 2
    }

    pub fn log_level(&self) -> LevelFilter {
        get_log_level(self.quiet, self.is_verbose())
    }

    /// Template request built from the positional argument and fetch options.
    pub fn fetch_request(&self) -> Option<FetchRequest> {
        self.template.as_ref().map(|template| FetchRequest {
            template: template.clone(),
            checkout: self.checkout.clone(),
            directory: self.directory.clone(),
            password: self.password.clone(),
        })
    }
}

/// Parse command line arguments, printing the help when the template is missing.
pub fn get_args() -> Args {
    let args = Args::try_parse().unwrap_or_else(|e| {
        if e.kind() == ErrorKind::MissingRequiredArgument {
            print_help_and_exit();
        }
        e.exit();
    });

    if args.quiet && args.is_verbose() {
        eprintln!("[x] Cannot use both --verbose and --quiet together.");
        std::process::exit(exit_codes::FAILURE);
    }
    args
}

fn print_help_and_exit() -> ! {
    let mut command = Args::command().help_template(HELP_TEMPLATE);
    if let Err(print_err) = command.print_help() {
        eprintln!("Failed to display help information: {print_err}");
    } else {
        println!();
    }
    std::process::exit(exit_codes::FAILURE);
}

/// Map the quiet and verbose switches to a log level.
pub fn get_log_level(quiet: bool, verbose: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, true) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    }
}
