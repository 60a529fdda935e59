use std::io::Write;

use anyhow::Error;

use clap::{ArgAction, Parser, Subcommand};

use tdata_core::error::Category;

mod convert;
use convert::Convert;

mod info;
use info::Info;

mod massif;
use massif::Massif;

mod subsets;
use subsets::Subsets;

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Tools for preparing phylogenetic terrace datasets.
#[derive(Debug, Parser)]
#[clap(name = NAME, author = AUTHOR, version = VERSION, about)]
#[clap(subcommand_required = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress warnings.
    ///
    /// By default, only warnings are printed. By setting this flag, warnings will be disabled.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbosity.
    ///
    /// Flag can be set multiply times to increase verbosity, or left unset for quiet mode.
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print CLI arguments for debugging.
    #[clap(long, hide = true, global = true)]
    debug: bool,
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        if self.debug {
            eprintln!("{self:#?}");
        }

        let level = if self.quiet {
            log::LevelFilter::Off
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        };

        match env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[tdata {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }

        self.command.run()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Convert(Convert),
    Info(Info),
    Massif(Massif),
    Subsets(Subsets),
}

impl Command {
    fn run(self) -> Result<(), Error> {
        match self {
            Command::Convert(convert) => convert.run(),
            Command::Info(info) => info.run(),
            Command::Massif(massif) => massif.run(),
            Command::Subsets(subsets) => subsets.run(),
        }
    }
}

macro_rules! impl_try_from_command {
    ($variant:ident) => {
        impl TryFrom<Command> for $variant {
            type Error = Command;

            fn try_from(command: Command) -> Result<Self, Self::Error> {
                match command {
                    Command::$variant(inner) => Ok(inner),
                    command => Err(command),
                }
            }
        }
    };
}

impl_try_from_command!(Convert);
impl_try_from_command!(Info);
impl_try_from_command!(Massif);
impl_try_from_command!(Subsets);

/// Returns the process exit code for an error.
///
/// Internal errors indicate a bug rather than bad input, and get their own exit code.
fn exit_code(e: &Error) -> i32 {
    match e
        .downcast_ref::<tdata_core::Error>()
        .map(tdata_core::Error::category)
    {
        Some(Category::Internal) => 2,
        Some(Category::Input | Category::Io) | None => 1,
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(exit_code(&e));
        }
    }
}
