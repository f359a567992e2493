use clap::{ArgAction, Parser};
use kvmkeys::{keymap, keysym::KeysymRegistry, render::render};
use log::{Level, LevelFilter, Metadata, Record};
use std::{fs, path::PathBuf, process};

#[derive(Parser)]
#[command(
    name = "genmap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate keymap source artifacts from the canonical definition"
)]
struct App {
    /// Increase message verbosity
    #[arg(long, short, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Silence all warnings
    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,

    /// Canonical keymap definition
    #[arg(name = "KEYMAP")]
    keymap: PathBuf,

    /// Template to render
    #[arg(name = "TEMPLATE")]
    template: PathBuf,

    /// Output file, written only on a fully successful render
    #[arg(name = "OUTPUT")]
    output: PathBuf,
}

fn main() {
    let args = App::parse();

    log::set_logger(&CLI_LOGGER).unwrap();

    let level = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    log::set_max_level(level);

    let registry = KeysymRegistry::new();

    let keymap = keymap::parse(&args.keymap, &registry).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    let template = fs::read_to_string(&args.template).unwrap_or_else(|e| {
        eprintln!("error: {}: {e}", args.template.display());
        process::exit(1);
    });

    // render fully before touching the output file
    let rendered = render(&keymap, &template).unwrap_or_else(|e| {
        eprintln!("error: {}: {e}", args.template.display());
        process::exit(1);
    });

    if let Err(e) = fs::write(&args.output, rendered) {
        eprintln!("error: {}: {e}", args.output.display());
        process::exit(1);
    }
}

static CLI_LOGGER: CliLogger = CliLogger;

struct CliLogger;

impl log::Log for CliLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{}: {}",
                match record.level() {
                    Level::Trace => "trace",
                    Level::Debug => "debug",
                    Level::Info => "info",
                    Level::Warn => "warn",
                    Level::Error => "error",
                },
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
