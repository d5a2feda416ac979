// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use srtgears::app_config::{Config, LogLevel};
use srtgears::{
    AppError, ExecOptions, Executor, FileManager, ParsedSrt, ReadOptions, SubsPack, APP_NAME, HOME_PAGE,
};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for srtgears
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Srtgears - subtitle transformation engine
///
/// Reads SubRip (*.srt) files, transforms them and writes SubRip (*.srt) or
/// Sub Station Alpha (*.ssa) files.
#[derive(Parser, Debug)]
#[command(name = "srtgears")]
#[command(version)]
#[command(about = "Subtitle transformation engine")]
#[command(long_about = "Srtgears reads SubRip subtitles, transforms them and writes SubRip or Sub Station Alpha subtitles.

Operations are applied in this order: concat, merge, lengthen, remove-ctrl,
remove-hi, remove-html, pos, color, scale, shift-by, split-at, stats.

EXAMPLES:
    srtgears --in eng.srt --out eng2.srt --shift-by 1500        # Show subtitles 1.5s later
    srtgears --in eng.srt --out eng.ssa --color yellow           # Convert to Sub Station Alpha
    srtgears --in eng.srt --in2 hun.srt --out dual.srt --merge   # Dual subtitle, hun at the top
    srtgears --in cd1.srt --in2 cd2.srt --out all.srt --concat 00:59:00,123
    srtgears --in all.srt --out cd1.srt --out2 cd2.srt --split-at 00:59:00,123
    srtgears --in eng.srt --stats                                # Print statistics
    srtgears completions bash > srtgears.bash                    # Generate bash completions")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file (SubRip, *.srt)
    #[arg(long = "in", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Optional 2nd input file, used by --concat and --merge
    #[arg(long = "in2", value_name = "FILE")]
    input2: Option<PathBuf>,

    /// Output file, the format is chosen by extension (*.srt or *.ssa)
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// 2nd output file, used by --split-at
    #[arg(long, value_name = "FILE")]
    out2: Option<PathBuf>,

    /// Concatenate the 2nd input, whose part starts at this time (e.g. 00:59:00,123)
    #[arg(long, value_name = "TIME")]
    concat: Option<String>,

    /// Merge the 2nd input into a dual subtitle, the 2nd input goes to the top
    #[arg(long)]
    merge: bool,

    /// Split into 2 parts at this time (e.g. 00:59:00,123)
    #[arg(long, value_name = "TIME")]
    split_at: Option<String>,

    /// Shift timestamps by this many milliseconds (+/-)
    #[arg(long, value_name = "MS", allow_hyphen_values = true)]
    shift_by: Option<i64>,

    /// Scale timestamps by this factor (e.g. 1.001)
    #[arg(long, value_name = "FACTOR")]
    scale: Option<f64>,

    /// Lengthen display durations by this factor (e.g. 1.1 for +10%)
    #[arg(long, value_name = "FACTOR")]
    lengthen: Option<f64>,

    /// Remove HTML formatting
    #[arg(long)]
    remove_html: bool,

    /// Remove controls such as {\anX}
    #[arg(long)]
    remove_ctrl: bool,

    /// Remove hearing impaired lines such as [PHONE RINGING]
    #[arg(long)]
    remove_hi: bool,

    /// Change position: BL, B, BR, L, C, R, TL, T, TR
    #[arg(long, value_name = "POS")]
    pos: Option<String>,

    /// Change color, a name (e.g. yellow) or #rrggbb
    #[arg(long, value_name = "COLOR")]
    color: Option<String>,

    /// Print statistics of the (transformed) subtitle
    #[arg(long)]
    stats: bool,

    /// Print parser diagnostics and validate sequence numbers
    #[arg(long)]
    debug: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Configuration file path (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force: bool,
}

impl CommandLineOptions {
    // @returns: Executor options built from the flags
    fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            out: self.out.clone(),
            out2: self.out2.clone(),
            concat: self.concat.clone(),
            merge: self.merge,
            split_at: self.split_at.clone(),
            shift_by_ms: self.shift_by,
            scale: self.scale,
            lengthen: self.lengthen,
            remove_html: self.remove_html,
            remove_ctrl: self.remove_ctrl,
            remove_hi: self.remove_hi,
            pos: self.pos.clone(),
            color: self.color.clone(),
            stats: self.stats,
        }
    }
}

// @struct: Custom logger implementation, filtering on the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    // Info by default, updated once the config is loaded
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "srtgears", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// @returns: Configuration from the optional file with CLI overrides applied
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    config.debug |= cli.debug;
    config.force_overwrite |= cli.force;
    Ok(config)
}

fn run(cli: CommandLineOptions) -> Result<(), AppError> {
    let config = load_config(&cli).map_err(|e| AppError::Config(format!("{:#}", e)))?;
    log::set_max_level(config.level_filter());
    debug!("{} {} ({})", APP_NAME, env!("CARGO_PKG_VERSION"), HOME_PAGE);

    let read_options = config.read_options();
    let primary = read_input(cli.input.as_deref(), &read_options)?;
    let secondary = read_input(cli.input2.as_deref(), &read_options)?;

    let executor = Executor::new(cli.exec_options());
    let outcome = executor.execute(primary, secondary)?;

    if let Some(stats) = &outcome.stats {
        println!("{}", stats);
    }

    if let Some(out) = &executor.options().out {
        write_output(out, &outcome.primary, config.force_overwrite)?;
    }
    if let (Some(out2), Some(second)) = (&executor.options().out2, &outcome.secondary) {
        write_output(out2, second, config.force_overwrite)?;
    }

    if !outcome.modified && executor.options().out.is_none() && !executor.options().stats {
        info!("No operation requested, nothing to do");
    }

    Ok(())
}

fn read_input(path: Option<&Path>, options: &ReadOptions) -> Result<Option<SubsPack>, AppError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let ParsedSrt { pack, issues } =
        FileManager::read_srt_file(path, options).map_err(|e| AppError::File(format!("{:#}", e)))?;
    if !issues.is_empty() {
        debug!("{} issue(s) found in {}", issues.len(), path.display());
    }
    info!("Read {} subtitles from {}", pack.len(), path.display());
    Ok(Some(pack))
}

fn write_output(path: &Path, pack: &SubsPack, force_overwrite: bool) -> Result<(), AppError> {
    FileManager::write_pack_file(path, pack, force_overwrite)
        .map_err(|e| AppError::File(format!("{:#}", e)))?;
    info!("Wrote {} subtitles to {}", pack.len(), path.display());
    Ok(())
}
