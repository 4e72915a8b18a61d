use crate::locate::{DistanceMetric, DEFAULT_FLANK_LEN};
use crate::utils::{parse_sequence, Result};
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="insite",
          version=&**FULL_VERSION,
          about="Locate inserted sequences in noisy reads and map them onto a template",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Locate the insert in every read and map it onto the template")]
    Locate(LocateArgs),
    #[clap(about = "Report the baseline distance of the insert against the template")]
    Calibrate(CalibrateArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("locate")))]
#[command(arg_required_else_help(true))]
pub struct LocateArgs {
    #[clap(required = true)]
    #[clap(short = 't')]
    #[clap(long = "template")]
    #[clap(help = "Single-record FASTA with the unmodified template")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub template_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'q')]
    #[clap(long = "query")]
    #[clap(help = "Sequence of the insert")]
    #[clap(value_name = "QUERY")]
    #[arg(value_parser = check_query)]
    pub query: String,

    #[clap(required = true)]
    #[clap(short = 'r')]
    #[clap(long = "reads")]
    #[clap(help = "SAM file with the reads")]
    #[clap(value_name = "SAM")]
    #[arg(value_parser = check_file_exists)]
    pub reads_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(short = 'j')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "12")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(long = "min-length")]
    #[clap(value_name = "MIN_LEN")]
    #[clap(help = "Only reads longer than this are considered [default: query length]")]
    pub min_len: Option<usize>,

    #[clap(long = "max-length")]
    #[clap(value_name = "MAX_LEN")]
    #[clap(help = "Only reads shorter than this are considered [default: template length]")]
    pub max_len: Option<usize>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "flank-len")]
    #[clap(value_name = "FLANK_LEN")]
    #[clap(help = "Length of context captured on each side of the read-local match")]
    #[clap(default_value_t = DEFAULT_FLANK_LEN)]
    #[arg(value_parser = flank_in_range)]
    pub flank_len: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "metric")]
    #[clap(value_name = "METRIC")]
    #[clap(help = "Window distance (levenshtein or hamming)")]
    #[clap(default_value = "levenshtein")]
    pub metric: DistanceMetric,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("calibrate")))]
#[command(arg_required_else_help(true))]
pub struct CalibrateArgs {
    #[clap(required = true)]
    #[clap(short = 't')]
    #[clap(long = "template")]
    #[clap(help = "Single-record FASTA with the unmodified template")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub template_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'q')]
    #[clap(long = "query")]
    #[clap(help = "Sequence of the insert")]
    #[clap(value_name = "QUERY")]
    #[arg(value_parser = check_query)]
    pub query: String,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "flank-len")]
    #[clap(value_name = "FLANK_LEN")]
    #[clap(help = "Length of context reported on each side of the template match")]
    #[clap(default_value_t = DEFAULT_FLANK_LEN)]
    #[arg(value_parser = flank_in_range)]
    pub flank_len: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "metric")]
    #[clap(value_name = "METRIC")]
    #[clap(help = "Window distance (levenshtein or hamming)")]
    #[clap(default_value = "levenshtein")]
    pub metric: DistanceMetric,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn flank_in_range(s: &str) -> Result<usize> {
    let flank_len: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid flank length", s))?;
    if flank_len >= 1 {
        Ok(flank_len)
    } else {
        Err("Flank length must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn check_query(s: &str) -> Result<String> {
    let seq = parse_sequence(s)?;
    Ok(String::from_utf8_lossy(&seq).into_owned())
}
