//! csum - print checksums of files or standard input.
//!
//! Run with:
//!     cargo run -- -a crc64 Cargo.toml -

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};
use tracing_subscriber::EnvFilter;

use csum::{ComputeConfig, ComputeState, CsumError, Flags, Linear, Pipe, Registry};

/// Print or verify checksums.
///
/// With no SOURCE, or when SOURCE is -, read standard input.
#[derive(Parser, Debug)]
#[command(name = "csum", version, disable_version_flag = true)]
struct Cli {
    /// Select the digest type to use. See DIGEST below.
    #[arg(short, long, value_name = "TYPE", default_value = "crc32")]
    algorithm: String,

    /// Algorithm private parameter, such as a CRC seed.
    #[arg(short, long, value_name = "ARGS")]
    parameter: Option<String>,

    /// End each output line with NUL, not newline, and disable source name
    /// decoration.
    #[arg(short, long)]
    zero: bool,

    /// Reject malformed parameters instead of degrading them.
    #[arg(long)]
    strict: bool,

    /// Transfer buffer size for standard input.
    #[arg(long, value_name = "BYTES", default_value_t = csum::DEFAULT_PIPE_BUFFER_SIZE)]
    buffer_size: usize,

    /// List available digest types and exit.
    #[arg(long)]
    list: bool,

    /// Files to checksum.
    #[arg(value_name = "SOURCE")]
    sources: Vec<String>,
}

impl Cli {
    fn flags(&self) -> Flags {
        let mut flags = Flags::empty();
        flags.set(Flags::STRICT, self.strict);
        flags.set(Flags::ZERO_TERMINATED, self.zero);
        flags
    }
}

fn main() -> ExitCode {
    init_tracing();

    let registry = csum::global();
    let matches = Cli::command()
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Output version information and exit"),
        )
        .after_help(algorithm_listing(registry))
        .get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if cli.list {
        eprint!("{}", algorithm_listing(registry));
        return ExitCode::SUCCESS;
    }

    let config = ComputeConfig::default().with_pipe_buffer_size(cli.buffer_size);
    if let Err(e) = config.validate() {
        eprintln!("csum: {e}");
        return ExitCode::FAILURE;
    }

    let sources = if cli.sources.is_empty() {
        vec!["-".to_owned()]
    } else {
        cli.sources.clone()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut status = ExitCode::SUCCESS;

    for source in &sources {
        match checksum_source(registry, &cli, &config, source) {
            Ok(record) => {
                if let Err(e) = record.write_to(&mut out) {
                    eprintln!("csum: {e}");
                    return ExitCode::FAILURE;
                }
            }
            Err(e @ CsumError::UnknownAlgorithm { .. }) => {
                eprintln!("csum: {e}\n\n{}", algorithm_listing(registry));
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("csum: {source}: {e}");
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}

/// One output line: the digest of a source and how it was computed.
#[derive(Debug)]
struct Record<'a> {
    algorithm: &'a str,
    parameter: Option<&'a str>,
    flags: Flags,
    source: &'a str,
    size: u64,
    digest: String,
}

impl Record<'_> {
    fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let Self {
            algorithm,
            source,
            size,
            digest,
            ..
        } = self;

        if self.flags.contains(Flags::ZERO_TERMINATED) {
            write!(out, "{digest} {size} {source}\0")
        } else if let Some(parameter) = self.parameter {
            writeln!(out, "{algorithm} [{parameter}]: ({source} {size}) = {digest}")
        } else {
            writeln!(out, "{algorithm}: ({source} {size}) = {digest}")
        }
    }
}

/// Checksums one source.
fn checksum_source<'a>(
    registry: &Registry,
    cli: &'a Cli,
    config: &ComputeConfig,
    source: &'a str,
) -> Result<Record<'a>, CsumError> {
    let mut ctx = registry.prepare(&cli.algorithm, cli.parameter.as_deref(), cli.flags())?;

    let (digest, size) = if source == "-" {
        Pipe::compute(&mut ctx, io::stdin().lock(), config)?
    } else {
        let mut state = ComputeState::new(Linear::new(std::fs::read(source)?));
        let digest = ctx.compute(&mut state)?;
        (digest, state.offset())
    };

    let record = Record {
        algorithm: &cli.algorithm,
        parameter: cli.parameter.as_deref(),
        flags: ctx.flags(),
        source,
        size,
        digest,
    };
    ctx.destroy();
    Ok(record)
}

/// Formats the registered algorithms for help output, in registration order.
fn algorithm_listing(registry: &Registry) -> String {
    let mut listing = String::from("DIGEST determines the digest algorithm and output format:\n");
    for algo in registry.algorithms() {
        let line = match algo.description() {
            Some(desc) => format!("  {:<16} - {desc}\n", algo.name()),
            None => format!("  {}\n", algo.name()),
        };
        listing.push_str(&line);
    }
    listing
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
