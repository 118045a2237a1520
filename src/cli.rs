use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use crate::error::CertError;

/// Long flags that may also be spelled with a single dash (`-file cert.pem`).
const SINGLE_DASH_FLAGS: [&str; 3] = ["file", "domain", "port"];

#[derive(Parser, Debug)]
#[command(
    name = "certview",
    version,
    about = "Show the key attributes of one X.509 certificate in a terminal list"
)]
pub struct Cli {
    /// Path to the certificate file
    #[arg(long = "file", value_name = "PATH")]
    pub file: Option<String>,

    /// Domain to fetch the certificate from
    #[arg(long = "domain", value_name = "HOST")]
    pub domain: Option<String>,

    /// Port used with --domain
    #[arg(long = "port", default_value_t = 443)]
    pub port: u16,

    /// Increase log verbosity on stderr, can be used multiple times
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse process arguments, accepting Go-style `-file`/`-domain`/`-port`.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite `-file x` and `-file=x` (and the other single-dash long flags) to
/// their `--` form. Everything after a bare `--` is left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let rewritten = arg.to_str().and_then(|s| {
            let body = s.strip_prefix('-').filter(|b| !b.starts_with('-'))?;
            let name = body.split('=').next().unwrap_or(body);
            SINGLE_DASH_FLAGS.contains(&name).then(|| OsString::from(format!("--{body}")))
        });
        out.push(rewritten.unwrap_or(arg));
    }
    out
}

/// Where the certificate comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Domain { host: String, port: u16 },
}

impl Source {
    /// Title shown above the list: the path or the domain as given.
    pub fn header(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Domain { host, .. } => host.clone(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "file {}", path.display()),
            Source::Domain { host, port } => write!(f, "{host}:{port}"),
        }
    }
}

/// Run configuration, assembled once in `main` and passed down by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: Source,
    pub verbosity: u8,
}

impl Config {
    /// Resolve the CLI into a config. A file path takes precedence over a
    /// domain; empty values count as not given.
    pub fn from_cli(cli: Cli) -> Result<Self, CertError> {
        let file = cli.file.filter(|p| !p.is_empty()).map(PathBuf::from);
        let domain = cli.domain.filter(|d| !d.is_empty());
        let source = match (file, domain) {
            (Some(path), _) => Source::File(path),
            (None, Some(host)) => Source::Domain { host, port: cli.port },
            (None, None) => return Err(CertError::MissingSource),
        };
        Ok(Config { source, verbosity: cli.verbose })
    }
}
