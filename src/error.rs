use std::io;
use std::path::PathBuf;

/// Every way obtaining or showing a certificate can fail. None of these are
/// recovered from; `main` reports them and exits with status 1.
#[derive(Debug, thiserror::Error)]
pub enum CertError {
    #[error("no certificate source given: pass -file <path> or -domain <host>")]
    MissingSource,

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("certificate decoding error: {0}")]
    PemDecode(String),

    #[error(
        "certificate decoding error: {len} unexpected byte(s) after the PEM block in {}",
        path.display()
    )]
    TrailingData { path: PathBuf, len: usize },

    #[error("failed to parse certificate: {0}")]
    Parse(String),

    #[error("TLS connection failed: could not connect to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("TLS connection failed: handshake with {addr} failed: {reason}")]
    Tls { addr: String, reason: String },

    #[error("error fetching certs from {addr}: peer presented no certificates")]
    NoPeerCertificates { addr: String },

    #[error("terminal UI failed")]
    Ui(#[from] io::Error),
}
