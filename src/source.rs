use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use std::fs;
use std::net::TcpStream;
use std::path::Path;
use tracing::{debug, info};
use x509_parser::pem::parse_x509_pem;

use crate::cli::Source;
use crate::error::CertError;

/// Fetch the DER bytes of the certificate named by `source`.
pub fn obtain_der(source: &Source) -> Result<Vec<u8>, CertError> {
    match source {
        Source::File(path) => read_pem_file(path),
        Source::Domain { host, port } => fetch_leaf(host, *port),
    }
}

pub fn read_pem_file(path: &Path) -> Result<Vec<u8>, CertError> {
    let data = fs::read(path).map_err(|source| CertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = data.len(), "read certificate file");
    decode_single_pem(path, &data)
}

/// Decode exactly one PEM block. Text before the BEGIN line is skipped; any
/// byte after the END line is an error.
pub fn decode_single_pem(path: &Path, data: &[u8]) -> Result<Vec<u8>, CertError> {
    let (rest, pem) = parse_x509_pem(data).map_err(|e| CertError::PemDecode(e.to_string()))?;
    if !rest.is_empty() {
        return Err(CertError::TrailingData {
            path: path.to_path_buf(),
            len: rest.len(),
        });
    }
    debug!(label = %pem.label, der_len = pem.contents.len(), "decoded PEM block");
    Ok(pem.contents)
}

/// Handshake with `host:port` without verifying the server and return the
/// leaf certificate of the presented chain.
///
/// The stream is owned by this function, so the connection is closed on
/// every return path.
pub fn fetch_leaf(host: &str, port: u16) -> Result<Vec<u8>, CertError> {
    let addr = format!("{}:{}", host, port);
    let tls_err = |reason: String| CertError::Tls {
        addr: addr.clone(),
        reason,
    };

    info!(%addr, "connecting");
    let tcp = TcpStream::connect((host, port)).map_err(|source| CertError::Connect {
        addr: addr.clone(),
        source,
    })?;

    let mut builder = SslConnector::builder(SslMethod::tls()).map_err(|e| tls_err(e.to_string()))?;
    // Invalid certificates are exactly what we want to look at.
    builder.set_verify(SslVerifyMode::NONE);
    let connector = builder.build();
    let mut config = connector.configure().map_err(|e| tls_err(e.to_string()))?;
    config.set_verify_hostname(false);

    // SNI is skipped by openssl when `host` is an IP literal.
    let mut stream = config.connect(host, tcp).map_err(|e| tls_err(e.to_string()))?;

    let leaf = {
        let chain = stream.ssl().peer_cert_chain();
        debug!(%addr, chain_len = chain.map(|c| c.len()).unwrap_or(0), "handshake complete");
        match chain.and_then(|c| c.iter().next()) {
            Some(cert) => cert.to_der().map_err(|e| CertError::Parse(e.to_string()))?,
            None => return Err(CertError::NoPeerCertificates { addr }),
        }
    };

    if let Err(e) = stream.shutdown() {
        debug!(%addr, error = %e, "TLS shutdown failed");
    }
    Ok(leaf)
}
