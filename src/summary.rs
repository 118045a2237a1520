use chrono::{DateTime, Utc};
use x509_parser::prelude::*;

use crate::error::CertError;
use crate::util::{common_name, dns_names, format_timestamp, public_key_algorithm_name, to_utc};

/// The handful of attributes shown for a certificate. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertSummary {
    pub subject_cn: String,
    pub issuer_cn: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub public_key_algorithm: String,
    pub dns_names: Vec<String>,
}

impl CertSummary {
    /// Parse a DER certificate. Bytes left over after the certificate are rejected.
    pub fn from_der(der: &[u8]) -> Result<Self, CertError> {
        let (rest, cert) =
            X509Certificate::from_der(der).map_err(|e| CertError::Parse(e.to_string()))?;
        if !rest.is_empty() {
            return Err(CertError::Parse(format!(
                "{} trailing byte(s) after certificate",
                rest.len()
            )));
        }
        Self::from_x509(&cert)
    }

    pub fn from_x509(cert: &X509Certificate<'_>) -> Result<Self, CertError> {
        let validity = cert.validity();
        Ok(CertSummary {
            subject_cn: common_name(cert.subject()),
            issuer_cn: common_name(cert.issuer()),
            not_before: to_utc(validity.not_before)?,
            not_after: to_utc(validity.not_after)?,
            public_key_algorithm: public_key_algorithm_name(&cert.public_key().algorithm.algorithm),
            dns_names: dns_names(cert)?,
        })
    }

    pub fn dns_names_joined(&self) -> String {
        self.dns_names.join(",")
    }

    /// Ordered (title, description) pairs as displayed in the list.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Issued To", self.subject_cn.clone()),
            ("Issued By", self.issuer_cn.clone()),
            ("Issued On", format_timestamp(&self.not_before)),
            ("Expires On", format_timestamp(&self.not_after)),
            ("Public Key Algorithm", self.public_key_algorithm.clone()),
            ("Subject Alternative Names (DNS)", self.dns_names_joined()),
        ]
    }
}
