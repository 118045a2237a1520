use chrono::{DateTime, Utc};
use x509_parser::der_parser::asn1_rs::Tag;
use x509_parser::der_parser::oid::Oid;
use x509_parser::prelude::*;

use crate::error::CertError;

/// Common name of an X.509 name. When several CN attributes are present the
/// last one wins; an absent or undecodable CN yields an empty string.
pub fn common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .filter_map(attribute_string)
        .last()
        .unwrap_or_default()
}

/// Attribute value as UTF-8. `as_str` covers the 8-bit string types; BMPString
/// (UTF-16BE) and UniversalString (UTF-32BE) are decoded here.
pub fn attribute_string(attr: &AttributeTypeAndValue<'_>) -> Option<String> {
    if let Ok(s) = attr.as_str() {
        return Some(s.to_string());
    }
    let value = attr.attr_value();
    match value.header.tag() {
        Tag::BmpString => decode_utf16_be(value.data),
        Tag::UniversalString => decode_utf32_be(value.data),
        _ => None,
    }
}

fn decode_utf16_be(data: &[u8]) -> Option<String> {
    if data.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

fn decode_utf32_be(data: &[u8]) -> Option<String> {
    if data.len() % 4 != 0 {
        return None;
    }
    data.chunks_exact(4)
        .map(|c| char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]])))
        .collect()
}

/// Short display name for a SubjectPublicKeyInfo algorithm OID.
pub fn public_key_algorithm_name(oid: &Oid<'_>) -> String {
    let id = oid.to_id_string();
    match id.as_str() {
        "1.2.840.113549.1.1.1" => "RSA".to_string(),
        "1.2.840.10040.4.1" => "DSA".to_string(),
        "1.2.840.10045.2.1" => "ECDSA".to_string(),
        "1.3.101.112" => "Ed25519".to_string(),
        _ => id,
    }
}

/// DNS entries of the subjectAltName extension, in certificate order.
/// Other SAN types are skipped. A malformed or duplicated extension is an error.
pub fn dns_names(cert: &X509Certificate<'_>) -> Result<Vec<String>, CertError> {
    let san = cert
        .subject_alternative_name()
        .map_err(|e| CertError::Parse(format!("subjectAltName: {e}")))?;
    let Some(san) = san else {
        return Ok(Vec::new());
    };
    Ok(san
        .value
        .general_names
        .iter()
        .filter_map(|gn| match gn {
            GeneralName::DNSName(dns) => Some(dns.to_string()),
            _ => None,
        })
        .collect())
}

pub fn to_utc(time: ASN1Time) -> Result<DateTime<Utc>, CertError> {
    let ts = time.timestamp();
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| CertError::Parse(format!("validity time out of range: {ts}")))
}

/// `2024-03-01 12:00:00 +0000 UTC`
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S %z UTC").to_string()
}
