//! JSON export of a lookup result

use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

use super::error::ExportError;
use super::types::IpRecord;

/// A serialized record ready to be handed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// `ip-info-<ip>-<YYYY-MM-DD>.json`
    pub file_name: String,
    /// Pretty-printed JSON, keys in record declaration order
    pub body: String,
}

impl ExportArtifact {
    /// Write the artifact into `dir`, creating it if needed. Returns the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.body.as_bytes())?;
        info!("exported {} to {}", self.file_name, path.display());
        Ok(path)
    }
}

/// Export a record using today's UTC date in the file name
pub fn export(record: &IpRecord) -> Result<ExportArtifact, ExportError> {
    export_on(record, Utc::now().date_naive())
}

pub fn export_on(record: &IpRecord, date: NaiveDate) -> Result<ExportArtifact, ExportError> {
    Ok(ExportArtifact {
        file_name: export_file_name(&record.ip, date),
        body: serde_json::to_string_pretty(record)?,
    })
}

pub fn export_file_name(ip: &str, date: NaiveDate) -> String {
    format!("ip-info-{}-{}.json", ip, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::ip::enrich::enrich;
    use crate::lens::ip::client::decode_body;
    use crate::lens::ip::types::{LookupKind, RawIpInfo};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::{json, Value};

    fn sample_record() -> IpRecord {
        let mut raw = RawIpInfo {
            ip: Some("8.8.8.8".to_string()),
            hostname: Some("dns.google".to_string()),
            city: Some("Mountain View".to_string()),
            region: Some("California".to_string()),
            country: Some("US".to_string()),
            loc: Some("37.4056,-122.0775".to_string()),
            org: Some("AS15169 Google LLC".to_string()),
            postal: Some("94043".to_string()),
            timezone: Some("America/Los_Angeles".to_string()),
            anycast: Some(true),
            carrier: Some(json!({
                "name": "Example Mobile",
                "mcc": "310",
                "mnc": "410"
            })),
            ..Default::default()
        };
        raw.extra
            .insert("readme".to_string(), Value::String("https://ipinfo.io".to_string()));
        enrich(&raw, LookupKind::Address, &mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let artifact = export_on(&sample_record(), date).unwrap();
        assert_eq!(artifact.file_name, "ip-info-8.8.8.8-2024-03-07.json");
    }

    #[test]
    fn test_export_round_trip() {
        let record = sample_record();
        let artifact = export(&record).unwrap();
        let decoded: IpRecord = serde_json::from_str(&artifact.body).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_round_trip_with_colliding_source_keys() {
        let body = r#"{
            "ip": "1.2.3.4",
            "org": "AS64500 Example",
            "network": "src-net",
            "security": {"note": "source"},
            "domains": {"ip": "1.2.3.4", "page": 0, "total": 0, "domains": []}
        }"#;
        let raw = decode_body(body).unwrap();
        let record = enrich(&raw, LookupKind::Address, &mut StdRng::seed_from_u64(8));
        let artifact = export(&record).unwrap();

        assert_eq!(artifact.body.matches("\"network\":").count(), 1);
        assert_eq!(artifact.body.matches("\"security\":").count(), 1);
        let decoded: IpRecord = serde_json::from_str(&artifact.body).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.domains.unwrap()["page"], 0);
    }

    #[test]
    fn test_key_order_follows_declaration() {
        let artifact = export(&sample_record()).unwrap();
        let body = &artifact.body;
        let order = [
            "\"ip\"",
            "\"city\"",
            "\"region\"",
            "\"country\"",
            "\"loc\"",
            "\"org\"",
            "\"postal\"",
            "\"timezone\"",
            "\"hostname\"",
            "\"anycast\"",
            "\"asn\"",
            "\"carrier\"",
            "\"network\"",
            "\"performance\"",
            "\"security\"",
            "\"geography\"",
            "\"isp\"",
            "\"compliance\"",
            "\"readme\"",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|key| body.find(key).unwrap_or_else(|| panic!("missing {key}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(body.starts_with("{\n  \"ip\": \"8.8.8.8\""));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let artifact = export_on(&sample_record(), date).unwrap();
        let path = artifact.write_to(&dir.path().join("exports")).unwrap();
        assert!(path.ends_with("ip-info-8.8.8.8-2025-01-02.json"));
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, artifact.body);
    }
}
