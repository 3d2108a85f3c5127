//! IP information lookup lens
//!
//! Looks up an IPv4 address (or the caller's own address) on ipinfo.io and
//! enriches the answer into a complete [`IpRecord`]: network specs,
//! performance metrics, security intelligence, geography, ISP and compliance
//! detail are synthesized on every lookup. Results are kept in a bounded
//! session history and can be exported as JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! use ipscope::lens::ip::{IpLens, IpLookupArgs};
//!
//! let lens = IpLens::new();
//!
//! let record = lens.lookup(&IpLookupArgs::new("8.8.8.8"))?;
//! println!("{} -> {}", record.ip, record.asn_id());
//!
//! let artifact = lens.session().export_current()?;
//! ```

pub mod client;
pub mod enrich;
pub mod error;
pub mod export;
pub mod history;
pub mod session;
pub mod types;
pub mod validate;

pub use client::{IpInfoSource, IpinfoClient, IPINFO_API_BASE};
pub use enrich::{enrich, EnrichmentProfile, ADDRESS_PROFILE, SELF_PROFILE};
pub use error::{ExportError, LookupError, ValidationError};
pub use export::{export, export_on, ExportArtifact};
pub use history::{HistoryStore, HISTORY_LIMIT, RECENT_DISPLAY_LIMIT};
pub use session::{BusyGuard, LookupSession};
pub use types::*;
pub use validate::validate_address;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::IpscopeConfig;
use crate::lens::utils::OutputFormat;

// =============================================================================
// Args
// =============================================================================

/// Arguments for IP lookup operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct IpLookupArgs {
    /// IPv4 address to look up (if not provided, looks up your own public IP)
    #[cfg_attr(feature = "cli", clap(value_name = "IP"))]
    pub ip: Option<String>,

    /// Print the IP address only
    #[cfg_attr(feature = "cli", clap(short, long))]
    #[serde(default)]
    pub simple: bool,
}

impl IpLookupArgs {
    /// Create new args for a specific address
    pub fn new(ip: &str) -> Self {
        Self {
            ip: Some(ip.to_string()),
            simple: false,
        }
    }

    /// Create args for the caller's own address
    pub fn public_ip() -> Self {
        Self::default()
    }
}

/// One line of the recent-lookups listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct HistoryRow {
    #[cfg_attr(feature = "display", tabled(rename = "#"))]
    pub index: usize,
    pub ip: String,
    pub location: String,
    pub flags: String,
}

impl HistoryRow {
    pub fn from_record(index: usize, record: &IpRecord) -> Self {
        let mut flags = vec![];
        if record.is_risky() {
            flags.push("Risk");
        }
        if record.uses_vpn() {
            flags.push("VPN");
        }
        Self {
            index,
            ip: record.ip.clone(),
            location: record.location(),
            flags: flags.join(","),
        }
    }
}

/// One field/value pair of the record summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct SummaryRow {
    pub field: String,
    pub value: String,
}

// =============================================================================
// Lens
// =============================================================================

/// IP information lookup lens
///
/// Wraps a [`LookupSession`] and renders its records in the shared output
/// formats.
pub struct IpLens {
    session: LookupSession,
}

impl IpLens {
    /// Lens against the public ipinfo.io endpoint with default settings
    pub fn new() -> Self {
        Self::with_session(LookupSession::new(Box::new(IpinfoClient::new())))
    }

    /// Lens configured from an [`IpscopeConfig`]; `seed` makes enrichment reproducible
    pub fn from_config(config: &IpscopeConfig, seed: Option<u64>) -> Self {
        let client = IpinfoClient::with_options(
            &config.api_base,
            config.api_token.clone(),
            config.timeout(),
        );
        let session = match seed {
            Some(seed) => LookupSession::with_seed(Box::new(client), seed),
            None => LookupSession::new(Box::new(client)),
        };
        Self::with_session(session)
    }

    pub fn with_session(session: LookupSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &LookupSession {
        &self.session
    }

    /// Look up the address in `args`, or the caller's own address when absent
    pub fn lookup(&self, args: &IpLookupArgs) -> Result<Arc<IpRecord>, LookupError> {
        match &args.ip {
            Some(ip) => self.session.lookup_address(ip),
            None => self.session.lookup_self(),
        }
    }

    /// Field/value overview of a record
    pub fn summary_rows(&self, record: &IpRecord) -> Vec<SummaryRow> {
        let mut rows: Vec<(&str, String)> = vec![("IP", record.ip.clone())];
        if let Some(hostname) = &record.hostname {
            rows.push(("Hostname", hostname.clone()));
        }
        rows.push((
            "Location",
            format!("{}, {}, {}", record.city, record.region, record.country),
        ));
        rows.push(("Coordinates", record.loc.clone()));
        rows.push(("Postal", record.postal.clone()));
        rows.push(("Timezone", record.timezone.clone()));
        rows.push(("Organization", record.org.clone()));
        rows.push(("ASN", format!("{} ({})", record.asn_id(), record.asn_name())));
        rows.push((
            "ISP",
            format!("{} ({}, tier {})", record.isp.name, record.isp.kind, record.isp.tier),
        ));
        if record.anycast == Some(true) {
            rows.push(("Anycast", "yes".to_string()));
        }
        if record.bogon == Some(true) {
            rows.push(("Bogon", "yes".to_string()));
        }
        rows.push((
            "Network",
            format!(
                "{} via {}, IPv6 {}",
                record.network.speed,
                record.network.gateway,
                if record.network.ipv6_support { "yes" } else { "no" }
            ),
        ));
        rows.push((
            "Performance",
            format!(
                "{} ms latency, {:.2}% loss, {:.1} ms jitter, quality {}/100",
                record.performance.latency,
                record.performance.packet_loss,
                record.performance.jitter,
                record.performance.quality_score
            ),
        ));
        rows.push((
            "Reputation",
            format!(
                "{}/100 ({})",
                record.security.reputation_score,
                ReputationLevel::from_score(record.security.reputation_score)
            ),
        ));
        rows.push(("Threat flags", security_flags(&record.security)));
        if let Some(risk) = record.privacy_risk() {
            rows.push((
                "Privacy risk",
                format!("{}/100 ({})", risk, RiskLevel::from_score(risk)),
            ));
        }
        rows.push((
            "Jurisdiction",
            format!(
                "{} ({})",
                record.compliance.jurisdiction, record.compliance.regulatory_body
            ),
        ));
        rows.push((
            "GDPR",
            if record.compliance.gdpr_applicable {
                "applicable".to_string()
            } else {
                "not applicable".to_string()
            },
        ));

        rows.into_iter()
            .map(|(field, value)| SummaryRow {
                field: field.to_string(),
                value,
            })
            .collect()
    }

    /// Plain-text overview, one `field: value` per line
    pub fn format_summary(&self, record: &IpRecord) -> String {
        self.summary_rows(record)
            .into_iter()
            .map(|r| format!("{:<14}{}", format!("{}:", r.field), r.value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a record for display
    ///
    /// Note: Table and Markdown formats require the `display` feature. Without
    /// it they fall back to the plain-text summary.
    pub fn format_result(&self, record: &IpRecord, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => {
                #[cfg(feature = "display")]
                {
                    let value = serde_json::json!(record);
                    let mut table = json_to_table::json_to_table(&value);
                    table.collapse();
                    table.to_string()
                }
                #[cfg(not(feature = "display"))]
                {
                    self.format_summary(record)
                }
            }
            OutputFormat::Markdown => {
                #[cfg(feature = "display")]
                {
                    use tabled::settings::Style;
                    use tabled::Table;
                    Table::new(self.summary_rows(record))
                        .with(Style::markdown())
                        .to_string()
                }
                #[cfg(not(feature = "display"))]
                {
                    self.format_summary(record)
                }
            }
            OutputFormat::Json | OutputFormat::JsonLine => {
                serde_json::to_string(record).unwrap_or_default()
            }
            OutputFormat::JsonPretty => serde_json::to_string_pretty(record).unwrap_or_default(),
            OutputFormat::Psv => {
                let mut lines = vec!["field|value".to_string()];
                for row in self.summary_rows(record) {
                    lines.push(format!("{}|{}", row.field, row.value));
                }
                lines.join("\n")
            }
        }
    }

    /// Rows for the recent-lookups listing, numbered from 1
    pub fn history_rows(&self, records: &[Arc<IpRecord>]) -> Vec<HistoryRow> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| HistoryRow::from_record(i + 1, r))
            .collect()
    }

    /// Format history entries for display
    pub fn format_history(&self, records: &[Arc<IpRecord>], format: OutputFormat) -> String {
        if records.is_empty() {
            return "No lookups yet".to_string();
        }
        let rows = self.history_rows(records);
        match format {
            OutputFormat::Table | OutputFormat::Markdown => {
                #[cfg(feature = "display")]
                {
                    use tabled::settings::Style;
                    use tabled::Table;
                    let mut table = Table::new(&rows);
                    if format == OutputFormat::Markdown {
                        table.with(Style::markdown());
                    } else {
                        table.with(Style::rounded());
                    }
                    table.to_string()
                }
                #[cfg(not(feature = "display"))]
                {
                    psv_history(&rows)
                }
            }
            OutputFormat::Json => {
                let list: Vec<&IpRecord> = records.iter().map(|r| r.as_ref()).collect();
                serde_json::to_string(&list).unwrap_or_default()
            }
            OutputFormat::JsonPretty => {
                let list: Vec<&IpRecord> = records.iter().map(|r| r.as_ref()).collect();
                serde_json::to_string_pretty(&list).unwrap_or_default()
            }
            OutputFormat::JsonLine => records
                .iter()
                .map(|r| serde_json::to_string(r.as_ref()).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Psv => psv_history(&rows),
        }
    }
}

impl Default for IpLens {
    fn default() -> Self {
        Self::new()
    }
}

fn psv_history(rows: &[HistoryRow]) -> String {
    let mut lines = vec!["#|ip|location|flags".to_string()];
    for r in rows {
        lines.push(format!("{}|{}|{}|{}", r.index, r.ip, r.location, r.flags));
    }
    lines.join("\n")
}

fn security_flags(security: &SecurityIntel) -> String {
    let flags: Vec<&str> = [
        (security.blacklisted, "blacklisted"),
        (security.malware_detected, "malware"),
        (security.phishing_detected, "phishing"),
        (security.spam_source, "spam"),
        (security.bot_detected, "bot"),
    ]
    .into_iter()
    .filter(|(set, _)| *set)
    .map(|(_, name)| name)
    .collect();

    if flags.is_empty() {
        "none".to_string()
    } else {
        flags.join(", ")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FixedSource;

    impl IpInfoSource for FixedSource {
        fn fetch(&self, target: Option<&str>) -> Result<RawIpInfo, LookupError> {
            Ok(RawIpInfo {
                ip: Some(target.unwrap_or("192.0.2.1").to_string()),
                city: Some("Mountain View".to_string()),
                region: Some("California".to_string()),
                country: Some("US".to_string()),
                org: Some("AS15169 Google LLC".to_string()),
                ..Default::default()
            })
        }
    }

    fn lens() -> IpLens {
        IpLens::with_session(LookupSession::with_seed(Box::new(FixedSource), 8))
    }

    fn risky_record(ip: &str, vpn: bool) -> IpRecord {
        let raw = RawIpInfo {
            ip: Some(ip.to_string()),
            city: Some("Paris".to_string()),
            country: Some("FR".to_string()),
            privacy: Some(serde_json::json!({"vpn": vpn, "risk_score": 75})),
            ..Default::default()
        };
        let mut record = enrich(&raw, LookupKind::Address, &mut StdRng::seed_from_u64(0));
        record.security.reputation_score = 55;
        record
    }

    #[test]
    fn test_lookup_dispatch() {
        let lens = lens();
        let own = lens.lookup(&IpLookupArgs::public_ip()).unwrap();
        assert_eq!(own.ip, "192.0.2.1");
        let other = lens.lookup(&IpLookupArgs::new("8.8.8.8")).unwrap();
        assert_eq!(other.ip, "8.8.8.8");
        assert_eq!(lens.session().history().len(), 2);
        assert!(matches!(
            lens.lookup(&IpLookupArgs::new("not-an-ip")),
            Err(LookupError::Validation(ValidationError::MalformedAddress))
        ));
    }

    #[test]
    fn test_format_summary() {
        let lens = lens();
        let record = lens.lookup(&IpLookupArgs::new("8.8.8.8")).unwrap();
        let text = lens.format_summary(&record);
        assert!(text.contains("8.8.8.8"));
        assert!(text.contains("AS15169"));
        assert!(text.contains("United States (FCC)"));
        assert!(text.contains("Mountain View, California, US"));
    }

    #[test]
    fn test_format_result_json_and_psv() {
        let lens = lens();
        let record = lens.lookup(&IpLookupArgs::new("8.8.8.8")).unwrap();

        let json = lens.format_result(&record, OutputFormat::Json);
        let decoded: IpRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, *record);

        let psv = lens.format_result(&record, OutputFormat::Psv);
        assert!(psv.starts_with("field|value\nIP|8.8.8.8"));
    }

    #[cfg(feature = "display")]
    #[test]
    fn test_format_result_table() {
        let lens = lens();
        let record = lens.lookup(&IpLookupArgs::new("8.8.8.8")).unwrap();
        let table = lens.format_result(&record, OutputFormat::Table);
        assert!(table.contains("8.8.8.8"));
        assert!(table.contains("compliance"));
        assert!(table.contains("AS15169"));

        let markdown = lens.format_result(&record, OutputFormat::Markdown);
        assert!(markdown.contains("| IP "));
    }

    #[test]
    fn test_history_rows_flags() {
        let lens = lens();
        let records = vec![
            Arc::new(risky_record("203.0.113.9", true)),
            Arc::new(risky_record("203.0.113.10", false)),
        ];
        let rows = lens.history_rows(&records);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].flags, "Risk,VPN");
        assert_eq!(rows[1].flags, "Risk");
        assert_eq!(rows[0].location, "Paris, FR");

        let psv = lens.format_history(&records, OutputFormat::Psv);
        assert!(psv.contains("1|203.0.113.9|Paris, FR|Risk,VPN"));
        assert_eq!(lens.format_history(&[], OutputFormat::Table), "No lookups yet");
    }

    #[test]
    fn test_summary_privacy_risk() {
        let lens = lens();
        let text = lens.format_summary(&risky_record("203.0.113.9", true));
        assert!(text.contains("75/100 (high)"));
        assert!(text.contains("55/100 (poor)"));
        assert!(text.contains("European Union (GDPR Authority)"));
    }
}
