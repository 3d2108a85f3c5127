//! IP lens types
//!
//! `RawIpInfo` is whatever ipinfo.io returned; `IpRecord` is the enriched,
//! fully-populated record handed to renderers, history and export. Field
//! declaration order is the serialization order.
//!
//! The source's own sub-objects (`asn`, `company`, `carrier`, `privacy`,
//! `abuse`, `domains`) are kept as raw JSON so that whatever ipinfo.io sends,
//! including fields and value types not listed here, survives to the export.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Fabricated sub-records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpecs {
    pub cidr: String,
    pub netmask: String,
    pub broadcast: String,
    pub gateway: String,
    pub dns_servers: Vec<String>,
    pub ipv6_support: bool,
    pub protocols: Vec<String>,
    pub mtu: u32,
    pub speed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Round-trip latency in milliseconds
    pub latency: u32,
    pub packet_loss: f64,
    pub jitter: f64,
    pub bandwidth: String,
    pub quality_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityIntel {
    pub reputation_score: u32,
    pub blacklisted: bool,
    pub malware_detected: bool,
    pub phishing_detected: bool,
    pub spam_source: bool,
    pub bot_detected: bool,
    pub last_seen_malicious: String,
    pub threat_types: Vec<String>,
    pub confidence_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographyDetail {
    pub continent: String,
    pub country_code: String,
    pub region_code: String,
    pub metro_code: String,
    pub area_code: String,
    pub accuracy_radius: u32,
    pub elevation: u32,
    pub population: u64,
    pub gdp_per_capita: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IspDetail {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tier: u8,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub peering_policy: String,
    pub traffic_ratio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceDetail {
    pub gdpr_applicable: bool,
    pub data_retention_period: String,
    pub privacy_policy_url: String,
    pub terms_of_service_url: String,
    pub jurisdiction: String,
    pub regulatory_body: String,
}

// =============================================================================
// Records
// =============================================================================

/// Decoded ipinfo.io response before enrichment
///
/// Every field is optional; unknown top-level keys are kept in `extra` and
/// carried into the enriched record untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIpInfo {
    pub ip: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub loc: Option<String>,
    pub org: Option<String>,
    pub postal: Option<String>,
    pub timezone: Option<String>,
    pub hostname: Option<String>,
    pub anycast: Option<bool>,
    pub bogon: Option<bool>,
    pub asn: Option<Value>,
    pub company: Option<Value>,
    pub carrier: Option<Value>,
    pub privacy: Option<Value>,
    pub abuse: Option<Value>,
    pub domains: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A complete lookup result
///
/// Produced once by enrichment and never mutated afterwards; sessions share it
/// behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpRecord {
    pub ip: String,
    pub city: String,
    pub region: String,
    pub country: String,
    /// "lat,lon" as returned by the source
    pub loc: String,
    pub org: String,
    pub postal: String,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anycast: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bogon: Option<bool>,
    /// Source `asn` object, or a synthesized one when the source had none
    pub asn: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abuse: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Value>,
    pub network: NetworkSpecs,
    pub performance: PerformanceMetrics,
    pub security: SecurityIntel,
    pub geography: GeographyDetail,
    pub isp: IspDetail,
    pub compliance: ComplianceDetail,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IpRecord {
    /// "City, Country" as shown in history listings
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    /// Reputation below 60 is flagged as risky in history listings
    pub fn is_risky(&self) -> bool {
        self.security.reputation_score < 60
    }

    /// AS number, e.g. `"AS15169"`; empty when the source `asn` has none
    pub fn asn_id(&self) -> &str {
        self.asn.get("asn").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn asn_name(&self) -> &str {
        self.asn.get("name").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn uses_vpn(&self) -> bool {
        self.privacy
            .as_ref()
            .and_then(|p| p.get("vpn"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// `privacy.risk_score` when the source sent a numeric one
    pub fn privacy_risk(&self) -> Option<f64> {
        self.privacy.as_ref()?.get("risk_score")?.as_f64()
    }
}

/// Which enrichment profile a lookup uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupKind {
    /// The caller's own public address; biased toward clean results
    SelfLookup,
    /// A user-supplied address
    Address,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::SelfLookup => write!(f, "self"),
            LookupKind::Address => write!(f, "address"),
        }
    }
}

/// Reputation band used by the text renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReputationLevel {
    Good,
    Fair,
    Poor,
}

impl ReputationLevel {
    pub fn from_score(score: u32) -> Self {
        if score > 80 {
            ReputationLevel::Good
        } else if score > 60 {
            ReputationLevel::Fair
        } else {
            ReputationLevel::Poor
        }
    }
}

impl std::fmt::Display for ReputationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReputationLevel::Good => write!(f, "good"),
            ReputationLevel::Fair => write!(f, "fair"),
            ReputationLevel::Poor => write!(f, "poor"),
        }
    }
}

/// Privacy risk band used by the text renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            RiskLevel::Low
        } else if score < 70.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}
