//! Record enrichment
//!
//! Turns a partial [`RawIpInfo`] into a complete [`IpRecord`] by synthesizing
//! the network, performance, security, geography, ISP and compliance
//! sub-records. The random source is passed in so callers (and tests) decide
//! whether values are reproducible.
//!
//! Two profiles exist: [`ADDRESS_PROFILE`] for user-supplied addresses and
//! [`SELF_PROFILE`] for the caller's own address, which draws from narrower,
//! cleaner ranges and never raises a security flag.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::json;
use std::ops::Range;

use super::types::*;

/// Placeholder ASN used when the organization string is missing
pub const UNKNOWN_ASN: &str = "AS0000";

const DNS_SERVERS: &[&str] = &["8.8.8.8", "8.8.4.4"];
const PROTOCOLS: &[&str] = &["IPv4", "IPv6", "TCP", "UDP"];
const THREAT_TYPES: &[&str] = &["Spam", "Malware"];
const LAST_MALICIOUS_DATE: &str = "2024-01-15";
const NEVER: &str = "Never";

/// Top-level keys owned by the synthesized sub-records. A source key with one
/// of these names is replaced, not kept alongside.
pub const FABRICATED_KEYS: &[&str] = &[
    "network",
    "performance",
    "security",
    "geography",
    "isp",
    "compliance",
];

/// Per-field generation policy
///
/// Integer ranges are half-open. A single-element option list or a one-wide
/// range pins the field to a fixed value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentProfile {
    pub ipv6_probability: f64,
    pub speeds: &'static [&'static str],

    pub latency_ms: Range<u32>,
    pub packet_loss: Range<f64>,
    pub jitter: Range<f64>,
    pub bandwidths: &'static [&'static str],
    pub quality_score: Range<u32>,

    pub reputation_score: Range<u32>,
    pub blacklisted_probability: f64,
    pub malware_probability: f64,
    pub phishing_probability: f64,
    pub spam_probability: f64,
    pub bot_probability: f64,
    pub malicious_sighting_probability: f64,
    pub threat_types_probability: f64,
    pub confidence_levels: &'static [&'static str],

    pub metro_code: Range<u32>,
    pub area_code: Range<u32>,
    pub accuracy_radius: Range<u32>,
    pub elevation: Range<u32>,
    pub population: Range<u64>,
    pub gdp_per_capita: Range<u64>,

    pub isp_types: &'static [&'static str],
    pub isp_tier: Range<u8>,
    pub peering_policies: &'static [&'static str],
    pub traffic_ratios: &'static [&'static str],

    pub gdpr_probability: f64,
    pub retention_periods: &'static [&'static str],
}

/// Profile for user-supplied addresses
pub static ADDRESS_PROFILE: EnrichmentProfile = EnrichmentProfile {
    ipv6_probability: 0.7,
    speeds: &["100 Mbps", "1 Gbps", "10 Gbps"],

    latency_ms: 10..110,
    packet_loss: 0.0..0.5,
    jitter: 0.0..10.0,
    bandwidths: &["50 Mbps", "100 Mbps", "500 Mbps", "1 Gbps"],
    quality_score: 60..100,

    reputation_score: 50..100,
    blacklisted_probability: 0.10,
    malware_probability: 0.05,
    phishing_probability: 0.03,
    spam_probability: 0.08,
    bot_probability: 0.15,
    malicious_sighting_probability: 0.1,
    threat_types_probability: 0.1,
    confidence_levels: &["Low", "Medium", "High"],

    metro_code: 100..1000,
    area_code: 100..1000,
    accuracy_radius: 10..110,
    elevation: 0..1000,
    population: 50_000..1_050_000,
    gdp_per_capita: 30_000..80_000,

    isp_types: &["Tier 1", "Tier 2", "Tier 3"],
    isp_tier: 1..4,
    peering_policies: &["Open", "Selective", "Restrictive"],
    traffic_ratios: &["Balanced", "Mostly Outbound", "Mostly Inbound"],

    gdpr_probability: 0.7,
    retention_periods: &["1 year", "2 years", "5 years"],
};

/// Profile for the caller's own address
pub static SELF_PROFILE: EnrichmentProfile = EnrichmentProfile {
    ipv6_probability: 1.0,
    speeds: &["1 Gbps"],

    latency_ms: 10..60,
    packet_loss: 0.0..0.1,
    jitter: 0.0..5.0,
    bandwidths: &["100 Mbps"],
    quality_score: 70..100,

    reputation_score: 70..100,
    blacklisted_probability: 0.0,
    malware_probability: 0.0,
    phishing_probability: 0.0,
    spam_probability: 0.0,
    bot_probability: 0.0,
    malicious_sighting_probability: 0.0,
    threat_types_probability: 0.0,
    confidence_levels: &["High"],

    metro_code: 807..808,
    area_code: 415..416,
    accuracy_radius: 50..51,
    elevation: 52..53,
    population: 883_305..883_306,
    gdp_per_capita: 65_000..65_001,

    isp_types: &["Tier 1"],
    isp_tier: 1..2,
    peering_policies: &["Open"],
    traffic_ratios: &["Balanced"],

    gdpr_probability: 1.0,
    retention_periods: &["2 years"],
};

impl LookupKind {
    pub fn profile(&self) -> &'static EnrichmentProfile {
        match self {
            LookupKind::SelfLookup => &SELF_PROFILE,
            LookupKind::Address => &ADDRESS_PROFILE,
        }
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, options: &[&str]) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Derive the ASN identifier from an ipinfo organization string
/// (`"AS15169 Google LLC"` -> `"AS15169"`).
pub fn asn_from_org(org: Option<&str>) -> String {
    org.and_then(|o| o.split_whitespace().next())
        .unwrap_or(UNKNOWN_ASN)
        .to_string()
}

/// Jurisdiction and regulatory body for a country code
pub fn jurisdiction_for(country: Option<&str>) -> (&'static str, &'static str) {
    if country == Some("US") {
        ("United States", "FCC")
    } else {
        ("European Union", "GDPR Authority")
    }
}

/// Enrich a raw lookup result with the profile for `kind`.
///
/// Total: every fabricated sub-record is populated whatever `raw` contains.
/// Source-provided sub-records, including `asn`, are carried over untouched.
/// Unknown source keys are kept unless they collide with a synthesized one.
pub fn enrich<R: Rng + ?Sized>(raw: &RawIpInfo, kind: LookupKind, rng: &mut R) -> IpRecord {
    let p = kind.profile();
    let org = raw.org.as_deref().filter(|o| !o.is_empty());
    let country = raw.country.as_deref().filter(|c| !c.is_empty());
    let region = raw.region.as_deref().filter(|r| !r.is_empty());

    let asn = raw.asn.clone().unwrap_or_else(|| {
        json!({
            "asn": asn_from_org(org),
            "name": org.unwrap_or("Unknown"),
            "domain": "example.com",
            "route": "0.0.0.0/0",
            "type": "ISP",
            "registry": "ARIN",
            "country": country.unwrap_or("US"),
            "allocated": "2010-01-01",
        })
    });

    let network = NetworkSpecs {
        cidr: "192.168.1.0/24".to_string(),
        netmask: "255.255.255.0".to_string(),
        broadcast: "192.168.1.255".to_string(),
        gateway: "192.168.1.1".to_string(),
        dns_servers: strings(DNS_SERVERS),
        ipv6_support: rng.random_bool(p.ipv6_probability),
        protocols: strings(PROTOCOLS),
        mtu: 1500,
        speed: pick(rng, p.speeds),
    };

    let performance = PerformanceMetrics {
        latency: rng.random_range(p.latency_ms.clone()),
        packet_loss: rng.random_range(p.packet_loss.clone()),
        jitter: rng.random_range(p.jitter.clone()),
        bandwidth: pick(rng, p.bandwidths),
        quality_score: rng.random_range(p.quality_score.clone()),
    };

    let security = SecurityIntel {
        reputation_score: rng.random_range(p.reputation_score.clone()),
        blacklisted: rng.random_bool(p.blacklisted_probability),
        malware_detected: rng.random_bool(p.malware_probability),
        phishing_detected: rng.random_bool(p.phishing_probability),
        spam_source: rng.random_bool(p.spam_probability),
        bot_detected: rng.random_bool(p.bot_probability),
        last_seen_malicious: if rng.random_bool(p.malicious_sighting_probability) {
            LAST_MALICIOUS_DATE.to_string()
        } else {
            NEVER.to_string()
        },
        threat_types: if rng.random_bool(p.threat_types_probability) {
            strings(THREAT_TYPES)
        } else {
            Vec::new()
        },
        confidence_level: pick(rng, p.confidence_levels),
    };

    let geography = GeographyDetail {
        continent: "North America".to_string(),
        country_code: country.unwrap_or("US").to_string(),
        region_code: region.unwrap_or("CA").to_string(),
        metro_code: rng.random_range(p.metro_code.clone()).to_string(),
        area_code: rng.random_range(p.area_code.clone()).to_string(),
        accuracy_radius: rng.random_range(p.accuracy_radius.clone()),
        elevation: rng.random_range(p.elevation.clone()),
        population: rng.random_range(p.population.clone()),
        gdp_per_capita: rng.random_range(p.gdp_per_capita.clone()),
    };

    let isp = IspDetail {
        name: org.unwrap_or("Unknown ISP").to_string(),
        kind: pick(rng, p.isp_types),
        tier: rng.random_range(p.isp_tier.clone()),
        website: "https://example.com".to_string(),
        phone: "+1-800-555-0123".to_string(),
        email: "support@example.com".to_string(),
        peering_policy: pick(rng, p.peering_policies),
        traffic_ratio: pick(rng, p.traffic_ratios),
    };

    let (jurisdiction, regulatory_body) = jurisdiction_for(country);
    let compliance = ComplianceDetail {
        gdpr_applicable: rng.random_bool(p.gdpr_probability),
        data_retention_period: pick(rng, p.retention_periods),
        privacy_policy_url: "https://example.com/privacy".to_string(),
        terms_of_service_url: "https://example.com/terms".to_string(),
        jurisdiction: jurisdiction.to_string(),
        regulatory_body: regulatory_body.to_string(),
    };

    let mut extra = raw.extra.clone();
    for key in FABRICATED_KEYS {
        extra.remove(*key);
    }

    IpRecord {
        ip: raw.ip.clone().unwrap_or_default(),
        city: raw.city.clone().unwrap_or_default(),
        region: raw.region.clone().unwrap_or_default(),
        country: raw.country.clone().unwrap_or_default(),
        loc: raw.loc.clone().unwrap_or_default(),
        org: raw.org.clone().unwrap_or_default(),
        postal: raw.postal.clone().unwrap_or_default(),
        timezone: raw.timezone.clone().unwrap_or_default(),
        hostname: raw.hostname.clone(),
        anycast: raw.anycast,
        bogon: raw.bogon,
        asn,
        company: raw.company.clone(),
        carrier: raw.carrier.clone(),
        privacy: raw.privacy.clone(),
        abuse: raw.abuse.clone(),
        domains: raw.domains.clone(),
        network,
        performance,
        security,
        geography,
        isp,
        compliance,
        extra,
    }
}
