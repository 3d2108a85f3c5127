#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! ipscope - IPv4 address intelligence lookups
//!
//! ipscope looks up an IPv4 address (or your own public address) on
//! ipinfo.io and enriches the answer with network, performance, security,
//! geography, ISP and compliance detail. Most of the enriched fields are
//! synthesized placeholders drawn from fixed ranges; only the identity fields
//! come from the lookup service. It can be used as both a command-line
//! application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting | `tabled`, `json_to_table` |
//! | `cli` | CLI binary with interactive session | `display` + `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`lens`]**: lookup logic and output formatting
//!   - `ip::validate`: IPv4 input validation
//!   - `ip::client`: ipinfo.io client behind the `IpInfoSource` trait
//!   - `ip::enrich`: record enrichment with an injected random source
//!   - `ip::history`: bounded, deduplicated lookup history
//!   - `ip::export`: JSON export artifacts
//!   - `ip::session`: single-flight lookup session tying the above together
//! - **[`config`]**: configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ipscope::lens::ip::{IpLens, IpLookupArgs};
//!
//! let lens = IpLens::new();
//! let record = lens.lookup(&IpLookupArgs::new("8.8.8.8"))?;
//! println!("{}", lens.format_summary(&record));
//!
//! if let Some(artifact) = lens.session().export_current()? {
//!     artifact.write_to(std::path::Path::new("."))?;
//! }
//! ```
//!
//! Enrichment can be made reproducible by seeding the session:
//!
//! ```rust,ignore
//! use ipscope::lens::ip::{IpLens, IpinfoClient, LookupSession};
//!
//! let session = LookupSession::with_seed(Box::new(IpinfoClient::new()), 42);
//! let lens = IpLens::with_session(session);
//! ```

pub mod config;
pub mod lens;

pub use config::IpscopeConfig;

pub use lens::ip::{
    enrich, export, validate_address, ExportArtifact, ExportError, HistoryStore, IpLens,
    IpLookupArgs, IpRecord, LookupError, LookupKind, LookupSession, RawIpInfo, ValidationError,
};
pub use lens::utils::OutputFormat;
