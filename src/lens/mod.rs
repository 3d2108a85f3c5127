//! Lens module
//!
//! A lens bundles an operation with the formatting of its results so the same
//! logic can back the CLI, a REPL session, or a library caller.
//!
//! | Lens | Module | Dependencies |
//! |------|--------|--------------|
//! | `IpLens` | [`ip`] | ureq, rand, regex |
//!
//! Table rendering needs the `display` feature (tabled, json_to_table);
//! without it, table formats fall back to plain text.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ipscope::lens::ip::{IpLens, IpLookupArgs};
//! use ipscope::lens::utils::OutputFormat;
//!
//! let lens = IpLens::new();
//! let record = lens.lookup(&IpLookupArgs::public_ip())?;
//! println!("{}", lens.format_result(&record, OutputFormat::JsonPretty));
//! ```

pub mod utils;

// IpLens - IPv4 lookup, enrichment, history and export
pub mod ip;
