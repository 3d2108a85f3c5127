use clap::Args;
use ipscope::lens::ip::{IpLens, IpLookupArgs};
use ipscope::{export, IpscopeConfig, OutputFormat};
use tracing::debug;

use super::{print_error, write_export};

/// Arguments for the Lookup command
#[derive(Args)]
pub struct LookupArgs {
    #[clap(flatten)]
    pub lookup: IpLookupArgs,

    /// Export the result as JSON, optionally into DIR (default: configured export_dir)
    #[clap(short, long, value_name = "DIR", num_args = 0..=1)]
    pub export: Option<Option<String>>,
}

pub fn run(
    config: &IpscopeConfig,
    args: LookupArgs,
    output_format: OutputFormat,
    seed: Option<u64>,
) -> bool {
    let LookupArgs { lookup, export: export_to } = args;
    let lens = IpLens::from_config(config, seed);

    let record = match lens.lookup(&lookup) {
        Ok(r) => r,
        Err(e) => {
            debug!("lookup failed: {}", e);
            print_error(&e.user_message(lookup.ip.is_none()), output_format);
            return false;
        }
    };

    if lookup.simple {
        println!("{}", record.ip);
    } else {
        println!("{}", lens.format_result(&record, output_format));
    }

    if let Some(dir) = export_to {
        let artifact = match export(&record) {
            Ok(a) => a,
            Err(e) => {
                print_error(&e.to_string(), output_format);
                return false;
            }
        };
        return write_export(&artifact, dir.as_deref(), config);
    }

    true
}
