use clap::Args;
use ipscope::lens::ip::{HISTORY_LIMIT, RECENT_DISPLAY_LIMIT};
use ipscope::{IpscopeConfig, OutputFormat};
use serde::Serialize;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also show built-in session limits
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: String,
    #[serde(flatten)]
    settings: &'a IpscopeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    limits: Option<SessionLimits>,
}

#[derive(Debug, Serialize)]
struct SessionLimits {
    history_limit: usize,
    recent_display_limit: usize,
}

pub fn run(config: &IpscopeConfig, args: ConfigArgs, output_format: OutputFormat) -> bool {
    let ConfigArgs { verbose } = args;

    let info = ConfigInfo {
        config_file: IpscopeConfig::config_file_path(),
        settings: config,
        limits: verbose.then_some(SessionLimits {
            history_limit: HISTORY_LIMIT,
            recent_display_limit: RECENT_DISPLAY_LIMIT,
        }),
    };

    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => match serde_json::to_string(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("ERROR: Failed to serialize to JSON: {}", e);
                return false;
            }
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("ERROR: Failed to serialize to JSON: {}", e);
                return false;
            }
        },
        _ => {
            println!("Config File:        {}", info.config_file);
            println!("{}", config.summary());
            if let Some(limits) = &info.limits {
                println!("History Limit:      {}", limits.history_limit);
                println!("Recent Listing:     {}", limits.recent_display_limit);
            }
        }
    }
    true
}
