use ipscope::lens::ip::{IpLens, HISTORY_LIMIT, RECENT_DISPLAY_LIMIT};
use ipscope::{IpRecord, IpscopeConfig, LookupError, OutputFormat};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::debug;

use super::{print_error, write_export};

const HELP: &str = "\
commands:
  <ipv4>          look up an address
  me              look up your own public IP
  history [all]   show recent lookups (5, or all 10)
  view <n>        show history entry n again
  export [dir]    export the current result as JSON
  help            show this help
  quit            leave the session";

enum Action<'a> {
    Lookup(&'a str),
    LookupSelf,
    History { all: bool },
    View(&'a str),
    Export(Option<&'a str>),
    Help,
    Quit,
}

fn parse_action(line: &str) -> Action<'_> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, Some(r.trim()).filter(|r| !r.is_empty())),
        None => (line, None),
    };
    match cmd.to_lowercase().as_str() {
        "me" | "self" => Action::LookupSelf,
        "history" => Action::History {
            all: rest == Some("all"),
        },
        "view" => Action::View(rest.unwrap_or("")),
        "export" => Action::Export(rest),
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        _ => Action::Lookup(line),
    }
}

fn report(
    lens: &IpLens,
    result: Result<Arc<IpRecord>, LookupError>,
    is_self: bool,
    output_format: OutputFormat,
) {
    match result {
        Ok(record) => println!("{}", lens.format_result(&record, output_format)),
        Err(e) => {
            debug!("lookup failed: {}", e);
            print_error(&e.user_message(is_self), output_format);
        }
    }
}

pub fn run(config: &IpscopeConfig, output_format: OutputFormat, seed: Option<u64>) -> bool {
    let lens = IpLens::from_config(config, seed);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    println!("ipscope session, type 'help' for commands");
    loop {
        print!("ipscope> ");
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("ERROR: failed to read input: {}", e);
                return false;
            }
            None => return true,
        };

        match parse_action(&line) {
            Action::Lookup(input) => report(
                &lens,
                lens.session().lookup_address(input),
                false,
                output_format,
            ),
            Action::LookupSelf => report(&lens, lens.session().lookup_self(), true, output_format),
            Action::History { all } => {
                let limit = if all { HISTORY_LIMIT } else { RECENT_DISPLAY_LIMIT };
                let records = lens.session().recent(limit);
                println!("{}", lens.format_history(&records, output_format));
            }
            Action::View(n) => match n.parse::<usize>().ok().filter(|n| *n >= 1) {
                Some(n) => match lens.session().view(n - 1) {
                    Some(record) => println!("{}", lens.format_result(&record, output_format)),
                    None => print_error(&format!("no history entry {}", n), output_format),
                },
                None => print_error("usage: view <n>", output_format),
            },
            Action::Export(dir) => match lens.session().export_current() {
                Ok(Some(artifact)) => {
                    write_export(&artifact, dir, config);
                }
                Ok(None) => print_error("nothing to export yet", output_format),
                Err(e) => print_error(&e.to_string(), output_format),
            },
            Action::Help => println!("{}", HELP),
            Action::Quit => return true,
        }
    }
}
