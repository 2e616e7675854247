// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use vid_compare::app::{self, paths, Flags};
use vid_compare::ui::compare::Sources;

const USAGE: &str = "\
Usage: vid_compare [OPTIONS] ORIGINAL COMPRESSED

Options:
  --lang <LANG>         Interface language (e.g. en-US, fr)
  --config-dir <DIR>    Directory holding settings.toml
  -h, --help            Print this help";

fn main() -> iced::Result {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,vid_compare=info"),
    )
    .format_timestamp_millis()
    .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("{USAGE}");
        return Ok(());
    }

    let lang: Option<String> = args.opt_value_from_str("--lang").unwrap_or_else(|err| {
        log::warn!("ignoring --lang: {err}");
        None
    });
    let config_dir: Option<String> =
        args.opt_value_from_str("--config-dir").unwrap_or_else(|err| {
            log::warn!("ignoring --config-dir: {err}");
            None
        });

    let mut files = args.finish().into_iter().map(PathBuf::from);
    let sources = match (files.next(), files.next()) {
        (Some(original), Some(compressed)) => Some(Sources {
            original,
            compressed,
        }),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    paths::init_cli_overrides(config_dir);
    if let Err(err) = vid_compare::media::init_ffmpeg() {
        log::error!("{err}");
    }

    app::run(Flags { lang, sources })
}
