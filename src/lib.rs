#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::needless_pass_by_value)]

#[cfg(test)]
#[macro_use]
mod assert_matches;

#[cfg(test)]
mod testing;

mod arguments;
mod chunk_id;
mod common;
mod config;
mod connection;
mod consts;
mod endpoint;
mod error;
mod event_log;
mod invariant;
mod manifest;
mod message;
mod options;
mod peer;
mod registry;
mod store;
mod subcommand;
mod tracker;

use crate::common::*;

pub fn run() -> Result<(), i32> {
  let result = Arguments::parse(env::args_os()).and_then(|arguments| {
    init_logging();
    arguments.run()
  });

  if let Err(error) = result {
    if let Error::Clap { source } = &error {
      source.exit();
    }

    eprintln!("error: {}", error);
    return Err(EXIT_FAILURE);
  }

  Ok(())
}

fn init_logging() {
  let mut builder = pretty_env_logger::formatted_timed_builder();

  builder.filter_level(consts::DEFAULT_LOG_LEVEL);

  if let Ok(filters) = env::var("RUST_LOG") {
    builder.parse_filters(&filters);
  }

  if let Err(error) = builder.try_init() {
    eprintln!("warning: failed to initialize logger: {}", error);
  }
}
