use crate::common::*;

#[derive(StructOpt, Debug, PartialEq)]
pub(crate) struct Options {
  #[structopt(
    long = "quiet",
    short = "q",
    help = "Suppress status messages on standard output. Log output on standard error is \
            controlled by `RUST_LOG`."
  )]
  pub(crate) quiet: bool,
}
