use crate::common::*;

#[derive(StructOpt, Debug)]
#[structopt(about(consts::ABOUT))]
pub(crate) struct Arguments {
  #[structopt(flatten)]
  options: Options,
  #[structopt(subcommand)]
  subcommand: Subcommand,
}

impl Arguments {
  pub(crate) fn parse<I>(args: I) -> Result<Self>
  where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
  {
    Self::from_iter_safe(args).context(error::Clap)
  }

  pub(crate) fn run(self) -> Result<()> {
    self.subcommand.run(&self.options)
  }
}
