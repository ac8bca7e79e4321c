use crate::common::*;

mod share;
mod track;

#[derive(StructOpt, Debug)]
pub(crate) enum Subcommand {
  #[structopt(about("Run the tracker, which records which peers hold which chunks."))]
  Tracker(track::Track),
  #[structopt(about("Join the swarm: serve held chunks and fetch missing ones."))]
  Peer(share::Share),
}

impl Subcommand {
  pub(crate) fn run(self, options: &Options) -> Result<()> {
    match self {
      Self::Tracker(track) => track.run(options),
      Self::Peer(share) => share.run(options),
    }
  }
}
