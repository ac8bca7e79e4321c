use crate::common::*;

pub(crate) use acquirer::Acquirer;
pub(crate) use in_flight::InFlight;
pub(crate) use responder::Responder;
pub(crate) use tracker_client::{Location, TrackerClient};

mod acquirer;
mod in_flight;
mod responder;
mod tracker_client;

/// A member of the swarm: serves the chunks it holds and acquires the ones
/// it lacks.
#[derive(Debug)]
pub(crate) struct Peer {
  config: PeerConfig,
  store: Arc<Store>,
  events: EventLog,
}

impl Peer {
  pub(crate) fn new(config: PeerConfig) -> Result<Self> {
    let store = Store::open(&config.folder)?;
    let events = EventLog::open(&config.name, config.log_file.as_deref())?;

    info!(
      "{}: holding {} of {} chunks",
      config.name,
      store.held().len(),
      store.total()
    );

    Ok(Self {
      config,
      store: Arc::new(store),
      events,
    })
  }

  /// Start serving, acquire every missing chunk, then keep serving forever.
  pub(crate) fn run(self, options: &Options) -> Result<()> {
    let responder = Responder::bind(&self.config, self.store.clone())?;

    let endpoint = PeerEndpoint::new(self.config.host.clone(), responder.local_addr()?.port());

    if !options.quiet {
      println!("{} serving chunks on {}", self.config.name, endpoint);
    }

    let responder = responder.spawn();

    Acquirer::new(self.config, self.store, endpoint, self.events).run();

    if !options.quiet {
      println!("All chunks acquired. Continuing to serve requests...");
    }

    responder.join().map_err(|_| Error::ResponderPanic)?
  }
}
