// stdlib types
pub(crate) use std::{
  collections::{BTreeMap, BTreeSet, HashMap},
  env,
  ffi::OsString,
  fmt::{self, Display, Formatter},
  fs::{self, File},
  io::{self, BufRead, BufReader, Read, Write},
  net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
  num::ParseIntError,
  path::{Path, PathBuf},
  str::FromStr,
  sync::{Arc, Mutex, RwLock},
  thread,
  time::Duration,
};

// dependencies
pub(crate) use log::{debug, info, warn, LevelFilter};
pub(crate) use rand::Rng;
pub(crate) use snafu::{ResultExt, Snafu};
pub(crate) use strum_macros::{EnumString, IntoStaticStr};
pub(crate) use structopt::StructOpt;

// modules
pub(crate) use crate::{consts, error, peer};

// traits
pub(crate) use crate::invariant::Invariant;

// structs and enums
pub(crate) use crate::{
  arguments::Arguments,
  chunk_id::ChunkId,
  config::{PeerConfig, TrackerConfig},
  connection::Connection,
  endpoint::PeerEndpoint,
  error::Error,
  event_log::EventLog,
  manifest::Manifest,
  message::{Command, Message},
  options::Options,
  peer::Peer,
  registry::Registry,
  store::Store,
  subcommand::Subcommand,
  tracker::Tracker,
};

// type aliases
pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

// constants
pub(crate) const EXIT_FAILURE: i32 = 1;

// test stdlib types
#[cfg(test)]
pub(crate) use std::{
  net::Ipv4Addr,
  sync::atomic::{AtomicUsize, Ordering},
};

// test dependencies
#[cfg(test)]
pub(crate) use tempfile::TempDir;

// test modules
#[cfg(test)]
pub(crate) use crate::testing;
