use crate::common::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
pub(crate) enum Command {
  #[strum(serialize = "LOCAL_CHUNKS")]
  LocalChunks,
  #[strum(serialize = "WHERE_CHUNK")]
  WhereChunk,
  #[strum(serialize = "GET_CHUNK_FROM")]
  GetChunkFrom,
  #[strum(serialize = "CHUNK_LOCATION_UNKNOWN")]
  ChunkLocationUnknown,
  #[strum(serialize = "REQUEST_CHUNK")]
  RequestChunk,
}

impl Command {
  pub(crate) fn name(self) -> &'static str {
    self.into()
  }

  fn expect_fields(self, arguments: &[&str], expected: usize) -> Result<()> {
    if arguments.len() == expected {
      Ok(())
    } else {
      Err(Error::MessageFieldCount {
        command: self.name(),
        expected,
        actual: arguments.len(),
      })
    }
  }
}

/// One line of the swarm protocol. Peers send `LocalChunks` and `WhereChunk`
/// to the tracker, which answers `WhereChunk` with `GetChunkFrom` or
/// `ChunkLocationUnknown`. `RequestChunk` is sent peer to peer, and is
/// answered with raw chunk bytes rather than a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Message {
  LocalChunks {
    chunk: ChunkId,
    endpoint: PeerEndpoint,
  },
  WhereChunk {
    chunk: ChunkId,
  },
  GetChunkFrom {
    chunk: ChunkId,
    endpoints: Vec<PeerEndpoint>,
  },
  ChunkLocationUnknown {
    chunk: ChunkId,
  },
  RequestChunk {
    chunk: ChunkId,
  },
}

impl Message {
  pub(crate) fn command(&self) -> Command {
    match self {
      Self::LocalChunks { .. } => Command::LocalChunks,
      Self::WhereChunk { .. } => Command::WhereChunk,
      Self::GetChunkFrom { .. } => Command::GetChunkFrom,
      Self::ChunkLocationUnknown { .. } => Command::ChunkLocationUnknown,
      Self::RequestChunk { .. } => Command::RequestChunk,
    }
  }
}

impl FromStr for Message {
  type Err = Error;

  fn from_str(line: &str) -> Result<Self> {
    let line = line.trim();

    if line.is_empty() {
      return Err(Error::MessageEmpty);
    }

    let mut fields = line.split(consts::FIELD_SEPARATOR);

    let head = fields
      .next()
      .invariant_unwrap("split always yields at least one field");

    let command = head
      .parse::<Command>()
      .map_err(|_| Error::MessageUnknownCommand {
        command: head.to_owned(),
      })?;

    let arguments = fields.collect::<Vec<&str>>();

    match command {
      Command::LocalChunks => {
        command.expect_fields(&arguments, 3)?;
        Ok(Self::LocalChunks {
          chunk: arguments[0].parse()?,
          endpoint: PeerEndpoint::from_fields(arguments[1], arguments[2])?,
        })
      }
      Command::WhereChunk => {
        command.expect_fields(&arguments, 1)?;
        Ok(Self::WhereChunk {
          chunk: arguments[0].parse()?,
        })
      }
      Command::ChunkLocationUnknown => {
        command.expect_fields(&arguments, 1)?;
        Ok(Self::ChunkLocationUnknown {
          chunk: arguments[0].parse()?,
        })
      }
      Command::RequestChunk => {
        command.expect_fields(&arguments, 1)?;
        Ok(Self::RequestChunk {
          chunk: arguments[0].parse()?,
        })
      }
      Command::GetChunkFrom => {
        if arguments.len() < 3 || arguments.len() % 2 == 0 {
          return Err(Error::MessageEndpointList { line: line.into() });
        }

        let endpoints = arguments[1..]
          .chunks(2)
          .map(|pair| PeerEndpoint::from_fields(pair[0], pair[1]))
          .collect::<Result<Vec<PeerEndpoint>>>()?;

        Ok(Self::GetChunkFrom {
          chunk: arguments[0].parse()?,
          endpoints,
        })
      }
    }
  }
}

impl Display for Message {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.command().name())?;

    match self {
      Self::LocalChunks { chunk, endpoint } => {
        write!(f, ",{},{}", chunk, endpoint.wire_fields())
      }
      Self::GetChunkFrom { chunk, endpoints } => {
        write!(f, ",{}", chunk)?;
        for endpoint in endpoints {
          write!(f, ",{}", endpoint.wire_fields())?;
        }
        Ok(())
      }
      Self::WhereChunk { chunk }
      | Self::ChunkLocationUnknown { chunk }
      | Self::RequestChunk { chunk } => write!(f, ",{}", chunk),
    }
  }
}
