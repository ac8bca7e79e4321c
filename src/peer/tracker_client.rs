use crate::common::*;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Location {
  Known(Vec<PeerEndpoint>),
  Unknown,
}

/// Peer side of a tracker connection.
#[derive(Debug)]
pub(crate) struct TrackerClient {
  address: String,
  connection: Connection,
}

impl TrackerClient {
  pub(crate) fn connect(address: &str, timeout: Duration) -> Result<Self> {
    let connection =
      Connection::connect(address, timeout).context(error::TrackerConnect { address })?;

    Ok(Self {
      address: address.to_owned(),
      connection,
    })
  }

  /// Tell the tracker that `endpoint` holds `chunk`. The tracker does not
  /// reply.
  pub(crate) fn announce(&mut self, chunk: ChunkId, endpoint: &PeerEndpoint) -> Result<()> {
    self.connection.send(&Message::LocalChunks {
      chunk,
      endpoint: endpoint.clone(),
    })
  }

  pub(crate) fn locate(&mut self, chunk: ChunkId) -> Result<Location> {
    self.connection.send(&Message::WhereChunk { chunk })?;

    let response = self
      .connection
      .recv()?
      .ok_or_else(|| Error::TrackerClosed {
        address: self.address.clone(),
      })?;

    match response {
      Message::GetChunkFrom {
        chunk: located,
        endpoints,
      } if located == chunk => Ok(Location::Known(endpoints)),
      Message::ChunkLocationUnknown { chunk: located } if located == chunk => Ok(Location::Unknown),
      response => Err(Error::TrackerResponse { chunk, response }),
    }
  }
}
