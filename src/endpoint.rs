use crate::common::*;

/// Address at which a peer serves chunk requests. On the wire an endpoint
/// occupies two consecutive fields, `host,port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PeerEndpoint {
  host: String,
  port: u16,
}

impl PeerEndpoint {
  pub(crate) fn new(host: impl Into<String>, port: u16) -> Self {
    Self {
      host: host.into(),
      port,
    }
  }

  pub(crate) fn from_fields(host: &str, port: &str) -> Result<Self> {
    let port = port
      .trim()
      .parse::<u16>()
      .context(error::PortParse { text: port })?;

    Ok(Self::new(host.trim(), port))
  }

  /// `host,port`, as the endpoint appears inside a message.
  pub(crate) fn wire_fields(&self) -> String {
    format!("{}{}{}", self.host, consts::FIELD_SEPARATOR, self.port)
  }

  pub(crate) fn connect(&self, timeout: Duration) -> Result<Connection> {
    Connection::connect(self.to_string(), timeout).context(error::PeerConnect {
      endpoint: self.clone(),
    })
  }
}

impl Display for PeerEndpoint {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}:{}", self.host, self.port)
  }
}
