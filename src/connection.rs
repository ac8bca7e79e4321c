use crate::common::*;

/// A TCP stream framed as newline-terminated command lines, with access to
/// the raw byte stream for chunk payloads.
#[derive(Debug)]
pub(crate) struct Connection {
  reader: BufReader<TcpStream>,
  writer: TcpStream,
  peer: SocketAddr,
}

impl Connection {
  pub(crate) fn new(stream: TcpStream) -> io::Result<Self> {
    let peer = stream.peer_addr()?;
    let writer = stream.try_clone()?;

    Ok(Self {
      reader: BufReader::new(stream),
      writer,
      peer,
    })
  }

  /// Connect to every address `target` resolves to in turn, returning the
  /// first connection that succeeds. Reads and writes on the resulting
  /// connection time out after `timeout`.
  pub(crate) fn connect(target: impl ToSocketAddrs, timeout: Duration) -> io::Result<Self> {
    let mut last_error = None;

    for address in target.to_socket_addrs()? {
      match TcpStream::connect_timeout(&address, timeout) {
        Ok(stream) => {
          stream.set_read_timeout(Some(timeout))?;
          stream.set_write_timeout(Some(timeout))?;
          return Self::new(stream);
        }
        Err(error) => last_error = Some(error),
      }
    }

    Err(last_error.unwrap_or_else(|| {
      io::Error::new(
        io::ErrorKind::AddrNotAvailable,
        "address resolved to nothing",
      )
    }))
  }

  pub(crate) fn peer(&self) -> SocketAddr {
    self.peer
  }

  pub(crate) fn set_timeout(&self, timeout: Duration) -> Result<()> {
    self
      .writer
      .set_read_timeout(Some(timeout))
      .context(error::Network)?;
    self
      .writer
      .set_write_timeout(Some(timeout))
      .context(error::Network)
  }

  pub(crate) fn send(&mut self, message: &Message) -> Result<()> {
    let mut frame = message.to_string().into_bytes();
    frame.push(consts::FRAME_DELIMITER);
    self.write_all(&frame)
  }

  pub(crate) fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
    self.writer.write_all(bytes).context(error::Network)?;
    self.writer.flush().context(error::Network)
  }

  /// Read the next line, without its delimiter. Returns `None` at end of
  /// stream. A final line that is not newline-terminated is still returned.
  /// Invalid UTF-8 is replaced rather than rejected, so that the line fails
  /// message parsing like any other malformed input.
  ///
  /// Lines longer than `MAX_LINE_LENGTH` are rejected.
  pub(crate) fn recv_line(&mut self) -> Result<Option<String>> {
    let mut buffer = Vec::new();

    let read = self
      .reader
      .by_ref()
      .take(consts::MAX_LINE_LENGTH as u64 + 1)
      .read_until(consts::FRAME_DELIMITER, &mut buffer)
      .context(error::Network)?;

    if read == 0 {
      return Ok(None);
    }

    if buffer.last() == Some(&consts::FRAME_DELIMITER) {
      buffer.pop();
    } else if buffer.len() > consts::MAX_LINE_LENGTH {
      return Err(Error::LineTooLong {
        limit: consts::MAX_LINE_LENGTH,
      });
    }

    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
  }

  /// Read and parse the next message, skipping blank lines.
  pub(crate) fn recv(&mut self) -> Result<Option<Message>> {
    loop {
      match self.recv_line()? {
        None => return Ok(None),
        Some(line) if line.trim().is_empty() => continue,
        Some(line) => return line.parse().map(Some),
      }
    }
  }

  /// Read everything until the remote end closes the connection.
  pub(crate) fn recv_to_end(&mut self) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    self
      .reader
      .read_to_end(&mut bytes)
      .context(error::Network)?;
    Ok(bytes)
  }

  /// Signal end of stream to the remote end.
  pub(crate) fn finish(&mut self) -> Result<()> {
    self
      .writer
      .shutdown(Shutdown::Write)
      .context(error::Network)
  }
}
