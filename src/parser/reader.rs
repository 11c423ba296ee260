use std::io::{self, Read};

use super::error::{Error, ErrorKind};

/// Length-bounded delimited token reader over a blocking transport.
///
/// Reads one byte at a time, consuming exactly the bytes a field needs, with
/// a single byte of pushback for header boundary detection. Suspension and
/// timeout are properties of the underlying transport, configured on the
/// socket itself.
pub(crate) struct TokenReader<'a> {
    io: &'a mut dyn Read,
    peeked: Option<u8>,
}

impl std::fmt::Debug for TokenReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenReader").field("peeked", &self.peeked).finish()
    }
}

impl<'a> TokenReader<'a> {
    pub(crate) fn new(io: &'a mut dyn Read) -> Self {
        Self { io, peeked: None }
    }

    /// Read the next byte.
    pub(crate) fn next(&mut self) -> Result<u8, Error> {
        if let Some(byte) = self.peeked.take() {
            return Ok(byte);
        }

        let mut byte = [0u8; 1];

        loop {
            return match self.io.read(&mut byte) {
                Ok(0) => Err(ErrorKind::UnexpectedEof.into()),
                Ok(_) => Ok(byte[0]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => Err(ErrorKind::Io(err).into()),
            };
        }
    }

    /// Push one byte back, it is returned by the next [`next`][Self::next].
    pub(crate) fn unread(&mut self, byte: u8) {
        debug_assert!(self.peeked.is_none());
        self.peeked = Some(byte);
    }

    /// Read a token terminated by `delim`.
    ///
    /// Every byte before the delimiter must pass `valid` and the token may
    /// not exceed `max` bytes. The delimiter is consumed and not included.
    pub(crate) fn token(
        &mut self,
        delim: u8,
        max: usize,
        valid: fn(u8) -> bool,
    ) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(16);

        loop {
            let byte = self.next()?;

            if byte == delim {
                return Ok(buf);
            }
            if !valid(byte) {
                return Err(ErrorKind::InvalidByte.into());
            }
            if buf.len() >= max {
                return Err(ErrorKind::FieldTooLong.into());
            }

            buf.push(byte);
        }
    }

    /// Read a token terminated by CRLF or a bare LF.
    ///
    /// A CR anywhere else is an invalid separator, obsolete line folding is
    /// not unfolded.
    pub(crate) fn line(&mut self, max: usize, valid: fn(u8) -> bool) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(16);

        loop {
            let byte = self.next()?;

            match byte {
                b'\n' => return Ok(buf),
                b'\r' => {
                    return match self.next()? {
                        b'\n' => Ok(buf),
                        _ => Err(ErrorKind::InvalidSeparator.into()),
                    };
                }
                byte if !valid(byte) => return Err(ErrorKind::InvalidByte.into()),
                _ if buf.len() >= max => return Err(ErrorKind::FieldTooLong.into()),
                byte => buf.push(byte),
            }
        }
    }

    /// Fill `buf` completely from the transport.
    pub(crate) fn read_full(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if buf.is_empty() {
            return Ok(());
        }

        match self.peeked.take() {
            Some(byte) => {
                buf[0] = byte;
                self.io.read_exact(&mut buf[1..])
            }
            None => self.io.read_exact(buf),
        }
    }
}
