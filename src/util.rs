use std::io::{ErrorKind, Read, Result};

/// Reads until `buf` is full or the reader runs dry, returning how many bytes
/// landed in `buf`. Interrupted reads are retried.
///
/// A short count means end of stream; zero means nothing was left at all.
pub(crate) fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
