//! Child output relay.
//!
//! Reads the merged stdout/stderr pipe in fixed-size chunks and copies every
//! byte that was actually read to a sink, flushing after each chunk so the
//! child's output appears as it is produced.

use std::io::{self, ErrorKind, Read, Write};

use tracing::{debug, warn};

/// Maximum bytes requested per read.
pub const CHUNK_SIZE: usize = 1024;

/// Lazy, finite sequence of chunks read from a stream.
///
/// Each chunk borrows the internal buffer, which is reused across reads. The
/// sequence ends at end-of-stream or after handing out the first read error.
/// Once ended it never reads again.
pub struct Chunks<R> {
    reader: R,
    buf: Box<[u8]>,
    done: bool,
}

impl<R: Read> Chunks<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, CHUNK_SIZE)
    }

    fn with_capacity(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            buf: vec![0; chunk_size.max(1)].into_boxed_slice(),
            done: false,
        }
    }

    /// Read the next chunk: exactly the bytes returned by one read.
    pub fn next_chunk(&mut self) -> Option<io::Result<&[u8]>> {
        if self.done {
            return None;
        }
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(n) => return Some(Ok(&self.buf[..n])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Summary of a finished relay.
#[derive(Debug, Default)]
pub struct RelayStats {
    /// Bytes copied to the sink.
    pub bytes: u64,
    /// Non-empty reads performed.
    pub reads: u64,
    /// Read fault that ended the relay early, if any. A clean end-of-stream leaves this `None`.
    pub read_error: Option<io::Error>,
}

/// Copy `reader` to `writer` until end-of-stream or the first read error.
///
/// Read errors end the relay and are recorded in the returned stats. Write
/// errors are returned, since there is nowhere left to put the output.
pub fn relay<R: Read, W: Write>(reader: R, mut writer: W) -> io::Result<RelayStats> {
    let mut stats = RelayStats::default();
    let mut chunks = Chunks::new(reader);
    while let Some(chunk) = chunks.next_chunk() {
        match chunk {
            Ok(bytes) => {
                writer.write_all(bytes)?;
                writer.flush()?;
                stats.reads += 1;
                stats.bytes += bytes.len() as u64;
            }
            Err(e) => {
                warn!(error = %e, bytes = stats.bytes, "Child output stream failed, stopping relay");
                stats.read_error = Some(e);
                break;
            }
        }
    }
    debug!(bytes = stats.bytes, reads = stats.reads, "Relay finished");
    Ok(stats)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    /// Reader that replays a script of read results.
    struct Scripted {
        steps: Vec<io::Result<Vec<u8>>>,
        calls: usize,
    }

    impl Scripted {
        fn new(steps: Vec<io::Result<Vec<u8>>>) -> Self {
            Self { steps, calls: 0 }
        }
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.steps.is_empty() {
                return Ok(0);
            }
            match self.steps.remove(0) {
                Ok(data) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                Err(e) => Err(e),
            }
        }
    }

    /// Sink that refuses every write.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn burst_larger_than_chunk_takes_two_reads() {
        let input = vec![b'x'; 1500];
        let mut out = Vec::new();
        let stats = relay(Cursor::new(input.clone()), &mut out).unwrap();
        assert_eq!(stats.reads, 2);
        assert_eq!(stats.bytes, 1500);
        assert_eq!(out.len(), 1500);
        assert_eq!(out, input);
    }

    #[test]
    fn short_read_emits_no_trailing_bytes() {
        let mut out = Vec::new();
        let stats = relay(Cursor::new(b"hello\n".to_vec()), &mut out).unwrap();
        assert_eq!(out, b"hello\n");
        assert_eq!(stats.reads, 1);
        assert!(stats.read_error.is_none());
    }

    #[test]
    fn stale_buffer_contents_never_leak() {
        let reader = Scripted::new(vec![Ok(vec![b'a'; CHUNK_SIZE]), Ok(b"bc".to_vec())]);
        let mut out = Vec::new();
        relay(reader, &mut out).unwrap();
        assert_eq!(out.len(), CHUNK_SIZE + 2);
        assert!(out.ends_with(b"abc"));
    }

    #[test]
    fn empty_stream_writes_nothing() {
        let mut out = Vec::new();
        let stats = relay(io::empty(), &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.reads, 0);
    }

    #[test]
    fn read_error_stops_without_further_reads() {
        let mut reader = Scripted::new(vec![
            Ok(b"partial".to_vec()),
            Err(io::Error::other("device gone")),
            Ok(b"never".to_vec()),
        ]);
        let mut out = Vec::new();
        let stats = relay(&mut reader, &mut out).unwrap();
        assert_eq!(out, b"partial");
        assert_eq!(reader.calls, 2);
        assert_eq!(stats.read_error.unwrap().to_string(), "device gone");
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let reader = Scripted::new(vec![
            Err(io::Error::from(ErrorKind::Interrupted)),
            Ok(b"ok".to_vec()),
        ]);
        let mut out = Vec::new();
        let stats = relay(reader, &mut out).unwrap();
        assert_eq!(out, b"ok");
        assert!(stats.read_error.is_none());
    }

    #[test]
    fn write_failure_is_returned() {
        let err = relay(Cursor::new(b"data".to_vec()), BrokenPipe).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }

    #[test]
    fn chunks_are_fused_after_error() {
        let mut chunks = Chunks::new(Scripted::new(vec![
            Err(io::Error::other("boom")),
            Ok(b"late".to_vec()),
        ]));
        assert!(chunks.next_chunk().unwrap().is_err());
        assert!(chunks.next_chunk().is_none());
        assert!(chunks.next_chunk().is_none());
    }

    #[test]
    fn chunks_reuse_one_buffer() {
        let mut chunks = Chunks::new(Scripted::new(vec![
            Ok(b"first".to_vec()),
            Ok(b"second!".to_vec()),
        ]));
        let first = chunks.next_chunk().unwrap().unwrap();
        assert_eq!(first, b"first");
        let first_ptr = first.as_ptr();
        let second = chunks.next_chunk().unwrap().unwrap();
        assert_eq!(second, b"second!");
        assert_eq!(second.as_ptr(), first_ptr);
        assert!(chunks.next_chunk().is_none());
    }

    proptest! {
        #[test]
        fn output_equals_input(len in 0usize..4 * CHUNK_SIZE, seed in any::<u8>()) {
            let input: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_add(seed)).collect();
            let mut out = Vec::new();
            let stats = relay(Cursor::new(input.clone()), &mut out).unwrap();
            prop_assert_eq!(stats.bytes, len as u64);
            prop_assert_eq!(stats.reads, len.div_ceil(CHUNK_SIZE) as u64);
            prop_assert_eq!(out, input);
        }
    }
}
