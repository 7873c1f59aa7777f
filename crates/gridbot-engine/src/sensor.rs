//! Hardware sensor ingestion.
//!
//! The sensor reports hits as a line-oriented text stream. Each line is
//! either a bare decimal cell index (`"4"`) or a two-field comma form whose
//! second field is the index (`"SENSOR,4"`). Lines are trimmed of
//! `\r`, `\n`, spaces, and tabs; blank lines are skipped.
//!
//! [`SensorFeed`] turns that stream into [`Sensor`](CommandSource::Sensor)
//! commands on an injected [`CommandHandle`]. Bytes come either from
//! [`feed()`](SensorFeed::feed) or from a background reader thread started
//! with [`spawn_reader()`](SensorFeed::spawn_reader) and drained without
//! blocking by [`poll()`](SensorFeed::poll). Bad lines are logged and
//! dropped; the stream keeps going.

use std::io::{ErrorKind, Read};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use gridbot_core::{CellIndex, CommandSource, RejectReason, SensorError};

use crate::router::CommandHandle;

/// Capacity of the channel between the reader thread and the feed.
const CHUNK_QUEUE_CAPACITY: usize = 64;

/// Bytes requested per read from the sensor source.
const READ_BUFFER_SIZE: usize = 256;

/// Longest unterminated line kept while waiting for its `\n`.
pub const MAX_LINE_BYTES: usize = 1024;

/// Bytes of a discarded line quoted in its error.
const DISCARDED_PREVIEW_BYTES: usize = 32;

/// Back-off after a read that timed out or would block.
const READ_RETRY_DELAY: Duration = Duration::from_millis(1);

fn is_sensor_whitespace(c: char) -> bool {
    matches!(c, '\r' | '\n' | ' ' | '\t')
}

/// Parse one sensor line.
///
/// Returns `Ok(None)` for a blank line and `Ok(Some(index))` for a parsed
/// hit. The index is not range-checked here and may be negative.
///
/// ```
/// use gridbot_engine::parse_sensor_line;
///
/// assert_eq!(parse_sensor_line("4\r\n"), Ok(Some(4)));
/// assert_eq!(parse_sensor_line("SENSOR,7"), Ok(Some(7)));
/// assert_eq!(parse_sensor_line("  "), Ok(None));
/// assert!(parse_sensor_line("SENSOR").is_err());
/// ```
pub fn parse_sensor_line(line: &str) -> Result<Option<i64>, SensorError> {
    let line = line.trim_matches(is_sensor_whitespace);
    if line.is_empty() {
        return Ok(None);
    }
    if let Ok(value) = line.parse::<i64>() {
        return Ok(Some(value));
    }
    let mut fields = line.split(',');
    if let (Some(_label), Some(value), None) = (fields.next(), fields.next(), fields.next()) {
        if let Ok(value) = value.trim_matches(is_sensor_whitespace).parse::<i64>() {
            return Ok(Some(value));
        }
    }
    Err(SensorError::Malformed {
        line: line.to_owned(),
    })
}

/// Accumulates raw bytes and yields complete `\n`-terminated lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes.
    ///
    /// If the trailing unterminated line grows past [`MAX_LINE_BYTES`] it is
    /// discarded and reported as `Malformed`. Complete lines already
    /// buffered are kept.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), SensorError> {
        self.bytes.extend_from_slice(chunk);
        let tail_start = self
            .bytes
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        if self.bytes.len() - tail_start <= MAX_LINE_BYTES {
            return Ok(());
        }
        let tail = self.bytes.split_off(tail_start);
        let preview = &tail[..DISCARDED_PREVIEW_BYTES.min(tail.len())];
        Err(SensorError::Malformed {
            line: format!("{}...", String::from_utf8_lossy(preview)),
        })
    }

    /// Remove and return the next complete line, without its terminator.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; such lines then fail
    /// to parse.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.bytes.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.bytes.drain(..=end).collect();
        Some(String::from_utf8_lossy(&line[..end]).into_owned())
    }

    /// Bytes of the trailing incomplete line.
    pub fn pending(&self) -> usize {
        self.bytes.len()
    }
}

/// Connection state and counters of a [`SensorFeed`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SensorStatus {
    /// Whether a reader thread is attached and still running.
    pub connected: bool,
    /// Most recent successfully parsed index, in range or not.
    pub last_index: Option<i64>,
    /// Complete lines seen, blank ones included.
    pub lines: u64,
    /// Hits submitted to the command handle.
    pub submitted: u64,
    /// Lines that failed to parse.
    pub parse_failures: u64,
    /// Parsed indices outside the grid.
    pub out_of_range: u64,
    /// In-range hits the command handle refused.
    pub dropped: u64,
}

/// Turns a sensor byte stream into move commands.
#[derive(Debug)]
pub struct SensorFeed {
    handle: CommandHandle,
    buffer: LineBuffer,
    chunks: Option<Receiver<Vec<u8>>>,
    reader: Option<JoinHandle<()>>,
    status: SensorStatus,
}

impl SensorFeed {
    /// A feed submitting through `handle`.
    pub fn new(handle: CommandHandle) -> Self {
        Self {
            handle,
            buffer: LineBuffer::new(),
            chunks: None,
            reader: None,
            status: SensorStatus::default(),
        }
    }

    /// Connection state and counters.
    pub fn status(&self) -> &SensorStatus {
        &self.status
    }

    /// Read `source` on a background thread until it reaches EOF or fails.
    ///
    /// Replaces any previously attached reader; the old thread is detached.
    pub fn spawn_reader<R>(&mut self, source: R) -> Result<(), SensorError>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = bounded(CHUNK_QUEUE_CAPACITY);
        let reader = thread::Builder::new()
            .name("gridbot-sensor".into())
            .spawn(move || read_loop(source, tx))
            .map_err(|e| SensorError::ReaderSpawnFailed {
                reason: e.to_string(),
            })?;
        self.chunks = Some(rx);
        self.reader = Some(reader);
        self.status.connected = true;
        log::info!("sensor reader connected");
        Ok(())
    }

    /// Process every chunk the reader thread has delivered so far.
    ///
    /// Never blocks. Returns the number of hits submitted.
    pub fn poll(&mut self) -> usize {
        let mut submitted = 0;
        loop {
            let Some(chunks) = &self.chunks else {
                return submitted;
            };
            match chunks.try_recv() {
                Ok(chunk) => submitted += self.feed_bytes(&chunk),
                Err(TryRecvError::Empty) => return submitted,
                Err(TryRecvError::Disconnected) => {
                    self.disconnect();
                    return submitted;
                }
            }
        }
    }

    /// Process a chunk of sensor text. Returns the number of hits submitted.
    pub fn feed(&mut self, chunk: &str) -> usize {
        self.feed_bytes(chunk.as_bytes())
    }

    /// Handle one complete line.
    ///
    /// Returns the submitted cell, `Ok(None)` for a blank line, or the
    /// reason the line was dropped. Every drop is also logged.
    pub fn handle_line(&mut self, line: &str) -> Result<Option<CellIndex>, SensorError> {
        self.status.lines += 1;
        let value = match parse_sensor_line(line) {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.status.parse_failures += 1;
                log::warn!("{e}");
                return Err(e);
            }
        };
        self.status.last_index = Some(value);

        let cell_count = self.handle.cell_count();
        let target = match u32::try_from(value) {
            Ok(v) if (v as usize) < cell_count => CellIndex(v),
            _ => {
                self.status.out_of_range += 1;
                let e = SensorError::OutOfRange { value, cell_count };
                log::warn!("{e}");
                return Err(e);
            }
        };

        match self.handle.request_move(target, CommandSource::Sensor) {
            Ok(()) => {
                self.status.submitted += 1;
                log::debug!("sensor hit on cell {target}");
                Ok(Some(target))
            }
            Err(RejectReason::NotConfigured) => {
                self.status.dropped += 1;
                log::warn!("{}", SensorError::NotConfigured);
                Err(SensorError::NotConfigured)
            }
            Err(reason) => {
                self.status.dropped += 1;
                let e = SensorError::Rejected { reason };
                log::warn!("{e}");
                Err(e)
            }
        }
    }

    fn feed_bytes(&mut self, chunk: &[u8]) -> usize {
        if log::log_enabled!(log::Level::Trace) {
            let raw = String::from_utf8_lossy(chunk);
            log::trace!("raw sensor chunk: '{}'", raw.escape_debug());
        }
        let overflow = self.buffer.push(chunk);
        let mut submitted = 0;
        while let Some(line) = self.buffer.next_line() {
            if let Ok(Some(_)) = self.handle_line(&line) {
                submitted += 1;
            }
        }
        if let Err(e) = overflow {
            self.status.parse_failures += 1;
            log::warn!("{e} (no newline within {MAX_LINE_BYTES} bytes)");
        }
        submitted
    }

    fn disconnect(&mut self) {
        self.chunks = None;
        self.status.connected = false;
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                log::warn!("sensor reader thread panicked");
            }
        }
        log::warn!("sensor stream closed");
    }
}

fn read_loop<R: Read>(mut source: R, tx: Sender<Vec<u8>>) {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    loop {
        match source.read(&mut buf) {
            Ok(0) => return,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    return;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                thread::sleep(READ_RETRY_DELAY);
            }
            Err(e) => {
                log::warn!("sensor read failed: {e}");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::CommandRouter;
    use std::io::Cursor;
    use std::time::Instant;

    // ── Parsing ─────────────────────────────────────────────────

    #[test]
    fn parses_bare_integers() {
        assert_eq!(parse_sensor_line("0"), Ok(Some(0)));
        assert_eq!(parse_sensor_line("\t 12 \r\n"), Ok(Some(12)));
        assert_eq!(parse_sensor_line("-3"), Ok(Some(-3)));
    }

    #[test]
    fn parses_two_field_form() {
        assert_eq!(parse_sensor_line("SENSOR,4"), Ok(Some(4)));
        assert_eq!(parse_sensor_line("PAD, 2"), Ok(Some(2)));
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_sensor_line(""), Ok(None));
        assert_eq!(parse_sensor_line(" \r\n"), Ok(None));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        for bad in ["hello", "SENSOR", "SENSOR,x", "A,1,2", "99999999999999999999"] {
            assert!(
                matches!(parse_sensor_line(bad), Err(SensorError::Malformed { .. })),
                "{bad}"
            );
        }
    }

    // ── Line buffering ──────────────────────────────────────────

    #[test]
    fn line_buffer_joins_split_chunks() {
        let mut b = LineBuffer::new();
        b.push(b"SEN").unwrap();
        assert_eq!(b.next_line(), None);
        b.push(b"SOR,3\r\n4\n5").unwrap();
        assert_eq!(b.next_line().as_deref(), Some("SENSOR,3\r"));
        assert_eq!(b.next_line().as_deref(), Some("4"));
        assert_eq!(b.next_line(), None);
        assert_eq!(b.pending(), 1);
    }

    #[test]
    fn line_buffer_discards_overlong_partial_line() {
        let mut b = LineBuffer::new();
        b.push(b"7\n").unwrap();
        b.push(&[b'9'; MAX_LINE_BYTES]).unwrap();
        let err = b.push(b"9").unwrap_err();
        assert!(matches!(err, SensorError::Malformed { .. }));
        // The complete line survives; the runaway tail does not.
        assert_eq!(b.next_line().as_deref(), Some("7"));
        assert_eq!(b.pending(), 0);
        b.push(b"3\n").unwrap();
        assert_eq!(b.next_line().as_deref(), Some("3"));
    }

    #[test]
    fn feed_recovers_after_stream_without_newlines() {
        let router = CommandRouter::new(8, 9);
        let mut feed = SensorFeed::new(router.handle());
        let junk = "x".repeat(MAX_LINE_BYTES + 1);
        assert_eq!(feed.feed(&junk), 0);
        assert_eq!(feed.status().parse_failures, 1);
        assert_eq!(feed.feed("2\n"), 1);
        assert_eq!(router.drain()[0].target, CellIndex(2));
    }

    // ── Feed ────────────────────────────────────────────────────

    #[test]
    fn feed_submits_valid_hits_and_counts_failures() {
        let router = CommandRouter::new(8, 9);
        let mut feed = SensorFeed::new(router.handle());
        let n = feed.feed("4\nbogus\nSENSOR,12\n\nSENSOR,1\n");
        assert_eq!(n, 2);

        let drained = router.drain();
        let targets: Vec<_> = drained.iter().map(|c| c.target).collect();
        assert_eq!(targets, vec![CellIndex(4), CellIndex(1)]);
        assert!(drained.iter().all(|c| c.source == CommandSource::Sensor));

        let s = feed.status();
        assert_eq!(s.lines, 5);
        assert_eq!(s.submitted, 2);
        assert_eq!(s.parse_failures, 1);
        assert_eq!(s.out_of_range, 1);
        assert_eq!(s.last_index, Some(1));
    }

    #[test]
    fn negative_index_is_out_of_range() {
        let router = CommandRouter::new(8, 4);
        let mut feed = SensorFeed::new(router.handle());
        assert_eq!(
            feed.handle_line("-1"),
            Err(SensorError::OutOfRange {
                value: -1,
                cell_count: 4
            })
        );
    }

    #[test]
    fn full_queue_drops_hit() {
        let router = CommandRouter::new(1, 4);
        let mut feed = SensorFeed::new(router.handle());
        assert_eq!(feed.handle_line("1"), Ok(Some(CellIndex(1))));
        assert_eq!(
            feed.handle_line("2"),
            Err(SensorError::Rejected {
                reason: RejectReason::QueueFull { capacity: 1 }
            })
        );
        assert_eq!(feed.status().dropped, 1);
    }

    #[test]
    fn dropped_board_is_not_configured() {
        let router = CommandRouter::new(4, 4);
        let mut feed = SensorFeed::new(router.handle());
        drop(router);
        assert_eq!(feed.handle_line("1"), Err(SensorError::NotConfigured));
    }

    // ── Reader thread ───────────────────────────────────────────

    #[test]
    fn reader_thread_delivers_then_disconnects() {
        let router = CommandRouter::new(8, 9);
        let mut feed = SensorFeed::new(router.handle());
        feed.spawn_reader(Cursor::new(b"3\nSENSOR,5\n".to_vec()))
            .unwrap();
        assert!(feed.status().connected);

        let deadline = Instant::now() + Duration::from_secs(5);
        while feed.status().connected && Instant::now() < deadline {
            feed.poll();
            thread::sleep(Duration::from_millis(1));
        }
        assert!(!feed.status().connected);
        assert_eq!(feed.status().submitted, 2);
        assert_eq!(router.pending(), 2);
    }
}
