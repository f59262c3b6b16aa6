//! Command dispatch loop
//!
//! Bytes from the host accumulate in the input buffer. A line feed
//! completes the line: it is parsed, handed to the matching session
//! operation, answered with one response line, and the input buffer is
//! reset. Carriage returns are dropped wherever they appear. Bytes beyond
//! the input capacity are dropped too, so an overlong line is processed
//! truncated rather than rejected.
//!
//! The read timeout doubles as the scroll tick: the timer only advances
//! while the link is idle, and never while a command is being handled.

use core::convert::Infallible;

use marquee_hal::{SerialRx, SerialTx};
use marquee_protocol::args::{scan_pair, scan_single};
use marquee_protocol::{
    parse_line, CommandKind, ErrorKind, InputBuffer, ParseError, Response, ResponseLine,
    CARRIAGE_RETURN, LINE_FEED,
};

use crate::session::DisplaySession;
use crate::traits::{GlyphSource, MatrixDriver};

/// Serial link failure while running the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<R, T> {
    /// Receive side failed
    Rx(R),
    /// Transmit side failed
    Tx(T),
}

/// Parse and execute one complete line against the session
///
/// Arguments are validated before any state is touched. The returned
/// response may borrow diagnostic text from `line`.
pub fn execute<'a, D, F>(session: &mut DisplaySession<D, F>, line: &'a [u8]) -> Response<'a>
where
    D: MatrixDriver,
    F: GlyphSource,
{
    let cmd = match parse_line(line) {
        Ok(cmd) => cmd,
        Err(ParseError::TooShort) => return Response::error(ErrorKind::TooShort),
        Err(ParseError::BadCommand { rest }) => {
            return Response::error_with_text(ErrorKind::BadCommand, rest)
        }
    };
    let args = cmd.args;

    match cmd.kind {
        CommandKind::On => match scan_pair(args) {
            Some((col, row)) => {
                session.turn_on(col, row);
                Response::ok()
            }
            None => Response::error_with_text(ErrorKind::ArgsInvalid, args),
        },
        CommandKind::Off => match scan_pair(args) {
            Some((col, row)) => {
                session.turn_off(col, row);
                Response::ok()
            }
            None => Response::error_with_text(ErrorKind::ArgsInvalid, args),
        },
        CommandKind::Char => match args.first() {
            Some(&code) => match session.draw_char(code) {
                Ok(()) => Response::ok(),
                Err(kind) => Response::error_with_text(kind, args),
            },
            None => Response::error(ErrorKind::TooShort),
        },
        CommandKind::String => {
            if args.is_empty() {
                return Response::error(ErrorKind::TooShort);
            }
            match session.draw_string(args) {
                Ok(()) => Response::ok(),
                Err(kind) => Response::error_with_text(kind, args),
            }
        }
        CommandKind::Flush => {
            session.flush();
            Response::ok()
        }
        CommandKind::ScrollOn => {
            session.set_scrolling(true);
            Response::ok()
        }
        CommandKind::ScrollOff => {
            session.set_scrolling(false);
            Response::ok()
        }
        CommandKind::Brightness => match scan_single(args) {
            Some(level) => {
                session.set_brightness(level);
                Response::ok()
            }
            None => Response::error_with_text(ErrorKind::ArgsInvalid, args),
        },
        CommandKind::Reset => {
            session.reset();
            Response::ok()
        }
        CommandKind::Scroll => {
            session.scroll_once();
            Response::ok()
        }
    }
}

/// Byte-level front end of the display session
pub struct Dispatcher<D, F> {
    session: DisplaySession<D, F>,
    input: InputBuffer,
    poll_timeout_ms: u32,
}

impl<D: MatrixDriver, F: GlyphSource> Dispatcher<D, F> {
    /// Create a dispatcher that polls the link every `poll_timeout_ms`
    pub fn new(session: DisplaySession<D, F>, poll_timeout_ms: u16) -> Self {
        Self {
            session,
            input: InputBuffer::new(),
            poll_timeout_ms: u32::from(poll_timeout_ms.max(1)),
        }
    }

    /// The display session
    pub fn session(&self) -> &DisplaySession<D, F> {
        &self.session
    }

    /// Mutable access to the display session
    pub fn session_mut(&mut self) -> &mut DisplaySession<D, F> {
        &mut self.session
    }

    /// The partially received command line
    pub fn pending_input(&self) -> &[u8] {
        self.input.as_bytes()
    }

    /// Feed one received byte
    ///
    /// Returns the encoded response when `byte` completed a line.
    pub fn feed(&mut self, byte: u8) -> Option<ResponseLine> {
        match byte {
            CARRIAGE_RETURN => None,
            LINE_FEED => {
                let line = execute(&mut self.session, self.input.as_bytes()).to_line();
                self.input.reset();
                Some(line)
            }
            _ => {
                self.input.append(byte);
                None
            }
        }
    }

    /// Service one idle period of the link
    ///
    /// Returns true if the display scrolled.
    pub fn idle_tick(&mut self) -> bool {
        self.session.tick()
    }

    /// Run the blocking read loop on `port`
    ///
    /// Only returns if the link fails.
    pub fn run<P>(
        &mut self,
        port: &mut P,
    ) -> Result<Infallible, LinkError<<P as SerialRx>::Error, <P as SerialTx>::Error>>
    where
        P: SerialRx + SerialTx,
    {
        loop {
            match port
                .read_byte_timeout(self.poll_timeout_ms)
                .map_err(LinkError::Rx)?
            {
                None => {
                    self.idle_tick();
                }
                Some(byte) => {
                    if let Some(line) = self.feed(byte) {
                        port.write_all(&line).map_err(LinkError::Tx)?;
                        port.flush().map_err(LinkError::Tx)?;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::scroll::ScrollState;
    use crate::testing::{DotFont, RecordingMatrix};
    use heapless::{Deque, Vec};
    use marquee_protocol::{MAX_INPUT, MAX_LINE};

    type TestDispatcher = Dispatcher<RecordingMatrix, DotFont>;

    fn dispatcher() -> TestDispatcher {
        let config = BoardConfig::default();
        let session = DisplaySession::new(RecordingMatrix::new(4), DotFont, &config);
        Dispatcher::new(session, config.display.poll_timeout_ms)
    }

    /// Feed `bytes`, collecting every response line
    fn send(d: &mut TestDispatcher, bytes: &[u8]) -> Vec<u8, 2048> {
        let mut out = Vec::new();
        for &b in bytes {
            if let Some(line) = d.feed(b) {
                out.extend_from_slice(&line).unwrap();
            }
        }
        out
    }

    #[test]
    fn test_partial_line_is_buffered() {
        let mut d = dispatcher();
        assert!(send(&mut d, b"A3,").is_empty());
        assert_eq!(d.pending_input(), b"A3,");
    }

    #[test]
    fn test_pixel_on_then_flush() {
        let mut d = dispatcher();
        assert_eq!(send(&mut d, b"A3,4\n").as_slice(), b"0 OK\n");
        assert_eq!(send(&mut d, b"F\n").as_slice(), b"0 OK\n");

        let driver = d.session().driver();
        assert_eq!(driver.lit.as_slice(), &[(4, 3)]);
        assert_eq!(driver.flushes, 1);
        assert_eq!(d.session().virtual_width(), 4);
        assert!(d.pending_input().is_empty());
    }

    #[test]
    fn test_pixel_off() {
        let mut d = dispatcher();
        send(&mut d, b"A3,4\n");
        assert_eq!(send(&mut d, b"B3,4\n").as_slice(), b"0 OK\n");
        assert!(d.session().driver().lit.is_empty());
    }

    #[test]
    fn test_pixel_off_grows_virtual_width() {
        let mut d = dispatcher();
        assert_eq!(send(&mut d, b"B40,0
").as_slice(), b"0 OK
");
        assert_eq!(d.session().virtual_width(), 6);

        assert_eq!(send(&mut d, b"B0,0
").as_slice(), b"0 OK
");
        assert_eq!(d.session().virtual_width(), 6);
    }

    #[test]
    fn test_bad_pixel_arguments() {
        let mut d = dispatcher();
        assert_eq!(send(&mut d, b"A3\n").as_slice(), b"2 bad_arguments 3\n");
        assert_eq!(send(&mut d, b"Bx,y\n").as_slice(), b"2 bad_arguments x,y\n");
        assert_eq!(send(&mut d, b"A\n").as_slice(), b"2 bad_arguments \n");
        assert!(d.session().driver().lit.is_empty());
    }

    #[test]
    fn test_crlf_is_accepted() {
        let mut d = dispatcher();
        assert_eq!(send(&mut d, b"F\r\n").as_slice(), b"0 OK\n");
        assert_eq!(send(&mut d, b"A1,\r2\n").as_slice(), b"0 OK\n");
        assert!(d.session().driver().is_on(2, 1));
    }

    #[test]
    fn test_empty_line_is_too_short() {
        let mut d = dispatcher();
        assert_eq!(send(&mut d, b"\n").as_slice(), b"1 too_short\n");
        assert_eq!(send(&mut d, b"\r\n").as_slice(), b"1 too_short\n");
    }

    #[test]
    fn test_unknown_command_echoes_rest() {
        let mut d = dispatcher();
        let out = send(&mut d, b"Zsome-args\n");
        assert_eq!(out.as_slice(), b"3 bad_command some-args\n");
        let s = d.session();
        assert!(s.driver().lit.is_empty());
        assert_eq!(s.driver().flushes, 0);
        assert_eq!(s.virtual_width(), 4);
        assert!(s.line().is_empty());
    }

    #[test]
    fn test_char_command() {
        let mut d = dispatcher();
        assert_eq!(send(&mut d, b"CA\nCB\n").as_slice(), b"0 OK\n0 OK\n");
        assert_eq!(d.session().line(), b"AB");
        assert_eq!(d.session().driver().flushes, 0);
        assert_eq!(send(&mut d, b"C\n").as_slice(), b"1 too_short\n");
    }

    #[test]
    fn test_char_command_too_long() {
        let mut d = dispatcher();
        for _ in 0..MAX_LINE - 1 {
            send(&mut d, b"Cx\n");
        }
        assert_eq!(send(&mut d, b"Cy\n").as_slice(), b"4 too_long y\n");
    }

    #[test]
    fn test_string_command() {
        let mut d = dispatcher();
        assert_eq!(send(&mut d, b"DHello\n").as_slice(), b"0 OK\n");
        assert_eq!(d.session().line(), b"Hello");
        assert_eq!(d.session().driver().flushes, 1);
        assert_eq!(send(&mut d, b"D\n").as_slice(), b"1 too_short\n");
    }

    #[test]
    fn test_string_too_long_keeps_previous_line() {
        let mut d = dispatcher();
        send(&mut d, b"Dprevious\n");

        let mut cmd: Vec<u8, 256> = Vec::new();
        cmd.push(b'D').unwrap();
        cmd.extend_from_slice(&[b'x'; MAX_LINE]).unwrap();
        cmd.push(b'\n').unwrap();

        let out = send(&mut d, &cmd);
        assert!(out.starts_with(b"4 too_long xxxx"));
        assert_eq!(out.len(), "4 too_long ".len() + MAX_LINE + 1);
        assert_eq!(d.session().line(), b"previous");
    }

    #[test]
    fn test_overlong_input_is_truncated() {
        let mut d = dispatcher();
        let mut cmd: Vec<u8, 512> = Vec::new();
        cmd.push(b'Q').unwrap();
        cmd.extend_from_slice(&[b'z'; 300]).unwrap();
        cmd.push(b'\n').unwrap();

        let out = send(&mut d, &cmd);
        // Command letter plus MAX_INPUT - 2 argument bytes survive
        assert_eq!(out.len(), "3 bad_command ".len() + MAX_INPUT - 2 + 1);
    }

    #[test]
    fn test_brightness_command() {
        let mut d = dispatcher();
        assert_eq!(send(&mut d, b"I8\n").as_slice(), b"0 OK\n");
        assert_eq!(d.session().driver().intensity, Some(8));
        assert_eq!(send(&mut d, b"I200\n").as_slice(), b"0 OK\n");
        assert_eq!(d.session().driver().intensity, Some(15));
        assert_eq!(send(&mut d, b"I-5\n").as_slice(), b"0 OK\n");
        assert_eq!(d.session().driver().intensity, Some(0));
        assert_eq!(send(&mut d, b"Ihigh\n").as_slice(), b"2 bad_arguments high\n");
        assert_eq!(d.session().driver().intensity, Some(0));
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut d = dispatcher();
        send(&mut d, b"DA much longer line than fits\nG\nI9\nA100,3\n");
        assert_eq!(d.session().scroll_timer().state(), ScrollState::Scrolling);

        assert_eq!(send(&mut d, b"R\n").as_slice(), b"0 OK\n");
        let s = d.session();
        assert_eq!(s.virtual_width(), 4);
        assert!(s.line().is_empty());
        assert!(s.driver().lit.is_empty());
        assert_eq!(s.driver().intensity, Some(1));
        assert_eq!(s.scroll_timer().state(), ScrollState::Idle);

        // Idempotent
        assert_eq!(send(&mut d, b"R\n").as_slice(), b"0 OK\n");
        assert_eq!(d.session().scroll_timer().state(), ScrollState::Idle);
    }

    #[test]
    fn test_flush_twice() {
        let mut d = dispatcher();
        send(&mut d, b"A1,1\n");
        assert_eq!(send(&mut d, b"F\nF\n").as_slice(), b"0 OK\n0 OK\n");
        let s = d.session();
        assert_eq!(s.driver().flushes, 2);
        assert_eq!(s.driver().lit.as_slice(), &[(1, 1)]);
        assert_eq!(s.virtual_width(), 4);
    }

    #[test]
    fn test_scroll_command() {
        let mut d = dispatcher();
        assert_eq!(send(&mut d, b"S\n").as_slice(), b"0 OK\n");
        assert_eq!(d.session().driver().scrolls, 1);
        assert_eq!(d.session().driver().flushes, 1);
    }

    #[test]
    fn test_scrolling_toggles() {
        let mut d = dispatcher();
        send(&mut d, b"G\n");
        assert!(d.session().scroll_timer().is_scrolling());
        send(&mut d, b"H\n");
        assert!(!d.session().scroll_timer().is_scrolling());
        assert_eq!(d.session().driver().scrolls, 0);
    }

    #[test]
    fn test_idle_ticks_drive_scrolling() {
        let mut d = dispatcher();
        send(&mut d, b"G\n");

        let mut scrolled = 0;
        for _ in 0..250 {
            if d.idle_tick() {
                scrolled += 1;
            }
        }
        assert_eq!(scrolled, 2);
        assert_eq!(d.session().driver().scrolls, 2);
        assert_eq!(d.session().scroll_timer().countdown(), 50);
    }

    /// One step of scripted link activity
    #[derive(Clone, Copy)]
    enum Step {
        Byte(u8),
        Timeout,
    }

    #[derive(Debug, PartialEq)]
    struct Exhausted;

    struct ScriptedPort {
        script: Deque<Step, 512>,
        written: Vec<u8, 256>,
        flushes: u32,
    }

    impl ScriptedPort {
        fn new() -> Self {
            Self {
                script: Deque::new(),
                written: Vec::new(),
                flushes: 0,
            }
        }

        fn bytes(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.script.push_back(Step::Byte(b)).ok().unwrap();
            }
        }

        fn timeouts(&mut self, count: usize) {
            for _ in 0..count {
                self.script.push_back(Step::Timeout).ok().unwrap();
            }
        }
    }

    impl SerialRx for ScriptedPort {
        type Error = Exhausted;

        fn read_byte_timeout(&mut self, timeout_ms: u32) -> Result<Option<u8>, Exhausted> {
            assert_eq!(timeout_ms, 1);
            match self.script.pop_front() {
                Some(Step::Byte(b)) => Ok(Some(b)),
                Some(Step::Timeout) => Ok(None),
                None => Err(Exhausted),
            }
        }
    }

    impl SerialTx for ScriptedPort {
        type Error = Infallible;

        fn write_all(&mut self, data: &[u8]) -> Result<(), Infallible> {
            self.written.extend_from_slice(data).unwrap();
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_run_scrolls_only_while_idle() {
        let mut d = dispatcher();
        let mut port = ScriptedPort::new();
        port.bytes(b"G\n");
        port.timeouts(99);
        port.bytes(b"F\n"); // command traffic does not tick the timer
        port.timeouts(1);

        let result = d.run(&mut port);
        assert_eq!(result, Err(LinkError::Rx(Exhausted)));
        assert_eq!(port.written.as_slice(), b"0 OK\n0 OK\n");
        assert_eq!(port.flushes, 2);
        assert_eq!(d.session().driver().scrolls, 1);
        assert_eq!(d.session().scroll_timer().countdown(), 100);
    }

    #[test]
    fn test_run_without_scrolling_never_scrolls() {
        let mut d = dispatcher();
        let mut port = ScriptedPort::new();
        port.timeouts(300);

        assert_eq!(d.run(&mut port), Err(LinkError::Rx(Exhausted)));
        assert_eq!(d.session().driver().scrolls, 0);
        assert!(port.written.is_empty());
    }
}
