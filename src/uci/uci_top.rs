//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, keeps the engine's position in sync, runs searches
//! for `go` and formats progress events as `info` lines. Stdin is read on its
//! own thread so `stop` can reach a running search; every output line goes
//! through one channel to a printer thread, which keeps `info` lines ahead of
//! the `bestmove` that follows them.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::engines::engine_trait::Engine;
use crate::errors::{ChessError, ChessResult};
use crate::search::search_events::{EngineEvent, EngineEventHandler};
use crate::utils::long_algebraic::{
    move_to_long_algebraic, moves_to_long_algebraic, parse_long_algebraic,
};

pub fn run_stdio_loop(mut engine: Box<dyn Engine>) -> io::Result<()> {
    let (out_tx, out_rx) = mpsc::channel::<String>();
    let (line_tx, line_rx) = mpsc::channel::<String>();

    let printer = thread::spawn(move || {
        let stdout = io::stdout();
        for line in out_rx {
            let mut lock = stdout.lock();
            if writeln!(lock, "{line}").and_then(|_| lock.flush()).is_err() {
                break;
            }
        }
    });

    let stop = engine.stop_flag();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if matches!(line.trim(), "stop" | "quit") {
                stop.request_stop();
            }
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    engine.set_event_handler(Box::new(UciEventForwarder::new(out_tx.clone())));
    let mut uci = UciSession::new(engine);
    let mut out = LineSender::new(out_tx);

    for line in line_rx {
        let should_quit = uci.handle_command(&line, &mut out)?;
        out.flush()?;
        if should_quit {
            break;
        }
    }

    drop(out);
    drop(uci);
    let _ = printer.join();
    Ok(())
}

/// Formats one progress event as a UCI `info` line.
pub fn format_event(event: &EngineEvent) -> String {
    match event {
        EngineEvent::DepthReached(depth) => format!("info depth {depth}"),
        EngineEvent::NodesPerSecond(nps) => format!("info nps {nps}"),
        EngineEvent::BestLine {
            score,
            depth,
            nodes,
            moves,
        } => {
            let centipawns = (score.round() * 100.0) as i64;
            let pv = moves_to_long_algebraic(moves).unwrap_or_default();
            format!("info score cp {centipawns} depth {depth} nodes {nodes} pv {pv}")
        }
    }
}

struct UciEventForwarder {
    tx: Sender<String>,
}

impl UciEventForwarder {
    fn new(tx: Sender<String>) -> Self {
        Self { tx }
    }
}

impl EngineEventHandler for UciEventForwarder {
    fn handle(&mut self, event: EngineEvent) {
        let _ = self.tx.send(format_event(&event));
    }
}

/// `Write` adapter that forwards complete lines to the printer thread.
struct LineSender {
    tx: Sender<String>,
    pending: Vec<u8>,
}

impl LineSender {
    fn new(tx: Sender<String>) -> Self {
        Self {
            tx,
            pending: Vec::new(),
        }
    }

    fn send_line(&self, bytes: &[u8]) -> io::Result<()> {
        let line = String::from_utf8_lossy(bytes).into_owned();
        self.tx
            .send(line)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "printer thread is gone"))
    }
}

impl Write for LineSender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.send_line(&line[..pos])?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.send_line(&line)?;
        }
        Ok(())
    }
}

pub struct UciSession {
    engine: Box<dyn Engine>,
}

impl UciSession {
    pub fn new(engine: Box<dyn Engine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Handles one command line; returns `true` on `quit`.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        let Some(cmd) = trimmed.split_whitespace().next() else {
            return Ok(false);
        };

        match cmd {
            "uci" => {
                writeln!(out, "id name {}", self.engine.name())?;
                writeln!(out, "id author {}", self.engine.author())?;
                writeln!(out, "option name Depth type spin default 5 min 1 max 64")?;
                writeln!(out, "option name OwnBook type check default true")?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    writeln!(out, "info string setoption error: {err}")?;
                }
            }
            "ucinewgame" => {
                self.engine.new_game();
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    writeln!(out, "info string position error: {err}")?;
                }
            }
            "go" => {
                if let Err(err) = self.handle_go(trimmed, out) {
                    writeln!(out, "info string go error: {err}")?;
                    writeln!(out, "bestmove 0000")?;
                }
            }
            "stop" => {
                // The reader thread already raised the stop flag.
                self.engine.stop_search();
            }
            "d" => {
                writeln!(out, "{}", self.engine.render())?;
                writeln!(out, "Fen: {}", self.engine.to_fen())?;
            }
            "quit" => {
                return Ok(true);
            }
            _ => {
                warn!(command = trimmed, "ignoring unknown command");
            }
        }

        Ok(false)
    }

    /// `setoption name <name...> [value <value...>]`
    fn handle_setoption(&mut self, line: &str) -> ChessResult<()> {
        let mut tokens = line.split_whitespace().skip(1);
        if tokens.next() != Some("name") {
            return Err(ChessError::Config(format!("malformed setoption: {line:?}")));
        }

        let mut name = Vec::new();
        let mut value = Vec::new();
        let mut in_value = false;
        for token in tokens {
            if !in_value && token == "value" {
                in_value = true;
            } else if in_value {
                value.push(token);
            } else {
                name.push(token);
            }
        }

        let name = name.join(" ");
        let value = value.join(" ");
        debug!(name = %name, value = %value, "setoption");
        self.engine.set_option(&name, &value)
    }

    fn handle_position(&mut self, line: &str) -> ChessResult<()> {
        let mut tokens = line.split_whitespace().skip(1).peekable();

        match tokens.next() {
            Some("startpos") => self.engine.setup_board(),
            Some("fen") => {
                let mut fen_parts = Vec::new();
                while let Some(token) = tokens.next_if(|t| *t != "moves") {
                    fen_parts.push(token);
                }
                if fen_parts.is_empty() {
                    return Err(ChessError::InvalidFen(
                        "missing FEN after 'position fen'".to_owned(),
                    ));
                }
                self.engine.setup_from_fen(&fen_parts.join(" "))?;
            }
            Some(other) => {
                return Err(ChessError::InvalidFen(format!(
                    "unsupported position token {other:?}"
                )))
            }
            None => return Err(ChessError::InvalidFen("incomplete position command".to_owned())),
        }

        if tokens.next_if_eq(&"moves").is_some() {
            for lan in tokens {
                let (from, to) = parse_long_algebraic(lan)?;
                self.engine.apply_move(from, to)?;
            }
        }

        Ok(())
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> ChessResult<()> {
        let depth = parse_go_depth(line)?;
        self.engine.start_search();
        match self.engine.best_move_at_depth(depth)? {
            Some(best) => writeln!(out, "bestmove {}", move_to_long_algebraic(&best)?)?,
            None => writeln!(out, "bestmove 0000")?,
        }
        Ok(())
    }
}

/// Only `depth` is honored; clock and node limits are accepted and ignored.
fn parse_go_depth(line: &str) -> ChessResult<Option<u8>> {
    let mut tokens = line.split_whitespace().skip(1);
    while let Some(token) = tokens.next() {
        if token == "depth" {
            let value = tokens
                .next()
                .ok_or_else(|| ChessError::Config("missing value after 'depth'".to_owned()))?;
            let depth = value
                .parse::<u8>()
                .ok()
                .filter(|d| *d >= 1)
                .ok_or_else(|| ChessError::Config(format!("invalid depth {value:?}")))?;
            return Ok(Some(depth));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::engine_config::EngineConfig;
    use crate::engines::x88_engine::X88Engine;
    use crate::game_state::chess_types::{Color, Move, Piece, PieceKind, Square};

    fn session(use_opening_book: bool) -> UciSession {
        let config = EngineConfig {
            use_opening_book,
            max_depth: 2,
            ..EngineConfig::default()
        };
        UciSession::new(Box::new(
            X88Engine::with_seed(config, 11).expect("engine should build"),
        ))
    }

    fn run(session: &mut UciSession, line: &str) -> String {
        let mut out = Vec::new();
        session
            .handle_command(line, &mut out)
            .expect("command should not fail on io");
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn uci_handshake_lists_identity_and_options() {
        let mut uci = session(true);
        let text = run(&mut uci, "uci");
        assert!(text.starts_with("id name x88_chess\n"));
        assert!(text.contains("option name OwnBook"));
        assert!(text.ends_with("uciok\n"));
        assert_eq!(run(&mut uci, "isready"), "readyok\n");
    }

    #[test]
    fn position_startpos_with_moves_updates_engine() {
        let mut uci = session(false);
        assert_eq!(run(&mut uci, "position startpos moves e2e4 e7e5 g1f3"), "");
        assert_eq!(uci.engine().side_to_move(), Color::Black);
        assert_eq!(uci.engine().history().len(), 3);
    }

    #[test]
    fn position_fen_with_moves_updates_engine() {
        let mut uci = session(false);
        run(&mut uci, "position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1 moves e2e4");
        assert_eq!(uci.engine().to_fen(), "4k3/8/8/8/4P3/8/8/4K3 b KQkq - 0 1");
    }

    #[test]
    fn bad_position_reports_error_and_keeps_running() {
        let mut uci = session(false);
        let text = run(&mut uci, "position startpos moves e2e5");
        assert!(text.starts_with("info string position error:"));
        assert!(!uci.handle_command("isready", &mut Vec::new()).expect("io"));
    }

    #[test]
    fn go_depth_answers_with_a_legal_bestmove() {
        let mut uci = session(false);
        run(&mut uci, "position startpos");
        let text = run(&mut uci, "go depth 1");
        let lan = text
            .trim()
            .strip_prefix("bestmove ")
            .expect("bestmove line");
        let (from, to) = parse_long_algebraic(lan).expect("valid LAN");
        assert!(uci.engine().is_move_valid(from, to).expect("query"));
    }

    #[test]
    fn go_without_moves_answers_null_move() {
        let mut uci = session(false);
        run(&mut uci, "position fen 7k/6Q1/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(run(&mut uci, "go"), "bestmove 0000\n");
    }

    #[test]
    fn setoption_parses_multi_word_names_and_reports_errors() {
        let mut uci = session(false);
        assert_eq!(run(&mut uci, "setoption name Depth value 3"), "");
        let text = run(&mut uci, "setoption name Depth value zero");
        assert!(text.starts_with("info string setoption error:"));
        assert_eq!(run(&mut uci, "setoption name Clear Hash"), "");
    }

    #[test]
    fn display_and_quit() {
        let mut uci = session(false);
        let text = run(&mut uci, "d");
        assert!(text.contains("a b c d e f g h"));
        assert!(text.contains("Fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(uci.handle_command("quit", &mut Vec::new()).expect("io"));
    }

    #[test]
    fn events_format_as_info_lines() {
        assert_eq!(format_event(&EngineEvent::DepthReached(3)), "info depth 3");
        assert_eq!(format_event(&EngineEvent::NodesPerSecond(1200)), "info nps 1200");

        let pawn = Piece::new(Square::new(4, 1), Color::White, PieceKind::Pawn);
        let line = EngineEvent::BestLine {
            score: 2.6,
            depth: 2,
            nodes: 420,
            moves: vec![Move::new(pawn, Square::new(4, 3), None)],
        };
        assert_eq!(format_event(&line), "info score cp 300 depth 2 nodes 420 pv e2e4");
    }

    #[test]
    fn line_sender_splits_on_newlines() {
        let (tx, rx) = mpsc::channel();
        let mut sender = LineSender::new(tx);
        write!(sender, "bestmove e2e4\ninfo").expect("write");
        sender.flush().expect("flush");
        let lines: Vec<String> = rx.try_iter().collect();
        assert_eq!(lines, vec!["bestmove e2e4".to_owned(), "info".to_owned()]);
    }

    #[test]
    fn go_depth_parsing() {
        assert_eq!(parse_go_depth("go").expect("plain go"), None);
        assert_eq!(parse_go_depth("go wtime 100 depth 4").expect("depth"), Some(4));
        assert!(parse_go_depth("go depth").is_err());
        assert!(parse_go_depth("go depth 0").is_err());
    }
}
