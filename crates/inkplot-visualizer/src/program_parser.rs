//! Program re-parsing for previews
//!
//! Programs emitted by InkPlot carry their typed move list, so previews use
//! [`segments_from_moves`]. Programs loaded from elsewhere go through
//! [`parse_program`], which understands the subset of G-code the emitter
//! writes: `G0`/`G00`/`G1`/`G01` with optional X, Y, Z and F words.

use inkplot_pipeline::{MoveKind, ProgramMove};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Pen state of a preview segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Pen-up move (G0)
    Travel,
    /// Pen-down move (G1)
    Draw,
}

/// Straight line between two consecutive XY waypoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSegment {
    pub kind: SegmentKind,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// A linear move recovered from one program line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedMove {
    /// 1-based source line
    pub line: usize,
    pub kind: SegmentKind,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub feed: Option<f64>,
}

impl ParsedMove {
    /// True when the line moves in the XY plane
    pub fn has_xy(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

fn motion_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^G0*([01])(?:\s|$)").expect("invalid motion regex"))
}

/// Strip `;` comments and parenthesized comments
fn strip_comments(line: &str) -> String {
    let line = line.split(';').next().unwrap_or("");
    let mut out = String::with_capacity(line.len());
    let mut depth = 0usize;
    for c in line.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Parse every linear move of `text`. Other lines are skipped.
pub fn parse_moves(text: &str) -> Vec<ParsedMove> {
    let mut moves = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = strip_comments(raw);
        let line = line.trim();
        let Some(caps) = motion_regex().captures(line) else {
            if !line.is_empty() {
                trace!("Line {}: not a linear move, skipped", index + 1);
            }
            continue;
        };

        let kind = if &caps[1] == "0" {
            SegmentKind::Travel
        } else {
            SegmentKind::Draw
        };
        let mut parsed = ParsedMove {
            line: index + 1,
            kind,
            x: None,
            y: None,
            z: None,
            feed: None,
        };

        for word in line.split_whitespace().skip(1) {
            let mut chars = word.chars();
            let Some(letter) = chars.next() else {
                continue;
            };
            let Ok(value) = chars.as_str().parse::<f64>() else {
                trace!("Line {}: ignoring word '{}'", index + 1, word);
                continue;
            };
            match letter.to_ascii_uppercase() {
                'X' => parsed.x = Some(value),
                'Y' => parsed.y = Some(value),
                'Z' => parsed.z = Some(value),
                'F' => parsed.feed = Some(value),
                _ => {}
            }
        }

        trace!("Line {}: {:?}", index + 1, parsed);
        moves.push(parsed);
    }

    moves
}

/// Re-parse program text into preview segments.
///
/// Position is modal: a missing X or Y keeps the previous value, and Z-only
/// lines update state without producing a waypoint. Each segment takes its
/// kind from the line it ends on.
pub fn parse_program(text: &str) -> Vec<PreviewSegment> {
    let moves = parse_moves(text);
    let mut segments = Vec::new();
    let mut position = (0.0, 0.0);
    let mut has_waypoint = false;

    for m in moves.iter().filter(|m| m.has_xy()) {
        let next = (m.x.unwrap_or(position.0), m.y.unwrap_or(position.1));
        if has_waypoint {
            segments.push(PreviewSegment {
                kind: m.kind,
                from: position,
                to: next,
            });
        }
        position = next;
        has_waypoint = true;
    }

    debug!(
        "Parsed program: {} linear moves, {} preview segments",
        moves.len(),
        segments.len()
    );
    segments
}

/// Preview segments from a typed move list.
///
/// Travel and draw moves are the XY waypoints; plunges and retracts only
/// change Z.
pub fn segments_from_moves(moves: &[ProgramMove]) -> Vec<PreviewSegment> {
    let mut segments = Vec::new();
    let mut previous: Option<(f64, f64)> = None;

    for m in moves {
        let kind = match m.kind {
            MoveKind::Travel => SegmentKind::Travel,
            MoveKind::Draw => SegmentKind::Draw,
            MoveKind::Plunge | MoveKind::Retract => continue,
        };
        let to = (m.x, m.y);
        if let Some(from) = previous {
            segments.push(PreviewSegment { kind, from, to });
        }
        previous = Some(to);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_program_segments() {
        let text = "G21\nG90\nG00 X0 Y0 F1000\nG01 Z-1 F100\nG01 X10 Y0 Z-1 F500\nG00 Z2\nG00 X20 Y5 F1000\n";
        let segments = parse_program(text);
        assert_eq!(
            segments,
            vec![
                PreviewSegment {
                    kind: SegmentKind::Draw,
                    from: (0.0, 0.0),
                    to: (10.0, 0.0)
                },
                PreviewSegment {
                    kind: SegmentKind::Travel,
                    from: (10.0, 0.0),
                    to: (20.0, 5.0)
                },
            ]
        );
    }

    #[test]
    fn test_short_and_lowercase_codes() {
        let segments = parse_program("g0 x1 y1\ng1 x2 y2\nG1X3Y3\n");
        // G1X3Y3 has no separator and is not recognized
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Draw);
        assert_eq!(segments[0].to, (2.0, 2.0));
    }

    #[test]
    fn test_modal_axis() {
        let segments = parse_program("G0 X5 Y5\nG1 X8\nG1 Y9\n");
        assert_eq!(segments[0].to, (8.0, 5.0));
        assert_eq!(segments[1].to, (8.0, 9.0));
    }

    #[test]
    fn test_comments_and_other_codes_skipped() {
        let moves = parse_moves("; header\nG10 X1\nG02 X1 Y1\nG0 X1 Y2 (go) ; trailing\nM2\n");
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].line, 4);
        assert_eq!((moves[0].x, moves[0].y), (Some(1.0), Some(2.0)));
    }

    #[test]
    fn test_segments_from_moves() {
        let mv = |kind, x, y| ProgramMove {
            kind,
            x,
            y,
            z: 0.0,
            feed: None,
        };
        let moves = vec![
            mv(MoveKind::Travel, 0.0, 0.0),
            mv(MoveKind::Plunge, 0.0, 0.0),
            mv(MoveKind::Draw, 4.0, 0.0),
            mv(MoveKind::Retract, 4.0, 0.0),
            mv(MoveKind::Travel, 9.0, 9.0),
        ];
        let segments = segments_from_moves(&moves);
        let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SegmentKind::Draw, SegmentKind::Travel]);
        assert_eq!(segments[1].from, (4.0, 0.0));
    }
}
