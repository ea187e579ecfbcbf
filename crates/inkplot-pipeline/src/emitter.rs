//! G-code emission
//!
//! Serializes transformed strokes into a pen-plotter program. Every stroke
//! becomes a rapid travel to its first point, a plunge to the pen-down height
//! plus the first point's depth offset, one feed move per remaining point, and
//! a rapid retract. The program is bracketed by operator-supplied prefix and
//! suffix blocks.
//!
//! Alongside the text, every command is recorded as a typed [`ProgramMove`]
//! so previews never have to re-parse the program.

use crate::depth::DepthMapper;
use crate::transform::CoordinateTransform;
use inkplot_core::constants::PROGRAM_DECIMALS;
use inkplot_core::Stroke;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Heights and feed rates of the plotter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineParams {
    /// Z height where the pen touches the paper
    pub pen_down_z: f64,
    /// Z height for travel moves
    pub pen_up_z: f64,
    /// Feed for G00 travel moves (mm/min)
    pub travel_feed: f64,
    /// Feed for the G01 plunge (mm/min)
    pub plunge_feed: f64,
    /// Feed for G01 drawing moves (mm/min)
    pub draw_feed: f64,
}

impl Default for MachineParams {
    fn default() -> Self {
        Self {
            pen_down_z: -24.4,
            pen_up_z: -22.0,
            travel_feed: 1000.0,
            plunge_feed: 1000.0,
            draw_feed: 1000.0,
        }
    }
}

/// Verbatim blocks placed before and after the generated moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramTemplate {
    pub prefix: String,
    pub suffix: String,
}

impl Default for ProgramTemplate {
    fn default() -> Self {
        Self {
            prefix: "G21\nG90\n".to_string(),
            suffix: "G0 Z0\nG0 X0 Y0\n".to_string(),
        }
    }
}

/// Kind of an emitted command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// `G00 X Y F`: pen-up move to the start of a stroke
    Travel,
    /// `G01 Z F`: pen lowered onto the paper
    Plunge,
    /// `G01 X Y Z F`: pen-down move
    Draw,
    /// `G00 Z`: pen lifted
    Retract,
}

impl MoveKind {
    /// True for moves that leave ink on the page
    pub fn is_drawing(&self) -> bool {
        matches!(self, MoveKind::Draw)
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveKind::Travel => write!(f, "travel"),
            MoveKind::Plunge => write!(f, "plunge"),
            MoveKind::Draw => write!(f, "draw"),
            MoveKind::Retract => write!(f, "retract"),
        }
    }
}

/// One emitted command.
///
/// Coordinates are the tool position after the move. Words the command does
/// not carry keep the previous position; Z starts at the pen-up height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgramMove {
    pub kind: MoveKind,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// `None` for rapid retracts, which carry no F word
    pub feed: Option<f64>,
}

/// An emitted program: text plus the moves it encodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandProgram {
    text: String,
    moves: Vec<ProgramMove>,
}

impl CommandProgram {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn moves(&self) -> &[ProgramMove] {
        &self.moves
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// Number of recorded moves of `kind`
    pub fn count(&self, kind: MoveKind) -> usize {
        self.moves.iter().filter(|m| m.kind == kind).count()
    }

    /// True when no motion command was emitted
    pub fn has_no_moves(&self) -> bool {
        self.moves.is_empty()
    }
}

impl fmt::Display for CommandProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Format a numeric word with the program precision, without negative zero
pub fn format_number(value: f64) -> String {
    let s = format!("{:.*}", PROGRAM_DECIMALS, value);
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

/// Normalize line endings and terminate a non-empty block with a newline
pub fn normalize_block(block: &str) -> String {
    let mut out = block.replace("\r\n", "\n").replace('\r', "\n");
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Append-only program under construction
struct ProgramBuilder {
    text: String,
    moves: Vec<ProgramMove>,
    x: f64,
    y: f64,
    z: f64,
}

impl ProgramBuilder {
    fn new(start_z: f64) -> Self {
        Self {
            text: String::new(),
            moves: Vec::new(),
            x: 0.0,
            y: 0.0,
            z: start_z,
        }
    }

    fn block(&mut self, block: &str) {
        self.text.push_str(&normalize_block(block));
    }

    fn record(&mut self, kind: MoveKind, feed: Option<f64>) {
        self.moves.push(ProgramMove {
            kind,
            x: self.x,
            y: self.y,
            z: self.z,
            feed,
        });
    }

    fn travel(&mut self, x: f64, y: f64, feed: f64) {
        self.text.push_str(&format!(
            "G00 X{} Y{} F{}\n",
            format_number(x),
            format_number(y),
            format_number(feed)
        ));
        self.x = x;
        self.y = y;
        self.record(MoveKind::Travel, Some(feed));
    }

    fn plunge(&mut self, z: f64, feed: f64) {
        self.text.push_str(&format!(
            "G01 Z{} F{}\n",
            format_number(z),
            format_number(feed)
        ));
        self.z = z;
        self.record(MoveKind::Plunge, Some(feed));
    }

    fn draw(&mut self, x: f64, y: f64, z: f64, feed: f64) {
        self.text.push_str(&format!(
            "G01 X{} Y{} Z{} F{}\n",
            format_number(x),
            format_number(y),
            format_number(z),
            format_number(feed)
        ));
        self.x = x;
        self.y = y;
        self.z = z;
        self.record(MoveKind::Draw, Some(feed));
    }

    fn retract(&mut self, z: f64) {
        self.text.push_str(&format!("G00 Z{}\n", format_number(z)));
        self.z = z;
        self.record(MoveKind::Retract, None);
    }

    fn finish(self) -> CommandProgram {
        CommandProgram {
            text: self.text,
            moves: self.moves,
        }
    }
}

/// Turns strokes into a [`CommandProgram`]
#[derive(Debug, Clone, PartialEq)]
pub struct CodeEmitter {
    pub transform: CoordinateTransform,
    pub depth: DepthMapper,
    pub machine: MachineParams,
    pub template: ProgramTemplate,
}

impl CodeEmitter {
    pub fn new(
        transform: CoordinateTransform,
        depth: DepthMapper,
        machine: MachineParams,
        template: ProgramTemplate,
    ) -> Self {
        Self {
            transform,
            depth,
            machine,
            template,
        }
    }

    /// Emit the program for `strokes`. Empty strokes produce no commands.
    pub fn emit(&self, strokes: &[Stroke]) -> CommandProgram {
        let m = &self.machine;
        let mut program = ProgramBuilder::new(m.pen_up_z);
        program.block(&self.template.prefix);

        let mut emitted = 0usize;
        for stroke in strokes {
            let Some((first, rest)) = stroke.points().split_first() else {
                continue;
            };

            let (x, y) = self.transform.apply(first);
            program.travel(x, y, m.travel_feed);
            program.plunge(m.pen_down_z + self.depth.depth(first.w), m.plunge_feed);

            for point in rest {
                let (x, y) = self.transform.apply(point);
                program.draw(x, y, m.pen_down_z + self.depth.depth(point.w), m.draw_feed);
            }

            program.retract(m.pen_up_z);
            emitted += 1;
        }

        program.block(&self.template.suffix);
        let program = program.finish();
        debug!(
            "Emitted {} strokes as {} moves ({} lines)",
            emitted,
            program.moves().len(),
            program.line_count()
        );
        program
    }
}

impl Default for CodeEmitter {
    fn default() -> Self {
        Self::new(
            CoordinateTransform::default(),
            DepthMapper::default(),
            MachineParams::default(),
            ProgramTemplate::default(),
        )
    }
}
