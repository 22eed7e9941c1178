#![warn(missing_docs)]
//! Editor Lineops - Headless Line-Oriented Text Mutation
//!
//! # Overview
//!
//! `editor-lineops` implements the line commands of a text editor (delete line, cut line,
//! delete to beginning/end of line, move and copy lines up/down, join lines) over a buffer
//! addressed by character offsets and lines. It does no rendering.
//!
//! # Core Features
//!
//! - **Mixed delimiters**: LF, CRLF and CR may coexist in one buffer; every operation keeps
//!   the delimiter each line actually carries
//! - **Folding aware**: moves that would reach into collapsed content are refused
//! - **Clipboard accumulation**: consecutive cuts build one clipboard entry, kill-ring style
//! - **Burst undo**: consecutive moves/copies undo as a single step
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command Layer (LineCommandExecutor)        │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  LineMutationEngine                         │  ← delete / move / copy / join
//! ├──────────────────────┬──────────────────────┤
//! │  DeleteSession       │  CompoundEdit        │  ← cross-call state
//! ├──────────────────────┴──────────────────────┤
//! │  Region math                                │  ← pure computations
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer · CoordinateMapper · Clipboard  │  ← collaborators
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using the Command Layer
//!
//! ```rust
//! use editor_lineops::{LineCommand, LineCommandExecutor, TextSelection};
//!
//! let mut executor = LineCommandExecutor::new("fn a() {}\nfn b() {}\n");
//!
//! executor.execute(LineCommand::MoveLinesDown).unwrap();
//! assert_eq!(executor.text(), "fn b() {}\nfn a() {}\n");
//! assert_eq!(executor.selection(), TextSelection::new(10, 9));
//!
//! // Consecutive moves undo together.
//! executor.execute(LineCommand::Undo).unwrap();
//! assert_eq!(executor.text(), "fn a() {}\nfn b() {}\n");
//! ```
//!
//! ## Using the Engine Directly
//!
//! ```rust
//! use editor_lineops::{Document, FlatMapper, LineMutationEngine, MoveDirection, TextSelection};
//!
//! let mut doc = Document::new("alpha\nbeta\ngamma");
//! let mut engine = LineMutationEngine::new();
//! let outcome = engine
//!     .move_or_copy_lines(
//!         &mut doc,
//!         &FlatMapper::new(),
//!         TextSelection::caret(7),
//!         MoveDirection::Up,
//!         false,
//!     )
//!     .unwrap();
//! assert_eq!(doc.text(), "beta\nalpha\ngamma");
//! assert_eq!(outcome.selection(), Some(TextSelection::new(0, 4)));
//! ```
//!
//! # Module Description
//!
//! - [`document`] - `TextBuffer` trait and the rope-backed `Document`
//! - [`mapper`] - model/widget coordinate mapping
//! - [`folding`] - fold regions driving the projection mapper
//! - [`region`] - delete, moving and skipped region computations
//! - [`delete_session`] - clipboard accumulation of consecutive cuts
//! - [`compound`] - undo grouping for move/copy bursts
//! - [`engine`] - the line mutation engine
//! - [`commands`] - command layer
//! - [`config`] - preferences

pub mod clipboard;
pub mod commands;
pub mod compound;
pub mod config;
pub mod delete_session;
pub mod document;
pub mod engine;
pub mod error;
pub mod folding;
pub mod line_ending;
pub mod mapper;
pub mod region;
pub mod selection;
mod undo;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use commands::{CommandResult, LineCommand, LineCommandExecutor};
pub use compound::{CompoundEdit, ExitStrategy};
pub use config::LineOpsConfig;
pub use delete_session::{DeleteSession, ViewerEvent};
pub use document::{Document, TextBuffer};
pub use engine::{EditOutcome, LineMutationEngine, NoOpReason};
pub use error::{BadLocation, ClipboardError, LineOpError};
pub use folding::{FoldRegion, FoldingManager};
pub use line_ending::LineEnding;
pub use mapper::{CoordinateMapper, FlatMapper, ProjectionMapper};
pub use selection::{DeletionKind, LineSpan, MoveDirection, Region, TextSelection};
