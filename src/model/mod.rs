//! Document model types for layout recovery.
//!
//! Data flows through these types strictly in order: positioned fragments
//! are clustered into [`Line`]s, lines are classified into
//! [`ClassifiedLine`]s, and classified lines are assembled into the
//! [`Block`] sequence that makes up a [`Document`].

mod block;
mod document;
mod fragment;
mod line;

pub use block::{Block, ImageBlock, ImageFormat, Table, TableRow};
pub use document::{Document, Metadata};
pub use fragment::PositionedFragment;
pub use line::{Alignment, ClassifiedLine, HeadingCue, Line, LineRole};
