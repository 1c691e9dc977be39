//! Exact-cover model generation in the dlx3 wire format

pub mod assembler;
pub mod color;
pub mod compiler;
pub mod encoder;
pub mod item;

pub use assembler::{Assembler, Bounds, Model};
pub use color::{Color, Palette};
pub use compiler::{Family, OptionCompiler, RowBatch};
pub use encoder::{EncodingStatistics, ModelEncoder};
pub use item::{Codec, Item, Row, Slot};
