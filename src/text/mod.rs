//! Text input: positions, the reader cursor, named source files and terminal matchers.

pub mod file;
pub mod position;
pub mod reader;
pub mod terminal;

pub use file::File;
pub use position::Position;
pub use reader::{anchored, Reader, ReaderOptions};
