pub mod decoder;
pub mod reader;
pub mod writer;

pub use decoder::{decode_all, DecodeOutcome, DecodeStatistics};
pub use reader::{file_exists, SheetTab, SheetTabReader};
pub use writer::{SheetTabWriter, WriteInstruction};
