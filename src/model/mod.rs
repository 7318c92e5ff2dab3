pub mod entity;
pub mod row;

pub use entity::EntityKind;
pub use row::{Column, OldJsonValues, RawRow, RowFlags, RowModel};
