pub mod i18n;
pub mod model;
pub mod report;
pub mod sheet;
pub mod translation;
pub mod utils;
pub mod workflow;

pub use i18n::{MultiLanguageObject, MultiLanguageStore, StoreOptions};
pub use model::{EntityKind, RawRow, RowModel};
pub use report::{RunReport, RunStatus};
pub use sheet::{decode_all, DecodeOutcome, DecodeStatistics, SheetTabReader, SheetTabWriter};
pub use translation::{merge_translations, JsonMergeBuilder, TranslationResult, ValueResolver};
pub use utils::{AppConfig, Result, RowDecodeError, SheetTranslatorError};
pub use workflow::{run_tab, run_tabs, TabJob};
