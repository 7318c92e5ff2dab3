pub mod builder;
pub mod resolver;
pub mod result;

pub use builder::{
    index_translations, merge_translations, BatchJson, BuiltJson, BuiltRow, JsonMergeBuilder,
    RowJson,
};
pub use resolver::{Field, FinalValues, ResolvedValue, ValueResolver, ValueSource};
pub use result::{
    collect_requests, load_results, write_requests, LoadedResults, MalformedResult,
    RequestSource, TranslatedFields, TranslationRequest, TranslationResult,
};
