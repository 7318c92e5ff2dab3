pub mod cache;
pub mod store;

pub use cache::ParseCache;
pub use store::{
    shallow_merge, LanguagePayload, MultiLanguageObject, MultiLanguageStore, StoreOptions,
};
