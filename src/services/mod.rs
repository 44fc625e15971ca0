pub mod catalog;
pub mod preferences;
pub mod recommendations;

pub use catalog::CatalogLookup;
pub use preferences::{PreferenceStore, PreferenceUpdater};
pub use recommendations::Recommender;
