pub mod loader;
pub mod writer;

pub use loader::{CatalogLoader, ColumnMap, LoaderConfig};
pub use writer::JsonWriter;
