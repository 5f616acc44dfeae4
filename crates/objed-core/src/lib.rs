//! objed-core: flat form data <-> nested JSON/YAML documents
//!
//! This crate focuses on a small, well-factored surface:
//! - Path reconstruction: dotted form keys back into a nested document
//!   (`rebuild`), with leaf coercion (`coerce`) and key grammar (`path`)
//! - The inverse: documents into dotted form keys (`flatten`)
//! - Editing session over a folder of `.json`/`.yml`/`.yaml` files, JSON and
//!   YAML persistence, and zip backups before overwriting
//!
pub mod backup;
pub mod coerce;
pub mod error;
pub mod flatten;
pub mod path;
pub mod rebuild;
pub mod session;
pub mod store;

pub use coerce::{coerce, parse_number};
pub use error::{Error, Result};
pub use flatten::{equivalent, flatten, render_scalar};
pub use path::{DELIMITER, MAX_LIST_INDEX, is_numeric_segment, list_index, split_key};
pub use rebuild::{
    ArrayNormalization, ContainerPolicy, FlatMapping, RebuildOpts, form_to_document,
    rebuild_array, rebuild_object,
};
pub use session::{SaveOpts, Saved, Session, list_documents};
pub use store::{DocFormat, load_document, read_form, to_text, write_document};
