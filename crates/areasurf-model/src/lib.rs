pub mod curves;
pub mod flatten;
pub mod graph;
pub mod locate;
pub mod metadata;

use thiserror::Error;

pub use curves::{CurveLookup, ExtractedCurves, extract_curves};
pub use flatten::{Flatten, flatten};
pub use graph::{ModelObject, ObjectGraph, ObjectKey, Value};
pub use locate::{is_area_boundary, locate_boundaries};
pub use metadata::{Metadata, extract_metadata};

#[derive(Error, Debug)]
pub enum Error {
    #[error("object graph has no root object")]
    EmptyGraph,
    #[error("expected a JSON object or an array of objects, found {0}")]
    UnexpectedRoot(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
