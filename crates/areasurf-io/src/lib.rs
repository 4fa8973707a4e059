pub mod context;
pub mod host;
pub mod json;
pub mod schema;

pub use context::HostContext;
pub use host::FileHost;
pub use json::{load_graph, load_settings, write_json};
pub use schema::{settings_schema, write_schema};
