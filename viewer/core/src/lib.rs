pub use api::{Viewer, ViewerSettings};

mod api;
