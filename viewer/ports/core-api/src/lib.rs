pub use api::ViewerApi;
pub use error::ChartError;
pub use page::{ChartImage, ChartPage, PageState};

mod api;
mod error;
mod page;
