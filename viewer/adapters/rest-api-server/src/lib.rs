pub use server::{router, run};

mod page;
mod server;
