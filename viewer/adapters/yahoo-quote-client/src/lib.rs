pub use client::YahooQuoteClient;

mod client;
mod models;
