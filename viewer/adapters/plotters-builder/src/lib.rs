pub use builder::PlottersBuilder;

mod builder;
