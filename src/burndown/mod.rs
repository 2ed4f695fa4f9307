pub mod calculator;

pub use calculator::{BurndownCalculator, Granularity};
