pub mod catalogs;
pub mod clocks;
pub mod ledgers;
pub mod navigators;
pub mod pipelines;
