// mrmark-core/src/ports/mod.rs

pub mod connector;

pub use connector::Connector;
