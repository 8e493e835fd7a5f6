pub mod fare_parser;

pub use fare_parser::FareExtractor;
