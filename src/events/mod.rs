pub mod fields;
pub mod import;
pub mod models;
pub mod normalize;
pub mod parse;
