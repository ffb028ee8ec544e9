mod parsers;
mod types;

pub use self::types::*;
