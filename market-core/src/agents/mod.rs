pub mod seller;

pub use seller::*;
