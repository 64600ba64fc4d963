pub mod aggregators;
pub mod calculators;
pub mod classification;
pub mod config;
pub mod normalize;
pub mod registry;
pub mod text_generation;

pub use aggregators::*;
pub use calculators::*;
pub use classification::*;
pub use self::config::*;
pub use normalize::*;
pub use registry::*;
pub use text_generation::*;
