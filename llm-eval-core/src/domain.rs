pub mod batch;
pub mod keys;
pub mod scores;

pub use batch::*;
pub use keys::*;
pub use scores::*;
