pub mod accuracy;
pub mod bleu;
pub mod rouge;

pub use accuracy::*;
pub use bleu::*;
pub use rouge::*;
