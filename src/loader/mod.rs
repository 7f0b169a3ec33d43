pub mod inputs;
pub mod record;

pub use inputs::*;
pub use record::*;
