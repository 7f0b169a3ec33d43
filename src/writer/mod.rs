pub mod emitter;
pub mod script;
pub mod template;

pub use emitter::*;
pub use script::*;
pub use template::*;
