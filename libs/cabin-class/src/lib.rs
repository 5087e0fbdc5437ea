mod class;
mod field;
mod inject;
mod method;
mod source;
mod state;

pub use class::*;
pub use field::*;
pub use inject::*;
pub use method::*;
pub use source::*;
pub use state::*;
