pub use attribute::*;
pub use class::*;
pub use code::*;
pub use consts::*;
pub use error::*;
pub use field::*;
pub use method::*;

mod attribute;
mod class;
mod code;
mod consts;
mod error;
mod field;
mod method;

pub type IResult<'a, O> = nom::IResult<&'a [u8], O, ParsingError<'a>>;
