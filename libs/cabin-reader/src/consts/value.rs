use crate::impl_constant;
use std::ops::Deref;

#[derive(Copy, Clone, Debug)]
pub struct IntegerConst {
	pub bytes: i32,
}

#[derive(Copy, Clone, Debug)]
pub struct FloatConst {
	pub bytes: f32,
}

/// Takes two pool slots.
#[derive(Copy, Clone, Debug)]
pub struct LongConst {
	pub bytes: i64,
}

/// Takes two pool slots.
#[derive(Copy, Clone, Debug)]
pub struct DoubleConst {
	pub bytes: f64,
}

/// Text decoded from modified UTF-8.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UTF8Const(pub String);

impl UTF8Const {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Deref for UTF8Const {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl_constant!(Integer IntegerConst);
impl_constant!(Float FloatConst);
impl_constant!(Long LongConst);
impl_constant!(Double DoubleConst);
impl_constant!(UTF8 UTF8Const);
