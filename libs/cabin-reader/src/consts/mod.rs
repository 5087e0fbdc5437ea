mod refs;
mod value;

pub use crate::consts::refs::*;
pub use crate::consts::value::*;
use crate::{IResult, ParsingError};
use nom::combinator::map;
use nom::multi::length_data;
use nom::number::complete::{be_f32, be_f64, be_i32, be_i64, be_u16, be_u8};
use nom::sequence::pair;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use tracing::trace;

#[macro_export]
macro_rules! impl_constant {
	($VARIANT:ident $TY:ty) => {
		impl $crate::Constant for $TY {
			fn get(value: &$crate::ConstantInfo) -> Option<&Self> {
				if let $crate::ConstantInfo::$VARIANT(v) = value {
					return Some(v);
				}
				None
			}
		}
	};
}

pub trait Constant {
	fn get(value: &ConstantInfo) -> Option<&Self>;
}

pub struct ConstPtr<V: Constant>(u16, PhantomData<V>);

impl<V: Constant> ConstPtr<V> {
	pub fn new(id: u16) -> ConstPtr<V> {
		ConstPtr(id, PhantomData)
	}

	pub fn index(&self) -> u16 {
		self.0
	}

	pub fn get<'a>(&self, cp: &'a ConstantPool) -> Option<&'a V> {
		cp.get(*self)
	}
}

impl<V: Constant> Clone for ConstPtr<V> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<V: Constant> Copy for ConstPtr<V> {}

impl<V: Constant> Debug for ConstPtr<V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

/// Reads a constant pool index and resolves it to the text of a Utf8 entry.
pub fn be_utf8<'a, 'c>(cp: &'c ConstantPool) -> impl FnMut(&'a [u8]) -> IResult<'a, &'c str> {
	move |input| {
		let (remaining, index) = be_u16(input)?;
		match cp.get(ConstPtr::<UTF8Const>::new(index)) {
			Some(text) => Ok((remaining, text.as_str())),
			None => Err(nom::Err::Failure(ParsingError::malformed(
				input,
				format!("constant #{index} is not a Utf8 entry"),
			))),
		}
	}
}

/// Reads a constant pool index and resolves it to the name of a Class entry.
pub fn be_class<'a, 'c>(cp: &'c ConstantPool) -> impl FnMut(&'a [u8]) -> IResult<'a, &'c str> {
	move |input| {
		let (remaining, index) = be_u16(input)?;
		match cp.class_name(index) {
			Some(name) => Ok((remaining, name)),
			None => Err(nom::Err::Failure(ParsingError::malformed(
				input,
				format!("constant #{index} is not a Class entry"),
			))),
		}
	}
}

#[derive(Debug)]
pub struct ConstantPool(Vec<ConstantInfo>);

impl ConstantPool {
	pub fn new(values: Vec<ConstantInfo>) -> ConstantPool {
		ConstantPool(values)
	}

	/// Index 0 and indices past the end resolve to nothing.
	pub fn raw_get(&self, index: u16) -> Option<&ConstantInfo> {
		self.0.get((index as usize).checked_sub(1)?)
	}

	pub fn get<V: Constant>(&self, ptr: ConstPtr<V>) -> Option<&V> {
		V::get(self.raw_get(ptr.0)?)
	}

	pub fn class_name(&self, index: u16) -> Option<&str> {
		self.get(ConstPtr::<ClassConst>::new(index))?.name(self)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[derive(Debug)]
pub enum ConstantInfo {
	Class(ClassConst),
	Field(MemberConst),
	Method(MemberConst),
	Interface(MemberConst),
	String(StringConst),
	Integer(IntegerConst),
	Float(FloatConst),
	Long(LongConst),
	Double(DoubleConst),
	NameAndType(NameAndTypeConst),
	UTF8(UTF8Const),
	MethodHandle(MethodHandleConst),
	MethodType(MethodTypeConst),
	Dynamic(DynamicConst),
	InvokeDynamic(DynamicConst),
	Module(ModuleConst),
	Package(ModuleConst),
	/// The slot after a Long or Double.
	Unusable,
}

impl ConstantInfo {
	/// Whether a `ConstantValue` attribute may point at this entry.
	pub fn is_loadable_value(&self) -> bool {
		matches!(
			self,
			ConstantInfo::Integer(_)
				| ConstantInfo::Float(_)
				| ConstantInfo::Long(_)
				| ConstantInfo::Double(_)
				| ConstantInfo::String(_)
		)
	}

	pub fn parse<'a>(input: &'a [u8], skip: &mut usize) -> IResult<'a, Self> {
		if *skip > 0 {
			*skip -= 1;
			return Ok((input, ConstantInfo::Unusable));
		}
		let (input, variant) = be_u8(input)?;

		trace!("cp_info tag: {variant}");
		match variant {
			1 => {
				let (remaining, data) = length_data(be_u16)(input)?;
				let text = mutf8::mutf8_to_utf8(data)
					.ok()
					.and_then(|data| String::from_utf8(data.into_owned()).ok());
				match text {
					Some(text) => Ok((remaining, ConstantInfo::UTF8(UTF8Const(text)))),
					None => Err(nom::Err::Failure(ParsingError::malformed(
						input,
						"invalid modified UTF-8",
					))),
				}
			}
			3 => map(be_i32, |bytes| ConstantInfo::Integer(IntegerConst { bytes }))(input),
			4 => map(be_f32, |bytes| ConstantInfo::Float(FloatConst { bytes }))(input),
			5 => {
				*skip += 1;
				map(be_i64, |bytes| ConstantInfo::Long(LongConst { bytes }))(input)
			}
			6 => {
				*skip += 1;
				map(be_f64, |bytes| ConstantInfo::Double(DoubleConst { bytes }))(input)
			}
			7 => map(be_u16, |name_index| {
				ConstantInfo::Class(ClassConst {
					name: ConstPtr::new(name_index),
				})
			})(input),
			8 => map(be_u16, |string_index| {
				ConstantInfo::String(StringConst {
					string: ConstPtr::new(string_index),
				})
			})(input),
			9 => map(member, ConstantInfo::Field)(input),
			10 => map(member, ConstantInfo::Method)(input),
			11 => map(member, ConstantInfo::Interface)(input),
			12 => map(pair(be_u16, be_u16), |(name_index, descriptor_index)| {
				ConstantInfo::NameAndType(NameAndTypeConst {
					name: ConstPtr::new(name_index),
					descriptor: ConstPtr::new(descriptor_index),
				})
			})(input),
			15 => map(pair(be_u8, be_u16), |(reference_kind, reference_index)| {
				ConstantInfo::MethodHandle(MethodHandleConst {
					reference_kind,
					reference_index,
				})
			})(input),
			16 => map(be_u16, |descriptor_index| {
				ConstantInfo::MethodType(MethodTypeConst {
					descriptor: ConstPtr::new(descriptor_index),
				})
			})(input),
			17 => map(dynamic, ConstantInfo::Dynamic)(input),
			18 => map(dynamic, ConstantInfo::InvokeDynamic)(input),
			19 => map(be_u16, |name| {
				ConstantInfo::Module(ModuleConst {
					name: ConstPtr::new(name),
				})
			})(input),
			20 => map(be_u16, |name| {
				ConstantInfo::Package(ModuleConst {
					name: ConstPtr::new(name),
				})
			})(input),
			tag => Err(nom::Err::Failure(ParsingError::malformed(
				input,
				format!("unknown constant tag {tag}"),
			))),
		}
	}
}

fn member(input: &[u8]) -> IResult<MemberConst> {
	map(pair(be_u16, be_u16), |(class, name_and_type)| MemberConst {
		class: ConstPtr::new(class),
		name_and_type: ConstPtr::new(name_and_type),
	})(input)
}

fn dynamic(input: &[u8]) -> IResult<DynamicConst> {
	map(pair(be_u16, be_u16), |(bootstrap_method_attr_index, name_and_type)| DynamicConst {
		bootstrap_method_attr_index,
		name_and_type: ConstPtr::new(name_and_type),
	})(input)
}
