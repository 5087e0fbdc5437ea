use std::fmt::{Display, Formatter, Write};
use std::ops::Deref;

pub use descriptor::*;
pub use flags::*;
pub use kind::*;

mod descriptor;
mod flags;
mod kind;

#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Type {
	Primitive(PrimitiveType),
	Object(ObjectType),
	Array(Box<ArrayType>),
}

impl Type {
	pub fn parse(desc: &str) -> Option<Type> {
		let (ty, len) = Self::parse_len(desc)?;
		if len != desc.len() {
			return None;
		}
		Some(ty)
	}

	pub fn parse_len(desc: &str) -> Option<(Type, usize)> {
		match *desc.as_bytes().first()? {
			b'L' => ObjectType::parse_len(desc).map(|(ty, l)| (Type::Object(ty), l)),
			b'[' => ArrayType::parse_len(desc).map(|(ty, l)| (Type::Array(Box::new(ty)), l)),
			_ => PrimitiveType::parse(desc).map(|v| (Type::Primitive(v), 1)),
		}
	}

	pub fn kind(&self) -> Kind {
		match self {
			Type::Primitive(prim) => prim.kind(),
			Type::Array(_) | Type::Object(_) => Kind::Reference,
		}
	}

	/// The name the class of this type is registered under.
	///
	/// `java/lang/String` for objects, `[I` for arrays and `int` for primitives.
	pub fn class_name(&self) -> String {
		match self {
			Type::Primitive(prim) => prim.name().to_string(),
			Type::Object(object) => object.name.clone(),
			Type::Array(array) => array.to_string(),
		}
	}
}

impl From<ObjectType> for Type {
	fn from(value: ObjectType) -> Self {
		Type::Object(value)
	}
}

impl From<PrimitiveType> for Type {
	fn from(value: PrimitiveType) -> Self {
		Type::Primitive(value)
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Primitive(v) => v.fmt(f),
			Type::Object(v) => v.fmt(f),
			Type::Array(v) => v.fmt(f),
		}
	}
}

#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum PrimitiveType {
	Boolean,
	Byte,
	Short,
	Int,
	Long,
	Char,
	Float,
	Double,
}

impl PrimitiveType {
	pub const ALL: [PrimitiveType; 8] = [
		PrimitiveType::Boolean,
		PrimitiveType::Byte,
		PrimitiveType::Short,
		PrimitiveType::Int,
		PrimitiveType::Long,
		PrimitiveType::Char,
		PrimitiveType::Float,
		PrimitiveType::Double,
	];

	pub fn parse(desc: &str) -> Option<PrimitiveType> {
		Self::from_char(*desc.as_bytes().first()?)
	}

	pub fn from_char(char: u8) -> Option<PrimitiveType> {
		Some(match char {
			b'Z' => PrimitiveType::Boolean,
			b'B' => PrimitiveType::Byte,
			b'C' => PrimitiveType::Char,
			b'D' => PrimitiveType::Double,
			b'F' => PrimitiveType::Float,
			b'I' => PrimitiveType::Int,
			b'J' => PrimitiveType::Long,
			b'S' => PrimitiveType::Short,
			_ => {
				return None;
			}
		})
	}

	pub fn char(&self) -> char {
		match self {
			PrimitiveType::Boolean => 'Z',
			PrimitiveType::Byte => 'B',
			PrimitiveType::Short => 'S',
			PrimitiveType::Int => 'I',
			PrimitiveType::Long => 'J',
			PrimitiveType::Char => 'C',
			PrimitiveType::Float => 'F',
			PrimitiveType::Double => 'D',
		}
	}

	/// The language keyword, which is also the name of the primitive class.
	pub fn name(&self) -> &'static str {
		match self {
			PrimitiveType::Boolean => "boolean",
			PrimitiveType::Byte => "byte",
			PrimitiveType::Short => "short",
			PrimitiveType::Int => "int",
			PrimitiveType::Long => "long",
			PrimitiveType::Char => "char",
			PrimitiveType::Float => "float",
			PrimitiveType::Double => "double",
		}
	}

	pub fn from_name(name: &str) -> Option<PrimitiveType> {
		Self::ALL.into_iter().find(|prim| prim.name() == name)
	}

	/// The `atype` operand of `newarray`.
	pub fn array_code(&self) -> u8 {
		match self {
			PrimitiveType::Boolean => 4,
			PrimitiveType::Char => 5,
			PrimitiveType::Float => 6,
			PrimitiveType::Double => 7,
			PrimitiveType::Byte => 8,
			PrimitiveType::Short => 9,
			PrimitiveType::Int => 10,
			PrimitiveType::Long => 11,
		}
	}

	pub fn from_array_code(code: u8) -> Option<PrimitiveType> {
		Self::ALL.into_iter().find(|prim| prim.array_code() == code)
	}

	pub fn kind(&self) -> Kind {
		match self {
			PrimitiveType::Boolean => Kind::Boolean,
			PrimitiveType::Byte => Kind::Byte,
			PrimitiveType::Short => Kind::Short,
			PrimitiveType::Int => Kind::Int,
			PrimitiveType::Long => Kind::Long,
			PrimitiveType::Char => Kind::Char,
			PrimitiveType::Float => Kind::Float,
			PrimitiveType::Double => Kind::Double,
		}
	}
}

impl Display for PrimitiveType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_char(self.char())
	}
}

#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct ObjectType {
	pub name: String,
}

impl ObjectType {
	pub fn new(name: impl Into<String>) -> ObjectType {
		ObjectType { name: name.into() }
	}

	pub fn parse_len(string: &str) -> Option<(ObjectType, usize)> {
		if string.as_bytes().first()? != &b'L' {
			return None;
		}

		let end = string.find(';')?;
		if end == 1 {
			return None;
		}

		Some((
			ObjectType {
				name: string[1..end].to_string(),
			},
			end + 1,
		))
	}

	pub fn kind(&self) -> Kind {
		Kind::Reference
	}
}

impl Deref for ObjectType {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.name
	}
}

impl Display for ObjectType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_char('L')?;
		f.write_str(&self.name)?;
		f.write_char(';')
	}
}

#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct ArrayType {
	pub component: Type,
}

impl ArrayType {
	pub fn new(component: Type) -> ArrayType {
		ArrayType { component }
	}

	pub fn parse_len(string: &str) -> Option<(ArrayType, usize)> {
		if string.as_bytes().first()? != &b'[' {
			return None;
		}

		let (component, length) = Type::parse_len(&string[1..])?;
		Some((ArrayType { component }, length + 1))
	}

	pub fn component(&self) -> &Type {
		&self.component
	}

	pub fn kind(&self) -> Kind {
		Kind::Reference
	}
}

impl Display for ArrayType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_char('[')?;
		self.component.fmt(f)
	}
}
