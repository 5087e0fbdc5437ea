use crate::attribute::AttributeInfo;
use crate::consts::{be_class, ConstantInfo, ConstantPool};
use crate::field::FieldInfo;
use crate::method::MethodInfo;
use crate::{ClassFormatError, IResult};
use cabin_core::ClassAccessFlags;
use nom::bytes::complete::tag;
use nom::combinator::map;
use nom::error::context;
use nom::multi::length_count;
use nom::number::complete::be_u16;
use tracing::trace;

pub const MAGIC: &[u8; 4] = b"\xca\xfe\xba\xbe";

#[derive(Debug)]
pub struct ClassInfo {
	pub minor_version: u16,
	pub major_version: u16,
	pub constant_pool: ConstantPool,
	pub access_flags: ClassAccessFlags,

	pub this_class: String,
	/// Absent only for `java/lang/Object`.
	pub super_class: Option<String>,

	pub interfaces: Vec<String>,
	pub fields: Vec<FieldInfo>,
	pub methods: Vec<MethodInfo>,

	pub source_file: Option<String>,
	pub signature: Option<String>,
	pub deprecated: bool,
}

impl ClassInfo {
	/// Parses a whole class file, rejecting anything after the last attribute.
	pub fn parse_complete(bytes: &[u8]) -> Result<ClassInfo, ClassFormatError> {
		if !bytes.starts_with(MAGIC) {
			return Err(ClassFormatError::BadMagic);
		}

		match ClassInfo::parse(bytes) {
			Ok(([], info)) => Ok(info),
			Ok((remaining, _)) => Err(ClassFormatError::TrailingBytes {
				count: remaining.len(),
			}),
			Err(nom::Err::Error(error) | nom::Err::Failure(error)) => Err(error.format(bytes)),
			Err(nom::Err::Incomplete(_)) => Err(ClassFormatError::Truncated {
				offset: bytes.len(),
			}),
		}
	}

	pub fn parse(input: &[u8]) -> IResult<Self> {
		let (input, _) = context("CAFE", tag(&MAGIC[..]))(input)?;
		let (input, minor_version) = context("Java Minor Version", be_u16)(input)?;
		let (input, major_version) = context("Java Major Version", be_u16)(input)?;

		let mut skip = 0;
		let (input, constant_pool) = context(
			"Constant Pool",
			map(
				length_count(
					map(be_u16, |num| {
						trace!("cp_pool count {}", num.saturating_sub(1));
						num.saturating_sub(1)
					}),
					|input| ConstantInfo::parse(input, &mut skip),
				),
				ConstantPool::new,
			),
		)(input)?;
		let (input, access_flags) = context(
			"Access flags",
			map(be_u16, ClassAccessFlags::from_bits_retain),
		)(input)?;
		let (input, this_class) = context("This class", be_class(&constant_pool))(input)?;
		let (input, super_class) = context("Class Superclass", |input| -> IResult<Option<&str>> {
			let (remaining, index) = be_u16(input)?;
			if index == 0 {
				return Ok((remaining, None));
			}
			let (remaining, name) = be_class(&constant_pool)(input)?;
			Ok((remaining, Some(name)))
		})(input)?;
		let (input, interfaces) = context(
			"Interfaces",
			length_count(be_u16, be_class(&constant_pool)),
		)(input)?;

		let (input, fields) = context(
			"Fields",
			length_count(be_u16, |input| FieldInfo::parse(input, &constant_pool)),
		)(input)?;
		let (input, methods) = context(
			"Methods",
			length_count(be_u16, |input| MethodInfo::parse(input, &constant_pool)),
		)(input)?;
		let (input, attributes) = AttributeInfo::parse_list(input, &constant_pool)?;

		let mut source_file = None;
		let mut signature = None;
		let mut deprecated = false;
		for attribute in attributes {
			match attribute {
				AttributeInfo::SourceFile { source_file: value } => source_file = Some(value),
				AttributeInfo::Signature { signature: value } => signature = Some(value),
				AttributeInfo::Deprecated => deprecated = true,
				_ => {}
			}
		}

		let this_class = this_class.to_string();
		let super_class = super_class.map(str::to_string);
		let interfaces = interfaces.into_iter().map(str::to_string).collect();
		Ok((
			input,
			ClassInfo {
				minor_version,
				major_version,
				constant_pool,
				access_flags,
				this_class,
				super_class,
				interfaces,
				fields,
				methods,
				source_file,
				signature,
				deprecated,
			},
		))
	}

	pub fn is_interface(&self) -> bool {
		self.access_flags.contains(ClassAccessFlags::INTERFACE)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use cabin_core::FieldAccessFlags;

	const STATIC: u16 = 0x0008;

	/// Constant pool shared by the tests, indices are 1 based.
	const POOL: &[&str] = &[
		"Foo",           // 1
		"",              // 2 (Class #1)
		"x",             // 3
		"I",             // 4
		"ConstantValue", // 5
		"",              // 6 (Integer 7)
		"J",             // 7
		"Deprecated",    // 8
		"Synthetic",     // 9
		"Custom",        // 10
		"Signature",     // 11
		"TT;",           // 12
		"",              // 13 (String #0)
	];

	fn pool() -> Vec<u8> {
		let mut out = Vec::new();
		out.extend_from_slice(&((POOL.len() + 1) as u16).to_be_bytes());
		for (i, text) in POOL.iter().enumerate() {
			match i + 1 {
				2 => out.extend_from_slice(&[7, 0, 1]),
				6 => out.extend_from_slice(&[3, 0, 0, 0, 7]),
				13 => out.extend_from_slice(&[8, 0, 0]),
				_ => {
					out.push(1);
					out.extend_from_slice(&(text.len() as u16).to_be_bytes());
					out.extend_from_slice(text.as_bytes());
				}
			}
		}
		out
	}

	fn attribute(name: u16, body: &[u8]) -> Vec<u8> {
		let mut out = name.to_be_bytes().to_vec();
		out.extend_from_slice(&(body.len() as u32).to_be_bytes());
		out.extend_from_slice(body);
		out
	}

	fn field(flags: u16, descriptor: u16, attributes: &[Vec<u8>]) -> Vec<u8> {
		let mut out = Vec::new();
		out.extend_from_slice(&flags.to_be_bytes());
		out.extend_from_slice(&3u16.to_be_bytes());
		out.extend_from_slice(&descriptor.to_be_bytes());
		out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
		for attribute in attributes {
			out.extend_from_slice(attribute);
		}
		out
	}

	fn class(fields: &[Vec<u8>]) -> Vec<u8> {
		let mut out = MAGIC.to_vec();
		out.extend_from_slice(&[0, 0, 0, 52]);
		out.extend_from_slice(&pool());
		out.extend_from_slice(&[0, 0x21, 0, 2, 0, 0, 0, 0]);
		out.extend_from_slice(&(fields.len() as u16).to_be_bytes());
		for field in fields {
			out.extend_from_slice(field);
		}
		out.extend_from_slice(&[0, 0, 0, 0]);
		out
	}

	#[test]
	fn parse_class_header() {
		let info = ClassInfo::parse_complete(&class(&[])).unwrap();
		assert_eq!(info.major_version, 52);
		assert_eq!(info.this_class, "Foo");
		assert_eq!(info.super_class, None);
		assert!(info.access_flags.contains(ClassAccessFlags::PUBLIC));
		assert!(!info.is_interface());
	}

	#[test]
	fn field_attributes() {
		let bytes = class(&[
			field(STATIC, 4, &[attribute(5, &[0, 6]), attribute(8, &[])]),
			field(
				0,
				7,
				&[
					attribute(9, &[]),
					attribute(10, &[1, 2, 3, 4, 5]),
					attribute(11, &[0, 12]),
				],
			),
		]);
		let info = ClassInfo::parse_complete(&bytes).unwrap();

		let constant = &info.fields[0];
		assert_eq!(constant.constant_value(), Some(6));
		assert!(constant.deprecated);
		assert!(!constant.is_category_two());

		let wide = &info.fields[1];
		assert!(wide.is_category_two());
		assert!(wide.access_flags.contains(FieldAccessFlags::SYNTHETIC));
		assert_eq!(wide.signature.as_deref(), Some("TT;"));
		assert_eq!(info.signature, None);
	}

	#[test]
	fn instance_constant_value_is_inert() {
		let bytes = class(&[field(0, 4, &[attribute(5, &[0, 6])])]);
		let info = ClassInfo::parse_complete(&bytes).unwrap();
		assert_eq!(info.fields[0].constant_value_index, Some(6));
		assert_eq!(info.fields[0].constant_value(), None);
	}

	#[test]
	fn constant_value_must_point_at_a_value() {
		let bytes = class(&[field(STATIC, 4, &[attribute(5, &[0, 3])])]);
		assert!(matches!(
			ClassInfo::parse_complete(&bytes),
			Err(ClassFormatError::Malformed { .. })
		));
	}

	#[test]
	fn string_constant_needs_text() {
		let bytes = class(&[field(STATIC, 4, &[attribute(5, &[0, 13])])]);
		assert!(matches!(
			ClassInfo::parse_complete(&bytes),
			Err(ClassFormatError::Malformed { .. })
		));
	}

	#[test]
	fn attribute_length_is_enforced() {
		let bytes = class(&[field(STATIC, 4, &[attribute(5, &[0, 6, 0])])]);
		assert!(matches!(
			ClassInfo::parse_complete(&bytes),
			Err(ClassFormatError::Malformed { .. })
		));
	}

	#[test]
	fn attribute_count_past_the_end() {
		let mut bytes = MAGIC.to_vec();
		bytes.extend_from_slice(&[0, 0, 0, 52]);
		bytes.extend_from_slice(&pool());
		bytes.extend_from_slice(&[0, 0x21, 0, 2, 0, 0, 0, 0]);
		bytes.extend_from_slice(&[0, 1]);
		// one field claiming three attributes with only one present
		bytes.extend_from_slice(&[0, 0, 0, 3, 0, 4, 0, 3]);
		bytes.extend_from_slice(&attribute(8, &[]));
		assert!(matches!(
			ClassInfo::parse_complete(&bytes),
			Err(ClassFormatError::Truncated { .. })
		));
	}

	#[test]
	fn bad_descriptor() {
		let bytes = class(&[field(0, 3, &[])]);
		assert!(matches!(
			ClassInfo::parse_complete(&bytes),
			Err(ClassFormatError::Malformed { .. })
		));
	}

	#[test]
	fn magic_and_trailing_bytes() {
		assert!(matches!(
			ClassInfo::parse_complete(b"\xca\xfe\xba\xbf"),
			Err(ClassFormatError::BadMagic)
		));

		let mut bytes = class(&[]);
		bytes.push(0);
		assert!(matches!(
			ClassInfo::parse_complete(&bytes),
			Err(ClassFormatError::TrailingBytes { count: 1 })
		));
	}
}
