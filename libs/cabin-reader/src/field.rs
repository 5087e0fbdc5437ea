use cabin_core::{FieldAccessFlags, Type};
use nom::error::context;
use nom::number::complete::be_u16;

use crate::attribute::AttributeInfo;
use crate::consts::{be_utf8, ConstantPool};
use crate::{IResult, ParsingError};

//field_info {
//     u16             access_flags;
//     u16             name_index;
//     u16             descriptor_index;
//     u16             attributes_count;
//     attribute_info attributes[attributes_count];
// }
#[derive(Debug)]
pub struct FieldInfo {
	pub access_flags: FieldAccessFlags,
	pub name: String,
	pub descriptor: String,
	/// Recorded whatever the flags say, see [`FieldInfo::constant_value`].
	pub constant_value_index: Option<u16>,
	pub deprecated: bool,
	pub signature: Option<String>,
}

impl FieldInfo {
	pub fn parse<'a>(input: &'a [u8], constant_pool: &ConstantPool) -> IResult<'a, Self> {
		let (input, access_flags) = context("Field flags", be_u16)(input)?;
		let mut access_flags = FieldAccessFlags::from_bits_retain(access_flags);
		let (input, name) = context("Field name", be_utf8(constant_pool))(input)?;

		let descriptor_input = input;
		let (input, descriptor) = context("Field descriptor", be_utf8(constant_pool))(input)?;
		if Type::parse(descriptor).is_none() {
			return Err(nom::Err::Failure(ParsingError::malformed(
				descriptor_input,
				format!("invalid field descriptor {descriptor:?}"),
			)));
		}

		let (input, attributes) = AttributeInfo::parse_list(input, constant_pool)?;

		let mut constant_value_index = None;
		let mut deprecated = false;
		let mut signature = None;
		for attribute in attributes {
			match attribute {
				AttributeInfo::ConstantValue { constant_index } => {
					constant_value_index = Some(constant_index);
				}
				AttributeInfo::Deprecated => deprecated = true,
				AttributeInfo::Synthetic => access_flags |= FieldAccessFlags::SYNTHETIC,
				AttributeInfo::Signature { signature: value } => signature = Some(value),
				_ => {}
			}
		}

		Ok((
			input,
			FieldInfo {
				access_flags,
				name: name.to_string(),
				descriptor: descriptor.to_string(),
				constant_value_index,
				deprecated,
				signature,
			},
		))
	}

	/// The constant pool index of the initial value, only static fields have one.
	pub fn constant_value(&self) -> Option<u16> {
		if self.access_flags.contains(FieldAccessFlags::STATIC) {
			self.constant_value_index
		} else {
			None
		}
	}

	/// Longs and doubles take two slots.
	pub fn is_category_two(&self) -> bool {
		self.descriptor.starts_with('J') || self.descriptor.starts_with('D')
	}
}
