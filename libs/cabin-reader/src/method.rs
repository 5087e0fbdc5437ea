use cabin_core::{MethodAccessFlags, MethodDescriptor};
use nom::error::context;
use nom::number::complete::be_u16;

use crate::attribute::AttributeInfo;
use crate::code::Code;
use crate::consts::{be_utf8, ConstantPool};
use crate::{IResult, ParsingError};

#[derive(Debug)]
pub struct MethodInfo {
	pub access_flags: MethodAccessFlags,
	pub name: String,
	pub descriptor: String,
	pub code: Option<Code>,
	pub exceptions: Vec<String>,
	pub signature: Option<String>,
	pub deprecated: bool,
}

impl MethodInfo {
	pub fn parse<'a>(input: &'a [u8], constant_pool: &ConstantPool) -> IResult<'a, Self> {
		let (input, access_flags) = context("Method flags", be_u16)(input)?;
		let mut access_flags = MethodAccessFlags::from_bits_retain(access_flags);
		let (input, name) = context("Method name", be_utf8(constant_pool))(input)?;

		let descriptor_input = input;
		let (input, descriptor) = context("Method descriptor", be_utf8(constant_pool))(input)?;
		if MethodDescriptor::parse(descriptor).is_none() {
			return Err(nom::Err::Failure(ParsingError::malformed(
				descriptor_input,
				format!("invalid method descriptor {descriptor:?}"),
			)));
		}

		let (input, attributes) = AttributeInfo::parse_list(input, constant_pool)?;

		let mut code = None;
		let mut exceptions = Vec::new();
		let mut signature = None;
		let mut deprecated = false;
		for attribute in attributes {
			match attribute {
				AttributeInfo::Code { code: value } => code = Some(value),
				AttributeInfo::Exceptions { exceptions: value } => exceptions = value,
				AttributeInfo::Signature { signature: value } => signature = Some(value),
				AttributeInfo::Deprecated => deprecated = true,
				AttributeInfo::Synthetic => access_flags |= MethodAccessFlags::SYNTHETIC,
				_ => {}
			}
		}

		Ok((
			input,
			MethodInfo {
				access_flags,
				name: name.to_string(),
				descriptor: descriptor.to_string(),
				code,
				exceptions,
				signature,
				deprecated,
			},
		))
	}
}
