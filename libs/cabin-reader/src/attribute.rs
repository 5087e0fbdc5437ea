use nom::error::context;
use nom::multi::{length_count, length_data};
use nom::number::complete::{be_u16, be_u32};

use crate::code::Code;
use crate::consts::{be_class, be_utf8, ConstantInfo, ConstantPool};
use crate::{IResult, ParsingError};

#[derive(Debug)]
pub enum AttributeInfo {
	ConstantValue { constant_index: u16 },
	Code { code: Code },
	Exceptions { exceptions: Vec<String> },
	Synthetic,
	Deprecated,
	Signature { signature: String },
	SourceFile { source_file: String },
	RuntimeVisibleAnnotations,
	RuntimeInvisibleAnnotations,
	/// Any attribute this reader does not interpret, skipped using its declared length.
	Unknown { name: String },
}

impl AttributeInfo {
	pub fn parse_list<'a>(input: &'a [u8], constant_pool: &ConstantPool) -> IResult<'a, Vec<Self>> {
		context(
			"Attributes",
			length_count(be_u16, |input| AttributeInfo::parse(input, constant_pool)),
		)(input)
	}

	/// Parses one attribute, the body never reads past the declared `attribute_length`.
	pub fn parse<'a>(input: &'a [u8], constant_pool: &ConstantPool) -> IResult<'a, Self> {
		let (input, name) = be_utf8(constant_pool)(input)?;
		let (input, body) = length_data(be_u32)(input)?;

		let attribute = match name {
			"ConstantValue" => within(name, body, |input| {
				let (remaining, constant_index) = be_u16(input)?;
				match constant_pool.raw_get(constant_index) {
					Some(ConstantInfo::String(string)) if string.string.get(constant_pool).is_none() => {
						Err(nom::Err::Failure(ParsingError::malformed(
							input,
							format!("String constant #{constant_index} has no Utf8 text"),
						)))
					}
					Some(info) if info.is_loadable_value() => {
						Ok((remaining, AttributeInfo::ConstantValue { constant_index }))
					}
					_ => Err(nom::Err::Failure(ParsingError::malformed(
						input,
						format!("constant #{constant_index} is not a constant value"),
					))),
				}
			})?,
			"Code" => within(name, body, |input| {
				let (input, code) = context("Code", |input| Code::parse(input, constant_pool))(input)?;
				Ok((input, AttributeInfo::Code { code }))
			})?,
			"Exceptions" => within(name, body, |input| {
				let (input, exceptions) = length_count(be_u16, be_class(constant_pool))(input)?;
				Ok((
					input,
					AttributeInfo::Exceptions {
						exceptions: exceptions.into_iter().map(str::to_string).collect(),
					},
				))
			})?,
			"Signature" => within(name, body, |input| {
				let (input, signature) = be_utf8(constant_pool)(input)?;
				Ok((
					input,
					AttributeInfo::Signature {
						signature: signature.to_string(),
					},
				))
			})?,
			"SourceFile" => within(name, body, |input| {
				let (input, source_file) = be_utf8(constant_pool)(input)?;
				Ok((
					input,
					AttributeInfo::SourceFile {
						source_file: source_file.to_string(),
					},
				))
			})?,
			"Synthetic" => within(name, body, |input| Ok((input, AttributeInfo::Synthetic)))?,
			"Deprecated" => within(name, body, |input| Ok((input, AttributeInfo::Deprecated)))?,
			"RuntimeVisibleAnnotations" => AttributeInfo::RuntimeVisibleAnnotations,
			"RuntimeInvisibleAnnotations" => AttributeInfo::RuntimeInvisibleAnnotations,
			_ => AttributeInfo::Unknown {
				name: name.to_string(),
			},
		};

		Ok((input, attribute))
	}
}

fn within<'a, O>(
	name: &str,
	body: &'a [u8],
	mut parser: impl FnMut(&'a [u8]) -> IResult<'a, O>,
) -> Result<O, nom::Err<ParsingError<'a>>> {
	let (remaining, value) = parser(body)?;
	if !remaining.is_empty() {
		return Err(nom::Err::Failure(ParsingError::malformed(
			remaining,
			format!("{} unread bytes in {name} attribute", remaining.len()),
		)));
	}
	Ok(value)
}
