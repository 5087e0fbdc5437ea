use nom::combinator::map;
use nom::multi::{length_count, length_data};
use nom::number::complete::{be_u16, be_u32};
use nom::sequence::tuple;

use crate::attribute::AttributeInfo;
use crate::consts::ConstantPool;
use crate::IResult;

#[derive(Debug)]
pub struct ExceptionHandler {
	pub start_pc: u16,
	pub end_pc: u16,
	pub handler_pc: u16,
	/// Zero catches everything.
	pub catch_type: u16,
}

impl ExceptionHandler {
	pub fn parse(input: &[u8]) -> IResult<Self> {
		map(
			tuple((be_u16, be_u16, be_u16, be_u16)),
			|(start_pc, end_pc, handler_pc, catch_type)| ExceptionHandler {
				start_pc,
				end_pc,
				handler_pc,
				catch_type,
			},
		)(input)
	}
}

/// The body of a method, kept as raw bytecode for the execution engine.
#[derive(Debug)]
pub struct Code {
	pub max_stack: u16,
	pub max_locals: u16,
	pub code: Vec<u8>,
	pub exception_table: Vec<ExceptionHandler>,
	pub attribute_info: Vec<AttributeInfo>,
}

impl Code {
	pub fn parse<'a>(input: &'a [u8], constant_pool: &ConstantPool) -> IResult<'a, Self> {
		let (input, max_stack) = be_u16(input)?;
		let (input, max_locals) = be_u16(input)?;
		let (input, code) = length_data(be_u32)(input)?;
		let (input, exception_table) = length_count(be_u16, ExceptionHandler::parse)(input)?;
		let (input, attribute_info) = AttributeInfo::parse_list(input, constant_pool)?;

		Ok((
			input,
			Code {
				max_stack,
				max_locals,
				code: code.to_vec(),
				exception_table,
				attribute_info,
			},
		))
	}
}
