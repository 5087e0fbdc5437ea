use std::error::Error;

use nom::error::{ErrorKind, FromExternalError, ParseError};
use thiserror::Error;

type ExternalError = Box<dyn Error + Send + Sync + 'static>;

/// Class data that does not form a valid class file.
#[derive(Error, Debug)]
pub enum ClassFormatError {
	#[error("not a class file, bad magic")]
	BadMagic,
	#[error("class data truncated at byte {offset}")]
	Truncated { offset: usize },
	#[error("malformed class data at byte {offset}: {reason}")]
	Malformed { offset: usize, reason: String },
	#[error("{count} trailing bytes after the class file")]
	TrailingBytes { count: usize },
}

pub struct ParsingError<'a> {
	parts: Vec<(&'a [u8], ParsingErrorPart)>,
}

impl<'a> ParsingError<'a> {
	pub fn malformed(input: &'a [u8], reason: impl Into<String>) -> Self {
		ParsingError {
			parts: vec![(input, ParsingErrorPart::Message(reason.into()))],
		}
	}

	/// Resolves the collected frames against the buffer the parser started on.
	pub fn format(self, source: &[u8]) -> ClassFormatError {
		let mut parts = self.parts.into_iter();
		let Some((remaining, root)) = parts.next() else {
			return ClassFormatError::Malformed {
				offset: 0,
				reason: "unknown error".to_string(),
			};
		};

		let offset = offset_in(source, remaining);
		let mut reason = match root {
			ParsingErrorPart::NomError(ErrorKind::Eof) => {
				return ClassFormatError::Truncated { offset };
			}
			part => part.to_string(),
		};

		for (_, part) in parts {
			if let ParsingErrorPart::Context(context) = part {
				reason.push_str(" in ");
				reason.push_str(context);
			}
		}

		ClassFormatError::Malformed { offset, reason }
	}
}

fn offset_in(source: &[u8], remaining: &[u8]) -> usize {
	// Sub-slices of attribute bodies end before the source does, so compare addresses.
	let start = source.as_ptr() as usize;
	let at = remaining.as_ptr() as usize;
	at.checked_sub(start)
		.filter(|offset| *offset <= source.len())
		.unwrap_or(source.len() - remaining.len().min(source.len()))
}

pub enum ParsingErrorPart {
	External(ExternalError),
	Message(String),
	Context(&'static str),
	NomError(ErrorKind),
}

impl std::fmt::Display for ParsingErrorPart {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ParsingErrorPart::External(error) => write!(f, "{error}"),
			ParsingErrorPart::Message(message) => f.write_str(message),
			ParsingErrorPart::Context(context) => f.write_str(context),
			ParsingErrorPart::NomError(error) => f.write_str(error.description()),
		}
	}
}

impl<'a> std::fmt::Debug for ParsingError<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list()
			.entries(self.parts.iter().map(|(_, part)| part.to_string()))
			.finish()
	}
}

impl<'a> ParseError<&'a [u8]> for ParsingError<'a> {
	fn from_error_kind(input: &'a [u8], kind: ErrorKind) -> Self {
		ParsingError {
			parts: vec![(input, ParsingErrorPart::NomError(kind))],
		}
	}

	fn append(input: &'a [u8], kind: ErrorKind, mut other: Self) -> Self {
		other.parts.push((input, ParsingErrorPart::NomError(kind)));
		other
	}
}

impl<'a, E> FromExternalError<&'a [u8], E> for ParsingError<'a>
where
	E: Error + Send + Sync + 'static,
{
	fn from_external_error(input: &'a [u8], _: ErrorKind, e: E) -> Self {
		ParsingError {
			parts: vec![(input, ParsingErrorPart::External(Box::new(e)))],
		}
	}
}

impl<'a> nom::error::ContextError<&'a [u8]> for ParsingError<'a> {
	fn add_context(input: &'a [u8], ctx: &'static str, mut other: Self) -> Self {
		other.parts.push((input, ParsingErrorPart::Context(ctx)));
		other
	}
}
