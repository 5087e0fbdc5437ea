use cabin_reader::ClassFormatError;
use std::error::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
	/// No container and no loader knows the class. Callers are expected to handle this.
	#[error("class {0} not found")]
	ClassNotFound(String),
	#[error("malformed class data: {0}")]
	Malformed(#[from] ClassFormatError),
	#[error("expected class {expected} but the class file defines {found}")]
	WrongName { expected: String, found: String },
	#[error("failed to read from {container}")]
	Io {
		container: String,
		#[source]
		source: Box<dyn Error + Send + Sync + 'static>,
	},
	#[error("linkage error: {0}")]
	Linkage(String),
	/// A registry or loader contract was broken.
	#[error("internal error: {0}")]
	Internal(String),
}

impl LoadError {
	pub fn io(container: String, report: eyre::Report) -> LoadError {
		LoadError::Io {
			container,
			source: report.into(),
		}
	}
}

#[derive(Error, Debug)]
pub enum InitError {
	#[error("initializer of {class} failed: {message}")]
	Initializer { class: String, message: String },
	#[error("class {0} is in an erroneous state")]
	Erroneous(String),
	#[error(transparent)]
	Load(#[from] LoadError),
}
