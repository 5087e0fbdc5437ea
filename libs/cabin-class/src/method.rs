use cabin_core::{MethodAccessFlags, MethodDescriptor};
use cabin_reader::{Code, MethodInfo};
use eyre::ContextCompat;
use std::sync::Arc;

pub const CLASS_INITIALIZER: &str = "<clinit>";

pub struct Method {
	pub name: String,
	pub desc: MethodDescriptor,
	pub flags: MethodAccessFlags,
	pub code: Option<Code>,
	pub exceptions: Vec<String>,
	pub signature: Option<String>,
	pub deprecated: bool,
}

impl Method {
	pub fn parse(info: MethodInfo) -> eyre::Result<Method> {
		let desc = MethodDescriptor::parse(&info.descriptor)
			.wrap_err_with(|| format!("Invalid descriptor {}", info.descriptor))?;

		Ok(Method {
			name: info.name,
			desc,
			flags: info.access_flags,
			code: info.code,
			exceptions: info.exceptions,
			signature: info.signature,
			deprecated: info.deprecated,
		})
	}

	pub fn to_identifier(&self) -> MethodIdentifier {
		MethodIdentifier {
			name: Arc::from(&*self.name),
			descriptor: Arc::from(self.desc.to_string()),
		}
	}

	pub fn is_static(&self) -> bool {
		self.flags.contains(MethodAccessFlags::STATIC)
	}

	pub fn is_abstract(&self) -> bool {
		self.flags.contains(MethodAccessFlags::ABSTRACT)
	}

	/// `static void <clinit>()`
	pub fn is_class_initializer(&self) -> bool {
		self.name == CLASS_INITIALIZER
			&& self.desc.parameters.is_empty()
			&& self.desc.returns.is_none()
	}
}

impl std::fmt::Debug for Method {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", self.name, self.desc)
	}
}

#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct MethodIdentifier {
	pub name: Arc<str>,
	pub descriptor: Arc<str>,
}

impl MethodIdentifier {
	pub fn new(name: &str, descriptor: &str) -> MethodIdentifier {
		MethodIdentifier {
			name: Arc::from(name),
			descriptor: Arc::from(descriptor),
		}
	}
}

impl std::fmt::Display for MethodIdentifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", self.name, self.descriptor)
	}
}
