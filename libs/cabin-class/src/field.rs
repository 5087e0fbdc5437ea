use crate::{Class, InjectedField};
use cabin_core::{FieldAccessFlags, Type};
use cabin_reader::{ConstantInfo, ConstantPool, FieldInfo};
use eyre::{bail, ContextCompat};
use std::sync::{Arc, OnceLock, Weak};

/// Initial value of a static field, taken from its `ConstantValue` attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
	Int(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	String(String),
}

impl ConstantValue {
	pub fn resolve(cp: &ConstantPool, index: u16) -> eyre::Result<ConstantValue> {
		Ok(match cp.raw_get(index) {
			Some(ConstantInfo::Integer(value)) => ConstantValue::Int(value.bytes),
			Some(ConstantInfo::Float(value)) => ConstantValue::Float(value.bytes),
			Some(ConstantInfo::Long(value)) => ConstantValue::Long(value.bytes),
			Some(ConstantInfo::Double(value)) => ConstantValue::Double(value.bytes),
			Some(ConstantInfo::String(value)) => {
				let text = value
					.string
					.get(cp)
					.wrap_err_with(|| format!("String constant #{index} has no text"))?;
				ConstantValue::String(text.to_string())
			}
			_ => bail!("Constant #{index} is not a value"),
		})
	}
}

pub struct Field {
	pub(crate) class: Weak<Class>,
	pub flags: FieldAccessFlags,
	pub name: String,
	pub descriptor: String,
	pub ty: Type,
	pub category_two: bool,
	/// Only static fields carry one.
	pub constant_value: Option<ConstantValue>,
	pub deprecated: bool,
	pub signature: Option<String>,
	pub injected: bool,
	resolved: OnceLock<Arc<Class>>,
}

impl Field {
	pub fn parse(info: &FieldInfo, cp: &ConstantPool) -> eyre::Result<Field> {
		let ty = Type::parse(&info.descriptor)
			.wrap_err_with(|| format!("Invalid descriptor {}", info.descriptor))?;

		let constant_value = match info.constant_value() {
			Some(index) => Some(ConstantValue::resolve(cp, index)?),
			None => None,
		};

		Ok(Field {
			class: Weak::new(),
			flags: info.access_flags,
			name: info.name.clone(),
			category_two: info.is_category_two(),
			descriptor: info.descriptor.clone(),
			ty,
			constant_value,
			deprecated: info.deprecated,
			signature: info.signature.clone(),
			injected: false,
			resolved: OnceLock::new(),
		})
	}

	pub fn injected(field: &InjectedField) -> eyre::Result<Field> {
		let ty = Type::parse(field.descriptor)
			.wrap_err_with(|| format!("Invalid descriptor {}", field.descriptor))?;

		Ok(Field {
			class: Weak::new(),
			flags: InjectedField::FLAGS,
			name: field.name.to_string(),
			category_two: ty.kind().is_category_2(),
			descriptor: field.descriptor.to_string(),
			ty,
			constant_value: None,
			deprecated: false,
			signature: None,
			injected: true,
			resolved: OnceLock::new(),
		})
	}

	/// The declaring class, `None` only while that class is being built.
	pub fn class(&self) -> Option<Arc<Class>> {
		self.class.upgrade()
	}

	pub fn is_static(&self) -> bool {
		self.flags.contains(FieldAccessFlags::STATIC)
	}

	/// The runtime class of this field's type if it has been resolved.
	pub fn resolved_type(&self) -> Option<&Arc<Class>> {
		self.resolved.get()
	}

	/// Caches the resolved type, the first resolution wins.
	pub fn set_resolved_type(&self, class: Arc<Class>) -> &Arc<Class> {
		self.resolved.get_or_init(|| class)
	}

	pub fn is_accessible_to(&self, requester: &Class) -> bool {
		let Some(declaring) = self.class() else {
			return false;
		};

		if !declaring.is_accessible_to(requester) {
			return false;
		}

		if std::ptr::eq(&*declaring, requester) || self.flags.contains(FieldAccessFlags::PUBLIC) {
			return true;
		}

		if self.flags.contains(FieldAccessFlags::PRIVATE) {
			return false;
		}

		if self.flags.contains(FieldAccessFlags::PROTECTED) {
			return requester.is_subclass_of(&declaring) || declaring.same_package(requester);
		}

		declaring.same_package(requester)
	}
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.name, self.descriptor)
	}
}
