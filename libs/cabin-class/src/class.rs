use crate::{injected_fields, ClassState, Field, InitLock, Method, CLASS_INITIALIZER};
use cabin_core::{package_of, ArrayElement, ArrayType, ClassAccessFlags, ObjectType, PrimitiveType, Type};
use cabin_reader::{ClassInfo, ConstantPool};
use eyre::{bail, Context};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use tracing::debug;

/// Identity of the loader that defined a class.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct LoaderId(u32);

impl LoaderId {
	pub const BOOTSTRAP: LoaderId = LoaderId(0);

	/// Ids of user defined loaders start at 1.
	pub fn new(id: u32) -> LoaderId {
		LoaderId(id)
	}

	pub fn is_bootstrap(&self) -> bool {
		*self == LoaderId::BOOTSTRAP
	}

	pub fn index(&self) -> u32 {
		self.0
	}
}

impl Display for LoaderId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if self.is_bootstrap() {
			f.write_str("bootstrap")
		} else {
			write!(f, "loader#{}", self.0)
		}
	}
}

pub enum ClassKind {
	/// Defined from a class file.
	Instance,
	Array {
		component: Arc<Class>,
		dimensions: u8,
	},
	Primitive(PrimitiveType),
}

pub struct Class {
	/// Internal name, `java/lang/Object`, `[I` or `int`.
	pub name: String,
	pub ty: Type,
	pub flags: ClassAccessFlags,
	pub kind: ClassKind,
	pub loader: LoaderId,
	pub package: String,

	pub super_class: Option<Arc<Class>>,
	pub interfaces: Vec<Arc<Class>>,
	pub fields: Vec<Field>,
	pub methods: Vec<Method>,
	/// The constant pool, absent for synthesized classes.
	pub cp: Option<Arc<ConstantPool>>,

	pub source_file: Option<String>,
	pub signature: Option<String>,
	pub deprecated: bool,

	init: InitLock,
}

impl Class {
	/// Builds a class from a parsed class file. The super class and interfaces must already be loaded.
	pub fn new_instance(
		info: ClassInfo,
		loader: LoaderId,
		super_class: Option<Arc<Class>>,
		interfaces: Vec<Arc<Class>>,
	) -> eyre::Result<Arc<Class>> {
		let ClassInfo {
			constant_pool,
			access_flags,
			this_class,
			super_class: super_name,
			interfaces: interface_names,
			fields: field_infos,
			methods: method_infos,
			source_file,
			signature,
			deprecated,
			..
		} = info;

		if super_name.as_deref() != super_class.as_ref().map(|class| class.name.as_str()) {
			bail!("Super class of {this_class} does not match {super_name:?}");
		}
		if interface_names.len() != interfaces.len() {
			bail!("Interfaces of {this_class} do not match {interface_names:?}");
		}

		let mut fields = Vec::with_capacity(field_infos.len());
		for info in &field_infos {
			let field = Field::parse(info, &constant_pool)
				.wrap_err_with(|| format!("in FIELD \"{}\"", info.name))?;
			fields.push(field);
		}

		// runtime fields only go into the boot definitions
		let injected = if loader.is_bootstrap() {
			injected_fields(&this_class)
		} else {
			&[]
		};
		for injected in injected {
			if fields.iter().any(|field| field.name == injected.name) {
				bail!("{this_class} already declares injected field {}", injected.name);
			}
			debug!("Injecting {}:{} into {this_class}", injected.name, injected.descriptor);
			fields.push(Field::injected(injected)?);
		}

		let mut methods = Vec::with_capacity(method_infos.len());
		for info in method_infos {
			let name = info.name.clone();
			let method = Method::parse(info).wrap_err_with(|| format!("in METHOD \"{name}\""))?;
			methods.push(method);
		}

		let package = package_of(&this_class).to_string();
		Ok(Arc::new_cyclic(|this| {
			for field in &mut fields {
				field.class = this.clone();
			}

			Class {
				ty: Type::Object(ObjectType::new(this_class.clone())),
				name: this_class,
				flags: access_flags,
				kind: ClassKind::Instance,
				loader,
				package,
				super_class,
				interfaces,
				fields,
				methods,
				cp: Some(Arc::new(constant_pool)),
				source_file,
				signature,
				deprecated,
				init: InitLock::new(),
			}
		}))
	}

	/// Synthesizes the array class with the given component, owned by the component's loader.
	pub fn new_array(
		component: Arc<Class>,
		super_class: Option<Arc<Class>>,
		interfaces: Vec<Arc<Class>>,
	) -> Arc<Class> {
		let (name, dimensions) = match &component.kind {
			ClassKind::Primitive(prim) => (ArrayElement::Primitive(*prim).array_name(), 1),
			ClassKind::Array { dimensions, .. } => (
				ArrayElement::Class(&component.name).array_name(),
				dimensions.saturating_add(1),
			),
			ClassKind::Instance => (ArrayElement::Class(&component.name).array_name(), 1),
		};

		let flags = (component.flags & ClassAccessFlags::PUBLIC)
			| ClassAccessFlags::FINAL
			| ClassAccessFlags::ABSTRACT;

		Arc::new(Class {
			ty: Type::Array(Box::new(ArrayType::new(component.ty.clone()))),
			name,
			flags,
			loader: component.loader,
			package: component.package.clone(),
			kind: ClassKind::Array {
				component,
				dimensions,
			},
			super_class,
			interfaces,
			fields: Vec::new(),
			methods: Vec::new(),
			cp: None,
			source_file: None,
			signature: None,
			deprecated: false,
			init: InitLock::done(),
		})
	}

	pub fn new_primitive(prim: PrimitiveType) -> Arc<Class> {
		Arc::new(Class {
			name: prim.name().to_string(),
			ty: Type::Primitive(prim),
			flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::FINAL | ClassAccessFlags::ABSTRACT,
			kind: ClassKind::Primitive(prim),
			loader: LoaderId::BOOTSTRAP,
			package: String::new(),
			super_class: None,
			interfaces: Vec::new(),
			fields: Vec::new(),
			methods: Vec::new(),
			cp: None,
			source_file: None,
			signature: None,
			deprecated: false,
			init: InitLock::done(),
		})
	}

	pub fn init(&self) -> &InitLock {
		&self.init
	}

	pub fn state(&self) -> ClassState {
		self.init.state()
	}

	/// True from the moment the initializer starts running.
	pub fn is_initialized(&self) -> bool {
		self.init.is_initialized()
	}

	pub fn is_interface(&self) -> bool {
		self.flags.contains(ClassAccessFlags::INTERFACE)
	}

	pub fn is_array(&self) -> bool {
		matches!(self.kind, ClassKind::Array { .. })
	}

	pub fn is_primitive(&self) -> bool {
		matches!(self.kind, ClassKind::Primitive(_))
	}

	pub fn component(&self) -> Option<&Arc<Class>> {
		match &self.kind {
			ClassKind::Array { component, .. } => Some(component),
			_ => None,
		}
	}

	/// The innermost component of an array class, or the class itself.
	pub fn element(&self) -> &Class {
		let mut class = self;
		while let Some(component) = class.component() {
			class = component;
		}
		class
	}

	pub fn dimensions(&self) -> u8 {
		match &self.kind {
			ClassKind::Array { dimensions, .. } => *dimensions,
			_ => 0,
		}
	}

	pub fn declared_method(&self, name: &str, desc: &str) -> Option<&Method> {
		self.methods
			.iter()
			.find(|method| method.name == name && method.desc.to_string() == desc)
	}

	pub fn class_initializer(&self) -> Option<&Method> {
		self.methods
			.iter()
			.find(|method| method.name == CLASS_INITIALIZER && method.is_class_initializer())
	}

	pub fn declared_field(&self, name: &str) -> Option<&Field> {
		self.fields.iter().find(|field| field.name == name)
	}

	pub fn static_fields(&self) -> impl Iterator<Item = &Field> {
		self.fields.iter().filter(|field| field.is_static())
	}

	/// Interfaces declaring non-abstract instance methods are initialized together with implementing classes.
	pub fn declares_default_methods(&self) -> bool {
		self.is_interface()
			&& self
				.methods
				.iter()
				.any(|method| !method.is_abstract() && !method.is_static())
	}

	/// Whether `other` is a proper superclass of this class.
	pub fn is_subclass_of(&self, other: &Class) -> bool {
		let mut current = self.super_class.as_deref();
		while let Some(class) = current {
			if std::ptr::eq(class, other) {
				return true;
			}
			current = class.super_class.as_deref();
		}
		false
	}

	/// Same runtime package, which is the package name together with the defining loader.
	pub fn same_package(&self, other: &Class) -> bool {
		self.loader == other.loader && self.package == other.package
	}

	pub fn is_accessible_to(&self, requester: &Class) -> bool {
		match &self.kind {
			ClassKind::Primitive(_) => true,
			ClassKind::Array { .. } => self.element().is_accessible_to(requester),
			ClassKind::Instance => {
				self.flags.contains(ClassAccessFlags::PUBLIC) || self.same_package(requester)
			}
		}
	}
}

impl Debug for Class {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Class")
			.field("name", &self.name)
			.field("loader", &self.loader)
			.field("state", &self.state())
			.finish()
	}
}

impl Display for Class {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn primitive_classes() {
		let int = Class::new_primitive(PrimitiveType::Int);
		assert_eq!(int.name, "int");
		assert!(int.is_primitive());
		assert!(int.super_class.is_none());
		assert!(int.loader.is_bootstrap());
		assert_eq!(int.state(), ClassState::Initialized);
	}

	#[test]
	fn array_classes() {
		let long = Class::new_primitive(PrimitiveType::Long);
		let array = Class::new_array(long.clone(), None, vec![]);
		assert_eq!(array.name, "[J");
		assert_eq!(array.dimensions(), 1);
		assert_eq!(array.ty.to_string(), "[J");
		assert!(Arc::ptr_eq(array.component().unwrap(), &long));

		let nested = Class::new_array(array.clone(), None, vec![]);
		assert_eq!(nested.name, "[[J");
		assert_eq!(nested.dimensions(), 2);
		assert_eq!(nested.element().name, "long");
		assert!(nested.flags.contains(ClassAccessFlags::FINAL | ClassAccessFlags::ABSTRACT));
		assert!(nested.is_accessible_to(&long));
	}

	#[test]
	fn loader_ids() {
		assert!(LoaderId::BOOTSTRAP.is_bootstrap());
		assert!(!LoaderId::new(3).is_bootstrap());
		assert_eq!(LoaderId::new(3).to_string(), "loader#3");
	}
}
