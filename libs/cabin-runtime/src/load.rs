use crate::{LoadError, Loader, Runtime};
use cabin_class::{Class, Field, LoaderId};
use cabin_core::{
	array_element, is_valid_internal_name, to_binary, to_internal, ArrayElement, PrimitiveType,
};
use cabin_reader::ClassInfo;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

const OBJECT: &str = "java/lang/Object";
const ARRAY_INTERFACES: [&str; 2] = ["java/lang/Cloneable", "java/io/Serializable"];

impl Runtime {
	/// Loads the class `name` (binary or internal form) as seen by `loader`.
	///
	/// Loading is memoized, every later call with the same loader and name returns the same class.
	pub fn load_class(&self, loader: &Loader, name: &str) -> Result<Arc<Class>, LoadError> {
		let name = to_internal(name);
		if !is_valid_internal_name(&name) {
			debug!("Rejecting malformed class name {name:?}");
			return Err(LoadError::ClassNotFound(name));
		}
		if let Some(class) = self.registry.find(loader, &name) {
			trace!("Found loaded class {name}");
			return Ok(class);
		}

		if array_element(&name).is_some() {
			return self.load_array_class(loader, &name);
		}

		if let Some(class) = self.load_boot_class(&name)? {
			return Ok(class);
		}

		let user = match loader {
			Loader::Bootstrap => return Err(LoadError::ClassNotFound(name)),
			Loader::User(user) => user,
		};

		debug!("Delegating {name} to {}", user.name());
		let class = user
			.delegate()
			.find_class(self, loader, &to_binary(&name))?
			.ok_or_else(|| LoadError::ClassNotFound(name.clone()))?;
		if class.name != name {
			return Err(LoadError::WrongName {
				expected: name,
				found: class.name.clone(),
			});
		}

		Ok(self.registry.insert(loader, class))
	}

	/// Resolves `name` through the bootstrap containers, `Ok(None)` if none of them has it.
	fn load_boot_class(&self, name: &str) -> Result<Option<Arc<Class>>, LoadError> {
		if let Some(class) = self.registry.find(&Loader::Bootstrap, name) {
			return Ok(Some(class));
		}

		if let Some(prim) = PrimitiveType::from_name(name) {
			return Ok(Some(self.primitive(prim)));
		}

		for source in self.classpath.boot_sources() {
			let bytes = source
				.try_load(name)
				.map_err(|error| LoadError::io(source.describe(), error))?;
			if let Some(bytes) = bytes {
				trace!("Found {name} in {}", source.describe());
				return self
					.define_named_class(&Loader::Bootstrap, name, &bytes)
					.map(Some);
			}
		}

		Ok(None)
	}

	/// Parses `bytes` and defines the class under `loader`.
	///
	/// The super class and interfaces are loaded through `loader`. If the loader already has a class with that
	/// name, the existing class is returned.
	pub fn define_class(&self, loader: &Loader, bytes: &[u8]) -> Result<Arc<Class>, LoadError> {
		let info = ClassInfo::parse_complete(bytes)?;
		self.define_parsed(loader, info)
	}

	/// Like [`Runtime::define_class`] but fails with [`LoadError::WrongName`] if the bytes define another class.
	pub fn define_named_class(
		&self,
		loader: &Loader,
		name: &str,
		bytes: &[u8],
	) -> Result<Arc<Class>, LoadError> {
		let info = ClassInfo::parse_complete(bytes)?;
		if info.this_class != name {
			return Err(LoadError::WrongName {
				expected: name.to_string(),
				found: info.this_class,
			});
		}
		self.define_parsed(loader, info)
	}

	#[instrument(skip_all, fields(class = %info.this_class, loader = ?loader))]
	fn define_parsed(&self, loader: &Loader, info: ClassInfo) -> Result<Arc<Class>, LoadError> {
		if let Some(class) = self.registry.find(loader, &info.this_class) {
			debug!("Already defined");
			return Ok(class);
		}

		let super_class = match &info.super_class {
			Some(name) => {
				let class = self.load_class(loader, name)?;
				if class.is_interface() {
					return Err(LoadError::Linkage(format!(
						"{} has interface {name} as its super class",
						info.this_class
					)));
				}
				Some(class)
			}
			None if info.this_class == OBJECT => None,
			None => {
				return Err(LoadError::Linkage(format!(
					"{} has no super class",
					info.this_class
				)))
			}
		};

		let mut interfaces = Vec::with_capacity(info.interfaces.len());
		for name in &info.interfaces {
			let class = self.load_class(loader, name)?;
			if !class.is_interface() {
				return Err(LoadError::Linkage(format!(
					"{} implements {name} which is not an interface",
					info.this_class
				)));
			}
			interfaces.push(class);
		}

		let class = Class::new_instance(info, loader.id(), super_class, interfaces)
			.map_err(|error| LoadError::Linkage(format!("{error:#}")))?;
		let class = self.publish(loader, class);
		info!("Loaded class {}", class.name);
		Ok(class)
	}

	/// Synthesizes an array class, owned by the loader of its element.
	fn load_array_class(&self, loader: &Loader, name: &str) -> Result<Arc<Class>, LoadError> {
		let component = match array_element(name) {
			Some(ArrayElement::Primitive(prim)) => self.primitive(prim),
			Some(ArrayElement::Class(component)) => self.load_class(loader, component)?,
			None => return Err(LoadError::ClassNotFound(name.to_string())),
		};

		let owner = self.loader_of(component.loader)?;
		if let Some(class) = self.registry.find(&owner, name) {
			return Ok(class);
		}

		// without boot containers the array has no super class or interfaces
		let super_class = self.load_boot_class(OBJECT)?;
		let mut interfaces = Vec::with_capacity(ARRAY_INTERFACES.len());
		for interface in ARRAY_INTERFACES {
			interfaces.extend(self.load_boot_class(interface)?);
		}
		let class = Class::new_array(component, super_class, interfaces);
		debug!("Synthesized array class {} for {owner:?}", class.name);
		Ok(self.publish(&owner, class))
	}

	/// Inserts a freshly built class, keeping whichever class won a concurrent definition.
	fn publish(&self, loader: &Loader, class: Arc<Class>) -> Arc<Class> {
		let class = self.registry.insert(loader, class);
		if loader.is_bootstrap() && !class.package.is_empty() {
			self.registry.add_boot_package(&class.package);
		}
		class
	}

	/// The class of a primitive type.
	pub fn primitive(&self, prim: PrimitiveType) -> Arc<Class> {
		if let Some(class) = self.registry.find(&Loader::Bootstrap, prim.name()) {
			return class;
		}
		self.registry
			.insert(&Loader::Bootstrap, Class::new_primitive(prim))
	}

	pub fn load_array_class_of_type(&self, prim: PrimitiveType) -> Result<Arc<Class>, LoadError> {
		self.load_array_class(&Loader::Bootstrap, &ArrayElement::Primitive(prim).array_name())
	}

	/// Array class for a `newarray` type code.
	pub fn load_array_class_of_code(&self, code: u8) -> Result<Arc<Class>, LoadError> {
		let prim = PrimitiveType::from_array_code(code)
			.ok_or_else(|| LoadError::Linkage(format!("invalid array type code {code}")))?;
		self.load_array_class_of_type(prim)
	}

	/// The class `name` if `loader` already knows it, never loads anything.
	pub fn find_loaded_class(&self, loader: &Loader, name: &str) -> Option<Arc<Class>> {
		self.registry.find(loader, &to_internal(name))
	}

	/// The runtime class of a field's type, resolved through the declaring class's loader and cached.
	pub fn field_type(&self, field: &Field) -> Result<Arc<Class>, LoadError> {
		if let Some(class) = field.resolved_type() {
			return Ok(class.clone());
		}

		let declaring = field
			.class()
			.ok_or_else(|| LoadError::Internal(format!("field {field:?} has no declaring class")))?;
		let loader = self.loader_of(declaring.loader)?;
		let class = self.load_class(&loader, &field.ty.class_name())?;
		Ok(field.set_resolved_type(class).clone())
	}

	pub fn loader_of(&self, id: LoaderId) -> Result<Loader, LoadError> {
		self.registry
			.loader(id)
			.ok_or_else(|| LoadError::Internal(format!("{id} is not registered")))
	}

	pub fn all_bootstrap_classes(&self) -> Vec<Arc<Class>> {
		self.registry.boot_classes()
	}

	pub fn all_loaders(&self) -> Vec<Loader> {
		self.registry.loaders()
	}

	pub fn is_boot_package(&self, package: &str) -> bool {
		self.registry.is_boot_package(package)
	}

	pub fn boot_packages(&self) -> Vec<String> {
		self.registry.boot_packages()
	}
}
