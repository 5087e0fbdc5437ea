use crate::{LoadError, Runtime};
use ahash::AHashMap;
use cabin_class::{Class, ClassSource, LoaderId};
use cabin_core::to_internal;
use parking_lot::RwLock;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// A class loader, either the bootstrap loader or a user defined one.
#[derive(Clone)]
pub enum Loader {
	Bootstrap,
	User(Arc<UserLoader>),
}

impl Loader {
	pub fn id(&self) -> LoaderId {
		match self {
			Loader::Bootstrap => LoaderId::BOOTSTRAP,
			Loader::User(loader) => loader.id,
		}
	}

	pub fn is_bootstrap(&self) -> bool {
		matches!(self, Loader::Bootstrap)
	}

	pub fn name(&self) -> &str {
		match self {
			Loader::Bootstrap => "bootstrap",
			Loader::User(loader) => &loader.name,
		}
	}
}

impl PartialEq for Loader {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl Eq for Loader {}

impl Debug for Loader {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}({})", self.name(), self.id())
	}
}

/// Resolves classes for a user defined loader.
pub trait LoaderDelegate: Send + Sync {
	/// Finds or defines the class with the given binary name (`com.example.Foo`).
	///
	/// `Ok(None)` means not found. A delegate defining a class must do so through [`Runtime::define_class`]
	/// with `loader`, which registers it.
	fn find_class(
		&self,
		runtime: &Runtime,
		loader: &Loader,
		binary_name: &str,
	) -> Result<Option<Arc<Class>>, LoadError>;
}

pub struct UserLoader {
	id: LoaderId,
	name: String,
	delegate: Box<dyn LoaderDelegate>,
	/// Created on the first definition.
	classes: OnceLock<RwLock<AHashMap<String, Arc<Class>>>>,
}

impl UserLoader {
	pub(crate) fn new(id: LoaderId, name: String, delegate: Box<dyn LoaderDelegate>) -> UserLoader {
		UserLoader {
			id,
			name,
			delegate,
			classes: OnceLock::new(),
		}
	}

	pub fn id(&self) -> LoaderId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn delegate(&self) -> &dyn LoaderDelegate {
		&*self.delegate
	}

	pub(crate) fn find(&self, name: &str) -> Option<Arc<Class>> {
		self.classes.get()?.read().get(name).cloned()
	}

	/// Publishes `class` unless the name is taken, returns the registered class.
	pub(crate) fn insert(&self, class: Arc<Class>) -> Arc<Class> {
		let mut classes = self.classes.get_or_init(Default::default).write();
		classes.entry(class.name.clone()).or_insert(class).clone()
	}

	pub fn classes(&self) -> Vec<Arc<Class>> {
		match self.classes.get() {
			Some(classes) => classes.read().values().cloned().collect(),
			None => Vec::new(),
		}
	}
}

/// Loads classes from a list of sources, asking `parent` first.
pub struct ClasspathDelegate {
	parent: Option<Loader>,
	sources: Vec<Box<dyn ClassSource>>,
}

impl ClasspathDelegate {
	pub fn new(parent: Option<Loader>, sources: Vec<Box<dyn ClassSource>>) -> ClasspathDelegate {
		ClasspathDelegate { parent, sources }
	}
}

impl LoaderDelegate for ClasspathDelegate {
	fn find_class(
		&self,
		runtime: &Runtime,
		loader: &Loader,
		binary_name: &str,
	) -> Result<Option<Arc<Class>>, LoadError> {
		let name = to_internal(binary_name);
		if let Some(parent) = &self.parent {
			match runtime.load_class(parent, &name) {
				Ok(class) => return Ok(Some(class)),
				Err(LoadError::ClassNotFound(_)) => {}
				Err(error) => return Err(error),
			}
		}

		for source in &self.sources {
			let bytes = source
				.try_load(&name)
				.map_err(|error| LoadError::io(source.describe(), error))?;
			if let Some(bytes) = bytes {
				trace!("Found {name} in {}", source.describe());
				return runtime.define_named_class(loader, &name, &bytes).map(Some);
			}
		}

		Ok(None)
	}
}
