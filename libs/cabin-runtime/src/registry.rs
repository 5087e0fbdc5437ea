use crate::Loader;
use ahash::{AHashMap, AHashSet};
use cabin_class::{Class, LoaderId};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

/// Every defined class, keyed by defining (or initiating) loader and internal name.
pub struct Registry {
	boot_classes: RwLock<AHashMap<String, Arc<Class>>>,
	boot_packages: RwLock<AHashSet<String>>,
	loaders: RwLock<AHashMap<LoaderId, Loader>>,
}

impl Registry {
	pub fn new() -> Registry {
		Registry {
			boot_classes: RwLock::new(AHashMap::new()),
			boot_packages: RwLock::new(AHashSet::new()),
			loaders: RwLock::new(AHashMap::new()),
		}
	}

	pub fn find(&self, loader: &Loader, name: &str) -> Option<Arc<Class>> {
		match loader {
			Loader::Bootstrap => self.boot_classes.read().get(name).cloned(),
			Loader::User(loader) => loader.find(name),
		}
	}

	/// Publishes `class` under `loader` unless another thread got there first.
	///
	/// Returns the class that ends up registered, callers must continue with that one.
	pub fn insert(&self, loader: &Loader, class: Arc<Class>) -> Arc<Class> {
		let registered = match loader {
			Loader::Bootstrap => {
				let mut classes = self.boot_classes.write();
				classes.entry(class.name.clone()).or_insert(class).clone()
			}
			Loader::User(user) => {
				self.register_loader(loader.clone());
				user.insert(class)
			}
		};
		trace!("Registered {} under {loader:?}", registered.name);
		registered
	}

	/// Adds a loader to the set of known loaders, does nothing if it is already known.
	pub fn register_loader(&self, loader: Loader) {
		let id = loader.id();
		if self.loaders.read().contains_key(&id) {
			return;
		}
		self.loaders.write().entry(id).or_insert(loader);
	}

	pub fn loader(&self, id: LoaderId) -> Option<Loader> {
		if id.is_bootstrap() {
			return Some(Loader::Bootstrap);
		}
		self.loaders.read().get(&id).cloned()
	}

	pub fn loaders(&self) -> Vec<Loader> {
		self.loaders.read().values().cloned().collect()
	}

	pub fn boot_classes(&self) -> Vec<Arc<Class>> {
		self.boot_classes.read().values().cloned().collect()
	}

	pub fn add_boot_package(&self, package: &str) {
		if self.boot_packages.read().contains(package) {
			return;
		}
		self.boot_packages.write().insert(package.to_string());
	}

	pub fn is_boot_package(&self, package: &str) -> bool {
		self.boot_packages.read().contains(package)
	}

	pub fn boot_packages(&self) -> Vec<String> {
		self.boot_packages.read().iter().cloned().collect()
	}
}

impl Default for Registry {
	fn default() -> Self {
		Registry::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::loader::{LoaderDelegate, UserLoader};
	use crate::{LoadError, Runtime};
	use cabin_core::PrimitiveType;

	struct Nothing;

	impl LoaderDelegate for Nothing {
		fn find_class(&self, _: &Runtime, _: &Loader, _: &str) -> Result<Option<Arc<Class>>, LoadError> {
			Ok(None)
		}
	}

	fn user(id: u32) -> Loader {
		Loader::User(Arc::new(UserLoader::new(
			LoaderId::new(id),
			format!("test-{id}"),
			Box::new(Nothing),
		)))
	}

	#[test]
	fn insert_if_absent() {
		let registry = Registry::new();
		let first = Class::new_primitive(PrimitiveType::Int);
		let second = Class::new_primitive(PrimitiveType::Int);

		let winner = registry.insert(&Loader::Bootstrap, first.clone());
		assert!(Arc::ptr_eq(&winner, &first));
		let loser = registry.insert(&Loader::Bootstrap, second);
		assert!(Arc::ptr_eq(&loser, &first));
		assert_eq!(registry.boot_classes().len(), 1);
	}

	#[test]
	fn tiers_are_separate() {
		let registry = Registry::new();
		let loader = user(1);
		assert!(registry.find(&loader, "int").is_none());

		registry.insert(&loader, Class::new_primitive(PrimitiveType::Int));
		assert!(registry.find(&loader, "int").is_some());
		assert!(registry.find(&Loader::Bootstrap, "int").is_none());
		assert!(registry.find(&user(2), "int").is_none());
		assert_eq!(registry.loaders(), [loader]);
	}

	#[test]
	fn loaders_are_registered_once() {
		let registry = Registry::new();
		let loader = user(7);
		registry.register_loader(loader.clone());
		registry.register_loader(loader.clone());
		registry.register_loader(Loader::Bootstrap);
		assert_eq!(registry.loaders().len(), 2);
		assert_eq!(registry.loader(LoaderId::new(7)), Some(loader));
		assert_eq!(registry.loader(LoaderId::new(8)), None);
	}

	#[test]
	fn packages() {
		let registry = Registry::new();
		registry.add_boot_package("java/lang");
		registry.add_boot_package("java/lang");
		assert!(registry.is_boot_package("java/lang"));
		assert!(!registry.is_boot_package("java/util"));
		assert_eq!(registry.boot_packages(), ["java/lang"]);
	}
}
