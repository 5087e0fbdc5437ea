mod bootstrap;
mod classpath;
mod config;
mod engine;
mod error;
mod init;
mod load;
mod loader;
mod registry;

pub use bootstrap::*;
pub use classpath::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use loader::*;
pub use registry::*;

use cabin_class::LoaderId;
use eyre::Context;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// The class loading context of one virtual machine.
///
/// Owns the bootstrap containers, every loader and every class defined through them. Classes are never unloaded.
pub struct Runtime {
	pub config: RuntimeConfig,
	pub classpath: Classpath,
	registry: Registry,
	engine: Box<dyn Engine>,
	next_loader: AtomicU32,
	app_loader: Mutex<Option<Loader>>,
	bootstrapped: OnceLock<Bootstrapped>,
}

impl Runtime {
	pub fn new(config: RuntimeConfig, engine: Box<dyn Engine>) -> eyre::Result<Runtime> {
		let classpath = Classpath::new();
		if let Some(java_home) = &config.java_home {
			classpath
				.configure(java_home)
				.wrap_err_with(|| format!("Configuring bootstrap classes from {}", java_home.display()))?;
		}
		classpath.set_user_classpath(config.classpath.clone());

		Ok(Runtime {
			config,
			classpath,
			registry: Registry::new(),
			engine,
			next_loader: AtomicU32::new(1),
			app_loader: Mutex::new(None),
			bootstrapped: OnceLock::new(),
		})
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Creates a user defined loader resolving classes through `delegate`.
	pub fn create_loader(&self, name: impl Into<String>, delegate: impl LoaderDelegate + 'static) -> Loader {
		let id = LoaderId::new(self.next_loader.fetch_add(1, Ordering::Relaxed));
		let name = name.into();
		info!("Created loader {name} ({id})");

		let loader = Loader::User(Arc::new(UserLoader::new(id, name, Box::new(delegate))));
		self.registry.register_loader(loader.clone());
		loader
	}

	/// The application loader reading the user classpath, created on first use.
	pub fn app_loader(&self) -> eyre::Result<Loader> {
		let mut app_loader = self.app_loader.lock();
		if let Some(loader) = &*app_loader {
			return Ok(loader.clone());
		}

		let sources = self.classpath.user_sources()?;
		let loader = self.create_loader("app", ClasspathDelegate::new(None, sources));
		*app_loader = Some(loader.clone());
		Ok(loader)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use cabin_core::PrimitiveType;

	fn runtime() -> Runtime {
		Runtime::new(RuntimeConfig::default(), Box::new(NoopEngine)).unwrap()
	}

	#[test]
	fn bootstrap_without_containers_fails() {
		let runtime = runtime();
		assert!(runtime.bootstrap().is_err());
		assert!(runtime.bootstrapped().is_none());
	}

	#[test]
	fn missing_java_home_container_fails() {
		let home = tempfile::tempdir().unwrap();
		std::fs::create_dir_all(home.path().join("jmods")).unwrap();
		std::fs::write(home.path().join("jmods/java.base.jmod"), b"JM\x01\x00garbage").unwrap();

		let config = RuntimeConfig::default().with_java_home(home.path());
		assert!(Runtime::new(config, Box::new(NoopEngine)).is_err());
	}

	#[test]
	fn boot_class_not_found() {
		let runtime = runtime();
		assert!(matches!(
			runtime.load_class(&Loader::Bootstrap, "java.lang.Object"),
			Err(LoadError::ClassNotFound(name)) if name == "java/lang/Object"
		));
	}

	#[test]
	fn primitives_need_no_containers() {
		let runtime = runtime();
		let int = runtime.load_class(&Loader::Bootstrap, "int").unwrap();
		assert!(Arc::ptr_eq(&int, &runtime.primitive(PrimitiveType::Int)));

		let array = runtime.load_array_class_of_code(10).unwrap();
		assert_eq!(array.name, "[I");
		assert!(Arc::ptr_eq(array.component().unwrap(), &int));
		assert!(array.super_class.is_none());
		assert!(runtime.load_array_class_of_code(3).is_err());
	}

	#[test]
	fn invalid_array_names() {
		let runtime = runtime();
		for name in ["[", "[Q", "[Ljava/lang/Object", "[L;"] {
			assert!(matches!(
				runtime.load_class(&Loader::Bootstrap, name),
				Err(LoadError::ClassNotFound(_))
			));
		}
	}

	#[test]
	fn loaders_get_fresh_ids() {
		let runtime = runtime();
		let first = runtime.create_loader("first", ClasspathDelegate::new(None, vec![]));
		let second = runtime.create_loader("second", ClasspathDelegate::new(None, vec![]));
		assert_ne!(first.id(), second.id());
		assert!(!first.id().is_bootstrap());
		assert_eq!(runtime.all_loaders().len(), 2);
		assert_eq!(runtime.loader_of(second.id()).unwrap(), second);

		let app = runtime.app_loader().unwrap();
		assert_eq!(runtime.app_loader().unwrap(), app);
		assert!(matches!(
			runtime.load_class(&app, "com.example.Missing"),
			Err(LoadError::ClassNotFound(_))
		));
		assert!(runtime.find_loaded_class(&app, "com.example.Missing").is_none());
	}
}
