use crate::{Loader, Runtime};
use cabin_class::Class;
use cabin_core::PrimitiveType;
use eyre::{bail, Context};
use std::sync::Arc;
use tracing::{info, instrument};

/// The classes the runtime itself depends on.
pub struct Bootstrapped {
	pub object: Arc<Class>,
	pub class: Arc<Class>,
	pub string: Arc<Class>,
}

impl Runtime {
	/// Brings up the core classes. Any failure here is fatal to the process.
	#[instrument(skip_all)]
	pub fn bootstrap(&self) -> eyre::Result<&Bootstrapped> {
		if let Some(bootstrapped) = self.bootstrapped.get() {
			return Ok(bootstrapped);
		}

		if self.classpath.boot_source_count() == 0 {
			bail!("No bootstrap classes configured, set JAVA_HOME to a JDK");
		}

		let boot = Loader::Bootstrap;
		let load = |name: &str| {
			self.load_class(&boot, name)
				.wrap_err_with(|| format!("Loading core class {name}"))
		};
		let object = load("java/lang/Object")?;
		let class = load("java/lang/Class")?;
		let string = load("java/lang/String")?;
		// implemented by every array class
		load("java/lang/Cloneable")?;
		load("java/io/Serializable")?;
		self.registry.register_loader(Loader::Bootstrap);

		for prim in PrimitiveType::ALL {
			self.load_array_class_of_type(prim)
				.wrap_err_with(|| format!("Defining {prim:?} array class"))?;
		}

		info!(
			"Bootstrapped {} classes from {} containers",
			self.registry.boot_classes().len(),
			self.classpath.boot_source_count()
		);
		Ok(self.bootstrapped.get_or_init(|| Bootstrapped {
			object,
			class,
			string,
		}))
	}

	pub fn bootstrapped(&self) -> Option<&Bootstrapped> {
		self.bootstrapped.get()
	}
}
