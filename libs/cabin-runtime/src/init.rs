use crate::{InitError, LoadError, Runtime};
use cabin_class::{Class, ClassState};
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

impl Runtime {
	/// Links `class` after its super class and interfaces. Idempotent.
	pub fn link(&self, class: &Arc<Class>) -> Result<(), LoadError> {
		if class.state() != ClassState::Loaded {
			return Ok(());
		}

		if let Some(super_class) = &class.super_class {
			self.link(super_class)?;
		}
		for interface in &class.interfaces {
			self.link(interface)?;
		}

		if class.init().transition(ClassState::Loaded, ClassState::Linked) {
			trace!("Linked {}", class.name);
		}
		Ok(())
	}

	/// Runs the static initializer of `class` once, after its super class has been initialized.
	///
	/// A request from the thread already initializing the class returns immediately. Other threads wait until
	/// the initializer finished. If the initializer fails the class becomes erroneous for good.
	#[instrument(skip_all, fields(class = %class.name))]
	pub fn initialize(&self, class: &Arc<Class>) -> Result<(), InitError> {
		let init = class.init();
		match init.state() {
			ClassState::Initialized => return Ok(()),
			ClassState::Erroneous => return Err(InitError::Erroneous(class.name.clone())),
			_ => {}
		}

		if init.is_owned_by_current_thread() {
			trace!("Recursive initialization");
			return Ok(());
		}

		self.link(class)?;

		let _token = init.lock();
		match init.state() {
			ClassState::Initialized => return Ok(()),
			ClassState::Erroneous => return Err(InitError::Erroneous(class.name.clone())),
			_ => {}
		}

		debug!("Initializing");
		init.set_owner(Some(std::thread::current().id()));
		init.set_state(ClassState::Initializing);
		let result = self.run_initialization(class);
		init.set_owner(None);

		match result {
			Ok(()) => {
				init.set_state(ClassState::Initialized);
				debug!("Initialized");
				Ok(())
			}
			Err(error) => {
				warn!("Initialization of {} failed: {error}", class.name);
				init.fail(error.to_string());
				Err(error)
			}
		}
	}

	fn run_initialization(&self, class: &Arc<Class>) -> Result<(), InitError> {
		if !class.is_interface() {
			if let Some(super_class) = &class.super_class {
				self.initialize(super_class)?;
			}

			for interface in default_method_interfaces(class) {
				self.initialize(&interface)?;
			}
		}

		class.init().mark_initialized();
		if let Some(method) = class.class_initializer() {
			self.engine
				.invoke(self, class, method)
				.map_err(|error| InitError::Initializer {
					class: class.name.clone(),
					message: format!("{error:#}"),
				})?;
		}
		Ok(())
	}
}

/// Every superinterface of `class` declaring default methods, in declaration order.
fn default_method_interfaces(class: &Class) -> Vec<Arc<Class>> {
	let mut seen: Vec<Arc<Class>> = Vec::new();
	let mut pending: Vec<Arc<Class>> = class.interfaces.iter().rev().cloned().collect();
	while let Some(interface) = pending.pop() {
		if seen.iter().any(|seen| Arc::ptr_eq(seen, &interface)) {
			continue;
		}
		pending.extend(interface.interfaces.iter().rev().cloned());
		seen.push(interface);
	}
	seen.retain(|interface| interface.declares_default_methods());
	seen
}
