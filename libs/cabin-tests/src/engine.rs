use cabin_class::{Class, ClassState, Method};
use cabin_runtime::{Engine, Runtime};
use eyre::bail;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::Duration;

/// What a recorded initializer does after it has been recorded.
#[derive(Clone, Debug)]
pub enum Behaviour {
	Fail(String),
	/// Initializes its own class again, as a static field access from inside `<clinit>` would.
	Reenter,
	Sleep(Duration),
	/// Initializes another class through the same loader.
	Initialize(String),
}

#[derive(Clone, Debug)]
pub struct Invocation {
	pub class: String,
	pub thread: ThreadId,
	/// The early initialized flag as seen by the initializer.
	pub initialized_flag: bool,
	/// State of the super class while the initializer ran.
	pub super_state: Option<ClassState>,
}

/// An engine that records every initializer it is asked to run.
#[derive(Default)]
pub struct RecordingEngine {
	invocations: Mutex<Vec<Invocation>>,
	behaviours: Mutex<HashMap<String, Behaviour>>,
}

impl RecordingEngine {
	pub fn new() -> Arc<RecordingEngine> {
		Arc::new(RecordingEngine::default())
	}

	pub fn on(&self, class: &str, behaviour: Behaviour) {
		self.behaviours.lock().insert(cabin_core::to_internal(class), behaviour);
	}

	pub fn invocations(&self) -> Vec<Invocation> {
		self.invocations.lock().clone()
	}

	/// Names of the classes whose initializer ran, in order.
	pub fn order(&self) -> Vec<String> {
		self.invocations.lock().iter().map(|invocation| invocation.class.clone()).collect()
	}

	pub fn count(&self, class: &str) -> usize {
		let class = cabin_core::to_internal(class);
		self.invocations
			.lock()
			.iter()
			.filter(|invocation| invocation.class == class)
			.count()
	}
}

impl Engine for RecordingEngine {
	fn invoke(&self, runtime: &Runtime, class: &Arc<Class>, method: &Method) -> eyre::Result<()> {
		if !method.is_class_initializer() {
			bail!("Only initializers are recorded, got {method:?}");
		}

		self.invocations.lock().push(Invocation {
			class: class.name.clone(),
			thread: std::thread::current().id(),
			initialized_flag: class.is_initialized(),
			super_state: class.super_class.as_ref().map(|super_class| super_class.state()),
		});

		let behaviour = self.behaviours.lock().get(&class.name).cloned();
		match behaviour {
			None => {}
			Some(Behaviour::Fail(message)) => bail!(message),
			Some(Behaviour::Reenter) => runtime.initialize(class)?,
			Some(Behaviour::Sleep(duration)) => std::thread::sleep(duration),
			Some(Behaviour::Initialize(name)) => {
				let loader = runtime.loader_of(class.loader)?;
				let other = runtime.load_class(&loader, &name)?;
				runtime.initialize(&other)?;
			}
		}
		Ok(())
	}
}
