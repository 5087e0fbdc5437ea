use crate::Runtime;
use cabin_class::{Class, Method};
use std::sync::Arc;
use tracing::debug;

/// The execution engine running method bodies on behalf of the class loading core.
pub trait Engine: Send + Sync {
	/// Runs `method` of `class`, used for static initializers.
	fn invoke(&self, runtime: &Runtime, class: &Arc<Class>, method: &Method) -> eyre::Result<()>;
}

impl<E: Engine + ?Sized> Engine for Arc<E> {
	fn invoke(&self, runtime: &Runtime, class: &Arc<Class>, method: &Method) -> eyre::Result<()> {
		(**self).invoke(runtime, class, method)
	}
}

/// Skips every method body.
pub struct NoopEngine;

impl Engine for NoopEngine {
	fn invoke(&self, _: &Runtime, class: &Arc<Class>, method: &Method) -> eyre::Result<()> {
		debug!("Skipping {}.{method:?}", class.name);
		Ok(())
	}
}
