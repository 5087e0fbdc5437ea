mod container;
mod engine;
mod writer;

#[cfg(test)]
mod tests;

pub use container::*;
pub use engine::*;
pub use writer::*;

use cabin_runtime::{Runtime, RuntimeConfig};
use std::sync::Arc;

/// A runtime over `jdk` whose initializers are recorded by `engine`.
pub fn launch(jdk: &TestJdk, engine: &Arc<RecordingEngine>) -> eyre::Result<Runtime> {
	launch_with(RuntimeConfig::default().with_java_home(jdk.path()), engine)
}

pub fn launch_with(config: RuntimeConfig, engine: &Arc<RecordingEngine>) -> eyre::Result<Runtime> {
	cabin_core::init();
	Runtime::new(config, Box::new(engine.clone()))
}
