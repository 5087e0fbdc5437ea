mod arrays;
mod init;

use crate::{launch, ClassWriter, RecordingEngine, TestJdk};
use cabin_runtime::Runtime;
use std::sync::Arc;

/// A bootstrapped runtime whose boot set holds `classes` next to the core classes.
fn boot(classes: Vec<ClassWriter>) -> (TestJdk, Arc<RecordingEngine>, Runtime) {
	let jdk = TestJdk::new(classes).unwrap();
	let engine = RecordingEngine::new();
	let runtime = launch(&jdk, &engine).unwrap();
	runtime.bootstrap().unwrap();
	(jdk, engine, runtime)
}
