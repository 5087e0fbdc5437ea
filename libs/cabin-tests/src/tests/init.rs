use super::boot;
use crate::{Behaviour, ClassWriter};
use cabin_class::ClassState;
use cabin_core::PrimitiveType;
use cabin_runtime::{InitError, Loader};
use std::sync::{Arc, Barrier};
use std::time::Duration;

#[test]
fn initializer_runs_once() {
	let (_jdk, engine, runtime) = boot(vec![ClassWriter::new("com/example/Slow").clinit()]);
	engine.on("com/example/Slow", Behaviour::Sleep(Duration::from_millis(50)));
	let class = runtime.load_class(&Loader::Bootstrap, "com.example.Slow").unwrap();

	let threads = 8;
	let barrier = Barrier::new(threads);
	std::thread::scope(|scope| {
		for _ in 0..threads {
			scope.spawn(|| {
				barrier.wait();
				runtime.initialize(&class).unwrap();
				assert_eq!(class.state(), ClassState::Initialized);
			});
		}
	});

	assert_eq!(engine.count("com/example/Slow"), 1);
	runtime.initialize(&class).unwrap();
	assert_eq!(engine.count("com/example/Slow"), 1);
}

#[test]
fn super_class_first() {
	let (_jdk, engine, runtime) = boot(vec![
		ClassWriter::new("com/example/Base").clinit(),
		ClassWriter::new("com/example/Middle").super_class("com/example/Base"),
		ClassWriter::new("com/example/Derived").super_class("com/example/Middle").clinit(),
	]);
	let derived = runtime.load_class(&Loader::Bootstrap, "com.example.Derived").unwrap();
	runtime.initialize(&derived).unwrap();

	assert_eq!(engine.order(), ["com/example/Base", "com/example/Derived"]);
	let invocations = engine.invocations();
	assert_eq!(invocations[0].super_state, Some(ClassState::Initialized));
	assert_eq!(invocations[1].super_state, Some(ClassState::Initialized));

	let mut class = Some(&derived);
	while let Some(current) = class {
		assert_eq!(current.state(), ClassState::Initialized);
		class = current.super_class.as_ref();
	}
}

#[test]
fn super_class_first_across_threads() {
	let (_jdk, engine, runtime) = boot(vec![
		ClassWriter::new("com/example/Base").clinit(),
		ClassWriter::new("com/example/Derived").super_class("com/example/Base").clinit(),
	]);
	engine.on("com/example/Base", Behaviour::Sleep(Duration::from_millis(100)));
	let derived = runtime.load_class(&Loader::Bootstrap, "com.example.Derived").unwrap();
	let base = derived.super_class.clone().unwrap();

	std::thread::scope(|scope| {
		scope.spawn(|| runtime.initialize(&base).unwrap());
		scope.spawn(|| {
			while engine.count("com/example/Base") == 0 {
				std::thread::yield_now();
			}
			runtime.initialize(&derived).unwrap();
		});
	});

	assert_eq!(engine.order(), ["com/example/Base", "com/example/Derived"]);
	assert_eq!(engine.invocations()[1].super_state, Some(ClassState::Initialized));
}

#[test]
fn initializer_sees_its_class_initialized() {
	let (_jdk, engine, runtime) = boot(vec![ClassWriter::new("com/example/Counter").clinit()]);
	engine.on("com/example/Counter", Behaviour::Reenter);
	let class = runtime.load_class(&Loader::Bootstrap, "com.example.Counter").unwrap();
	assert!(!class.is_initialized());

	runtime.initialize(&class).unwrap();
	let invocations = engine.invocations();
	assert_eq!(invocations.len(), 1);
	assert!(invocations[0].initialized_flag);
	assert_eq!(class.state(), ClassState::Initialized);
}

#[test]
fn initializer_cycle() {
	let (_jdk, engine, runtime) = boot(vec![
		ClassWriter::new("com/example/Ping").clinit(),
		ClassWriter::new("com/example/Pong").clinit(),
	]);
	engine.on("com/example/Ping", Behaviour::Initialize("com/example/Pong".to_string()));
	engine.on("com/example/Pong", Behaviour::Initialize("com/example/Ping".to_string()));

	let ping = runtime.load_class(&Loader::Bootstrap, "com.example.Ping").unwrap();
	runtime.initialize(&ping).unwrap();
	assert_eq!(engine.order(), ["com/example/Ping", "com/example/Pong"]);
	let pong = runtime.find_loaded_class(&Loader::Bootstrap, "com/example/Pong").unwrap();
	assert_eq!(pong.state(), ClassState::Initialized);
	assert_eq!(ping.state(), ClassState::Initialized);
}

#[test]
fn failed_initializer_is_permanent() {
	let (_jdk, engine, runtime) = boot(vec![ClassWriter::new("com/example/Bad").clinit()]);
	engine.on("com/example/Bad", Behaviour::Fail("boom".to_string()));
	let class = runtime.load_class(&Loader::Bootstrap, "com.example.Bad").unwrap();

	match runtime.initialize(&class) {
		Err(InitError::Initializer { class, message }) => {
			assert_eq!(class, "com/example/Bad");
			assert_eq!(message, "boom");
		}
		other => panic!("expected an initializer error, got {other:?}"),
	}
	assert_eq!(class.state(), ClassState::Erroneous);
	assert!(class.init().failure().is_some());
	assert!(!class.is_initialized());

	assert!(matches!(runtime.initialize(&class), Err(InitError::Erroneous(_))));
	assert_eq!(engine.count("com/example/Bad"), 1);
}

#[test]
fn failed_super_class_fails_subclass() {
	let (_jdk, engine, runtime) = boot(vec![
		ClassWriter::new("com/example/Bad").clinit(),
		ClassWriter::new("com/example/Sub").super_class("com/example/Bad").clinit(),
	]);
	engine.on("com/example/Bad", Behaviour::Fail("boom".to_string()));
	let sub = runtime.load_class(&Loader::Bootstrap, "com.example.Sub").unwrap();

	assert!(runtime.initialize(&sub).is_err());
	assert_eq!(sub.state(), ClassState::Erroneous);
	assert_eq!(sub.super_class.as_ref().unwrap().state(), ClassState::Erroneous);
	assert_eq!(engine.order(), ["com/example/Bad"]);
	assert!(matches!(runtime.initialize(&sub), Err(InitError::Erroneous(_))));
}

fn interfaces() -> Vec<ClassWriter> {
	vec![
		ClassWriter::interface("com/example/WithDefault").default_method("run").clinit(),
		ClassWriter::interface("com/example/Plain").abstract_method("run").clinit(),
		ClassWriter::interface("com/example/Parent").default_method("walk").clinit(),
		ClassWriter::interface("com/example/Child")
			.implements("com/example/Parent")
			.abstract_method("jump")
			.clinit(),
		ClassWriter::new("com/example/Impl")
			.implements("com/example/WithDefault")
			.implements("com/example/Plain")
			.implements("com/example/Child")
			.clinit(),
	]
}

#[test]
fn default_method_interfaces_first() {
	let (_jdk, engine, runtime) = boot(interfaces());
	let class = runtime.load_class(&Loader::Bootstrap, "com.example.Impl").unwrap();
	runtime.initialize(&class).unwrap();

	assert_eq!(
		engine.order(),
		["com/example/WithDefault", "com/example/Parent", "com/example/Impl"]
	);
	let plain = runtime.find_loaded_class(&Loader::Bootstrap, "com/example/Plain").unwrap();
	assert_ne!(plain.state(), ClassState::Initialized);
}

#[test]
fn interfaces_skip_superinterfaces() {
	let (_jdk, engine, runtime) = boot(interfaces());
	let child = runtime.load_class(&Loader::Bootstrap, "com.example.Child").unwrap();
	runtime.initialize(&child).unwrap();
	assert_eq!(engine.order(), ["com/example/Child"]);
}

#[test]
fn synthesized_classes_are_initialized() {
	let (_jdk, engine, runtime) = boot(vec![]);
	let array = runtime.load_array_class_of_type(PrimitiveType::Double).unwrap();
	let double = runtime.primitive(PrimitiveType::Double);
	runtime.initialize(&array).unwrap();
	runtime.initialize(&double).unwrap();
	assert!(array.is_initialized());
	assert!(engine.invocations().is_empty());
}

#[test]
fn link_links_super_classes() {
	let (_jdk, engine, runtime) = boot(vec![
		ClassWriter::new("com/example/Base"),
		ClassWriter::new("com/example/Derived").super_class("com/example/Base").clinit(),
	]);
	let derived = runtime.load_class(&Loader::Bootstrap, "com.example.Derived").unwrap();
	let base = derived.super_class.clone().unwrap();
	assert_eq!(derived.state(), ClassState::Loaded);

	runtime.link(&derived).unwrap();
	runtime.link(&derived).unwrap();
	assert_eq!(derived.state(), ClassState::Linked);
	assert_eq!(base.state(), ClassState::Linked);
	assert!(engine.invocations().is_empty());

	runtime.initialize(&derived).unwrap();
	assert!(Arc::ptr_eq(&base, derived.super_class.as_ref().unwrap()));
	assert_eq!(base.state(), ClassState::Initialized);
}
