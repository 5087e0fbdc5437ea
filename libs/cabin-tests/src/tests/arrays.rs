use super::boot;
use crate::{launch, ClassWriter, RecordingEngine, TestJdk};
use cabin_class::{ClassKind, ClassSource, ClassState, DirectoryClassSource};
use cabin_core::{array_element, ArrayElement, ClassAccessFlags, PrimitiveType};
use cabin_runtime::{ClasspathDelegate, Loader};
use std::sync::Arc;

#[test]
fn primitive_arrays() {
	let (_jdk, _engine, runtime) = boot(vec![]);

	let arrays: Vec<_> = PrimitiveType::ALL
		.into_iter()
		.map(|prim| (prim, runtime.load_array_class_of_type(prim).unwrap()))
		.collect();

	for (i, (prim, array)) in arrays.iter().enumerate() {
		assert!(array.loader.is_bootstrap());
		assert_eq!(array.state(), ClassState::Initialized);
		assert_eq!(array_element(&array.name), Some(ArrayElement::Primitive(*prim)));
		assert!(matches!(array.component().unwrap().kind, ClassKind::Primitive(component) if component == *prim));
		assert_eq!(array.package, "");

		for (j, (_, other)) in arrays.iter().enumerate() {
			assert_eq!(i == j, Arc::ptr_eq(array, other));
		}

		let by_code = runtime.load_array_class_of_code(prim.array_code()).unwrap();
		assert!(Arc::ptr_eq(array, &by_code));
	}
}

#[test]
fn object_arrays() {
	let (_jdk, _engine, runtime) = boot(vec![]);
	let boot = Loader::Bootstrap;
	let object = runtime.load_class(&boot, "java/lang/Object").unwrap();

	let strings = runtime.load_class(&boot, "[Ljava.lang.String;").unwrap();
	assert_eq!(strings.name, "[Ljava/lang/String;");
	assert_eq!(strings.package, "java/lang");
	assert!(Arc::ptr_eq(strings.super_class.as_ref().unwrap(), &object));
	let interfaces: Vec<_> = strings.interfaces.iter().map(|class| class.name.as_str()).collect();
	assert_eq!(interfaces, ["java/lang/Cloneable", "java/io/Serializable"]);
	assert!(strings.flags.contains(ClassAccessFlags::PUBLIC | ClassAccessFlags::FINAL));

	let matrix = runtime.load_class(&boot, "[[Ljava/lang/String;").unwrap();
	assert_eq!(matrix.dimensions(), 2);
	assert!(Arc::ptr_eq(matrix.component().unwrap(), &strings));
	assert_eq!(matrix.element().name, "java/lang/String");
	assert!(Arc::ptr_eq(
		&runtime.load_class(&boot, "[[Ljava/lang/String;").unwrap(),
		&matrix
	));
}

#[test]
fn arrays_before_bring_up() {
	let jdk = TestJdk::new(vec![]).unwrap();
	let runtime = launch(&jdk, &RecordingEngine::new()).unwrap();
	assert!(runtime.bootstrapped().is_none());

	let ints = runtime.load_array_class_of_type(PrimitiveType::Int).unwrap();
	let object = runtime.find_loaded_class(&Loader::Bootstrap, "java/lang/Object").unwrap();
	assert!(Arc::ptr_eq(ints.super_class.as_ref().unwrap(), &object));
	let interfaces: Vec<_> = ints.interfaces.iter().map(|class| class.name.as_str()).collect();
	assert_eq!(interfaces, ["java/lang/Cloneable", "java/io/Serializable"]);

	runtime.bootstrap().unwrap();
	assert!(Arc::ptr_eq(&runtime.load_array_class_of_type(PrimitiveType::Int).unwrap(), &ints));
}

#[test]
fn arrays_belong_to_the_element_loader() {
	let (_jdk, _engine, runtime) = boot(vec![]);
	let dir = tempfile::tempdir().unwrap();
	crate::write_classes(dir.path(), &[ClassWriter::new("com/example/Foo")]).unwrap();
	let source: Box<dyn ClassSource> =
		Box::new(DirectoryClassSource::new(dir.path().to_path_buf()).unwrap());

	let owner = runtime.create_loader("owner", ClasspathDelegate::new(None, vec![source]));
	let requester = runtime.create_loader("requester", ClasspathDelegate::new(Some(owner.clone()), vec![]));

	let array = runtime.load_class(&requester, "[Lcom.example.Foo;").unwrap();
	assert_eq!(array.loader, owner.id());
	assert_eq!(array.package, "com/example");
	assert!(Arc::ptr_eq(
		&runtime.find_loaded_class(&owner, "[Lcom/example/Foo;").unwrap(),
		&array
	));
	assert!(runtime.find_loaded_class(&requester, "[Lcom/example/Foo;").is_none());

	// asking the owner directly yields the same class
	let direct = runtime.load_class(&owner, "[Lcom/example/Foo;").unwrap();
	assert!(Arc::ptr_eq(&direct, &array));

	// arrays of boot classes stay with the bootstrap loader
	let strings = runtime.load_class(&requester, "[Ljava/lang/String;").unwrap();
	assert!(strings.loader.is_bootstrap());
	assert!(runtime.find_loaded_class(&Loader::Bootstrap, "[Ljava/lang/String;").is_some());
}

#[test]
fn arrays_of_missing_classes() {
	let (_jdk, _engine, runtime) = boot(vec![]);
	assert!(runtime.load_class(&Loader::Bootstrap, "[Lcom/example/Missing;").is_err());
	assert!(runtime
		.find_loaded_class(&Loader::Bootstrap, "[Lcom/example/Missing;")
		.is_none());
}
