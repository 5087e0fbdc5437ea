use crate::ClassWriter;
use cabin_class::JMOD_HEADER;
use eyre::Context;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A zip archive holding `entries` verbatim.
pub fn zip(entries: &[(String, Vec<u8>)]) -> eyre::Result<Vec<u8>> {
	let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
	for (name, data) in entries {
		writer.start_file(name.as_str(), SimpleFileOptions::default())?;
		writer.write_all(data)?;
	}
	Ok(writer.finish()?.into_inner())
}

pub fn jar(classes: &[ClassWriter]) -> eyre::Result<Vec<u8>> {
	let entries: Vec<_> = classes
		.iter()
		.map(|class| (format!("{}.class", class.name), class.to_bytes()))
		.collect();
	zip(&entries)
}

pub fn jmod(classes: &[ClassWriter]) -> eyre::Result<Vec<u8>> {
	let entries: Vec<_> = classes
		.iter()
		.map(|class| (format!("classes/{}.class", class.name), class.to_bytes()))
		.collect();
	let mut data = JMOD_HEADER.to_vec();
	data.extend(zip(&entries)?);
	Ok(data)
}

/// Writes every class to `<dir>/<name>.class`.
pub fn write_classes(dir: &Path, classes: &[ClassWriter]) -> eyre::Result<()> {
	for class in classes {
		let path = dir.join(format!("{}.class", class.name));
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&path, class.to_bytes()).wrap_err_with(|| format!("Writing {}", path.display()))?;
	}
	Ok(())
}

/// The classes every bring-up needs.
pub fn java_base() -> Vec<ClassWriter> {
	use cabin_core::ClassAccessFlags as Flags;
	vec![
		ClassWriter::new("java/lang/Object").source_file("Object.java"),
		ClassWriter::new("java/lang/Class").flags(Flags::PUBLIC | Flags::FINAL | Flags::SUPER),
		ClassWriter::new("java/lang/String")
			.flags(Flags::PUBLIC | Flags::FINAL | Flags::SUPER)
			.implements("java/io/Serializable"),
		ClassWriter::interface("java/lang/Cloneable"),
		ClassWriter::interface("java/io/Serializable"),
	]
}

/// A temporary bootstrap root.
pub struct TestJdk {
	dir: TempDir,
}

impl TestJdk {
	/// A root with `java.base.jmod` holding [`java_base`] and `classes`.
	pub fn new(classes: Vec<ClassWriter>) -> eyre::Result<TestJdk> {
		let jdk = TestJdk::empty()?;
		let mut all = java_base();
		all.extend(classes);
		jdk.add_module("java.base", &all)?;
		Ok(jdk)
	}

	pub fn empty() -> eyre::Result<TestJdk> {
		let dir = tempfile::tempdir()?;
		std::fs::create_dir_all(dir.path().join("jmods"))?;
		Ok(TestJdk { dir })
	}

	pub fn add_module(&self, name: &str, classes: &[ClassWriter]) -> eyre::Result<PathBuf> {
		let path = self.dir.path().join("jmods").join(format!("{name}.jmod"));
		std::fs::write(&path, jmod(classes)?)?;
		Ok(path)
	}

	pub fn add_raw_module(&self, name: &str, entries: &[(String, Vec<u8>)]) -> eyre::Result<PathBuf> {
		let path = self.dir.path().join("jmods").join(format!("{name}.jmod"));
		let mut data = JMOD_HEADER.to_vec();
		data.extend(zip(entries)?);
		std::fs::write(&path, data)?;
		Ok(path)
	}

	pub fn path(&self) -> &Path {
		self.dir.path()
	}
}
