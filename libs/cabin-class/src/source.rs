use eyre::Context;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::read;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::trace;
use zip::ZipArchive;

/// Header in front of the zip data of a `.jmod` file.
pub const JMOD_HEADER: &[u8; 4] = b"JM\x01\x00";

/// A keyed store of class file bytes.
pub trait ClassSource: Send + Sync {
	/// Bytes of the class with the given internal name, `Ok(None)` if this source does not have it.
	fn try_load(&self, name: &str) -> eyre::Result<Option<Vec<u8>>>;

	fn describe(&self) -> String;
}

impl<S: ClassSource + ?Sized> ClassSource for Arc<S> {
	fn try_load(&self, name: &str) -> eyre::Result<Option<Vec<u8>>> {
		(**self).try_load(name)
	}

	fn describe(&self) -> String {
		(**self).describe()
	}
}

impl<S: ClassSource + ?Sized> ClassSource for Box<S> {
	fn try_load(&self, name: &str) -> eyre::Result<Option<Vec<u8>>> {
		(**self).try_load(name)
	}

	fn describe(&self) -> String {
		(**self).describe()
	}
}

/// Opens a classpath entry: a directory, a `.jmod` or anything else as a jar.
pub fn open_source(path: &Path) -> eyre::Result<Box<dyn ClassSource>> {
	if path.is_dir() {
		return Ok(Box::new(DirectoryClassSource::new(path.to_path_buf())?));
	}

	if path.extension().and_then(|ext| ext.to_str()) == Some("jmod") {
		Ok(Box::new(ModuleClassSource::open(path)?))
	} else {
		Ok(Box::new(JarClassSource::open(path)?))
	}
}

pub struct DirectoryClassSource {
	dir: PathBuf,
}

impl DirectoryClassSource {
	pub fn new(dir: PathBuf) -> eyre::Result<DirectoryClassSource> {
		if !dir.is_dir() {
			eyre::bail!("{} is not a directory", dir.display());
		}
		Ok(DirectoryClassSource { dir })
	}
}

impl ClassSource for DirectoryClassSource {
	fn try_load(&self, name: &str) -> eyre::Result<Option<Vec<u8>>> {
		// only plain relative names, anything else could leave the directory
		if !Path::new(name)
			.components()
			.all(|component| matches!(component, Component::Normal(_)))
		{
			trace!("Refusing {name:?} in {}", self.dir.display());
			return Ok(None);
		}

		let path = self.dir.join(format!("{name}.class"));
		if path.is_file() {
			let vec = read(&path).wrap_err_with(|| format!("Reading {}", path.display()))?;
			return Ok(Some(vec));
		}

		Ok(None)
	}

	fn describe(&self) -> String {
		self.dir.display().to_string()
	}
}

pub struct JarClassSource {
	origin: String,
	file_lookup: HashMap<String, usize>,
	archive: Mutex<ZipArchive<Cursor<Vec<u8>>>>,
}

impl JarClassSource {
	pub fn open(path: &Path) -> eyre::Result<JarClassSource> {
		let data = read(path).wrap_err_with(|| format!("Reading {}", path.display()))?;
		JarClassSource::new(path.display().to_string(), data, "")
	}

	/// Indexes every `<prefix><name>.class` entry of the archive.
	pub fn new(origin: String, data: Vec<u8>, prefix: &str) -> eyre::Result<JarClassSource> {
		let reader = Cursor::new(data);
		let archive = ZipArchive::new(reader).wrap_err_with(|| format!("Opening {origin}"))?;

		let mut file_lookup = HashMap::new();
		for file_name in archive.file_names() {
			let Some(name) = file_name
				.strip_prefix(prefix)
				.and_then(|name| name.strip_suffix(".class"))
			else {
				continue;
			};

			if let Some(index) = archive.index_for_name(file_name) {
				file_lookup.insert(name.to_string(), index);
			}
		}
		trace!("Indexed {} classes in {origin}", file_lookup.len());

		Ok(JarClassSource {
			origin,
			file_lookup,
			archive: Mutex::new(archive),
		})
	}

	pub fn len(&self) -> usize {
		self.file_lookup.len()
	}

	pub fn is_empty(&self) -> bool {
		self.file_lookup.is_empty()
	}
}

impl ClassSource for JarClassSource {
	fn try_load(&self, name: &str) -> eyre::Result<Option<Vec<u8>>> {
		if let Some(file_location) = self.file_lookup.get(name) {
			let mut guard = self.archive.lock();
			let mut file = guard
				.by_index(*file_location)
				.wrap_err_with(|| format!("Opening {name} in {}", self.origin))?;

			let mut data = Vec::new();
			file.read_to_end(&mut data)
				.wrap_err_with(|| format!("Reading {name} in {}", self.origin))?;
			return Ok(Some(data));
		}

		Ok(None)
	}

	fn describe(&self) -> String {
		self.origin.clone()
	}
}

/// A `.jmod` container, classes live under `classes/`.
pub struct ModuleClassSource(JarClassSource);

impl ModuleClassSource {
	pub fn open(path: &Path) -> eyre::Result<ModuleClassSource> {
		let data = read(path).wrap_err_with(|| format!("Reading {}", path.display()))?;
		ModuleClassSource::new(path.display().to_string(), data)
	}

	pub fn new(origin: String, mut data: Vec<u8>) -> eyre::Result<ModuleClassSource> {
		if data.starts_with(JMOD_HEADER) {
			data.drain(..JMOD_HEADER.len());
		}
		Ok(ModuleClassSource(JarClassSource::new(origin, data, "classes/")?))
	}
}

impl ClassSource for ModuleClassSource {
	fn try_load(&self, name: &str) -> eyre::Result<Option<Vec<u8>>> {
		self.0.try_load(name)
	}

	fn describe(&self) -> String {
		self.0.describe()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use zip::write::SimpleFileOptions;
	use zip::ZipWriter;

	fn zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
		let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
		for (name, data) in entries {
			writer.start_file(*name, SimpleFileOptions::default()).unwrap();
			writer.write_all(data).unwrap();
		}
		writer.finish().unwrap().into_inner()
	}

	#[test]
	fn jar_entries() {
		let data = zip(&[
			("java/lang/Object.class", b"object"),
			("META-INF/MANIFEST.MF", b"manifest"),
		]);
		let source = JarClassSource::new("test.jar".to_string(), data, "").unwrap();
		assert_eq!(source.len(), 1);
		assert_eq!(source.try_load("java/lang/Object").unwrap(), Some(b"object".to_vec()));
		assert_eq!(source.try_load("java/lang/String").unwrap(), None);
	}

	#[test]
	fn jmod_entries() {
		let mut data = JMOD_HEADER.to_vec();
		data.extend(zip(&[
			("classes/java/lang/Object.class", b"object"),
			("classes/module-info.class", b"module"),
			("lib/libjava.so", b"elf"),
		]));
		let source = ModuleClassSource::new("java.base.jmod".to_string(), data).unwrap();
		assert_eq!(source.try_load("java/lang/Object").unwrap(), Some(b"object".to_vec()));
		assert_eq!(source.try_load("lib/libjava.so").unwrap(), None);
	}

	#[test]
	fn not_a_zip() {
		assert!(JarClassSource::new("broken.jar".to_string(), b"nope".to_vec(), "").is_err());
	}

	#[test]
	fn directory_entries() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::create_dir_all(dir.path().join("com/example")).unwrap();
		std::fs::write(dir.path().join("com/example/Foo.class"), b"foo").unwrap();

		let source = open_source(dir.path()).unwrap();
		assert_eq!(source.try_load("com/example/Foo").unwrap(), Some(b"foo".to_vec()));
		assert_eq!(source.try_load("com/example/Bar").unwrap(), None);
	}

	#[test]
	fn directory_stays_inside() {
		let root = tempfile::tempdir().unwrap();
		std::fs::create_dir_all(root.path().join("classes")).unwrap();
		std::fs::write(root.path().join("Outside.class"), b"outside").unwrap();

		let source = DirectoryClassSource::new(root.path().join("classes")).unwrap();
		assert_eq!(source.try_load("../Outside").unwrap(), None);
		let absolute = root.path().join("Outside");
		assert_eq!(source.try_load(&absolute.to_string_lossy()).unwrap(), None);
		assert_eq!(source.try_load("./Outside").unwrap(), None);
	}
}
