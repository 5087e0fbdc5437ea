use cabin_class::{open_source, ClassSource};
use eyre::Context;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Where bootstrap classes come from, plus the opaque user classpath.
pub struct Classpath {
	boot: RwLock<Vec<Arc<dyn ClassSource>>>,
	user: RwLock<String>,
}

impl Classpath {
	pub fn new() -> Classpath {
		Classpath {
			boot: RwLock::new(Vec::new()),
			user: RwLock::new(String::new()),
		}
	}

	/// Opens every boot container under `root`. Returns how many were added.
	///
	/// Modules come from `jmods/`, older layouts keep jars in `jre/lib/` or `lib/` with `rt.jar` searched first.
	pub fn configure(&self, root: &Path) -> eyre::Result<usize> {
		let mut containers = find_files(&root.join("jmods"), "jmod")?;
		for dir in [root.join("jre").join("lib"), root.join("lib")] {
			let mut jars = find_files(&dir, "jar")?;
			if let Some(rt) = jars
				.iter()
				.position(|path| path.file_name().is_some_and(|name| name == "rt.jar"))
			{
				let rt = jars.remove(rt);
				jars.insert(0, rt);
			}
			containers.extend(jars);
		}

		let count = containers.len();
		for path in containers {
			debug!("Found boot container {}", path.display());
			let source = open_source(&path)
				.wrap_err_with(|| format!("Opening boot container {}", path.display()))?;
			self.boot.write().push(Arc::from(source));
		}

		info!("Configured {count} boot containers from {}", root.display());
		Ok(count)
	}

	pub fn add_boot_source(&self, source: impl ClassSource + 'static) {
		self.boot.write().push(Arc::new(source));
	}

	/// Snapshot of the boot containers in search order.
	pub fn boot_sources(&self) -> Vec<Arc<dyn ClassSource>> {
		self.boot.read().clone()
	}

	pub fn boot_source_count(&self) -> usize {
		self.boot.read().len()
	}

	pub fn describe_boot_sources(&self) -> Vec<String> {
		self.boot.read().iter().map(|source| source.describe()).collect()
	}

	pub fn user_classpath(&self) -> String {
		self.user.read().clone()
	}

	pub fn set_user_classpath(&self, classpath: impl Into<String>) {
		*self.user.write() = classpath.into();
	}

	pub fn user_entries(&self) -> Vec<PathBuf> {
		let classpath = self.user.read();
		if classpath.is_empty() {
			return Vec::new();
		}
		std::env::split_paths(&*classpath)
			.filter(|path| !path.as_os_str().is_empty())
			.collect()
	}

	/// Opens every user classpath entry, entries that do not exist are skipped.
	pub fn user_sources(&self) -> eyre::Result<Vec<Box<dyn ClassSource>>> {
		let mut sources = Vec::new();
		for entry in self.user_entries() {
			if !entry.exists() {
				debug!("Skipping missing classpath entry {}", entry.display());
				continue;
			}
			let source = open_source(&entry)
				.wrap_err_with(|| format!("Opening classpath entry {}", entry.display()))?;
			sources.push(source);
		}
		Ok(sources)
	}
}

impl Default for Classpath {
	fn default() -> Self {
		Classpath::new()
	}
}

fn find_files(dir: &Path, extension: &str) -> eyre::Result<Vec<PathBuf>> {
	if !dir.is_dir() {
		return Ok(Vec::new());
	}

	let mut found = Vec::new();
	for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
		let entry = entry.wrap_err_with(|| format!("Listing {}", dir.display()))?;
		let path = entry.path();
		if entry.file_type().is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
			found.push(path.to_path_buf());
		}
	}
	Ok(found)
}
