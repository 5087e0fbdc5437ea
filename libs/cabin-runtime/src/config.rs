use std::path::PathBuf;

pub const JAVA_HOME_ENV: &str = "JAVA_HOME";
pub const CLASSPATH_ENV: &str = "CLASSPATH";

#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
	/// Root of the bootstrap class set, containers are searched under `jmods/`.
	pub java_home: Option<PathBuf>,
	/// User classpath, entries separated by the platform path separator.
	pub classpath: String,
}

impl RuntimeConfig {
	pub fn from_env() -> RuntimeConfig {
		RuntimeConfig {
			java_home: std::env::var_os(JAVA_HOME_ENV).map(PathBuf::from),
			classpath: std::env::var(CLASSPATH_ENV).unwrap_or_default(),
		}
	}

	pub fn with_java_home(mut self, java_home: impl Into<PathBuf>) -> Self {
		self.java_home = Some(java_home.into());
		self
	}

	pub fn with_classpath(mut self, classpath: impl Into<String>) -> Self {
		self.classpath = classpath.into();
		self
	}
}
