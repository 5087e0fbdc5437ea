use cabin_runtime::{NoopEngine, Runtime, RuntimeConfig};
use eyre::{eyre, Context};
use tracing::info;

fn main() -> eyre::Result<()> {
	cabin_core::init();

	let main_class = std::env::args()
		.nth(1)
		.ok_or_else(|| eyre!("Usage: cabin <main-class>"))?;

	let config = RuntimeConfig::from_env();
	let runtime = Runtime::new(config, Box::new(NoopEngine))?;
	runtime.bootstrap().wrap_err("Bootstrapping the runtime")?;

	let loader = runtime.app_loader()?;
	let class = runtime
		.load_class(&loader, &main_class)
		.wrap_err_with(|| format!("Loading {main_class}"))?;
	runtime.link(&class)?;
	runtime
		.initialize(&class)
		.wrap_err_with(|| format!("Initializing {main_class}"))?;

	info!(
		"Initialized {} ({} bootstrap classes, {} loaders)",
		class.name,
		runtime.all_bootstrap_classes().len(),
		runtime.all_loaders().len()
	);
	Ok(())
}
