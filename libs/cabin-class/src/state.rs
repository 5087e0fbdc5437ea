use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread::ThreadId;

/// Lifecycle of a class. Transitions only move forward.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ClassState {
	Loaded = 0,
	Linked = 1,
	Initializing = 2,
	Initialized = 3,
	/// The initializer failed, the class can never be used.
	Erroneous = 4,
}

impl ClassState {
	fn from_u8(value: u8) -> ClassState {
		match value {
			0 => ClassState::Loaded,
			1 => ClassState::Linked,
			2 => ClassState::Initializing,
			3 => ClassState::Initialized,
			_ => ClassState::Erroneous,
		}
	}
}

/// Per class initialization bookkeeping.
pub struct InitLock {
	state: AtomicU8,
	/// Raised before `<clinit>` runs so code inside the initializer sees the class as usable.
	initialized: AtomicBool,
	token: Mutex<()>,
	owner: Mutex<Option<ThreadId>>,
	failure: Mutex<Option<String>>,
}

impl InitLock {
	pub fn new() -> InitLock {
		InitLock {
			state: AtomicU8::new(ClassState::Loaded as u8),
			initialized: AtomicBool::new(false),
			token: Mutex::new(()),
			owner: Mutex::new(None),
			failure: Mutex::new(None),
		}
	}

	/// For classes that have nothing to initialize.
	pub fn done() -> InitLock {
		let lock = InitLock::new();
		lock.state.store(ClassState::Initialized as u8, Ordering::Release);
		lock.initialized.store(true, Ordering::Release);
		lock
	}

	pub fn state(&self) -> ClassState {
		ClassState::from_u8(self.state.load(Ordering::Acquire))
	}

	pub fn set_state(&self, state: ClassState) {
		self.state.store(state as u8, Ordering::Release);
	}

	/// Moves `from` to `to`, returns false if the class was in another state.
	pub fn transition(&self, from: ClassState, to: ClassState) -> bool {
		self.state
			.compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
	}

	pub fn is_initialized(&self) -> bool {
		self.initialized.load(Ordering::Acquire)
	}

	pub fn mark_initialized(&self) {
		self.initialized.store(true, Ordering::Release);
	}

	pub fn lock(&self) -> MutexGuard<'_, ()> {
		self.token.lock()
	}

	pub fn is_owned_by_current_thread(&self) -> bool {
		*self.owner.lock() == Some(std::thread::current().id())
	}

	pub fn set_owner(&self, owner: Option<ThreadId>) {
		*self.owner.lock() = owner;
	}

	pub fn failure(&self) -> Option<String> {
		self.failure.lock().clone()
	}

	pub fn fail(&self, message: String) {
		*self.failure.lock() = Some(message);
		self.initialized.store(false, Ordering::Release);
		self.set_state(ClassState::Erroneous);
	}
}

impl Default for InitLock {
	fn default() -> Self {
		InitLock::new()
	}
}
