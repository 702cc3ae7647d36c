use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Random source shared by clones of a service.
#[derive(Clone)]
pub(crate) struct SharedRng(Arc<Mutex<StdRng>>);

impl SharedRng {
    pub(crate) fn from_os() -> Self {
        Self::wrap(StdRng::from_os_rng())
    }

    pub(crate) fn seeded(seed: u64) -> Self {
        Self::wrap(StdRng::seed_from_u64(seed))
    }

    fn wrap(rng: StdRng) -> Self {
        Self(Arc::new(Mutex::new(rng)))
    }

    /// Run `f` with exclusive access to the generator.
    ///
    /// A poisoned lock still holds a usable generator, so it is recovered.
    pub(crate) fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
