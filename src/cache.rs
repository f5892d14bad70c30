//! Type Cache - One Generated Type per Shape
//!
//! Maps [`ShapeSignature`] to whatever the code generator produces.
//! Insert-if-absent is single-flight: for a given signature at most one
//! generator call runs at a time, and concurrent callers for that signature
//! wait for it and share the result. Different signatures never wait on
//! each other's generators.
//!
//! Keys go through `HashMap`, so a hash match is always confirmed with full
//! signature equality before an entry is reused.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::record::PropertySource;
use crate::signature::ShapeSignature;

/// Seam for the external code generator.
pub trait TypeGenerator {
    type Output;

    fn generate(&self, signature: &ShapeSignature) -> Result<Self::Output>;
}

impl<F, T> TypeGenerator for F
where
    F: Fn(&ShapeSignature) -> Result<T>,
{
    type Output = T;

    fn generate(&self, signature: &ShapeSignature) -> Result<T> {
        self(signature)
    }
}

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub generations: u64,
    pub failures: u64,
    pub last_generation_ns: u64,
}

/// Per-signature entry. `value` is written once; `generating` serializes builders.
struct Slot<T> {
    value: OnceLock<Arc<T>>,
    generating: Mutex<()>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            value: OnceLock::new(),
            generating: Mutex::new(()),
        }
    }
}

pub struct TypeCache<T> {
    slots: Mutex<HashMap<ShapeSignature, Arc<Slot<T>>>>,
    stats: Mutex<CacheStats>,
}

impl<T> TypeCache<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Cached value for `signature`, without waiting on an in-flight generation.
    pub fn get(&self, signature: &ShapeSignature) -> Option<Arc<T>> {
        let slot = self.slots.lock().get(signature).cloned()?;
        slot.value.get().cloned()
    }

    pub fn get_or_insert_with<F>(&self, signature: &ShapeSignature, build: F) -> Arc<T>
    where
        F: FnOnce(&ShapeSignature) -> T,
    {
        match self.get_or_try_insert_with(signature, |sig| Ok::<T, Infallible>(build(sig))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Return the cached value or run `build` exactly once for this signature.
    ///
    /// A failed build stores nothing; the next caller retries.
    pub fn get_or_try_insert_with<F, E>(
        &self,
        signature: &ShapeSignature,
        build: F,
    ) -> std::result::Result<Arc<T>, E>
    where
        F: FnOnce(&ShapeSignature) -> std::result::Result<T, E>,
    {
        loop {
            let slot = self.slot_for(signature);
            if let Some(hit) = slot.value.get() {
                return Ok(self.record_hit(signature, hit));
            }

            // Other callers for this signature block here while `build` runs.
            let _generating = slot.generating.lock();
            if let Some(hit) = slot.value.get() {
                return Ok(self.record_hit(signature, hit));
            }
            // Slot dropped by a failed build or `clear()` while we waited.
            if !self.is_live(signature, &slot) {
                continue;
            }

            self.stats.lock().misses += 1;
            let start = Instant::now();
            return match build(signature) {
                Ok(value) => {
                    let value = Arc::new(value);
                    let _ = slot.value.set(Arc::clone(&value));
                    let elapsed = start.elapsed().as_nanos() as u64;
                    {
                        let mut stats = self.stats.lock();
                        stats.generations += 1;
                        stats.last_generation_ns = elapsed;
                    }
                    debug!(
                        hash = signature.hash_value(),
                        properties = signature.len(),
                        elapsed_ns = elapsed,
                        "generated type for new shape"
                    );
                    Ok(value)
                }
                Err(err) => {
                    self.release_empty(signature, &slot);
                    self.stats.lock().failures += 1;
                    warn!(hash = signature.hash_value(), "type generation failed");
                    Err(err)
                }
            };
        }
    }

    /// Extract the record's shape and resolve it through `generator`.
    pub fn resolve<S, G>(&self, source: &S, generator: &G) -> Result<Arc<T>>
    where
        S: PropertySource + ?Sized,
        G: TypeGenerator<Output = T> + ?Sized,
    {
        let signature = ShapeSignature::extract(source)?;
        self.get_or_try_insert_with(&signature, |sig| generator.generate(sig))
    }

    /// Number of signatures with a generated value.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.value.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }

    /// Drop every entry. In-flight generations finish into detached slots.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    fn slot_for(&self, signature: &ShapeSignature) -> Arc<Slot<T>> {
        let mut slots = self.slots.lock();
        match slots.get(signature) {
            Some(slot) => Arc::clone(slot),
            None => {
                let slot = Arc::new(Slot::new());
                slots.insert(signature.clone(), Arc::clone(&slot));
                slot
            }
        }
    }

    fn is_live(&self, signature: &ShapeSignature, slot: &Arc<Slot<T>>) -> bool {
        self.slots
            .lock()
            .get(signature)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    fn release_empty(&self, signature: &ShapeSignature, slot: &Arc<Slot<T>>) {
        let mut slots = self.slots.lock();
        let owned = slots
            .get(signature)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && current.value.get().is_none());
        if owned {
            slots.remove(signature);
        }
    }

    fn record_hit(&self, signature: &ShapeSignature, hit: &Arc<T>) -> Arc<T> {
        self.stats.lock().hits += 1;
        trace!(hash = signature.hash_value(), "type cache hit");
        Arc::clone(hit)
    }
}

impl<T> Default for TypeCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
