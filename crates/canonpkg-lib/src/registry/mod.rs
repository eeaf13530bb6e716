//! Canonical load registry.
//!
//! One registry is one session. For every import key it hands out exactly
//! one [`TypedPackage`] instance, no matter how many callers ask or through
//! which entry point: direct loads and the imports of packages being checked
//! go through the same [`Registry::load`] path.
//!
//! # Single flight
//!
//! The key map holds either a published package or an in-flight slot. The
//! first caller for an absent key installs the slot and resolves; everyone
//! else blocks on the slot and receives the leader's result. The map lock is
//! never held while resolving.
//!
//! Failures are handed to the waiters of that attempt and then forgotten;
//! the next load of the key resolves again. A leader that unwinds removes
//! its slot and wakes its waiters, which start over.
//!
//! # Cycles
//!
//! Each in-flight key records the key its resolution is currently loading.
//! Before blocking on a slot the caller follows those edges; reaching a key
//! of its own chain means an import cycle, reported instead of deadlocking.

mod builder;
mod pending;


use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use canonpkg_core::{ImportKey, SourceFile, SourceUnit};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::discovery::PackageSource;
use crate::error::ResolutionFailure;
use crate::frontend::{Frontend, Importer};
use crate::parser::package_name;
use crate::types::TypedPackage;

pub use builder::RegistryBuilder;
use pending::{Pending, Resolved, Wait};

pub struct Registry {
    frontend: Frontend,
    wait_timeout: Option<Duration>,
    state: Mutex<State>,
    inline: RwLock<FxHashMap<ImportKey, SourceFile>>,
    next_token: AtomicU64,
    counters: Counters,
}

#[derive(Default)]
struct State {
    slots: FxHashMap<ImportKey, Slot>,
    /// In-flight key → key its resolution is loading right now.
    edges: FxHashMap<ImportKey, ImportKey>,
}

enum Slot {
    Ready(TypedPackage),
    Loading(Arc<Pending>),
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    waits: AtomicU64,
    failures: AtomicU64,
}

/// Load counters of one registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Loads answered from a published package.
    pub hits: u64,
    /// Frontend invocations.
    pub misses: u64,
    /// Loads that blocked on another caller's in-flight resolution.
    pub waits: u64,
    /// Frontend invocations that failed.
    pub failures: u64,
}

impl Registry {
    pub fn new(source: impl PackageSource + 'static) -> Self {
        Self::builder(source).build()
    }

    pub fn builder(source: impl PackageSource + 'static) -> RegistryBuilder {
        RegistryBuilder::new(Arc::new(source))
    }

    fn from_parts(frontend: Frontend, wait_timeout: Option<Duration>) -> Self {
        Self {
            frontend,
            wait_timeout,
            state: Mutex::new(State::default()),
            inline: RwLock::new(FxHashMap::default()),
            next_token: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    pub fn frontend(&self) -> &Frontend {
        &self.frontend
    }

    /// Register an inline unit under a fresh key.
    ///
    /// The key is named after the unit's `package` clause (`_` without one)
    /// and carries a token unique within this registry. Nothing is resolved
    /// until the key is loaded.
    pub fn add_inline(&self, file: SourceFile) -> ImportKey {
        let name = package_name(&file.text).unwrap_or_else(|| "_".to_string());
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let key = ImportKey::inline(name, token);
        tracing::debug!(%key, file = %file.name, "inline unit registered");
        self.inline
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), file);
        key
    }

    /// Canonical package for `key`, resolving it on first use.
    pub fn load(&self, key: &ImportKey) -> Result<TypedPackage, ResolutionFailure> {
        self.load_in(key, &[])
    }

    /// [`Self::load`] for an import path given as text.
    pub fn load_path(&self, path: &str) -> Result<TypedPackage, ResolutionFailure> {
        let key = ImportKey::path(path).map_err(|err| ResolutionFailure::PackageNotFound {
            path: path.to_string(),
            reason: err.into(),
        })?;
        self.load(&key)
    }

    /// Published package for `key`, without resolving anything.
    pub fn get(&self, key: &ImportKey) -> Option<TypedPackage> {
        match self.lock().slots.get(key) {
            Some(Slot::Ready(package)) => Some(package.clone()),
            _ => None,
        }
    }

    /// Number of published packages.
    pub fn len(&self) -> usize {
        self.lock()
            .slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of published packages, sorted.
    pub fn keys(&self) -> Vec<ImportKey> {
        let mut keys: Vec<ImportKey> = self
            .lock()
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Ready(_)))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn stats(&self) -> RegistryStats {
        let read = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        RegistryStats {
            hits: read(&self.counters.hits),
            misses: read(&self.counters.misses),
            waits: read(&self.counters.waits),
            failures: read(&self.counters.failures),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load `key` on behalf of the resolutions in `chain`.
    ///
    /// `chain` lists the keys this thread is resolving, outermost first; the
    /// last one is the package whose import asked for `key`.
    fn load_in(&self, key: &ImportKey, chain: &[ImportKey]) -> Resolved {
        if let Some(pos) = chain.iter().position(|k| k == key) {
            let mut cycle = chain[pos..].to_vec();
            cycle.push(key.clone());
            tracing::debug!(%key, "import cycle");
            return Err(ResolutionFailure::ImportCycle { chain: cycle });
        }

        loop {
            let mut state = self.lock();
            let pending = match state.slots.get(key) {
                Some(Slot::Ready(package)) => {
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(%key, "cache hit");
                    return Ok(package.clone());
                }
                Some(Slot::Loading(pending)) => Arc::clone(pending),
                None => {
                    let pending = Arc::new(Pending::default());
                    state
                        .slots
                        .insert(key.clone(), Slot::Loading(Arc::clone(&pending)));
                    let _edge = EdgeGuard::set(self, &mut state, chain, key);
                    drop(state);
                    return self.lead(key, chain, pending);
                }
            };

            if let Some(cycle) = waits_on_chain(&state.edges, key, chain) {
                tracing::debug!(%key, "import cycle across in-flight loads");
                return Err(ResolutionFailure::ImportCycle { chain: cycle });
            }
            let _edge = EdgeGuard::set(self, &mut state, chain, key);
            drop(state);

            self.counters.waits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(%key, "waiting for in-flight load");
            match pending.wait(self.wait_timeout) {
                Wait::Done(result) => return result,
                Wait::Abandoned => {
                    tracing::debug!(%key, "in-flight load abandoned, retrying");
                    continue;
                }
                Wait::TimedOut(waited) => {
                    tracing::warn!(%key, ?waited, "timed out waiting for in-flight load");
                    return Err(ResolutionFailure::Timeout {
                        key: key.clone(),
                        waited,
                    });
                }
            }
        }
    }

    fn lead(&self, key: &ImportKey, chain: &[ImportKey], pending: Arc<Pending>) -> Resolved {
        let guard = LeaderGuard {
            registry: self,
            key,
            pending,
            settled: false,
        };
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%key, depth = chain.len(), "cache miss, resolving");

        let mut inner = chain.to_vec();
        inner.push(key.clone());
        let importer = ChainImporter {
            registry: self,
            chain: inner,
        };
        let result = self
            .unit(key)
            .and_then(|unit| self.frontend.resolve(&unit, &importer));
        guard.settle(result)
    }

    fn unit(&self, key: &ImportKey) -> Result<SourceUnit, ResolutionFailure> {
        if !key.is_inline() {
            return Ok(SourceUnit::Import(key.clone()));
        }
        let file = self
            .inline
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        match file {
            Some(file) => Ok(SourceUnit::Inline {
                key: key.clone(),
                file,
            }),
            None => Err(ResolutionFailure::InternalConsistency {
                key: key.clone(),
                detail: "inline unit was not registered with this registry".to_string(),
            }),
        }
    }

    /// Store the leader's result, or drop its slot on failure.
    fn publish(&self, key: &ImportKey, pending: &Arc<Pending>, result: Resolved) -> Resolved {
        let mut state = self.lock();
        let package = match result {
            Ok(package) => package,
            Err(failure) => {
                remove_own_slot(&mut state, key, pending);
                return Err(failure);
            }
        };

        if package.key() != key {
            remove_own_slot(&mut state, key, pending);
            return Err(ResolutionFailure::InternalConsistency {
                key: key.clone(),
                detail: format!("frontend returned package `{}`", package.key()),
            });
        }
        match state.slots.get(key) {
            Some(Slot::Loading(current)) if Arc::ptr_eq(current, pending) => {}
            Some(Slot::Ready(_)) => {
                return Err(ResolutionFailure::InternalConsistency {
                    key: key.clone(),
                    detail: "a package is already published for this key".to_string(),
                });
            }
            _ => {
                return Err(ResolutionFailure::InternalConsistency {
                    key: key.clone(),
                    detail: "in-flight slot disappeared before publishing".to_string(),
                });
            }
        }
        state.slots.insert(key.clone(), Slot::Ready(package.clone()));
        tracing::debug!(%key, decls = package.len(), "published");
        Ok(package)
    }
}

fn remove_own_slot(state: &mut State, key: &ImportKey, pending: &Arc<Pending>) {
    if matches!(state.slots.get(key), Some(Slot::Loading(p)) if Arc::ptr_eq(p, pending)) {
        state.slots.remove(key);
    }
}

/// Follow in-flight edges from `key`; a hit on `chain` closes a cycle.
///
/// Returns the cycle from the first chain key involved back to itself.
fn waits_on_chain(
    edges: &FxHashMap<ImportKey, ImportKey>,
    key: &ImportKey,
    chain: &[ImportKey],
) -> Option<Vec<ImportKey>> {
    let mut path = vec![key.clone()];
    let mut current = key;
    while let Some(next) = edges.get(current) {
        if let Some(pos) = chain.iter().position(|k| k == next) {
            let mut cycle = chain[pos..].to_vec();
            cycle.extend(path);
            cycle.push(next.clone());
            return Some(cycle);
        }
        if path.len() > edges.len() {
            break;
        }
        path.push(next.clone());
        current = next;
    }
    None
}

/// Marks what the innermost key of a chain is loading, for the duration of
/// one load.
struct EdgeGuard<'r> {
    registry: &'r Registry,
    from: Option<ImportKey>,
}

impl<'r> EdgeGuard<'r> {
    fn set(
        registry: &'r Registry,
        state: &mut State,
        chain: &[ImportKey],
        key: &ImportKey,
    ) -> Self {
        let from = chain.last().cloned();
        if let Some(from) = &from {
            state.edges.insert(from.clone(), key.clone());
        }
        Self { registry, from }
    }
}

impl Drop for EdgeGuard<'_> {
    fn drop(&mut self) {
        if let Some(from) = self.from.take() {
            self.registry.lock().edges.remove(&from);
        }
    }
}

/// Owns an in-flight slot until the leader settles it.
struct LeaderGuard<'r> {
    registry: &'r Registry,
    key: &'r ImportKey,
    pending: Arc<Pending>,
    settled: bool,
}

impl LeaderGuard<'_> {
    fn settle(mut self, result: Resolved) -> Resolved {
        let result = self.registry.publish(self.key, &self.pending, result);
        if let Err(failure) = &result {
            self.registry.counters.failures.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %self.key, stage = %failure.stage(), error = %failure, "load failed");
        }
        self.pending.finish(result.clone());
        self.settled = true;
        result
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!(key = %self.key, "load abandoned");
        remove_own_slot(&mut self.registry.lock(), self.key, &self.pending);
        self.pending.abandon();
    }
}

/// Routes a package's imports back into the registry that is resolving it.
struct ChainImporter<'r> {
    registry: &'r Registry,
    chain: Vec<ImportKey>,
}

impl Importer for ChainImporter<'_> {
    fn import(&self, path: &str) -> Resolved {
        let key = ImportKey::path(path).map_err(|err| ResolutionFailure::PackageNotFound {
            path: path.to_string(),
            reason: err.into(),
        })?;
        self.registry.load_in(&key, &self.chain)
    }
}

impl Importer for Registry {
    fn import(&self, path: &str) -> Result<TypedPackage, ResolutionFailure> {
        self.load_path(path)
    }
}
