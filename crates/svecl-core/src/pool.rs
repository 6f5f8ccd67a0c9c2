//! Fixed-size pool of compiler instances.
//!
//! A compiler handles one component at a time. The pool hands out exclusive
//! access to an idle instance and blocks callers while all are busy.
//! Compilers that stop being healthy are discarded, and replaced when the
//! pool was built with a respawn function.

use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::compile::{self, CompileResult, CompilerOptions, CompilerOutput, ComponentCompiler};
use crate::error::{Error, Result};

/// Creates a replacement for a discarded compiler.
type Respawn<C> = Box<dyn Fn() -> Result<C> + Send + Sync>;

struct Slots<C> {
    /// Idle compilers ready for use.
    idle: Vec<C>,
    /// Compilers owned by the pool, idle or checked out.
    live: usize,
}

/// Pool of reusable compilers.
pub struct CompilerPool<C> {
    slots: Mutex<Slots<C>>,
    /// Signalled whenever a compiler is returned or discarded.
    returned: Condvar,
    /// Number of compilers the pool keeps.
    size: usize,
    respawn: Option<Respawn<C>>,
}

/// Helper to convert PoisonError to our Error type.
fn lock_error<T>(e: PoisonError<T>) -> Error {
    Error::Pool(format!("Pool lock poisoned (thread panicked): {}", e))
}

impl<C> CompilerPool<C> {
    /// Create a pool owning `compilers`. Compilers that die are not replaced.
    pub fn new(compilers: Vec<C>) -> Self {
        let size = compilers.len();
        Self {
            slots: Mutex::new(Slots {
                idle: compilers,
                live: size,
            }),
            returned: Condvar::new(),
            size,
            respawn: None,
        }
    }

    /// Create a pool owning `compilers` that replaces dead ones with `respawn`.
    pub fn with_respawn(
        compilers: Vec<C>,
        respawn: impl Fn() -> Result<C> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respawn: Some(Box::new(respawn)),
            ..Self::new(compilers)
        }
    }

    /// Total number of compilers the pool keeps.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of compilers not currently checked out.
    pub fn available(&self) -> Result<usize> {
        Ok(self.acquire_lock()?.idle.len())
    }

    fn acquire_lock(&self) -> Result<MutexGuard<'_, Slots<C>>> {
        self.slots.lock().map_err(lock_error)
    }
}

impl<C: ComponentCompiler> CompilerPool<C> {
    /// Take an idle compiler, waiting for one to be returned if necessary.
    ///
    /// The compiler goes back to the pool when the guard is dropped. Fails
    /// with [`Error::Pool`] once every compiler has died and none can be
    /// respawned.
    pub fn checkout(&self) -> Result<PooledCompiler<'_, C>> {
        let mut slots = self.acquire_lock()?;
        loop {
            while let Some(mut compiler) = slots.idle.pop() {
                if compiler.is_healthy() {
                    tracing::debug!("Checked out compiler ({} idle)", slots.idle.len());
                    return Ok(self.guard(compiler));
                }
                slots.live -= 1;
                tracing::warn!("Discarding exited compiler ({} left)", slots.live);
            }

            if slots.live < self.size {
                if let Some(respawn) = &self.respawn {
                    // Reserve the slot, then spawn without holding the lock
                    slots.live += 1;
                    drop(slots);
                    return match respawn() {
                        Ok(compiler) => {
                            tracing::debug!("Respawned compiler");
                            Ok(self.guard(compiler))
                        }
                        Err(e) => {
                            self.release_slot();
                            Err(e)
                        }
                    };
                }
            }

            if slots.live == 0 {
                return Err(Error::Pool("Pool has no compilers".to_string()));
            }
            slots = self.returned.wait(slots).map_err(lock_error)?;
        }
    }

    /// Compile with whichever compiler is free first.
    pub fn compile(&self, source: &str, options: &CompilerOptions) -> Result<CompileResult> {
        let mut compiler = self.checkout()?;
        compile::compile(&mut *compiler, source, options)
    }

    fn guard(&self, compiler: C) -> PooledCompiler<'_, C> {
        PooledCompiler {
            pool: self,
            compiler: Some(compiler),
        }
    }

    fn give_back(&self, mut compiler: C) {
        if !compiler.is_healthy() {
            drop(compiler);
            tracing::warn!("Compiler exited while checked out");
            self.release_slot();
            return;
        }

        // A poisoned pool is unusable anyway; the compiler is dropped with it.
        if let Ok(mut slots) = self.slots.lock() {
            slots.idle.push(compiler);
            self.returned.notify_one();
        }
    }

    fn release_slot(&self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.live -= 1;
            // Waiters either respawn into the slot or learn the pool is empty
            self.returned.notify_all();
        }
    }
}

/// Exclusive access to a pooled compiler.
pub struct PooledCompiler<'a, C: ComponentCompiler> {
    pool: &'a CompilerPool<C>,
    compiler: Option<C>,
}

impl<C: ComponentCompiler> Deref for PooledCompiler<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.compiler.as_ref().expect("compiler is only taken on drop")
    }
}

impl<C: ComponentCompiler> DerefMut for PooledCompiler<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.compiler.as_mut().expect("compiler is only taken on drop")
    }
}

impl<C: ComponentCompiler> ComponentCompiler for PooledCompiler<'_, C> {
    fn invoke(&mut self, source: &str, options: &CompilerOptions) -> Result<CompilerOutput> {
        (**self).invoke(source, options)
    }

    fn is_healthy(&mut self) -> bool {
        (**self).is_healthy()
    }
}

impl<C: ComponentCompiler> Drop for PooledCompiler<'_, C> {
    fn drop(&mut self) {
        if let Some(compiler) = self.compiler.take() {
            self.pool.give_back(compiler);
        }
    }
}
