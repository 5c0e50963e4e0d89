//! Algorithm registry.
//!
//! Maps names to [`Algorithm`] descriptors in registration order. The order
//! only affects enumeration, for example help listings.
//!
//! A process-wide registry holding the built-ins is available through
//! [`global`]. It is assembled on first use; nothing registers itself from a
//! static initializer. Independent registries can be built with
//! [`Registry::builder`].

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::algo::{self, Algorithm};
use crate::config::Flags;
use crate::context::Context;
use crate::error::CsumError;

/// Returns the process-wide registry, populated with the built-in algorithms.
///
/// Registration, removal and lookup are serialized by an internal lock, so
/// plug-in algorithms may be added from any thread.
pub fn global() -> &'static Registry {
    static GLOBAL: OnceLock<Registry> = OnceLock::new();
    GLOBAL.get_or_init(Registry::with_builtins)
}

/// An ordered set of algorithm descriptors with unique names.
///
/// # Example
///
/// ```
/// use csum::{Flags, Registry};
///
/// let registry = Registry::with_builtins();
/// assert!(registry.lookup("crc32").is_some());
///
/// let mut ctx = registry.prepare("crc16", Some("0x10"), Flags::empty())?;
/// assert_eq!(ctx.algorithm().name(), "crc16");
/// # Ok::<(), csum::CsumError>(())
/// ```
#[derive(Default)]
pub struct Registry {
    algorithms: RwLock<Vec<Arc<dyn Algorithm>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in algorithm.
    pub fn with_builtins() -> Self {
        Self {
            algorithms: RwLock::new(algo::builtins()),
        }
    }

    /// Starts assembling a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Adds a descriptor.
    ///
    /// # Errors
    ///
    /// - [`CsumError::InvalidDescriptor`] if the name is empty or contains
    ///   whitespace or control characters
    /// - [`CsumError::AlreadyRegistered`] if the name is taken; the existing
    ///   descriptor is kept
    pub fn register(&self, algorithm: Arc<dyn Algorithm>) -> Result<(), CsumError> {
        validate_name(algorithm.name())?;

        let mut algorithms = self.algorithms.write();
        if algorithms.iter().any(|a| a.name() == algorithm.name()) {
            return Err(CsumError::AlreadyRegistered {
                name: algorithm.name().to_owned(),
            });
        }

        tracing::debug!(algorithm = algorithm.name(), "registered");
        algorithms.push(algorithm);
        Ok(())
    }

    /// Removes exactly this descriptor instance.
    ///
    /// A different descriptor that merely shares the name does not match.
    ///
    /// # Errors
    ///
    /// [`CsumError::NotFound`] if the instance is not registered.
    pub fn unregister(&self, algorithm: &Arc<dyn Algorithm>) -> Result<(), CsumError> {
        let mut algorithms = self.algorithms.write();
        let Some(index) = algorithms.iter().position(|a| Arc::ptr_eq(a, algorithm)) else {
            return Err(CsumError::NotFound {
                name: algorithm.name().to_owned(),
            });
        };

        algorithms.remove(index);
        tracing::debug!(algorithm = algorithm.name(), "unregistered");
        Ok(())
    }

    /// Finds a descriptor by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Algorithm>> {
        self.algorithms
            .read()
            .iter()
            .find(|a| a.name() == name)
            .cloned()
    }

    /// Looks up `name` and runs its factory.
    ///
    /// The resulting context is stamped with the resolved descriptor and
    /// `flags` here, whichever algorithm produced it.
    ///
    /// # Errors
    ///
    /// - [`CsumError::UnknownAlgorithm`] if nothing is registered under `name`
    /// - Any error of the algorithm's factory, such as
    ///   [`CsumError::MalformedParameter`] under [`Flags::STRICT`]
    pub fn prepare(
        &self,
        name: &str,
        args: Option<&str>,
        flags: Flags,
    ) -> Result<Context, CsumError> {
        let algorithm = self.lookup(name).ok_or_else(|| CsumError::UnknownAlgorithm {
            name: name.to_owned(),
        })?;

        let accumulator = algorithm.prepare(args, flags)?;
        tracing::debug!(algorithm = name, ?args, ?flags, "prepared context");

        Ok(Context::new(algorithm, flags, accumulator))
    }

    /// Returns a snapshot of the registered descriptors in registration order.
    pub fn algorithms(&self) -> Vec<Arc<dyn Algorithm>> {
        self.algorithms.read().clone()
    }

    /// Returns true if a descriptor is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.read().iter().any(|a| a.name() == name)
    }

    /// Returns the number of registered descriptors.
    pub fn len(&self) -> usize {
        self.algorithms.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.algorithms.read().is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithms = self.algorithms.read();
        f.debug_list()
            .entries(algorithms.iter().map(|a| a.name()))
            .finish()
    }
}

fn validate_name(name: &str) -> Result<(), CsumError> {
    if name.is_empty() {
        return Err(CsumError::InvalidDescriptor {
            reason: "name must be non-empty",
        });
    }

    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CsumError::InvalidDescriptor {
            reason: "name must not contain whitespace or control characters",
        });
    }

    Ok(())
}

/// Assembles a [`Registry`] once, up front.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use csum::{CrcAlgorithm, Registry};
///
/// let crc32 = CrcAlgorithm::catalog()
///     .into_iter()
///     .find(|a| a.width() == 32)
///     .unwrap();
///
/// let registry = Registry::builder().algorithm(Arc::new(crc32)).build()?;
/// assert_eq!(registry.len(), 1);
/// # Ok::<(), csum::CsumError>(())
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    algorithms: Vec<Arc<dyn Algorithm>>,
}

impl RegistryBuilder {
    /// Adds every built-in algorithm.
    pub fn builtins(mut self) -> Self {
        self.algorithms.extend(algo::builtins());
        self
    }

    /// Adds one descriptor.
    pub fn algorithm(mut self, algorithm: Arc<dyn Algorithm>) -> Self {
        self.algorithms.push(algorithm);
        self
    }

    /// Registers everything in the order added.
    ///
    /// Fails on the first descriptor [`Registry::register`] rejects.
    pub fn build(self) -> Result<Registry, CsumError> {
        let registry = Registry::new();
        for algorithm in self.algorithms {
            registry.register(algorithm)?;
        }
        Ok(registry)
    }
}
