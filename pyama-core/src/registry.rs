//! Particle enablement registry.

use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Single source of truth for which particles are excluded from view,
/// analysis, and export.
///
/// Particle identifiers are indices in `[0, all_particles_len)`. The
/// registry is rebuilt (`reset`) whenever tracking reruns, since the prior
/// identifiers become invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleRegistry {
    len: usize,
    disabled: BTreeSet<usize>,
}

impl ParticleRegistry {
    /// Creates a registry for `len` tracked particles, all enabled.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            disabled: BTreeSet::new(),
        }
    }

    /// Creates a registry with an initial disabled set.
    ///
    /// Fails with `InvalidParticleId` if any id lies outside
    /// `[0, len)`.
    pub fn with_disabled(len: usize, disabled: BTreeSet<usize>) -> Result<Self> {
        if let Some(&id) = disabled.iter().find(|&&id| id >= len) {
            return Err(Error::InvalidParticleId { id, len });
        }
        Ok(Self { len, disabled })
    }

    /// Total number of tracked particles.
    pub fn all_particles_len(&self) -> usize {
        self.len
    }

    /// Marks a particle as excluded. Idempotent.
    pub fn disable(&mut self, id: usize) -> Result<()> {
        self.check(id)?;
        self.disabled.insert(id);
        Ok(())
    }

    /// Marks a particle as included. Idempotent.
    pub fn enable(&mut self, id: usize) -> Result<()> {
        self.check(id)?;
        self.disabled.remove(&id);
        Ok(())
    }

    /// Sets the enablement flag for a particle.
    pub fn set_enabled(&mut self, id: usize, enabled: bool) -> Result<()> {
        if enabled {
            self.enable(id)
        } else {
            self.disable(id)
        }
    }

    /// Returns true if the particle is visible.
    pub fn is_enabled(&self, id: usize) -> bool {
        !self.disabled.contains(&id)
    }

    /// The disabled identifiers in ascending order.
    pub fn disabled_ids(&self) -> Vec<usize> {
        self.disabled.iter().copied().collect()
    }

    /// Replaces the registry for a new track count, clearing the disabled
    /// set. Called when tracking reruns and prior ids become invalid.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.disabled.clear();
    }

    fn check(&self, id: usize) -> Result<()> {
        if id >= self.len {
            return Err(Error::InvalidParticleId { id, len: self.len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_enable_round_trip() {
        let mut reg = ParticleRegistry::new(4);
        let before = reg.disabled_ids();

        reg.disable(2).unwrap();
        assert!(!reg.is_enabled(2));
        assert_eq!(reg.disabled_ids(), vec![2]);

        reg.enable(2).unwrap();
        assert!(reg.is_enabled(2));
        assert_eq!(reg.disabled_ids(), before);
    }

    #[test]
    fn test_disable_is_idempotent() {
        let mut reg = ParticleRegistry::new(4);
        reg.disable(1).unwrap();
        reg.disable(1).unwrap();
        assert_eq!(reg.disabled_ids(), vec![1]);
    }

    #[test]
    fn test_out_of_range_id_rejected() {
        let mut reg = ParticleRegistry::new(3);
        match reg.disable(3).unwrap_err() {
            Error::InvalidParticleId { id, len } => {
                assert_eq!(id, 3);
                assert_eq!(len, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(reg.enable(7).is_err());
    }

    #[test]
    fn test_reset_clears_disabled_set() {
        let mut reg = ParticleRegistry::new(5);
        reg.disable(0).unwrap();
        reg.disable(4).unwrap();

        reg.reset(2);
        assert_eq!(reg.all_particles_len(), 2);
        assert!(reg.disabled_ids().is_empty());
        assert!(reg.is_enabled(0));
    }

    #[test]
    fn test_with_disabled_validates_ids() {
        let disabled: BTreeSet<usize> = [1, 5].into_iter().collect();
        assert!(ParticleRegistry::with_disabled(3, disabled.clone()).is_err());
        assert!(ParticleRegistry::with_disabled(6, disabled).is_ok());
    }
}
