//! Free list of projectiles.

use crate::game::Projectile;

/// Recycles projectiles so firing does not allocate once the pool is warm.
///
/// Projectiles are interchangeable: the pool hands out any free instance
/// and the caller overwrites every field it cares about.
#[derive(Debug, Default)]
pub struct ProjectilePool {
    /// Released instances ready for reuse.
    free: Vec<Projectile>,
    /// Instances ever created by this pool.
    created: usize,
}

impl ProjectilePool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a free projectile, creating one if none is available.
    pub fn acquire(&mut self) -> Projectile {
        if let Some(projectile) = self.free.pop() {
            projectile
        } else {
            self.created += 1;
            Projectile::default()
        }
    }

    /// Return a projectile for reuse.
    pub fn release(&mut self, projectile: Projectile) {
        self.free.push(projectile);
    }

    /// Number of instances waiting for reuse.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Number of instances ever created.
    #[must_use]
    pub const fn created(&self) -> usize {
        self.created
    }

    /// Drop every pooled instance and forget the creation count.
    pub fn clear(&mut self) {
        self.free.clear();
        self.created = 0;
    }
}
