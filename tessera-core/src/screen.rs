//! Physical screen slots and the registry contract.
//!
//! The carrier board drives four e-paper tiles in a fixed hardware order:
//! slot 0 is the color panel, slots 1-3 are monochrome. That binding is a
//! property of the wiring, so the pool reports it and nothing configures it.

use crate::traits::Renderer;

/// Number of addressable screen slots on the carrier board
pub const SCREEN_COUNT: usize = 4;

/// Capability tag of one screen slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenKind {
    Color,
    Monochrome,
}

/// Binding to one screen slot, handed out by the assignment pass
///
/// Modules hold handles, never renderers: the pool resolves a handle at
/// update time, so an unbound or failed slot degrades to a no-op instead of
/// a dangling reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenHandle {
    index: u8,
}

impl ScreenHandle {
    pub fn new(index: usize) -> Self {
        Self { index: index as u8 }
    }

    pub fn index(self) -> usize {
        usize::from(self.index)
    }
}

/// Registry of the physical screens
pub trait ScreenPool {
    /// Number of addressable slots
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capability tag of a slot, `None` when out of range
    fn kind(&self, index: usize) -> Option<ScreenKind>;

    /// Resolve a handle to its renderer
    ///
    /// `None` means the slot has no usable output; callers treat that as a
    /// no-op, not an error.
    fn renderer(&mut self, handle: ScreenHandle) -> Option<&mut dyn Renderer>;
}
