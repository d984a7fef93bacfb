//! Renderer contract for one screen slot.

use tessera_protocol::panel::PanelFrame;

/// Errors surfaced by a renderer implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Output queue full; the tile keeps its previous content
    Busy,
    /// Panel link is down
    LinkLost,
}

/// One screen slot's drawing capability
///
/// The core never draws pixels: it stages a typed frame and asks for a
/// refresh. Full refreshes clear e-paper ghosting but are slow; partial
/// refreshes are fast but accumulate ghosting.
pub trait Renderer {
    /// Power up and configure the tile
    fn init(&mut self) -> Result<(), RenderError>;

    /// Blank the tile
    fn clear(&mut self) -> Result<(), RenderError>;

    /// Stage the tile's next payload; errors surface on `refresh`
    fn set_frame(&mut self, frame: &PanelFrame);

    /// Redraw the tile from its staged payload
    fn refresh(&mut self, full: bool) -> Result<(), RenderError>;

    /// Replace the tile content with an error banner
    fn draw_error(&mut self, message: &str) -> Result<(), RenderError>;
}
