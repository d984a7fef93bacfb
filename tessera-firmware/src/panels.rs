//! Screen pool and renderers backed by the panel link.
//!
//! Each renderer just addresses one tile on the co-processor: staging a
//! frame, requesting a refresh and drawing error banners all become queued
//! panel-link messages. The hardware layout (color at slot 0, monochrome at
//! 1-3) is baked into the carrier board and reported here.

use defmt::*;

use tessera_core::screen::{ScreenHandle, ScreenKind, ScreenPool, SCREEN_COUNT};
use tessera_core::traits::{RenderError, Renderer};
use tessera_protocol::panel::{clipped, PanelFrame, PanelMessage};

use crate::channels::PANEL_LINK;

/// One tile, addressed over the panel link
pub struct LinkPanel {
    index: u8,
}

impl LinkPanel {
    fn send(&self, message: PanelMessage) -> Result<(), RenderError> {
        PANEL_LINK.try_send(message).map_err(|_| RenderError::Busy)
    }
}

impl Renderer for LinkPanel {
    fn init(&mut self) -> Result<(), RenderError> {
        self.send(PanelMessage::Init { panel: self.index })
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.send(PanelMessage::Clear { panel: self.index })
    }

    fn set_frame(&mut self, frame: &PanelFrame) {
        let queued = self.send(PanelMessage::Frame {
            panel: self.index,
            frame: frame.clone(),
        });
        if queued.is_err() {
            warn!("panel {}: frame queue full, dropping frame", self.index);
        }
    }

    fn refresh(&mut self, full: bool) -> Result<(), RenderError> {
        self.send(PanelMessage::Refresh {
            panel: self.index,
            full,
        })
    }

    fn draw_error(&mut self, message: &str) -> Result<(), RenderError> {
        self.send(PanelMessage::ShowError {
            panel: self.index,
            message: clipped(message),
        })
    }
}

/// The four tiles in hardware order
pub struct PanelBank {
    panels: [LinkPanel; SCREEN_COUNT],
}

impl PanelBank {
    pub fn new() -> Self {
        Self {
            panels: core::array::from_fn(|i| LinkPanel { index: i as u8 }),
        }
    }
}

impl ScreenPool for PanelBank {
    fn len(&self) -> usize {
        SCREEN_COUNT
    }

    fn kind(&self, index: usize) -> Option<ScreenKind> {
        match index {
            0 => Some(ScreenKind::Color),
            1..=3 => Some(ScreenKind::Monochrome),
            _ => None,
        }
    }

    fn renderer(&mut self, handle: ScreenHandle) -> Option<&mut dyn Renderer> {
        self.panels
            .get_mut(handle.index())
            .map(|p| p as &mut dyn Renderer)
    }
}
