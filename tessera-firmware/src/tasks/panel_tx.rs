//! Panel-link transmit task.
//!
//! Drains the panel message queue, frames each message and ships it to the
//! panel co-processor.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use tessera_protocol::frame::Frame;
use tessera_protocol::panel::{self, KIND_PANEL};

use crate::channels::PANEL_LINK;

/// Panel-link transmit task
#[embassy_executor::task]
pub async fn panel_tx_task(mut tx: BufferedUartTx<'static>) {
    info!("panel link task started");

    let mut payload = [0u8; 1024];
    let mut frame_buf = [0u8; 1536];

    loop {
        let message = PANEL_LINK.receive().await;

        let Ok(encoded) = panel::encode_message(&message, &mut payload) else {
            warn!("panel message did not fit the payload buffer");
            continue;
        };
        let Ok(frame) = Frame::new(KIND_PANEL, encoded) else {
            continue;
        };
        let Ok(bytes) = frame.encode(&mut frame_buf) else {
            continue;
        };

        if tx.write_all(bytes).await.is_err() {
            warn!("panel link write failed");
        }
    }
}
