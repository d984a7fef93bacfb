//! Minimal SNTP client and the periodic time-sync task.

use defmt::*;
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Timer};
use heapless::String;

use tessera_core::traits::ConfigStoreExt;

use crate::channels::CONFIG;
use crate::store::{KEY_NTP_DST, KEY_NTP_GMT, KEY_NTP_SERVER};

const NTP_PORT: u16 = 123;

/// Seconds between the NTP era (1900) and the Unix epoch
const NTP_UNIX_OFFSET: i64 = 2_208_988_800;

/// Re-sync cadence once a sync exists
const RESYNC: Duration = Duration::from_secs(6 * 3_600);

/// Retry cadence while unsynced
const RETRY: Duration = Duration::from_secs(30);

/// One SNTP query; `None` on any failure
async fn query(stack: Stack<'static>, server: &str) -> Option<i64> {
    let addrs = stack.dns_query(server, DnsQueryType::A).await.ok()?;
    let addr = *addrs.first()?;

    let mut rx_meta = [PacketMetadata::EMPTY; 4];
    let mut tx_meta = [PacketMetadata::EMPTY; 4];
    let mut rx_buf = [0u8; 128];
    let mut tx_buf = [0u8; 128];
    let mut socket = UdpSocket::new(stack, &mut rx_meta, &mut rx_buf, &mut tx_meta, &mut tx_buf);
    socket.bind(0).ok()?;

    let mut packet = [0u8; 48];
    packet[0] = 0x1B; // LI=0, VN=3, mode=3 (client)
    socket.send_to(&packet, (addr, NTP_PORT)).await.ok()?;

    let (len, _) = with_timeout(Duration::from_secs(5), socket.recv_from(&mut packet))
        .await
        .ok()?
        .ok()?;
    if len < 44 {
        return None;
    }

    // Transmit timestamp, seconds field
    let secs = u32::from_be_bytes([packet[40], packet[41], packet[42], packet[43]]);
    Some(i64::from(secs) - NTP_UNIX_OFFSET)
}

/// Time-sync task: seeds the wall clock, then keeps it fresh
#[embassy_executor::task]
pub async fn time_sync_task(stack: Stack<'static>) {
    info!("time sync task started");

    loop {
        let (server, offset_secs) = {
            let bank = CONFIG.lock().await;
            let server: String<48> =
                String::try_from(bank.get_or(KEY_NTP_SERVER, "pool.ntp.org")).unwrap_or_default();
            let offset = bank.get_i32(KEY_NTP_GMT, 3_600) + bank.get_i32(KEY_NTP_DST, 3_600);
            (server, offset)
        };

        match query(stack, &server).await {
            Some(unix) => {
                crate::clock::set_sync(unix, offset_secs);
                info!("time synced from {}", server.as_str());
                Timer::after(RESYNC).await;
            }
            None => {
                warn!("time sync against {} failed, retrying", server.as_str());
                Timer::after(RETRY).await;
            }
        }
    }
}
