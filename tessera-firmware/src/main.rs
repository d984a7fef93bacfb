//! Tessera - Multi-panel e-paper dashboard firmware
//!
//! Main firmware binary for the Pico W controller board. Joins Wi-Fi, syncs
//! time over SNTP, accepts companion-tool commands on the config link, and
//! orchestrates the four e-paper tiles over the panel link.
//!
//! Named after the Latin "tessera" - a single tile in a mosaic - for the
//! four e-paper tiles this firmware composes into one wall display.

#![no_std]
#![no_main]

extern crate alloc;

use cyw43::JoinOptions;
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::{Executor, Spawner};
use embassy_net::{Config as NetConfig, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::flash::{Async as FlashAsync, Flash};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::multicore::{spawn_core1, Stack as CoreStack};
use embassy_rp::peripherals::{PIO0, UART0, UART1};
use embassy_rp::pio::Pio;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embedded_alloc::LlffHeap as Heap;
use rand_core::RngCore;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::store::FLASH_SIZE;

mod channels;
mod clock;
mod net;
mod panels;
mod store;
mod tasks;

// Heap allocator for fetched JSON documents
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 64KB
const HEAP_SIZE: usize = 64 * 1024;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static PANEL_TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static PANEL_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static LINK_TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static LINK_RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

// Radio and network stack statics
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<8>> = StaticCell::new();

// Core 1 runs the orchestrator executor
static CORE1_STACK: StaticCell<CoreStack<65536>> = StaticCell::new();
static CORE1_EXECUTOR: StaticCell<Executor> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("tessera firmware starting");

    init_heap();
    let p = embassy_rp::init(Default::default());

    // 1. Config store from flash
    let mut flash = Flash::<_, FlashAsync, FLASH_SIZE>::new(p.FLASH, p.DMA_CH1);
    store::restore_from_flash(&mut flash).await;

    // 2. Wi-Fi radio (Pico W: cyw43 over PIO SPI)
    // Firmware blobs are flashed separately at fixed addresses:
    //   probe-rs download 43439A0.bin     --binary-format bin --base-address 0x10140000
    //   probe-rs download 43439A0_clm.bin --binary-format bin --base-address 0x10180000
    #[allow(unsafe_code)]
    let (fw, clm) = unsafe {
        (
            core::slice::from_raw_parts(0x1014_0000 as *const u8, 230321),
            core::slice::from_raw_parts(0x1018_0000 as *const u8, 4752),
        )
    };

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();
    control.init(clm).await;
    info!("radio initialized");

    // 3. Network stack (DHCP)
    let mut rng = RoscRng;
    let (stack, net_runner) = embassy_net::new(
        net_device,
        NetConfig::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        rng.next_u64(),
    );
    spawner.spawn(tasks::net_task(net_runner)).unwrap();

    // 4. Join Wi-Fi from stored credentials
    let (ssid, password) = store::wifi_credentials().await;
    if ssid.is_empty() {
        warn!("no Wi-Fi credentials configured, staying offline");
    } else {
        loop {
            match control
                .join(ssid.as_str(), JoinOptions::new(password.as_bytes()))
                .await
            {
                Ok(()) => break,
                Err(e) => warn!("Wi-Fi join failed (status {}), retrying", e.status),
            }
        }
        info!("Wi-Fi joined, waiting for DHCP");
        stack.wait_config_up().await;
        info!("network up");
    }

    // 5. Serial links: UART0 to the panel co-processor, UART1 to the
    //    companion config tool
    let panel_uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        PANEL_TX_BUF.init([0u8; 512]),
        PANEL_RX_BUF.init([0u8; 64]),
        UartConfig::default(),
    );
    let (panel_tx, _panel_rx) = panel_uart.split();

    let link_uart = BufferedUart::new(
        p.UART1,
        p.PIN_4,
        p.PIN_5,
        Irqs,
        LINK_TX_BUF.init([0u8; 512]),
        LINK_RX_BUF.init([0u8; 512]),
        UartConfig::default(),
    );

    // 6. Spawn the service tasks
    spawner.spawn(tasks::panel_tx_task(panel_tx)).unwrap();
    spawner.spawn(tasks::link_task(link_uart)).unwrap();
    spawner.spawn(net::time_sync_task(stack)).unwrap();
    spawner.spawn(store::store_task(flash)).unwrap();
    spawner.spawn(tasks::tick_task()).unwrap();

    // 7. Orchestrator on core 1: its collaborator fetches block that
    //    executor while the network stack keeps running here on core 0
    spawn_core1(
        p.CORE1,
        CORE1_STACK.init(CoreStack::new()),
        move || {
            let executor = CORE1_EXECUTOR.init(Executor::new());
            executor.run(|core1_spawner| {
                core1_spawner
                    .spawn(tasks::orchestrator_task(stack))
                    .unwrap();
            })
        },
    );

    info!("boot complete");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(unsafe_code, static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
