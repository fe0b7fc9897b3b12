//! Full link round trips through a mock UART
//!
//! Bytes enter through the device's receive register, pass the interrupt
//! handler, RX ring, line assembler and dispatcher, and leave through the
//! TX ring and the interrupt handler again.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use vperiph_core::{
    ApiError, Config, Outcome, PeerFault, TickCounter, Transport, TransportError,
    VirtualPeripherals,
};
use vperiph_hal::{SerialDevice, UartConfig};
use vperiph_protocol::{ErrorCode, TimeOfDay};

#[derive(Default)]
struct MockUart {
    baud: Cell<Option<u32>>,
    tx_irq: Cell<bool>,
    incoming: RefCell<VecDeque<u8>>,
    sent: RefCell<Vec<u8>>,
}

impl SerialDevice for MockUart {
    fn configure(&self, config: &UartConfig) {
        self.baud.set(Some(config.baudrate));
    }
    fn enable_rx_interrupt(&self) {}
    fn rx_ready(&self) -> bool {
        !self.incoming.borrow().is_empty()
    }
    fn read_data(&self) -> u8 {
        self.incoming.borrow_mut().pop_front().unwrap_or(0)
    }
    fn overrun(&self) -> bool {
        false
    }
    fn clear_overrun(&self) {}
    fn tx_empty(&self) -> bool {
        true
    }
    fn write_data(&self, byte: u8) {
        self.sent.borrow_mut().push(byte);
    }
    fn set_tx_interrupt(&self, enabled: bool) {
        self.tx_irq.set(enabled);
    }
}

type Link = Transport<MockUart, 64, 256>;
type Peripherals<'a> = VirtualPeripherals<'a, MockUart, 64, 256>;

const TICKS: u32 = 10;

fn config() -> Config {
    Config::new(9600, TICKS)
}

/// Run the interrupt until the transmitter goes idle; return what was sent
fn drain(transport: &Link) -> Vec<u8> {
    while transport.is_tx_armed() {
        transport.on_interrupt();
    }
    transport.device().sent.take()
}

/// Put bytes on the wire and let the receive interrupt pick them up
fn deliver(transport: &Link, bytes: &[u8]) {
    transport.device().incoming.borrow_mut().extend(bytes);
    transport.on_interrupt();
}

/// Poll until the RX ring is empty or an error comes back
fn poll_all(
    transport: &Link,
    vp: &mut Peripherals<'_>,
) -> Vec<Result<Option<Outcome>, ApiError>> {
    let mut results = Vec::new();
    while transport.rx_pending() > 0 {
        let result = vp.poll();
        let stop = result.is_err();
        results.push(result);
        if stop {
            break;
        }
    }
    results
}

fn outcomes(results: &[Result<Option<Outcome>, ApiError>]) -> Vec<Outcome> {
    results
        .iter()
        .filter_map(|r| r.as_ref().ok().copied().flatten())
        .collect()
}

#[test]
fn test_init_handshake() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());

    vp.init().unwrap();
    assert_eq!(transport.device().baud.get(), Some(9600));
    assert_eq!(drain(&transport), b"dS0\n?T\nd0000\n?01\n?02\n?0a\n?0b\n");
    assert!(!transport.device().tx_irq.get());
}

#[test]
fn test_calls_before_init() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());

    assert_eq!(vp.poll(), Err(ApiError::NotInitialized));
    assert_eq!(vp.log("hi"), Err(ApiError::NotInitialized));
    assert_eq!(vp.set_leds(1), Err(ApiError::NotInitialized));
    assert_eq!(vp.leds(), 0);
    assert!(transport.tx_pending() == 0);
}

#[test]
fn test_init_twice_and_bad_baud() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);

    let mut bad = Peripherals::new(&transport, &ticks, Config::new(50, TICKS));
    assert_eq!(
        bad.init(),
        Err(ApiError::Transport(TransportError::InvalidBaudRate))
    );
    assert_eq!(transport.device().baud.get(), None);
    assert_eq!(transport.tx_pending(), 0);

    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();
    drain(&transport);
    assert_eq!(
        vp.init(),
        Err(ApiError::Transport(TransportError::AlreadyInitialized))
    );
    assert!(drain(&transport).is_empty());
}

#[test]
fn test_screen_request_round_trip() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();
    drain(&transport);

    vp.set_screen(3).unwrap();
    assert_eq!(drain(&transport), b"dS3\n");

    // unchanged: nothing on the wire
    vp.set_screen(3).unwrap();
    assert!(drain(&transport).is_empty());
    assert_eq!(vp.set_screen(10), Err(ApiError::InvalidScreen));

    deliver(&transport, b"?S\n");
    let results = poll_all(&transport, &mut vp);
    assert_eq!(outcomes(&results), [Outcome::Handled]);
    assert_eq!(drain(&transport), b"dS3\n");
}

#[test]
fn test_setters_from_peer() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();
    drain(&transport);

    deliver(&transport, b"d01ff\r\nd0205\nd0a0200\n");
    let results = poll_all(&transport, &mut vp);
    assert_eq!(outcomes(&results), [Outcome::Handled; 3]);
    assert!(drain(&transport).is_empty());

    assert_eq!(vp.switches(), 0xff);
    assert_eq!(vp.buttons(), 0x05);
    for _ in 0..50 {
        let reading = vp.adc(0).unwrap();
        assert!((509..=515).contains(&reading));
    }
    assert_eq!(vp.adc(2), None);
}

#[test]
fn test_rejected_lines_are_echoed() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();
    drain(&transport);

    deliver(&transport, b"d1\nd01g0\n");
    let results = poll_all(&transport, &mut vp);
    assert_eq!(
        outcomes(&results),
        [
            Outcome::Rejected(ErrorCode::Length),
            Outcome::Rejected(ErrorCode::Decode)
        ]
    );
    assert_eq!(drain(&transport), b"e04d1\ne05d01g0\n");
}

#[test]
fn test_overlong_line_is_dropped() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();
    drain(&transport);

    let mut long = vec![b'd'; 40];
    long.push(b'\n');
    deliver(&transport, &long);
    let results = poll_all(&transport, &mut vp);
    assert!(outcomes(&results).is_empty());
    assert!(drain(&transport).is_empty());

    // the link resyncs on the next line
    deliver(&transport, b"?0\n");
    poll_all(&transport, &mut vp);
    assert_eq!(drain(&transport), b"d000\n");
}

#[test]
fn test_peer_error_halts_everything() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();
    drain(&transport);

    let fault = PeerFault {
        code: Some(ErrorCode::Length),
    };
    deliver(&transport, b"e04d1\n?S\n");
    let results = poll_all(&transport, &mut vp);
    assert_eq!(results.last(), Some(&Err(ApiError::Halted(fault))));
    assert_eq!(vp.fault(), Some(fault));
    assert!(drain(&transport).starts_with(b"dL"));

    assert_eq!(vp.poll(), Err(ApiError::Halted(fault)));
    assert_eq!(vp.set_leds(0xff), Err(ApiError::Halted(fault)));
    assert_eq!(vp.log("still here"), Err(ApiError::Halted(fault)));
    assert!(drain(&transport).is_empty());
}

#[test]
fn test_clock_runs_from_ticks() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();

    deliver(&transport, b"dT20241231235958\n");
    poll_all(&transport, &mut vp);
    assert_eq!(vp.time(), TimeOfDay::new(2024, 12, 31, 23, 59, 58).unwrap());

    for _ in 0..2 * TICKS {
        ticks.tick();
    }
    assert_eq!(vp.time(), TimeOfDay::new(2025, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(vp.hms(), (0, 0, 0));
}

#[test]
fn test_bad_time_keeps_clock() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();
    drain(&transport);

    deliver(&transport, b"dT20241301000000\n");
    poll_all(&transport, &mut vp);
    assert_eq!(drain(&transport), b"e06dT20241301000000\n");
    assert_eq!(vp.time(), TimeOfDay::default());
}

#[test]
fn test_display_outputs() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();
    drain(&transport);

    vp.set_leds(0xa5).unwrap();
    vp.set_leds(0xa5).unwrap();
    assert_eq!(drain(&transport), b"d00a5\n");

    vp.alarmclock_display(0).unwrap();
    assert!(drain(&transport).is_empty());
    vp.alarmclock_display(0x0105_3000).unwrap();
    vp.alarmclock_display(0x0105_3000).unwrap();
    assert_eq!(drain(&transport), b"d101053000\n");

    vp.seesaw_display(0.5, -0.25, 0.5, true).unwrap();
    assert_eq!(drain(&transport), b"d261a8cf2c03e8t\n");

    vp.log("line\none").unwrap();
    vp.log_debug("dbg").unwrap();
    assert_eq!(drain(&transport), b"dLline one\ndDdbg\n");
}

#[test]
fn test_queue_statistics() {
    let transport = Link::new(MockUart::default());
    let ticks = TickCounter::new(TICKS);
    let mut vp = Peripherals::new(&transport, &ticks, config());
    vp.init().unwrap();

    // handshake is still queued
    let stats = vp.statistics();
    assert_eq!(stats.tx_min_free, 255 - 29);
    assert_eq!(stats.rx_min_free, 63);

    drain(&transport);
    assert_eq!(vp.statistics().tx_min_free, 255);
}

#[test]
fn test_embedded_io_writer() {
    use embedded_io::Write;

    let transport = Link::new(MockUart::default());
    transport.init(&UartConfig::default()).unwrap();

    let mut writer = transport.writer();
    writer.write_all(b"dLraw\n").unwrap();
    assert_eq!(drain(&transport), b"dLraw\n");
    writer.flush().unwrap();
}
