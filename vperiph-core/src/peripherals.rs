//! Firmware-facing API
//!
//! [`VirtualPeripherals`] ties the transport, line assembler, dispatcher
//! and device state together. The firmware calls [`VirtualPeripherals::poll`]
//! once per main-loop iteration and uses the setters and getters in
//! between; the UART and timer interrupts only touch the shared
//! [`Transport`] and [`TickCounter`].
//!
//! ```text
//!   UART IRQ ──► Transport ──► poll() ──► LineAssembler ──► dispatch()
//!                    ▲                                          │
//!                    └──────────── replies / echoes ◄───────────┘
//!   timer IRQ ──► TickCounter ──► poll() ──► Clock
//! ```

use vperiph_hal::uart::SerialDevice;
use vperiph_protocol::{
    LineAssembler, LineError, Outbound, Query, SeesawFrame, TimeOfDay, MAX_LINE_LEN,
};

use crate::config::{Config, ADC_CHANNELS, RX_BUFFER_LEN, TX_BUFFER_LEN};
use crate::dispatch::{dispatch, Outcome, PeerFault};
use crate::link::{QueueStatistics, Transport, TransportError};
use crate::state::{DeviceState, TickCounter};

/// Errors returned by the firmware-facing API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApiError {
    /// `init` has not completed
    NotInitialized,
    /// Screen id above 9
    InvalidScreen,
    /// The peer reported an error earlier; the link is dead
    Halted(PeerFault),
    /// Transport could not be brought up
    Transport(TransportError),
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Transport(e)
    }
}

/// Virtual peripherals relayed to the visualizer
pub struct VirtualPeripherals<
    'a,
    D,
    const RX: usize = RX_BUFFER_LEN,
    const TX: usize = TX_BUFFER_LEN,
    const ADC: usize = ADC_CHANNELS,
> {
    transport: &'a Transport<D, RX, TX>,
    ticks: &'a TickCounter,
    config: Config,
    assembler: LineAssembler,
    state: DeviceState<ADC>,
    /// Last alarm clock value sent
    alarm_clock: u32,
    initialized: bool,
    fault: Option<PeerFault>,
}

impl<'a, D, const RX: usize, const TX: usize, const ADC: usize> VirtualPeripherals<'a, D, RX, TX, ADC>
where
    D: SerialDevice,
{
    pub fn new(transport: &'a Transport<D, RX, TX>, ticks: &'a TickCounter, config: Config) -> Self {
        Self {
            transport,
            ticks,
            config,
            assembler: LineAssembler::new(),
            state: DeviceState::new(),
            alarm_clock: 0,
            initialized: false,
            fault: None,
        }
    }

    /// Bring up the link and ask the visualizer for its state
    ///
    /// Announces the current screen, then requests the time, sends the LED
    /// state and requests switches, buttons and every ADC channel.
    pub fn init(&mut self) -> Result<(), ApiError> {
        self.transport.init(&self.config.uart())?;
        if self.ticks.ticks_per_second() != self.config.ticks_per_second.max(1) {
            warn!(
                "tick counter runs at {} Hz, config says {} Hz",
                self.ticks.ticks_per_second(),
                self.config.ticks_per_second
            );
        }
        self.initialized = true;

        self.send(Outbound::Screen(self.state.screen()));
        self.send(Outbound::Query(Query::Time));
        self.send(Outbound::Leds(self.state.leds()));
        self.send(Outbound::Query(Query::Switches));
        self.send(Outbound::Query(Query::Buttons));
        for channel in 0..ADC {
            self.send(Outbound::Query(Query::Adc(channel as u8)));
        }

        info!("virtual peripherals up, {} ADC channels", ADC);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Fault latched from a peer error report
    pub fn fault(&self) -> Option<PeerFault> {
        self.fault
    }

    fn ready(&self) -> Result<(), ApiError> {
        if let Some(fault) = self.fault {
            return Err(ApiError::Halted(fault));
        }
        if !self.initialized {
            return Err(ApiError::NotInitialized);
        }
        Ok(())
    }

    fn send(&self, message: Outbound<'_>) {
        let transport = self.transport;
        message.write_to(|b| transport.write(b));
    }

    fn sync_clock(&mut self) {
        let elapsed = self.ticks.elapsed_seconds();
        self.state.clock_mut().sync(elapsed);
    }

    /// Process pending input
    ///
    /// Applies elapsed seconds to the clock, then takes at most one byte
    /// from the transport. Returns the dispatch outcome when that byte
    /// completed a line.
    pub fn poll(&mut self) -> Result<Option<Outcome>, ApiError> {
        self.ready()?;
        self.sync_clock();

        let Some(byte) = self.transport.read() else {
            return Ok(None);
        };

        let line = match self.assembler.feed(byte) {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(None),
            Err(LineError::Overflow) => {
                warn!("line longer than {} bytes, discarding", MAX_LINE_LEN);
                return Ok(None);
            }
        };

        let transport = self.transport;
        let outcome = dispatch(&line, &mut self.state, |message| {
            message.write_to(|b| transport.write(b))
        });

        if let Outcome::Halt(fault) = outcome {
            self.fault = Some(fault);
            return Err(ApiError::Halted(fault));
        }
        Ok(Some(outcome))
    }

    /// Set the LEDs; sends only when the value changed
    pub fn set_leds(&mut self, leds: u8) -> Result<(), ApiError> {
        self.ready()?;
        if self.state.set_leds(leds) {
            self.send(Outbound::Leds(leds));
        }
        Ok(())
    }

    /// Select a screen (0-9); announces only when the selection changed
    pub fn set_screen(&mut self, screen: u8) -> Result<(), ApiError> {
        self.ready()?;
        let changed = self
            .state
            .set_screen(screen)
            .map_err(|_| ApiError::InvalidScreen)?;
        if changed {
            info!("screen {}", screen);
            self.send(Outbound::Screen(screen));
        }
        Ok(())
    }

    /// Show a value on the alarm clock screen; sends only on change
    pub fn alarmclock_display(&mut self, value: u32) -> Result<(), ApiError> {
        self.ready()?;
        if value != self.alarm_clock {
            self.alarm_clock = value;
            self.send(Outbound::AlarmClock(value));
        }
        Ok(())
    }

    /// Update the seesaw screen
    ///
    /// `reference` and `position` in metres, `angle` in radians.
    pub fn seesaw_display(
        &mut self,
        reference: f32,
        position: f32,
        angle: f32,
        boing: bool,
    ) -> Result<(), ApiError> {
        self.ready()?;
        let frame = SeesawFrame::from_physical(reference, position, angle, boing);
        self.send(Outbound::Seesaw(frame));
        Ok(())
    }

    /// Send a log line to the visualizer
    pub fn log(&mut self, text: &str) -> Result<(), ApiError> {
        self.ready()?;
        self.send(Outbound::Log(text));
        Ok(())
    }

    /// Send a debug log line to the visualizer
    pub fn log_debug(&mut self, text: &str) -> Result<(), ApiError> {
        self.ready()?;
        self.send(Outbound::Debug(text));
        Ok(())
    }

    pub fn switches(&self) -> u8 {
        self.state.switches()
    }

    pub fn buttons(&self) -> u8 {
        self.state.buttons()
    }

    /// Noisy ADC reading; `None` for an unknown channel
    pub fn adc(&mut self, channel: usize) -> Option<u16> {
        self.state.adc_reading(channel)
    }

    pub fn screen(&self) -> u8 {
        self.state.screen()
    }

    pub fn leds(&self) -> u8 {
        self.state.leds()
    }

    /// Current time of day, including seconds not yet polled
    pub fn time(&mut self) -> TimeOfDay {
        self.sync_clock();
        self.state.time()
    }

    /// Current hours, minutes and seconds
    pub fn hms(&mut self) -> (u8, u8, u8) {
        self.time().hms()
    }

    pub fn state(&self) -> &DeviceState<ADC> {
        &self.state
    }

    pub fn ticks(&self) -> &TickCounter {
        self.ticks
    }

    /// Ring buffer low-water marks since the previous call
    pub fn statistics(&self) -> QueueStatistics {
        self.transport.statistics()
    }
}
