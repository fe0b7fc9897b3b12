//! Peripheral values shared with the visualizer

use vperiph_protocol::message::{MAX_ADC_CHANNELS, MAX_SCREEN};
use vperiph_protocol::{ErrorCode, SetCommand, TimeOfDay};

use super::clock::Clock;
use super::noise::{AdcNoise, ADC_MAX};
use crate::config::ADC_CHANNELS;

/// Screen selection, peripheral bitmasks, ADC registers and clock
///
/// Switches, buttons, ADC registers and time are written by the
/// dispatcher from peer messages; screen and LEDs by the firmware.
#[derive(Debug, Clone)]
pub struct DeviceState<const ADC: usize = ADC_CHANNELS> {
    screen: u8,
    leds: u8,
    switches: u8,
    buttons: u8,
    adc: [u16; ADC],
    clock: Clock,
    noise: AdcNoise,
}

impl<const ADC: usize> Default for DeviceState<ADC> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ADC: usize> DeviceState<ADC> {
    const VALID: () = assert!(ADC <= MAX_ADC_CHANNELS, "ADC items run from 'a' to 'z'");

    /// Screen 0, everything off, clock at its epoch
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self {
            screen: 0,
            leds: 0,
            switches: 0,
            buttons: 0,
            adc: [0; ADC],
            clock: Clock::default(),
            noise: AdcNoise::default(),
        }
    }

    pub fn screen(&self) -> u8 {
        self.screen
    }

    /// Select a screen
    ///
    /// Returns whether the selection changed; ids above 9 are rejected.
    pub fn set_screen(&mut self, screen: u8) -> Result<bool, ErrorCode> {
        if screen > MAX_SCREEN {
            return Err(ErrorCode::Value);
        }
        let changed = self.screen != screen;
        self.screen = screen;
        Ok(changed)
    }

    pub fn leds(&self) -> u8 {
        self.leds
    }

    /// Set the LED bitmask; returns whether it changed
    pub fn set_leds(&mut self, leds: u8) -> bool {
        let changed = self.leds != leds;
        self.leds = leds;
        changed
    }

    pub fn switches(&self) -> u8 {
        self.switches
    }

    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    /// Number of ADC channels
    pub const fn adc_channels(&self) -> usize {
        ADC
    }

    /// Raw register value of an ADC channel
    pub fn adc_register(&self, channel: usize) -> Option<u16> {
        self.adc.get(channel).copied()
    }

    /// Noisy reading of an ADC channel, clamped to `0..=ADC_MAX`
    pub fn adc_reading(&mut self, channel: usize) -> Option<u16> {
        let raw = self.adc_register(channel)?;
        Some(self.noise.apply(raw.min(ADC_MAX)))
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn time(&self) -> TimeOfDay {
        self.clock.now()
    }

    /// Apply a decoded `d` line
    pub fn apply(&mut self, command: SetCommand<'_>) -> Result<(), ErrorCode> {
        match command {
            SetCommand::Switches(mask) => self.switches = mask,
            SetCommand::Buttons(mask) => self.buttons = mask,
            SetCommand::Adc { channel, value } => {
                let register = self
                    .adc
                    .get_mut(channel as usize)
                    .ok_or(ErrorCode::UnknownItem)?;
                *register = value;
            }
            SetCommand::Time(time) => {
                self.clock.set(time);
                debug!("clock set to {}:{}:{}", time.hour, time.minute, time.second);
            }
            SetCommand::Version(_) => {}
        }
        Ok(())
    }
}
