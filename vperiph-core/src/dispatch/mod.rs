//! Line dispatcher
//!
//! Routes an assembled line by its kind tag:
//! - `d` decodes a setter and applies it to the device state
//! - `?` answers from the device state
//! - `e` from the peer is fatal and yields [`Outcome::Halt`]
//!
//! A rejected `d` or `?` line is echoed back as `e<code><line>`. Replies and
//! echoes go to `send`, so the caller decides how they reach the wire.

use vperiph_protocol::{ErrorCode, Message, Outbound, Request, SetCommand};

use crate::state::DeviceState;

/// Error report received from the peer
///
/// The link is considered desynchronised once this is seen; the device
/// must not keep talking as if nothing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerFault {
    /// Code the peer reported, if it was a known one
    pub code: Option<ErrorCode>,
}

/// Result of dispatching one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Line applied or answered
    Handled,
    /// Line rejected and echoed back with this code
    Rejected(ErrorCode),
    /// Empty, noise or unknown kind; nothing sent
    Ignored,
    /// Peer reported an error; stop
    Halt(PeerFault),
}

/// Dispatch one line against the device state
pub fn dispatch<const ADC: usize, F>(
    line: &[u8],
    state: &mut DeviceState<ADC>,
    mut send: F,
) -> Outcome
where
    F: FnMut(Outbound<'_>),
{
    let Some(message) = Message::parse(line) else {
        return Outcome::Ignored;
    };

    let result = match message {
        Message::Set { item, payload } => handle_set(item, payload, state),
        Message::Request { item, payload } => handle_request(item, payload, state, &mut send),
        Message::PeerError { code, .. } => {
            error!("peer reported error {:?}, halting", code);
            send(Outbound::Log("peer reported an error, halting"));
            return Outcome::Halt(PeerFault { code });
        }
        Message::Unknown { tag } => {
            warn!("ignoring line with unknown tag {}", tag);
            return Outcome::Ignored;
        }
    };

    match result {
        Ok(()) => Outcome::Handled,
        Err(code) => {
            warn!("rejecting line: {:?}", code);
            send(Outbound::ErrorEcho { code, line });
            Outcome::Rejected(code)
        }
    }
}

fn handle_set<const ADC: usize>(
    item: u8,
    payload: &[u8],
    state: &mut DeviceState<ADC>,
) -> Result<(), ErrorCode> {
    let command = SetCommand::parse(item, payload, state.adc_channels())?;
    state.apply(command)
}

fn handle_request<const ADC: usize, F>(
    item: u8,
    payload: &[u8],
    state: &DeviceState<ADC>,
    send: &mut F,
) -> Result<(), ErrorCode>
where
    F: FnMut(Outbound<'_>),
{
    match Request::parse(item, payload)? {
        Request::Screen => send(Outbound::Screen(state.screen())),
        Request::Leds => send(Outbound::LedsReply(state.leds())),
    }
    Ok(())
}
