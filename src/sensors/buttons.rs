//! Bank of digital buttons sampled as raw levels.
//!
//! Each channel keeps two slots: the level seen on the latest read and the
//! one before it.  That is enough for a caller to spot edges; there is no
//! debounce and no timestamping here.

use embedded_hal::digital::InputPin;
use log::{debug, info};

use super::value::{NamedValues, Values, indexed_name, values_of};
use super::{Sensor, SensorKind};
use crate::error::{Error, Result, gpio_error};

/// Channels per bank (`b0..b15` plus `_b0.._b15` fills the named view).
pub const MAX_BUTTONS: usize = 16;

pub struct ButtonBank<P> {
    pins: heapless::Vec<P, MAX_BUTTONS>,
    states: heapless::Vec<bool, MAX_BUTTONS>,
    previous: heapless::Vec<bool, MAX_BUTTONS>,
    changed: bool,
}

impl<P: InputPin> ButtonBank<P> {
    /// Take ownership of `pins` (in channel order) and sample the baseline.
    pub fn new<I>(pins: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
    {
        let mut bank: heapless::Vec<P, MAX_BUTTONS> = heapless::Vec::new();
        for pin in pins {
            if bank.push(pin).is_err() {
                return Err(Error::Config("more than 16 button pins"));
            }
        }

        let mut states: heapless::Vec<bool, MAX_BUTTONS> = heapless::Vec::new();
        for pin in &mut bank {
            let _ = states.push(pin.is_high().map_err(gpio_error)?);
        }
        info!("Buttons: {} channel(s), baseline {:?}", bank.len(), states.as_slice());
        Ok(Self {
            pins: bank,
            previous: states.clone(),
            states,
            changed: false,
        })
    }

    /// True if any channel differed between the last two reads.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn state(&self, channel: usize) -> Option<bool> {
        self.states.get(channel).copied()
    }

    pub fn previous_state(&self, channel: usize) -> Option<bool> {
        self.previous.get(channel).copied()
    }

    /// Low → high between the last two reads.
    pub fn rising(&self, channel: usize) -> bool {
        matches!(
            (self.previous_state(channel), self.state(channel)),
            (Some(false), Some(true))
        )
    }

    /// High → low between the last two reads.
    pub fn falling(&self, channel: usize) -> bool {
        matches!(
            (self.previous_state(channel), self.state(channel)),
            (Some(true), Some(false))
        )
    }
}

impl<P: InputPin> Sensor for ButtonBank<P> {
    fn kind(&self) -> SensorKind {
        SensorKind::Buttons
    }

    fn read(&mut self) -> Result<Values> {
        // Sample all channels first so a GPIO error leaves both slots as they were.
        let mut sampled: heapless::Vec<bool, MAX_BUTTONS> = heapless::Vec::new();
        for pin in &mut self.pins {
            let _ = sampled.push(pin.is_high().map_err(gpio_error)?);
        }

        self.previous = core::mem::replace(&mut self.states, sampled);
        self.changed = self
            .states
            .iter()
            .zip(self.previous.iter())
            .any(|(now, before)| now != before);
        if self.changed {
            debug!(
                "Buttons: {:?} -> {:?}",
                self.previous.as_slice(),
                self.states.as_slice()
            );
        }
        Ok(self.values())
    }

    fn values(&self) -> Values {
        values_of(self.states.iter().map(|s| Some(*s)))
    }

    fn values_dict(&self) -> NamedValues {
        let mut named = NamedValues::new();
        for (i, (now, before)) in self.states.iter().zip(self.previous.iter()).enumerate() {
            named.insert(&indexed_name("b", i), Some((*now).into()));
            named.insert(&indexed_name("_b", i), Some((*before).into()));
        }
        named
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim::SimPin;
    use crate::sensors::value::Value;

    fn bank(levels: &[bool]) -> (ButtonBank<SimPin>, Vec<SimPin>) {
        let pins: Vec<SimPin> = levels.iter().map(|l| SimPin::new(*l)).collect();
        let b = ButtonBank::new(pins.iter().cloned()).unwrap();
        (b, pins)
    }

    #[test]
    fn rejects_oversized_list() {
        let many: Vec<SimPin> = (0..17).map(|_| SimPin::new(false)).collect();
        assert!(matches!(ButtonBank::new(many), Err(Error::Config(_))));
    }

    #[test]
    fn empty_bank_reads_nothing() {
        let mut b = ButtonBank::<SimPin>::new(Vec::new()).unwrap();
        assert!(b.is_empty());
        assert!(b.read().unwrap().is_empty());
        assert!(b.values().is_empty());
        assert!(b.values_dict().is_empty());
        assert!(!b.changed());
    }

    #[test]
    fn baseline_fills_both_slots() {
        let (b, _pins) = bank(&[true, false]);
        assert!(!b.changed());
        let dict = b.values_dict();
        let names: Vec<&str> = dict.names().collect();
        assert_eq!(names, ["b0", "_b0", "b1", "_b1"]);
        assert_eq!(dict.get("b0"), Some(Some(Value::Bool(true))));
        assert_eq!(dict.get("_b0"), Some(Some(Value::Bool(true))));
        assert_eq!(dict.get("_b1"), Some(Some(Value::Bool(false))));
    }

    #[test]
    fn single_pin_change_sets_flag_and_keeps_prior() {
        let (mut b, pins) = bank(&[false, false, false]);
        b.read().unwrap();
        pins[1].set_level(true);
        let v = b.read().unwrap();
        assert!(b.changed());
        assert_eq!(v[1], Some(Value::Bool(true)));
        assert!(b.rising(1));
        assert!(!b.falling(1));
        let dict = b.values_dict();
        assert_eq!(dict.get("b1"), Some(Some(Value::Bool(true))));
        assert_eq!(dict.get("_b1"), Some(Some(Value::Bool(false))));
        assert_eq!(dict.get("b0"), Some(Some(Value::Bool(false))));
        assert_eq!(dict.get("_b0"), Some(Some(Value::Bool(false))));
    }

    #[test]
    fn steady_pins_clear_flag() {
        let (mut b, pins) = bank(&[true]);
        pins[0].set_level(false);
        b.read().unwrap();
        assert!(b.changed());
        assert!(b.falling(0));
        b.read().unwrap();
        assert!(!b.changed());
    }

    #[test]
    fn gpio_error_leaves_slots_untouched() {
        let (mut b, pins) = bank(&[false, true]);
        pins[0].set_level(true);
        pins[1].fail(true);
        assert!(b.read().is_err());
        assert_eq!(b.state(0), Some(false));
        assert_eq!(b.previous_state(1), Some(true));
    }
}
