//! Joypad I/O register (0xFF00). Input polling and presentation are host
//! concerns (spec §1); this module only keeps the register slot addressable
//! and gives the host a write-only state sink ([`Pad::set_state`]).

#[derive(Clone, Copy, PartialEq, Eq)]
enum PadSelection {
    Action,
    Direction,
}

/// Flat snapshot of the eight buttons, written by the host driver through
/// [`Pad::set_state`]. Never read back by the core itself.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct JoypadState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub start: bool,
    pub select: bool,
    pub a: bool,
    pub b: bool,
}

pub struct Pad {
    state: JoypadState,
    selection: PadSelection,
}

impl Pad {
    pub fn new() -> Self {
        Self {
            state: JoypadState::default(),
            selection: PadSelection::Action,
        }
    }

    pub fn reset(&mut self) {
        self.state = JoypadState::default();
        self.selection = PadSelection::Action;
    }

    pub fn read(&self, addr: u16) -> u8 {
        debug_assert_eq!(addr, crate::consts::JOYP_ADDR);
        let buttons = match self.selection {
            PadSelection::Action => {
                (if self.state.a { 0x00 } else { 0x01 })
                    | if self.state.b { 0x00 } else { 0x02 }
                    | if self.state.select { 0x00 } else { 0x04 }
                    | if self.state.start { 0x00 } else { 0x08 }
            }
            PadSelection::Direction => {
                (if self.state.right { 0x00 } else { 0x01 })
                    | if self.state.left { 0x00 } else { 0x02 }
                    | if self.state.up { 0x00 } else { 0x04 }
                    | if self.state.down { 0x00 } else { 0x08 }
            }
        };
        let selection = match self.selection {
            PadSelection::Direction => 0x10,
            PadSelection::Action => 0x20,
        };
        buttons | selection | 0xc0
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        debug_assert_eq!(addr, crate::consts::JOYP_ADDR);
        self.selection = if value & 0x10 == 0x00 {
            PadSelection::Direction
        } else {
            PadSelection::Action
        };
    }

    /// Overwrites the button/direction state. This is the sink spec §6
    /// names (`set_joypad`); the core never generates a joypad interrupt
    /// from it since polling the transition edges is a host concern.
    pub fn set_state(&mut self, state: JoypadState) {
        self.state = state;
    }

    pub fn state(&self) -> JoypadState {
        self.state
    }
}

impl Default for Pad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_selection_reads_buttons() {
        let mut pad = Pad::new();
        pad.write(0xff00, 0x10); // select action row
        pad.set_state(JoypadState {
            a: true,
            ..Default::default()
        });
        assert_eq!(pad.read(0xff00) & 0x0f, 0x0e);
    }

    #[test]
    fn direction_selection_reads_directions() {
        let mut pad = Pad::new();
        pad.write(0xff00, 0x20); // select direction row
        pad.set_state(JoypadState {
            up: true,
            ..Default::default()
        });
        assert_eq!(pad.read(0xff00) & 0x0f, 0x0b);
    }
}
