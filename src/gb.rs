//! The machine driver (spec §6): the narrow surface a host exposes a ROM,
//! a joypad state and a framebuffer through. Ties the CPU, bus, PPU and
//! timer together but adds no behavior of its own beyond what the CPU's
//! `step_instruction` and the bus already provide.
//!
//! ROM file loading, windowing, audio, the serial link and bank-switching
//! cartridges are explicitly out of scope here — a host driver owns those.

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::error::Error;
use crate::pad::JoypadState;
use crate::ppu::FRAME_BUFFER_SIZE;
use crate::rom::Cartridge;

/// Runtime-tunable knobs for the emulator driver, mirroring the teacher's
/// `GameBoyConfig` at a fraction of the size — this core only ever targets
/// DMG, so the mode/speed switches the teacher needs for CGB support have no
/// counterpart here.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Enables the `pedantic` feature's address-range invariant checks at
    /// runtime in addition to compile time.
    pub pedantic: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { pedantic: false }
    }
}

pub struct GameBoy {
    cpu: Cpu,
    config: Config,
}

impl GameBoy {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            cpu: Cpu::new(Bus::new()),
            config,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Parses `data` as a ROM-only cartridge image and loads it onto the
    /// bus, then brings the CPU up to the post-boot register state (spec
    /// §6). Leaves prior CPU/PPU/timer state untouched on failure.
    pub fn load_cartridge(&mut self, data: &[u8]) -> Result<(), Error> {
        let cartridge = Cartridge::from_bytes(data)?;
        self.cpu.bus_mut().load_cartridge(cartridge);
        self.cpu.boot();
        Ok(())
    }

    /// Runs exactly one CPU instruction (or one halted/interrupt-dispatch
    /// tick) and returns the number of m-cycles it took.
    pub fn step_instruction(&mut self) -> Result<u8, Error> {
        self.cpu.step_instruction()
    }

    /// True exactly once per frame, on the tick where the PPU entered
    /// V-blank; cleared by this call.
    pub fn frame_ready(&mut self) -> bool {
        self.cpu.bus_mut().take_frame_ready()
    }

    pub fn framebuffer(&self) -> &[u8; FRAME_BUFFER_SIZE] {
        self.cpu.bus().ppu().frame_buffer()
    }

    pub fn set_joypad(&mut self, state: JoypadState) {
        self.cpu.bus_mut().set_joypad(state);
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}
