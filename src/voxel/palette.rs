//! 39-slot RGB palette
//!
//! Color index `i` (1..=39) resolves to slot `i - 1`. Indices 1..=7 are
//! system colors, 8..=39 user colors. An RGB value of 0 marks an
//! unassigned slot, skipped when scrolling through the palette.

use std::path::Path;

use crate::core::types::Result;
use crate::core::Error;

/// Number of palette slots
pub const PALETTE_SLOTS: usize = 39;

/// Highest system color index
pub const LAST_SYSTEM_INDEX: u8 = 7;

/// First user color index
pub const FIRST_USER_INDEX: u8 = LAST_SYSTEM_INDEX + 1;

/// Highest user color index
pub const LAST_USER_INDEX: u8 = PALETTE_SLOTS as u8;

/// Maximum entries read from a palette file
pub const MAX_PALETTE_FILE_ENTRIES: usize = 32;

const DEFAULT_SYSTEM: [u32; 7] = [
    0xFFFFFF, 0xFF0000, 0x800000, 0x00FF00, 0x008000, 0x0000FF, 0x000080,
];

/// System colors applied when a palette file is loaded
const FILE_SYSTEM: [u32; 7] = [
    0xFAFAFA, 0xFF0000, 0x400000, 0x00FF00, 0x004000, 0x0000FF, 0x000040,
];

/// Resurrect 32
const DEFAULT_USER: [u32; 32] = [
    0xFFFFFF, 0xFB6B1D, 0xE83B3B, 0x831C5D, 0xC32454, 0xF04F78, 0xF68181, 0xFCA790,
    0xE3C896, 0xAB947A, 0x966C6C, 0x625565, 0x3E3546, 0x0B5E65, 0x0B8A8F, 0x1EBC73,
    0x91DB69, 0xFBFF86, 0xFBB954, 0xCD683D, 0x9E4539, 0x7A3045, 0x6B3E75, 0x905EA9,
    0xA884F3, 0xEAADED, 0x8FD3FF, 0x4D9BE6, 0x4D65B4, 0x484A77, 0x30E1B9, 0x8FF8E2,
];

/// RGB table for color indices 1..=39
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    slots: [u32; PALETTE_SLOTS],
}

impl Palette {
    /// Palette with every slot unassigned
    pub fn empty() -> Self {
        Self { slots: [0; PALETTE_SLOTS] }
    }

    /// Build from raw slots as stored in a snapshot
    pub fn from_slots(slots: [u32; PALETTE_SLOTS]) -> Self {
        Self { slots }
    }

    /// Raw slots
    pub fn slots(&self) -> &[u32; PALETTE_SLOTS] {
        &self.slots
    }

    /// RGB for a color index, 0 for index 0 or anything past the table
    pub fn rgb(&self, index: u8) -> u32 {
        match index {
            1..=LAST_USER_INDEX => self.slots[index as usize - 1],
            _ => 0,
        }
    }

    /// RGB for a color index split into `[r, g, b]`
    pub fn rgb_bytes(&self, index: u8) -> [u8; 3] {
        let rgb = self.rgb(index);
        [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]
    }

    /// RGB for a color index as normalized floats
    pub fn rgb_f32(&self, index: u8) -> [f32; 3] {
        let [r, g, b] = self.rgb_bytes(index);
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    /// Set the RGB of a color index; ignored for index 0 or out of range
    pub fn set(&mut self, index: u8, rgb: u32) {
        if (1..=LAST_USER_INDEX).contains(&index) {
            self.slots[index as usize - 1] = rgb & 0xFFFFFF;
        }
    }

    pub fn is_assigned(&self, index: u8) -> bool {
        self.rgb(index) != 0
    }

    /// True for the assignable slots 8..=39
    pub fn is_user(index: u8) -> bool {
        (FIRST_USER_INDEX..=LAST_USER_INDEX).contains(&index)
    }

    /// Next assigned user index after `current`, wrapping to 8.
    pub fn next_assigned(&self, current: u8) -> u8 {
        let start = current.saturating_add(1).max(FIRST_USER_INDEX);
        (start..=LAST_USER_INDEX)
            .find(|&i| self.is_assigned(i))
            .unwrap_or(FIRST_USER_INDEX)
    }

    /// Previous assigned user index before `current`, wrapping to the
    /// highest assigned user index (8 if none is assigned).
    pub fn prev_assigned(&self, current: u8) -> u8 {
        let end = current.min(LAST_USER_INDEX + 1);
        (FIRST_USER_INDEX..end)
            .rev()
            .find(|&i| self.is_assigned(i))
            .or_else(|| (FIRST_USER_INDEX..=LAST_USER_INDEX).rev().find(|&i| self.is_assigned(i)))
            .unwrap_or(FIRST_USER_INDEX)
    }

    /// Step `current` forward (`delta > 0`) or backward (`delta < 0`) one
    /// assigned slot. Zero returns `current`.
    pub fn step(&self, current: u8, delta: i32) -> u8 {
        match delta.signum() {
            1 => self.next_assigned(current),
            -1 => self.prev_assigned(current),
            _ => current,
        }
    }

    /// Parse palette file text.
    ///
    /// One color per line as `#RRGGBB` or `RRGGBB`; unparseable lines are
    /// skipped and at most 32 colors are read. The system slots are reset
    /// to the palette-file system colors and unlisted user slots cleared.
    pub fn parse(text: &str) -> (Self, usize) {
        let mut palette = Self::empty();
        palette.slots[..DEFAULT_SYSTEM.len()].copy_from_slice(&FILE_SYSTEM);

        let colors = text
            .lines()
            .filter_map(parse_hex_line)
            .take(MAX_PALETTE_FILE_ENTRIES);

        let mut count = 0;
        for (i, rgb) in colors.enumerate() {
            palette.set(FIRST_USER_INDEX + i as u8, rgb);
            count += 1;
        }
        (palette, count)
    }

    /// Load a palette file from disk
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Palette(format!("{}: {}", path.display(), e)))?;
        let (palette, count) = Self::parse(&text);
        log::debug!("Read {} colors from {}", count, path.display());
        Ok(palette)
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut slots = [0u32; PALETTE_SLOTS];
        slots[..DEFAULT_SYSTEM.len()].copy_from_slice(&DEFAULT_SYSTEM);
        slots[DEFAULT_SYSTEM.len()..].copy_from_slice(&DEFAULT_USER);
        Self { slots }
    }
}

fn parse_hex_line(line: &str) -> Option<u32> {
    let line = line.trim();
    let hex = line.strip_prefix('#').unwrap_or(line);
    let end = hex
        .char_indices()
        .find(|(_, c)| !c.is_ascii_hexdigit())
        .map_or(hex.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }
    u32::from_str_radix(&hex[..end], 16).ok().map(|v| v & 0xFFFFFF)
}
