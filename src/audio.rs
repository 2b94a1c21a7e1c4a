//! Sound collaborator.  The terminal can only ring its bell, so the hit sound
//! is a BEL byte and "music" is a flag the menu and HUD display.

use std::io::Write;

use crate::error::{GameError, Result};

pub trait Audio {
    fn play_hit(&mut self) -> Result<()>;
    fn set_music(&mut self, playing: bool) -> Result<()>;
    fn music_playing(&self) -> bool;
}

/// Plays nothing.  Used when sound is off or the terminal can't take a bell.
#[derive(Debug, Default)]
pub struct Silent {
    music: bool,
}

impl Audio for Silent {
    fn play_hit(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_music(&mut self, playing: bool) -> Result<()> {
        self.music = playing;
        Ok(())
    }

    fn music_playing(&self) -> bool {
        self.music
    }
}

/// Rings the terminal bell on every hit.
pub struct TerminalBell<W: Write> {
    out: W,
    music: bool,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out, music: false }
    }
}

impl<W: Write> Audio for TerminalBell<W> {
    fn play_hit(&mut self) -> Result<()> {
        self.out
            .write_all(b"\x07")
            .and_then(|_| self.out.flush())
            .map_err(|e| GameError::Audio(format!("bell: {e}")))
    }

    fn set_music(&mut self, playing: bool) -> Result<()> {
        if self.music != playing {
            log::debug!("Music {}", if playing { "started" } else { "paused" });
        }
        self.music = playing;
        Ok(())
    }

    fn music_playing(&self) -> bool {
        self.music
    }
}
