/// Sound engine: procedural chiptune blips via rodio.
///
/// Buffers are synthesized once at startup and played fire-and-forget.
/// Without the "sound" feature the stub `SoundEngine` does nothing.

use crate::domain::ore::OreColor;
use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::domain::ore::OreColor;

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_mine: [Arc<Vec<u8>>; 3],
        sfx_build: Arc<Vec<u8>>,
        sfx_denied: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::info!("audio output unavailable: {e}");
                    return None;
                }
            };

            let sfx_mine = OreColor::ALL.map(|c| Arc::new(make_wav(&gen_mine(c.value()))));
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_mine,
                sfx_build: Arc::new(make_wav(&gen_build())),
                sfx_denied: Arc::new(make_wav(&gen_denied())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_mine(&self, color: OreColor) {
            let idx = OreColor::ALL.iter().position(|c| *c == color).unwrap_or(0);
            self.play(&self.sfx_mine[idx]);
        }
        pub fn play_build(&self) { self.play(&self.sfx_build); }
        pub fn play_denied(&self) { self.play(&self.sfx_denied); }
    }

    // ── Waveform generators: mono f32 samples ──

    fn tone(freq: f32, duration: f32, volume: f32, out: &mut Vec<f32>) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32).powf(0.5);
            // sine + 3rd harmonic for a square-ish retro edge
            let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
            out.push(wave * env * volume);
        }
    }

    /// Mine: rising arpeggio, more notes and higher pitch for richer ore.
    fn gen_mine(value: u32) -> Vec<f32> {
        let base = 660.0 + value as f32 * 40.0;
        let steps = match value { 0..=1 => 1, 2..=5 => 2, _ => 3 };
        let mut samples = Vec::new();
        for s in 0..steps {
            tone(base * (1.0 + 0.25 * s as f32), 0.05, 0.25, &mut samples);
        }
        samples
    }

    /// Build: two low thuds.
    fn gen_build() -> Vec<f32> {
        let mut samples = Vec::new();
        tone(220.0, 0.06, 0.35, &mut samples);
        samples.extend(std::iter::repeat(0.0).take((SAMPLE_RATE as f32 * 0.03) as usize));
        tone(165.0, 0.08, 0.35, &mut samples);
        samples
    }

    /// Denied: short falling buzz.
    fn gen_denied() -> Vec<f32> {
        let duration = 0.14;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 180.0 - p * 60.0;
                let t = i as f32 / SAMPLE_RATE as f32;
                let square = if (t * freq * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                square * (1.0 - p) * 0.15
            })
            .collect()
    }

    // ── WAV encoder: 16-bit PCM mono ──

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let channels: u16 = 1;
        let bits: u16 = 16;
        let block_align = channels * bits / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

}

// ── Public API: no-ops when the sound feature is off ──

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_mine(&self, _color: OreColor) {}
    pub fn play_build(&self) {}
    pub fn play_denied(&self) {}
}

/// Which effect an event plays.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Mine(OreColor),
    Build,
    Denied,
}

pub fn cue_for(event: &GameEvent) -> Option<Cue> {
    match event {
        GameEvent::OreMined { color, .. } => Some(Cue::Mine(*color)),
        GameEvent::TilePlaced { .. } => Some(Cue::Build),
        GameEvent::NotEnoughPoints { .. } => Some(Cue::Denied),
        GameEvent::NothingToMine | GameEvent::HomeRequested => None,
    }
}

/// Play whatever the events call for.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for cue in events.iter().filter_map(cue_for) {
        match cue {
            Cue::Mine(color) => sfx.play_mine(color),
            Cue::Build => sfx.play_build(),
            Cue::Denied => sfx.play_denied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_map_to_effects() {
        let mined = GameEvent::OreMined { color: OreColor::Purple, value: 10, x: 0, y: 0 };
        assert_eq!(cue_for(&mined), Some(Cue::Mine(OreColor::Purple)));
        assert_eq!(cue_for(&GameEvent::TilePlaced { x: 3, y: 4 }), Some(Cue::Build));
        assert_eq!(cue_for(&GameEvent::NotEnoughPoints { have: 2, need: 5 }), Some(Cue::Denied));
        assert_eq!(cue_for(&GameEvent::NothingToMine), None);
        assert_eq!(cue_for(&GameEvent::HomeRequested), None);
    }

    #[test]
    fn mine_cue_keeps_ore_colour() {
        for color in OreColor::ALL {
            let ev = GameEvent::OreMined { color, value: color.value(), x: 0, y: 0 };
            assert_eq!(cue_for(&ev), Some(Cue::Mine(color)));
        }
    }

    #[test]
    fn no_engine_is_silent() {
        play_events(None, &[GameEvent::TilePlaced { x: 0, y: 0 }]);
    }
}
