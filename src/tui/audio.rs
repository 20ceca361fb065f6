//! Decorative lamp chime: a short descending click followed by a longer
//! descending hum, synthesized on the fly.
//!
//! Audio is strictly best-effort. Every failure (no output device, dead
//! stream) is logged at debug level and swallowed; the lamp transition
//! never waits on it.

use rodio::{OutputStream, Sink, Source};
use std::time::Duration;
use tracing::debug;

const SAMPLE_RATE: u32 = 44_100;

/// Fire-and-forget playback of the two-stage pull chime. Returns
/// immediately; playback happens off the UI thread.
pub fn play_pull_chime() {
    std::thread::spawn(|| {
        if let Err(e) = play_blocking() {
            debug!("Lamp chime unavailable: {}", e);
        }
    });
}

fn play_blocking() -> Result<(), Box<dyn std::error::Error>> {
    let (_stream, handle) = OutputStream::try_default()?;

    let click = Sink::try_new(&handle)?;
    click.append(Sweep::click());

    // The hum starts while the click tail is still ringing.
    std::thread::sleep(Duration::from_millis(100));

    let hum = Sink::try_new(&handle)?;
    hum.append(Sweep::hum());

    click.sleep_until_end();
    hum.sleep_until_end();
    Ok(())
}

/// Mono sine tone whose frequency and gain ramp from a start to an end
/// value over the duration of the sound.
struct Sweep {
    pos: u32,
    len: u32,
    freq_from: f32,
    freq_to: f32,
    gain_from: f32,
    gain_to: f32,
    exponential: bool,
    phase: f32,
}

impl Sweep {
    fn new(
        duration: Duration,
        freq_from: f32,
        freq_to: f32,
        gain_from: f32,
        gain_to: f32,
        exponential: bool,
    ) -> Self {
        Self {
            pos: 0,
            len: (duration.as_secs_f32() * SAMPLE_RATE as f32) as u32,
            freq_from,
            freq_to,
            gain_from,
            gain_to,
            exponential,
            phase: 0.0,
        }
    }

    /// The switch click: 1200 Hz falling to 400 Hz over 0.2 s.
    fn click() -> Self {
        Self::new(Duration::from_millis(200), 1200.0, 400.0, 0.3, 0.01, true)
    }

    /// The light-expansion hum: 200 Hz falling to 100 Hz over 1 s.
    fn hum() -> Self {
        Self::new(Duration::from_millis(1000), 200.0, 100.0, 0.1, 0.0, false)
    }

    fn interpolate(&self, from: f32, to: f32, t: f32) -> f32 {
        if self.exponential {
            from * (to / from).powf(t)
        } else {
            from + (to - from) * t
        }
    }
}

impl Iterator for Sweep {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.len {
            return None;
        }

        let t = self.pos as f32 / self.len as f32;
        let freq = self.interpolate(self.freq_from, self.freq_to, t);
        let gain = self.interpolate(self.gain_from, self.gain_to, t);

        self.phase += 2.0 * std::f32::consts::PI * freq / SAMPLE_RATE as f32;
        self.pos += 1;

        Some(self.phase.sin() * gain)
    }
}

impl Source for Sweep {
    fn current_frame_len(&self) -> Option<usize> {
        Some((self.len - self.pos) as usize)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(self.len as f32 / SAMPLE_RATE as f32))
    }
}
