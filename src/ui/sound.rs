/// Sound engine: procedural synth sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget via rodio's Sink; a missing audio
/// device yields None and the game runs silent. Build without the
/// "sound" feature for a stub engine that does nothing.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Arc<Vec<u8>>,
        sfx_land: Arc<Vec<u8>>,
        sfx_pad: Arc<Vec<u8>>,
        sfx_flip: Arc<Vec<u8>>,
        sfx_zoom: Arc<Vec<u8>>,
        sfx_die: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump: Arc::new(encode_wav(&gen_jump())),
                sfx_land: Arc::new(encode_wav(&gen_land())),
                sfx_pad: Arc::new(encode_wav(&gen_pad())),
                sfx_flip: Arc::new(encode_wav(&gen_flip())),
                sfx_zoom: Arc::new(encode_wav(&gen_zoom())),
                sfx_die: Arc::new(encode_wav(&gen_die())),
                sfx_clear: Arc::new(encode_wav(&gen_clear())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_land(&self) { self.play(&self.sfx_land); }
        pub fn play_pad(&self) { self.play(&self.sfx_pad); }
        pub fn play_flip(&self) { self.play(&self.sfx_flip); }
        pub fn play_zoom(&self) { self.play(&self.sfx_zoom); }
        pub fn play_die(&self) { self.play(&self.sfx_die); }
        pub fn play_clear(&self) { self.play(&self.sfx_clear); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Sine sweep from `f0` to `f1` over `duration` seconds.
    fn sweep(f0: f32, f1: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = f0 + (f1 - f0) * t;
                phase += freq / SAMPLE_RATE as f32;
                let env = 1.0 - t;
                (phase * TAU).sin() * env * volume
            })
            .collect()
    }

    /// A short run of square-ish notes.
    fn arpeggio(notes: &[f32], note_dur: f32, volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.4;
                // Sine + 3rd harmonic for a retro edge
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Jump: quick upward chirp
    fn gen_jump() -> Vec<f32> {
        sweep(400.0, 700.0, 0.07, 0.2)
    }

    /// Landing: dull short thud
    fn gen_land() -> Vec<f32> {
        sweep(180.0, 120.0, 0.05, 0.25)
    }

    /// Launch pad: springy two-stage rise
    fn gen_pad() -> Vec<f32> {
        let mut s = sweep(300.0, 900.0, 0.1, 0.25);
        s.extend(sweep(900.0, 1200.0, 0.05, 0.15));
        s
    }

    /// Gravity flip: long falling-then-rising whoosh
    fn gen_flip() -> Vec<f32> {
        let mut s = sweep(800.0, 300.0, 0.1, 0.2);
        s.extend(sweep(300.0, 800.0, 0.1, 0.2));
        s
    }

    /// Speed portal: fast buzzy rise
    fn gen_zoom() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.12) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 500.0 + 1000.0 * t;
                phase += freq / SAMPLE_RATE as f32;
                let env = 1.0 - t * 0.6;
                // Square wave
                let wave = if (phase * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                wave * env * 0.12
            })
            .collect()
    }

    /// Death: sad descending tones
    fn gen_die() -> Vec<f32> {
        arpeggio(&[440.0, 370.0, 311.0, 261.0], 0.11, 0.3)
    }

    /// Level complete: victory fanfare with a sustained final note
    fn gen_clear() -> Vec<f32> {
        let mut samples = arpeggio(&[523.0, 659.0, 784.0, 1047.0], 0.1, 0.3);
        let n = (SAMPLE_RATE as f32 * 0.3) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - i as f32 / n as f32;
            samples.push((t * 1047.0 * TAU).sin() * env * 0.3);
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn encode_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_jump(&self) {}
    pub fn play_land(&self) {}
    pub fn play_pad(&self) {}
    pub fn play_flip(&self) {}
    pub fn play_zoom(&self) {}
    pub fn play_die(&self) {}
    pub fn play_clear(&self) {}
}
