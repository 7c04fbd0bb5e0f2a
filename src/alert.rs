//! Two-tone attention alert.
//!
//! A half-second sine tone that sweeps up from A4 to A5 in the first 100 ms
//! while its gain decays. Samples are rendered up front and streamed to the
//! default output device on a short-lived thread.

use anyhow::Result;
use std::f32::consts::TAU;

pub const ALERT_DURATION_SECS: f32 = 0.5;
pub const ALERT_START_HZ: f32 = 440.0;
pub const ALERT_END_HZ: f32 = 880.0;
pub const ALERT_SWEEP_SECS: f32 = 0.1;
pub const ALERT_START_GAIN: f32 = 0.5;
pub const ALERT_END_GAIN: f32 = 0.01;

/// Instantaneous frequency `t` seconds into the alert (exponential ramp, then hold).
pub fn frequency_at(t: f32) -> f32 {
    if t >= ALERT_SWEEP_SECS {
        return ALERT_END_HZ;
    }
    let progress = (t / ALERT_SWEEP_SECS).max(0.0);
    ALERT_START_HZ * (ALERT_END_HZ / ALERT_START_HZ).powf(progress)
}

/// Gain `t` seconds into the alert (exponential decay over the full duration).
pub fn gain_at(t: f32) -> f32 {
    let progress = (t / ALERT_DURATION_SECS).clamp(0.0, 1.0);
    ALERT_START_GAIN * (ALERT_END_GAIN / ALERT_START_GAIN).powf(progress)
}

/// Mono samples for the whole alert at `sample_rate`.
pub fn render_alert(sample_rate: u32) -> Vec<f32> {
    if sample_rate == 0 {
        return Vec::new();
    }
    let rate = sample_rate as f32;
    let total = (ALERT_DURATION_SECS * rate).round() as usize;
    let mut phase = 0.0f32;
    let mut samples = Vec::with_capacity(total);
    for n in 0..total {
        let t = n as f32 / rate;
        samples.push(phase.sin() * gain_at(t));
        phase = (phase + TAU * frequency_at(t) / rate) % TAU;
    }
    samples
}

#[cfg(feature = "alert-audio")]
mod output {
    use super::{render_alert, ALERT_DURATION_SECS};
    use crate::log_debug;
    use anyhow::{anyhow, Context, Result};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleFormat, StreamConfig};
    use crossbeam_channel::bounded;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// Extra time the stream stays open so the tail is not clipped.
    const ALERT_TAIL_MS: u64 = 120;

    pub fn play_alert() -> Result<()> {
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);
        // cpal streams are not `Send` on every host, so the whole lifetime of
        // the stream stays on this thread.
        thread::spawn(move || {
            let stream = match open_stream() {
                Ok(stream) => stream,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };
            if let Err(err) = stream.play() {
                let _ = ready_tx.send(Err(anyhow!("failed to start alert stream: {err}")));
                return;
            }
            let _ = ready_tx.send(Ok(()));
            let hold = Duration::from_secs_f32(ALERT_DURATION_SECS)
                + Duration::from_millis(ALERT_TAIL_MS);
            thread::sleep(hold);
            drop(stream);
        });
        ready_rx
            .recv_timeout(Duration::from_secs(2))
            .context("alert output did not start in time")?
    }

    fn open_stream() -> Result<cpal::Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no default output device available")?;
        let default_config = device
            .default_output_config()
            .context("output device has no default config")?;
        let format = default_config.sample_format();
        let config: StreamConfig = default_config.into();
        let samples = Arc::new(render_alert(config.sample_rate.0));
        log_debug(&format!(
            "alert: format={format:?} sample_rate={}Hz channels={}",
            config.sample_rate.0, config.channels
        ));
        match format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, samples),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, samples),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, samples),
            other => Err(anyhow!("unsupported output sample format {other:?}")),
        }
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        samples: Arc<Vec<f32>>,
    ) -> Result<cpal::Stream>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let channels = usize::from(config.channels.max(1));
        let mut cursor = 0usize;
        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let value = samples.get(cursor).copied().unwrap_or(0.0);
                        cursor = cursor.saturating_add(1);
                        for out in frame.iter_mut() {
                            *out = <T as cpal::Sample>::from_sample(value);
                        }
                    }
                },
                |err| log_debug(&format!("alert_stream_error: {err}")),
                None,
            )
            .context("failed to build alert output stream")
    }
}

/// Play the alert on the default output device.
#[cfg(feature = "alert-audio")]
pub fn play_alert() -> Result<()> {
    play_and_trace("tone", output::play_alert)
}

/// Without audio output support, ring the terminal bell twice instead.
#[cfg(not(feature = "alert-audio"))]
pub fn play_alert() -> Result<()> {
    play_and_trace("bell", || {
        use std::io::Write;
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\x07\x07")?;
        stdout.flush()?;
        Ok(())
    })
}

/// The trace event is only emitted once the output actually succeeded.
fn play_and_trace(via: &'static str, play: impl FnOnce() -> Result<()>) -> Result<()> {
    play()?;
    tracing::info!(via, "alert played");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn traced(play: impl FnOnce() -> Result<()>) -> (Result<()>, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || play_and_trace("test", play));
        let text = String::from_utf8(captured.0.lock().unwrap().clone()).expect("utf8");
        (result, text)
    }

    #[test]
    fn alert_is_traced_only_after_output_succeeds() {
        let (result, text) = traced(|| Ok(()));
        assert!(result.is_ok());
        assert!(text.contains("alert played"));

        let (result, text) = traced(|| Err(anyhow!("no default output device")));
        let err = result.expect_err("missing device");
        assert!(err.to_string().contains("no default output device"));
        assert!(!text.contains("alert played"));
    }

    #[test]
    fn frequency_sweeps_from_a4_to_a5() {
        assert!((frequency_at(0.0) - 440.0).abs() < 1e-3);
        assert!((frequency_at(0.05) - 622.25).abs() < 0.5);
        assert_eq!(frequency_at(0.1), 880.0);
        assert_eq!(frequency_at(0.4), 880.0);
    }

    #[test]
    fn gain_decays_exponentially() {
        assert!((gain_at(0.0) - 0.5).abs() < 1e-6);
        assert!((gain_at(0.5) - 0.01).abs() < 1e-6);
        assert!(gain_at(0.25) < gain_at(0.1));
        assert!((gain_at(9.0) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn rendered_alert_has_expected_length_and_bounds() {
        let samples = render_alert(48_000);
        assert_eq!(samples.len(), 24_000);
        assert!(samples.iter().all(|s| s.abs() <= ALERT_START_GAIN + 1e-6));
        let head_peak = samples[..2_400].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let tail_peak = samples[21_600..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(head_peak > 0.3);
        assert!(tail_peak < 0.05);
    }

    #[test]
    fn zero_sample_rate_does_not_panic() {
        assert!(render_alert(0).is_empty());
    }
}
