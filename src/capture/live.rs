//! Live audio capture from an input device.
//!
//! The device callback runs on cpal's capture thread and only appends mono
//! samples to a bounded history. Each tick takes a copy of the newest part.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::visualizer::AudioSource;

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Seconds of audio kept in the history.
const HISTORY_SECONDS: usize = 2;

type History = Arc<Mutex<VecDeque<i16>>>;

/// Captures from a specified or default input device.
///
/// Features:
/// - Captures at the device's native sample rate
/// - Converts multi-channel audio to mono by averaging channels
/// - Accepts i16, u16 and f32 device formats
pub struct LiveCapture {
    /// Actual sample rate from device
    sample_rate: u32,
    /// Newest mono samples, oldest first
    history: History,
    /// Active input stream (kept alive while capturing)
    stream: Option<cpal::Stream>,
    /// Device name or "default" to use the system default device
    device_name: String,
    /// Name reported by the opened device
    active_device: String,
}

impl LiveCapture {
    /// Creates a capture for the given device.
    ///
    /// # Arguments
    /// * `requested_sample_rate` - Desired sample rate in Hz (the device rate wins)
    /// * `device_name` - "default", a numeric index, or a device name
    pub fn new(requested_sample_rate: u32, device_name: String) -> Self {
        Self {
            sample_rate: requested_sample_rate,
            history: Arc::new(Mutex::new(VecDeque::new())),
            stream: None,
            active_device: device_name.clone(),
            device_name,
        }
    }

    /// Opens the device and starts the input stream.
    ///
    /// # Errors
    /// - If the specified device is not available
    /// - If the device's sample format is unsupported
    /// - If audio stream creation fails
    pub fn start(&mut self) -> Result<()> {
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or_else(|| anyhow!("No audio input device available"))
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        self.active_device = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Capture device: {}", self.active_device);

        let device_config = device.default_input_config()?;
        let device_sample_rate = device_config.sample_rate().0;
        let num_channels = device_config.channels() as usize;
        let sample_format = device_config.sample_format();

        if device_sample_rate != self.sample_rate {
            tracing::warn!(
                "Requested sample rate {}Hz but device uses {}Hz. Capturing at device rate.",
                self.sample_rate,
                device_sample_rate
            );
        }

        tracing::debug!(
            "Device configuration: {}Hz, {} channels, {:?}",
            device_sample_rate,
            num_channels,
            sample_format
        );

        self.sample_rate = device_sample_rate;
        let capacity = device_sample_rate as usize * HISTORY_SECONDS;
        let config: cpal::StreamConfig = device_config.into();

        let stream = match sample_format {
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config, &self.history, num_channels, capacity)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config, &self.history, num_channels, capacity)?
            }
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config, &self.history, num_channels, capacity)?
            }
            other => return Err(anyhow!("Unsupported device sample format: {other:?}")),
        };

        stream.play()?;
        self.stream = Some(stream);

        tracing::debug!("Audio stream started");
        Ok(())
    }

    /// Stops the input stream. The history is kept.
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("Audio stream stopped");
        }
    }

    /// Copies the newest `count` samples out of the history.
    pub fn snapshot(&self, count: usize) -> Vec<i16> {
        let history = lock_history(&self.history);
        let skip = history.len().saturating_sub(count);
        history.iter().skip(skip).copied().collect()
    }
}

impl AudioSource for LiveCapture {
    fn poll(&mut self, count: usize) -> Vec<i16> {
        self.snapshot(count)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn describe(&self) -> String {
        self.active_device.clone()
    }
}

impl Drop for LiveCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    history: &History,
    num_channels: usize,
    capacity: usize,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    i16: FromSample<T>,
{
    let history = Arc::clone(history);
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            append_mono(data, &history, num_channels, capacity);
        },
        |err| {
            tracing::error!("Audio stream error: {}", err);
        },
        None,
    )?;
    Ok(stream)
}

/// Mixes interleaved frames down to mono and appends them, dropping the
/// oldest samples beyond `capacity`.
fn append_mono<T>(data: &[T], history: &History, num_channels: usize, capacity: usize)
where
    T: Sample,
    i16: FromSample<T>,
{
    let mut history = lock_history(history);
    let channels = num_channels.max(1);

    for frame in data.chunks_exact(channels) {
        let sum: i32 = frame.iter().map(|&s| i16::from_sample(s) as i32).sum();
        history.push_back((sum / channels as i32) as i16);
    }

    let excess = history.len().saturating_sub(capacity);
    history.drain(..excess);
}

fn lock_history(history: &History) -> std::sync::MutexGuard<'_, VecDeque<i16>> {
    // a panic on the capture thread leaves the samples themselves intact
    history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// An input device as shown by `list-devices`.
#[derive(Debug, Clone)]
pub struct InputDeviceInfo {
    pub index: usize,
    pub name: String,
    pub is_default: bool,
    /// Default sample rate and channel count, if the device could be queried
    pub config: Option<(u32, u16)>,
}

/// Enumerates input devices, skipping any whose name cannot be read.
///
/// # Errors
/// - If the audio host cannot enumerate devices
pub fn list_input_devices() -> Result<Vec<InputDeviceInfo>> {
    let (host, devices) = suppress_alsa_warnings(|| {
        let host = cpal::default_host();
        let devices: Vec<cpal::Device> = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate audio devices: {e}"))?
            .filter(|d| d.name().is_ok())
            .collect();
        Ok((host, devices))
    })?;

    let default_device = host.default_input_device().and_then(|d| d.name().ok());

    Ok(devices
        .iter()
        .enumerate()
        .map(|(index, device)| {
            let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
            InputDeviceInfo {
                index,
                is_default: default_device.as_ref() == Some(&name),
                config: device
                    .default_input_config()
                    .ok()
                    .map(|c| (c.sample_rate().0, c.channels())),
                name,
            }
        })
        .collect())
}

/// Finds an audio input device by name or numeric index.
///
/// # Errors
/// - If no device with the specified name/index is found
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    if let Ok(index) = device_spec.parse::<usize>() {
        let devices: Vec<_> = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
            .collect();
        let count = devices.len();

        return devices.into_iter().nth(index).ok_or_else(|| {
            anyhow!(
                "Device index {} is out of range (0-{})",
                index,
                count.saturating_sub(1)
            )
        });
    }

    let devices = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?;

    for device in devices {
        if let Ok(name) = device.name() {
            if name == device_spec {
                return Ok(device);
            }
        }
    }

    Err(anyhow!(
        "Audio input device '{device_spec}' not found. Use 'livespec list-devices' to see available devices."
    ))
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
#[cfg(target_os = "linux")]
fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// ALSA doesn't exist outside Linux, so there is nothing to suppress.
#[cfg(not(target_os = "linux"))]
fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> History {
        Arc::new(Mutex::new(VecDeque::new()))
    }

    #[test]
    fn test_stereo_is_averaged() {
        let history = history();
        append_mono(&[100i16, 300, -50, 50, 7, 8], &history, 2, 100);
        let samples: Vec<i16> = history.lock().unwrap().iter().copied().collect();
        assert_eq!(samples, vec![200, 0, 7]);
    }

    #[test]
    fn test_float_input_is_converted() {
        let history = history();
        append_mono(&[1.0f32, -1.0, 0.0], &history, 1, 100);
        let samples: Vec<i16> = history.lock().unwrap().iter().copied().collect();
        assert_eq!(samples[0], i16::MAX);
        assert!(samples[1] <= -32767);
        assert_eq!(samples[2], 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let history = history();
        let data: Vec<i16> = (0..10).collect();
        append_mono(&data, &history, 1, 4);
        let samples: Vec<i16> = history.lock().unwrap().iter().copied().collect();
        assert_eq!(samples, vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_snapshot_returns_newest() {
        let capture = LiveCapture::new(48000, "default".to_string());
        append_mono(&[1i16, 2, 3, 4, 5], &capture.history, 1, 100);
        assert_eq!(capture.snapshot(2), vec![4, 5]);
        assert_eq!(capture.snapshot(10), vec![1, 2, 3, 4, 5]);
    }
}
