//! Cross-platform microphone recorder using cpal
//!
//! Captures mono i16 samples at whatever rate the device offers, then
//! resamples to the rate of the requested recording quality on stop.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::thread::JoinHandle;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{RecordedAudio, RecordingError, VoiceRecorder};
use crate::domain::settings::RecordingQuality;

/// Microphone recorder with pause support.
///
/// The cpal stream is not Send, so it lives on a dedicated thread that
/// runs until `is_recording` is cleared.
pub struct CpalRecorder {
    /// Captured mono samples at the device rate
    audio_buffer: Arc<StdMutex<Vec<i16>>>,
    /// Mono frames captured so far, pauses excluded
    captured_frames: Arc<AtomicU64>,
    device_sample_rate: Arc<AtomicU32>,
    target_sample_rate: AtomicU32,
    is_recording: Arc<AtomicBool>,
    is_paused: Arc<AtomicBool>,
    stream_thread: StdMutex<Option<JoinHandle<()>>>,
}

impl CpalRecorder {
    pub fn new() -> Self {
        Self {
            audio_buffer: Arc::new(StdMutex::new(Vec::new())),
            captured_frames: Arc::new(AtomicU64::new(0)),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            target_sample_rate: AtomicU32::new(RecordingQuality::default().sample_rate()),
            is_recording: Arc::new(AtomicBool::new(false)),
            is_paused: Arc::new(AtomicBool::new(false)),
            stream_thread: StdMutex::new(None),
        }
    }

    fn get_input_device() -> Result<cpal::Device, RecordingError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(RecordingError::NoAudioDevice)
    }

    /// Pick an input config, preferring fewer channels and a range that
    /// contains `target_rate`
    fn get_input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), RecordingError> {
        let supported_configs = device.supported_input_configs().map_err(|e| {
            RecordingError::PermissionDenied(format!("Failed to query input device: {}", e))
        })?;

        let includes = |c: &cpal::SupportedStreamConfigRange| {
            c.min_sample_rate().0 <= target_rate && c.max_sample_rate().0 >= target_rate
        };

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate = includes(&config) && !includes(current);
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(RecordingError::StartFailed(
            "No suitable input config found".into(),
        ))?;

        let sample_rate = if includes(&config_range) {
            SampleRate(target_rate)
        } else {
            config_range.max_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Resample mono audio from `source_rate` to `target_rate`
    fn resample(
        samples: &[i16],
        source_rate: u32,
        target_rate: u32,
    ) -> Result<Vec<i16>, RecordingError> {
        if source_rate == target_rate || samples.is_empty() {
            return Ok(samples.to_vec());
        }

        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

        let ratio = target_rate as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            target_rate as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            1,    // Mono
        )
        .map_err(|e| RecordingError::RecordingFailed(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());

            let mut chunk = samples_f32[input_pos..end_pos].to_vec();
            chunk.resize(frames_needed, 0.0);

            let resampled = resampler.process(&[chunk], None).map_err(|e| {
                RecordingError::RecordingFailed(format!("Resampling failed: {}", e))
            })?;

            output.extend(
                resampled[0]
                    .iter()
                    .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16),
            );
            input_pos = end_pos;
        }

        output.truncate(output_len);
        Ok(output)
    }

    /// Mix interleaved multi-channel audio down to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    fn frames_to_ms(frames: u64, sample_rate: u32) -> u64 {
        if sample_rate == 0 {
            return 0;
        }
        frames * 1000 / u64::from(sample_rate)
    }

    /// Body of the stream thread: open the stream, report the device rate
    /// through `ready`, then keep the stream alive until recording stops.
    fn run_stream(
        target_rate: u32,
        audio_buffer: Arc<StdMutex<Vec<i16>>>,
        captured_frames: Arc<AtomicU64>,
        is_recording: Arc<AtomicBool>,
        is_paused: Arc<AtomicBool>,
        ready: oneshot::Sender<Result<u32, RecordingError>>,
    ) {
        let recording = Arc::clone(&is_recording);
        let push = move |mono: Vec<i16>| {
            if !recording.load(Ordering::SeqCst) || is_paused.load(Ordering::SeqCst) {
                return;
            }
            if let Ok(mut buffer) = audio_buffer.lock() {
                captured_frames.fetch_add(mono.len() as u64, Ordering::SeqCst);
                buffer.extend_from_slice(&mono);
            }
        };

        let stream = match Self::open_stream(target_rate, push) {
            Ok((stream, rate)) => {
                let _ = ready.send(Ok(rate));
                stream
            }
            Err(e) => {
                is_recording.store(false, Ordering::SeqCst);
                let _ = ready.send(Err(e));
                return;
            }
        };

        while is_recording.load(Ordering::SeqCst) {
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
        drop(stream);
        debug!("input stream closed");
    }

    fn open_stream<F>(target_rate: u32, push: F) -> Result<(cpal::Stream, u32), RecordingError>
    where
        F: Fn(Vec<i16>) + Send + 'static,
    {
        let device = Self::get_input_device()?;
        let (config, sample_format) = Self::get_input_config(&device, target_rate)?;
        let channels = config.channels;

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    push(Self::stereo_to_mono(data, channels));
                },
                |err| warn!(error = %err, "audio input stream error"),
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let i16_data: Vec<i16> = data.iter().map(|&s| (s * 32767.0) as i16).collect();
                    push(Self::stereo_to_mono(&i16_data, channels));
                },
                |err| warn!(error = %err, "audio input stream error"),
                None,
            ),
            _ => {
                return Err(RecordingError::StartFailed(
                    "Unsupported sample format".into(),
                ))
            }
        }
        .map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        stream
            .play()
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        Ok((stream, config.sample_rate.0))
    }

    /// Clear the recording flag and wait for the stream thread to exit
    async fn close_stream(&self) -> Result<(), RecordingError> {
        self.is_recording.store(false, Ordering::SeqCst);
        self.is_paused.store(false, Ordering::SeqCst);

        let handle = self
            .stream_thread
            .lock()
            .map_err(|_| RecordingError::RecordingFailed("recorder lock poisoned".into()))?
            .take();

        if let Some(handle) = handle {
            tokio::task::spawn_blocking(move || handle.join())
                .await
                .map_err(|e| RecordingError::RecordingFailed(format!("Task join error: {}", e)))?
                .map_err(|_| RecordingError::RecordingFailed("input stream thread panicked".into()))?;
        }
        Ok(())
    }

    fn take_samples(&self) -> Result<Vec<i16>, RecordingError> {
        let mut buffer = self
            .audio_buffer
            .lock()
            .map_err(|_| RecordingError::RecordingFailed("audio buffer lock poisoned".into()))?;
        Ok(std::mem::take(&mut *buffer))
    }
}

impl Default for CpalRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceRecorder for CpalRecorder {
    async fn request_permission(&self) -> Result<(), RecordingError> {
        tokio::task::spawn_blocking(|| {
            let device = Self::get_input_device()?;
            device
                .default_input_config()
                .map_err(|e| RecordingError::PermissionDenied(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| RecordingError::StartFailed(format!("Task join error: {}", e)))?
    }

    async fn start(&self, quality: RecordingQuality) -> Result<(), RecordingError> {
        if self.is_recording.swap(true, Ordering::SeqCst) {
            return Err(RecordingError::StartFailed(
                "Recording already in progress".to_string(),
            ));
        }

        let target_rate = quality.sample_rate();
        self.target_sample_rate.store(target_rate, Ordering::SeqCst);
        self.is_paused.store(false, Ordering::SeqCst);
        self.captured_frames.store(0, Ordering::SeqCst);
        self.take_samples()?;

        let (ready_tx, ready_rx) = oneshot::channel();
        let audio_buffer = Arc::clone(&self.audio_buffer);
        let captured_frames = Arc::clone(&self.captured_frames);
        let is_recording = Arc::clone(&self.is_recording);
        let is_paused = Arc::clone(&self.is_paused);

        let handle = std::thread::spawn(move || {
            Self::run_stream(
                target_rate,
                audio_buffer,
                captured_frames,
                is_recording,
                is_paused,
                ready_tx,
            )
        });

        if let Ok(mut slot) = self.stream_thread.lock() {
            *slot = Some(handle);
        }

        let started = ready_rx.await.unwrap_or_else(|_| {
            Err(RecordingError::StartFailed(
                "input stream thread exited".into(),
            ))
        });

        match started {
            Ok(device_rate) => {
                self.device_sample_rate.store(device_rate, Ordering::SeqCst);
                debug!(device_rate, target_rate, "input stream opened");
                Ok(())
            }
            Err(e) => {
                self.close_stream().await?;
                Err(e)
            }
        }
    }

    async fn pause(&self) -> Result<(), RecordingError> {
        if !self.is_recording() {
            return Err(RecordingError::NotRecording);
        }
        self.is_paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<(), RecordingError> {
        if !self.is_recording() {
            return Err(RecordingError::NotRecording);
        }
        self.is_paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<RecordedAudio, RecordingError> {
        if !self.is_recording() {
            return Err(RecordingError::NotRecording);
        }
        self.close_stream().await?;

        let device_rate = self.device_sample_rate.load(Ordering::SeqCst);
        let target_rate = self.target_sample_rate.load(Ordering::SeqCst);
        let samples = self.take_samples()?;

        if samples.is_empty() || device_rate == 0 {
            return Err(RecordingError::Empty);
        }

        let duration_ms = Self::frames_to_ms(samples.len() as u64, device_rate);
        let samples = tokio::task::spawn_blocking(move || {
            Self::resample(&samples, device_rate, target_rate)
        })
        .await
        .map_err(|e| RecordingError::RecordingFailed(format!("Resample task error: {}", e)))??;

        debug!(duration_ms, frames = samples.len(), target_rate, "recording stopped");
        Ok(RecordedAudio {
            samples,
            sample_rate: target_rate,
            duration_ms,
        })
    }

    async fn cancel(&self) -> Result<(), RecordingError> {
        self.close_stream().await?;
        self.take_samples()?;
        self.captured_frames.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    fn is_paused(&self) -> bool {
        self.is_paused.load(Ordering::SeqCst)
    }

    fn elapsed_ms(&self) -> u64 {
        Self::frames_to_ms(
            self.captured_frames.load(Ordering::SeqCst),
            self.device_sample_rate.load(Ordering::SeqCst),
        )
    }
}
