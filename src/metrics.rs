//! Frame timing readout, sampled once per second.

/// One published reading for the FPS / frame-time labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricsSample {
    pub fps: u32,
    pub frame_time_ms: f64,
}

#[derive(Clone, Debug)]
pub struct FrameMetrics {
    window_ms: f64,
    window_start_ms: f64,
    last_frame_ms: Option<f64>,
    frame_count: u32,
    frame_time_ms: f64,
    last_sample: Option<MetricsSample>,
}

impl FrameMetrics {
    pub fn new(now: f64) -> Self {
        Self::with_window(now, 1000.0)
    }

    pub fn with_window(now: f64, window_ms: f64) -> Self {
        Self {
            window_ms,
            window_start_ms: now,
            last_frame_ms: None,
            frame_count: 0,
            frame_time_ms: 0.0,
            last_sample: None,
        }
    }

    /// Records a frame at `now`. Returns a fresh sample when the window rolls over.
    pub fn record_frame(&mut self, now: f64) -> Option<MetricsSample> {
        if let Some(last) = self.last_frame_ms {
            self.frame_time_ms = (now - last).max(0.0);
        }
        self.last_frame_ms = Some(now);
        self.frame_count += 1;

        let span = now - self.window_start_ms;
        if span < self.window_ms {
            return None;
        }
        let sample = MetricsSample {
            fps: (self.frame_count as f64 * 1000.0 / span).round() as u32,
            frame_time_ms: self.frame_time_ms,
        };
        self.frame_count = 0;
        self.window_start_ms = now;
        self.last_sample = Some(sample);
        Some(sample)
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time_ms
    }

    pub fn last_sample(&self) -> Option<MetricsSample> {
        self.last_sample
    }
}

/// Bytes to whole mebibytes for the memory label.
pub fn bytes_to_mb(bytes: f64) -> u64 {
    (bytes / (1024.0 * 1024.0)).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_once_per_window() {
        let mut m = FrameMetrics::new(0.0);
        let mut samples = Vec::new();
        for i in 1..=120 {
            if let Some(s) = m.record_frame(i as f64 * 16.0) {
                samples.push(s);
            }
        }
        // 120 frames over 1920ms: exactly one rollover (at 1008ms).
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].fps, 63);
        assert_eq!(samples[0].frame_time_ms, 16.0);
        assert_eq!(m.last_sample(), Some(samples[0]));
    }

    #[test]
    fn first_frame_has_no_frame_time() {
        let mut m = FrameMetrics::new(0.0);
        assert_eq!(m.record_frame(10.0), None);
        assert_eq!(m.frame_time_ms(), 0.0);
        m.record_frame(27.0);
        assert_eq!(m.frame_time_ms(), 17.0);
    }

    #[test]
    fn memory_rounding() {
        assert_eq!(bytes_to_mb(0.0), 0);
        assert_eq!(bytes_to_mb(10.0 * 1024.0 * 1024.0), 10);
        assert_eq!(bytes_to_mb(1.6 * 1024.0 * 1024.0), 2);
    }
}
