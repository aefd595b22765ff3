// RingTap: Fixed-capacity magnitude windows
//
// Both windows are plain arrays with a head index; the oldest entry is
// overwritten once full. Nothing here allocates.

/// Ring storage shared by the smoothing and posture windows.
#[derive(Debug, Clone, Copy)]
struct Ring<const N: usize> {
    buf: [f32; N],
    head: usize,
    len: usize,
}

impl<const N: usize> Ring<N> {
    const fn new() -> Self {
        Self {
            buf: [0.0; N],
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, value: f32) {
        if N == 0 {
            return;
        }
        self.buf[self.head] = value;
        self.head = (self.head + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    /// Held entries, oldest first.
    fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let start = (self.head + N - self.len) % N.max(1);
        (0..self.len).map(move |i| self.buf[(start + i) % N])
    }
}

/// Running average over the last `N` magnitudes.
#[derive(Debug, Clone, Copy)]
pub struct SmoothingWindow<const N: usize> {
    ring: Ring<N>,
}

impl<const N: usize> SmoothingWindow<N> {
    pub const fn new() -> Self {
        Self { ring: Ring::new() }
    }

    pub fn push(&mut self, magnitude: f32) {
        self.ring.push(magnitude);
    }

    /// Arithmetic mean of the held entries, 0 when empty.
    pub fn average(&self) -> f32 {
        if self.ring.len == 0 {
            return 0.0;
        }
        self.ring.iter().sum::<f32>() / self.ring.len as f32
    }
}

impl<const N: usize> Default for SmoothingWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowStats {
    pub mean: f32,
    /// Population variance (divides by the entry count).
    pub variance: f32,
    pub min: f32,
    pub max: f32,
}

impl WindowStats {
    pub fn range(&self) -> f32 {
        self.max - self.min
    }
}

/// Recent magnitudes used to judge whether the ring is being held still.
#[derive(Debug, Clone, Copy)]
pub struct PostureWindow<const N: usize> {
    ring: Ring<N>,
}

impl<const N: usize> PostureWindow<N> {
    pub const fn new() -> Self {
        Self { ring: Ring::new() }
    }

    pub fn push(&mut self, magnitude: f32) {
        self.ring.push(magnitude);
    }

    pub fn is_full(&self) -> bool {
        N > 0 && self.ring.len == N
    }

    /// Statistics over the held entries; all zero when empty.
    pub fn stats(&self) -> WindowStats {
        let len = self.ring.len;
        if len == 0 {
            return WindowStats::default();
        }

        let mut sum = 0.0;
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for v in self.ring.iter() {
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        let mean = sum / len as f32;
        let variance = self
            .ring
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f32>()
            / len as f32;

        WindowStats {
            mean,
            variance,
            min,
            max,
        }
    }
}

impl<const N: usize> Default for PostureWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn empty_smoothing_window_averages_to_zero() {
        let window = SmoothingWindow::<3>::new();
        assert_eq!(window.average(), 0.0);
        assert_eq!(window.ring.len, 0);
    }

    #[test]
    fn smoothing_window_evicts_oldest() {
        let mut window = SmoothingWindow::<3>::new();
        window.push(1.0);
        assert!(close(window.average(), 1.0));
        window.push(2.0);
        window.push(3.0);
        assert!(close(window.average(), 2.0));
        window.push(6.0);
        assert_eq!(window.ring.len, 3);
        assert!(close(window.average(), 11.0 / 3.0));
    }

    #[test]
    fn posture_stats_use_population_variance() {
        let mut window = PostureWindow::<6>::new();
        for v in [1.0, 1.0, 1.0, 1.2, 1.2, 1.2] {
            window.push(v);
        }
        let stats = window.stats();
        assert!(window.is_full());
        assert!(close(stats.mean, 1.1));
        assert!(close(stats.variance, 0.01));
        assert!(close(stats.min, 1.0));
        assert!(close(stats.max, 1.2));
        assert!(close(stats.range(), 0.2));
    }

    #[test]
    fn posture_stats_only_cover_held_entries() {
        let mut window = PostureWindow::<6>::new();
        window.push(0.9);
        window.push(1.1);
        let stats = window.stats();
        assert!(!window.is_full());
        assert!(close(stats.mean, 1.0));
        assert!(close(stats.min, 0.9));
        assert!(close(stats.max, 1.1));
    }

    #[test]
    fn posture_window_wraps_after_capacity() {
        let mut window = PostureWindow::<6>::new();
        for _ in 0..6 {
            window.push(5.0);
        }
        for _ in 0..6 {
            window.push(1.0);
        }
        let stats = window.stats();
        assert_eq!(window.ring.len, 6);
        assert!(close(stats.mean, 1.0));
        assert!(close(stats.variance, 0.0));
    }
}
