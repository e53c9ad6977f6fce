//! Sensor channel layout and reading types

/// Number of reflectance channels on the sensor bar.
pub const CHANNEL_COUNT: usize = 5;

/// One snapshot of normalized reflectance readings, far-left to far-right.
///
/// `None` means the channel has not reported a value yet.
pub type Readings = [Option<f32>; CHANNEL_COUNT];

/// Readings before any channel has reported.
pub const UNAVAILABLE: Readings = [None; CHANNEL_COUNT];

/// Position of a channel on the sensor bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    FarLeft,
    Left,
    Center,
    Right,
    FarRight,
}

impl Channel {
    /// All channels in bar order
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::FarLeft,
        Channel::Left,
        Channel::Center,
        Channel::Right,
        Channel::FarRight,
    ];

    /// Index into a [`Readings`] array
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lateral slot relative to the center sensor (-2..=2, negative is left)
    #[inline]
    pub fn slot(self) -> i32 {
        self as i32 - 2
    }
}
