//! Board configuration, validation, and error types.
//!
//! [`BoardConfig`] is the input for constructing (and reconfiguring) a
//! [`Board`](crate::Board). [`validate()`](BoardConfig::validate) checks
//! every structural invariant up front so that steady-state operation has
//! no configuration failures left to report.

use std::error::Error;
use std::fmt;

use gridbot_core::CellIndex;
use gridbot_space::{Connectivity, GridLayout, SpaceError, SquareGrid};

// ── GridConfig ─────────────────────────────────────────────────────

/// Grid geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Side length N. Default: 2. Minimum: 1.
    pub size: u32,
    /// Edge length of one tile; tiles and the agent are scaled by it.
    /// Default: 1.0.
    pub cell_size: f32,
    /// Extra spacing between neighbouring tiles. Default: 0.2.
    pub padding: f32,
    /// Which cells count as one step away. Default: eight-neighbourhood.
    pub connectivity: Connectivity,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 2,
            cell_size: 1.0,
            padding: 0.2,
            connectivity: Connectivity::Eight,
        }
    }
}

impl GridConfig {
    /// Build the topology and layout described by this config.
    pub fn build(&self) -> Result<(SquareGrid, GridLayout), ConfigError> {
        let grid = SquareGrid::new(self.size, self.connectivity)?;
        let layout = GridLayout::new(self.size, self.cell_size, self.padding)?;
        Ok((grid, layout))
    }
}

// ── MotionConfig ───────────────────────────────────────────────────

/// Scale pulse applied to the destination tile while the agent moves.
///
/// `scale = base_scale * (base + sin(time * frequency) * amplitude)`
#[derive(Clone, Debug, PartialEq)]
pub struct PulseConfig {
    /// Resting multiplier of the pulse. Default: 1.04.
    pub base: f32,
    /// Peak deviation from `base`. Default: 0.15.
    pub amplitude: f32,
    /// Angular frequency in radians per second. Default: 8.0.
    pub frequency: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            base: 1.04,
            amplitude: 0.15,
            frequency: 8.0,
        }
    }
}

impl PulseConfig {
    /// Pulse multiplier at clock time `time`.
    pub fn factor(&self, time: f32) -> f32 {
        self.base + (time * self.frequency).sin() * self.amplitude
    }
}

/// Transition timing.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    /// Seconds a single move takes. Default: 0.4.
    pub duration: f32,
    /// Destination tile pulse.
    pub pulse: PulseConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            duration: 0.4,
            pulse: PulseConfig::default(),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`BoardConfig::validate()`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid geometry is invalid.
    Space(SpaceError),
    /// Transition duration is NaN, infinite, zero, or negative.
    InvalidDuration {
        /// The invalid value.
        value: f32,
    },
    /// Highlight refresh delay is NaN, infinite, or negative.
    InvalidHighlightDelay {
        /// The invalid value.
        value: f32,
    },
    /// A pulse parameter is not finite.
    InvalidPulse {
        /// Description of which parameter was rejected.
        reason: String,
    },
    /// The agent's starting cell is not on the grid.
    StartCellOutOfRange {
        /// The configured start cell.
        cell: CellIndex,
        /// Number of cells in the grid.
        cell_count: usize,
    },
    /// Command queue capacity is zero.
    CommandQueueZero,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "grid: {e}"),
            Self::InvalidDuration { value } => {
                write!(f, "duration must be finite and positive, got {value}")
            }
            Self::InvalidHighlightDelay { value } => {
                write!(f, "highlight_delay must be finite and non-negative, got {value}")
            }
            Self::InvalidPulse { reason } => write!(f, "invalid pulse config: {reason}"),
            Self::StartCellOutOfRange { cell, cell_count } => {
                write!(f, "start cell {cell} out of range [0, {cell_count})")
            }
            Self::CommandQueueZero => write!(f, "max_pending_commands must be at least 1"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

// ── BoardConfig ────────────────────────────────────────────────────

/// Complete configuration for a [`Board`](crate::Board).
#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    /// Grid geometry.
    pub grid: GridConfig,
    /// Transition timing and feedback.
    pub motion: MotionConfig,
    /// Seconds to wait after (re)generation before highlighting the
    /// agent's neighbours. Zero refreshes immediately. Default: 0.25.
    pub highlight_delay: f32,
    /// Cell the agent occupies when the board is created. Default: 0.
    pub start_cell: CellIndex,
    /// Capacity of the queue behind [`CommandHandle`](crate::CommandHandle).
    /// Default: 64.
    pub max_pending_commands: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            motion: MotionConfig::default(),
            highlight_delay: 0.25,
            start_cell: CellIndex(0),
            max_pending_commands: 64,
        }
    }
}

impl BoardConfig {
    /// A default config with an `size`×`size` grid.
    pub fn with_size(size: u32) -> Self {
        Self {
            grid: GridConfig {
                size,
                ..GridConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Grid geometry (size, cell size, padding).
        let (grid, _) = self.grid.build()?;
        // 2. Start cell must be on the grid.
        if !grid.contains(self.start_cell) {
            return Err(ConfigError::StartCellOutOfRange {
                cell: self.start_cell,
                cell_count: grid.cell_count(),
            });
        }
        // 3. Duration strictly positive so progress is well defined.
        let duration = self.motion.duration;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ConfigError::InvalidDuration { value: duration });
        }
        // 4. Pulse parameters finite.
        let pulse = &self.motion.pulse;
        for (name, value) in [
            ("base", pulse.base),
            ("amplitude", pulse.amplitude),
            ("frequency", pulse.frequency),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidPulse {
                    reason: format!("{name} must be finite, got {value}"),
                });
            }
        }
        // 5. Highlight delay.
        let delay = self.highlight_delay;
        if !delay.is_finite() || delay < 0.0 {
            return Err(ConfigError::InvalidHighlightDelay { value: delay });
        }
        // 6. Command queue.
        if self.max_pending_commands == 0 {
            return Err(ConfigError::CommandQueueZero);
        }
        Ok(())
    }
}
