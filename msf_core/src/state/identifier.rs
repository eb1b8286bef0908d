// msf_core/src/state/identifier.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stable identifier of every named block that can exist in a filter state.
///
/// The discriminants are part of the public contract: offset tables and any
/// externally persisted state are keyed by them, so existing values must never
/// be renumbered. New identifiers are appended at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum StateIdentifier {
    /// Position of the IMU in the world frame.
    #[serde(rename = "p")]
    P = 0,
    /// Velocity in the world frame.
    #[serde(rename = "v")]
    V = 1,
    /// Attitude of the IMU w.r.t. the world frame.
    #[serde(rename = "q")]
    Q = 2,
    /// Gyroscope bias.
    #[serde(rename = "b_w")]
    BW = 3,
    /// Accelerometer bias.
    #[serde(rename = "b_a")]
    BA = 4,
    /// Visual scale.
    #[serde(rename = "L")]
    L = 5,
    /// Vision-world attitude drift.
    #[serde(rename = "q_wv")]
    QWv = 6,
    /// Vision-world position drift.
    #[serde(rename = "p_wv")]
    PWv = 7,
    /// Attitude of the camera w.r.t. the IMU, expressed in the IMU frame.
    #[serde(rename = "q_ic")]
    QIc = 8,
    /// Position of the camera w.r.t. the IMU, expressed in the IMU frame.
    #[serde(rename = "p_ic")]
    PIc = 9,
    /// Position of the position sensor w.r.t. the IMU, expressed in the IMU frame.
    #[serde(rename = "p_ip")]
    PIp = 10,
}

impl StateIdentifier {
    /// Number of identifiers. Lookup tables keyed by identifier use this length.
    pub const COUNT: usize = 11;

    /// Every identifier, in discriminant order.
    pub const ALL: [StateIdentifier; Self::COUNT] = [
        StateIdentifier::P,
        StateIdentifier::V,
        StateIdentifier::Q,
        StateIdentifier::BW,
        StateIdentifier::BA,
        StateIdentifier::L,
        StateIdentifier::QWv,
        StateIdentifier::PWv,
        StateIdentifier::QIc,
        StateIdentifier::PIc,
        StateIdentifier::PIp,
    ];

    /// The stable numeric value of this identifier.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks an identifier up by its stable numeric value.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The short symbol used in state definitions and diagnostics (e.g. `"b_w"`).
    pub const fn symbol(self) -> &'static str {
        match self {
            StateIdentifier::P => "p",
            StateIdentifier::V => "v",
            StateIdentifier::Q => "q",
            StateIdentifier::BW => "b_w",
            StateIdentifier::BA => "b_a",
            StateIdentifier::L => "L",
            StateIdentifier::QWv => "q_wv",
            StateIdentifier::PWv => "p_wv",
            StateIdentifier::QIc => "q_ic",
            StateIdentifier::PIc => "p_ic",
            StateIdentifier::PIp => "p_ip",
        }
    }
}

impl fmt::Display for StateIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
