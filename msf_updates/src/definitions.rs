// msf_updates/src/definitions.rs

use std::sync::Arc;

use msf_core::error::ConfigError;
use msf_core::state::descriptor::{BlockDescriptor, StorageKind};
use msf_core::state::identifier::StateIdentifier::*;
use msf_core::state::layout::StateLayout;
use msf_core::state::list::StateList;

/// The propagated and unpropagated core shared by every definition.
/// Indices are (storage / error-state).
fn core_blocks() -> Vec<BlockDescriptor> {
    vec![
        // --- Position (IMU centered) --- 0-2 / 0-2
        BlockDescriptor::propagated(P, StorageKind::Vector3),
        // --- Velocity --- 3-5 / 3-5
        BlockDescriptor::propagated(V, StorageKind::Vector3),
        // --- Attitude --- 6-9 / 6-8
        BlockDescriptor::propagated(Q, StorageKind::Quaternion4),
        // --- Gyro bias --- 10-12 / 9-11
        BlockDescriptor::core_static(BW, StorageKind::Vector3),
        // --- Accelerometer bias --- 13-15 / 12-14
        BlockDescriptor::core_static(BA, StorageKind::Vector3),
    ]
}

/// Auxiliary states of a pose (camera) sensor.
fn pose_sensor_blocks() -> [BlockDescriptor; 5] {
    [
        // Visual scale.
        BlockDescriptor::auxiliary(L, StorageKind::Scalar1),
        // Vision-world attitude drift.
        BlockDescriptor::drifting(QWv, StorageKind::Quaternion4),
        // Vision-world position drift.
        BlockDescriptor::auxiliary(PWv, StorageKind::Vector3),
        // Camera attitude w.r.t. the IMU, in the IMU frame.
        BlockDescriptor::auxiliary(QIc, StorageKind::Quaternion4),
        // Camera position w.r.t. the IMU, in the IMU frame.
        BlockDescriptor::auxiliary(PIc, StorageKind::Vector3),
    ]
}

/// Position-sensor offset w.r.t. the IMU, in the IMU frame.
const POSITION_SENSOR_BLOCK: BlockDescriptor = BlockDescriptor::auxiliary(PIp, StorageKind::Vector3);

/// IMU core + pose sensor + position sensor. 34 stored scalars, 30 error states.
pub fn position_pose_state_list() -> StateList {
    let mut blocks = core_blocks();
    blocks.extend(pose_sensor_blocks());
    blocks.push(POSITION_SENSOR_BLOCK);
    StateList::new(blocks)
}

/// IMU core + pose sensor. 31 stored scalars, 27 error states.
pub fn pose_state_list() -> StateList {
    let mut blocks = core_blocks();
    blocks.extend(pose_sensor_blocks());
    StateList::new(blocks)
}

/// IMU core + position sensor. 19 stored scalars, 18 error states.
pub fn position_state_list() -> StateList {
    let mut blocks = core_blocks();
    blocks.push(POSITION_SENSOR_BLOCK);
    StateList::new(blocks)
}

/// A named, predefined state definition and the covariance size filters
/// built for it allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateDefinition {
    PositionPose,
    Pose,
    Position,
}

impl StateDefinition {
    pub const ALL: [StateDefinition; 3] = [
        StateDefinition::PositionPose,
        StateDefinition::Pose,
        StateDefinition::Position,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StateDefinition::PositionPose => "position_pose",
            StateDefinition::Pose => "pose",
            StateDefinition::Position => "position",
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    pub fn state_list(self) -> StateList {
        match self {
            StateDefinition::PositionPose => position_pose_state_list(),
            StateDefinition::Pose => pose_state_list(),
            StateDefinition::Position => position_state_list(),
        }
    }

    pub fn covariance_dim(self) -> usize {
        match self {
            StateDefinition::PositionPose => 30,
            StateDefinition::Pose => 27,
            StateDefinition::Position => 18,
        }
    }

    /// Validates the definition against its covariance size.
    pub fn layout(self) -> Result<Arc<StateLayout>, ConfigError> {
        StateLayout::build(self.state_list(), self.covariance_dim())
    }
}
