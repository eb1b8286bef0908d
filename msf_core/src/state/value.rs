// msf_core/src/state/value.rs

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::state::descriptor::StorageKind;

/// Below this norm a stored quaternion no longer describes a rotation.
const MIN_QUATERNION_NORM: f64 = 1e-9;

/// The value of a single block, tagged by its storage kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockValue {
    Scalar(f64),
    Vector3(Vector3<f64>),
    Quaternion(UnitQuaternion<f64>),
}

impl BlockValue {
    pub fn kind(&self) -> StorageKind {
        match self {
            BlockValue::Scalar(_) => StorageKind::Scalar1,
            BlockValue::Vector3(_) => StorageKind::Vector3,
            BlockValue::Quaternion(_) => StorageKind::Quaternion4,
        }
    }

    /// The reset value of a block: zero for scalars and vectors, identity for
    /// quaternions (a zero quaternion is not a rotation).
    pub fn default_for(kind: StorageKind) -> Self {
        match kind {
            StorageKind::Scalar1 => BlockValue::Scalar(0.0),
            StorageKind::Vector3 => BlockValue::Vector3(Vector3::zeros()),
            StorageKind::Quaternion4 => BlockValue::Quaternion(UnitQuaternion::identity()),
        }
    }

    /// Reads a value of `kind` from its storage slice.
    /// Quaternions are stored as `[x, y, z, w]` and renormalized on read.
    /// A zero-norm or non-finite quaternion slot was corrupted by a raw
    /// write and panics rather than yielding NaNs.
    pub(crate) fn read(kind: StorageKind, raw: &[f64]) -> Self {
        debug_assert_eq!(raw.len(), kind.storage_width());
        match kind {
            StorageKind::Scalar1 => BlockValue::Scalar(raw[0]),
            StorageKind::Vector3 => BlockValue::Vector3(Vector3::new(raw[0], raw[1], raw[2])),
            StorageKind::Quaternion4 => {
                let q = Quaternion::new(raw[3], raw[0], raw[1], raw[2]);
                match UnitQuaternion::try_new(q, MIN_QUATERNION_NORM) {
                    Some(unit) if unit.coords.iter().all(|c| c.is_finite()) => {
                        BlockValue::Quaternion(unit)
                    }
                    _ => panic!("quaternion slot holds {:?}, which is not a rotation", raw),
                }
            }
        }
    }

    /// Writes the value into its storage slice.
    pub(crate) fn write(&self, raw: &mut [f64]) {
        debug_assert_eq!(raw.len(), self.kind().storage_width());
        match self {
            BlockValue::Scalar(s) => raw[0] = *s,
            BlockValue::Vector3(v) => raw.copy_from_slice(v.as_slice()),
            BlockValue::Quaternion(q) => raw.copy_from_slice(q.coords.as_slice()),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            BlockValue::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_vector3(&self) -> Option<Vector3<f64>> {
        match self {
            BlockValue::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_quaternion(&self) -> Option<UnitQuaternion<f64>> {
        match self {
            BlockValue::Quaternion(q) => Some(*q),
            _ => None,
        }
    }
}

impl From<f64> for BlockValue {
    fn from(value: f64) -> Self {
        BlockValue::Scalar(value)
    }
}

impl From<Vector3<f64>> for BlockValue {
    fn from(value: Vector3<f64>) -> Self {
        BlockValue::Vector3(value)
    }
}

impl From<UnitQuaternion<f64>> for BlockValue {
    fn from(value: UnitQuaternion<f64>) -> Self {
        BlockValue::Quaternion(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quaternion_is_stored_xyzw() {
        let q = UnitQuaternion::from_euler_angles(0.1, -0.2, 0.3);
        let mut raw = [0.0; 4];
        BlockValue::Quaternion(q).write(&mut raw);
        assert_eq!(raw, [q.i, q.j, q.k, q.w]);

        let back = BlockValue::read(StorageKind::Quaternion4, &raw)
            .as_quaternion()
            .unwrap();
        assert_relative_eq!(back.coords, q.coords, epsilon = 1e-12);
    }

    #[test]
    fn slightly_denormalized_quaternion_is_renormalized() {
        let q = BlockValue::read(StorageKind::Quaternion4, &[0.0, 0.0, 0.0, 1.001])
            .as_quaternion()
            .unwrap();
        assert_relative_eq!(q.coords, UnitQuaternion::identity().coords, epsilon = 1e-12);
    }

    #[test]
    #[should_panic(expected = "not a rotation")]
    fn zero_quaternion_panics_on_read() {
        BlockValue::read(StorageKind::Quaternion4, &[0.0; 4]);
    }

    #[test]
    #[should_panic(expected = "not a rotation")]
    fn nan_quaternion_panics_on_read() {
        BlockValue::read(StorageKind::Quaternion4, &[f64::NAN, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn defaults_match_kind() {
        for kind in [StorageKind::Scalar1, StorageKind::Vector3, StorageKind::Quaternion4] {
            assert_eq!(BlockValue::default_for(kind).kind(), kind);
        }
        assert_eq!(
            BlockValue::default_for(StorageKind::Quaternion4).as_quaternion(),
            Some(UnitQuaternion::identity())
        );
    }

    #[test]
    fn typed_accessors_reject_other_kinds() {
        let v = BlockValue::from(Vector3::new(1.0, 2.0, 3.0));
        assert!(v.as_scalar().is_none());
        assert!(v.as_quaternion().is_none());
        assert_eq!(v.as_vector3(), Some(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(BlockValue::from(2.5).as_scalar(), Some(2.5));
    }
}
