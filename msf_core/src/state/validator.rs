// msf_core/src/state/validator.rs

//! Structural checks over a state definition.
//!
//! A broken ordering never crashes the filter. It silently misaligns Jacobian
//! rows and columns with the blocks they belong to. Every check here is
//! therefore fatal, and a layout cannot be built without passing all of them.

use crate::error::ConfigError;
use crate::state::descriptor::PropagationCategory;
use crate::state::identifier::StateIdentifier;
use crate::state::list::StateList;
use crate::state::offsets::{BlockOffsets, OffsetTable};

/// The propagated core, in the order the process-model Jacobian assumes.
pub const PROPAGATED_CORE: [StateIdentifier; 3] =
    [StateIdentifier::P, StateIdentifier::V, StateIdentifier::Q];

/// Rejects a list that declares the same identifier twice.
/// Runs before any offsets are computed.
pub fn check_unique(list: &StateList) -> Result<(), ConfigError> {
    let mut seen: [Option<usize>; StateIdentifier::COUNT] = [None; StateIdentifier::COUNT];
    for (position, block) in list.iter().enumerate() {
        let slot = &mut seen[block.id.index()];
        if let Some(first) = *slot {
            return Err(ConfigError::DuplicateIdentifier {
                id: block.id,
                first,
                second: position,
            });
        }
        *slot = Some(position);
    }
    Ok(())
}

/// Checks the category ordering: `[p, v, q]` propagated first, then the
/// unpropagated core, then auxiliaries only.
pub fn check_ordering(list: &StateList) -> Result<(), ConfigError> {
    let blocks = list.as_slice();

    // --- Propagated core run ---
    let propagated = blocks
        .iter()
        .take_while(|b| b.category == PropagationCategory::CoreWithPropagation)
        .count();
    if propagated == 0 {
        let reason = match blocks.first() {
            Some(b) => format!(
                "the state must start with the propagated core [p, v, q], found `{}` ({:?})",
                b.id, b.category
            ),
            None => "the state is empty; it must start with [p, v, q]".to_string(),
        };
        return Err(ConfigError::ordering(0, reason));
    }
    for (position, expected) in PROPAGATED_CORE.iter().enumerate() {
        match blocks.get(position) {
            Some(b) if position < propagated && b.id == *expected => {}
            Some(b) => {
                return Err(ConfigError::ordering(
                    position,
                    format!("expected propagated `{}`, found `{}` ({:?})", expected, b.id, b.category),
                ))
            }
            None => {
                return Err(ConfigError::ordering(
                    position,
                    format!("expected propagated `{}`, found end of state", expected),
                ))
            }
        }
    }
    if propagated > PROPAGATED_CORE.len() {
        let extra = &blocks[PROPAGATED_CORE.len()];
        return Err(ConfigError::ordering(
            PROPAGATED_CORE.len(),
            format!(
                "only [p, v, q] may be propagated by the core, found propagated `{}`",
                extra.id
            ),
        ));
    }

    // --- Unpropagated core run ---
    let core_end = propagated
        + blocks[propagated..]
            .iter()
            .take_while(|b| b.category == PropagationCategory::CoreWithoutPropagation)
            .count();

    // --- Auxiliary tail: once auxiliary, never core again ---
    for (offset, b) in blocks[core_end..].iter().enumerate() {
        if b.category.is_core() {
            return Err(ConfigError::ordering(
                core_end + offset,
                format!(
                    "core block `{}` ({:?}) declared after the first auxiliary block",
                    b.id, b.category
                ),
            ));
        }
    }
    Ok(())
}

/// Checks resolved entries against the intrinsic widths of their storage
/// kind. Quaternions must report 4 stored scalars and 3 error-state dims.
pub fn check_block_dimensions(entries: &[BlockOffsets]) -> Result<(), ConfigError> {
    for e in entries {
        let expected_storage = e.kind.storage_width();
        let expected_manifold = e.kind.manifold_dim();
        if e.storage_width != expected_storage || e.manifold_dim != expected_manifold {
            return Err(ConfigError::InvalidBlockDimension {
                id: e.id,
                storage_width: e.storage_width,
                manifold_dim: e.manifold_dim,
                expected_storage,
                expected_manifold,
            });
        }
    }
    Ok(())
}

/// Cross-checks the resolved error-state size against the covariance size
/// the filter core allocated.
pub fn check_covariance_dim(table: &OffsetTable, expected: usize) -> Result<(), ConfigError> {
    let actual = table.total_manifold_dim();
    if actual != expected {
        return Err(ConfigError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Runs every check, in order, and reports the first failure.
pub fn validate(
    list: &StateList,
    table: &OffsetTable,
    expected_covariance_dim: usize,
) -> Result<(), ConfigError> {
    check_unique(list)?;
    check_ordering(list)?;
    check_block_dimensions(table.entries())?;
    check_covariance_dim(table, expected_covariance_dim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::descriptor::{BlockDescriptor, StorageKind};
    use StateIdentifier::*;
    use StorageKind::*;

    fn default_blocks() -> Vec<BlockDescriptor> {
        vec![
            BlockDescriptor::propagated(P, Vector3),
            BlockDescriptor::propagated(V, Vector3),
            BlockDescriptor::propagated(Q, Quaternion4),
            BlockDescriptor::core_static(BW, Vector3),
            BlockDescriptor::core_static(BA, Vector3),
            BlockDescriptor::auxiliary(L, Scalar1),
            BlockDescriptor::drifting(QWv, Quaternion4),
            BlockDescriptor::auxiliary(PWv, Vector3),
            BlockDescriptor::auxiliary(QIc, Quaternion4),
            BlockDescriptor::auxiliary(PIc, Vector3),
            BlockDescriptor::auxiliary(PIp, Vector3),
        ]
    }

    fn run(blocks: Vec<BlockDescriptor>, expected: usize) -> Result<(), ConfigError> {
        let list = StateList::new(blocks);
        check_unique(&list)?;
        let table = OffsetTable::resolve(&list);
        validate(&list, &table, expected)
    }

    #[test]
    fn default_list_is_accepted() {
        assert_eq!(run(default_blocks(), 30), Ok(()));
    }

    #[test]
    fn duplicate_quaternion_is_rejected() {
        let mut blocks = default_blocks();
        blocks[6] = BlockDescriptor::drifting(Q, Quaternion4);
        let err = check_unique(&StateList::new(blocks)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateIdentifier {
                id: Q,
                first: 2,
                second: 6
            }
        );
    }

    #[test]
    fn bias_before_propagated_core_is_rejected() {
        let mut blocks = default_blocks();
        let b_w = blocks.remove(3);
        blocks.insert(0, b_w);
        assert!(matches!(
            run(blocks, 30),
            Err(ConfigError::OrderingViolation { position: 0, .. })
        ));
    }

    #[test]
    fn bias_inside_propagated_core_is_rejected() {
        let mut blocks = default_blocks();
        let b_w = blocks.remove(3);
        blocks.insert(2, b_w);
        assert!(matches!(
            run(blocks, 30),
            Err(ConfigError::OrderingViolation { position: 2, .. })
        ));
    }

    #[test]
    fn swapped_position_and_velocity_are_rejected() {
        let mut blocks = default_blocks();
        blocks.swap(0, 1);
        assert!(matches!(
            run(blocks, 30),
            Err(ConfigError::OrderingViolation { position: 0, .. })
        ));
    }

    #[test]
    fn extra_propagated_block_is_rejected() {
        let mut blocks = default_blocks();
        blocks.insert(3, BlockDescriptor::propagated(PIp, Vector3));
        blocks.pop();
        assert!(matches!(
            run(blocks, 30),
            Err(ConfigError::OrderingViolation { position: 3, .. })
        ));
    }

    #[test]
    fn truncated_propagated_core_is_rejected() {
        let blocks = vec![
            BlockDescriptor::propagated(P, Vector3),
            BlockDescriptor::propagated(V, Vector3),
        ];
        assert!(matches!(
            run(blocks, 6),
            Err(ConfigError::OrderingViolation { position: 2, .. })
        ));
    }

    #[test]
    fn core_after_auxiliary_is_rejected() {
        let mut blocks = default_blocks();
        let b_a = blocks.remove(4);
        blocks.insert(5, b_a);
        assert!(matches!(
            run(blocks, 30),
            Err(ConfigError::OrderingViolation { position: 5, .. })
        ));
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(
            run(Vec::new(), 0),
            Err(ConfigError::OrderingViolation { position: 0, .. })
        ));
    }

    #[test]
    fn auxiliary_order_is_free() {
        let mut blocks = default_blocks();
        blocks[5..].reverse();
        assert_eq!(run(blocks, 30), Ok(()));
    }

    #[test]
    fn covariance_size_must_match() {
        assert_eq!(
            run(default_blocks(), 34),
            Err(ConfigError::DimensionMismatch {
                expected: 34,
                actual: 30
            })
        );
    }

    #[test]
    fn quaternion_reporting_storage_as_manifold_is_rejected() {
        let list = StateList::new(default_blocks());
        let mut entries = OffsetTable::resolve(&list).entries().to_vec();
        entries[2].manifold_dim = 4;
        assert_eq!(
            check_block_dimensions(&entries),
            Err(ConfigError::InvalidBlockDimension {
                id: Q,
                storage_width: 4,
                manifold_dim: 4,
                expected_storage: 4,
                expected_manifold: 3,
            })
        );
    }

    #[test]
    fn resolved_entries_pass_dimension_check() {
        let table = OffsetTable::resolve(&StateList::new(default_blocks()));
        assert_eq!(check_block_dimensions(table.entries()), Ok(()));
    }

    #[test]
    fn propagated_core_alone_is_accepted() {
        let blocks = default_blocks()[..3].to_vec();
        assert_eq!(run(blocks, 9), Ok(()));
    }
}
