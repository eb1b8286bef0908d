// msf_core/src/state/list.rs

use crate::state::descriptor::BlockDescriptor;
use crate::state::identifier::StateIdentifier;

/// The ordered "schema" of a filter state. Order is declaration order and is
/// significant: it determines every offset the resolver produces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateList {
    blocks: Vec<BlockDescriptor>,
}

impl StateList {
    pub fn new(blocks: Vec<BlockDescriptor>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&BlockDescriptor> {
        self.blocks.get(position)
    }

    /// Position of the first descriptor using `id`, if any.
    pub fn position_of(&self, id: StateIdentifier) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockDescriptor> {
        self.blocks.iter()
    }

    pub fn as_slice(&self) -> &[BlockDescriptor] {
        &self.blocks
    }
}

impl From<Vec<BlockDescriptor>> for StateList {
    fn from(blocks: Vec<BlockDescriptor>) -> Self {
        Self::new(blocks)
    }
}

impl FromIterator<BlockDescriptor> for StateList {
    fn from_iter<I: IntoIterator<Item = BlockDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StateList {
    type Item = &'a BlockDescriptor;
    type IntoIter = std::slice::Iter<'a, BlockDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
