//! Attribute arena: parent linking and level assignment.

use std::collections::HashMap;

use super::{Attribute, AttributeId};
use crate::domain::foundation::DexError;

/// Attributes keyed by name, with children stored as arena indices.
#[derive(Debug, Clone, Default)]
pub struct AttributeTree {
    attributes: Vec<Attribute>,
    index: HashMap<String, AttributeId>,
}

impl AttributeTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unlinked attribute. Names must be unique across the model.
    pub fn insert(&mut self, attribute: Attribute) -> Result<AttributeId, DexError> {
        if self.index.contains_key(attribute.name()) {
            return Err(DexError::DuplicateAttribute(attribute.name().to_string()));
        }
        let id = AttributeId(self.attributes.len());
        self.index.insert(attribute.name().to_string(), id);
        self.attributes.push(attribute);
        Ok(id)
    }

    /// Resolves every parent name into a back-reference and fills child lists.
    pub fn link(&mut self) -> Result<(), DexError> {
        for child in 0..self.attributes.len() {
            let Some(parent_name) = self.attributes[child].parent_name.clone() else {
                continue;
            };
            let parent = self.id_of(&parent_name)?;
            if parent.0 == child {
                return Err(DexError::CyclicHierarchy(parent_name));
            }
            self.attributes[child].parent = Some(parent);
            self.attributes[parent.0].children.push(AttributeId(child));
        }
        Ok(())
    }

    /// Post-order level assignment: leaves are 1, parents one above their deepest child.
    pub fn assign_levels(&mut self) -> Result<(), DexError> {
        let mut state = vec![Visit::New; self.attributes.len()];
        for id in 0..self.attributes.len() {
            self.level_of(id, &mut state)?;
        }
        Ok(())
    }

    fn level_of(&mut self, id: usize, state: &mut [Visit]) -> Result<usize, DexError> {
        match state[id] {
            Visit::Done => return Ok(self.attributes[id].level),
            Visit::InProgress => {
                return Err(DexError::CyclicHierarchy(self.attributes[id].name.clone()))
            }
            Visit::New => {}
        }

        state[id] = Visit::InProgress;
        let children: Vec<usize> = self.attributes[id].children.iter().map(|c| c.0).collect();
        let mut deepest = 0;
        for child in children {
            deepest = deepest.max(self.level_of(child, state)?);
        }
        let level = deepest + 1;
        self.attributes[id].level = level;
        state[id] = Visit::Done;
        Ok(level)
    }

    /// Marks an attribute as computed by a utility function.
    pub fn mark_computed(&mut self, id: AttributeId) {
        self.attributes[id.0].has_function = true;
    }

    /// Looks up an attribute id by name.
    pub fn id_of(&self, name: &str) -> Result<AttributeId, DexError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DexError::UnknownAttribute(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.index.get(name).map(|id| &self.attributes[id.0])
    }

    pub fn attribute(&self, id: AttributeId) -> &Attribute {
        &self.attributes[id.0]
    }

    /// Attributes in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.parent.is_none())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    InProgress,
    Done,
}
