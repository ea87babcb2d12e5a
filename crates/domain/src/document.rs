//! Compiled document: helper declarations plus rule definitions, in the
//! shape of a Home Assistant package.
//!
//! Key order is fixed by construction: helper domains appear in the order
//! they were first declared, objects within a domain likewise, and the
//! `automation` list comes last. Nothing depends on hash ordering.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::automation::Automation;
use crate::entity_ref::EntityRef;
use crate::error::DuplicateHelperError;
use crate::mode::Mode;
use crate::time::DwellDuration;

/// A helper entity the runtime should create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HelperDecl {
    Select { name: String, options: Vec<Mode> },
    Timer { name: String, duration: DwellDuration },
    Toggle { name: String },
}

/// All helpers of one integration domain (e.g. `input_boolean`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperSection {
    pub domain: String,
    pub entries: Vec<HelperEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperEntry {
    pub object_id: String,
    pub declared_by: &'static str,
    pub decl: HelperDecl,
}

impl Serialize for HelperSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.object_id, &entry.decl)?;
        }
        map.end()
    }
}

/// The single output artifact of a compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledDocument {
    helpers: Vec<HelperSection>,
    automations: Vec<Automation>,
}

impl CompiledDocument {
    /// Declare a helper entity.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateHelperError`] when `entity` is already declared.
    pub fn declare(
        &mut self,
        entity: &EntityRef,
        declared_by: &'static str,
        decl: HelperDecl,
    ) -> Result<(), DuplicateHelperError> {
        let position = self
            .helpers
            .iter()
            .position(|s| s.domain == entity.domain());
        let section = if let Some(index) = position {
            &mut self.helpers[index]
        } else {
            self.helpers.push(HelperSection {
                domain: entity.domain().to_string(),
                entries: Vec::new(),
            });
            let last = self.helpers.len() - 1;
            &mut self.helpers[last]
        };
        if let Some(existing) = section
            .entries
            .iter()
            .find(|e| e.object_id == entity.object_id())
        {
            return Err(DuplicateHelperError {
                entity_id: entity.to_string(),
                first: existing.declared_by,
                second: declared_by,
            });
        }
        section.entries.push(HelperEntry {
            object_id: entity.object_id().to_string(),
            declared_by,
            decl,
        });
        Ok(())
    }

    pub fn push_rule(&mut self, automation: Automation) {
        self.automations.push(automation);
    }

    #[must_use]
    pub fn helpers(&self) -> &[HelperSection] {
        &self.helpers
    }

    #[must_use]
    pub fn automations(&self) -> &[Automation] {
        &self.automations
    }

    /// Look up a rule by id.
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<&Automation> {
        self.automations.iter().find(|a| a.id == id)
    }

    /// Look up a helper declaration by entity id.
    #[must_use]
    pub fn helper(&self, entity_id: &str) -> Option<&HelperDecl> {
        let (domain, object_id) = entity_id.split_once('.')?;
        self.helpers
            .iter()
            .find(|s| s.domain == domain)?
            .entries
            .iter()
            .find(|e| e.object_id == object_id)
            .map(|e| &e.decl)
    }
}

impl Serialize for CompiledDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_rules = !self.automations.is_empty();
        let mut map = serializer.serialize_map(Some(self.helpers.len() + usize::from(has_rules)))?;
        for section in &self.helpers {
            map.serialize_entry(&section.domain, section)?;
        }
        if has_rules {
            map.serialize_entry("automation", &self.automations)?;
        }
        map.end()
    }
}
