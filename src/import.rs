//! Entity importer: maps recognized tags in an assembled document onto
//! an in-memory genealogical graph.
//!
//! Recognized vocabulary: record tags `INDI` and `FAM`; field tags
//! `NAME`, `SEX`, `BIRT`, `DEAT`, `MARR`, `PLAC`, `DATE`, `HUSB`,
//! `WIFE`, `CHIL`. Anything else is ignored here, not rejected.
//!
//! Import runs in two passes: the first collects every record, the
//! second resolves cross-references, so a pointer may appear before the
//! record that defines its id.

use std::collections::HashSet;

use thiserror::Error;

use crate::document::{Document, Element};

/// Error type for the import phase.
#[derive(Error, Debug)]
pub enum ImportError {
    /// A pointer names an id that no record defines.
    #[error("Unresolved cross-reference \"{0}\"")]
    UnresolvedReference(String),
}

/// A dated and placed life event (birth, death, or marriage).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifeEvent {
    pub date: Option<String>,
    pub place: Option<String>,
}

/// An individual record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Individual {
    pub id: Option<String>,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub birth: Option<LifeEvent>,
    pub death: Option<LifeEvent>,
}

/// A family record. Members are held as cross-reference ids, resolved
/// against the tree's individuals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Family {
    pub id: Option<String>,
    pub husband: Option<String>,
    pub wife: Option<String>,
    pub children: Vec<String>,
    pub marriage: Option<LifeEvent>,
}

/// The imported entity graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyTree {
    individuals: Vec<Individual>,
    families: Vec<Family>,
}

impl FamilyTree {
    /// All individuals in document order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// All families in document order.
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    /// Look up an individual by cross-reference id.
    pub fn individual(&self, id: &str) -> Option<&Individual> {
        self.individuals
            .iter()
            .find(|i| i.id.as_deref() == Some(id))
    }

    /// Families in which the individual is husband or wife.
    pub fn spouse_families<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Family> {
        self.families
            .iter()
            .filter(move |f| f.husband.as_deref() == Some(id) || f.wife.as_deref() == Some(id))
    }
}

/// Import an assembled document into an entity graph.
pub fn import(document: &Document) -> Result<FamilyTree, ImportError> {
    // Pass one: collect every record.
    let mut tree = FamilyTree::default();
    for record in document.root().children() {
        match record.name() {
            "INDI" => tree.individuals.push(read_individual(record)),
            "FAM" => tree.families.push(read_family(record)),
            _ => {}
        }
    }

    // Pass two: every pointer must name a collected id.
    let ids: HashSet<&str> = tree
        .individuals
        .iter()
        .filter_map(|i| i.id.as_deref())
        .collect();
    for family in &tree.families {
        let members = family
            .husband
            .iter()
            .chain(family.wife.iter())
            .chain(family.children.iter());
        for idref in members {
            if !ids.contains(idref.as_str()) {
                return Err(ImportError::UnresolvedReference(idref.clone()));
            }
        }
    }

    Ok(tree)
}

fn read_individual(record: &Element) -> Individual {
    let mut individual = Individual {
        id: record.attr("id").map(String::from),
        ..Individual::default()
    };
    for field in record.children() {
        match field.name() {
            "NAME" => {
                if let Some(name) = field.attr("value") {
                    individual.name = Some(name.to_string());
                }
            }
            "SEX" => {
                if let Some(sex) = field.attr("value") {
                    individual.sex = Some(sex.to_string());
                }
            }
            "BIRT" => individual.birth = Some(read_life_event(field)),
            "DEAT" => individual.death = Some(read_life_event(field)),
            _ => {}
        }
    }
    individual
}

fn read_family(record: &Element) -> Family {
    let mut family = Family {
        id: record.attr("id").map(String::from),
        ..Family::default()
    };
    for field in record.children() {
        match field.name() {
            "MARR" => family.marriage = Some(read_life_event(field)),
            "HUSB" => {
                if let Some(idref) = field.attr("idref") {
                    family.husband = Some(idref.to_string());
                }
            }
            "WIFE" => {
                if let Some(idref) = field.attr("idref") {
                    family.wife = Some(idref.to_string());
                }
            }
            "CHIL" => {
                if let Some(idref) = field.attr("idref") {
                    family.children.push(idref.to_string());
                }
            }
            _ => {}
        }
    }
    family
}

fn read_life_event(field: &Element) -> LifeEvent {
    let mut event = LifeEvent::default();
    for detail in field.children() {
        match detail.name() {
            "DATE" => {
                if let Some(date) = detail.attr("value") {
                    event.date = Some(date.to_string());
                }
            }
            "PLAC" => {
                if let Some(place) = detail.attr("value") {
                    event.place = Some(place.to_string());
                }
            }
            _ => {}
        }
    }
    event
}
