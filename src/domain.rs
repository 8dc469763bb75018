use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::KeggError;

static PATHWAY_ORG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(ko|ec|[a-z]{3})$").expect("organism regex"));
static PATHWAY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("pathway number regex"));
static PATHWAY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^path:(ko|ec|[a-z]{3})[0-9]{5}$").expect("pathway name regex"));
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color regex"));
static GENE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{3}:[0-9]{5}$").expect("gene name regex"));

/// Three-letter organism code, or the reference sets `ko` and `ec`.
pub fn is_valid_pathway_org(value: &str) -> bool {
    PATHWAY_ORG.is_match(value)
}

/// Five-digit pathway number.
pub fn is_valid_pathway_number(value: &str) -> bool {
    PATHWAY_NUMBER.is_match(value)
}

/// Composite pathway name `path:<org><number>`.
pub fn is_valid_pathway_name(value: &str) -> bool {
    PATHWAY_NAME.is_match(value)
}

pub fn is_valid_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Gene identifier `<org>:<5 digits>`.
pub fn is_valid_gene_name(value: &str) -> bool {
    GENE_NAME.is_match(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Ortholog,
    Enzyme,
    Reaction,
    Gene,
    Group,
    Compound,
    Map,
    Brite,
    Other,
}

impl EntryType {
    pub const ALL: [EntryType; 9] = [
        EntryType::Ortholog,
        EntryType::Enzyme,
        EntryType::Reaction,
        EntryType::Gene,
        EntryType::Group,
        EntryType::Compound,
        EntryType::Map,
        EntryType::Brite,
        EntryType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Ortholog => "ortholog",
            EntryType::Enzyme => "enzyme",
            EntryType::Reaction => "reaction",
            EntryType::Gene => "gene",
            EntryType::Group => "group",
            EntryType::Compound => "compound",
            EntryType::Map => "map",
            EntryType::Brite => "brite",
            EntryType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsType {
    Rectangle,
    Circle,
    RoundRectangle,
    Line,
}

impl GraphicsType {
    pub const ALL: [GraphicsType; 4] = [
        GraphicsType::Rectangle,
        GraphicsType::Circle,
        GraphicsType::RoundRectangle,
        GraphicsType::Line,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GraphicsType::Rectangle => "rectangle",
            GraphicsType::Circle => "circle",
            GraphicsType::RoundRectangle => "roundrectangle",
            GraphicsType::Line => "line",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    #[serde(rename = "ECrel")]
    EcRel,
    #[serde(rename = "PPrel")]
    PpRel,
    #[serde(rename = "GErel")]
    GeRel,
    #[serde(rename = "PCrel")]
    PcRel,
    #[serde(rename = "maplink")]
    Maplink,
}

impl RelationType {
    pub const ALL: [RelationType; 5] = [
        RelationType::EcRel,
        RelationType::PpRel,
        RelationType::GeRel,
        RelationType::PcRel,
        RelationType::Maplink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RelationType::EcRel => "ECrel",
            RelationType::PpRel => "PPrel",
            RelationType::GeRel => "GErel",
            RelationType::PcRel => "PCrel",
            RelationType::Maplink => "maplink",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RelationType::EcRel => "enzyme-enzyme relation",
            RelationType::PpRel => "protein-protein interaction",
            RelationType::GeRel => "gene expression interaction",
            RelationType::PcRel => "protein-compound interaction",
            RelationType::Maplink => "link to another map",
        }
    }
}

/// Relation subtype vocabulary of KGML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubtypeName {
    #[serde(rename = "compound")]
    Compound,
    #[serde(rename = "hidden compound")]
    HiddenCompound,
    #[serde(rename = "activation")]
    Activation,
    #[serde(rename = "inhibition")]
    Inhibition,
    #[serde(rename = "expression")]
    Expression,
    #[serde(rename = "repression")]
    Repression,
    #[serde(rename = "indirect effect")]
    IndirectEffect,
    #[serde(rename = "state change")]
    StateChange,
    #[serde(rename = "binding/association")]
    BindingAssociation,
    #[serde(rename = "dissociation")]
    Dissociation,
    #[serde(rename = "missing interaction")]
    MissingInteraction,
    #[serde(rename = "phosphorylation")]
    Phosphorylation,
    #[serde(rename = "dephosphorylation")]
    Dephosphorylation,
    #[serde(rename = "glycosylation")]
    Glycosylation,
    #[serde(rename = "ubiquitination")]
    Ubiquitination,
    #[serde(rename = "methylation")]
    Methylation,
}

impl SubtypeName {
    pub const ALL: [SubtypeName; 16] = [
        SubtypeName::Compound,
        SubtypeName::HiddenCompound,
        SubtypeName::Activation,
        SubtypeName::Inhibition,
        SubtypeName::Expression,
        SubtypeName::Repression,
        SubtypeName::IndirectEffect,
        SubtypeName::StateChange,
        SubtypeName::BindingAssociation,
        SubtypeName::Dissociation,
        SubtypeName::MissingInteraction,
        SubtypeName::Phosphorylation,
        SubtypeName::Dephosphorylation,
        SubtypeName::Glycosylation,
        SubtypeName::Ubiquitination,
        SubtypeName::Methylation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubtypeName::Compound => "compound",
            SubtypeName::HiddenCompound => "hidden compound",
            SubtypeName::Activation => "activation",
            SubtypeName::Inhibition => "inhibition",
            SubtypeName::Expression => "expression",
            SubtypeName::Repression => "repression",
            SubtypeName::IndirectEffect => "indirect effect",
            SubtypeName::StateChange => "state change",
            SubtypeName::BindingAssociation => "binding/association",
            SubtypeName::Dissociation => "dissociation",
            SubtypeName::MissingInteraction => "missing interaction",
            SubtypeName::Phosphorylation => "phosphorylation",
            SubtypeName::Dephosphorylation => "dephosphorylation",
            SubtypeName::Glycosylation => "glycosylation",
            SubtypeName::Ubiquitination => "ubiquitination",
            SubtypeName::Methylation => "methylation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Reversible,
    Irreversible,
}

impl ReactionType {
    pub const ALL: [ReactionType; 2] = [ReactionType::Reversible, ReactionType::Irreversible];

    pub fn as_str(self) -> &'static str {
        match self {
            ReactionType::Reversible => "reversible",
            ReactionType::Irreversible => "irreversible",
        }
    }
}

fn parse_vocabulary<T: Copy>(
    field: &'static str,
    value: &str,
    all: &[T],
    as_str: fn(T) -> &'static str,
) -> Result<T, KeggError> {
    all.iter()
        .copied()
        .find(|item| as_str(*item) == value)
        .ok_or_else(|| KeggError::InvalidField {
            field,
            value: value.to_string(),
        })
}

impl FromStr for EntryType {
    type Err = KeggError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_vocabulary("entry type", value, &Self::ALL, Self::as_str)
    }
}

impl FromStr for GraphicsType {
    type Err = KeggError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_vocabulary("graphics type", value, &Self::ALL, Self::as_str)
    }
}

impl FromStr for RelationType {
    type Err = KeggError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_vocabulary("relation type", value, &Self::ALL, Self::as_str)
    }
}

impl FromStr for SubtypeName {
    type Err = KeggError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_vocabulary("relation subtype name", value, &Self::ALL, Self::as_str)
    }
}

impl FromStr for ReactionType {
    type Err = KeggError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_vocabulary("reaction type", value, &Self::ALL, Self::as_str)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GraphicsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SubtypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
