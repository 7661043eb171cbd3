use boxwright_base::Guid;
use boxwright_topology::Solid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Enclosure,
    Lid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    Integer(i64),
    Number(f64),
    Bool(bool),
    Text(String),
}

pub type ParameterSet = BTreeMap<String, ParameterValue>;

/// A built part and the parameters it was built from.
#[derive(Clone, Debug, Serialize)]
pub struct Part {
    pub guid: Guid,
    pub name: String,
    pub kind: PartKind,
    pub parameters: ParameterSet,
    #[serde(skip_serializing)]
    pub geometry: Solid,
}

impl Part {
    pub fn new(
        name: impl Into<String>,
        kind: PartKind,
        parameters: ParameterSet,
        geometry: Solid,
    ) -> Self {
        Self {
            guid: Guid::new(),
            name: name.into(),
            kind,
            parameters,
            geometry,
        }
    }

    pub fn geometry(&self) -> &Solid {
        &self.geometry
    }
}
