//! Canonical columns and header resolution.
//!
//! Registry spreadsheets spell their headers inconsistently (accents, case,
//! double spaces, the occasional typo). Each canonical field carries an
//! explicit list of accepted spellings that is resolved once per table into
//! fixed column indices.

use std::collections::BTreeMap;

use kpi_model::normalize_label;
use serde::Serialize;

use crate::error::{IngestError, Result, TableKind};

/// Semantic type expected in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Text,
    Category,
    Number,
    Date,
}

impl FieldKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Category => "Category",
            Self::Number => "Number",
            Self::Date => "Date",
        }
    }
}

/// A column a table is expected to carry.
pub trait ColumnSpec: Copy + Ord {
    /// Canonical header, reported when the column is missing.
    fn label(self) -> &'static str;
    /// Accepted spellings (the canonical label is always accepted).
    fn variants(self) -> &'static [&'static str];
    /// Whether a missing column aborts the pass.
    fn required(self) -> bool;
    /// Value type the normalizer reads from the column.
    fn kind(self) -> FieldKind;
}

/// Columns of the patient registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RegistryField {
    Department,
    Municipality,
    Provider,
    Age,
    HtaFlag,
    DmFlag,
    SystolicBp,
    DiastolicBp,
    LastBpDate,
    Hba1c,
    Hba1cDate,
    CreatinineDate,
    MicroalbuminuriaDate,
}

impl RegistryField {
    pub const ALL: [RegistryField; 13] = [
        Self::Department,
        Self::Municipality,
        Self::Provider,
        Self::Age,
        Self::HtaFlag,
        Self::DmFlag,
        Self::SystolicBp,
        Self::DiastolicBp,
        Self::LastBpDate,
        Self::Hba1c,
        Self::Hba1cDate,
        Self::CreatinineDate,
        Self::MicroalbuminuriaDate,
    ];
}

impl ColumnSpec for RegistryField {
    fn label(self) -> &'static str {
        match self {
            Self::Department => "DEPARTAMENTO DE RESIDENCIA",
            Self::Municipality => "MUNICIPIO DE RESIDENCIA",
            Self::Provider => "NOMBRE DE LA IPS QUE HACE SEGUIMIENTO",
            Self::Age => "EDAD",
            Self::HtaFlag => "DX CONFIRMADO HTA",
            Self::DmFlag => "DX CONFIRMADO DM",
            Self::SystolicBp => "TENSION ARTERIAL SISTOLICA",
            Self::DiastolicBp => "TENSION ARTERIAL DIASTOLICA",
            Self::LastBpDate => "FECHA DE LA ULTIMA TOMA DE PRESION ARTERIAL",
            Self::Hba1c => "HEMOGLOBINA GLICOSILADA",
            Self::Hba1cDate => "FECHA DE HEMOGLOBINA GLICOSILADA",
            Self::CreatinineDate => "FECHA DE CREATININA",
            Self::MicroalbuminuriaDate => "FECHA DE MICROALBUMINURIA",
        }
    }

    fn variants(self) -> &'static [&'static str] {
        match self {
            Self::Department => &["DEPARTAMENTO", "DPTO DE RESIDENCIA", "DPTO"],
            Self::Municipality => &["MUNICPIO DE RESIDENCIA", "MUNICIPIO", "MUNICPIO"],
            Self::Provider => &[
                "NOMBRE DE LA IPS QUE HACE SEGUIMEINTO",
                "IPS QUE HACE SEGUIMIENTO",
                "NOMBRE IPS",
                "IPS",
            ],
            Self::Age => &["EDAD (AÑOS)", "EDAD ANOS", "EDAD EN ANOS"],
            Self::HtaFlag => &["DX CONFIRMADO DE HTA", "DX HTA", "HTA"],
            Self::DmFlag => &["DX CONFIRMADO DE DM", "DX DM", "DM"],
            Self::SystolicBp => &[
                "TENSION ARTERIAL SITOLICA",
                "PRESION ARTERIAL SISTOLICA",
                "TAS",
                "PAS",
            ],
            Self::DiastolicBp => &[
                "TENSION ARTERIAL DIATOLICA",
                "PRESION ARTERIAL DIASTOLICA",
                "TAD",
                "PAD",
            ],
            Self::LastBpDate => &[
                "FECHA ULTIMA TOMA DE PRESION ARTERIAL",
                "FECHA DE LA ULTIMA TOMA DE TENSION ARTERIAL",
                "FECHA TOMA PA",
                "FECHA PA",
            ],
            Self::Hba1c => &[
                "HEMOGLOBINA GLUCOSILADA",
                "RESULTADO HBA1C",
                "HBA1C",
            ],
            Self::Hba1cDate => &[
                "FECHA DE HEMOGLOBINA GLUCOSILADA",
                "FECHA HBA1C",
                "FECHA DE HBA1C",
            ],
            Self::CreatinineDate => &["FECHA DE CREATINNA", "FECHA CREATININA"],
            Self::MicroalbuminuriaDate => &[
                "FECHA DE MICROALBUMINURA",
                "FECHA MICROALBUMINURIA",
            ],
        }
    }

    fn required(self) -> bool {
        matches!(self, Self::Department | Self::Municipality | Self::Provider)
    }

    fn kind(self) -> FieldKind {
        match self {
            Self::Department | Self::Municipality | Self::Provider => FieldKind::Text,
            Self::HtaFlag | Self::DmFlag => FieldKind::Category,
            Self::Age | Self::SystolicBp | Self::DiastolicBp | Self::Hba1c => FieldKind::Number,
            Self::LastBpDate | Self::Hba1cDate | Self::CreatinineDate | Self::MicroalbuminuriaDate => {
                FieldKind::Date
            }
        }
    }
}

/// Columns of the population reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PopulationField {
    Department,
    Municipality,
    Provider,
    HtaPopulation,
    DmPopulation,
}

impl PopulationField {
    pub const ALL: [PopulationField; 5] = [
        Self::Department,
        Self::Municipality,
        Self::Provider,
        Self::HtaPopulation,
        Self::DmPopulation,
    ];
}

impl ColumnSpec for PopulationField {
    fn label(self) -> &'static str {
        match self {
            Self::Department => "DEPARTAMENTO DE RESIDENCIA",
            Self::Municipality => "MUNICIPIO DE RESIDENCIA",
            Self::Provider => "NOMBRE DE LA IPS QUE HACE SEGUIMIENTO",
            Self::HtaPopulation => "POBLACION HTA",
            Self::DmPopulation => "POBLACION DM",
        }
    }

    fn variants(self) -> &'static [&'static str] {
        match self {
            Self::Municipality => &["MUNICPIO DE RESIDENCIA"],
            _ => &[],
        }
    }

    fn required(self) -> bool {
        true
    }

    fn kind(self) -> FieldKind {
        match self {
            Self::Department | Self::Municipality | Self::Provider => FieldKind::Text,
            Self::HtaPopulation | Self::DmPopulation => FieldKind::Number,
        }
    }
}

/// Header-to-index mapping resolved for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap<F: ColumnSpec> {
    indices: BTreeMap<F, usize>,
    missing: Vec<F>,
}

impl<F: ColumnSpec> HeaderMap<F> {
    /// Resolves `fields` against `headers`.
    ///
    /// The first header matching a field wins. Missing required fields are a
    /// fatal [`IngestError::MissingColumns`] naming every absent column;
    /// missing optional fields are recorded and read as empty.
    pub fn resolve(headers: &[String], fields: &[F], table: TableKind) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_label(h)).collect();
        let mut indices = BTreeMap::new();
        let mut missing = Vec::new();

        for &field in fields {
            let accepted: Vec<String> = std::iter::once(field.label())
                .chain(field.variants().iter().copied())
                .map(normalize_label)
                .collect();
            // Exact canonical spelling takes precedence over variants.
            let position = accepted
                .iter()
                .find_map(|wanted| normalized.iter().position(|h| h == wanted));
            match position {
                Some(index) => {
                    indices.insert(field, index);
                }
                None => missing.push(field),
            }
        }

        let fatal: Vec<String> = missing
            .iter()
            .filter(|field| field.required())
            .map(|field| field.label().to_string())
            .collect();
        if !fatal.is_empty() {
            return Err(IngestError::MissingColumns {
                table,
                columns: fatal,
            });
        }

        Ok(Self { indices, missing })
    }

    /// Column index of `field`, if present.
    pub fn index(&self, field: F) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    /// Optional fields that were not found.
    pub fn missing(&self) -> &[F] {
        &self.missing
    }

    /// Canonical labels of the missing optional fields.
    pub fn missing_labels(&self) -> Vec<String> {
        self.missing
            .iter()
            .map(|field| field.label().to_string())
            .collect()
    }
}
