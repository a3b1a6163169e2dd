//! # Canonical Catalog of Administrative Units
//!
//! The ground truth for the 46 municipalities of Guanajuato (state 11).
//! Every other component resolves codes and names through a [`Catalog`];
//! the embedded list is versioned with [`CATALOG_VERSION`] and never loaded
//! at runtime.
//!
//! ## Invariant
//!
//! A catalog holds exactly one unit per compact code and exactly one unit
//! per data code, and every data code equals `state || pad3(compact)`.
//! [`Catalog::new`] rejects any list that breaks this, so both code maps are
//! bijections over the same domain.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// State prefix for this deployment (Guanajuato in the INEGI numbering).
pub const STATE_CODE: u16 = 11;

/// Version tag of the embedded unit list.
pub const CATALOG_VERSION: &str = "inegi-mgm-2020.1";

/// Integer identifying a unit inside geometry sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompactCode(pub u16);

impl CompactCode {
    /// Access the inner integer.
    pub fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for CompactCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for CompactCode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// Five-digit string identifying a unit inside tabular sources.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataCode(String);

impl DataCode {
    /// Reconstruct the data code from its two components: the state prefix
    /// and the compact code zero-padded to three digits.
    pub fn compose(state_code: u16, compact_code: u16) -> Self {
        Self(format!("{state_code:02}{compact_code:03}"))
    }

    /// Parse a data code, requiring exactly five ASCII digits.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        let trimmed = s.trim();
        if trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(CatalogError::MalformedDataCode(s.to_string()))
        }
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DataCode {
    type Error = CatalogError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DataCode> for String {
    fn from(code: DataCode) -> Self {
        code.0
    }
}

impl AsRef<str> for DataCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A municipality as recorded in the canonical catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrativeUnit {
    /// Code used by geometry sources.
    pub compact_code: CompactCode,
    /// Code used by tabular sources.
    pub data_code: DataCode,
    /// Name as published in the official gazetteer.
    pub official_name: String,
    /// Shorter name in everyday use, when it differs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
}

impl AdministrativeUnit {
    /// Whether `name` equals the official or common name, ignoring case and
    /// surrounding whitespace. Accents are significant: "Leon" is not "León".
    pub fn matches_name(&self, name: &str) -> bool {
        let wanted = normalize_name(name);
        normalize_name(&self.official_name) == wanted
            || self
                .common_name
                .as_deref()
                .is_some_and(|common| normalize_name(common) == wanted)
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The canonical list of units for one state, indexed by both codes and by
/// name.
#[derive(Debug, Clone)]
pub struct Catalog {
    state_code: u16,
    version: String,
    units: Vec<AdministrativeUnit>,
    by_compact: HashMap<CompactCode, usize>,
    by_data_code: HashMap<DataCode, usize>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, enforcing the bijection invariant.
    pub fn new(
        state_code: u16,
        version: impl Into<String>,
        units: Vec<AdministrativeUnit>,
    ) -> Result<Self, CatalogError> {
        let mut by_compact = HashMap::with_capacity(units.len());
        let mut by_data_code = HashMap::with_capacity(units.len());
        for (idx, unit) in units.iter().enumerate() {
            DataCode::parse(unit.data_code.as_str())?;
            if DataCode::compose(state_code, unit.compact_code.get()) != unit.data_code {
                return Err(CatalogError::InconsistentCodes {
                    compact_code: unit.compact_code.get(),
                    data_code: unit.data_code.to_string(),
                    state_code,
                });
            }
            if by_compact.insert(unit.compact_code, idx).is_some() {
                return Err(CatalogError::DuplicateCompactCode(unit.compact_code.get()));
            }
            if by_data_code.insert(unit.data_code.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateDataCode(unit.data_code.to_string()));
            }
        }
        Ok(Self::assemble(state_code, version.into(), units, by_compact, by_data_code))
    }

    /// The embedded catalog for Guanajuato, built once per process.
    pub fn guanajuato() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            let units = guanajuato_units();
            let by_compact = units
                .iter()
                .enumerate()
                .map(|(idx, u)| (u.compact_code, idx))
                .collect();
            let by_data_code = units
                .iter()
                .enumerate()
                .map(|(idx, u)| (u.data_code.clone(), idx))
                .collect();
            Self::assemble(STATE_CODE, CATALOG_VERSION.to_string(), units, by_compact, by_data_code)
        })
    }

    fn assemble(
        state_code: u16,
        version: String,
        units: Vec<AdministrativeUnit>,
        by_compact: HashMap<CompactCode, usize>,
        by_data_code: HashMap<DataCode, usize>,
    ) -> Self {
        let mut by_name = HashMap::with_capacity(units.len() * 2);
        for (idx, unit) in units.iter().enumerate() {
            by_name.entry(normalize_name(&unit.official_name)).or_insert(idx);
            if let Some(common) = &unit.common_name {
                by_name.entry(normalize_name(common)).or_insert(idx);
            }
        }
        Self {
            state_code,
            version,
            units,
            by_compact,
            by_data_code,
            by_name,
        }
    }

    /// State prefix shared by every data code in the catalog.
    pub fn state_code(&self) -> u16 {
        self.state_code
    }

    /// Version tag of the unit list.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All units, ordered by compact code as supplied.
    pub fn units(&self) -> &[AdministrativeUnit] {
        &self.units
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the catalog has no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Compact code → data code.
    pub fn data_code_of(&self, compact: CompactCode) -> Option<&DataCode> {
        self.unit_by_compact(compact).map(|u| &u.data_code)
    }

    /// Data code → compact code.
    pub fn compact_code_of(&self, data_code: &str) -> Option<CompactCode> {
        self.unit_by_data_code(data_code).map(|u| u.compact_code)
    }

    /// Compact code → unit.
    pub fn unit_by_compact(&self, compact: CompactCode) -> Option<&AdministrativeUnit> {
        self.by_compact.get(&compact).map(|&idx| &self.units[idx])
    }

    /// Data code → unit.
    pub fn unit_by_data_code(&self, data_code: &str) -> Option<&AdministrativeUnit> {
        let code = DataCode::parse(data_code).ok()?;
        self.by_data_code.get(&code).map(|&idx| &self.units[idx])
    }

    /// Case-insensitive name → unit, matching official or common names.
    pub fn unit_by_name(&self, name: &str) -> Option<&AdministrativeUnit> {
        self.by_name
            .get(&normalize_name(name))
            .map(|&idx| &self.units[idx])
    }
}

/// The 46 municipalities of Guanajuato: (compact code, official name, common name).
const GUANAJUATO: &[(u16, &str, Option<&str>)] = &[
    (1, "Abasolo", None),
    (2, "Acámbaro", None),
    (3, "San Miguel de Allende", Some("Allende")),
    (4, "Apaseo el Alto", None),
    (5, "Apaseo el Grande", None),
    (6, "Atarjea", None),
    (7, "Celaya", None),
    (8, "Manuel Doblado", Some("Ciudad Manuel Doblado")),
    (9, "Comonfort", None),
    (10, "Coroneo", None),
    (11, "Cortazar", None),
    (12, "Cuerámaro", None),
    (13, "Doctor Mora", None),
    (14, "Dolores Hidalgo Cuna de la Independencia Nacional", Some("Dolores Hidalgo")),
    (15, "Guanajuato", None),
    (16, "Huanímaro", None),
    (17, "Irapuato", None),
    (18, "Jaral del Progreso", None),
    (19, "Jerécuaro", None),
    (20, "León", None),
    (21, "Moroleón", None),
    (22, "Ocampo", None),
    (23, "Pénjamo", None),
    (24, "Pueblo Nuevo", None),
    (25, "Purísima del Rincón", None),
    (26, "Romita", None),
    (27, "Salamanca", None),
    (28, "Salvatierra", None),
    (29, "San Diego de la Unión", None),
    (30, "San Felipe", None),
    (31, "San Francisco del Rincón", None),
    (32, "San José Iturbide", None),
    (33, "San Luis de la Paz", None),
    (34, "Santa Catarina", None),
    (35, "Santa Cruz de Juventino Rosas", Some("Juventino Rosas")),
    (36, "Santiago Maravatío", None),
    (37, "Silao de la Victoria", Some("Silao")),
    (38, "Tarandacuao", None),
    (39, "Tarimoro", None),
    (40, "Tierra Blanca", None),
    (41, "Uriangato", None),
    (42, "Valle de Santiago", None),
    (43, "Victoria", None),
    (44, "Villagrán", None),
    (45, "Xichú", None),
    (46, "Yuriria", None),
];

/// The embedded unit list as owned values.
pub fn guanajuato_units() -> Vec<AdministrativeUnit> {
    GUANAJUATO
        .iter()
        .map(|&(compact, official, common)| AdministrativeUnit {
            compact_code: CompactCode(compact),
            data_code: DataCode::compose(STATE_CODE, compact),
            official_name: official.to_string(),
            common_name: common.map(str::to_string),
        })
        .collect()
}
