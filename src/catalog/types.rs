//! Shared catalog types and data structures
//!
//! The opendatasoft search API wraps every record in a `fields` object in
//! which no member is guaranteed present. Everything here is `Option` and
//! the formatting layer owns the fallback chains.

use serde::Deserialize;

/// Catalog search response: total hit count plus one page of records.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    /// Total number of hits for the query, across all pages
    #[serde(default)]
    pub nhits: usize,
    /// Records of the requested page
    #[serde(default)]
    pub records: Vec<TreeRecord>,
}

/// One catalog entry. The portal also returns `recordid`, geometry and
/// timestamps; only `fields` carries displayable data.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TreeRecord {
    #[serde(default)]
    pub fields: TreeFields,
}

/// Nested field bag of a tree record. Field names follow the dataset
/// schema: `com_*` members come from the curated commentary layer,
/// `arbres_*` from the raw tree census.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TreeFields {
    /// Common (usual) name
    pub com_nom_usuel: Option<String>,
    /// French species label from the census
    pub arbres_libellefrancais: Option<String>,
    /// Latin name, already joined
    pub com_nom_latin: Option<String>,
    /// Genus, to be joined with the species when no latin name is given
    pub arbres_genre: Option<String>,
    /// Species epithet
    pub arbres_espece: Option<String>,

    /// Street address (curated)
    pub com_adresse: Option<String>,
    /// Street address (census)
    pub arbres_adresse: Option<String>,
    /// District / arrondissement (curated)
    pub com_arrondissement: Option<String>,
    /// District / arrondissement (census)
    pub arbres_arrondissement: Option<String>,

    /// Height in metres
    pub arbres_hauteurenm: Option<f64>,
    /// Trunk circumference in centimetres
    pub arbres_circonferenceencm: Option<f64>,

    /// Planting year (curated)
    pub com_annee_plantation: Option<String>,
    /// Full planting date `YYYY-MM-DD...` (census)
    pub arbres_dateplantation: Option<String>,

    /// Why the tree is considered remarkable
    pub com_qualification_rem: Option<String>,
    /// Land domain the tree stands on (curated)
    pub com_domanialite: Option<String>,
    /// Land domain (census)
    pub arbres_domanialite: Option<String>,

    /// Short free-text description
    pub com_resume: Option<String>,
    /// Photo URL
    pub com_url_photo1: Option<String>,
}
