//! Record formatting: turns the optional-field soup of a [`TreeRecord`]
//! into a displayable card.
//!
//! Every display field has an ordered fallback chain; a record with no
//! usable fields at all still yields a card with the generic title.

use super::types::{TreeFields, TreeRecord};

/// Title used when a record carries no name field at all.
pub const FALLBACK_TITLE: &str = "Arbre remarquable";

/// Descriptions at or above this length are dropped from the detail list.
pub const MAX_DESCRIPTION_CHARS: usize = 150;

/// Photo affordance of a card: a link or an explicit placeholder,
/// never both.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoSection {
    Link(String),
    Unavailable,
}

/// One line of the card's detail list.
#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
}

impl Detail {
    fn new(icon: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            icon,
            label,
            value: value.into(),
        }
    }
}

/// Fully formatted record, ready for the card renderer or the CLI printer.
#[derive(Debug, Clone)]
pub struct TreeCard {
    pub title: String,
    pub details: Vec<Detail>,
    pub photo: PhotoSection,
}

impl TreeCard {
    pub fn from_record(record: &TreeRecord) -> Self {
        let fields = &record.fields;

        let title = format!("🌳 {}", display_title(fields));

        let mut details = Vec::new();

        if let Some(latin) = latin_name(fields) {
            details.push(Detail::new("🌿", "Nom latin", latin));
        }

        if let Some(adresse) = first_present(&fields.com_adresse, &fields.arbres_adresse) {
            details.push(Detail::new("📍", "Adresse", adresse));
        }

        if let Some(arrondissement) =
            first_present(&fields.com_arrondissement, &fields.arbres_arrondissement)
        {
            details.push(Detail::new("🏙️", "Arrondissement", arrondissement));
        }

        if let Some(hauteur) = fields.arbres_hauteurenm {
            details.push(Detail::new("📏", "Hauteur", format!("{} m", fmt_number(hauteur))));
        }

        if let Some(circonference) = fields.arbres_circonferenceencm {
            details.push(Detail::new(
                "📐",
                "Circonférence",
                format!("{} cm", fmt_number(circonference)),
            ));
        }

        if let Some(annee) = planting_year(fields) {
            details.push(Detail::new("🌱", "Planté en", annee));
        }

        if let Some(qualification) = &fields.com_qualification_rem {
            details.push(Detail::new("⭐", "Qualification", qualification.clone()));
        }

        if let Some(lieu) = first_present(&fields.com_domanialite, &fields.arbres_domanialite) {
            details.push(Detail::new("🏞️", "Lieu", lieu));
        }

        if let Some(resume) = &fields.com_resume {
            if resume.chars().count() < MAX_DESCRIPTION_CHARS {
                details.push(Detail::new("📝", "Description", resume.clone()));
            }
        }

        let photo = match &fields.com_url_photo1 {
            Some(url) => PhotoSection::Link(url.clone()),
            None => PhotoSection::Unavailable,
        };

        Self {
            title,
            details,
            photo,
        }
    }
}

/// Title fallback chain: usual name, then French species label, then the
/// generic default.
fn display_title(fields: &TreeFields) -> String {
    fields
        .com_nom_usuel
        .clone()
        .or_else(|| fields.arbres_libellefrancais.clone())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// Latin name comes either pre-joined or as genus + species.
fn latin_name(fields: &TreeFields) -> Option<String> {
    if let Some(latin) = &fields.com_nom_latin {
        return Some(latin.clone());
    }

    let joined = format!(
        "{} {}",
        fields.arbres_genre.as_deref().unwrap_or(""),
        fields.arbres_espece.as_deref().unwrap_or("")
    );
    let joined = joined.trim();

    if joined.is_empty() {
        None
    } else {
        Some(joined.to_string())
    }
}

/// Planting year: dedicated field, else the year component of the full
/// planting date.
fn planting_year(fields: &TreeFields) -> Option<String> {
    if let Some(annee) = &fields.com_annee_plantation {
        return Some(annee.clone());
    }

    fields
        .arbres_dateplantation
        .as_deref()
        .and_then(|date| date.split('-').next())
        .filter(|year| !year.is_empty())
        .map(|year| year.to_string())
}

fn first_present(curated: &Option<String>, census: &Option<String>) -> Option<String> {
    curated.clone().or_else(|| census.clone())
}

/// Print whole numbers without a trailing `.0`; the dataset mixes
/// integral and fractional measurements.
fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(fields: TreeFields) -> TreeRecord {
        TreeRecord { fields }
    }

    #[test]
    fn test_title_prefers_usual_name() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            com_nom_usuel: Some("Platane d'Orient".to_string()),
            arbres_libellefrancais: Some("Platane".to_string()),
            ..Default::default()
        }));
        assert_eq!(card.title, "🌳 Platane d'Orient");
    }

    #[test]
    fn test_title_falls_back_to_species_label() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            arbres_libellefrancais: Some("Hêtre".to_string()),
            ..Default::default()
        }));
        assert_eq!(card.title, "🌳 Hêtre");
    }

    #[test]
    fn test_title_generic_default_when_no_name_fields() {
        let card = TreeCard::from_record(&record_with(TreeFields::default()));
        assert_eq!(card.title, format!("🌳 {}", FALLBACK_TITLE));
    }

    #[test]
    fn test_latin_name_joined_from_genus_and_species() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            arbres_genre: Some("Platanus".to_string()),
            arbres_espece: Some("orientalis".to_string()),
            ..Default::default()
        }));
        assert_eq!(card.details[0].label, "Nom latin");
        assert_eq!(card.details[0].value, "Platanus orientalis");
    }

    #[test]
    fn test_latin_name_genus_only() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            arbres_genre: Some("Quercus".to_string()),
            ..Default::default()
        }));
        assert_eq!(card.details[0].value, "Quercus");
    }

    #[test]
    fn test_no_latin_detail_when_both_absent() {
        let card = TreeCard::from_record(&record_with(TreeFields::default()));
        assert!(card.details.iter().all(|d| d.label != "Nom latin"));
    }

    #[test]
    fn test_planting_year_derived_from_date() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            arbres_dateplantation: Some("1601-01-01T00:53:28+00:53".to_string()),
            ..Default::default()
        }));
        let annee = card.details.iter().find(|d| d.label == "Planté en").unwrap();
        assert_eq!(annee.value, "1601");
    }

    #[test]
    fn test_planting_year_prefers_dedicated_field() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            com_annee_plantation: Some("vers 1800".to_string()),
            arbres_dateplantation: Some("1850-01-01".to_string()),
            ..Default::default()
        }));
        let annee = card.details.iter().find(|d| d.label == "Planté en").unwrap();
        assert_eq!(annee.value, "vers 1800");
    }

    #[test]
    fn test_description_under_150_chars_is_kept() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            com_resume: Some("a".repeat(149)),
            ..Default::default()
        }));
        assert!(card.details.iter().any(|d| d.label == "Description"));
    }

    #[test]
    fn test_description_exactly_150_chars_is_dropped() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            com_resume: Some("a".repeat(150)),
            ..Default::default()
        }));
        assert!(card.details.iter().all(|d| d.label != "Description"));
    }

    #[test]
    fn test_photo_link_xor_placeholder() {
        let with_photo = TreeCard::from_record(&record_with(TreeFields {
            com_url_photo1: Some("https://example.org/arbre.jpg".to_string()),
            ..Default::default()
        }));
        assert_eq!(
            with_photo.photo,
            PhotoSection::Link("https://example.org/arbre.jpg".to_string())
        );

        let without = TreeCard::from_record(&record_with(TreeFields::default()));
        assert_eq!(without.photo, PhotoSection::Unavailable);
    }

    #[test]
    fn test_address_prefers_curated_field() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            com_adresse: Some("Jardin du Luxembourg".to_string()),
            arbres_adresse: Some("RUE GUYNEMER".to_string()),
            ..Default::default()
        }));
        let adresse = card.details.iter().find(|d| d.label == "Adresse").unwrap();
        assert_eq!(adresse.value, "Jardin du Luxembourg");
    }

    #[test]
    fn test_measurements_format_without_trailing_zero() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            arbres_hauteurenm: Some(30.0),
            arbres_circonferenceencm: Some(468.5),
            ..Default::default()
        }));
        let hauteur = card.details.iter().find(|d| d.label == "Hauteur").unwrap();
        assert_eq!(hauteur.value, "30 m");
        let circ = card
            .details
            .iter()
            .find(|d| d.label == "Circonférence")
            .unwrap();
        assert_eq!(circ.value, "468.5 cm");
    }

    #[test]
    fn test_detail_order_matches_display_order() {
        let card = TreeCard::from_record(&record_with(TreeFields {
            com_nom_latin: Some("Fagus sylvatica".to_string()),
            com_adresse: Some("Parc Monceau".to_string()),
            arbres_hauteurenm: Some(20.0),
            com_qualification_rem: Some("Remarquable".to_string()),
            ..Default::default()
        }));
        let labels: Vec<&str> = card.details.iter().map(|d| d.label).collect();
        assert_eq!(labels, vec!["Nom latin", "Adresse", "Hauteur", "Qualification"]);
    }
}
