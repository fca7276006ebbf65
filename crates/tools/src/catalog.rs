//! Scheme catalog loading
//!
//! The on-disk catalog is `{ "schemes": [...] }` JSON. A built-in default
//! table backs deployments without a catalog file; the server loads once at
//! startup and shares the table read-only.

use serde::Deserialize;
use std::path::Path;
use yojana_agent_core::{Category, EligibilityRules, Gender, Scheme};

use crate::ToolError;

#[derive(Deserialize)]
struct CatalogFile {
    schemes: Vec<Scheme>,
}

/// Load a catalog from a JSON file
pub fn load_catalog(path: &Path) -> Result<Vec<Scheme>, ToolError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ToolError::CatalogIo {
        path: path.display().to_string(),
        source,
    })?;
    let file: CatalogFile =
        serde_json::from_str(&raw).map_err(|source| ToolError::CatalogParse {
            path: path.display().to_string(),
            source,
        })?;

    tracing::info!(path = %path.display(), schemes = file.schemes.len(), "Loaded scheme catalog");
    Ok(file.schemes)
}

/// Load a catalog, falling back to the built-in table when the file is
/// missing or unreadable. A parse error of an existing file still fails:
/// silently ignoring a corrupt catalog would hide a deployment mistake.
pub fn load_catalog_or_default(path: &Path) -> Result<Vec<Scheme>, ToolError> {
    match load_catalog(path) {
        Ok(schemes) => Ok(schemes),
        Err(ToolError::CatalogIo { path, source }) => {
            tracing::warn!(%path, error = %source, "Catalog file unavailable, using built-in table");
            Ok(default_catalog())
        }
        Err(err) => Err(err),
    }
}

/// Built-in scheme table mirroring the catalog file shipped under `data/`
pub fn default_catalog() -> Vec<Scheme> {
    vec![
        Scheme {
            id: "PM_KISAN".to_string(),
            name_hindi: "पीएम-किसान सम्मान निधि".to_string(),
            name_english: "PM-KISAN".to_string(),
            description_hindi: "छोटे और सीमांत किसानों के लिए आय सहायता योजना".to_string(),
            benefits: "सालाना 6000 रुपये तीन किस्तों में".to_string(),
            eligibility: EligibilityRules {
                min_age: Some(18),
                max_income: Some(200_000.0),
                occupations: Some(vec!["farmer".to_string(), "agriculture".to_string()]),
                ..Default::default()
            },
        },
        Scheme {
            id: "VIDHWA_PENSION".to_string(),
            name_hindi: "विधवा पेंशन योजना".to_string(),
            name_english: "Widow Pension Scheme".to_string(),
            description_hindi: "विधवा महिलाओं के लिए मासिक पेंशन".to_string(),
            benefits: "मासिक 1500 रुपये पेंशन".to_string(),
            eligibility: EligibilityRules {
                min_age: Some(18),
                max_income: Some(150_000.0),
                gender: Some(Gender::Female),
                marital_status: Some("widowed".to_string()),
                ..Default::default()
            },
        },
        Scheme {
            id: "SCHOLARSHIP_SC_ST".to_string(),
            name_hindi: "अनुसूचित जाति/जनजाति छात्रवृत्ति".to_string(),
            name_english: "SC/ST Post-Matric Scholarship".to_string(),
            description_hindi: "एससी/एसटी छात्रों के लिए छात्रवृत्ति".to_string(),
            benefits: "शिक्षण शुल्क और मासिक भत्ता".to_string(),
            eligibility: EligibilityRules {
                max_age: Some(30),
                max_income: Some(250_000.0),
                categories: Some(vec![Category::Sc, Category::St]),
                is_student: Some(true),
                ..Default::default()
            },
        },
        Scheme {
            id: "DIVYANG_PENSION".to_string(),
            name_hindi: "दिव्यांग पेंशन योजना".to_string(),
            name_english: "Disability Pension Scheme".to_string(),
            description_hindi: "विकलांग व्यक्तियों के लिए मासिक सहायता".to_string(),
            benefits: "मासिक 1000 रुपये पेंशन".to_string(),
            eligibility: EligibilityRules {
                max_income: Some(200_000.0),
                has_disabilities: Some(true),
                ..Default::default()
            },
        },
        Scheme {
            id: "VRIDDHA_PENSION".to_string(),
            name_hindi: "वृद्धावस्था पेंशन योजना".to_string(),
            name_english: "Old Age Pension Scheme".to_string(),
            description_hindi: "वरिष्ठ नागरिकों के लिए मासिक पेंशन".to_string(),
            benefits: "मासिक 1200 रुपये पेंशन".to_string(),
            eligibility: EligibilityRules {
                min_age: Some(60),
                max_income: Some(100_000.0),
                ..Default::default()
            },
        },
        Scheme {
            id: "LADLI_BEHNA".to_string(),
            name_hindi: "लाडली बहना योजना".to_string(),
            name_english: "Ladli Behna Yojana".to_string(),
            description_hindi: "महिलाओं के लिए मासिक आर्थिक सहायता".to_string(),
            benefits: "मासिक 1250 रुपये".to_string(),
            eligibility: EligibilityRules {
                min_age: Some(21),
                max_age: Some(60),
                max_income: Some(250_000.0),
                gender: Some(Gender::Female),
                ..Default::default()
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_unique_ids() {
        let catalog = default_catalog();
        let mut ids: Vec<&str> = catalog.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = std::env::temp_dir().join("yojana_catalog_test_load");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("schemes.json");
        std::fs::write(
            &path,
            r#"{ "schemes": [ { "id": "X", "name_hindi": "टेस्ट", "eligibility": { "min_age": 18 } } ] }"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id, "X");
        assert_eq!(catalog[0].eligibility.min_age, Some(18));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let path = Path::new("/nonexistent/schemes.json");
        let catalog = load_catalog_or_default(path).unwrap();
        assert_eq!(catalog, default_catalog());
    }

    #[test]
    fn test_corrupt_file_does_not_fall_back() {
        let dir = std::env::temp_dir().join("yojana_catalog_test_corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("schemes.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_catalog_or_default(&path).unwrap_err();
        assert!(matches!(err, ToolError::CatalogParse { .. }));

        std::fs::remove_file(&path).ok();
    }
}
