//! Reference-data lookup.
//!
//! Makes, models, locations and the enum-like entities (transmissions, fuel
//! types, ...) are owned by the host application. The filter core only reads
//! them through [`ReferenceData`], and treats "not found" as an ordinary
//! answer.

use std::path::Path;
use std::sync::Arc;

use carmarket_search::{FilterField, FilterGroup};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::locale::Locale;

/// A name in both supported languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub en: String,
    #[serde(default)]
    pub ar: String,
}

impl LocalizedName {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Name for `locale`, falling back to English when no translation exists.
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ar if !self.ar.trim().is_empty() => &self.ar,
            _ => &self.en,
        }
    }
}

/// One row of reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub id: i64,
    #[serde(default)]
    pub slug: String,
    pub name: LocalizedName,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Number of listings, when the backend reports it (seller types).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_count: Option<u64>,
    /// Owning make, for models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make_id: Option<i64>,
}

fn default_active() -> bool {
    true
}

impl ReferenceEntry {
    pub fn new(id: i64, slug: impl Into<String>, name: LocalizedName) -> Self {
        Self {
            id,
            slug: slug.into(),
            name,
            is_active: true,
            listing_count: None,
            make_id: None,
        }
    }

    pub fn with_listing_count(mut self, count: u64) -> Self {
        self.listing_count = Some(count);
        self
    }

    pub fn with_make(mut self, make_id: i64) -> Self {
        self.make_id = Some(make_id);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Entities referenced by numeric ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Condition,
    Transmission,
    FuelType,
    BodyStyle,
    SellerType,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Condition => "condition",
            EntityKind::Transmission => "transmission",
            EntityKind::FuelType => "fuelType",
            EntityKind::BodyStyle => "bodyStyle",
            EntityKind::SellerType => "sellerType",
        }
    }

    /// The entity a single-ID filter group selects.
    pub fn for_group(group: FilterGroup) -> Option<EntityKind> {
        match group {
            FilterGroup::Transmission => Some(EntityKind::Transmission),
            FilterGroup::FuelType => Some(EntityKind::FuelType),
            FilterGroup::BodyStyle => Some(EntityKind::BodyStyle),
            FilterGroup::SellerType => Some(EntityKind::SellerType),
            _ => None,
        }
    }

    /// The entity an ID field refers to.
    pub fn for_field(field: FilterField) -> Option<EntityKind> {
        match field {
            FilterField::ConditionId => Some(EntityKind::Condition),
            FilterField::TransmissionId => Some(EntityKind::Transmission),
            FilterField::FuelTypeId => Some(EntityKind::FuelType),
            FilterField::BodyStyleId => Some(EntityKind::BodyStyle),
            FilterField::SellerTypeIds => Some(EntityKind::SellerType),
            _ => None,
        }
    }
}

/// Read-only lookup into the host's reference data.
pub trait ReferenceData {
    /// Make by slug.
    fn make(&self, slug: &str) -> Option<&ReferenceEntry>;

    /// Model by slug.
    fn model(&self, slug: &str) -> Option<&ReferenceEntry>;

    /// Location (governorate) by slug.
    fn location(&self, slug: &str) -> Option<&ReferenceEntry>;

    /// ID-referenced entity.
    fn entity(&self, kind: EntityKind, id: i64) -> Option<&ReferenceEntry>;

    /// Active models of a make, for the dependent model dropdown.
    fn models_for_make(&self, make_id: i64) -> Vec<&ReferenceEntry>;
}

impl<T: ReferenceData + ?Sized> ReferenceData for &T {
    fn make(&self, slug: &str) -> Option<&ReferenceEntry> {
        (**self).make(slug)
    }

    fn model(&self, slug: &str) -> Option<&ReferenceEntry> {
        (**self).model(slug)
    }

    fn location(&self, slug: &str) -> Option<&ReferenceEntry> {
        (**self).location(slug)
    }

    fn entity(&self, kind: EntityKind, id: i64) -> Option<&ReferenceEntry> {
        (**self).entity(kind, id)
    }

    fn models_for_make(&self, make_id: i64) -> Vec<&ReferenceEntry> {
        (**self).models_for_make(make_id)
    }
}

impl<T: ReferenceData + ?Sized> ReferenceData for Arc<T> {
    fn make(&self, slug: &str) -> Option<&ReferenceEntry> {
        (**self).make(slug)
    }

    fn model(&self, slug: &str) -> Option<&ReferenceEntry> {
        (**self).model(slug)
    }

    fn location(&self, slug: &str) -> Option<&ReferenceEntry> {
        (**self).location(slug)
    }

    fn entity(&self, kind: EntityKind, id: i64) -> Option<&ReferenceEntry> {
        (**self).entity(kind, id)
    }

    fn models_for_make(&self, make_id: i64) -> Vec<&ReferenceEntry> {
        (**self).models_for_make(make_id)
    }
}

/// In-memory reference data, usually loaded from the backend's JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCatalog {
    #[serde(default)]
    pub makes: Vec<ReferenceEntry>,
    #[serde(default)]
    pub models: Vec<ReferenceEntry>,
    #[serde(default)]
    pub locations: Vec<ReferenceEntry>,
    #[serde(default)]
    pub conditions: Vec<ReferenceEntry>,
    #[serde(default)]
    pub transmissions: Vec<ReferenceEntry>,
    #[serde(default)]
    pub fuel_types: Vec<ReferenceEntry>,
    #[serde(default)]
    pub body_styles: Vec<ReferenceEntry>,
    #[serde(default)]
    pub seller_types: Vec<ReferenceEntry>,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Entries for an ID-referenced entity kind.
    pub fn entries(&self, kind: EntityKind) -> &[ReferenceEntry] {
        match kind {
            EntityKind::Condition => &self.conditions,
            EntityKind::Transmission => &self.transmissions,
            EntityKind::FuelType => &self.fuel_types,
            EntityKind::BodyStyle => &self.body_styles,
            EntityKind::SellerType => &self.seller_types,
        }
    }

    pub fn with_make(mut self, entry: ReferenceEntry) -> Self {
        self.makes.push(entry);
        self
    }

    pub fn with_model(mut self, entry: ReferenceEntry) -> Self {
        self.models.push(entry);
        self
    }

    pub fn with_location(mut self, entry: ReferenceEntry) -> Self {
        self.locations.push(entry);
        self
    }

    pub fn with_entity(mut self, kind: EntityKind, entry: ReferenceEntry) -> Self {
        match kind {
            EntityKind::Condition => self.conditions.push(entry),
            EntityKind::Transmission => self.transmissions.push(entry),
            EntityKind::FuelType => self.fuel_types.push(entry),
            EntityKind::BodyStyle => self.body_styles.push(entry),
            EntityKind::SellerType => self.seller_types.push(entry),
        }
        self
    }
}

fn by_slug<'a>(entries: &'a [ReferenceEntry], slug: &str) -> Option<&'a ReferenceEntry> {
    entries.iter().find(|entry| entry.slug == slug)
}

impl ReferenceData for ReferenceCatalog {
    fn make(&self, slug: &str) -> Option<&ReferenceEntry> {
        by_slug(&self.makes, slug)
    }

    fn model(&self, slug: &str) -> Option<&ReferenceEntry> {
        by_slug(&self.models, slug)
    }

    fn location(&self, slug: &str) -> Option<&ReferenceEntry> {
        by_slug(&self.locations, slug)
    }

    fn entity(&self, kind: EntityKind, id: i64) -> Option<&ReferenceEntry> {
        self.entries(kind).iter().find(|entry| entry.id == id)
    }

    fn models_for_make(&self, make_id: i64) -> Vec<&ReferenceEntry> {
        self.models
            .iter()
            .filter(|model| model.make_id == Some(make_id) && model.is_active)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ReferenceCatalog {
        ReferenceCatalog::new()
            .with_make(ReferenceEntry::new(1, "toyota", LocalizedName::new("Toyota", "تويوتا")))
            .with_model(
                ReferenceEntry::new(10, "corolla", LocalizedName::new("Corolla", "كورولا")).with_make(1),
            )
            .with_model(
                ReferenceEntry::new(11, "celica", LocalizedName::new("Celica", ""))
                    .with_make(1)
                    .inactive(),
            )
            .with_entity(
                EntityKind::SellerType,
                ReferenceEntry::new(2, "dealer", LocalizedName::new("Dealer", "معرض")),
            )
    }

    #[test]
    fn test_localized_fallback() {
        let name = LocalizedName::new("Celica", "");
        assert_eq!(name.get(Locale::Ar), "Celica");
        assert_eq!(LocalizedName::new("Toyota", "تويوتا").get(Locale::Ar), "تويوتا");
    }

    #[test]
    fn test_lookups() {
        let catalog = catalog();
        assert_eq!(catalog.make("toyota").map(|m| m.id), Some(1));
        assert!(catalog.make("lada").is_none());
        assert_eq!(catalog.entity(EntityKind::SellerType, 2).map(|s| s.slug.as_str()), Some("dealer"));
        assert!(catalog.entity(EntityKind::FuelType, 2).is_none());
    }

    #[test]
    fn test_models_for_make_skips_inactive() {
        let catalog = catalog();
        let models: Vec<_> = catalog.models_for_make(1).iter().map(|m| m.id).collect();
        assert_eq!(models, vec![10]);
    }

    #[test]
    fn test_catalog_json() {
        let catalog = ReferenceCatalog::from_json_str(
            r#"{
                "makes": [{"id": 3, "slug": "kia", "name": {"en": "Kia", "ar": "كيا"}}],
                "sellerTypes": [{"id": 1, "name": {"en": "Private"}, "listingCount": 45}]
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.makes.len(), 1);
        assert!(catalog.makes[0].is_active);
        assert_eq!(catalog.seller_types[0].listing_count, Some(45));
        assert!(ReferenceCatalog::from_json_str("{\"makes\": 5}").is_err());
    }
}
