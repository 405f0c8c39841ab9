//! Asset catalog
//!
//! Immutable mapping from facial-feature category to an ordered list of
//! asset references. The editor only reads from it.

use crate::error::CatalogError;
use crate::layer::AssetRef;
use std::path::Path;

/// Image file extensions recognized when scanning a directory
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One category of assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Key used in asset references (`eyes`, `nose`, ...)
    pub key: String,
    /// Display title
    pub title: String,
    /// Assets in display order
    pub assets: Vec<AssetRef>,
}

/// Ordered category → assets mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCatalog {
    categories: Vec<Category>,
}

/// Built-in face sketch categories: key, title, numbered assets, grouped asset range
const BUILTIN: &[(&str, &str, u32, (u32, u32))] = &[
    ("eyes", "Eyes", 12, (29, 40)),
    ("nose", "Nose", 12, (53, 64)),
    ("lips", "Lips", 12, (65, 76)),
    ("eyebrows", "Eyebrows", 12, (41, 52)),
    ("hair", "Hair", 12, (17, 28)),
    ("head", "Head", 10, (1, 10)),
    ("mustach", "Mustache", 12, (77, 88)),
    ("more", "More", 6, (11, 16)),
];

impl AssetCatalog {
    /// Build a catalog from categories
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The face sketch element catalog
    pub fn builtin() -> Self {
        let categories = BUILTIN
            .iter()
            .map(|&(key, title, numbered, (first_group, last_group))| {
                let numbered = (1..=numbered).map(|n| AssetRef::from_parts(key, &format!("{n:02}")));
                let grouped = (first_group..=last_group)
                    .map(|n| AssetRef::from_parts(key, &format!("Group {n}")));

                Category {
                    key: key.to_string(),
                    title: title.to_string(),
                    assets: numbered.chain(grouped).collect(),
                }
            })
            .collect();

        Self { categories }
    }

    /// Scan a directory whose subdirectories are categories
    ///
    /// Each image file becomes an asset named after its file stem. Categories
    /// and assets are sorted by name; empty subdirectories are skipped.
    pub fn from_dir(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CatalogError::NotFound(root.display().to_string()));
        }

        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();

        let mut categories = Vec::new();
        for dir in dirs {
            let Some(key) = dir.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };

            let mut names = Vec::new();
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                let is_image = path
                    .extension()
                    .map(|e| e.to_string_lossy().to_lowercase())
                    .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()));

                if is_image {
                    if let Some(stem) = path.file_stem() {
                        names.push(stem.to_string_lossy().to_string());
                    }
                }
            }
            if names.is_empty() {
                continue;
            }
            names.sort();

            categories.push(Category {
                title: title_case(&key),
                assets: names.iter().map(|n| AssetRef::from_parts(&key, n)).collect(),
                key,
            });
        }

        if categories.is_empty() {
            return Err(CatalogError::Empty(root.display().to_string()));
        }

        Ok(Self { categories })
    }

    /// Categories in display order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by key
    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Whether the catalog lists `asset`
    pub fn contains(&self, asset: &AssetRef) -> bool {
        self.category(asset.category())
            .is_some_and(|c| c.assets.contains(asset))
    }

    /// Iterate every asset in catalog order
    pub fn assets(&self) -> impl Iterator<Item = &AssetRef> {
        self.categories.iter().flat_map(|c| c.assets.iter())
    }

    /// Total number of assets
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.assets.len()).sum()
    }

    /// Whether the catalog has no assets
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
