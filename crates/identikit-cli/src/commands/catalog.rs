//! Catalog command

use identikit_core::AssetCatalog;
use std::path::Path;

/// Built-in catalog, or the one scanned from `assets`
pub fn open(assets: Option<&Path>) -> Result<AssetCatalog, identikit_core::CatalogError> {
    match assets {
        Some(dir) => AssetCatalog::from_dir(dir),
        None => Ok(AssetCatalog::builtin()),
    }
}

pub fn run(assets: Option<&Path>, full: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open(assets)?;

    println!("Asset Catalog");
    println!("=============\n");

    for category in catalog.categories() {
        println!("{:<12} {:>3} asset(s)", category.title, category.assets.len());
        if full {
            for asset in &category.assets {
                println!("  - {}", asset);
            }
        }
    }

    println!();
    println!("Total: {} asset(s)", catalog.len());
    Ok(())
}
