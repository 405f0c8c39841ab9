//! Compose command
//!
//! Builds a session from `--layer` arguments and exports the artboard.

use crate::commands::{catalog, config};
use identikit_backend_raster::{ArtboardRenderer, AssetLibrary, DirectorySource, ExportPipeline};
use identikit_core::{AssetRef, ExportFormat, LayerProperties, SketchSession, TemplateImage};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// One `--layer` argument: `asset[@x,y[,width[,rotation]]]`
#[derive(Debug, Clone, PartialEq)]
pub struct LayerArg {
    pub asset: AssetRef,
    pub position: Option<[f64; 2]>,
    pub width: Option<f64>,
    pub rotation: Option<f64>,
}

impl FromStr for LayerArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (asset, transform) = match s.rsplit_once('@') {
            Some((asset, transform)) => (asset, Some(transform)),
            None => (s, None),
        };

        let asset = asset.trim();
        if asset.is_empty() {
            return Err(format!("missing asset in layer `{s}`"));
        }

        let mut arg = LayerArg {
            asset: AssetRef::new(asset),
            position: None,
            width: None,
            rotation: None,
        };

        let Some(transform) = transform else {
            return Ok(arg);
        };

        let values = transform
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number `{}` in layer `{s}`", v.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [x, y] => arg.position = Some([*x, *y]),
            [x, y, w] => {
                arg.position = Some([*x, *y]);
                arg.width = Some(*w);
            }
            [x, y, w, r] => {
                arg.position = Some([*x, *y]);
                arg.width = Some(*w);
                arg.rotation = Some(*r);
            }
            _ => return Err(format!("expected `x,y[,width[,rotation]]` in layer `{s}`")),
        }

        Ok(arg)
    }
}

/// Parsed `compose` arguments
pub struct ComposeOptions {
    pub layers: Vec<LayerArg>,
    pub assets: Option<PathBuf>,
    pub format: ExportFormat,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub no_template: bool,
    pub template_opacity: Option<f32>,
    pub template_image: Option<String>,
    pub include_template: bool,
    pub dump_json: bool,
}

/// Apply the layer arguments to a fresh session
pub fn build_session(session: &mut SketchSession, layers: &[LayerArg]) {
    for layer in layers {
        let id = session.add_from_catalog(layer.asset.clone());

        if let Some([x, y]) = layer.position {
            session.set_position(id, x, y);
        }

        let mut properties = LayerProperties::new();
        if let Some(width) = layer.width {
            properties = properties.with_width(width);
        }
        if let Some(rotation) = layer.rotation {
            properties = properties.with_rotation(rotation);
        }
        if !properties.is_empty() {
            session.set_properties(id, properties);
        }
    }
}

pub async fn run(options: ComposeOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor_config = config::load(options.config.as_deref())?;
    if options.include_template {
        editor_config.export.include_template = true;
    }

    let catalog = catalog::open(options.assets.as_deref())?;
    for layer in &options.layers {
        if !catalog.contains(&layer.asset) {
            warn!(asset = %layer.asset, "Asset is not in the catalog");
        }
    }

    let mut session = SketchSession::new(editor_config.clone());
    build_session(&mut session, &options.layers);

    if options.no_template {
        session.set_template_enabled(false);
    }
    if let Some(opacity) = options.template_opacity {
        session.set_template_opacity(opacity);
    }
    if let Some(image) = options.template_image {
        session.set_template_image(TemplateImage::Asset(AssetRef::new(image)));
    }

    info!("Composed sketch with {} layer(s)", session.layers().len());

    if options.dump_json {
        println!("{}", session.snapshot().to_json_pretty()?);
        return Ok(());
    }

    let library = match &options.assets {
        Some(dir) => AssetLibrary::new(DirectorySource::new(dir)),
        None => AssetLibrary::empty(),
    };
    let mut renderer = ArtboardRenderer::new(library);
    let pipeline = ExportPipeline::from_config(&editor_config);

    let exported = pipeline
        .export(&mut renderer, session.snapshot(), options.format)
        .await?;

    tokio::fs::create_dir_all(&options.output).await?;
    let path = exported.save_to(&options.output).await?;
    println!("Sketch written to {}", path.display());

    Ok(())
}
