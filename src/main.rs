use clap::{Parser, Subcommand};
use cloudinary_tags::breakpoints::{self, ConfigurationError};
use cloudinary_tags::picture::SourceEntry;
use cloudinary_tags::srcset::{SrcsetOptions, SrcsetParam};
use cloudinary_tags::tags::ImageOptions;
use cloudinary_tags::transformation::Transformation;
use cloudinary_tags::{config, image_tag, output, picture_tag};
use std::path::PathBuf;

/// Shared flags describing a srcset.
#[derive(clap::Args, Clone)]
struct SrcsetArgs {
    /// Explicit breakpoint widths, comma separated
    #[arg(long, value_delimiter = ',')]
    breakpoints: Option<Vec<u32>>,

    /// Smallest generated width
    #[arg(long)]
    min_width: Option<u32>,

    /// Largest generated width (always the last breakpoint)
    #[arg(long)]
    max_width: Option<u32>,

    /// Number of widths to spread across the range
    #[arg(long)]
    max_images: Option<u32>,

    /// Pre-formatted srcset value, emitted unchanged
    #[arg(long, conflicts_with_all = ["breakpoints", "min_width", "max_width", "max_images"])]
    srcset_raw: Option<String>,

    /// Transformation for srcset candidates instead of the tag's own
    #[arg(long)]
    srcset_transformation: Option<Transformation>,

    /// Also emit a sizes attribute
    #[arg(long)]
    sizes: bool,
}

impl SrcsetArgs {
    fn has_widths(&self) -> bool {
        self.breakpoints.is_some()
            || self.min_width.is_some()
            || self.max_width.is_some()
            || self.max_images.is_some()
    }

    /// The srcset these flags describe.
    ///
    /// Without width flags, `--sizes` and `--srcset-transformation` apply on
    /// top of the config default. `None` when no srcset flag was given.
    fn to_param(&self, defaults: Option<&SrcsetOptions>) -> Option<SrcsetParam> {
        if let Some(raw) = &self.srcset_raw {
            return Some(SrcsetParam::Raw(raw.clone()));
        }
        if self.has_widths() {
            return Some(SrcsetParam::Options(SrcsetOptions {
                breakpoints: self.breakpoints.clone(),
                min_width: self.min_width,
                max_width: self.max_width,
                max_images: self.max_images,
                transformation: self.srcset_transformation.clone(),
                sizes: self.sizes,
            }));
        }
        if !self.sizes && self.srcset_transformation.is_none() {
            return None;
        }
        let mut options = defaults.cloned().unwrap_or_default();
        options.sizes |= self.sizes;
        if let Some(t) = &self.srcset_transformation {
            options.transformation = Some(t.clone());
        }
        Some(SrcsetParam::Options(options))
    }
}

/// Shared flags for the tag-building commands.
#[derive(clap::Args, Clone)]
struct TagArgs {
    /// Public id of the asset, e.g. sample.jpg
    public_id: String,

    /// Transformation in URL form, e.g. c_fill,h_400,w_400
    #[arg(short, long, default_value = "")]
    transformation: Transformation,

    /// File extension appended to the public id
    #[arg(long)]
    format: Option<String>,

    /// Asset version, rendered as a v<N> path segment
    #[arg(long = "asset-version")]
    asset_version: Option<u64>,

    /// alt attribute for the img
    #[arg(long)]
    alt: Option<String>,

    /// class attribute for the img
    #[arg(long)]
    class: Option<String>,

    /// Print each tag's attributes after the markup
    #[arg(long)]
    explain: bool,

    /// Print the attribute mapping as JSON instead of markup
    #[arg(long, conflicts_with = "explain")]
    json: bool,

    #[command(flatten)]
    srcset: SrcsetArgs,
}

impl TagArgs {
    fn image_options(&self, config: &config::Config) -> ImageOptions {
        ImageOptions {
            transformation: self.transformation.clone(),
            srcset: self.srcset.to_param(config.srcset.as_ref()),
            format: self.format.clone(),
            version: self.asset_version,
            alt: self.alt.clone(),
            class: self.class.clone(),
        }
    }
}

#[derive(Parser)]
#[command(name = "cloudtags")]
#[command(about = "Responsive img/picture tags for hosted image delivery")]
#[command(long_about = "\
Responsive img/picture tags for hosted image delivery

Builds delivery URLs and srcset/sizes attributes from a public id and a
transformation, and prints the resulting markup.

Examples:

  cloudtags --cloud-name demo image sample.jpg -t e_sepia \\
      --breakpoints 100,200,300,399 --sizes

  cloudtags --cloud-name demo image sample.jpg \\
      --min-width 100 --max-width 399 --max-images 4

  cloudtags --cloud-name demo picture sample.jpg -t c_fill,h_399,w_399 \\
      --source 300=a_17,c_scale,e_sepia,w_399 \\
      --source 200=a_18,c_scale,e_colorize,w_200

Run 'cloudtags gen-config' to generate a documented cloudtags.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "cloudtags.toml", global = true)]
    config: PathBuf,

    /// Cloud name (overrides the config file)
    #[arg(long, global = true)]
    cloud_name: Option<String>,

    /// Emit https URLs (overrides the config file)
    #[arg(long, global = true)]
    secure: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print an <img> tag
    Image(TagArgs),
    /// Print a <picture> tag with one <source> per --source
    Picture {
        #[command(flatten)]
        tag: TagArgs,

        /// Source as MIN[:MAX]=TRANSFORMATION, repeatable, kept in order
        #[arg(long = "source")]
        sources: Vec<SourceEntry>,
    },
    /// Print the widths a srcset would use
    Breakpoints(SrcsetArgs),
    /// Print a stock cloudtags.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Image(args) => {
            let config = load_config(&cli)?;
            let tag = image_tag(&args.public_id, &args.image_options(&config), &config)?;
            if args.json {
                println!("{}", output::format_tag_json(&tag.attributes())?);
            } else {
                output::print_tag(&tag, &tag.attributes(), args.explain);
            }
        }
        Command::Picture { tag, sources } => {
            let config = load_config(&cli)?;
            let picture = picture_tag(&tag.public_id, &tag.image_options(&config), sources, &config)?;
            if tag.json {
                println!("{}", output::format_picture_json(&picture)?);
            } else {
                output::print_picture(&picture, tag.explain);
            }
        }
        Command::Breakpoints(args) => {
            let config = load_config(&cli)?;
            let spec = match args.to_param(config.srcset.as_ref()) {
                Some(param) => param.breakpoint_spec()?,
                None => match &config.srcset {
                    Some(defaults) => defaults.breakpoint_spec()?,
                    None => return Err(ConfigurationError::MissingBreakpoints.into()),
                },
            };
            output::print_breakpoints(&breakpoints::resolve(&spec)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `--config`, layered under the command-line overrides.
fn load_config(cli: &Cli) -> Result<config::Config, config::ConfigError> {
    config::load_config(&cli.config, flag_overrides(cli))
}

/// Command-line flags as a TOML overlay for the config layers.
fn flag_overrides(cli: &Cli) -> Option<toml::Value> {
    let mut cloud = toml::map::Map::new();
    if let Some(name) = &cli.cloud_name {
        cloud.insert("cloud_name".into(), toml::Value::String(name.clone()));
    }
    if cli.secure {
        cloud.insert("secure".into(), toml::Value::Boolean(true));
    }
    if cloud.is_empty() {
        return None;
    }
    let mut root = toml::map::Map::new();
    root.insert("cloud".into(), toml::Value::Table(cloud));
    Some(toml::Value::Table(root))
}
