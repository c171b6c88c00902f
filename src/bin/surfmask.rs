use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use surfmask::{
    Affine, BackendFormat, BackingFit, Caps, CapsOptions, ClipOp, ColorSpace, ColorType,
    ContextOptions, GlCaps, GlStandard, GpuContext, IRect, ImageInfo, MaskAccumulator, MaskOpts,
    MetalCaps, MockCaps, PixelConfig, PixelGeometry, RecordingTextureProvider, Shape,
    SurfaceOrigin, SurfaceProps, TextureProvider as _, VulkanCaps,
};

#[derive(Parser, Debug)]
#[command(name = "surfmask", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a surface description and print the characterization as JSON.
    Characterize(CharacterizeArgs),
    /// Composite SVG paths into an A8 clip mask and write it as a grayscale PNG.
    Mask(MaskArgs),
}

#[derive(Parser, Debug)]
struct CharacterizeArgs {
    #[arg(long, value_enum, default_value_t = BackendChoice::Gl)]
    backend: BackendChoice,

    /// Native format code (decimal or 0x-prefixed hex). For `mock`, the pixel config id.
    #[arg(long, value_parser = parse_u32)]
    format: u32,

    #[arg(long, value_enum, default_value_t = ColorTypeChoice::Rgba8888)]
    color_type: ColorTypeChoice,

    #[arg(long, value_enum, default_value_t = ColorSpaceChoice::None)]
    color_space: ColorSpaceChoice,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    #[arg(long, default_value_t = 1)]
    samples: u32,

    #[arg(long)]
    mipmaps: bool,

    /// Target the default GL framebuffer.
    #[arg(long)]
    fbo0: bool,

    #[arg(long)]
    bottom_left: bool,

    /// Resource cache budget recorded in the characterization.
    #[arg(long)]
    cache_bytes: Option<usize>,

    /// Report no sRGB support from the backend.
    #[arg(long)]
    no_srgb: bool,

    /// Report no mipmap support from the backend.
    #[arg(long)]
    no_mipmaps_support: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Gl,
    Gles,
    Webgl,
    Vulkan,
    Metal,
    Mock,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorTypeChoice {
    Alpha8,
    Gray8,
    Rgb565,
    Rgba8888,
    Bgra8888,
    Rgba1010102,
    RgbaF16,
}

impl From<ColorTypeChoice> for ColorType {
    fn from(c: ColorTypeChoice) -> Self {
        match c {
            ColorTypeChoice::Alpha8 => ColorType::Alpha8,
            ColorTypeChoice::Gray8 => ColorType::Gray8,
            ColorTypeChoice::Rgb565 => ColorType::Rgb565,
            ColorTypeChoice::Rgba8888 => ColorType::Rgba8888,
            ColorTypeChoice::Bgra8888 => ColorType::Bgra8888,
            ColorTypeChoice::Rgba1010102 => ColorType::Rgba1010102,
            ColorTypeChoice::RgbaF16 => ColorType::RgbaF16,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorSpaceChoice {
    None,
    Srgb,
    SrgbLinear,
    DisplayP3,
}

impl From<ColorSpaceChoice> for ColorSpace {
    fn from(c: ColorSpaceChoice) -> Self {
        match c {
            ColorSpaceChoice::None => ColorSpace::None,
            ColorSpaceChoice::Srgb => ColorSpace::Srgb,
            ColorSpaceChoice::SrgbLinear => ColorSpace::SrgbLinear,
            ColorSpaceChoice::DisplayP3 => ColorSpace::DisplayP3,
        }
    }
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Device-space mask bounds as `left,top,right,bottom`.
    #[arg(long, value_parser = parse_irect)]
    bounds: IRect,

    /// Clip op for each `--path`, in order.
    #[arg(long = "op", required = true)]
    ops: Vec<ClipOp>,

    /// SVG path data for each element, in order.
    #[arg(long = "path", required = true)]
    paths: Vec<String>,

    /// Element alpha (0-255).
    #[arg(long, default_value_t = 255)]
    alpha: u8,

    /// Disable anti-aliasing.
    #[arg(long)]
    no_aa: bool,

    /// Fill paths with the even-odd rule.
    #[arg(long)]
    even_odd: bool,

    /// Allocate the texture with approx fit.
    #[arg(long)]
    approx: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Characterize(args) => cmd_characterize(args),
        Command::Mask(args) => cmd_mask(args),
    }
}

fn parse_u32(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

fn parse_irect(s: &str) -> Result<IRect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid bounds '{s}': {e}"))?;
    match parts.as_slice() {
        &[l, t, r, b] => Ok(IRect::from_ltrb(l, t, r, b)),
        _ => Err(format!("bounds '{s}' must have four comma-separated values")),
    }
}

fn make_caps(args: &CharacterizeArgs) -> Arc<dyn Caps> {
    let options = CapsOptions {
        srgb_support: !args.no_srgb,
        mipmap_support: !args.no_mipmaps_support,
        ..CapsOptions::default()
    };
    match args.backend {
        BackendChoice::Gl => Arc::new(GlCaps::new(GlStandard::Gl, options)),
        BackendChoice::Gles => Arc::new(GlCaps::new(GlStandard::Gles, options)),
        BackendChoice::Webgl => Arc::new(GlCaps::new(GlStandard::WebGl, options)),
        BackendChoice::Vulkan => Arc::new(VulkanCaps::new(options)),
        BackendChoice::Metal => Arc::new(MetalCaps::new(options)),
        BackendChoice::Mock => Arc::new(MockCaps::permissive(options)),
    }
}

fn make_format(backend: BackendChoice, code: u32) -> BackendFormat {
    match backend {
        BackendChoice::Gl | BackendChoice::Gles | BackendChoice::Webgl => BackendFormat::gl(code),
        BackendChoice::Vulkan => BackendFormat::vk(code),
        BackendChoice::Metal => BackendFormat::mtl(code),
        BackendChoice::Mock => BackendFormat::mock(PixelConfig::from_code(code)),
    }
}

fn cmd_characterize(args: CharacterizeArgs) -> anyhow::Result<()> {
    let context = GpuContext::new(make_caps(&args), ContextOptions::default());
    let proxy = context.thread_safe_proxy();

    let info = ImageInfo::new(
        args.width,
        args.height,
        args.color_type.into(),
        surfmask::AlphaType::Premul,
        args.color_space.into(),
    );
    let origin = if args.bottom_left {
        SurfaceOrigin::BottomLeft
    } else {
        SurfaceOrigin::TopLeft
    };
    let cache_bytes = args
        .cache_bytes
        .unwrap_or(proxy.options().resource_cache_limit_bytes);

    let characterization = proxy.create_characterization(
        cache_bytes,
        &info,
        &make_format(args.backend, args.format),
        args.samples,
        origin,
        &SurfaceProps::new(PixelGeometry::Unknown),
        args.mipmaps,
        args.fbo0,
    );

    let report = serde_json::json!({
        "valid": characterization.is_valid(),
        "characterization": characterization,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize characterization")?
    );
    Ok(())
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    if args.ops.len() != args.paths.len() {
        anyhow::bail!(
            "got {} --op values for {} --path values",
            args.ops.len(),
            args.paths.len()
        );
    }

    let fill_type = if args.even_odd {
        surfmask::FillType::EvenOdd
    } else {
        surfmask::FillType::Winding
    };
    let shapes = args
        .paths
        .iter()
        .map(|p| Shape::from_svg(p).map(|s| s.with_fill_type(fill_type)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut acc = MaskAccumulator::new(MaskOpts::from_env());
    acc.init(args.bounds)
        .with_context(|| format!("init mask for {:?}", args.bounds))?;
    for (shape, &op) in shapes.iter().zip(&args.ops) {
        acc.composite_shape(shape, Affine::IDENTITY, op, !args.no_aa, args.alpha)
            .with_context(|| format!("composite {op} element"))?;
    }

    let mut provider = RecordingTextureProvider::immediate();
    let fit = if args.approx {
        BackingFit::Approx
    } else {
        BackingFit::Exact
    };
    let proxy = acc
        .finalize(&mut provider, fit)
        .context("mask produced no texture (empty bounds or upload failure)")?;
    let image = provider
        .image(proxy.id())
        .context("uploaded mask image missing from provider")?;
    tracing::debug!(directly = provider.rendering_directly(), "mask uploaded");

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let gray = image::GrayImage::from_raw(image.width(), image.height(), image.to_tight_bytes())
        .context("mask bytes do not match image size")?;
    gray.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
