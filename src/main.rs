use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use log::{info, warn};

use folder_icon_generator::{
    Compositor, DropSource, FileDecoder, FolderTemplate, GlyphLibrary,
    HELP_URL, IconSession, JsonFileStore, PngFileExporter, PreferenceStore, Preferences,
    SystemClipboard, builtin_names,
};

#[derive(Parser, Debug)]
#[command(version, about = "Generate custom macOS folder icons from a symbol or an image")]
struct Cli {
    /// Preferences file to use instead of the per-user one
    #[arg(long, global = true, value_name = "PATH")]
    prefs_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an icon and write it to a file and/or the clipboard
    Render(RenderArgs),

    /// Inspect or edit saved preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// List the built-in glyph names
    Symbols {
        /// Also list glyphs found in this directory
        #[arg(long, value_name = "DIR")]
        glyph_dir: Option<PathBuf>,
    },

    /// Print where to learn how to apply a copied icon in Finder
    HelpLink,
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Glyph to draw (overrides the saved preference)
    #[arg(long, value_name = "NAME")]
    symbol: Option<String>,

    /// Image to use instead of a glyph
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Turn the image into a tinted luminance mask
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    luminance_alpha: Option<bool>,

    /// Folder template, SVG or raster
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,

    /// Directory of extra `<name>.svg` glyphs
    #[arg(long, value_name = "DIR")]
    glyph_dir: Option<PathBuf>,

    /// PNG file to write
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Copy the icon to the clipboard
    #[arg(long)]
    copy: bool,

    /// Save --symbol and --luminance-alpha as the new preferences
    #[arg(long)]
    save: bool,
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    /// Print the current preferences as JSON
    Show,
    /// Change one or more preferences
    Set {
        #[arg(long, value_name = "NAME")]
        symbol: Option<String>,
        #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
        luminance_alpha: Option<bool>,
    },
    /// Restore the defaults
    Reset,
    /// Print the preferences file location
    Path,
}

const DEFAULT_OUTPUT: &str = "folder-icon.png";

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store = match cli.prefs_file {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::default_location()?,
    };

    match cli.command {
        Command::Render(args) => render(&store, args),
        Command::Prefs { action } => prefs(&store, action),
        Command::Symbols { glyph_dir } => {
            for name in builtin_names() {
                println!("{name}");
            }
            if let Some(dir) = glyph_dir {
                let glyphs = load_glyphs(&dir)?;
                for name in glyphs.custom_names() {
                    println!("{name}");
                }
            }
            Ok(())
        }
        Command::HelpLink => {
            println!("{HELP_URL}");
            Ok(())
        }
    }
}

/// Loads saved preferences, falling back to defaults if they can't be read.
fn load_prefs(store: &JsonFileStore) -> Preferences {
    store.load().unwrap_or_else(|e| {
        warn!("could not load preferences, using defaults: {e}");
        Preferences::default()
    })
}

fn load_glyphs(dir: &Path) -> Result<GlyphLibrary> {
    let mut glyphs = GlyphLibrary::new();
    let count = glyphs
        .load_dir(dir)
        .with_context(|| format!("failed to read glyphs from {}", dir.display()))?;
    info!("loaded {count} glyphs from {}", dir.display());
    Ok(glyphs)
}

fn render(store: &JsonFileStore, args: RenderArgs) -> Result<()> {
    let mut compositor = match &args.template {
        Some(path) => Compositor::with_template(
            FolderTemplate::from_file(path)
                .with_context(|| format!("failed to load template {}", path.display()))?,
        ),
        None => Compositor::new()?,
    };
    if let Some(dir) = &args.glyph_dir {
        compositor = compositor.with_glyphs(load_glyphs(dir)?);
    }

    let mut session = IconSession::new(compositor, load_prefs(store));
    if let Some(symbol) = args.symbol {
        session.set_symbol_name(symbol);
    }
    if let Some(enabled) = args.luminance_alpha {
        session.set_luminance_to_alpha(enabled);
    }
    if args.save {
        store.save(session.preferences())?;
        info!("saved preferences to {}", store.path().display());
    }

    // Applied after the symbol so a custom icon doesn't lock it.
    if let Some(path) = args.image {
        let source = DropSource::Path(path.clone());
        if !session.drop_source(&FileDecoder, &source) {
            warn!("{} is not a usable image; drawing the symbol instead", path.display());
        }
    }

    if session.render().is_none() {
        bail!("rendering failed, nothing to export");
    }

    let output = match (&args.output, args.copy) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => None,
        (None, false) => Some(PathBuf::from(DEFAULT_OUTPUT)),
    };
    if let Some(path) = output {
        session
            .copy_to_clipboard(&mut PngFileExporter::new(&path))
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{}", path.display());
    }
    if args.copy {
        // This process exits right away, so on Linux the copy has to wait
        // for another application to take the clipboard over.
        let mut clipboard = SystemClipboard::new()
            .context("clipboard unavailable")?
            .hold_until_replaced(true);
        if cfg!(target_os = "linux") {
            eprintln!("Serving the icon on the clipboard until something else is copied...");
        }
        session.copy_to_clipboard(&mut clipboard)?;
        println!("Copied. Paste it onto a folder in Finder's Get Info panel; see `help-link`.");
    }
    Ok(())
}

fn prefs(store: &JsonFileStore, action: PrefsAction) -> Result<()> {
    match action {
        PrefsAction::Show => {
            println!("{}", load_prefs(store).to_json_pretty()?);
        }
        PrefsAction::Set {
            symbol,
            luminance_alpha,
        } => {
            if symbol.is_none() && luminance_alpha.is_none() {
                bail!("nothing to set; pass --symbol and/or --luminance-alpha");
            }
            let mut prefs = load_prefs(store);
            if let Some(symbol) = symbol {
                prefs = prefs.with_symbol_name(symbol);
            }
            if let Some(enabled) = luminance_alpha {
                prefs = prefs.with_luminance_to_alpha(enabled);
            }
            store.save(&prefs)?;
            println!("{}", prefs.to_json_pretty()?);
        }
        PrefsAction::Reset => {
            store.save(&Preferences::default())?;
        }
        PrefsAction::Path => {
            println!("{}", store.path().display());
        }
    }
    Ok(())
}
