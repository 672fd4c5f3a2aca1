//! Report font resolution.
//!
//! Reports are mostly Chinese, so startup requires a font with CJK glyphs:
//! either `REPORT_FONT_PATH` or one found in the usual system font folders.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use printpdf::PdfDocument;
use tracing::debug;
use walkdir::WalkDir;

/// File stems of common CJK fonts, best first. Compared after `normalize_stem`.
const PREFERRED_CJK_FONTS: &[&str] = &[
    "wqyzenhei",
    "wqymicrohei",
    "notosanscjksc",
    "notosanscjk",
    "notoserifcjksc",
    "notoserifcjk",
    "notosanssc",
    "sourcehansanssc",
    "sourcehansans",
    "droidsansfallbackfull",
    "droidsansfallback",
    "msyh",
    "simhei",
    "simsun",
    "pingfang",
    "stheiti",
    "arialunicodems",
];

/// Plain TrueType first: printpdf embeds the file as-is as `FontFile2`.
const FONT_EXTENSIONS: &[&str] = &["ttf", "ttc", "otf"];

const MAX_SEARCH_DEPTH: usize = 4;

/// A TrueType/OpenType font loaded once and embedded into every report.
#[derive(Clone)]
pub struct ReportFont {
    path: PathBuf,
    bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for ReportFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportFont")
            .field("path", &self.path)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ReportFont {
    /// Reads `path` and checks that printpdf can embed it.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read report font {}", path.display()))?;
        PdfDocument::empty("font check")
            .add_external_font(bytes.as_slice())
            .map_err(|e| anyhow!("{} is not a usable TrueType/OpenType font: {e:?}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes: Arc::new(bytes),
        })
    }

    /// Uses the configured font, or else the best CJK font installed on this machine.
    pub fn discover(configured: Option<&Path>) -> Result<Self> {
        if let Some(path) = configured {
            return Self::load(path).context("REPORT_FONT_PATH does not point to a usable font");
        }
        let Some(path) = find_cjk_font(&search_dirs()) else {
            bail!(
                "no CJK font found; set REPORT_FONT_PATH to a TrueType/OpenType font with \
                 Chinese glyphs (for example install fonts-wqy-zenhei or fonts-noto-cjk)"
            );
        };
        Self::load(&path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// System font folders, user folders first.
fn search_dirs() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(dir) = dirs::font_dir() {
        roots.push(dir);
    }
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".fonts"));
    }
    roots.extend(
        [
            "/usr/share/fonts",
            "/usr/local/share/fonts",
            "/Library/Fonts",
            "/System/Library/Fonts",
            r"C:\Windows\Fonts",
        ]
        .into_iter()
        .map(PathBuf::from),
    );
    roots
}

/// Lowercase ASCII alphanumerics only, so `NotoSansCJK-Regular` and
/// `noto_sans_cjk_regular` compare equal.
fn normalize_stem(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    Some(
        stem.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect(),
    )
}

fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    FONT_EXTENSIONS.iter().position(|known| *known == ext)
}

/// `(extension rank, name rank)`, or `None` for files that are not known CJK fonts.
fn preference(path: &Path) -> Option<(usize, usize)> {
    let ext = extension_rank(path)?;
    let stem = normalize_stem(path)?;
    let name = PREFERRED_CJK_FONTS
        .iter()
        .position(|known| stem.starts_with(known))?;
    Some((ext, name))
}

/// Walks `roots` and returns the most preferred known CJK font.
pub fn find_cjk_font(roots: &[PathBuf]) -> Option<PathBuf> {
    let mut best: Option<((usize, usize), PathBuf)> = None;
    for dir in roots.iter().filter(|d| d.is_dir()) {
        let fonts = WalkDir::new(dir)
            .max_depth(MAX_SEARCH_DEPTH)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file());
        for entry in fonts {
            let Some(rank) = preference(entry.path()) else {
                continue;
            };
            if best.as_ref().map_or(true, |(current, _)| rank < *current) {
                debug!("CJK font candidate {} (rank {rank:?})", entry.path().display());
                best = Some((rank, entry.into_path()));
            }
        }
    }
    best.map(|(_, path)| path)
}

/// Glyph-box font covering the characters used in tests.
#[cfg(test)]
pub fn test_font() -> ReportFont {
    ReportFont::load(Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/testdata/cjk-glyph-boxes.ttf"
    )))
    .expect("test font fixture loads")
}
