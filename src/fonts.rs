use anyhow::{anyhow, Result};
use fontdue::{Font, FontSettings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Searched in order; the first file that reads and parses wins.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/corefonts/arial.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub path: PathBuf,
    pub bytes: Arc<Vec<u8>>,
}

pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = FONT_CANDIDATES.iter().map(PathBuf::from).collect();
    if let Some(dir) = dirs::font_dir() {
        candidates.push(dir.join("DejaVuSans.ttf"));
        candidates.push(dir.join("LiberationSans-Regular.ttf"));
    }
    candidates
}

pub fn locate_font() -> Result<LoadedFont> {
    locate_font_in(candidate_paths())
}

pub fn locate_font_in<I>(candidates: I) -> Result<LoadedFont>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut tried = Vec::new();
    for path in candidates {
        match std::fs::read(&path) {
            Ok(bytes) => match Font::from_bytes(bytes.as_slice(), FontSettings::default()) {
                Ok(_) => {
                    info!(path = %path.display(), "loaded font");
                    return Ok(LoadedFont {
                        path,
                        bytes: Arc::new(bytes),
                    });
                }
                Err(err) => debug!(path = %path.display(), "not a usable font: {err}"),
            },
            Err(err) => debug!(path = %path.display(), "font not readable: {err}"),
        }
        tried.push(path.display().to_string());
    }
    Err(anyhow!(
        "could not load any system font (tried: {})",
        tried.join(", ")
    ))
}
