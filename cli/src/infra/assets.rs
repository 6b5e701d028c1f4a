//! Embedded assets — the deploy hooks compiled into the CLI binary.
//!
//! At compile time, `include_dir!` embeds everything under `cli/assets/hooks/`:
//!   - `post-update-wp`  — hub hook for WordPress projects
//!   - `post-update-yii` — hub hook for Yii projects

use anyhow::Result;
use include_dir::{Dir, include_dir};

use crate::application::ports::AssetSource;

static EMBEDDED_HOOKS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets/hooks");

/// Production `AssetSource` backed by the embedded hook directory.
pub struct EmbeddedAssets;

impl AssetSource for EmbeddedAssets {
    fn get_asset(&self, name: &str) -> Result<&'static [u8]> {
        EMBEDDED_HOOKS
            .get_file(name)
            .map(include_dir::File::contents)
            .ok_or_else(|| anyhow::anyhow!("embedded asset not found: {name}"))
    }
}
