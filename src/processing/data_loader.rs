use std::path::Path;

use log::debug;

use super::image::Image;
use crate::error::ErrorType;

pub fn load_image(path: &Path) -> Result<Image, ErrorType> {
    debug!("loading {}", path.display());

    let buffer = image::open(path)
        .map_err(|source| ErrorType::Load {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba16();

    Ok(Image::new(buffer))
}

/// Writes the latest effect result, creating the parent directory if needed.
pub fn save_image(path: &Path, image: &Image) -> Result<(), ErrorType> {
    debug!("saving {}", path.display());

    let to_save_error = |source: image::ImageError| ErrorType::Save {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| to_save_error(e.into()))?;
    }
    image.result().save(path).map_err(to_save_error)?;

    Ok(())
}
