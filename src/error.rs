use std::io;

/// Errors raised while building a scene.
///
/// Every variant is fatal: a scene which fails to build is never rendered,
/// not even partially.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("sphere: negative radius ({0})")]
    NegativeRadius(f64),

    #[error("rectangle: negative width ({0})")]
    NegativeWidth(f64),

    #[error("rectangle: negative height ({0})")]
    NegativeHeight(f64),

    /// The description never set up the camera and image size.
    #[error("scene has no camera (ENV) line")]
    MissingCamera,

    /// The description never set up the directional light.
    #[error("scene has no directional light (DL)")]
    MissingLight,

    /// The light direction has no length, so it cannot be normalized.
    #[error("directional light has a zero-length direction")]
    ZeroLightDirection,

    #[error("image must be at least 1x1 (got {width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("image is too large ({width}x{height})")]
    ImageTooLarge { width: usize, height: usize },

    /// A procedural surface name which isn't built in.
    #[error("unknown procedural surface \"{0}\"")]
    UnknownSurface(String),

    /// A line of a text description couldn't be understood.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("couldn't read scene: {0}")]
    Io(#[from] io::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
use std::error::Error;

#[test]
fn display_geometry_errors() {
    assert_eq!(SceneError::NegativeRadius(-1.5).to_string(),
        "sphere: negative radius (-1.5)");
    assert_eq!(
        SceneError::Malformed { line: 3, reason: "bad".to_string() }
            .to_string(),
        "line 3: bad"
    );
}

#[test]
fn io_errors_keep_their_source() {
    let e: SceneError = io::Error::new(io::ErrorKind::Other, "boom").into();

    assert!(e.source().is_some());
    assert!(SceneError::MissingLight.source().is_none());
}
