use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a mesh, texture, or output image.
///
/// Loading never yields a silently empty resource: the caller gets one of these
/// and decides whether to abort or substitute.
#[derive(Error, Debug)]
pub enum ResourceLoadError {
    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error on '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse OBJ '{path}': {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("Mesh '{0}' contains no triangles")]
    EmptyMesh(PathBuf),

    #[error("Output buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Failure to read or parse a TOML configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
