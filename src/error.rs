use std::path::PathBuf;
use std::process::ExitStatus;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parsing error: {0}")]
    Xml(String),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("failed to find a base layer (no layer label contains \"base\")")]
    MissingBaseLayer,

    #[error("no renderable layer labelled '{0}'")]
    UnknownLayer(String),

    #[error("more than one renderable layer is labelled '{0}'")]
    DuplicateLayer(String),

    #[error("layers '{first}' and '{second}' would both be written to '{file}'")]
    NameCollision {
        file: String,
        first: String,
        second: String,
    },

    #[error("failed to launch rasterizer '{}': {source}", .program.display())]
    RasterizerSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rasterizer exited with {status}: {stderr}")]
    RasterizerFailed { status: ExitStatus, stderr: String },

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn xml(msg: impl Into<String>) -> Self {
        Self::Xml(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = ExportError::io("out/drawing.svg", std::io::Error::other("denied"));
        let msg = err.to_string();
        assert!(msg.contains("out/drawing.svg"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn missing_base_layer_message() {
        assert!(
            ExportError::MissingBaseLayer
                .to_string()
                .contains("base layer")
        );
    }
}
