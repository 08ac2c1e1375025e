use thiserror::Error;

#[derive(Debug, Error)]
pub enum UfoTreeError {
    #[error("Cannot coerce {raw:?} into {target}")]
    TypeCoercion { raw: String, target: &'static str },

    #[error("Key {key:?} not found in locked map")]
    KeyNotFound { key: String },

    #[error("Unsupported shape: {found}")]
    UnsupportedShape { found: String },

    #[error("Error parsing XML document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("{0}")]
    General(String),
}
