use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::label::LabelId;

pub type CgResult<T> = Result<T, CgError>;

#[derive(Debug, Error, Diagnostic)]
pub enum CgError {
    #[error("script is not configured")]
    #[diagnostic(
        code("cg.not_configured"),
        help("the script document must be a JSON object with a `scenes` list")
    )]
    NotConfigured,
    #[error("resource limit exceeded: {0}")]
    #[diagnostic(code("cg.resource_limit"))]
    ResourceLimit(String),
    #[error("serialization error: {message}")]
    #[diagnostic(code("cg.serialization"))]
    Serialization {
        message: String,
        #[source_code]
        src: String,
        #[label("here")]
        span: SourceSpan,
    },
    #[error("invalid compiler config: {0}")]
    #[diagnostic(code("cg.config"))]
    Config(#[from] toml::de::Error),
    #[error("failed to read {}", path.display())]
    #[diagnostic(code("cg.io"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while walking a compiled graph with [`Player`](crate::Player).
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum PlayError {
    #[error("a choice must be made to leave '{0}'")]
    #[diagnostic(code("cg.play.choice_required"))]
    ChoiceRequired(LabelId),
    #[error("'{0}' is not showing choices")]
    #[diagnostic(code("cg.play.no_choice"))]
    NoChoiceHere(LabelId),
    #[error("choice index {0} out of range")]
    #[diagnostic(code("cg.play.invalid_choice"))]
    InvalidChoice(usize),
    #[error("'{0}' has no way forward")]
    #[diagnostic(code("cg.play.no_affordance"))]
    NoAffordance(LabelId),
    #[error("label '{0}' does not exist")]
    #[diagnostic(code("cg.play.unknown_label"))]
    UnknownLabel(LabelId),
}
