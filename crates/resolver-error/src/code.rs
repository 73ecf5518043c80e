#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::FromRepr,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // Argument binding
    ArgumentCoercionError,
    // Invocation
    MissingTarget,
    ResolverError,
    // Routing
    UnknownField,
    InternalServerError,
}

impl ErrorCode {
    /// Whether the error was caused by the request rather than by the resolver or its
    /// configuration.
    pub fn is_request_error(self) -> bool {
        matches!(self, ErrorCode::ArgumentCoercionError)
    }
}
