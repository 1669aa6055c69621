pub type ThumbnailResult<T> = Result<T, ThumbnailError>;

#[derive(thiserror::Error, Debug)]
pub enum ThumbnailError {
    #[error("input error: {0}")]
    Input(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("empty collection: {0}")]
    Empty(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbnailError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn empty(msg: impl Into<String>) -> Self {
        Self::Empty(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
