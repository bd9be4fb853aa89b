pub mod placeholder;
pub mod provider;

pub use placeholder::{FALLBACK_CATEGORIES, PlaceholderLocalProvider, RandomFallback};
pub use provider::{
    Detection, ErrorKind, ImageInput, ImageInputError, ImageLabelProvider, ProviderError,
    VisionLabel,
};
