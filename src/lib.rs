pub mod config;
pub mod context;
pub mod errors;
pub mod fonts;
pub mod media;
pub mod properties;
pub mod renderers;
pub mod resolver;

pub use config::PropertiesConfig;
pub use context::ProcessorContext;
pub use errors::{ConfigError, RendererError, ResourceError, Result};
pub use fonts::{BasicFontProvider, FontCharacteristics, FontInfo, FontProvider, FontStyle};
pub use media::{MediaDeviceDescription, MediaType};
pub use properties::{ConverterProperties, SvgConverterProperties, DEFAULT_CHARSET};
pub use renderers::{
    DefaultRendererMapper, DefaultSvgNodeRendererFactory, NodeRendererFactory, RendererKind,
    SvgNodeRenderer,
};
pub use resolver::{
    stream_limit_error, DefaultResourceRetriever, ResourceResolver, ResourceRetriever,
    StreamLimitError, UriResolver,
};

// Re-exported so implementors of `ResourceRetriever` need not depend on `reqwest` directly.
pub use reqwest::Url;
