//! Settings handed to the SVG conversion pipeline.
//!
//! [`SvgConverterProperties`] is a plain carrier: it populates the resource retriever
//! and renderer factory with defaults, lets callers override any field through
//! chained setters, and never validates what it is given. The pipeline reads it
//! through the [`ConverterProperties`] trait only.

use std::fmt;
use std::sync::Arc;

use crate::config::PropertiesConfig;
use crate::fonts::FontProvider;
use crate::media::MediaDeviceDescription;
use crate::renderers::{DefaultSvgNodeRendererFactory, NodeRendererFactory};
use crate::resolver::{DefaultResourceRetriever, ResourceRetriever};

/// Canonical name of the charset assumed for input markup when none is configured.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Read-only view of the conversion settings, as consumed by the pipeline.
pub trait ConverterProperties: fmt::Debug {
    /// Base URI relative resource references are resolved against. May be empty.
    fn base_uri(&self) -> &str;

    fn font_provider(&self) -> Option<&Arc<dyn FontProvider>>;

    fn media_device_description(&self) -> Option<&Arc<MediaDeviceDescription>>;

    /// Used to retrieve data from resources by URL. Always present.
    fn resource_retriever(&self) -> &Arc<dyn ResourceRetriever>;

    /// Always present.
    fn renderer_factory(&self) -> &Arc<dyn NodeRendererFactory>;

    /// Charset of the input markup. `None` leaves the choice to the consumer,
    /// which falls back to UTF-8.
    fn charset(&self) -> Option<&str>;
}

/// Default implementation of [`ConverterProperties`].
///
/// ```
/// use std::sync::Arc;
/// use svg_convert_props::{BasicFontProvider, ConverterProperties, SvgConverterProperties};
///
/// let mut props = SvgConverterProperties::new();
/// props
///     .set_base_uri("https://example.com/drawings/")
///     .set_charset(Some("ISO-8859-1"))
///     .set_font_provider(Some(Arc::new(BasicFontProvider::default())));
///
/// assert_eq!(props.base_uri(), "https://example.com/drawings/");
/// assert_eq!(props.charset(), Some("ISO-8859-1"));
/// assert!(props.font_provider().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct SvgConverterProperties {
    media_device_description: Option<Arc<MediaDeviceDescription>>,
    font_provider: Option<Arc<dyn FontProvider>>,
    base_uri: String,
    resource_retriever: Arc<dyn ResourceRetriever>,
    renderer_factory: Arc<dyn NodeRendererFactory>,
    charset: Option<String>,
}

impl Default for SvgConverterProperties {
    fn default() -> Self {
        SvgConverterProperties {
            media_device_description: None,
            font_provider: None,
            base_uri: String::new(),
            resource_retriever: Arc::new(DefaultResourceRetriever::new()),
            renderer_factory: Arc::new(DefaultSvgNodeRendererFactory::new()),
            charset: Some(DEFAULT_CHARSET.to_string()),
        }
    }
}

impl SvgConverterProperties {
    /// Creates properties with an empty base URI, a UTF-8 charset, and the default
    /// resource retriever and renderer factory.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates default properties and applies `config` on top of them.
    pub fn from_config(config: &PropertiesConfig) -> Self {
        let mut props = Self::new();
        config.apply_to(&mut props);
        props
    }

    pub fn set_renderer_factory(
        &mut self,
        renderer_factory: Arc<dyn NodeRendererFactory>,
    ) -> &mut Self {
        self.renderer_factory = renderer_factory;
        self
    }

    pub fn set_font_provider(&mut self, font_provider: Option<Arc<dyn FontProvider>>) -> &mut Self {
        self.font_provider = font_provider;
        self
    }

    pub fn set_base_uri(&mut self, base_uri: impl Into<String>) -> &mut Self {
        self.base_uri = base_uri.into();
        self
    }

    pub fn set_media_device_description(
        &mut self,
        media_device_description: Option<Arc<MediaDeviceDescription>>,
    ) -> &mut Self {
        self.media_device_description = media_device_description;
        self
    }

    pub fn set_resource_retriever(
        &mut self,
        resource_retriever: Arc<dyn ResourceRetriever>,
    ) -> &mut Self {
        self.resource_retriever = resource_retriever;
        self
    }

    /// Sets the charset. `None` is kept as-is and not replaced by UTF-8 here.
    pub fn set_charset(&mut self, charset: Option<&str>) -> &mut Self {
        self.charset = charset.map(str::to_string);
        self
    }
}

impl ConverterProperties for SvgConverterProperties {
    fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn font_provider(&self) -> Option<&Arc<dyn FontProvider>> {
        self.font_provider.as_ref()
    }

    fn media_device_description(&self) -> Option<&Arc<MediaDeviceDescription>> {
        self.media_device_description.as_ref()
    }

    fn resource_retriever(&self) -> &Arc<dyn ResourceRetriever> {
        &self.resource_retriever
    }

    fn renderer_factory(&self) -> &Arc<dyn NodeRendererFactory> {
        &self.renderer_factory
    }

    fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }
}
