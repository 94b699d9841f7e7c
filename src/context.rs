//! Pipeline-side view of the conversion settings.

use log::debug;
use std::sync::Arc;

use crate::errors::Result;
use crate::fonts::{BasicFontProvider, FontProvider};
use crate::media::MediaDeviceDescription;
use crate::properties::{ConverterProperties, DEFAULT_CHARSET};
use crate::renderers::NodeRendererFactory;
use crate::resolver::ResourceResolver;

/// Everything a conversion run reads from its properties, with the consumer-side
/// fallbacks applied: a basic font provider, print media and UTF-8 when the
/// corresponding setting is absent.
///
/// Built once per run; the properties it was built from are only read.
#[derive(Debug, Clone)]
pub struct ProcessorContext {
    font_provider: Arc<dyn FontProvider>,
    media_device_description: Arc<MediaDeviceDescription>,
    renderer_factory: Arc<dyn NodeRendererFactory>,
    resource_resolver: ResourceResolver,
    charset: String,
}

impl ProcessorContext {
    /// Fails only when the base URI cannot be turned into a URL.
    pub fn new(props: &dyn ConverterProperties) -> Result<Self> {
        let font_provider = match props.font_provider() {
            Some(provider) => Arc::clone(provider),
            None => {
                debug!("No font provider configured, using the basic font provider");
                Arc::new(BasicFontProvider::default()) as Arc<dyn FontProvider>
            }
        };
        let media_device_description = match props.media_device_description() {
            Some(media) => Arc::clone(media),
            None => Arc::new(MediaDeviceDescription::create_default()),
        };
        let resource_resolver =
            ResourceResolver::new(props.base_uri(), Arc::clone(props.resource_retriever()))?;

        Ok(ProcessorContext {
            font_provider,
            media_device_description,
            renderer_factory: Arc::clone(props.renderer_factory()),
            resource_resolver,
            charset: props.charset().unwrap_or(DEFAULT_CHARSET).to_string(),
        })
    }

    pub fn font_provider(&self) -> &Arc<dyn FontProvider> {
        &self.font_provider
    }

    pub fn media_device_description(&self) -> &MediaDeviceDescription {
        &self.media_device_description
    }

    pub fn renderer_factory(&self) -> &Arc<dyn NodeRendererFactory> {
        &self.renderer_factory
    }

    pub fn resource_resolver(&self) -> &ResourceResolver {
        &self.resource_resolver
    }

    /// The charset to decode input markup with. An absent setting resolves to UTF-8.
    pub fn charset(&self) -> &str {
        &self.charset
    }
}
