//! Loading converter settings from JSON or the environment.

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::env::{self, VarError};
use std::sync::Arc;

use crate::errors::ConfigError;
use crate::media::{MediaDeviceDescription, MediaType};
use crate::properties::{ConverterProperties, SvgConverterProperties};
use crate::resolver::{DefaultResourceRetriever, ResourceRetriever};

pub const ENV_BASE_URI: &str = "SVG_BASE_URI";
pub const ENV_CHARSET: &str = "SVG_CHARSET";
pub const ENV_MEDIA_TYPE: &str = "SVG_MEDIA_TYPE";
pub const ENV_RESOURCE_SIZE_LIMIT: &str = "SVG_RESOURCE_SIZE_LIMIT";

/// Serializable subset of [`SvgConverterProperties`].
///
/// Every field is optional; missing fields leave the target untouched. `charset`
/// distinguishes a missing key (keep the current value) from an explicit `null`
/// (clear the charset).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertiesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub charset: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaDeviceDescription>,
    /// Byte limit for the default resource retriever. A retriever the caller set
    /// on the properties is never replaced; the limit is skipped for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_size_limit: Option<u64>,
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl PropertiesConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads `SVG_BASE_URI`, `SVG_CHARSET`, `SVG_MEDIA_TYPE` and
    /// `SVG_RESOURCE_SIZE_LIMIT`. An empty `SVG_CHARSET` clears the charset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| match env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(e) => Err(e.into()),
        })
    }

    /// Same as [`PropertiesConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<Option<String>, ConfigError>,
    {
        let media = lookup(ENV_MEDIA_TYPE)?
            .map(|value| value.parse::<MediaType>())
            .transpose()?
            .map(MediaDeviceDescription::new);

        let resource_size_limit = lookup(ENV_RESOURCE_SIZE_LIMIT)?
            .map(|value| {
                value.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue(format!("{}={}: {}", ENV_RESOURCE_SIZE_LIMIT, value, e))
                })
            })
            .transpose()?;

        Ok(PropertiesConfig {
            base_uri: lookup(ENV_BASE_URI)?,
            charset: lookup(ENV_CHARSET)?.map(|value| Some(value).filter(|v| !v.is_empty())),
            media,
            resource_size_limit,
        })
    }

    /// Applies the configured fields to `props` through its setters.
    pub fn apply_to(&self, props: &mut SvgConverterProperties) {
        if let Some(base_uri) = &self.base_uri {
            props.set_base_uri(base_uri.as_str());
        }
        if let Some(charset) = &self.charset {
            props.set_charset(charset.as_deref());
        }
        if let Some(media) = &self.media {
            props.set_media_device_description(Some(Arc::new(media.clone())));
        }
        if let Some(limit) = self.resource_size_limit {
            let current = props
                .resource_retriever()
                .as_any()
                .downcast_ref::<DefaultResourceRetriever>()
                .cloned();
            match current {
                Some(mut retriever) => {
                    retriever.set_resource_size_limit(Some(limit));
                    props.set_resource_retriever(Arc::new(retriever));
                }
                None => warn!(
                    "Ignoring resource size limit of {} bytes: a custom resource retriever is set",
                    limit
                ),
            }
        }
    }
}
