//! Renderer selection for SVG elements.
//!
//! The conversion pipeline asks a [`NodeRendererFactory`] for a renderer per element
//! tag. The default factory maps tags through a [`DefaultRendererMapper`]; drawing
//! itself is left to the pipeline.

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use std::any::Any;
use std::fmt;

use crate::errors::RendererError;

/// A specialized Result type for renderer creation.
pub type Result<T> = std::result::Result<T, RendererError>;

/// The kinds of renderers the default mapper knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    Svg,
    NestedSvg,
    Group,
    Circle,
    Ellipse,
    Rect,
    Line,
    Polyline,
    Polygon,
    Path,
    Text,
    TextSpan,
    TextPath,
    Image,
    Use,
    Defs,
    Symbol,
    ClipPath,
    LinearGradient,
    Stop,
    Pattern,
    Marker,
}

/// A renderer instance for one SVG element.
pub trait SvgNodeRenderer: fmt::Debug + Send + Sync {
    fn kind(&self) -> RendererKind;

    /// The element tag this renderer was created for.
    fn tag(&self) -> &str;

    /// Tag of the parent element, if the renderer was created inside one.
    fn parent_tag(&self) -> Option<&str>;

    fn attributes(&self) -> &IndexMap<String, String>;

    fn set_attribute(&mut self, name: &str, value: &str);

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes().get(name).map(String::as_str)
    }
}

/// Creates renderers for SVG element tags.
pub trait NodeRendererFactory: fmt::Debug + Send + Sync {
    /// Creates a renderer for `tag`. `parent` is the renderer of the enclosing element.
    ///
    /// Tags the factory does not handle yield [`RendererError::UnsupportedTag`].
    fn create_renderer_for_tag(
        &self,
        tag: &str,
        parent: Option<&dyn SvgNodeRenderer>,
    ) -> Result<Box<dyn SvgNodeRenderer>>;

    /// Whether the pipeline should skip `tag` (and its subtree) silently.
    fn is_tag_ignored(&self, tag: &str) -> bool;

    /// Concrete type access for callers that need the implementation behind the trait.
    fn as_any(&self) -> &dyn Any;
}

/// Renderer produced by the default factory.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRenderer {
    kind: RendererKind,
    tag: String,
    parent_tag: Option<String>,
    attributes: IndexMap<String, String>,
}

impl ElementRenderer {
    pub fn new(kind: RendererKind, tag: &str, parent_tag: Option<&str>) -> Self {
        ElementRenderer {
            kind,
            tag: tag.to_string(),
            parent_tag: parent_tag.map(str::to_string),
            attributes: IndexMap::new(),
        }
    }
}

impl SvgNodeRenderer for ElementRenderer {
    fn kind(&self) -> RendererKind {
        self.kind
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn parent_tag(&self) -> Option<&str> {
        self.parent_tag.as_deref()
    }

    fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

// Tags that are valid SVG but carry nothing drawable.
const IGNORED_TAGS: &[&str] = &[
    "a",
    "altGlyph",
    "altGlyphDef",
    "animate",
    "animateMotion",
    "animateTransform",
    "color-profile",
    "cursor",
    "desc",
    "filter",
    "font",
    "font-face",
    "glyph",
    "hkern",
    "metadata",
    "missing-glyph",
    "script",
    "set",
    "style",
    "switch",
    "title",
    "view",
    "vkern",
];

/// Tag-to-renderer mapping used by [`DefaultSvgNodeRendererFactory`].
///
/// Tag names are matched case-sensitively, as SVG element names are.
#[derive(Debug, Clone)]
pub struct DefaultRendererMapper {
    mapping: IndexMap<String, RendererKind>,
    ignored: IndexSet<String>,
}

impl Default for DefaultRendererMapper {
    fn default() -> Self {
        let mapping = [
            ("svg", RendererKind::Svg),
            ("g", RendererKind::Group),
            ("circle", RendererKind::Circle),
            ("ellipse", RendererKind::Ellipse),
            ("rect", RendererKind::Rect),
            ("line", RendererKind::Line),
            ("polyline", RendererKind::Polyline),
            ("polygon", RendererKind::Polygon),
            ("path", RendererKind::Path),
            ("text", RendererKind::Text),
            ("tspan", RendererKind::TextSpan),
            ("textPath", RendererKind::TextPath),
            ("image", RendererKind::Image),
            ("use", RendererKind::Use),
            ("defs", RendererKind::Defs),
            ("symbol", RendererKind::Symbol),
            ("clipPath", RendererKind::ClipPath),
            ("linearGradient", RendererKind::LinearGradient),
            ("stop", RendererKind::Stop),
            ("pattern", RendererKind::Pattern),
            ("marker", RendererKind::Marker),
        ]
        .into_iter()
        .map(|(tag, kind)| (tag.to_string(), kind))
        .collect();

        DefaultRendererMapper {
            mapping,
            ignored: IGNORED_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl DefaultRendererMapper {
    pub fn new() -> Self {
        Default::default()
    }

    /// Maps `tag` to `kind`, replacing any previous mapping and un-ignoring the tag.
    pub fn map_tag(&mut self, tag: &str, kind: RendererKind) -> &mut Self {
        self.ignored.shift_remove(tag);
        self.mapping.insert(tag.to_string(), kind);
        self
    }

    /// Marks `tag` as ignored, dropping any mapping it had.
    pub fn ignore_tag(&mut self, tag: &str) -> &mut Self {
        self.mapping.shift_remove(tag);
        self.ignored.insert(tag.to_string());
        self
    }

    pub fn kind_for(&self, tag: &str) -> Option<RendererKind> {
        self.mapping.get(tag).copied()
    }

    pub fn is_ignored(&self, tag: &str) -> bool {
        self.ignored.contains(tag)
    }

    /// Mapped tags in registration order.
    pub fn mapped_tags(&self) -> impl Iterator<Item = &str> {
        self.mapping.keys().map(String::as_str)
    }
}

/// Factory used when the caller does not supply one.
#[derive(Debug, Clone, Default)]
pub struct DefaultSvgNodeRendererFactory {
    mapper: DefaultRendererMapper,
}

impl DefaultSvgNodeRendererFactory {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_mapper(mapper: DefaultRendererMapper) -> Self {
        DefaultSvgNodeRendererFactory { mapper }
    }

    pub fn mapper(&self) -> &DefaultRendererMapper {
        &self.mapper
    }
}

impl NodeRendererFactory for DefaultSvgNodeRendererFactory {
    fn create_renderer_for_tag(
        &self,
        tag: &str,
        parent: Option<&dyn SvgNodeRenderer>,
    ) -> Result<Box<dyn SvgNodeRenderer>> {
        let kind = match self.mapper.kind_for(tag) {
            // An <svg> inside another element establishes a nested viewport.
            Some(RendererKind::Svg) if parent.is_some() => RendererKind::NestedSvg,
            Some(kind) => kind,
            None => {
                if !self.mapper.is_ignored(tag) {
                    warn!("No renderer mapped for SVG tag <{}>", tag);
                }
                return Err(RendererError::UnsupportedTag(tag.to_string()));
            }
        };
        debug!("Creating {:?} renderer for <{}>", kind, tag);
        Ok(Box::new(ElementRenderer::new(
            kind,
            tag,
            parent.map(|p| p.tag()),
        )))
    }

    fn is_tag_ignored(&self, tag: &str) -> bool {
        self.mapper.is_ignored(tag)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
