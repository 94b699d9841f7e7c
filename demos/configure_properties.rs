use std::sync::Arc;

use svg_convert_props::{
    BasicFontProvider, ConverterProperties, FontCharacteristics, ProcessorContext,
    PropertiesConfig, SvgConverterProperties,
};

fn main() -> anyhow::Result<()> {
    // Load .env first so a RUST_LOG set there reaches the logger.
    dotenvy::dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = PropertiesConfig::from_env()?;
    log::info!("Loaded settings from environment: {:?}", config);

    let mut props = SvgConverterProperties::from_config(&config);
    props.set_font_provider(Some(Arc::new(BasicFontProvider::default())));

    log::info!("Base URI: '{}'", props.base_uri());
    log::info!("Charset: {:?}", props.charset());

    let context = ProcessorContext::new(&props)?;
    log::info!(
        "Resolved base URL: {}",
        context.resource_resolver().resolve_against_base_uri(".")?
    );
    log::info!("Media type: {}", context.media_device_description().media_type);

    for tag in ["svg", "rect", "title", "blink"] {
        if context.renderer_factory().is_tag_ignored(tag) {
            log::info!("<{}> is ignored", tag);
            continue;
        }
        match context.renderer_factory().create_renderer_for_tag(tag, None) {
            Ok(renderer) => log::info!("<{}> -> {:?}", tag, renderer.kind()),
            Err(e) => log::warn!("{}", e),
        }
    }

    if let Some(font) = context
        .font_provider()
        .get_font(&FontCharacteristics::new("sans-serif").with_weight(700))
    {
        log::info!("sans-serif bold resolves to {} {}", font.family, font.weight);
    }

    Ok(())
}
