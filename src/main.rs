#[macro_use]
extern crate rocket;

use std::env;

use dotenv::dotenv;
use env_logger::Env;
use log::info;
use rocket::{
    figment::{
        providers::{Format, Toml},
        Figment, Profile,
    },
    Config,
};

use resolvn::api;
use resolvn::cache::{AssetCache, ImageCache};
use resolvn::catalog;
use resolvn::config::AppConfig;
use resolvn::cors::CORS;
use resolvn::images::ImageFetcher;
use resolvn::resolvers;
use resolvn::store::KvStore;

#[launch]
async fn rocket() -> _ {
    dotenv().ok();

    // Load config
    let mut figment = Figment::from(Config::default())
        .merge(Toml::file("App.toml").nested());

    // Environment overrides
    if let Ok(strategy) = env::var("RESOLVER_STRATEGY") {
        figment = figment.merge(("resolver_strategy", strategy));
    }
    if let Ok(album_url) = env::var("ALBUM_URL") {
        figment = figment.merge(("album_url", album_url));
    }
    if let Ok(store_path) = env::var("STORE_PATH") {
        figment = figment.merge(("store_path", store_path));
    }

    figment = figment.select(Profile::from_env_or("APP_PROFILE", "default"));

    let config = figment.extract::<AppConfig>().expect("Invalid configuration");

    // Initialize logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Configuration loaded successfully");

    let store = KvStore::open(config.store_path.as_str());
    let resolver = resolvers::for_strategy(&config);
    info!("Resolver strategy: {:?}", config.resolver_strategy);

    let asset_cache = AssetCache::new(store, &config);
    let image_cache = ImageCache::new();
    let image_fetcher = ImageFetcher::new(config.timeout, &config.user_agent);

    // Warm the cache for every catalog key without delaying startup
    {
        let cache = asset_cache.clone();
        let resolver = resolver.clone();
        tokio::spawn(async move {
            cache.prewarm(catalog::service_ids(), resolver).await;
        });
    }

    info!(
        "Starting resolvn API server on {}:{}",
        config.address, config.port
    );

    rocket::custom(figment)
        .attach(CORS)
        .manage(asset_cache)
        .manage(image_cache)
        .manage(image_fetcher)
        .manage(resolver)
        .manage(config)
        .mount(
            "/services",
            routes![
                api::services::get_services,
                api::services::get_service,
                api::services::get_share_links,
            ],
        )
        .mount(
            "/assets",
            routes![
                api::assets::get_assets,
                api::assets::proxy_image,
                api::assets::clear_key_cache,
                api::assets::clear_all_caches,
            ],
        )
}
