use actix_web::web::{
    self, Data, FormConfig, JsonConfig, PathConfig, PayloadConfig, QueryConfig, ServiceConfig,
};
use actix_web::{App, HttpServer, ResponseError};
use mongodb::Client;
use tracing::info;
use tracing_actix_web::TracingLogger;

#[cfg(test)]
macro_rules! init_mock_app {
    ($db:expr) => {
        init_mock_app!($db, $crate::generation::GenerationService::disabled())
    };
    ($db:expr, $generation:expr) => {
        actix_web::test::init_service(
            actix_web::App::new().configure($crate::testing::mock_services($db, $generation)),
        )
        .await
    };
}

pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod generation;
pub mod health;
pub mod product;
pub mod typedid;
pub mod upload;
pub mod user;

pub use campaign::{CampaignBody, CreateCampaignBody};
pub use config::Config;
pub use error::Error;
pub use health::HealthBody;
pub use product::{CreateProductBody, ProductBody};
pub use upload::UploadBody;
pub use user::{CreateUserBody, UpdateUserBody, UserBody};

use crate::database::{Database, MongoDatabase};
use crate::generation::GenerationService;
use crate::upload::{FileStore, FileSystemStore};

/// Registers the extractor error handlers and every endpoint.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(FormConfig::default().error_handler(|err, _req| {
        // format form errors with custom format
        Error::InvalidForm(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(user::endpoints::create_user)
    .service(user::endpoints::get_users)
    .service(user::endpoints::get_user_by_id)
    .service(user::endpoints::update_user)
    .service(product::endpoints::create_product)
    .service(product::endpoints::get_products)
    .service(product::endpoints::get_product_by_id)
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::generate_campaign)
    .service(upload::endpoints::upload_file)
    .service(health::health);
}

pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to db: {}", config.mongodb_uri);
    let db = Client::with_uri_str(&config.mongodb_uri)
        .await?
        .database(&config.database);
    MongoDatabase::initialize(&db).await?;
    let db = MongoDatabase::new(db);

    let generation = Data::new(GenerationService::new(&config.generation));
    let store: Box<dyn FileStore> = Box::new(
        FileSystemStore::new(&config.upload.static_dir, &config.upload.public_url).await?,
    );
    let store = Data::new(store);
    let db: Data<Box<dyn Database>> = Data::new(Box::new(db));
    let upload_limit = config.upload.upload_limit;

    info!("listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .app_data(generation.clone())
            .app_data(store.clone())
            .app_data(PayloadConfig::new(upload_limit))
            .wrap(TracingLogger::default())
            .configure(configure)
            .default_service(web::to(|| async { Error::PathNotFound.error_response() }))
    })
    .bind(&config.bind)?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use actix_web::web::{Data, ServiceConfig};

    use crate::database::test::MockDatabase;
    use crate::database::Database;
    use crate::generation::GenerationService;

    pub fn mock_services(
        db: MockDatabase,
        generation: GenerationService,
    ) -> impl FnOnce(&mut ServiceConfig) {
        move |cfg| {
            let db: Box<dyn Database> = Box::new(db);
            cfg.app_data(Data::new(db))
                .app_data(Data::new(generation));
            crate::configure(cfg);
        }
    }
}
